use revroute::{
    ParamMap, RequestInfo, Route, Router, RouterConfig, RoutingOutcome, SlashPolicy,
};


fn router_with(config: RouterConfig) -> Router {
    tracing_util::init();
    let mut router = Router::new(config);
    router
        .register(
            Route::builder("article", "Articles:Show")
                .pattern("/articles/<slug>")
                .build()
                .expect("route"),
        )
        .expect("register");
    router
}

fn redirect_location(outcome: RoutingOutcome) -> String {
    match outcome {
        RoutingOutcome::Redirect { location } => location,
        other => panic!("expected redirect, got {other:?}"),
    }
}

#[test]
fn test_remove_policy_strips_trailing_slash() {
    let mut config = RouterConfig::default();
    config.slash_policy = SlashPolicy::Remove;
    let router = router_with(config);
    let location = redirect_location(router.route(&RequestInfo::get("/articles/intro/")));
    assert_eq!(location, "/articles/intro");
}

#[test]
fn test_remove_policy_keeps_homepage_slash() {
    let mut config = RouterConfig::default();
    config.slash_policy = SlashPolicy::Remove;
    let router = router_with(config);
    // "/" is its own canonical form; the homepage must never redirect to "".
    assert!(!matches!(
        router.route(&RequestInfo::get("/")),
        RoutingOutcome::Redirect { .. }
    ));
}

#[test]
fn test_remove_policy_preserves_query_string() {
    let mut config = RouterConfig::default();
    config.slash_policy = SlashPolicy::Remove;
    let router = router_with(config);
    let location =
        redirect_location(router.route(&RequestInfo::get("/articles/intro/").with_query("page=2")));
    assert_eq!(location, "/articles/intro?page=2");
}

#[test]
fn test_always_policy_appends_trailing_slash() {
    let mut config = RouterConfig::default();
    config.slash_policy = SlashPolicy::Always;
    let router = router_with(config);
    let location = redirect_location(router.route(&RequestInfo::get("/articles/intro")));
    assert_eq!(location, "/articles/intro/");
}

#[test]
fn test_benevolent_policy_never_redirects_on_slash() {
    let router = router_with(RouterConfig::default());
    assert!(matches!(
        router.route(&RequestInfo::get("/articles/intro")),
        RoutingOutcome::Dispatch(_)
    ));
    // A trailing slash simply fails the constraint instead of redirecting.
    assert!(matches!(
        router.route(&RequestInfo::get("/articles/intro/")),
        RoutingOutcome::NotFound
    ));
}

#[test]
fn test_slash_redirect_respects_base_path() {
    let mut config = RouterConfig::default();
    config.slash_policy = SlashPolicy::Remove;
    let router = router_with(config);
    let req = RequestInfo::get("/app/articles/intro/").with_base_path("/app");
    assert_eq!(redirect_location(router.route(&req)), "/app/articles/intro");
}

#[test]
fn test_canonical_redirect_drops_tracking_param() {
    let mut config = RouterConfig::default();
    config.enforce_canonical = true;
    let mut router = Router::new(config);
    router
        .register(
            Route::builder("article", "Articles:Show")
                .pattern("/articles/<slug>")
                .filter_out(|params, _defaults, _req| {
                    let mut cleaned = params.clone();
                    cleaned.remove("utm");
                    Ok(cleaned)
                })
                .build()
                .expect("route"),
        )
        .expect("register");

    let req = RequestInfo::get("/articles/intro").with_query("utm=newsletter").with_param(
        "utm",
        serde_json::Value::String("newsletter".to_string()),
    );
    assert_eq!(redirect_location(router.route(&req)), "/articles/intro");
}

#[test]
fn test_canonical_check_keeps_equal_length_request() {
    let mut config = RouterConfig::default();
    config.enforce_canonical = true;
    let router = router_with(config);
    assert!(matches!(
        router.route(&RequestInfo::get("/articles/intro")),
        RoutingOutcome::Dispatch(_)
    ));
}

#[test]
fn test_redirect_route_carries_captured_params() {
    let mut router = Router::new(RouterConfig::default());
    router
        .register(
            Route::builder("doc", "Docs:Show")
                .pattern("/docs/<page>")
                .build()
                .expect("route"),
        )
        .expect("register");
    router
        .register(
            Route::builder("old_doc", "Legacy:Doc")
                .pattern("/help/<page>")
                .redirect("doc")
                .build()
                .expect("route"),
        )
        .expect("register");

    let location = redirect_location(router.route(&RequestInfo::get("/help/install")));
    assert_eq!(location, "/docs/install");
}

#[test]
fn test_redirect_route_with_missing_target_is_not_found() {
    let mut router = Router::new(RouterConfig::default());
    router
        .register(
            Route::builder("old_doc", "Legacy:Doc")
                .pattern("/help/<page>")
                .redirect("doc")
                .build()
                .expect("route"),
        )
        .expect("register");
    assert!(matches!(
        router.route(&RequestInfo::get("/help/install")),
        RoutingOutcome::NotFound
    ));
}

#[test]
fn test_query_string_strategy_pascal_cases_identifiers() {
    let router = router_with(RouterConfig::default());
    let req = RequestInfo::get("/anything")
        .with_param(
            "controller",
            serde_json::Value::String("user-profile".to_string()),
        )
        .with_param("action", serde_json::Value::String("show".to_string()));
    let RoutingOutcome::Dispatch(matched) = router.route(&req) else {
        panic!("expected dispatch");
    };
    assert_eq!(matched.controller, "UserProfile");
    assert_eq!(matched.action, "Show");
}

#[test]
fn test_asset_convention_short_circuits() {
    let router = router_with(RouterConfig::default());
    let req = RequestInfo::get("/index.php")
        .with_param("controller", serde_json::Value::String("assets".to_string()))
        .with_param("action", serde_json::Value::String("serve".to_string()))
        .with_param(
            "file",
            serde_json::Value::String("logo.png".to_string()),
        );
    let RoutingOutcome::Dispatch(matched) = router.route(&req) else {
        panic!("expected dispatch");
    };
    assert_eq!(matched.controller, "Assets");
    assert_eq!(matched.action, "Serve");
    assert_eq!(matched.params["file"], "logo.png");
}

#[test]
fn test_force_rewrite_ignores_query_identifiers() {
    let mut config = RouterConfig::default();
    config.force_rewrite = true;
    let router = router_with(config);
    let req = RequestInfo::get("/articles/intro")
        .with_param("controller", serde_json::Value::String("evil".to_string()))
        .with_param("action", serde_json::Value::String("inject".to_string()));
    let RoutingOutcome::Dispatch(matched) = router.route(&req) else {
        panic!("expected dispatch");
    };
    assert_eq!(matched.controller, "Articles");
    assert_eq!(matched.action, "Show");
}

#[test]
fn test_route_to_default_catches_unmatched() {
    let mut config = RouterConfig::default();
    config.route_to_default = true;
    config.default_controller = "Pages".to_string();
    config.default_action = "NotFound".to_string();
    let router = router_with(config);
    let RoutingOutcome::Dispatch(matched) = router.route(&RequestInfo::get("/no/route/here"))
    else {
        panic!("expected dispatch");
    };
    assert_eq!(matched.controller, "Pages");
    assert_eq!(matched.action, "NotFound");
    assert!(matched.route_name.is_none());
}

#[test]
fn test_registration_order_decides_between_overlapping_routes() {
    let mut router = Router::new(RouterConfig::default());
    router
        .register(
            Route::builder("catch_all", "Pages:Show")
                .pattern("/<page*>")
                .build()
                .expect("route"),
        )
        .expect("register");
    router
        .register(
            Route::builder("about", "Pages:About")
                .pattern("/about")
                .build()
                .expect("route"),
        )
        .expect("register");

    let RoutingOutcome::Dispatch(matched) = router.route(&RequestInfo::get("/about")) else {
        panic!("expected dispatch");
    };
    assert_eq!(matched.route_name.as_deref(), Some("catch_all"));

    let mut params = ParamMap::new();
    params.insert("page".to_string(), "contact".into());
    let url = router
        .url("catch_all", &params, &RequestInfo::get("/"))
        .expect("url");
    assert_eq!(url, "/contact");
}

#[test]
fn test_prepend_takes_priority() {
    let mut router = Router::new(RouterConfig::default());
    router
        .register(
            Route::builder("catch_all", "Pages:Show")
                .pattern("/<page*>")
                .build()
                .expect("route"),
        )
        .expect("register");
    router
        .register_prepend(
            Route::builder("about", "Pages:About")
                .pattern("/about")
                .build()
                .expect("route"),
        )
        .expect("register");
    let RoutingOutcome::Dispatch(matched) = router.route(&RequestInfo::get("/about")) else {
        panic!("expected dispatch");
    };
    assert_eq!(matched.route_name.as_deref(), Some("about"));
}
