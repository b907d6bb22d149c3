use http::Method;
use revroute::{
    build_router, parse_table, MatchStrategy, RequestInfo, RouterConfig, RoutingOutcome,
};


fn example_table() -> &'static str {
    r#"
home:
  pattern: /
  controllerAction: "Index:Index"

blog_show:
  pattern: /blog/<year>/<slug>
  controllerAction: "Blog:Show"
  constraints:
    year: "[0-9]{4}"

"Products:List": /products-list/<name>/<color>

form_submit:
  pattern: /form
  controllerAction: "Form:Submit"
  method: POST

files:
  pattern: /files/<path*>
  controllerAction: "Files:Get"

legacy_blog:
  pattern: /weblog/<year>/<slug>
  controllerAction: "Legacy:Blog"
  constraints:
    year: "[0-9]{4}"
  redirect: blog_show
"#
}

fn example_router() -> revroute::Router {
    tracing_util::init();
    let entries = parse_table(example_table()).expect("failed to parse route table");
    build_router(&entries, RouterConfig::default()).expect("failed to build router")
}

fn assert_dispatch(router: &revroute::Router, method: Method, path: &str, expected: &str) {
    let result = router.route(&RequestInfo::new(method.clone(), path));
    match result {
        RoutingOutcome::Dispatch(matched) => {
            let handler = format!("{}:{}", matched.controller, matched.action);
            assert_eq!(
                handler, expected,
                "handler mismatch for {} {}: expected '{}', got '{}'",
                method, path, expected, handler
            );
        }
        other => {
            assert_eq!(
                expected, "<none>",
                "expected dispatch for {} {}, got {:?}",
                method, path, other
            );
        }
    }
}

#[test]
fn test_blog_show_match() {
    let router = example_router();
    let outcome = router.route(&RequestInfo::get("/blog/2024/launch"));
    let RoutingOutcome::Dispatch(matched) = outcome else {
        panic!("expected dispatch");
    };
    assert_eq!(matched.controller, "Blog");
    assert_eq!(matched.action, "Show");
    assert_eq!(matched.params["year"], "2024");
    assert_eq!(matched.params["slug"], "launch");
    assert_eq!(matched.route_name.as_deref(), Some("blog_show"));
}

#[test]
fn test_blog_constraint_rejects() {
    let router = example_router();
    assert_dispatch(&router, Method::GET, "/blog/abcd/launch", "<none>");
}

#[test]
fn test_products_by_key_entry() {
    let router = example_router();
    assert_dispatch(&router, Method::GET, "/products-list/chair/red", "Products:List");
}

#[test]
fn test_method_restriction() {
    let router = example_router();
    assert_dispatch(&router, Method::POST, "/form", "Form:Submit");
    assert_dispatch(&router, Method::GET, "/form", "<none>");
}

#[test]
fn test_greedy_route_captures_remainder() {
    let router = example_router();
    let outcome = router.route(&RequestInfo::get("/files/docs/guide/intro.md"));
    let RoutingOutcome::Dispatch(matched) = outcome else {
        panic!("expected dispatch");
    };
    assert_eq!(matched.params["path"], "docs/guide/intro.md");
}

#[test]
fn test_homepage_route() {
    let router = example_router();
    let outcome = router.route(&RequestInfo::get("/"));
    let RoutingOutcome::Dispatch(matched) = outcome else {
        panic!("expected dispatch");
    };
    assert_eq!(matched.controller, "Index");
    assert_eq!(matched.strategy, MatchStrategy::Rewrite);
}

#[test]
fn test_redirect_route() {
    let router = example_router();
    let outcome = router.route(&RequestInfo::get("/weblog/2024/launch"));
    let RoutingOutcome::Redirect { location } = outcome else {
        panic!("expected redirect");
    };
    assert_eq!(location, "/blog/2024/launch");
}

#[test]
fn test_not_found() {
    let router = example_router();
    assert!(matches!(
        router.route(&RequestInfo::get("/no/such/route")),
        RoutingOutcome::NotFound
    ));
}

#[test]
fn test_round_trip_for_parameterized_route() {
    let router = example_router();
    let req = RequestInfo::get("/");

    let mut params = revroute::ParamMap::new();
    params.insert("year".to_string(), "1999".into());
    params.insert("slug".to_string(), "retrospective".into());
    let url = router.url("blog_show", &params, &req).expect("url");
    let outcome = router.route(&RequestInfo::get(url));
    let RoutingOutcome::Dispatch(matched) = outcome else {
        panic!("expected dispatch");
    };
    assert_eq!(matched.params["year"], "1999");
    assert_eq!(matched.params["slug"], "retrospective");
}

#[test]
fn test_base_path_mounted_application() {
    let router = example_router();
    let req = RequestInfo::get("/app/blog/2024/launch").with_base_path("/app");
    let RoutingOutcome::Dispatch(matched) = router.route(&req) else {
        panic!("expected dispatch");
    };
    assert_eq!(matched.controller, "Blog");

    let mut params = revroute::ParamMap::new();
    params.insert("year".to_string(), "2024".into());
    params.insert("slug".to_string(), "launch".into());
    let url = router.url("blog_show", &params, &req).expect("url");
    assert_eq!(url, "/app/blog/2024/launch");
}
