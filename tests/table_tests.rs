use revroute::{build_router, load_table, parse_table, RequestInfo, RouterConfig, RoutingOutcome};
use std::io::Write;

const YAML_TABLE: &str = r#"
home:
  pattern: /
  controllerAction: "Index:Index"

product_detail:
  pattern: /products/<id>
  controllerAction: "Products:Detail"
  constraints:
    id: "[0-9]+"
  defaults:
    tab: overview

"Search:Query": /search/<term>
"#;

const JSON_TABLE: &str = r#"{
  "home": {"pattern": "/", "controllerAction": "Index:Index"},
  "product_detail": {
    "pattern": "/products/<id>",
    "controllerAction": "Products:Detail",
    "constraints": {"id": "[0-9]+"}
  }
}"#;

fn write_temp(contents: &str, suffix: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("failed to create temp route table");
    file.write_all(contents.as_bytes())
        .expect("failed to write temp route table");
    file
}

#[test]
fn test_load_yaml_table_from_file() {
    let file = write_temp(YAML_TABLE, ".yaml");
    let entries = load_table(file.path()).expect("load");
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].0, "home");
    assert_eq!(entries[1].0, "product_detail");
    assert_eq!(entries[2].0, "Search:Query");
}

#[test]
fn test_load_json_table_from_file() {
    let file = write_temp(JSON_TABLE, ".json");
    let entries = load_table(file.path()).expect("load");
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].0, "home");
}

#[test]
fn test_load_missing_file_is_an_error() {
    let err = load_table("/nonexistent/routes.yaml").expect_err("expected error");
    assert!(err.to_string().contains("routes.yaml"), "{err:#}");
}

#[test]
fn test_loaded_table_routes_requests() {
    let file = write_temp(YAML_TABLE, ".yaml");
    let entries = load_table(file.path()).expect("load");
    let router = build_router(&entries, RouterConfig::default()).expect("build");

    let RoutingOutcome::Dispatch(matched) = router.route(&RequestInfo::get("/products/42")) else {
        panic!("expected dispatch");
    };
    assert_eq!(matched.controller, "Products");
    assert_eq!(matched.action, "Detail");
    assert_eq!(matched.params["id"], "42");
    assert_eq!(matched.params["tab"], "overview");

    assert!(matches!(
        router.route(&RequestInfo::get("/products/abc")),
        RoutingOutcome::NotFound
    ));
}

#[test]
fn test_duplicate_name_rejected_at_build() {
    let entries = parse_table(
        r#"
home:
  pattern: /
  controllerAction: "Index:Index"
"#,
    )
    .expect("parse");
    let doubled: Vec<_> = entries.iter().chain(entries.iter()).cloned().collect();
    assert!(build_router(&doubled, RouterConfig::default()).is_err());
}

#[test]
fn test_duplicate_name_allowed_with_overwrite() {
    let entries = parse_table(
        r#"
home:
  pattern: /
  controllerAction: "Index:Index"
"#,
    )
    .expect("parse");
    let doubled: Vec<_> = entries.iter().chain(entries.iter()).cloned().collect();
    let mut config = RouterConfig::default();
    config.allow_overwrite = true;
    let router = build_router(&doubled, config).expect("build");
    assert_eq!(router.registry().len(), 1);
}

#[test]
fn test_match_reverse_pair_entry() {
    let entries = parse_table(
        r#"
archive:
  match: "^/archive/(?P<year>[0-9]{4})$"
  reverse: "/archive/<year>"
  controllerAction: "Archive:Year"
"#,
    )
    .expect("parse");
    let router = build_router(&entries, RouterConfig::default()).expect("build");

    let RoutingOutcome::Dispatch(matched) = router.route(&RequestInfo::get("/archive/2019")) else {
        panic!("expected dispatch");
    };
    assert_eq!(matched.params["year"], "2019");

    let mut params = revroute::ParamMap::new();
    params.insert("year".to_string(), "2019".into());
    let url = router
        .url("archive", &params, &RequestInfo::get("/"))
        .expect("url");
    assert_eq!(url, "/archive/2019");
}
