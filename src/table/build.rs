use super::types::RouteDef;
use crate::config::RouterConfig;
use crate::route::Route;
use crate::router::Router;
use anyhow::{anyhow, Context, Result};
use http::Method;
use tracing::info;

/// Build one [`Route`] from a table definition. The entry key doubles as the
/// handler identifier when it is a `Controller:Action` string and the
/// definition names none.
pub fn build_route(name: &str, def: &RouteDef) -> Result<Route> {
    let handler = def
        .controller_action
        .clone()
        .or_else(|| match (&def.controller, &def.action) {
            (Some(controller), Some(action)) => Some(format!("{controller}:{action}")),
            _ => None,
        })
        .or_else(|| name.contains(':').then(|| name.to_string()))
        .ok_or_else(|| anyhow!("route {name:?} is missing a Controller:Action identifier"))?;

    let mut builder = Route::builder(name, handler);
    if let Some(pattern) = &def.pattern {
        builder = builder.pattern(pattern);
    }
    if let (Some(match_regex), Some(reverse)) = (&def.match_regex, &def.reverse) {
        builder = builder.match_reverse(match_regex, reverse);
    }
    for (key, value) in &def.defaults {
        builder = builder.default(key.clone(), value.clone());
    }
    for (key, fragment) in &def.constraints {
        builder = builder.constraint(key.clone(), fragment.clone());
    }
    if let Some(method) = &def.method {
        let method = Method::from_bytes(method.to_ascii_uppercase().as_bytes())
            .with_context(|| format!("route {name:?} has invalid method {method:?}"))?;
        builder = builder.method(method);
    }
    if let Some(absolute) = def.absolute {
        builder = builder.absolute(absolute);
    }
    if let Some(redirect) = &def.redirect {
        builder = builder.redirect(redirect);
    }
    if let Some(group) = &def.group {
        builder = builder.group(group);
    }
    builder.build()
}

/// Build all routes of a table, in table order.
pub fn build_routes(entries: &[(String, RouteDef)]) -> Result<Vec<Route>> {
    entries
        .iter()
        .map(|(name, def)| build_route(name, def))
        .collect()
}

/// Build a fully registered [`Router`] from a table. Any malformed
/// definition or duplicate registration aborts with a configuration error.
pub fn build_router(entries: &[(String, RouteDef)], config: RouterConfig) -> Result<Router> {
    let mut router = Router::new(config);
    for (name, def) in entries {
        router.register(build_route(name, def)?)?;
    }
    info!(routes_count = router.registry().len(), "Routing table loaded");
    Ok(router)
}
