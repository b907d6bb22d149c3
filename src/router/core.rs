//! Router core - hot path for request routing and URL building.

use crate::config::{RouterConfig, SlashPolicy};
use crate::params::{param_str, pascal_case, query_ident, value_component, ParamMap};
use crate::registry::RouteRegistry;
use crate::request::RequestInfo;
use crate::route::Route;
use anyhow::Result;
use serde_json::Value;
use std::time::Instant;
use tracing::{debug, info, warn};
use urlencoding::encode;

/// Which state-machine branch produced a dispatch result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStrategy {
    /// Reserved asset convention, served without consulting the registry.
    Internal,
    /// Explicit `controller`/`action` request parameters.
    QueryString,
    /// Pattern matching against the registry.
    Rewrite,
    /// Unmatched request routed to the configured default route.
    Default,
}

/// A routed request, ready for external dispatch.
#[derive(Debug, Clone)]
pub struct MatchedRoute {
    pub controller: String,
    pub action: String,
    /// Merged parameters: route defaults, then captured path parameters,
    /// then query/body parameters, each level overriding the previous.
    pub params: ParamMap,
    /// Name of the matched registry route, when the rewrite strategy fired.
    pub route_name: Option<String>,
    pub strategy: MatchStrategy,
}

/// Terminal state of the routing state machine.
#[derive(Debug, Clone)]
pub enum RoutingOutcome {
    /// A route was selected; hand over to controller dispatch.
    Dispatch(MatchedRoute),
    /// The HTTP layer must answer with a redirect before any dispatch.
    Redirect { location: String },
    /// No route applies. Handled by the external error collaborator; this is
    /// an expected terminal state, not an error.
    NotFound,
}

/// Router instance owning its registry and configuration.
///
/// Registration is confined to start-up; after that the router is read-only
/// and `route`/`url` calls for different requests are fully independent.
#[derive(Debug, Clone)]
pub struct Router {
    registry: RouteRegistry,
    config: RouterConfig,
}

impl Default for Router {
    fn default() -> Self {
        Self::new(RouterConfig::default())
    }
}

impl Router {
    #[must_use]
    pub fn new(config: RouterConfig) -> Self {
        Self {
            registry: RouteRegistry::with_overwrite(config.allow_overwrite),
            config,
        }
    }

    /// Wrap an already-populated registry.
    #[must_use]
    pub fn with_registry(registry: RouteRegistry, config: RouterConfig) -> Self {
        Self { registry, config }
    }

    /// Register a route at the end of the matching order.
    pub fn register(&mut self, route: Route) -> Result<()> {
        self.registry.add(route)
    }

    /// Register a route ahead of all existing routes.
    pub fn register_prepend(&mut self, route: Route) -> Result<()> {
        self.registry.prepend(route)
    }

    #[must_use]
    pub fn registry(&self) -> &RouteRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut RouteRegistry {
        &mut self.registry
    }

    #[must_use]
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Route a request to its terminal state.
    #[must_use]
    pub fn route(&self, req: &RequestInfo) -> RoutingOutcome {
        debug!(method = %req.method, path = %req.path, "Route match attempt");
        let match_start = Instant::now();

        if let Some(outcome) = self.asset_route(req) {
            return outcome;
        }
        if let Some(redirect) = self.slash_redirect(req) {
            return redirect;
        }

        if !self.config.force_rewrite {
            if let (Some(controller), Some(action)) = (
                param_str(&req.params, "controller"),
                param_str(&req.params, "action"),
            ) {
                let mut params = req.params.clone();
                params.remove("controller");
                params.remove("action");
                let matched = MatchedRoute {
                    controller: pascal_case(&controller),
                    action: pascal_case(&action),
                    params,
                    route_name: None,
                    strategy: MatchStrategy::QueryString,
                };
                info!(
                    controller = %matched.controller,
                    action = %matched.action,
                    strategy = "query_string",
                    "Route matched"
                );
                return RoutingOutcome::Dispatch(matched);
            }
        }

        let first_segment = req.first_segment();
        for route in self.registry.candidates(first_segment) {
            let Some(mut params) = route.matches(req) else {
                continue;
            };

            if let Some(target) = route.redirect_target() {
                return self.redirect_to(route.name(), target, &params, req);
            }

            let controller = take_str(&mut params, "controller")
                .unwrap_or_else(|| route.controller().to_string());
            let action =
                take_str(&mut params, "action").unwrap_or_else(|| route.action().to_string());
            // Query/body parameters are the highest-precedence merge level.
            for (key, value) in &req.params {
                if key != "controller" && key != "action" {
                    params.insert(key.clone(), value.clone());
                }
            }

            if self.config.enforce_canonical {
                if let Some(redirect) = self.canonical_redirect(route, &params, req) {
                    return redirect;
                }
            }

            let match_duration = match_start.elapsed();
            if match_duration > std::time::Duration::from_millis(1) {
                warn!(
                    method = %req.method,
                    path = %req.path,
                    route = %route.name(),
                    duration_us = match_duration.as_micros(),
                    "Slow route matching detected"
                );
            } else {
                info!(
                    method = %req.method,
                    path = %req.path,
                    route = %route.name(),
                    controller = %controller,
                    action = %action,
                    duration_us = match_duration.as_micros(),
                    strategy = "rewrite",
                    "Route matched"
                );
            }
            return RoutingOutcome::Dispatch(MatchedRoute {
                controller,
                action,
                params,
                route_name: Some(route.name().to_string()),
                strategy: MatchStrategy::Rewrite,
            });
        }

        if req.relative_path() == "/" || self.config.route_to_default {
            info!(
                controller = %self.config.default_controller,
                action = %self.config.default_action,
                strategy = "default",
                "Unmatched request routed to default route"
            );
            return RoutingOutcome::Dispatch(MatchedRoute {
                controller: self.config.default_controller.clone(),
                action: self.config.default_action.clone(),
                params: ParamMap::new(),
                route_name: None,
                strategy: MatchStrategy::Default,
            });
        }

        warn!(
            method = %req.method,
            path = %req.path,
            duration_us = match_start.elapsed().as_micros(),
            "No route matched"
        );
        RoutingOutcome::NotFound
    }

    /// Build a URL for a route name or `Controller:Action` target.
    ///
    /// Unresolvable targets fall back to the query-string URL form and never
    /// fail; only an `out` filter error on a resolved route propagates.
    pub fn url(&self, target: &str, params: &ParamMap, req: &RequestInfo) -> Result<String> {
        if let Some(route) = self.registry.resolve(target) {
            let parts = route.build_url(params, req, &self.config.query_separator)?;
            return Ok(parts.into_string());
        }

        let (controller, action) = match target.split_once(':') {
            Some((controller, action)) => (query_ident(controller), query_ident(action)),
            None => (query_ident(target), query_ident(&self.config.default_action)),
        };
        let mut pairs = vec![
            format!("controller={}", encode(&controller)),
            format!("action={}", encode(&action)),
        ];
        let mut extras: Vec<(&String, &Value)> = params.iter().collect();
        extras.sort_by(|a, b| a.0.cmp(b.0));
        for (key, value) in extras {
            match value {
                Value::Array(items) => {
                    for item in items {
                        pairs.push(format!("{}={}", encode(key), encode(&value_component(item))));
                    }
                }
                value => {
                    pairs.push(format!("{}={}", encode(key), encode(&value_component(value))));
                }
            }
        }
        Ok(format!(
            "{}{}?{}",
            req.base_path,
            req.script_name,
            pairs.join(&self.config.query_separator)
        ))
    }

    /// Reserved asset convention: serve embedded/static assets without
    /// scanning the registry.
    fn asset_route(&self, req: &RequestInfo) -> Option<RoutingOutcome> {
        let controller = param_str(&req.params, "controller")?;
        let action = param_str(&req.params, "action")?;
        if pascal_case(&controller) != self.config.asset_controller
            || pascal_case(&action) != self.config.asset_action
        {
            return None;
        }
        let mut params = req.params.clone();
        params.remove("controller");
        params.remove("action");
        debug!(path = %req.path, "Internal asset request short-circuited");
        Some(RoutingOutcome::Dispatch(MatchedRoute {
            controller: self.config.asset_controller.clone(),
            action: self.config.asset_action.clone(),
            params,
            route_name: None,
            strategy: MatchStrategy::Internal,
        }))
    }

    /// Trailing-slash policy enforcement. Returns the redirect outcome when
    /// the request path is not in its canonical trailing-slash form.
    fn slash_redirect(&self, req: &RequestInfo) -> Option<RoutingOutcome> {
        let path = req.relative_path();
        let normalized = match self.config.slash_policy {
            SlashPolicy::Benevolent => return None,
            SlashPolicy::Always => {
                if path.ends_with('/') {
                    return None;
                }
                format!("{path}/")
            }
            SlashPolicy::Remove => {
                if path == "/" || !path.ends_with('/') {
                    return None;
                }
                let stripped = path.trim_end_matches('/');
                if stripped.is_empty() {
                    "/".to_string()
                } else {
                    stripped.to_string()
                }
            }
        };
        let location = if req.query.is_empty() {
            format!("{}{}", req.base_path, normalized)
        } else {
            format!("{}{}?{}", req.base_path, normalized, req.query)
        };
        info!(from = %req.path, to = %location, "Trailing-slash redirect");
        Some(RoutingOutcome::Redirect { location })
    }

    /// Resolve a route-level redirect declaration through the target route's
    /// reverse template.
    fn redirect_to(
        &self,
        from_route: &str,
        target: &str,
        params: &ParamMap,
        req: &RequestInfo,
    ) -> RoutingOutcome {
        let Some(target_route) = self.registry.resolve(target) else {
            warn!(route = %from_route, target = %target, "Redirect target route not registered");
            return RoutingOutcome::NotFound;
        };
        let mut params = params.clone();
        params.remove("controller");
        params.remove("action");
        match target_route.build_url(&params, req, &self.config.query_separator) {
            Ok(parts) => {
                let location = parts.into_string();
                info!(route = %from_route, target = %target, location = %location, "Route redirect");
                RoutingOutcome::Redirect { location }
            }
            Err(err) => {
                warn!(route = %from_route, target = %target, error = %err, "Redirect URL build failed");
                RoutingOutcome::NotFound
            }
        }
    }

    /// Canonical-URL post-check: redirect when the canonical form of the
    /// matched route is strictly shorter than the requested URL. Equal-length
    /// differences keep the request's own path.
    fn canonical_redirect(
        &self,
        route: &Route,
        params: &ParamMap,
        req: &RequestInfo,
    ) -> Option<RoutingOutcome> {
        let parts = match route.build_url(params, req, &self.config.query_separator) {
            Ok(parts) => parts,
            Err(err) => {
                warn!(route = %route.name(), error = %err, "Canonical URL rebuild failed");
                return None;
            }
        };
        let canonical = parts.path_and_query;
        let requested = if req.query.is_empty() {
            req.path.clone()
        } else {
            format!("{}?{}", req.path, req.query)
        };
        if canonical != requested && canonical.len() < requested.len() {
            info!(from = %requested, to = %canonical, "Canonical URL redirect");
            return Some(RoutingOutcome::Redirect {
                location: canonical,
            });
        }
        None
    }
}

fn take_str(params: &mut ParamMap, key: &str) -> Option<String> {
    let value = params.remove(key)?;
    let rendered = value_component(&value);
    if rendered.is_empty() {
        None
    } else {
        Some(rendered)
    }
}
