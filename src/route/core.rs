use crate::params::{param_str, pascal_case, value_component, ParamMap};
use crate::pattern::{self, CompiledPattern, SchemeTarget};
use crate::request::{HostParts, RequestInfo};
use anyhow::{bail, Result};
use http::Method;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::warn;
use urlencoding::encode;

/// Parameter transform hook invoked with (current params, route defaults,
/// request). `in` filters run after a successful pattern match; `out` filters
/// run before reverse building. Both return a replacement map.
pub type ParamFilter =
    Arc<dyn Fn(&ParamMap, &ParamMap, &RequestInfo) -> Result<ParamMap> + Send + Sync>;

/// A compiled pattern-to-handler binding. Construct via [`Route::builder`].
#[derive(Clone)]
pub struct Route {
    name: String,
    controller: String,
    action: String,
    compiled: CompiledPattern,
    defaults: ParamMap,
    method: Option<Method>,
    filter_in: Option<ParamFilter>,
    filter_out: Option<ParamFilter>,
    absolute: bool,
    redirect: Option<String>,
    group: Option<String>,
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("name", &self.name)
            .field("controller", &self.controller)
            .field("action", &self.action)
            .field("reverse", &self.compiled.reverse)
            .field("method", &self.method)
            .field("absolute", &self.absolute)
            .field("group", &self.group)
            .finish_non_exhaustive()
    }
}

/// Scheme + host part and path + query part of a built URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlParts {
    /// `scheme://host` for absolute routes, empty otherwise.
    pub domain: String,
    /// Base path, filled path and appended query string.
    pub path_and_query: String,
}

impl UrlParts {
    #[must_use]
    pub fn into_string(self) -> String {
        format!("{}{}", self.domain, self.path_and_query)
    }
}

impl fmt::Display for UrlParts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.domain, self.path_and_query)
    }
}

impl Route {
    /// Start building a route. `controller_action` is the `Controller:Action`
    /// handler identifier.
    pub fn builder(name: impl Into<String>, controller_action: impl Into<String>) -> RouteBuilder {
        RouteBuilder {
            name: name.into(),
            controller_action: controller_action.into(),
            pattern: None,
            match_regex: None,
            reverse: None,
            defaults: ParamMap::new(),
            constraints: HashMap::new(),
            method: None,
            filter_in: None,
            filter_out: None,
            absolute: None,
            redirect: None,
            group: None,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn controller(&self) -> &str {
        &self.controller
    }

    #[must_use]
    pub fn action(&self) -> &str {
        &self.action
    }

    /// `Controller:Action` registry key.
    #[must_use]
    pub fn key(&self) -> String {
        format!("{}:{}", self.controller, self.action)
    }

    #[must_use]
    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    /// Name of the route this one redirects to instead of dispatching.
    #[must_use]
    pub fn redirect_target(&self) -> Option<&str> {
        self.redirect.as_deref()
    }

    #[must_use]
    pub fn method(&self) -> Option<&Method> {
        self.method.as_ref()
    }

    #[must_use]
    pub fn defaults(&self) -> &ParamMap {
        &self.defaults
    }

    #[must_use]
    pub fn compiled(&self) -> &CompiledPattern {
        &self.compiled
    }

    #[must_use]
    pub fn is_absolute(&self) -> bool {
        self.absolute
    }

    /// Match this route against a request.
    ///
    /// Returns the merged parameter map (defaults overlaid with captured path
    /// parameters and query-section bindings, passed through the `in` filter)
    /// including the resolved `controller` and `action` entries, or `None`
    /// when the route does not apply. A pinned scheme or a host template that
    /// disagrees with the request rejects before the regex runs, as does a
    /// method restriction. An `in` filter error rejects the route for this
    /// request only.
    #[must_use]
    pub fn matches(&self, req: &RequestInfo) -> Option<ParamMap> {
        if let Some(method) = &self.method {
            if *method != req.method {
                return None;
            }
        }
        match self.compiled.scheme {
            SchemeTarget::Http if req.scheme != "http" => return None,
            SchemeTarget::Https if req.scheme != "https" => return None,
            _ => {}
        }
        if let Some(template) = &self.compiled.host_template {
            if substitute_host(template, &req.host_parts()) != req.host {
                return None;
            }
        }
        let caps = self.compiled.regex.captures(req.relative_path())?;

        let mut params = self.defaults.clone();
        for placeholder in self.compiled.path_placeholders() {
            if let Some(m) = caps.name(&placeholder.name) {
                if !m.as_str().is_empty() {
                    params.insert(
                        placeholder.name.clone(),
                        Value::String(m.as_str().to_string()),
                    );
                }
            }
        }
        if let Some(query) = &self.compiled.query_template {
            for (key, spec) in query_pairs(query) {
                if let Some(name) = placeholder_name(spec) {
                    if let Some(value) = req.params.get(key) {
                        params.insert(name.to_string(), value.clone());
                    }
                }
            }
        }

        if let Some(filter) = &self.filter_in {
            match filter(&params, &self.defaults, req) {
                Ok(replaced) => params = replaced,
                Err(err) => {
                    warn!(
                        route = %self.name,
                        error = %err,
                        "in-filter rejected route during matching"
                    );
                    return None;
                }
            }
        }

        // Captured controller/action placeholders win over the static identifiers.
        let controller = param_str(&params, "controller")
            .map(|c| pascal_case(&c))
            .unwrap_or_else(|| self.controller.clone());
        let action = param_str(&params, "action")
            .map(|a| pascal_case(&a))
            .unwrap_or_else(|| self.action.clone());
        params.insert("controller".to_string(), Value::String(controller));
        params.insert("action".to_string(), Value::String(action));
        Some(params)
    }

    /// Build a URL from this route's reverse template.
    ///
    /// `params` are merged over the route defaults, passed through the `out`
    /// filter, substituted into the reverse template (URL-escaped), and any
    /// leftovers are appended as a query string using `separator`. A value
    /// missing from both `params` and the defaults is substituted as the
    /// empty string; the incomplete URL is still returned.
    ///
    /// Only an `out` filter error makes this fail.
    pub fn build_url(
        &self,
        params: &ParamMap,
        req: &RequestInfo,
        separator: &str,
    ) -> Result<UrlParts> {
        let mut merged = self.defaults.clone();
        for (key, value) in params {
            merged.insert(key.clone(), value.clone());
        }
        if let Some(filter) = &self.filter_out {
            merged = filter(&merged, &self.defaults, req)?;
        }

        let absolute_requested = merged.remove("absolute").is_some_and(|v| is_truthy(&v));
        let absolute = self.absolute || absolute_requested;
        let host_override = if absolute { merged.remove("host") } else { None };
        let scheme_override = if absolute { merged.remove("scheme") } else { None };

        let reverse = &self.compiled.reverse;
        let scanner = pattern::placeholder_regex();
        let mut path = String::with_capacity(reverse.len() + 16);
        let mut cursor = 0usize;
        for caps in scanner.captures_iter(reverse) {
            let Some(whole) = caps.get(0) else { continue };
            push_reverse_literal(&mut path, &reverse[cursor..whole.start()], req);
            let name = &caps[1];
            let greedy = caps.get(2).is_some();
            match merged.remove(name) {
                Some(Value::Array(items)) if greedy => {
                    let joined: Vec<String> = items
                        .iter()
                        .map(|item| encode(&value_component(item)).into_owned())
                        .collect();
                    path.push_str(&joined.join("/"));
                }
                Some(value) if greedy => path.push_str(&encode_greedy(&value_component(&value))),
                Some(value) => path.push_str(&encode(&value_component(&value))),
                None => {}
            }
            cursor = whole.end();
        }
        push_reverse_literal(&mut path, &reverse[cursor..], req);
        if !reverse.starts_with("%basePath%") {
            path = format!("{}{}", req.base_path, path);
        }

        // The handler identifiers are routing metadata, not URL parameters;
        // drop them unless the pattern itself consumed them as placeholders.
        merged.remove("controller");
        merged.remove("action");

        let mut query_parts: Vec<String> = Vec::new();
        if let Some(query) = &self.compiled.query_template {
            for (key, spec) in query_pairs(query) {
                match placeholder_name(spec) {
                    Some(name) => match merged.remove(name) {
                        Some(Value::Array(items)) => {
                            for item in &items {
                                query_parts
                                    .push(format!("{key}={}", encode(&value_component(item))));
                            }
                        }
                        Some(value) => {
                            query_parts.push(format!("{key}={}", encode(&value_component(&value))));
                        }
                        None => {}
                    },
                    None => query_parts.push(format!("{key}={spec}")),
                }
            }
        }
        let mut leftovers: Vec<(String, Value)> = merged.into_iter().collect();
        leftovers.sort_by(|a, b| a.0.cmp(&b.0));
        for (key, value) in leftovers {
            match value {
                Value::Array(items) => {
                    for item in &items {
                        query_parts
                            .push(format!("{}={}", encode(&key), encode(&value_component(item))));
                    }
                }
                value => {
                    query_parts.push(format!("{}={}", encode(&key), encode(&value_component(&value))));
                }
            }
        }
        let path_and_query = if query_parts.is_empty() {
            path
        } else {
            format!("{path}?{}", query_parts.join(separator))
        };

        let domain = if absolute {
            let scheme = match (&scheme_override, self.compiled.scheme) {
                (Some(value), _) => value_component(value),
                (None, SchemeTarget::Http) => "http".to_string(),
                (None, SchemeTarget::Https) => "https".to_string(),
                (None, _) => req.scheme.clone(),
            };
            let parts = req.host_parts();
            let host = match (&host_override, &self.compiled.host_template) {
                (Some(value), _) => value_component(value),
                (None, Some(template)) => substitute_host(template, &parts),
                (None, None) => parts.host,
            };
            format!("{scheme}://{host}")
        } else {
            String::new()
        };

        Ok(UrlParts {
            domain,
            path_and_query,
        })
    }
}

/// Literal chunks of the reverse template, with the `%basePath%` token
/// resolved against the current request.
fn push_reverse_literal(out: &mut String, literal: &str, req: &RequestInfo) {
    if literal.contains("%basePath%") {
        out.push_str(&literal.replace("%basePath%", &req.base_path));
    } else {
        out.push_str(literal);
    }
}

/// Greedy values keep their `/` separators; each segment is escaped on its own.
fn encode_greedy(value: &str) -> String {
    value
        .split('/')
        .map(|segment| encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

fn substitute_host(template: &str, parts: &HostParts) -> String {
    template
        .replace("%host%", &parts.host)
        .replace("%domain%", &parts.domain)
        .replace("%sld%", &parts.sld)
        .replace("%tld%", &parts.tld)
}

fn query_pairs(template: &str) -> impl Iterator<Item = (&str, &str)> {
    template.split('&').filter_map(|pair| pair.split_once('='))
}

fn placeholder_name(spec: &str) -> Option<&str> {
    spec.strip_prefix('<')
        .and_then(|s| s.strip_suffix('>'))
        .map(|s| s.trim_end_matches('*'))
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty() && s != "0" && s != "false",
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        _ => false,
    }
}

/// Builder for [`Route`]. Compilation and validation happen in [`build`],
/// so every configuration error surfaces at registration time.
///
/// [`build`]: RouteBuilder::build
pub struct RouteBuilder {
    name: String,
    controller_action: String,
    pattern: Option<String>,
    match_regex: Option<String>,
    reverse: Option<String>,
    defaults: ParamMap,
    constraints: HashMap<String, String>,
    method: Option<Method>,
    filter_in: Option<ParamFilter>,
    filter_out: Option<ParamFilter>,
    absolute: Option<bool>,
    redirect: Option<String>,
    group: Option<String>,
}

impl RouteBuilder {
    /// Route pattern, e.g. `/products/<name>/<color>`.
    #[must_use]
    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    /// Direct match-regex/reverse-template pair instead of a pattern.
    #[must_use]
    pub fn match_reverse(
        mut self,
        match_regex: impl Into<String>,
        reverse: impl Into<String>,
    ) -> Self {
        self.match_regex = Some(match_regex.into());
        self.reverse = Some(reverse.into());
        self
    }

    /// Default value for one parameter.
    #[must_use]
    pub fn default(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.defaults.insert(name.into(), value.into());
        self
    }

    /// Replace the whole defaults map.
    #[must_use]
    pub fn defaults(mut self, defaults: ParamMap) -> Self {
        self.defaults = defaults;
        self
    }

    /// Constraint regex fragment for one parameter.
    #[must_use]
    pub fn constraint(mut self, name: impl Into<String>, fragment: impl Into<String>) -> Self {
        self.constraints.insert(name.into(), fragment.into());
        self
    }

    /// Restrict the route to one HTTP method.
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    /// Input transform applied to matched parameters.
    #[must_use]
    pub fn filter_in<F>(mut self, filter: F) -> Self
    where
        F: Fn(&ParamMap, &ParamMap, &RequestInfo) -> Result<ParamMap> + Send + Sync + 'static,
    {
        self.filter_in = Some(Arc::new(filter));
        self
    }

    /// Output transform applied before reverse building.
    #[must_use]
    pub fn filter_out<F>(mut self, filter: F) -> Self
    where
        F: Fn(&ParamMap, &ParamMap, &RequestInfo) -> Result<ParamMap> + Send + Sync + 'static,
    {
        self.filter_out = Some(Arc::new(filter));
        self
    }

    /// Force absolute URL building even without a scheme-targeted pattern.
    #[must_use]
    pub fn absolute(mut self, absolute: bool) -> Self {
        self.absolute = Some(absolute);
        self
    }

    /// Redirect to the named route instead of dispatching.
    #[must_use]
    pub fn redirect(mut self, target: impl Into<String>) -> Self {
        self.redirect = Some(target.into());
        self
    }

    /// Registry partition keyed by the first path segment.
    #[must_use]
    pub fn group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Compile and validate the route.
    pub fn build(self) -> Result<Route> {
        let (controller, action) = match self.controller_action.split_once(':') {
            Some((controller, action)) if !controller.is_empty() && !action.is_empty() => {
                (controller.to_string(), action.to_string())
            }
            _ => bail!(
                "route {:?} has malformed handler identifier {:?}, expected Controller:Action",
                self.name,
                self.controller_action
            ),
        };

        let compiled = match (&self.pattern, &self.match_regex, &self.reverse) {
            (Some(p), None, None) => pattern::compile(p, &self.constraints)?,
            (None, Some(m), Some(r)) => pattern::from_parts(m, r)?,
            (Some(_), Some(_), _) | (Some(_), _, Some(_)) => bail!(
                "route {:?} sets both a pattern and a match/reverse pair",
                self.name
            ),
            _ => bail!(
                "route {:?} needs either a pattern or a match/reverse pair",
                self.name
            ),
        };
        let absolute = self.absolute.unwrap_or(false) || compiled.is_absolute();

        Ok(Route {
            name: self.name,
            controller,
            action,
            compiled,
            defaults: self.defaults,
            method: self.method,
            filter_in: self.filter_in,
            filter_out: self.filter_out,
            absolute,
            redirect: self.redirect,
            group: self.group,
        })
    }
}
