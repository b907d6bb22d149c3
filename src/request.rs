//! Request-side view consumed by the router.
//!
//! The transport layer (HTTP server, test harness) owns parsing; the router
//! only ever sees this already-normalized record: path without query string,
//! raw query string, method, host, scheme, and the parameter map merged from
//! query-string and body sources.

use crate::params::ParamMap;
use http::Method;

/// Normalized request data handed to [`crate::router::Router::route`].
#[derive(Debug, Clone)]
pub struct RequestInfo {
    /// HTTP method of the request.
    pub method: Method,
    /// Request path, percent-decoded, without the query string (e.g. `/blog/2024/launch`).
    pub path: String,
    /// Raw query string without the leading `?` (may be empty).
    pub query: String,
    /// Request host (e.g. `www.example.com`).
    pub host: String,
    /// Request scheme, `http` or `https`.
    pub scheme: String,
    /// Prefix under which the application is mounted (`""` or `/app`).
    pub base_path: String,
    /// Front-controller script component for query-string fallback URLs (usually empty).
    pub script_name: String,
    /// Parameters already merged from query-string and body sources by the transport layer.
    pub params: ParamMap,
}

impl RequestInfo {
    /// Create a request for the given method and path with empty host/query context.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: String::new(),
            host: String::new(),
            scheme: "http".to_string(),
            base_path: String::new(),
            script_name: String::new(),
            params: ParamMap::new(),
        }
    }

    /// Shorthand for a GET request, the common case in tests.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = base_path.into();
        self
    }

    pub fn with_script_name(mut self, script_name: impl Into<String>) -> Self {
        self.script_name = script_name.into();
        self
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Request path relative to the application mount point.
    ///
    /// Routes are compiled against application-relative paths; the base path
    /// prefix is stripped once here rather than encoded into every pattern.
    /// Stripping only applies on a segment boundary, so `/apple/x` is not a
    /// match for the `/app` mount point.
    #[must_use]
    pub fn relative_path(&self) -> &str {
        if self.base_path.is_empty() {
            return &self.path;
        }
        match self.path.strip_prefix(self.base_path.as_str()) {
            Some("") => "/",
            Some(rest) if rest.starts_with('/') => rest,
            _ => &self.path,
        }
    }

    /// First segment of the relative path, used for registry group pre-filtering.
    #[must_use]
    pub fn first_segment(&self) -> &str {
        self.relative_path()
            .trim_start_matches('/')
            .split('/')
            .next()
            .unwrap_or("")
    }

    /// Break the host into its reserved-placeholder components.
    ///
    /// For `www.example.com`: host = `www.example.com`, domain = `example.com`,
    /// sld = `example`, tld = `com`. Single-label hosts map all components to
    /// the label itself.
    #[must_use]
    pub fn host_parts(&self) -> HostParts {
        let labels: Vec<&str> = self.host.split('.').filter(|l| !l.is_empty()).collect();
        match labels.as_slice() {
            [] => HostParts::default(),
            [only] => HostParts {
                host: (*only).to_string(),
                domain: (*only).to_string(),
                sld: (*only).to_string(),
                tld: (*only).to_string(),
            },
            [.., sld, tld] => HostParts {
                host: self.host.clone(),
                domain: format!("{sld}.{tld}"),
                sld: (*sld).to_string(),
                tld: (*tld).to_string(),
            },
        }
    }

    /// Path plus query string as originally requested, relative to the mount point.
    #[must_use]
    pub fn relative_url(&self) -> String {
        if self.query.is_empty() {
            self.relative_path().to_string()
        } else {
            format!("{}?{}", self.relative_path(), self.query)
        }
    }
}

/// Host components backing the `%host%`, `%domain%`, `%sld%` and `%tld%`
/// reserved placeholders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostParts {
    pub host: String,
    pub domain: String,
    pub sld: String,
    pub tld: String,
}
