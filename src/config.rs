//! Router configuration.
//!
//! All knobs that change routing behavior live here so a host application can
//! deserialize them from its own config file alongside the route table. Every
//! field has a default; `RouterConfig::default()` gives the conventional
//! setup (benevolent trailing slashes, duplicate registration is an error,
//! unmatched requests are not routed to the default controller).

use serde::Deserialize;

/// Trailing-slash policy applied before any route matching takes place.
///
/// A request whose path violates the policy is answered with a redirect to
/// the normalized form; matching never proceeds on a non-canonical path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SlashPolicy {
    /// Paths must end with a trailing slash; one is appended when missing.
    Always,
    /// Both forms are accepted as-is, no redirect.
    Benevolent,
    /// Trailing slashes are stripped, except for the homepage `/`.
    Remove,
}

/// Behavioral switches for a [`crate::router::Router`] instance.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RouterConfig {
    /// Trailing-slash policy (default: benevolent).
    pub slash_policy: SlashPolicy,
    /// Controller used when an unmatched request falls back to the default route.
    pub default_controller: String,
    /// Action used when an unmatched request falls back to the default route.
    pub default_action: String,
    /// Route any unmatched request to the default route instead of reporting
    /// not-found. The homepage `/` always falls back regardless of this switch.
    pub route_to_default: bool,
    /// Ignore explicit `controller`/`action` request parameters and always
    /// run pattern matching.
    pub force_rewrite: bool,
    /// After a successful match, rebuild the canonical URL and redirect when
    /// the request used a longer, non-canonical form.
    pub enforce_canonical: bool,
    /// Allow a route registration to silently replace an existing route with
    /// the same name or `Controller:Action` key.
    pub allow_overwrite: bool,
    /// Separator used when leftover parameters are appended as a query string.
    pub query_separator: String,
    /// Controller of the reserved internal asset convention.
    pub asset_controller: String,
    /// Action of the reserved internal asset convention.
    pub asset_action: String,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            slash_policy: SlashPolicy::Benevolent,
            default_controller: "Index".to_string(),
            default_action: "Index".to_string(),
            route_to_default: false,
            force_rewrite: false,
            enforce_canonical: false,
            allow_overwrite: false,
            query_separator: "&".to_string(),
            asset_controller: "Assets".to_string(),
            asset_action: "Serve".to_string(),
        }
    }
}
