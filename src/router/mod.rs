//! # Router Module
//!
//! Orchestrates request routing and URL building over a [`RouteRegistry`].
//!
//! ## Request routing
//!
//! [`Router::route`] runs a small state machine for each request:
//!
//! 1. **Internal asset short-circuit** — requests already carrying the
//!    reserved asset controller/action convention dispatch without scanning
//!    the registry.
//! 2. **Trailing-slash pre-check** — the configured [`SlashPolicy`] is
//!    enforced before any matching; a non-canonical path is answered with a
//!    redirect, never matched.
//! 3. **Strategy selection** — explicit `controller`/`action` request
//!    parameters select the query-string strategy (no pattern scanning);
//!    otherwise registry routes are tried in registration order, optionally
//!    pre-filtered by the group keyed on the first path segment, and the
//!    first match wins.
//! 4. **Fallbacks** — the homepage and (optionally) any unmatched request
//!    fall back to the configured default route; everything else is reported
//!    as [`RoutingOutcome::NotFound`], a valid terminal state rather than an
//!    error.
//! 5. **Redirect rules** — a matched route may declare a redirect target
//!    route, and the optional canonical-URL post-check redirects requests
//!    that used a longer, non-canonical form of a matched URL.
//!
//! ## URL building
//!
//! [`Router::url`] resolves a route by name or `Controller:Action` key and
//! fills its reverse template; when no route resolves it falls back to a
//! `?controller=...&action=...` query-string URL so best-effort link
//! generation never fails.
//!
//! ## Example
//!
//! ```
//! use revroute::config::RouterConfig;
//! use revroute::request::RequestInfo;
//! use revroute::route::Route;
//! use revroute::router::{Router, RoutingOutcome};
//!
//! let mut router = Router::new(RouterConfig::default());
//! router
//!     .register(
//!         Route::builder("blog_show", "Blog:Show")
//!             .pattern("/blog/<year>/<slug>")
//!             .constraint("year", "[0-9]{4}")
//!             .build()
//!             .unwrap(),
//!     )
//!     .unwrap();
//!
//! match router.route(&RequestInfo::get("/blog/2024/launch")) {
//!     RoutingOutcome::Dispatch(matched) => {
//!         assert_eq!(matched.controller, "Blog");
//!         assert_eq!(matched.params["year"], "2024");
//!     }
//!     other => panic!("unexpected outcome: {other:?}"),
//! }
//! ```
//!
//! [`RouteRegistry`]: crate::registry::RouteRegistry
//! [`SlashPolicy`]: crate::config::SlashPolicy

mod core;

pub use core::{MatchStrategy, MatchedRoute, Router, RoutingOutcome};
