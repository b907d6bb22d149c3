//! # revroute
//!
//! **revroute** is a pattern-compiling web request router: it matches request
//! paths against registered route patterns, extracts named parameters, and
//! performs the inverse operation of rebuilding a URL from a route identifier
//! and a parameter set.
//!
//! ## Overview
//!
//! Route patterns like `/products/<name>/<color>` are compiled once, at
//! registration time, into an anchored match regex with named capture groups
//! and a reverse template used for URL building. On top of that the router
//! layers per-parameter regex constraints, default values, greedy trailing
//! placeholders, input/output parameter filters, scheme/host targeting, and
//! trailing-slash / canonical-URL policy enforcement with redirect semantics.
//!
//! The crate owns no transport: it consumes an already-parsed
//! [`request::RequestInfo`] and produces a [`router::RoutingOutcome`]
//! (dispatch, redirect, or not-found) plus plain URL strings. HTTP serving,
//! controller dispatch, and error rendering belong to the host application.
//!
//! ## Architecture
//!
//! - **[`pattern`]** - compiles route patterns into match regexes and
//!   reverse templates
//! - **[`route`]** - the immutable route entity: matching and reverse URL
//!   building
//! - **[`registry`]** - ordered route collection indexed by name and
//!   `Controller:Action` key
//! - **[`router`]** - the routing state machine and URL building entry points
//! - **[`table`]** - route definitions as configuration (YAML/JSON tables)
//! - **[`request`]** - the normalized request record consumed by the router
//! - **[`config`]** - behavioral switches (slash policy, defaults, overwrite)
//!
//! ## Quick Start
//!
//! ```
//! use revroute::{RequestInfo, Route, Router, RouterConfig, RoutingOutcome};
//!
//! let mut router = Router::new(RouterConfig::default());
//! router
//!     .register(
//!         Route::builder("products_list", "Products:List")
//!             .pattern("/products-list/<name>/<color>")
//!             .build()
//!             .unwrap(),
//!     )
//!     .unwrap();
//!
//! // Request routing
//! let outcome = router.route(&RequestInfo::get("/products-list/chair/red"));
//! assert!(matches!(outcome, RoutingOutcome::Dispatch(_)));
//!
//! // Reverse URL building
//! let mut params = revroute::ParamMap::new();
//! params.insert("name".into(), "chair".into());
//! params.insert("color".into(), "red".into());
//! let url = router
//!     .url("Products:List", &params, &RequestInfo::get("/"))
//!     .unwrap();
//! assert_eq!(url, "/products-list/chair/red");
//! ```
//!
//! ## Concurrency
//!
//! Route registration is confined to single-threaded start-up; after that a
//! `Router` is read-only. Matching and URL building are pure, synchronous,
//! CPU-bound operations with no shared mutable state, so concurrent requests
//! need no locking.

pub mod config;
pub mod params;
pub mod pattern;
pub mod registry;
pub mod request;
pub mod route;
pub mod router;
pub mod table;

pub use config::{RouterConfig, SlashPolicy};
pub use params::{pascal_case, ParamMap};
pub use registry::RouteRegistry;
pub use request::RequestInfo;
pub use route::{ParamFilter, Route, RouteBuilder, UrlParts};
pub use router::{MatchStrategy, MatchedRoute, Router, RoutingOutcome};
pub use table::{build_router, load_table, parse_table, RouteDef};
