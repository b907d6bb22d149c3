//! # Route
//!
//! A single pattern-to-handler binding: compiled match pattern, reverse
//! template, controller/action identifiers, defaults, constraints, optional
//! method restriction, parameter filters, and scheme/host metadata.
//!
//! Routes are immutable after construction. [`RouteBuilder::build`] compiles
//! the pattern and validates it, so every malformed route is rejected at
//! registration time; matching itself never fails with an error, it returns
//! an explicit no-match (`None`).
//!
//! ## Example
//!
//! ```
//! use revroute::route::Route;
//! use revroute::request::RequestInfo;
//!
//! let route = Route::builder("blog_show", "Blog:Show")
//!     .pattern("/blog/<year>/<slug>")
//!     .constraint("year", "[0-9]{4}")
//!     .build()
//!     .unwrap();
//!
//! let params = route.matches(&RequestInfo::get("/blog/2024/launch")).unwrap();
//! assert_eq!(params["year"], "2024");
//! assert!(route.matches(&RequestInfo::get("/blog/abcd/launch")).is_none());
//! ```

mod core;

pub use core::{ParamFilter, Route, RouteBuilder, UrlParts};
