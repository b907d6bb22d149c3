//! # Route Table
//!
//! Route definitions consumed as configuration: a keyed collection where
//! keys are route names or `Controller:Action` strings and values are either
//! a bare pattern string or a structured record (`pattern`/`match`+`reverse`,
//! `controllerAction` or `controller`+`action`, `defaults`, `constraints`,
//! `method`, `absolute`, `redirect`, `group`).
//!
//! Tables load from YAML or JSON files in document order, since matching
//! order is registration order. Parameter filters cannot be expressed in a
//! file; attach them programmatically via [`crate::route::RouteBuilder`].
//!
//! ```yaml
//! blog_show:
//!   pattern: /blog/<year>/<slug>
//!   controllerAction: "Blog:Show"
//!   constraints:
//!     year: "[0-9]{4}"
//! "Products:List": /products-list/<name>/<color>
//! ```
//!
//! Every malformed definition is a fatal configuration error at load time.

mod build;
mod load;
mod types;

pub use build::{build_route, build_router, build_routes};
pub use load::{load_table, parse_table};
pub use types::{RouteDef, TableEntry};
