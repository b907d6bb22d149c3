//! # Pattern Compiler
//!
//! Compiles human-readable route patterns into the pair of artifacts every
//! route needs: an anchored match regex with named capture groups, and a
//! reverse template used to rebuild URLs from parameter sets.
//!
//! ## Pattern syntax
//!
//! - `<name>` — standard placeholder, matches any characters except `/`
//!   (override per parameter with a constraint regex fragment).
//! - `<name*>` — greedy placeholder, matches everything remaining including
//!   `/`; only valid as the last placeholder of a pattern.
//! - `//`, `http://`, `https://` prefixes target the scheme; the host part
//!   may carry the reserved `%host%`, `%domain%`, `%sld%`, `%tld%` tokens.
//! - `%basePath%` as a path prefix is substituted with the application mount
//!   point when a URL is rebuilt.
//! - A `?` introduces a query section whose placeholders bind request
//!   parameters instead of path segments.
//!
//! Literal parts are regex-escaped automatically; authors never write regex
//! border characters. Compilation happens once, at route registration, and
//! every malformed pattern is rejected there rather than at request time.
//!
//! ## Example
//!
//! ```
//! use revroute::pattern::compile;
//! use std::collections::HashMap;
//!
//! let compiled = compile("/blog/<year>/<slug>", &HashMap::new()).unwrap();
//! let caps = compiled.regex.captures("/blog/2024/launch").unwrap();
//! assert_eq!(&caps["year"], "2024");
//! assert_eq!(&caps["slug"], "launch");
//! ```

mod compiler;

pub use compiler::{
    compile, from_parts, CompiledPattern, Placeholder, PlaceholderVec, SchemeTarget,
    DEFAULT_CONSTRAINT, MAX_INLINE_PLACEHOLDERS,
};
pub(crate) use compiler::placeholder_regex;
