//! Parameter map vocabulary shared by matching and URL building.
//!
//! Route parameters are string-keyed [`serde_json::Value`]s so that defaults
//! may carry scalars or lists (a greedy trailing placeholder can consume a
//! list when a URL is rebuilt). Captured path parameters are always strings.

use serde_json::Value;
use std::collections::HashMap;

/// Merged parameter map: route defaults, captured path parameters, and
/// query/body parameters, each level overriding the previous.
pub type ParamMap = HashMap<String, Value>;

/// Render a scalar parameter value as a URL component, without JSON quoting.
///
/// Lists are handled by the caller (joined in path context, repeated in query
/// context); objects have no URL form and render empty.
pub(crate) fn value_component(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Array(_) | Value::Object(_) => String::new(),
    }
}

/// Convert an identifier to PascalCase, treating `-` and `_` as word breaks.
///
/// Used by the query-string routing strategy: `?controller=user-profile`
/// resolves to the `UserProfile` controller.
#[must_use]
pub fn pascal_case(ident: &str) -> String {
    ident
        .split(['-', '_'])
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// Convert a controller/action identifier to its lowercase query-string form,
/// the inverse direction of [`pascal_case`] for URL fallback generation.
#[must_use]
pub fn query_ident(ident: &str) -> String {
    ident.to_lowercase()
}

/// Extract a parameter as a plain string if it is a scalar.
pub(crate) fn param_str(params: &HashMap<String, Value>, key: &str) -> Option<String> {
    params.get(key).map(value_component).filter(|s| !s.is_empty())
}
