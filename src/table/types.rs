use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

/// One entry of the keyed route collection: a bare pattern string, or a
/// structured definition record.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TableEntry {
    /// Bare pattern; the handler identifier comes from the entry key.
    Pattern(String),
    Def(RouteDef),
}

/// Structured route definition as it appears in a route table file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct RouteDef {
    /// Route pattern; mutually exclusive with `match`/`reverse`.
    pub pattern: Option<String>,
    /// Direct match regex, paired with `reverse`.
    #[serde(rename = "match")]
    pub match_regex: Option<String>,
    /// Reverse template for the direct form.
    pub reverse: Option<String>,
    /// `Controller:Action` handler identifier.
    pub controller_action: Option<String>,
    pub controller: Option<String>,
    pub action: Option<String>,
    /// Default parameter values (scalars or lists).
    pub defaults: HashMap<String, Value>,
    /// Per-parameter constraint regex fragments.
    pub constraints: HashMap<String, String>,
    /// Allowed HTTP method, uppercase.
    pub method: Option<String>,
    pub absolute: Option<bool>,
    /// Redirect to the named route instead of dispatching.
    pub redirect: Option<String>,
    /// Registry partition keyed by the first path segment.
    pub group: Option<String>,
}
