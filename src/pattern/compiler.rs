use anyhow::{bail, Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use smallvec::SmallVec;
use std::collections::HashMap;
use std::fmt::Write as _;

/// Maximum number of placeholders before the compiled list spills to the heap.
/// Real-world route patterns rarely carry more than a handful of parameters.
pub const MAX_INLINE_PLACEHOLDERS: usize = 8;

/// Stack-allocated placeholder storage for compiled patterns.
pub type PlaceholderVec = SmallVec<[Placeholder; MAX_INLINE_PLACEHOLDERS]>;

/// Constraint applied to a placeholder when none is registered: any
/// characters except `/`.
pub const DEFAULT_CONSTRAINT: &str = "[^/]*";

/// Constraint applied to a greedy placeholder: everything remaining,
/// including `/`.
const GREEDY_CONSTRAINT: &str = ".*";

static PLACEHOLDER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<([A-Za-z_][A-Za-z0-9_]*)(\*)?>").expect("placeholder scanner regex")
});

/// Scanner for `<name>` / `<name*>` placeholders, shared with the reverse
/// builder so both sides agree on the placeholder grammar.
pub(crate) fn placeholder_regex() -> &'static Regex {
    &PLACEHOLDER_RE
}

/// Scheme targeting derived from the pattern prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemeTarget {
    /// Plain path pattern; relative URLs are built.
    None,
    /// Pattern begins with `//`: any scheme matches, the request scheme is
    /// used when building.
    Any,
    /// Pattern pins `http://`.
    Http,
    /// Pattern pins `https://`.
    Https,
}

/// One `<name>` placeholder of a compiled pattern, in reverse-template order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    pub name: String,
    /// Greedy placeholders capture to end-of-path inclusive of `/`.
    pub greedy: bool,
    /// Placeholders after the `?` bind request parameters, not path segments.
    pub in_query: bool,
}

/// Compilation output cached on a route: the match regex, the reverse
/// template, and everything URL building needs to know about the pattern.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    /// Anchored regex with one named capture group per path placeholder.
    pub regex: Regex,
    /// Path part of the reverse template, placeholders kept literally
    /// (including a `%basePath%` prefix when the pattern carried one).
    pub reverse: String,
    /// Host part of the pattern for scheme-targeted routes, reserved
    /// `%host%`-family tokens kept literally.
    pub host_template: Option<String>,
    /// Query section of the pattern (`key=<name>` pairs), when present.
    pub query_template: Option<String>,
    /// All placeholders in the order they appear in the reverse template,
    /// path section first, then query section.
    pub placeholders: PlaceholderVec,
    /// Whether the final placeholder is greedy.
    pub last_greedy: bool,
    pub scheme: SchemeTarget,
}

impl CompiledPattern {
    #[must_use]
    pub fn has_query_section(&self) -> bool {
        self.query_template.is_some()
    }

    /// Patterns that target a scheme/host build absolute URLs.
    #[must_use]
    pub fn is_absolute(&self) -> bool {
        self.scheme != SchemeTarget::None
    }

    /// Placeholders matched against the request path.
    pub fn path_placeholders(&self) -> impl Iterator<Item = &Placeholder> {
        self.placeholders.iter().filter(|p| !p.in_query)
    }

    /// Placeholders bound from request parameters via the query section.
    pub fn query_placeholders(&self) -> impl Iterator<Item = &Placeholder> {
        self.placeholders.iter().filter(|p| p.in_query)
    }
}

/// Compile a route pattern into its match regex and reverse template.
///
/// `constraints` maps parameter names to regex fragments that replace the
/// default `[^/]*` constraint for that capture group.
///
/// Fails on malformed placeholders, duplicate placeholder names, a greedy
/// placeholder that is not last, or an invalid constraint fragment. All of
/// these are registration-time configuration errors.
pub fn compile(pattern: &str, constraints: &HashMap<String, String>) -> Result<CompiledPattern> {
    let (scheme, rest) = split_scheme(pattern);
    let (host_template, path_with_query) = if scheme == SchemeTarget::None {
        (None, rest)
    } else {
        match rest.find('/') {
            Some(idx) => (Some(rest[..idx].to_string()), &rest[idx..]),
            None => (Some(rest.to_string()), "/"),
        }
    };
    let (path_part, query_template) = match path_with_query.split_once('?') {
        Some((path, query)) => (path, Some(query.to_string())),
        None => (path_with_query, None),
    };

    // The mount point is stripped from request paths before matching, so the
    // %basePath% token only survives into the reverse template.
    let match_path = path_part.strip_prefix("%basePath%").unwrap_or(path_part);
    let match_path = if match_path.is_empty() { "/" } else { match_path };

    let mut regex_src = String::with_capacity(match_path.len() + 16);
    regex_src.push('^');
    let mut placeholders = PlaceholderVec::new();
    let mut cursor = 0usize;
    for caps in PLACEHOLDER_RE.captures_iter(match_path) {
        let Some(whole) = caps.get(0) else { continue };
        push_literal(&mut regex_src, &match_path[cursor..whole.start()], pattern)?;
        let name = caps[1].to_string();
        let greedy = caps.get(2).is_some();
        if placeholders.iter().any(|p| p.name == name) {
            bail!("duplicate placeholder <{name}> in pattern {pattern:?}");
        }
        let fragment = match constraints.get(&name) {
            Some(fragment) => fragment.as_str(),
            None if greedy => GREEDY_CONSTRAINT,
            None => DEFAULT_CONSTRAINT,
        };
        let _ = write!(regex_src, "(?P<{name}>{fragment})");
        placeholders.push(Placeholder {
            name,
            greedy,
            in_query: false,
        });
        cursor = whole.end();
    }
    push_literal(&mut regex_src, &match_path[cursor..], pattern)?;
    regex_src.push('$');
    let regex = Regex::new(&regex_src)
        .with_context(|| format!("invalid constraint regex in pattern {pattern:?}"))?;

    if let Some(query) = &query_template {
        scan_query_placeholders(query, pattern, &mut placeholders)?;
    }
    ensure_greedy_last(&placeholders, pattern)?;
    let last_greedy = placeholders.last().is_some_and(|p| p.greedy);

    Ok(CompiledPattern {
        regex,
        reverse: path_part.to_string(),
        host_template,
        query_template,
        placeholders,
        last_greedy,
        scheme,
    })
}

/// Build a [`CompiledPattern`] from an explicit match regex and reverse
/// template instead of a single pattern string.
///
/// The match regex is anchored if it is not already. Every placeholder of the
/// reverse template must correspond to a named capture group of the match
/// regex; capture groups without a placeholder are allowed (constraint-only
/// literal groups).
pub fn from_parts(match_src: &str, reverse: &str) -> Result<CompiledPattern> {
    let mut anchored = String::with_capacity(match_src.len() + 2);
    if !match_src.starts_with('^') {
        anchored.push('^');
    }
    anchored.push_str(match_src);
    if !match_src.ends_with('$') {
        anchored.push('$');
    }
    let regex =
        Regex::new(&anchored).with_context(|| format!("invalid match regex {match_src:?}"))?;

    let (scheme, rest) = split_scheme(reverse);
    let (host_template, path_with_query) = if scheme == SchemeTarget::None {
        (None, rest)
    } else {
        match rest.find('/') {
            Some(idx) => (Some(rest[..idx].to_string()), &rest[idx..]),
            None => (Some(rest.to_string()), "/"),
        }
    };
    let (path_part, query_template) = match path_with_query.split_once('?') {
        Some((path, query)) => (path, Some(query.to_string())),
        None => (path_with_query, None),
    };

    let mut placeholders = PlaceholderVec::new();
    for caps in PLACEHOLDER_RE.captures_iter(path_part) {
        let name = caps[1].to_string();
        if placeholders.iter().any(|p| p.name == name) {
            bail!("duplicate placeholder <{name}> in reverse template {reverse:?}");
        }
        placeholders.push(Placeholder {
            name,
            greedy: caps.get(2).is_some(),
            in_query: false,
        });
    }
    if let Some(query) = &query_template {
        scan_query_placeholders(query, reverse, &mut placeholders)?;
    }
    ensure_greedy_last(&placeholders, reverse)?;

    let capture_names: Vec<&str> = regex.capture_names().flatten().collect();
    for placeholder in placeholders.iter().filter(|p| !p.in_query) {
        if !capture_names.contains(&placeholder.name.as_str()) {
            bail!(
                "reverse template {reverse:?} names <{}> but the match regex has no such capture group",
                placeholder.name
            );
        }
    }
    let last_greedy = placeholders.last().is_some_and(|p| p.greedy);

    Ok(CompiledPattern {
        regex,
        reverse: path_part.to_string(),
        host_template,
        query_template,
        placeholders,
        last_greedy,
        scheme,
    })
}

fn split_scheme(pattern: &str) -> (SchemeTarget, &str) {
    if let Some(rest) = pattern.strip_prefix("https://") {
        (SchemeTarget::Https, rest)
    } else if let Some(rest) = pattern.strip_prefix("http://") {
        (SchemeTarget::Http, rest)
    } else if let Some(rest) = pattern.strip_prefix("//") {
        (SchemeTarget::Any, rest)
    } else {
        (SchemeTarget::None, pattern)
    }
}

/// Escape a literal chunk of the pattern into the regex source. A stray angle
/// bracket means an unbalanced placeholder.
fn push_literal(regex_src: &mut String, literal: &str, pattern: &str) -> Result<()> {
    if literal.contains('<') || literal.contains('>') {
        bail!("unbalanced placeholder in pattern {pattern:?}");
    }
    regex_src.push_str(&regex::escape(literal));
    Ok(())
}

fn scan_query_placeholders(
    query: &str,
    pattern: &str,
    placeholders: &mut PlaceholderVec,
) -> Result<()> {
    let stripped = PLACEHOLDER_RE.replace_all(query, "");
    if stripped.contains('<') || stripped.contains('>') {
        bail!("unbalanced placeholder in pattern {pattern:?}");
    }
    for caps in PLACEHOLDER_RE.captures_iter(query) {
        let name = caps[1].to_string();
        if placeholders.iter().any(|p| p.name == name) {
            bail!("duplicate placeholder <{name}> in pattern {pattern:?}");
        }
        placeholders.push(Placeholder {
            name,
            greedy: caps.get(2).is_some(),
            in_query: true,
        });
    }
    Ok(())
}

fn ensure_greedy_last(placeholders: &PlaceholderVec, pattern: &str) -> Result<()> {
    let count = placeholders.len();
    if placeholders
        .iter()
        .enumerate()
        .any(|(i, p)| p.greedy && i + 1 != count)
    {
        bail!("greedy placeholder must be the last placeholder in pattern {pattern:?}");
    }
    Ok(())
}
