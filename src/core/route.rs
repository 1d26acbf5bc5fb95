//! Route patterns: `/wallets/:id(*page)` style matching over location paths
//!
//! Syntax:
//!
//! | Token | Matches |
//! |-------|---------|
//! | `:name` | one non-empty path segment, captured as `name` |
//! | `*name` | any remainder, captured as `name` when non-empty |
//! | `*` | any remainder, not captured |
//! | `( … )` | optional group |
//! | anything else | itself |
//!
//! Patterns are anchored at both ends. A single trailing `/` on the path is
//! tolerated, and any `?query` or `#fragment` is ignored.

use regex::Regex;
use std::sync::Arc;

use crate::error::{StoreError, StoreResult};

/// Compiled route pattern with cached regex
#[derive(Debug, Clone)]
pub struct RoutePattern {
    pattern: String,
    regex: Arc<Regex>,
    params: Vec<String>,
}

/// Parameters captured by a successful match, in pattern order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteParams(Vec<(String, String)>);

impl RouteParams {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize { self.0.len() }
    pub fn is_empty(&self) -> bool { self.0.is_empty() }
}

impl RoutePattern {
    pub fn parse(pattern: &str) -> StoreResult<Self> {
        let (source, params) = translate(pattern);
        let regex = Regex::new(&source).map_err(|source| StoreError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self { pattern: pattern.to_string(), regex: Arc::new(regex), params })
    }

    pub fn as_str(&self) -> &str { &self.pattern }

    pub fn is_match(&self, path: &str) -> bool { self.regex.is_match(strip_suffix(path)) }

    pub fn matches(&self, path: &str) -> Option<RouteParams> {
        let caps = self.regex.captures(strip_suffix(path))?;
        Some(RouteParams(
            self.params
                .iter()
                .filter_map(|name| {
                    let m = caps.name(name).filter(|m| !m.as_str().is_empty())?;
                    Some((name.clone(), m.as_str().to_string()))
                })
                .collect(),
        ))
    }
}

/// `<base>/<id>/<screen>`
pub fn wallet_route(base: &str, wallet_id: &str, screen: &str) -> String {
    format!("{}/{}/{}", base.trim_end_matches('/'), wallet_id, screen)
}

fn strip_suffix(path: &str) -> &str {
    match path.find(['?', '#']) {
        Some(i) => &path[..i],
        None => path,
    }
}

fn translate(pattern: &str) -> (String, Vec<String>) {
    let mut out = String::from("^");
    let mut params = Vec::new();
    let mut chars = pattern.chars().peekable();
    let mut literal = String::new();

    let flush = |lit: &mut String, out: &mut String| {
        if !lit.is_empty() {
            out.push_str(&regex::escape(lit));
            lit.clear();
        }
    };

    while let Some(c) = chars.next() {
        match c {
            ':' | '*' => {
                let mut name = String::new();
                while let Some(&n) = chars.peek() {
                    if n.is_ascii_alphanumeric() || n == '_' { name.push(n); chars.next(); } else { break; }
                }
                flush(&mut literal, &mut out);
                let body = if c == ':' { "[^/]+" } else { ".*" };
                if name.is_empty() {
                    if c == ':' { literal.push(':'); } else { out.push_str(body); }
                } else {
                    out.push_str(&format!("(?P<{}>{})", name, body));
                    params.push(name);
                }
            }
            '(' => { flush(&mut literal, &mut out); out.push_str("(?:"); }
            ')' => { flush(&mut literal, &mut out); out.push_str(")?"); }
            _ => literal.push(c),
        }
    }
    flush(&mut literal, &mut out);
    if !out.ends_with('/') { out.push_str("/?"); }
    out.push('$');
    (out, params)
}
