//! Filename matching for local feed queries
//!
//! A query is first interpreted as a case-insensitive glob. When the glob
//! matches nothing, entries whose lowercased name contains the lowercased
//! query are returned instead.

use glob::{MatchOptions, Pattern};
use tracing::debug;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: false,
    require_literal_separator: false,
    require_literal_leading_dot: true,
};

/// Matches directory entry names against a search query
pub struct FilenameMatcher {
    query: String,
    patterns: Vec<Pattern>,
}

impl FilenameMatcher {
    pub fn new(query: &str) -> Self {
        let patterns = expand_braces(query)
            .iter()
            .filter_map(|alternative| {
                Pattern::new(alternative)
                    .inspect_err(|e| debug!("Query {:?} is not a valid glob: {}", query, e))
                    .ok()
            })
            .collect();

        Self {
            query: query.to_string(),
            patterns,
        }
    }

    /// Whether `name` matches the query as a glob
    pub fn glob_matches(&self, name: &str) -> bool {
        self.patterns
            .iter()
            .any(|pattern| pattern.matches_with(name, MATCH_OPTIONS))
    }

    /// Whether `name` contains the query, ignoring case
    pub fn contains_query(&self, name: &str) -> bool {
        name.to_lowercase().contains(&self.query.to_lowercase())
    }

    /// Returns the glob matches, or the substring matches if the glob matched nothing
    pub fn filter<'a>(&self, entries: &'a [String]) -> Vec<&'a str> {
        let globbed: Vec<&str> = entries
            .iter()
            .map(String::as_str)
            .filter(|name| self.glob_matches(name))
            .collect();

        if !globbed.is_empty() {
            return globbed;
        }

        entries
            .iter()
            .map(String::as_str)
            .filter(|name| self.contains_query(name))
            .collect()
    }
}

/// Upper bound on the patterns a single query may expand to
const MAX_EXPANSIONS: usize = 1024;

/// Expands `{a,b}` alternations into separate patterns.
///
/// Groups may nest. A group without a top-level comma, or an unclosed
/// brace, is kept literally. A query expanding to more than
/// `MAX_EXPANSIONS` patterns is kept literally as a whole.
fn expand_braces(pattern: &str) -> Vec<String> {
    let mut expanded = Vec::new();
    if expand_into(pattern, &mut expanded) {
        expanded
    } else {
        debug!(
            "Query {:?} expands to more than {} patterns, matching it literally",
            pattern, MAX_EXPANSIONS
        );
        vec![pattern.to_string()]
    }
}

/// Appends the expansions of `pattern` to `out`, returning false once the limit is exceeded
fn expand_into(pattern: &str, out: &mut Vec<String>) -> bool {
    let Some((start, end, alternatives)) = find_brace_group(pattern) else {
        if out.len() >= MAX_EXPANSIONS {
            return false;
        }
        out.push(pattern.to_string());
        return true;
    };

    let prefix = &pattern[..start];
    let suffix = &pattern[end + 1..];

    alternatives
        .into_iter()
        .all(|alternative| expand_into(&format!("{prefix}{alternative}{suffix}"), out))
}

/// Finds the first expandable brace group, returning its byte range and alternatives
fn find_brace_group(pattern: &str) -> Option<(usize, usize, Vec<&str>)> {
    let bytes = pattern.as_bytes();

    for (start, _) in pattern.match_indices('{') {
        let mut depth = 0usize;
        let mut commas = Vec::new();

        for (offset, &byte) in bytes[start..].iter().enumerate() {
            let index = start + offset;
            match byte {
                b'{' => depth += 1,
                b'}' => {
                    depth -= 1;
                    if depth == 0 {
                        if commas.is_empty() {
                            break;
                        }
                        let mut alternatives = Vec::with_capacity(commas.len() + 1);
                        let mut from = start + 1;
                        for comma in commas {
                            alternatives.push(&pattern[from..comma]);
                            from = comma + 1;
                        }
                        alternatives.push(&pattern[from..index]);
                        return Some((start, index, alternatives));
                    }
                }
                b',' if depth == 1 => commas.push(index),
                _ => {}
            }
        }
    }

    None
}
