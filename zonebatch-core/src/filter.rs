//! Record filter expression language
//!
//! A filter string is a whitespace- or `&`-separated list of clauses, each of
//! the form `field op value`:
//!
//! ```text
//! type=A,AAAA name=*.staging.example.com content~10.0 proxied=false ttl=300
//! ```
//!
//! All clauses must match (AND). `type` takes a comma-separated OR-list;
//! `name` is a glob (`*` and `?`); `content` and `comment` are substring
//! matches; `proxied` and `ttl` are exact. A literal `and` token between
//! clauses is accepted and ignored.
//!
//! Parsing is deliberately permissive: malformed clauses and unrecognized
//! fields are dropped without error, and an empty input matches every record.

use regex::{Regex, RegexBuilder};
use zonebatch_provider::DnsRecord;

/// A parsed filter over DNS record fields.
///
/// Unset dimensions are vacuously true; the default value matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFilter {
    /// OR-set of upper-cased record types.
    pub types: Option<Vec<String>>,
    /// Glob pattern matched against the full record name.
    pub name: Option<String>,
    /// Substring matched against the record content (case-sensitive).
    pub content: Option<String>,
    /// Exact proxied flag.
    pub proxied: Option<bool>,
    /// Exact TTL in seconds.
    pub ttl: Option<u32>,
    /// Substring matched against the record comment.
    pub comment: Option<String>,
}

impl RecordFilter {
    /// Parse a filter string.
    ///
    /// Never fails: clauses that don't parse are skipped, fields that aren't
    /// recognized are ignored, and blank input yields the empty filter.
    #[must_use]
    pub fn parse(input: &str) -> Self {
        let mut filter = Self::default();

        for clause in input.split(|c: char| c.is_whitespace() || c == '&') {
            if clause.is_empty() || clause.eq_ignore_ascii_case("and") {
                continue;
            }
            let Some((field, _op, value)) = split_clause(clause) else {
                continue;
            };

            match field.to_ascii_lowercase().as_str() {
                "type" => {
                    filter.types = Some(
                        value
                            .split(',')
                            .map(|t| t.trim().to_uppercase())
                            .collect(),
                    );
                }
                "name" => filter.name = Some(value.to_string()),
                "content" => filter.content = Some(value.to_string()),
                "proxied" => filter.proxied = Some(value.eq_ignore_ascii_case("true")),
                // unparseable ttl deliberately becomes 0, not an error
                "ttl" => filter.ttl = Some(value.parse().unwrap_or(0)),
                "comment" => filter.comment = Some(value.to_string()),
                _ => {}
            }
        }

        filter
    }

    /// True when no dimension is set (matches every record).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_none()
            && self.name.is_none()
            && self.content.is_none()
            && self.proxied.is_none()
            && self.ttl.is_none()
            && self.comment.is_none()
    }

    /// Evaluate the filter against a record: conjunction of every set
    /// dimension.
    #[must_use]
    pub fn matches(&self, record: &DnsRecord) -> bool {
        if let Some(types) = &self.types {
            if !types.iter().any(|t| t == record.record_type.as_str()) {
                return false;
            }
        }
        if let Some(pattern) = &self.name {
            if !glob_match(&record.name, pattern) {
                return false;
            }
        }
        if let Some(content) = &self.content {
            if !record.content.contains(content.as_str()) {
                return false;
            }
        }
        if let Some(proxied) = self.proxied {
            if record.proxied.unwrap_or(false) != proxied {
                return false;
            }
        }
        if let Some(ttl) = self.ttl {
            if record.ttl != ttl {
                return false;
            }
        }
        if let Some(comment) = &self.comment {
            // a record without a comment never matches a comment clause
            match &record.comment {
                Some(c) if c.contains(comment.as_str()) => {}
                _ => return false,
            }
        }
        true
    }
}

/// Split one clause into `(field, operator, value)`.
///
/// Operators `=`, `!=`, `~`, `!~` are all accepted syntactically; evaluation
/// only implements the per-field `=` semantics, so the negating forms behave
/// like their positive counterparts.
fn split_clause(clause: &str) -> Option<(&str, &str, &str)> {
    let re = Regex::new(r"^([A-Za-z]+)(!?[=~])(.+)$").ok()?;
    let caps = re.captures(clause)?;
    Some((
        caps.get(1)?.as_str(),
        caps.get(2)?.as_str(),
        caps.get(3)?.as_str(),
    ))
}

/// Glob match: `*` is any run of characters, `?` any single character, all
/// other characters literal. Anchored at both ends, case-insensitive.
///
/// The pattern is translated literally, so `*.example.com` does NOT match the
/// apex `example.com` — there is no leading-dot optionality.
#[must_use]
pub fn glob_match(value: &str, pattern: &str) -> bool {
    let mut source = String::with_capacity(pattern.len() + 2);
    source.push('^');
    let mut buf = [0u8; 4];
    for ch in pattern.chars() {
        match ch {
            '*' => source.push_str(".*"),
            '?' => source.push('.'),
            _ => source.push_str(&regex::escape(ch.encode_utf8(&mut buf))),
        }
    }
    source.push('$');

    RegexBuilder::new(&source)
        .case_insensitive(true)
        .build()
        .is_ok_and(|re| re.is_match(value))
}
