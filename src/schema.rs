//! Field schema and per-call directive types.
//!
//! A schema is an ordered `Vec<FieldDefinition>`; a field's position in
//! that vector is its wire column index. The index is never recomputed
//! by sorting or filtering key names.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Describes one table column and its capabilities.
///
/// `key == ""` is a valid placeholder: it occupies a column position but
/// never participates in sorting or searching.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDefinition {
    /// Row-object key this column reads from.
    pub key: String,
    /// Display label (unused by the provider itself).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Whether the column may appear in `order` entries.
    #[serde(default = "default_true")]
    pub orderable: bool,
    /// Whether explicit per-field search may target the column.
    #[serde(default = "default_true")]
    pub searchable: bool,
}

fn default_true() -> bool {
    true
}

impl FieldDefinition {
    /// A field that is both orderable and searchable.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: None,
            orderable: true,
            searchable: true,
        }
    }

    /// A placeholder column (empty key, holds a wire index only).
    pub fn placeholder() -> Self {
        Self::new("")
    }

    /// Sets the display label.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Marks the field as not orderable.
    pub fn not_orderable(mut self) -> Self {
        self.orderable = false;
        self
    }

    /// Marks the field as not searchable.
    pub fn not_searchable(mut self) -> Self {
        self.searchable = false;
        self
    }
}

/// Sort direction for one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// Wire representation (`"asc"` / `"desc"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Field key → direction. A per-call directive replaces the provider
/// default wholesale; the two are never merged key-by-key.
pub type SortFields = HashMap<String, SortDirection>;

/// A per-field search value.
///
/// Patterns are carried as source text plus an is-pattern flag only; no
/// compiled regex object crosses this boundary. `Explicit` honors the
/// caller's `regex` flag verbatim, whatever the value looks like.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SearchTerm {
    /// Literal text, matched verbatim (`regex: false` on the wire).
    Literal(String),
    /// An explicit value/regex pair, sent as given.
    Explicit {
        value: String,
        regex: bool,
    },
    /// Regex source text (`regex: true` on the wire).
    Pattern {
        pattern: String,
    },
}

impl SearchTerm {
    /// A literal search value.
    pub fn literal(value: impl Into<String>) -> Self {
        Self::Literal(value.into())
    }

    /// A regex search value, carrying source text only.
    pub fn pattern(source: impl Into<String>) -> Self {
        Self::Pattern {
            pattern: source.into(),
        }
    }

    /// An explicit value/regex pair.
    pub fn explicit(value: impl Into<String>, regex: bool) -> Self {
        Self::Explicit {
            value: value.into(),
            regex,
        }
    }
}

/// Field key → search term. Same replace-not-merge precedence between
/// provider default and per-call override as [`SortFields`].
pub type SearchFields = HashMap<String, SearchTerm>;

/// Provider-level defaults applied when a call supplies no override.
///
/// `filter_included_fields` (whitelist) and `filter_ignored_fields`
/// (blacklist) are mutually exclusive in effect: a non-empty whitelist
/// wins regardless of blacklist contents.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderDefaults {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_fields: Option<SortFields>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_fields: Option<SearchFields>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filter_ignored_fields: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filter_included_fields: Vec<String>,
}
