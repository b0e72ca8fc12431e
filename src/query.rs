//! Canonical query construction.
//!
//! `translate` maps a field schema, per-call request parameters, and
//! provider-level defaults to the wire-ready [`Query`] understood by
//! server-side table-processing endpoints: `start`/`length` pagination,
//! a global search, column-indexed ordering, and per-column search.
//!
//! Override precedence is replace-not-merge: a per-call
//! `sort_fields`/`search_fields` directive replaces the provider default
//! of the same kind wholesale. The two global-filter eligibility rules
//! (whitelist and blacklist) are mutually exclusive, whitelist dominant.

use crate::codec;
use crate::schema::{FieldDefinition, ProviderDefaults, SearchFields, SearchTerm, SortDirection, SortFields};
use crate::transport::CancelToken;
use serde::{Deserialize, Serialize};

/// Per-call request parameters, as supplied by the table component.
#[derive(Default)]
pub struct ItemsRequest {
    /// Endpoint the canonical query is sent to.
    pub api_url: String,
    /// 1-based page number.
    pub current_page: u32,
    /// Rows per page.
    pub per_page: i64,
    /// Global filter text; empty or absent means no global filter.
    pub filter: Option<String>,
    /// Single-column sort fallback, used only when no `sort_fields`
    /// directive is present anywhere. Always ascending; the request
    /// shape deliberately carries no direction for this path.
    pub sort_by: Option<String>,
    /// Per-call sort directive; replaces the provider default wholesale.
    pub sort_fields: Option<SortFields>,
    /// Per-call search directive; replaces the provider default wholesale.
    pub search_fields: Option<SearchFields>,
    /// Opaque cancellation token, threaded to the transport uninterpreted.
    pub cancel: Option<CancelToken>,
}

impl ItemsRequest {
    /// A request for the first page of `api_url` with default paging.
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            current_page: 1,
            per_page: 10,
            ..Default::default()
        }
    }
}

/// Global search entry of the wire query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalSearch {
    pub value: String,
    pub regex: bool,
}

/// One ordering entry, referencing a field by wire column index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderEntry {
    pub column: usize,
    pub dir: SortDirection,
}

/// Resolved search entry for one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSearch {
    pub value: String,
    pub regex: bool,
}

impl From<&SearchTerm> for ColumnSearch {
    fn from(term: &SearchTerm) -> Self {
        match term {
            SearchTerm::Literal(value) => Self {
                value: value.clone(),
                regex: false,
            },
            SearchTerm::Pattern { pattern } => Self {
                value: pattern.clone(),
                regex: true,
            },
            // The caller's flag wins, whatever the value looks like.
            SearchTerm::Explicit { value, regex } => Self {
                value: value.clone(),
                regex: *regex,
            },
        }
    }
}

/// Wire query entry for one column, in schema order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryColumn {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<ColumnSearch>,
}

/// The canonical, wire-ready query. Immutable once built.
///
/// `columns.len()` always equals the schema length, and `order` entries
/// reference only orderable fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    pub start: i64,
    pub length: i64,
    pub search: GlobalSearch,
    pub order: Vec<OrderEntry>,
    pub columns: Vec<QueryColumn>,
}

impl Query {
    /// Flattens the query into bracket-style GET parameters
    /// (`order[0][column]`, `columns[2][search][value]`, ...), the form
    /// server-side processing endpoints parse.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("start".to_string(), self.start.to_string()),
            ("length".to_string(), self.length.to_string()),
            ("search[value]".to_string(), self.search.value.clone()),
            ("search[regex]".to_string(), self.search.regex.to_string()),
        ];
        for (i, entry) in self.order.iter().enumerate() {
            pairs.push((format!("order[{i}][column]"), entry.column.to_string()));
            pairs.push((format!("order[{i}][dir]"), entry.dir.as_str().to_string()));
        }
        for (i, column) in self.columns.iter().enumerate() {
            if let Some(search) = &column.search {
                pairs.push((format!("columns[{i}][search][value]"), search.value.clone()));
                pairs.push((format!("columns[{i}][search][regex]"), search.regex.to_string()));
            }
        }
        pairs
    }
}

/// Global-filter eligibility under the resolved policy.
enum FilterPolicy<'a> {
    Whitelist(&'a [String]),
    Blacklist(&'a [String]),
    Open,
}

fn resolve_policy(defaults: &ProviderDefaults) -> FilterPolicy<'_> {
    // A non-empty whitelist wins regardless of blacklist contents.
    if !defaults.filter_included_fields.is_empty() {
        FilterPolicy::Whitelist(&defaults.filter_included_fields)
    } else if !defaults.filter_ignored_fields.is_empty() {
        FilterPolicy::Blacklist(&defaults.filter_ignored_fields)
    } else {
        FilterPolicy::Open
    }
}

impl FilterPolicy<'_> {
    fn allows(&self, key: &str) -> bool {
        match self {
            FilterPolicy::Whitelist(included) => included.iter().any(|k| k == key),
            FilterPolicy::Blacklist(ignored) => !ignored.iter().any(|k| k == key),
            FilterPolicy::Open => true,
        }
    }
}

/// Builds the canonical query for one retrieval.
///
/// `local_mode` selects the pagination sentinels for a provider serving
/// a fixed in-memory collection (`start = 0`, `length = -1`). `on_field`
/// is invoked once per schema field with its resolved column entry.
///
/// Request keys that name no schema field are silently ignored: schemas
/// are caller-controlled and request input is adversarial, so an unknown
/// key is never a hard failure.
pub fn translate(
    schema: &[FieldDefinition],
    request: &ItemsRequest,
    defaults: &ProviderDefaults,
    local_mode: bool,
    mut on_field: impl FnMut(&FieldDefinition, &QueryColumn),
) -> Query {
    let (start, length) = if local_mode {
        (0, -1)
    } else {
        (
            i64::from(request.current_page.saturating_sub(1)) * request.per_page,
            request.per_page,
        )
    };

    let filter = request.filter.as_deref().filter(|f| !f.is_empty());

    // Sort resolution. A per-call directive replaces the provider
    // default; only when neither exists does the single-column
    // `sort_by` fallback apply, always ascending.
    let effective_sort = request
        .sort_fields
        .as_ref()
        .or(defaults.sort_fields.as_ref());

    let mut order = Vec::new();
    if let Some(sort_fields) = effective_sort {
        for (index, field) in schema.iter().enumerate() {
            if field.key.is_empty() || !field.orderable {
                continue;
            }
            if let Some(dir) = sort_fields.get(&field.key) {
                order.push(OrderEntry { column: index, dir: *dir });
            }
        }
    } else if let Some(sort_by) = request.sort_by.as_deref() {
        if let Some(index) = schema
            .iter()
            .position(|f| !f.key.is_empty() && f.orderable && f.key == sort_by)
        {
            order.push(OrderEntry {
                column: index,
                dir: SortDirection::Asc,
            });
        }
    }

    let mut columns: Vec<QueryColumn> = vec![QueryColumn::default(); schema.len()];

    // Global filter application. Eligibility is policy-driven: a
    // whitelisted field gets the filter even when its own `searchable`
    // flag is false.
    let policy = resolve_policy(defaults);
    if let Some(filter) = filter {
        let encoded = codec::encode(filter);
        for (index, field) in schema.iter().enumerate() {
            if field.key.is_empty() {
                continue;
            }
            if policy.allows(&field.key) {
                columns[index].search = Some(ColumnSearch {
                    value: encoded.clone().into_owned(),
                    regex: false,
                });
            }
        }
    }

    // Per-field search resolution, overwriting the global-filter pass
    // for the same column. Unlike the global filter, an explicit entry
    // targeting a `searchable: false` field is dropped.
    let effective_search = request
        .search_fields
        .as_ref()
        .or(defaults.search_fields.as_ref());

    if let Some(search_fields) = effective_search {
        for (key, term) in search_fields {
            let Some((index, field)) = schema
                .iter()
                .enumerate()
                .find(|(_, f)| !f.key.is_empty() && f.key == *key)
            else {
                continue;
            };
            if !field.searchable {
                continue;
            }
            columns[index].search = Some(ColumnSearch::from(term));
        }
    }

    for (field, column) in schema.iter().zip(columns.iter()) {
        on_field(field, column);
    }

    Query {
        start,
        length,
        search: GlobalSearch {
            value: filter.map(|f| codec::encode(f).into_owned()).unwrap_or_default(),
            regex: false,
        },
        order,
        columns,
    }
}
