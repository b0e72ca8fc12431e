//! Retrieval orchestration.
//!
//! [`ItemsProvider`] owns the provider state (local items, total-row
//! count, current query), the lifecycle hook table, and the injected
//! transport. It drives query translation and the outbound fetch, and
//! contains transport failures: no error ever propagates out of the
//! public operations, callers observe failures only through the
//! `on_response_error` hook.

use crate::error::TransportError;
use crate::query::{self, ItemsRequest, Query, QueryColumn};
use crate::schema::{FieldDefinition, ProviderDefaults, SearchFields, SortFields};
use crate::transport::{FetchResponse, Item, Transport};
use std::sync::Arc;
use tracing::{debug, warn};

/// Invoked with the raw request before translation begins.
pub type BeforeQueryHook = Box<dyn Fn(&ItemsRequest) + Send + Sync>;
/// Invoked once per schema field with its resolved column entry.
pub type FieldTranslateHook = Box<dyn Fn(&FieldDefinition, &QueryColumn) + Send + Sync>;
/// Invoked with the parsed response after a successful fetch.
pub type ResponseCompleteHook = Box<dyn Fn(&FetchResponse) + Send + Sync>;
/// Invoked with the raw failure when a fetch is contained.
pub type ResponseErrorHook = Box<dyn Fn(&TransportError) + Send + Sync>;

/// Typed event-handler table, settable at any time. All hooks are
/// fire-and-forget and invoked synchronously.
#[derive(Default)]
pub struct Hooks {
    pub on_before_query: Option<BeforeQueryHook>,
    pub on_field_translate: Option<FieldTranslateHook>,
    pub on_response_complete: Option<ResponseCompleteHook>,
    pub on_response_error: Option<ResponseErrorHook>,
}

/// Mutable provider state.
///
/// `local_items`, `total_rows` and `per_page` change only through
/// [`ItemsProvider::set_local_items`] or a completed retrieval; `query`
/// changes only through a translation pass.
#[derive(Debug, Clone, Default)]
pub struct ProviderState {
    /// In-memory collection served instead of remote retrieval.
    pub local_items: Option<Vec<Item>>,
    /// Total row count, from `set_local_items` or the last response.
    pub total_rows: u64,
    /// Rows per page; `-1` means "unbounded/local".
    pub per_page: i64,
    /// Canonical query built by the most recent translation pass.
    pub query: Option<Query>,
}

/// Construction-time configuration.
#[derive(Default)]
pub struct ProviderConfig {
    /// Transport collaborator; `None` makes every remote retrieval a
    /// contained `NotConfigured` failure.
    pub transport: Option<Arc<dyn Transport>>,
    /// Ordered field schema; position defines the wire column index.
    pub fields: Vec<FieldDefinition>,
    /// Provider-level default sort directive.
    pub sort_fields: Option<SortFields>,
    /// Provider-level default search directive.
    pub search_fields: Option<SearchFields>,
    /// Global-filter blacklist.
    pub filter_ignored_fields: Vec<String>,
    /// Global-filter whitelist; non-empty beats the blacklist.
    pub filter_included_fields: Vec<String>,
}

/// Supplies rows to a paginated/sortable/filterable table, from an
/// in-memory collection or a server-side processing endpoint.
pub struct ItemsProvider {
    transport: Option<Arc<dyn Transport>>,
    fields: Vec<FieldDefinition>,
    defaults: ProviderDefaults,
    state: ProviderState,
    hooks: Hooks,
}

impl ItemsProvider {
    /// Creates a provider from its configuration.
    pub fn new(config: ProviderConfig) -> Self {
        Self {
            transport: config.transport,
            fields: config.fields,
            defaults: ProviderDefaults {
                sort_fields: config.sort_fields,
                search_fields: config.search_fields,
                filter_ignored_fields: config.filter_ignored_fields,
                filter_included_fields: config.filter_included_fields,
            },
            state: ProviderState::default(),
            hooks: Hooks::default(),
        }
    }

    /// Stable provider identifier, used when several providers must be
    /// distinguished by a surrounding aggregator.
    pub fn name(&self) -> &'static str {
        "ItemsProvider"
    }

    /// The field schema, in wire column order.
    pub fn fields(&self) -> &[FieldDefinition] {
        &self.fields
    }

    /// Current provider state.
    pub fn state(&self) -> &ProviderState {
        &self.state
    }

    /// Total row count after the last retrieval or `set_local_items`.
    pub fn total_rows(&self) -> u64 {
        self.state.total_rows
    }

    /// Sets the hook invoked before each translation pass.
    pub fn on_before_query(&mut self, hook: impl Fn(&ItemsRequest) + Send + Sync + 'static) {
        self.hooks.on_before_query = Some(Box::new(hook));
    }

    /// Sets the per-field translation progress hook.
    pub fn on_field_translate(
        &mut self,
        hook: impl Fn(&FieldDefinition, &QueryColumn) + Send + Sync + 'static,
    ) {
        self.hooks.on_field_translate = Some(Box::new(hook));
    }

    /// Sets the hook invoked after a successful fetch.
    pub fn on_response_complete(&mut self, hook: impl Fn(&FetchResponse) + Send + Sync + 'static) {
        self.hooks.on_response_complete = Some(Box::new(hook));
    }

    /// Sets the hook invoked with each contained fetch failure.
    pub fn on_response_error(&mut self, hook: impl Fn(&TransportError) + Send + Sync + 'static) {
        self.hooks.on_response_error = Some(Box::new(hook));
    }

    /// Switches the provider into or out of local-items mode.
    ///
    /// Stores `items` verbatim, sets `total_rows` to its length (`0`
    /// for `None`) and `per_page` to the `-1` sentinel. Idempotent;
    /// last write wins.
    pub fn set_local_items(&mut self, items: Option<Vec<Item>>) {
        self.state.total_rows = items.as_ref().map_or(0, |i| i.len() as u64);
        self.state.per_page = -1;
        self.state.local_items = items;
    }

    /// Returns the stored local collection verbatim.
    ///
    /// `inspect`, when supplied, is invoked once with the collection
    /// before returning. It is an inspection hook, not a per-item
    /// transform.
    pub fn get_local_items(&self, inspect: Option<&dyn Fn(Option<&[Item]>)>) -> Option<&[Item]> {
        let items = self.state.local_items.as_deref();
        if let Some(inspect) = inspect {
            inspect(items);
        }
        items
    }

    /// Performs one retrieval with the current canonical query.
    ///
    /// The canonical query is whatever the most recent translation
    /// pass stored; [`items`](Self::items) runs that pass before
    /// delegating here. Calling this directly without a prior `items`
    /// call sends an all-default query (`start = 0`, `length = 0`, no
    /// order, no search).
    ///
    /// In local-items mode the stored collection is returned
    /// immediately and `request` is ignored. Otherwise a single GET is
    /// issued through the transport; on success `total_rows` is updated
    /// and `on_response_complete` fires, on failure `on_response_error`
    /// fires exactly once and an empty sequence is returned. Never
    /// returns an error to the caller.
    pub async fn execute_query(&mut self, request: &ItemsRequest) -> Vec<Item> {
        if let Some(items) = &self.state.local_items {
            debug!(count = items.len(), "serving local items");
            return items.clone();
        }

        let query = self.state.query.clone().unwrap_or_default();
        let result = match &self.transport {
            Some(transport) => {
                transport
                    .get(&request.api_url, &query, request.cancel.as_ref())
                    .await
            }
            None => Err(TransportError::NotConfigured),
        };

        match result {
            Ok(response) => {
                self.state.total_rows = response.records_total;
                debug!(total = response.records_total, "retrieval complete");
                if let Some(hook) = &self.hooks.on_response_complete {
                    hook(&response);
                }
                response.data.unwrap_or_default()
            }
            Err(err) => {
                warn!(url = %request.api_url, error = %err, "retrieval failed, returning empty result");
                if let Some(hook) = &self.hooks.on_response_error {
                    hook(&err);
                }
                Vec::new()
            }
        }
    }

    /// Translates `request` against the schema and provider defaults,
    /// stores the result as the current query, and retrieves rows.
    ///
    /// Overlapping calls on the same provider race on `state.query` and
    /// `total_rows`: a slower earlier call can overwrite them after a
    /// faster later call completes. No ordering guarantee is made;
    /// callers needing one must sequence their own calls.
    pub async fn items(&mut self, request: &ItemsRequest) -> Vec<Item> {
        if let Some(hook) = &self.hooks.on_before_query {
            hook(request);
        }

        let local_mode = self.state.local_items.is_some();
        let hooks = &self.hooks;
        let query = query::translate(
            &self.fields,
            request,
            &self.defaults,
            local_mode,
            |field, column| {
                if let Some(hook) = &hooks.on_field_translate {
                    hook(field, column);
                }
            },
        );
        debug!(
            start = query.start,
            length = query.length,
            order = query.order.len(),
            "query translated"
        );
        self.state.query = Some(query);

        self.execute_query(request).await
    }
}
