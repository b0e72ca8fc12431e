//! Data provider for paginated/sortable/filterable UI tables.
//!
//! Rows come either from an in-memory collection or from a remote
//! endpoint implementing the server-side table-processing contract
//! (column-indexed ordering, per-column and global search, as used by
//! DataTables-style endpoints).
//!
//! # Architecture
//!
//! - **Codec**: best-effort percent encode/decode that never fails on
//!   malformed caller text
//! - **Schema**: ordered field definitions; a field's position is its
//!   wire column index
//! - **Query**: pure translation of schema + request + provider
//!   defaults into the canonical wire query
//! - **Provider**: orchestrates translation and retrieval, owns the
//!   lifecycle hooks, and contains transport failures
//!
//! # Example
//!
//! ```no_run
//! use items_provider::{FieldDefinition, HttpTransport, ItemsProvider, ItemsRequest, ProviderConfig};
//! use std::sync::Arc;
//!
//! # async fn demo() {
//! let mut provider = ItemsProvider::new(ProviderConfig {
//!     transport: Some(Arc::new(HttpTransport::new())),
//!     fields: vec![
//!         FieldDefinition::new("name"),
//!         FieldDefinition::new("created_at").not_searchable(),
//!     ],
//!     ..Default::default()
//! });
//!
//! let rows = provider
//!     .items(&ItemsRequest {
//!         filter: Some("alice".to_string()),
//!         ..ItemsRequest::new("https://api.example.com/users")
//!     })
//!     .await;
//! # let _ = rows;
//! # }
//! ```

pub mod codec;
mod error;
mod provider;
mod query;
mod schema;
pub mod transport;

pub use error::{TransportError, TransportResult};
pub use provider::{
    BeforeQueryHook, FieldTranslateHook, Hooks, ItemsProvider, ProviderConfig, ProviderState,
    ResponseCompleteHook, ResponseErrorHook,
};
pub use query::{translate, ColumnSearch, GlobalSearch, ItemsRequest, OrderEntry, Query, QueryColumn};
pub use schema::{
    FieldDefinition, ProviderDefaults, SearchFields, SearchTerm, SortDirection, SortFields,
};
pub use transport::{CancelToken, FetchResponse, HttpTransport, Item, Transport};
