//! The catalog-service seam: session traits, wire types, and errors.
//!
//! The crate resolves and mutates locations *through* a metadata catalog
//! service but does not implement one. Backends implement [`Catalog`] and
//! [`CatalogSession`]; everything above these traits is backend-agnostic.

use async_trait::async_trait;

use crate::{config::CatalogConfig, locations::StorageLocation, schema::ColumnDescriptor};

/// Boxed error source produced by a catalog backend.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors surfaced by a catalog backend.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Failure to establish or keep a session to the catalog service.
    #[error("error connecting to the metadata catalog: {0}")]
    Connection(#[source] BoxError),

    /// The requested table is not registered in the catalog.
    #[error("table {db}.{table} does not exist in the catalog")]
    NoSuchTable { db: String, table: String },

    /// Any other remote call failure (malformed filter expression, rejected
    /// alteration, service-side error).
    #[error("catalog call failed: {0}")]
    Remote(#[source] BoxError),
}

/// Metadata the catalog holds for a table.
///
/// Fetched fresh per call and discarded afterwards; the catalog service is
/// the system of record and nothing here is cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDescriptor {
    /// Database the table is registered under.
    pub database: String,
    /// Table name.
    pub name: String,
    /// Data columns, in declaration order.
    pub columns: Vec<ColumnDescriptor>,
    /// Partition-key columns. Empty for non-partitioned tables.
    pub partition_keys: Vec<ColumnDescriptor>,
    /// The table-level storage location.
    pub location: StorageLocation,
}

impl TableDescriptor {
    /// Whether the table is declared with one or more partition keys.
    pub fn is_partitioned(&self) -> bool {
        !self.partition_keys.is_empty()
    }
}

/// Metadata the catalog holds for one partition of a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionDescriptor {
    /// Partition-key values, positional with the table's `partition_keys`.
    pub values: Vec<String>,
    /// The partition's storage location.
    pub location: StorageLocation,
}

/// A metadata catalog service that can hand out sessions.
///
/// Implementations must be `Send + Sync` for use across async tasks.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// The per-operation session handle type.
    type Session: CatalogSession;

    /// Opens a session using the given connection parameters.
    async fn open_session(&self, config: &CatalogConfig) -> Result<Self::Session, CatalogError>;
}

/// A live session to the catalog service, exclusively owned for the duration
/// of one logical operation.
#[async_trait]
pub trait CatalogSession: Send {
    /// Fetches the descriptor for `db.table`.
    ///
    /// Fails with [`CatalogError::NoSuchTable`] if the table is absent.
    async fn get_table(&mut self, db: &str, table: &str) -> Result<TableDescriptor, CatalogError>;

    /// Lists the partitions of `db.table` matching the filter expression.
    ///
    /// `max_parts` caps the number of matches; `None` means unbounded, which
    /// is what this crate always requests.
    async fn list_partitions_by_filter(
        &mut self,
        db: &str,
        table: &str,
        filter: &str,
        max_parts: Option<u32>,
    ) -> Result<Vec<PartitionDescriptor>, CatalogError>;

    /// Replaces the catalog's descriptor for `db.table` in one atomic
    /// alteration.
    async fn alter_table(
        &mut self,
        db: &str,
        table: &str,
        descriptor: &TableDescriptor,
    ) -> Result<(), CatalogError>;

    /// Closes the session. Idempotent: closing an already-closed session is
    /// a no-op.
    async fn close(&mut self) -> Result<(), CatalogError>;
}

/// Closes a session, logging (rather than propagating) any close failure.
///
/// Release must happen on every exit path, and a failed close must not mask
/// the outcome of the operation that used the session.
pub(crate) async fn close_quietly<S: CatalogSession>(session: &mut S) {
    if let Err(err) = session.close().await {
        tracing::warn!(error = %err, "failed to close catalog session");
    }
}
