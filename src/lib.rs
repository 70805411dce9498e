//! Storage-location resolution for tables registered in a shared metadata
//! catalog.
//!
//! Callers identify a table by database name, table name, and an optional
//! partition-filter predicate; [`TableLocator`] translates that into one or
//! more storage locations, or rewrites the table's recorded location. The
//! catalog service itself is an external collaborator behind the [`Catalog`]
//! and [`CatalogSession`] traits; this crate performs no caching, no retries,
//! and no validation that a returned location exists on the storage medium.

use tracing::instrument;

mod config;
pub mod locations;
mod schema;
mod session;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use self::{
    config::{CatalogConfig, DEFAULT_CONNECT_TIMEOUT, DEFAULT_DATABASE},
    locations::{InvalidLocationError, StorageLocation},
    schema::{CatalogSchema, ColumnDescriptor, SchemaBuildError},
    session::{
        BoxError, Catalog, CatalogError, CatalogSession, PartitionDescriptor, TableDescriptor,
    },
};
use crate::session::close_quietly;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Required identification is missing; no catalog call was attempted.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// Failure to establish or use a catalog session.
    #[error("error connecting to the metadata catalog: {0}")]
    Connection(#[source] BoxError),

    /// The requested table is not registered in the catalog.
    #[error("table {db}.{table} does not exist in the catalog")]
    NoSuchTable { db: String, table: String },

    /// A remote catalog call failed.
    #[error("catalog call failed: {0}")]
    Catalog(#[source] BoxError),

    /// The column list was rejected by schema validation.
    #[error("error building table schema: {0}")]
    Schema(#[from] SchemaBuildError),

    /// The target path of a location mutation is malformed.
    #[error(transparent)]
    InvalidLocation(#[from] InvalidLocationError),
}

impl Error {
    /// Returns `true` if the error is likely a transient connection issue.
    ///
    /// The crate performs no retries itself; callers can use this to decide
    /// whether re-running the whole operation is worthwhile.
    pub fn is_connection_error(&self) -> bool {
        matches!(self, Error::Connection(_))
    }
}

impl From<CatalogError> for Error {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Connection(source) => Error::Connection(source),
            CatalogError::NoSuchTable { db, table } => Error::NoSuchTable { db, table },
            CatalogError::Remote(source) => Error::Catalog(source),
        }
    }
}

/// Returns `value` when present, `fallback` otherwise.
pub fn default_if_absent<'a>(value: Option<&'a str>, fallback: &'a str) -> &'a str {
    value.unwrap_or(fallback)
}

/// Returns `db` when present, the catalog's conventional default database
/// name otherwise.
pub fn default_database(db: Option<&str>) -> &str {
    default_if_absent(db, DEFAULT_DATABASE)
}

/// Client API for resolving and mutating table storage locations.
///
/// Owns a catalog collaborator and its connection parameters. Every operation
/// opens one session, performs its catalog calls sequentially, and closes the
/// session before returning, on success and failure alike. Sessions are never
/// shared between operations; callers needing concurrency run independent
/// invocations.
#[derive(Debug, Clone)]
pub struct TableLocator<C> {
    catalog: C,
    config: CatalogConfig,
}

impl<C: Catalog> TableLocator<C> {
    /// Creates a locator over the given catalog collaborator.
    pub fn new(catalog: C, config: CatalogConfig) -> Self {
        Self { catalog, config }
    }

    /// Resolves the storage locations that apply to `(db, table)` under an
    /// optional partition filter.
    ///
    /// A blank filter resolves to the table-level location; a non-blank
    /// filter resolves to the matching partitions' locations in catalog
    /// order. A filter that selects nothing (no matching partition, or a
    /// non-partitioned table) yields an empty list with a logged diagnostic,
    /// not an error. See [`locations::resolve`] for the full decision
    /// procedure.
    #[instrument(skip(self), err)]
    pub async fn storage_locations(
        &self,
        db: Option<&str>,
        table: &str,
        filter: Option<&str>,
    ) -> Result<Vec<StorageLocation>, Error> {
        locations::check_table_name(table)?;
        let db = self.database_or_default(db);

        let mut session = self.catalog.open_session(&self.config).await?;
        let outcome = locations::resolve(&mut session, db, table, filter).await;
        close_quietly(&mut session).await;
        outcome
    }

    /// Rewrites the recorded table-level location of `(db, table)` to `path`.
    ///
    /// The `filter` parameter is accepted but not applied: the rewrite always
    /// targets the table-level location, never a specific partition's.
    #[instrument(skip(self), err)]
    pub async fn set_storage_location(
        &self,
        db: Option<&str>,
        table: &str,
        filter: Option<&str>,
        path: &str,
    ) -> Result<(), Error> {
        locations::check_table_name(table)?;
        let db = self.database_or_default(db);

        let mut session = self.catalog.open_session(&self.config).await?;
        let outcome = locations::set_location(&mut session, db, table, filter, path).await;
        close_quietly(&mut session).await;
        outcome
    }

    /// Fetches the catalog's descriptor for `(db, table)`.
    #[instrument(skip(self), err)]
    pub async fn table(&self, db: Option<&str>, table: &str) -> Result<TableDescriptor, Error> {
        locations::check_table_name(table)?;
        let db = self.database_or_default(db);

        let mut session = self.catalog.open_session(&self.config).await?;
        let outcome = locations::get_table(&mut session, db, table).await;
        close_quietly(&mut session).await;
        outcome
    }

    /// Substitutes the configured default database for absent or blank
    /// database names.
    fn database_or_default<'a>(&'a self, db: Option<&'a str>) -> &'a str {
        default_if_absent(locations::non_blank(db), &self.config.default_database)
    }
}
