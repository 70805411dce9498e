//! Connection configuration for the metadata catalog service.

use std::time::Duration;

/// Database name substituted when a caller does not name one.
///
/// Shared metadata catalogs conventionally register unqualified tables under
/// a database literally named `default`.
pub const DEFAULT_DATABASE: &str = "default";

/// Default timeout when establishing a catalog session (5 seconds).
///
/// Session opens that cannot complete within this window fail fast rather
/// than queuing indefinitely.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Catalog connection parameters.
///
/// The crate defines this struct but never loads it: populating it from a
/// file, environment, or job configuration is the caller's concern.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// URI of the metadata catalog service, e.g. `thrift://metastore:9083`.
    pub uri: String,
    /// Database assumed when a caller passes no database name.
    pub default_database: String,
    /// Maximum time to wait when establishing a session.
    pub connect_timeout: Duration,
}

impl CatalogConfig {
    /// Creates a `CatalogConfig` for the given catalog URI with defaults for
    /// everything else.
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            default_database: DEFAULT_DATABASE.to_owned(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }

    /// Overrides the database assumed for unqualified table names.
    pub fn with_default_database(self, default_database: impl Into<String>) -> Self {
        Self {
            default_database: default_database.into(),
            ..self
        }
    }

    /// Overrides the session-establishment timeout.
    pub fn with_connect_timeout(self, connect_timeout: Duration) -> Self {
        Self {
            connect_timeout,
            ..self
        }
    }
}
