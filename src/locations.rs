//! Location resolution and mutation against a catalog session.
//!
//! These functions hold the decision logic of the crate; session acquisition
//! and release live in [`TableLocator`](crate::TableLocator).

pub use self::storage_location::{InvalidLocationError, StorageLocation};
use crate::{
    Error,
    session::{CatalogSession, TableDescriptor},
};

mod storage_location;

/// Resolves the storage locations that apply to `(db, table)` under an
/// optional partition filter.
///
/// - A blank filter resolves to the table-level location.
/// - A non-blank filter on a partitioned table resolves to the locations of
///   the matching partitions, in the order the catalog returned them. The
///   filter may match more than one partition (e.g. `ds >= '2023-01-01'`);
///   the listing is unbounded.
/// - A non-blank filter on a non-partitioned table, or one that matches no
///   partition, resolves to an empty list with a logged diagnostic. Callers
///   that need to distinguish "no data for this predicate" from a malformed
///   request only have the log to go by.
#[tracing::instrument(skip(session), err)]
pub async fn resolve<S>(
    session: &mut S,
    db: &str,
    table: &str,
    filter: Option<&str>,
) -> Result<Vec<StorageLocation>, Error>
where
    S: CatalogSession,
{
    check_table_name(table)?;
    let descriptor = session.get_table(db, table).await?;

    let Some(filter) = non_blank(filter) else {
        return Ok(vec![descriptor.location]);
    };

    if !descriptor.is_partitioned() {
        tracing::warn!(
            db,
            table,
            filter,
            "table is not partitioned; the filter selects no partition locations"
        );
        return Ok(Vec::new());
    }

    let partitions = session
        .list_partitions_by_filter(db, table, filter, None)
        .await?;
    if partitions.is_empty() {
        tracing::warn!(db, table, filter, "no partition matches the filter");
        return Ok(Vec::new());
    }

    Ok(partitions.into_iter().map(|part| part.location).collect())
}

/// Rewrites the recorded table-level location of `(db, table)` to `path`.
///
/// The `_filter` parameter is accepted for signature parity with [`resolve`]
/// but is not applied: the rewrite always targets the table-level location,
/// never a specific partition's. The alteration is committed in a single
/// atomic `alter_table` call and is not retried on failure.
#[tracing::instrument(skip(session), err)]
pub async fn set_location<S>(
    session: &mut S,
    db: &str,
    table: &str,
    _filter: Option<&str>,
    path: &str,
) -> Result<(), Error>
where
    S: CatalogSession,
{
    check_table_name(table)?;
    let mut descriptor = session.get_table(db, table).await?;
    descriptor.location = path.parse::<StorageLocation>()?;
    session.alter_table(db, table, &descriptor).await?;
    Ok(())
}

/// Fetches the catalog's descriptor for `(db, table)`.
#[tracing::instrument(skip(session), err)]
pub async fn get_table<S>(session: &mut S, db: &str, table: &str) -> Result<TableDescriptor, Error>
where
    S: CatalogSession,
{
    check_table_name(table)?;
    Ok(session.get_table(db, table).await?)
}

/// Fails fast on a blank table name, before any catalog call is attempted.
pub(crate) fn check_table_name(table: &str) -> Result<(), Error> {
    if table.trim().is_empty() {
        return Err(Error::InvalidArgument("table name must not be blank"));
    }
    Ok(())
}

/// Strip-to-none: blank and whitespace-only filters mean "no filter".
pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
