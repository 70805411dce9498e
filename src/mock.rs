//! In-memory mock catalog backend.
//!
//! Backs the in-tree integration tests, and is available to dependent
//! crates' tests through the `mock` feature. Tables and partitions live in a
//! shared map; filter expressions are evaluated against partition-key values
//! so multi-partition scenarios behave like a real catalog.
//!
//! The mock counts session opens and closes, which lets tests assert the
//! scoped-release discipline: exactly one close per open, on success and
//! failure paths alike.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::{
    Catalog, CatalogConfig, CatalogError, CatalogSession, PartitionDescriptor, TableDescriptor,
};

#[derive(Debug, Default)]
struct State {
    tables: Vec<TableDescriptor>,
    partitions: Vec<(String, String, PartitionDescriptor)>,
    opens: usize,
    closes: usize,
    fail_open: bool,
    fail_close: bool,
}

impl State {
    fn table(&self, db: &str, table: &str) -> Result<&TableDescriptor, CatalogError> {
        self.tables
            .iter()
            .find(|t| t.database == db && t.name == table)
            .ok_or_else(|| CatalogError::NoSuchTable {
                db: db.to_owned(),
                table: table.to_owned(),
            })
    }
}

/// An in-memory [`Catalog`] implementation.
///
/// Clones share the same state.
#[derive(Debug, Clone, Default)]
pub struct MockCatalog {
    state: Arc<Mutex<State>>,
}

impl MockCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a table.
    pub fn insert_table(&self, descriptor: TableDescriptor) {
        self.state.lock().unwrap().tables.push(descriptor);
    }

    /// Registers a partition of `db.table` with the given positional
    /// partition-key values.
    pub fn insert_partition(&self, db: &str, table: &str, partition: PartitionDescriptor) {
        self.state
            .lock()
            .unwrap()
            .partitions
            .push((db.to_owned(), table.to_owned(), partition));
    }

    /// Makes the next `open_session` call fail with a connection error.
    pub fn fail_next_open(&self) {
        self.state.lock().unwrap().fail_open = true;
    }

    /// Makes session closes report a failure (the close still counts).
    pub fn fail_close(&self) {
        self.state.lock().unwrap().fail_close = true;
    }

    /// Number of sessions opened so far.
    pub fn open_count(&self) -> usize {
        self.state.lock().unwrap().opens
    }

    /// Number of sessions closed so far.
    pub fn close_count(&self) -> usize {
        self.state.lock().unwrap().closes
    }

    /// The current descriptor for `db.table`, if registered.
    pub fn table(&self, db: &str, table: &str) -> Option<TableDescriptor> {
        self.state.lock().unwrap().table(db, table).ok().cloned()
    }
}

#[async_trait]
impl Catalog for MockCatalog {
    type Session = MockSession;

    async fn open_session(&self, _config: &CatalogConfig) -> Result<MockSession, CatalogError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_open {
            state.fail_open = false;
            return Err(CatalogError::Connection("mock connection refused".into()));
        }
        state.opens += 1;
        Ok(MockSession {
            state: Arc::clone(&self.state),
            closed: false,
        })
    }
}

/// A session handle over the shared [`MockCatalog`] state.
#[derive(Debug)]
pub struct MockSession {
    state: Arc<Mutex<State>>,
    closed: bool,
}

#[async_trait]
impl CatalogSession for MockSession {
    async fn get_table(&mut self, db: &str, table: &str) -> Result<TableDescriptor, CatalogError> {
        self.state.lock().unwrap().table(db, table).cloned()
    }

    async fn list_partitions_by_filter(
        &mut self,
        db: &str,
        table: &str,
        filter: &str,
        max_parts: Option<u32>,
    ) -> Result<Vec<PartitionDescriptor>, CatalogError> {
        let state = self.state.lock().unwrap();
        let descriptor = state.table(db, table)?;
        let comparison = Comparison::parse(filter).ok_or_else(|| {
            CatalogError::Remote(format!("unsupported filter expression: {filter}").into())
        })?;
        let key_position = descriptor
            .partition_keys
            .iter()
            .position(|k| k.name == comparison.key);

        let matches = state
            .partitions
            .iter()
            .filter(|(p_db, p_table, _)| p_db == db && p_table == table)
            .map(|(_, _, partition)| partition)
            .filter(|partition| {
                key_position
                    .and_then(|pos| partition.values.get(pos))
                    .is_some_and(|value| comparison.matches(value))
            })
            .cloned();

        Ok(match max_parts {
            Some(max) => matches.take(max as usize).collect(),
            None => matches.collect(),
        })
    }

    async fn alter_table(
        &mut self,
        db: &str,
        table: &str,
        descriptor: &TableDescriptor,
    ) -> Result<(), CatalogError> {
        let mut state = self.state.lock().unwrap();
        let existing = state
            .tables
            .iter_mut()
            .find(|t| t.database == db && t.name == table)
            .ok_or_else(|| CatalogError::NoSuchTable {
                db: db.to_owned(),
                table: table.to_owned(),
            })?;
        *existing = descriptor.clone();
        Ok(())
    }

    async fn close(&mut self) -> Result<(), CatalogError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        let mut state = self.state.lock().unwrap();
        state.closes += 1;
        if state.fail_close {
            return Err(CatalogError::Remote("mock close failure".into()));
        }
        Ok(())
    }
}

/// A single comparison over one partition key, e.g. `ds >= '2023-01-01'`.
///
/// Values compare lexicographically, which is how string-typed partition
/// keys behave in real catalogs.
#[derive(Debug)]
struct Comparison {
    key: String,
    op: Op,
    value: String,
}

#[derive(Debug, Clone, Copy)]
enum Op {
    Eq,
    Ne,
    Le,
    Ge,
    Lt,
    Gt,
}

impl Comparison {
    /// Parses `key OP 'value'`. Two-character operators are tried first so
    /// `>=` is not misread as `>`.
    fn parse(filter: &str) -> Option<Self> {
        const OPS: &[(&str, Op)] = &[
            (">=", Op::Ge),
            ("<=", Op::Le),
            ("!=", Op::Ne),
            ("=", Op::Eq),
            (">", Op::Gt),
            ("<", Op::Lt),
        ];
        let (symbol, op) = OPS.iter().find(|(symbol, _)| filter.contains(symbol))?;
        let (key, value) = filter.split_once(symbol)?;
        let key = key.trim();
        let value = value.trim().trim_matches('\'');
        if key.is_empty() || value.is_empty() {
            return None;
        }
        Some(Self {
            key: key.to_owned(),
            op: *op,
            value: value.to_owned(),
        })
    }

    fn matches(&self, value: &str) -> bool {
        match self.op {
            Op::Eq => value == self.value,
            Op::Ne => value != self.value,
            Op::Le => value <= self.value.as_str(),
            Op::Ge => value >= self.value.as_str(),
            Op::Lt => value < self.value.as_str(),
            Op::Gt => value > self.value.as_str(),
        }
    }
}
