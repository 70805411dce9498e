//! Catalog schema construction from flat column descriptors.

/// A single column as the catalog describes it: name, type name, and an
/// optional comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescriptor {
    pub name: String,
    pub type_name: String,
    pub comment: Option<String>,
}

impl ColumnDescriptor {
    /// Creates a descriptor without a comment.
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            comment: None,
        }
    }
}

/// The catalog's schema representation: an ordered, validated wrap of
/// [`ColumnDescriptor`]s with by-name position lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogSchema {
    fields: Vec<ColumnDescriptor>,
}

impl CatalogSchema {
    /// Wraps an ordered column list into a schema.
    ///
    /// This is a pure transformation with no I/O. It applies the catalog's
    /// validation rules: column names must be non-blank and unique.
    pub fn from_columns(columns: Vec<ColumnDescriptor>) -> Result<Self, SchemaBuildError> {
        for (position, column) in columns.iter().enumerate() {
            if column.name.trim().is_empty() {
                return Err(SchemaBuildError::BlankColumnName { position });
            }
            if columns[..position].iter().any(|c| c.name == column.name) {
                return Err(SchemaBuildError::DuplicateColumn(column.name.clone()));
            }
        }
        Ok(Self { fields: columns })
    }

    /// The columns, in declaration order.
    pub fn fields(&self) -> &[ColumnDescriptor] {
        &self.fields
    }

    /// The position of the named column, if present.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|c| c.name == name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Errors that can occur when wrapping a column list into a [`CatalogSchema`].
#[derive(Debug, thiserror::Error)]
pub enum SchemaBuildError {
    /// A column at the given position has a blank name.
    #[error("column at position {position} has a blank name")]
    BlankColumnName { position: usize },

    /// Two columns share the same name.
    #[error("duplicate column name: {0}")]
    DuplicateColumn(String),
}
