//! Schema snapshot models.
//!
//! The snapshot is captured once at startup and shared read-only for the rest
//! of the process lifetime.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A column name and its declared type, as reported by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    pub name: String,
    pub data_type: String,
}

impl ColumnDescriptor {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
        }
    }
}

/// Renders as `"name" (type)`, the form used in prompts.
impl fmt::Display for ColumnDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\" ({})", self.name, self.data_type)
    }
}

/// Table name → ordered columns.
///
/// Tables keep the order they were inserted in, which for a captured snapshot
/// is the catalog's `ORDER BY` (and so the database's collation). Columns keep
/// catalog (ordinal) order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaSnapshot {
    tables: Vec<(String, Vec<ColumnDescriptor>)>,
}

impl SchemaSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a table with its columns, replacing any previous entry of the same name.
    pub fn with_table(
        mut self,
        name: impl Into<String>,
        columns: impl IntoIterator<Item = ColumnDescriptor>,
    ) -> Self {
        self.insert_table(name, columns);
        self
    }

    /// A replaced table keeps its original position.
    pub fn insert_table(
        &mut self,
        name: impl Into<String>,
        columns: impl IntoIterator<Item = ColumnDescriptor>,
    ) {
        let name = name.into();
        let columns: Vec<_> = columns.into_iter().collect();
        match self.tables.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, cols)) => *cols = columns,
            None => self.tables.push((name, columns)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.iter().map(|(name, _)| name.as_str())
    }

    pub fn columns(&self, table: &str) -> Option<&[ColumnDescriptor]> {
        self.tables
            .iter()
            .find(|(name, _)| name == table)
            .map(|(_, cols)| cols.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[ColumnDescriptor])> {
        self.tables
            .iter()
            .map(|(name, cols)| (name.as_str(), cols.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_descriptor_display() {
        let col = ColumnDescriptor::new("vendorName", "text");
        assert_eq!(col.to_string(), "\"vendorName\" (text)");
    }

    #[test]
    fn test_tables_keep_catalog_order() {
        // en_US collation, as PostgreSQL would return it
        let snapshot = SchemaSnapshot::new()
            .with_table("_prisma_migrations", vec![])
            .with_table("invoice", vec![ColumnDescriptor::new("id", "integer")])
            .with_table("Vendor", vec![ColumnDescriptor::new("id", "integer")]);

        let names: Vec<_> = snapshot.table_names().collect();
        assert_eq!(names, vec!["_prisma_migrations", "invoice", "Vendor"]);
        assert_eq!(snapshot.len(), 3);
    }

    #[test]
    fn test_replacing_a_table_keeps_its_position() {
        let snapshot = SchemaSnapshot::new()
            .with_table("invoice", vec![])
            .with_table("Vendor", vec![])
            .with_table("invoice", vec![ColumnDescriptor::new("id", "integer")]);

        let names: Vec<_> = snapshot.table_names().collect();
        assert_eq!(names, vec!["invoice", "Vendor"]);
        assert_eq!(snapshot.columns("invoice").unwrap().len(), 1);
    }

    #[test]
    fn test_columns_keep_insertion_order() {
        let snapshot = SchemaSnapshot::new().with_table(
            "Vendor",
            vec![
                ColumnDescriptor::new("id", "integer"),
                ColumnDescriptor::new("name", "text"),
                ColumnDescriptor::new("createdAt", "timestamp without time zone"),
            ],
        );
        let cols: Vec<_> = snapshot
            .columns("Vendor")
            .unwrap()
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(cols, vec!["id", "name", "createdAt"]);
        assert!(snapshot.columns("Missing").is_none());
    }

    #[test]
    fn test_default_snapshot_is_empty() {
        assert!(SchemaSnapshot::default().is_empty());
    }
}
