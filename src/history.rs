//! Recorded history - immutable rows in insertion order
//!
//! ## Output boundary
//!
//! `History` is what an external analysis or charting collaborator reads.
//! Every row holds one value per field of the history's schema, in declared
//! order. It serializes as an array of objects:
//!
//! ```text
//! [{"a": 2, "b": 3, "sum": 5}, {"a": 10, "b": 3, "sum": 13}]
//! ```

use chrono::{DateTime, Utc};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Serialize, Serializer};

use crate::schema::{Schema, Value};
use crate::{Error, Result};

/// A snapshot of every field, captured by `record()`.
///
/// Rows expose no mutating API once appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    sequence: u64,
    values: Vec<Value>,
    recorded_at: DateTime<Utc>,
}

impl Row {
    pub(crate) fn new(sequence: u64, values: Vec<Value>) -> Self {
        Self {
            sequence,
            values,
            recorded_at: Utc::now(),
        }
    }

    /// Zero-based insertion position.
    #[must_use]
    pub const fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Values in declared field order.
    #[must_use]
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Wall-clock time of the `record()` call.
    #[must_use]
    pub const fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }
}

/// A row paired with its schema, for lookup by field name.
#[derive(Debug, Clone, Copy)]
pub struct RowView<'a> {
    schema: &'a Schema,
    row: &'a Row,
}

impl<'a> RowView<'a> {
    /// Value of `field`, if declared.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<Value> {
        self.schema
            .index_of(field)
            .and_then(|i| self.row.values.get(i).copied())
    }

    /// The underlying row.
    #[must_use]
    pub const fn row(&self) -> &'a Row {
        self.row
    }
}

impl Serialize for RowView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.row.values.len()))?;
        for (name, value) in self.schema.names().zip(&self.row.values) {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Ordered, append-only sequence of rows sharing one schema.
#[derive(Debug, Clone, PartialEq)]
pub struct History {
    schema: Schema,
    rows: Vec<Row>,
}

impl History {
    pub(crate) const fn new(schema: Schema) -> Self {
        Self {
            schema,
            rows: Vec::new(),
        }
    }

    /// Schema shared by every row.
    #[must_use]
    pub const fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Number of recorded rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All rows in insertion order.
    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Iterate rows with name lookup.
    pub fn iter(&self) -> impl Iterator<Item = RowView<'_>> {
        self.rows.iter().map(|row| RowView {
            schema: &self.schema,
            row,
        })
    }

    /// Row at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<RowView<'_>> {
        self.rows.get(index).map(|row| RowView {
            schema: &self.schema,
            row,
        })
    }

    /// Every recorded value of `field`, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `UnknownField` if `field` is not in the history's schema.
    pub fn column(&self, field: &str) -> Result<Vec<Value>> {
        let index = self.column_index(field)?;
        Ok(self.rows.iter().map(|row| row.values[index]).collect())
    }

    /// Paired `(x, y)` points, widened to `f64`, ready for a line chart.
    ///
    /// ## Example
    ///
    /// ```rust
    /// use observation_log::{ObservationLog, Schema, Value};
    ///
    /// let schema = Schema::builder().integer("time").float("level").build()?;
    /// let mut log = ObservationLog::new(schema);
    /// for t in 0..3 {
    ///     log.set("time", Value::Integer(t))?;
    ///     log.set("level", Value::Float(t as f64 * 0.5))?;
    ///     log.record()?;
    /// }
    ///
    /// let points = log.history().series("time", "level")?;
    /// assert_eq!(points, vec![(0.0, 0.0), (1.0, 0.5), (2.0, 1.0)]);
    /// # Ok::<(), observation_log::Error>(())
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `UnknownField` if either field is not in the schema.
    pub fn series(&self, x: &str, y: &str) -> Result<Vec<(f64, f64)>> {
        let (xi, yi) = (self.column_index(x)?, self.column_index(y)?);
        Ok(self
            .rows
            .iter()
            .map(|row| (row.values[xi].as_f64(), row.values[yi].as_f64()))
            .collect())
    }

    /// Consume the history, yielding its rows.
    #[must_use]
    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }

    fn column_index(&self, field: &str) -> Result<usize> {
        self.schema
            .index_of(field)
            .ok_or_else(|| Error::UnknownField(field.to_string()))
    }

    pub(crate) fn push(&mut self, values: Vec<Value>) -> &Row {
        let sequence = self.rows.len() as u64;
        self.rows.push(Row::new(sequence, values));
        &self.rows[self.rows.len() - 1]
    }

    /// Replace the schema of an empty history.
    pub(crate) fn reset_schema(&mut self, schema: Schema) {
        debug_assert!(self.rows.is_empty());
        self.schema = schema;
    }
}

impl Serialize for History {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.rows.len()))?;
        for view in self.iter() {
            seq.serialize_element(&view)?;
        }
        seq.end()
    }
}
