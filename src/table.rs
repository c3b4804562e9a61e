//! Arrow export of a recorded history
//!
//! **Columnar handoff**: analysis and plotting collaborators consume the
//! history as an Arrow `RecordBatch`, one column per field in declared
//! order. Integer fields map to `Int64`, float fields to `Float64`.
//! Everything stays in process; nothing is written to disk.

use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, Int64Array};
use arrow::datatypes::{DataType, Field, Schema as ArrowSchema};
use arrow::record_batch::{RecordBatch, RecordBatchOptions};

use crate::history::History;
use crate::schema::{FieldType, Value};
use crate::Result;

impl From<FieldType> for DataType {
    fn from(ty: FieldType) -> Self {
        match ty {
            FieldType::Float => Self::Float64,
            FieldType::Integer => Self::Int64,
        }
    }
}

impl History {
    /// Arrow schema matching this history's fields.
    #[must_use]
    pub fn arrow_schema(&self) -> ArrowSchema {
        ArrowSchema::new(
            self.schema()
                .fields()
                .iter()
                .map(|f| Field::new(f.name(), f.ty().into(), false))
                .collect::<Vec<_>>(),
        )
    }

    /// Build a `RecordBatch` holding every recorded row.
    ///
    /// # Errors
    ///
    /// Returns `Arrow` if the batch cannot be assembled.
    pub fn to_record_batch(&self) -> Result<RecordBatch> {
        let columns: Vec<ArrayRef> = self
            .schema()
            .fields()
            .iter()
            .enumerate()
            .map(|(i, field)| -> ArrayRef {
                let values = self.rows().iter().map(|row| row.values()[i]);
                match field.ty() {
                    FieldType::Integer => Arc::new(
                        values
                            .map(|v| match v {
                                Value::Integer(n) => Some(n),
                                Value::Float(_) => None,
                            })
                            .collect::<Int64Array>(),
                    ),
                    FieldType::Float => Arc::new(
                        values.map(|v| v.as_f64()).collect::<Float64Array>(),
                    ),
                }
            })
            .collect();

        let options = RecordBatchOptions::new().with_row_count(Some(self.len()));
        let batch =
            RecordBatch::try_new_with_options(Arc::new(self.arrow_schema()), columns, &options)?;
        Ok(batch)
    }
}
