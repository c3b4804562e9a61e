//! Observation Log - live fields plus an append-only row history
//!
//! ## Lifecycle
//!
//! ```text
//! Uninitialized ──set──> Populated ──record──> Recorded
//!                          │  ▲                  │  ▲
//!                          └──┘ set/derive       └──┘ set/derive/record
//! ```
//!
//! Live values and history are independent: `set` and `derive` never touch
//! recorded rows, and a row is captured only by an explicit `record()`.

use tracing::{debug, trace, warn};

use crate::derive::Derivation;
use crate::history::{History, Row};
use crate::schema::{FieldDef, FieldType, Schema, Value};
use crate::{Error, Result};

/// Coarse lifecycle state of a log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogState {
    /// No field set and nothing recorded.
    Uninitialized,
    /// At least one field has been set; nothing recorded yet.
    Populated,
    /// At least one row recorded.
    Recorded,
}

/// An accumulator of named scalar fields and their recorded history.
///
/// ## Example
///
/// ```rust
/// use observation_log::{Derivation, ObservationLog, Schema, Value};
///
/// let schema = Schema::builder().integer("a").integer("b").build()?;
/// let mut log = ObservationLog::builder(schema)
///     .derivation(Derivation::sum("sum", "a", "b"))
///     .build()?;
///
/// log.set("a", Value::Integer(2))?;
/// log.set("b", Value::Integer(3))?;
/// log.derive()?;
/// assert_eq!(log.get("sum")?, Some(Value::Integer(5)));
///
/// log.record()?;
/// assert_eq!(log.history().len(), 1);
/// # Ok::<(), observation_log::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct ObservationLog {
    schema: Schema,
    values: Vec<Option<Value>>,
    derivation: Option<Derivation>,
    history: History,
    touched: bool,
}

impl ObservationLog {
    /// Create a log with the given fields and no derivation.
    #[must_use]
    pub fn new(schema: Schema) -> Self {
        let values = vec![None; schema.len()];
        Self {
            history: History::new(schema.clone()),
            schema,
            values,
            derivation: None,
            touched: false,
        }
    }

    /// Create a builder for a log with a derivation.
    #[must_use]
    pub fn builder(schema: Schema) -> ObservationLogBuilder {
        ObservationLogBuilder::new(schema)
    }

    /// Live schema.
    #[must_use]
    pub const fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Configured derivation, if any.
    #[must_use]
    pub const fn derivation(&self) -> Option<&Derivation> {
        self.derivation.as_ref()
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> LogState {
        if !self.history.is_empty() {
            LogState::Recorded
        } else if self.touched {
            LogState::Populated
        } else {
            LogState::Uninitialized
        }
    }

    /// Assign `value` to `field`.
    ///
    /// An integer assigned to a float field is widened; every other type
    /// difference is rejected.
    ///
    /// # Errors
    ///
    /// Returns `UnknownField` or `TypeMismatch`.
    pub fn set(&mut self, field: &str, value: impl Into<Value>) -> Result<()> {
        let index = self.index_of(field)?;
        let value = coerce(&self.schema.fields()[index], value.into())?;
        trace!(field, %value, "set");
        self.values[index] = Some(value);
        self.touched = true;
        Ok(())
    }

    /// Current value of `field`; `None` if never set.
    ///
    /// # Errors
    ///
    /// Returns `UnknownField` if `field` is not declared.
    pub fn get(&self, field: &str) -> Result<Option<Value>> {
        Ok(self.values[self.index_of(field)?])
    }

    /// Clear `field` back to unset.
    ///
    /// # Errors
    ///
    /// Returns `UnknownField` if `field` is not declared.
    pub fn unset(&mut self, field: &str) -> Result<()> {
        let index = self.index_of(field)?;
        self.values[index] = None;
        Ok(())
    }

    /// Compute the derivation target from the current inputs and store it.
    ///
    /// Mutates exactly the target field; history is untouched. On error no
    /// field changes.
    ///
    /// # Errors
    ///
    /// Returns `NoDerivation`, `MissingValue` for an unset input, or
    /// `Arithmetic`.
    pub fn derive(&mut self) -> Result<Value> {
        let derivation = self.derivation.as_ref().ok_or(Error::NoDerivation)?;
        let (lhs, rhs) = derivation.inputs();
        let value = derivation
            .op()
            .apply(self.require(lhs)?, self.require(rhs)?)?;

        let target = self.index_of(derivation.target())?;
        let value = coerce(&self.schema.fields()[target], value)?;
        debug!(field = derivation.target(), %value, "derived");
        self.values[target] = Some(value);
        self.touched = true;
        Ok(value)
    }

    /// Append the current value of every field as a new row.
    ///
    /// # Errors
    ///
    /// Returns `SchemaMismatch` if fields were declared after the first row
    /// was recorded, or `MissingValue` if any field is unset. History is
    /// unchanged on error.
    pub fn record(&mut self) -> Result<&Row> {
        if !self.history.is_empty() && self.history.schema() != &self.schema {
            warn!(
                expected = %self.history.schema().describe(),
                found = %self.schema.describe(),
                "record rejected: schema changed"
            );
            return Err(Error::SchemaMismatch {
                expected: self.history.schema().describe(),
                found: self.schema.describe(),
            });
        }

        let values = self
            .schema
            .fields()
            .iter()
            .zip(&self.values)
            .map(|(field, value)| {
                value.ok_or_else(|| Error::MissingValue {
                    field: field.name().to_string(),
                })
            })
            .collect::<Result<Vec<_>>>()
            .map_err(|e| {
                warn!(error = %e, "record rejected");
                e
            })?;

        let row = self.history.push(values);
        debug!(sequence = row.sequence(), "recorded row");
        Ok(row)
    }

    /// Recorded rows, read-only.
    #[must_use]
    pub const fn history(&self) -> &History {
        &self.history
    }

    /// Consume the log, keeping only its history.
    #[must_use]
    pub fn into_history(self) -> History {
        self.history
    }

    /// Current values in declared order, without recording them.
    #[must_use]
    pub fn snapshot(&self) -> Vec<(&str, Option<Value>)> {
        self.schema.names().zip(self.values.iter().copied()).collect()
    }

    /// Declare an additional field, initially unset.
    ///
    /// Before the first `record()` the history adopts the new field set.
    /// After it, subsequent records fail with `SchemaMismatch`, since
    /// existing rows cannot gain a column.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSchema` if the name is empty or already declared.
    pub fn declare_field(&mut self, name: impl Into<String>, ty: FieldType) -> Result<()> {
        let field = FieldDef::new(name, ty);
        let name = field.name().to_string();
        self.schema.push(field)?;
        self.values.push(None);
        debug!(field = %name, %ty, "declared field");
        if self.history.is_empty() {
            self.history.reset_schema(self.schema.clone());
        }
        Ok(())
    }

    fn index_of(&self, field: &str) -> Result<usize> {
        self.schema
            .index_of(field)
            .ok_or_else(|| Error::UnknownField(field.to_string()))
    }

    fn require(&self, field: &str) -> Result<Value> {
        self.get(field)?.ok_or_else(|| Error::MissingValue {
            field: field.to_string(),
        })
    }
}

fn coerce(field: &FieldDef, value: Value) -> Result<Value> {
    match (field.ty(), value) {
        (FieldType::Integer, Value::Integer(_)) | (FieldType::Float, Value::Float(_)) => Ok(value),
        (FieldType::Float, Value::Integer(_)) => Ok(Value::Float(value.as_f64())),
        (expected, found) => Err(Error::TypeMismatch {
            field: field.name().to_string(),
            expected,
            found: found.field_type(),
        }),
    }
}

/// Builder for `ObservationLog`.
#[derive(Debug)]
pub struct ObservationLogBuilder {
    schema: Schema,
    derivation: Option<Derivation>,
}

impl ObservationLogBuilder {
    /// Create a builder with the required schema.
    #[must_use]
    pub const fn new(schema: Schema) -> Self {
        Self {
            schema,
            derivation: None,
        }
    }

    /// Set the derivation applied by `derive()`.
    #[must_use]
    pub fn derivation(mut self, derivation: Derivation) -> Self {
        self.derivation = Some(derivation);
        self
    }

    /// Build the log.
    ///
    /// A derivation target missing from the schema is appended to it, typed
    /// by the derivation's inputs.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSchema` if the derivation reads undeclared fields or
    /// writes one of its own inputs.
    pub fn build(self) -> Result<ObservationLog> {
        let mut schema = self.schema;
        if let Some(derivation) = &self.derivation {
            let ty = derivation.output_type(&schema)?;
            if schema.index_of(derivation.target()).is_none() {
                schema.push(FieldDef::new(derivation.target(), ty))?;
            }
        }

        let mut log = ObservationLog::new(schema);
        log.derivation = self.derivation;
        Ok(log)
    }
}
