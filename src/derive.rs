//! Fixed, named derivations of one field from two others

use serde::{Deserialize, Serialize};

use crate::schema::{FieldType, Schema, Value};
use crate::{Error, Result};

/// Binary operation applied by a derivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeriveOp {
    /// `lhs + rhs`
    Sum,
    /// `lhs - rhs`
    Difference,
    /// `lhs % rhs`
    Remainder,
}

impl DeriveOp {
    /// Apply the operation.
    ///
    /// Integer operands use checked arithmetic; a float operand promotes
    /// the result to float.
    ///
    /// # Errors
    ///
    /// Returns `Arithmetic` on integer overflow or integer remainder by zero.
    pub fn apply(self, lhs: Value, rhs: Value) -> Result<Value> {
        match (lhs, rhs) {
            (Value::Integer(a), Value::Integer(b)) => {
                let out = match self {
                    Self::Sum => a.checked_add(b),
                    Self::Difference => a.checked_sub(b),
                    Self::Remainder => a.checked_rem(b),
                };
                out.map(Value::Integer).ok_or_else(|| {
                    Error::Arithmetic(format!("{self:?} of {a} and {b} is not representable"))
                })
            }
            (a, b) => {
                let (a, b) = (a.as_f64(), b.as_f64());
                Ok(Value::Float(match self {
                    Self::Sum => a + b,
                    Self::Difference => a - b,
                    Self::Remainder => a % b,
                }))
            }
        }
    }
}

/// A named transformation writing `target = lhs op rhs`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Derivation {
    target: String,
    op: DeriveOp,
    lhs: String,
    rhs: String,
}

impl Derivation {
    /// Create a derivation.
    #[must_use]
    pub fn new(
        target: impl Into<String>,
        op: DeriveOp,
        lhs: impl Into<String>,
        rhs: impl Into<String>,
    ) -> Self {
        Self {
            target: target.into(),
            op,
            lhs: lhs.into(),
            rhs: rhs.into(),
        }
    }

    /// `target = lhs + rhs`
    #[must_use]
    pub fn sum(target: impl Into<String>, lhs: impl Into<String>, rhs: impl Into<String>) -> Self {
        Self::new(target, DeriveOp::Sum, lhs, rhs)
    }

    /// `target = lhs - rhs`
    #[must_use]
    pub fn difference(
        target: impl Into<String>,
        lhs: impl Into<String>,
        rhs: impl Into<String>,
    ) -> Self {
        Self::new(target, DeriveOp::Difference, lhs, rhs)
    }

    /// `target = lhs % rhs`
    #[must_use]
    pub fn remainder(
        target: impl Into<String>,
        lhs: impl Into<String>,
        rhs: impl Into<String>,
    ) -> Self {
        Self::new(target, DeriveOp::Remainder, lhs, rhs)
    }

    /// Field written by the derivation.
    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Operation applied.
    #[must_use]
    pub const fn op(&self) -> DeriveOp {
        self.op
    }

    /// Input field names, `(lhs, rhs)`.
    #[must_use]
    pub fn inputs(&self) -> (&str, &str) {
        (&self.lhs, &self.rhs)
    }

    /// Result type for the given schema: integer only if both inputs are.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSchema` if an input is undeclared or the target is
    /// also an input.
    pub fn output_type(&self, schema: &Schema) -> Result<FieldType> {
        if self.target == self.lhs || self.target == self.rhs {
            return Err(Error::InvalidSchema(format!(
                "derivation target '{}' is also one of its inputs",
                self.target
            )));
        }
        let input_type = |name: &str| {
            schema
                .field(name)
                .map(|f| f.ty())
                .ok_or_else(|| {
                    Error::InvalidSchema(format!("derivation input '{name}' is not declared"))
                })
        };
        match (input_type(&self.lhs)?, input_type(&self.rhs)?) {
            (FieldType::Integer, FieldType::Integer) => Ok(FieldType::Integer),
            _ => Ok(FieldType::Float),
        }
    }
}
