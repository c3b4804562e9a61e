//! Field schema - the ordered set of typed fields a log carries

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Declared type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldType {
    /// 64-bit float.
    Float,
    /// 64-bit signed integer.
    Integer,
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Float => f.write_str("Float"),
            Self::Integer => f.write_str("Integer"),
        }
    }
}

/// A scalar field value.
///
/// Serializes untagged, so rows render as plain JSON numbers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Integer value
    Integer(i64),
    /// Float value
    Float(f64),
}

impl Value {
    /// Type of this value.
    #[must_use]
    pub const fn field_type(&self) -> FieldType {
        match self {
            Self::Integer(_) => FieldType::Integer,
            Self::Float(_) => FieldType::Float,
        }
    }

    /// Numeric value widened to `f64` (for plotting).
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub const fn as_f64(&self) -> f64 {
        match *self {
            Self::Integer(v) => v as f64,
            Self::Float(v) => v,
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
        }
    }
}

/// A named, typed field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    name: String,
    ty: FieldType,
}

impl FieldDef {
    /// Create a field definition.
    #[must_use]
    pub fn new(name: impl Into<String>, ty: FieldType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }

    /// Field name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared type.
    #[must_use]
    pub const fn ty(&self) -> FieldType {
        self.ty
    }
}

/// Ordered, duplicate-free list of fields.
///
/// Field order is the column order of every recorded row. Deserializes
/// from a list of fields through the same validation as `SchemaBuilder`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<FieldDef>", into = "Vec<FieldDef>")]
pub struct Schema {
    fields: Vec<FieldDef>,
}

impl Schema {
    /// Create a builder.
    #[must_use]
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True if no fields are declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// All fields in declared order.
    #[must_use]
    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    /// Position of `name`, if declared.
    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// Definition of `name`, if declared.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Field names in declared order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(FieldDef::name)
    }

    /// Append a field, rejecting empty or duplicate names.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSchema` if the name is empty or already declared.
    pub(crate) fn push(&mut self, field: FieldDef) -> Result<()> {
        if field.name.is_empty() {
            return Err(Error::InvalidSchema("field name must not be empty".to_string()));
        }
        if self.index_of(&field.name).is_some() {
            return Err(Error::InvalidSchema(format!(
                "field '{}' declared twice",
                field.name
            )));
        }
        self.fields.push(field);
        Ok(())
    }

    /// Comma-separated names, for error messages.
    pub(crate) fn describe(&self) -> String {
        self.names().collect::<Vec<_>>().join(", ")
    }
}

impl TryFrom<Vec<FieldDef>> for Schema {
    type Error = Error;

    fn try_from(fields: Vec<FieldDef>) -> Result<Self> {
        let mut schema = Self::default();
        for field in fields {
            schema.push(field)?;
        }
        Ok(schema)
    }
}

impl From<Schema> for Vec<FieldDef> {
    fn from(schema: Schema) -> Self {
        schema.fields
    }
}

/// Builder for `Schema`.
///
/// Validation is deferred to `build()` so calls can be chained.
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    fields: Vec<FieldDef>,
}

impl SchemaBuilder {
    /// Declare a field.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, ty: FieldType) -> Self {
        self.fields.push(FieldDef::new(name, ty));
        self
    }

    /// Declare a float field.
    #[must_use]
    pub fn float(self, name: impl Into<String>) -> Self {
        self.field(name, FieldType::Float)
    }

    /// Declare an integer field.
    #[must_use]
    pub fn integer(self, name: impl Into<String>) -> Self {
        self.field(name, FieldType::Integer)
    }

    /// Inherit every field of `parent`, in its order, after any fields
    /// already declared on this builder.
    ///
    /// Lets a variant share its parent's fields instead of redeclaring them.
    #[must_use]
    pub fn extend(mut self, parent: &Schema) -> Self {
        self.fields.extend(parent.fields.iter().cloned());
        self
    }

    /// Build the schema.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSchema` on an empty or duplicate field name.
    pub fn build(self) -> Result<Schema> {
        Schema::try_from(self.fields)
    }
}
