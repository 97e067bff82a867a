//! Result tables returned to the host
//!
//! A [`DataFrame`] is a named set of typed, equal-length columns tagged with
//! the response identifier of the target it answers.

use crate::error::{DatasourceError, Result};
use serde::{Deserialize, Serialize};

/// Column type as understood by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Epoch-millisecond instants
    Time,
    /// Floating point numbers
    Number,
}

/// Typed column values
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValues {
    /// Time column
    Time(Vec<i64>),
    /// Numeric column
    Number(Vec<f64>),
}

impl FieldValues {
    fn len(&self) -> usize {
        match self {
            Self::Time(v) => v.len(),
            Self::Number(v) => v.len(),
        }
    }
}

/// A single named column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    /// Column name
    pub name: String,
    /// Column type, always consistent with `values`
    #[serde(rename = "type")]
    field_type: FieldType,
    /// Column values
    pub values: FieldValues,
}

impl Field {
    /// Creates a time column
    pub fn time(name: impl Into<String>, values: Vec<i64>) -> Self {
        Self {
            name: name.into(),
            field_type: FieldType::Time,
            values: FieldValues::Time(values),
        }
    }

    /// Creates a numeric column
    pub fn number(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            field_type: FieldType::Number,
            values: FieldValues::Number(values),
        }
    }

    /// Column type
    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    /// Number of values in the column
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the column has no values
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Values of a time column
    pub fn as_time(&self) -> Option<&[i64]> {
        match &self.values {
            FieldValues::Time(v) => Some(v),
            FieldValues::Number(_) => None,
        }
    }

    /// Values of a numeric column
    pub fn as_number(&self) -> Option<&[f64]> {
        match &self.values {
            FieldValues::Number(v) => Some(v),
            FieldValues::Time(_) => None,
        }
    }
}

/// One output table, answering one target
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataFrame {
    /// Response identifier of the originating target
    #[serde(rename = "refId")]
    pub ref_id: String,
    /// Columns in display order
    pub fields: Vec<Field>,
}

impl DataFrame {
    /// Creates an empty frame for a target
    pub fn new(ref_id: impl Into<String>) -> Self {
        Self {
            ref_id: ref_id.into(),
            fields: Vec::new(),
        }
    }

    /// Appends a column
    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Looks a column up by name
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Row count, taken from the first column
    pub fn len(&self) -> usize {
        self.fields.first().map(Field::len).unwrap_or(0)
    }

    /// Whether the frame has no rows
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Checks that every column has the same length
    ///
    /// # Errors
    ///
    /// Returns `DatasourceError::InvalidFrame` naming the first column whose
    /// length differs from the first column.
    pub fn validate(&self) -> Result<()> {
        let expected = self.len();
        if let Some(field) = self.fields.iter().find(|f| f.len() != expected) {
            return Err(DatasourceError::InvalidFrame(format!(
                "frame {}: column '{}' has {} values, expected {}",
                self.ref_id,
                field.name,
                field.len(),
                expected
            ))
            .into());
        }
        Ok(())
    }
}
