use serde::{Deserialize, Serialize};

use crate::error::PluginError;
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttrKind {
    Int32,
    Float32,
}

/// Single scalar attribute value carried in a creation request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AttrValue {
    Int32(i32),
    Float32(f32),
}

impl AttrValue {
    pub fn kind(&self) -> AttrKind {
        match self {
            AttrValue::Int32(_) => AttrKind::Int32,
            AttrValue::Float32(_) => AttrKind::Float32,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttrField {
    pub name: String,
    pub value: AttrValue,
}

impl AttrField {
    pub fn int32(name: &str, value: i32) -> AttrField {
        AttrField {
            name: name.to_string(),
            value: AttrValue::Int32(value),
        }
    }

    pub fn float32(name: &str, value: f32) -> AttrField {
        AttrField {
            name: name.to_string(),
            value: AttrValue::Float32(value),
        }
    }

    pub fn kind(&self) -> AttrKind {
        self.value.kind()
    }
}

/// Schema entry a creator publishes for one attribute it understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttrSpec {
    pub name: &'static str,
    pub kind: AttrKind,
}

/// Attribute list handed to a creator. Unrecognized names are left alone
/// by the typed lookups; a recognized name carrying the wrong kind fails.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttrList {
    pub fields: Vec<AttrField>,
}

#[allow(dead_code)]
impl AttrList {
    pub fn new() -> AttrList {
        Default::default()
    }

    pub fn with_int32(mut self, name: &str, value: i32) -> AttrList {
        self.fields.push(AttrField::int32(name, value));
        self
    }

    pub fn with_float32(mut self, name: &str, value: f32) -> AttrList {
        self.fields.push(AttrField::float32(name, value));
        self
    }

    pub fn push(&mut self, field: AttrField) {
        self.fields.push(field);
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&AttrField> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn get_int32(&self, name: &str) -> Result<Option<i32>> {
        match self.get(name) {
            None => Ok(None),
            Some(field) => match field.value {
                AttrValue::Int32(value) => Ok(Some(value)),
                other => Err(PluginError::AttrKindMismatch {
                    name: name.to_string(),
                    expected: AttrKind::Int32,
                    actual: other.kind(),
                }),
            },
        }
    }

    pub fn get_float32(&self, name: &str) -> Result<Option<f32>> {
        match self.get(name) {
            None => Ok(None),
            Some(field) => match field.value {
                AttrValue::Float32(value) => Ok(Some(value)),
                other => Err(PluginError::AttrKindMismatch {
                    name: name.to_string(),
                    expected: AttrKind::Float32,
                    actual: other.kind(),
                }),
            },
        }
    }
}
