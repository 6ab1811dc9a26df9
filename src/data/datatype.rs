use half::f16;
use serde::{Deserialize, Serialize};

/// Element types the pose NMS operators negotiate over.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataType {
    #[default]
    Float32,
    Float16,
    Int32,
}

impl DataType {
    pub fn from_str(datatype: &str) -> Option<DataType> {
        match datatype.to_lowercase().as_str() {
            "float32" | "fp32" => Some(DataType::Float32),
            "float16" | "fp16" => Some(DataType::Float16),
            "int32" | "i32" => Some(DataType::Int32),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Float32 => "Float32",
            DataType::Float16 => "Float16",
            DataType::Int32 => "Int32",
        }
    }

    /// Stable code used in serialized parameter images.
    pub fn code(&self) -> i32 {
        match self {
            DataType::Float32 => 0,
            DataType::Float16 => 1,
            DataType::Int32 => 2,
        }
    }

    pub fn from_code(code: i32) -> Option<DataType> {
        match code {
            0 => Some(DataType::Float32),
            1 => Some(DataType::Float16),
            2 => Some(DataType::Int32),
            _ => None,
        }
    }

    /// Width of one element in bytes.
    pub fn size_of(&self) -> usize {
        match self {
            DataType::Float32 => std::mem::size_of::<f32>(),
            DataType::Float16 => std::mem::size_of::<f16>(),
            DataType::Int32 => std::mem::size_of::<i32>(),
        }
    }

    pub fn is_float(&self) -> bool {
        matches!(self, DataType::Float32 | DataType::Float16)
    }
}
