use serde::{Deserialize, Serialize};

use crate::data::{DataType, TensorLayout};

/// Declared shape, element type and memory layout of one tensor slot, as
/// the graph compiler presents it during negotiation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TensorDesc {
    pub dims: Vec<i64>,
    pub datatype: DataType,
    pub layout: TensorLayout,
}

impl TensorDesc {
    pub fn new(dims: &[i64], datatype: DataType, layout: TensorLayout) -> TensorDesc {
        TensorDesc {
            dims: dims.to_vec(),
            datatype,
            layout,
        }
    }

    /// Dense row-major descriptor, the only layout the operators accept.
    pub fn linear(dims: &[i64], datatype: DataType) -> TensorDesc {
        TensorDesc::new(dims, datatype, TensorLayout::Linear)
    }

    pub fn with_layout(mut self, layout: TensorLayout) -> TensorDesc {
        self.layout = layout;
        self
    }

    pub fn dims(&self) -> &[i64] {
        &self.dims
    }

    pub fn rank(&self) -> usize {
        self.dims.len()
    }
}
