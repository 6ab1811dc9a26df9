use crate::data::{AttrKind, AttrList, AttrSpec, DataType, TensorDesc};
use crate::kernel::{ConstPtr, MutPtr, StreamHandle};
use crate::ops::negotiation::NUM_OUTPUTS;
use crate::Result;

/// Batch handling contract an operator was compiled for. Implicit graphs
/// carry the batch outside the declared shapes, explicit graphs make it
/// the leading dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    Implicit,
    Explicit,
}

impl ExecutionMode {
    pub fn from_str(mode: &str) -> Option<ExecutionMode> {
        match mode.to_lowercase().as_str() {
            "implicit" => Some(ExecutionMode::Implicit),
            "explicit" => Some(ExecutionMode::Explicit),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionMode::Implicit => "Implicit",
            ExecutionMode::Explicit => "Explicit",
        }
    }
}

/// Attribute schema shared by both pose NMS creators.
pub(crate) const POSE_NMS_FIELDS: [AttrSpec; 6] = [
    AttrSpec {
        name: "max_output_size_per_class",
        kind: AttrKind::Int32,
    },
    AttrSpec {
        name: "max_total_size",
        kind: AttrKind::Int32,
    },
    AttrSpec {
        name: "iou_threshold",
        kind: AttrKind::Float32,
    },
    AttrSpec {
        name: "score_threshold",
        kind: AttrKind::Float32,
    },
    AttrSpec {
        name: "pad_per_class",
        kind: AttrKind::Int32,
    },
    AttrSpec {
        name: "clip_boxes",
        kind: AttrKind::Int32,
    },
];

/// Host-facing surface of one compiled-graph operator.
///
/// The compiler drives negotiation through this trait: format probing,
/// output shape and type queries, one `configure` call once everything
/// is resolved, then `invoke` per inference step.
pub trait GraphOperator: Send {
    /// Registered operator name.
    fn operator_name(&self) -> &'static str;

    /// Registered operator version.
    fn operator_version(&self) -> &'static str;

    fn execution_mode(&self) -> ExecutionMode;

    fn num_outputs(&self) -> usize {
        NUM_OUTPUTS
    }

    /// Shape of one output slot for the given candidate input shapes.
    /// May be called repeatedly while the compiler explores candidates.
    fn output_shape(&mut self, slot: usize, input_shapes: &[Vec<i64>]) -> Result<Vec<i64>>;

    /// Element type of one output slot given the resolved input types.
    fn output_datatype(&self, slot: usize, input_types: &[DataType]) -> DataType;

    /// Whether the descriptor at `pos` is acceptable within the whole
    /// candidate array. Must answer the same for the same arguments.
    fn supports_format(&self, pos: usize, io: &[TensorDesc]) -> bool;

    /// Finalizes the parameter record against the resolved descriptors.
    fn configure(&mut self, inputs: &[TensorDesc], outputs: &[TensorDesc]) -> Result<()>;

    /// Scratch bytes one launch needs at the given batch size.
    fn workspace_size(&self, batch_size: i32) -> usize;

    /// Dispatches one launch. Returns the kernel status, negative on
    /// failure; this call never unwinds into the host.
    fn invoke(
        &mut self,
        batch_size: i32,
        inputs: &[ConstPtr],
        outputs: &[MutPtr],
        workspace: MutPtr,
        stream: StreamHandle,
    ) -> i32;

    fn serialized_size(&self) -> usize;

    /// Persistable image of the parameter record.
    fn serialize(&self) -> Vec<u8>;

    fn plugin_namespace(&self) -> &str;

    fn set_plugin_namespace(&mut self, namespace: &str);

    /// Independent copy with no shared mutable state, or `None` if one
    /// cannot be built.
    fn clone_boxed(&self) -> Option<Box<dyn GraphOperator>>;
}

/// Factory the registry hands out for one (name, version) pair.
pub trait OperatorCreator: Send + Sync {
    fn operator_name(&self) -> &'static str;

    fn operator_version(&self) -> &'static str;

    /// Attribute schema this creator understands.
    fn fields(&self) -> &[AttrSpec];

    /// Builds a fresh operator from creation attributes. Returns `None`
    /// and logs the cause when the attributes do not validate.
    fn create_operator(&self, name: &str, attrs: &AttrList) -> Option<Box<dyn GraphOperator>>;

    /// Restores an operator from a serialized parameter image. Returns
    /// `None` and logs the cause when the image does not parse.
    fn deserialize_operator(&self, name: &str, image: &[u8]) -> Option<Box<dyn GraphOperator>>;

    fn plugin_namespace(&self) -> &str;

    /// Namespace applied to every operator this creator builds. Set it
    /// before registering.
    fn set_plugin_namespace(&mut self, namespace: &str);
}
