// CombinedNMS-compatible pose NMS for graphs compiled in implicit batch
// mode. Every shape this operator sees is per batch item.

use std::sync::Arc;

use crate::data::{AttrList, AttrSpec, DataType, PoseNmsParams, TensorDesc};
use crate::error::PluginError;
use crate::kernel::{self, ConstPtr, MutPtr, PoseNmsKernel, StreamHandle};
use crate::ops::graph_op::{ExecutionMode, GraphOperator, OperatorCreator, POSE_NMS_FIELDS};
use crate::ops::invoke;
use crate::ops::negotiation::{self, NUM_INPUTS, NUM_OUTPUTS};
use crate::Result;

pub const IMPLICIT_OPERATOR_NAME: &str = "EfficientPoseNMS_Implicit_TF_TRT";
const OPERATOR_VERSION: &str = "1";

#[derive(Debug, Clone)]
pub struct ImplicitPoseNmsOp {
    params: PoseNmsParams,
    namespace: String,
    kernel: Arc<dyn PoseNmsKernel>,
}

impl ImplicitPoseNmsOp {
    pub fn new(params: PoseNmsParams, kernel: Arc<dyn PoseNmsKernel>) -> ImplicitPoseNmsOp {
        ImplicitPoseNmsOp {
            params,
            namespace: String::new(),
            kernel,
        }
    }

    pub fn from_bytes(image: &[u8], kernel: Arc<dyn PoseNmsKernel>) -> Result<ImplicitPoseNmsOp> {
        Ok(ImplicitPoseNmsOp::new(
            PoseNmsParams::from_bytes(image)?,
            kernel,
        ))
    }

    pub fn params(&self) -> &PoseNmsParams {
        &self.params
    }
}

impl GraphOperator for ImplicitPoseNmsOp {
    fn operator_name(&self) -> &'static str {
        IMPLICIT_OPERATOR_NAME
    }

    fn operator_version(&self) -> &'static str {
        OPERATOR_VERSION
    }

    fn execution_mode(&self) -> ExecutionMode {
        ExecutionMode::Implicit
    }

    fn output_shape(&mut self, slot: usize, input_shapes: &[Vec<i64>]) -> Result<Vec<i64>> {
        let [boxes, scores] = input_shapes else {
            return Err(PluginError::BadTensorCount {
                what: "input",
                expected: NUM_INPUTS,
                got: input_shapes.len(),
            });
        };
        let facts = negotiation::negotiate(boxes, scores)?;
        negotiation::apply_output_cap(&mut self.params, facts.num_classes);
        negotiation::per_item_output_shape(slot, self.params.num_output_boxes)
    }

    fn output_datatype(&self, slot: usize, input_types: &[DataType]) -> DataType {
        let resolved = input_types
            .first()
            .copied()
            .unwrap_or(self.params.element_datatype);
        negotiation::output_datatype(slot, resolved)
    }

    fn supports_format(&self, pos: usize, io: &[TensorDesc]) -> bool {
        negotiation::supports_format(pos, io)
    }

    fn configure(&mut self, inputs: &[TensorDesc], outputs: &[TensorDesc]) -> Result<()> {
        if inputs.len() != NUM_INPUTS {
            return Err(PluginError::BadTensorCount {
                what: "input",
                expected: NUM_INPUTS,
                got: inputs.len(),
            });
        }
        if outputs.len() != NUM_OUTPUTS {
            return Err(PluginError::BadTensorCount {
                what: "output",
                expected: NUM_OUTPUTS,
                got: outputs.len(),
            });
        }
        negotiation::finalize(
            &mut self.params,
            inputs[0].dims(),
            inputs[1].dims(),
            inputs[0].datatype,
        )
    }

    fn workspace_size(&self, batch_size: i32) -> usize {
        kernel::workspace_size(
            batch_size,
            self.params.num_score_elements,
            self.params.num_classes,
            self.params.element_datatype,
        )
    }

    fn invoke(
        &mut self,
        batch_size: i32,
        inputs: &[ConstPtr],
        outputs: &[MutPtr],
        workspace: MutPtr,
        stream: StreamHandle,
    ) -> i32 {
        invoke::launch(
            &mut self.params,
            self.kernel.as_ref(),
            batch_size,
            inputs,
            outputs,
            workspace,
            stream,
        )
    }

    fn serialized_size(&self) -> usize {
        PoseNmsParams::serialized_size()
    }

    fn serialize(&self) -> Vec<u8> {
        self.params.to_bytes()
    }

    fn plugin_namespace(&self) -> &str {
        &self.namespace
    }

    fn set_plugin_namespace(&mut self, namespace: &str) {
        self.namespace = namespace.to_string();
    }

    fn clone_boxed(&self) -> Option<Box<dyn GraphOperator>> {
        Some(Box::new(self.clone()))
    }
}

#[derive(Debug)]
pub struct ImplicitPoseNmsCreator {
    namespace: String,
    kernel: Arc<dyn PoseNmsKernel>,
}

impl ImplicitPoseNmsCreator {
    pub fn new(kernel: Arc<dyn PoseNmsKernel>) -> ImplicitPoseNmsCreator {
        ImplicitPoseNmsCreator {
            namespace: String::new(),
            kernel,
        }
    }
}

impl OperatorCreator for ImplicitPoseNmsCreator {
    fn operator_name(&self) -> &'static str {
        IMPLICIT_OPERATOR_NAME
    }

    fn operator_version(&self) -> &'static str {
        OPERATOR_VERSION
    }

    fn fields(&self) -> &[AttrSpec] {
        &POSE_NMS_FIELDS
    }

    fn create_operator(&self, name: &str, attrs: &AttrList) -> Option<Box<dyn GraphOperator>> {
        match PoseNmsParams::from_attrs(attrs) {
            Ok(params) => {
                let mut op = ImplicitPoseNmsOp::new(params, self.kernel.clone());
                op.set_plugin_namespace(&self.namespace);
                Some(Box::new(op))
            }
            Err(error) => {
                log::error!("Failed to create operator `{}`: {}", name, error);
                None
            }
        }
    }

    fn deserialize_operator(&self, name: &str, image: &[u8]) -> Option<Box<dyn GraphOperator>> {
        match ImplicitPoseNmsOp::from_bytes(image, self.kernel.clone()) {
            Ok(mut op) => {
                op.set_plugin_namespace(&self.namespace);
                Some(Box::new(op))
            }
            Err(error) => {
                log::error!("Failed to deserialize operator `{}`: {}", name, error);
                None
            }
        }
    }

    fn plugin_namespace(&self) -> &str {
        &self.namespace
    }

    fn set_plugin_namespace(&mut self, namespace: &str) {
        self.namespace = namespace.to_string();
    }
}
