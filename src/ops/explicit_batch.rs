// CombinedNMS-compatible pose NMS for graphs compiled in explicit batch
// mode. Declared shapes carry the batch as their leading dimension; it
// is stripped before negotiation and prepended to every derived output
// shape.

use std::sync::Arc;

use crate::data::{AttrList, AttrSpec, DataType, PoseNmsParams, TensorDesc};
use crate::error::PluginError;
use crate::kernel::{self, ConstPtr, MutPtr, PoseNmsKernel, StreamHandle};
use crate::ops::graph_op::{ExecutionMode, GraphOperator, OperatorCreator, POSE_NMS_FIELDS};
use crate::ops::invoke;
use crate::ops::negotiation::{self, NUM_INPUTS, NUM_OUTPUTS};
use crate::Result;

pub const EXPLICIT_OPERATOR_NAME: &str = "EfficientPoseNMS_Explicit_TF_TRT";
const OPERATOR_VERSION: &str = "1";

#[derive(Debug, Clone)]
pub struct ExplicitPoseNmsOp {
    params: PoseNmsParams,
    namespace: String,
    kernel: Arc<dyn PoseNmsKernel>,
}

impl ExplicitPoseNmsOp {
    pub fn new(params: PoseNmsParams, kernel: Arc<dyn PoseNmsKernel>) -> ExplicitPoseNmsOp {
        ExplicitPoseNmsOp {
            params,
            namespace: String::new(),
            kernel,
        }
    }

    pub fn from_bytes(image: &[u8], kernel: Arc<dyn PoseNmsKernel>) -> Result<ExplicitPoseNmsOp> {
        Ok(ExplicitPoseNmsOp::new(
            PoseNmsParams::from_bytes(image)?,
            kernel,
        ))
    }

    pub fn params(&self) -> &PoseNmsParams {
        &self.params
    }
}

impl GraphOperator for ExplicitPoseNmsOp {
    fn operator_name(&self) -> &'static str {
        EXPLICIT_OPERATOR_NAME
    }

    fn operator_version(&self) -> &'static str {
        OPERATOR_VERSION
    }

    fn execution_mode(&self) -> ExecutionMode {
        ExecutionMode::Explicit
    }

    fn output_shape(&mut self, slot: usize, input_shapes: &[Vec<i64>]) -> Result<Vec<i64>> {
        let [boxes, scores] = input_shapes else {
            return Err(PluginError::BadTensorCount {
                what: "input",
                expected: NUM_INPUTS,
                got: input_shapes.len(),
            });
        };
        let item_boxes = negotiation::strip_batch("boxes", boxes)?;
        let item_scores = negotiation::strip_batch("scores", scores)?;
        let facts = negotiation::negotiate(item_boxes, item_scores)?;
        negotiation::apply_output_cap(&mut self.params, facts.num_classes);

        let mut dims = vec![boxes[0]];
        dims.extend(negotiation::per_item_output_shape(
            slot,
            self.params.num_output_boxes,
        )?);
        Ok(dims)
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
        let item_boxes = negotiation::strip_batch("boxes", inputs[0].dims())?;
        let item_scores = negotiation::strip_batch("scores", inputs[1].dims())?;
        negotiation::finalize(
            &mut self.params,
            item_boxes,
            item_scores,
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
pub struct ExplicitPoseNmsCreator {
    namespace: String,
    kernel: Arc<dyn PoseNmsKernel>,
}

impl ExplicitPoseNmsCreator {
    pub fn new(kernel: Arc<dyn PoseNmsKernel>) -> ExplicitPoseNmsCreator {
        ExplicitPoseNmsCreator {
            namespace: String::new(),
            kernel,
        }
    }
}

impl OperatorCreator for ExplicitPoseNmsCreator {
    fn operator_name(&self) -> &'static str {
        EXPLICIT_OPERATOR_NAME
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
                let mut op = ExplicitPoseNmsOp::new(params, self.kernel.clone());
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
        match ExplicitPoseNmsOp::from_bytes(image, self.kernel.clone()) {
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
