use std::panic::{self, AssertUnwindSafe};
use std::ptr;

use crate::data::PoseNmsParams;
use crate::kernel::{ConstPtr, LaunchArgs, MutPtr, PoseNmsKernel, StreamHandle, STATUS_FAILURE};
use crate::ops::negotiation::{NUM_INPUTS, NUM_OUTPUTS};

/// Marshals one invocation into a kernel launch.
///
/// Refreshes the batch size in the parameter record, wires the two input
/// and four output buffers and passes the kernel status through verbatim.
/// Anything that unwinds in between is converted to a failure status at
/// this boundary, it never crosses into the host.
pub(crate) fn launch(
    params: &mut PoseNmsParams,
    kernel: &dyn PoseNmsKernel,
    batch_size: i32,
    inputs: &[ConstPtr],
    outputs: &[MutPtr],
    workspace: MutPtr,
    stream: StreamHandle,
) -> i32 {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        params.batch_size = batch_size;

        if inputs.len() != NUM_INPUTS {
            log::error!(
                "Pose NMS launch expects {} input buffers, got {}",
                NUM_INPUTS,
                inputs.len()
            );
            return STATUS_FAILURE;
        }
        if outputs.len() != NUM_OUTPUTS {
            log::error!(
                "Pose NMS launch expects {} output buffers, got {}",
                NUM_OUTPUTS,
                outputs.len()
            );
            return STATUS_FAILURE;
        }

        let args = LaunchArgs {
            boxes: inputs[0],
            scores: inputs[1],
            anchors: ptr::null(),
            num_detections_out: outputs[0],
            boxes_out: outputs[1],
            keypoints_out: ptr::null_mut(),
            scores_out: outputs[2],
            classes_out: outputs[3],
            indices_flag: ptr::null_mut(),
            workspace,
            stream,
        };
        kernel.launch(params, &args)
    }));

    match outcome {
        Ok(status) => status,
        Err(panic) => {
            let message = panic
                .downcast_ref::<&str>()
                .map(|message| message.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            log::error!("Pose NMS kernel launch panicked: {}", message);
            STATUS_FAILURE
        }
    }
}
