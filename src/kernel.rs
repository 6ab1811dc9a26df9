use std::ffi::c_void;
use std::ptr;

use crate::data::{DataType, PoseNmsParams};
use crate::utils::align_up;

pub const STATUS_SUCCESS: i32 = 0;
pub const STATUS_FAILURE: i32 = -1;

pub type ConstPtr = *const c_void;
pub type MutPtr = *mut c_void;

/// Opaque handle of the execution stream the launch is queued on.
pub type StreamHandle = *mut c_void;

// Scratch buffers are carved out of one workspace allocation at this
// granularity.
const WORKSPACE_ALIGN: usize = 256;

/// Raw buffer bundle for one kernel launch.
///
/// The operators never produce keypoints, decoded anchors or index
/// output, so `anchors`, `keypoints_out` and `indices_flag` are always
/// null when the adapter builds this.
#[derive(Debug, Clone, Copy)]
pub struct LaunchArgs {
    pub boxes: ConstPtr,
    pub scores: ConstPtr,
    pub anchors: ConstPtr,
    pub num_detections_out: MutPtr,
    pub boxes_out: MutPtr,
    pub keypoints_out: MutPtr,
    pub scores_out: MutPtr,
    pub classes_out: MutPtr,
    pub indices_flag: MutPtr,
    pub workspace: MutPtr,
    pub stream: StreamHandle,
}

impl Default for LaunchArgs {
    fn default() -> Self {
        LaunchArgs {
            boxes: ptr::null(),
            scores: ptr::null(),
            anchors: ptr::null(),
            num_detections_out: ptr::null_mut(),
            boxes_out: ptr::null_mut(),
            keypoints_out: ptr::null_mut(),
            scores_out: ptr::null_mut(),
            classes_out: ptr::null_mut(),
            indices_flag: ptr::null_mut(),
            workspace: ptr::null_mut(),
            stream: ptr::null_mut(),
        }
    }
}

/// Compiled pose NMS kernel the operators dispatch to.
///
/// Implementations interpret every pointer in [`LaunchArgs`] according to
/// `params` and report completion through the returned status code, zero
/// for success and negative for failure. They must not unwind; a panic
/// that escapes anyway is caught at the invocation boundary.
pub trait PoseNmsKernel: std::fmt::Debug + Send + Sync + 'static {
    fn launch(&self, params: &PoseNmsParams, args: &LaunchArgs) -> i32;
}

/// Scratch space one launch needs, per batch of score elements.
///
/// Covers the filter counters plus the sort and selection buffers: four
/// per-element index arrays and two per-element score arrays, each padded
/// to the workspace granularity. Monotone in every argument.
pub fn workspace_size(
    batch_size: i32,
    num_score_elements: i32,
    num_classes: i32,
    datatype: DataType,
) -> usize {
    let batch = batch_size.max(0) as usize;
    let elements = num_score_elements.max(0) as usize;
    let classes = num_classes.max(0) as usize;

    // 3 filter counters, 1 output cursor and one per-class cap counter
    // for every batch item
    let counters = (3 + 1 + classes) * batch * std::mem::size_of::<i32>();
    let index_buffer = batch * elements * std::mem::size_of::<i32>();
    let score_buffer = batch * elements * datatype.size_of();

    let mut total = align_up(counters, WORKSPACE_ALIGN);
    total += 4 * align_up(index_buffer, WORKSPACE_ALIGN);
    total += 2 * align_up(score_buffer, WORKSPACE_ALIGN);
    total
}
