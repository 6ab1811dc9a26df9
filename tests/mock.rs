use parking_lot::Mutex;

use efficient_pose_nms::data::PoseNmsParams;
use efficient_pose_nms::kernel::{LaunchArgs, PoseNmsKernel};

/// What one launch saw, with the raw pointers reduced to null checks.
#[derive(Debug, Clone, Copy)]
pub struct LaunchRecord {
    pub params: PoseNmsParams,
    pub boxes_is_null: bool,
    pub scores_is_null: bool,
    pub anchors_is_null: bool,
    pub keypoints_is_null: bool,
    pub indices_flag_is_null: bool,
    pub workspace_is_null: bool,
}

/// Test double standing in for the compiled NMS kernel.
#[derive(Debug)]
pub struct RecordingKernel {
    pub status: i32,
    pub launches: Mutex<Vec<LaunchRecord>>,
}

impl RecordingKernel {
    pub fn new() -> RecordingKernel {
        RecordingKernel::with_status(0)
    }

    pub fn with_status(status: i32) -> RecordingKernel {
        RecordingKernel {
            status,
            launches: Mutex::new(Vec::new()),
        }
    }

    pub fn launch_count(&self) -> usize {
        self.launches.lock().len()
    }

    pub fn last_launch(&self) -> Option<LaunchRecord> {
        self.launches.lock().last().copied()
    }
}

impl PoseNmsKernel for RecordingKernel {
    fn launch(&self, params: &PoseNmsParams, args: &LaunchArgs) -> i32 {
        self.launches.lock().push(LaunchRecord {
            params: *params,
            boxes_is_null: args.boxes.is_null(),
            scores_is_null: args.scores.is_null(),
            anchors_is_null: args.anchors.is_null(),
            keypoints_is_null: args.keypoints_out.is_null(),
            indices_flag_is_null: args.indices_flag.is_null(),
            workspace_is_null: args.workspace.is_null(),
        });
        self.status
    }
}

/// Kernel that always unwinds, for the boundary conversion tests.
#[derive(Debug)]
pub struct PanickingKernel;

impl PoseNmsKernel for PanickingKernel {
    fn launch(&self, _params: &PoseNmsParams, _args: &LaunchArgs) -> i32 {
        panic!("kernel launch exploded");
    }
}
