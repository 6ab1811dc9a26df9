mod mock;

use std::ptr;
use std::sync::Arc;

use ndarray::{Array1, Array2};

use efficient_pose_nms::data::{DataType, PoseNmsParams, TensorDesc};
use efficient_pose_nms::kernel::{self, ConstPtr, MutPtr, PoseNmsKernel};
use efficient_pose_nms::ops::{ExplicitPoseNmsOp, GraphOperator, ImplicitPoseNmsOp};

use crate::mock::{PanickingKernel, RecordingKernel};

struct LaunchBuffers {
    boxes: Array2<f32>,
    scores: Array2<f32>,
    num_detections: Array1<i32>,
    boxes_out: Array2<f32>,
    scores_out: Array1<f32>,
    classes_out: Array1<i32>,
    workspace: Vec<u8>,
}

impl LaunchBuffers {
    fn new(num_anchors: usize, num_classes: usize, num_output_boxes: usize, workspace: usize) -> LaunchBuffers {
        LaunchBuffers {
            boxes: Array2::zeros((num_anchors, 4)),
            scores: Array2::zeros((num_anchors, num_classes)),
            num_detections: Array1::zeros(1),
            boxes_out: Array2::zeros((num_output_boxes, 4)),
            scores_out: Array1::zeros(num_output_boxes),
            classes_out: Array1::zeros(num_output_boxes),
            workspace: vec![0u8; workspace],
        }
    }

    fn inputs(&self) -> [ConstPtr; 2] {
        [
            self.boxes.as_ptr() as ConstPtr,
            self.scores.as_ptr() as ConstPtr,
        ]
    }

    fn outputs(&mut self) -> [MutPtr; 4] {
        [
            self.num_detections.as_mut_ptr() as MutPtr,
            self.boxes_out.as_mut_ptr() as MutPtr,
            self.scores_out.as_mut_ptr() as MutPtr,
            self.classes_out.as_mut_ptr() as MutPtr,
        ]
    }

    fn workspace_ptr(&mut self) -> MutPtr {
        self.workspace.as_mut_ptr() as MutPtr
    }
}

fn configured_op(kernel: Arc<dyn PoseNmsKernel>) -> ImplicitPoseNmsOp {
    let params = PoseNmsParams::new().with_max_total_size(100);
    let mut op = ImplicitPoseNmsOp::new(params, kernel);
    let inputs = vec![
        TensorDesc::linear(&[1000, 4], DataType::Float32),
        TensorDesc::linear(&[1000, 20], DataType::Float32),
    ];
    let outputs = vec![
        TensorDesc::linear(&[], DataType::Int32),
        TensorDesc::linear(&[100, 4], DataType::Float32),
        TensorDesc::linear(&[100], DataType::Float32),
        TensorDesc::linear(&[100], DataType::Int32),
    ];
    op.configure(&inputs, &outputs).unwrap();
    op
}

#[test]
fn launch_marshals_the_buffer_bundle() {
    let kernel = Arc::new(RecordingKernel::new());
    let mut op = configured_op(kernel.clone());
    let mut buffers = LaunchBuffers::new(1000, 20, 100, op.workspace_size(1));

    let status = op.invoke(
        1,
        &buffers.inputs(),
        &buffers.outputs(),
        buffers.workspace_ptr(),
        ptr::null_mut(),
    );
    assert_eq!(status, 0);
    assert_eq!(kernel.launch_count(), 1);

    let record = kernel.last_launch().unwrap();
    assert!(!record.boxes_is_null);
    assert!(!record.scores_is_null);
    assert!(!record.workspace_is_null);
    assert!(record.anchors_is_null);
    assert!(record.keypoints_is_null);
    assert!(record.indices_flag_is_null);
    assert_eq!(record.params.batch_size, 1);
    assert_eq!(record.params.num_classes, 20);
    assert_eq!(record.params.num_anchors, 1000);
}

#[test]
fn batch_size_is_refreshed_every_launch() {
    let kernel = Arc::new(RecordingKernel::new());
    let mut op = configured_op(kernel.clone());
    let mut buffers = LaunchBuffers::new(1000, 20, 100, op.workspace_size(4));

    for batch_size in [1, 4, 2] {
        op.invoke(
            batch_size,
            &buffers.inputs(),
            &buffers.outputs(),
            buffers.workspace_ptr(),
            ptr::null_mut(),
        );
        assert_eq!(kernel.last_launch().unwrap().params.batch_size, batch_size);
        assert_eq!(op.params().batch_size, batch_size);
    }
}

#[test]
fn kernel_status_passes_through_verbatim() {
    for status in [0, 7, -5] {
        let kernel = Arc::new(RecordingKernel::with_status(status));
        let mut op = configured_op(kernel.clone());
        let mut buffers = LaunchBuffers::new(1000, 20, 100, op.workspace_size(1));

        let got = op.invoke(
            1,
            &buffers.inputs(),
            &buffers.outputs(),
            buffers.workspace_ptr(),
            ptr::null_mut(),
        );
        assert_eq!(got, status);
    }
}

#[test]
fn panicking_kernel_becomes_a_negative_status() {
    let mut op = configured_op(Arc::new(PanickingKernel));
    let mut buffers = LaunchBuffers::new(1000, 20, 100, op.workspace_size(1));

    let status = op.invoke(
        1,
        &buffers.inputs(),
        &buffers.outputs(),
        buffers.workspace_ptr(),
        ptr::null_mut(),
    );
    assert!(status < 0);
}

#[test]
fn short_buffer_lists_fail_without_launching() {
    let kernel = Arc::new(RecordingKernel::new());
    let mut op = configured_op(kernel.clone());
    let mut buffers = LaunchBuffers::new(1000, 20, 100, op.workspace_size(1));

    let status = op.invoke(
        1,
        &buffers.inputs()[..1],
        &buffers.outputs(),
        buffers.workspace_ptr(),
        ptr::null_mut(),
    );
    assert!(status < 0);

    let status = op.invoke(
        1,
        &buffers.inputs(),
        &buffers.outputs()[..3],
        buffers.workspace_ptr(),
        ptr::null_mut(),
    );
    assert!(status < 0);
    assert_eq!(kernel.launch_count(), 0);
}

#[test]
fn explicit_variant_launches_the_same_way() {
    let kernel = Arc::new(RecordingKernel::new());
    let params = PoseNmsParams::new().with_max_total_size(100);
    let mut op = ExplicitPoseNmsOp::new(params, kernel.clone());
    let inputs = vec![
        TensorDesc::linear(&[4, 1000, 4], DataType::Float32),
        TensorDesc::linear(&[4, 1000, 20], DataType::Float32),
    ];
    let outputs = vec![
        TensorDesc::linear(&[4], DataType::Int32),
        TensorDesc::linear(&[4, 100, 4], DataType::Float32),
        TensorDesc::linear(&[4, 100], DataType::Float32),
        TensorDesc::linear(&[4, 100], DataType::Int32),
    ];
    op.configure(&inputs, &outputs).unwrap();

    let mut buffers = LaunchBuffers::new(1000, 20, 100, op.workspace_size(4));
    let status = op.invoke(
        4,
        &buffers.inputs(),
        &buffers.outputs(),
        buffers.workspace_ptr(),
        ptr::null_mut(),
    );
    assert_eq!(status, 0);

    let record = kernel.last_launch().unwrap();
    assert_eq!(record.params.batch_size, 4);
    assert!(record.anchors_is_null);
    assert!(record.keypoints_is_null);
}

#[test]
fn workspace_is_aligned_and_monotone() {
    let sizes: Vec<usize> = [1, 2, 4, 8]
        .iter()
        .map(|&batch| kernel::workspace_size(batch, 20000, 20, DataType::Float32))
        .collect();
    println!("workspace sizes: {:?}", sizes);

    for size in &sizes {
        assert_eq!(size % 256, 0);
    }
    for pair in sizes.windows(2) {
        assert!(pair[0] < pair[1]);
    }

    let more_elements = kernel::workspace_size(1, 40000, 20, DataType::Float32);
    assert!(more_elements > kernel::workspace_size(1, 20000, 20, DataType::Float32));

    let more_classes = kernel::workspace_size(1, 20000, 40, DataType::Float32);
    assert!(more_classes >= kernel::workspace_size(1, 20000, 20, DataType::Float32));
}

#[test]
fn half_precision_needs_no_more_workspace() {
    let half = kernel::workspace_size(1, 20000, 20, DataType::Float16);
    let full = kernel::workspace_size(1, 20000, 20, DataType::Float32);
    assert!(half <= full);
}

#[test]
fn configured_workspace_matches_the_free_function() {
    let op = configured_op(Arc::new(RecordingKernel::new()));
    assert_eq!(
        op.workspace_size(2),
        kernel::workspace_size(2, 20000, 20, DataType::Float32)
    );
}
