use efficient_pose_nms::data::{DataType, TensorDesc, TensorLayout};
use efficient_pose_nms::ops::negotiation::supports_format;

// slot order: boxes, scores, count, boxes out, scores out, classes out
fn candidate_io(float_type: DataType) -> Vec<TensorDesc> {
    vec![
        TensorDesc::linear(&[1000, 4], float_type),
        TensorDesc::linear(&[1000, 20], float_type),
        TensorDesc::linear(&[], DataType::Int32),
        TensorDesc::linear(&[100, 4], float_type),
        TensorDesc::linear(&[100], float_type),
        TensorDesc::linear(&[100], DataType::Int32),
    ]
}

#[test]
fn accepts_the_canonical_combination() {
    for float_type in [DataType::Float32, DataType::Float16] {
        let io = candidate_io(float_type);
        for pos in 0..io.len() {
            assert!(
                supports_format(pos, &io),
                "pos {} rejected for {}",
                pos,
                float_type.as_str()
            );
        }
    }
}

#[test]
fn rejects_packed_layouts_on_every_slot() {
    for layout in [TensorLayout::ChannelPacked2, TensorLayout::ChannelPacked4] {
        for pos in 0..6 {
            let mut io = candidate_io(DataType::Float32);
            io[pos] = io[pos].clone().with_layout(layout);
            assert!(!supports_format(pos, &io), "pos {} accepted {:?}", pos, layout);
        }
    }
}

#[test]
fn count_and_class_slots_require_int32() {
    for pos in [2usize, 5] {
        let mut io = candidate_io(DataType::Float32);
        io[pos].datatype = DataType::Float32;
        assert!(!supports_format(pos, &io));

        let io = candidate_io(DataType::Float32);
        assert!(supports_format(pos, &io));
    }
}

#[test]
fn float_slots_reject_int32() {
    for pos in [0usize, 1, 3, 4] {
        let mut io = candidate_io(DataType::Float32);
        io[pos].datatype = DataType::Int32;
        assert!(!supports_format(pos, &io));
    }
}

#[test]
fn float_slots_follow_the_boxes_width() {
    // boxes resolved to half precision, a full precision candidate on
    // any other float slot has to be rejected
    for pos in [1usize, 3, 4] {
        let mut io = candidate_io(DataType::Float16);
        io[pos].datatype = DataType::Float32;
        assert!(!supports_format(pos, &io));

        let io = candidate_io(DataType::Float16);
        assert!(supports_format(pos, &io));
    }
}

#[test]
fn out_of_range_positions_answer_false() {
    let io = candidate_io(DataType::Float32);
    assert!(!supports_format(6, &io));
    assert!(!supports_format(100, &io));

    let mut longer = candidate_io(DataType::Float32);
    longer.push(TensorDesc::linear(&[1], DataType::Float32));
    assert!(!supports_format(6, &longer));

    assert!(!supports_format(0, &[]));
}

#[test]
fn answers_are_stable_across_probes() {
    let io = candidate_io(DataType::Float16);
    for pos in 0..io.len() {
        let first = supports_format(pos, &io);
        let second = supports_format(pos, &io);
        assert_eq!(first, second);
    }
}
