use crate::data::{DataType, PoseNmsParams, TensorDesc, TensorLayout};
use crate::error::PluginError;
use crate::Result;

pub(crate) const NUM_INPUTS: usize = 2;
pub(crate) const NUM_OUTPUTS: usize = 4;

/// Facts derived from the declared boxes and scores shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeFacts {
    pub num_classes: i32,
    pub num_anchors: i32,
    pub num_box_elements: i32,
    pub num_score_elements: i32,
    pub share_location: bool,
}

/// Derives the shape facts from per-item input shapes.
///
/// Scores must be `[anchors, classes]`, optionally with a trailing
/// singleton. Boxes are either `[anchors, 4]`, which shares one box
/// across all classes, or `[anchors, classes, 4]` with one box per
/// class; a singleton class dimension shares as well. The anchor count
/// is taken from the boxes tensor.
pub fn negotiate(boxes: &[i64], scores: &[i64]) -> Result<ShapeFacts> {
    let (score_anchors, num_classes) = match *scores {
        [anchors, classes] => (anchors, classes),
        [anchors, classes, 1] => (anchors, classes),
        [_, _, trailing] => return Err(PluginError::BadScoreTrailingDim { got: trailing }),
        _ => {
            return Err(PluginError::UnsupportedRank {
                tensor: "scores",
                rank: scores.len(),
                expected: "2 or 3",
            })
        }
    };
    check_positive("scores", 0, score_anchors)?;
    check_positive("scores", 1, num_classes)?;

    let (num_anchors, share_location, num_box_elements) = match *boxes {
        [anchors, 4] => (anchors, true, anchors * 4),
        [_, inner] => return Err(PluginError::BadBoxInnerDim { got: inner }),
        [anchors, class_dim, 4] => {
            if class_dim != 1 && class_dim != num_classes {
                return Err(PluginError::ClassDimMismatch {
                    got: class_dim,
                    num_classes,
                });
            }
            (anchors, class_dim == 1, anchors * class_dim * 4)
        }
        [_, _, inner] => return Err(PluginError::BadBoxInnerDim { got: inner }),
        _ => {
            return Err(PluginError::UnsupportedRank {
                tensor: "boxes",
                rank: boxes.len(),
                expected: "2 or 3",
            })
        }
    };
    check_positive("boxes", 0, num_anchors)?;

    Ok(ShapeFacts {
        num_classes: num_classes as i32,
        num_anchors: num_anchors as i32,
        num_box_elements: num_box_elements as i32,
        num_score_elements: (score_anchors * num_classes) as i32,
        share_location,
    })
}

/// Drops the leading batch dimension of an explicit-batch shape.
pub(crate) fn strip_batch<'a>(tensor: &'static str, dims: &'a [i64]) -> Result<&'a [i64]> {
    match dims {
        [_batch, rest @ ..] if rest.len() >= 2 => Ok(rest),
        _ => Err(PluginError::UnsupportedRank {
            tensor,
            rank: dims.len(),
            expected: "3 or 4",
        }),
    }
}

/// Tightens the total output cap to `per_class * classes` when per-class
/// padding is requested. The cap never loosens once tightened.
pub(crate) fn apply_output_cap(params: &mut PoseNmsParams, num_classes: i32) {
    if params.pad_output_boxes_per_class && params.num_output_boxes_per_class > 0 {
        let per_class_total = params.num_output_boxes_per_class * num_classes;
        if per_class_total < params.num_output_boxes {
            params.num_output_boxes = per_class_total;
        }
    }
}

/// Per-item shape of one output slot: detection count, selected boxes,
/// their scores and their class indexes.
pub(crate) fn per_item_output_shape(slot: usize, num_output_boxes: i32) -> Result<Vec<i64>> {
    match slot {
        0 => Ok(vec![]),
        1 => Ok(vec![num_output_boxes as i64, 4]),
        2 | 3 => Ok(vec![num_output_boxes as i64]),
        _ => Err(PluginError::BadOutputSlot {
            slot,
            num_outputs: NUM_OUTPUTS,
        }),
    }
}

/// The detection count and class index outputs are always Int32, the
/// rest inherit the boxes input type.
pub fn output_datatype(slot: usize, input_type: DataType) -> DataType {
    if slot == 0 || slot == 3 {
        return DataType::Int32;
    }
    input_type
}

/// Accepts or rejects one candidate slot descriptor against the whole
/// candidate array. Out-of-range positions and unknown layouts answer
/// `false` rather than failing.
pub fn supports_format(pos: usize, io: &[TensorDesc]) -> bool {
    let Some(desc) = io.get(pos) else {
        return false;
    };
    if pos >= NUM_INPUTS + NUM_OUTPUTS {
        return false;
    }
    if desc.layout != TensorLayout::Linear {
        return false;
    }

    // detection count and class index outputs
    if pos == NUM_INPUTS || pos == NUM_INPUTS + 3 {
        return desc.datatype == DataType::Int32;
    }

    // every other slot follows the float width resolved for the boxes
    // input
    let Some(boxes) = io.first() else {
        return false;
    };
    desc.datatype.is_float() && desc.datatype == boxes.datatype
}

/// Folds negotiated facts into the parameter record. Both operator
/// variants funnel their `configure` through here with per-item shapes.
pub(crate) fn finalize(
    params: &mut PoseNmsParams,
    boxes: &[i64],
    scores: &[i64],
    datatype: DataType,
) -> Result<()> {
    let facts = negotiate(boxes, scores)?;

    params.element_datatype = datatype;
    params.num_classes = facts.num_classes;
    params.num_anchors = facts.num_anchors;
    params.num_box_elements = facts.num_box_elements;
    params.num_score_elements = facts.num_score_elements;
    params.share_location = facts.share_location;
    // two inputs and no anchor tensor, box decoding stays off
    params.box_decoder = false;
    apply_output_cap(params, facts.num_classes);

    log::debug!(
        "Configured pose NMS: classes={} anchors={} share_location={} output_boxes={} datatype={}",
        params.num_classes,
        params.num_anchors,
        params.share_location,
        params.num_output_boxes,
        params.element_datatype.as_str()
    );
    Ok(())
}

fn check_positive(tensor: &'static str, dim: usize, got: i64) -> Result<()> {
    if got <= 0 {
        return Err(PluginError::NonPositiveDim { tensor, dim, got });
    }
    Ok(())
}
