use serde::{Deserialize, Serialize};

use crate::data::{AttrList, DataType};
use crate::error::PluginError;
use crate::Result;

// 14 fields, 4 bytes each, little endian, in declaration order. Bools are
// stored as 0/1 i32 and the datatype as its stable code.
const SERIALIZED_SIZE: usize = 14 * 4;

/// Complete parameter record for one pose NMS operator instance.
///
/// The first block mirrors the creation attributes, the second holds the
/// facts derived from the declared tensor shapes. Derived fields keep
/// their -1 sentinel until `configure` has run; `batch_size` is refreshed
/// on every invocation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PoseNmsParams {
    pub num_output_boxes_per_class: i32,
    pub num_output_boxes: i32,
    pub iou_threshold: f32,
    pub score_threshold: f32,
    pub pad_output_boxes_per_class: bool,
    pub clip_boxes: bool,
    pub share_location: bool,
    pub box_decoder: bool,
    pub num_classes: i32,
    pub num_anchors: i32,
    pub num_box_elements: i32,
    pub num_score_elements: i32,
    pub batch_size: i32,
    pub element_datatype: DataType,
}

impl Default for PoseNmsParams {
    fn default() -> Self {
        PoseNmsParams {
            num_output_boxes_per_class: -1,
            num_output_boxes: 100,
            iou_threshold: 0.5,
            score_threshold: 0.5,
            pad_output_boxes_per_class: false,
            clip_boxes: false,
            share_location: true,
            box_decoder: false,
            num_classes: 1,
            num_anchors: -1,
            num_box_elements: -1,
            num_score_elements: -1,
            batch_size: -1,
            element_datatype: DataType::Float32,
        }
    }
}

#[allow(dead_code)]
impl PoseNmsParams {
    pub fn new() -> PoseNmsParams {
        Default::default()
    }

    pub fn with_max_output_size_per_class(mut self, count: i32) -> PoseNmsParams {
        self.num_output_boxes_per_class = count;
        self
    }

    pub fn with_max_total_size(mut self, count: i32) -> PoseNmsParams {
        self.num_output_boxes = count;
        self
    }

    pub fn with_iou_threshold(mut self, threshold: f32) -> PoseNmsParams {
        self.iou_threshold = threshold;
        self
    }

    pub fn with_score_threshold(mut self, threshold: f32) -> PoseNmsParams {
        self.score_threshold = threshold;
        self
    }

    pub fn with_pad_per_class(mut self, pad: bool) -> PoseNmsParams {
        self.pad_output_boxes_per_class = pad;
        self
    }

    pub fn with_clip_boxes(mut self, clip: bool) -> PoseNmsParams {
        self.clip_boxes = clip;
        self
    }
}

impl PoseNmsParams {
    /// Builds a record from a creation attribute list. Starts from the
    /// defaults, applies the six recognized attributes and validates the
    /// result. Unrecognized names are ignored.
    pub fn from_attrs(attrs: &AttrList) -> Result<PoseNmsParams> {
        let mut params = PoseNmsParams::default();

        if let Some(count) = attrs.get_int32("max_output_size_per_class")? {
            params.num_output_boxes_per_class = count;
        }
        if let Some(count) = attrs.get_int32("max_total_size")? {
            params.num_output_boxes = count;
        }
        if let Some(threshold) = attrs.get_float32("iou_threshold")? {
            params.iou_threshold = threshold;
        }
        if let Some(threshold) = attrs.get_float32("score_threshold")? {
            params.score_threshold = threshold;
        }
        if let Some(pad) = attrs.get_int32("pad_per_class")? {
            params.pad_output_boxes_per_class = pad != 0;
        }
        if let Some(clip) = attrs.get_int32("clip_boxes")? {
            params.clip_boxes = clip != 0;
        }

        params.validate()?;
        Ok(params)
    }

    /// Checks the attribute-driven fields. A non-positive per-class count
    /// is allowed, it disables the per-class output cap.
    pub fn validate(&self) -> Result<()> {
        if self.num_output_boxes <= 0 {
            return Err(PluginError::AttrOutOfRange {
                name: "max_total_size".to_string(),
                reason: format!("must be positive, got {}", self.num_output_boxes),
            });
        }
        if !(self.iou_threshold > 0.0 && self.iou_threshold <= 1.0) {
            return Err(PluginError::AttrOutOfRange {
                name: "iou_threshold".to_string(),
                reason: format!("must be in (0, 1], got {}", self.iou_threshold),
            });
        }
        if !(self.score_threshold >= 0.0 && self.score_threshold <= 1.0) {
            return Err(PluginError::AttrOutOfRange {
                name: "score_threshold".to_string(),
                reason: format!("must be in [0, 1], got {}", self.score_threshold),
            });
        }
        Ok(())
    }

    pub const fn serialized_size() -> usize {
        SERIALIZED_SIZE
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut image = Vec::with_capacity(SERIALIZED_SIZE);
        put_i32(&mut image, self.num_output_boxes_per_class);
        put_i32(&mut image, self.num_output_boxes);
        put_f32(&mut image, self.iou_threshold);
        put_f32(&mut image, self.score_threshold);
        put_bool(&mut image, self.pad_output_boxes_per_class);
        put_bool(&mut image, self.clip_boxes);
        put_bool(&mut image, self.share_location);
        put_bool(&mut image, self.box_decoder);
        put_i32(&mut image, self.num_classes);
        put_i32(&mut image, self.num_anchors);
        put_i32(&mut image, self.num_box_elements);
        put_i32(&mut image, self.num_score_elements);
        put_i32(&mut image, self.batch_size);
        put_i32(&mut image, self.element_datatype.code());
        image
    }

    /// Restores a record from a serialized image, bit for bit. The image
    /// must be exactly [`serialized_size`](Self::serialized_size) bytes.
    pub fn from_bytes(image: &[u8]) -> Result<PoseNmsParams> {
        if image.len() != SERIALIZED_SIZE {
            return Err(PluginError::BadImageLength {
                expected: SERIALIZED_SIZE,
                got: image.len(),
            });
        }

        let mut pos = 0usize;
        let num_output_boxes_per_class = read_i32(image, &mut pos);
        let num_output_boxes = read_i32(image, &mut pos);
        let iou_threshold = read_f32(image, &mut pos);
        let score_threshold = read_f32(image, &mut pos);
        let pad_output_boxes_per_class = read_bool(image, &mut pos)?;
        let clip_boxes = read_bool(image, &mut pos)?;
        let share_location = read_bool(image, &mut pos)?;
        let box_decoder = read_bool(image, &mut pos)?;
        let num_classes = read_i32(image, &mut pos);
        let num_anchors = read_i32(image, &mut pos);
        let num_box_elements = read_i32(image, &mut pos);
        let num_score_elements = read_i32(image, &mut pos);
        let batch_size = read_i32(image, &mut pos);
        let code = read_i32(image, &mut pos);
        let element_datatype =
            DataType::from_code(code).ok_or(PluginError::BadDatatypeCode { code })?;

        Ok(PoseNmsParams {
            num_output_boxes_per_class,
            num_output_boxes,
            iou_threshold,
            score_threshold,
            pad_output_boxes_per_class,
            clip_boxes,
            share_location,
            box_decoder,
            num_classes,
            num_anchors,
            num_box_elements,
            num_score_elements,
            batch_size,
            element_datatype,
        })
    }
}

fn put_i32(image: &mut Vec<u8>, value: i32) {
    image.extend_from_slice(&value.to_le_bytes());
}

fn put_f32(image: &mut Vec<u8>, value: f32) {
    image.extend_from_slice(&value.to_le_bytes());
}

fn put_bool(image: &mut Vec<u8>, value: bool) {
    put_i32(image, value as i32);
}

// Length is checked once up front, the readers never run past the end.
fn read_i32(image: &[u8], pos: &mut usize) -> i32 {
    let mut raw = [0u8; 4];
    raw.copy_from_slice(&image[*pos..*pos + 4]);
    *pos += 4;
    i32::from_le_bytes(raw)
}

fn read_f32(image: &[u8], pos: &mut usize) -> f32 {
    let mut raw = [0u8; 4];
    raw.copy_from_slice(&image[*pos..*pos + 4]);
    *pos += 4;
    f32::from_le_bytes(raw)
}

fn read_bool(image: &[u8], pos: &mut usize) -> Result<bool> {
    let offset = *pos;
    match read_i32(image, pos) {
        0 => Ok(false),
        1 => Ok(true),
        got => Err(PluginError::BadBoolEncoding { offset, got }),
    }
}
