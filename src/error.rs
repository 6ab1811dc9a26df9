use thiserror::Error;

use crate::data::AttrKind;

/// Everything that can go wrong while negotiating or constructing an
/// operator. All of it surfaces before execution; `invoke` never returns
/// one of these, it reports failure through its status code instead.
#[derive(Debug, Error)]
pub enum PluginError {
    #[error("attribute `{name}` expects {expected:?}, got {actual:?}")]
    AttrKindMismatch {
        name: String,
        expected: AttrKind,
        actual: AttrKind,
    },

    #[error("attribute `{name}` is out of range: {reason}")]
    AttrOutOfRange { name: String, reason: String },

    #[error("{tensor} tensor has unsupported rank {rank}, expected {expected}")]
    UnsupportedRank {
        tensor: &'static str,
        rank: usize,
        expected: &'static str,
    },

    #[error("boxes tensor inner dimension must be 4, got {got}")]
    BadBoxInnerDim { got: i64 },

    #[error("scores tensor trailing dimension must be 1, got {got}")]
    BadScoreTrailingDim { got: i64 },

    #[error("boxes class dimension must be 1 or {num_classes}, got {got}")]
    ClassDimMismatch { got: i64, num_classes: i64 },

    #[error("{tensor} tensor dimension {dim} must be positive, got {got}")]
    NonPositiveDim {
        tensor: &'static str,
        dim: usize,
        got: i64,
    },

    #[error("expected {expected} {what} tensors, got {got}")]
    BadTensorCount {
        what: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("output slot {slot} is out of range for {num_outputs} outputs")]
    BadOutputSlot { slot: usize, num_outputs: usize },

    #[error("serialized parameter image must be {expected} bytes, got {got}")]
    BadImageLength { expected: usize, got: usize },

    #[error("serialized parameter image has a bad bool encoding at byte {offset}: {got}")]
    BadBoolEncoding { offset: usize, got: i32 },

    #[error("serialized parameter image has an unknown datatype code {code}")]
    BadDatatypeCode { code: i32 },
}
