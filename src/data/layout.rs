use serde::{Deserialize, Serialize};

/// Memory layouts the graph compiler may probe during format negotiation.
/// The pose NMS operators only ever accept `Linear`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TensorLayout {
    #[default]
    Linear,
    ChannelPacked2,
    ChannelPacked4,
}

impl TensorLayout {
    pub fn from_str(layout: &str) -> Option<TensorLayout> {
        match layout.to_lowercase().as_str() {
            "linear" => Some(TensorLayout::Linear),
            "channel_packed_2" | "chw2" => Some(TensorLayout::ChannelPacked2),
            "channel_packed_4" | "chw4" => Some(TensorLayout::ChannelPacked4),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TensorLayout::Linear => "Linear",
            TensorLayout::ChannelPacked2 => "ChannelPacked2",
            TensorLayout::ChannelPacked4 => "ChannelPacked4",
        }
    }
}
