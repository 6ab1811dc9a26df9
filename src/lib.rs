mod error;
mod utils;
pub mod data;
pub mod kernel;
pub mod ops;
pub mod registry;

use std::sync::Arc;

use crate::kernel::PoseNmsKernel;

pub use error::PluginError;

pub type Result<T, E = PluginError> = std::result::Result<T, E>;

/// Registers both pose NMS operators against the process-wide registry,
/// dispatching to the given kernel.
pub fn register_builtin(kernel: Arc<dyn PoseNmsKernel>) -> anyhow::Result<()> {
    registry::register_pose_nms_operators(registry::global(), kernel)
}
