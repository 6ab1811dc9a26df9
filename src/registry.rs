use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use anyhow::{bail, Result};
use parking_lot::RwLock;

use crate::data::CROSS_MARK;
use crate::kernel::PoseNmsKernel;
use crate::ops::{ExplicitPoseNmsCreator, ImplicitPoseNmsCreator, OperatorCreator};

/// Keyed store of operator creators, looked up by (name, version).
pub struct OperatorRegistry {
    creators: RwLock<HashMap<(String, String), Arc<dyn OperatorCreator>>>,
}

impl OperatorRegistry {
    pub fn new() -> OperatorRegistry {
        OperatorRegistry {
            creators: RwLock::new(HashMap::new()),
        }
    }

    /// Registers one creator. A (name, version) pair can only be
    /// registered once.
    pub fn register(&self, creator: Arc<dyn OperatorCreator>) -> Result<()> {
        let key = (
            creator.operator_name().to_string(),
            creator.operator_version().to_string(),
        );
        let mut creators = self.creators.write();
        if creators.contains_key(&key) {
            bail!(
                "{CROSS_MARK} Operator `{}` version `{}` is already registered",
                key.0,
                key.1
            );
        }
        log::debug!("Registered operator `{}` version `{}`", key.0, key.1);
        creators.insert(key, creator);
        Ok(())
    }

    pub fn lookup(&self, name: &str, version: &str) -> Option<Arc<dyn OperatorCreator>> {
        self.creators
            .read()
            .get(&(name.to_string(), version.to_string()))
            .cloned()
    }

    /// Registered operator names, sorted for stable listings.
    pub fn creator_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .creators
            .read()
            .keys()
            .map(|(name, _)| name.clone())
            .collect();
        names.sort();
        names
    }
}

impl Default for OperatorRegistry {
    fn default() -> Self {
        OperatorRegistry::new()
    }
}

/// Process-wide registry the host resolves creators from.
pub fn global() -> &'static OperatorRegistry {
    static REGISTRY: OnceLock<OperatorRegistry> = OnceLock::new();
    REGISTRY.get_or_init(OperatorRegistry::new)
}

/// Wires both pose NMS creators, implicit and explicit batch, to the
/// given kernel and registers them.
pub fn register_pose_nms_operators(
    registry: &OperatorRegistry,
    kernel: Arc<dyn PoseNmsKernel>,
) -> Result<()> {
    let implicit = ImplicitPoseNmsCreator::new(kernel.clone());
    let explicit = ExplicitPoseNmsCreator::new(kernel);
    log::info!(
        "Registering pose NMS operators: {} v{}, {} v{}",
        implicit.operator_name(),
        implicit.operator_version(),
        explicit.operator_name(),
        explicit.operator_version()
    );
    registry.register(Arc::new(implicit))?;
    registry.register(Arc::new(explicit))?;
    Ok(())
}
