use serde::{Deserialize, Serialize};

pub const DEFAULT_BRIDGE_REGISTRY: &str =
    "d6d3fbe9d3f397d2f576354f54f4aea06bfc8e0ab37f6c9223ddcfdbb20380cd";
pub const DEFAULT_SWAP_REGISTRY: &str =
    "e113fe553611142ea7054531abc8c89ad00ad2d4d386b264599b8010f17f53ff";

/// Contract ids of the two registries every decode pass starts from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Lists bridgeable tokens under `s:<SYMBOL>`.
    pub bridge_registry: String,
    /// Lists tradable tokens, pool pairs and trading pairs.
    pub swap_registry: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            bridge_registry: DEFAULT_BRIDGE_REGISTRY.to_string(),
            swap_registry: DEFAULT_SWAP_REGISTRY.to_string(),
        }
    }
}

impl RegistryConfig {
    pub fn new(bridge_registry: impl Into<String>, swap_registry: impl Into<String>) -> Self {
        Self {
            bridge_registry: bridge_registry.into(),
            swap_registry: swap_registry.into(),
        }
    }
}
