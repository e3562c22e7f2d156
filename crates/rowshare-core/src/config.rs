//! Runtime configuration for shared-table resolution.

use crate::DEFAULT_MAX_CHAIN_DEPTH;
use serde::{Deserialize, Serialize};

///
/// SharedTableConfig
///
/// Knobs applied to every cache built for one model. Resolution semantics do
/// not depend on these values; they only bound how long a misconfigured chain
/// is followed before it is reported.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct SharedTableConfig {
    /// Maximum number of entries on one principal or dependent chain.
    pub max_chain_depth: usize,
}

impl SharedTableConfig {
    #[must_use]
    pub const fn new(max_chain_depth: usize) -> Self {
        Self { max_chain_depth }
    }
}

impl Default for SharedTableConfig {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CHAIN_DEPTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_default_depth() {
        let config: SharedTableConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.max_chain_depth, DEFAULT_MAX_CHAIN_DEPTH);
    }

    #[test]
    fn explicit_depth_is_kept() {
        let config: SharedTableConfig =
            serde_json::from_str(r#"{ "max_chain_depth": 4 }"#).unwrap();
        assert_eq!(config, SharedTableConfig::new(4));
    }
}
