use serde::{Deserialize, Serialize};

/// What happens to the tracked sets when the `enabled` setting turns off.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DisablePolicy {
    /// Empty both sets. Selections made while disabled are missed anyway,
    /// so nothing stale survives a re-enable.
    Clear,
    /// Leave both sets as they were.
    Retain,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FadeConfig {
    #[serde(default = "default_disable_policy")]
    pub disable_policy: DisablePolicy,
    /// Suppress a write when the tile already shows the decided mode.
    #[serde(default)]
    pub skip_redundant_writes: bool,
    /// Only track tokens owned by the acting user.
    #[serde(default = "default_true")]
    pub require_ownership: bool,
    /// Put tracked tiles back to VISION when the last tracked token is released.
    #[serde(default = "default_true")]
    pub reset_on_release: bool,
    /// Players cannot update tiles; only a GM session runs the hook.
    #[serde(default = "default_true")]
    pub acting_user_is_gm: bool,
}

fn default_disable_policy() -> DisablePolicy { DisablePolicy::Clear }
fn default_true() -> bool { true }

impl Default for FadeConfig {
    fn default() -> Self {
        Self {
            disable_policy:        DisablePolicy::Clear,
            skip_redundant_writes: false,
            require_ownership:     true,
            reset_on_release:      true,
            acting_user_is_gm:     true,
        }
    }
}

impl FadeConfig {
    /// Load from a JSON file. Missing fields take their defaults.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: FadeConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        Ok(config)
    }

    /// Config with hardcoded defaults for use in unit tests.
    pub fn default_test() -> Self {
        Self::default()
    }
}
