use serde::Deserialize;

use crate::{DEFAULT_BATCH_CAPACITY, FlushPolicy};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Initial logical capacity of the quad batch, in quads.
    pub batch_capacity: usize,
    pub flush_policy: FlushPolicy,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            batch_capacity: DEFAULT_BATCH_CAPACITY,
            flush_policy: FlushPolicy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_table_uses_defaults() {
        let config: RendererConfig = toml::from_str("").unwrap();
        assert_eq!(config, RendererConfig::default());
        assert_eq!(config.batch_capacity, 1024);
        assert_eq!(config.flush_policy, FlushPolicy::OnTextureChange);
    }

    #[test]
    fn policy_is_snake_case() {
        let config: RendererConfig = toml::from_str(
            r#"
            flush_policy = "always"
            "#,
        )
        .unwrap();

        assert_eq!(config.flush_policy, FlushPolicy::Always);
        assert_eq!(config.batch_capacity, DEFAULT_BATCH_CAPACITY);
    }

    #[test]
    fn unknown_policy_is_rejected() {
        assert!(toml::from_str::<RendererConfig>("flush_policy = \"sometimes\"").is_err());
    }
}
