//! Configuration types for the shell adapter.
//!
//! ```toml
//! [adapters.shell]
//! user_name = "alice"
//! channel = "general"
//! prompt = "> "
//! reply_prefix = "herald: "
//! ```

use serde::{Deserialize, Serialize};

/// Shell adapter configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// ID of the user typing into the shell.
    pub user_id: String,

    /// Display name of the user typing into the shell.
    pub user_name: String,

    /// Channel every plain line is posted to.
    pub channel: String,

    /// Channel ID used for `/dm` lines, which arrive as direct messages.
    pub direct_channel: String,

    /// Printed before each input line; empty disables the prompt.
    pub prompt: String,

    /// Prepended to every outbound message.
    pub reply_prefix: String,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            user_id: "shell-user".to_string(),
            user_name: "shell".to_string(),
            channel: "shell".to_string(),
            direct_channel: "shell-dm".to_string(),
            prompt: String::new(),
            reply_prefix: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: ShellConfig =
            serde_json::from_value(serde_json::json!({ "user_name": "alice" })).unwrap();
        assert_eq!(config.user_name, "alice");
        assert_eq!(config.user_id, "shell-user");
        assert_eq!(config.channel, "shell");
        assert!(config.prompt.is_empty());
    }
}
