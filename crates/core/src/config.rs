// SPDX-License-Identifier: MIT

//! Project configuration (§4.11, §6.1): `.kd/config.json`.
//!
//! `serde` permits the document's shape; a manual second pass over the raw
//! `serde_json::Value` enforces the closed, namespaced key set, mirroring
//! the belt-and-suspenders idiom used for frontmatter parsing (§4.2) —
//! `serde` alone would silently accept an unknown key by ignoring it.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid config: unknown key {0:?}")]
    UnknownKey(String),

    #[error("invalid config: {0}")]
    Invalid(String),

    #[error("invalid config json: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatMode {
    Broadcast,
    Sequential,
}

impl Default for ChatMode {
    fn default() -> Self {
        ChatMode::Broadcast
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberConfig {
    pub name: String,
    pub backend: String,
    #[serde(default)]
    pub session: Option<String>,
    #[serde(default)]
    pub prompts: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Auto-turn budget for unmentioned chat rounds. `0` disables auto-turns.
    /// Default is "equal to council size at runtime" (§4.11), resolved by
    /// [`ChatConfig::auto_messages_or_default`] rather than baked in here,
    /// since the default depends on data this type doesn't have.
    #[serde(default)]
    pub auto_messages: Option<u32>,
    #[serde(default)]
    pub mode: ChatMode,
}

impl ChatConfig {
    pub fn auto_messages_or_default(&self, council_size: usize) -> u32 {
        self.auto_messages.unwrap_or(council_size as u32)
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self { auto_messages: None, mode: ChatMode::default() }
    }
}

fn default_timeout() -> u64 {
    300
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouncilConfig {
    #[serde(default)]
    pub members: Vec<MemberConfig>,
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    #[serde(default = "default_true")]
    pub auto_commit: bool,
    #[serde(default)]
    pub chat: ChatConfig,
}

impl Default for CouncilConfig {
    fn default() -> Self {
        Self { members: Vec::new(), timeout: default_timeout(), auto_commit: true, chat: ChatConfig::default() }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentConfig {
    #[serde(default)]
    pub cli: Option<String>,
    #[serde(default)]
    pub prompts: HashMap<String, String>,
}

/// Phases an agent's per-phase prompt map may key on (§4.11, §6.6).
pub const PROMPT_PHASES: &[&str] = &["ask", "design", "review", "work"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub council: CouncilConfig,
    #[serde(default)]
    pub agents: HashMap<String, AgentConfig>,
}

impl Config {
    /// Parse and validate a config document's text. Rejects any key not in
    /// the enumerated set, at any namespaced level.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let raw: serde_json::Value = serde_json::from_str(text)?;
        if let Err(e) = validate_keys(&raw) {
            tracing::warn!(error = %e, "rejecting config with unknown key");
            return Err(e);
        }
        let config: Config = serde_json::from_str(text)?;
        for member in &config.council.members {
            for phase in member.prompts.keys() {
                if !PROMPT_PHASES.contains(&phase.as_str()) {
                    return Err(ConfigError::UnknownKey(format!("council.members[{}].prompts.{phase}", member.name)));
                }
            }
        }
        for (agent_name, agent) in &config.agents {
            for phase in agent.prompts.keys() {
                if !PROMPT_PHASES.contains(&phase.as_str()) {
                    return Err(ConfigError::UnknownKey(format!("agents.{agent_name}.prompts.{phase}")));
                }
            }
        }
        Ok(config)
    }

    pub fn to_pretty_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn validate_keys(raw: &serde_json::Value) -> Result<(), ConfigError> {
    let obj = raw.as_object().ok_or_else(|| ConfigError::Invalid("config root must be an object".into()))?;
    for key in obj.keys() {
        match key.as_str() {
            "council" | "agents" => {}
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        }
    }
    if let Some(council) = obj.get("council") {
        let council_obj =
            council.as_object().ok_or_else(|| ConfigError::Invalid("council must be an object".into()))?;
        for key in council_obj.keys() {
            match key.as_str() {
                "members" | "timeout" | "auto_commit" | "chat" => {}
                other => return Err(ConfigError::UnknownKey(format!("council.{other}"))),
            }
        }
        if let Some(chat) = council_obj.get("chat") {
            let chat_obj = chat.as_object().ok_or_else(|| ConfigError::Invalid("council.chat must be an object".into()))?;
            for key in chat_obj.keys() {
                match key.as_str() {
                    "auto_messages" | "mode" => {}
                    other => return Err(ConfigError::UnknownKey(format!("council.chat.{other}"))),
                }
            }
        }
        if let Some(members) = council_obj.get("members").and_then(|m| m.as_array()) {
            for member in members {
                let member_obj = member
                    .as_object()
                    .ok_or_else(|| ConfigError::Invalid("council.members[] must be an object".into()))?;
                for key in member_obj.keys() {
                    match key.as_str() {
                        "name" | "backend" | "session" | "prompts" => {}
                        other => return Err(ConfigError::UnknownKey(format!("council.members[].{other}"))),
                    }
                }
            }
        }
    }
    if let Some(agents) = obj.get("agents") {
        let agents_obj =
            agents.as_object().ok_or_else(|| ConfigError::Invalid("agents must be an object".into()))?;
        for (agent_name, agent) in agents_obj {
            let agent_obj = agent
                .as_object()
                .ok_or_else(|| ConfigError::Invalid(format!("agents.{agent_name} must be an object")))?;
            for key in agent_obj.keys() {
                match key.as_str() {
                    "cli" | "prompts" => {}
                    other => return Err(ConfigError::UnknownKey(format!("agents.{agent_name}.{other}"))),
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
