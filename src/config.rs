//! Gateway settings.
//!
//! Settings come from an optional YAML file with environment overrides on
//! top; every field has a default so the gateway can start with no file at
//! all.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::{Error, Result};

/// Environment variable naming the settings file.
pub const CONFIG_PATH_ENV: &str = "AGENT_RELAY_CONFIG";
/// Environment override for the listen port.
pub const PORT_ENV: &str = "AGENT_RELAY_PORT";
/// Environment override for the engine base URL.
pub const ENGINE_URL_ENV: &str = "AGENT_RELAY_ENGINE_URL";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub engine: EngineSettings,
    pub agents: Vec<AgentSettings>,
    pub teams: Vec<TeamGroupSettings>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8001,
            cors_origins: vec!["*".to_string()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Base URL of the execution engine; run endpoints are derived from it.
    pub base_url: String,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8901/".to_string(),
        }
    }
}

/// One statically configured agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSettings {
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub instructions: String,
    #[serde(default)]
    pub tools: Vec<String>,
    /// Optional per-agent run endpoint overriding the derived one.
    #[serde(default)]
    pub endpoint: Option<String>,
}

/// One group of agents assembled into a team per coordination mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamGroupSettings {
    pub group: String,
    pub name: String,
    pub members: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings::default(),
            engine: EngineSettings::default(),
            agents: vec![
                AgentSettings {
                    key: "web_search".to_string(),
                    name: "Web Search".to_string(),
                    instructions: "Search the web and report current information with sources."
                        .to_string(),
                    tools: vec!["web_search".to_string()],
                    endpoint: None,
                },
                AgentSettings {
                    key: "arxiv".to_string(),
                    name: "ArXiv Research".to_string(),
                    instructions: "Search and analyze academic papers.".to_string(),
                    tools: vec!["arxiv".to_string()],
                    endpoint: None,
                },
                AgentSettings {
                    key: "hackernews".to_string(),
                    name: "HackerNews".to_string(),
                    instructions: "Survey technology discussions and trends.".to_string(),
                    tools: vec!["hackernews".to_string()],
                    endpoint: None,
                },
            ],
            teams: vec![TeamGroupSettings {
                group: "core".to_string(),
                name: "Core Research Team".to_string(),
                members: vec![
                    "web_search".to_string(),
                    "arxiv".to_string(),
                    "hackernews".to_string(),
                ],
            }],
        }
    }
}

impl Settings {
    /// Load settings: file named by `AGENT_RELAY_CONFIG` if set, otherwise
    /// defaults, with environment overrides applied last.
    pub fn load() -> Result<Self> {
        let mut settings = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::from_yaml_file(&path)?,
            Err(_) => Self::default(),
        };
        settings.apply_env();
        Ok(settings)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        serde_yaml::from_str(&raw).map_err(|err| {
            Error::configuration(format!("failed to parse {}: {}", path.display(), err))
        })
    }

    fn apply_env(&mut self) {
        if let Ok(port) = std::env::var(PORT_ENV) {
            if let Ok(port) = port.parse() {
                self.server.port = port;
            }
        }
        if let Ok(url) = std::env::var(ENGINE_URL_ENV) {
            self.engine.base_url = url;
        }
    }

    /// Socket address string the server binds to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
