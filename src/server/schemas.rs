//! Request and response schemas for the HTTP surface.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::registry::{TeamMember, TeamMode};

fn default_group() -> String {
    "core".to_string()
}

/// Query request for agent and standard team endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryRequest {
    pub query: String,
    #[serde(default)]
    pub reasoning_mode: bool,
    /// Team coordination mode, used by the team endpoint only.
    #[serde(default = "QueryRequest::default_mode")]
    pub multi_agent_mode: TeamMode,
    /// Team group, used by the team endpoint only.
    #[serde(default = "default_group")]
    pub group: String,
}

impl QueryRequest {
    fn default_mode() -> TeamMode {
        TeamMode::Route
    }
}

/// Query request for the keyed team endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TeamQueryRequest {
    pub query: String,
    #[serde(default)]
    pub reasoning_mode: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ServiceInfo {
    pub message: String,
    pub version: String,
    pub available_agents: Vec<String>,
    pub endpoints: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub initialized: bool,
    pub available_agents: Vec<String>,
    pub agent_status: HashMap<String, String>,
    pub available_teams: Vec<String>,
    pub team_status: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ModeInfo {
    pub mode: String,
    pub name: String,
    pub description: String,
    pub teams: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamModesResponse {
    pub available_modes: Vec<ModeInfo>,
    pub available_teams: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DynamicTeamInfo {
    pub team_key: String,
    pub team_name: String,
    pub mode: String,
    pub member_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamsInfo {
    pub dynamic_teams: Vec<DynamicTeamInfo>,
    pub static_teams: Vec<String>,
    pub modes: Vec<ModeInfo>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AgentTypeInfo {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AgentTypesInfo {
    pub agent_types: Vec<AgentTypeInfo>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateAgentResponse {
    pub status: String,
    pub agent_id: String,
    pub name: String,
    pub role: String,
    pub tools: Vec<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateTeamResponse {
    pub status: String,
    pub team_key: String,
    pub team_name: String,
    pub mode: String,
    pub members: Vec<TeamMember>,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    pub status: String,
    pub message: String,
}
