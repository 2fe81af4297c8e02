//! Route handlers.

use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::response::Response;
use axum::Json;
use tracing::info;

use crate::pipeline::aggregate::{self, ScopeLabel, StreamRequest};
use crate::registry::{self, CreateAgentRequest, CreateTeamRequest, TeamMode};
use crate::server::schemas::{
    AgentTypeInfo, AgentTypesInfo, CreateAgentResponse, CreateTeamResponse, DeleteResponse,
    DynamicTeamInfo, HealthStatus, ModeInfo, QueryRequest, ServiceInfo, TeamModesResponse,
    TeamQueryRequest, TeamsInfo,
};
use crate::server::{stream_response, ApiError, AppState};
use crate::types::tool::ToolSpec;

pub async fn service_info(State(state): State<AppState>) -> Json<ServiceInfo> {
    let registry = state.registry.read().await;
    let available_agents = if registry.initialized() {
        registry.agent_keys()
    } else {
        Vec::new()
    };
    let endpoints = HashMap::from([
        ("health".to_string(), "/health".to_string()),
        ("agent_query".to_string(), "/agents/{key}/query".to_string()),
        ("team_query".to_string(), "/teams/query".to_string()),
        ("tools".to_string(), "/tools".to_string()),
    ]);
    Json(ServiceInfo {
        message: "Agent Relay API is running".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        available_agents,
        endpoints,
    })
}

pub async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    let registry = state.registry.read().await;
    let available_agents = registry.agent_keys();
    let available_teams = registry.team_keys();

    let mut agent_status = HashMap::new();
    for agent in &state.settings.agents {
        let status = if available_agents.contains(&agent.key) {
            "available"
        } else {
            "unavailable"
        };
        agent_status.insert(agent.key.clone(), status.to_string());
    }

    let mut team_status = HashMap::new();
    for key in &available_teams {
        team_status.insert(key.clone(), "available".to_string());
    }

    Json(HealthStatus {
        status: "healthy".to_string(),
        initialized: registry.initialized(),
        available_agents,
        agent_status,
        available_teams,
        team_status,
    })
}

pub async fn agent_query(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(request): Json<QueryRequest>,
) -> Result<Response, ApiError> {
    validate_query(&request.query)?;

    let registry = state.registry.read().await;
    if !registry.initialized() {
        return Err(ApiError::NotInitialized);
    }
    let target = registry
        .agent(&key)
        .ok_or_else(|| ApiError::NotFound(format!("Agent {} not found", key)))?;
    drop(registry);

    info!(agent = %key, reasoning = request.reasoning_mode, "agent query");
    stream_response(aggregate::stream_events(StreamRequest {
        label: ScopeLabel::Agent(key),
        producer: target.producer.clone(),
        base_tools: target.tools.clone(),
        query: request.query,
        reasoning_mode: request.reasoning_mode,
    }))
}

pub async fn team_query(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> Result<Response, ApiError> {
    let team_key = format!("{}_{}", request.group, request.multi_agent_mode);
    run_team_query(
        state,
        team_key,
        request.query,
        request.reasoning_mode,
    )
    .await
}

pub async fn keyed_team_query(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(request): Json<TeamQueryRequest>,
) -> Result<Response, ApiError> {
    run_team_query(state, key, request.query, request.reasoning_mode).await
}

async fn run_team_query(
    state: AppState,
    team_key: String,
    query: String,
    reasoning_mode: bool,
) -> Result<Response, ApiError> {
    validate_query(&query)?;

    let registry = state.registry.read().await;
    if !registry.initialized() {
        return Err(ApiError::NotInitialized);
    }
    let target = registry
        .team(&team_key)
        .ok_or_else(|| ApiError::NotFound(format!("Team {} not found", team_key)))?;
    drop(registry);

    info!(team = %team_key, reasoning = reasoning_mode, "team query");
    stream_response(aggregate::stream_events(StreamRequest {
        label: ScopeLabel::Team(team_key),
        producer: target.producer.clone(),
        base_tools: target.tools.clone(),
        query,
        reasoning_mode,
    }))
}

pub async fn team_modes(State(state): State<AppState>) -> Json<TeamModesResponse> {
    let registry = state.registry.read().await;
    let available_teams = registry.team_keys();
    Json(TeamModesResponse {
        available_modes: mode_infos(&available_teams),
        available_teams,
    })
}

pub async fn available_teams(State(state): State<AppState>) -> Json<TeamsInfo> {
    let registry = state.registry.read().await;
    let static_teams = registry.team_keys();
    let dynamic_teams = registry
        .dynamic_teams()
        .iter()
        .map(|team| DynamicTeamInfo {
            team_key: team.key.clone(),
            team_name: team.name.clone(),
            mode: team.mode.to_string(),
            member_count: team.members.len(),
        })
        .collect();
    Json(TeamsInfo {
        dynamic_teams,
        modes: mode_infos(&static_teams),
        static_teams,
    })
}

pub async fn create_agent(
    State(state): State<AppState>,
    Json(request): Json<CreateAgentRequest>,
) -> Result<Json<CreateAgentResponse>, ApiError> {
    let mut registry = state.registry.write().await;
    let target = registry.create_agent(&request)?;
    Ok(Json(CreateAgentResponse {
        status: "success".to_string(),
        agent_id: target.key.clone(),
        name: target.name.clone(),
        role: target.role.clone().unwrap_or_default(),
        tools: target.tools.iter().map(|t| t.name.clone()).collect(),
        created_at: target.created_at.clone(),
    }))
}

pub async fn available_agent_types() -> Json<AgentTypesInfo> {
    let agent_types = registry::agent_templates()
        .into_iter()
        .map(|(kind, name, description)| AgentTypeInfo {
            kind: kind.to_string(),
            name: name.to_string(),
            description: description.to_string(),
        })
        .collect();
    Json(AgentTypesInfo { agent_types })
}

pub async fn create_team(
    State(state): State<AppState>,
    Json(request): Json<CreateTeamRequest>,
) -> Result<Json<CreateTeamResponse>, ApiError> {
    let mut registry = state.registry.write().await;
    let target = registry.create_team(&request)?;
    Ok(Json(CreateTeamResponse {
        status: "success".to_string(),
        team_key: target.key.clone(),
        team_name: target.name.clone(),
        mode: target.mode.to_string(),
        members: target.members.clone(),
        created_at: target.created_at.clone(),
    }))
}

pub async fn delete_team(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let mut registry = state.registry.write().await;
    registry.delete_team(&key)?;
    Ok(Json(DeleteResponse {
        status: "success".to_string(),
        message: format!("Team {} deleted", key),
    }))
}

pub async fn available_tools() -> Json<Vec<ToolSpec>> {
    Json(registry::tool_catalog())
}

fn validate_query(query: &str) -> Result<(), ApiError> {
    if query.trim().is_empty() {
        return Err(ApiError::Validation("query must not be empty".to_string()));
    }
    Ok(())
}

fn mode_infos(team_keys: &[String]) -> Vec<ModeInfo> {
    TeamMode::ALL
        .iter()
        .map(|mode| ModeInfo {
            mode: mode.to_string(),
            name: mode.display_name().to_string(),
            description: mode.description().to_string(),
            teams: team_keys
                .iter()
                .filter(|key| key.ends_with(mode.as_str()))
                .cloned()
                .collect(),
        })
        .collect()
}
