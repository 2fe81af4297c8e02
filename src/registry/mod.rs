//! Agent and team target registry.
//!
//! Targets are built once from settings at startup and are immutable
//! afterwards; per-request tool injection never touches them. Dynamic
//! agents and teams created over the API live alongside the static ones
//! and are resolved through the same lookups.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use url::Url;

use crate::config::{AgentSettings, Settings, TeamGroupSettings};
use crate::engine::{ChunkProducer, UpstreamProducer};
use crate::pipeline::emit;
use crate::types::tool::ToolSpec;
use crate::{Error, Result};

/// Coordination mode of a team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TeamMode {
    Route,
    Coordinate,
    Collaborate,
}

impl TeamMode {
    pub const ALL: [TeamMode; 3] = [TeamMode::Route, TeamMode::Coordinate, TeamMode::Collaborate];

    pub fn as_str(&self) -> &'static str {
        match self {
            TeamMode::Route => "route",
            TeamMode::Coordinate => "coordinate",
            TeamMode::Collaborate => "collaborate",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            TeamMode::Route => "Route Mode",
            TeamMode::Coordinate => "Coordinate Mode",
            TeamMode::Collaborate => "Collaborate Mode",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            TeamMode::Route => "The team leader routes each task to the most suitable member",
            TeamMode::Coordinate => "The leader delegates subtasks and integrates the results",
            TeamMode::Collaborate => "All members work the same task and results are merged",
        }
    }
}

impl fmt::Display for TeamMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One resolvable agent.
pub struct AgentTarget {
    pub key: String,
    pub name: String,
    pub role: Option<String>,
    pub instructions: String,
    pub tools: Vec<ToolSpec>,
    pub producer: Arc<dyn ChunkProducer>,
    pub created_at: String,
}

/// One member entry of a team, kept for listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamMember {
    pub id: String,
    pub name: String,
    pub role: String,
}

/// One resolvable team.
pub struct TeamTarget {
    pub key: String,
    pub name: String,
    pub mode: TeamMode,
    pub members: Vec<TeamMember>,
    pub instructions: Vec<String>,
    pub tools: Vec<ToolSpec>,
    pub producer: Arc<dyn ChunkProducer>,
    pub created_at: String,
}

/// Request to create a dynamic agent from a template.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAgentRequest {
    pub agent_type: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub instructions: Option<String>,
    #[serde(default)]
    pub tools: Vec<String>,
}

/// Request to create a dynamic team from previously created agents.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTeamRequest {
    pub team_mode: TeamMode,
    pub agent_selections: Vec<String>,
    #[serde(default)]
    pub team_name: Option<String>,
    #[serde(default)]
    pub custom_instructions: Vec<String>,
}

/// Registry of execution targets, shared behind the server state.
pub struct TargetRegistry {
    client: reqwest::Client,
    engine_base: Url,
    agents: HashMap<String, Arc<AgentTarget>>,
    teams: HashMap<String, Arc<TeamTarget>>,
    dynamic_agents: HashMap<String, Arc<AgentTarget>>,
    dynamic_teams: HashMap<String, Arc<TeamTarget>>,
    initialized: bool,
}

impl Default for TargetRegistry {
    fn default() -> Self {
        Self::empty(
            reqwest::Client::new(),
            Url::parse("http://127.0.0.1:8901/").expect("default engine url is valid"),
        )
    }
}

impl TargetRegistry {
    /// An empty, uninitialized registry.
    pub fn empty(client: reqwest::Client, engine_base: Url) -> Self {
        Self {
            client,
            engine_base,
            agents: HashMap::new(),
            teams: HashMap::new(),
            dynamic_agents: HashMap::new(),
            dynamic_teams: HashMap::new(),
            initialized: false,
        }
    }

    /// Build all static targets from settings. A failing agent is logged
    /// and skipped; startup continues with whatever is available.
    pub fn initialize(settings: &Settings) -> Result<Self> {
        let engine_base = Url::parse(&settings.engine.base_url).map_err(|err| {
            Error::configuration(format!(
                "invalid engine base url {}: {}",
                settings.engine.base_url, err
            ))
        })?;
        let mut registry = Self::empty(reqwest::Client::new(), engine_base);

        info!("initializing agents");
        for agent in &settings.agents {
            match registry.build_static_agent(agent) {
                Ok(target) => {
                    info!(agent = %agent.key, "agent initialized");
                    registry.agents.insert(agent.key.clone(), Arc::new(target));
                }
                Err(err) => {
                    error!(agent = %agent.key, error = %err, "failed to initialize agent");
                }
            }
        }

        for group in &settings.teams {
            registry.build_team_group(group);
        }

        registry.initialized = true;
        info!(
            agents = registry.agents.len(),
            teams = registry.teams.len(),
            "target registry initialized"
        );
        Ok(registry)
    }

    pub fn initialized(&self) -> bool {
        self.initialized
    }

    /// Resolve an agent by key, static first, then dynamic.
    pub fn agent(&self, key: &str) -> Option<Arc<AgentTarget>> {
        self.agents
            .get(key)
            .or_else(|| self.dynamic_agents.get(key))
            .cloned()
    }

    /// Resolve a team by key, static first, then dynamic.
    pub fn team(&self, key: &str) -> Option<Arc<TeamTarget>> {
        self.teams
            .get(key)
            .or_else(|| self.dynamic_teams.get(key))
            .cloned()
    }

    pub fn agent_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.agents.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn team_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.teams.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn dynamic_teams(&self) -> Vec<Arc<TeamTarget>> {
        let mut teams: Vec<Arc<TeamTarget>> = self.dynamic_teams.values().cloned().collect();
        teams.sort_by(|a, b| a.key.cmp(&b.key));
        teams
    }

    /// Register an agent target directly, e.g. one backed by an in-process
    /// producer. Takes the place of an existing static agent with the same
    /// key.
    pub fn register_agent(&mut self, target: AgentTarget) {
        self.agents.insert(target.key.clone(), Arc::new(target));
    }

    /// Register a team target directly.
    pub fn register_team(&mut self, target: TeamTarget) {
        self.teams.insert(target.key.clone(), Arc::new(target));
    }

    /// Create a dynamic agent from a template.
    pub fn create_agent(&mut self, request: &CreateAgentRequest) -> Result<Arc<AgentTarget>> {
        let template = agent_template(&request.agent_type).ok_or_else(|| {
            Error::validation(format!("unknown agent type: {}", request.agent_type))
        })?;

        let tools = if request.tools.is_empty() {
            resolve_tools(template.tools)
        } else {
            resolve_tools(&request.tools)
        };

        let agent_id = uuid::Uuid::new_v4().to_string();
        let producer = self.upstream(&format!("agents/dynamic/{}/run", agent_id))?;
        let target = AgentTarget {
            key: agent_id.clone(),
            name: request
                .name
                .clone()
                .unwrap_or_else(|| template.name.to_string()),
            role: Some(
                request
                    .role
                    .clone()
                    .unwrap_or_else(|| template.role.to_string()),
            ),
            instructions: request
                .instructions
                .clone()
                .unwrap_or_else(|| template.instructions.to_string()),
            tools,
            producer,
            created_at: emit::timestamp(),
        };

        let target = Arc::new(target);
        self.dynamic_agents.insert(agent_id, target.clone());
        info!(agent = %target.name, id = %target.key, "created dynamic agent");
        Ok(target)
    }

    /// Create a dynamic team from previously created agents.
    pub fn create_team(&mut self, request: &CreateTeamRequest) -> Result<Arc<TeamTarget>> {
        let mut members = Vec::new();
        let mut tools = Vec::new();
        for agent_id in &request.agent_selections {
            let agent = self
                .dynamic_agents
                .get(agent_id)
                .ok_or_else(|| Error::validation(format!("agent {} not found", agent_id)))?;
            members.push(TeamMember {
                id: agent.key.clone(),
                name: agent.name.clone(),
                role: agent.role.clone().unwrap_or_default(),
            });
            for tool in &agent.tools {
                if !tools.contains(tool) {
                    tools.push(tool.clone());
                }
            }
        }
        if members.is_empty() {
            return Err(Error::validation("no valid agents selected"));
        }

        let team_id = uuid::Uuid::new_v4().to_string();
        let team_key = format!("dynamic_team_{}", team_id);
        let team_name = request.team_name.clone().unwrap_or_else(|| {
            format!("Custom {} Team", capitalize(request.team_mode.as_str()))
        });

        let mut instructions = mode_instructions(request.team_mode, &team_name);
        instructions.extend(request.custom_instructions.iter().cloned());

        let producer = self.upstream(&format!("teams/dynamic/{}/run", team_id))?;
        let target = Arc::new(TeamTarget {
            key: team_key.clone(),
            name: team_name,
            mode: request.team_mode,
            members,
            instructions,
            tools,
            producer,
            created_at: emit::timestamp(),
        });

        self.dynamic_teams.insert(team_key, target.clone());
        info!(team = %target.name, key = %target.key, "created dynamic team");
        Ok(target)
    }

    /// Delete a dynamic team. Static teams cannot be deleted.
    pub fn delete_team(&mut self, key: &str) -> Result<()> {
        if self.dynamic_teams.remove(key).is_some() {
            info!(key = %key, "deleted dynamic team");
            Ok(())
        } else {
            Err(Error::target_not_found(key))
        }
    }

    fn build_static_agent(&self, agent: &AgentSettings) -> Result<AgentTarget> {
        let producer = match &agent.endpoint {
            Some(endpoint) => {
                let url = Url::parse(endpoint).map_err(|err| {
                    Error::configuration(format!("invalid endpoint {}: {}", endpoint, err))
                })?;
                Arc::new(UpstreamProducer::new(self.client.clone(), url))
                    as Arc<dyn ChunkProducer>
            }
            None => self.upstream(&format!("agents/{}/run", agent.key))?,
        };
        Ok(AgentTarget {
            key: agent.key.clone(),
            name: agent.name.clone(),
            role: None,
            instructions: agent.instructions.clone(),
            tools: resolve_tools(&agent.tools),
            producer,
            created_at: emit::timestamp(),
        })
    }

    /// Assemble one team per mode from the group's available members.
    fn build_team_group(&mut self, group: &TeamGroupSettings) {
        let members: Vec<TeamMember> = group
            .members
            .iter()
            .filter_map(|key| self.agents.get(key))
            .map(|agent| TeamMember {
                id: agent.key.clone(),
                name: agent.name.clone(),
                role: agent.role.clone().unwrap_or_default(),
            })
            .collect();
        if members.is_empty() {
            warn!(group = %group.group, "no agents available for team group");
            return;
        }

        let mut tools = Vec::new();
        for key in &group.members {
            if let Some(agent) = self.agents.get(key) {
                for tool in &agent.tools {
                    if !tools.contains(tool) {
                        tools.push(tool.clone());
                    }
                }
            }
        }

        for mode in TeamMode::ALL {
            let key = format!("{}_{}", group.group, mode);
            let endpoint = format!("teams/{}/{}/run", group.group, mode);
            match self.upstream(&endpoint) {
                Ok(producer) => {
                    let name = format!("{} ({})", group.name, mode.display_name());
                    self.teams.insert(
                        key.clone(),
                        Arc::new(TeamTarget {
                            key,
                            name: name.clone(),
                            mode,
                            members: members.clone(),
                            instructions: mode_instructions(mode, &name),
                            tools: tools.clone(),
                            producer,
                            created_at: emit::timestamp(),
                        }),
                    );
                }
                Err(err) => {
                    error!(team = %key, error = %err, "failed to initialize team");
                }
            }
        }
        info!(group = %group.group, "team group initialized");
    }

    fn upstream(&self, path: &str) -> Result<Arc<dyn ChunkProducer>> {
        let url = self.engine_base.join(path).map_err(|err| {
            Error::configuration(format!("invalid engine endpoint {}: {}", path, err))
        })?;
        Ok(Arc::new(UpstreamProducer::new(self.client.clone(), url)))
    }
}

struct TemplateDef {
    kind: &'static str,
    name: &'static str,
    role: &'static str,
    instructions: &'static str,
    tools: &'static [&'static str],
}

const TEMPLATES: &[TemplateDef] = &[
    TemplateDef {
        kind: "web_researcher",
        name: "Web Researcher",
        role: "Web search and general research specialist",
        instructions: "Search the web and provide current information, always citing sources.",
        tools: &["web_search"],
    },
    TemplateDef {
        kind: "academic_researcher",
        name: "Academic Researcher",
        role: "Academic research and paper analysis specialist",
        instructions: "Survey academic papers and research literature and provide evidence-based analysis.",
        tools: &["arxiv", "web_search"],
    },
    TemplateDef {
        kind: "tech_analyst",
        name: "Tech Analyst",
        role: "Technology trend and innovation analysis specialist",
        instructions: "Analyze technology community activity and innovation trends.",
        tools: &["hackernews", "web_search"],
    },
];

fn agent_template(kind: &str) -> Option<&'static TemplateDef> {
    TEMPLATES.iter().find(|t| t.kind == kind)
}

/// Template catalog for the discovery endpoint.
pub fn agent_templates() -> Vec<(&'static str, &'static str, &'static str)> {
    TEMPLATES
        .iter()
        .map(|t| (t.kind, t.name, t.role))
        .collect()
}

/// Full tool catalog advertised by the gateway.
pub fn tool_catalog() -> Vec<ToolSpec> {
    vec![
        ToolSpec::new(
            "web_search",
            "Web search and general information lookup",
            "search",
            "Search for current news and trends",
        ),
        ToolSpec::new(
            "arxiv",
            "Academic paper and research literature search",
            "research",
            "Survey research papers and publication activity",
        ),
        ToolSpec::new(
            "hackernews",
            "Hacker News technology discussion search",
            "tech",
            "Survey community discussions and technology debates",
        ),
        ToolSpec::new(
            "reasoning",
            "Structured logical reasoning and analysis support",
            "analysis",
            "Break a complex problem into explicit reasoning steps",
        ),
    ]
}

fn resolve_tools<S: AsRef<str>>(names: &[S]) -> Vec<ToolSpec> {
    let catalog = tool_catalog();
    let mut tools = Vec::new();
    for name in names {
        let name = name.as_ref();
        match catalog.iter().find(|t| t.name == name) {
            Some(tool) => tools.push(tool.clone()),
            None => warn!(tool = %name, "unknown tool, skipping"),
        }
    }
    tools
}

fn mode_instructions(mode: TeamMode, team_name: &str) -> Vec<String> {
    match mode {
        TeamMode::Route => vec![
            format!("You are the router of {}", team_name),
            "Dispatch each task to the most suitable specialist member".to_string(),
        ],
        TeamMode::Coordinate => vec![
            format!("You are the coordinator of {}", team_name),
            "Delegate specialized subtasks to each member and integrate their results".to_string(),
        ],
        TeamMode::Collaborate => vec![
            format!("You are the collaborative lead of {}", team_name),
            "Have every member work the same problem and merge the perspectives".to_string(),
        ],
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
