use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Free-form record whose schema belongs to the workflow system.
/// Key order is preserved so forwarded bytes match what the client sent.
pub type Document = Map<String, Value>;

/// Structural checks serde can't express (non-empty identifiers).
pub trait Validate {
    fn validate(&self) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserContext {
    pub user_id: String,
    #[serde(default)]
    pub equipment: Option<Vec<String>>,
    #[serde(default)]
    pub goals: Option<String>,
    #[serde(default)]
    pub constraints: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationRequest {
    pub context: UserContext,
    #[serde(default)]
    pub recent_sessions: Option<Vec<Document>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Routine {
    pub day: String,
    pub exercises: Vec<Document>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutineRequest {
    pub context: UserContext,
    pub routine: Routine,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutineUpdateRequest {
    pub context: UserContext,
    pub routine_id: String,
    pub routine: Routine,
}

/// Result of a workflow run, returned by forwarding routes and posted back
/// by the workflow system on the callback route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookResponse {
    pub workflow_run_id: String,
    pub status: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub routine_preview: Option<Document>,
}

fn require_non_empty(field: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(Error::validation(format!("{} must not be empty", field)));
    }
    Ok(())
}

impl Validate for UserContext {
    fn validate(&self) -> Result<()> {
        require_non_empty("context.user_id", &self.user_id)
    }
}

impl Validate for RecommendationRequest {
    fn validate(&self) -> Result<()> {
        self.context.validate()
    }
}

impl Validate for RoutineRequest {
    fn validate(&self) -> Result<()> {
        self.context.validate()
    }
}

impl Validate for RoutineUpdateRequest {
    fn validate(&self) -> Result<()> {
        self.context.validate()?;
        require_non_empty("routine_id", &self.routine_id)
    }
}

impl Validate for WebhookResponse {
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}
