use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::plan::{Brief, Plan};
use crate::stage::Stage;

/// Represents a single research session in Delve.
///
/// A session holds the state for one research topic, tracking it through
/// the Planned → Searched → Reported workflow. Everything needed to
/// resume the session later is stored here, except the search results and
/// digests, which live in files next to the session metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Unique identifier for this session, derived from the creation time
    pub id: String,
    /// The research topic as the user phrased it, in any language
    pub topic: String,
    /// English translation of the topic, populated by the planner
    pub english_topic: Option<String>,
    /// Research brief, populated by the planner
    pub brief: Option<Brief>,
    /// Research plan, populated when the planning stage completes
    pub plan: Option<Plan>,
    /// Current stage of the session
    pub stage: Stage,
    /// When the session was created
    pub created_at: DateTime<Utc>,
    /// When the session was last updated
    pub updated_at: DateTime<Utc>,
}

impl Session {
    /// Creates a new session for the given topic.
    ///
    /// The session starts in the New stage with a timestamp-based ID
    /// like `RS_20250210_214128`.
    pub fn new(topic: impl Into<String>) -> Self {
        let now = Utc::now();

        Self {
            id: format!("RS_{}", now.format("%Y%m%d_%H%M%S")),
            topic: topic.into(),
            english_topic: None,
            brief: None,
            plan: None,
            stage: Stage::New,
            created_at: now,
            updated_at: now,
        }
    }

    /// Attempts to advance to the next stage.
    ///
    /// Returns true if advancement was successful, false if already
    /// reported or if prerequisites are not met.
    pub fn advance_stage(&mut self) -> bool {
        if !self.can_advance() {
            return false;
        }

        if let Some(next) = self.stage.next() {
            self.stage = next;
            self.updated_at = Utc::now();
            true
        } else {
            false
        }
    }

    /// Checks if the session can advance to the next stage.
    ///
    /// Each stage has prerequisites:
    /// - New → Planned: requires a plan
    /// - Planned → Searched: always allowed (results live on disk)
    /// - Searched → Reported: always allowed
    pub fn can_advance(&self) -> bool {
        match self.stage {
            Stage::New => self.plan.is_some(),
            Stage::Planned => true,
            Stage::Searched => true,
            Stage::Reported => false,
        }
    }

    /// Sets the plan and validates the stage.
    pub fn set_plan(&mut self, plan: Plan) -> Result<(), SessionError> {
        if self.stage != Stage::New {
            return Err(SessionError::WrongStage {
                expected: Stage::New,
                actual: self.stage,
            });
        }
        self.plan = Some(plan);
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Formats the research background for synthesis prompts.
    ///
    /// Falls back to the raw topic when no brief was generated yet.
    pub fn topic_block(&self) -> String {
        match &self.brief {
            Some(brief) => brief.to_prompt_block(),
            None => self.topic.clone(),
        }
    }

    /// Converts the session to a summary (for listings).
    pub fn to_summary(&self) -> SessionSummary {
        SessionSummary {
            id: self.id.clone(),
            topic: self.topic.clone(),
            stage: self.stage,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// A lightweight summary of a session for listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    pub id: String,
    pub topic: String,
    pub stage: Stage,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Wrong stage: expected {expected:?}, got {actual:?}")]
    WrongStage { expected: Stage, actual: Stage },
}
