//! The research pipeline: planning, search fan-out, report synthesis.
//!
//! [`Pipeline`] drives a session through its stages and persists state
//! after every transition, so any session can be picked up later from
//! whatever stage it reached.

mod executor;
mod planner;
pub mod prompts;
mod reporter;

pub use executor::{ExecutionSummary, Executor};
pub use planner::{PlanGenerationError, Planner, PlannerOutput};
pub use reporter::{
    CategoryDigest, ReportArtifacts, ReportGenerationError, ReportMethod, Reporter,
};

use thiserror::Error;

use crate::llm::ChatModel;
use crate::search::SearchApi;
use crate::session::Session;
use crate::stage::Stage;
use crate::store::{Store, StoreError};

/// Drives a research session end to end.
///
/// The pipeline owns one component per stage and the store they write
/// through. Stage transitions are persisted before the next stage
/// starts, so a crash never loses a completed stage.
pub struct Pipeline<M: ChatModel, W: SearchApi, S: Store> {
    store: S,
    planner: Planner<M>,
    executor: Executor<W>,
    reporter: Reporter<M>,
}

/// What one full pipeline run produced.
#[derive(Debug)]
pub struct RunOutcome {
    /// The session in its final state
    pub session: Session,
    /// Counters from the search stage
    pub search: ExecutionSummary,
    /// Report artifacts, when a report was requested
    pub report: Option<ReportArtifacts>,
}

impl<M: ChatModel, W: SearchApi, S: Store> Pipeline<M, W, S> {
    /// Creates a new pipeline from its stage components.
    pub fn new(store: S, planner: Planner<M>, executor: Executor<W>, reporter: Reporter<M>) -> Self {
        Self {
            store,
            planner,
            executor,
            reporter,
        }
    }

    /// Runs a new session from a topic: plan, search, and optionally report.
    ///
    /// Pass `None` as the method to stop after the search stage; the
    /// session can be reported later with [`Pipeline::report`].
    pub async fn run(
        &self,
        topic: &str,
        method: Option<ReportMethod>,
    ) -> Result<RunOutcome, PipelineError> {
        let mut session = Session::new(topic);
        tracing::info!(id = %session.id, topic = %session.topic, "starting research session");

        // Planning stage
        let PlannerOutput {
            english_topic,
            brief,
            plan,
        } = self.planner.run(topic).await?;
        session.english_topic = Some(english_topic);
        session.brief = Some(brief);
        session
            .set_plan(plan.clone())
            .map_err(|e| PipelineError::Session(e.to_string()))?;
        self.advance(&mut session)?;

        // Search stage
        let search = self.executor.run(&self.store, &session.id, &plan).await?;
        self.advance(&mut session)?;
        tracing::info!(
            id = %session.id,
            saved = search.saved,
            failed = search.failed,
            "search stage complete"
        );

        // Reporting stage, if requested
        let report = match method {
            Some(method) => Some(self.report_session(&mut session, method).await?),
            None => None,
        };

        Ok(RunOutcome {
            session,
            search,
            report,
        })
    }

    /// Generates a report for a stored session.
    ///
    /// The session must have completed its search stage; sessions that
    /// were interrupted earlier are rejected rather than reported from
    /// partial data. Already-reported sessions can be reported again
    /// with a different method or model.
    pub async fn report(
        &self,
        session_id: &str,
        method: ReportMethod,
    ) -> Result<(Session, ReportArtifacts), PipelineError> {
        let mut session = self.store.load_session(session_id)?;

        if session.plan.is_none() {
            return Err(PipelineError::IncompleteSession {
                id: session.id,
                stage: session.stage,
                missing: "a stored research plan",
            });
        }
        if !matches!(session.stage, Stage::Searched | Stage::Reported) {
            return Err(PipelineError::IncompleteSession {
                id: session.id,
                stage: session.stage,
                missing: "a completed search stage",
            });
        }

        let artifacts = self.report_session(&mut session, method).await?;
        Ok((session, artifacts))
    }

    /// Runs the reporting stage and advances the session if needed.
    async fn report_session(
        &self,
        session: &mut Session,
        method: ReportMethod,
    ) -> Result<ReportArtifacts, PipelineError> {
        let topic = session.topic_block();
        let plan = match &session.plan {
            Some(plan) => plan,
            None => {
                return Err(PipelineError::IncompleteSession {
                    id: session.id.clone(),
                    stage: session.stage,
                    missing: "a stored research plan",
                });
            }
        };

        let artifacts = self
            .reporter
            .run(&self.store, &session.id, &topic, plan, method)
            .await?;

        // First report moves the session to Reported; reruns leave it alone
        if session.stage != Stage::Reported {
            self.advance(session)?;
        }

        Ok(artifacts)
    }

    /// Advances the session one stage and persists it.
    fn advance(&self, session: &mut Session) -> Result<(), PipelineError> {
        if !session.advance_stage() {
            return Err(PipelineError::Session(format!(
                "session {} cannot advance from stage {}",
                session.id,
                session.stage.display_name()
            )));
        }
        self.store.save_session(session)?;
        Ok(())
    }
}

/// Errors that can occur while driving the pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Plan generation failed: {0}")]
    Plan(#[from] PlanGenerationError),

    #[error("Report generation failed: {0}")]
    Report(#[from] ReportGenerationError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Session error: {0}")]
    Session(String),

    #[error("Session {id} cannot produce a report yet: stage is {stage:?}, missing {missing}")]
    IncompleteSession {
        id: String,
        stage: Stage,
        missing: &'static str,
    },
}
