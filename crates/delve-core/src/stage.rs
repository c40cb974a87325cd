use serde::{Deserialize, Serialize};

/// Represents the current stage of a research session in Delve.
///
/// Sessions progress linearly through stages:
/// New → Planned → Searched → Reported
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    /// Session created, no plan generated yet
    #[default]
    New,
    /// Research plan generated and stored
    Planned,
    /// All planned queries executed, results on disk
    Searched,
    /// At least one final report generated
    Reported,
}

impl Stage {
    /// Returns the next stage in the workflow.
    /// Returns None if already reported.
    pub fn next(&self) -> Option<Stage> {
        match self {
            Stage::New => Some(Stage::Planned),
            Stage::Planned => Some(Stage::Searched),
            Stage::Searched => Some(Stage::Reported),
            Stage::Reported => None,
        }
    }

    /// Returns true if this stage can transition to the next stage.
    pub fn can_advance(&self) -> bool {
        self.next().is_some()
    }

    /// Returns a human-readable name for the stage.
    pub fn display_name(&self) -> &'static str {
        match self {
            Stage::New => "New",
            Stage::Planned => "Planned",
            Stage::Searched => "Searched",
            Stage::Reported => "Reported",
        }
    }
}
