pub mod config;
pub mod llm;
pub mod pipeline;
pub mod plan;
pub mod search;
pub mod session;
pub mod stage;
pub mod store;

pub use config::Config;
pub use llm::OpenAIClient;
pub use pipeline::{Pipeline, PipelineError, ReportMethod};
pub use plan::{Brief, Category, Plan};
pub use search::{SearchResult, TavilyClient};
pub use session::{Session, SessionSummary};
pub use stage::Stage;
pub use store::{FileStore, Store};
