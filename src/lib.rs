pub mod error;
pub mod fetch;
pub mod io;
pub mod llm;
pub mod models;
pub mod pipeline;

pub use error::{CompletionError, FetchError, SequencingError};
pub use fetch::{ContentFetcher, FirecrawlClient, FirecrawlConfig};
pub use io::{write_run_json, HumanReport};
pub use llm::{CompletionClient, OpenAiClient, OpenAiConfig};
pub use models::{
    AuxParams, Document, PipelineRun, RunFailure, RunRequest, RunStatus, SourceSpec, Sources,
    StageOutcome, StageResult,
};
pub use pipeline::{PipelinePlan, PipelineRunner, StageSpec};
