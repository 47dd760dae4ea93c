use thiserror::Error;

/// Errors from retrieving a source document
#[derive(Debug, Error)]
pub enum FetchError {
    /// The HTTP request itself could not be completed
    #[error("scrape request for {url} failed: {source}")]
    Request {
        url: String,
        source: reqwest::Error,
    },

    /// The scrape provider answered with a non-success HTTP status
    #[error("scrape of {url} returned HTTP {status}: {detail}")]
    Status {
        url: String,
        status: u16,
        detail: String,
    },

    /// The provider answered 2xx but reported a failure in the body
    #[error("scrape of {url} failed: {detail}")]
    Provider { url: String, detail: String },

    /// The response body was not the expected shape
    #[error("could not decode scrape response for {url}: {source}")]
    Decode {
        url: String,
        source: reqwest::Error,
    },

    /// The scrape succeeded but produced no usable text
    #[error("scrape of {url} returned no usable text")]
    EmptyBody { url: String },
}

/// Errors from the completion service
#[derive(Debug, Error)]
pub enum CompletionError {
    /// The HTTP request itself could not be completed
    #[error("completion request failed: {0}")]
    Request(#[source] reqwest::Error),

    /// The completion provider answered with a non-success HTTP status
    #[error("completion service returned HTTP {status}: {detail}")]
    Status { status: u16, detail: String },

    /// The response body was not the expected shape
    #[error("could not decode completion response: {0}")]
    Decode(#[source] reqwest::Error),

    /// The response carried no message content to use as stage output
    #[error("completion response contained no message content")]
    MissingContent,
}

/// Errors raised while building a pipeline plan
///
/// A plan that survives validation cannot mis-sequence at run time, so these
/// never surface during execution.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SequencingError {
    /// The plan declares no branch stages
    #[error("plan has no stages")]
    Empty,

    /// Two stages share a name
    #[error("duplicate stage name `{stage}`")]
    DuplicateStage { stage: String },

    /// A stage requires an output that no earlier stage produces
    #[error("stage `{stage}` requires `{requires}`, which no earlier stage produces")]
    UnknownPredecessor { stage: String, requires: String },

    /// The synthesis stage asked for the source document
    #[error("synthesis stage `{stage}` must not read the source document")]
    SynthesisReadsSource { stage: String },

    /// The synthesis stage consumes nothing
    #[error("synthesis stage `{stage}` declares no required predecessors")]
    SynthesisWithoutInputs { stage: String },
}
