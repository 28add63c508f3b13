use thiserror::Error;

/// Error types for the content pipeline and its collaborators.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Failed to build Reqwest client: {0}")]
    ReqwestClientBuild(reqwest::Error),
    #[error("Failed to send request to AI provider: {0}")]
    AiRequest(reqwest::Error),
    #[error("Failed to deserialize AI provider response: {0}")]
    AiDeserialization(reqwest::Error),
    #[error("AI provider returned an error: {0}")]
    AiApi(String),
    #[error("AI provider is not configured: {0}")]
    MissingAiProvider(String),
    #[error("Unsupported AI provider type: '{0}'")]
    UnsupportedProvider(String),
    #[error("Search API key is missing")]
    MissingSearchApiKey,
    #[error("Failed to send request to search provider: {0}")]
    SearchRequest(reqwest::Error),
    #[error("Failed to deserialize search provider response: {0}")]
    SearchDeserialization(reqwest::Error),
    #[error("Search provider returned an error: {0}")]
    SearchApi(String),
    #[error("No client profile is registered for route '{0}'")]
    UnknownClient(String),
    #[error("Failed to parse client profile '{name}': {source}")]
    ProfileParse {
        name: String,
        source: serde_yaml::Error,
    },
    #[error("Failed to read client profiles: {0}")]
    ProfileIo(#[from] std::io::Error),
    #[error("Invalid client profile '{slug}': {reason}")]
    InvalidProfile { slug: String, reason: String },
    #[error("Stage '{stage}' produced malformed output: {reason}")]
    MalformedOutput { stage: String, reason: String },
    #[error("Stage '{stage}' failed: {source}")]
    Stage {
        stage: String,
        source: Box<PipelineError>,
    },
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
    #[error("JSON serialization error: {0}")]
    JsonSerialization(#[from] serde_json::Error),
}

impl PipelineError {
    /// Returns the innermost error, looking through stage wrappers.
    pub fn root_cause(&self) -> &PipelineError {
        match self {
            PipelineError::Stage { source, .. } => source.root_cause(),
            other => other,
        }
    }
}
