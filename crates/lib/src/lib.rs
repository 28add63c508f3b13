//! # SEO Content Pipelines
//!
//! This crate turns a topic and a target keyword into a publication-ready blog
//! article for one of several client personas. Each client is a
//! [`ClientProfile`]; a [`PipelineFactory`] performs one competitor search,
//! filters authoritative external links from the results and renders a fixed
//! sequence of stage instructions, which a [`PipelineExecutor`] then runs one
//! after another against a language-model provider.

pub mod competitor;
pub mod errors;
pub mod links;
pub mod pipeline;
pub mod profiles;
pub mod prompts;
pub mod providers;
pub mod types;

pub use competitor::{format_competitor_digest, research_competitors, CompetitorResearch};
pub use errors::PipelineError;
pub use links::{select_authoritative_external_links, LinkEntry};
pub use pipeline::{
    compose_stages, ArticlePackage, ExecutablePipeline, PipelineExecutor, PipelineFactory,
    PipelineResult, PipelineRun, StageDefinition, StageKind, StageOutput,
};
pub use profiles::{ClientProfile, OutputFormat, ProfileRegistry};
pub use types::{AiProviderConfig, GenerationRequest, SearchSettings};
