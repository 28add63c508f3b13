//! # Content Pipeline
//!
//! A client pipeline is a fixed, linear sequence of generation stages. The
//! [`factory`] turns a client profile and a request into an
//! [`ExecutablePipeline`]; the [`executor`] runs its stages one after another
//! against a single [`AiProvider`](crate::providers::ai::AiProvider).

pub mod executor;
pub mod factory;

pub use executor::PipelineExecutor;
pub use factory::{compose_stages, PipelineFactory};

use crate::{
    competitor::CompetitorResearch, links::LinkEntry, profiles::OutputFormat,
    types::GenerationRequest,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The persona a stage is run as.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleDescriptor {
    pub role: String,
    pub goal: String,
    pub backstory: String,
}

/// Every stage a pipeline can contain, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageKind {
    Introduction,
    Outline,
    Body,
    Conclusion,
    Merge,
    LinkInsertion,
    Signature,
    Review,
    Correction,
    SeoRefinement,
    Packaging,
}

impl StageKind {
    /// The stages shared by every client.
    pub const CORE: [StageKind; 9] = [
        StageKind::Introduction,
        StageKind::Outline,
        StageKind::Body,
        StageKind::Conclusion,
        StageKind::Merge,
        StageKind::LinkInsertion,
        StageKind::Signature,
        StageKind::Review,
        StageKind::Correction,
    ];

    /// Trailing stages run only for article output.
    pub const ARTICLE_TAIL: [StageKind; 2] = [StageKind::SeoRefinement, StageKind::Packaging];

    pub fn as_str(&self) -> &'static str {
        match self {
            StageKind::Introduction => "introduction",
            StageKind::Outline => "outline",
            StageKind::Body => "body",
            StageKind::Conclusion => "conclusion",
            StageKind::Merge => "merge",
            StageKind::LinkInsertion => "link_insertion",
            StageKind::Signature => "signature",
            StageKind::Review => "review",
            StageKind::Correction => "correction",
            StageKind::SeoRefinement => "seo_refinement",
            StageKind::Packaging => "packaging",
        }
    }

    /// The stage sequence for an output format.
    pub fn sequence(output: OutputFormat) -> Vec<StageKind> {
        let mut kinds = Self::CORE.to_vec();
        if output == OutputFormat::Article {
            kinds.extend(Self::ARTICLE_TAIL);
        }
        kinds
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully rendered stage, ready to be sent to the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageDefinition {
    pub kind: StageKind,
    pub role: RoleDescriptor,
    pub instruction: String,
    pub expected_output: String,
}

/// The structured result returned by article pipelines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticlePackage {
    pub titulo: String,
    pub meta_description: String,
    pub html_body: String,
}

/// The final artifact of a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PipelineResult {
    Html(String),
    Article(ArticlePackage),
}

/// A pipeline bound to one client and one request.
#[derive(Debug, Clone, Serialize)]
pub struct ExecutablePipeline {
    /// The client slug.
    pub client: String,
    pub request: GenerationRequest,
    pub research: CompetitorResearch,
    pub external_links: Vec<LinkEntry>,
    pub stages: Vec<StageDefinition>,
    pub output: OutputFormat,
    /// Upper bound checked on the packaged meta description.
    #[serde(skip)]
    pub meta_max_chars: u32,
}

impl ExecutablePipeline {
    pub fn stage_kinds(&self) -> Vec<StageKind> {
        self.stages.iter().map(|s| s.kind).collect()
    }
}

/// The raw text one stage produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageOutput {
    pub stage: StageKind,
    pub output: String,
}

/// The outcome of a successful run.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineRun {
    pub result: PipelineResult,
    pub transcript: Vec<StageOutput>,
}
