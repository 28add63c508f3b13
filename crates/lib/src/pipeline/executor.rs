//! # Pipeline Executor
//!
//! Runs the stages of an [`ExecutablePipeline`] strictly in order. Every stage
//! is one model call whose system prompt comes from the stage's role and whose
//! user prompt carries the stage instruction followed by the outputs of all
//! the stages before it. The first failing stage aborts the run.

use super::{
    ArticlePackage, ExecutablePipeline, PipelineResult, PipelineRun, StageDefinition, StageKind,
    StageOutput,
};
use crate::{
    errors::PipelineError,
    profiles::OutputFormat,
    prompts::{role_system_prompt, stages::EXPECTED_OUTPUT_LABEL, stages::PRIOR_CONTEXT_HEADER},
    providers::ai::AiProvider,
};
use regex::Regex;
use std::sync::Arc;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

/// Runs pipelines against one language-model provider.
#[derive(Debug, Clone)]
pub struct PipelineExecutor {
    ai_provider: Arc<dyn AiProvider>,
}

impl PipelineExecutor {
    pub fn new(ai_provider: Arc<dyn AiProvider>) -> Self {
        Self { ai_provider }
    }

    /// Executes every stage and returns the final result with the full transcript.
    pub async fn run(&self, pipeline: &ExecutablePipeline) -> Result<PipelineRun, PipelineError> {
        let run_id = Uuid::new_v4();
        let span = info_span!("pipeline", client = %pipeline.client, %run_id);

        async move {
            info!(
                stages = pipeline.stages.len(),
                tema = %pipeline.request.tema,
                palavra_chave = %pipeline.request.palavra_chave,
                "Starting content pipeline"
            );

            let mut transcript: Vec<StageOutput> = Vec::with_capacity(pipeline.stages.len());
            for stage in &pipeline.stages {
                let user_prompt = build_user_prompt(stage, &transcript);
                let system_prompt = role_system_prompt(&stage.role);
                debug!(stage = %stage.kind, prompt_chars = user_prompt.len(), "Running stage");

                let output = self
                    .ai_provider
                    .generate(&system_prompt, &user_prompt)
                    .instrument(info_span!("stage", stage = %stage.kind))
                    .await
                    .map_err(|e| {
                        warn!(stage = %stage.kind, error = %e, "Stage failed; aborting pipeline");
                        PipelineError::Stage {
                            stage: stage.kind.to_string(),
                            source: Box::new(e),
                        }
                    })?;

                debug!(stage = %stage.kind, output_chars = output.len(), "Stage completed");
                transcript.push(StageOutput {
                    stage: stage.kind,
                    output,
                });
            }

            let result = finalize(pipeline, &transcript)?;
            info!("Content pipeline completed");
            Ok(PipelineRun { result, transcript })
        }
        .instrument(span)
        .await
    }
}

/// Instruction, expected output, then every prior stage output labelled by stage.
fn build_user_prompt(stage: &StageDefinition, prior: &[StageOutput]) -> String {
    let mut prompt = format!(
        "{}\n\n{} {}",
        stage.instruction, EXPECTED_OUTPUT_LABEL, stage.expected_output
    );
    if !prior.is_empty() {
        prompt.push_str("\n\n");
        prompt.push_str(PRIOR_CONTEXT_HEADER);
        for previous in prior {
            prompt.push_str(&format!(
                "\n\n## {}\n{}",
                previous.stage.as_str(),
                previous.output.trim()
            ));
        }
    }
    prompt
}

fn finalize(
    pipeline: &ExecutablePipeline,
    transcript: &[StageOutput],
) -> Result<PipelineResult, PipelineError> {
    let last = transcript.last().ok_or_else(|| PipelineError::MalformedOutput {
        stage: "pipeline".to_string(),
        reason: "no stage produced output".to_string(),
    })?;

    match pipeline.output {
        OutputFormat::Html => Ok(PipelineResult::Html(last.output.trim().to_string())),
        OutputFormat::Article => {
            let package = parse_article_package(last.stage, &last.output)?;
            let meta_chars = package.meta_description.chars().count();
            if meta_chars > pipeline.meta_max_chars as usize {
                warn!(
                    meta_chars,
                    limit = pipeline.meta_max_chars,
                    "Meta description exceeds the configured limit"
                );
            }
            Ok(PipelineResult::Article(package))
        }
    }
}

/// Parses the packaging stage output, tolerating Markdown code fences and
/// prose around the JSON object.
pub fn parse_article_package(stage: StageKind, raw: &str) -> Result<ArticlePackage, PipelineError> {
    let re = Regex::new(r"(?s)```(?:json)?\s*(.*?)\s*```")?;
    let unfenced = re
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .map_or(raw, |m| m.as_str());

    let candidate = match (unfenced.find('{'), unfenced.rfind('}')) {
        (Some(start), Some(end)) if start < end => &unfenced[start..=end],
        _ => unfenced.trim(),
    };

    serde_json::from_str(candidate).map_err(|e| PipelineError::MalformedOutput {
        stage: stage.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::RoleDescriptor;

    fn definition(kind: StageKind) -> StageDefinition {
        StageDefinition {
            kind,
            role: RoleDescriptor {
                role: "r".into(),
                goal: "g".into(),
                backstory: "b".into(),
            },
            instruction: "Faça algo".into(),
            expected_output: "Algo feito".into(),
        }
    }

    #[test]
    fn first_stage_prompt_has_no_prior_context() {
        let prompt = build_user_prompt(&definition(StageKind::Introduction), &[]);
        assert_eq!(prompt, "Faça algo\n\nResultado esperado: Algo feito");
    }

    #[test]
    fn later_stage_prompt_lists_prior_outputs_in_order() {
        let prior = vec![
            StageOutput {
                stage: StageKind::Introduction,
                output: "<p>intro</p>\n".into(),
            },
            StageOutput {
                stage: StageKind::Outline,
                output: "<h2>1. A</h2>".into(),
            },
        ];
        let prompt = build_user_prompt(&definition(StageKind::Body), &prior);
        let intro = prompt.find("## introduction\n<p>intro</p>").unwrap();
        let outline = prompt.find("## outline\n<h2>1. A</h2>").unwrap();
        assert!(prompt.contains(PRIOR_CONTEXT_HEADER));
        assert!(intro < outline);
    }

    #[test]
    fn parses_fenced_package() {
        let raw = "Aqui está:\n```json\n{\"titulo\":\"T\",\"meta_description\":\"M\",\"html_body\":\"<p>x</p>\"}\n```";
        let package = parse_article_package(StageKind::Packaging, raw).unwrap();
        assert_eq!(package.titulo, "T");
        assert_eq!(package.html_body, "<p>x</p>");
    }

    #[test]
    fn parses_bare_package_with_surrounding_prose() {
        let raw = "JSON final: {\"titulo\":\"T\",\"meta_description\":\"M\",\"html_body\":\"<p>{x}</p>\"} fim";
        let package = parse_article_package(StageKind::Packaging, raw).unwrap();
        assert_eq!(package.html_body, "<p>{x}</p>");
    }

    #[test]
    fn rejects_output_without_json() {
        let err = parse_article_package(StageKind::Packaging, "<p>só html</p>").unwrap_err();
        assert!(matches!(
            err,
            PipelineError::MalformedOutput { ref stage, .. } if stage == "packaging"
        ));
    }
}
