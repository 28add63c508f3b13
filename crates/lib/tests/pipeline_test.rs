//! # Pipeline Tests
//!
//! End-to-end checks of pipeline construction and execution using mock
//! search and model providers.

mod common;

use common::setup_tracing;
use seocrew::{
    errors::PipelineError, GenerationRequest, PipelineExecutor, PipelineFactory, PipelineResult,
    SearchSettings, StageKind,
};
use seocrew_test_utils::{builtin_profile, search_result, MockAiProvider, MockSearchProvider};
use std::sync::Arc;

fn factory(search: MockSearchProvider) -> PipelineFactory {
    PipelineFactory::new(Arc::new(search), SearchSettings::default())
}

fn competitor_results() -> Vec<seocrew::providers::search::SearchResult> {
    vec![
        search_result(
            "Como dar banho no cachorro",
            "Passo a passo completo",
            "https://randomblog.com/banho",
        ),
        search_result(
            "Cuidados de higiene com cães",
            "Orientações oficiais",
            "https://www.gov.br/agricultura/pt-br/caes",
        ),
    ]
}

#[tokio::test]
async fn test_villa_puppy_pipeline_shape() -> anyhow::Result<()> {
    setup_tracing();
    // --- 1. Arrange ---
    let profile = builtin_profile("villa_puppy")?;
    let search = MockSearchProvider::with_results(competitor_results());
    let request = GenerationRequest::new("Banho e tosa", "banho e tosa");

    // --- 2. Act ---
    let pipeline = factory(search.clone())
        .build_pipeline(&profile, &request)
        .await;

    // --- 3. Assert ---
    assert_eq!(pipeline.stage_kinds(), StageKind::CORE.to_vec());

    let outline = &pipeline.stages[1];
    assert!(outline.instruction.contains("Erros comuns e armadilhas"));
    assert!(outline.instruction.contains("Exemplos práticos / aplicação"));

    let signature = &pipeline.stages[6];
    assert_eq!(signature.kind, StageKind::Signature);
    assert!(signature
        .instruction
        .contains("https://api.whatsapp.com/send?phone=5511917411212"));

    // The competitor digest reaches the introduction.
    assert!(pipeline.stages[0]
        .instruction
        .contains("Título: Como dar banho no cachorro"));

    // Only the whitelisted result is offered as an external link.
    assert_eq!(pipeline.external_links.len(), 1);
    assert_eq!(
        pipeline.external_links[0].url,
        "https://www.gov.br/agricultura/pt-br/caes"
    );

    let queries = search.get_queries();
    assert_eq!(queries.len(), 1, "exactly one search per build");
    assert_eq!(queries[0].query, "banho e tosa");
    assert_eq!(queries[0].language, "pt-br");
    assert_eq!(queries[0].region, "br");
    Ok(())
}

#[tokio::test]
async fn test_build_is_deterministic_and_leaves_profile_untouched() -> anyhow::Result<()> {
    setup_tracing();
    // --- 1. Arrange ---
    let profile = builtin_profile("dr_gerson")?;
    let before = serde_json::to_value(&*profile)?;
    let factory = factory(MockSearchProvider::with_results(competitor_results()));
    let request = GenerationRequest::new("Hérnia de disco", "hérnia de disco");

    // --- 2. Act ---
    let first = factory.build_pipeline(&profile, &request).await;
    let second = factory.build_pipeline(&profile, &request).await;

    // --- 3. Assert ---
    assert_eq!(first.stages, second.stages);
    assert_eq!(first.external_links, second.external_links);
    assert_eq!(serde_json::to_value(&*profile)?, before);
    Ok(())
}

#[tokio::test]
async fn test_search_failure_degrades_to_empty_digest() -> anyhow::Result<()> {
    setup_tracing();
    // --- 1. Arrange ---
    let profile = builtin_profile("dra_tati")?;
    let factory = factory(MockSearchProvider::failing("quota exceeded"));

    // --- 2. Act ---
    let pipeline = factory
        .build_pipeline(&profile, &GenerationRequest::new("Acne", "acne"))
        .await;

    // --- 3. Assert ---
    assert!(pipeline.research.digest.is_empty());
    assert!(pipeline.external_links.is_empty());
    assert_eq!(pipeline.stages.len(), 9);
    Ok(())
}

#[tokio::test]
async fn test_article_profile_uses_its_own_result_count() -> anyhow::Result<()> {
    // --- 1. Arrange ---
    let profile = builtin_profile("dra_erika")?;
    let search = MockSearchProvider::empty();

    // --- 2. Act ---
    let pipeline = factory(search.clone())
        .build_pipeline(&profile, &GenerationRequest::new("Flacidez", "flacidez corporal"))
        .await;

    // --- 3. Assert ---
    assert_eq!(search.get_queries()[0].result_count, 5);
    assert_eq!(pipeline.stages.len(), 11);
    assert_eq!(
        &pipeline.stage_kinds()[9..],
        &[StageKind::SeoRefinement, StageKind::Packaging]
    );
    Ok(())
}

#[tokio::test]
async fn test_invictus_searches_five_competitors() -> anyhow::Result<()> {
    // --- 1. Arrange ---
    let profile = builtin_profile("invictus")?;
    let search = MockSearchProvider::empty();

    // --- 2. Act ---
    let pipeline = factory(search.clone())
        .build_pipeline(&profile, &GenerationRequest::new("SEO local", "seo local"))
        .await;

    // --- 3. Assert ---
    assert_eq!(search.get_queries()[0].result_count, 5);
    assert_eq!(pipeline.stages.len(), 9);
    Ok(())
}

#[tokio::test]
async fn test_executor_runs_stages_in_order_with_prior_context() -> anyhow::Result<()> {
    setup_tracing();
    // --- 1. Arrange ---
    let profile = builtin_profile("villa_puppy")?;
    let pipeline = factory(MockSearchProvider::empty())
        .build_pipeline(&profile, &GenerationRequest::new("Banho", "banho"))
        .await;

    let ai = MockAiProvider::new();
    for stage in &pipeline.stages {
        ai.add_response(&stage.role.role, &format!("<saida {}>", stage.kind));
    }
    let executor = PipelineExecutor::new(Arc::new(ai.clone()));

    // --- 2. Act ---
    let run = executor.run(&pipeline).await?;

    // --- 3. Assert ---
    assert_eq!(run.result, PipelineResult::Html("<saida correction>".to_string()));
    assert_eq!(run.transcript.len(), 9);

    let calls = ai.get_calls();
    assert_eq!(calls.len(), 9);
    for (i, (system, _)) in calls.iter().enumerate() {
        assert!(system.contains(&pipeline.stages[i].role.role));
    }

    // The correction stage sees every earlier output, in order.
    let (_, last_user_prompt) = &calls[8];
    let positions: Vec<usize> = StageKind::CORE[..8]
        .iter()
        .map(|k| {
            last_user_prompt
                .find(&format!("<saida {k}>"))
                .unwrap_or_else(|| panic!("missing output of {k}"))
        })
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));

    // The first stage has no prior context.
    assert!(!calls[0].1.contains("# Contexto das etapas anteriores"));
    Ok(())
}

#[tokio::test]
async fn test_failing_stage_aborts_the_run() -> anyhow::Result<()> {
    setup_tracing();
    // --- 1. Arrange ---
    let profile = builtin_profile("dr_guilherme")?;
    let pipeline = factory(MockSearchProvider::empty())
        .build_pipeline(&profile, &GenerationRequest::new("Catarata", "catarata"))
        .await;

    let ai = MockAiProvider::new();
    ai.add_failure(&pipeline.stages[3].role.role, "upstream timeout");
    ai.set_default_response("<p>ok</p>");
    let executor = PipelineExecutor::new(Arc::new(ai.clone()));

    // --- 2. Act ---
    let err = executor.run(&pipeline).await.unwrap_err();

    // --- 3. Assert ---
    match &err {
        PipelineError::Stage { stage, source } => {
            assert_eq!(stage, "conclusion");
            assert!(matches!(**source, PipelineError::AiApi(_)));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(ai.get_calls().len(), 4, "no stage runs after the failure");
    Ok(())
}

#[tokio::test]
async fn test_article_pipeline_returns_structured_package() -> anyhow::Result<()> {
    setup_tracing();
    // --- 1. Arrange ---
    let profile = builtin_profile("dra_erika")?;
    let pipeline = factory(MockSearchProvider::empty())
        .build_pipeline(&profile, &GenerationRequest::new("Flacidez", "flacidez corporal"))
        .await;

    let ai = MockAiProvider::new();
    ai.add_response(
        "Finalizador de Conteúdo para API",
        "```json\n{\"titulo\": \"Flacidez corporal\", \"meta_description\": \"Tratamentos para flacidez corporal.\", \"html_body\": \"<h2>1. O que é</h2><p>...</p>\"}\n```",
    );
    ai.set_default_response("<p>etapa</p>");
    let executor = PipelineExecutor::new(Arc::new(ai));

    // --- 2. Act ---
    let run = executor.run(&pipeline).await?;

    // --- 3. Assert ---
    let PipelineResult::Article(package) = &run.result else {
        panic!("expected article result, got {:?}", run.result);
    };
    assert_eq!(package.titulo, "Flacidez corporal");
    assert_eq!(package.html_body, "<h2>1. O que é</h2><p>...</p>");

    let json = serde_json::to_value(&run.result)?;
    assert_eq!(json["meta_description"], "Tratamentos para flacidez corporal.");
    Ok(())
}

#[tokio::test]
async fn test_unparseable_package_is_malformed_output() -> anyhow::Result<()> {
    // --- 1. Arrange ---
    let profile = builtin_profile("dra_erika")?;
    let pipeline = factory(MockSearchProvider::empty())
        .build_pipeline(&profile, &GenerationRequest::new("Melasma", "melasma"))
        .await;
    let ai = MockAiProvider::new();
    ai.set_default_response("<p>sem json</p>");

    // --- 2. Act ---
    let err = PipelineExecutor::new(Arc::new(ai))
        .run(&pipeline)
        .await
        .unwrap_err();

    // --- 3. Assert ---
    assert!(matches!(err, PipelineError::MalformedOutput { .. }));
    Ok(())
}
