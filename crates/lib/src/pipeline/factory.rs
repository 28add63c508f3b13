use super::{ExecutablePipeline, StageDefinition, StageKind};
use crate::{
    competitor::research_competitors,
    links::{
        format_link_listing, select_authoritative_external_links, LinkEntry,
        NO_EXTERNAL_LINKS_PLACEHOLDER, NO_INTERNAL_LINKS_PLACEHOLDER,
    },
    profiles::{ClientProfile, SignatureMode},
    prompts::{bullet_list, render, stages, TemplateVars},
    providers::search::SearchProvider,
    types::{GenerationRequest, SearchSettings},
};
use std::sync::Arc;
use tracing::{debug, info};

/// Instruction, base rules and expected output for one stage.
struct StageTemplate {
    instruction: &'static str,
    rules: &'static [&'static str],
    expected_output: &'static str,
}

fn template_for(kind: StageKind, signature_mode: SignatureMode) -> StageTemplate {
    use stages::*;
    let (instruction, rules, expected_output): (&str, &[&str], &str) = match kind {
        StageKind::Introduction => (
            INTRODUCTION_INSTRUCTION,
            INTRODUCTION_RULES,
            INTRODUCTION_EXPECTED_OUTPUT,
        ),
        StageKind::Outline => (OUTLINE_INSTRUCTION, OUTLINE_RULES, OUTLINE_EXPECTED_OUTPUT),
        StageKind::Body => (BODY_INSTRUCTION, BODY_RULES, BODY_EXPECTED_OUTPUT),
        StageKind::Conclusion => (
            CONCLUSION_INSTRUCTION,
            CONCLUSION_RULES,
            CONCLUSION_EXPECTED_OUTPUT,
        ),
        StageKind::Merge => (MERGE_INSTRUCTION, MERGE_RULES, MERGE_EXPECTED_OUTPUT),
        StageKind::LinkInsertion => (
            LINK_INSERTION_INSTRUCTION,
            LINK_INSERTION_RULES,
            LINK_INSERTION_EXPECTED_OUTPUT,
        ),
        StageKind::Signature => match signature_mode {
            SignatureMode::Static => (SIGNATURE_STATIC_INSTRUCTION, &[], SIGNATURE_EXPECTED_OUTPUT),
            SignatureMode::Templated => (
                SIGNATURE_TEMPLATED_INSTRUCTION,
                SIGNATURE_TEMPLATED_RULES,
                SIGNATURE_EXPECTED_OUTPUT,
            ),
        },
        StageKind::Review => (REVIEW_INSTRUCTION, REVIEW_RULES, REVIEW_EXPECTED_OUTPUT),
        StageKind::Correction => (
            CORRECTION_INSTRUCTION,
            CORRECTION_RULES,
            CORRECTION_EXPECTED_OUTPUT,
        ),
        StageKind::SeoRefinement => (
            SEO_REFINEMENT_INSTRUCTION,
            SEO_REFINEMENT_RULES,
            SEO_REFINEMENT_EXPECTED_OUTPUT,
        ),
        StageKind::Packaging => (
            PACKAGING_INSTRUCTION,
            PACKAGING_RULES,
            PACKAGING_EXPECTED_OUTPUT,
        ),
    };
    StageTemplate {
        instruction,
        rules,
        expected_output,
    }
}

/// Values shared by every stage template of one request.
fn request_vars(
    profile: &ClientProfile,
    request: &GenerationRequest,
    competitor_digest: &str,
    external_links: &[LinkEntry],
) -> TemplateVars {
    let [heading_a, heading_b] = &profile.mandated_headings;
    TemplateVars::new()
        .with("tema", request.tema.as_str())
        .with("palavra_chave", request.palavra_chave.as_str())
        .with("display_name", profile.display_name.as_str())
        .with("niche", profile.niche.as_str())
        .with("tone", profile.tone.as_str())
        .with("review_tone", profile.review_tone.as_str())
        .with("min_words", profile.min_words.to_string())
        .with("meta_max_chars", profile.meta_max_chars.to_string())
        .with("mandated_heading_a", heading_a.as_str())
        .with("mandated_heading_b", heading_b.as_str())
        .with("competitor_digest", competitor_digest)
        .with(
            "internal_links",
            format_link_listing(&profile.internal_links, NO_INTERNAL_LINKS_PLACEHOLDER),
        )
        .with(
            "external_links",
            format_link_listing(external_links, NO_EXTERNAL_LINKS_PLACEHOLDER),
        )
        .with("signature_html", profile.signature.rendered_html())
}

/// Rule lines a stage gets from the profile's flags rather than its guidance.
fn flag_rules(kind: StageKind, profile: &ClientProfile) -> Vec<&'static str> {
    let mut rules = Vec::new();
    if kind == StageKind::LinkInsertion {
        if profile.unique_url_anchor_pairs {
            rules.push(stages::LINK_UNIQUE_PAIR_RULE);
        }
        if profile.internal_links.is_empty() {
            rules.push(stages::LINK_NO_CATALOG_RULE);
        }
    }
    rules
}

/// Builds the rendered stage list for one request.
///
/// The result depends only on the arguments: composing twice with the same
/// inputs yields identical stages, and the profile is never modified. Article
/// profiles get the two trailing stages; a trailing stage whose role is not
/// defined is left out.
pub fn compose_stages(
    profile: &ClientProfile,
    request: &GenerationRequest,
    competitor_digest: &str,
    external_links: &[LinkEntry],
) -> Vec<StageDefinition> {
    let vars = request_vars(profile, request, competitor_digest, external_links);

    StageKind::sequence(profile.output)
        .into_iter()
        .filter_map(|kind| {
            let role = profile.roles.for_stage(kind)?.clone();
            let template = template_for(kind, profile.signature.mode);

            let rules = template
                .rules
                .iter()
                .copied()
                .chain(flag_rules(kind, profile))
                .chain(profile.guidance.for_stage(kind).iter().map(String::as_str));
            let rules = bullet_list(rules, &vars);

            let mut instruction = render(
                template.instruction,
                &vars.clone().with("rules", rules.as_str()),
            );
            // The static signature template has no rules slot.
            if kind == StageKind::Signature
                && profile.signature.mode == SignatureMode::Static
                && !rules.is_empty()
            {
                instruction.push_str("\n\nRegras:\n");
                instruction.push_str(&rules);
            }

            Some(StageDefinition {
                kind,
                role,
                instruction,
                expected_output: render(template.expected_output, &vars),
            })
        })
        .collect()
}

/// Builds executable pipelines, performing the one competitor search each needs.
#[derive(Debug, Clone)]
pub struct PipelineFactory {
    search: Arc<dyn SearchProvider>,
    search_settings: SearchSettings,
}

impl PipelineFactory {
    pub fn new(search: Arc<dyn SearchProvider>, search_settings: SearchSettings) -> Self {
        Self {
            search,
            search_settings,
        }
    }

    /// Searches for the keyword, filters external candidates and renders every stage.
    pub async fn build_pipeline(
        &self,
        profile: &ClientProfile,
        request: &GenerationRequest,
    ) -> ExecutablePipeline {
        let mut settings = self.search_settings.clone();
        if let Some(count) = profile.search_result_count {
            settings.result_count = count;
        }

        let research =
            research_competitors(self.search.as_ref(), &request.palavra_chave, &settings).await;
        let external_links = select_authoritative_external_links(
            &research.results,
            &profile.external_whitelist,
            profile.max_external_links,
        );
        debug!(
            client = %profile.slug,
            candidates = research.results.len(),
            accepted = external_links.len(),
            "Filtered external link candidates"
        );

        let stages = compose_stages(profile, request, &research.digest, &external_links);
        info!(client = %profile.slug, stages = stages.len(), "Built content pipeline");

        ExecutablePipeline {
            client: profile.slug.clone(),
            request: request.clone(),
            research,
            external_links,
            stages,
            output: profile.output,
            meta_max_chars: profile.meta_max_chars,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiles::ProfileRegistry;

    fn profile(slug: &str) -> std::sync::Arc<ClientProfile> {
        ProfileRegistry::builtin()
            .unwrap()
            .get(slug)
            .expect("builtin profile")
    }

    fn stage(stages: &[StageDefinition], kind: StageKind) -> &StageDefinition {
        stages.iter().find(|s| s.kind == kind).unwrap()
    }

    #[test]
    fn unbound_placeholders_never_survive_composition() {
        let request = GenerationRequest::new("Banho e tosa", "banho e tosa");
        let registry = ProfileRegistry::builtin().unwrap();
        for p in registry.profiles() {
            for s in compose_stages(p, &request, "", &[]) {
                for name in ["{tema}", "{palavra_chave}", "{rules}", "{min_words}", "{tone}"] {
                    assert!(
                        !s.instruction.contains(name),
                        "{} / {} still contains {name}",
                        p.slug,
                        s.kind
                    );
                }
            }
        }
    }

    #[test]
    fn static_signature_is_embedded_verbatim() {
        let p = profile("invictus");
        let stages = compose_stages(&p, &GenerationRequest::new("SEO local", "seo"), "", &[]);
        let signature = stage(&stages, StageKind::Signature);
        assert!(signature.instruction.contains("Av. Casa Verde, 751"));
        assert!(signature.instruction.contains("phone=5511947974924"));
        assert!(!signature.instruction.contains("{whatsapp_url}"));
    }

    #[test]
    fn link_rules_follow_profile_flags() {
        let p = profile("invictus");
        let stages = compose_stages(&p, &GenerationRequest::new("a", "b"), "", &[]);
        let links = stage(&stages, StageKind::LinkInsertion);
        assert!(links.instruction.contains(stages::LINK_UNIQUE_PAIR_RULE));
        assert!(links.instruction.contains(stages::LINK_NO_CATALOG_RULE));
        assert!(links.instruction.contains(NO_INTERNAL_LINKS_PLACEHOLDER));
        assert!(links.instruction.contains(NO_EXTERNAL_LINKS_PLACEHOLDER));

        let p = profile("villa_puppy");
        let stages = compose_stages(&p, &GenerationRequest::new("a", "b"), "", &[]);
        let links = stage(&stages, StageKind::LinkInsertion);
        assert!(!links.instruction.contains(stages::LINK_NO_CATALOG_RULE));
        assert!(links.instruction.contains("https://villapuppy.com.br/#servicos"));
    }

    #[test]
    fn external_candidates_are_listed_for_link_insertion() {
        let p = profile("villa_puppy");
        let external = vec![LinkEntry::new(
            "Vacinação de cães",
            "https://www.gov.br/agricultura/vacinas",
            "vacinação de cães",
        )];
        let stages = compose_stages(&p, &GenerationRequest::new("a", "b"), "", &external);
        let links = stage(&stages, StageKind::LinkInsertion);
        assert!(links
            .instruction
            .contains("- Vacinação de cães: https://www.gov.br/agricultura/vacinas"));
    }

    #[test]
    fn digest_is_substituted_without_rescanning() {
        let p = profile("villa_puppy");
        let digest = "Título: Guia {palavra_chave}\nTrecho: x\nURL: https://a.com\n";
        let stages = compose_stages(&p, &GenerationRequest::new("a", "tosa"), digest, &[]);
        let intro = stage(&stages, StageKind::Introduction);
        assert!(intro.instruction.contains("Título: Guia {palavra_chave}"));
    }

    #[test]
    fn article_expected_output_mentions_meta_limit() {
        let p = profile("dra_erika");
        let stages = compose_stages(&p, &GenerationRequest::new("a", "b"), "", &[]);
        let seo = stage(&stages, StageKind::SeoRefinement);
        assert!(seo.instruction.contains("até 160 caracteres"));
    }
}
