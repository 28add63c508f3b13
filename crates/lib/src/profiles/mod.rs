//! # Client Profiles
//!
//! Everything that differs between clients is data: tone, role descriptors,
//! extra rule lines per stage, mandated outline headings, the signature block,
//! the internal link catalog and the external-domain whitelist. Profiles are
//! YAML documents compiled into the binary, optionally overlaid by an
//! operator-supplied directory.

use crate::{
    errors::PipelineError,
    links::{validate_catalog, LinkEntry, DEFAULT_MAX_EXTERNAL_LINKS},
    pipeline::{RoleDescriptor, StageKind},
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fs,
    path::Path,
    sync::Arc,
};
use tracing::{debug, info};

/// Paths served by the HTTP layer itself; no client may answer on them.
pub const RESERVED_ROUTES: &[&str] = &["teste", "health", "clients"];

/// Suffix of the alias route every client answers on.
pub const BACKLINK_ROUTE_SUFFIX: &str = "_backlink";

const WHATSAPP_PLACEHOLDER: &str = "{whatsapp_url}";

const BUILTIN_PROFILES: &[(&str, &str)] = &[
    ("invictus", include_str!("../../profiles/invictus.yml")),
    ("villa_puppy", include_str!("../../profiles/villa_puppy.yml")),
    ("dr_gerson", include_str!("../../profiles/dr_gerson.yml")),
    ("dr_guilherme", include_str!("../../profiles/dr_guilherme.yml")),
    ("dr_gustavo", include_str!("../../profiles/dr_gustavo.yml")),
    ("dra_angelica", include_str!("../../profiles/dra_angelica.yml")),
    ("dra_catarine", include_str!("../../profiles/dra_catarine.yml")),
    ("dra_emmen", include_str!("../../profiles/dra_emmen.yml")),
    ("dra_erika", include_str!("../../profiles/dra_erika.yml")),
    ("dra_karen", include_str!("../../profiles/dra_karen.yml")),
    ("dra_tati", include_str!("../../profiles/dra_tati.yml")),
];

/// The role descriptor assigned to each stage.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RoleTable {
    pub introduction: RoleDescriptor,
    pub outline: RoleDescriptor,
    pub body: RoleDescriptor,
    pub conclusion: RoleDescriptor,
    pub merge: RoleDescriptor,
    pub link_insertion: RoleDescriptor,
    pub signature: RoleDescriptor,
    pub review: RoleDescriptor,
    pub correction: RoleDescriptor,
    #[serde(default)]
    pub seo_refinement: Option<RoleDescriptor>,
    #[serde(default)]
    pub packaging: Option<RoleDescriptor>,
}

impl RoleTable {
    /// The role for a stage; `None` for an article stage the table doesn't define.
    pub fn for_stage(&self, kind: StageKind) -> Option<&RoleDescriptor> {
        match kind {
            StageKind::Introduction => Some(&self.introduction),
            StageKind::Outline => Some(&self.outline),
            StageKind::Body => Some(&self.body),
            StageKind::Conclusion => Some(&self.conclusion),
            StageKind::Merge => Some(&self.merge),
            StageKind::LinkInsertion => Some(&self.link_insertion),
            StageKind::Signature => Some(&self.signature),
            StageKind::Review => Some(&self.review),
            StageKind::Correction => Some(&self.correction),
            StageKind::SeoRefinement => self.seo_refinement.as_ref(),
            StageKind::Packaging => self.packaging.as_ref(),
        }
    }
}

/// Client-specific rule lines appended after each stage's base rules.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct StageGuidance {
    pub introduction: Vec<String>,
    pub outline: Vec<String>,
    pub body: Vec<String>,
    pub conclusion: Vec<String>,
    pub merge: Vec<String>,
    pub link_insertion: Vec<String>,
    pub signature: Vec<String>,
    pub review: Vec<String>,
    pub correction: Vec<String>,
    pub seo_refinement: Vec<String>,
    pub packaging: Vec<String>,
}

impl StageGuidance {
    pub fn for_stage(&self, kind: StageKind) -> &[String] {
        match kind {
            StageKind::Introduction => &self.introduction,
            StageKind::Outline => &self.outline,
            StageKind::Body => &self.body,
            StageKind::Conclusion => &self.conclusion,
            StageKind::Merge => &self.merge,
            StageKind::LinkInsertion => &self.link_insertion,
            StageKind::Signature => &self.signature,
            StageKind::Review => &self.review,
            StageKind::Correction => &self.correction,
            StageKind::SeoRefinement => &self.seo_refinement,
            StageKind::Packaging => &self.packaging,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SignatureMode {
    /// Appended verbatim.
    #[default]
    Static,
    /// Bracketed placeholders are adapted to the topic by the model.
    Templated,
}

/// The contact/call-to-action block appended by the signature stage.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Signature {
    #[serde(default)]
    pub mode: SignatureMode,
    pub html: String,
    #[serde(default)]
    pub whatsapp_url: Option<String>,
}

impl Signature {
    /// The signature HTML with the client's WhatsApp URL filled in.
    pub fn rendered_html(&self) -> String {
        match &self.whatsapp_url {
            Some(url) => self.html.replace(WHATSAPP_PLACEHOLDER, url),
            None => self.html.clone(),
        }
    }
}

/// The shape of the final result returned for a client.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// The corrected HTML fragment.
    #[default]
    Html,
    /// `{titulo, meta_description, html_body}` after SEO refinement and packaging.
    Article,
}

fn default_max_external_links() -> usize {
    DEFAULT_MAX_EXTERNAL_LINKS
}

fn default_min_words() -> u32 {
    1200
}

fn default_meta_max_chars() -> u32 {
    160
}

/// Static configuration for one content persona.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClientProfile {
    pub slug: String,
    pub display_name: String,
    /// Free-text description of the client's domain.
    pub niche: String,
    /// The tone line given to the introduction stage.
    pub tone: String,
    /// The tone the review stage checks against.
    pub review_tone: String,
    pub roles: RoleTable,
    #[serde(default)]
    pub guidance: StageGuidance,
    /// The "common mistakes" and "practical examples" headings, in the client's wording.
    pub mandated_headings: [String; 2],
    pub signature: Signature,
    #[serde(default)]
    pub internal_links: Vec<LinkEntry>,
    #[serde(default)]
    pub external_whitelist: Vec<String>,
    #[serde(default = "default_max_external_links")]
    pub max_external_links: usize,
    /// Overrides the configured competitor search result count.
    #[serde(default)]
    pub search_result_count: Option<u32>,
    #[serde(default = "default_min_words")]
    pub min_words: u32,
    #[serde(default = "default_meta_max_chars")]
    pub meta_max_chars: u32,
    /// Forbids repeating a URL with the same anchor.
    #[serde(default)]
    pub unique_url_anchor_pairs: bool,
    #[serde(default)]
    pub output: OutputFormat,
    /// Routes answered in addition to `<slug>` and `<slug>_backlink`.
    #[serde(default)]
    pub route_aliases: Vec<String>,
}

impl ClientProfile {
    /// Parses a profile from YAML and validates it.
    pub fn from_yaml(name: &str, source: &str) -> Result<Self, PipelineError> {
        let profile: ClientProfile =
            serde_yaml::from_str(source).map_err(|source| PipelineError::ProfileParse {
                name: name.to_string(),
                source,
            })?;
        profile.validate()?;
        Ok(profile)
    }

    /// Every route this client answers on.
    pub fn routes(&self) -> Vec<String> {
        let mut routes = vec![
            self.slug.clone(),
            format!("{}{}", self.slug, BACKLINK_ROUTE_SUFFIX),
        ];
        for alias in &self.route_aliases {
            if !routes.contains(alias) {
                routes.push(alias.clone());
            }
        }
        routes
    }

    pub fn validate(&self) -> Result<(), PipelineError> {
        let invalid = |reason: &str| PipelineError::InvalidProfile {
            slug: self.slug.clone(),
            reason: reason.to_string(),
        };

        let slug_re = Regex::new(r"^[a-z0-9][a-z0-9_-]*$")?;
        if !slug_re.is_match(&self.slug) {
            return Err(invalid("slug must be lowercase ascii, digits, '_' or '-'"));
        }
        for alias in &self.route_aliases {
            if !slug_re.is_match(alias) {
                return Err(invalid("route aliases follow the slug format"));
            }
        }
        if let Some(route) = self
            .routes()
            .into_iter()
            .find(|r| RESERVED_ROUTES.contains(&r.as_str()))
        {
            return Err(invalid(&format!("route '{route}' is reserved")));
        }
        if self.display_name.trim().is_empty() {
            return Err(invalid("display_name is empty"));
        }
        if self.mandated_headings.iter().any(|h| h.trim().is_empty()) {
            return Err(invalid("mandated_headings must both be non-empty"));
        }
        if self.signature.html.trim().is_empty() {
            return Err(invalid("signature html is empty"));
        }
        if self.signature.html.contains(WHATSAPP_PLACEHOLDER) && self.signature.whatsapp_url.is_none()
        {
            return Err(invalid("signature references {whatsapp_url} but none is set"));
        }

        let roles = &self.roles;
        let required = [
            &roles.introduction,
            &roles.outline,
            &roles.body,
            &roles.conclusion,
            &roles.merge,
            &roles.link_insertion,
            &roles.signature,
            &roles.review,
            &roles.correction,
        ];
        if required.iter().any(|r| r.role.trim().is_empty()) {
            return Err(invalid("every stage needs a role"));
        }
        if self.output == OutputFormat::Article
            && (roles.seo_refinement.is_none() || roles.packaging.is_none())
        {
            return Err(invalid(
                "article output requires seo_refinement and packaging roles",
            ));
        }

        validate_catalog(&self.slug, &self.internal_links)
    }
}

/// The read-only set of client profiles, keyed by slug and by route.
#[derive(Debug, Clone, Default)]
pub struct ProfileRegistry {
    profiles: BTreeMap<String, Arc<ClientProfile>>,
    routes: BTreeMap<String, String>,
}

impl ProfileRegistry {
    /// Loads the profiles compiled into the crate.
    pub fn builtin() -> Result<Self, PipelineError> {
        let mut registry = Self::default();
        for (name, source) in BUILTIN_PROFILES {
            registry.insert(ClientProfile::from_yaml(name, source)?)?;
        }
        debug!(count = registry.len(), "Loaded built-in client profiles");
        Ok(registry)
    }

    /// Overlays every `*.yml`/`*.yaml` file in `dir`, replacing profiles with the same slug.
    pub fn with_directory(mut self, dir: impl AsRef<Path>) -> Result<Self, PipelineError> {
        let dir = dir.as_ref();
        let mut paths: Vec<_> = fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| {
                matches!(
                    p.extension().and_then(|e| e.to_str()),
                    Some("yml") | Some("yaml")
                )
            })
            .collect();
        paths.sort();

        for path in paths {
            let source = fs::read_to_string(&path)?;
            let profile = ClientProfile::from_yaml(&path.display().to_string(), &source)?;
            info!(slug = %profile.slug, path = %path.display(), "Loaded client profile from directory");
            self.insert(profile)?;
        }
        Ok(self)
    }

    /// Adds or replaces a profile. Fails when one of its routes belongs to another client.
    pub fn insert(&mut self, profile: ClientProfile) -> Result<(), PipelineError> {
        profile.validate()?;
        let routes = profile.routes();
        for route in &routes {
            if let Some(owner) = self.routes.get(route) {
                if owner != &profile.slug {
                    return Err(PipelineError::InvalidProfile {
                        slug: profile.slug.clone(),
                        reason: format!("route '{route}' is already served by '{owner}'"),
                    });
                }
            }
        }

        self.routes.retain(|_, owner| owner != &profile.slug);
        for route in routes {
            self.routes.insert(route, profile.slug.clone());
        }
        self.profiles
            .insert(profile.slug.clone(), Arc::new(profile));
        Ok(())
    }

    pub fn get(&self, slug: &str) -> Option<Arc<ClientProfile>> {
        self.profiles.get(slug).cloned()
    }

    /// Finds the profile serving a route such as `villa_puppy_backlink`.
    pub fn resolve_route(&self, route: &str) -> Result<Arc<ClientProfile>, PipelineError> {
        self.routes
            .get(route)
            .and_then(|slug| self.get(slug))
            .ok_or_else(|| PipelineError::UnknownClient(route.to_string()))
    }

    pub fn slugs(&self) -> impl Iterator<Item = &str> {
        self.profiles.keys().map(String::as_str)
    }

    pub fn profiles(&self) -> impl Iterator<Item = &Arc<ClientProfile>> {
        self.profiles.values()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}
