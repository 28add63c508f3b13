pub mod gemini;
pub mod local;

use crate::errors::PipelineError;
use async_trait::async_trait;
use dyn_clone::DynClone;
use std::fmt::Debug;

/// A trait for interacting with a text-generation provider.
///
/// Every pipeline stage is a single `generate` call: the system prompt carries
/// the stage's role descriptor and the user prompt carries the stage instruction
/// together with the output of the preceding stages.
#[async_trait]
pub trait AiProvider: Send + Sync + Debug + DynClone {
    /// Generates a response from a given system and user prompt.
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, PipelineError>;
}

dyn_clone::clone_trait_object!(AiProvider);
