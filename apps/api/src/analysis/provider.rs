//! Analysis provider abstraction: one trait over the four scoring backends
//! (Gemini, Groq, Ollama, heuristic), selected once at startup and carried in
//! `AppState` behind the fallback wrapper.

use async_trait::async_trait;
use thiserror::Error;
use tracing::{info, warn};

use crate::analysis::gemini::GeminiProvider;
use crate::analysis::groq::GroqProvider;
use crate::analysis::heuristic::HeuristicProvider;
use crate::analysis::ollama::OllamaProvider;
use crate::config::{Config, ProviderKind};
use crate::models::resume::ResumeAnalysis;

#[derive(Debug, Clone, Default)]
pub struct AnalyzeOptions {
    pub job_description: Option<String>,
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("{0} not set in environment")]
    MissingCredentials(&'static str),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("provider returned empty content")]
    EmptyContent,

    #[error("invalid provider response: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A single analysis backend. Every implementation returns the same
/// normalized `ResumeAnalysis` shape.
#[async_trait]
pub trait AnalysisProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn analyze(
        &self,
        resume_text: &str,
        options: &AnalyzeOptions,
    ) -> Result<ResumeAnalysis, ProviderError>;
}

/// Parses a provider's text output into an analysis result, stripping any
/// markdown code fences first. Payloads missing `overallScore` or
/// `experienceLevel` fail deserialization here.
pub fn parse_analysis_response(text: &str) -> Result<ResumeAnalysis, ProviderError> {
    let cleaned = strip_json_fences(text);
    Ok(serde_json::from_str(cleaned)?)
}

/// Strips ```json ... ``` or ``` ... ``` code fences from model output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

/// The analyzer handed to request handlers: a configured primary provider
/// plus, when the primary is not already the heuristic scorer, exactly one
/// heuristic retry. The "already on heuristic" case is explicit: `fallback`
/// is `None` and failures propagate directly, so there is no retry loop.
pub struct ResumeAnalyzer {
    primary: Box<dyn AnalysisProvider>,
    fallback: Option<HeuristicProvider>,
}

impl ResumeAnalyzer {
    pub fn from_config(config: &Config) -> Self {
        let primary: Box<dyn AnalysisProvider> = match config.ai_provider {
            ProviderKind::Gemini => Box::new(GeminiProvider::new(
                config.gemini_api_key.clone(),
                config.gemini_model.clone(),
            )),
            ProviderKind::Groq => Box::new(GroqProvider::new(
                config.groq_api_key.clone(),
                config.groq_model.clone(),
            )),
            ProviderKind::Ollama => Box::new(OllamaProvider::new(
                config.ollama_host.clone(),
                config.ollama_model.clone(),
            )),
            ProviderKind::Mock => Box::new(HeuristicProvider),
        };

        let fallback = match config.ai_provider {
            ProviderKind::Mock => None,
            _ => Some(HeuristicProvider),
        };

        Self { primary, fallback }
    }

    #[cfg(test)]
    pub fn with_parts(
        primary: Box<dyn AnalysisProvider>,
        fallback: Option<HeuristicProvider>,
    ) -> Self {
        Self { primary, fallback }
    }

    pub fn primary_name(&self) -> &'static str {
        self.primary.name()
    }

    pub async fn analyze(
        &self,
        resume_text: &str,
        options: &AnalyzeOptions,
    ) -> Result<ResumeAnalysis, ProviderError> {
        info!("Analyzing with: {}", self.primary.name());

        match self.primary.analyze(resume_text, options).await {
            Ok(analysis) => {
                info!("Analysis done. Score: {}", analysis.overall_score);
                Ok(analysis)
            }
            Err(err) => match &self.fallback {
                Some(heuristic) => {
                    warn!(
                        "{} provider failed ({err}); falling back to heuristic scorer",
                        self.primary.name()
                    );
                    let analysis = heuristic.analyze(resume_text, options).await?;
                    info!("Fallback analysis done. Score: {}", analysis.overall_score);
                    Ok(analysis)
                }
                None => Err(err),
            },
        }
    }
}
