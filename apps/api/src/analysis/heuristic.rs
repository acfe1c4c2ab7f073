//! Deterministic rule-based scorer. Serves two roles: the `mock` provider
//! when configured as primary, and the single fallback attempt when a cloud
//! provider fails. No network, no randomness: identical input text always
//! yields the identical result.

use async_trait::async_trait;
use chrono::Utc;

use crate::analysis::provider::{AnalysisProvider, AnalyzeOptions, ProviderError};
use crate::models::resume::{ExperienceLevel, ResumeAnalysis, SectionPresence};

const TECH_KEYWORDS: &[&str] = &[
    "javascript",
    "python",
    "java",
    "react",
    "node",
    "sql",
    "aws",
    "docker",
    "git",
];

const SOFT_KEYWORDS: &[&str] = &[
    "leadership",
    "communication",
    "teamwork",
    "problem-solving",
];

/// Distinct keywords needed before keyword coverage counts as a strength.
const KEYWORD_STRENGTH_THRESHOLD: usize = 5;

pub struct HeuristicProvider;

#[async_trait]
impl AnalysisProvider for HeuristicProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn analyze(
        &self,
        resume_text: &str,
        _options: &AnalyzeOptions,
    ) -> Result<ResumeAnalysis, ProviderError> {
        Ok(score_resume(resume_text))
    }
}

/// The scoring core, kept synchronous and pure.
///
/// Weights: 8 each for contact/summary, 10 for experience, 7 each for
/// education/skills, 3 per matched keyword capped at 30, and 30 for a word
/// count in [300, 900] (15 otherwise). Total clamped to 100.
pub fn score_resume(resume_text: &str) -> ResumeAnalysis {
    let lower = resume_text.to_lowercase();

    let keywords: Vec<String> = TECH_KEYWORDS
        .iter()
        .chain(SOFT_KEYWORDS.iter())
        .filter(|kw| lower.contains(*kw))
        .map(|kw| kw.to_string())
        .collect();

    let sections = detect_sections(&lower);
    let word_count = resume_text.split_whitespace().count();

    let mut score: u32 = 0;
    score += if sections.has_contact { 8 } else { 0 };
    score += if sections.has_summary { 8 } else { 0 };
    score += if sections.has_experience { 10 } else { 0 };
    score += if sections.has_education { 7 } else { 0 };
    score += if sections.has_skills { 7 } else { 0 };
    score += (keywords.len() as u32 * 3).min(30);
    score += if (300..=900).contains(&word_count) { 30 } else { 15 };

    let mut strengths = Vec::new();
    let mut weaknesses = Vec::new();
    let mut suggestions = Vec::new();

    if sections.has_contact {
        strengths.push("Contact information present".to_string());
    } else {
        weaknesses.push("Missing contact info".to_string());
    }

    if sections.has_experience {
        strengths.push("Work experience documented".to_string());
    } else {
        suggestions.push("Add work experience section".to_string());
    }

    if keywords.len() >= KEYWORD_STRENGTH_THRESHOLD {
        strengths.push(format!("{} relevant keywords found", keywords.len()));
    } else {
        suggestions.push("Add more industry keywords".to_string());
    }

    ResumeAnalysis {
        overall_score: score.min(100) as u8,
        experience_level: classify_experience(&lower),
        strengths,
        weaknesses,
        suggestions,
        keywords,
        sections,
        analyzed_at: Utc::now(),
    }
}

fn detect_sections(lower: &str) -> SectionPresence {
    SectionPresence {
        has_contact: contains_any(lower, &["email", "phone", "@", "+"]),
        has_summary: contains_any(lower, &["summary", "objective", "profile"]),
        has_experience: contains_any(lower, &["experience", "employment", "work history"]),
        has_education: contains_any(lower, &["education", "degree", "university", "bachelor"]),
        has_skills: contains_any(lower, &["skills", "technologies", "competencies"]),
    }
}

fn classify_experience(lower: &str) -> ExperienceLevel {
    if contains_any(lower, &["senior", "lead"]) {
        ExperienceLevel::Senior
    } else if contains_any(lower, &["entry", "junior"]) {
        ExperienceLevel::Entry
    } else {
        ExperienceLevel::Mid
    }
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic_for_identical_input() {
        let text = "Email: a@b.com Summary: engineer. Experience with python, docker and git.";
        let first = score_resume(text);
        let second = score_resume(text);
        assert_eq!(first.overall_score, second.overall_score);
        assert_eq!(first.keywords, second.keywords);
        assert_eq!(first.sections, second.sections);
    }

    #[test]
    fn test_minimal_resume_scenario() {
        // Contact (8) + experience (10) + skills (7) + 2 keywords (6) + word
        // band miss (15) = 46.
        let text = "Email: x@y.com Experience: shipped backend services. Skills: Python Docker";
        let analysis = score_resume(text);

        assert!(analysis.sections.has_contact);
        assert!(analysis.sections.has_experience);
        assert!(analysis.sections.has_skills);
        assert!(analysis.keywords.contains(&"python".to_string()));
        assert!(analysis.keywords.contains(&"docker".to_string()));
        assert!(analysis.overall_score >= 31);
        assert_eq!(analysis.experience_level, ExperienceLevel::Mid);
    }

    #[test]
    fn test_keyword_points_capped_at_30() {
        // All 13 vocabulary keywords present: 13 * 3 = 39, capped at 30.
        let text = "javascript python java react node sql aws docker git \
                    leadership communication teamwork problem-solving";
        let analysis = score_resume(text);
        assert_eq!(analysis.keywords.len(), 13);
        // contact ('+' absent, '@' absent, no email/phone) = 0; no sections
        // beyond none; 30 keyword points + 15 word-band = 45.
        assert_eq!(analysis.overall_score, 45);
    }

    #[test]
    fn test_word_count_band_awards_30() {
        let filler = "word ".repeat(400);
        let short = score_resume("experience");
        let ideal = score_resume(&format!("experience {filler}"));
        // Same sections/keywords, only the word band differs by 15 points.
        assert_eq!(ideal.overall_score - short.overall_score, 15);
    }

    #[test]
    fn test_experience_level_markers() {
        assert_eq!(
            score_resume("Senior staff engineer").experience_level,
            ExperienceLevel::Senior
        );
        assert_eq!(
            score_resume("Junior developer").experience_level,
            ExperienceLevel::Entry
        );
        assert_eq!(
            score_resume("Software developer").experience_level,
            ExperienceLevel::Mid
        );
        // Senior markers win when both appear.
        assert_eq!(
            score_resume("Senior engineer, previously junior analyst").experience_level,
            ExperienceLevel::Senior
        );
    }

    #[test]
    fn test_missing_sections_produce_feedback() {
        let analysis = score_resume("just some plain text with nothing useful");
        assert!(analysis
            .weaknesses
            .contains(&"Missing contact info".to_string()));
        assert!(analysis
            .suggestions
            .contains(&"Add work experience section".to_string()));
        assert!(analysis
            .suggestions
            .contains(&"Add more industry keywords".to_string()));
        assert!(analysis.strengths.is_empty());
    }

    #[test]
    fn test_keyword_threshold_strength() {
        let analysis = score_resume("python java react sql git experience email@x.com");
        assert!(analysis
            .strengths
            .contains(&"5 relevant keywords found".to_string()));
    }

    #[test]
    fn test_score_never_exceeds_100() {
        let filler = "summary objective experience education skills email phone ".repeat(60);
        let text = format!(
            "{filler} javascript python java react node sql aws docker git \
             leadership communication teamwork problem-solving"
        );
        let analysis = score_resume(&text);
        assert!(analysis.overall_score <= 100);
    }
}
