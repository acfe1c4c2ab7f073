/// System prompt for chat-style providers (Groq, Ollama).
pub const REVIEW_SYSTEM: &str =
    "You are an expert resume reviewer. Respond ONLY with valid JSON.";

/// Builds the review prompt shared by all LLM providers. The model is told to
/// return bare JSON matching the normalized analysis shape; any markdown
/// fences it adds anyway are stripped before parsing.
pub fn build_review_prompt(resume_text: &str, job_description: Option<&str>) -> String {
    let mut prompt = format!(
        r#"You are an expert resume reviewer. Analyze this resume and provide feedback in JSON format.

Resume:
{resume_text}

Return ONLY valid JSON (no markdown) with this structure:
{{
  "overallScore": <number 0-100>,
  "experienceLevel": "<entry|mid|senior|executive>",
  "strengths": ["strength 1", "strength 2", "..."],
  "weaknesses": ["weakness 1", "weakness 2", "..."],
  "suggestions": ["suggestion 1", "suggestion 2", "..."],
  "keywords": ["keyword 1", "keyword 2", "..."],
  "sections": {{
    "hasContact": <boolean>,
    "hasSummary": <boolean>,
    "hasExperience": <boolean>,
    "hasEducation": <boolean>,
    "hasSkills": <boolean>
  }}
}}

Scoring: 90-100 exceptional, 80-89 excellent, 70-79 good, 60-69 fair, below 60 needs work."#
    );

    if let Some(jd) = job_description {
        prompt.push_str(&format!(
            "\n\nTarget job description (tailor the feedback to it):\n{jd}"
        ));
    }

    prompt
}
