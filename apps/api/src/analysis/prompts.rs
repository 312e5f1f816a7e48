// LLM prompt constants for resume analysis.
// Reuses cross-cutting fragments from llm_client::prompts.

/// System prompt for resume analysis. JSON-only output.
pub const ANALYSIS_SYSTEM: &str = "You are an experienced technical recruiter and resume coach. \
    You evaluate resumes honestly and give actionable feedback. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// Analysis prompt template. Replace `{second_person}` and `{resume_text}` before sending.
pub const ANALYSIS_PROMPT_TEMPLATE: &str = r#"Evaluate the resume below.

Return a JSON object with this EXACT schema (no extra fields):
{
  "score_overall": 7.5,
  "score_format": 7.0,
  "score_skills": 8.0,
  "score_experience": 7.0,
  "candidate_name": "Jane",
  "strengths": "You ...",
  "weaknesses": "Your ...",
  "suggestions": "Add ..."
}

Rules:
- Every score is a number from 0 to 10 (one decimal place).
- score_format: structure, headings, readability, consistent dates.
- score_skills: breadth and relevance of concrete technologies and tools.
- score_experience: depth, seniority and quantified impact of past roles.
- score_overall: your holistic judgement, not a plain average.
- candidate_name: the candidate's first name only, or null if you cannot tell.
- strengths, weaknesses, suggestions: 2 to 4 sentences each.
- {second_person}

RESUME:
{resume_text}"#;
