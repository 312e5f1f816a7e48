// LLM prompt constants for targeted job matching.

pub const MATCH_SYSTEM: &str = "You are an experienced technical recruiter. \
    You compare a candidate's resume against one job posting. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// Replace `{job_title}`, `{job_description}`, `{job_skills}`, `{second_person}`
/// and `{resume_text}` before sending.
pub const MATCH_PROMPT_TEMPLATE: &str = r#"Rate how well this resume fits the job.

Return a JSON object with this EXACT schema:
{
  "match_score": 0.72,
  "match_summary": "You ..."
}

Rules:
- match_score is a number between 0 and 1, where 1 is a perfect fit.
- match_summary is 2 to 3 sentences naming the strongest overlaps and the biggest gaps.
- {second_person}

JOB TITLE: {job_title}
JOB DESCRIPTION:
{job_description}
REQUIRED SKILLS: {job_skills}

RESUME:
{resume_text}"#;
