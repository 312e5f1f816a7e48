// Cross-cutting prompt fragments. Each service that calls the LLM keeps its
// own prompts.rs alongside it.

/// Narrative fields are addressed to the candidate.
pub const SECOND_PERSON_INSTRUCTION: &str = "\
    Write every narrative field in the second person, addressed directly to the \
    candidate (\"You have...\", \"Your resume...\"). Never refer to the candidate \
    in the third person.";
