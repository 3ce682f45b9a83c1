// Shared prompt fragments.
// Each pipeline stage keeps its own templates in pipeline/prompts.rs.

/// Appended to system prompts whose reply is parsed as JSON.
pub const JSON_ONLY_INSTRUCTION: &str = "Respond with the JSON object only. \
    Do NOT include any text outside the JSON object. \
    Do NOT include explanations or apologies.";

/// Difficulty legend shared by question generation prompts.
pub const DIFFICULTY_LEGEND: &str = "1=Beginner, 2=Intermediate, 3=Advanced, 4=Expert";
