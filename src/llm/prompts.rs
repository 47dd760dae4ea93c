/// Roles for the editorial pipeline
pub const CONTENT_ANALYST_ROLE: &str = "content analyst";
pub const FACT_CHECKER_ROLE: &str = "fact checker";
pub const SUMMARIZER_ROLE: &str = "summarizer";
pub const EDITOR_ROLE: &str = "editor";

pub const CONTENT_ANALYST_INSTRUCTION: &str = "Analyze the following news content and provide key insights, including relevance, significance, and potential impact.";
pub const FACT_CHECKER_INSTRUCTION: &str = "Verify the factual accuracy of the following news content. Highlight any discrepancies or confirm the validity of the information.";
pub const SUMMARIZER_INSTRUCTION: &str = "Provide a concise summary of the following news article.";
pub const EDITOR_INSTRUCTION: &str = "Compose a well-structured editorial article using the following analysis, fact-check results, and summary.";

/// Stage roles for the campaign pipeline
pub const MARKETING_ANALYST_ROLE: &str = "marketing analyst";
pub const COPYWRITER_ROLE: &str = "copywriter";
pub const STRATEGIST_ROLE: &str = "marketing strategist";

pub const MARKETING_ANALYST_INSTRUCTION: &str =
    "Analyze the following website content and provide key insights for marketing strategy.";
pub const COPYWRITER_INSTRUCTION: &str =
    "Create compelling marketing copy based on the following brief.";
pub const STRATEGIST_INSTRUCTION: &str =
    "Create an innovative campaign idea based on the target audience and goals provided.";

/// Frame a role and its task instruction as the system message
pub fn system_prompt(role: &str, instruction: &str) -> String {
    format!("You are a {}. {}", role, instruction)
}
