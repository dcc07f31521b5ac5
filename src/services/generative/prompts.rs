//! Prompt Templates
//!
//! Prompts and sampling settings for the generative analysis calls.

use policy_guardian_core::PageType;
use policy_guardian_llm::LlmRequestOptions;

/// Instruction sent with every clause rewrite.
pub const REWRITE_INSTRUCTION: &str =
    "Explain this clause in plain language and why it might be risky. Limit to two sentences.";

/// Sampling settings for structured analysis.
pub fn analysis_request_options() -> LlmRequestOptions {
    LlmRequestOptions {
        temperature_override: Some(0.2),
        top_p: Some(0.95),
        top_k: Some(40),
        max_tokens_override: None,
    }
}

/// System prompt for the analysis call.
pub fn analysis_system_prompt(page_type: Option<PageType>) -> String {
    format!(
        "You are an expert legal analyst that evaluates website {} for risky clauses. Respond using strict JSON.",
        PageType::describe(page_type)
    )
}

/// User prompt asking for the analysis JSON shape.
pub fn analysis_prompt(text: &str, page_type: Option<PageType>) -> String {
    [
        format!("Evaluate the following {}.", PageType::describe(page_type)),
        "Return JSON with the following shape:".to_string(),
        "{".to_string(),
        "  \"summary\": string,".to_string(),
        "  \"suspiciousClauses\": [".to_string(),
        "    { \"excerpt\": string, \"reason\": string, \"riskScore\": number }".to_string(),
        "  ],".to_string(),
        "  \"riskHeatmap\": [".to_string(),
        "    { \"category\": string, \"riskLevel\": number, \"evidence\": string }".to_string(),
        "  ]".to_string(),
        "}".to_string(),
        "Ensure riskLevel is between 1 (low) and 5 (critical).".to_string(),
        "Focus on privacy, sharing, arbitration, consent, cancellation, and tracking risks."
            .to_string(),
        "Text to review:".to_string(),
        text.to_string(),
    ]
    .join("\n")
}

/// System prompt for a rewrite in the given tone.
pub fn rewriter_system_prompt(tone: &str) -> String {
    format!(
        "You rewrite legal text for ordinary readers. Use a {} tone. Reply with the rewritten text only.",
        tone
    )
}

/// User prompt for a clause rewrite.
pub fn rewrite_prompt(text: &str, instruction: &str) -> String {
    format!("{}\n\nClause:\n{}", instruction, text)
}
