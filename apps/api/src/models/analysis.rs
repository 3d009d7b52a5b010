use serde::{Deserialize, Serialize};

/// Single-text analysis request: pasted resume text plus the target role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub resume_text: String,
    #[serde(default)]
    pub target_role: String,
}

/// Result of matching a resume against a role context.
/// Built and returned within a single request; never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub match_score: u32, // 0 – 100
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub suggested_context: String,
}
