//! Analysis pipeline: resolve role → score resume against context → assemble result.

use tracing::info;

use crate::analysis::roles;
use crate::analysis::scorer::MatchScorer;
use crate::errors::AppError;
use crate::models::analysis::AnalysisResult;

/// Runs a full analysis of `resume_text` for `target_role`.
/// The resolved context is returned verbatim as `suggested_context`.
pub async fn analyze(
    resume_text: &str,
    target_role: &str,
    scorer: &dyn MatchScorer,
) -> Result<AnalysisResult, AppError> {
    let context = roles::resolve(target_role);

    let report = scorer.score(resume_text, &context).await?;

    info!(
        target_role = %target_role.trim(),
        backend = scorer.backend(),
        keywords = report.keyword_count(),
        score = report.score,
        "Resume analyzed"
    );

    Ok(AnalysisResult {
        match_score: report.score,
        matched_skills: report.matched,
        missing_skills: report.missing,
        suggested_context: context,
    })
}
