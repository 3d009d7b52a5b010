// Resume analysis: role context resolution, keyword scoring, document text extraction.
// Handlers only orchestrate; the matching logic lives in roles.rs and scorer.rs.

pub mod analyzer;
pub mod extract;
pub mod handlers;
pub mod roles;
pub mod scorer;
