//! Role Context Resolver — maps a free-text target role onto the static role → skills table.
//!
//! Resolution is a bidirectional substring test over the table keys. When several keys
//! could match (e.g. "ai engineer / data scientist"), the first key in definition order
//! wins. There is no ranking between candidate keys.

use serde::Serialize;

/// Key of the fallback entry used when no role key matches.
pub const DEFAULT_ROLE: &str = "default";

/// A single row of the role table.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RoleSkills {
    pub role: &'static str,
    pub skills: &'static [&'static str],
}

impl RoleSkills {
    /// The comma-separated context string for this role.
    pub fn context(&self) -> String {
        self.skills.join(", ")
    }
}

/// Ordered role table. Definition order is the resolution order.
pub const ROLE_SKILLS: &[RoleSkills] = &[
    RoleSkills {
        role: "data scientist",
        skills: &[
            "python",
            "pandas",
            "numpy",
            "scikit-learn",
            "sklearn",
            "ml",
            "machine learning",
            "deep learning",
            "tensorflow",
            "pytorch",
            "statistics",
            "model deployment",
        ],
    },
    RoleSkills {
        role: "ai engineer",
        skills: &[
            "transformers",
            "pytorch",
            "tensorflow",
            "model deployment",
            "docker",
            "mlops",
            "onnx",
            "huggingface",
            "vector db",
            "r&d",
        ],
    },
    RoleSkills {
        role: "full stack developer",
        skills: &[
            "react",
            "node",
            "node.js",
            "express",
            "django",
            "flask",
            "sql",
            "postgres",
            "mongodb",
            "docker",
            "graphql",
        ],
    },
    RoleSkills {
        role: DEFAULT_ROLE,
        skills: &["communication", "teamwork", "problem solving"],
    },
];

/// The fallback entry. Always the last row of `ROLE_SKILLS`.
pub fn default_role() -> &'static RoleSkills {
    &ROLE_SKILLS[ROLE_SKILLS.len() - 1]
}

/// Finds the table row for a role, falling back to the default row.
///
/// The `default` row takes part in the scan like any other key, so a role such as
/// "default" resolves to it directly; the result is the same as the fallback.
pub fn lookup(role: &str) -> &'static RoleSkills {
    let key = role.trim().to_lowercase();
    if key.is_empty() {
        return default_role();
    }

    ROLE_SKILLS
        .iter()
        .find(|entry| key.contains(entry.role) || entry.role.contains(key.as_str()))
        .unwrap_or_else(default_role)
}

/// Resolves a target role to its comma-separated skill context.
pub fn resolve(role: &str) -> String {
    lookup(role).context()
}
