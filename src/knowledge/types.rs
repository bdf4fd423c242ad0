//! Knowledge chunk data model.

use serde::{Deserialize, Serialize};

/// Who a rule applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Audience {
    Magistrate,
    Employee,
    Both,
}

impl std::fmt::Display for Audience {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Magistrate => write!(f, "Magistrate"),
            Self::Employee => write!(f, "Employee"),
            Self::Both => write!(f, "Both"),
        }
    }
}

/// Closed set of topic areas covered by the knowledge base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Vacation,
    RemoteWork,
    TransportAllowance,
    HealthAllowance,
    CompensatoryLeave,
    Attendance,
    Governance,
}

impl Category {
    /// Every category, in declaration order.
    pub const ALL: [Self; 7] = [
        Self::Vacation,
        Self::RemoteWork,
        Self::TransportAllowance,
        Self::HealthAllowance,
        Self::CompensatoryLeave,
        Self::Attendance,
        Self::Governance,
    ];

    /// Kebab-case identifier, as used in the dataset and on the command line.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Vacation => "vacation",
            Self::RemoteWork => "remote-work",
            Self::TransportAllowance => "transport-allowance",
            Self::HealthAllowance => "health-allowance",
            Self::CompensatoryLeave => "compensatory-leave",
            Self::Attendance => "attendance",
            Self::Governance => "governance",
        }
    }

    /// Human label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Vacation => "Vacation",
            Self::RemoteWork => "Remote Work",
            Self::TransportAllowance => "Transport Allowance",
            Self::HealthAllowance => "Health Allowance",
            Self::CompensatoryLeave => "Compensatory Leave",
            Self::Attendance => "Attendance",
            Self::Governance => "Governance",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for Category {
    type Err = crate::error::Error;

    /// Accepts the kebab-case id or the human label, case-insensitively
    /// (`remote-work`, `Remote Work`, `remote_work`).
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .to_lowercase()
            .chars()
            .map(|c| if c == ' ' || c == '_' { '-' } else { c })
            .collect();

        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == normalized)
            .ok_or_else(|| crate::error::Error::UnknownCategory(s.to_string()))
    }
}

/// One retrievable unit of knowledge.
///
/// Immutable once loaded. `id` is unique within a store and `content` is
/// never empty; [`KnowledgeStore`](super::KnowledgeStore) enforces both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeChunk {
    pub id: String,
    /// Human label grouping related rules (e.g. "Health Allowance Reimbursement").
    pub module: String,
    pub audience: Audience,
    pub title: String,
    pub content: String,
    /// Lowercase terms for literal keyword matching.
    #[serde(default)]
    pub keywords: Vec<String>,
    pub category: Category,
}

impl KnowledgeChunk {
    /// Text submitted to the embedding provider for this chunk.
    #[must_use]
    pub fn embedding_text(&self) -> String {
        format!("{}\n{}", self.title, self.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_str_variants() {
        assert_eq!("remote-work".parse::<Category>().unwrap(), Category::RemoteWork);
        assert_eq!("Remote Work".parse::<Category>().unwrap(), Category::RemoteWork);
        assert_eq!("HEALTH_ALLOWANCE".parse::<Category>().unwrap(), Category::HealthAllowance);
        assert!("payroll".parse::<Category>().is_err());
    }

    #[test]
    fn test_category_serde_is_kebab_case() {
        let json = serde_json::to_string(&Category::CompensatoryLeave).unwrap();
        assert_eq!(json, "\"compensatory-leave\"");
    }

    #[test]
    fn test_embedding_text_joins_title_and_content() {
        let chunk = KnowledgeChunk {
            id: "a".into(),
            module: "Vacation".into(),
            audience: Audience::Magistrate,
            title: "Vacation sale".into(),
            content: "Up to 10 days.".into(),
            keywords: vec![],
            category: Category::Vacation,
        };
        assert_eq!(chunk.embedding_text(), "Vacation sale\nUp to 10 days.");
    }
}
