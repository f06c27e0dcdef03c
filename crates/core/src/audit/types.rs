//! Audit log entry types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use iafa_shared::types::{AccountId, ActorId, ClosureLogId};

/// A period-affecting action worth an audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClosureAction {
    /// A period was closed in the ordinary way.
    ClosePeriod,
    /// A closed boundary was moved backwards, re-admitting transactions.
    ReopenPeriod,
    /// A period later than the open one was closed, skipping months.
    ForceClosePeriod,
}

impl std::fmt::Display for ClosureAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::ClosePeriod => "CLOSE_PERIOD",
            Self::ReopenPeriod => "REOPEN_PERIOD",
            Self::ForceClosePeriod => "FORCE_CLOSE_PERIOD",
        };
        write!(f, "{s}")
    }
}

/// One append-only audit record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClosureLogEntry {
    /// Unique identifier.
    pub id: ClosureLogId,
    /// The action recorded.
    pub action: ClosureAction,
    /// The account it affected.
    pub account_id: AccountId,
    /// Target month (1-12).
    pub month: u32,
    /// Target year.
    pub year: i32,
    /// Who performed the action.
    pub actor_id: ActorId,
    /// When it happened.
    pub recorded_at: DateTime<Utc>,
    /// Free-text detail (e.g. the reopen warning).
    pub details: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_display_matches_log_vocabulary() {
        assert_eq!(ClosureAction::ClosePeriod.to_string(), "CLOSE_PERIOD");
        assert_eq!(ClosureAction::ReopenPeriod.to_string(), "REOPEN_PERIOD");
        assert_eq!(
            ClosureAction::ForceClosePeriod.to_string(),
            "FORCE_CLOSE_PERIOD"
        );
    }
}
