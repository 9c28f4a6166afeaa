use serde::{Deserialize, Serialize};

/// Direction of a requested vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VoteDirection {
    Up,
    Down,
}

impl VoteDirection {
    /// The stored boolean for this direction (`true` = upvote).
    pub fn as_value(self) -> bool {
        matches!(self, VoteDirection::Up)
    }

    pub fn from_value(value: bool) -> Self {
        if value {
            VoteDirection::Up
        } else {
            VoteDirection::Down
        }
    }
}

/// A stored vote record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vote {
    pub id: uuid::Uuid,
    pub user_id: uuid::Uuid,
    /// None once the referenced quote has been deleted (orphaned record,
    /// kept for audit and excluded from aggregation).
    pub quote_id: Option<uuid::Uuid>,
    pub value: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Mutation of the vote record a transition calls for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordAction {
    Create { value: bool },
    Flip { value: bool },
    Remove,
}

/// Record mutation plus the karma delta that must commit with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteDecision {
    pub action: RecordAction,
    pub karma_delta: i32,
}

/// Transition table for one (voter, quote) pair.
///
/// `current` is the stored vote value, if any. Re-casting the held direction
/// toggles the vote off; casting the opposite direction flips it with a
/// combined ±2 delta so no intermediate karma value is ever observable.
/// Total over its input domain; cannot fail.
pub fn transition(current: Option<bool>, requested: VoteDirection) -> VoteDecision {
    let value = requested.as_value();
    match current {
        None => VoteDecision {
            action: RecordAction::Create { value },
            karma_delta: if value { 1 } else { -1 },
        },
        Some(held) if held == value => VoteDecision {
            action: RecordAction::Remove,
            karma_delta: if held { -1 } else { 1 },
        },
        Some(held) => VoteDecision {
            action: RecordAction::Flip { value },
            karma_delta: if held { -2 } else { 2 },
        },
    }
}

/// Result of a cast vote operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoteOutcome {
    pub quote_id: uuid::Uuid,
    pub karma: i32,
    /// The caller's vote on this quote after the operation, if any.
    pub vote: Option<VoteDirection>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_vote_creates_record() {
        let up = transition(None, VoteDirection::Up);
        assert_eq!(up.action, RecordAction::Create { value: true });
        assert_eq!(up.karma_delta, 1);

        let down = transition(None, VoteDirection::Down);
        assert_eq!(down.action, RecordAction::Create { value: false });
        assert_eq!(down.karma_delta, -1);
    }

    #[test]
    fn test_repeat_direction_toggles_off() {
        let undo_up = transition(Some(true), VoteDirection::Up);
        assert_eq!(undo_up.action, RecordAction::Remove);
        assert_eq!(undo_up.karma_delta, -1);

        let undo_down = transition(Some(false), VoteDirection::Down);
        assert_eq!(undo_down.action, RecordAction::Remove);
        assert_eq!(undo_down.karma_delta, 1);
    }

    #[test]
    fn test_opposite_direction_flips_with_combined_delta() {
        let up_to_down = transition(Some(true), VoteDirection::Down);
        assert_eq!(up_to_down.action, RecordAction::Flip { value: false });
        assert_eq!(up_to_down.karma_delta, -2);

        let down_to_up = transition(Some(false), VoteDirection::Up);
        assert_eq!(down_to_up.action, RecordAction::Flip { value: true });
        assert_eq!(down_to_up.karma_delta, 2);
    }

    #[test]
    fn test_toggle_then_recast_nets_to_original_delta() {
        // up, up (off), up again lands back at +1 total
        let mut karma = 0;
        let mut held: Option<bool> = None;
        for _ in 0..3 {
            let decision = transition(held, VoteDirection::Up);
            karma += decision.karma_delta;
            held = match decision.action {
                RecordAction::Create { value } | RecordAction::Flip { value } => Some(value),
                RecordAction::Remove => None,
            };
        }
        assert_eq!(karma, 1);
        assert_eq!(held, Some(true));
    }

    #[test]
    fn test_direction_value_round_trip() {
        assert!(VoteDirection::Up.as_value());
        assert!(!VoteDirection::Down.as_value());
        assert_eq!(VoteDirection::from_value(true), VoteDirection::Up);
        assert_eq!(VoteDirection::from_value(false), VoteDirection::Down);
    }

    #[test]
    fn test_outcome_serializes_for_api_payloads() {
        let outcome = VoteOutcome {
            quote_id: uuid::Uuid::nil(),
            karma: -1,
            vote: Some(VoteDirection::Down),
        };
        let json = serde_json::to_string(&outcome).unwrap();
        let back: VoteOutcome = serde_json::from_str(&json).unwrap();
        assert_eq!(back.karma, -1);
        assert_eq!(back.vote, Some(VoteDirection::Down));
    }
}
