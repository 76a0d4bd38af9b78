//! Client task status lifecycle.
//!
//! Staff move tasks freely between `queued`, `in_progress`, `alteration` and
//! `done`. A few moves are barred:
//!
//! - `suggested` is only ever an initial state, never a target;
//! - a suggested task can only be approved (`queued`) or `rejected`;
//! - `rejected` is terminal.
//!
//! Each entry into `alteration` from another state counts one rework cycle.
//! Writing `alteration` over `alteration` does not.
//!
//! ```rust
//! use sprintdesk_core::{lifecycle::plan_transition, models::TaskStatus};
//!
//! let effect = plan_transition(TaskStatus::Done, TaskStatus::Alteration)?;
//! assert!(effect.increments_alteration);
//!
//! let effect = plan_transition(TaskStatus::Alteration, TaskStatus::Alteration)?;
//! assert!(!effect.increments_alteration);
//! # Ok::<(), sprintdesk_core::TrackerError>(())
//! ```

use crate::{
    error::{Result, TrackerError},
    models::TaskStatus,
};

/// Side effects a status change carries alongside the new status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransitionEffect {
    /// Bump `alteration_count` by one in the same write
    pub increments_alteration: bool,
    /// File the task under the client's active sprint (approval)
    pub assigns_sprint: bool,
}

impl TransitionEffect {
    /// No side effects.
    pub const NONE: TransitionEffect = TransitionEffect {
        increments_alteration: false,
        assigns_sprint: false,
    };
}

impl TaskStatus {
    /// Statuses a task in this status may be moved to, excluding itself.
    pub fn allowed_targets(self) -> &'static [TaskStatus] {
        use TaskStatus::*;

        match self {
            Suggested => &[Queued, Rejected],
            Queued => &[InProgress, Alteration, Done, Rejected],
            InProgress => &[Queued, Alteration, Done, Rejected],
            Alteration => &[Queued, InProgress, Done, Rejected],
            Done => &[Queued, InProgress, Alteration, Rejected],
            Rejected => &[],
        }
    }

    /// Whether a status write from `self` to `to` is accepted.
    pub fn can_transition_to(self, to: TaskStatus) -> bool {
        self == to || self.allowed_targets().contains(&to)
    }
}

/// Decides whether `from → to` is allowed and what it implies.
///
/// The decision depends on the previously persisted status, so callers must
/// read it in the same transaction as the write.
pub fn plan_transition(from: TaskStatus, to: TaskStatus) -> Result<TransitionEffect> {
    if from == to {
        return Ok(TransitionEffect::NONE);
    }
    if !from.can_transition_to(to) {
        return Err(TrackerError::InvalidTransition { from, to });
    }

    Ok(TransitionEffect {
        increments_alteration: to == TaskStatus::Alteration,
        assigns_sprint: from == TaskStatus::Suggested && to == TaskStatus::Queued,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use TaskStatus::*;

    #[test]
    fn test_same_status_write_is_a_no_op() {
        for status in TaskStatus::ALL {
            assert_eq!(plan_transition(status, status).unwrap(), TransitionEffect::NONE);
        }
    }

    #[test]
    fn test_approval_assigns_sprint() {
        let effect = plan_transition(Suggested, Queued).unwrap();
        assert!(effect.assigns_sprint);
        assert!(!effect.increments_alteration);
    }

    #[test]
    fn test_suggested_can_only_be_approved_or_rejected() {
        assert!(plan_transition(Suggested, Rejected).is_ok());
        for to in [InProgress, Alteration, Done] {
            assert!(matches!(
                plan_transition(Suggested, to),
                Err(TrackerError::InvalidTransition { .. })
            ));
        }
    }

    #[test]
    fn test_suggested_is_never_a_target() {
        for from in [Queued, InProgress, Alteration, Done, Rejected] {
            assert!(plan_transition(from, Suggested).is_err());
        }
    }

    #[test]
    fn test_rejected_is_terminal() {
        for to in [Queued, InProgress, Alteration, Done] {
            assert!(plan_transition(Rejected, to).is_err());
        }
    }

    #[test]
    fn test_entering_alteration_increments() {
        for from in [Queued, InProgress, Done] {
            let effect = plan_transition(from, Alteration).unwrap();
            assert!(effect.increments_alteration, "from {from:?}");
            assert!(!effect.assigns_sprint);
        }
    }

    #[test]
    fn test_board_statuses_move_freely() {
        let board = [Queued, InProgress, Alteration, Done];
        for from in board {
            for to in board {
                assert!(from.can_transition_to(to), "{from:?} -> {to:?}");
            }
            assert!(from.can_transition_to(Rejected));
        }
    }

    #[test]
    fn test_leaving_alteration_does_not_increment() {
        for to in [Queued, InProgress, Done, Rejected] {
            assert!(!plan_transition(Alteration, to).unwrap().increments_alteration);
        }
    }

    #[test]
    fn test_rework_cycle_counts_entries() {
        let path = [Queued, Alteration, Done, Alteration, Alteration, InProgress];
        let increments = path
            .windows(2)
            .map(|pair| plan_transition(pair[0], pair[1]).unwrap())
            .filter(|effect| effect.increments_alteration)
            .count();
        assert_eq!(increments, 2);
    }
}
