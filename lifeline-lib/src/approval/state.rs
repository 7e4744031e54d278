//! Per-entity approval lifecycle.
//!
//! ```text
//!            approve (admin)
//!   Pending ─────────────────▶ Approved
//!      │  ▲                     │   ▲
//!      │  │ resubmit (owner)    │   │ approve (admin)
//!      │  │                     │   │
//!      ▼  │     reject (admin)  ▼   │
//!   Rejected ◀──────────────────┘───┘
//! ```
//!
//! Only `Approved` entities are visible to search.

use crate::model::Role;
use crate::{LifelineError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Visibility state of a donor profile or receiver request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalState {
    /// Awaiting administrator review. Initial state.
    #[default]
    Pending,
    /// Visible to search.
    Approved,
    /// Hidden from search until the owner resubmits.
    Rejected,
}

/// A requested transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApprovalAction {
    /// Administrator makes the entity visible.
    Approve,
    /// Administrator hides the entity.
    Reject,
    /// Owner sends a rejected entity back for review.
    Resubmit,
}

impl fmt::Display for ApprovalAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Approve => "approve",
            Self::Reject => "reject",
            Self::Resubmit => "resubmit",
        })
    }
}

/// Who is asking for a transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Actor {
    /// The caller's role.
    pub role: Role,
    /// Whether the caller owns the entity.
    pub is_owner: bool,
}

impl ApprovalState {
    /// Whether search may return an entity in this state.
    pub fn is_visible(&self) -> bool {
        matches!(self, Self::Approved)
    }

    /// Compute the next state, or refuse the transition.
    ///
    /// Every refusal is an authorization error, including an administrator
    /// asking for a transition the current state does not allow.
    pub fn apply(self, action: ApprovalAction, actor: Actor) -> Result<Self> {
        use ApprovalAction::*;
        use ApprovalState::*;

        let needs_admin = matches!(action, Approve | Reject);
        if needs_admin && actor.role != Role::Administrator {
            return Err(LifelineError::unauthorized(
                action.to_string(),
                format!("requires administrator, caller is {}", actor.role),
            ));
        }
        if action == Resubmit && !actor.is_owner {
            return Err(LifelineError::unauthorized(
                action.to_string(),
                "only the owner may resubmit",
            ));
        }

        match (self, action) {
            (Pending | Rejected, Approve) => Ok(Approved),
            (Pending | Approved, Reject) => Ok(Rejected),
            (Rejected, Resubmit) => Ok(Pending),
            (state, action) => Err(LifelineError::unauthorized(
                action.to_string(),
                format!("not permitted from state {}", state),
            )),
        }
    }
}

impl fmt::Display for ApprovalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        })
    }
}
