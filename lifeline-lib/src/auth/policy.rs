//! Role-based authorization table.
//!
//! Adding a role or an operation forces every arm of [`Operation::permits`]
//! to be revisited; there is no string comparison anywhere in the check.
//! Ownership ("own profile only") is checked by the services on top of
//! this table.

use crate::model::Role;
use std::fmt;

/// Privileged operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Approve or reject a donor profile or receiver request.
    ReviewSubmission,
    /// Delete any entity.
    DeleteEntity,
    /// List donors/receivers regardless of approval state.
    ModerationListing,
    /// Create or update one's own donor profile.
    ManageOwnDonorProfile,
    /// Create or update one's own receiver request.
    ManageOwnReceiverRequest,
    /// Search donors and hospitals.
    SearchMatches,
    /// Authorize a payment towards a campaign.
    AuthorizePayment,
    /// Create or update hospitals.
    ManageHospitals,
    /// Create one's own charity profile and campaigns.
    ManageCharity,
}

impl Operation {
    /// Whether `role` may perform this operation.
    pub fn permits(&self, role: Role) -> bool {
        use Role::*;
        match self {
            Self::ReviewSubmission
            | Self::DeleteEntity
            | Self::ModerationListing
            | Self::ManageHospitals => matches!(role, Administrator),
            Self::ManageOwnDonorProfile => matches!(role, Donor),
            Self::ManageOwnReceiverRequest => matches!(role, Receiver),
            Self::SearchMatches => matches!(role, Receiver | Administrator),
            Self::AuthorizePayment => matches!(role, Donor | Charity),
            Self::ManageCharity => matches!(role, Charity),
        }
    }

    /// Roles allowed to perform this operation.
    pub fn allowed_roles(&self) -> Vec<Role> {
        Role::ALL
            .into_iter()
            .filter(|role| self.permits(*role))
            .collect()
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ReviewSubmission => "review submission",
            Self::DeleteEntity => "delete entity",
            Self::ModerationListing => "list submissions for moderation",
            Self::ManageOwnDonorProfile => "manage donor profile",
            Self::ManageOwnReceiverRequest => "manage receiver request",
            Self::SearchMatches => "search matches",
            Self::AuthorizePayment => "authorize payment",
            Self::ManageHospitals => "manage hospitals",
            Self::ManageCharity => "manage charity",
        })
    }
}
