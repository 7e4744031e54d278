//! Data model.
//!
//! Identity and role-specific data are composed rather than layered: an
//! [`Account`] carries the handle, credential digest and [`Role`], and each
//! role-specific record (donor profile, receiver request, charity profile)
//! refers back to its owner by [`AccountId`](crate::AccountId).

mod account;
mod charity;
mod donor;
mod hospital;
mod receiver;

pub use account::{Account, Role};
pub use charity::{CampaignDraft, CharityCampaign, CharityDraft, CharityProfile};
pub use donor::{BloodGroup, DonorDraft, DonorProfile};
pub use hospital::{parse_capabilities, Hospital, HospitalDraft};
pub use receiver::{ReceiverDraft, ReceiverRequest};

use crate::{LifelineError, Result};

/// Trim a required text field, rejecting blanks.
pub(crate) fn required(field: &str, value: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(LifelineError::validation(field, "must not be empty"));
    }
    Ok(value.to_string())
}

/// Trim an optional text field; blank becomes `None`.
pub(crate) fn optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
