//! Matching Engine.
//!
//! Filters the donor pool against a receiver's need and the hospital
//! directory against organ capability and location.
//!
//! # Matching rules
//!
//! - Only `Approved` donor profiles are ever returned, whoever asks.
//!   Administrators moderate through
//!   [`ApprovalWorkflow::list`](crate::approval::ApprovalWorkflow::list).
//! - Blood group is compared for equality of the canonical group. There is
//!   no cross-compatibility (O- is not treated as universal).
//! - Organ is compared for exact equality after trimming.
//! - Location follows [`LocationMatch`]: case-insensitive substring by
//!   default, or case-insensitive equality.
//! - Absent or blank filters match everything.
//! - Results keep repository order. There is no ranking.

use crate::auth::{Operation, Session};
use crate::config::{LocationMatch, MatchingConfig};
use crate::model::{BloodGroup, DonorProfile, Hospital, ReceiverRequest, Role};
use crate::storage::Repository;
use crate::{EntityId, LifelineError, Result};
use std::sync::Arc;

/// Donor search filters. `None` matches everything.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DonorQuery {
    pub blood_group: Option<BloodGroup>,
    pub organ: Option<String>,
    pub location: Option<String>,
    /// Also drop donors who have marked themselves unavailable.
    pub only_available: bool,
}

impl DonorQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a query from raw text filters. Blank strings count as absent;
    /// an unrecognised blood group is a validation error.
    pub fn parse(blood_group: Option<&str>, organ: Option<&str>, location: Option<&str>) -> Result<Self> {
        let blood_group = blood_group
            .map(str::trim)
            .filter(|g| !g.is_empty())
            .map(str::parse::<BloodGroup>)
            .transpose()?;
        Ok(Self {
            blood_group,
            organ: non_blank(organ),
            location: non_blank(location),
            only_available: false,
        })
    }

    pub fn blood_group(mut self, group: BloodGroup) -> Self {
        self.blood_group = Some(group);
        self
    }

    pub fn organ(mut self, organ: impl Into<String>) -> Self {
        let organ: String = organ.into();
        self.organ = non_blank(Some(organ.as_str()));
        self
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        let location: String = location.into();
        self.location = non_blank(Some(location.as_str()));
        self
    }

    pub fn only_available(mut self) -> Self {
        self.only_available = true;
        self
    }

    fn matches(&self, donor: &DonorProfile, location_match: LocationMatch) -> bool {
        donor.is_approved()
            && (!self.only_available || donor.available)
            && self.blood_group.map_or(true, |g| donor.blood_group == g)
            && self
                .organ
                .as_deref()
                .map_or(true, |o| donor.organ.as_deref() == Some(o))
            && self
                .location
                .as_deref()
                .map_or(true, |l| location_match.matches(l, &donor.location))
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Read-only search over donors, receiver requests and hospitals.
pub struct MatchingEngine {
    donors: Arc<dyn Repository<DonorProfile>>,
    receivers: Arc<dyn Repository<ReceiverRequest>>,
    hospitals: Arc<dyn Repository<Hospital>>,
    config: MatchingConfig,
}

impl MatchingEngine {
    pub fn new(
        donors: Arc<dyn Repository<DonorProfile>>,
        receivers: Arc<dyn Repository<ReceiverRequest>>,
        hospitals: Arc<dyn Repository<Hospital>>,
        config: MatchingConfig,
    ) -> Self {
        Self {
            donors,
            receivers,
            hospitals,
            config,
        }
    }

    /// Approved donors matching every filter in `query`.
    #[tracing::instrument(skip(self, session))]
    pub async fn search_donors(&self, session: &Session, query: &DonorQuery) -> Result<Vec<DonorProfile>> {
        session.authorize(Operation::SearchMatches)?;
        let location_match = self.config.location_match;
        let matches: Vec<_> = self
            .donors
            .find_all()
            .await?
            .into_iter()
            .filter(|donor| query.matches(donor, location_match))
            .collect();
        tracing::debug!(count = matches.len(), "donor search");
        Ok(matches)
    }

    /// Hospitals able to process `organ` near `location`.
    ///
    /// `location` is matched against the hospital's address.
    #[tracing::instrument(skip(self, session))]
    pub async fn find_hospitals(
        &self,
        session: &Session,
        organ: Option<&str>,
        location: Option<&str>,
    ) -> Result<Vec<Hospital>> {
        session.authorize(Operation::SearchMatches)?;
        let organ = non_blank(organ);
        let location = non_blank(location);
        let location_match = self.config.location_match;

        Ok(self
            .hospitals
            .find_all()
            .await?
            .into_iter()
            .filter(|h| organ.as_deref().map_or(true, |o| h.can_process(o)))
            .filter(|h| {
                location
                    .as_deref()
                    .map_or(true, |l| location_match.matches(l, &h.address))
            })
            .collect())
    }

    /// Donors for an approved receiver request, using the request's own
    /// blood group, organ and location.
    ///
    /// Only the request's owner or an administrator may ask.
    #[tracing::instrument(skip(self, session))]
    pub async fn matches_for_request(&self, session: &Session, request_id: EntityId) -> Result<Vec<DonorProfile>> {
        let caller = session.authorize(Operation::SearchMatches)?;
        let request = self.receivers.get(&request_id).await?;

        if caller.role() != Role::Administrator && request.owner != caller.id {
            return Err(LifelineError::unauthorized(
                Operation::SearchMatches.to_string(),
                "request belongs to another account",
            ));
        }
        if !request.is_approved() {
            return Err(LifelineError::validation(
                "request",
                format!("is {}, only approved requests can be matched", request.approval),
            ));
        }

        let query = DonorQuery {
            blood_group: Some(request.blood_group_needed),
            organ: request.organ_needed.clone(),
            location: Some(request.location.clone()),
            only_available: false,
        };
        self.search_donors(session, &query).await
    }
}
