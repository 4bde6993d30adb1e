// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Status enums for the vetting pipeline, rewards, and profile visibility.
//!
//! Every enum round-trips through the exact wire strings used by the
//! stored documents and the HTTP API, so `parse` and `as_str` are the
//! only conversion points.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// A referral's position in the vetting pipeline.
///
/// The pipeline is ordered: `Invited` through `InterviewScheduled`,
/// terminating in either `Approved` or `Rejected`. Only the transition
/// into `Approved` has side effects (reward issuance).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReferralStatus {
    /// The candidate has been invited but has not applied.
    #[serde(rename = "Invited")]
    Invited,
    /// The candidate submitted a membership application.
    #[serde(rename = "Application Submitted")]
    ApplicationSubmitted,
    /// The application is being reviewed.
    #[serde(rename = "Under Review")]
    UnderReview,
    /// An interview has been scheduled.
    #[serde(rename = "Interview Scheduled")]
    InterviewScheduled,
    /// The candidate was approved for membership.
    #[serde(rename = "Approved")]
    Approved,
    /// The candidate was rejected.
    #[serde(rename = "Rejected")]
    Rejected,
}

impl ReferralStatus {
    /// Parses a vetting-pipeline status from its wire string.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidReferralStatus` if the value is not
    /// one of the fixed pipeline statuses.
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        match value {
            "Invited" => Ok(Self::Invited),
            "Application Submitted" => Ok(Self::ApplicationSubmitted),
            "Under Review" => Ok(Self::UnderReview),
            "Interview Scheduled" => Ok(Self::InterviewScheduled),
            "Approved" => Ok(Self::Approved),
            "Rejected" => Ok(Self::Rejected),
            _ => Err(DomainError::InvalidReferralStatus(value.to_string())),
        }
    }

    /// Returns the wire string for this status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Invited => "Invited",
            Self::ApplicationSubmitted => "Application Submitted",
            Self::UnderReview => "Under Review",
            Self::InterviewScheduled => "Interview Scheduled",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
        }
    }
}

/// Whether a referral's reward has been issued.
///
/// Set to `Issued` exactly once, in the same transaction that creates
/// the reward document. There is no path back to `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RewardStatus {
    /// No reward has been issued for this referral.
    Pending,
    /// The reward document exists.
    Issued,
}

/// Lifecycle of a reward document itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RewardState {
    /// Created but not yet handed to the member.
    Pending,
    /// Issued to the member.
    Issued,
    /// The member has received the reward.
    Fulfilled,
    /// The reward was declined.
    Declined,
}

impl RewardState {
    /// Parses a reward state from its wire string.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidRewardState` if the value is not a
    /// known reward state.
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        match value {
            "Pending" => Ok(Self::Pending),
            "Issued" => Ok(Self::Issued),
            "Fulfilled" => Ok(Self::Fulfilled),
            "Declined" => Ok(Self::Declined),
            _ => Err(DomainError::InvalidRewardState(value.to_string())),
        }
    }

    /// Returns the wire string for this state.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Issued => "Issued",
            Self::Fulfilled => "Fulfilled",
            Self::Declined => "Declined",
        }
    }
}

/// Who may see a member in the connections directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConnectionVisibility {
    /// Visible to all members.
    #[serde(rename = "all")]
    #[default]
    All,
    /// Visible only to members sharing a connection interest.
    #[serde(rename = "shared-interest")]
    SharedInterest,
    /// Not visible.
    #[serde(rename = "none")]
    None,
}
