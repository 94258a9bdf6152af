//! Messages exchanged between the controller and the outside world.
//!
//! The controller never performs I/O. Each operation returns the effects it
//! wants carried out, and the results come back as replies.

use std::time::Duration;

use crate::domain::{
    CandidateLookup, CandidateNumber, Cpf, Eligibility, Photo, VoteOutcome, VoteSubmission,
};
use crate::infrastructure::{ApiError, CameraError};

/// Identifies one eligibility check or candidate lookup.
///
/// Replies carrying a ticket other than the latest one issued are stale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(pub u64);

impl Ticket {
    /// Returns the ticket following this one.
    pub fn next(self) -> Ticket {
        Ticket(self.0.wrapping_add(1))
    }
}

impl std::fmt::Display for Ticket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Make sure the camera can deliver frames.
    CheckCamera,
    CheckEligibility { ticket: Ticket, cpf: Cpf },
    CapturePhoto,
    LookupCandidate { ticket: Ticket, number: CandidateNumber },
    SubmitVote(VoteSubmission),
    PlayChime,
    /// Ask for a [`Reply::ResetDue`] after the delay has elapsed.
    ScheduleReset(Duration),
}

#[derive(Debug)]
pub enum Reply {
    CameraCheck(Result<(), CameraError>),
    Eligibility {
        ticket: Ticket,
        result: Result<Eligibility, ApiError>,
    },
    Photo(Result<Photo, CameraError>),
    Candidate {
        ticket: Ticket,
        result: Result<CandidateLookup, ApiError>,
    },
    Vote(Result<VoteOutcome, ApiError>),
    ResetDue,
}
