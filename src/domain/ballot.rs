//! The keypad state machine of the ballot box.
//!
//! A ballot is either idle, holding one or two digits, or in blank-vote
//! mode. Blank-vote mode and digit entry are mutually exclusive: while the
//! blank flag is set every digit press is ignored, and only a correction
//! brings the keypad back.

use super::errors::{DomainError, DomainResult};
use super::models::{CandidateNumber, VoteChoice, CANDIDATE_DIGITS};

/// What a key press did to the ballot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PressOutcome {
    /// Nothing changed (blank mode, full entry, or not a digit).
    Ignored,
    /// A digit was added but the number is not complete yet.
    Appended,
    /// The second digit landed; the number is ready to be looked up.
    Completed(CandidateNumber),
}

/// Digits typed so far plus the blank-vote flag.
///
/// # Examples
///
/// ```
/// use urna::domain::{Ballot, PressOutcome};
///
/// let mut ballot = Ballot::default();
/// assert_eq!(ballot.press('1'), PressOutcome::Appended);
/// assert!(matches!(ballot.press('3'), PressOutcome::Completed(_)));
/// assert_eq!(ballot.press('7'), PressOutcome::Ignored);
/// assert_eq!(ballot.digits(), "13");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ballot {
    digits: String,
    blank: bool,
}

impl Ballot {
    pub fn digits(&self) -> &str {
        &self.digits
    }

    pub fn is_blank(&self) -> bool {
        self.blank
    }

    pub fn is_idle(&self) -> bool {
        self.digits.is_empty() && !self.blank
    }

    /// Returns the digit shown in the given keypad slot, if any.
    pub fn slot(&self, index: usize) -> Option<char> {
        self.digits.chars().nth(index)
    }

    pub fn press(&mut self, key: char) -> PressOutcome {
        if self.blank || !key.is_ascii_digit() || self.digits.len() >= CANDIDATE_DIGITS {
            return PressOutcome::Ignored;
        }

        self.digits.push(key);
        if self.digits.len() < CANDIDATE_DIGITS {
            return PressOutcome::Appended;
        }

        match CandidateNumber::parse(&self.digits) {
            Ok(number) => PressOutcome::Completed(number),
            Err(_) => PressOutcome::Appended,
        }
    }

    /// Switches to blank-vote mode, discarding any digits.
    pub fn blank(&mut self) {
        self.digits.clear();
        self.blank = true;
    }

    /// Clears digits and leaves blank-vote mode.
    pub fn correct(&mut self) {
        self.digits.clear();
        self.blank = false;
    }

    /// Resolves the ballot into a vote, if it is complete.
    pub fn resolve(&self) -> DomainResult<VoteChoice> {
        if self.blank {
            return Ok(VoteChoice::Blank);
        }
        if self.digits.len() != CANDIDATE_DIGITS {
            return Err(DomainError::IncompleteVote(self.digits.len()));
        }
        Ok(VoteChoice::Candidate(CandidateNumber::parse(&self.digits)?))
    }
}
