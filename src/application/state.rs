//! Controller state for the ballot-box kiosk.
//!
//! [`App`] owns everything the screen shows for one voting transaction and
//! exposes the operations a voter can trigger. It does no I/O: every
//! operation returns the [`Effect`]s to run, and their results are fed back
//! through [`App::handle_reply`].

use std::time::Duration;

use log::{debug, error, info, warn};

use super::effects::{Effect, Reply, Ticket};
use crate::domain::{
    digits_only, Ballot, CandidateInfo, CandidateLookup, Cpf, PressOutcome, VoteOutcome,
    VoteSubmission, VoterSession, CPF_LEN,
};

/// How long the thank-you screen stays up before the kiosk resets.
pub const DEFAULT_RESET_DELAY: Duration = Duration::from_secs(4);

/// Which screen the kiosk is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    /// Voter types a CPF and waits for clearance
    Identify,
    /// Keypad is live
    Voting,
    /// Vote recorded, waiting for the automatic reset
    Confirmation,
}

/// Inline feedback shown next to the CPF field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EligibilityStatus {
    Neutral,
    Checking,
    Allowed { message: Option<String> },
    Denied { message: String },
    Unreachable,
}

/// What the candidate area of the ballot screen displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidatePanel {
    Hidden,
    Found(CandidateInfo),
    NotFound,
    Blank,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraStatus {
    Unknown,
    Ready,
    Failed,
}

/// Main controller state.
///
/// # Examples
///
/// ```
/// use urna::application::{App, AppMode, Effect};
///
/// let mut app = App::default();
/// assert_eq!(app.mode, AppMode::Identify);
///
/// let effects = app.set_cpf_input("123.456.789-01");
/// assert!(matches!(effects.as_slice(), [Effect::CheckEligibility { .. }]));
/// ```
#[derive(Debug)]
pub struct App {
    pub mode: AppMode,
    /// Digits typed into the CPF field
    pub cpf_input: String,
    pub eligibility: EligibilityStatus,
    pub session: VoterSession,
    pub ballot: Ballot,
    pub candidate: CandidatePanel,
    /// Blocking message; swallows input until dismissed
    pub alert: Option<String>,
    pub show_help: bool,
    pub camera: CameraStatus,
    pub capturing: bool,
    pub submitting: bool,
    pub reset_delay: Duration,
    eligibility_ticket: Ticket,
    lookup_ticket: Ticket,
}

impl Default for App {
    fn default() -> Self {
        Self::new(DEFAULT_RESET_DELAY)
    }
}

impl App {
    pub fn new(reset_delay: Duration) -> Self {
        Self {
            mode: AppMode::Identify,
            cpf_input: String::new(),
            eligibility: EligibilityStatus::Neutral,
            session: VoterSession::default(),
            ballot: Ballot::default(),
            candidate: CandidatePanel::Hidden,
            alert: None,
            show_help: false,
            camera: CameraStatus::Unknown,
            capturing: false,
            submitting: false,
            reset_delay,
            eligibility_ticket: Ticket::default(),
            lookup_ticket: Ticket::default(),
        }
    }

    /// Effects to run once when the kiosk starts.
    pub fn boot(&self) -> Vec<Effect> {
        vec![Effect::CheckCamera]
    }

    /// Replaces the CPF field with `raw`, keeping only its first 11 digits.
    ///
    /// Any change invalidates the previous verdict. A complete CPF triggers
    /// exactly one eligibility check; a partial one goes back to neutral
    /// without touching the network. The field is locked while the photo
    /// for the cleared voter is being taken.
    pub fn set_cpf_input(&mut self, raw: &str) -> Vec<Effect> {
        if self.mode != AppMode::Identify || self.capturing {
            return Vec::new();
        }

        let mut digits = digits_only(raw);
        digits.truncate(CPF_LEN);
        if digits == self.cpf_input {
            return Vec::new();
        }

        self.cpf_input = digits;
        self.eligibility_ticket = self.eligibility_ticket.next();
        self.session.revoke();

        match Cpf::parse(&self.cpf_input) {
            Ok(cpf) => {
                self.eligibility = EligibilityStatus::Checking;
                info!("Checking eligibility {}", self.eligibility_ticket);
                vec![Effect::CheckEligibility {
                    ticket: self.eligibility_ticket,
                    cpf,
                }]
            }
            Err(_) => {
                self.eligibility = EligibilityStatus::Neutral;
                Vec::new()
            }
        }
    }

    pub fn push_cpf_char(&mut self, c: char) -> Vec<Effect> {
        if !c.is_ascii_digit() || self.cpf_input.len() >= CPF_LEN {
            return Vec::new();
        }
        let mut raw = self.cpf_input.clone();
        raw.push(c);
        self.set_cpf_input(&raw)
    }

    pub fn pop_cpf_char(&mut self) -> Vec<Effect> {
        let mut raw = self.cpf_input.clone();
        if raw.pop().is_none() {
            return Vec::new();
        }
        self.set_cpf_input(&raw)
    }

    pub fn can_start_voting(&self) -> bool {
        self.mode == AppMode::Identify && self.session.eligible && !self.capturing
    }

    /// Takes the voter's photo; the ballot screen opens once it arrives.
    pub fn start_voting(&mut self) -> Vec<Effect> {
        if !self.can_start_voting() {
            return Vec::new();
        }
        self.capturing = true;
        vec![Effect::CapturePhoto]
    }

    fn keypad_live(&self) -> bool {
        self.mode == AppMode::Voting && !self.submitting
    }

    /// Handles a keypad digit.
    pub fn press(&mut self, key: char) -> Vec<Effect> {
        if !self.keypad_live() {
            return Vec::new();
        }

        match self.ballot.press(key) {
            PressOutcome::Ignored | PressOutcome::Appended => Vec::new(),
            PressOutcome::Completed(number) => {
                self.lookup_ticket = self.lookup_ticket.next();
                debug!("Looking up candidate {}", self.lookup_ticket);
                vec![Effect::LookupCandidate {
                    ticket: self.lookup_ticket,
                    number,
                }]
            }
        }
    }

    pub fn blank_vote(&mut self) -> Vec<Effect> {
        if !self.keypad_live() {
            return Vec::new();
        }
        self.ballot.blank();
        self.lookup_ticket = self.lookup_ticket.next();
        self.candidate = CandidatePanel::Blank;
        Vec::new()
    }

    pub fn correct(&mut self) -> Vec<Effect> {
        if !self.keypad_live() {
            return Vec::new();
        }
        self.clear_entry();
        Vec::new()
    }

    fn clear_entry(&mut self) {
        self.ballot.correct();
        self.lookup_ticket = self.lookup_ticket.next();
        self.candidate = CandidatePanel::Hidden;
    }

    /// Sends the vote if the ballot is complete; otherwise does nothing.
    pub fn confirm_vote(&mut self) -> Vec<Effect> {
        if !self.keypad_live() {
            return Vec::new();
        }

        let choice = match self.ballot.resolve() {
            Ok(choice) => choice,
            Err(err) => {
                debug!("Confirm ignored: {err}");
                return Vec::new();
            }
        };

        let (Some(cpf), Some(photo)) = (self.session.voter_id.clone(), self.session.photo.clone())
        else {
            warn!("Confirm ignored: no validated voter in session");
            return Vec::new();
        };

        self.submitting = true;
        info!("Submitting vote");
        vec![Effect::SubmitVote(VoteSubmission { cpf, choice, photo })]
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Starts over as if the kiosk had just been launched.
    ///
    /// Tickets keep counting so replies to requests made before the reset
    /// are still recognised as stale.
    pub fn reset(&mut self) {
        let mut fresh = App::new(self.reset_delay);
        fresh.camera = self.camera;
        fresh.eligibility_ticket = self.eligibility_ticket.next();
        fresh.lookup_ticket = self.lookup_ticket.next();
        *self = fresh;
        info!("Session reset");
    }

    pub fn handle_reply(&mut self, reply: Reply) -> Vec<Effect> {
        match reply {
            Reply::CameraCheck(Ok(())) => {
                self.camera = CameraStatus::Ready;
                Vec::new()
            }
            Reply::CameraCheck(Err(err)) => {
                error!("Camera check failed: {err}");
                self.camera = CameraStatus::Failed;
                self.alert = Some(format!("Unable to access the camera: {err}"));
                Vec::new()
            }
            Reply::Eligibility { ticket, result } => {
                if ticket != self.eligibility_ticket || self.mode != AppMode::Identify {
                    debug!("Discarding stale eligibility reply {ticket}");
                    return Vec::new();
                }
                match result {
                    Ok(verdict) if verdict.allowed => match Cpf::parse(&self.cpf_input) {
                        Ok(cpf) => {
                            info!("Voter cleared {ticket}");
                            self.session.admit(cpf, verdict.name);
                            self.eligibility = EligibilityStatus::Allowed {
                                message: verdict.message,
                            };
                        }
                        Err(err) => {
                            warn!("Eligibility reply for incomplete CPF: {err}");
                            self.eligibility = EligibilityStatus::Neutral;
                        }
                    },
                    Ok(verdict) => {
                        info!("Voter refused {ticket}");
                        self.session.revoke();
                        self.eligibility = EligibilityStatus::Denied {
                            message: verdict
                                .message
                                .unwrap_or_else(|| "CPF is not allowed to vote".to_string()),
                        };
                    }
                    Err(err) => {
                        error!("Eligibility check failed: {err}");
                        self.eligibility = EligibilityStatus::Unreachable;
                    }
                }
                Vec::new()
            }
            Reply::Photo(result) => {
                self.capturing = false;
                if !self.can_start_voting() {
                    debug!("Discarding photo taken for a session that is gone");
                    return Vec::new();
                }
                match result {
                    Ok(photo) => {
                        info!("Photo captured ({} bytes)", photo.len());
                        self.session.photo = Some(photo);
                        self.clear_entry();
                        self.mode = AppMode::Voting;
                    }
                    Err(err) => {
                        error!("Photo capture failed: {err}");
                        self.alert = Some(format!("Unable to capture photo: {err}"));
                    }
                }
                Vec::new()
            }
            Reply::Candidate { ticket, result } => {
                if ticket != self.lookup_ticket || self.mode != AppMode::Voting {
                    debug!("Discarding stale candidate reply {ticket}");
                    return Vec::new();
                }
                match result {
                    Ok(CandidateLookup::Found(info)) => self.candidate = CandidatePanel::Found(info),
                    Ok(CandidateLookup::NotFound) => self.candidate = CandidatePanel::NotFound,
                    Err(err) => error!("Candidate lookup failed: {err}"),
                }
                Vec::new()
            }
            Reply::Vote(result) => {
                self.submitting = false;
                if self.mode != AppMode::Voting {
                    return Vec::new();
                }
                match result {
                    Ok(VoteOutcome::Accepted) => {
                        info!("Vote accepted");
                        self.mode = AppMode::Confirmation;
                        vec![Effect::PlayChime, Effect::ScheduleReset(self.reset_delay)]
                    }
                    Ok(VoteOutcome::Rejected { message }) => {
                        warn!("Vote rejected: {message}");
                        self.alert = Some(format!("Error: {message}"));
                        self.clear_entry();
                        Vec::new()
                    }
                    Err(err) => {
                        error!("Vote submission failed: {err}");
                        self.alert = Some("Connection error".to_string());
                        Vec::new()
                    }
                }
            }
            Reply::ResetDue => {
                if self.mode == AppMode::Confirmation {
                    self.reset();
                }
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CandidateNumber, Eligibility, Photo, VoteChoice};
    use crate::infrastructure::{ApiError, CameraError};

    const CPF: &str = "12345678901";

    fn allowed() -> Eligibility {
        Eligibility {
            allowed: true,
            message: Some("Hello, Ana. Voting enabled.".to_string()),
            name: Some("Ana".to_string()),
        }
    }

    fn photo() -> Photo {
        Photo::from_jpeg(vec![0xff, 0xd8, 0xff, 0xd9])
    }

    fn eligibility_ticket(effects: &[Effect]) -> Ticket {
        match effects {
            [Effect::CheckEligibility { ticket, .. }] => *ticket,
            other => panic!("expected one eligibility check, got {other:?}"),
        }
    }

    fn lookup_ticket(effects: &[Effect]) -> Ticket {
        match effects {
            [Effect::LookupCandidate { ticket, .. }] => *ticket,
            other => panic!("expected one lookup, got {other:?}"),
        }
    }

    fn admitted_app() -> App {
        let mut app = App::default();
        let ticket = eligibility_ticket(&app.set_cpf_input(CPF));
        app.handle_reply(Reply::Eligibility {
            ticket,
            result: Ok(allowed()),
        });
        app
    }

    fn voting_app() -> App {
        let mut app = admitted_app();
        assert_eq!(app.start_voting(), vec![Effect::CapturePhoto]);
        app.handle_reply(Reply::Photo(Ok(photo())));
        assert_eq!(app.mode, AppMode::Voting);
        app
    }

    fn type_keys(app: &mut App, keys: &str) -> Vec<Effect> {
        keys.chars().flat_map(|key| app.press(key)).collect()
    }

    #[test]
    fn test_app_default() {
        let app = App::default();
        assert_eq!(app.mode, AppMode::Identify);
        assert!(app.cpf_input.is_empty());
        assert_eq!(app.eligibility, EligibilityStatus::Neutral);
        assert!(!app.session.eligible);
        assert!(app.ballot.is_idle());
        assert_eq!(app.candidate, CandidatePanel::Hidden);
        assert!(app.alert.is_none());
        assert_eq!(app.reset_delay, DEFAULT_RESET_DELAY);
        assert_eq!(app.boot(), vec![Effect::CheckCamera]);
    }

    #[test]
    fn test_partial_cpf_makes_no_request() {
        let mut app = App::default();
        for (i, c) in CPF.chars().take(10).enumerate() {
            assert!(app.push_cpf_char(c).is_empty());
            assert_eq!(app.cpf_input.len(), i + 1);
            assert_eq!(app.eligibility, EligibilityStatus::Neutral);
            assert!(!app.can_start_voting());
        }
    }

    #[test]
    fn test_eleventh_digit_issues_exactly_one_check() {
        let mut app = App::default();
        let effects: Vec<Effect> = CPF.chars().flat_map(|c| app.push_cpf_char(c)).collect();
        assert_eq!(effects.len(), 1);
        assert!(matches!(
            &effects[0],
            Effect::CheckEligibility { cpf, .. } if cpf.as_str() == CPF
        ));
        assert_eq!(app.eligibility, EligibilityStatus::Checking);

        // Further digits are dropped and do not re-check.
        assert!(app.push_cpf_char('5').is_empty());
        assert_eq!(app.cpf_input, CPF);
    }

    #[test]
    fn test_non_digits_are_stripped() {
        let mut app = App::default();
        assert!(app.push_cpf_char('a').is_empty());
        assert!(app.push_cpf_char('.').is_empty());
        assert!(app.cpf_input.is_empty());

        app.set_cpf_input("123.456");
        assert_eq!(app.cpf_input, "123456");
    }

    #[test]
    fn test_allowed_verdict_enables_voting() {
        let app = admitted_app();
        assert!(app.can_start_voting());
        assert!(app.session.eligible);
        assert_eq!(app.session.voter_id.as_ref().map(Cpf::as_str), Some(CPF));
        assert_eq!(app.session.voter_name.as_deref(), Some("Ana"));
        assert!(matches!(app.eligibility, EligibilityStatus::Allowed { .. }));
    }

    #[test]
    fn test_denied_verdict_shows_reason() {
        let mut app = App::default();
        let ticket = eligibility_ticket(&app.set_cpf_input(CPF));
        app.handle_reply(Reply::Eligibility {
            ticket,
            result: Ok(Eligibility {
                allowed: false,
                message: Some("Vote already registered.".to_string()),
                name: None,
            }),
        });

        assert_eq!(
            app.eligibility,
            EligibilityStatus::Denied {
                message: "Vote already registered.".to_string()
            }
        );
        assert!(!app.can_start_voting());
        assert!(app.start_voting().is_empty());
    }

    #[test]
    fn test_unreachable_server_keeps_voting_disabled() {
        let mut app = App::default();
        let ticket = eligibility_ticket(&app.set_cpf_input(CPF));
        app.handle_reply(Reply::Eligibility {
            ticket,
            result: Err(ApiError::UnexpectedResponse {
                status: 500,
                reason: "boom".to_string(),
            }),
        });
        assert_eq!(app.eligibility, EligibilityStatus::Unreachable);
        assert!(!app.can_start_voting());
        assert!(app.alert.is_none());
    }

    #[test]
    fn test_editing_cpf_revokes_clearance() {
        let mut app = admitted_app();
        assert!(app.pop_cpf_char().is_empty());
        assert_eq!(app.eligibility, EligibilityStatus::Neutral);
        assert!(!app.session.eligible);
        assert!(app.session.voter_id.is_none());
    }

    #[test]
    fn test_stale_eligibility_reply_is_discarded() {
        let mut app = App::default();
        let first = eligibility_ticket(&app.set_cpf_input(CPF));
        app.pop_cpf_char();
        let second = eligibility_ticket(&app.push_cpf_char('2'));
        assert_ne!(first, second);

        app.handle_reply(Reply::Eligibility {
            ticket: first,
            result: Ok(allowed()),
        });
        assert_eq!(app.eligibility, EligibilityStatus::Checking);
        assert!(!app.session.eligible);

        app.handle_reply(Reply::Eligibility {
            ticket: second,
            result: Ok(allowed()),
        });
        assert!(app.session.eligible);
        assert_eq!(app.session.voter_id.as_ref().map(Cpf::as_str), Some("12345678902"));
    }

    #[test]
    fn test_start_voting_captures_once() {
        let mut app = admitted_app();
        assert_eq!(app.start_voting(), vec![Effect::CapturePhoto]);
        assert!(app.start_voting().is_empty());

        app.handle_reply(Reply::Photo(Ok(photo())));
        assert_eq!(app.mode, AppMode::Voting);
        assert_eq!(app.session.photo, Some(photo()));
        assert!(app.start_voting().is_empty());
    }

    #[test]
    fn test_cpf_locked_while_photo_is_taken() {
        let mut app = App::default();
        let ticket = eligibility_ticket(&app.set_cpf_input("11111111111"));
        app.handle_reply(Reply::Eligibility {
            ticket,
            result: Ok(allowed()),
        });
        app.start_voting();

        assert!(app.pop_cpf_char().is_empty());
        assert!(app.push_cpf_char('2').is_empty());
        assert!(app.set_cpf_input("").is_empty());
        assert_eq!(app.cpf_input, "11111111111");
        assert!(app.session.eligible);

        app.handle_reply(Reply::Photo(Ok(photo())));
        assert_eq!(app.mode, AppMode::Voting);
        assert_eq!(app.session.voter_id.as_ref().map(Cpf::as_str), Some("11111111111"));
        assert_eq!(app.session.photo, Some(photo()));
    }

    #[test]
    fn test_cpf_editable_again_after_failed_capture() {
        let mut app = admitted_app();
        app.start_voting();
        app.handle_reply(Reply::Photo(Err(CameraError::EmptyFrame)));

        assert!(app.pop_cpf_char().is_empty());
        assert_eq!(app.cpf_input, "1234567890");
        assert!(!app.session.eligible);
    }

    #[test]
    fn test_capture_failure_alerts_and_stays() {
        let mut app = admitted_app();
        app.start_voting();
        app.handle_reply(Reply::Photo(Err(CameraError::EmptyFrame)));
        assert_eq!(app.mode, AppMode::Identify);
        assert!(app.alert.is_some());
        assert!(app.session.photo.is_none());
        assert!(app.can_start_voting());
    }

    #[test]
    fn test_camera_check_failure_alerts() {
        let mut app = App::default();
        app.handle_reply(Reply::CameraCheck(Err(CameraError::EmptyFrame)));
        assert_eq!(app.camera, CameraStatus::Failed);
        assert!(app.alert.as_deref().unwrap().contains("camera"));

        app.dismiss_alert();
        assert!(app.alert.is_none());
    }

    #[test]
    fn test_keypad_disabled_before_voting() {
        let mut app = admitted_app();
        assert!(app.press('1').is_empty());
        assert!(app.ballot.is_idle());
        assert!(app.confirm_vote().is_empty());
    }

    #[test]
    fn test_two_digits_trigger_one_lookup() {
        let mut app = voting_app();
        let effects = type_keys(&mut app, "139");
        assert_eq!(effects.len(), 1);
        assert!(matches!(
            &effects[0],
            Effect::LookupCandidate { number, .. } if number.as_str() == "13"
        ));
        assert_eq!(app.ballot.digits(), "13");
    }

    #[test]
    fn test_lookup_results_are_displayed() {
        let mut app = voting_app();
        let ticket = lookup_ticket(&type_keys(&mut app, "13"));
        app.handle_reply(Reply::Candidate {
            ticket,
            result: Ok(CandidateLookup::NotFound),
        });
        assert_eq!(app.candidate, CandidatePanel::NotFound);
        assert!(app.alert.is_none());
    }

    #[test]
    fn test_stale_lookup_is_discarded() {
        let mut app = voting_app();
        let stale = lookup_ticket(&type_keys(&mut app, "13"));
        app.correct();
        let fresh = lookup_ticket(&type_keys(&mut app, "21"));

        app.handle_reply(Reply::Candidate {
            ticket: fresh,
            result: Ok(CandidateLookup::Found(CandidateInfo {
                name: "Bruno".to_string(),
                department: "Finance".to_string(),
            })),
        });
        app.handle_reply(Reply::Candidate {
            ticket: stale,
            result: Ok(CandidateLookup::Found(CandidateInfo {
                name: "Jane Doe".to_string(),
                department: "Party X".to_string(),
            })),
        });

        assert!(matches!(&app.candidate, CandidatePanel::Found(info) if info.name == "Bruno"));
    }

    #[test]
    fn test_lookup_after_blank_is_discarded() {
        let mut app = voting_app();
        let ticket = lookup_ticket(&type_keys(&mut app, "13"));
        app.blank_vote();
        app.handle_reply(Reply::Candidate {
            ticket,
            result: Ok(CandidateLookup::NotFound),
        });
        assert_eq!(app.candidate, CandidatePanel::Blank);
    }

    #[test]
    fn test_blank_vote_blocks_digits_until_correction() {
        let mut app = voting_app();
        type_keys(&mut app, "1");
        app.blank_vote();
        assert!(app.ballot.is_blank());
        assert_eq!(app.ballot.digits(), "");
        assert_eq!(app.candidate, CandidatePanel::Blank);

        assert!(type_keys(&mut app, "13").is_empty());
        assert_eq!(app.ballot.digits(), "");

        app.correct();
        assert!(app.ballot.is_idle());
        assert_eq!(app.candidate, CandidatePanel::Hidden);
        assert_eq!(type_keys(&mut app, "13").len(), 1);
    }

    #[test]
    fn test_confirm_requires_complete_ballot() {
        let mut app = voting_app();
        assert!(app.confirm_vote().is_empty());
        type_keys(&mut app, "1");
        assert!(app.confirm_vote().is_empty());
        assert!(!app.submitting);
    }

    #[test]
    fn test_blank_vote_submits_zero() {
        let mut app = voting_app();
        app.blank_vote();
        let effects = app.confirm_vote();
        match effects.as_slice() {
            [Effect::SubmitVote(submission)] => {
                assert_eq!(submission.choice, VoteChoice::Blank);
                assert_eq!(submission.choice.wire_value(), "0");
                assert_eq!(submission.cpf.as_str(), CPF);
                assert_eq!(submission.photo, photo());
            }
            other => panic!("expected a submission, got {other:?}"),
        }
    }

    #[test]
    fn test_double_confirm_sends_once() {
        let mut app = voting_app();
        type_keys(&mut app, "13");
        assert_eq!(app.confirm_vote().len(), 1);
        assert!(app.confirm_vote().is_empty());
        assert!(app.press('1').is_empty());
    }

    #[test]
    fn test_accepted_vote_confirms_then_resets() {
        let mut app = voting_app();
        type_keys(&mut app, "13");
        app.confirm_vote();

        let effects = app.handle_reply(Reply::Vote(Ok(VoteOutcome::Accepted)));
        assert_eq!(
            effects,
            vec![Effect::PlayChime, Effect::ScheduleReset(DEFAULT_RESET_DELAY)]
        );
        assert_eq!(app.mode, AppMode::Confirmation);

        app.handle_reply(Reply::ResetDue);
        assert_eq!(app.mode, AppMode::Identify);
        assert!(app.cpf_input.is_empty());
        assert_eq!(app.session, VoterSession::default());
        assert!(app.ballot.is_idle());
    }

    #[test]
    fn test_reset_keeps_camera_status_and_discards_old_replies() {
        let mut app = admitted_app();
        app.camera = CameraStatus::Ready;
        app.mode = AppMode::Confirmation;
        app.handle_reply(Reply::ResetDue);
        assert_eq!(app.camera, CameraStatus::Ready);

        // A reply to a check issued before the reset must not admit anyone.
        app.set_cpf_input(CPF);
        app.handle_reply(Reply::Eligibility {
            ticket: Ticket(1),
            result: Ok(allowed()),
        });
        assert!(!app.session.eligible);
    }

    #[test]
    fn test_reset_due_outside_confirmation_is_ignored() {
        let mut app = voting_app();
        type_keys(&mut app, "1");
        app.handle_reply(Reply::ResetDue);
        assert_eq!(app.mode, AppMode::Voting);
        assert_eq!(app.ballot.digits(), "1");
    }

    #[test]
    fn test_connection_failure_keeps_entry() {
        let mut app = voting_app();
        type_keys(&mut app, "13");
        app.confirm_vote();
        app.handle_reply(Reply::Vote(Err(ApiError::UnexpectedResponse {
            status: 502,
            reason: "Bad Gateway".to_string(),
        })));
        assert_eq!(app.alert.as_deref(), Some("Connection error"));
        assert_eq!(app.ballot.digits(), "13");
        assert!(!app.submitting);
        assert_eq!(app.confirm_vote().len(), 1);
    }

    #[test]
    fn test_rejected_vote_clears_entry_but_keeps_session() {
        let mut app = App::default();
        let ticket = eligibility_ticket(&app.set_cpf_input("12345678901"));
        app.handle_reply(Reply::Eligibility {
            ticket,
            result: Ok(allowed()),
        });
        app.start_voting();
        app.handle_reply(Reply::Photo(Ok(photo())));

        let effects = type_keys(&mut app, "13");
        match effects.as_slice() {
            [Effect::LookupCandidate { ticket, number }] => {
                assert_eq!(*number, CandidateNumber::parse("13").unwrap());
                app.handle_reply(Reply::Candidate {
                    ticket: *ticket,
                    result: Ok(CandidateLookup::Found(CandidateInfo {
                        name: "Jane Doe".to_string(),
                        department: "Party X".to_string(),
                    })),
                });
            }
            other => panic!("expected one lookup, got {other:?}"),
        }
        assert!(matches!(&app.candidate, CandidatePanel::Found(info) if info.department == "Party X"));

        assert_eq!(app.confirm_vote().len(), 1);
        let effects = app.handle_reply(Reply::Vote(Ok(VoteOutcome::Rejected {
            message: "duplicate vote".to_string(),
        })));

        assert!(effects.is_empty());
        assert_eq!(app.alert.as_deref(), Some("Error: duplicate vote"));
        assert_eq!(app.ballot.digits(), "");
        assert!(!app.ballot.is_blank());
        assert_eq!(app.candidate, CandidatePanel::Hidden);
        assert_eq!(app.mode, AppMode::Voting);
        assert_eq!(app.session.voter_id.as_ref().map(Cpf::as_str), Some("12345678901"));
        assert_eq!(app.session.photo, Some(photo()));
    }
}
