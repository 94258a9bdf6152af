//! Runs controller effects off the UI thread.
//!
//! Each effect gets its own short-lived worker thread. Results come back to
//! the event loop as [`Reply`] messages over a channel, so a slow server or
//! camera never freezes the screen.

use std::io;
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread;

use log::{debug, warn};

use super::api::{ApiError, BallotApi};
use super::camera::{Camera, CameraError};
use super::chime::Chime;
use crate::application::{Effect, Reply};

pub struct Dispatcher {
    api: Arc<dyn BallotApi>,
    camera: Arc<dyn Camera>,
    chime: Arc<dyn Chime>,
    replies: Sender<Reply>,
}

impl Dispatcher {
    pub fn new(
        api: Arc<dyn BallotApi>,
        camera: Arc<dyn Camera>,
        chime: Arc<dyn Chime>,
        replies: Sender<Reply>,
    ) -> Self {
        Self {
            api,
            camera,
            chime,
            replies,
        }
    }

    pub fn dispatch_all(&self, effects: Vec<Effect>) {
        for effect in effects {
            self.dispatch(effect);
        }
    }

    pub fn dispatch(&self, effect: Effect) {
        let started = match &effect {
            Effect::CheckCamera => {
                let camera = Arc::clone(&self.camera);
                self.spawn("camera-check", move || Some(Reply::CameraCheck(camera.check())))
            }
            Effect::CheckEligibility { ticket, cpf } => {
                let api = Arc::clone(&self.api);
                let (ticket, cpf) = (*ticket, cpf.clone());
                self.spawn("eligibility", move || {
                    Some(Reply::Eligibility {
                        ticket,
                        result: api.check_cpf(&cpf),
                    })
                })
            }
            Effect::CapturePhoto => {
                let camera = Arc::clone(&self.camera);
                self.spawn("capture", move || Some(Reply::Photo(camera.capture())))
            }
            Effect::LookupCandidate { ticket, number } => {
                let api = Arc::clone(&self.api);
                let (ticket, number) = (*ticket, number.clone());
                self.spawn("lookup", move || {
                    Some(Reply::Candidate {
                        ticket,
                        result: api.candidate_info(&number),
                    })
                })
            }
            Effect::SubmitVote(submission) => {
                let api = Arc::clone(&self.api);
                let submission = submission.clone();
                self.spawn("vote", move || Some(Reply::Vote(api.submit_vote(&submission))))
            }
            Effect::PlayChime => {
                let chime = Arc::clone(&self.chime);
                self.spawn("chime", move || {
                    if let Err(err) = chime.play() {
                        warn!("Confirmation sound failed: {err}");
                    }
                    None
                })
            }
            Effect::ScheduleReset(delay) => {
                let delay = *delay;
                self.spawn("reset", move || {
                    thread::sleep(delay);
                    Some(Reply::ResetDue)
                })
            }
        };

        if let Err(err) = started {
            if let Some(reply) = unstarted(&effect, err) {
                self.send(reply);
            }
        }
    }

    fn send(&self, reply: Reply) {
        if self.replies.send(reply).is_err() {
            debug!("Reply dropped, event loop is gone");
        }
    }

    fn spawn<F>(&self, name: &str, job: F) -> io::Result<()>
    where
        F: FnOnce() -> Option<Reply> + Send + 'static,
    {
        let replies = self.replies.clone();
        thread::Builder::new()
            .name(format!("urna-{name}"))
            .spawn(move || {
                if let Some(reply) = job() {
                    if replies.send(reply).is_err() {
                        debug!("Reply dropped, event loop is gone");
                    }
                }
            })
            .map(drop)
            .inspect_err(|err| warn!("Failed to start {name} worker: {err}"))
    }
}

/// The reply owed to the controller when an effect's worker never ran, so
/// that no operation is left waiting forever. A skipped reset fires at once.
fn unstarted(effect: &Effect, err: io::Error) -> Option<Reply> {
    match effect {
        Effect::CheckCamera => Some(Reply::CameraCheck(Err(CameraError::Worker(err)))),
        Effect::CheckEligibility { ticket, .. } => Some(Reply::Eligibility {
            ticket: *ticket,
            result: Err(ApiError::Worker(err)),
        }),
        Effect::CapturePhoto => Some(Reply::Photo(Err(CameraError::Worker(err)))),
        Effect::LookupCandidate { ticket, .. } => Some(Reply::Candidate {
            ticket: *ticket,
            result: Err(ApiError::Worker(err)),
        }),
        Effect::SubmitVote(_) => Some(Reply::Vote(Err(ApiError::Worker(err)))),
        Effect::PlayChime => None,
        Effect::ScheduleReset(_) => Some(Reply::ResetDue),
    }
}
