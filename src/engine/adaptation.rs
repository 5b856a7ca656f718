use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::engine::advisor::{Advice, AdviceRequest, AdvisorError, DifficultyAdvisor};
use crate::session::machine::Session;
use crate::session::report::SessionReport;
use crate::session::state::{PerformanceRecord, Phase, SessionState};
use crate::store::schema::ProfileData;

pub const MIN_DIFFICULTY: u32 = 1;
pub const MAX_DIFFICULTY: u32 = 10;

/// Answers summarised per advisory call, and the cadence calls are made at.
pub const REVIEW_WINDOW: usize = 5;

pub fn clamp_difficulty(value: i64) -> u32 {
    value.clamp(MIN_DIFFICULTY as i64, MAX_DIFFICULTY as i64) as u32
}

/// Round an advisor's (possibly fractional) recommendation to a level.
pub fn clamp_advised(value: f64) -> u32 {
    if value.is_nan() {
        return MIN_DIFFICULTY;
    }
    clamp_difficulty(value.round() as i64)
}

/// Summary of the most recent `REVIEW_WINDOW` records, or `None` if there
/// aren't that many yet.
pub fn review_request(history: &[PerformanceRecord], difficulty: u32) -> Option<AdviceRequest> {
    if history.len() < REVIEW_WINDOW {
        return None;
    }
    let window = &history[history.len() - REVIEW_WINDOW..];
    let correct = window.iter().filter(|r| r.correct).count();
    let total_ms: u64 = window.iter().map(|r| r.time_ms).sum();
    Some(AdviceRequest {
        accuracy: correct as f64 / REVIEW_WINDOW as f64,
        average_time_secs: total_ms as f64 / REVIEW_WINDOW as f64 / 1000.0,
        current_difficulty: difficulty,
    })
}

/// Whole-session summary used to carry the difficulty into the next session.
pub fn profile_request(report: &SessionReport, difficulty: u32) -> Option<AdviceRequest> {
    if report.answered() == 0 {
        return None;
    }
    Some(AdviceRequest {
        accuracy: report.accuracy_percent as f64 / 100.0,
        average_time_secs: report.average_time_secs,
        current_difficulty: difficulty,
    })
}

/// True when `next` has just entered the result phase with a history length
/// that is a positive multiple of the review window.
pub fn should_review(prev: &SessionState, next: &SessionState) -> bool {
    prev.phase != Phase::Result
        && next.phase == Phase::Result
        && !next.history.is_empty()
        && next.history.len() % REVIEW_WINDOW == 0
}

/// User-facing outcome of one advisory round trip.
#[derive(Clone, Debug, PartialEq)]
pub enum AdaptationNotice {
    Adjusted { from: u32, to: u32, reason: String },
    Failed { message: String },
}

impl AdaptationNotice {
    pub fn message(&self) -> String {
        match self {
            AdaptationNotice::Adjusted { from, to, reason } => {
                format!("Difficulty {from} -> {to}: {reason}")
            }
            AdaptationNotice::Failed { message } => message.clone(),
        }
    }
}

struct Reply {
    session_id: u64,
    outcome: Result<Advice, AdvisorError>,
}

/// Runs advisory calls off the UI thread and feeds the answers back into the
/// session on the next `poll`. End-of-session reviews come back on their own
/// channel and land in the profile through `poll_profile`.
pub struct AdaptationBridge {
    advisor: Arc<dyn DifficultyAdvisor>,
    tx: Sender<Reply>,
    rx: Receiver<Reply>,
    in_flight: usize,
    profile_tx: Sender<Result<Advice, AdvisorError>>,
    profile_rx: Receiver<Result<Advice, AdvisorError>>,
    profile_in_flight: usize,
}

impl AdaptationBridge {
    pub fn new(advisor: Arc<dyn DifficultyAdvisor>) -> Self {
        let (tx, rx) = mpsc::channel();
        let (profile_tx, profile_rx) = mpsc::channel();
        Self {
            advisor,
            tx,
            rx,
            in_flight: 0,
            profile_tx,
            profile_rx,
            profile_in_flight: 0,
        }
    }

    /// Inspect a transition and start an advisory call if it calls for one.
    /// Returns true when a call was started.
    pub fn observe(&mut self, prev: &SessionState, next: &SessionState) -> bool {
        if !should_review(prev, next) {
            return false;
        }
        let Some(request) = review_request(&next.history, next.difficulty) else {
            return false;
        };

        debug!(
            session = next.session_id,
            answered = next.history.len(),
            accuracy = request.accuracy,
            average_time_secs = request.average_time_secs,
            "requesting difficulty advice"
        );

        let advisor = Arc::clone(&self.advisor);
        let tx = self.tx.clone();
        let session_id = next.session_id;
        self.in_flight += 1;
        thread::spawn(move || {
            let outcome = advisor.advise(&request);
            // The receiver is gone only when the app is shutting down.
            let _ = tx.send(Reply {
                session_id,
                outcome,
            });
        });
        true
    }

    /// Apply every reply that has arrived so far.
    pub fn poll(&mut self, session: &mut Session) -> Vec<AdaptationNotice> {
        let mut notices = Vec::new();
        while let Ok(reply) = self.rx.try_recv() {
            if let Some(notice) = self.apply(reply, session) {
                notices.push(notice);
            }
        }
        notices
    }

    /// Block up to `timeout` for one reply. Used by tests and on shutdown.
    pub fn wait(&mut self, session: &mut Session, timeout: Duration) -> Option<AdaptationNotice> {
        let reply = self.rx.recv_timeout(timeout).ok()?;
        self.apply(reply, session)
    }

    /// Ask for a difficulty to start the next session at, based on the whole
    /// finished session. Returns true when a call was started.
    pub fn review_profile(&mut self, report: &SessionReport, difficulty: u32) -> bool {
        let Some(request) = profile_request(report, difficulty) else {
            return false;
        };

        debug!(
            accuracy = request.accuracy,
            average_time_secs = request.average_time_secs,
            difficulty,
            "requesting profile difficulty review"
        );

        let advisor = Arc::clone(&self.advisor);
        let tx = self.profile_tx.clone();
        self.profile_in_flight += 1;
        thread::spawn(move || {
            let _ = tx.send(advisor.advise(&request));
        });
        true
    }

    /// Apply every profile review that has arrived so far.
    pub fn poll_profile(&mut self, profile: &mut ProfileData) -> Vec<AdaptationNotice> {
        let mut notices = Vec::new();
        while let Ok(outcome) = self.profile_rx.try_recv() {
            if let Some(notice) = self.apply_profile(outcome, profile) {
                notices.push(notice);
            }
        }
        notices
    }

    /// Block up to `timeout` for one profile review.
    pub fn wait_profile(
        &mut self,
        profile: &mut ProfileData,
        timeout: Duration,
    ) -> Option<AdaptationNotice> {
        let outcome = self.profile_rx.recv_timeout(timeout).ok()?;
        self.apply_profile(outcome, profile)
    }

    pub fn pending(&self) -> usize {
        self.in_flight + self.profile_in_flight
    }

    fn apply_profile(
        &mut self,
        outcome: Result<Advice, AdvisorError>,
        profile: &mut ProfileData,
    ) -> Option<AdaptationNotice> {
        self.profile_in_flight = self.profile_in_flight.saturating_sub(1);
        match outcome {
            Ok(advice) => {
                let from = profile.difficulty;
                let to = clamp_advised(advice.new_difficulty);
                if to == from {
                    debug!(difficulty = from, reason = %advice.reason, "profile difficulty kept");
                    return None;
                }
                profile.difficulty = to;
                info!(from, to, reason = %advice.reason, "profile difficulty adjusted");
                Some(AdaptationNotice::Adjusted {
                    from,
                    to,
                    reason: advice.reason,
                })
            }
            Err(e) => {
                warn!(error = %e, "could not review profile difficulty");
                Some(AdaptationNotice::Failed {
                    message: "Could not review your difficulty.".to_string(),
                })
            }
        }
    }

    fn apply(&mut self, reply: Reply, session: &mut Session) -> Option<AdaptationNotice> {
        self.in_flight = self.in_flight.saturating_sub(1);
        let current = session.state();
        if reply.session_id != current.session_id {
            debug!(
                reply_session = reply.session_id,
                current_session = current.session_id,
                "dropping advice for a finished session"
            );
            return None;
        }

        match reply.outcome {
            Ok(advice) => {
                let from = current.difficulty;
                let to = clamp_advised(advice.new_difficulty);
                if to == from {
                    debug!(difficulty = from, reason = %advice.reason, "difficulty kept");
                    return None;
                }
                session.set_difficulty(reply.session_id, to);
                info!(from, to, reason = %advice.reason, "difficulty adjusted");
                Some(AdaptationNotice::Adjusted {
                    from,
                    to,
                    reason: advice.reason,
                })
            }
            Err(e) => {
                warn!(error = %e, "could not adjust difficulty");
                Some(AdaptationNotice::Failed {
                    message: "Could not adjust difficulty.".to_string(),
                })
            }
        }
    }
}
