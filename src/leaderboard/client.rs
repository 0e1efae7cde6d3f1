//! Asynchronous score client
//!
//! Requests are queued to a worker thread that owns the service. The frame
//! loop calls [`ScoreClient::poll`] to drain completions; nothing here ever
//! blocks a frame. Each request is attempted once and abandoned after the
//! configured timeout, after which a late answer is dropped.

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use super::{
    FETCH_FAILED_MESSAGE, LeaderboardDisplay, SUBMIT_FAILED_MESSAGE, ScoreError, ScoreRecord,
    ScoreService,
};

enum Request {
    FetchTop,
    Submit(ScoreRecord),
}

struct Job {
    id: u64,
    request: Request,
}

enum Outcome {
    Fetched(Result<Vec<ScoreRecord>, ScoreError>),
    Submitted(Result<(), ScoreError>),
}

struct Completion {
    id: u64,
    outcome: Outcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingKind {
    Fetch,
    /// Carries the run the record belongs to
    Submit { run_id: u32 },
}

#[derive(Debug, Clone, Copy)]
struct Pending {
    id: u64,
    kind: PendingKind,
    deadline: Instant,
}

/// Final state of a submit request, reported back to the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub run_id: u32,
    pub accepted: bool,
}

/// Client for a [`ScoreService`] running on a background worker
pub struct ScoreClient {
    jobs: Option<Sender<Job>>,
    completions: Receiver<Completion>,
    worker: Option<JoinHandle<()>>,
    pending: Vec<Pending>,
    next_id: u64,
    timeout: Duration,
    display: LeaderboardDisplay,
    submits_issued: u64,
}

impl ScoreClient {
    /// Start the worker thread for `service`
    pub fn spawn(service: impl ScoreService + 'static, timeout: Duration) -> Result<Self, ScoreError> {
        let (job_tx, job_rx) = mpsc::channel::<Job>();
        let (done_tx, done_rx) = mpsc::channel::<Completion>();
        let mut service = service;

        let worker = thread::Builder::new()
            .name("score-service".to_string())
            .spawn(move || {
                for job in job_rx {
                    let outcome = match job.request {
                        Request::FetchTop => Outcome::Fetched(service.fetch_top()),
                        Request::Submit(record) => Outcome::Submitted(service.submit(&record)),
                    };
                    if done_tx.send(Completion { id: job.id, outcome }).is_err() {
                        break;
                    }
                }
            })?;

        Ok(Self {
            jobs: Some(job_tx),
            completions: done_rx,
            worker: Some(worker),
            pending: Vec::new(),
            next_id: 0,
            timeout,
            display: LeaderboardDisplay::Loading,
            submits_issued: 0,
        })
    }

    /// What the leaderboard panel should currently show
    pub fn display(&self) -> &LeaderboardDisplay {
        &self.display
    }

    /// Number of submit requests handed to the worker so far
    pub fn submits_issued(&self) -> u64 {
        self.submits_issued
    }

    /// Whether any request is still awaiting an answer
    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }

    /// Whether a submit for `run_id` is in flight
    pub fn submit_pending(&self, run_id: u32) -> bool {
        self.pending
            .iter()
            .any(|p| p.kind == PendingKind::Submit { run_id })
    }

    /// Ask for the current top records (fire-and-forget)
    pub fn refresh(&mut self) {
        if self.pending.iter().any(|p| p.kind == PendingKind::Fetch) {
            log::debug!("Leaderboard refresh already in flight");
            return;
        }
        if let Err(e) = self.dispatch(Request::FetchTop, PendingKind::Fetch) {
            log::warn!("Leaderboard refresh failed: {}", e);
            self.display = LeaderboardDisplay::Message(FETCH_FAILED_MESSAGE);
        }
    }

    /// Submit a record for `run_id` (fire-and-forget)
    pub fn submit(&mut self, record: ScoreRecord, run_id: u32) {
        log::info!("Submitting score for run {}: {}", run_id, record);
        self.submits_issued += 1;
        if let Err(e) = self.dispatch(Request::Submit(record), PendingKind::Submit { run_id }) {
            log::warn!("Score submit failed: {}", e);
            self.display = LeaderboardDisplay::Message(SUBMIT_FAILED_MESSAGE);
        }
    }

    fn dispatch(&mut self, request: Request, kind: PendingKind) -> Result<(), ScoreError> {
        let jobs = self.jobs.as_ref().ok_or(ScoreError::Disconnected)?;
        self.next_id += 1;
        let id = self.next_id;
        jobs.send(Job { id, request })
            .map_err(|_| ScoreError::Disconnected)?;
        self.pending.push(Pending {
            id,
            kind,
            deadline: Instant::now() + self.timeout,
        });
        Ok(())
    }

    /// Drain finished requests and expire overdue ones.
    ///
    /// Returns the submit results that settled during this call.
    pub fn poll(&mut self) -> Vec<SubmitOutcome> {
        self.poll_at(Instant::now())
    }

    fn poll_at(&mut self, now: Instant) -> Vec<SubmitOutcome> {
        let mut settled = Vec::new();

        loop {
            match self.completions.try_recv() {
                Ok(completion) => {
                    if let Some(outcome) = self.complete(completion) {
                        settled.push(outcome);
                    }
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if !self.pending.is_empty() {
                        log::warn!("Score worker exited with {} requests pending", self.pending.len());
                    }
                    self.jobs = None;
                    break;
                }
            }
        }

        let disconnected = self.jobs.is_none();
        let (expired, live): (Vec<Pending>, Vec<Pending>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|p| disconnected || p.deadline <= now);
        self.pending = live;
        for pending in expired {
            log::warn!("Score request {} abandoned: {}", pending.id, ScoreError::Timeout);
            if let Some(outcome) = self.fail(pending.kind) {
                settled.push(outcome);
            }
        }

        settled
    }

    fn complete(&mut self, completion: Completion) -> Option<SubmitOutcome> {
        let index = self.pending.iter().position(|p| p.id == completion.id);
        let Some(index) = index else {
            log::debug!("Dropping late answer for request {}", completion.id);
            return None;
        };
        let pending = self.pending.remove(index);

        match (completion.outcome, pending.kind) {
            (Outcome::Fetched(Ok(rows)), _) => {
                log::info!("Leaderboard refreshed ({} rows)", rows.len());
                self.display = LeaderboardDisplay::Rows(rows);
                None
            }
            (Outcome::Submitted(Ok(())), PendingKind::Submit { run_id }) => {
                log::info!("Score for run {} saved", run_id);
                self.refresh();
                Some(SubmitOutcome {
                    run_id,
                    accepted: true,
                })
            }
            (Outcome::Fetched(Err(e)), kind) | (Outcome::Submitted(Err(e)), kind) => {
                log::warn!("Score request {} failed: {}", pending.id, e);
                self.fail(kind)
            }
            (Outcome::Submitted(Ok(())), PendingKind::Fetch) => None,
        }
    }

    fn fail(&mut self, kind: PendingKind) -> Option<SubmitOutcome> {
        match kind {
            PendingKind::Fetch => {
                self.display = LeaderboardDisplay::Message(FETCH_FAILED_MESSAGE);
                None
            }
            PendingKind::Submit { run_id } => {
                self.display = LeaderboardDisplay::Message(SUBMIT_FAILED_MESSAGE);
                Some(SubmitOutcome {
                    run_id,
                    accepted: false,
                })
            }
        }
    }

    /// Poll until every request settles or `limit` elapses (shutdown and tests)
    pub fn settle(&mut self, limit: Duration) -> Vec<SubmitOutcome> {
        let stop = Instant::now() + limit;
        let mut settled = self.poll();
        while !self.is_idle() && Instant::now() < stop {
            thread::sleep(Duration::from_millis(1));
            settled.extend(self.poll());
        }
        settled
    }
}

impl Drop for ScoreClient {
    fn drop(&mut self) {
        // Closing the job channel ends the worker loop; a worker stuck in a
        // slow call is detached rather than joined
        self.jobs = None;
        if let Some(worker) = self.worker.take() {
            if worker.is_finished() {
                let _ = worker.join();
            }
        }
    }
}
