//! One player session: the simulation plus its score client
//!
//! The session is the only place the run and the score service meet. It
//! routes the submit command, asks for a leaderboard refresh on load and after
//! every game over, and folds submit results back into the one-shot guard.

use crate::leaderboard::{LeaderboardDisplay, ScoreClient, ScoreRecord};
use crate::sim::{
    Command, GameEvent, GameState, HudStats, RenderSnapshot, RunMode, TickInput, tick,
};

pub struct Session {
    state: GameState,
    client: ScoreClient,
    player_name: String,
}

impl Session {
    /// Wrap a state and client, fetching the leaderboard immediately
    pub fn new(state: GameState, client: ScoreClient, player_name: impl Into<String>) -> Self {
        let mut session = Self {
            state,
            client,
            player_name: player_name.into(),
        };
        session.client.refresh();
        session
    }

    /// Run one frame and return the events it produced
    pub fn frame(&mut self, input: &TickInput, now_ms: f64) -> Vec<GameEvent> {
        if input.command == Some(Command::SubmitScore) {
            self.submit_score();
        }

        tick(&mut self.state, input, now_ms);
        let events = self.state.drain_events();
        if events.iter().any(|e| matches!(e, GameEvent::GameOver(_))) {
            self.client.refresh();
        }

        self.apply_client_results();
        events
    }

    /// Submit the finished run's record, at most once per run.
    ///
    /// Returns true when a request was issued.
    pub fn submit_score(&mut self) -> bool {
        let run = &self.state.run;
        let Some(summary) = run.summary.filter(|_| run.mode == RunMode::GameOver) else {
            log::debug!("Ignoring score submit while {:?}", run.mode);
            return false;
        };
        if run.score_submitted || self.client.submit_pending(run.run_id) {
            log::debug!("Score for run {} already submitted", run.run_id);
            return false;
        }

        let run_id = run.run_id;
        let record = ScoreRecord::from_summary(&summary, &self.player_name);
        self.client.submit(record, run_id);
        true
    }

    /// Drain finished score requests without ticking the simulation
    pub fn poll_scores(&mut self) {
        self.apply_client_results();
    }

    /// Block up to `limit` for outstanding score requests (shutdown)
    pub fn settle_scores(&mut self, limit: std::time::Duration) {
        let outcomes = self.client.settle(limit);
        self.apply_outcomes(outcomes);
    }

    fn apply_client_results(&mut self) {
        let outcomes = self.client.poll();
        self.apply_outcomes(outcomes);
    }

    fn apply_outcomes(&mut self, outcomes: Vec<crate::leaderboard::SubmitOutcome>) {
        for outcome in outcomes {
            if outcome.accepted && outcome.run_id == self.state.run.run_id {
                self.state.run.score_submitted = true;
            }
        }
    }

    pub fn set_player_name(&mut self, name: impl Into<String>) {
        self.player_name = name.into();
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Direct access for drivers and tests that stage scenarios
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn snapshot(&self) -> RenderSnapshot<'_> {
        self.state.snapshot()
    }

    pub fn hud(&self) -> HudStats {
        self.state.hud()
    }

    pub fn leaderboard(&self) -> &LeaderboardDisplay {
        self.client.display()
    }

    pub fn client(&self) -> &ScoreClient {
        &self.client
    }
}
