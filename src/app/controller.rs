//! The game loop.
//!
//! [`GameController`] owns one [`GameSession`] and drives it against the
//! perception and motion ports: clear the board, let the human open or pick a
//! color, alternate turns, repair the physical board after each robot move,
//! and finish with an emote.

use std::time::{Duration, Instant};

use rand::{SeedableRng, rngs::StdRng};
use serde::Serialize;
use tracing::{debug, error, info, warn};

use super::config::GameConfig;
use crate::{
    Result,
    error::Error,
    geometry::WorldPoint,
    motion::{self, MotionCommand},
    perception::{Frame, ReconcileStats, reconcile, scene},
    planner::{self, ClearStep, PickPlace, Planner},
    ports::{MotionExecutor, PerceptionSource},
    session::{ComputerMove, GameSession},
    tictactoe::{Board, GameOutcome, Move},
};

/// Summary of a finished game
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameReport {
    pub outcome: Option<GameOutcome>,
    pub board: Board,
    pub history: Vec<Move>,
    pub stats: ReconcileStats,
    /// Board corrections that did not converge
    pub unresolved_mismatches: usize,
}

/// Drives games between a human and the robot.
///
/// # Examples
///
/// ```
/// use emio_tictactoe::{
///     adapters::{RecordingMotion, ScriptedPerception},
///     app::{GameConfig, GameController},
/// };
///
/// let config = GameConfig::default().with_seed(1);
/// let controller = GameController::new(ScriptedPerception::default(), RecordingMotion::new(1), config);
/// assert_eq!(controller.session().board().occupied_count(), 0);
/// ```
pub struct GameController<P, M> {
    perception: P,
    motion: M,
    config: GameConfig,
    session: GameSession,
    rng: StdRng,
    unresolved_mismatches: usize,
}

impl<P: PerceptionSource, M: MotionExecutor> GameController<P, M> {
    pub fn new(perception: P, motion: M, config: GameConfig) -> Self {
        let seed = config.game.seed.unwrap_or_else(rand::random);
        Self {
            perception,
            motion,
            config,
            session: GameSession::new(),
            rng: StdRng::seed_from_u64(seed),
            unresolved_mismatches: 0,
        }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn perception(&self) -> &P {
        &self.perception
    }

    pub fn motion(&self) -> &M {
        &self.motion
    }

    /// Play one complete game.
    ///
    /// # Errors
    ///
    /// Perception and motion errors end the game early;
    /// [`Error::NoStoredPawn`] is returned when the robot cannot find a pawn
    /// to play within the configured number of frames.
    pub fn play_game(&mut self) -> Result<GameReport> {
        self.clear_board()?;
        self.session.reset();
        self.unresolved_mismatches = 0;
        self.rest()?;
        info!(strategy = %self.config.game.strategy, "new game");

        self.first_round()?;
        self.check_and_correct()?;

        while !self.session.is_over() {
            if let Some(colors) = self.session.colors() {
                info!(color = %colors.human, "your turn to play");
            }
            self.wait_for_human_move()?;
            if self.session.is_over() {
                break;
            }
            self.computer_turn()?;
            self.check_and_correct()?;
        }

        let outcome = self.session.outcome();
        if let Some(outcome) = outcome {
            info!("{}", outcome.message());
            let emote = match outcome {
                GameOutcome::HumanWon => self.config.motion.applause(),
                GameOutcome::ComputerWon | GameOutcome::Draw => self.config.motion.shake(),
            };
            self.run(&emote)?;
        }
        self.rest()?;

        Ok(GameReport {
            outcome,
            board: *self.session.board(),
            history: self.session.history().to_vec(),
            stats: *self.session.stats(),
            unresolved_mismatches: self.unresolved_mismatches,
        })
    }

    /// Opening round: the human may play first; otherwise the robot picks a
    /// color from the pawns it sees. Ends after the robot's first move.
    ///
    /// The human move timeout is measured on frame timestamps when the
    /// perception source provides them, so recorded games replay the same
    /// way; unstamped frames fall back to the wall clock.
    pub fn first_round(&mut self) -> Result<()> {
        let timeout = self.config.perception.human_move_timeout();
        let mut clock = FrameClock::start();
        loop {
            let frame = self.next_frame()?;
            let elapsed = clock.elapsed(&frame);
            let outcome = reconcile(&mut self.session, &frame, &self.config.geometry);
            if outcome.is_accepted() {
                break;
            }
            if !frame.has_hand() && elapsed >= timeout {
                debug!(?elapsed, "no opening move from the human");
                break;
            }
        }

        if self.session.colors().is_none() {
            loop {
                let frame = self.next_frame()?;
                if let Some(colors) = scene::choose_colors(&frame, self.config.perception.min_confidence) {
                    info!(computer = %colors.computer, human = %colors.human, "I chose my color");
                    self.session.bind_colors(colors);
                    break;
                }
            }
        }

        self.computer_turn()?;
        Ok(())
    }

    /// Poll frames until a legal human move is accepted
    pub fn wait_for_human_move(&mut self) -> Result<()> {
        loop {
            let frame = self.next_frame()?;
            if reconcile(&mut self.session, &frame, &self.config.geometry).is_accepted() {
                return Ok(());
            }
        }
    }

    /// Choose a move, fetch a pawn of the robot's color and place it.
    ///
    /// Returns the move, or `None` when the board was already full. The move
    /// is only recorded once a pawn to play it has been found, so a failed
    /// search leaves the board as it was and the turn can be retried.
    pub fn computer_turn(&mut self) -> Result<Option<ComputerMove>> {
        let strategy = self.config.game.strategy;
        let Some(mv) =
            self.session
                .choose_computer_move(strategy, &self.config.geometry, &mut self.rng)?
        else {
            return Ok(None);
        };

        let pick = self.find_stored_pawn(&mv)?;
        self.session.commit_computer_move(&mv);
        let commands = self.config.motion.pick_and_place(pick, mv.target, true);
        self.run(&commands)?;
        Ok(Some(mv))
    }

    fn find_stored_pawn(&mut self, mv: &ComputerMove) -> Result<WorldPoint> {
        let min_confidence = self.config.perception.min_confidence;
        for attempt in 1..=self.config.game.pawn_search_attempts {
            let frame = self.next_frame()?;
            if let Some(pawn) =
                scene::nearest_stored_pawn(&frame, mv.color, mv.target, &self.config.geometry, min_confidence)
            {
                debug!(slot = pawn.slot, attempt, "picking stored pawn");
                return Ok(pawn.position);
            }
            info!(attempt, "I did not find a pawn to play");
        }
        error!(color = %mv.color, "giving up on finding a pawn");
        Err(Error::NoStoredPawn { color: mv.color })
    }

    /// Compare the camera view with the authoritative board and move pawns
    /// until they agree or the attempts run out. Returns whether they agree.
    ///
    /// Frames with a hand in view are skipped without using up an attempt.
    pub fn check_and_correct(&mut self) -> Result<bool> {
        let attempts = self.config.game.correction_attempts;
        for attempt in 0..=attempts {
            let frame = self.next_hand_free_frame()?;
            let observed = scene::observed_board(&frame, &self.config.geometry);
            let corrections = planner::diagnose(self.session.board(), &observed);
            if corrections.is_empty() {
                return Ok(true);
            }
            if attempt == attempts {
                break;
            }

            info!(attempt = attempt + 1, mismatches = corrections.len(), "boards mismatch, I will try to fix that");
            debug!(observed = %observed, expected = %self.session.board(), "board comparison");
            let moves = self.plan_corrections(&frame, &corrections);
            for pick_place in moves {
                self.transfer(pick_place, true)?;
            }
        }

        error!("I tried to correct the board but did not succeed; please fix it");
        self.unresolved_mismatches += 1;
        Ok(false)
    }

    fn plan_corrections(&mut self, frame: &Frame, corrections: &[planner::Correction]) -> Vec<PickPlace> {
        let geometry = self.config.geometry;
        let min_confidence = self.config.perception.min_confidence;
        let storage = self.session.storage_mut();
        storage.refresh_from_frame(frame, &geometry);

        let mut planner = Planner::new(&geometry, frame, storage, min_confidence);
        let mut moves = Vec::new();
        for &correction in corrections {
            match planner.plan(correction) {
                Ok(planned) => moves.extend(planned),
                Err(err) => warn!(cell = %correction.cell(), %err, "cannot correct cell"),
            }
        }
        moves
    }

    /// Move every pawn on the play zone into storage
    pub fn clear_board(&mut self) -> Result<()> {
        let mut moved = 0;
        while moved < self.config.game.max_clear_moves {
            let frame = self.next_frame()?;
            match planner::plan_clear_step(&frame, self.session.storage_mut(), &self.config.geometry) {
                Ok(ClearStep::Done) => {
                    info!("the board is clear");
                    return Ok(());
                }
                Ok(ClearStep::Wait) => continue,
                Ok(ClearStep::Move(pick_place)) => {
                    self.transfer(pick_place, false)?;
                    moved += 1;
                }
                Err(Error::StorageFull) => {
                    error!("no empty storage left to clear the board");
                    return Ok(());
                }
                Err(err) => return Err(err),
            }
        }
        warn!(moved, "stopped clearing the board");
        Ok(())
    }

    fn transfer(&mut self, pick_place: PickPlace, via_rest: bool) -> Result<()> {
        let commands = self
            .config
            .motion
            .pick_and_place(pick_place.pick, pick_place.place, via_rest);
        self.run(&commands)
    }

    fn rest(&mut self) -> Result<()> {
        let commands = self.config.motion.rest();
        self.run(&commands)
    }

    fn run(&mut self, commands: &[MotionCommand]) -> Result<()> {
        motion::drive(
            &mut self.motion,
            commands,
            self.config.motion.max_steps_per_command,
        )
    }

    fn next_frame(&mut self) -> Result<Frame> {
        self.perception.next_frame()
    }

    fn next_hand_free_frame(&mut self) -> Result<Frame> {
        loop {
            let frame = self.next_frame()?;
            if !frame.has_hand() {
                return Ok(frame);
            }
            debug!("hand in view, looking again");
        }
    }
}

/// Time since the first frame of a wait.
///
/// Uses frame timestamps while the source provides them and the wall clock
/// otherwise.
struct FrameClock {
    started: Instant,
    first_stamp: Option<u64>,
}

impl FrameClock {
    fn start() -> Self {
        Self {
            started: Instant::now(),
            first_stamp: None,
        }
    }

    fn elapsed(&mut self, frame: &Frame) -> Duration {
        match frame.timestamp_ms {
            Some(ms) => {
                let first = *self.first_stamp.get_or_insert(ms);
                Duration::from_millis(ms.saturating_sub(first))
            }
            None => self.started.elapsed(),
        }
    }
}
