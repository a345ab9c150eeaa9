mod common;

use std::{ops::Range, time::Duration};

use common::{Pawn, SimulatedTable};
use emio_tictactoe::{
    Board, BoardGeometry, CellIndex, PlayerColor, Strategy,
    adapters::{RecordingMotion, ScriptedPerception},
    app::{GameConfig, GameController},
    error::Error,
    perception::{Detection, DetectorClass, Frame},
    tictactoe::{GameOutcome, Participant},
};

fn config() -> GameConfig {
    GameConfig::default()
        .with_strategy(Strategy::IMPOSSIBLE)
        .with_seed(7)
        .with_human_move_timeout(Duration::from_secs(60))
}

fn idx(row: usize, col: usize) -> CellIndex {
    CellIndex::new(row, col).unwrap()
}

const DRAW_LINE: [(usize, usize); 5] = [(0, 0), (2, 2), (2, 1), (0, 2), (1, 0)];

/// Dogs and cats parked in the given storage slots
fn stored_pawns(dogs: Range<usize>, cats: Range<usize>) -> Vec<Pawn> {
    let geometry = BoardGeometry::default();
    let park = |color, slot| Pawn {
        color,
        at: geometry.storage_slot_to_position(slot).unwrap(),
    };
    dogs.map(|slot| park(PlayerColor::Dog, slot))
        .chain(cats.map(|slot| park(PlayerColor::Cat, slot)))
        .collect()
}

#[test]
fn human_opens_and_the_game_is_drawn() {
    let table = SimulatedTable::new(true, &DRAW_LINE);
    let mut controller = GameController::new(table.camera(), table.arm(), config());

    let report = controller.play_game().unwrap();

    assert_eq!(report.outcome, Some(GameOutcome::Draw));
    assert_eq!(report.board, Board::from_string("XOX XOO OXX").unwrap());
    assert_eq!(table.board(), report.board);
    assert_eq!(report.history.len(), 9);
    assert_eq!(report.history[0].by, Participant::Human);
    assert_eq!(report.history[0].color, PlayerColor::Dog);
    assert_eq!(report.history[1].cell, CellIndex::CENTER);
    assert_eq!(report.history[3].cell, idx(0, 1));
    assert_eq!(report.stats.accepted, 5);
    assert_eq!(report.stats.ambiguous, 0);
    assert_eq!(report.unresolved_mismatches, 0);
}

#[test]
fn robot_opens_after_timeout_and_wins() {
    let table = SimulatedTable::new(false, &[(0, 1), (1, 0)]);
    let config = config().with_human_move_timeout(Duration::ZERO);
    let mut controller = GameController::new(table.camera(), table.arm(), config);

    let report = controller.play_game().unwrap();

    // The first pawn in view is a dog, so the robot takes cat
    let colors = controller.session().colors().unwrap();
    assert_eq!(colors.human, PlayerColor::Dog);
    assert_eq!(colors.computer, PlayerColor::Cat);

    assert_eq!(report.outcome, Some(GameOutcome::ComputerWon));
    assert_eq!(report.board, Board::from_string(".XO XO. O..").unwrap());
    assert_eq!(table.board(), report.board);
    let robot_cells: Vec<CellIndex> = report
        .history
        .iter()
        .filter(|m| m.by == Participant::Computer)
        .map(|m| m.cell)
        .collect();
    assert_eq!(robot_cells, vec![CellIndex::CENTER, idx(0, 2), idx(2, 0)]);
}

#[test]
fn misplaced_pawn_is_corrected() {
    let table = SimulatedTable::new(true, &DRAW_LINE);
    let geometry = BoardGeometry::default();
    table.misdrop_next(geometry.cell_to_position(idx(2, 0)));
    let mut controller = GameController::new(table.camera(), table.arm(), config());

    let report = controller.play_game().unwrap();

    assert_eq!(report.outcome, Some(GameOutcome::Draw));
    assert_eq!(report.unresolved_mismatches, 0);
    assert_eq!(table.board(), report.board);
}

#[test]
fn leftover_pawns_are_cleared_before_the_game() {
    let geometry = BoardGeometry::default();
    let mut table_pawns = stored_pawns(0..5, 6..10);
    // A cat left on the board from the previous game
    table_pawns.push(Pawn {
        color: PlayerColor::Cat,
        at: geometry.cell_to_position(idx(1, 2)),
    });

    let table = SimulatedTable::with_pawns(true, &DRAW_LINE, table_pawns);
    let mut controller = GameController::new(table.camera(), table.arm(), config());
    let report = controller.play_game().unwrap();

    assert_eq!(report.outcome, Some(GameOutcome::Draw));
    assert_eq!(table.board(), report.board);
}

#[test]
fn missing_robot_pawns_end_the_game() {
    let table = SimulatedTable::with_pawns(false, &[], stored_pawns(0..5, 0..0));
    let config = config()
        .with_human_move_timeout(Duration::ZERO)
        .with_pawn_search_attempts(3);
    let mut controller = GameController::new(table.camera(), table.arm(), config);

    let err = controller.play_game().unwrap_err();
    assert!(matches!(err, Error::NoStoredPawn { color: PlayerColor::Cat }));
}

#[test]
fn first_round_ends_after_the_robot_opens() {
    let table = SimulatedTable::new(false, &[]);
    let config = config().with_human_move_timeout(Duration::ZERO);
    let mut controller = GameController::new(table.camera(), table.arm(), config);

    let () = controller.first_round().unwrap();
    assert_eq!(controller.session().history().len(), 1);
    assert_eq!(controller.session().board().get(CellIndex::CENTER), PlayerColor::Cat.to_cell());
    assert_eq!(table.board(), *controller.session().board());
}

#[test]
fn failed_pawn_search_leaves_the_board_untouched() {
    let table = SimulatedTable::with_pawns(false, &[], stored_pawns(0..5, 0..0));
    let config = config()
        .with_human_move_timeout(Duration::ZERO)
        .with_pawn_search_attempts(2);
    let mut controller = GameController::new(table.camera(), table.arm(), config);

    let err = controller.first_round().unwrap_err();
    assert!(matches!(err, Error::NoStoredPawn { color: PlayerColor::Cat }));
    assert_eq!(controller.session().board(), &Board::new());
    assert!(controller.session().history().is_empty());

    // Retrying the turn does not pile up moves either
    assert!(controller.computer_turn().is_err());
    assert_eq!(controller.session().board().occupied_count(), 0);
    assert!(controller.session().history().is_empty());
}

#[test]
fn unfixable_board_is_reported_and_play_goes_on() {
    // Four cats for four robot moves: the last one lands on (1,0) instead of
    // (1,2) and no spare cat is left to fetch.
    let geometry = BoardGeometry::default();
    let table = SimulatedTable::with_pawns(true, &DRAW_LINE, stored_pawns(0..5, 6..10));
    table.misdrop_on(3, geometry.cell_to_position(idx(1, 0)));
    let config = config().with_correction_attempts(1);
    let mut controller = GameController::new(table.camera(), table.arm(), config);

    let report = controller.play_game().unwrap();

    assert_eq!(report.unresolved_mismatches, 1);
    assert_eq!(report.outcome, Some(GameOutcome::Draw));
    assert_eq!(report.board, Board::from_string("XOX XOO OXX").unwrap());
    assert_eq!(table.board(), report.board);
}

#[test]
fn robot_opening_replays_with_the_default_timeout() {
    let table = SimulatedTable::new(false, &[(0, 1), (1, 0)]);
    let config = GameConfig::default()
        .with_strategy(Strategy::IMPOSSIBLE)
        .with_seed(7);
    let mut live = GameController::new(table.camera(), table.arm(), config.clone());
    let live_report = live.play_game().unwrap();
    assert_eq!(live_report.outcome, Some(GameOutcome::ComputerWon));
    assert_eq!(live_report.history[0].by, Participant::Computer);

    let json = serde_json::to_string(&table.recorded_frames()).unwrap();
    let frames = ScriptedPerception::from_json_str(&json).unwrap();
    let mut replay = GameController::new(frames, RecordingMotion::new(1), config);
    let replay_report = replay.play_game().unwrap();

    assert_eq!(replay_report, live_report);
    assert_eq!(replay.session().colors(), live.session().colors());
}

#[test]
fn recorded_game_replays_identically() {
    let table = SimulatedTable::new(true, &DRAW_LINE);
    let mut live = GameController::new(table.camera(), table.arm(), config());
    let live_report = live.play_game().unwrap();

    let json = serde_json::to_string(&table.recorded_frames()).unwrap();
    let frames = ScriptedPerception::from_json_str(&json).unwrap();
    let mut replay = GameController::new(frames, RecordingMotion::new(2), config());
    let replay_report = replay.play_game().unwrap();

    assert_eq!(replay_report, live_report);
    assert_eq!(replay.perception().remaining(), 0);
    assert!(!replay.motion().commands().is_empty());
}

#[test]
fn board_check_ignores_frames_with_a_hand() {
    let stray = Detection::at(DetectorClass::Dog, 0.9, 0.0, 0.0);
    let hand = Detection::new(DetectorClass::Hand, 0.8, None);
    let frames = ScriptedPerception::new([Frame::new(vec![stray, hand]), Frame::default()]);
    let mut controller = GameController::new(frames, RecordingMotion::new(1), config());

    assert!(controller.check_and_correct().unwrap());
    assert_eq!(controller.perception().served(), 2);
    assert!(controller.motion().commands().is_empty());
}

#[test]
fn exhausted_frames_surface_as_an_error() {
    let frames = ScriptedPerception::new(Vec::new());
    let mut controller = GameController::new(frames, RecordingMotion::new(1), config());
    assert!(matches!(controller.play_game(), Err(Error::PerceptionExhausted)));
}
