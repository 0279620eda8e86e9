use rand::prelude::*;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::game::decode_payload;
use crate::*;
pub use board::*;

mod board;

/// Settings key holding the best score across sessions.
pub const BEST_SCORE_KEY: &str = "game2048.bestScore";

const WIN_MESSAGE: &str = "You won! Keep playing or start a new game.";
const LOSS_MESSAGE: &str = "Game Over! No more moves available.";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MergeAction {
    Move(Direction),
    Reset,
}

#[derive(Deserialize)]
struct MovePayload {
    direction: String,
}

impl MergeAction {
    pub fn decode(action: &str, payload: &Value) -> Result<Self> {
        match action {
            "move" => {
                let MovePayload { direction } = decode_payload(action, payload)?;
                Ok(Self::Move(direction.parse()?))
            }
            "reset" => Ok(Self::Reset),
            other => Err(GameError::UnknownAction(other.to_owned())),
        }
    }
}

/// Outcome of a move request.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    NoChange,
    Moved,
    Won,
    Lost,
}

impl MoveOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeData {
    pub board: Vec<Vec<Tile>>,
    pub score: u64,
    pub best_score: u64,
    pub has_won: bool,
}

/// The 4×4 sliding merge game.
pub struct MergeGame {
    board: MergeBoard,
    score: u64,
    best_score: u64,
    is_game_over: bool,
    has_won: bool,
    message: Option<String>,
    rng: SmallRng,
    store: SharedStore,
}

impl MergeGame {
    pub const GAME_TYPE: &'static str = "2048";

    pub fn new(store: SharedStore) -> Self {
        Self::with_rng(store, SmallRng::from_os_rng())
    }

    pub fn with_seed(store: SharedStore, seed: u64) -> Self {
        Self::with_rng(store, SmallRng::seed_from_u64(seed))
    }

    /// Resumes play on an existing board with a zero score.
    pub fn from_board(store: SharedStore, board: MergeBoard, seed: u64) -> Self {
        let mut game = Self::with_seed(store, seed);
        game.board = board;
        game
    }

    fn with_rng(store: SharedStore, rng: SmallRng) -> Self {
        let best_score = store.borrow().get::<u64>(BEST_SCORE_KEY).unwrap_or(0);
        let mut game = Self {
            board: MergeBoard::empty(),
            score: 0,
            best_score,
            is_game_over: false,
            has_won: false,
            message: None,
            rng,
            store,
        };
        game.start();
        game
    }

    fn start(&mut self) {
        self.board = MergeBoard::empty();
        self.score = 0;
        self.is_game_over = false;
        self.has_won = false;
        self.message = None;
        self.board.spawn_random_tile(&mut self.rng);
        self.board.spawn_random_tile(&mut self.rng);
    }

    pub fn board(&self) -> &MergeBoard {
        &self.board
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn best_score(&self) -> u64 {
        self.best_score
    }

    pub fn is_game_over(&self) -> bool {
        self.is_game_over
    }

    pub fn has_won(&self) -> bool {
        self.has_won
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn apply(&mut self, action: MergeAction) -> MoveOutcome {
        match action {
            MergeAction::Move(direction) => self.shift(direction),
            MergeAction::Reset => {
                self.start();
                MoveOutcome::Moved
            }
        }
    }

    /// Slides the board, then spawns one tile and checks for the end of the
    /// game. A slide that changes nothing leaves every field untouched.
    pub fn shift(&mut self, direction: Direction) -> MoveOutcome {
        if self.is_game_over {
            return MoveOutcome::NoChange;
        }

        let shift = self.board.shift(direction);
        if !shift.moved {
            return MoveOutcome::NoChange;
        }

        self.message = None;
        self.score += shift.points;

        let mut outcome = MoveOutcome::Moved;
        if shift.reached_goal && !self.has_won {
            log::debug!("Reached {WINNING_TILE} with score {}", self.score);
            self.has_won = true;
            self.message = Some(WIN_MESSAGE.to_owned());
            outcome = MoveOutcome::Won;
        }

        self.board.spawn_random_tile(&mut self.rng);

        if !self.board.has_moves() {
            log::debug!("No moves left, final score {}\n{}", self.score, self.board);
            self.is_game_over = true;
            self.message = Some(LOSS_MESSAGE.to_owned());
            outcome = MoveOutcome::Lost;
        }

        self.record_best_score();
        outcome
    }

    fn record_best_score(&mut self) {
        if self.score <= self.best_score {
            return;
        }
        self.best_score = self.score;
        if let Err(err) = self.store.borrow_mut().set(BEST_SCORE_KEY, &self.best_score) {
            log::error!("Could not save best score: {err}");
        }
    }

    pub fn data(&self) -> MergeData {
        MergeData {
            board: self.board.rows(),
            score: self.score,
            best_score: self.best_score,
            has_won: self.has_won,
        }
    }
}

impl Game for MergeGame {
    fn game_type(&self) -> &'static str {
        Self::GAME_TYPE
    }

    fn name(&self) -> &'static str {
        "2048"
    }

    fn reset(&mut self) {
        self.start();
    }

    fn handle_action(&mut self, action: &str, payload: &Value) -> GameState {
        match MergeAction::decode(action, payload) {
            Ok(decoded) => {
                if !self.apply(decoded).has_update() {
                    log::trace!("{action} changed nothing");
                }
            }
            Err(err) => log::debug!("Ignoring {action}: {err}"),
        }
        self.state()
    }

    fn state(&self) -> GameState {
        GameState {
            game_type: Self::GAME_TYPE.to_owned(),
            game_data: GameData::Merge(self.data()),
            is_game_over: self.is_game_over,
            score: self.score,
            message: self.message.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::rc::Rc;

    fn store() -> SharedStore {
        shared_store(MemoryStore::new())
    }

    fn game(rows: [[Tile; 4]; 4]) -> MergeGame {
        MergeGame::from_board(store(), MergeBoard::from_rows(rows).unwrap(), 3)
    }

    #[test]
    fn new_game_has_two_tiles() {
        let game = MergeGame::with_seed(store(), 1);
        assert_eq!(game.board().count_tiles(), 2);
        assert_eq!(game.score(), 0);
        assert!(!game.is_game_over());
    }

    #[test]
    fn move_left_merges_and_spawns() {
        let mut game = game([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]);

        let state = game.handle_action("move", &json!({ "direction": "left" }));

        assert_eq!(state.score, 4);
        assert_eq!(game.board().tile_at((0, 0)), 4);
        assert_eq!(game.board().count_tiles(), 2);
        assert_eq!(game.best_score(), 4);
    }

    #[test]
    fn blocked_move_is_a_no_op() {
        let mut game = game([[2, 4, 0, 0], [0; 4], [0; 4], [0; 4]]);
        let before = game.data();

        assert_eq!(game.shift(Direction::Left), MoveOutcome::NoChange);
        assert_eq!(game.shift(Direction::Up), MoveOutcome::NoChange);
        assert_eq!(game.data(), before);
    }

    #[test]
    fn winning_merge_keeps_the_game_going() {
        let mut game = game([[1024, 1024, 0, 0], [0; 4], [0; 4], [0; 4]]);

        assert_eq!(game.shift(Direction::Left), MoveOutcome::Won);
        assert!(game.has_won());
        assert!(!game.is_game_over());
        assert_eq!(game.message(), Some(WIN_MESSAGE));

        assert!(game.shift(Direction::Right).has_update());
        assert!(game.has_won());
        assert_eq!(game.message(), None);
    }

    #[test]
    fn filling_the_last_gap_without_pairs_loses() {
        // The only gap opens at (0, 3), between a 32 and a 128.
        let mut game = game([
            [0, 8, 16, 32],
            [16, 32, 64, 128],
            [32, 64, 128, 256],
            [64, 128, 256, 512],
        ]);

        assert_eq!(game.shift(Direction::Left), MoveOutcome::Lost);
        assert!(game.is_game_over());
        assert_eq!(game.message(), Some(LOSS_MESSAGE));

        let frozen = game.data();
        assert_eq!(game.shift(Direction::Right), MoveOutcome::NoChange);
        assert_eq!(game.data(), frozen);
    }

    #[test]
    fn reset_preserves_best_score() {
        let mut game = game([[8, 8, 0, 0], [0; 4], [0; 4], [0; 4]]);
        game.shift(Direction::Left);
        game.handle_action("reset", &Value::Null);

        assert_eq!(game.score(), 0);
        assert_eq!(game.best_score(), 16);
        assert_eq!(game.board().count_tiles(), 2);
    }

    #[test]
    fn best_score_is_loaded_and_persisted() {
        let store = store();
        store.borrow_mut().set(BEST_SCORE_KEY, &100_u64).unwrap();

        let mut game = MergeGame::from_board(
            Rc::clone(&store),
            MergeBoard::from_rows([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]).unwrap(),
            5,
        );
        assert_eq!(game.best_score(), 100);
        game.shift(Direction::Left);
        assert_eq!(game.best_score(), 100);
        assert_eq!(store.borrow().get::<u64>(BEST_SCORE_KEY), Some(100));
    }

    #[test]
    fn unknown_actions_and_bad_payloads_are_ignored() {
        let mut game = game([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]);
        let before = game.state();

        assert_eq!(game.handle_action("jump", &Value::Null), before);
        assert_eq!(
            game.handle_action("move", &json!({ "direction": "diagonal" })),
            before
        );
        assert_eq!(game.handle_action("move", &Value::Null), before);
    }

    #[test]
    fn snapshot_uses_protocol_field_names() {
        let game = game([[2, 0, 0, 0], [0; 4], [0; 4], [0; 4]]);
        let json = serde_json::to_value(game.state()).unwrap();

        assert_eq!(json["gameType"], "2048");
        assert_eq!(json["gameData"]["bestScore"], 0);
        assert_eq!(json["gameData"]["board"][0][0], 2);
        assert_eq!(json["isGameOver"], false);
        assert!(json.get("message").is_none());
    }
}
