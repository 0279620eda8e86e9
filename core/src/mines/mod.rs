use rand::prelude::*;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::game::decode_payload;
use crate::*;
pub use board::*;
pub use cell::*;
pub use config::*;
pub use generator::*;

mod board;
mod cell;
mod config;
mod generator;

const WIN_MESSAGE: &str = "Congratulations! You won!";
const LOSS_MESSAGE: &str = "Game Over! You hit a mine!";

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum MarkOutcome {
    NoChange,
    Changed,
}

impl MarkOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Changed => true,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    HitMine,
    Won,
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        use RevealOutcome::*;
        match self {
            NoChange => false,
            Revealed => true,
            HitMine => true,
            Won => true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MineAction {
    Reveal(Coord2),
    Flag(Coord2),
    Reset,
    ChangeDifficulty(Difficulty),
}

#[derive(Deserialize)]
struct CellPayload {
    row: i64,
    col: i64,
}

impl CellPayload {
    fn coords(self) -> Result<Coord2> {
        let row = usize::try_from(self.row).map_err(|_| GameError::InvalidCoords)?;
        let col = usize::try_from(self.col).map_err(|_| GameError::InvalidCoords)?;
        Ok((row, col))
    }
}

#[derive(Deserialize)]
struct DifficultyPayload {
    difficulty: String,
}

impl MineAction {
    pub fn decode(action: &str, payload: &Value) -> Result<Self> {
        match action {
            "reveal" => {
                let cell: CellPayload = decode_payload(action, payload)?;
                Ok(Self::Reveal(cell.coords()?))
            }
            "flag" => {
                let cell: CellPayload = decode_payload(action, payload)?;
                Ok(Self::Flag(cell.coords()?))
            }
            "reset" => Ok(Self::Reset),
            "changeDifficulty" => {
                let DifficultyPayload { difficulty } = decode_payload(action, payload)?;
                Ok(Self::ChangeDifficulty(difficulty.parse()?))
            }
            other => Err(GameError::UnknownAction(other.to_owned())),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MineData {
    pub board: Vec<Vec<Cell>>,
    pub width: Coord,
    pub height: Coord,
    pub mine_count: usize,
    pub flagged_count: usize,
    pub revealed_count: usize,
    /// Signed, flagging more cells than there are mines drives it negative.
    pub remaining_mines: i64,
    pub has_won: bool,
    pub game_started: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_difficulty: Option<Difficulty>,
}

/// The mine-field reveal and flag game.
///
/// Mines are laid on the first reveal, never on the revealed cell or next to
/// it.
#[derive(Clone, Debug)]
pub struct MineGame {
    board: MineBoard,
    config: GameConfig,
    difficulty: Option<Difficulty>,
    game_started: bool,
    is_game_over: bool,
    has_won: bool,
    message: Option<String>,
    rng: SmallRng,
}

impl MineGame {
    pub const GAME_TYPE: &'static str = "minesweeper";

    pub fn new() -> Self {
        Self::with_rng(Difficulty::default(), SmallRng::from_os_rng())
    }

    pub fn with_seed(difficulty: Difficulty, seed: u64) -> Self {
        Self::with_rng(difficulty, SmallRng::seed_from_u64(seed))
    }

    /// Plays on a prepared board whose mines are already laid. Resetting
    /// keeps its size and mine count.
    pub fn from_board(board: MineBoard, seed: u64) -> Self {
        let config = GameConfig::new(board.width(), board.height(), board.mine_count());
        Self {
            board,
            config,
            difficulty: None,
            game_started: true,
            is_game_over: false,
            has_won: false,
            message: None,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    fn with_rng(difficulty: Difficulty, rng: SmallRng) -> Self {
        let config = difficulty.config();
        Self {
            board: MineBoard::empty(config),
            config,
            difficulty: Some(difficulty),
            game_started: false,
            is_game_over: false,
            has_won: false,
            message: None,
            rng,
        }
    }

    fn start(&mut self) {
        self.board = MineBoard::empty(self.config);
        self.game_started = false;
        self.is_game_over = false;
        self.has_won = false;
        self.message = None;
    }

    pub fn board(&self) -> &MineBoard {
        &self.board
    }

    pub fn difficulty(&self) -> Option<Difficulty> {
        self.difficulty
    }

    pub fn is_started(&self) -> bool {
        self.game_started
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

    pub fn remaining_mines(&self) -> i64 {
        self.board.mine_count() as i64 - self.board.flagged_count() as i64
    }

    /// Applies a decoded action, returning whether anything changed.
    pub fn apply(&mut self, action: MineAction) -> Result<bool> {
        Ok(match action {
            MineAction::Reveal(coords) => self.reveal(coords)?.has_update(),
            MineAction::Flag(coords) => self.toggle_flag(coords)?.has_update(),
            MineAction::Reset => {
                self.start();
                true
            }
            MineAction::ChangeDifficulty(difficulty) => {
                self.change_difficulty(difficulty);
                true
            }
        })
    }

    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        self.check_not_finished()?;
        let coords = self.board.validate_coords(coords)?;

        if !self.board[coords].is_hidden() {
            return Ok(RevealOutcome::NoChange);
        }

        if !self.game_started {
            let mines = SafeZoneGenerator::new(coords).generate(self.config, &mut self.rng);
            self.board.lay_mines(&mines);
            self.game_started = true;
        }

        Ok(match self.board.reveal_from(coords) {
            RevealOutcome::HitMine => {
                log::debug!("Mine hit at {coords:?}");
                self.is_game_over = true;
                self.message = Some(LOSS_MESSAGE.to_owned());
                self.board.reveal_all_mines();
                RevealOutcome::HitMine
            }
            RevealOutcome::Revealed if self.board.all_safe_revealed() => {
                log::debug!("All {} safe cells revealed", self.board.safe_cell_count());
                self.is_game_over = true;
                self.has_won = true;
                self.message = Some(WIN_MESSAGE.to_owned());
                self.board.flag_all_mines();
                RevealOutcome::Won
            }
            outcome => outcome,
        })
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        self.check_not_finished()?;
        let coords = self.board.validate_coords(coords)?;
        Ok(self.board.toggle_flag(coords))
    }

    /// Switches to the preset's size and starts over, discarding progress.
    pub fn change_difficulty(&mut self, difficulty: Difficulty) {
        log::debug!("Difficulty changed to {difficulty}");
        self.difficulty = Some(difficulty);
        self.config = difficulty.config();
        self.start();
    }

    fn check_not_finished(&self) -> Result<()> {
        if self.is_game_over {
            Err(GameError::AlreadyEnded)
        } else {
            Ok(())
        }
    }

    pub fn data(&self) -> MineData {
        MineData {
            board: self.board.rows(),
            width: self.board.width(),
            height: self.board.height(),
            mine_count: self.board.mine_count(),
            flagged_count: self.board.flagged_count(),
            revealed_count: self.board.revealed_count(),
            remaining_mines: self.remaining_mines(),
            has_won: self.has_won,
            game_started: self.game_started,
            current_difficulty: self.difficulty,
        }
    }
}

impl Default for MineGame {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for MineGame {
    fn game_type(&self) -> &'static str {
        Self::GAME_TYPE
    }

    fn name(&self) -> &'static str {
        "Minesweeper"
    }

    fn reset(&mut self) {
        self.start();
    }

    fn handle_action(&mut self, action: &str, payload: &Value) -> GameState {
        match MineAction::decode(action, payload).and_then(|decoded| self.apply(decoded)) {
            Ok(true) => {}
            Ok(false) => log::trace!("{action} changed nothing"),
            Err(err) => log::debug!("Ignoring {action}: {err}"),
        }
        self.state()
    }

    fn state(&self) -> GameState {
        GameState {
            game_type: Self::GAME_TYPE.to_owned(),
            game_data: GameData::Mines(self.data()),
            is_game_over: self.is_game_over,
            score: self.board.revealed_count() as u64,
            message: self.message.clone(),
        }
    }
}
