use serde_json::Value;

use crate::*;

/// Settings key remembering which game was active last.
pub const LAST_GAME_KEY: &str = "games.lastSelected";

/// Owns every registered engine and routes actions to the active one.
pub struct GameManager {
    games: Vec<Box<dyn Game>>,
    current: usize,
    store: SharedStore,
}

impl GameManager {
    /// Registers the merge game and the mine game, restoring the last
    /// selection from `store`.
    pub fn new(store: SharedStore) -> Self {
        let games: Vec<Box<dyn Game>> = vec![
            Box::new(MergeGame::new(SharedStore::clone(&store))),
            Box::new(MineGame::new()),
        ];
        Self::restore(games, store)
    }

    /// Like [`GameManager::new`] with deterministic engines.
    pub fn with_seed(store: SharedStore, seed: u64) -> Self {
        let games: Vec<Box<dyn Game>> = vec![
            Box::new(MergeGame::with_seed(SharedStore::clone(&store), seed)),
            Box::new(MineGame::with_seed(Difficulty::default(), seed.wrapping_add(1))),
        ];
        Self::restore(games, store)
    }

    pub fn with_games(games: Vec<Box<dyn Game>>, store: SharedStore) -> Result<Self> {
        if games.is_empty() {
            return Err(GameError::NoGames);
        }
        Ok(Self::restore(games, store))
    }

    fn restore(games: Vec<Box<dyn Game>>, store: SharedStore) -> Self {
        let last = store.borrow().get::<String>(LAST_GAME_KEY);
        let current = last
            .as_deref()
            .and_then(|game_type| games.iter().position(|game| game.game_type() == game_type))
            .unwrap_or(0);
        log::debug!("Active game: {}", games[current].game_type());
        Self {
            games,
            current,
            store,
        }
    }

    fn current_game(&self) -> &dyn Game {
        self.games[self.current].as_ref()
    }

    fn current_game_mut(&mut self) -> &mut dyn Game {
        self.games[self.current].as_mut()
    }

    pub fn available_games(&self) -> Vec<String> {
        self.games
            .iter()
            .map(|game| game.game_type().to_owned())
            .collect()
    }

    pub fn current_game_type(&self) -> &'static str {
        self.current_game().game_type()
    }

    pub fn current_state(&self) -> ManagerState {
        ManagerState {
            state: self.current_game().state(),
            available_games: self.available_games(),
            current_game_type: self.current_game_type().to_owned(),
        }
    }

    pub fn handle_action(&mut self, action: &str, payload: &Value) -> GameState {
        self.current_game_mut().handle_action(action, payload)
    }

    /// Makes `game_type` active and remembers the choice. Returns `false`
    /// when no such game is registered.
    pub fn switch_game(&mut self, game_type: &str) -> bool {
        let Some(index) = self
            .games
            .iter()
            .position(|game| game.game_type() == game_type)
        else {
            log::debug!("Unknown game type {game_type}");
            return false;
        };

        self.current = index;
        if let Err(err) = self.store.borrow_mut().set(LAST_GAME_KEY, &game_type) {
            log::error!("Could not save last selected game: {err}");
        }
        true
    }

    pub fn reset_current_game(&mut self) {
        self.current_game_mut().reset();
    }
}
