use arcade_core::GameManager;
use serde::Deserialize;
use serde_json::Value;

use crate::*;

/// Turns client messages into manager calls and answers each with exactly
/// one server message.
pub struct GamesPanel {
    manager: GameManager,
}

impl GamesPanel {
    pub fn new(manager: GameManager) -> Self {
        Self { manager }
    }

    pub fn manager(&self) -> &GameManager {
        &self.manager
    }

    pub fn handle_message(&mut self, message: ClientMessage) -> ServerMessage {
        match message {
            ClientMessage::GameAction { action, payload } if action == SWITCH_GAME_ACTION => {
                self.switch_game_from_payload(&payload)
            }
            ClientMessage::GameAction { action, payload } => {
                log::trace!("Forwarding {action} to {}", self.manager.current_game_type());
                ServerMessage::GameUpdate(self.manager.handle_action(&action, &payload))
            }
            ClientMessage::RequestGameState => self.game_state(),
        }
    }

    pub fn switch_game(&mut self, game_type: &str) -> ServerMessage {
        if self.manager.switch_game(game_type) {
            log::info!("Switched to {game_type}");
        }
        self.game_state()
    }

    pub fn reset_current_game(&mut self) -> ServerMessage {
        self.manager.reset_current_game();
        self.game_state()
    }

    fn switch_game_from_payload(&mut self, payload: &Value) -> ServerMessage {
        match SwitchGamePayload::deserialize(payload) {
            Ok(SwitchGamePayload { game_type }) => self.switch_game(&game_type),
            Err(err) => {
                log::debug!("Ignoring {SWITCH_GAME_ACTION}: {err}");
                self.game_state()
            }
        }
    }

    fn game_state(&self) -> ServerMessage {
        ServerMessage::GameState(self.manager.current_state())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arcade_core::{GameData, MemoryStore, shared_store};
    use serde_json::json;

    fn panel() -> GamesPanel {
        GamesPanel::new(GameManager::with_seed(shared_store(MemoryStore::new()), 42))
    }

    fn action(action: &str, payload: Value) -> ClientMessage {
        ClientMessage::GameAction {
            action: action.into(),
            payload,
        }
    }

    #[test]
    fn switch_game_answers_with_full_state() {
        let mut panel = panel();

        let reply = panel.handle_message(action(
            SWITCH_GAME_ACTION,
            json!({ "gameType": "minesweeper" }),
        ));

        let ServerMessage::GameState(state) = reply else {
            panic!("expected gameState");
        };
        assert_eq!(state.current_game_type, "minesweeper");
        assert!(matches!(state.state.game_data, GameData::Mines(_)));
    }

    #[test]
    fn malformed_switch_keeps_current_game() {
        let mut panel = panel();
        let reply = panel.handle_message(action(SWITCH_GAME_ACTION, Value::Null));

        assert!(matches!(reply, ServerMessage::GameState(ref s) if s.current_game_type == "2048"));
    }

    #[test]
    fn other_actions_answer_with_engine_update() {
        let mut panel = panel();
        panel.switch_game("minesweeper");

        let reply = panel.handle_message(action("flag", json!({ "row": 0, "col": 0 })));

        let ServerMessage::GameUpdate(state) = reply else {
            panic!("expected gameUpdate");
        };
        let GameData::Mines(data) = state.game_data else {
            panic!("expected mine data");
        };
        assert_eq!(data.flagged_count, 1);
        assert_eq!(data.remaining_mines, 9);
    }

    #[test]
    fn reset_command_targets_active_game() {
        let mut panel = panel();
        panel.switch_game("minesweeper");
        panel.handle_message(action("reveal", json!({ "row": 4, "col": 4 })));

        let ServerMessage::GameState(state) = panel.reset_current_game() else {
            panic!("expected gameState");
        };
        assert_eq!(state.state.score, 0);
        assert_eq!(panel.manager().current_game_type(), "minesweeper");
    }

    #[test]
    fn server_messages_use_type_and_data() {
        let mut panel = panel();
        let reply = panel.handle_message(ClientMessage::RequestGameState);
        let json = serde_json::to_value(&reply).unwrap();

        assert_eq!(json["type"], "gameState");
        assert_eq!(json["data"]["currentGameType"], "2048");
        assert_eq!(json["data"]["availableGames"][0], "2048");

        let update = panel.handle_message(action("reset", Value::Null));
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json["type"], "gameUpdate");
        assert_eq!(json["data"]["gameType"], "2048");
        assert!(json["data"].get("availableGames").is_none());
    }
}
