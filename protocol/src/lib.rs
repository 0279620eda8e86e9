//! Messages exchanged between a games panel and its host, plus the
//! [`GamesPanel`] dispatcher that sits one layer above the manager.

use arcade_core::{GameState, ManagerState};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use panel::*;

mod panel;

/// Action handled by the panel itself instead of the active engine.
pub const SWITCH_GAME_ACTION: &str = "switchGame";

/// Sent by the panel's view.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientMessage {
    GameAction {
        action: String,
        #[serde(default)]
        payload: Value,
    },
    RequestGameState,
}

/// Sent back to the panel's view.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum ServerMessage {
    /// Full state, including which games exist and which one is active.
    GameState(ManagerState),
    /// Snapshot of the active engine after an action.
    GameUpdate(GameState),
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SwitchGamePayload {
    pub game_type: String,
}
