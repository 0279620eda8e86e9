use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{MergeData, MineData};

/// Capability set shared by every engine the manager can host.
pub trait Game {
    /// Stable key used by the protocol and the settings store.
    fn game_type(&self) -> &'static str;

    /// Human readable name.
    fn name(&self) -> &'static str;

    fn reset(&mut self);

    /// Applies a protocol action. Unknown actions and malformed payloads leave
    /// the game untouched; the current snapshot is returned either way.
    fn handle_action(&mut self, action: &str, payload: &Value) -> GameState;

    fn state(&self) -> GameState;
}

/// Engine specific part of a snapshot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GameData {
    Merge(MergeData),
    Mines(MineData),
}

/// Uniform snapshot every engine reports.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub game_type: String,
    pub game_data: GameData,
    pub is_game_over: bool,
    pub score: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Snapshot of the active engine plus what the manager knows about the others.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagerState {
    #[serde(flatten)]
    pub state: GameState,
    pub available_games: Vec<String>,
    pub current_game_type: String,
}

/// Decodes an action payload, mapping failures to [`crate::GameError::InvalidPayload`].
pub(crate) fn decode_payload<T: serde::de::DeserializeOwned>(
    action: &str,
    payload: &Value,
) -> crate::Result<T> {
    T::deserialize(payload).map_err(|err| crate::GameError::InvalidPayload {
        action: action.to_owned(),
        reason: err.to_string(),
    })
}
