//! Puzzle game engines behind a narrow action/snapshot interface.
//!
//! [`MergeGame`] is the 4×4 sliding merge puzzle, [`MineGame`] the mine-field
//! reveal puzzle, and [`GameManager`] routes `(action, payload)` pairs to
//! whichever of them is active. Nothing here renders or blocks; the only
//! side effects go through an injected [`SettingsStore`].

pub use error::*;
pub use game::*;
pub use manager::*;
pub use merge::*;
pub use mines::*;
pub use store::*;
pub use types::*;

mod error;
mod game;
mod manager;
mod merge;
mod mines;
mod store;
mod types;
