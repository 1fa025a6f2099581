mod game;
mod persistence;
mod state;

pub use game::{parse_command, Command, HideAndSeekGame};
pub use persistence::{parse_saved_game_json, restore_game_state, serialize_saved_game, SavedGame};
pub use state::{CheckOutcome, GameState};
