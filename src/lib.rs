//! Goose University: the idle-clicker engine behind the browser game.
//!
//! Every game rule is a pure function from one `GameState` snapshot to the
//! next. `Session` wraps them into a driver with a fixed tick cadence,
//! autosave and offline catch-up.

pub mod battle;
pub mod catalog;
pub mod format;
pub mod logic;
pub mod outcome;
pub mod prestige;
pub mod rate;
pub mod save;
pub mod session;
pub mod shop;
mod simulator;
pub mod state;
pub mod time;

pub use battle::{FixedRoll, RandomSource, SeededRng};
pub use catalog::{Catalog, CatalogError};
pub use outcome::Outcome;
pub use save::{BlobStore, MemoryStore, SaveSlot, StoreError};
#[cfg(target_arch = "wasm32")]
pub use save::LocalStorageStore;
pub use session::{Action, Session};
pub use state::GameState;
