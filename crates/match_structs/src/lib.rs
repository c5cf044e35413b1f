//! Common structs for ranked-ladder sampling shared across crates.

mod match_info;
mod patch;
mod rank;
mod summoner;

pub use match_info::*;
pub use patch::*;
pub use rank::*;
pub use summoner::*;
