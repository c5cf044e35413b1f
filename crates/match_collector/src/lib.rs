//! Sampling & collection engine for ranked-ladder matches.
//!
//! Gathers a statistically balanced per-band sample of competitive
//! matches from the upstream API: samples candidate players per band,
//! admits only clean same-band matches, enforces daily quotas fairly
//! across players, and persists progress so multi-hour crawls resume
//! without re-fetching or double-counting.

mod collector;
mod fanout;
pub mod match_sampler;
pub mod session;
pub mod storage;
pub mod user_sampler;
pub mod validator;

pub use collector::MatchCollector;
pub use session::CollectionSession;
pub use storage::SaveStore;
