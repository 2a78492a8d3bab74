//! Session subsystem
//!
//! Keeps named copies of operator lists for one user and replays them
//! through that user's query builder.

mod errors;
mod store;

pub use errors::{SessionError, SessionResult};
pub use store::{QuerySession, SavedQuery, SavedQueryInfo};
