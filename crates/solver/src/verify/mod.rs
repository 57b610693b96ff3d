//! Multi-persona verification and consensus.

pub mod consensus;
pub mod jury;

pub use consensus::{aggregate, tally};
pub use jury::verify;
