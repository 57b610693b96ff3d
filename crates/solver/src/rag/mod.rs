//! Simulated retrieval-augmented answering.

pub mod retrieve;
pub mod solve;

pub use retrieve::{retrieve_context, RetrievalOutcome};
pub use solve::{solve, SimulatedModel};
