//! Content generators: batches, distractors, variants and topics.

pub mod batch;
pub mod distractor;
pub mod ids;
pub mod rotation;
pub mod topics;
pub mod variants;

use quizrag_core::OPTION_COUNT;
use serde::Deserialize;

pub use batch::{enrich_batch, generate_batch};
pub use distractor::regenerate_option;
pub use rotation::rotation_topic;
pub use topics::extract_topics;
pub use variants::{enrich_variants, generate_variants};

/// A generated question as returned by the model, before enrichment.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawQuestion {
    pub statement: String,
    pub options: [String; OPTION_COUNT],
    pub correct_index: u8,
}
