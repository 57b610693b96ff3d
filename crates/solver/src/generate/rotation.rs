//! Topic assignment for mixed (global) batches.

use quizrag_core::catalog::COURSE_TOPICS;

/// Topic for the `index`-th question of a global batch.
///
/// Round-robin over the course topics: index 0 gets the first topic and the
/// sequence wraps after the last one.
pub fn rotation_topic(index: usize) -> &'static str {
    COURSE_TOPICS[index % COURSE_TOPICS.len()]
}
