//! Auto-batch generation of new exam questions.

use chrono::{DateTime, Utc};
use quizrag_core::catalog::STUDY_NOTES;
use quizrag_core::{AppError, AppResult, AutoTestConfig, Question, TopicSelector};
use quizrag_llm::{ModelGateway, SchemaId};
use quizrag_prompt::PromptBuilder;

use super::ids::auto_question_id;
use super::rotation::rotation_topic;
use super::RawQuestion;

/// Generate `config.count` questions on the configured topic.
///
/// Surplus items are dropped; a short batch is returned as-is.
pub async fn generate_batch(
    gateway: &ModelGateway,
    prompts: &PromptBuilder,
    config: &AutoTestConfig,
) -> AppResult<Vec<Question>> {
    if config.count == 0 {
        return Err(AppError::InvalidInput(
            "Batch size must be at least 1".to_string(),
        ));
    }

    tracing::info!(
        topic = %config.topic,
        count = config.count,
        language = %config.language,
        difficulty = %config.difficulty,
        "Generating question batch"
    );

    let prompt = prompts.auto_batch(config, STUDY_NOTES)?;
    let raw: Vec<RawQuestion> = gateway
        .generate_structured(prompt.as_str(), SchemaId::QuestionBatch)
        .await?;

    if raw.len() < config.count {
        tracing::warn!(
            requested = config.count,
            received = raw.len(),
            "Model returned fewer questions than requested"
        );
    }

    Ok(enrich_batch(raw, config, Utc::now()))
}

/// Stamp raw questions with ids, difficulty and topic.
///
/// For a global batch each question gets the rotation topic of its position.
pub fn enrich_batch(
    raw: Vec<RawQuestion>,
    config: &AutoTestConfig,
    now: DateTime<Utc>,
) -> Vec<Question> {
    raw.into_iter()
        .take(config.count)
        .enumerate()
        .map(|(index, item)| {
            let topic = match &config.topic {
                TopicSelector::Global => rotation_topic(index).to_string(),
                TopicSelector::Specific(topic) => topic.clone(),
            };
            Question::new(
                auto_question_id(config.language, now, index),
                topic,
                item.statement,
                item.options,
            )
            .with_correct_option(item.correct_index)
            .with_difficulty(config.difficulty)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use quizrag_core::catalog::COURSE_TOPICS;
    use quizrag_core::{Difficulty, Language};

    fn raw(n: usize) -> Vec<RawQuestion> {
        (0..n)
            .map(|i| RawQuestion {
                statement: format!("Question {}", i),
                options: ["a".into(), "b".into(), "c".into(), "d".into()],
                correct_index: 2,
            })
            .collect()
    }

    fn config(topic: TopicSelector, count: usize) -> AutoTestConfig {
        AutoTestConfig {
            topic,
            count,
            language: Language::En,
            difficulty: Difficulty::Advanced,
        }
    }

    #[test]
    fn test_specific_topic_is_kept() {
        let now = Utc.timestamp_millis_opt(42).unwrap();
        let topic = TopicSelector::Specific("Topic 2: File System".to_string());
        let questions = enrich_batch(raw(2), &config(topic, 2), now);

        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].id, "auto_en_42_0");
        assert_eq!(questions[1].id, "auto_en_42_1");
        for q in &questions {
            assert_eq!(q.topic, "Topic 2: File System");
            assert_eq!(q.difficulty, Some(Difficulty::Advanced));
            assert_eq!(q.correct_option, Some(2));
        }
    }

    #[test]
    fn test_global_topic_rotates() {
        let now = Utc.timestamp_millis_opt(1).unwrap();
        let questions = enrich_batch(raw(8), &config(TopicSelector::Global, 8), now);

        assert_eq!(questions[0].topic, COURSE_TOPICS[0]);
        assert_eq!(questions[5].topic, COURSE_TOPICS[5]);
        assert_eq!(questions[6].topic, COURSE_TOPICS[0]);
        assert_eq!(questions[7].topic, COURSE_TOPICS[1]);
    }

    #[test]
    fn test_surplus_is_dropped_and_shortfall_kept() {
        let now = Utc.timestamp_millis_opt(1).unwrap();
        assert_eq!(enrich_batch(raw(5), &config(TopicSelector::Global, 3), now).len(), 3);
        assert_eq!(enrich_batch(raw(2), &config(TopicSelector::Global, 3), now).len(), 2);
    }
}
