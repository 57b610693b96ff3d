//! Prompt builder for rendering templates.
//!
//! All templates are registered once, when the builder is constructed, so a
//! broken template is reported there. Rendering itself does no I/O; odd input
//! such as an empty option text is interpolated as-is.

use crate::directives;
use crate::loader::{
    builtin_ids, builtin_prompt, resolve_prompt, GENERATE_BATCH, GENERATE_DISTRACTOR,
    GENERATE_VARIANTS, RAG_ANSWER, RAG_RETRIEVE, TOPICS_EXTRACT, VERIFY_JURY,
};
use crate::types::{BuiltPrompt, PromptDefinition};
use handlebars::Handlebars;
use quizrag_core::{AppError, AppResult, AutoTestConfig, Language, Question};
use std::collections::BTreeMap;
use std::path::Path;

/// Placeholder used when a question has no known correct answer.
pub const UNKNOWN_ANSWER: &str = "Unknown";

/// Inputs of the answer-phase prompt.
#[derive(Debug, Clone)]
pub struct AnswerPromptInput<'a> {
    pub question: &'a Question,
    /// Retrieved (or fallback) context
    pub context: &'a str,
    /// Simulated model label
    pub model_name: &'a str,
    /// Simulated provider line, e.g. "(Local Ollama simulation)"
    pub provider_info: &'a str,
    pub temperature: f32,
    pub language: Language,
}

/// Renders the prompts of every study operation.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    registry: Handlebars<'static>,
    definitions: BTreeMap<String, PromptDefinition>,
}

impl PromptBuilder {
    /// Builder over the built-in definitions.
    pub fn new() -> AppResult<Self> {
        let definitions = builtin_ids()
            .map(builtin_prompt)
            .collect::<AppResult<Vec<_>>>()?;
        Self::from_definitions(definitions)
    }

    /// Builder where `.quizrag/prompts/<id>.yml` replaces the built-in `<id>`.
    pub fn with_workspace(workspace_path: &Path) -> AppResult<Self> {
        let definitions = builtin_ids()
            .map(|id| resolve_prompt(Some(workspace_path), id))
            .collect::<AppResult<Vec<_>>>()?;
        Self::from_definitions(definitions)
    }

    /// Builder over explicit definitions.
    pub fn from_definitions(
        definitions: impl IntoIterator<Item = PromptDefinition>,
    ) -> AppResult<Self> {
        let mut registry = Handlebars::new();

        // Disable HTML escaping for plain text
        registry.register_escape_fn(handlebars::no_escape);
        // Unknown variables are render errors, not empty strings
        registry.set_strict_mode(true);

        let mut by_id = BTreeMap::new();
        for definition in definitions {
            registry
                .register_template_string(&definition.id, &definition.template)
                .map_err(|e| {
                    AppError::Prompt(format!(
                        "Failed to register template {}: {}",
                        definition.id, e
                    ))
                })?;
            by_id.insert(definition.id.clone(), definition);
        }

        Ok(Self {
            registry,
            definitions: by_id,
        })
    }

    pub fn definition(&self, prompt_id: &str) -> Option<&PromptDefinition> {
        self.definitions.get(prompt_id)
    }

    /// Render a registered prompt with raw variables.
    pub fn render(
        &self,
        prompt_id: &str,
        variables: BTreeMap<String, String>,
    ) -> AppResult<BuiltPrompt> {
        let definition = self
            .definitions
            .get(prompt_id)
            .ok_or_else(|| AppError::Prompt(format!("Prompt not registered: {}", prompt_id)))?;

        let text = self
            .registry
            .render(prompt_id, &variables)
            .map_err(|e| AppError::Prompt(format!("Failed to render template {}: {}", prompt_id, e)))?;

        tracing::debug!(prompt = prompt_id, chars = text.len(), "Rendered prompt");

        Ok(BuiltPrompt::new(
            text,
            definition.id.clone(),
            definition.output.format,
            variables,
        ))
    }

    /// Retrieve phase: ask for a passage that would contain the answer.
    pub fn retrieval(&self, question: &Question, language: Language) -> AppResult<BuiltPrompt> {
        self.render(
            RAG_RETRIEVE,
            vars([
                ("statement", question.statement.clone()),
                ("options_json", directives::options_json(&question.options)),
                ("context_language", directives::context_language(language).to_string()),
            ]),
        )
    }

    /// Answer phase: pick an option from the context.
    pub fn answer(&self, input: &AnswerPromptInput<'_>) -> AppResult<BuiltPrompt> {
        self.render(
            RAG_ANSWER,
            vars([
                ("model_name", input.model_name.to_string()),
                ("provider_info", input.provider_info.to_string()),
                (
                    "language_directive",
                    directives::reasoning_language_directive(input.language),
                ),
                ("temperature", input.temperature.to_string()),
                ("context", input.context.to_string()),
                ("question_id", input.question.id.clone()),
                ("statement", input.question.statement.clone()),
                ("options_block", directives::options_block(&input.question.options)),
            ]),
        )
    }

    /// Batch generation of new questions.
    pub fn auto_batch(&self, config: &AutoTestConfig, knowledge: &str) -> AppResult<BuiltPrompt> {
        self.render(
            GENERATE_BATCH,
            vars([
                ("topic", config.topic.label().to_string()),
                ("count", config.count.to_string()),
                (
                    "difficulty_framing",
                    directives::difficulty_framing(config.difficulty).to_string(),
                ),
                ("language_label", config.language.prompt_label().to_string()),
                (
                    "cross_language",
                    directives::cross_language_instruction(config.language),
                ),
                ("knowledge", knowledge.to_string()),
            ]),
        )
    }

    /// Replacement of the wrong option at 1-based `option_index`.
    ///
    /// The caller checks that the index is a valid wrong option.
    pub fn distractor(
        &self,
        question: &Question,
        option_index: u8,
        language: Language,
    ) -> AppResult<BuiltPrompt> {
        let siblings: Vec<String> = question
            .options
            .iter()
            .enumerate()
            .filter(|(i, _)| *i + 1 != option_index as usize)
            .map(|(_, option)| option.clone())
            .collect();

        self.render(
            GENERATE_DISTRACTOR,
            vars([
                ("statement", question.statement.clone()),
                (
                    "correct_text",
                    question.correct_text().unwrap_or(UNKNOWN_ANSWER).to_string(),
                ),
                (
                    "current_option",
                    question.option(option_index).unwrap_or_default().to_string(),
                ),
                ("sibling_options", directives::options_json(&siblings)),
                ("language_label", language.prompt_label().to_string()),
            ]),
        )
    }

    /// Rephrased variants of one question.
    pub fn variants(
        &self,
        question: &Question,
        count: usize,
        language: Language,
    ) -> AppResult<BuiltPrompt> {
        // Without a known answer the first option stands in
        let correct = question
            .correct_text()
            .unwrap_or(question.options[0].as_str());

        self.render(
            GENERATE_VARIANTS,
            vars([
                ("topic", question.topic.clone()),
                ("statement", question.statement.clone()),
                ("correct_text", correct.to_string()),
                ("count", count.to_string()),
                ("language_label", language.prompt_label().to_string()),
            ]),
        )
    }

    /// Three-persona jury vote.
    pub fn jury(&self, question: &Question, language: Language) -> AppResult<BuiltPrompt> {
        self.render(
            VERIFY_JURY,
            vars([
                ("statement", question.statement.clone()),
                ("options_block", directives::options_block(&question.options)),
                ("language_label", language.prompt_label().to_string()),
            ]),
        )
    }

    /// Topic extraction over study notes.
    pub fn topics(&self, notes: &str) -> AppResult<BuiltPrompt> {
        self.render(TOPICS_EXTRACT, vars([("notes", notes.to_string())]))
    }
}

fn vars<const N: usize>(pairs: [(&str, String); N]) -> BTreeMap<String, String> {
    pairs
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{OutputFormat, PromptOutputSpec};
    use quizrag_core::{Difficulty, TopicSelector};

    fn question() -> Question {
        Question::new(
            "topic3_permissions.05",
            "Topic 3: Permissions and User Management",
            "Which command adds execute permission for the owner only?",
            [
                "chmod u+x script.sh".to_string(),
                "chmod 777 script.sh".to_string(),
                "chown +x script.sh".to_string(),
                "chmod a+x script.sh".to_string(),
            ],
        )
        .with_correct_option(1)
    }

    fn builder() -> PromptBuilder {
        PromptBuilder::new().unwrap()
    }

    #[test]
    fn test_retrieval_prompt() {
        let built = builder().retrieval(&question(), Language::Eu).unwrap();
        assert!(built.text.contains("Which command adds execute permission"));
        assert!(built.text.contains(r#"["chmod u+x script.sh","chmod 777 script.sh""#));
        assert!(built.text.contains("Basque (Euskara)"));
        assert_eq!(built.metadata.source_prompt_id, RAG_RETRIEVE);
        assert_eq!(built.metadata.output_format, OutputFormat::Text);
    }

    #[test]
    fn test_answer_prompt() {
        let q = question();
        let built = builder()
            .answer(&AnswerPromptInput {
                question: &q,
                context: "chmod changes <modes> & bits",
                model_name: "llama3",
                provider_info: "(Local Ollama simulation)",
                temperature: 0.7,
                language: Language::En,
            })
            .unwrap();

        assert!(built.text.contains("Simulate that you are the LLM \"llama3\""));
        assert!(built.text.contains("Temperature: 0.7"));
        assert!(built.text.contains("WRITTEN IN ENGLISH"));
        // No HTML escaping
        assert!(built.text.contains("chmod changes <modes> & bits"));
        assert!(built.text.contains("1. chmod u+x script.sh\n"));
        assert!(built.text.contains("4. chmod a+x script.sh"));
        assert!(built.text.contains("Question ID: topic3_permissions.05"));
    }

    #[test]
    fn test_batch_prompt() {
        let config = AutoTestConfig {
            topic: TopicSelector::Global,
            count: 6,
            language: Language::En,
            difficulty: Difficulty::Basic,
        };
        let built = builder().auto_batch(&config, "NOTES").unwrap();
        assert!(built.text.contains("Count: 6 questions."));
        assert!(built.text.contains(TopicSelector::GLOBAL_LABEL));
        assert!(built.text.contains("Basic level"));
        assert!(built.text.contains("OUTPUT LANGUAGE (MANDATORY): ENGLISH."));
        assert!(built.text.contains("NOTES"));
    }

    #[test]
    fn test_distractor_prompt_excludes_correct_answer() {
        let built = builder().distractor(&question(), 3, Language::Es).unwrap();
        assert!(built.text.contains("Correct answer: \"chmod u+x script.sh\""));
        assert!(built.text.contains("Current wrong option (to replace): \"chown +x script.sh\""));
        assert!(built.text.contains(
            r#"Other existing options: ["chmod u+x script.sh","chmod 777 script.sh","chmod a+x script.sh"]"#
        ));
        assert!(built.text.contains("must be different from the correct answer"));
        assert!(built.text.contains("SPANISH (CASTELLANO)"));
    }

    #[test]
    fn test_distractor_prompt_unknown_answer() {
        let mut q = question();
        q.correct_option = None;
        let built = builder().distractor(&q, 2, Language::En).unwrap();
        assert!(built.text.contains("Correct answer: \"Unknown\""));
    }

    #[test]
    fn test_variants_prompt() {
        let built = builder().variants(&question(), 3, Language::En).unwrap();
        assert!(built.text.contains("Generate 3 variants"));
        assert!(built.text.contains("Topic: Topic 3: Permissions and User Management"));
        assert!(built.text.contains("Correct option: chmod u+x script.sh"));
    }

    #[test]
    fn test_jury_prompt() {
        let built = builder().jury(&question(), Language::Eu).unwrap();
        assert!(built.text.contains("Senior SysAdmin"));
        assert!(built.text.contains("Theory Professor"));
        assert!(built.text.contains("Security Auditor"));
        assert!(built.text.contains("in BASQUE (EUSKARA)"));
    }

    #[test]
    fn test_topics_prompt() {
        let built = builder().topics("## The chmod command").unwrap();
        assert!(built.text.contains("## The chmod command"));
        assert_eq!(built.metadata.output_format, OutputFormat::Json);
    }

    #[test]
    fn test_broken_template_fails_at_construction() {
        let definition = PromptDefinition {
            id: "broken".to_string(),
            title: "Broken".to_string(),
            api_version: "1.0".to_string(),
            created_by: "test".to_string(),
            description: None,
            template: "Question: {{statement".to_string(),
            output: PromptOutputSpec {
                format: OutputFormat::Text,
            },
        };
        assert!(matches!(
            PromptBuilder::from_definitions([definition]),
            Err(AppError::Prompt(_))
        ));
    }

    #[test]
    fn test_misspelled_variable_fails_to_render() {
        let definition = PromptDefinition {
            id: TOPICS_EXTRACT.to_string(),
            title: "Topics".to_string(),
            api_version: "1.0".to_string(),
            created_by: "test".to_string(),
            description: None,
            template: "Notes: {{note}}".to_string(),
            output: PromptOutputSpec {
                format: OutputFormat::Json,
            },
        };
        let builder = PromptBuilder::from_definitions([definition]).unwrap();
        assert!(matches!(
            builder.topics("## The chmod command"),
            Err(AppError::Prompt(_))
        ));
    }

    #[test]
    fn test_unregistered_prompt() {
        let empty = PromptBuilder::from_definitions(Vec::new()).unwrap();
        assert!(matches!(
            empty.topics("notes"),
            Err(AppError::Prompt(_))
        ));
    }
}
