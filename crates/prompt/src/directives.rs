//! Text fragments shared by several prompts.

use quizrag_core::{Difficulty, Language, OPTION_COUNT};

/// Language of the simulated retrieved passage.
pub fn context_language(language: Language) -> &'static str {
    match language {
        Language::Es => "Spanish",
        Language::Eu => "Basque (Euskara)",
        Language::En => "English",
    }
}

/// Instruction pinning the language of the answer's reasoning.
pub fn reasoning_language_directive(language: Language) -> String {
    format!(
        "THE REASONING MUST BE WRITTEN IN {}.",
        language.prompt_label()
    )
}

/// Difficulty framing for question generation.
pub fn difficulty_framing(difficulty: Difficulty) -> &'static str {
    match difficulty {
        Difficulty::Basic => {
            "Basic level (memorisation and concepts). Direct questions about definitions and simple commands."
        }
        Difficulty::Intermediate => {
            "Intermediate level (comprehension). Questions about command flags and basic administration."
        }
        Difficulty::Advanced => {
            "Advanced level (application and analysis). Troubleshooting scenarios, complex scripts and advanced permission management."
        }
    }
}

/// Instruction to adapt source material into the output language.
pub fn cross_language_instruction(language: Language) -> String {
    format!(
        "The source content (simulated context) may be in Spanish or English.\n\
         YOU MUST TRANSLATE AND ADAPT the questions and answers to the requested OUTPUT LANGUAGE ({}).",
        language.prompt_label()
    )
}

/// Numbered option list, one per line.
pub fn options_block(options: &[String; OPTION_COUNT]) -> String {
    options
        .iter()
        .enumerate()
        .map(|(i, option)| format!("{}. {}", i + 1, option))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Options as a JSON array literal.
pub fn options_json(options: &[String]) -> String {
    serde_json::to_string(options).unwrap_or_else(|_| format!("{:?}", options))
}
