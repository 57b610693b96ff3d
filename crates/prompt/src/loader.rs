//! Prompt loader for built-in and workspace YAML prompt definitions.
//!
//! Seven definitions ship inside the binary. A workspace can replace any of
//! them by dropping `<id>.yml` into `.quizrag/prompts/`.

use crate::types::PromptDefinition;
use quizrag_core::{AppError, AppResult};
use std::path::{Path, PathBuf};

/// Retrieve-phase prompt.
pub const RAG_RETRIEVE: &str = "rag.retrieve";
/// Answer-phase prompt.
pub const RAG_ANSWER: &str = "rag.answer";
pub const GENERATE_BATCH: &str = "generate.batch";
pub const GENERATE_DISTRACTOR: &str = "generate.distractor";
pub const GENERATE_VARIANTS: &str = "generate.variants";
pub const VERIFY_JURY: &str = "verify.jury";
pub const TOPICS_EXTRACT: &str = "topics.extract";

const BUILTIN_PROMPTS: [(&str, &str); 7] = [
    (RAG_RETRIEVE, include_str!("../prompts/rag.retrieve.yml")),
    (RAG_ANSWER, include_str!("../prompts/rag.answer.yml")),
    (GENERATE_BATCH, include_str!("../prompts/generate.batch.yml")),
    (GENERATE_DISTRACTOR, include_str!("../prompts/generate.distractor.yml")),
    (GENERATE_VARIANTS, include_str!("../prompts/generate.variants.yml")),
    (VERIFY_JURY, include_str!("../prompts/verify.jury.yml")),
    (TOPICS_EXTRACT, include_str!("../prompts/topics.extract.yml")),
];

/// Ids of the built-in prompts.
pub fn builtin_ids() -> impl Iterator<Item = &'static str> {
    BUILTIN_PROMPTS.iter().map(|(id, _)| *id)
}

/// Parse a built-in prompt definition.
pub fn builtin_prompt(prompt_id: &str) -> AppResult<PromptDefinition> {
    let (_, contents) = BUILTIN_PROMPTS
        .iter()
        .find(|(id, _)| *id == prompt_id)
        .ok_or_else(|| AppError::Prompt(format!("Unknown built-in prompt: {}", prompt_id)))?;

    parse_prompt(contents, prompt_id)
}

fn prompts_dir(workspace_path: &Path) -> PathBuf {
    workspace_path.join(".quizrag/prompts")
}

/// Load a prompt definition by ID from the workspace.
///
/// This function searches for a prompt file named `<id>.yml` in the
/// `.quizrag/prompts/` directory.
///
/// # Example
/// ```no_run
/// use quizrag_prompt::load_prompt;
/// use std::path::Path;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let prompt = load_prompt(Path::new("."), "verify.jury")?;
/// println!("Loaded prompt: {}", prompt.title);
/// # Ok(())
/// # }
/// ```
pub fn load_prompt(workspace_path: &Path, prompt_id: &str) -> AppResult<PromptDefinition> {
    let prompt_file = prompts_dir(workspace_path).join(format!("{}.yml", prompt_id));

    tracing::debug!("Loading prompt from: {:?}", prompt_file);

    if !prompt_file.exists() {
        return Err(AppError::Prompt(format!(
            "Prompt file not found: {:?}",
            prompt_file
        )));
    }

    let contents = std::fs::read_to_string(&prompt_file).map_err(|e| {
        AppError::Prompt(format!(
            "Failed to read prompt file {:?}: {}",
            prompt_file, e
        ))
    })?;

    let definition = parse_prompt(&contents, &prompt_file.display().to_string())?;

    if definition.id != prompt_id {
        return Err(AppError::Prompt(format!(
            "Prompt file {:?} declares id '{}'",
            prompt_file, definition.id
        )));
    }

    tracing::info!("Loaded prompt override: {} ({})", definition.id, definition.title);

    Ok(definition)
}

/// Resolve a prompt: the workspace override if present, else the built-in.
pub fn resolve_prompt(workspace_path: Option<&Path>, prompt_id: &str) -> AppResult<PromptDefinition> {
    if let Some(workspace) = workspace_path {
        if prompts_dir(workspace)
            .join(format!("{}.yml", prompt_id))
            .exists()
        {
            return load_prompt(workspace, prompt_id);
        }
    }
    builtin_prompt(prompt_id)
}

/// List the prompt overrides present in the workspace, sorted.
pub fn list_prompts(workspace_path: &Path) -> AppResult<Vec<String>> {
    let prompts_dir = prompts_dir(workspace_path);

    if !prompts_dir.exists() {
        return Ok(Vec::new());
    }

    let mut prompt_ids = Vec::new();

    for entry in walkdir::WalkDir::new(&prompts_dir)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("yml") {
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                prompt_ids.push(stem.to_string());
            }
        }
    }

    prompt_ids.sort();
    Ok(prompt_ids)
}

fn parse_prompt(contents: &str, origin: &str) -> AppResult<PromptDefinition> {
    let definition: PromptDefinition = serde_yaml::from_str(contents).map_err(|e| {
        AppError::Prompt(format!("Failed to parse prompt YAML {}: {}", origin, e))
    })?;

    validate_prompt(&definition)?;
    Ok(definition)
}

/// Validate a prompt definition.
fn validate_prompt(def: &PromptDefinition) -> AppResult<()> {
    if def.id.is_empty() {
        return Err(AppError::Prompt("Prompt ID cannot be empty".to_string()));
    }

    if def.title.is_empty() {
        return Err(AppError::Prompt("Prompt title cannot be empty".to_string()));
    }

    if def.template.trim().is_empty() {
        return Err(AppError::Prompt(
            "Prompt template cannot be empty".to_string(),
        ));
    }

    // Validate API version format (simple check)
    if !def.api_version.contains('.') {
        return Err(AppError::Prompt(format!(
            "Invalid apiVersion format: {}. Expected format: 'x.y'",
            def.api_version
        )));
    }

    Ok(())
}
