//! Generation - Text transforms around the metaprompt call
//!
//! Builds the two-turn exchange sent to the model and pulls the generated
//! instructions back out of the reply. Nothing here performs I/O.

use regex::Regex;
use std::sync::OnceLock;

use crate::domain::errors::GenerationError;
use crate::ports::ContentBlock;

/// Token in the metaprompt replaced by the user's task
pub const TASK_PLACEHOLDER: &str = "{{TASK}}";

/// Fixed metaprompt; contains [`TASK_PLACEHOLDER`] exactly once
pub const METAPROMPT_TEMPLATE: &str = include_str!("metaprompt.txt");

/// Opening tag that primes the model's continuation
const INSTRUCTIONS_STRUCTURE_TAG: &str = "<Instructions Structure>";

fn instructions_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)<Instructions>(.+?)</Instructions>")
            .expect("instructions pattern is valid")
    })
}

fn trailing_empty_tag_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"<([A-Za-z0-9_]+)></([A-Za-z0-9_]+)>$").expect("empty tag pattern is valid")
    })
}

/// Substitute the task into the metaprompt.
///
/// Only the first placeholder is replaced and the task is inserted
/// literally, whatever characters it contains.
pub fn build_generation_prompt(task: &str) -> String {
    METAPROMPT_TEMPLATE.replacen(TASK_PLACEHOLDER, task, 1)
}

/// Build the in-progress assistant turn.
///
/// ```
/// use promptgen::build_assistant_partial;
///
/// let partial = build_assistant_partial(&["topic".to_string(), "tone".to_string()]);
/// assert_eq!(partial, "<Inputs>{TOPIC}\n{TONE}\n</Inputs>\n<Instructions Structure>");
/// ```
pub fn build_assistant_partial(variables: &[String]) -> String {
    let variable_block = variables
        .iter()
        .map(|variable| format!("{{{}}}", variable.to_uppercase()))
        .collect::<Vec<_>>()
        .join("\n");

    let mut partial = String::new();
    if !variable_block.is_empty() {
        partial.push_str("<Inputs>");
        partial.push_str(&variable_block);
        partial.push_str("\n</Inputs>\n");
    }
    partial.push_str(INSTRUCTIONS_STRUCTURE_TAG);
    partial
}

/// Pull the generated instructions out of the model's reply.
pub fn extract_prompt(content: &[ContentBlock]) -> Result<String, GenerationError> {
    if content.is_empty() {
        return Err(GenerationError::EmptyContent);
    }

    let text = content
        .iter()
        .filter_map(ContentBlock::text)
        .find(|text| !text.trim().is_empty())
        .ok_or(GenerationError::NoTextContent)?;

    let instructions = instructions_regex()
        .captures(text)
        .and_then(|captures| captures.get(1))
        .ok_or(GenerationError::MissingInstructions)?;

    Ok(normalize_instructions(instructions.as_str()))
}

/// Trim every line, drop blank ones, then strip a trailing `<tag></tag>`.
pub fn normalize_instructions(raw: &str) -> String {
    let cleaned = raw
        .trim()
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    remove_trailing_empty_tag(cleaned)
}

fn remove_trailing_empty_tag(text: String) -> String {
    let Some(captures) = trailing_empty_tag_regex().captures(&text) else {
        return text;
    };
    // The open and close names must match, e.g. `<answer></answer>`.
    if captures[1] != captures[2] {
        return text;
    }
    let start = captures.get(0).map(|m| m.start()).unwrap_or(text.len());
    text[..start].to_string()
}
