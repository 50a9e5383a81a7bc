use serde::{Serialize, Serializer};

use crate::{
    error::MergeFailure,
    protocol::ChatMessage,
    rules::{SubstitutionRule, rules},
};

const INSTRUCTIONS: &str = "You are a legal case text transformer that updates templates using user-provided instructions. Your task is to:
1. Identify the relevant part of the user input that modifies the template.
2. Ignore any non-essential instructions such as \"Change the name of...\" or \"Update this...\".
3. Apply only the required change to the template, wrapping the updated text inside a <span style=\"background-color: #ffff00;\">...</span>.
4. Return ONLY the updated template without any quotes or additional text.";

/// Everything the completion call needs
#[derive(Debug, Clone)]
pub struct MergeRequest {
    pub template: String,
    pub transcript: String,
    /// Operator-maintained merge rules from the prompt store
    pub prompt: String,
}

impl MergeRequest {
    /// Build the system and user messages
    ///
    /// Template and transcript are embedded verbatim inside quotes.
    pub fn messages(&self) -> [ChatMessage; 2] {
        [
            ChatMessage::system(system_message(rules(), &self.prompt)),
            ChatMessage::user(format!(
                "Update this template: \"{}\" using this text: \"{}\". Return ONLY the updated template value without any quotes.",
                self.template, self.transcript
            )),
        ]
    }
}

fn system_message(rules: &[SubstitutionRule], prompt: &str) -> String {
    let mut message = INSTRUCTIONS.to_string();

    for (i, rule) in rules.iter().enumerate() {
        message.push_str(&format!("\n{}. {}", i + 5, rule.instruction));
    }

    let prompt = prompt.trim();
    if !prompt.is_empty() {
        message.push_str("\n\n");
        message.push_str(prompt);
    }

    message
}

/// Outcome of a merge
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    Success { merged_text: String },
    Failure { reason: MergeFailure },
}

/// A merge outcome together with the inputs it was produced from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeResult {
    pub original_template: String,
    pub spoken_text: String,
    pub outcome: MergeOutcome,
}

impl MergeResult {
    pub const fn is_success(&self) -> bool {
        matches!(self.outcome, MergeOutcome::Success { .. })
    }

    pub fn merged_text(&self) -> Option<&str> {
        match &self.outcome {
            MergeOutcome::Success { merged_text } => Some(merged_text),
            MergeOutcome::Failure { .. } => None,
        }
    }

    pub const fn failure(&self) -> Option<&MergeFailure> {
        match &self.outcome {
            MergeOutcome::Success { .. } => None,
            MergeOutcome::Failure { reason } => Some(reason),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MergeResultBody<'a> {
    success: bool,
    original_template: &'a str,
    spoken_text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    merged_text: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl Serialize for MergeResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        MergeResultBody {
            success: self.is_success(),
            original_template: &self.original_template,
            spoken_text: &self.spoken_text,
            merged_text: self.merged_text(),
            error: self.failure().map(ToString::to_string),
        }
        .serialize(serializer)
    }
}
