mod datetime;
mod grammar;
mod model;
mod parser;

pub mod date_util;
pub mod text_edit;

use serde::{Deserialize, Serialize};

pub use datetime::{DEFAULT_FORMAT, DateTimeMaskParser};
pub use model::{DatePart, DatePartKind};
pub use parser::{DEFAULT_MASK, DEFAULT_PROMPT, MaskParser, Replaced};

/// Host-facing construction config. Empty fields fall back to the parser
/// defaults; an over-long prompt is truncated to its first character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MaskOptions {
    pub format: String,
    pub prompt_character: String,
}

impl Default for MaskOptions {
    fn default() -> Self {
        Self {
            format: String::new(),
            prompt_character: DEFAULT_PROMPT.to_string(),
        }
    }
}

impl MaskParser {
    pub fn from_options(options: &MaskOptions) -> Self {
        Self::new(options.format.as_str(), options.prompt_character.as_str())
    }
}

impl DateTimeMaskParser {
    pub fn from_options(options: &MaskOptions) -> Self {
        Self::new(options.format.as_str(), options.prompt_character.as_str())
    }
}
