//! Review domain types: feedback tones and prompt assembly.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Persona used when the client sends a tone the server does not know.
pub const NEUTRAL_INSTRUCTION: &str = "You are a helpful and friendly code review assistant.";

/// Named persona preset controlling the instruction text sent upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tone {
    Supportive,
    Direct,
    Humorous,
}

impl Tone {
    pub const ALL: [Self; 3] = [Self::Supportive, Self::Direct, Self::Humorous];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Supportive => "Supportive",
            Self::Direct => "Direct",
            Self::Humorous => "Humorous",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }

    /// Fixed persona instruction for this tone.
    #[must_use]
    pub const fn instruction(self) -> &'static str {
        match self {
            Self::Supportive => "You are a kind and encouraging code review assistant.",
            Self::Direct => "You are a blunt, no-fluff code reviewer. Be short and clear.",
            Self::Humorous => "You are a funny but helpful coding coach. Use light and witty tone.",
        }
    }

    /// Instruction for a tone name supplied by the client, falling back
    /// to the neutral persona for anything unrecognized.
    #[must_use]
    pub fn instruction_for(name: Option<&str>) -> &'static str {
        name.and_then(Self::from_name)
            .map_or(NEUTRAL_INSTRUCTION, Self::instruction)
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Builds the single user message sent to the chat-completions API.
/// Feedback is requested in three fixed sections: Style, Errors, Clarity.
#[must_use]
pub fn build_prompt(instruction: &str, code: &str) -> String {
    format!(
        "{instruction}\n\n\
         Please review the following code and give feedback in three sections:\n\n\
         1. Style\n\
         2. Errors\n\
         3. Clarity\n\n\
         Here is the code:\n\
         {code}"
    )
}
