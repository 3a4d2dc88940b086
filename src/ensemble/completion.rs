//! Text-completion port.
//!
//! A single opaque prompt-in, text-out call. Fallible, time-bounded, no
//! retry. Production wires a generative-text API client behind this trait;
//! tests use [`CannedCompletion`].

use crate::error::CompletionError;

pub type Result<T> = std::result::Result<T, CompletionError>;

pub trait TextCompletion {
    fn complete(&self, prompt: &str) -> Result<String>;
}

/// Test double returning a preset reply, or a preset failure.
pub struct CannedCompletion {
    reply: std::result::Result<String, String>,
}

impl CannedCompletion {
    pub fn replies(text: impl Into<String>) -> Self {
        Self {
            reply: Ok(text.into()),
        }
    }

    pub fn fails(message: impl Into<String>) -> Self {
        Self {
            reply: Err(message.into()),
        }
    }
}

impl TextCompletion for CannedCompletion {
    fn complete(&self, _prompt: &str) -> Result<String> {
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err(message) => Err(CompletionError::Backend(message.clone())),
        }
    }
}
