//! Where operator answers come from.
//!
//! The selector only needs line-based answers, so both the interactive
//! terminal and a fixed list of answers (tests, `--answer` flags) sit behind
//! [`InputSource`].

use std::collections::VecDeque;

use inquire::Text;

use crate::error::VmBatchError;

pub trait InputSource {
    /// Show `prompt` and return the raw answer line.
    fn read_line(&mut self, prompt: &str) -> Result<String, VmBatchError>;
}

/// Interactive terminal prompts.
#[derive(Debug, Default)]
pub struct ConsoleInput;

impl InputSource for ConsoleInput {
    fn read_line(&mut self, prompt: &str) -> Result<String, VmBatchError> {
        Text::new(prompt).prompt().map_err(map_inquire_err)
    }
}

/// Pre-recorded answers, consumed in order.
#[derive(Debug, Default)]
pub struct ScriptedInput {
    answers: VecDeque<String>,
    prompts: Vec<String>,
}

impl ScriptedInput {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            prompts: Vec::new(),
        }
    }

    /// Every prompt shown so far, in order.
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl InputSource for ScriptedInput {
    fn read_line(&mut self, prompt: &str) -> Result<String, VmBatchError> {
        self.prompts.push(prompt.to_string());
        let answer = self
            .answers
            .pop_front()
            .ok_or_else(|| VmBatchError::InputExhausted {
                prompt: prompt.to_string(),
            })?;
        tracing::debug!(prompt, answer = %answer, "scripted answer");
        Ok(answer)
    }
}

fn map_inquire_err(e: inquire::InquireError) -> VmBatchError {
    match e {
        inquire::InquireError::OperationCanceled | inquire::InquireError::OperationInterrupted => {
            VmBatchError::PromptCancelled
        }
        other => VmBatchError::Prompt {
            message: other.to_string(),
        },
    }
}
