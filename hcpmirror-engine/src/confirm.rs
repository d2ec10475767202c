//! Interactive confirmation gate.
//!
//! The link materializer blocks here, and only here, before deleting an
//! existing subject tree. Anything other than an explicit `y`/`yes` is a no.

use std::collections::VecDeque;
use std::io::{BufRead, Stderr, StdinLock, Write};

/// Asks a yes/no question.
pub trait Confirm {
    /// Returns `true` only on an affirmative answer.
    fn confirm(&mut self, prompt: &str) -> bool;
}

/// `y` or `yes`, any case. Only the line ending is stripped; `" y"` is a no.
pub fn is_affirmative(answer: &str) -> bool {
    let answer = answer.trim_end_matches(['\r', '\n']);
    answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes")
}

// ---------------------------------------------------------------------------
// PromptConfirm
// ---------------------------------------------------------------------------

/// Writes the prompt to `output` and reads one line from `input`.
///
/// EOF and read errors count as a decline.
pub struct PromptConfirm<R, W> {
    input: R,
    output: W,
    label: Option<String>,
}

impl<R: BufRead, W: Write> PromptConfirm<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            label: None,
        }
    }

    /// Prefix every prompt with `label: `.
    pub fn labelled(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

impl PromptConfirm<StdinLock<'static>, Stderr> {
    /// Prompt on stderr, answer on stdin.
    pub fn stdio() -> Self {
        Self::new(std::io::stdin().lock(), std::io::stderr())
    }
}

impl<R: BufRead, W: Write> Confirm for PromptConfirm<R, W> {
    fn confirm(&mut self, prompt: &str) -> bool {
        let shown = match &self.label {
            Some(label) => write!(self.output, "{label}: {prompt}"),
            None => write!(self.output, "{prompt}"),
        };
        if shown.and_then(|()| self.output.flush()).is_err() {
            return false;
        }

        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => false,
            Ok(_) => is_affirmative(&line),
        }
    }
}

// ---------------------------------------------------------------------------
// ScriptedConfirm
// ---------------------------------------------------------------------------

/// Replays canned answers in order; once they run out every answer is "no".
#[derive(Debug, Default)]
pub struct ScriptedConfirm {
    answers: VecDeque<String>,
    prompts: Vec<String>,
}

impl ScriptedConfirm {
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

    /// Every prompt shown so far.
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }
}

impl Confirm for ScriptedConfirm {
    fn confirm(&mut self, prompt: &str) -> bool {
        self.prompts.push(prompt.to_string());
        self.answers
            .pop_front()
            .map(|a| is_affirmative(&a))
            .unwrap_or(false)
    }
}
