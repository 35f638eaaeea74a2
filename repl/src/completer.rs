use memsim_core::AllocationStrategy;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper, Result};

use crate::commands::COMMAND_NAMES;

pub struct CommandCompleter {
    commands: Vec<&'static str>,
    strategies: Vec<&'static str>,
}

impl CommandCompleter {
    pub fn new() -> Self {
        Self {
            commands: COMMAND_NAMES.to_vec(),
            strategies: AllocationStrategy::ALL.iter().map(|s| s.as_str()).collect(),
        }
    }

    fn get_completions(&self, line: &str, pos: usize) -> Vec<Pair> {
        let before_cursor = &line[..pos];
        let words: Vec<&str> = before_cursor.split_whitespace().collect();
        let partial = if before_cursor.ends_with(char::is_whitespace) {
            ""
        } else {
            words.last().copied().unwrap_or("")
        };
        let partial_lower = partial.to_lowercase();

        let candidates: &[&'static str] = match Self::context(&words, partial.is_empty()) {
            CompletionContext::Command => &self.commands,
            CompletionContext::StrategyName => &self.strategies,
            CompletionContext::Argument => &[],
        };

        let mut completions: Vec<Pair> = candidates
            .iter()
            .filter(|c| c.starts_with(&partial_lower))
            .map(|c| Pair {
                display: c.to_string(),
                replacement: c.to_string(),
            })
            .collect();

        completions.sort_by(|a, b| a.display.len().cmp(&b.display.len()));
        completions
    }

    fn context(words: &[&str], at_new_word: bool) -> CompletionContext {
        let completed = if at_new_word {
            words.len()
        } else {
            words.len().saturating_sub(1)
        };

        match (completed, words.first()) {
            (0, _) => CompletionContext::Command,
            (1, Some(cmd)) if cmd.eq_ignore_ascii_case("strategy") => {
                CompletionContext::StrategyName
            }
            _ => CompletionContext::Argument,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CompletionContext {
    Command,
    StrategyName,
    Argument,
}

impl Completer for CommandCompleter {
    type Candidate = Pair;

    fn complete(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Result<(usize, Vec<Pair>)> {
        let completions = self.get_completions(line, pos);

        let start = line[..pos]
            .rfind(char::is_whitespace)
            .map(|i| i + 1)
            .unwrap_or(0);

        Ok((start, completions))
    }
}

impl Hinter for CommandCompleter {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        if pos < line.len() {
            return None;
        }

        match line.trim_end().to_lowercase().as_str() {
            "allocate" => Some(" <size>".to_string()),
            "deallocate" => Some(" <pid>".to_string()),
            "strategy" => Some(" <first_fit|best_fit>".to_string()),
            _ => None,
        }
    }
}

impl Highlighter for CommandCompleter {
    fn highlight_hint<'h>(&self, hint: &'h str) -> std::borrow::Cow<'h, str> {
        std::borrow::Cow::Owned(format!("\x1b[2m{}\x1b[0m", hint))
    }
}

impl Validator for CommandCompleter {}

impl Helper for CommandCompleter {}
