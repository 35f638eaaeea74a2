use crate::completer::CommandCompleter;
use rustyline::history::DefaultHistory;
use rustyline::{Editor, Result};
use tracing::debug;

pub struct HistoryManager {
    history_file: String,
}

impl HistoryManager {
    pub fn new(history_file: &str) -> Self {
        Self {
            history_file: history_file.to_string(),
        }
    }

    pub fn load(&self, editor: &mut Editor<CommandCompleter, DefaultHistory>) -> Result<()> {
        // A missing history file just means a first run
        if let Err(e) = editor.load_history(&self.history_file) {
            debug!(file = %self.history_file, error = %e, "No history loaded");
        }
        Ok(())
    }

    pub fn save(&self, editor: &mut Editor<CommandCompleter, DefaultHistory>) -> Result<()> {
        editor.save_history(&self.history_file)
    }
}
