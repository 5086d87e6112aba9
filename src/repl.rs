use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::path::PathBuf;

use crate::core::store::ferry_home;
use crate::output::Printer;

pub struct Repl {
    editor: DefaultEditor,
    history_file: Option<PathBuf>,
    printer: Printer,
}

impl Repl {
    pub fn new() -> Result<Self, String> {
        let mut editor = DefaultEditor::new()
            .map_err(|e| format!("Failed to initialize line editor: {}", e))?;

        // REPL history is separate from the recency cache; losing it is fine.
        let history_file = match ferry_home() {
            Ok(dir) => {
                if !dir.exists() {
                    std::fs::create_dir_all(&dir)
                        .map_err(|e| format!("Failed to create {}: {}", dir.display(), e))?;
                }
                let file = dir.join("repl_history.txt");
                if file.exists() {
                    editor.load_history(&file).ok();
                }
                Some(file)
            }
            Err(_) => None,
        };

        Ok(Self {
            editor,
            history_file,
            printer: Printer::new(),
        })
    }

    pub fn read_line(&mut self, prompt: &str) -> Result<Option<String>, ReadlineError> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    self.editor.add_history_entry(&line)?;
                }
                Ok(Some(line))
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                Ok(Some(String::new()))
            }
            Err(ReadlineError::Eof) => {
                println!("exit");
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    pub fn save_history(&mut self) -> Result<(), String> {
        let Some(file) = &self.history_file else {
            return Ok(());
        };
        self.editor
            .save_history(file)
            .map_err(|e| format!("Failed to save REPL history: {}", e))
    }

    pub fn printer(&self) -> &Printer {
        &self.printer
    }
}
