//! Where pages send their output and ask their questions

use std::io::{self, BufRead, Write};

pub trait Ui {
    /// Blocking notice the user must see
    fn alert(&mut self, message: &str);

    /// Inline error next to the current view
    fn error(&mut self, message: &str);

    /// Synchronous yes/no question. Anything but an explicit yes is a no.
    fn confirm(&mut self, question: &str) -> bool;

    /// Free-text answer, `None` when the user gave nothing
    fn prompt(&mut self, question: &str) -> Option<String>;

    /// Render a full view
    fn show(&mut self, view: &str);
}

/// Interactive terminal on stdin/stdout
pub struct Terminal;

impl Terminal {
    fn read_line(&self, question: &str) -> Option<String> {
        print!("{} ", question);
        io::stdout().flush().ok()?;

        let mut answer = String::new();
        io::stdin().lock().read_line(&mut answer).ok()?;
        let answer = answer.trim();
        if answer.is_empty() {
            None
        } else {
            Some(answer.to_string())
        }
    }
}

impl Ui for Terminal {
    fn alert(&mut self, message: &str) {
        println!("\x1b[1m{}\x1b[0m", message);
    }

    fn error(&mut self, message: &str) {
        eprintln!("\x1b[31m✗ {}\x1b[0m", message);
    }

    fn confirm(&mut self, question: &str) -> bool {
        matches!(
            self.read_line(&format!("{} [y/N]", question))
                .map(|a| a.to_ascii_lowercase())
                .as_deref(),
            Some("y") | Some("yes")
        )
    }

    fn prompt(&mut self, question: &str) -> Option<String> {
        self.read_line(question)
    }

    fn show(&mut self, view: &str) {
        println!("{}", view);
    }
}
