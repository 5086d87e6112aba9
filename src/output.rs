use supports_color::Stream;

use crate::core::types::{Action, ActionEffect, ActionStyle};

pub struct Printer {
    pub use_color: bool,
}

impl Printer {
    pub fn new() -> Self {
        let use_color = supports_color::on(Stream::Stdout).is_some();
        Self { use_color }
    }

    pub fn success(&self, message: &str) {
        self.print_prefix("[+]", "green", message);
    }

    pub fn error(&self, message: &str) {
        self.print_prefix("[-]", "red", message);
    }

    pub fn warning(&self, message: &str) {
        self.print_prefix("[!]", "yellow", message);
    }

    pub fn info(&self, message: &str) {
        self.print_prefix("[?]", "cyan", message);
    }

    pub fn header(&self, title: &str) {
        if self.use_color {
            println!("\n\x1b[1;36m{}\x1b[0m", title);
            println!("\x1b[90m{}\x1b[0m", "─".repeat(title.len()));
        } else {
            println!("\n{}", title);
            println!("{}", "─".repeat(title.len()));
        }
    }

    pub fn print_prefix(&self, prefix: &str, color: &str, message: &str) {
        if self.use_color {
            let color_code = match color {
                "green" => "\x1b[32m",
                "red" => "\x1b[31m",
                "yellow" => "\x1b[33m",
                "cyan" => "\x1b[36m",
                "blue" => "\x1b[34m",
                "magenta" => "\x1b[35m",
                _ => "\x1b[0m",
            };
            println!("{}{}\x1b[0m {}", color_code, prefix, message);
        } else {
            println!("{} {}", prefix, message);
        }
    }

    pub fn print_key_value(&self, key: &str, value: &str, indent: usize) {
        let indent_str = " ".repeat(indent);
        if self.use_color {
            println!("{}\x1b[1m{}:\x1b[0m {}", indent_str, key, value);
        } else {
            println!("{}{}: {}", indent_str, key, value);
        }
    }

    /// Renders the suggestion tree: one line per action, children indented,
    /// style mapped to the prefix vocabulary used everywhere else.
    pub fn render_actions(&self, actions: &[Action]) {
        for action in actions {
            self.render_action(action, 0);
        }
    }

    fn render_action(&self, action: &Action, indent: usize) {
        let indent_str = " ".repeat(indent);
        let (prefix, color) = match action.style {
            ActionStyle::Error => ("[-]", "red"),
            ActionStyle::Info => ("[?]", "cyan"),
            ActionStyle::Hint => ("[?]", "cyan"),
            ActionStyle::Group => ("[=]", "magenta"),
            ActionStyle::Candidate => ("[>]", "green"),
            ActionStyle::Submit => ("[!]", "yellow"),
        };

        let suffix = match &action.effect {
            Some(ActionEffect::Replace(text)) => format!("  ->  {}", text),
            Some(ActionEffect::Finish) => "  (press :submit)".to_string(),
            None => String::new(),
        };

        if self.use_color {
            let color_code = match color {
                "green" => "\x1b[32m",
                "red" => "\x1b[31m",
                "yellow" => "\x1b[33m",
                "cyan" => "\x1b[36m",
                "magenta" => "\x1b[35m",
                _ => "\x1b[0m",
            };
            println!(
                "{}{}{}\x1b[0m {}\x1b[90m{}\x1b[0m",
                indent_str, color_code, prefix, action.display, suffix
            );
        } else {
            println!("{}{} {}{}", indent_str, prefix, action.display, suffix);
        }

        for child in &action.children {
            self.render_action(child, indent + 4);
        }
    }
}
