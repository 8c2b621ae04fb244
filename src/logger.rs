//! Message sinks handed over by the host build orchestrator

use console::style;
use std::cell::RefCell;

/// Logger exposed by the host to plugins
pub trait BuildLogger {
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
}

/// Styled terminal output: info on stdout, warnings on stderr
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleLogger;

impl BuildLogger for ConsoleLogger {
    fn info(&self, message: &str) {
        println!("{} {}", style("→").yellow(), message);
    }

    fn warn(&self, message: &str) {
        eprintln!("{} {}", style("WARNING:").yellow().bold(), message);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warn,
}

/// Keeps every message in memory, in order
#[derive(Debug, Default)]
pub struct RecordingLogger {
    records: RefCell<Vec<(Level, String)>>,
}

impl RecordingLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<(Level, String)> {
        self.records.borrow().clone()
    }

    pub fn infos(&self) -> Vec<String> {
        self.messages(Level::Info)
    }

    pub fn warnings(&self) -> Vec<String> {
        self.messages(Level::Warn)
    }

    fn messages(&self, level: Level) -> Vec<String> {
        self.records
            .borrow()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, message)| message.clone())
            .collect()
    }
}

impl BuildLogger for RecordingLogger {
    fn info(&self, message: &str) {
        self.records
            .borrow_mut()
            .push((Level::Info, message.to_string()));
    }

    fn warn(&self, message: &str) {
        self.records
            .borrow_mut()
            .push((Level::Warn, message.to_string()));
    }
}
