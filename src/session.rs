/*!
 * Front-end state and status reporting.
 *
 * A `Session` holds what the user has picked so far: input files and an
 * output folder. Status lines go to a `StatusSink`, an append-only log.
 */

use std::path::{Path, PathBuf};

/// Append-only status log shown to the user
pub trait StatusSink {
    /// Append one line
    fn append(&mut self, line: &str);
}

/// Status log kept in memory
#[derive(Debug, Default, Clone)]
pub struct StatusLog {
    lines: Vec<String>,
}

impl StatusLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// All lines appended so far
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Last appended line
    pub fn last(&self) -> Option<&str> {
        self.lines.last().map(String::as_str)
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines.iter().any(|line| line.contains(needle))
    }
}

impl StatusSink for StatusLog {
    fn append(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }
}

// @struct: User selections for one shell
#[derive(Debug, Default, Clone)]
pub struct Session {
    // @field: Subtitle files to convert, in selection order
    input_files: Vec<PathBuf>,

    // @field: Folder receiving the documents
    output_dir: Option<PathBuf>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the input selection and report it.
    ///
    /// An empty selection clears the previous one, like cancelling a file
    /// picker does.
    pub fn select_input_files(&mut self, files: Vec<PathBuf>, sink: &mut dyn StatusSink) {
        self.input_files = files;
        if self.input_files.is_empty() {
            return;
        }

        sink.append(&format!("Selected {} file(s):", self.input_files.len()));
        for file in &self.input_files {
            sink.append(&format!("  - {}", display_name(file)));
        }
    }

    /// Set the output folder and report it
    pub fn select_output_dir(&mut self, dir: PathBuf, sink: &mut dyn StatusSink) {
        if dir.as_os_str().is_empty() {
            self.output_dir = None;
            return;
        }

        sink.append(&format!("Output folder set to: {}", dir.display()));
        self.output_dir = Some(dir);
    }

    pub fn input_files(&self) -> &[PathBuf] {
        &self.input_files
    }

    pub fn output_dir(&self) -> Option<&Path> {
        self.output_dir.as_deref()
    }

    /// Conversion needs at least one input file and an output folder
    pub fn is_ready(&self) -> bool {
        !self.input_files.is_empty() && self.output_dir.is_some()
    }

    /// Forget the input files; the output folder is kept for the next run
    pub fn reset_inputs(&mut self) {
        self.input_files.clear();
    }
}

/// File name used in status lines
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
