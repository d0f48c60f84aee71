use log::{debug, info, warn};
use std::fmt;
use std::path::{Path, PathBuf};
use indicatif::ProgressBar;
use crate::app_config::Config;
use crate::document_emitter::{DocumentEmitter, DocxEmitter};
use crate::errors::AppError;
use crate::file_utils::{FileManager, FileType};
use crate::session::{display_name, Session, StatusSink};
use crate::subtitle_processor::SubtitleCollection;
use crate::transcript::group_by_speaker;

// @module: Application controller for transcript conversion

/// Result of converting one subtitle file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// Document written to this path
    Converted(PathBuf),
    /// The source held no dialogue lines; nothing was written
    NoDialogue,
    /// The emitter failed; the reason is kept for diagnostics
    EmitFailed(String),
}

impl FileOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, FileOutcome::Converted(_))
    }
}

/// Tally of one conversion run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConversionSummary {
    pub succeeded: usize,
    pub failed: usize,
}

impl ConversionSummary {
    fn record(&mut self, outcome: &FileOutcome) {
        if outcome.is_success() {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
    }
}

impl fmt::Display for ConversionSummary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Conversion complete. {} succeeded, {} failed.",
            self.succeeded, self.failed
        )
    }
}

/// Main application controller for subtitle to document conversion
pub struct Controller {
    // @field: App configuration
    config: Config,

    // @field: Document writer
    emitter: Box<dyn DocumentEmitter>,
}

impl Controller {
    // @method: Create a new controller writing .docx documents
    pub fn with_config(config: Config) -> Result<Self, AppError> {
        let emitter = DocxEmitter::new(config.document.clone());
        Self::with_emitter(config, Box::new(emitter))
    }

    // @method: Create a new controller with a custom emitter
    pub fn with_emitter(config: Config, emitter: Box<dyn DocumentEmitter>) -> Result<Self, AppError> {
        config.validate()?;
        Ok(Self { config, emitter })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Document path for an input file: same stem, emitter extension
    pub fn output_path_for(&self, input_file: &Path, output_dir: &Path) -> PathBuf {
        FileManager::generate_output_path(input_file, output_dir, self.emitter.extension())
    }

    /// Run extraction, grouping and emission for a single file.
    ///
    /// Never fails as a whole: unreadable input degrades to whatever was
    /// parsed, and the remaining problems become a failed outcome.
    pub fn convert_file(&self, input_file: &Path, output_dir: &Path) -> FileOutcome {
        let (subtitles, failure) = SubtitleCollection::load(input_file);
        if let Some(e) = failure {
            warn!(
                "{}; keeping {} dialogue line(s) parsed before the failure",
                e,
                subtitles.lines.len()
            );
        }

        if subtitles.is_empty() {
            return FileOutcome::NoDialogue;
        }
        debug!("{}", subtitles);

        let groups = group_by_speaker(subtitles.lines);
        debug!("Grouped dialogue of {:?} into {} speaker turn(s)", input_file, groups.len());

        let output_path = self.output_path_for(input_file, output_dir);
        match self.emitter.emit(&groups, &output_path) {
            Ok(()) => FileOutcome::Converted(output_path),
            Err(e) => {
                warn!("Could not write {:?}: {}", output_path, e);
                FileOutcome::EmitFailed(e.to_string())
            }
        }
    }

    /// Convert every selected file in order and report to the status log.
    ///
    /// Returns `None` without doing anything when the session lacks input
    /// files or an output folder. After a run the input selection is cleared.
    pub fn convert_session(
        &self,
        session: &mut Session,
        sink: &mut dyn StatusSink,
        progress: &ProgressBar,
    ) -> Option<ConversionSummary> {
        let output_dir = match session.output_dir() {
            Some(dir) if session.is_ready() => dir.to_path_buf(),
            _ => {
                sink.append("Error: Please select input files and an output directory first.");
                return None;
            }
        };

        sink.append("Starting conversion...");
        progress.set_length(session.input_files().len() as u64);

        let mut summary = ConversionSummary::default();
        for input_file in session.input_files() {
            let name = display_name(input_file);
            progress.set_message(name.clone());
            sink.append(&format!("Processing: {}...", name));
            if let Ok(FileType::Unknown) = FileManager::detect_file_type(input_file) {
                warn!("{:?} has no [Script Info] or Dialogue: header", input_file);
                sink.append("  -> Note: File does not look like an ASS subtitle script.");
            }

            let outcome = self.convert_file(input_file, &output_dir);
            let status = match &outcome {
                FileOutcome::Converted(path) => format!("  -> Success: Saved to {}", path.display()),
                FileOutcome::NoDialogue => "  -> Failed: No dialogue found in file.".to_string(),
                FileOutcome::EmitFailed(_) => format!(
                    "  -> Failed: Could not create .{} file.",
                    self.emitter.extension()
                ),
            };
            sink.append(&status);
            summary.record(&outcome);
            progress.inc(1);
        }
        progress.finish_and_clear();

        sink.append(&summary.to_string());
        info!("{}", summary);

        session.reset_inputs();
        Some(summary)
    }
}
