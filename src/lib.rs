/*!
 * # ass2docx - Subtitle transcripts for word processors
 *
 * A Rust library for turning Advanced SubStation Alpha (.ass) subtitles
 * into readable transcripts.
 *
 * ## Features
 *
 * - Extract speaker and text from `Dialogue:` events
 * - Strip override tags and in-text line breaks
 * - Merge consecutive lines of the same speaker into one turn
 * - Write a borderless two-column .docx table per file
 * - Partial results when a subtitle file cannot be read to the end
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `subtitle_processor`: Dialogue extraction
 * - `transcript`: Grouping of dialogue by speaker
 * - `document_emitter`: Document output
 * - `file_utils`: File system operations
 * - `session`: Front-end selections and the status log
 * - `app_controller`: Main application controller
 * - `shell`: Interactive terminal front end
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod file_utils;
pub mod subtitle_processor;
pub mod transcript;
pub mod document_emitter;
pub mod session;
pub mod app_controller;
pub mod shell;
pub mod errors;

// Re-export main types for easier usage
pub use app_config::{Config, DocumentConfig};
pub use subtitle_processor::{DialogueLine, ParseOutcome, parse_ass_file, parse_ass_reader};
pub use transcript::{DialogueGroup, group_by_speaker};
pub use document_emitter::{DocumentEmitter, DocxEmitter};
pub use app_controller::{Controller, ConversionSummary, FileOutcome};
pub use session::{Session, StatusLog, StatusSink};
pub use errors::{AppError, EmitError, SubtitleError};
