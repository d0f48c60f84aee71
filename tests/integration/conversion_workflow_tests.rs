/*!
 * Integration tests for the subtitle to document workflow
 */

use std::path::Path;
use anyhow::Result;
use indicatif::ProgressBar;
use ass2docx::app_config::Config;
use ass2docx::app_controller::{Controller, ConversionSummary, FileOutcome};
use ass2docx::document_emitter::DocumentEmitter;
use ass2docx::errors::EmitError;
use ass2docx::session::{Session, StatusLog};
use ass2docx::transcript::DialogueGroup;
use crate::common;

/// Emitter standing in for an unwritable destination
struct FailingEmitter;

impl DocumentEmitter for FailingEmitter {
    fn extension(&self) -> &str {
        "docx"
    }

    fn emit(&self, _groups: &[DialogueGroup], _destination: &Path) -> Result<(), EmitError> {
        Err(EmitError::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "read-only volume",
        )))
    }
}

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Test converting the sample script end to end
#[test]
fn test_convert_file_withSampleScript_shouldWriteGroupedDocument() -> Result<()> {
    init_logging();
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_subtitle(temp_dir.path(), "pilot.ass")?;
    let output_dir = temp_dir.path().join("out");
    let controller = Controller::with_config(Config::default())?;

    let outcome = controller.convert_file(&input, &output_dir);

    let expected = output_dir.join("pilot.docx");
    assert_eq!(outcome, FileOutcome::Converted(expected.clone()));

    let xml = common::read_document_xml(&expected)?;
    assert_eq!(xml.matches("<w:tr>").count(), 2);
    assert!(xml.contains("Bob:"));
    assert!(xml.contains(
        r#"<w:t xml:space="preserve">Hi there.</w:t><w:br/><w:t xml:space="preserve">How are you?</w:t>"#
    ));
    assert!(xml.contains(r#"<w:t xml:space="preserve">Fine, thanks.</w:t>"#));
    assert!(!xml.contains("not spoken"));
    Ok(())
}

/// Test that a file without dialogue is reported and nothing is written
#[test]
fn test_convert_file_withNoDialogue_shouldReportNoDialogue() -> Result<()> {
    init_logging();
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "blank.ass", "[Script Info]\nTitle: blank\n")?;
    let controller = Controller::with_config(Config::default())?;

    let outcome = controller.convert_file(&input, temp_dir.path());

    assert_eq!(outcome, FileOutcome::NoDialogue);
    assert!(!temp_dir.path().join("blank.docx").exists());
    Ok(())
}

/// Test that a missing input degrades to "no dialogue" instead of failing
#[test]
fn test_convert_file_withMissingInput_shouldReportNoDialogue() -> Result<()> {
    init_logging();
    let temp_dir = common::create_temp_dir()?;
    let controller = Controller::with_config(Config::default())?;

    let outcome = controller.convert_file(&temp_dir.path().join("gone.ass"), temp_dir.path());

    assert_eq!(outcome, FileOutcome::NoDialogue);
    Ok(())
}

/// Test that dialogue before a corrupt region is still converted
#[test]
fn test_convert_file_withCorruptTail_shouldConvertParsedPart() -> Result<()> {
    init_logging();
    let temp_dir = common::create_temp_dir()?;
    let mut bytes = format!("{}\n", common::dialogue("Ann", "Before the damage")).into_bytes();
    bytes.extend_from_slice(b"\xc3\x28 garbage\n");
    bytes.extend_from_slice(format!("{}\n", common::dialogue("Ann", "After")).as_bytes());
    let input = temp_dir.path().join("damaged.ass");
    std::fs::write(&input, bytes)?;
    let controller = Controller::with_config(Config::default())?;

    let outcome = controller.convert_file(&input, temp_dir.path());

    assert!(outcome.is_success());
    let xml = common::read_document_xml(&temp_dir.path().join("damaged.docx"))?;
    assert!(xml.contains("Before the damage"));
    assert!(!xml.contains("After"));
    Ok(())
}

/// Test that emitter failures are reported separately
#[test]
fn test_convert_file_withFailingEmitter_shouldReportEmitFailure() -> Result<()> {
    init_logging();
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_subtitle(temp_dir.path(), "pilot.ass")?;
    let controller = Controller::with_emitter(Config::default(), Box::new(FailingEmitter))?;

    let outcome = controller.convert_file(&input, temp_dir.path());

    assert!(matches!(outcome, FileOutcome::EmitFailed(ref reason) if reason.contains("read-only volume")));
    Ok(())
}

/// Test a full session run with mixed outcomes
#[test]
fn test_convert_session_withMixedFiles_shouldLogEachFileAndSummary() -> Result<()> {
    init_logging();
    let temp_dir = common::create_temp_dir()?;
    let good = common::create_test_subtitle(temp_dir.path(), "good.ass")?;
    let empty = common::create_test_file(temp_dir.path(), "empty.ass", "[Events]\n")?;
    let output_dir = temp_dir.path().join("docs");
    let controller = Controller::with_config(Config::default())?;

    let mut session = Session::new();
    let mut log = StatusLog::new();
    session.select_input_files(vec![good, empty], &mut log);
    session.select_output_dir(output_dir.clone(), &mut log);

    let summary = controller.convert_session(&mut session, &mut log, &ProgressBar::hidden());

    assert_eq!(summary, Some(ConversionSummary { succeeded: 1, failed: 1 }));
    assert!(log.contains("Starting conversion..."));
    assert!(log.contains("Processing: good.ass..."));
    assert!(log.contains(&format!("  -> Success: Saved to {}", output_dir.join("good.docx").display())));
    assert!(log.contains("Processing: empty.ass..."));
    assert!(log.contains("  -> Failed: No dialogue found in file."));
    assert_eq!(log.last(), Some("Conversion complete. 1 succeeded, 1 failed."));
    assert!(!log.contains("  -> Note: File does not look like an ASS subtitle script."));

    assert!(session.input_files().is_empty());
    assert_eq!(session.output_dir(), Some(output_dir.as_path()));
    Ok(())
}

/// Test that files without subtitle headers get a note but are still converted
#[test]
fn test_convert_session_withNonSubtitleFiles_shouldNoteOnlyUnrecognisedOnes() -> Result<()> {
    init_logging();
    let temp_dir = common::create_temp_dir()?;
    let notes = common::create_test_file(temp_dir.path(), "notes.txt", "shopping list\nmilk\n")?;
    let bare = common::create_test_file(
        temp_dir.path(),
        "bare.txt",
        &format!("{}\n", common::dialogue("Ann", "Hello")),
    )?;
    let controller = Controller::with_config(Config::default())?;

    let mut session = Session::new();
    let mut log = StatusLog::new();
    session.select_input_files(vec![notes, bare], &mut log);
    session.select_output_dir(temp_dir.path().join("docs"), &mut log);

    let summary = controller.convert_session(&mut session, &mut log, &ProgressBar::hidden());

    assert_eq!(summary, Some(ConversionSummary { succeeded: 1, failed: 1 }));
    let lines = log.lines();
    let notes_at = lines.iter().position(|l| l == "Processing: notes.txt...").unwrap();
    assert_eq!(lines[notes_at + 1], "  -> Note: File does not look like an ASS subtitle script.");
    assert_eq!(lines[notes_at + 2], "  -> Failed: No dialogue found in file.");
    let bare_at = lines.iter().position(|l| l == "Processing: bare.txt...").unwrap();
    assert!(lines[bare_at + 1].starts_with("  -> Success: Saved to "));
    Ok(())
}

/// Test that emission failures do not stop later files
#[test]
fn test_convert_session_withFailingEmitter_shouldContinueAndCountFailures() -> Result<()> {
    init_logging();
    let temp_dir = common::create_temp_dir()?;
    let first = common::create_test_subtitle(temp_dir.path(), "one.ass")?;
    let second = common::create_test_subtitle(temp_dir.path(), "two.ass")?;
    let controller = Controller::with_emitter(Config::default(), Box::new(FailingEmitter))?;

    let mut session = Session::new();
    let mut log = StatusLog::new();
    session.select_input_files(vec![first, second], &mut log);
    session.select_output_dir(temp_dir.path().to_path_buf(), &mut log);

    let summary = controller.convert_session(&mut session, &mut log, &ProgressBar::hidden());

    assert_eq!(summary, Some(ConversionSummary { succeeded: 0, failed: 2 }));
    let failures = log
        .lines()
        .iter()
        .filter(|line| line.as_str() == "  -> Failed: Could not create .docx file.")
        .count();
    assert_eq!(failures, 2);
    Ok(())
}

/// Test that converting without selections is refused
#[test]
fn test_convert_session_withoutSelections_shouldRefuse() -> Result<()> {
    let controller = Controller::with_config(Config::default())?;
    let mut session = Session::new();
    let mut log = StatusLog::new();

    let summary = controller.convert_session(&mut session, &mut log, &ProgressBar::hidden());

    assert!(summary.is_none());
    assert_eq!(
        log.last(),
        Some("Error: Please select input files and an output directory first.")
    );
    Ok(())
}
