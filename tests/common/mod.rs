/*!
 * Common test utilities for the ass2docx test suite
 */

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use anyhow::Result;
use tempfile::TempDir;

/// A small but complete .ass script with two speakers
pub const SAMPLE_ASS: &str = r"[Script Info]
Title: Sample
ScriptType: v4.00+

[V4+ Styles]
Format: Name, Fontname, Fontsize, PrimaryColour, SecondaryColour, OutlineColour, BackColour, Bold, Italic, Underline, StrikeOut, ScaleX, ScaleY, Spacing, Angle, BorderStyle, Outline, Shadow, Alignment, MarginL, MarginR, MarginV, Encoding
Style: Default,Arial,20,&H00FFFFFF,&H000000FF,&H00000000,&H00000000,0,0,0,0,100,100,0,0,1,2,2,2,10,10,10,1

[Events]
Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text
Dialogue: 0,0:00:01.00,0:00:02.00,Default,Bob,0,0,0,,Hi there.
Dialogue: 0,0:00:02.00,0:00:03.00,Default,Bob,0,0,0,,{\i1}How are you?{\i0}
Comment: 0,0:00:03.00,0:00:04.00,Default,Bob,0,0,0,,not spoken
Dialogue: 0,0:00:04.00,0:00:05.00,Default,Alice,0,0,0,,Fine,\Nthanks.
";

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Creates the sample subtitle file in the specified directory
pub fn create_test_subtitle(dir: &Path, filename: &str) -> Result<PathBuf> {
    create_test_file(dir, filename, SAMPLE_ASS)
}

/// Builds one dialogue event line
pub fn dialogue(name: &str, text: &str) -> String {
    format!("Dialogue: 0,0:00:01.00,0:00:02.00,Default,{},0,0,0,,{}", name, text)
}

/// Reads `word/document.xml` out of a written .docx
pub fn read_document_xml(path: &Path) -> Result<String> {
    let file = fs::File::open(path)?;
    let mut archive = zip::ZipArchive::new(file)?;
    let mut part = archive.by_name("word/document.xml")?;
    let mut xml = String::new();
    part.read_to_string(&mut xml)?;
    Ok(xml)
}
