use anyhow::{Result, Context};
use std::fs;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use log::warn;

// @module: File and directory utilities

// @const: Lines inspected when sniffing file contents
const SNIFF_LINES: usize = 50;

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    // @generates: Output path for a converted document
    // @params: input_file, output_dir, extension
    pub fn generate_output_path<P1: AsRef<Path>, P2: AsRef<Path>>(
        input_file: P1,
        output_dir: P2,
        extension: &str,
    ) -> PathBuf {
        let input_file = input_file.as_ref();
        let output_dir = output_dir.as_ref();

        // Get the file stem (filename without extension)
        let stem = input_file.file_stem().unwrap_or_default();

        let mut output_filename = stem.to_string_lossy().to_string();
        output_filename.push('.');
        output_filename.push_str(extension.trim_start_matches('.'));

        output_dir.join(output_filename)
    }

    /// Find files with a specific extension in a directory, sorted by path
    pub fn find_files<P: AsRef<Path>>(dir: P, extension: &str) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();
        let normalized_ext = extension.trim_start_matches('.');

        for entry in WalkDir::new(dir.as_ref()).follow_links(true).sort_by_file_name() {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if path.is_file() {
                if let Some(ext) = path.extension() {
                    if ext.to_string_lossy().eq_ignore_ascii_case(normalized_ext) {
                        result.push(path.to_path_buf());
                    }
                }
            }
        }

        Ok(result)
    }

    /// Turn a user selection into a list of input files.
    ///
    /// Directories expand to the subtitle files beneath them; files are kept
    /// whatever their extension; paths that do not exist are dropped.
    pub fn expand_selection<P: AsRef<Path>>(paths: &[P], extension: &str) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();

        for path in paths {
            let path = path.as_ref();
            if Self::dir_exists(path) {
                let found = Self::find_files(path, extension)
                    .with_context(|| format!("Failed to scan directory: {:?}", path))?;
                if found.is_empty() {
                    warn!("No .{} files found in {:?}", extension, path);
                }
                result.extend(found);
            } else if Self::file_exists(path) {
                result.push(path.to_path_buf());
            } else {
                warn!("Ignoring missing path: {:?}", path);
            }
        }

        Ok(result)
    }

    /// Detect if a file is an ASS/SSA subtitle file
    pub fn detect_file_type<P: AsRef<Path>>(path: P) -> Result<FileType> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(anyhow::anyhow!("File does not exist: {:?}", path));
        }

        if let Some(ext) = path.extension() {
            let ext_str = ext.to_string_lossy().to_lowercase();
            if ext_str == "ass" || ext_str == "ssa" {
                return Ok(FileType::Subtitle);
            }
        }

        // Fall back to examining the first lines of the file
        let file = fs::File::open(path)
            .with_context(|| format!("Failed to open file: {:?}", path))?;
        let looks_like_subtitle = BufReader::new(file)
            .lines()
            .take(SNIFF_LINES)
            .map_while(|line| line.ok())
            .any(|line| {
                let trimmed = line.trim_start_matches('\u{feff}').trim();
                trimmed.eq_ignore_ascii_case("[Script Info]") || trimmed.starts_with("Dialogue:")
            });

        if looks_like_subtitle {
            return Ok(FileType::Subtitle);
        }

        Ok(FileType::Unknown)
    }
}

/// Enum representing different file types
#[derive(Debug, PartialEq, Eq)]
pub enum FileType {
    /// Advanced SubStation Alpha subtitle
    Subtitle,
    /// Unknown file type
    Unknown,
}
