use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use crate::errors::AppError;

// @const: Widest page Word accepts (22 inches)
pub const MAX_TABLE_WIDTH_PT: u32 = 1584;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Extension of subtitle files picked up when a folder is selected
    #[serde(default = "default_input_extension")]
    pub input_extension: String,

    /// Transcript document settings
    #[serde(default)]
    pub document: DocumentConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Transcript document layout
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DocumentConfig {
    // @field: Title heading text
    #[serde(default = "default_heading")]
    pub heading: String,

    // @field: Speaker column width in points
    #[serde(default = "default_speaker_column_width_pt")]
    pub speaker_column_width_pt: u32,

    // @field: Dialogue column width in points
    #[serde(default = "default_dialogue_column_width_pt")]
    pub dialogue_column_width_pt: u32,

    // @field: Extension of generated documents
    #[serde(default = "default_output_extension")]
    pub output_extension: String,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            heading: default_heading(),
            speaker_column_width_pt: default_speaker_column_width_pt(),
            dialogue_column_width_pt: default_dialogue_column_width_pt(),
            output_extension: default_output_extension(),
        }
    }
}

/// Log level configuration
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_input_extension() -> String {
    "ass".to_string()
}

fn default_heading() -> String {
    "Subtitle Transcript".to_string()
}

fn default_speaker_column_width_pt() -> u32 {
    100
}

fn default_dialogue_column_width_pt() -> u32 {
    400
}

fn default_output_extension() -> String {
    "docx".to_string()
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<(), AppError> {
        validate_extension("input_extension", &self.input_extension)?;
        validate_extension("document.output_extension", &self.document.output_extension)?;

        if self.document.heading.trim().is_empty() {
            return Err(AppError::Config("document.heading must not be empty".to_string()));
        }

        let speaker = self.document.speaker_column_width_pt;
        let dialogue = self.document.dialogue_column_width_pt;
        if speaker == 0 || dialogue == 0 {
            return Err(AppError::Config("Column widths must be greater than zero".to_string()));
        }
        if speaker.saturating_add(dialogue) > MAX_TABLE_WIDTH_PT {
            return Err(AppError::Config(format!(
                "Column widths together must not exceed {}pt, got {}pt",
                MAX_TABLE_WIDTH_PT,
                speaker.saturating_add(dialogue)
            )));
        }
        if speaker >= dialogue {
            return Err(AppError::Config(format!(
                "Speaker column ({}pt) must be narrower than dialogue column ({}pt)",
                speaker, dialogue
            )));
        }

        Ok(())
    }

    /// Load the configuration from a JSON file, writing the defaults there
    /// first when the file does not exist yet
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if path.exists() {
            let file = File::open(path)
                .with_context(|| format!("Failed to open config file: {}", path.display()))?;
            let reader = BufReader::new(file);
            let config: Config = serde_json::from_reader(reader)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            return Ok(config);
        }

        warn!("Config file not found at '{}', creating default config.", path.display());
        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;
        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write default config to file: {}", path.display()))?;

        Ok(config)
    }
}

fn validate_extension(field: &str, extension: &str) -> Result<(), AppError> {
    if extension.is_empty() {
        return Err(AppError::Config(format!("{} must not be empty", field)));
    }
    if extension.starts_with('.') {
        return Err(AppError::Config(format!(
            "{} must not start with a dot: {}",
            field, extension
        )));
    }
    Ok(())
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            input_extension: default_input_extension(),
            document: DocumentConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
