use anyhow::{Context, Result};
use dialoguer::{Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use log::warn;
use std::path::PathBuf;
use crate::app_controller::Controller;
use crate::file_utils::FileManager;
use crate::session::{Session, StatusSink};

// @module: Interactive terminal front end

// @const: Separator for several paths typed at one prompt
const PATH_SEPARATOR: char = ';';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    SelectFiles,
    SelectOutputDir,
    Convert,
    Quit,
}

/// Status log printed to the terminal, routed through the progress bar
/// while one is on screen
#[derive(Default)]
pub struct TerminalSink {
    progress: Option<ProgressBar>,
}

impl TerminalSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StatusSink for TerminalSink {
    fn append(&mut self, line: &str) {
        match &self.progress {
            Some(pb) if !pb.is_hidden() && !pb.is_finished() => pb.println(line),
            _ => println!("{}", line),
        }
    }
}

/// Split a prompt answer into paths, dropping blanks and surrounding quotes
pub fn parse_path_list(input: &str) -> Vec<PathBuf> {
    input
        .split(PATH_SEPARATOR)
        .map(|part| part.trim().trim_matches('"').trim_matches('\''))
        .filter(|part| !part.is_empty())
        .map(PathBuf::from)
        .collect()
}

/// Run the menu loop until the user quits
pub fn run(controller: &Controller) -> Result<()> {
    let mut session = Session::new();
    let mut sink = TerminalSink::new();
    let extension = controller.config().input_extension.clone();

    loop {
        let mut actions = vec![
            (Action::SelectFiles, format!("1. Select Subtitle Files (.{})", extension)),
            (Action::SelectOutputDir, "2. Select Output Folder".to_string()),
        ];
        if session.is_ready() {
            actions.push((Action::Convert, "3. Convert".to_string()));
        }
        actions.push((Action::Quit, "Quit".to_string()));

        let labels: Vec<&str> = actions.iter().map(|(_, label)| label.as_str()).collect();
        let selection = Select::new()
            .with_prompt("Subtitle to DOCX Converter")
            .items(&labels)
            .default(0)
            .interact_opt()
            .context("Failed to show selection dialog")?;

        let action = match selection {
            Some(idx) => actions[idx].0,
            None => Action::Quit,
        };

        match action {
            Action::SelectFiles => select_files(controller, &mut session, &mut sink)?,
            Action::SelectOutputDir => select_output_dir(&mut session, &mut sink)?,
            Action::Convert => convert(controller, &mut session, &mut sink),
            Action::Quit => return Ok(()),
        }
    }
}

fn select_files(controller: &Controller, session: &mut Session, sink: &mut TerminalSink) -> Result<()> {
    let extension = &controller.config().input_extension;
    let answer: String = Input::new()
        .with_prompt(format!(
            "Subtitle files or folders (*.{}, any file accepted, separate with '{}')",
            extension, PATH_SEPARATOR
        ))
        .allow_empty(true)
        .interact_text()
        .context("Failed to read input files")?;

    let paths = parse_path_list(&answer);
    match FileManager::expand_selection(&paths, extension) {
        Ok(files) => session.select_input_files(files, sink),
        Err(e) => {
            warn!("Could not expand selection: {:#}", e);
            session.select_input_files(Vec::new(), sink);
        }
    }
    Ok(())
}

fn select_output_dir(session: &mut Session, sink: &mut TerminalSink) -> Result<()> {
    let mut input = Input::<String>::new()
        .with_prompt("Output folder")
        .allow_empty(true);
    if let Some(dir) = session.output_dir().map(PathBuf::from).or_else(dirs::document_dir) {
        input = input.default(dir.display().to_string());
    }
    let answer = input.interact_text().context("Failed to read output folder")?;

    let dir = match parse_path_list(&answer).into_iter().next() {
        Some(dir) => dir,
        None => {
            session.select_output_dir(PathBuf::new(), sink);
            return Ok(());
        }
    };

    if let Err(e) = FileManager::ensure_dir(&dir) {
        sink.append(&format!("Error: Could not use output folder {}: {}", dir.display(), e));
        return Ok(());
    }
    session.select_output_dir(dir, sink);
    Ok(())
}

fn convert(controller: &Controller, session: &mut Session, sink: &mut TerminalSink) {
    let progress = ProgressBar::new(session.input_files().len() as u64);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    progress.set_style(style);

    sink.progress = Some(progress.clone());
    controller.convert_session(session, sink, &progress);
    sink.progress = None;
}
