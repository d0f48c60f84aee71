use std::collections::VecDeque;
use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use regex::Regex;
use once_cell::sync::Lazy;
use log::{debug, trace};
use crate::errors::SubtitleError;

// @module: Dialogue extraction from Advanced SubStation Alpha files

// @const: Dialogue event line
// Fields: layer, start, end, style, name, margin_l, margin_r, margin_v, effect, text.
// Only name (1) and text (2) are captured; text keeps its commas.
static DIALOGUE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^Dialogue: [^,]+,[^,]+,[^,]+,[^,]+,([^,]*),[^,]+,[^,]+,[^,]+,[^,]*,(.*)$").unwrap()
});

// @const: Override tag block such as {\i1} or {\pos(10,20)}
static OVERRIDE_TAG_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{[^}]+\}").unwrap()
});

// @const: In-text hard line break
const LINE_BREAK_MARKER: &str = "\\N";

/// Remove override tags and turn `\N` line breaks into spaces.
///
/// The result is not trimmed, so applying this twice gives the same text
/// as applying it once.
pub fn clean_dialogue_text(text: &str) -> String {
    OVERRIDE_TAG_REGEX
        .replace_all(text, "")
        .replace(LINE_BREAK_MARKER, " ")
}

// @struct: Single spoken line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogueLine {
    // @field: Speaker name, trimmed
    pub speaker: String,

    // @field: Dialogue text with markup removed
    pub text: String,
}

impl DialogueLine {
    /// Creates a new dialogue line
    pub fn new(speaker: impl Into<String>, text: impl Into<String>) -> Self {
        DialogueLine {
            speaker: speaker.into(),
            text: text.into(),
        }
    }

    /// Parse one raw line of a subtitle file.
    ///
    /// Returns `None` for anything that is not a dialogue event: section
    /// headers, style definitions, comments and malformed events alike.
    pub fn parse(line: &str) -> Option<Self> {
        let caps = DIALOGUE_REGEX.captures(line)?;
        let speaker = caps.get(1).map_or("", |m| m.as_str()).trim();
        let text = caps.get(2).map_or("", |m| m.as_str()).trim();

        Some(DialogueLine {
            speaker: speaker.to_string(),
            text: clean_dialogue_text(text),
        })
    }
}

impl fmt::Display for DialogueLine {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.speaker, self.text)
    }
}

/// Lazy iterator over the dialogue lines of a subtitle source.
///
/// Lines end at `\n`, `\r\n` or a lone `\r`. Iteration ends at end of input
/// or at the first read error. A read error is never yielded; it is kept and
/// can be inspected with [`DialogueLines::failure`].
pub struct DialogueLines<R: BufRead> {
    reader: R,
    // Lines already split off the last chunk by a lone '\r'
    pending: VecDeque<String>,
    line_number: usize,
    failure: Option<SubtitleError>,
}

impl<R: BufRead> DialogueLines<R> {
    /// Wrap a buffered reader
    pub fn new(reader: R) -> Self {
        DialogueLines {
            reader,
            pending: VecDeque::new(),
            line_number: 0,
            failure: None,
        }
    }

    fn next_raw_line(&mut self) -> Option<io::Result<String>> {
        if let Some(line) = self.pending.pop_front() {
            return Some(Ok(line));
        }

        let mut buf = Vec::new();
        match self.reader.read_until(b'\n', &mut buf) {
            Ok(0) => return None,
            Ok(_) => {}
            Err(e) => return Some(Err(e)),
        }
        if buf.last() == Some(&b'\n') {
            buf.pop();
            if buf.last() == Some(&b'\r') {
                buf.pop();
            }
        }

        let chunk = match String::from_utf8(buf) {
            Ok(chunk) => chunk,
            Err(e) => return Some(Err(io::Error::new(io::ErrorKind::InvalidData, e))),
        };
        let mut parts = chunk.split('\r').map(str::to_string);
        let first = parts.next().unwrap_or_default();
        self.pending.extend(parts);
        Some(Ok(first))
    }

    /// The read error that stopped iteration, if any
    pub fn failure(&self) -> Option<&SubtitleError> {
        self.failure.as_ref()
    }

    /// Consume the iterator and return the read error, if any
    pub fn into_failure(self) -> Option<SubtitleError> {
        self.failure
    }
}

impl<R: BufRead> Iterator for DialogueLines<R> {
    type Item = DialogueLine;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failure.is_some() {
            return None;
        }

        loop {
            let raw = match self.next_raw_line()? {
                Ok(raw) => raw,
                Err(source) => {
                    self.failure = Some(SubtitleError::Read {
                        line: self.line_number + 1,
                        source,
                    });
                    return None;
                }
            };
            self.line_number += 1;

            match DialogueLine::parse(&raw) {
                Some(dialogue) => {
                    trace!("Line {}: {}", self.line_number, dialogue);
                    return Some(dialogue);
                }
                None => trace!("Skipping non-dialogue line {}", self.line_number),
            }
        }
    }
}

/// Dialogue parsed from one source, plus the error that cut it short
#[derive(Debug, Default)]
pub struct ParseOutcome {
    /// Lines in source order
    pub lines: Vec<DialogueLine>,

    /// Set when the source could not be opened or reading stopped early
    pub failure: Option<SubtitleError>,
}

impl ParseOutcome {
    /// True when the whole source was read
    pub fn is_complete(&self) -> bool {
        self.failure.is_none()
    }
}

/// Parse all dialogue lines from a reader.
///
/// Never fails: a read error ends parsing and is returned alongside the
/// lines that were read before it.
pub fn parse_ass_reader<R: BufRead>(reader: R) -> ParseOutcome {
    let mut iter = DialogueLines::new(reader);
    let lines: Vec<DialogueLine> = iter.by_ref().collect();
    ParseOutcome {
        lines,
        failure: iter.into_failure(),
    }
}

/// Parse all dialogue lines from a subtitle file on disk.
///
/// An unopenable file gives an empty outcome carrying the open error.
pub fn parse_ass_file<P: AsRef<Path>>(path: P) -> ParseOutcome {
    let path = path.as_ref();
    let file = match File::open(path) {
        Ok(file) => file,
        Err(source) => {
            return ParseOutcome {
                lines: Vec::new(),
                failure: Some(SubtitleError::Open {
                    path: path.to_path_buf(),
                    source,
                }),
            };
        }
    };

    let outcome = parse_ass_reader(BufReader::new(file));
    debug!("Parsed {} dialogue line(s) from {:?}", outcome.lines.len(), path);
    outcome
}

/// Dialogue of one subtitle file, tagged with where it came from
#[derive(Debug)]
pub struct SubtitleCollection {
    /// Source filename
    pub source_file: PathBuf,

    /// Dialogue lines in source order
    pub lines: Vec<DialogueLine>,
}

impl SubtitleCollection {
    /// Load a subtitle file, keeping partial results on read failure
    pub fn load<P: AsRef<Path>>(path: P) -> (Self, Option<SubtitleError>) {
        let path = path.as_ref();
        let outcome = parse_ass_file(path);
        let collection = SubtitleCollection {
            source_file: path.to_path_buf(),
            lines: outcome.lines,
        };
        (collection, outcome.failure)
    }

    /// True when no dialogue was found
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl fmt::Display for SubtitleCollection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Subtitle Collection")?;
        writeln!(f, "Source: {:?}", self.source_file)?;
        write!(f, "Lines: {}", self.lines.len())
    }
}
