/*!
 * Speaker grouping for transcripts.
 *
 * Consecutive dialogue lines from the same speaker are merged into one
 * group so the document shows a single row per speaker turn.
 */

use std::fmt;
use log::trace;
use crate::subtitle_processor::DialogueLine;

// @const: Separator between merged lines
pub const GROUP_LINE_SEPARATOR: char = '\n';

/// One speaker turn: a contiguous run of lines by the same speaker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogueGroup {
    /// Speaker name shared by every line of the run
    pub speaker: String,

    /// Texts of the run joined by line breaks
    pub text: String,

    /// Number of dialogue lines merged into this group
    pub line_count: usize,
}

impl DialogueGroup {
    /// Start a group from its first line
    pub fn from_line(line: DialogueLine) -> Self {
        DialogueGroup {
            speaker: line.speaker,
            text: line.text,
            line_count: 1,
        }
    }

    /// Append another line of the same speaker
    pub fn push_text(&mut self, text: &str) {
        self.text.push(GROUP_LINE_SEPARATOR);
        self.text.push_str(text);
        self.line_count += 1;
    }

    /// Lines of the group text in order
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.split(GROUP_LINE_SEPARATOR)
    }
}

impl fmt::Display for DialogueGroup {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.speaker, self.text)
    }
}

/// Merge consecutive lines that share a speaker.
///
/// Speakers are compared with exact string equality, so names that differ
/// only by case are separate speakers. Runs are only merged when adjacent.
pub fn group_by_speaker<I>(lines: I) -> Vec<DialogueGroup>
where
    I: IntoIterator<Item = DialogueLine>,
{
    let mut groups = Vec::new();
    let mut current: Option<DialogueGroup> = None;

    for line in lines {
        match current.as_mut() {
            Some(group) if group.speaker == line.speaker => group.push_text(&line.text),
            _ => {
                if let Some(done) = current.replace(DialogueGroup::from_line(line)) {
                    trace!("Speaker turn {}", done);
                    groups.push(done);
                }
            }
        }
    }

    if let Some(done) = current {
        trace!("Speaker turn {}", done);
        groups.push(done);
    }

    groups
}
