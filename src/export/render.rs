//! Markdown rendering of the report

use unicode_segmentation::UnicodeSegmentation;

pub const DEFAULT_WIDTH: usize = 80;

const BULLET: &str = "- ";
const CONTINUATION: &str = "  ";

/// How item lines are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WrapMode {
    /// One line per item, however long
    None,
    /// Greedy word wrap at this many characters
    Width(usize),
}

impl Default for WrapMode {
    fn default() -> Self {
        WrapMode::Width(DEFAULT_WIDTH)
    }
}

impl WrapMode {
    pub fn new(wrap: bool, width: usize) -> Self {
        if wrap {
            WrapMode::Width(width)
        } else {
            WrapMode::None
        }
    }
}

/// The rendered report: a header and the item lines beneath it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportDocument {
    pub header: String,
    pub lines: Vec<String>,
}

impl ExportDocument {
    pub fn render<'a, I>(titles: I, mode: WrapMode) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut count = 0;
        let mut lines = Vec::new();
        for title in titles {
            count += 1;
            lines.extend(wrap_item(title, mode));
        }

        Self {
            header: format!("# Today's Reminders ({})", count),
            lines,
        }
    }

    pub fn to_markdown(&self) -> String {
        let mut output = format!("{}\n\n", self.header);
        for line in &self.lines {
            output.push_str(line);
            output.push('\n');
        }
        output
    }
}

/// Render one title as a bullet, wrapping it per `mode`.
///
/// Lengths are counted in user-perceived characters (extended grapheme
/// clusters). Words are the non-empty runs between spaces. A word is appended to the
/// current line while the result stays within the width; otherwise the line is
/// flushed and the word starts an indented continuation line. A word too long
/// for any line still gets a line of its own, so no bullet is ever left empty.
pub fn wrap_item(title: &str, mode: WrapMode) -> Vec<String> {
    let width = match mode {
        WrapMode::None => return vec![format!("{}{}", BULLET, title)],
        WrapMode::Width(width) => width,
    };

    let mut lines = Vec::new();
    let mut current = String::from(BULLET);
    let mut current_len = BULLET.len();
    let mut line_has_word = false;

    for word in title.split(' ').filter(|w| !w.is_empty()) {
        let word_len = word.graphemes(true).count();

        if !line_has_word {
            current.push_str(word);
            current_len += word_len;
            line_has_word = true;
        } else if current_len + 1 + word_len <= width {
            current.push(' ');
            current.push_str(word);
            current_len += 1 + word_len;
        } else {
            lines.push(std::mem::replace(
                &mut current,
                format!("{}{}", CONTINUATION, word),
            ));
            current_len = CONTINUATION.len() + word_len;
        }
    }

    lines.push(current);
    lines
}
