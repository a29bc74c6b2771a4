//! Vertical placement of pre-broken lines onto fixed-size pages.
//!
//! No reflow happens here: the text is already split into lines by the
//! caller, and a line wider than the page is placed as-is.

use super::layout::PageLayout;

/// One line of text anchored at its baseline start.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawText {
    pub text: String,
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub lines: Vec<DrawText>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub pages: Vec<Page>,
}

impl Document {
    pub fn line_count(&self) -> usize {
        self.pages.iter().map(|p| p.lines.len()).sum()
    }

    pub fn lines(&self) -> impl Iterator<Item = &DrawText> {
        self.pages.iter().flat_map(|p| p.lines.iter())
    }
}

/// Split text into the segments the paginator places.
///
/// Empty text has no segments. A `\r` left over from CRLF endings is dropped.
pub fn split_lines(text: &str) -> Vec<&str> {
    if text.is_empty() {
        return Vec::new();
    }
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect()
}

/// Assign every line of `text` a position on a sequence of pages.
///
/// The cursor starts at `top_margin` and drops by `line_height` after each
/// line. Once it reaches `bottom_margin` the page is full; the line that
/// filled it stays where it was drawn and the next line (if any) opens a new
/// page back at `top_margin`.
pub fn paginate(text: &str, layout: &PageLayout) -> Document {
    debug_assert!(layout.validate().is_ok(), "invalid page layout: {layout:?}");

    let mut pages = Vec::new();
    let mut current = Page::default();
    let mut cursor = layout.top_margin;
    let mut page_full = false;

    for line in split_lines(text) {
        if page_full {
            pages.push(std::mem::take(&mut current));
            cursor = layout.top_margin;
            page_full = false;
        }

        current.lines.push(DrawText {
            text: line.to_string(),
            x: layout.left_margin,
            y: cursor,
        });
        cursor -= layout.line_height;

        if cursor <= layout.bottom_margin {
            page_full = true;
        }
    }

    pages.push(current);
    Document { pages }
}
