use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use cardboard_core::CardData;

use crate::color;

const MAX_TITLE_WIDTH: usize = 32;
const MAX_CONTENT_WIDTH: usize = 56;
const MAX_LINK_WIDTH: usize = 40;
const MAX_IMAGE_WIDTH: usize = 24;

/// Box-drawn table of cards, one row per card in source order.
pub struct CardTable {
    index_width: usize,
    title_width: usize,
    content_width: usize,
    link_width: usize,
    image_width: usize,
}

struct Row {
    index: String,
    title: String,
    content: String,
    link: String,
    image: String,
}

impl Row {
    fn from_card(position: usize, card: &CardData) -> Self {
        Self {
            index: (position + 1).to_string(),
            title: truncate(&card.title, MAX_TITLE_WIDTH),
            content: truncate(&single_line(&card.content), MAX_CONTENT_WIDTH),
            link: truncate(card.url.as_deref().unwrap_or("-"), MAX_LINK_WIDTH),
            image: truncate(&card.image_or_default().alt, MAX_IMAGE_WIDTH),
        }
    }
}

impl CardTable {
    pub fn new(cards: &[CardData]) -> Self {
        // Minimum widths = header label lengths
        let mut table = Self {
            index_width: "#".len(),
            title_width: "Title".len(),
            content_width: "Content".len(),
            link_width: "Link".len(),
            image_width: "Image".len(),
        };
        for (i, card) in cards.iter().enumerate() {
            let row = Row::from_card(i, card);
            table.index_width = table.index_width.max(display_width(&row.index));
            table.title_width = table.title_width.max(display_width(&row.title));
            table.content_width = table.content_width.max(display_width(&row.content));
            table.link_width = table.link_width.max(display_width(&row.link));
            table.image_width = table.image_width.max(display_width(&row.image));
        }
        table
    }

    /// Render the whole table, trailing newline included.
    pub fn render(&self, cards: &[CardData]) -> String {
        let mut out = String::new();
        for line in [self.border('┌', '┬', '┐'), self.header_row(), self.border('├', '┼', '┤')] {
            out.push_str(&line);
            out.push('\n');
        }
        for (i, card) in cards.iter().enumerate() {
            out.push_str(&self.row(&Row::from_card(i, card)));
            out.push('\n');
        }
        out.push_str(&self.border('└', '┴', '┘'));
        out.push('\n');
        out
    }

    fn widths(&self) -> [usize; 5] {
        [
            self.index_width,
            self.title_width,
            self.content_width,
            self.link_width,
            self.image_width,
        ]
    }

    fn border(&self, left: char, mid: char, right: char) -> String {
        let segments: Vec<String> = self.widths().iter().map(|w| "─".repeat(w + 2)).collect();
        color::muted(&format!(
            "{left}{}{right}",
            segments.join(&mid.to_string())
        ))
    }

    fn header_row(&self) -> String {
        let sep = color::muted("│");
        format!(
            "{sep} {} {sep} {} {sep} {} {sep} {} {sep} {} {sep}",
            color::bold(&pad("#", self.index_width)),
            color::bold(&pad("Title", self.title_width)),
            color::bold(&pad("Content", self.content_width)),
            color::bold(&pad("Link", self.link_width)),
            color::bold(&pad("Image", self.image_width)),
        )
    }

    fn row(&self, row: &Row) -> String {
        let sep = color::muted("│");
        let link = if row.link == "-" {
            color::muted(&pad(&row.link, self.link_width))
        } else {
            color::link(&pad(&row.link, self.link_width))
        };
        format!(
            "{sep} {} {sep} {} {sep} {} {sep} {} {sep} {} {sep}",
            color::muted(&pad(&row.index, self.index_width)),
            color::title(&pad(&row.title, self.title_width)),
            pad(&row.content, self.content_width),
            link,
            pad(&row.image, self.image_width),
        )
    }
}

/// Terminal display width. Wide characters (CJK, emoji) count as 2 columns.
pub(crate) fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Pad a string to a minimum display width without truncating.
pub(crate) fn pad(s: &str, min_width: usize) -> String {
    let width = display_width(s);
    if width >= min_width {
        s.to_string()
    } else {
        format!("{}{}", s, " ".repeat(min_width - width))
    }
}

/// Cut a string to at most `max_width` display columns, ending in `…` when cut.
pub(crate) fn truncate(s: &str, max_width: usize) -> String {
    if display_width(s) <= max_width {
        return s.to_string();
    }
    let budget = max_width.saturating_sub(1);
    let mut out = String::new();
    let mut used = 0;
    for ch in s.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(ch);
    }
    out.push('…');
    out
}

fn single_line(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
