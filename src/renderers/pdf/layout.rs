use lopdf::content::Operation;
use lopdf::{Object, StringFormat};

use super::fonts::{to_win_ansi, Font};

/// A4 in points
pub const PAGE_WIDTH: f32 = 595.2756;
pub const PAGE_HEIGHT: f32 = 841.8898;

pub fn cm(value: f32) -> f32 {
    value * 72.0 / 2.54
}

#[derive(Debug, Clone, Copy)]
pub struct TextStyle {
    pub font: Font,
    pub size: f32,
    pub leading: f32,
    pub space_before: f32,
    pub space_after: f32,
}

pub type Color = [f32; 3];

pub const BLACK: Color = [0.0, 0.0, 0.0];
pub const BLUE: Color = [0.0, 0.0, 1.0];

/// A clickable area pointing to an external URI
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    /// `[llx, lly, urx, ury]` in PDF user space
    pub rect: [f32; 4],
    pub uri: String,
}

#[derive(Debug, Default)]
pub struct Page {
    pub operations: Vec<Operation>,
    pub links: Vec<Link>,
}

/// An outline entry pointing at a position on a page
#[derive(Debug, Clone, PartialEq)]
pub struct Bookmark {
    pub title: String,
    pub page: usize,
    /// Vertical position in PDF user space
    pub top: f32,
}

/// Single column flow layout. The cursor measures the distance from the top
/// edge of the current page; content that does not fit moves to a new page.
pub struct Typesetter {
    pages: Vec<Page>,
    bookmarks: Vec<Bookmark>,
    cursor: f32,
    margin_left: f32,
    margin_right: f32,
    margin_top: f32,
    margin_bottom: f32,
}

impl Typesetter {
    pub fn new(margin_horizontal: f32, margin_top: f32, margin_bottom: f32) -> Self {
        Self {
            pages: vec![Page::default()],
            bookmarks: Vec::new(),
            cursor: margin_top,
            margin_left: margin_horizontal,
            margin_right: margin_horizontal,
            margin_top,
            margin_bottom,
        }
    }

    pub fn left(&self) -> f32 {
        self.margin_left
    }

    pub fn content_width(&self) -> f32 {
        PAGE_WIDTH - self.margin_left - self.margin_right
    }

    pub fn cursor(&self) -> f32 {
        self.cursor
    }

    pub fn page_index(&self) -> usize {
        self.pages.len() - 1
    }

    fn at_page_top(&self) -> bool {
        self.cursor <= self.margin_top
    }

    fn remaining(&self) -> f32 {
        PAGE_HEIGHT - self.margin_bottom - self.cursor
    }

    pub fn new_page(&mut self) {
        self.pages.push(Page::default());
        self.cursor = self.margin_top;
    }

    /// Starts a new page unless `height` still fits on the current one
    pub fn ensure_space(&mut self, height: f32) {
        if height > self.remaining() && !self.at_page_top() {
            self.new_page();
        }
    }

    /// Vertical space; dropped at the top of a page
    pub fn space(&mut self, height: f32) {
        if self.at_page_top() {
            return;
        }
        if height >= self.remaining() {
            self.new_page();
        } else {
            self.cursor += height;
        }
    }

    /// Moves the cursor down to `cursor` if that is further down the page
    pub fn advance_to(&mut self, cursor: f32) {
        self.cursor = self.cursor.max(cursor);
    }

    /// Records an outline entry at the current position
    pub fn bookmark(&mut self, title: &str) {
        self.bookmarks.push(Bookmark {
            title: title.to_string(),
            page: self.page_index(),
            top: PAGE_HEIGHT - self.cursor,
        });
    }

    /// Writes one line at horizontal offset `x` and returns the baseline in
    /// PDF user space
    pub fn line(&mut self, x: f32, text: &str, style: &TextStyle, color: Color) -> f32 {
        let baseline = self.next_line(style);
        self.text_at(x, baseline, text, style.font, style.size, color);
        baseline
    }

    /// Reserves one line and returns its baseline in PDF user space
    pub fn next_line(&mut self, style: &TextStyle) -> f32 {
        self.ensure_space(style.leading);
        let baseline = PAGE_HEIGHT - (self.cursor + style.size);
        self.cursor += style.leading;
        baseline
    }

    /// Writes wrapped text with its spacing. Newlines force line breaks.
    pub fn paragraph(&mut self, text: &str, style: &TextStyle, x: f32, width: f32) {
        self.space(style.space_before);
        for hard_line in text.split('\n') {
            let lines = wrap_text(hard_line, style.font, style.size, width);
            if lines.is_empty() {
                self.ensure_space(style.leading);
                self.cursor += style.leading;
            }
            for line in lines {
                self.line(x, &line, style, BLACK);
            }
        }
        self.space(style.space_after);
    }

    /// Draws text with its baseline at `baseline` on the current page
    pub fn text_at(&mut self, x: f32, baseline: f32, text: &str, font: Font, size: f32, color: Color) {
        let operations = text_operations(x, baseline, text, font, size, color);
        self.current_page().operations.extend(operations);
    }

    /// Places an image XObject with its top-left corner at (`x`, cursor)
    /// without moving the cursor
    pub fn image_at(&mut self, name: &str, x: f32, width: f32, height: f32) {
        let bottom = PAGE_HEIGHT - self.cursor - height;
        let page = self.current_page();
        page.operations.extend([
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    width.into(),
                    0.into(),
                    0.into(),
                    height.into(),
                    x.into(),
                    bottom.into(),
                ],
            ),
            Operation::new("Do", vec![Object::Name(name.as_bytes().to_vec())]),
            Operation::new("Q", vec![]),
        ]);
    }

    pub fn link(&mut self, rect: [f32; 4], uri: &str) {
        self.current_page().links.push(Link {
            rect,
            uri: uri.to_string(),
        });
    }

    fn current_page(&mut self) -> &mut Page {
        let index = self.page_index();
        &mut self.pages[index]
    }

    pub fn finish(self) -> (Vec<Page>, Vec<Bookmark>) {
        (self.pages, self.bookmarks)
    }
}

/// Operations drawing one run of text. WinAnsi fonts get their text
/// transcoded; symbol font text is passed through as character codes.
pub fn text_operations(x: f32, baseline: f32, text: &str, font: Font, size: f32, color: Color) -> Vec<Operation> {
    let encoded = match font {
        Font::ZapfDingbats => text.bytes().collect(),
        _ => to_win_ansi(text),
    };
    vec![
        Operation::new("BT", vec![]),
        Operation::new(
            "Tf",
            vec![Object::Name(font.resource_name().as_bytes().to_vec()), size.into()],
        ),
        Operation::new("rg", color.iter().map(|c| (*c).into()).collect()),
        Operation::new("Td", vec![x.into(), baseline.into()]),
        Operation::new("Tj", vec![Object::String(encoded, StringFormat::Literal)]),
        Operation::new("ET", vec![]),
    ]
}

/// Greedy word wrap. Words wider than `width` are broken between characters.
pub fn wrap_text(text: &str, font: Font, size: f32, width: f32) -> Vec<String> {
    let space = font.text_width(" ", size);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0.0;

    for word in text.split_whitespace() {
        let word_width = font.text_width(word, size);

        if word_width > width {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let mut pieces = break_word(word, font, size, width);
            let last = pieces.pop().unwrap_or_default();
            lines.extend(pieces);
            current_width = font.text_width(&last, size);
            current = last;
            continue;
        }

        if current.is_empty() {
            current.push_str(word);
            current_width = word_width;
        } else if current_width + space + word_width <= width {
            current.push(' ');
            current.push_str(word);
            current_width += space + word_width;
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
            current_width = word_width;
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Splits `text` into pieces no wider than `width` (at least one char each)
pub fn break_word(text: &str, font: Font, size: f32, width: f32) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut current = String::new();
    for c in text.chars() {
        let mut candidate = current.clone();
        candidate.push(c);
        if !current.is_empty() && font.text_width(&candidate, size) > width {
            pieces.push(std::mem::take(&mut current));
            current.push(c);
        } else {
            current = candidate;
        }
    }
    if !current.is_empty() {
        pieces.push(current);
    }
    pieces
}
