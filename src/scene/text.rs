use super::{Color, Point, Rect, Size};

/// Extra margin around the text extent used for hit testing, selection and snapping.
pub const TEXT_BOUNDS_PADDING: f64 = 10.0;
pub const TEXT_FONT_SIZE_MIN: u32 = 6;
pub const TEXT_FONT_SIZE_MAX: u32 = 72;

const DEFAULT_FONT_FAMILY: &str = "Sans";
const DEFAULT_FONT_SIZE: u32 = 14;
const ESTIMATED_CHAR_WIDTH_RATIO: f64 = 0.6;
const LINE_HEIGHT_RATIO: f64 = 1.3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextFont {
    pub family: String,
    pub point_size: u32,
    pub bold: bool,
}

impl Default for TextFont {
    fn default() -> Self {
        Self {
            family: DEFAULT_FONT_FAMILY.to_string(),
            point_size: DEFAULT_FONT_SIZE,
            bold: false,
        }
    }
}

impl TextFont {
    pub fn new(family: impl Into<String>, point_size: u32, bold: bool) -> Self {
        let family = family.into();
        Self {
            family: if family.trim().is_empty() {
                DEFAULT_FONT_FAMILY.to_string()
            } else {
                family
            },
            point_size: clamp_point_size(point_size),
            bold,
        }
    }

    /// Font read back from a layout file. The size is kept as stored, since only the
    /// toolbar is limited to the 6 to 72 pt range.
    pub fn stored(family: impl Into<String>, point_size: u32, bold: bool) -> Self {
        Self {
            point_size: point_size.max(1),
            ..Self::new(family, DEFAULT_FONT_SIZE, bold)
        }
    }

    pub fn set_family(&mut self, family: impl Into<String>) {
        let family = family.into();
        if !family.trim().is_empty() {
            self.family = family;
        }
    }

    pub fn set_point_size(&mut self, point_size: u32) {
        self.point_size = clamp_point_size(point_size);
    }

    /// Device pixels at 96 dpi.
    pub fn pixel_size(&self) -> f64 {
        f64::from(self.point_size) * 96.0 / 72.0
    }

    pub fn line_height(&self) -> f64 {
        (self.pixel_size() * LINE_HEIGHT_RATIO).max(2.0)
    }
}

const fn clamp_point_size(point_size: u32) -> u32 {
    if point_size < TEXT_FONT_SIZE_MIN {
        TEXT_FONT_SIZE_MIN
    } else if point_size > TEXT_FONT_SIZE_MAX {
        TEXT_FONT_SIZE_MAX
    } else {
        point_size
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextItem {
    pub id: u64,
    pub x: f64,
    pub y: f64,
    pub content: String,
    cursor_chars: usize,
    pub font: TextFont,
    pub color: Color,
    measured_size: Option<Size>,
}

impl TextItem {
    pub fn new(id: u64, position: Point, text: impl Into<String>, font: TextFont) -> Self {
        let content = text.into();
        let cursor_chars = content.chars().count();
        Self {
            id,
            x: position.x,
            y: position.y,
            content,
            cursor_chars,
            font,
            color: Color::BLACK,
            measured_size: None,
        }
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn lines(&self) -> Vec<&str> {
        if self.content.is_empty() {
            vec![""]
        } else {
            self.content.split('\n').collect()
        }
    }

    /// Extent of the rendered text. Uses the toolkit measurement when one has been
    /// recorded for the current content and font, else a character-count estimate.
    pub fn content_size(&self) -> Size {
        self.measured_size
            .unwrap_or_else(|| estimate_content_size(&self.lines(), &self.font))
    }

    pub fn set_measured_size(&mut self, size: Size) {
        if size.width.is_finite() && size.height.is_finite() {
            self.measured_size = Some(Size::new(size.width.max(0.0), size.height.max(0.0)));
        }
    }

    pub fn has_measured_size(&self) -> bool {
        self.measured_size.is_some()
    }

    pub fn local_bounds(&self) -> Rect {
        Rect::from_origin_size(Point::default(), self.content_size()).inflated(TEXT_BOUNDS_PADDING)
    }

    pub fn bounds(&self) -> Rect {
        self.local_bounds().translated(self.x, self.y)
    }

    pub fn set_font(&mut self, font: TextFont) {
        if self.font != font {
            self.font = font;
            self.measured_size = None;
        }
    }

    pub fn insert_char(&mut self, c: char) {
        let byte_index = self.byte_index_for_cursor(self.cursor_chars);
        self.content.insert(byte_index, c);
        self.cursor_chars = self.cursor_chars.saturating_add(1);
        self.measured_size = None;
    }

    pub fn insert_newline(&mut self) {
        self.insert_char('\n');
    }

    pub fn delete_backward(&mut self) -> bool {
        if self.cursor_chars() == 0 {
            return false;
        }
        let end = self.byte_index_for_cursor(self.cursor_chars);
        let start = self.byte_index_for_cursor(self.cursor_chars.saturating_sub(1));
        if start >= end || end > self.content.len() {
            return false;
        }
        self.content.drain(start..end);
        self.cursor_chars = self.cursor_chars.saturating_sub(1);
        self.measured_size = None;
        true
    }

    pub fn cursor_chars(&self) -> usize {
        self.cursor_chars.min(self.content.chars().count())
    }

    pub fn move_cursor_left(&mut self) -> bool {
        if self.cursor_chars() == 0 {
            return false;
        }
        self.cursor_chars = self.cursor_chars().saturating_sub(1);
        true
    }

    pub fn move_cursor_right(&mut self) -> bool {
        if self.cursor_chars() >= self.content.chars().count() {
            return false;
        }
        self.cursor_chars = self.cursor_chars().saturating_add(1);
        true
    }

    pub fn move_cursor_up(&mut self) -> bool {
        self.move_cursor_vertically(-1)
    }

    pub fn move_cursor_down(&mut self) -> bool {
        self.move_cursor_vertically(1)
    }

    pub fn move_cursor_to_end(&mut self) {
        self.cursor_chars = self.content.chars().count();
    }

    /// Zero-based (line, column) of the edit cursor, in characters.
    pub fn cursor_line_column(&self) -> (usize, usize) {
        let mut line = 0_usize;
        let mut column = 0_usize;
        let cursor = self.cursor_chars();
        for (index, ch) in self.content.chars().enumerate() {
            if index >= cursor {
                break;
            }
            if ch == '\n' {
                line = line.saturating_add(1);
                column = 0;
            } else {
                column = column.saturating_add(1);
            }
        }
        (line, column)
    }

    fn byte_index_for_cursor(&self, cursor_chars: usize) -> usize {
        let cursor_chars = cursor_chars.min(self.content.chars().count());
        self.content
            .char_indices()
            .nth(cursor_chars)
            .map(|(index, _)| index)
            .unwrap_or(self.content.len())
    }

    fn cursor_index_for_line_column(&self, target_line: usize, target_column: usize) -> usize {
        let mut line = 0_usize;
        let mut column = 0_usize;
        for (index, ch) in self.content.chars().enumerate() {
            if line == target_line && column == target_column {
                return index;
            }
            if ch == '\n' {
                if line == target_line {
                    return index;
                }
                line = line.saturating_add(1);
                column = 0;
            } else {
                column = column.saturating_add(1);
            }
        }
        self.content.chars().count()
    }

    fn move_cursor_vertically(&mut self, delta_lines: i32) -> bool {
        let lines = self.content.split('\n').collect::<Vec<_>>();
        if lines.len() <= 1 {
            return false;
        }
        let (line, column) = self.cursor_line_column();
        let target_line = if delta_lines < 0 {
            line.saturating_sub(delta_lines.unsigned_abs() as usize)
        } else {
            line.saturating_add(delta_lines as usize)
        }
        .min(lines.len().saturating_sub(1));
        if target_line == line {
            return false;
        }

        let target_column = column.min(lines[target_line].chars().count());
        let next_cursor = self.cursor_index_for_line_column(target_line, target_column);
        if next_cursor == self.cursor_chars() {
            return false;
        }
        self.cursor_chars = next_cursor;
        true
    }
}

fn estimate_content_size(lines: &[&str], font: &TextFont) -> Size {
    let char_width = font.pixel_size() * ESTIMATED_CHAR_WIDTH_RATIO;
    let widest = lines
        .iter()
        .map(|line| line.chars().count())
        .max()
        .unwrap_or(0);
    Size::new(
        (widest as f64 * char_width).ceil(),
        (lines.len() as f64 * font.line_height()).ceil(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(content: &str) -> TextItem {
        TextItem::new(1, Point::new(100.0, 50.0), content, TextFont::default())
    }

    #[test]
    fn font_size_is_clamped_to_toolbar_range() {
        let mut font = TextFont::new("Serif", 2, true);
        assert_eq!(font.point_size, TEXT_FONT_SIZE_MIN);
        font.set_point_size(500);
        assert_eq!(font.point_size, TEXT_FONT_SIZE_MAX);
        assert_eq!(TextFont::new("  ", 12, false).family, "Sans");
    }

    #[test]
    fn stored_font_keeps_sizes_outside_toolbar_range() {
        assert_eq!(TextFont::stored("Serif", 100, true).point_size, 100);
        assert_eq!(TextFont::stored("Serif", 3, false).point_size, 3);
        assert_eq!(TextFont::stored("", 0, false), TextFont::stored("Sans", 1, false));
    }

    #[test]
    fn bounds_pad_measured_extent_on_every_side() {
        let mut item = text("hello");
        item.set_measured_size(Size::new(40.0, 20.0));
        assert_eq!(item.local_bounds(), Rect::new(-10.0, -10.0, 60.0, 40.0));
        assert_eq!(item.bounds(), Rect::new(90.0, 40.0, 60.0, 40.0));
    }

    #[test]
    fn editing_content_drops_stale_measurement() {
        let mut item = text("ab");
        item.set_measured_size(Size::new(40.0, 20.0));
        item.insert_char('c');
        assert!(!item.has_measured_size());
        assert_eq!(item.content, "abc");

        item.set_measured_size(Size::new(40.0, 20.0));
        item.set_font(TextFont::new("Sans", 14, false));
        assert!(item.has_measured_size(), "same font keeps measurement");
        item.set_font(TextFont::new("Sans", 20, false));
        assert!(!item.has_measured_size());
    }

    #[test]
    fn estimate_grows_with_widest_line_and_line_count() {
        let single = text("abcd").content_size();
        let multi = text("abcd\nabcdefgh\nx").content_size();
        assert!(multi.width > single.width);
        assert!(multi.height > single.height * 2.0);
    }

    #[test]
    fn cursor_editing_handles_multibyte_and_lines() {
        let mut item = text("가나");
        assert!(item.delete_backward());
        assert_eq!(item.content, "가");
        item.insert_newline();
        item.insert_char('x');
        assert_eq!(item.content, "가\nx");
        assert_eq!(item.cursor_line_column(), (1, 1));

        assert!(item.move_cursor_up());
        assert_eq!(item.cursor_line_column(), (0, 1));
        assert!(!item.move_cursor_up());
        assert!(item.move_cursor_down());
        assert!(item.move_cursor_left());
        item.insert_char('y');
        assert_eq!(item.content, "가\nyx");
    }

    #[test]
    fn delete_backward_at_start_is_noop() {
        let mut item = text("");
        assert!(!item.delete_backward());
        assert!(!item.move_cursor_left());
        assert!(!item.move_cursor_right());
    }
}
