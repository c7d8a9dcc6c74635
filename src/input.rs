use ratatui::text::Span;

/// Single-line text field for the "new task" input.
///
/// `cursor` counts chars, not bytes.
#[derive(Debug, Clone, Default)]
pub struct InputField {
    value: String,
    cursor: usize,
}

impl InputField {
    pub fn new() -> Self {
        InputField::default()
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_index)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }

    fn char_len(&self) -> usize {
        self.value.chars().count()
    }

    pub fn insert_char(&mut self, c: char) {
        let at = self.byte_index(self.cursor);
        self.value.insert(at, c);
        self.cursor += 1;
    }

    /// Backspace.
    pub fn delete_char(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let at = self.byte_index(self.cursor - 1);
        self.value.remove(at);
        self.cursor -= 1;
    }

    /// Delete the char under the cursor.
    pub fn delete_forward(&mut self) {
        if self.cursor >= self.char_len() {
            return;
        }
        let at = self.byte_index(self.cursor);
        self.value.remove(at);
    }

    pub fn move_cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor < self.char_len() {
            self.cursor += 1;
        }
    }

    pub fn move_to_start(&mut self) {
        self.cursor = 0;
    }

    pub fn move_to_end(&mut self) {
        self.cursor = self.char_len();
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    /// Tail of the value that fits in `width` terminal cells with the cursor
    /// on screen, and the cursor's column within it.
    ///
    /// Columns are display cells, so a wide char moves the cursor by two.
    pub fn visible(&self, width: u16) -> (&str, u16) {
        let width = usize::from(width);
        if width == 0 {
            return ("", 0);
        }

        let mut cursor_col: usize = self.value.chars().take(self.cursor).map(char_width).sum();
        let mut scroll = 0;
        let mut chars = self.value.chars();
        while cursor_col >= width {
            let Some(c) = chars.next() else { break };
            cursor_col -= char_width(c);
            scroll += 1;
        }

        let col = u16::try_from(cursor_col).unwrap_or(u16::MAX);
        (&self.value[self.byte_index(scroll)..], col)
    }
}

fn char_width(c: char) -> usize {
    let mut buf = [0u8; 4];
    Span::raw(&*c.encode_utf8(&mut buf)).width()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(text: &str) -> InputField {
        let mut field = InputField::new();
        text.chars().for_each(|c| field.insert_char(c));
        field
    }

    #[test]
    fn typing_appends_and_advances_cursor() {
        let field = typed("milk");
        assert_eq!(field.value(), "milk");
        assert_eq!(field.cursor(), 4);
    }

    #[test]
    fn insert_in_middle() {
        let mut field = typed("Buymilk");
        (0..4).for_each(|_| field.move_cursor_left());
        field.insert_char(' ');
        assert_eq!(field.value(), "Buy milk");
        assert_eq!(field.cursor(), 4);
    }

    #[test]
    fn backspace_and_delete_forward() {
        let mut field = typed("abc");
        field.delete_char();
        assert_eq!(field.value(), "ab");

        field.move_to_start();
        field.delete_char();
        assert_eq!(field.value(), "ab");

        field.delete_forward();
        assert_eq!(field.value(), "b");
        assert_eq!(field.cursor(), 0);

        field.move_to_end();
        field.delete_forward();
        assert_eq!(field.value(), "b");
    }

    #[test]
    fn handles_multibyte_chars() {
        let mut field = typed("café");
        field.move_cursor_left();
        field.insert_char('x');
        assert_eq!(field.value(), "cafxé");

        field.move_to_end();
        field.delete_char();
        field.delete_char();
        assert_eq!(field.value(), "caf");
    }

    #[test]
    fn cursor_stays_in_bounds() {
        let mut field = typed("ab");
        field.move_cursor_right();
        assert_eq!(field.cursor(), 2);
        field.move_to_start();
        field.move_cursor_left();
        assert_eq!(field.cursor(), 0);
    }

    #[test]
    fn clear_resets_value_and_cursor() {
        let mut field = typed("something");
        field.clear();
        assert!(field.is_empty());
        assert_eq!(field.cursor(), 0);
    }

    #[test]
    fn short_value_is_fully_visible() {
        let field = typed("milk");
        assert_eq!(field.visible(10), ("milk", 4));
    }

    #[test]
    fn wide_chars_advance_cursor_by_display_width() {
        let mut field = typed("你好a");
        assert_eq!(field.visible(20), ("你好a", 5));

        field.move_cursor_left();
        assert_eq!(field.visible(20).1, 4);
    }

    #[test]
    fn long_value_scrolls_to_keep_cursor_visible() {
        let field = typed("abcdefghijklmnopqrst");
        let (shown, col) = field.visible(10);
        assert_eq!(shown, "lmnopqrst");
        assert_eq!(col, 9);
    }

    #[test]
    fn scrolled_wide_chars_stay_within_width() {
        let field = typed("一二三四五六");
        let (shown, col) = field.visible(7);
        assert_eq!(shown, "四五六");
        assert_eq!(col, 6);
    }

    #[test]
    fn cursor_at_start_shows_from_beginning() {
        let mut field = typed("abcdefghijklmnopqrst");
        field.move_to_start();
        assert_eq!(field.visible(10), ("abcdefghijklmnopqrst", 0));
    }
}
