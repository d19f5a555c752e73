use calnotes_core::models::NoteId;
use chrono::NaiveDate;
use unicode_segmentation::UnicodeSegmentation;

/// Which part of the editor receives typed keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorFocus {
    Input,
    List,
}

/// Modal note editor for a single day. Exists only while the modal is open.
#[derive(Debug, Clone)]
pub struct NoteEditor {
    pub date: NaiveDate,
    pub input: String,
    /// Cursor position in chars
    pub cursor: usize,
    pub expanded: Option<NoteId>,
    /// Highlighted row in the note list
    pub selected: usize,
    pub focus: EditorFocus,
    pub preview_chars: usize,
}

impl NoteEditor {
    pub fn new(date: NaiveDate, preview_chars: usize) -> Self {
        Self {
            date,
            input: String::new(),
            cursor: 0,
            expanded: None,
            selected: 0,
            focus: EditorFocus::Input,
            preview_chars,
        }
    }

    fn byte_index(&self, char_pos: usize) -> usize {
        self.input
            .char_indices()
            .map(|(i, _)| i)
            .nth(char_pos)
            .unwrap_or(self.input.len())
    }

    pub fn insert_char(&mut self, c: char) {
        let at = self.byte_index(self.cursor);
        self.input.insert(at, c);
        self.cursor += 1;
    }

    pub fn insert_newline(&mut self) {
        self.insert_char('\n');
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let at = self.byte_index(self.cursor - 1);
        self.input.remove(at);
        self.cursor -= 1;
    }

    pub fn delete(&mut self) {
        if self.cursor < self.input.chars().count() {
            let at = self.byte_index(self.cursor);
            self.input.remove(at);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.input.chars().count());
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.input.chars().count();
    }

    /// Text before the cursor, used to place the terminal cursor
    pub fn input_before_cursor(&self) -> &str {
        &self.input[..self.byte_index(self.cursor)]
    }

    /// Take the input for submission. Returns `None` and leaves the input
    /// untouched when it is empty after trimming.
    pub fn take_submission(&mut self) -> Option<String> {
        let trimmed = self.input.trim();
        if trimmed.is_empty() {
            return None;
        }
        let text = trimmed.to_string();
        self.input.clear();
        self.cursor = 0;
        Some(text)
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            EditorFocus::Input => EditorFocus::List,
            EditorFocus::List => EditorFocus::Input,
        };
    }

    /// Expand `id`, or collapse it when it is already the expanded note.
    /// At most one note is expanded at a time.
    pub fn toggle_expanded(&mut self, id: &NoteId) {
        if self.expanded.as_ref() == Some(id) {
            self.expanded = None;
        } else {
            self.expanded = Some(id.clone());
        }
    }

    pub fn is_expanded(&self, id: &NoteId) -> bool {
        self.expanded.as_ref() == Some(id)
    }

    pub fn select_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_down(&mut self, len: usize) {
        if len > 0 {
            self.selected = (self.selected + 1).min(len - 1);
        }
    }

    /// Collapsed or full text for a note, depending on the toggle
    pub fn display_text(&self, id: &NoteId, content: &str) -> String {
        if self.is_expanded(id) {
            content.to_string()
        } else {
            preview(content, self.preview_chars)
        }
    }
}

/// First `max` graphemes of `content`, with `...` appended when it was cut
pub fn preview(content: &str, max: usize) -> String {
    let mut graphemes = content.graphemes(true);
    let head: String = graphemes.by_ref().take(max).collect();
    if graphemes.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn editor() -> NoteEditor {
        NoteEditor::new(NaiveDate::from_ymd_opt(2024, 8, 4).unwrap(), 50)
    }

    fn type_str(e: &mut NoteEditor, s: &str) {
        for c in s.chars() {
            e.insert_char(c);
        }
    }

    #[test]
    fn test_preview_truncation() {
        assert_eq!(preview("short", 50), "short");
        let exact = "x".repeat(50);
        assert_eq!(preview(&exact, 50), exact);
        let long = "y".repeat(51);
        assert_eq!(preview(&long, 50), format!("{}...", "y".repeat(50)));
        // graphemes, not bytes
        assert_eq!(preview("ééé", 2), "éé...");
    }

    #[test]
    fn test_editing_at_cursor() {
        let mut e = editor();
        type_str(&mut e, "helo");
        e.move_left();
        e.insert_char('l');
        assert_eq!(e.input, "hello");
        e.move_home();
        e.delete();
        assert_eq!(e.input, "ello");
        e.move_end();
        e.backspace();
        assert_eq!(e.input, "ell");
        assert_eq!(e.cursor, 3);
        e.move_right();
        assert_eq!(e.cursor, 3);
    }

    #[test]
    fn test_multibyte_editing() {
        let mut e = editor();
        type_str(&mut e, "añb");
        e.move_left();
        e.backspace();
        assert_eq!(e.input, "ab");
        assert_eq!(e.input_before_cursor(), "a");
    }

    #[test]
    fn test_take_submission_trims_and_clears() {
        let mut e = editor();
        type_str(&mut e, "  Buy milk  ");
        assert_eq!(e.take_submission().as_deref(), Some("Buy milk"));
        assert!(e.input.is_empty());
        assert_eq!(e.cursor, 0);
    }

    #[test]
    fn test_take_submission_rejects_whitespace() {
        let mut e = editor();
        type_str(&mut e, "  ");
        e.insert_newline();
        assert_eq!(e.take_submission(), None);
        assert_eq!(e.input, "  \n");
    }

    #[test]
    fn test_single_expanded_note() {
        let mut e = editor();
        let a = NoteId::from("a");
        let b = NoteId::from("b");

        e.toggle_expanded(&a);
        assert!(e.is_expanded(&a));
        e.toggle_expanded(&b);
        assert!(e.is_expanded(&b));
        assert!(!e.is_expanded(&a));
        e.toggle_expanded(&b);
        assert_eq!(e.expanded, None);
    }

    #[test]
    fn test_display_text_follows_toggle() {
        let mut e = editor();
        let id = NoteId::from("a");
        let long = "z".repeat(60);
        assert!(e.display_text(&id, &long).ends_with("..."));
        e.toggle_expanded(&id);
        assert_eq!(e.display_text(&id, &long), long);
    }

    #[test]
    fn test_list_selection_bounds() {
        let mut e = editor();
        e.select_up();
        assert_eq!(e.selected, 0);
        e.select_down(2);
        e.select_down(2);
        assert_eq!(e.selected, 1);
        e.select_down(0);
        assert_eq!(e.selected, 1);
    }
}
