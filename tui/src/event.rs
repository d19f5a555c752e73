use anyhow::Result;
use crossterm::event::{
    self, Event as CEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use std::time::Duration;

use crate::app::{App, HitTarget};
use crate::editor::EditorFocus;

/// Terminal events
#[derive(Debug, Clone, Copy)]
pub enum Event {
    /// Key press event
    Key(KeyEvent),
    /// Terminal tick event
    Tick,
    /// Mouse event
    Mouse(MouseEvent),
}

/// Event handler for the terminal
pub struct EventHandler {
    /// Tick rate in milliseconds
    tick_rate: Duration,
}

impl EventHandler {
    /// Create a new event handler
    pub fn new(tick_rate_ms: u64) -> Self {
        Self {
            tick_rate: Duration::from_millis(tick_rate_ms),
        }
    }

    /// Poll for the next event
    pub fn next(&self) -> Result<Event> {
        if event::poll(self.tick_rate)? {
            match event::read()? {
                CEvent::Key(key) => return Ok(Event::Key(key)),
                CEvent::Mouse(m) => return Ok(Event::Mouse(m)),
                _ => {}
            }
        }
        Ok(Event::Tick)
    }
}

/// Handle key events for the application
pub fn handle_key_event(key: KeyEvent, app: &mut App) {
    // On Windows, crossterm reports both key press and release events.
    if key.kind != KeyEventKind::Press {
        return;
    }

    if app.help_open {
        if key.code == KeyCode::Esc || app.bindings.help.matches(&key) {
            app.toggle_help();
        }
        return;
    }

    // The editor owns the keyboard for as long as it is open
    if app.is_editor_open() {
        handle_editor_input(key, app);
        return;
    }

    if app.calendar.selector_open {
        handle_month_selector_input(key, app);
        return;
    }

    let bindings = app.bindings.clone();
    if bindings.quit.matches(&key) {
        app.quit();
    } else if bindings.help.matches(&key) {
        app.toggle_help();
    } else if bindings.prev_month.matches(&key) {
        app.prev_month();
    } else if bindings.next_month.matches(&key) {
        app.next_month();
    } else if bindings.month_selector.matches(&key) {
        app.toggle_month_selector();
    } else if bindings.today.matches(&key) {
        app.goto_today();
    } else {
        match key.code {
            KeyCode::Left => app.move_cursor(-1),
            KeyCode::Right => app.move_cursor(1),
            KeyCode::Up => app.move_cursor(-7),
            KeyCode::Down => app.move_cursor(7),
            KeyCode::Enter | KeyCode::Char(' ') => app.open_cursor_day(),
            _ => {}
        }
    }
}

fn handle_month_selector_input(key: KeyEvent, app: &mut App) {
    if app.bindings.month_selector.matches(&key) {
        app.toggle_month_selector();
        return;
    }
    match key.code {
        KeyCode::Esc => app.calendar.close_selector(),
        KeyCode::Up => app.calendar.selector_up(),
        KeyCode::Down => app.calendar.selector_down(),
        KeyCode::Enter => app.confirm_month_selector(),
        _ => {}
    }
}

/// Handle key events while the note editor is open
fn handle_editor_input(key: KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Esc => {
            app.close_editor();
            return;
        }
        KeyCode::Tab | KeyCode::BackTab => {
            if let Some(editor) = app.editor.as_mut() {
                editor.toggle_focus();
            }
            return;
        }
        _ => {}
    }

    let focus = match &app.editor {
        Some(editor) => editor.focus,
        None => return,
    };

    match focus {
        EditorFocus::List => match key.code {
            KeyCode::Up => app.editor_select_up(),
            KeyCode::Down => app.editor_select_down(),
            KeyCode::Enter | KeyCode::Char(' ') => app.toggle_selected_note(),
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                // Typing jumps back to the input
                if let Some(editor) = app.editor.as_mut() {
                    editor.focus = EditorFocus::Input;
                    editor.insert_char(c);
                }
            }
            _ => {}
        },
        EditorFocus::Input => handle_text_input(key, app),
    }
}

fn handle_text_input(key: KeyEvent, app: &mut App) {
    let newline = (key.code == KeyCode::Enter && key.modifiers.contains(KeyModifiers::ALT))
        || (key.code == KeyCode::Char('j') && key.modifiers == KeyModifiers::CONTROL);
    if key.code == KeyCode::Enter && !newline {
        app.submit_note();
        return;
    }

    let Some(editor) = app.editor.as_mut() else {
        return;
    };
    if newline {
        editor.insert_newline();
        return;
    }
    match key.code {
        KeyCode::Backspace => editor.backspace(),
        KeyCode::Delete => editor.delete(),
        KeyCode::Left => editor.move_left(),
        KeyCode::Right => editor.move_right(),
        KeyCode::Home => editor.move_home(),
        KeyCode::End => editor.move_end(),
        KeyCode::Char(c) => {
            // Allow AltGr combinations (CONTROL+ALT) for special characters
            if !key.modifiers.contains(KeyModifiers::CONTROL) || key.modifiers.contains(KeyModifiers::ALT) {
                editor.insert_char(c);
            }
        }
        _ => {}
    }
}

/// Handle mouse events using the regions recorded by the last render
pub fn handle_mouse_event(mouse: MouseEvent, app: &mut App) {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            let target = app.hit_test(mouse.column, mouse.row).cloned();
            handle_click(target, app);
        }
        MouseEventKind::ScrollUp => {
            if app.is_editor_open() {
                app.editor_select_up();
            } else if !app.help_open {
                app.prev_month();
            }
        }
        MouseEventKind::ScrollDown => {
            if app.is_editor_open() {
                app.editor_select_down();
            } else if !app.help_open {
                app.next_month();
            }
        }
        _ => {}
    }
}

fn handle_click(target: Option<HitTarget>, app: &mut App) {
    if app.help_open {
        app.toggle_help();
        return;
    }

    if app.is_editor_open() {
        match target {
            Some(HitTarget::EditorNote(id)) => app.toggle_note(&id),
            Some(HitTarget::EditorInput) => {
                if let Some(editor) = app.editor.as_mut() {
                    editor.focus = EditorFocus::Input;
                }
            }
            Some(HitTarget::EditorClose) => app.close_editor(),
            Some(HitTarget::EditorSubmit) => {
                app.submit_note();
            }
            Some(HitTarget::EditorPanel) => {}
            // Anything outside the panel dismisses it
            _ => app.close_editor(),
        }
        return;
    }

    if app.calendar.selector_open {
        match target {
            Some(HitTarget::MonthOption(month)) => app.select_month(month),
            Some(HitTarget::MonthTitle) => app.toggle_month_selector(),
            _ => app.calendar.close_selector(),
        }
        return;
    }

    match target {
        Some(HitTarget::Day(date)) => {
            app.calendar.goto(date);
            app.open_editor(date);
        }
        Some(HitTarget::PrevMonth) => app.prev_month(),
        Some(HitTarget::NextMonth) => app.next_month(),
        Some(HitTarget::MonthTitle) => app.toggle_month_selector(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use chrono::NaiveDate;
    use ratatui::layout::Rect;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn app() -> App {
        App::with_today(Config::default(), date(2024, 8, 4)).unwrap()
    }

    fn press(app: &mut App, code: KeyCode) {
        handle_key_event(KeyEvent::new(code, KeyModifiers::NONE), app);
    }

    fn type_str(app: &mut App, s: &str) {
        for c in s.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn click(app: &mut App, column: u16, row: u16) {
        handle_mouse_event(
            MouseEvent {
                kind: MouseEventKind::Down(MouseButton::Left),
                column,
                row,
                modifiers: KeyModifiers::NONE,
            },
            app,
        );
    }

    #[test]
    fn test_event_handler_creation() {
        let handler = EventHandler::new(250);
        assert_eq!(handler.tick_rate, Duration::from_millis(250));
    }

    #[test]
    fn test_keyboard_add_note_flow() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        assert!(app.is_editor_open());
        type_str(&mut app, "Buy milk");
        press(&mut app, KeyCode::Enter);

        assert!(!app.is_editor_open());
        assert_eq!(app.notes.notes_for(date(2024, 8, 4))[0].content, "Buy milk");
    }

    #[test]
    fn test_typing_q_in_editor_does_not_quit() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        type_str(&mut app, "quiet");
        assert!(!app.should_quit);
        assert_eq!(app.editor.as_ref().unwrap().input, "quiet");
    }

    #[test]
    fn test_whitespace_enter_keeps_editor_open() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        type_str(&mut app, "  ");
        press(&mut app, KeyCode::Enter);
        assert!(app.is_editor_open());
        assert!(app.notes.is_empty());
    }

    #[test]
    fn test_alt_enter_inserts_newline() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        type_str(&mut app, "a");
        handle_key_event(KeyEvent::new(KeyCode::Enter, KeyModifiers::ALT), &mut app);
        handle_key_event(KeyEvent::new(KeyCode::Char('j'), KeyModifiers::CONTROL), &mut app);
        type_str(&mut app, "b");
        assert_eq!(app.editor.as_ref().unwrap().input, "a\n\nb");
    }

    #[test]
    fn test_escape_closes_editor_and_is_noop_when_closed() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Esc);
        assert!(!app.is_editor_open());

        let month = app.calendar.month;
        let cursor = app.calendar.cursor;
        press(&mut app, KeyCode::Esc);
        assert!(!app.is_editor_open());
        assert!(!app.should_quit);
        assert_eq!(app.calendar.month, month);
        assert_eq!(app.calendar.cursor, cursor);
    }

    #[test]
    fn test_list_focus_toggles_notes() {
        let mut app = app();
        for text in ["one", "two"] {
            press(&mut app, KeyCode::Enter);
            type_str(&mut app, text);
            press(&mut app, KeyCode::Enter);
        }
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Enter);
        let first = app.editor_notes()[0].id.clone();
        let second = app.editor_notes()[1].id.clone();
        assert!(app.editor.as_ref().unwrap().is_expanded(&first));

        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Char(' '));
        let editor = app.editor.as_ref().unwrap();
        assert!(editor.is_expanded(&second));
        assert!(!editor.is_expanded(&first));
    }

    #[test]
    fn test_navigation_keys() {
        let mut app = app();
        for _ in 0..12 {
            press(&mut app, KeyCode::PageDown);
        }
        assert_eq!(app.calendar.month.title(), "August 2025");
        press(&mut app, KeyCode::PageUp);
        assert_eq!(app.calendar.month.title(), "July 2025");
        press(&mut app, KeyCode::Char('t'));
        assert_eq!(app.calendar.month.title(), "August 2024");
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.calendar.cursor, date(2024, 8, 12));
    }

    #[test]
    fn test_month_selector_keys() {
        let mut app = app();
        press(&mut app, KeyCode::Char('m'));
        assert!(app.calendar.selector_open);
        press(&mut app, KeyCode::Up);
        press(&mut app, KeyCode::Enter);
        assert!(!app.calendar.selector_open);
        assert_eq!(app.calendar.month.title(), "July 2024");

        press(&mut app, KeyCode::Char('m'));
        press(&mut app, KeyCode::Esc);
        assert!(!app.calendar.selector_open);
        assert_eq!(app.calendar.month.title(), "July 2024");
    }

    #[test]
    fn test_help_and_quit() {
        let mut app = app();
        press(&mut app, KeyCode::Char('h'));
        assert!(app.help_open);
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.should_quit);
        press(&mut app, KeyCode::Esc);
        assert!(!app.help_open);
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[test]
    fn test_release_events_ignored() {
        let mut app = app();
        let mut key = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        key.kind = KeyEventKind::Release;
        handle_key_event(key, &mut app);
        assert!(!app.should_quit);
    }

    #[test]
    fn test_click_day_then_outside_closes() {
        let mut app = app();
        app.register_hit(Rect::new(0, 0, 4, 1), HitTarget::Day(date(2024, 8, 9)));
        click(&mut app, 1, 0);
        assert_eq!(app.editor.as_ref().unwrap().date, date(2024, 8, 9));
        assert_eq!(app.selected_date, Some(date(2024, 8, 9)));

        app.register_hit(Rect::new(10, 10, 20, 10), HitTarget::EditorPanel);
        click(&mut app, 15, 15);
        assert!(app.is_editor_open());
        click(&mut app, 50, 50);
        assert!(!app.is_editor_open());
    }

    #[test]
    fn test_click_buttons() {
        let mut app = app();
        app.open_editor(date(2024, 8, 4));
        app.register_hit(Rect::new(0, 0, 50, 20), HitTarget::EditorPanel);
        app.register_hit(Rect::new(1, 18, 8, 1), HitTarget::EditorSubmit);
        app.register_hit(Rect::new(10, 18, 8, 1), HitTarget::EditorClose);

        click(&mut app, 2, 18);
        assert!(app.is_editor_open());
        type_str(&mut app, "note");
        click(&mut app, 2, 18);
        assert!(!app.is_editor_open());
        assert_eq!(app.notes.len(), 1);

        app.open_editor(date(2024, 8, 4));
        click(&mut app, 11, 18);
        assert!(!app.is_editor_open());
        assert_eq!(app.notes.len(), 1);
    }

    #[test]
    fn test_click_month_controls() {
        let mut app = app();
        app.register_hit(Rect::new(0, 0, 5, 1), HitTarget::PrevMonth);
        app.register_hit(Rect::new(10, 0, 5, 1), HitTarget::MonthTitle);
        app.register_hit(Rect::new(20, 0, 5, 1), HitTarget::NextMonth);
        app.register_hit(Rect::new(10, 1, 5, 1), HitTarget::MonthOption(3));

        click(&mut app, 0, 0);
        assert_eq!(app.calendar.month.title(), "July 2024");
        click(&mut app, 21, 0);
        click(&mut app, 21, 0);
        assert_eq!(app.calendar.month.title(), "September 2024");

        click(&mut app, 11, 0);
        assert!(app.calendar.selector_open);
        click(&mut app, 11, 1);
        assert!(!app.calendar.selector_open);
        assert_eq!(app.calendar.month.title(), "March 2024");
    }
}
