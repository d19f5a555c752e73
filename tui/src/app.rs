use anyhow::Result;
use calnotes_core::{
    models::{day_key, Note, NoteId},
    storage::NoteBook,
    Error,
};
use chrono::NaiveDate;
use ratatui::layout::Rect;
use tracing::{debug, info};

use crate::calendar::MonthGrid;
use crate::config::{Bindings, Config};
use crate::editor::NoteEditor;

/// Clickable things recorded while rendering, used for mouse hit-testing
#[derive(Debug, Clone, PartialEq)]
pub enum HitTarget {
    Day(NaiveDate),
    PrevMonth,
    NextMonth,
    MonthTitle,
    /// 1-based month in the selector list
    MonthOption(u32),
    /// Whole editor panel; clicks outside it close the editor
    EditorPanel,
    EditorNote(NoteId),
    EditorInput,
    EditorClose,
    EditorSubmit,
}

/// Application state. Owns the note list and mediates between the month grid
/// and the note editor.
pub struct App {
    pub should_quit: bool,
    pub config: Config,
    pub bindings: Bindings,
    pub notes: NoteBook,
    pub calendar: MonthGrid,
    /// `None` while the editor is closed
    pub editor: Option<NoteEditor>,
    pub selected_date: Option<NaiveDate>,
    pub today: NaiveDate,
    pub help_open: bool,
    pub status_message: Option<String>,
    pub hit_regions: Vec<(Rect, HitTarget)>,
}

impl App {
    /// Create a new App instance using the local date as "today"
    pub fn new(config: Config) -> Result<Self> {
        Self::with_today(config, chrono::Local::now().date_naive())
    }

    pub fn with_today(config: Config, today: NaiveDate) -> Result<Self> {
        let bindings = Bindings::from_keymap(&config.keymap)?;
        let calendar = MonthGrid::new(today, config.calendar.week_start);

        Ok(Self {
            should_quit: false,
            config,
            bindings,
            notes: NoteBook::new(),
            calendar,
            editor: None,
            selected_date: None,
            today,
            help_open: false,
            status_message: None,
            hit_regions: Vec::new(),
        })
    }

    // =========================
    // Editor lifecycle
    // =========================

    /// Record the clicked day and open the editor for it
    pub fn open_editor(&mut self, date: NaiveDate) {
        debug!(date = %day_key(date), "open editor");
        self.selected_date = Some(date);
        self.calendar.close_selector();
        self.editor = Some(NoteEditor::new(date, self.config.calendar.preview_chars));
    }

    /// Close the editor. Calling this while closed does nothing.
    pub fn close_editor(&mut self) {
        if self.editor.take().is_some() {
            debug!("close editor");
        }
    }

    pub fn is_editor_open(&self) -> bool {
        self.editor.is_some()
    }

    /// Submit the editor input. Whitespace-only input is ignored and the
    /// editor stays open. Returns the new note's id when one was added.
    pub fn submit_note(&mut self) -> Option<NoteId> {
        let text = match self.editor.as_mut() {
            Some(editor) => editor.take_submission(),
            None => return None,
        };
        let Some(text) = text else {
            debug!("ignored empty note submission");
            return None;
        };
        let id = self.add_note(&text)?;
        self.close_editor();
        Some(id)
    }

    /// Append a note for the selected date
    pub fn add_note(&mut self, content: &str) -> Option<NoteId> {
        let date = self.selected_date?;
        match self.notes.add(date, content) {
            Ok(note) => {
                info!(date = %note.day_key(), id = %note.id, "note added");
                self.status_message = Some(format!("Added note for {}", note.day_key()));
                Some(note.id.clone())
            }
            Err(Error::EmptyNote) => {
                debug!("ignored empty note");
                None
            }
            Err(err) => {
                debug!(error = %err, "note rejected");
                None
            }
        }
    }

    /// Notes shown by the editor, re-read from the live list
    pub fn editor_notes(&self) -> Vec<&Note> {
        match &self.editor {
            Some(editor) => self.notes.notes_for(editor.date),
            None => Vec::new(),
        }
    }

    /// Toggle full-text display of a note in the open editor
    pub fn toggle_note(&mut self, id: &NoteId) {
        let index = self.editor_notes().iter().position(|n| &n.id == id);
        if let Some(editor) = self.editor.as_mut() {
            editor.toggle_expanded(id);
            if let Some(index) = index {
                editor.selected = index;
            }
        }
    }

    /// Toggle the note highlighted in the editor list
    pub fn toggle_selected_note(&mut self) {
        let Some(selected) = self.editor.as_ref().map(|e| e.selected) else {
            return;
        };
        let id = self.editor_notes().get(selected).map(|n| n.id.clone());
        if let Some(id) = id {
            self.toggle_note(&id);
        }
    }

    pub fn editor_select_down(&mut self) {
        let len = self.editor_notes().len();
        if let Some(editor) = self.editor.as_mut() {
            editor.select_down(len);
        }
    }

    pub fn editor_select_up(&mut self) {
        if let Some(editor) = self.editor.as_mut() {
            editor.select_up();
        }
    }

    // =========================
    // Calendar
    // =========================

    pub fn prev_month(&mut self) {
        self.calendar.prev_month();
        debug!(month = %self.calendar.month, "previous month");
    }

    pub fn next_month(&mut self) {
        self.calendar.next_month();
        debug!(month = %self.calendar.month, "next month");
    }

    pub fn toggle_month_selector(&mut self) {
        self.calendar.toggle_selector();
    }

    pub fn select_month(&mut self, month: u32) {
        if let Err(err) = self.calendar.select_month(month) {
            debug!(error = %err, "month selection rejected");
        }
    }

    pub fn confirm_month_selector(&mut self) {
        if let Err(err) = self.calendar.selector_confirm() {
            debug!(error = %err, "month selection rejected");
        }
    }

    pub fn move_cursor(&mut self, delta_days: i64) {
        self.calendar.move_cursor(delta_days);
    }

    pub fn goto_today(&mut self) {
        self.calendar.goto(self.today);
    }

    /// Open the editor on the keyboard cursor's day
    pub fn open_cursor_day(&mut self) {
        let date = self.calendar.cursor;
        self.open_editor(date);
    }

    pub fn count_for(&self, date: NaiveDate) -> usize {
        self.notes.count_for(date)
    }

    // =========================
    // Misc
    // =========================

    pub fn toggle_help(&mut self) {
        self.help_open = !self.help_open;
    }

    /// Handle tick events: keep "today" current across midnight
    pub fn tick(&mut self) {
        self.refresh_today(chrono::Local::now().date_naive());
    }

    pub fn refresh_today(&mut self, today: NaiveDate) {
        if today != self.today {
            info!(today = %day_key(today), "date changed");
            self.today = today;
        }
    }

    /// Quit the application
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn register_hit(&mut self, area: Rect, target: HitTarget) {
        if area.width > 0 && area.height > 0 {
            self.hit_regions.push((area, target));
        }
    }

    /// Topmost target under a screen position
    pub fn hit_test(&self, column: u16, row: u16) -> Option<&HitTarget> {
        self.hit_regions
            .iter()
            .rev()
            .find(|(rect, _)| {
                column >= rect.x
                    && column < rect.x.saturating_add(rect.width)
                    && row >= rect.y
                    && row < rect.y.saturating_add(rect.height)
            })
            .map(|(_, target)| target)
    }
}
