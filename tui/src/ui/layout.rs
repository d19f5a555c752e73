use crate::app::App;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    Frame,
};

use super::{render_calendar, render_header, render_help_screen, render_month_selector, render_note_editor, render_status_bar};

/// Widest the month grid grows before it is centered
const MAX_CALENDAR_WIDTH: u16 = 7 * 12 + 2;

/// Render the complete UI
pub fn render(frame: &mut Frame, app: &mut App) {
    app.hit_regions.clear();
    let size = frame.size();

    // Create main layout: header, content, status bar
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),  // Header
            Constraint::Min(0),     // Calendar
            Constraint::Length(1),  // Status bar
        ])
        .split(size);

    render_header(frame, app, chunks[0]);
    render_calendar(frame, app, centered_columns(chunks[1], MAX_CALENDAR_WIDTH));
    render_status_bar(frame, app, chunks[2]);

    // Overlays (drawn last, hit regions registered last win)
    if app.calendar.selector_open {
        render_month_selector(frame, app, chunks[1]);
    }
    if app.is_editor_open() {
        render_note_editor(frame, app, size);
    }
    if app.help_open {
        render_help_screen(frame, app, size);
    }
}

fn centered_columns(area: Rect, max_width: u16) -> Rect {
    let width = area.width.min(max_width);
    Rect::new(area.x + (area.width - width) / 2, area.y, width, area.height)
}
