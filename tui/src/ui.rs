mod layout;
mod widgets;

pub use layout::render;
pub use widgets::{
    render_header,
    render_calendar,
    render_month_selector,
    render_note_editor,
    render_status_bar,
    render_help_screen,
};
