use crate::app::{App, HitTarget};
use crate::config::key_label;
use crate::editor::EditorFocus;
use calnotes_core::models::MONTH_NAMES;
use chrono::Datelike;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const PREV_LABEL: &str = "< Prev";
const NEXT_LABEL: &str = "Next >";
const CLOSE_LABEL: &str = "[ Close ]";
const SUBMIT_LABEL: &str = "[ Add Note ]";
const EMPTY_NOTES: &str = "No notes for this date.";
const INPUT_PLACEHOLDER: &str = "Enter your note here...";

/// Render the header with title and key hints
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let keymap = &app.config.keymap;
    let key_hints = if app.help_open {
        " [Esc:Close Help] ".to_string()
    } else if let Some(editor) = &app.editor {
        let hints = match editor.focus {
            EditorFocus::Input => " [Enter:Add] [Alt+Enter:Newline] [Tab:Notes] [Esc:Close] ",
            EditorFocus::List => " [↑/↓:Select] [Enter:Expand] [Tab:Input] [Esc:Close] ",
        };
        hints.to_string()
    } else if app.calendar.selector_open {
        " [↑/↓:Month] [Enter:Jump] [Esc:Cancel] ".to_string()
    } else {
        format!(
            " [{}:Quit] [{}:Help] [Arrows:Move] [Enter:Notes] [{}/{}:Month] [{}:Months] [{}:Today] ",
            key_label(&keymap.quit),
            key_label(&keymap.help),
            key_label(&keymap.prev_month),
            key_label(&keymap.next_month),
            key_label(&keymap.month_selector),
            key_label(&keymap.today),
        )
    };

    let header_spans = vec![
        Span::styled(
            " 📅 Calendar Notes ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" | "),
        Span::styled(key_hints, Style::default().fg(Color::DarkGray)),
    ];

    let header = Paragraph::new(Line::from(header_spans))
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Left);

    frame.render_widget(header, area);
}

/// Render the month grid: navigation row, weekday labels and one cell per day
pub fn render_calendar(frame: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Calendar ");
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.width < 14 || inner.height < 4 {
        return;
    }

    // Navigation row
    let title = format!("{} ▾", app.calendar.month.title());
    let title_w = title.width() as u16;
    let prev_rect = Rect::new(inner.x, inner.y, PREV_LABEL.len() as u16, 1);
    let next_rect = Rect::new(
        inner.right().saturating_sub(NEXT_LABEL.len() as u16),
        inner.y,
        NEXT_LABEL.len() as u16,
        1,
    );
    let title_rect = Rect::new(
        inner.x + inner.width.saturating_sub(title_w) / 2,
        inner.y,
        title_w.min(inner.width),
        1,
    );
    let button = Style::default().fg(Color::White).bg(Color::Blue);
    frame.render_widget(Paragraph::new(PREV_LABEL).style(button), prev_rect);
    frame.render_widget(Paragraph::new(NEXT_LABEL).style(button), next_rect);
    frame.render_widget(
        Paragraph::new(title).style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
        title_rect,
    );
    app.register_hit(prev_rect, HitTarget::PrevMonth);
    app.register_hit(next_rect, HitTarget::NextMonth);
    app.register_hit(title_rect, HitTarget::MonthTitle);

    // Below the navigation row: optional gap, weekday labels, then one row per week.
    // The gap goes first and then the labels when the terminal is too short.
    let rows = app.calendar.row_count().max(1) as u16;
    let spare = inner.height - 1;
    let show_labels = spare > rows;
    let labels_y = inner.y + if spare > rows + 1 { 2 } else { 1 };

    let cell_w = inner.width / 7;
    if show_labels {
        for (col, label) in app.calendar.week_start.weekday_labels().iter().enumerate() {
            let rect = Rect::new(inner.x + col as u16 * cell_w, labels_y, cell_w, 1);
            frame.render_widget(
                Paragraph::new(format!("{label:>3}")).style(Style::default().fg(Color::DarkGray)),
                rect,
            );
        }
    }

    // Day cells
    let grid_top = if show_labels { labels_y + 1 } else { labels_y };
    let available = inner.bottom().saturating_sub(grid_top);
    let cell_h = (available / rows).clamp(1, 3);
    let cells = app.calendar.cells();
    for (index, cell) in cells.into_iter().enumerate() {
        let Some(date) = cell else { continue };
        let row = (index / 7) as u16;
        let col = (index % 7) as u16;
        let y = grid_top + row * cell_h;
        if y >= inner.bottom() {
            break;
        }
        let rect = Rect::new(
            inner.x + col * cell_w,
            y,
            cell_w.saturating_sub(1).max(1),
            cell_h.min(inner.bottom() - y),
        );

        let count = app.count_for(date);
        let mut style = Style::default().fg(Color::White);
        if count > 0 {
            style = style.fg(Color::LightBlue);
        }
        if date == app.today {
            style = style.bg(Color::Cyan).fg(Color::Black).add_modifier(Modifier::BOLD);
        }
        if Some(date) == app.selected_date {
            style = style.add_modifier(Modifier::UNDERLINED);
        }
        if date == app.calendar.cursor {
            style = style.add_modifier(Modifier::REVERSED);
        }

        let mut spans = vec![Span::raw(format!("{:>3}", date.day()))];
        match count {
            0 => {}
            1 => spans.push(Span::styled(
                " [1]",
                Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            )),
            n => spans.push(Span::styled(
                format!(" [{n}]"),
                Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
            )),
        }
        frame.render_widget(Paragraph::new(Line::from(spans)).style(style), rect);
        app.register_hit(rect, HitTarget::Day(date));
    }
}

/// Render the month selector popup below the month title
pub fn render_month_selector(frame: &mut Frame, app: &mut App, area: Rect) {
    let Some(title_rect) = app
        .hit_regions
        .iter()
        .find(|(_, t)| *t == HitTarget::MonthTitle)
        .map(|(r, _)| *r)
    else {
        return;
    };

    let width = 14u16.min(area.width);
    let height = 14u16.min(area.bottom().saturating_sub(title_rect.bottom()));
    let x = title_rect
        .x
        .min(area.right().saturating_sub(width));
    let popup = Rect::new(x, title_rect.bottom(), width, height);
    if popup.height < 3 {
        return;
    }

    let block = Block::default().borders(Borders::ALL).title(" Month ");
    let inner = block.inner(popup);
    frame.render_widget(Clear, popup);
    frame.render_widget(block, popup);

    let current = app.calendar.month.month() as usize - 1;
    for (i, name) in MONTH_NAMES.iter().enumerate() {
        let y = inner.y + i as u16;
        if y >= inner.bottom() {
            break;
        }
        let rect = Rect::new(inner.x, y, inner.width, 1);
        let mut style = Style::default().fg(Color::White);
        if i == current {
            style = style.fg(Color::Cyan).add_modifier(Modifier::BOLD);
        }
        if i == app.calendar.selector_index {
            style = style.bg(Color::Blue).fg(Color::Black);
        }
        frame.render_widget(Paragraph::new(*name).style(style), rect);
        app.register_hit(rect, HitTarget::MonthOption(i as u32 + 1));
    }
}

/// Wrap text to `width` display columns, honoring embedded newlines
fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    for raw in text.split('\n') {
        let mut line = String::new();
        let mut line_w = 0;
        for c in raw.chars() {
            let w = c.width().unwrap_or(0);
            if line_w + w > width && !line.is_empty() {
                lines.push(std::mem::take(&mut line));
                line_w = 0;
            }
            line.push(c);
            line_w += w;
        }
        lines.push(line);
    }
    lines
}

/// Render the note editor modal for the selected day
pub fn render_note_editor(frame: &mut Frame, app: &mut App, area: Rect) {
    let Some(editor) = app.editor.clone() else {
        return;
    };

    let popup_width = 64u16.min(area.width.saturating_sub(4));
    let popup_height = 22u16.min(area.height.saturating_sub(2));
    let popup = Rect::new(
        area.x + (area.width.saturating_sub(popup_width)) / 2,
        area.y + (area.height.saturating_sub(popup_height)) / 2,
        popup_width,
        popup_height,
    );

    let title = format!(" Notes for {} ", editor.date.format("%a %b %d %Y"));
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .title_style(Style::default().add_modifier(Modifier::BOLD))
        .style(Style::default().bg(Color::Black));
    let inner = block.inner(popup);
    frame.render_widget(Clear, popup);
    frame.render_widget(block, popup);
    app.register_hit(popup, HitTarget::EditorPanel);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),    // Notes
            Constraint::Length(5), // Input
            Constraint::Length(1), // Buttons
        ])
        .split(inner);
    let list_area = chunks[0];

    // Notes list
    let notes: Vec<_> = app
        .editor_notes()
        .into_iter()
        .map(|n| (n.id.clone(), n.content.clone()))
        .collect();
    if notes.is_empty() {
        frame.render_widget(
            Paragraph::new(EMPTY_NOTES).style(
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            ),
            list_area,
        );
    } else {
        let text_w = list_area.width.saturating_sub(2) as usize;
        let items: Vec<Vec<String>> = notes
            .iter()
            .map(|(id, content)| {
                if editor.is_expanded(id) {
                    wrap_text(content, text_w)
                } else {
                    vec![editor.display_text(id, content).replace('\n', " ")]
                }
            })
            .collect();

        // Scroll so the highlighted note is visible
        let selected = editor.selected.min(notes.len() - 1);
        let mut start = 0;
        while start < selected
            && items[start..=selected].iter().map(Vec::len).sum::<usize>() > list_area.height as usize
        {
            start += 1;
        }

        let mut y = list_area.y;
        for (i, ((id, _), lines)) in notes.iter().zip(items.iter()).enumerate().skip(start) {
            if y >= list_area.bottom() {
                break;
            }
            let height = (lines.len() as u16).min(list_area.bottom() - y);
            let rect = Rect::new(list_area.x, y, list_area.width, height);

            let mut style = Style::default().fg(Color::White);
            if editor.is_expanded(id) {
                style = style.bg(Color::Blue);
            }
            if editor.focus == EditorFocus::List && i == selected {
                style = style.add_modifier(Modifier::REVERSED);
            }
            let text: Vec<Line> = lines
                .iter()
                .enumerate()
                .map(|(n, l)| {
                    let bullet = if n == 0 { "• " } else { "  " };
                    Line::from(format!("{bullet}{l}"))
                })
                .collect();
            frame.render_widget(Paragraph::new(text).style(style), rect);
            app.register_hit(rect, HitTarget::EditorNote(id.clone()));
            y += height;
        }
    }

    // Input box
    let input_border = if editor.focus == EditorFocus::Input {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let input_block = Block::default()
        .borders(Borders::ALL)
        .title(" New note ")
        .border_style(input_border);
    let input_inner = input_block.inner(chunks[1]);
    let before = editor.input_before_cursor();
    let cursor_row = before.matches('\n').count() as u16;
    let cursor_col = before.rsplit('\n').next().unwrap_or("").width() as u16;
    let scroll = cursor_row.saturating_sub(input_inner.height.saturating_sub(1));
    let input = if editor.input.is_empty() {
        Paragraph::new(INPUT_PLACEHOLDER).style(Style::default().fg(Color::DarkGray))
    } else {
        Paragraph::new(editor.input.as_str())
            .style(Style::default().fg(Color::White))
            .scroll((scroll, 0))
    };
    frame.render_widget(input.block(input_block), chunks[1]);
    app.register_hit(chunks[1], HitTarget::EditorInput);
    if editor.focus == EditorFocus::Input && input_inner.width > 0 && input_inner.height > 0 {
        frame.set_cursor(
            input_inner.x + cursor_col.min(input_inner.width - 1),
            input_inner.y + (cursor_row - scroll).min(input_inner.height - 1),
        );
    }

    // Buttons, right-aligned
    let row = chunks[2];
    if row.height == 0 || row.width == 0 {
        return;
    }
    let submit_w = SUBMIT_LABEL.len() as u16;
    let close_w = CLOSE_LABEL.len() as u16;
    let submit_rect = Rect::new(row.right().saturating_sub(submit_w), row.y, submit_w.min(row.width), 1);
    let close_rect = Rect::new(
        submit_rect.x.saturating_sub(close_w + 1).max(row.x),
        row.y,
        close_w.min(row.width),
        1,
    );
    frame.render_widget(
        Paragraph::new(CLOSE_LABEL).style(Style::default().fg(Color::Black).bg(Color::Gray)),
        close_rect,
    );
    frame.render_widget(
        Paragraph::new(SUBMIT_LABEL).style(Style::default().fg(Color::White).bg(Color::Blue)),
        submit_rect,
    );
    app.register_hit(close_rect, HitTarget::EditorClose);
    app.register_hit(submit_rect, HitTarget::EditorSubmit);
}

/// Render the status bar at the bottom
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let selected = app
        .selected_date
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string());
    let mut status_text = format!(
        " {} notes | {} | Selected: {} ",
        app.notes.len(),
        app.calendar.month.title(),
        selected,
    );
    if let Some(message) = &app.status_message {
        status_text.push_str(&format!("| {message} "));
    }

    let status_bar = Paragraph::new(status_text)
        .style(Style::default().bg(Color::DarkGray).fg(Color::White))
        .alignment(Alignment::Center);

    frame.render_widget(status_bar, area);
}

/// Render the help screen overlay
pub fn render_help_screen(frame: &mut Frame, app: &App, size: Rect) {
    let keymap = &app.config.keymap;
    let entry = |key: String, action: &str| Line::from(format!("{key:<13}{action}"));
    let help_key = key_label(&keymap.help);
    let heading = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
    let help_text = vec![
        Line::from(""),
        Line::from(Span::styled("Calendar", heading)),
        Line::from("Arrows       Move day cursor"),
        Line::from("Enter/Space  Open notes for day"),
        entry(
            format!("{}/{}", key_label(&keymap.prev_month), key_label(&keymap.next_month)),
            "Previous/next month",
        ),
        entry(key_label(&keymap.month_selector), "Choose month"),
        entry(key_label(&keymap.today), "Jump to today"),
        Line::from("Click        Open day, month title or Prev/Next"),
        Line::from(""),
        Line::from(Span::styled("Notes", heading)),
        Line::from("Enter        Add note"),
        Line::from("Alt+Enter    New line"),
        Line::from("Tab          Switch input/list"),
        Line::from("Enter/Space  Expand or collapse note"),
        Line::from("Esc          Close"),
        Line::from(""),
        Line::from(Span::styled("Interface", heading)),
        entry(help_key.clone(), "Show this help"),
        entry(key_label(&keymap.quit), "Quit application"),
        Line::from(""),
        Line::from(Span::styled(
            format!("Press '{help_key}' or 'Esc' to close"),
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let popup_width = 60u16.min(size.width);
    let popup_height = (help_text.len() as u16 + 2).min(size.height);
    let x = (size.width.saturating_sub(popup_width)) / 2;
    let y = (size.height.saturating_sub(popup_height)) / 2;
    let popup_area = Rect::new(x, y, popup_width, popup_height);

    let block = Block::default()
        .title(" Help - Keyboard Shortcuts ")
        .borders(Borders::ALL)
        .style(Style::default().bg(Color::Black));
    let inner = block.inner(popup_area);

    frame.render_widget(Clear, popup_area);
    frame.render_widget(block, popup_area);

    let paragraph = Paragraph::new(help_text)
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(Color::White));

    frame.render_widget(paragraph, inner);
}
