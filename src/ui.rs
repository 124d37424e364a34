use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, Tabs},
};

use textwrap::Options;
use unicode_width::UnicodeWidthChar;

use crate::app::{App, BackendStatus, InputMode, Tab};
use crate::input::InputField;
use crate::simulator::SimField;
use crate::state::{ChatRole, Direction, Viewport};

fn cell_width(c: char) -> usize {
    c.width().unwrap_or(0)
}

/// Word-wrap prose to `width` terminal cells. Words wider than a line are
/// split so every returned line fits.
fn wrap_prose(text: &str, width: usize) -> Vec<String> {
    if width == 0 || text.is_empty() {
        return vec![text.to_string()];
    }
    textwrap::wrap(text, Options::new(width).break_words(true))
        .into_iter()
        .map(|line| line.into_owned())
        .collect()
}

/// Hard-wrap to `width` terminal cells without touching whitespace, so JSON
/// indentation survives.
fn wrap_cells(text: &str, width: usize) -> Vec<String> {
    if width == 0 || text.is_empty() {
        return vec![text.to_string()];
    }
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = cell_width(c);
        if used + w > width && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
            used = 0;
        }
        current.push(c);
        used += w;
    }
    lines.push(current);
    lines
}

fn push_wrapped(
    lines: &mut Vec<Line<'static>>,
    text: &str,
    width: usize,
    wrap: fn(&str, usize) -> Vec<String>,
    style: Style,
    alignment: Alignment,
) {
    for raw in text.split('\n') {
        for chunk in wrap(raw, width) {
            lines.push(Line::from(Span::styled(chunk, style)).alignment(alignment));
        }
    }
}

/// The part of `text` shown in an input `width` cells wide, scrolled so the
/// cursor (a char index) stays on screen, and the cursor's cell column in it.
fn input_window(text: &str, cursor: usize, width: usize) -> (String, u16) {
    let chars: Vec<char> = text.chars().collect();
    let cursor = cursor.min(chars.len());

    // one cell stays free for the cursor
    let budget = width.saturating_sub(1);
    let mut start = cursor;
    let mut before = 0;
    while start > 0 && before + cell_width(chars[start - 1]) <= budget {
        start -= 1;
        before += cell_width(chars[start]);
    }

    let mut end = start;
    let mut shown = 0;
    while end < chars.len() && shown + cell_width(chars[end]) <= width {
        shown += cell_width(chars[end]);
        end += 1;
    }

    (chars[start..end].iter().collect(), before as u16)
}

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, body, footer
    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, frame, header_area);

    match app.tab {
        Tab::Chat => render_chat(app, frame, body_area),
        Tab::Simulator => render_simulator(app, frame, body_area),
    }

    render_footer(app, frame, footer_area);
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let [tabs_area, status_area] = Layout::horizontal([
        Constraint::Min(0),
        Constraint::Length(status_width(app)),
    ])
    .areas(area);

    let selected = Tab::all().iter().position(|t| *t == app.tab).unwrap_or(0);
    let tabs = Tabs::new(Tab::all().iter().map(|t| format!(" {} ", t.title())))
        .select(selected)
        .style(Style::default().bg(Color::DarkGray).fg(Color::White))
        .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .divider("|");
    frame.render_widget(tabs, tabs_area);

    let (dot_color, status) = match app.backend_status {
        BackendStatus::Unknown => (Color::Gray, "unknown"),
        BackendStatus::Online => (Color::Green, "online"),
        BackendStatus::Offline => (Color::Red, "offline"),
    };
    let status_line = Line::from(vec![
        Span::raw(format!("{} ", app.client.base_url())),
        Span::styled("● ", Style::default().fg(dot_color)),
        Span::raw(format!("{status} ")),
    ]);
    frame.render_widget(
        Paragraph::new(status_line)
            .alignment(Alignment::Right)
            .style(Style::default().bg(Color::DarkGray).fg(Color::White)),
        status_area,
    );
}

fn status_width(app: &App) -> u16 {
    // url + " ● " + "offline "
    (app.client.base_url().chars().count() + 12) as u16
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let mode_style = match app.input_mode {
        InputMode::Normal => Style::default().bg(Color::Blue).fg(Color::White),
        InputMode::Editing => Style::default().bg(Color::Yellow).fg(Color::Black),
    };
    let mode_text = match app.input_mode {
        InputMode::Normal => " NORMAL ",
        InputMode::Editing => " EDIT ",
    };

    // Key style: dark background with bright text for visibility on both light/dark terminals
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);

    let keys: &[(&str, &str)] = match (app.input_mode, app.tab) {
        (InputMode::Normal, _) => &[
            ("i", "edit"),
            ("Tab", "switch panel"),
            ("j/k", "scroll"),
            ("G", "latest"),
            ("r", "ping backend"),
            ("q", "quit"),
        ],
        (InputMode::Editing, Tab::Chat) => &[
            ("Enter", "send"),
            ("Esc", "stop editing"),
            ("^T", "switch panel"),
            ("PgUp/PgDn", "scroll"),
        ],
        (InputMode::Editing, Tab::Simulator) => &[
            ("Enter", "send"),
            ("Tab", "next field"),
            ("Esc", "stop editing"),
            ("^T", "switch panel"),
            ("PgUp/PgDn", "scroll"),
        ],
    };

    let mut spans = vec![Span::styled(mode_text, mode_style), Span::raw(" ")];
    for (key, label) in keys {
        spans.push(Span::styled(format!(" {key} "), key_style));
        spans.push(Span::styled(format!(" {label} "), label_style));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_chat(app: &mut App, frame: &mut Frame, area: Rect) {
    let [history_area, input_area] = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(3),
    ])
    .areas(area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Chatbot ");
    let inner = block.inner(history_area);
    let width = inner.width as usize;

    let mut lines: Vec<Line<'static>> = Vec::new();
    for msg in app.chat.display_messages() {
        let (label, label_style, body_style, alignment) = match msg.role {
            ChatRole::User => (
                "You",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                Style::default().fg(Color::Cyan),
                Alignment::Right,
            ),
            _ if msg.failed => (
                "Bot",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                Style::default().fg(Color::Red),
                Alignment::Left,
            ),
            _ => (
                "Bot",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                Style::default(),
                Alignment::Left,
            ),
        };
        lines.push(Line::from(Span::styled(label, label_style)).alignment(alignment));
        push_wrapped(&mut lines, &msg.content, width, wrap_prose, body_style, alignment);
        lines.push(Line::default());
    }

    if lines.is_empty() && !app.chat.is_loading() {
        lines.push(Line::from(Span::styled(
            "Start chatting...",
            Style::default().fg(Color::DarkGray),
        )));
    }

    if app.chat.is_loading() {
        // Animated ellipsis: cycles through ".", "..", "..."
        let dots = ".".repeat((app.animation_frame as usize) + 1);
        lines.push(Line::from(Span::styled(
            format!("Thinking{dots}"),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )));
    }

    render_scrolled(frame, history_area, block, lines, &mut app.chat.viewport);

    let title = if app.chat.is_loading() {
        " Waiting for reply... "
    } else {
        " Type your message "
    };
    let editing = app.input_mode == InputMode::Editing;
    render_input(frame, input_area, &app.chat.input, title, editing, !app.chat.is_loading());
}

fn render_simulator(app: &mut App, frame: &mut Frame, area: Rect) {
    let [form_area, log_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(0),
    ])
    .areas(area);
    let [user_area, text_area] = Layout::horizontal([
        Constraint::Length(26),
        Constraint::Min(0),
    ])
    .areas(form_area);

    let editing = app.input_mode == InputMode::Editing;
    let sim = &app.simulator;
    render_input(
        frame,
        user_area,
        &sim.user_id,
        " userId ",
        editing && sim.focus == SimField::UserId,
        true,
    );
    let text_title = if sim.is_loading() {
        format!(" Sending{} ", ".".repeat((app.animation_frame as usize) + 1))
    } else {
        " Type a simulated LINE message ".to_string()
    };
    render_input(
        frame,
        text_area,
        &sim.text,
        &text_title,
        editing && sim.focus == SimField::Text,
        !sim.is_loading(),
    );

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Webhook log ");
    let width = block.inner(log_area).width as usize;

    let mut lines: Vec<Line<'static>> = Vec::new();
    for entry in app.simulator.log() {
        let label_style = match entry.direction {
            Direction::Error => Style::default().fg(Color::Red),
            _ => Style::default().fg(Color::DarkGray),
        };
        lines.push(Line::from(Span::styled(entry.direction.label(), label_style)));
        push_wrapped(
            &mut lines,
            &entry.pretty_body(),
            width,
            wrap_cells,
            Style::default(),
            Alignment::Left,
        );
        lines.push(Line::default());
    }

    if lines.is_empty() {
        lines.push(Line::from(Span::styled(
            "No events yet. Send a simulated message.",
            Style::default().fg(Color::DarkGray),
        )));
    }

    render_scrolled(frame, log_area, block, lines, &mut app.simulator.viewport);
}

fn render_scrolled(
    frame: &mut Frame,
    area: Rect,
    block: Block<'static>,
    lines: Vec<Line<'static>>,
    viewport: &mut Viewport,
) {
    let visible = block.inner(area).height;
    let total = u16::try_from(lines.len()).unwrap_or(u16::MAX);
    let offset = viewport.resolve(total, visible);

    frame.render_widget(Paragraph::new(lines).block(block).scroll((offset, 0)), area);

    if total > visible {
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .begin_symbol(Some("^"))
            .end_symbol(Some("v"));
        let mut scrollbar_state = ScrollbarState::new(total.saturating_sub(visible) as usize)
            .position(offset as usize);

        frame.render_stateful_widget(
            scrollbar,
            area.inner(Margin { vertical: 1, horizontal: 0 }),
            &mut scrollbar_state,
        );
    }
}

/// Bordered single-line input with horizontal scrolling to keep the cursor visible
fn render_input(
    frame: &mut Frame,
    area: Rect,
    field: &InputField,
    title: &str,
    focused: bool,
    enabled: bool,
) {
    let border_color = if focused { Color::Yellow } else { Color::DarkGray };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(title.to_string());

    let inner_width = area.width.saturating_sub(2) as usize;
    let (visible_text, cursor_x) = input_window(field.as_str(), field.cursor(), inner_width);

    let text_style = if enabled {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    frame.render_widget(Paragraph::new(visible_text).style(text_style).block(block), area);

    if focused && enabled {
        frame.set_cursor_position((area.x + cursor_x + 1, area.y + 1));
    }
}
