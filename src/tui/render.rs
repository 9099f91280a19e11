use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use super::app::App;
use super::mode::Focus;
use crate::constants::NO_TEMPLATES_MESSAGE;
use crate::session::ToastLevel;
use crate::view::{LineKind, PaneLine, Speaker};

/// Render the main UI
pub fn render_ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(0)
        .constraints(
            [
                Constraint::Length(3), // Header
                Constraint::Min(10),   // Main content
                Constraint::Length(3), // Composer
                Constraint::Length(1), // Status bar
            ]
            .as_ref(),
        )
        .split(frame.area());

    render_header(frame, chunks[0], app);

    let content_chunks = if app.show_sidebar {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(30), Constraint::Percentage(70)].as_ref())
            .split(chunks[1])
    } else {
        std::rc::Rc::new([Rect::default(), chunks[1]])
    };

    if app.show_sidebar {
        render_sidebar(frame, content_chunks[0], app);
    }

    render_chat(frame, content_chunks[1], app);
    render_input(frame, chunks[2], app);
    render_status_bar(frame, chunks[3], app);

    if app.confirming_delete {
        render_delete_prompt(frame, frame.area());
    }
}

/// Render the header
fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let header_text = vec![Line::from(vec![
        Span::styled("🌱 ", Style::default().fg(Color::Green)),
        Span::styled(
            "EcoSmart",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" | Asistente agrícola | "),
        Span::styled(&app.server_url, Style::default().fg(Color::Gray)),
    ])];

    let header = Paragraph::new(header_text)
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .alignment(Alignment::Center);

    frame.render_widget(header, area);
}

fn panel_border(app: &App, panel: Focus) -> Style {
    if app.focus == panel {
        Style::default().fg(panel.color())
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

/// Render the conversation list and, below it, the sample questions
fn render_sidebar(frame: &mut Frame, area: Rect, app: &App) {
    let areas = if app.show_templates {
        Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)].as_ref())
            .split(area)
    } else {
        std::rc::Rc::new([area, Rect::default()])
    };

    let items: Vec<ListItem> = app
        .view
        .sidebar
        .iter()
        .map(|entry| {
            let style = if entry.active {
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            let marker = if entry.active { "● " } else { "  " };
            ListItem::new(Line::from(vec![
                Span::styled(marker, style),
                Span::styled(entry.label.as_str(), style),
            ]))
        })
        .collect();

    let conversations = List::new(items)
        .block(
            Block::default()
                .title(format!(" Conversaciones [{}] ", app.view.sidebar.len()))
                .borders(Borders::ALL)
                .border_style(panel_border(app, Focus::Conversations)),
        )
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    let mut list_state = ListState::default();
    if app.focus == Focus::Conversations {
        list_state.select(Some(app.sidebar_cursor));
    }
    frame.render_stateful_widget(conversations, areas[0], &mut list_state);

    if app.show_templates {
        render_templates(frame, areas[1], app);
    }
}

fn render_templates(frame: &mut Frame, area: Rect, app: &App) {
    let templates = app.controller.templates();
    let block = Block::default()
        .title(format!(" Preguntas de ejemplo ({}) ", templates.user_type))
        .borders(Borders::ALL)
        .border_style(panel_border(app, Focus::Templates));

    if templates.is_empty() {
        let empty = Paragraph::new(NO_TEMPLATES_MESSAGE)
            .style(Style::default().fg(Color::DarkGray))
            .wrap(Wrap { trim: true })
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = templates
        .questions
        .iter()
        .map(|q| ListItem::new(q.as_str()).style(Style::default().fg(Color::Gray)))
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::REVERSED),
        );

    let mut list_state = ListState::default();
    if app.focus == Focus::Templates {
        list_state.select(Some(app.template_cursor));
    }
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn pane_line(line: &PaneLine) -> Line<'_> {
    let (color, italic) = match (line.speaker, line.kind) {
        (_, LineKind::Thinking) => (Color::DarkGray, true),
        (_, LineKind::Welcome) => (Color::Green, true),
        (Speaker::User, _) => (Color::Blue, false),
        (Speaker::Assistant, _) => (Color::Green, false),
    };

    let mut spans = Vec::new();
    if line.kind == LineKind::Message {
        let label = match &line.time {
            Some(time) => format!("{} [{}]: ", line.speaker.display_name(), time),
            None => format!("{}: ", line.speaker.display_name()),
        };
        spans.push(Span::styled(
            label,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ));
    }

    let mut text_style = Style::default();
    if italic {
        text_style = text_style.fg(color).add_modifier(Modifier::ITALIC);
    }
    spans.push(Span::styled(line.text.as_str(), text_style));

    Line::from(spans)
}

/// Scroll offset that puts the last wrapped row at the bottom of the pane,
/// less whatever the user scrolled back
fn bottom_offset(paragraph: &Paragraph, inner_width: u16, inner_height: u16, scroll_back: u16) -> u16 {
    let total = u16::try_from(paragraph.line_count(inner_width)).unwrap_or(u16::MAX);
    total.saturating_sub(inner_height).saturating_sub(scroll_back)
}

/// Render the message pane, pinned to the bottom unless scrolled back
fn render_chat(frame: &mut Frame, area: Rect, app: &App) {
    let mut lines = Vec::new();
    for line in &app.view.pane {
        lines.push(pane_line(line));
        lines.push(Line::from(""));
    }

    let title = match app.controller.state().current_id() {
        Some(id) => format!(" Chat [{}] ", id),
        None => " Chat ".to_string(),
    };

    // Count rows before the block is attached: its borders are not content
    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
    let offset = bottom_offset(
        &paragraph,
        area.width.saturating_sub(2),
        area.height.saturating_sub(2),
        app.scroll_back,
    );

    let paragraph = paragraph
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .scroll((offset, 0));

    frame.render_widget(paragraph, area);
}

/// Render the composer
fn render_input(frame: &mut Frame, area: Rect, app: &App) {
    let focused = app.focus == Focus::Composer && !app.confirming_delete;

    // Multi-line drafts show their last line
    let visible = app.input.rsplit('\n').next().unwrap_or_default();

    let input = Paragraph::new(visible)
        .style(Style::default().fg(Color::White))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(panel_border(app, Focus::Composer))
                .title(" Mensaje (Enter para enviar • Esc para borrar) "),
        );

    frame.render_widget(input, area);

    if focused {
        frame.set_cursor_position((composer_cursor_x(area, visible.chars().count()), area.y + 1));
    }
}

/// Cursor column after `typed` characters, kept inside the composer border
fn composer_cursor_x(area: Rect, typed: usize) -> u16 {
    let typed = u16::try_from(typed).unwrap_or(u16::MAX);
    let last_column = area.x.saturating_add(area.width.saturating_sub(2));
    area.x.saturating_add(1).saturating_add(typed).min(last_column)
}

/// Render the status bar
fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let waiting = app.controller.state().pending_count();

    let status = match app.toast() {
        Some(toast) => {
            let color = match toast.level {
                ToastLevel::Success => Color::Green,
                ToastLevel::Error => Color::Red,
            };
            Span::styled(toast.text.as_str(), Style::default().fg(color))
        }
        None if waiting > 0 => Span::styled(
            format!("Esperando {} respuesta(s)...", waiting),
            Style::default().fg(Color::Yellow),
        ),
        None => Span::raw("Listo"),
    };

    let spans = vec![
        Span::styled(
            format!(" {} ", app.focus.display_name()),
            Style::default()
                .bg(app.focus.color())
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" | "),
        status,
        Span::raw(" | "),
        Span::styled(app.focus.keyboard_hint(), Style::default().fg(Color::DarkGray)),
        Span::raw(" | "),
        Span::styled("Ctrl+C: salir", Style::default().fg(Color::DarkGray)),
    ];

    let status_bar = Paragraph::new(vec![Line::from(spans)])
        .style(Style::default().bg(Color::Black))
        .block(Block::default());

    frame.render_widget(status_bar, area);
}

/// Centered rectangle of the given size, clamped to `area`
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn render_delete_prompt(frame: &mut Frame, area: Rect) {
    let popup = centered(area, 54, 5);
    let text = vec![
        Line::from(Span::styled(
            "¿Eliminar la conversación actual?",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "[Y] Eliminar   [N] Cancelar",
            Style::default().fg(Color::Cyan),
        )),
    ];

    let prompt = Paragraph::new(text).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red)),
    );

    frame.render_widget(Clear, popup);
    frame.render_widget(prompt, popup);
}
