use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use super::text::truncate_start_with_ellipsis;

/// Calculates a centered popup area, clamped to the available space.
pub fn calculate_overlay_area(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(2));

    let overlay_x = area.x + (area.width.saturating_sub(width)) / 2;
    let overlay_y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(overlay_x, overlay_y, width, height)
}

/// Renders the base container for an overlay (clears background, draws border and title).
pub fn render_overlay_container(frame: &mut Frame, area: Rect, title: &str, border_color: Color) {
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(format!(" {title} "))
        .title_style(
            Style::default()
                .fg(border_color)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(block, area);
}

/// Helper struct for keyboard hints.
pub struct InputHint<'a> {
    pub key: &'a str,
    pub action: &'a str,
}

impl<'a> InputHint<'a> {
    pub fn new(key: &'a str, action: &'a str) -> Self {
        Self { key, action }
    }
}

/// A single labelled form input.
pub struct InputLine<'a> {
    pub value: &'a str,
    pub placeholder: &'a str,
    pub prompt: &'a str,
    pub focused: bool,
    pub disabled: bool,
    pub accent: Color,
}

/// Renders a prompt-style input line: "> <text>█".
///
/// The cursor is drawn only on the focused, enabled input.
pub fn render_input_line(frame: &mut Frame, area: Rect, input: &InputLine<'_>) {
    let show_cursor = input.focused && !input.disabled;
    let reserved = input.prompt.chars().count() + usize::from(show_cursor);
    let max_text_width = (area.width as usize).saturating_sub(reserved);

    let prompt_color = if input.focused {
        input.accent
    } else {
        Color::DarkGray
    };
    let text_color = if input.disabled {
        Color::DarkGray
    } else {
        Color::White
    };

    let mut spans = vec![Span::styled(input.prompt, Style::default().fg(prompt_color))];

    if input.value.is_empty() {
        if show_cursor {
            spans.push(Span::styled("█", Style::default().fg(input.accent)));
        }
        spans.push(Span::styled(
            truncate_start_with_ellipsis(input.placeholder, max_text_width),
            Style::default().fg(Color::DarkGray),
        ));
    } else {
        spans.push(Span::styled(
            truncate_start_with_ellipsis(input.value, max_text_width),
            Style::default().fg(text_color),
        ));
        if show_cursor {
            spans.push(Span::styled("█", Style::default().fg(input.accent)));
        }
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Renders a line of keyboard hints on the last row of `area`.
pub fn render_hints(frame: &mut Frame, area: Rect, hints: &[InputHint], highlight_color: Color) {
    let hints_y = area.y + area.height.saturating_sub(1);
    let hints_area = Rect::new(area.x, hints_y, area.width, 1);

    let mut spans = Vec::new();
    for (i, hint) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" • ", Style::default().fg(Color::DarkGray)));
        }
        spans.push(Span::styled(hint.key, Style::default().fg(highlight_color)));
        spans.push(Span::styled(
            format!(" {}", hint.action),
            Style::default().fg(Color::DarkGray),
        ));
    }

    let para = Paragraph::new(Line::from(spans)).alignment(Alignment::Center);
    frame.render_widget(para, hints_area);
}
