//! Dialog view.

use intake_core::config::AccountTab;
use intake_core::strings::Strings;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use super::state::{DialogState, Field, Status};
use crate::common::render_utils::{
    InputHint, InputLine, calculate_overlay_area, render_hints, render_input_line,
    render_overlay_container,
};
use crate::common::text::{mask_input, truncate_with_ellipsis};

const SPINNER_FRAMES: &[&str] = &["◐", "◓", "◑", "◒"];
pub const SPINNER_SPEED_DIVISOR: usize = 6;

const POPUP_WIDTH: u16 = 72;
const WEB_ACCENT: Color = Color::Green;
const API_ACCENT: Color = Color::Magenta;

/// Renders the dialog centered in `area`. Does nothing when closed.
pub fn render_dialog(
    frame: &mut Frame,
    dialog: &DialogState,
    strings: &Strings,
    spinner_frame: usize,
    area: Rect,
) {
    if !dialog.is_open() {
        return;
    }

    let accent = match dialog.tab {
        AccountTab::Web => WEB_ACCENT,
        AccountTab::Api => API_ACCENT,
    };
    let popup = calculate_overlay_area(area, POPUP_WIDTH, popup_height(dialog));
    render_overlay_container(frame, popup, &strings.t("accounts.add.openai.title"), accent);

    let inner = Rect::new(
        popup.x + 2,
        popup.y + 1,
        popup.width.saturating_sub(4),
        popup.height.saturating_sub(2),
    );
    if inner.height == 0 || inner.width == 0 {
        return;
    }

    let mut rows = Rows::new(frame, inner);
    rows.line(tabs_line(dialog.tab, strings));
    rows.skip(1);
    rows.line(status_line(dialog, spinner_frame, inner.width as usize));

    let (desc_key, desc_color) = match dialog.tab {
        AccountTab::Web => ("accounts.add.openai.web.desc", Color::Cyan),
        AccountTab::Api => ("accounts.add.openai.api.desc", Color::Yellow),
    };
    rows.line(Line::from(Span::styled(
        truncate_with_ellipsis(&strings.t(desc_key), inner.width as usize),
        Style::default().fg(desc_color),
    )));
    rows.skip(1);

    for field in dialog.visible_fields() {
        rows.line(label_line(dialog, *field, strings, accent));
        rows.input(dialog, *field, strings, accent);
        if *field == Field::Email && dialog.tab == AccountTab::Web {
            rows.line(sign_in_line(dialog, strings));
        }
    }

    rows.skip(1);
    rows.line(buttons_line(dialog, strings, accent));

    let hints = hints(dialog.tab, strings);
    let hints: Vec<InputHint<'_>> = hints
        .iter()
        .map(|(key, action)| InputHint::new(key, action))
        .collect();
    render_hints(frame, inner, &hints, accent);
}

/// Rows inside the popup, including borders.
pub fn popup_height(dialog: &DialogState) -> u16 {
    // tabs, gap, status, desc, gap, [label + input per field], gap, buttons, hints, borders
    let fields = dialog.visible_fields().len() as u16;
    let sign_in = u16::from(dialog.tab == AccountTab::Web);
    5 + fields * 2 + sign_in + 3 + 2
}

struct Rows<'a, 'f> {
    frame: &'a mut Frame<'f>,
    area: Rect,
    y: u16,
}

impl<'a, 'f> Rows<'a, 'f> {
    fn new(frame: &'a mut Frame<'f>, area: Rect) -> Self {
        Self {
            frame,
            area,
            y: area.y,
        }
    }

    /// Last row is reserved for hints.
    fn has_room(&self) -> bool {
        self.y < self.area.y + self.area.height.saturating_sub(1)
    }

    fn next_row(&mut self) -> Option<Rect> {
        if !self.has_room() {
            return None;
        }
        let row = Rect::new(self.area.x, self.y, self.area.width, 1);
        self.y += 1;
        Some(row)
    }

    fn skip(&mut self, n: u16) {
        self.y = self.y.saturating_add(n);
    }

    fn line(&mut self, line: Line<'static>) {
        if let Some(row) = self.next_row() {
            self.frame.render_widget(Paragraph::new(line), row);
        }
    }

    fn input(&mut self, dialog: &DialogState, field: Field, strings: &Strings, accent: Color) {
        let Some(row) = self.next_row() else {
            return;
        };
        let raw = dialog.fields.get(field);
        let masked;
        let value = if field == Field::ApiKey {
            masked = mask_input(raw);
            masked.as_str()
        } else {
            raw
        };
        let placeholder = strings.t(placeholder_key(dialog.tab, field));
        render_input_line(
            self.frame,
            row,
            &InputLine {
                value,
                placeholder: &placeholder,
                prompt: "> ",
                focused: dialog.focus == field,
                disabled: dialog.inputs_disabled(),
                accent,
            },
        );
    }
}

fn label_key(tab: AccountTab, field: Field) -> &'static str {
    match (tab, field) {
        (AccountTab::Web, Field::Email) => "accounts.add.openai.web.email",
        (AccountTab::Api, Field::Email) => "accounts.add.openai.api.email",
        (_, Field::AccessToken) => "accounts.add.openai.web.access_token",
        (_, Field::SessionToken) => "accounts.add.openai.web.session_token",
        (_, Field::ApiKey) => "accounts.add.openai.api.api_key",
    }
}

fn placeholder_key(tab: AccountTab, field: Field) -> &'static str {
    match (tab, field) {
        (AccountTab::Web, Field::Email) => "accounts.add.openai.web.email_placeholder",
        (AccountTab::Api, Field::Email) => "accounts.add.openai.api.email_placeholder",
        (_, Field::AccessToken) => "accounts.add.openai.web.access_token_placeholder",
        (_, Field::SessionToken) => "accounts.add.openai.web.session_token_placeholder",
        (_, Field::ApiKey) => "accounts.add.openai.api.api_key_placeholder",
    }
}

fn tabs_line(active: AccountTab, strings: &Strings) -> Line<'static> {
    let tab_span = |tab: AccountTab, key: &str, accent: Color| {
        let label = format!(" {} ", strings.t(key));
        if tab == active {
            Span::styled(
                label,
                Style::default()
                    .fg(Color::Black)
                    .bg(accent)
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            Span::styled(label, Style::default().fg(Color::DarkGray))
        }
    };
    Line::from(vec![
        tab_span(AccountTab::Web, "accounts.add.openai.tabs.web", WEB_ACCENT),
        Span::raw("  "),
        tab_span(AccountTab::Api, "accounts.add.openai.tabs.api", API_ACCENT),
    ])
}

fn status_line(dialog: &DialogState, spinner_frame: usize, width: usize) -> Line<'static> {
    if dialog.status == Status::Idle || dialog.message.is_empty() {
        return Line::from("");
    }
    let (icon, color) = match dialog.status {
        Status::Loading => (
            SPINNER_FRAMES[(spinner_frame / SPINNER_SPEED_DIVISOR) % SPINNER_FRAMES.len()],
            Color::Cyan,
        ),
        Status::Success => ("✓", Color::Green),
        Status::Error | Status::Idle => ("✗", Color::Red),
    };
    let text = truncate_with_ellipsis(&dialog.message, width.saturating_sub(2));
    Line::from(vec![
        Span::styled(format!("{icon} "), Style::default().fg(color)),
        Span::styled(text, Style::default().fg(color)),
    ])
}

fn label_line(
    dialog: &DialogState,
    field: Field,
    strings: &Strings,
    accent: Color,
) -> Line<'static> {
    let style = if dialog.focus == field {
        Style::default().fg(accent).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };
    Line::from(Span::styled(
        strings.t(label_key(dialog.tab, field)).to_uppercase(),
        style,
    ))
}

fn sign_in_line(dialog: &DialogState, strings: &Strings) -> Line<'static> {
    let color = if dialog.can_start_login() {
        Color::Blue
    } else {
        Color::DarkGray
    };
    Line::from(vec![
        Span::styled("Ctrl+L ", Style::default().fg(color)),
        Span::styled(
            strings.t("accounts.add.openai.oauth.sign_in"),
            Style::default().fg(color).add_modifier(Modifier::UNDERLINED),
        ),
    ])
}

fn buttons_line(dialog: &DialogState, strings: &Strings, accent: Color) -> Line<'static> {
    let button = |label: String, enabled: bool, color: Color| {
        let style = if enabled {
            Style::default().fg(color).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        Span::styled(format!("[ {label} ]"), style)
    };
    let confirm = if dialog.status == Status::Loading {
        format!("… {}", strings.t("common.confirm"))
    } else {
        strings.t("common.confirm")
    };
    Line::from(vec![
        button(strings.t("common.cancel"), dialog.can_cancel(), Color::Gray),
        Span::raw("  "),
        button(confirm, dialog.can_submit(), accent),
    ])
}

fn hints(tab: AccountTab, strings: &Strings) -> Vec<(&'static str, String)> {
    let mut hints = vec![
        ("Ctrl+T", strings.t("accounts.add.openai.hints.switch_tab")),
        ("Tab", strings.t("accounts.add.openai.hints.next_field")),
    ];
    if tab == AccountTab::Web {
        hints.push(("Ctrl+L", strings.t("accounts.add.openai.hints.sign_in")));
    }
    hints.push(("Enter", strings.t("common.confirm").to_lowercase()));
    hints.push(("Esc", strings.t("common.cancel").to_lowercase()));
    hints
}
