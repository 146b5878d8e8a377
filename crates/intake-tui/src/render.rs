//! Pure view functions.
//!
//! Takes `&AppState`, draws to a ratatui `Frame`, never mutates state.

use ratatui::Frame;

use crate::dialog::render_dialog;
use crate::state::AppState;

pub fn render(app: &AppState, frame: &mut Frame) {
    let area = frame.area();
    render_dialog(frame, &app.dialog, &app.strings, app.spinner_frame, area);
}
