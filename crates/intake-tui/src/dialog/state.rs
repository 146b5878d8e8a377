//! Form controller state.
//!
//! Field values, the active tab, focus and the status line. Everything here
//! is plain data mutated by the reducer; no I/O.

use intake_core::accounts::{ApiAccountRequest, SessionTokenSource, WebAccountRequest};
use intake_core::config::AccountTab;
use intake_core::error::ValidationError;
use intake_core::oauth::OAuthSuccessPayload;

/// Progress of the current submission or login.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

/// How the dialog was dismissed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogOutcome {
    /// An account was stored.
    Saved,
    /// The user left without storing anything.
    Cancelled,
}

/// Editable inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// Email in web mode, free-form label in API mode.
    Email,
    AccessToken,
    SessionToken,
    ApiKey,
}

impl Field {
    /// Inputs shown for `tab`, in focus order.
    pub fn visible_in(tab: AccountTab) -> &'static [Field] {
        match tab {
            AccountTab::Web => &[Field::Email, Field::AccessToken, Field::SessionToken],
            AccountTab::Api => &[Field::Email, Field::ApiKey],
        }
    }
}

/// Raw field values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    pub email: String,
    pub access_token: String,
    pub session_token: String,
    pub api_key: String,
}

impl FormFields {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Email => &self.email,
            Field::AccessToken => &self.access_token,
            Field::SessionToken => &self.session_token,
            Field::ApiKey => &self.api_key,
        }
    }

    fn get_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Email => &mut self.email,
            Field::AccessToken => &mut self.access_token,
            Field::SessionToken => &mut self.session_token,
            Field::ApiKey => &mut self.api_key,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.email.is_empty()
            && self.access_token.is_empty()
            && self.session_token.is_empty()
            && self.api_key.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct DialogState {
    visible: bool,
    pub tab: AccountTab,
    pub fields: FormFields,
    pub session_token_source: SessionTokenSource,
    pub status: Status,
    pub message: String,
    pub focus: Field,
    outcome: Option<DialogOutcome>,
}

impl DialogState {
    /// Creates a closed dialog.
    pub fn new(tab: AccountTab) -> Self {
        Self {
            visible: false,
            tab,
            fields: FormFields::default(),
            session_token_source: SessionTokenSource::Manual,
            status: Status::Idle,
            message: String::new(),
            focus: Field::Email,
            outcome: None,
        }
    }

    /// Shows the dialog with `initial` values and a clean status.
    pub fn reset(&mut self, initial: FormFields, tab: AccountTab) {
        self.visible = true;
        self.tab = tab;
        self.fields = initial;
        self.session_token_source = SessionTokenSource::Manual;
        self.status = Status::Idle;
        self.message.clear();
        self.focus = Field::Email;
        self.outcome = None;
    }

    /// Hides the dialog and records why.
    pub fn hide(&mut self, outcome: DialogOutcome) {
        self.visible = false;
        self.outcome = Some(outcome);
    }

    pub fn is_open(&self) -> bool {
        self.visible
    }

    pub fn outcome(&self) -> Option<DialogOutcome> {
        self.outcome
    }

    // ------------------------------------------------------------------------
    // Derived state
    // ------------------------------------------------------------------------

    /// Checks the required fields for the active tab.
    ///
    /// # Errors
    /// Returns the first missing field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.fields.email.trim().is_empty() {
            return Err(ValidationError::MissingEmail);
        }
        match self.tab {
            AccountTab::Web if self.fields.access_token.trim().is_empty() => {
                Err(ValidationError::MissingAccessToken)
            }
            AccountTab::Api if self.fields.api_key.trim().is_empty() => {
                Err(ValidationError::MissingApiKey)
            }
            _ => Ok(()),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    pub fn inputs_disabled(&self) -> bool {
        matches!(self.status, Status::Loading | Status::Success)
    }

    pub fn can_submit(&self) -> bool {
        !self.inputs_disabled()
    }

    pub fn can_start_login(&self) -> bool {
        self.tab == AccountTab::Web && self.status != Status::Loading
    }

    pub fn can_cancel(&self) -> bool {
        self.status != Status::Success
    }

    pub fn visible_fields(&self) -> &'static [Field] {
        Field::visible_in(self.tab)
    }

    // ------------------------------------------------------------------------
    // Status
    // ------------------------------------------------------------------------

    pub fn set_status(&mut self, status: Status, message: impl Into<String>) {
        self.status = status;
        self.message = message.into();
    }

    pub fn clear_status(&mut self) {
        self.status = Status::Idle;
        self.message.clear();
    }

    /// An error stays on screen until the user acts again.
    fn dismiss_error(&mut self) {
        if self.status == Status::Error {
            self.clear_status();
        }
    }

    // ------------------------------------------------------------------------
    // Edits
    // ------------------------------------------------------------------------

    /// Replaces a field value. Ignored while inputs are disabled.
    pub fn set_field(&mut self, field: Field, value: &str) -> bool {
        self.edit(field, |text| {
            text.clear();
            text.push_str(value);
        })
    }

    pub fn insert_char(&mut self, c: char) -> bool {
        self.edit(self.focus, |text| text.push(c))
    }

    pub fn insert_str(&mut self, s: &str) -> bool {
        self.edit(self.focus, |text| text.push_str(s))
    }

    pub fn backspace(&mut self) -> bool {
        self.edit(self.focus, |text| {
            text.pop();
        })
    }

    pub fn clear_focused(&mut self) -> bool {
        self.edit(self.focus, String::clear)
    }

    fn edit(&mut self, field: Field, apply: impl FnOnce(&mut String)) -> bool {
        if self.inputs_disabled() {
            return false;
        }
        apply(self.fields.get_mut(field));
        if field == Field::SessionToken {
            self.session_token_source = SessionTokenSource::Manual;
        }
        self.dismiss_error();
        true
    }

    pub fn set_tab(&mut self, tab: AccountTab) {
        self.tab = tab;
        if !Field::visible_in(tab).contains(&self.focus) {
            self.focus = Field::Email;
        }
        self.dismiss_error();
    }

    pub fn toggle_tab(&mut self) {
        self.set_tab(self.tab.toggled());
    }

    pub fn focus_next(&mut self) {
        self.move_focus(1);
    }

    pub fn focus_prev(&mut self) {
        self.move_focus(-1);
    }

    fn move_focus(&mut self, delta: isize) {
        let fields = self.visible_fields();
        let current = fields.iter().position(|f| *f == self.focus).unwrap_or(0);
        let len = fields.len() as isize;
        let next = (current as isize + delta).rem_euclid(len) as usize;
        self.focus = fields[next];
    }

    /// Fills the web credentials delivered by the OAuth flow.
    ///
    /// The refresh token lands in the session-token field, tagged so the
    /// store can tell it apart from a pasted session token.
    pub fn autofill(&mut self, payload: OAuthSuccessPayload) {
        self.fields.email = payload.email;
        self.fields.access_token = payload.access_token;
        self.fields.session_token = payload.refresh_token;
        self.session_token_source = SessionTokenSource::OAuthRefresh;
        self.set_tab(AccountTab::Web);
    }

    // ------------------------------------------------------------------------
    // Requests
    // ------------------------------------------------------------------------

    pub fn web_request(&self) -> WebAccountRequest {
        WebAccountRequest {
            email: self.fields.email.trim().to_string(),
            access_token: self.fields.access_token.trim().to_string(),
            session_token: self.fields.session_token.trim().to_string(),
            session_token_source: self.session_token_source,
        }
    }

    pub fn api_request(&self) -> ApiAccountRequest {
        ApiAccountRequest {
            email: self.fields.email.trim().to_string(),
            api_key: self.fields.api_key.trim().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_dialog(tab: AccountTab) -> DialogState {
        let mut state = DialogState::new(tab);
        state.reset(FormFields::default(), tab);
        state
    }

    #[test]
    fn test_new_dialog_is_closed() {
        let state = DialogState::new(AccountTab::Web);
        assert!(!state.is_open());
        assert_eq!(state.outcome(), None);
    }

    #[test]
    fn test_validity_per_tab() {
        let mut state = open_dialog(AccountTab::Web);
        assert_eq!(state.validate(), Err(ValidationError::MissingEmail));

        state.set_field(Field::Email, "  a@b.com ");
        assert_eq!(state.validate(), Err(ValidationError::MissingAccessToken));

        state.set_field(Field::AccessToken, "tok");
        assert!(state.is_valid());

        state.set_tab(AccountTab::Api);
        assert_eq!(state.validate(), Err(ValidationError::MissingApiKey));
        state.set_field(Field::ApiKey, "sk-123");
        assert!(state.is_valid());
    }

    #[test]
    fn test_whitespace_only_email_is_missing() {
        let mut state = open_dialog(AccountTab::Api);
        state.set_field(Field::Email, "   ");
        state.set_field(Field::ApiKey, "sk-123");
        assert_eq!(state.validate(), Err(ValidationError::MissingEmail));
    }

    #[test]
    fn test_edits_ignored_while_busy() {
        let mut state = open_dialog(AccountTab::Web);
        state.set_status(Status::Loading, "Loading...");
        assert!(!state.insert_char('x'));
        assert!(state.fields.email.is_empty());

        state.set_status(Status::Success, "done");
        assert!(!state.set_field(Field::Email, "a@b.com"));
        assert!(state.fields.email.is_empty());
    }

    #[test]
    fn test_edit_dismisses_error() {
        let mut state = open_dialog(AccountTab::Web);
        state.set_status(Status::Error, "Please enter an email");
        assert!(state.insert_char('a'));
        assert_eq!(state.status, Status::Idle);
        assert!(state.message.is_empty());
    }

    #[test]
    fn test_tab_switch_dismisses_error_and_clamps_focus() {
        let mut state = open_dialog(AccountTab::Web);
        state.focus = Field::SessionToken;
        state.set_status(Status::Error, "boom");

        state.toggle_tab();
        assert_eq!(state.tab, AccountTab::Api);
        assert_eq!(state.focus, Field::Email);
        assert_eq!(state.status, Status::Idle);
    }

    #[test]
    fn test_focus_cycles_visible_fields() {
        let mut state = open_dialog(AccountTab::Web);
        state.focus_next();
        assert_eq!(state.focus, Field::AccessToken);
        state.focus_next();
        assert_eq!(state.focus, Field::SessionToken);
        state.focus_next();
        assert_eq!(state.focus, Field::Email);
        state.focus_prev();
        assert_eq!(state.focus, Field::SessionToken);

        state.set_tab(AccountTab::Api);
        state.focus_next();
        assert_eq!(state.focus, Field::ApiKey);
        state.focus_next();
        assert_eq!(state.focus, Field::Email);
    }

    #[test]
    fn test_autofill_marks_refresh_token_and_manual_edit_resets() {
        let mut state = open_dialog(AccountTab::Api);
        state.autofill(OAuthSuccessPayload {
            email: "x@y.com".to_string(),
            access_token: "tok".to_string(),
            refresh_token: "ref".to_string(),
        });

        assert_eq!(state.tab, AccountTab::Web);
        assert_eq!(state.fields.email, "x@y.com");
        assert_eq!(state.fields.access_token, "tok");
        assert_eq!(state.fields.session_token, "ref");
        assert_eq!(state.session_token_source, SessionTokenSource::OAuthRefresh);

        state.focus = Field::SessionToken;
        state.backspace();
        assert_eq!(state.session_token_source, SessionTokenSource::Manual);
    }

    #[test]
    fn test_requests_are_trimmed() {
        let mut state = open_dialog(AccountTab::Web);
        state.set_field(Field::Email, " a@b.com ");
        state.set_field(Field::AccessToken, "tok\t");
        let request = state.web_request();
        assert_eq!(request.email, "a@b.com");
        assert_eq!(request.access_token, "tok");
        assert_eq!(request.session_token, "");
    }

    #[test]
    fn test_reset_restores_initial_values() {
        let mut state = open_dialog(AccountTab::Web);
        state.set_field(Field::Email, "old@b.com");
        state.set_status(Status::Error, "boom");
        state.hide(DialogOutcome::Cancelled);

        state.reset(FormFields::default(), AccountTab::Web);
        assert!(state.is_open());
        assert!(state.fields.is_empty());
        assert_eq!(state.status, Status::Idle);
        assert!(state.message.is_empty());
        assert_eq!(state.outcome(), None);
    }

    #[test]
    fn test_action_availability() {
        let mut state = open_dialog(AccountTab::Web);
        assert!(state.can_submit());
        assert!(state.can_start_login());
        assert!(state.can_cancel());

        state.set_status(Status::Loading, "");
        assert!(!state.can_submit());
        assert!(!state.can_start_login());
        assert!(state.can_cancel());

        state.set_status(Status::Success, "");
        assert!(!state.can_submit());
        assert!(state.can_start_login());
        assert!(!state.can_cancel());

        state.set_status(Status::Idle, "");
        state.set_tab(AccountTab::Api);
        assert!(!state.can_start_login());
    }
}
