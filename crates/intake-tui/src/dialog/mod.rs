//! The add-account dialog: form state, submission, OAuth autofill and view.

pub mod oauth;
pub mod render;
pub mod state;
pub mod submit;

pub use render::render_dialog;
pub use state::{DialogOutcome, DialogState, Field, FormFields, Status};
