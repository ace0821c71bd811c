//! Application state, forms and key handling

pub mod form;
pub mod screen;
pub mod state;

pub use form::{FieldKind, Form};
pub use screen::{Modal, Status, StatusLevel, Tab};
pub use state::{App, REPORT_TITLE};
