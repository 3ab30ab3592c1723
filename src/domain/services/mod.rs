pub mod actions;
mod auth;
mod drafts;
mod editor;
pub mod preview;
pub mod substitution;
pub mod validation;

pub use auth::*;
pub use drafts::*;
pub use editor::*;
pub use preview::PreviewPane;
pub use preview::PreviewState;
