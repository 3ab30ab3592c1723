mod action;
mod draft;
mod errors;
mod event;
mod template;
mod user;
mod variable;

pub use action::*;
pub use draft::*;
pub use errors::*;
pub use event::*;
pub use template::*;
pub use user::*;
pub use variable::*;
