//! Page components.

mod not_found;
mod panic;
mod viewer;

pub use not_found::NotFoundPage;
pub use panic::{PanicPage, set_panic_hook};
pub use viewer::ViewerPage;
