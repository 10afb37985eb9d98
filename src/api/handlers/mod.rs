//! HTTP request handlers, registered with the [`crate::dispatcher::Dispatcher`]
//! in [`crate::routes`].

pub mod health;
pub mod redirect;
pub mod shorten;
pub mod top;

pub use health::health_handler;
pub use redirect::redirect_handler;
pub use shorten::shorten_handler;
pub use top::{top_handler, version_handler};
