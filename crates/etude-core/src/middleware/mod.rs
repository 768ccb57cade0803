//! Built-in pipeline stages.
//!
//! Both are plain [`HandlerFunc`](crate::HandlerFunc)s and are installed with
//! `use_middleware` like any user stage. [`Engine::with_defaults`](crate::Engine::with_defaults)
//! installs `logger()` then `recovery()` on the root scope.

mod logger;
mod recovery;

pub use logger::logger;
pub use recovery::recovery;
