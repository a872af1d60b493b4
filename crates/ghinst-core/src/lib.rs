//! Core library for ghinst.
//!
//! The install pipeline, leaves first:
//!
//! ```text
//! registry::github ──> select ──> io::download ──> io::extract ──> store
//!   (Release)          (&Asset)    (temp file)     (payload)      (version dir + bin link)
//! ```
//!
//! [`select`] and [`io::extract`] are synchronous and pure apart from temp
//! files; the network collaborators are async.

pub mod io;
pub mod paths;
pub mod registry;
pub mod reporter;
pub mod select;
pub mod store;

pub use paths::*;
pub use reporter::{NullReporter, Reporter};

/// User Agent string for registry and download requests
pub const USER_AGENT: &str = concat!("ghinst/", env!("CARGO_PKG_VERSION"));
