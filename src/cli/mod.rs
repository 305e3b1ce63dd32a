//! CLI front end
//!
//! The interactive menu shell that bridges terminal input with the service
//! layer.

pub mod shell;

pub use shell::Shell;
