//! Types shared between the board core, the desktop board and the tools CLI.

pub mod domain;
pub mod error;
