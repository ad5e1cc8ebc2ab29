//! Core types shared by the ignore engine and the command-line front end.

pub mod error;

pub use error::{Result, SgrepError};
