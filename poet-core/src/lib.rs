//! Core utilities and types for ktpoet.
//!
//! This crate provides the error taxonomy, literal and identifier
//! formatting, and file output shared by the rest of the workspace.

// Miette's derive macro generates code that triggers these warnings
#![allow(unused_assignments)]

mod error;
mod file;
mod identifier;
mod literal;
mod utils;

pub use error::{Error, Result};
// File operations
pub use file::{GeneratedFile, OutputFile, Overwrite, WriteResult};
// Identifiers
pub use identifier::{
    KEYWORDS, escape_as_alias, escape_if_necessary, escape_segments_if_necessary,
    is_identifier, is_identifier_part, is_identifier_start, is_keyword,
};
// Literals
pub use literal::{StringStyle, escape_char, format_f32, format_f64, format_integer, string_literal};
// String utilities
pub use utils::{capitalize, decapitalize};
