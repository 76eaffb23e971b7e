//! Code fragments: templates with typed placeholders.
//!
//! | Placeholder | Argument | Output |
//! |---|---|---|
//! | `%L` | anything but a type or member | the value as-is |
//! | `%N` | string, member or declaration | an identifier, backticked if needed |
//! | `%S` | string, number or null | an escaped string literal |
//! | `%P` | string, number, null or code block | a string template (`$` stays live) |
//! | `%T` | type | the type, imported where possible |
//! | `%M` | member | the member, imported where possible |
//! | `%%` | none | `%` |
//!
//! `⇥`/`⇤` indent and unindent, `«`/`»` open and close a statement, `♢` marks
//! a wrap point and `·` a space that never wraps.

mod arg;
mod block;
mod parse;

pub use arg::Arg;
pub use block::{CodeBlock, CodeBlockBuilder};
pub(crate) use block::{CodePart, Placeholder};
