//! Kotlin source model and renderer for ktpoet.
//!
//! Build declarations with the builders in [`spec`], compose bodies from
//! [`code`] templates, then [`render`] a [`FileSpec`](spec::FileSpec) to text.
//! Imports are decided per file: every referenced type and member that can be
//! imported is, and clashing simple names get deterministic aliases.
//!
//! # Module Organization
//!
//! - [`names`] - Type and member names (ClassName, TypeName, MemberName, etc.)
//! - [`code`] - Templates and code blocks (CodeBlock, Arg, etc.)
//! - [`spec`] - Declarations (TypeSpec, FunSpec, PropertySpec, FileSpec, etc.)
//! - [`generation`] - Import resolution and name allocation
//! - [`writer`] - Indentation and line wrapping
//! - [`config`] - Render settings
//!
//! ```
//! use ktpoet_codegen::{RenderConfig, args, names::kotlin, render, spec::{FileSpec, FunSpec}};
//!
//! let greet = FunSpec::builder("greet")
//!     .returns(kotlin::string())
//!     .add_statement("return %S", args!["hello"])
//!     .unwrap()
//!     .build()
//!     .unwrap();
//! let file = FileSpec::builder("com.example", "Greeter")
//!     .add_function(greet)
//!     .build()
//!     .unwrap();
//! let text = render(&file, &RenderConfig::default()).unwrap();
//! assert!(text.ends_with("public fun greet(): String = \"hello\"\n"));
//! ```

pub mod code;
pub mod config;
pub mod generation;
pub mod names;
mod render;
pub mod spec;
pub mod writer;

pub use config::{AliasPolicy, RenderConfig};
pub use render::{render, render_with_imports, resolve_imports};
