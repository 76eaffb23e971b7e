//! Declaration specs: immutable descriptions of Kotlin declarations built
//! through consuming builders.

mod annotation;
mod file;
mod function;
mod modifier;
mod parameter;
mod property;
mod type_alias;
mod type_spec;

pub use annotation::{AnnotationSpec, AnnotationSpecBuilder, UseSiteTarget};
pub use file::{FileMember, FileSpec, FileSpecBuilder};
pub use function::{FunKind, FunSpec, FunSpecBuilder};
pub use modifier::KModifier;
pub(crate) use modifier::modifiers_to_emit;
pub use parameter::{ParameterSpec, ParameterSpecBuilder};
pub use property::{PropertySpec, PropertySpecBuilder};
pub use type_alias::{TypeAliasSpec, TypeAliasSpecBuilder};
pub use type_spec::{TypeKind, TypeSpec, TypeSpecBuilder};
