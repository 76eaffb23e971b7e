//! File-level generation helpers: import resolution and name allocation.

mod imports;
mod naming;

pub use imports::{Import, ImportTable};
pub(crate) use imports::{Collected, resolve};
pub use naming::NameAllocator;
