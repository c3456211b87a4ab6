//! Project management: which data model owns which document, and which data
//! models may see each other.
//!
//! The engine only consumes the [`DataModelRegistry`] trait. The in-memory
//! [`DataModelManager`] is the implementation used by hosts that discover
//! data models themselves (and by tests).

mod manager;
mod registry;

pub use manager::{DataModelInfo, DataModelManager, DependencyDecl, RegistryError, VisibilityMode};
pub use registry::DataModelRegistry;
