//! The registry seam between the engine and data-model discovery.

use smol_str::SmolStr;

use crate::base::DataModelId;

/// Maps documents to data models and answers visibility questions.
///
/// Implementations must be cheap to query: scope resolution calls
/// [`is_visible`](Self::is_visible) once per candidate description.
pub trait DataModelRegistry: Send + Sync {
    /// Data model owning the document at `uri`, if any.
    fn owning_data_model(&self, uri: &str) -> Option<DataModelId>;

    /// Whether symbols of `to` may be referenced from `from`.
    ///
    /// `for_reference` is set when the answer decides whether a reference
    /// may be bound or persisted; advisory callers pass `false`.
    fn is_visible(&self, from: &DataModelId, to: &DataModelId, for_reference: bool) -> bool;

    /// Namespace prefix used in Global IDs of `id`'s symbols.
    fn reference_name(&self, id: &DataModelId) -> Option<SmolStr>;
}
