//! Layered lookup scopes.
//!
//! A scope holds its own descriptions and an optional outer scope. Lookup
//! checks the own layer first, so an inner layer shadows every outer one.

use super::symbols::Description;

/// An ordered, possibly layered set of descriptions considered during one
/// reference lookup.
#[derive(Clone, Debug, Default)]
pub struct Scope {
    elements: Vec<Description>,
    outer: Option<Box<Scope>>,
}

impl Scope {
    /// The scope that resolves nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(elements: Vec<Description>) -> Self {
        Self {
            elements,
            outer: None,
        }
    }

    /// A layer in front of `outer`.
    pub fn with_outer(elements: Vec<Description>, outer: Scope) -> Self {
        Self {
            elements,
            outer: Some(Box::new(outer)),
        }
    }

    /// First description named `name`, innermost layer first.
    pub fn lookup(&self, name: &str) -> Option<&Description> {
        self.elements
            .iter()
            .find(|d| d.name == name)
            .or_else(|| self.outer.as_deref().and_then(|outer| outer.lookup(name)))
    }

    /// Every description, innermost layer first.
    pub fn elements(&self) -> impl Iterator<Item = &Description> {
        let mut layers = Vec::new();
        let mut current = Some(self);
        while let Some(scope) = current {
            layers.push(&scope.elements);
            current = scope.outer.as_deref();
        }
        layers.into_iter().flatten()
    }

    /// Keep only descriptions matching `keep`, in every layer.
    pub fn filter(self, keep: &impl Fn(&Description) -> bool) -> Scope {
        Scope {
            elements: self.elements.into_iter().filter(|d| keep(d)).collect(),
            outer: self.outer.map(|outer| Box::new(outer.filter(keep))),
        }
    }

    /// Number of layers, including this one.
    pub fn depth(&self) -> usize {
        1 + self.outer.as_ref().map_or(0, |outer| outer.depth())
    }

    pub fn len(&self) -> usize {
        self.elements.len() + self.outer.as_ref().map_or(0, |outer| outer.len())
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty() && self.outer.as_ref().is_none_or(|outer| outer.is_empty())
    }
}
