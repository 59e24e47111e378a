//! Schema registration capability consumed by the codecs

use std::collections::BTreeMap;

use xmltree::Element;

/// Sink for schema fragments emitted by a codec.
///
/// Fragments are plain XML elements (`complexType` / top-level `element`
/// definitions), keyed by the owning type name.
pub trait SchemaRegistry {
    /// Register a complex type definition for `owner`.
    fn add_complex_type(&mut self, owner: &str, definition: Element);

    /// Register a top-level element declaration for `owner`.
    fn add_element(&mut self, owner: &str, element: Element);
}

/// Map-backed [`SchemaRegistry`] for embedders and tests.
#[derive(Debug, Default)]
pub struct SchemaTable {
    complex_types: BTreeMap<String, Vec<Element>>,
    elements: BTreeMap<String, Vec<Element>>,
}

impl SchemaTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Complex types registered for `owner`.
    pub fn complex_types(&self, owner: &str) -> &[Element] {
        self.complex_types.get(owner).map_or(&[], Vec::as_slice)
    }

    /// Top-level elements registered for `owner`.
    pub fn elements(&self, owner: &str) -> &[Element] {
        self.elements.get(owner).map_or(&[], Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.complex_types.is_empty() && self.elements.is_empty()
    }
}

impl SchemaRegistry for SchemaTable {
    fn add_complex_type(&mut self, owner: &str, definition: Element) {
        self.complex_types
            .entry(owner.to_string())
            .or_default()
            .push(definition);
    }

    fn add_element(&mut self, owner: &str, element: Element) {
        self.elements
            .entry(owner.to_string())
            .or_default()
            .push(element);
    }
}
