//! Document store: the ordered list of shapes on this client.
//!
//! Creation order is draw order, so the store is a `Vec` rather than a map.
//! Identifiers stay unique: inserting a shape whose id already exists replaces
//! the existing entry in place instead of appending a duplicate.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use crate::shape::{Shape, ShapeId};

/// In-memory list of shapes in creation order.
#[derive(Debug, Clone, Default)]
pub struct ShapeStore {
    shapes: Vec<Shape>,
}

impl ShapeStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self { shapes: Vec::new() }
    }

    /// Append a shape, or replace the entry with the same id in place.
    pub fn insert(&mut self, shape: Shape) {
        match self.position(&shape.id) {
            Some(idx) => self.shapes[idx] = shape,
            None => self.shapes.push(shape),
        }
    }

    /// Remove a shape by id, returning it if it was present.
    pub fn remove(&mut self, id: &ShapeId) -> Option<Shape> {
        let idx = self.position(id)?;
        Some(self.shapes.remove(idx))
    }

    #[must_use]
    pub fn get(&self, id: &ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|s| &s.id == id)
    }

    pub fn get_mut(&mut self, id: &ShapeId) -> Option<&mut Shape> {
        self.shapes.iter_mut().find(|s| &s.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: &ShapeId) -> bool {
        self.position(id).is_some()
    }

    /// Keep only shapes matching `keep`. Returns how many were removed.
    pub fn retain<F>(&mut self, keep: F) -> usize
    where
        F: FnMut(&Shape) -> bool,
    {
        let before = self.shapes.len();
        self.shapes.retain(keep);
        before - self.shapes.len()
    }

    /// Drop every shape.
    pub fn clear(&mut self) {
        self.shapes.clear();
    }

    /// Shapes in creation (draw) order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Shape> {
        self.shapes.iter()
    }

    /// Shapes as a slice, in creation order.
    #[must_use]
    pub fn as_slice(&self) -> &[Shape] {
        &self.shapes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    fn position(&self, id: &ShapeId) -> Option<usize> {
        self.shapes.iter().position(|s| &s.id == id)
    }
}
