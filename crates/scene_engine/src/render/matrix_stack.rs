//! Reference transform stack and scoped save/restore guard

use std::ops::{Deref, DerefMut};

use crate::foundation::math::Mat4;
use super::TransformStack;

/// Model transform with a stack of saved states
#[derive(Debug, Clone)]
pub struct MatrixStack {
    current: Mat4,
    saved: Vec<Mat4>,
}

impl MatrixStack {
    /// Create a stack whose current transform is the identity
    pub fn new() -> Self {
        Self {
            current: Mat4::identity(),
            saved: Vec::new(),
        }
    }

    /// Number of saved transforms
    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    /// Drop all saved state and reset to identity
    pub fn reset(&mut self) {
        self.current = Mat4::identity();
        self.saved.clear();
    }
}

impl Default for MatrixStack {
    fn default() -> Self {
        Self::new()
    }
}

impl TransformStack for MatrixStack {
    fn push_matrix(&mut self) {
        self.saved.push(self.current);
    }

    fn pop_matrix(&mut self) {
        match self.saved.pop() {
            Some(matrix) => self.current = matrix,
            None => log::warn!("pop_matrix called on an empty transform stack"),
        }
    }

    fn multiply_matrix(&mut self, matrix: &Mat4) {
        self.current = self.current * matrix;
    }

    fn current_matrix(&self) -> Mat4 {
        self.current
    }
}

/// Saves the transform on creation and restores it on drop
///
/// Derefs to the wrapped stack so the guarded scope can keep drawing through
/// it. The restore also runs during unwinding.
pub struct MatrixGuard<'a, S: TransformStack + ?Sized> {
    stack: &'a mut S,
}

impl<'a, S: TransformStack + ?Sized> MatrixGuard<'a, S> {
    /// Push the current transform of `stack`
    pub fn new(stack: &'a mut S) -> Self {
        stack.push_matrix();
        Self { stack }
    }
}

impl<S: TransformStack + ?Sized> Deref for MatrixGuard<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        &*self.stack
    }
}

impl<S: TransformStack + ?Sized> DerefMut for MatrixGuard<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        &mut *self.stack
    }
}

impl<S: TransformStack + ?Sized> Drop for MatrixGuard<'_, S> {
    fn drop(&mut self) {
        self.stack.pop_matrix();
    }
}
