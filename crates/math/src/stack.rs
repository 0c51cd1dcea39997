use crate::matrix4::Matrix4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum StackError {
    #[error("matrix stack overflow: depth limit {max_depth} reached")]
    Overflow { max_depth: usize },
}

/// LIFO of saved model matrices for walking a transform hierarchy.
///
/// Push the parent's matrix before descending into a child and pop it on the
/// way back, so siblings start from the same parent transform.
#[derive(Debug, Clone, Default)]
pub struct MatrixStack {
    saved: Vec<Matrix4>,
    max_depth: Option<usize>,
}

impl MatrixStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// A stack that refuses to grow beyond `max_depth` entries.
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            saved: Vec::with_capacity(max_depth),
            max_depth: Some(max_depth),
        }
    }

    /// Save a copy of `m`.
    pub fn push(&mut self, m: &Matrix4) -> Result<(), StackError> {
        if let Some(max_depth) = self.max_depth {
            if self.saved.len() >= max_depth {
                tracing::debug!(max_depth, "matrix stack overflow");
                return Err(StackError::Overflow { max_depth });
            }
        }
        self.saved.push(*m);
        Ok(())
    }

    pub fn pop(&mut self) -> Option<Matrix4> {
        self.saved.pop()
    }

    pub fn peek(&self) -> Option<&Matrix4> {
        self.saved.last()
    }

    pub fn len(&self) -> usize {
        self.saved.len()
    }

    pub fn is_empty(&self) -> bool {
        self.saved.is_empty()
    }

    pub fn clear(&mut self) {
        self.saved.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_pop_restores_parent() {
        let mut stack = MatrixStack::new();
        let mut model = Matrix4::from_translation(0.0, 2.0, 0.0);
        let parent = model;

        stack.push(&model).unwrap();
        model.translate(0.0, 0.0, 2.0);
        assert_ne!(model, parent);

        model = stack.pop().unwrap();
        assert_eq!(model, parent);
        assert!(stack.is_empty());
    }

    #[test]
    fn lifo_order() {
        let mut stack = MatrixStack::new();
        let a = Matrix4::from_scale(1.0, 1.0, 1.0);
        let b = Matrix4::from_scale(2.0, 2.0, 2.0);
        stack.push(&a).unwrap();
        stack.push(&b).unwrap();
        assert_eq!(stack.len(), 2);
        assert_eq!(stack.peek(), Some(&b));
        assert_eq!(stack.pop(), Some(b));
        assert_eq!(stack.pop(), Some(a));
        assert_eq!(stack.pop(), None);
    }

    #[test]
    fn bounded_stack_overflows() {
        let mut stack = MatrixStack::with_max_depth(1);
        stack.push(&Matrix4::IDENTITY).unwrap();
        assert_eq!(
            stack.push(&Matrix4::IDENTITY),
            Err(StackError::Overflow { max_depth: 1 })
        );
        stack.clear();
        assert!(stack.push(&Matrix4::IDENTITY).is_ok());
    }
}
