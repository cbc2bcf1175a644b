//! In-progress resolution chain for cycle detection.

use crate::error::{DiError, DiResult};

// Each level costs several resolver frames; stays well inside a 2 MiB debug stack.
pub(crate) const MAX_DEPTH: usize = 128;

/// Ordered, duplicate-free stack of the service types currently being
/// constructed.
///
/// The chain is owned by a single top-level `get` call and threaded down the
/// recursion by `&mut`. A duplicate is reported as [`DiError::Circular`] and
/// empties the chain; later pops on the way out are no-ops.
#[derive(Debug, Default)]
pub(crate) struct ResolutionChain {
    stack: Vec<String>,
}

impl ResolutionChain {
    /// Chain rooted at the requested service.
    pub(crate) fn rooted(name: &str) -> Self {
        Self {
            stack: vec![name.to_string()],
        }
    }

    /// Pushes `name`, failing on a cycle or when too deep.
    pub(crate) fn enter(&mut self, name: &str) -> DiResult<()> {
        // Circular detection BEFORE pushing the new name
        if self.stack.iter().any(|n| n == name) {
            let mut path = std::mem::take(&mut self.stack);
            path.push(name.to_string());
            return Err(DiError::Circular(path));
        }
        if self.stack.len() >= MAX_DEPTH {
            return Err(DiError::DepthExceeded(self.stack.len()));
        }
        self.stack.push(name.to_string());
        Ok(())
    }

    /// Pops the innermost entry.
    pub(crate) fn leave(&mut self) {
        self.stack.pop();
    }

    #[cfg(test)]
    pub(crate) fn path(&self) -> &[String] {
        &self.stack
    }
}
