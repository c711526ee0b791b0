//! Word-addressed data memory.

use tau_core::RuntimeError;

/// A fixed number of zero-initialised `i64` words.
#[derive(Debug, Clone)]
pub struct Memory {
    words: Vec<i64>,
}

impl Memory {
    pub fn new(size: usize) -> Self {
        Self {
            words: vec![0; size],
        }
    }

    /// Size in words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn load(&self, address: i64) -> Result<i64, RuntimeError> {
        let index = self.index(address)?;
        Ok(self.words[index])
    }

    pub fn store(&mut self, address: i64, value: i64) -> Result<(), RuntimeError> {
        let index = self.index(address)?;
        self.words[index] = value;
        Ok(())
    }

    fn index(&self, address: i64) -> Result<usize, RuntimeError> {
        usize::try_from(address)
            .ok()
            .filter(|&index| index < self.words.len())
            .ok_or(RuntimeError::OutOfBounds {
                address,
                size: self.words.len(),
            })
    }
}
