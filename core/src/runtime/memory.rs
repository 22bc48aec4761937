use ethereum_types::U256;

use crate::commons::word::WORD_SIZE;

use super::errors::RuntimeError;

/// Linear memory of one invocation. Zero-filled on growth, never shrinks.
#[derive(Debug, Default)]
pub struct LinearMemory {
    memory: Vec<u8>,
}

impl LinearMemory {
    pub fn new() -> Self {
        Self { memory: vec![] }
    }

    pub fn with_size(size: usize) -> Self {
        Self {
            memory: vec![0; size],
        }
    }

    pub fn len(&self) -> usize {
        self.memory.len()
    }

    pub fn is_empty(&self) -> bool {
        self.memory.is_empty()
    }

    pub fn resize(&mut self, len: usize) {
        if len > self.memory.len() {
            self.memory.resize(len, 0);
        }
    }

    /// Grows the memory to cover `[offset, offset + size)`, rounded up to whole words.
    pub fn expand(&mut self, offset: usize, size: usize) -> Result<(), RuntimeError> {
        if size == 0 {
            return Ok(());
        }
        let end = offset
            .checked_add(size)
            .and_then(|end| end.checked_next_multiple_of(WORD_SIZE))
            .ok_or(RuntimeError::InvalidMemoryAccess {
                offset: U256::from(offset as u64),
                size: U256::from(size as u64),
                len: self.memory.len(),
            })?;
        self.resize(end);
        Ok(())
    }

    pub fn write_byte(&mut self, ptr: usize, data: u8) -> Result<(), RuntimeError> {
        let len = self.memory.len();
        let byte = self
            .memory
            .get_mut(ptr)
            .ok_or(RuntimeError::InvalidMemoryAccess {
                offset: U256::from(ptr as u64),
                size: U256::one(),
                len,
            })?;
        *byte = data;
        Ok(())
    }

    pub fn read_byte(&self, ptr: usize) -> Result<u8, RuntimeError> {
        self.read(ptr, 1).map(|bytes| bytes[0])
    }

    pub fn write(&mut self, offset: usize, bytes: &[u8]) -> Result<(), RuntimeError> {
        let range = self.range(offset, bytes.len())?;
        self.memory[range].copy_from_slice(bytes);
        Ok(())
    }

    pub fn read(&self, offset: usize, size: usize) -> Result<&[u8], RuntimeError> {
        let range = self.range(offset, size)?;
        Ok(&self.memory[range])
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.memory
    }

    /// Base address handed to the entry routine. Valid until the memory is resized.
    pub fn as_mut_ptr(&mut self) -> *mut u8 {
        self.memory.as_mut_ptr()
    }

    fn range(&self, offset: usize, size: usize) -> Result<std::ops::Range<usize>, RuntimeError> {
        match offset.checked_add(size) {
            Some(end) if end <= self.memory.len() => Ok(offset..end),
            _ => Err(RuntimeError::InvalidMemoryAccess {
                offset: U256::from(offset as u64),
                size: U256::from(size as u64),
                len: self.memory.len(),
            }),
        }
    }
}

#[cfg(test)]
mod test {
    use super::LinearMemory;
    use crate::runtime::errors::RuntimeError;

    #[test]
    fn reads_are_bounds_checked() {
        let mut memory = LinearMemory::with_size(8);
        memory.write(2, &[1, 2, 3]).unwrap();
        assert_eq!(memory.read(2, 3).unwrap(), &[1, 2, 3]);
        assert_eq!(memory.read(8, 0).unwrap(), &[] as &[u8]);
        assert!(matches!(
            memory.read(6, 3),
            Err(RuntimeError::InvalidMemoryAccess { len: 8, .. })
        ));
        assert!(memory.read(usize::MAX, 2).is_err());
        assert!(memory.write(7, &[0, 0]).is_err());
        assert!(memory.write_byte(8, 1).is_err());
        memory.write_byte(7, 9).unwrap();
        assert_eq!(memory.read_byte(7).unwrap(), 9);
    }

    #[test]
    fn expand_rounds_to_words() {
        let mut memory = LinearMemory::new();
        assert!(memory.is_empty());
        memory.expand(4, 8).unwrap();
        assert_eq!(memory.len(), 32);
        memory.expand(32, 1).unwrap();
        assert_eq!(memory.len(), 64);
        memory.expand(1000, 0).unwrap();
        assert_eq!(memory.len(), 64);
        memory.resize(16);
        assert_eq!(memory.len(), 64);
        assert!(memory.expand(usize::MAX, 1).is_err());
        assert!(memory.as_slice().iter().all(|byte| *byte == 0));
    }
}
