use crate::error::CPUError;

pub const KEY_COUNT: usize = 16;

type Result<T> = std::result::Result<T, CPUError>;

/// Live down/up state of the 16 hex keys.
#[derive(Debug, Default)]
pub struct Keypad {
    keys: [bool; KEY_COUNT],
}

impl Keypad {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_key(&mut self, index: usize, is_down: bool) -> Result<()> {
        let key = self
            .keys
            .get_mut(index)
            .ok_or(CPUError::InvalidKey(index))?;
        *key = is_down;
        Ok(())
    }

    pub fn is_down(&self, index: usize) -> Result<bool> {
        self.keys
            .get(index)
            .copied()
            .ok_or(CPUError::InvalidKey(index))
    }

    /// Highest-numbered key currently held, if any.
    pub fn pressed(&self) -> Option<u8> {
        self.keys.iter().rposition(|&down| down).map(|i| i as u8)
    }
}
