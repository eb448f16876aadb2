use crate::error::CPUError;

pub const STACK_SIZE: usize = 16;

type Result<T> = std::result::Result<T, CPUError>;

/// Return-address stack for subroutine calls.
pub struct Stack {
    slots: [u16; STACK_SIZE],
    sp: usize,
}

impl Stack {
    pub fn new() -> Self {
        Self {
            slots: [0; STACK_SIZE],
            sp: 0,
        }
    }

    pub fn push(&mut self, addr: u16) -> Result<()> {
        let slot = self
            .slots
            .get_mut(self.sp)
            .ok_or(CPUError::StackOverflow(addr))?;
        *slot = addr;
        self.sp += 1;
        Ok(())
    }

    /// `at` is only used to report where an underflowing return happened.
    pub fn pop(&mut self, at: u16) -> Result<u16> {
        if self.sp == 0 {
            return Err(CPUError::StackUnderflow(at));
        }
        self.sp -= 1;
        Ok(self.slots[self.sp])
    }

    pub fn depth(&self) -> usize {
        self.sp
    }
}

impl Default for Stack {
    fn default() -> Self {
        Self::new()
    }
}
