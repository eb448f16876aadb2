use std::fmt::Write;

use crate::error::CPUError;
use crate::sprites;

pub type Result<T> = std::result::Result<T, CPUError>;

pub const MEM_SIZE: usize = 4096;
pub const MEM_START: usize = 0x200;
pub const MAX_PROGRAM_SIZE: usize = MEM_SIZE - MEM_START;

const DUMP_ROW_LEN: usize = 16;

/// Flat 4K address space. The glyph table sits at 0x000 and programs are
/// loaded at 0x200; instructions may only write from 0x200 upwards.
pub struct Memory {
    bytes: [u8; MEM_SIZE],
}

impl Memory {
    pub fn new() -> Self {
        let mut bytes = [0; MEM_SIZE];
        bytes[..sprites::GLYPH_TABLE.len()].copy_from_slice(&sprites::GLYPH_TABLE);
        Self { bytes }
    }

    pub fn load_program(&mut self, rom: &[u8]) -> Result<()> {
        if rom.len() > MAX_PROGRAM_SIZE {
            return Err(CPUError::MemoryOverflow);
        }

        self.bytes[MEM_START..(MEM_START + rom.len())].copy_from_slice(rom);
        Ok(())
    }

    pub fn read_byte(&self, addr: usize) -> Result<u8> {
        self.bytes
            .get(addr)
            .copied()
            .ok_or(CPUError::MemoryOutOfBounds(addr))
    }

    /// Big-endian instruction word at `addr`.
    pub fn read_word(&self, addr: usize) -> Result<u16> {
        let hi = self.read_byte(addr)? as u16;
        let lo = self.read_byte(addr + 1)? as u16;
        Ok(hi << 8 | lo)
    }

    pub fn read_slice(&self, addr: usize, len: usize) -> Result<&[u8]> {
        if len == 0 {
            return Ok(&[]);
        }
        self.bytes
            .get(addr..addr + len)
            .ok_or_else(|| CPUError::MemoryOutOfBounds(addr + len - 1))
    }

    pub fn write_slice(&mut self, addr: usize, data: &[u8]) -> Result<()> {
        if addr < MEM_START {
            return Err(CPUError::ProtectedWrite(addr));
        }
        let dst = self
            .bytes
            .get_mut(addr..addr + data.len())
            .ok_or_else(|| CPUError::MemoryOutOfBounds(addr + data.len() - 1))?;
        dst.copy_from_slice(data);
        Ok(())
    }

    /// Hex listing of `[start, stop)`. The range is validated before anything
    /// is rendered.
    pub fn dump(&self, start: usize, stop: usize) -> Result<String> {
        if start > stop || stop > MEM_SIZE {
            return Err(CPUError::InvalidDumpRange(start, stop));
        }

        let mut out = format!("Memory dump from {:#06X} to {:#06X}", start, stop);
        for addr in start..stop {
            if addr == start || addr % DUMP_ROW_LEN == 0 {
                let _ = write!(out, "\n{:#06X}", addr);
            }
            let _ = write!(out, " {:02X}", self.bytes[addr]);
        }
        out.push('\n');

        Ok(out)
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}
