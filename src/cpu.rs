use core::fmt;

use rand::{Rng, RngCore};

use crate::display::{Buffer, Display, DrawOutcome};
use crate::error::CPUError;
use crate::instruction::Instruction;
use crate::keypad::Keypad;
use crate::memory::{Memory, MEM_SIZE, MEM_START};
use crate::sprites;
use crate::stack::Stack;
use crate::timers::{SoundTimer, Timers};

pub type Result<T> = std::result::Result<T, CPUError>;

pub const DEFAULT_CLOCK_HZ: u32 = 1000;

const V_REGISTERS_SIZE: usize = 16;
const VF: usize = 0xF;
const INSTRUCTION_SIZE: u16 = 2;

/// What an executed instruction does to the program counter.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Flow {
    Next,
    Skip,
    Jump(u16),
    /// Wait-for-key found no key down; the same instruction runs again.
    Wait,
    Draw(DrawOutcome),
}

/// Trace record for a single `step`, built after the instruction ran.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct StepEvent {
    pub addr: u16,
    pub opcode: u16,
    pub instruction: Instruction,
    pub flow: Flow,
    pub stack_depth: usize,
    pub delay: u8,
    pub sound: u8,
}

impl fmt::Display for StepEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PC: {:#06X}\tSP: {}\tOP: {:04X}\t{}\tST: {}\tDT: {}",
            self.addr, self.stack_depth, self.opcode, self.instruction, self.sound, self.delay
        )?;
        match self.flow {
            Flow::Skip => write!(f, "\t(skip)"),
            Flow::Wait => write!(f, "\t(waiting for key)"),
            Flow::Draw(outcome) if outcome.collision => write!(f, "\t(collision)"),
            _ => Ok(()),
        }
    }
}

pub struct CPU<'a> {
    memory: Memory,
    pc: u16,
    i: u16,
    v_registers: [u8; V_REGISTERS_SIZE],
    stack: Stack,
    timers: Timers,
    display: Display,
    keypad: Keypad,
    rng: &'a mut dyn RngCore,
    clock_hz: u32,
}

impl<'a> CPU<'a> {
    pub fn new(rng: &'a mut impl RngCore, clock_hz: u32) -> Self {
        Self {
            memory: Memory::new(),
            pc: MEM_START as u16,
            i: 0,
            v_registers: [0; V_REGISTERS_SIZE],
            stack: Stack::new(),
            timers: Timers::new(),
            display: Display::new(),
            keypad: Keypad::new(),
            rng,
            clock_hz,
        }
    }

    /// Back to power-on state. The sound timer keeps its shared handle so an
    /// audio device opened earlier stays connected.
    pub fn reset(&mut self) {
        self.memory = Memory::new();
        self.pc = MEM_START as u16;
        self.i = 0;
        self.v_registers = [0; V_REGISTERS_SIZE];
        self.stack = Stack::new();
        self.timers.set_delay(0);
        self.timers.set_sound(0);
        self.display.clear();
        self.keypad = Keypad::new();
    }

    pub fn load_rom(&mut self, rom: &[u8]) -> Result<()> {
        self.memory.load_program(rom)
    }

    pub fn clock_hz(&self) -> u32 {
        self.clock_hz
    }

    pub fn visual_buffer(&self) -> &Buffer {
        self.display.buffer()
    }

    pub fn set_key_status(&mut self, index: usize, is_down: bool) -> Result<()> {
        self.keypad.set_key(index, is_down)
    }

    pub fn sound_timer(&self) -> SoundTimer {
        self.timers.sound_handle()
    }

    pub fn delay_timer(&self) -> u8 {
        self.timers.delay()
    }

    /// Called by the host once per elapsed 1/60 s.
    pub fn tick_timers(&mut self) {
        self.timers.tick();
    }

    pub fn dump_memory(&self, start: usize, stop: usize) -> Result<String> {
        self.memory.dump(start, stop)
    }

    /// Fetch, decode and execute one instruction.
    pub fn step(&mut self) -> Result<StepEvent> {
        let addr = self.pc;
        if !(MEM_START..MEM_SIZE).contains(&(addr as usize)) {
            return Err(CPUError::InvalidAddress(addr));
        }

        let opcode = self
            .memory
            .read_word(addr as usize)
            .map_err(|_| CPUError::InvalidAddress(addr))?;
        let instruction = Instruction::try_from(opcode)
            .map_err(|_| CPUError::UnknownInstruction(opcode, addr))?;

        let flow = self.execute(instruction)?;
        match flow {
            Flow::Next | Flow::Draw(_) => self.pc = addr + INSTRUCTION_SIZE,
            Flow::Skip => self.pc = addr + 2 * INSTRUCTION_SIZE,
            Flow::Jump(to) => self.pc = to,
            Flow::Wait => {}
        }

        Ok(StepEvent {
            addr,
            opcode,
            instruction,
            flow,
            stack_depth: self.stack.depth(),
            delay: self.timers.delay(),
            sound: self.timers.sound(),
        })
    }

    fn execute(&mut self, instruction: Instruction) -> Result<Flow> {
        match instruction {
            Instruction::ClearScreen => self.exec_clear_screen(),
            Instruction::Return => self.exec_return(),
            Instruction::Jump(addr) => Ok(Flow::Jump(addr)),
            Instruction::Call(addr) => self.exec_call(addr),
            Instruction::SkipIfEqual(x, value) => Ok(skip_if(self.v(x) == value)),
            Instruction::SkipIfNotEqual(x, value) => Ok(skip_if(self.v(x) != value)),
            Instruction::SkipIfEqualVy(x, y) => Ok(skip_if(self.v(x) == self.v(y))),
            Instruction::SkipIfNotEqualVy(x, y) => Ok(skip_if(self.v(x) != self.v(y))),
            Instruction::LoadVx(x, value) => self.exec_load_vx(x, value),
            Instruction::AddVx(x, value) => self.exec_load_vx(x, self.v(x).wrapping_add(value)),
            Instruction::LoadVxVy(x, y) => self.exec_load_vx(x, self.v(y)),
            Instruction::Or(x, y) => self.exec_load_vx(x, self.v(x) | self.v(y)),
            Instruction::And(x, y) => self.exec_load_vx(x, self.v(x) & self.v(y)),
            Instruction::Xor(x, y) => self.exec_load_vx(x, self.v(x) ^ self.v(y)),
            Instruction::AddVxVy(x, y) => {
                let (sum, carry) = self.v(x).overflowing_add(self.v(y));
                self.exec_with_flag(x, sum, carry)
            }
            Instruction::SubVxVy(x, y) => {
                let (vx, vy) = (self.v(x), self.v(y));
                self.exec_with_flag(x, vx.wrapping_sub(vy), vx >= vy)
            }
            Instruction::SubN(x, y) => {
                let (vx, vy) = (self.v(x), self.v(y));
                self.exec_with_flag(x, vy.wrapping_sub(vx), vy >= vx)
            }
            Instruction::ShiftRight(x) => {
                let vx = self.v(x);
                self.exec_with_flag(x, vx >> 1, vx & 0x01 == 0x01)
            }
            Instruction::ShiftLeft(x) => {
                let vx = self.v(x);
                self.exec_with_flag(x, vx << 1, vx & 0x80 == 0x80)
            }
            Instruction::LoadIndex(addr) => self.exec_load_index(addr),
            Instruction::JumpPlusV0(addr) => Ok(Flow::Jump(addr + self.v(0) as u16)),
            Instruction::Random(x, mask) => {
                let value = self.rng.gen::<u8>() & mask;
                self.exec_load_vx(x, value)
            }
            Instruction::Draw(x, y, rows) => self.exec_draw(x, y, rows),
            Instruction::SkipIfKeyPressed(x) => {
                Ok(skip_if(self.keypad.is_down(self.v(x) as usize)?))
            }
            Instruction::SkipIfKeyNotPressed(x) => {
                Ok(skip_if(!self.keypad.is_down(self.v(x) as usize)?))
            }
            Instruction::LoadVxFromDelay(x) => self.exec_load_vx(x, self.timers.delay()),
            Instruction::WaitForKey(x) => self.exec_wait_for_key(x),
            Instruction::SetDelayFromVx(x) => {
                self.timers.set_delay(self.v(x));
                Ok(Flow::Next)
            }
            Instruction::SetSoundFromVx(x) => {
                self.timers.set_sound(self.v(x));
                Ok(Flow::Next)
            }
            Instruction::AddIndexVx(x) => {
                self.exec_load_index(self.i.wrapping_add(self.v(x) as u16))
            }
            Instruction::LoadFontAddress(x) => {
                self.exec_load_index(sprites::digit_address(self.v(x)))
            }
            Instruction::StoreBCD(x) => self.exec_store_bcd(x),
            Instruction::StoreRegisters(x) => self.exec_store_registers(x),
            Instruction::LoadRegisters(x) => self.exec_load_registers(x),
        }
    }

    fn v(&self, x: u8) -> u8 {
        self.v_registers[x as usize]
    }

    fn exec_clear_screen(&mut self) -> Result<Flow> {
        self.display.clear();
        Ok(Flow::Next)
    }

    fn exec_return(&mut self) -> Result<Flow> {
        let caller = self.stack.pop(self.pc)?;
        Ok(Flow::Jump(caller + INSTRUCTION_SIZE))
    }

    fn exec_call(&mut self, to: u16) -> Result<Flow> {
        self.stack.push(self.pc)?;
        Ok(Flow::Jump(to))
    }

    fn exec_load_vx(&mut self, x: u8, value: u8) -> Result<Flow> {
        self.v_registers[x as usize] = value;
        Ok(Flow::Next)
    }

    // VF is written after Vx so the flag wins when x is 0xF
    fn exec_with_flag(&mut self, x: u8, value: u8, flag: bool) -> Result<Flow> {
        self.v_registers[x as usize] = value;
        self.v_registers[VF] = flag as u8;
        Ok(Flow::Next)
    }

    fn exec_load_index(&mut self, value: u16) -> Result<Flow> {
        self.i = value;
        Ok(Flow::Next)
    }

    fn exec_draw(&mut self, x: u8, y: u8, rows: u8) -> Result<Flow> {
        let (x, y) = (self.v(x) as usize, self.v(y) as usize);
        let sprite = self.memory.read_slice(self.i as usize, rows as usize)?;

        let outcome = self.display.draw(sprite, x, y);
        self.v_registers[VF] = outcome.collision as u8;
        if outcome.clipped > 0 {
            log::debug!(
                "Sprite at ({}, {}) dropped {} off-screen pixels",
                x,
                y,
                outcome.clipped
            );
        }

        Ok(Flow::Draw(outcome))
    }

    fn exec_wait_for_key(&mut self, x: u8) -> Result<Flow> {
        match self.keypad.pressed() {
            Some(key) => self.exec_load_vx(x, key),
            None => Ok(Flow::Wait),
        }
    }

    fn exec_store_bcd(&mut self, x: u8) -> Result<Flow> {
        let vx = self.v(x);
        let digits = [vx / 100, (vx / 10) % 10, vx % 10];
        self.memory.write_slice(self.i as usize, &digits)?;
        Ok(Flow::Next)
    }

    fn exec_store_registers(&mut self, x: u8) -> Result<Flow> {
        let registers = &self.v_registers[..=x as usize];
        self.memory.write_slice(self.i as usize, registers)?;
        Ok(Flow::Next)
    }

    fn exec_load_registers(&mut self, x: u8) -> Result<Flow> {
        let count = x as usize + 1;
        let data = self.memory.read_slice(self.i as usize, count)?;
        self.v_registers[..count].copy_from_slice(data);
        Ok(Flow::Next)
    }
}

fn skip_if(condition: bool) -> Flow {
    if condition {
        Flow::Skip
    } else {
        Flow::Next
    }
}
