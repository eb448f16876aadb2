mod audio;
pub mod cpu;
mod display;
pub mod error;
pub mod instruction;
mod keypad;
mod memory;
mod screen;
mod sprites;
mod stack;
pub mod timers;
pub mod vm;

use std::path::PathBuf;

pub use display::{DrawOutcome, SCREEN_HEIGHT, SCREEN_WIDTH};

pub struct Config {
    pub rom: PathBuf,
    /// Instructions per second.
    pub speed: u32,
    pub mute: bool,
    /// Print memory `[start, stop)` and exit instead of running.
    pub dump: Option<(usize, usize)>,
}

pub fn run(config: Config) -> vm::Result<()> {
    let mut rng = rand::thread_rng();
    let mut vm = vm::VM::new(&mut rng, config.speed);
    vm.load_rom(&config.rom)?;

    if let Some((start, stop)) = config.dump {
        print!("{}", vm.dump_memory(start, stop)?);
        return Ok(());
    }

    vm.run(&config)
}
