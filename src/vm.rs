use rand::RngCore;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};

use sdl2::event::Event;
use sdl2::keyboard::{Keycode, Scancode};
use sdl2::EventPump;

use crate::audio::Audio;
use crate::cpu::CPU;
use crate::error::Error;
use crate::screen;
use crate::timers::FrameClock;
use crate::Config;

pub type Result<T> = std::result::Result<T, Error>;

const VOLUME: f32 = 1.0;

pub struct VM<'a> {
    cpu: CPU<'a>,
    keymap: HashMap<Scancode, u8>,
}

impl<'a> VM<'a> {
    pub fn new(rng: &'a mut impl RngCore, clock_hz: u32) -> Self {
        Self {
            cpu: CPU::new(rng, clock_hz.max(1)),
            keymap: Self::default_keymap(),
        }
    }

    pub fn load_rom(&mut self, filename: &Path) -> Result<()> {
        self.reset();

        let rom = fs::read(filename)?;
        self.cpu.load_rom(&rom)?;
        log::info!("Loaded {} bytes from {}", rom.len(), filename.display());

        Ok(())
    }

    pub fn dump_memory(&self, start: usize, stop: usize) -> Result<String> {
        Ok(self.cpu.dump_memory(start, stop)?)
    }

    pub fn run(&mut self, config: &Config) -> Result<()> {
        let sdl_context = sdl2::init().map_err(to_sdl_err)?;
        let title = format!(
            "CHIP-8 - {} @ {}Hz",
            config.rom.display(),
            self.cpu.clock_hz()
        );
        let (mut canvas, texture_creator) =
            screen::build_canvas_and_creator(&sdl_context, &title)?;
        let mut screen = screen::Screen::try_from(&texture_creator)?;
        let mut event_pump = sdl_context.event_pump().map_err(to_sdl_err)?;

        let audio = if config.mute {
            None
        } else {
            match Audio::new(&sdl_context, self.cpu.sound_timer(), VOLUME) {
                Ok(audio) => Some(audio),
                Err(e) => {
                    log::warn!("{}; continuing without sound", e);
                    None
                }
            }
        };

        let step_interval = Duration::from_secs(1) / self.cpu.clock_hz();
        let mut clock = FrameClock::new();
        let mut last_time = Instant::now();
        screen.frame(&mut canvas, self.cpu.visual_buffer())?;

        loop {
            let shall_halt = self.handle_user_input(&mut event_pump)?;
            if shall_halt {
                break;
            }

            let now = Instant::now();
            let frames = clock.advance(now - last_time);
            last_time = now;
            for _ in 0..frames {
                self.cpu.tick_timers();
            }

            let event = self.cpu.step()?;
            log::debug!("{}", event);

            if frames > 0 {
                screen.frame(&mut canvas, self.cpu.visual_buffer())?;
            }

            ::std::thread::sleep(step_interval);
        }

        if let Some(audio) = audio {
            audio.pause();
        }

        Ok(())
    }

    fn default_keymap() -> HashMap<Scancode, u8> {
        HashMap::from([
            (Scancode::Num1, 0x01),
            (Scancode::Num2, 0x02),
            (Scancode::Num3, 0x03),
            (Scancode::Num4, 0x0C),
            (Scancode::Q, 0x04),
            (Scancode::W, 0x05),
            (Scancode::E, 0x06),
            (Scancode::R, 0x0D),
            (Scancode::A, 0x07),
            (Scancode::S, 0x08),
            (Scancode::D, 0x09),
            (Scancode::F, 0x0E),
            (Scancode::Z, 0x0A),
            (Scancode::X, 0x00),
            (Scancode::C, 0x0B),
            (Scancode::V, 0x0F),
            (Scancode::Left, 0x07),
            (Scancode::Right, 0x09),
            (Scancode::Up, 0x05),
            (Scancode::Down, 0x08),
        ])
    }

    fn reset(&mut self) {
        self.cpu.reset();
    }

    fn handle_user_input(&mut self, event_pump: &mut EventPump) -> Result<bool> {
        for event in event_pump.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => {
                    return Ok(true);
                }
                Event::KeyDown {
                    scancode: Some(ref code),
                    ..
                } => {
                    if let Some(key_index) = self.keymap.get(code) {
                        self.cpu.set_key_status(*key_index as usize, true)?;
                    }
                }
                Event::KeyUp {
                    scancode: Some(ref code),
                    ..
                } => {
                    if let Some(key_index) = self.keymap.get(code) {
                        self.cpu.set_key_status(*key_index as usize, false)?;
                    }
                }
                _ => {}
            }
        }

        Ok(false)
    }
}

fn to_sdl_err(err: String) -> Error {
    Error::SystemError(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;

    #[test]
    fn test_default_keymap_covers_every_key() {
        let keymap = VM::default_keymap();
        let mut indices: Vec<u8> = keymap.values().copied().collect();
        indices.sort_unstable();
        indices.dedup();

        assert_eq!(indices, (0x0..=0xF).collect::<Vec<u8>>());
    }

    #[test]
    fn test_load_rom_missing_file() {
        let mut rng = StepRng::new(0, 0);
        let mut vm = VM::new(&mut rng, 1000);

        let res = vm.load_rom(Path::new("/nonexistent/rom.ch8"));

        assert!(matches!(res, Err(Error::IOError(_))));
    }

    #[test]
    fn test_load_rom_and_dump() {
        let path = std::env::temp_dir().join("chip8-interp-vm-test.ch8");
        fs::write(&path, [0x00, 0xE0, 0x12, 0x00]).unwrap();
        let mut rng = StepRng::new(0, 0);
        let mut vm = VM::new(&mut rng, 1000);

        vm.load_rom(&path).unwrap();
        let dump = vm.dump_memory(0x200, 0x204).unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(dump, "Memory dump from 0x0200 to 0x0204\n0x0200 00 E0 12 00\n");
    }

    #[test]
    fn test_dump_out_of_range() {
        let mut rng = StepRng::new(0, 0);
        let vm = VM::new(&mut rng, 1000);

        let res = vm.dump_memory(0, 5000);

        assert!(matches!(
            res,
            Err(Error::RuntimeError(crate::error::CPUError::InvalidDumpRange(0, 5000)))
        ));
    }
}
