use crate::error::Error;
use crate::timers::SoundTimer;
use sdl2::audio::{AudioCallback, AudioDevice, AudioSpecDesired};
use std::f32::consts::TAU;

pub type Result<T> = std::result::Result<T, Error>;

const NOTE_FREQ: f32 = 440.0; // A4
const BASE_VOLUME: f32 = 0.1;

/// Buzzer driven straight from the sound timer. The callback runs on SDL's
/// audio thread and only ever reads the timer through its atomic handle.
pub struct Audio {
    device: AudioDevice<Wave>,
}

impl Audio {
    pub fn new(context: &sdl2::Sdl, sound: SoundTimer, volume: f32) -> Result<Self> {
        let device = build_audio_device(context, sound, volume)?;
        device.resume();
        Ok(Self { device })
    }

    pub fn pause(&self) {
        self.device.pause();
    }
}

struct Wave {
    sound: SoundTimer,
    phase_inc: f32,
    phase: f32,
    volume: f32,
}

impl AudioCallback for Wave {
    type Channel = f32;

    fn callback(&mut self, output: &mut [Self::Channel]) {
        if !self.sound.is_active() {
            output.fill(0.0);
            return;
        }

        // sine wave
        for x in output.iter_mut() {
            *x = (self.phase * TAU).sin() * self.volume;
            self.phase = (self.phase + self.phase_inc) % 1.0;
        }
    }
}

fn build_audio_device(
    context: &sdl2::Sdl,
    sound: SoundTimer,
    volume: f32,
) -> Result<AudioDevice<Wave>> {
    let audio_subsystem = context.audio().map_err(to_sdl_err)?;
    let spec = AudioSpecDesired {
        freq: None,
        channels: Some(1),
        samples: None,
    };

    let device = audio_subsystem
        .open_playback(None, &spec, |spec| Wave {
            sound,
            phase_inc: NOTE_FREQ / spec.freq as f32,
            phase: 0.0,
            volume: BASE_VOLUME * volume,
        })
        .map_err(|_| Error::SystemError("Error initializing audio".to_string()))?;

    Ok(device)
}

fn to_sdl_err(err: String) -> Error {
    Error::SystemError(err)
}
