use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub const TIMER_HZ: u32 = 60;

/// Read side of the sound timer, handed to the audio callback. The engine
/// keeps writing through its own clone.
#[derive(Debug, Clone, Default)]
pub struct SoundTimer(Arc<AtomicU8>);

impl SoundTimer {
    pub fn get(&self) -> u8 {
        self.0.load(Ordering::Acquire)
    }

    pub fn is_active(&self) -> bool {
        self.get() != 0
    }

    fn set(&self, value: u8) {
        self.0.store(value, Ordering::Release);
    }

    fn decrement(&self) {
        let _ = self
            .0
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |v| v.checked_sub(1));
    }
}

/// Delay and sound counters, both counting down towards zero at 60 Hz.
#[derive(Debug, Default)]
pub struct Timers {
    delay: u8,
    sound: SoundTimer,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delay(&self) -> u8 {
        self.delay
    }

    pub fn set_delay(&mut self, value: u8) {
        self.delay = value;
    }

    pub fn sound(&self) -> u8 {
        self.sound.get()
    }

    pub fn set_sound(&mut self, value: u8) {
        self.sound.set(value);
    }

    pub fn sound_handle(&self) -> SoundTimer {
        self.sound.clone()
    }

    /// One 60 Hz tick: decrement each counter unless it is already zero.
    pub fn tick(&mut self) {
        self.delay = self.delay.saturating_sub(1);
        self.sound.decrement();
    }
}

/// Turns wall-clock deltas into 60 Hz timer ticks, carrying the remainder
/// over so no time is lost between calls.
#[derive(Debug)]
pub struct FrameClock {
    frame: Duration,
    elapsed: Duration,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            frame: Duration::from_secs(1) / TIMER_HZ,
            elapsed: Duration::ZERO,
        }
    }

    /// Number of frame boundaries crossed after adding `delta`.
    pub fn advance(&mut self, delta: Duration) -> u32 {
        self.elapsed += delta;
        let mut frames = 0;
        while self.elapsed >= self.frame {
            self.elapsed -= self.frame;
            frames += 1;
        }
        frames
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
