pub const SCREEN_WIDTH: usize = 64;
pub const SCREEN_HEIGHT: usize = 32;
pub const SCREEN_SIZE: usize = SCREEN_WIDTH * SCREEN_HEIGHT;

pub type Buffer = [bool; SCREEN_SIZE];

/// Result of a sprite blit.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub struct DrawOutcome {
    /// At least one lit sprite pixel landed on a lit screen pixel.
    pub collision: bool,
    /// Lit sprite pixels whose target fell outside the buffer and were dropped.
    pub clipped: usize,
}

/// 64x32 monochrome frame buffer, row-major.
pub struct Display {
    buffer: Buffer,
}

impl Display {
    pub fn new() -> Self {
        Self {
            buffer: [false; SCREEN_SIZE],
        }
    }

    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    pub fn clear(&mut self) {
        self.buffer = [false; SCREEN_SIZE];
    }

    /// XOR `sprite` onto the buffer with its top-left corner at (`x`, `y`).
    ///
    /// Coordinates are not wrapped. Each lit bit targets the linear index
    /// `x + col + (y + row) * 64`; targets past the end of the buffer are
    /// dropped and counted in the outcome.
    pub fn draw(&mut self, sprite: &[u8], x: usize, y: usize) -> DrawOutcome {
        let mut outcome = DrawOutcome::default();

        for (row, bits) in sprite.iter().enumerate() {
            for col in 0..8 {
                if bits & (0x80 >> col) == 0 {
                    continue;
                }

                let index = x + col + (y + row) * SCREEN_WIDTH;
                match self.buffer.get_mut(index) {
                    Some(pixel) => {
                        outcome.collision |= *pixel;
                        // XOR existing screen pixel with sprite pixel to draw
                        *pixel ^= true;
                    }
                    None => outcome.clipped += 1,
                }
            }
        }

        outcome
    }
}

impl Default for Display {
    fn default() -> Self {
        Self::new()
    }
}
