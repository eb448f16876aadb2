use sdl2::pixels::PixelFormatEnum;
use sdl2::render::{Canvas, Texture, TextureCreator};
use sdl2::video::{Window, WindowContext};

use crate::display::{Buffer, SCREEN_HEIGHT, SCREEN_SIZE, SCREEN_WIDTH};
use crate::error::Error;

const SCALE: usize = 10;
const BUFFER_SIZE: usize = 3 * SCREEN_SIZE;

pub type Result<T> = std::result::Result<T, Error>;

pub fn build_canvas_and_creator(
    context: &sdl2::Sdl,
    title: &str,
) -> Result<(Canvas<Window>, TextureCreator<WindowContext>)> {
    let video_system = context.video().map_err(to_sdl_err)?;
    let window = video_system
        .window(
            title,
            (SCREEN_WIDTH * SCALE) as u32,
            (SCREEN_HEIGHT * SCALE) as u32,
        )
        .position_centered()
        .build()?;
    let canvas = window.into_canvas().build()?;

    let texture_creator = canvas.texture_creator();

    Ok((canvas, texture_creator))
}

pub struct Screen<'a> {
    pub texture: Texture<'a>,
    pub buffer: [u8; BUFFER_SIZE],
    presented: bool,
}

impl<'a> Screen<'a> {
    pub fn frame(&mut self, canvas: &mut Canvas<Window>, vmem: &Buffer) -> Result<()> {
        if self.update_screen_buffer(vmem) || !self.presented {
            self.texture.update(None, &self.buffer, SCREEN_WIDTH * 3)?;
            canvas.copy(&self.texture, None, None).map_err(to_sdl_err)?;
            canvas.present();
            self.presented = true;
        }

        Ok(())
    }

    /// Returns whether anything changed since the last frame.
    fn update_screen_buffer(&mut self, vmem: &Buffer) -> bool {
        let mut changed = false;

        for (i, &lit) in vmem.iter().enumerate() {
            let value = if lit { 0xFF } else { 0x00 };
            let pixel = &mut self.buffer[i * 3..i * 3 + 3];
            if pixel[0] != value {
                pixel.fill(value);
                changed = true;
            }
        }

        changed
    }
}

impl<'a> TryFrom<&'a TextureCreator<WindowContext>> for Screen<'a> {
    type Error = Error;

    fn try_from(
        texture_creator: &'a TextureCreator<WindowContext>,
    ) -> std::result::Result<Self, Self::Error> {
        let texture = texture_creator.create_texture_streaming(
            PixelFormatEnum::RGB24,
            SCREEN_WIDTH as u32,
            SCREEN_HEIGHT as u32,
        )?;

        Ok(Self {
            texture,
            buffer: [0; BUFFER_SIZE],
            presented: false,
        })
    }
}

fn to_sdl_err(err: String) -> Error {
    Error::SystemError(err)
}
