use std::sync::Arc;

use pixels::{Error, Pixels, SurfaceTexture, TextureError};
use tracing::warn;
use winit::window::Window;

use super::draw_fps_counter;

/// Presents the engine screen buffer through a `pixels` surface.
///
/// The pixel buffer keeps the engine resolution; the surface follows the
/// window and `pixels` scales between the two.
pub struct Renderer {
    pixels: Pixels<'static>,
    width: u32,
    height: u32,
    warned_size_mismatch: bool,
}

impl Renderer {
    pub fn new(window: Arc<Window>, width: u32, height: u32) -> Result<Self, Error> {
        let surface_size = window.inner_size();
        let surface = SurfaceTexture::new(surface_size.width, surface_size.height, window);
        let pixels = Pixels::new(width, height, surface)?;
        Ok(Self {
            pixels,
            width,
            height,
            warned_size_mismatch: false,
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), TextureError> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.pixels.resize_surface(width, height)
    }

    pub fn present(&mut self, screen: &[u32], fps: Option<u32>) -> Result<(), Error> {
        let frame = self.pixels.frame_mut();
        let copied = blit_xrgb_to_rgba(screen, frame);
        let mismatched = copied != screen.len() || copied * 4 != frame.len();
        if mismatched && !self.warned_size_mismatch {
            self.warned_size_mismatch = true;
            warn!(
                screen_pixels = screen.len(),
                frame_pixels = frame.len() / 4,
                width = self.width,
                height = self.height,
                "screen_buffer_size_mismatch"
            );
        }
        if let Some(fps) = fps {
            draw_fps_counter(frame, self.width, self.height, fps);
        }
        self.pixels.render()
    }
}

/// Copies `0x00RRGGBB` engine pixels into an RGBA8 frame with full alpha.
///
/// Returns how many pixels were copied; only the overlapping prefix is
/// written when the lengths disagree.
pub(crate) fn blit_xrgb_to_rgba(screen: &[u32], frame: &mut [u8]) -> usize {
    let mut copied = 0;
    for (pixel, rgba) in screen.iter().zip(frame.chunks_exact_mut(4)) {
        let [_, r, g, b] = pixel.to_be_bytes();
        rgba.copy_from_slice(&[r, g, b, 0xff]);
        copied += 1;
    }
    copied
}
