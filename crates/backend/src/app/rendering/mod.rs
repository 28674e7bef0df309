mod fps_overlay;
mod renderer;

pub(crate) use fps_overlay::draw_fps_counter;
pub use renderer::Renderer;
