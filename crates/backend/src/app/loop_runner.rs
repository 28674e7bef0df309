use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use pixels::Error as PixelsError;
use thiserror::Error;
use tracing::{info, warn};
use winit::dpi::LogicalSize;
use winit::error::{EventLoopError, OsError};
use winit::event::{DeviceEvent, Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::{CursorGrabMode, Window, WindowBuilder};

use crate::audio::{resolve_music_manifest, AudioOutput, MusicPlayer};
use crate::host::{EngineHost, Platform};
use crate::input::{mouse_motion_event, EngineEvent, InputPoller, KeyEvent};
use crate::{resolve_app_paths, StartupError, DEFAULT_MOUSE_SENSITIVITY};

use super::frame_input::FrameInput;
use super::metrics::{FrameStatsAccumulator, FrameStatsHandle};
use super::Renderer;

#[derive(Debug, Clone, PartialEq)]
pub struct LoopConfig {
    pub window_title: String,
    /// Window size as a multiple of the host resolution.
    pub window_scale: u32,
    pub max_render_fps: Option<u32>,
    pub metrics_log_interval: Duration,
    pub master_volume: f32,
    pub mouse_sensitivity: i32,
    pub show_fps: bool,
    pub grab_cursor: bool,
    pub music_buffer_ms: u64,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            window_title: "DOOM".to_string(),
            window_scale: 1,
            max_render_fps: Some(120),
            metrics_log_interval: Duration::from_secs(1),
            master_volume: 0.5,
            mouse_sensitivity: DEFAULT_MOUSE_SENSITIVITY,
            show_fps: true,
            grab_cursor: true,
            music_buffer_ms: 250,
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Startup(#[from] StartupError),
    #[error("failed to create event loop: {0}")]
    CreateEventLoop(#[source] EventLoopError),
    #[error("failed to create application window: {0}")]
    CreateWindow(#[source] OsError),
    #[error("failed to initialize renderer: {0}")]
    CreateRenderer(#[source] PixelsError),
    #[error("event loop failed: {0}")]
    EventLoopRun(#[source] EventLoopError),
}

pub fn run_host(config: LoopConfig, host: Box<dyn EngineHost>) -> Result<(), AppError> {
    let stats_handle = FrameStatsHandle::default();
    run_host_with_stats(config, host, stats_handle)
}

pub fn run_host_with_stats(
    config: LoopConfig,
    mut host: Box<dyn EngineHost>,
    stats_handle: FrameStatsHandle,
) -> Result<(), AppError> {
    let app_paths = resolve_app_paths()?;
    info!(
        root = %app_paths.root.display(),
        resource_dir = %app_paths.resource_dir.display(),
        "startup"
    );

    let (width, height) = host.resolution();
    let (window_width, window_height) = window_inner_size((width, height), config.window_scale);
    let event_loop = EventLoop::new().map_err(AppError::CreateEventLoop)?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(config.window_title.clone())
            .with_inner_size(LogicalSize::new(window_width as f64, window_height as f64))
            .build(&event_loop)
            .map_err(AppError::CreateWindow)?,
    );
    let renderer =
        Renderer::new(Arc::clone(&window), width, height).map_err(AppError::CreateRenderer)?;
    if config.grab_cursor {
        grab_cursor(&window);
    }

    let output = match AudioOutput::open_default(config.master_volume) {
        Ok(output) => Some(output),
        Err(error) => {
            warn!(error = %error, "audio_unavailable");
            None
        }
    };
    let mut music = MusicPlayer::new(output, Duration::from_millis(config.music_buffer_ms));
    let manifest = resolve_music_manifest(&app_paths.resource_dir);
    let loaded = music.load_manifest(&app_paths.resource_dir, &manifest);

    event_loop.set_control_flow(ControlFlow::Poll);

    let effective_render_cap = normalize_render_fps_cap(config.max_render_fps);
    let metrics_log_interval =
        normalize_non_zero_duration(config.metrics_log_interval, Duration::from_secs(1));
    info!(
        width,
        height,
        window_scale = config.window_scale,
        render_fps_cap = %format_render_cap(effective_render_cap),
        metrics_log_interval_ms = metrics_log_interval.as_millis() as u64,
        mouse_sensitivity = config.mouse_sensitivity,
        master_volume = config.master_volume,
        music_tracks = loaded,
        "loop_config"
    );

    let now = Instant::now();
    let mut backend = Backend {
        window: Arc::clone(&window),
        window_title: config.window_title.clone(),
        renderer,
        frame_input: FrameInput::default(),
        poller: InputPoller::new(),
        music,
        clock: now,
        last_applied_title: None,
        stats: FrameStatsAccumulator::new(metrics_log_interval, now),
        stats_handle,
        render_frame_target: target_frame_duration(effective_render_cap),
        last_present_instant: now,
        show_fps: config.show_fps,
        mouse_sensitivity: config.mouse_sensitivity,
        present_failure: None,
    };
    host.start(&mut backend);

    let mut focused = true;
    event_loop
        .run(move |event, window_target| match event {
            Event::WindowEvent { window_id, event } if window_id == window.id() => match event {
                WindowEvent::CloseRequested => {
                    info!(reason = "window_close", "shutdown_requested");
                    window_target.exit();
                }
                WindowEvent::Resized(new_size) => {
                    if let Err(error) = backend.renderer.resize(new_size.width, new_size.height) {
                        warn!(error = %error, "renderer_resize_failed");
                        window_target.exit();
                    }
                }
                WindowEvent::ScaleFactorChanged { .. } => {
                    let size = window.inner_size();
                    if let Err(error) = backend.renderer.resize(size.width, size.height) {
                        warn!(error = %error, "renderer_resize_failed");
                        window_target.exit();
                    }
                }
                WindowEvent::Focused(is_focused) => {
                    focused = is_focused;
                    if is_focused {
                        if config.grab_cursor {
                            grab_cursor(&window);
                        }
                    } else {
                        backend.frame_input.release_all();
                    }
                }
                WindowEvent::KeyboardInput { event, .. } => {
                    backend.frame_input.handle_keyboard_input(&event);
                }
                WindowEvent::MouseInput { state, button, .. } => {
                    backend.frame_input.handle_mouse_input(button, state);
                }
                WindowEvent::RedrawRequested => {
                    host.tick(&mut backend);
                    backend.stats.record_tick();
                    if let Some(error) = backend.present_failure.take() {
                        warn!(error = %error, "renderer_draw_failed");
                        window_target.exit();
                    }
                }
                _ => {}
            },
            Event::DeviceEvent {
                event: DeviceEvent::MouseMotion { delta },
                ..
            } if focused => {
                backend.frame_input.add_mouse_motion(delta.0);
            }
            Event::AboutToWait => {
                window.request_redraw();
            }
            Event::LoopExiting => {
                host.shutdown();
                backend.music.stop();
                info!("shutdown");
            }
            _ => {}
        })
        .map_err(AppError::EventLoopRun)
}

/// The window-side half of the host contract.
struct Backend {
    window: Arc<Window>,
    window_title: String,
    renderer: Renderer,
    frame_input: FrameInput,
    poller: InputPoller,
    music: MusicPlayer,
    clock: Instant,
    last_applied_title: Option<String>,
    stats: FrameStatsAccumulator,
    stats_handle: FrameStatsHandle,
    render_frame_target: Option<Duration>,
    last_present_instant: Instant,
    show_fps: bool,
    mouse_sensitivity: i32,
    present_failure: Option<PixelsError>,
}

impl Platform for Backend {
    fn draw_frame(&mut self, screen: &[u32]) {
        let fps = self
            .show_fps
            .then(|| self.stats_handle.snapshot().fps.round() as u32);
        if let Err(error) = self.renderer.present(screen, fps) {
            if self.present_failure.is_none() {
                self.present_failure = Some(error);
            }
        }

        // Single pacing point; the host loop has no other cap.
        let elapsed_since_last_present =
            Instant::now().saturating_duration_since(self.last_present_instant);
        let cap_sleep = compute_cap_sleep(elapsed_since_last_present, self.render_frame_target);
        if cap_sleep > Duration::ZERO {
            thread::sleep(cap_sleep);
        }
        let now = Instant::now();
        self.last_present_instant = now;

        self.poller.poll(&self.frame_input);
        self.stats.record_key_events(self.poller.take_queued_count());
        self.frame_input.end_frame();

        self.stats.record_frame(now);
        if let Some(snapshot) = self.stats.maybe_snapshot(now) {
            self.stats_handle.publish(snapshot);
            info!(
                fps = snapshot.fps,
                tps = snapshot.tps,
                frame_time_ms = snapshot.frame_time_ms,
                key_events = snapshot.key_events,
                song = self.music.current_song(),
                "loop_metrics"
            );
        }
    }

    fn sleep_ms(&mut self, ms: u32) {
        thread::sleep(Duration::from_millis(u64::from(ms)));
    }

    fn ticks_ms(&self) -> u32 {
        wrap_millis(self.clock.elapsed())
    }

    fn next_key_event(&mut self) -> Option<KeyEvent> {
        self.poller.pop()
    }

    fn mouse_event(&mut self) -> EngineEvent {
        mouse_motion_event(self.frame_input.mouse_delta_x(), self.mouse_sensitivity)
    }

    fn set_window_title(&mut self, title: &str) {
        let Some(title) =
            title_to_apply(self.last_applied_title.as_deref(), title, &self.window_title)
        else {
            return;
        };
        self.window.set_title(title);
        self.last_applied_title = Some(title.to_string());
    }

    fn start_music(&mut self, song: usize) {
        self.music.start(song);
    }

    fn stop_music(&mut self) {
        self.music.stop();
    }

    fn update_music(&mut self) {
        self.music.update();
    }
}

fn grab_cursor(window: &Window) {
    let grabbed = window
        .set_cursor_grab(CursorGrabMode::Confined)
        .or_else(|_| window.set_cursor_grab(CursorGrabMode::Locked));
    if let Err(error) = grabbed {
        warn!(error = %error, "cursor_grab_failed");
    }
    window.set_cursor_visible(false);
}

/// The title to hand to the window, or `None` when it is already showing.
/// An empty request falls back to the configured title.
fn title_to_apply<'a>(
    last_applied: Option<&str>,
    requested: &'a str,
    default_title: &'a str,
) -> Option<&'a str> {
    let title = if requested.is_empty() {
        default_title
    } else {
        requested
    };
    (last_applied != Some(title)).then_some(title)
}

fn window_inner_size(resolution: (u32, u32), scale: u32) -> (u32, u32) {
    let scale = scale.max(1);
    (
        resolution.0.saturating_mul(scale),
        resolution.1.saturating_mul(scale),
    )
}

fn wrap_millis(elapsed: Duration) -> u32 {
    (elapsed.as_millis() % (u128::from(u32::MAX) + 1)) as u32
}

fn normalize_non_zero_duration(value: Duration, fallback: Duration) -> Duration {
    if value.is_zero() {
        fallback
    } else {
        value
    }
}

fn normalize_render_fps_cap(cap: Option<u32>) -> Option<u32> {
    cap.filter(|value| *value > 0)
}

fn target_frame_duration(max_render_fps: Option<u32>) -> Option<Duration> {
    max_render_fps.map(|fps| Duration::from_secs_f64(1.0 / fps as f64))
}

fn compute_cap_sleep(elapsed: Duration, target: Option<Duration>) -> Duration {
    match target {
        Some(frame_target) if elapsed < frame_target => frame_target - elapsed,
        _ => Duration::ZERO,
    }
}

fn format_render_cap(cap: Option<u32>) -> String {
    match cap {
        Some(value) => value.to_string(),
        None => "off".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_reference_frontend() {
        let config = LoopConfig::default();
        assert_eq!(config.window_title, "DOOM");
        assert_eq!(config.max_render_fps, Some(120));
        assert_eq!(config.master_volume, 0.5);
        assert_eq!(config.mouse_sensitivity, 10);
        assert_eq!(config.music_buffer_ms, 250);
        assert!(config.grab_cursor);
    }

    #[test]
    fn zero_render_cap_disables_pacing() {
        assert_eq!(normalize_render_fps_cap(Some(0)), None);
        assert_eq!(normalize_render_fps_cap(Some(120)), Some(120));
        assert_eq!(format_render_cap(None), "off");
        assert_eq!(format_render_cap(Some(35)), "35");
    }

    #[test]
    fn cap_sleep_fills_remaining_frame_budget() {
        let target = target_frame_duration(Some(100));
        assert_eq!(target, Some(Duration::from_millis(10)));
        assert_eq!(
            compute_cap_sleep(Duration::from_millis(4), target),
            Duration::from_millis(6)
        );
        assert_eq!(
            compute_cap_sleep(Duration::from_millis(12), target),
            Duration::ZERO
        );
        assert_eq!(compute_cap_sleep(Duration::from_millis(1), None), Duration::ZERO);
    }

    #[test]
    fn zero_interval_falls_back() {
        let fallback = Duration::from_secs(1);
        assert_eq!(normalize_non_zero_duration(Duration::ZERO, fallback), fallback);
        assert_eq!(
            normalize_non_zero_duration(Duration::from_millis(500), fallback),
            Duration::from_millis(500)
        );
    }

    #[test]
    fn repeated_title_is_not_reapplied() {
        assert_eq!(title_to_apply(None, "E1M1", "DOOM"), Some("E1M1"));
        assert_eq!(title_to_apply(Some("E1M1"), "E1M1", "DOOM"), None);
        assert_eq!(title_to_apply(Some("E1M1"), "E1M2", "DOOM"), Some("E1M2"));
    }

    #[test]
    fn empty_title_falls_back_to_configured_title() {
        assert_eq!(title_to_apply(Some("E1M1"), "", "DOOM"), Some("DOOM"));
        assert_eq!(title_to_apply(Some("DOOM"), "", "DOOM"), None);
    }

    #[test]
    fn window_size_scales_host_resolution() {
        assert_eq!(window_inner_size((320, 200), 3), (960, 600));
        assert_eq!(window_inner_size((640, 400), 0), (640, 400));
    }

    #[test]
    fn ticks_wrap_at_u32_range() {
        assert_eq!(wrap_millis(Duration::from_millis(1_500)), 1_500);
        let past_wrap = Duration::from_millis(u64::from(u32::MAX) + 5);
        assert_eq!(wrap_millis(past_wrap), 4);
    }
}
