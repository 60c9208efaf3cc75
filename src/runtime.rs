use crate::{
    config::DemoConfig,
    error::Result,
    gl_wrappers,
    level::Level,
    window::Window,
};
use std::time::Duration;

/// Longest step fed to the simulation, so a stalled frame (window drag,
/// breakpoint) doesn't launch the player through walls.
const MAX_FRAME_TIME: f64 = 0.25;

#[derive(Debug, Default)]
pub struct FrameTimer {
    last_frame: Option<f64>,
    fps_window: f64,
    fps_frames: u32,
}

impl FrameTimer {
    /// Records a frame at `now` seconds and returns the clamped delta. The
    /// first frame has a delta of zero.
    pub fn tick(&mut self, now: f64) -> f64 {
        let delta = self.last_frame.map_or(0.0, |last| (now - last).max(0.0));
        self.last_frame = Some(now);
        self.fps_window += delta;
        self.fps_frames += 1;
        delta.min(MAX_FRAME_TIME)
    }

    /// Average FPS over the last second, once a full second has elapsed.
    pub fn take_fps(&mut self) -> Option<f64> {
        if self.fps_window < 1.0 {
            return None;
        }
        let fps = self.fps_frames as f64 / self.fps_window;
        self.fps_window = 0.0;
        self.fps_frames = 0;
        Some(fps)
    }
}

/// Time left to sleep so the frame lasts at least `1 / max_fps` seconds.
pub fn frame_sleep(max_fps: f64, frame_elapsed: f64) -> Option<Duration> {
    if max_fps <= 0.0 {
        return None;
    }
    let remaining = 1.0 / max_fps - frame_elapsed;
    (remaining > 0.0).then(|| Duration::from_secs_f64(remaining))
}

pub fn run(config: &DemoConfig) -> Result<()> {
    let mut window = Window::new(&config.window)?;
    let mut level = Level::load(config)?;
    let frame_cap = config.window.max_fps.filter(|_| !config.window.vsync);
    let clear = config.clear_color;
    let mut timer = FrameTimer::default();

    while window.is_open() {
        if config.keys.quit_requested(|key| window.is_key_pressed(key)) {
            window.set_should_close(true);
        }

        // UPDATE
        let now = window.time();
        let dt = timer.tick(now);
        let input = config.keys.move_input(|key| window.is_key_pressed(key));
        level.update(input, now as f32, dt as f32);

        // RENDER
        gl_wrappers::clear(clear.r, clear.g, clear.b, clear.a);
        level.render();

        window.swap_buffers();
        window.poll_events();

        if let Some(fps) = timer.take_fps() {
            log::debug!(
                "{:.1} fps, player speed {:.2}",
                fps,
                level.player().speed()
            );
        }
        if let Some(pause) = frame_cap.and_then(|cap| frame_sleep(cap, window.time() - now)) {
            spin_sleep::sleep(pause);
        }
    }

    log::info!("Window closed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_tick_has_zero_delta() {
        let mut timer = FrameTimer::default();
        assert_eq!(timer.tick(12.0), 0.0);
        assert!((timer.tick(12.016) - 0.016).abs() < 1e-9);
    }

    #[test]
    fn long_frames_are_clamped() {
        let mut timer = FrameTimer::default();
        timer.tick(0.0);
        assert_eq!(timer.tick(5.0), MAX_FRAME_TIME);
    }

    #[test]
    fn clock_going_backwards_gives_zero_delta() {
        let mut timer = FrameTimer::default();
        timer.tick(3.0);
        assert_eq!(timer.tick(2.0), 0.0);
    }

    #[test]
    fn fps_reported_once_per_second() {
        let mut timer = FrameTimer::default();
        for i in 0..=50 {
            timer.tick(i as f64 * 0.01);
        }
        assert_eq!(timer.take_fps(), None);
        for i in 51..=110 {
            timer.tick(i as f64 * 0.01);
        }
        let fps = timer.take_fps().unwrap();
        assert!(fps > 100.0 && fps < 102.0);
        assert_eq!(timer.take_fps(), None);
    }

    #[test]
    fn frame_sleep_fills_remaining_budget() {
        let pause = frame_sleep(50.0, 0.005).unwrap();
        assert!((pause.as_secs_f64() - 0.015).abs() < 1e-9);
        assert_eq!(frame_sleep(50.0, 0.03), None);
        assert_eq!(frame_sleep(0.0, 0.0), None);
    }
}
