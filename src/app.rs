use color_eyre::Result;
use color_eyre::eyre::WrapErr;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::time::{Duration, Instant};

use crate::assets::Assets;
use crate::config::GameConfig;
use crate::input::InputManager;
use crate::renderer::{GameRenderer, RenderView};
use crate::session::{Flow, Session};

/// Sleeps out whatever is left of each tick's time budget
#[derive(Debug, Clone, Copy)]
pub struct FrameLimiter {
    tick: Duration,
}

impl FrameLimiter {
    pub fn new(tick: Duration) -> Self {
        Self { tick }
    }

    /// Time left in the tick that started at `start`
    pub fn remaining(&self, start: Instant, now: Instant) -> Duration {
        self.tick.saturating_sub(now.saturating_duration_since(start))
    }

    pub fn wait(&self, start: Instant) {
        let remaining = self.remaining(start, Instant::now());
        if !remaining.is_zero() {
            std::thread::sleep(remaining);
        }
    }
}

/// Frames counted over the last whole second
#[derive(Debug, Clone)]
pub struct FpsCounter {
    window_start: Instant,
    frames: u32,
    fps: u32,
}

impl FpsCounter {
    pub fn new(now: Instant) -> Self {
        Self {
            window_start: now,
            frames: 0,
            fps: 0,
        }
    }

    pub fn frame(&mut self, now: Instant) {
        self.frames += 1;
        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed >= Duration::from_secs(1) {
            self.fps = (f64::from(self.frames) / elapsed.as_secs_f64()).round() as u32;
            self.frames = 0;
            self.window_start = now;
        }
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }
}

/// The main application which holds the state and logic of the application.
pub struct App {
    running: bool,
    session: Session,
    input_manager: InputManager,
    renderer: GameRenderer,
    limiter: FrameLimiter,
    fps: FpsCounter,
}

impl App {
    /// `reports_releases` tells the input layer whether key releases will arrive
    pub fn new(config: GameConfig, reports_releases: bool) -> Self {
        let assets = Assets::load(&config.asset_dir, config.ship_count);
        Self {
            running: true,
            limiter: FrameLimiter::new(config.tick_duration()),
            session: Session::new(config, reports_releases),
            input_manager: InputManager::new(reports_releases),
            renderer: GameRenderer::new(assets),
            fps: FpsCounter::new(Instant::now()),
        }
    }

    /// Run the application's main loop.
    pub fn run(mut self, terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>) -> Result<()> {
        log::info!("running at {:?} per tick", self.limiter.tick);
        while self.running {
            let frame_start = Instant::now();
            self.fps.frame(frame_start);

            self.input_manager.poll_events();
            for event in self.input_manager.take_events() {
                if self.session.handle_event(event) == Flow::Quit {
                    self.running = false;
                }
            }
            if !self.running {
                break;
            }

            self.session.tick(self.input_manager.held());

            terminal
                .draw(|frame| {
                    let view = RenderView {
                        screen: self.session.screen(),
                        fps: self.fps.fps(),
                    };
                    self.renderer.render(frame, &view);
                })
                .wrap_err("drawing frame")?;

            self.limiter.wait(frame_start);
        }
        log::info!("{} round(s) played", self.session.rounds_played());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limiter_remaining() {
        let limiter = FrameLimiter::new(Duration::from_millis(16));
        let start = Instant::now();
        assert_eq!(
            limiter.remaining(start, start + Duration::from_millis(10)),
            Duration::from_millis(6)
        );
        assert_eq!(
            limiter.remaining(start, start + Duration::from_millis(40)),
            Duration::ZERO
        );
    }

    #[test]
    fn test_fps_counter() {
        let start = Instant::now();
        let mut counter = FpsCounter::new(start);
        for i in 1..=30 {
            counter.frame(start + Duration::from_millis(i * 33));
        }
        // 30 frames in 990ms: window not closed yet
        assert_eq!(counter.fps(), 0);
        counter.frame(start + Duration::from_millis(1000));
        assert_eq!(counter.fps(), 31);
    }
}
