//! Scripted input for headless runs.
//!
//! The script orbits the pointer around the viewport, clicks each object in
//! turn, scrolls through the page sections and toggles trails once, so a run
//! exercises every particle path without a window.

use glam::Vec2;

use crate::input::InputEvent;
use crate::stage::Stage;

/// Frames between scripted clicks.
const CLICK_INTERVAL: u64 = 90;

/// Frames between scripted scrolls.
const SCROLL_INTERVAL: u64 = 600;

/// Frames trails stay off after being toggled.
const TRAIL_PAUSE: u64 = 180;

/// Scroll sections visited in order.
const SECTION_TOUR: [u8; 4] = [1, 2, 1, 0];

/// Generates the input events for each frame.
#[derive(Debug, Clone)]
pub struct DemoScript {
    trail_toggle_frame: u64,
    clicks: usize,
    scrolls: usize,
}

impl DemoScript {
    /// Creates a script that pauses trails at `trail_toggle_frame`.
    #[must_use]
    pub const fn new(trail_toggle_frame: u64) -> Self {
        Self {
            trail_toggle_frame,
            clicks: 0,
            scrolls: 0,
        }
    }

    /// Events to apply before frame `frame` is ticked.
    pub fn events(&mut self, frame: u64, stage: &Stage) -> Vec<InputEvent> {
        let viewport = stage.viewport();
        let mut events = vec![InputEvent::PointerMove(orbit(frame, viewport))];

        if frame % CLICK_INTERVAL == CLICK_INTERVAL / 2 {
            let index = self.clicks % stage.objects().len().max(1);
            self.clicks += 1;
            if let Some(pixel) = stage.screen_position(index) {
                events.push(InputEvent::Click(pixel));
            }
        }

        if frame % SCROLL_INTERVAL == SCROLL_INTERVAL / 2 {
            let section = SECTION_TOUR[self.scrolls % SECTION_TOUR.len()];
            self.scrolls += 1;
            events.push(InputEvent::Scroll(f32::from(section) * viewport.y));
        }

        if frame == self.trail_toggle_frame {
            events.push(InputEvent::SetTrails(false));
        } else if frame == self.trail_toggle_frame + TRAIL_PAUSE {
            events.push(InputEvent::SetTrails(true));
        }

        events
    }
}

/// Pointer position on a slow Lissajous orbit around the viewport center.
fn orbit(frame: u64, viewport: Vec2) -> Vec2 {
    let t = frame as f32 / 60.0;
    let center = viewport * 0.5;
    center + Vec2::new((t * 0.7).cos() * 0.35, (t * 1.1).sin() * 0.3) * viewport
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;

    #[test]
    fn test_orbit_stays_on_screen() {
        let viewport = Vec2::new(1280.0, 720.0);
        for frame in 0..2000 {
            let pixel = orbit(frame, viewport);
            assert!(pixel.x >= 0.0 && pixel.x <= viewport.x);
            assert!(pixel.y >= 0.0 && pixel.y <= viewport.y);
        }
    }

    #[test]
    fn test_script_schedule() {
        let stage = Stage::new(&EngineConfig::default(), 1);
        let mut script = DemoScript::new(100);

        let quiet = script.events(0, &stage);
        assert_eq!(quiet.len(), 1);

        let click = script.events(CLICK_INTERVAL / 2, &stage);
        assert!(click.iter().any(|e| matches!(e, InputEvent::Click(_))));

        let scroll = script.events(SCROLL_INTERVAL / 2, &stage);
        assert!(scroll.contains(&InputEvent::Scroll(720.0)));

        assert!(script.events(100, &stage).contains(&InputEvent::SetTrails(false)));
        assert!(script
            .events(100 + TRAIL_PAUSE, &stage)
            .contains(&InputEvent::SetTrails(true)));
    }

    #[test]
    fn test_full_run_is_clean() {
        let config = EngineConfig::default();
        let mut stage = Stage::new(&config, 7);
        let mut script = DemoScript::new(400);

        for frame in 0..1300 {
            for event in script.events(frame, &stage) {
                stage.handle(event);
            }
            stage.tick(1.0 / 60.0);
        }

        let stats = stage.stats();
        assert!(stats.clicks > 0);
        assert!(stats.section_changes >= 2);
        assert!(stats.peak_trail_particles <= 5 * config.trail.capacity);

        let summary = stage.shutdown().expect("no scene violations");
        assert!(summary.is_clean());
    }
}
