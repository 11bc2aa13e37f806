//! Hero carousel on the landing page.
//!
//! Index arithmetic only; the page moves the track by
//! [`Carousel::offset_px`] and styles the dots from [`Carousel::dots`].

use std::time::Duration;

/// Time between automatic advances.
pub const AUTO_ADVANCE: Duration = Duration::from_millis(3000);
/// Minimum horizontal travel, in pixels, for a touch to count as a swipe.
pub const SWIPE_THRESHOLD: f64 = 50.0;
/// Slide width plus gap.
pub const SLIDE_STRIDE_PX: f64 = 330.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Carousel {
    index: usize,
    count: usize,
    paused: bool,
    elapsed: Duration,
}

impl Carousel {
    pub fn new(count: usize) -> Self {
        Self {
            index: 0,
            count,
            paused: false,
            elapsed: Duration::ZERO,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn next(&mut self) {
        if self.count > 0 {
            self.index = (self.index + 1) % self.count;
        }
    }

    pub fn prev(&mut self) {
        if self.count > 0 {
            self.index = (self.index + self.count - 1) % self.count;
        }
    }

    /// Jump to a slide (dot click). Restarts the auto-advance timer.
    pub fn go_to(&mut self, index: usize) {
        if self.count == 0 {
            return;
        }
        self.index = index.min(self.count - 1);
        self.elapsed = Duration::ZERO;
    }

    /// Let time pass. Returns how many slides were advanced.
    pub fn tick(&mut self, dt: Duration) -> usize {
        if self.paused || self.count == 0 {
            return 0;
        }
        self.elapsed += dt;
        let mut advanced = 0;
        while self.elapsed >= AUTO_ADVANCE {
            self.elapsed -= AUTO_ADVANCE;
            self.next();
            advanced += 1;
        }
        advanced
    }

    pub fn pointer_enter(&mut self) {
        self.paused = true;
    }

    pub fn pointer_leave(&mut self) {
        self.paused = false;
    }

    /// Finish a touch gesture that began at `start_x`.
    pub fn swipe(&mut self, start_x: f64, end_x: f64) {
        let travel = start_x - end_x;
        if travel > SWIPE_THRESHOLD {
            self.next();
        } else if travel < -SWIPE_THRESHOLD {
            self.prev();
        }
    }

    /// One flag per slide; only the current slide's is set.
    pub fn dots(&self) -> Vec<bool> {
        (0..self.count).map(|i| i == self.index).collect()
    }

    /// Horizontal translation of the slide track.
    pub fn offset_px(&self) -> f64 {
        -(self.index as f64) * SLIDE_STRIDE_PX
    }
}
