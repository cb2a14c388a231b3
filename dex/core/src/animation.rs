//! Sprite Animation
//!
//! Two pieces: a [`FrameSequence`] holding the frames and the cursor into
//! them, and a [`FrameTimer`] that turns elapsed time into ticks. The timer is
//! driven by the surface's own loop (`update(delta)`), so stopping it is
//! immediate and there is never a detached callback left to fire.

use std::time::Duration;

/// Delay between frame advances
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(1000);

/// Frame shown for a sequence and cursor; empty when there are no frames
#[must_use]
pub fn current_frame(frames: &[String], cursor: usize) -> &str {
    if frames.is_empty() {
        return "";
    }
    frames.get(cursor % frames.len()).map_or("", String::as_str)
}

/// Ordered frames plus the index of the one on screen
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameSequence {
    frames: Vec<String>,
    cursor: usize,
}

impl FrameSequence {
    /// Create a sequence positioned on its first frame
    pub fn new(frames: impl IntoIterator<Item = String>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
            cursor: 0,
        }
    }

    /// All frames
    #[must_use]
    pub fn frames(&self) -> &[String] {
        &self.frames
    }

    /// Index of the frame on screen
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of frames
    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether there is anything to show
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// The frame on screen
    #[must_use]
    pub fn current(&self) -> &str {
        current_frame(&self.frames, self.cursor)
    }

    /// Back to the first frame
    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    /// Move to the next frame, wrapping at the end
    pub fn advance(&mut self) {
        self.advance_by(1);
    }

    /// Move `steps` frames forward, wrapping at the end
    pub fn advance_by(&mut self, steps: u32) {
        let len = self.frames.len();
        if len > 0 {
            let steps = usize::try_from(steps).unwrap_or(usize::MAX) % len;
            self.cursor = (self.cursor + steps) % len;
        }
    }
}

/// Cancellable fixed-interval timer fed by elapsed time
#[derive(Clone, Debug)]
pub struct FrameTimer {
    interval: Duration,
    elapsed: Duration,
    running: bool,
}

impl FrameTimer {
    /// Create a stopped timer; a zero interval is raised to 1 ms
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            interval: interval.max(Duration::from_millis(1)),
            elapsed: Duration::ZERO,
            running: false,
        }
    }

    /// Tick interval
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Whether ticks are being produced
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Start counting from zero
    pub fn start(&mut self) {
        self.running = true;
        self.elapsed = Duration::ZERO;
    }

    /// Stop and discard any partially elapsed interval
    pub fn stop(&mut self) {
        self.running = false;
        self.elapsed = Duration::ZERO;
    }

    /// Feed elapsed time, returning how many ticks fell due
    pub fn update(&mut self, delta: Duration) -> u32 {
        if !self.running {
            return 0;
        }

        self.elapsed = self.elapsed.saturating_add(delta);
        let due = self.elapsed.as_nanos() / self.interval.as_nanos();
        let ticks = u32::try_from(due).unwrap_or(u32::MAX);
        self.elapsed = self
            .elapsed
            .saturating_sub(self.interval.saturating_mul(ticks));
        ticks
    }
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new(DEFAULT_FRAME_INTERVAL)
    }
}
