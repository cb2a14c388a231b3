//! Lookup Controller
//!
//! The whole control logic of dex: take the text the user typed, look the
//! creature up, turn the record into a two-frame animation, and play its cry.
//!
//! # Ownership
//!
//! The controller is owned by the surface's loop and only mutated there.
//! Lookups run as spawned tasks and report back over a channel; the surface
//! applies those completions with [`LookupController::poll`] (or awaits one
//! with [`LookupController::settle`]). The animation timer is fed elapsed time
//! with [`LookupController::update`].
//!
//! # Overlapping lookups
//!
//! Starting a lookup does not cancel one that is still in flight. By default
//! whichever completes last wins, even if it was issued first; such stale
//! completions are logged. Set
//! [`LookupConfig::discard_stale_responses`] to drop them instead.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use crate::animation::{FrameSequence, FrameTimer, DEFAULT_FRAME_INTERVAL};
use crate::audio::AudioPlayer;
use crate::client::{DataClient, FetchError};
use crate::notify::{
    NotificationSink, Severity, EMPTY_QUERY_DETAIL, EMPTY_QUERY_SUMMARY, LOOKUP_FAILED_DETAIL,
    LOOKUP_FAILED_SUMMARY,
};
use crate::record::CreatureRecord;

/// Controller settings
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LookupConfig {
    /// Delay between frame advances
    pub frame_interval: Duration,
    /// Drop completions of lookups that a newer lookup superseded
    pub discard_stale_responses: bool,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            frame_interval: DEFAULT_FRAME_INTERVAL,
            discard_stale_responses: false,
        }
    }
}

/// What [`LookupController::load`] did
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Query was empty; a warning was raised and nothing was requested
    EmptyQuery,
    /// A lookup was issued
    Requested {
        /// Sequence number of the lookup
        generation: u64,
    },
    /// The controller was disposed; nothing happened
    Disposed,
}

/// Copy of the render state, for surfaces that draw from a snapshot
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LookupSnapshot {
    /// Normalized query text
    pub query: String,
    /// A lookup is in flight
    pub loading: bool,
    /// Last successfully loaded record
    pub record: Option<CreatureRecord>,
    /// Animation frames
    pub frames: Vec<String>,
    /// Index of the frame on screen
    pub cursor: usize,
    /// The frame timer is running
    pub animating: bool,
    /// The frame on screen, empty if none
    pub current_frame: String,
}

/// Result of one lookup, delivered back to the owning loop
struct Completion {
    generation: u64,
    query: String,
    result: Result<CreatureRecord, FetchError>,
}

/// Orchestrates lookups, animation, and audio for one surface
pub struct LookupController<C, N, A> {
    config: LookupConfig,
    client: Arc<C>,
    sink: N,
    player: A,

    // === Render State ===
    query: String,
    loading: bool,
    record: Option<CreatureRecord>,
    frames: FrameSequence,
    timer: FrameTimer,

    // === Lookup Bookkeeping ===
    /// Generation of the newest lookup issued
    generation: u64,
    /// Lookups issued but not yet applied
    in_flight: usize,
    completions_tx: mpsc::Sender<Completion>,
    completions_rx: mpsc::Receiver<Completion>,

    disposed: bool,
}

impl<C, N, A> LookupController<C, N, A>
where
    C: DataClient + 'static,
    N: NotificationSink,
    A: AudioPlayer,
{
    /// Create a controller with nothing loaded
    pub fn new(client: C, sink: N, player: A, config: LookupConfig) -> Self {
        let (completions_tx, completions_rx) = mpsc::channel(16);
        let timer = FrameTimer::new(config.frame_interval);

        Self {
            config,
            client: Arc::new(client),
            sink,
            player,
            query: String::new(),
            loading: false,
            record: None,
            frames: FrameSequence::default(),
            timer,
            generation: 0,
            in_flight: 0,
            completions_tx,
            completions_rx,
            disposed: false,
        }
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Store the lowercase form of `text` as the query
    pub fn update_name(&mut self, text: &str) {
        self.query = text.to_lowercase();
    }

    /// Look up the current query
    ///
    /// An empty query raises a warning and requests nothing. Otherwise the
    /// animation stops, loading starts, and the lookup runs in the background
    /// until [`poll`](Self::poll) or [`settle`](Self::settle) applies it.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn load(&mut self) -> LoadOutcome {
        if self.disposed {
            tracing::debug!("Ignoring lookup on disposed controller");
            return LoadOutcome::Disposed;
        }

        if self.query.is_empty() {
            self.sink
                .notify(Severity::Warn, EMPTY_QUERY_SUMMARY, EMPTY_QUERY_DETAIL);
            return LoadOutcome::EmptyQuery;
        }

        self.stop_animation();
        self.loading = true;
        self.generation += 1;
        self.in_flight += 1;

        let generation = self.generation;
        let query = self.query.clone();
        let client = Arc::clone(&self.client);
        let tx = self.completions_tx.clone();

        tracing::info!(query = %query, generation, client = client.name(), "Looking up creature");

        tokio::spawn(async move {
            let result = client.fetch_by_name_or_id(&query).await;
            if tx
                .send(Completion {
                    generation,
                    query,
                    result,
                })
                .await
                .is_err()
            {
                tracing::debug!(generation, "Controller gone before lookup completed");
            }
        });

        LoadOutcome::Requested { generation }
    }

    /// Apply every lookup that has completed, returning how many were applied
    pub fn poll(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(completion) = self.completions_rx.try_recv() {
            self.apply(completion);
            applied += 1;
        }
        applied
    }

    /// Wait for the next lookup to complete and apply it
    ///
    /// Returns `false` immediately when nothing is in flight.
    pub async fn settle(&mut self) -> bool {
        if self.in_flight == 0 {
            return false;
        }
        match self.completions_rx.recv().await {
            Some(completion) => {
                self.apply(completion);
                true
            }
            None => false,
        }
    }

    /// Feed elapsed time to the animation, returning how many frames advanced
    pub fn update(&mut self, delta: Duration) -> u32 {
        let ticks = self.timer.update(delta);
        self.frames.advance_by(ticks);
        if ticks > 0 {
            tracing::trace!(ticks, cursor = self.frames.cursor(), "Animation advanced");
        }
        ticks
    }

    /// Restart the animation from the first frame
    pub fn start_animation(&mut self) {
        if self.disposed {
            return;
        }
        self.frames.reset();
        self.timer.start();
    }

    /// Stop the animation, leaving the current frame on screen
    pub fn stop_animation(&mut self) {
        self.timer.stop();
    }

    /// Stop animating for good; later completions are discarded
    pub fn dispose(&mut self) {
        if !self.disposed {
            tracing::debug!(in_flight = self.in_flight, "Disposing lookup controller");
        }
        self.stop_animation();
        self.disposed = true;
    }

    // =========================================================================
    // Completion Handling
    // =========================================================================

    fn apply(&mut self, completion: Completion) {
        self.in_flight = self.in_flight.saturating_sub(1);

        if self.disposed {
            tracing::debug!(generation = completion.generation, "Discarding completion after dispose");
            return;
        }

        let Completion {
            generation,
            query,
            result,
        } = completion;

        if generation < self.generation {
            if self.config.discard_stale_responses {
                tracing::debug!(generation, newest = self.generation, query = %query, "Discarding stale lookup");
                if self.in_flight == 0 {
                    self.loading = false;
                }
                return;
            }
            tracing::warn!(
                generation,
                newest = self.generation,
                query = %query,
                "Stale lookup completed after a newer one was issued"
            );
        }

        self.loading = false;

        let outcome = result.and_then(|record| match record.animation_frames() {
            Some(frames) => Ok((record, frames)),
            None => Err(FetchError::MissingSprites {
                query: query.clone(),
            }),
        });

        match outcome {
            Ok((record, frames)) => {
                tracing::info!(query = %query, name = %record.display_name(), "Creature loaded");
                let cry = record.cry_url().map(str::to_string);
                self.record = Some(record);
                self.frames = FrameSequence::new(frames);
                self.start_animation();
                match cry {
                    Some(url) => self.player.play(&url),
                    None => tracing::debug!(query = %query, "Record has no cry"),
                }
            }
            Err(e) => {
                tracing::warn!(query = %query, error = %e, "Lookup failed");
                self.sink
                    .notify(Severity::Error, LOOKUP_FAILED_SUMMARY, LOOKUP_FAILED_DETAIL);
            }
        }
    }

    // =========================================================================
    // Render State
    // =========================================================================

    /// Normalized query text
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Whether a lookup is in flight
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Last successfully loaded record
    #[must_use]
    pub fn record(&self) -> Option<&CreatureRecord> {
        self.record.as_ref()
    }

    /// Animation frames (empty before the first successful lookup)
    #[must_use]
    pub fn frames(&self) -> &[String] {
        self.frames.frames()
    }

    /// Index of the frame on screen
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.frames.cursor()
    }

    /// Whether the frame timer is running
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.timer.is_running()
    }

    /// The frame on screen, empty if there is none
    #[must_use]
    pub fn current_frame(&self) -> &str {
        self.frames.current()
    }

    /// Lookups issued but not yet applied
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Whether [`dispose`](Self::dispose) has run
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Controller settings
    #[must_use]
    pub fn config(&self) -> &LookupConfig {
        &self.config
    }

    /// Copy of the render state
    #[must_use]
    pub fn snapshot(&self) -> LookupSnapshot {
        LookupSnapshot {
            query: self.query.clone(),
            loading: self.loading,
            record: self.record.clone(),
            frames: self.frames.frames().to_vec(),
            cursor: self.frames.cursor(),
            animating: self.timer.is_running(),
            current_frame: self.frames.current().to_string(),
        }
    }
}

impl<C, N, A> Drop for LookupController<C, N, A> {
    fn drop(&mut self) {
        self.timer.stop();
        self.disposed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::notify::Notification;

    struct NeverCalled;

    #[async_trait]
    impl DataClient for NeverCalled {
        fn name(&self) -> &str {
            "never"
        }

        async fn fetch_by_name_or_id(&self, query: &str) -> Result<CreatureRecord, FetchError> {
            panic!("unexpected lookup for {query}");
        }
    }

    #[derive(Clone, Default)]
    struct Recorder(Arc<Mutex<Vec<Notification>>>);

    impl NotificationSink for Recorder {
        fn notify(&self, severity: Severity, summary: &str, detail: &str) {
            self.0
                .lock()
                .unwrap()
                .push(Notification::new(severity, summary, detail));
        }
    }

    struct Mute;

    impl AudioPlayer for Mute {
        fn play(&self, _url: &str) {}
    }

    fn controller(sink: Recorder) -> LookupController<NeverCalled, Recorder, Mute> {
        LookupController::new(NeverCalled, sink, Mute, LookupConfig::default())
    }

    #[test]
    fn test_update_name_lowercases() {
        let mut c = controller(Recorder::default());
        c.update_name("PiKaChU");
        assert_eq!(c.query(), "pikachu");

        c.update_name("  Mr. Mime ");
        assert_eq!(c.query(), "  mr. mime ");
    }

    #[test]
    fn test_update_name_is_idempotent() {
        let sink = Recorder::default();
        let mut c = controller(sink.clone());
        c.update_name("Eevee");
        let before = c.snapshot();
        c.update_name("Eevee");
        assert_eq!(c.snapshot(), before);
        assert!(sink.0.lock().unwrap().is_empty());
    }

    #[test]
    fn test_empty_query_warns_without_request() {
        let sink = Recorder::default();
        let mut c = controller(sink.clone());

        assert_eq!(c.load(), LoadOutcome::EmptyQuery);
        assert!(!c.is_loading());
        assert_eq!(c.in_flight(), 0);
        assert_eq!(
            *sink.0.lock().unwrap(),
            vec![Notification::new(
                Severity::Warn,
                "Warn",
                "Write a Polémon ID or name"
            )]
        );
    }

    #[test]
    fn test_initial_render_state() {
        let c = controller(Recorder::default());
        assert_eq!(c.current_frame(), "");
        assert!(c.frames().is_empty());
        assert!(!c.is_animating());
        assert!(c.record().is_none());
    }

    #[test]
    fn test_update_without_frames_is_harmless() {
        let mut c = controller(Recorder::default());
        c.start_animation();
        assert_eq!(c.update(Duration::from_secs(3)), 3);
        assert_eq!(c.cursor(), 0);
        assert_eq!(c.current_frame(), "");
    }

    #[test]
    fn test_dispose_stops_animation_and_blocks_loads() {
        let sink = Recorder::default();
        let mut c = controller(sink.clone());
        c.start_animation();
        c.dispose();

        assert!(!c.is_animating());
        assert_eq!(c.update(Duration::from_secs(5)), 0);

        c.update_name("ditto");
        assert_eq!(c.load(), LoadOutcome::Disposed);
        assert!(sink.0.lock().unwrap().is_empty());

        c.start_animation();
        assert!(!c.is_animating());
    }
}
