//! Live diagram controller
//!
//! Wires an [`EditSource`], the transition parser, and a [`SceneAdapter`]
//! together. Edit notifications are debounced; an update whose text equals
//! the last processed text does nothing at all.
//!
//! ```
//! use std::time::Duration;
//! use circles::core::AsciiSurface;
//! use circles::live::{LiveConfig, LiveDiagram, TextBuffer};
//!
//! let mut live = LiveDiagram::new(AsciiSurface::default(), LiveConfig::default()).unwrap();
//! live.bind_input(TextBuffer::new("A->B")).unwrap();
//! live.begin();
//!
//! live.input_mut().unwrap().push_str("\nB->C");
//! live.notify_edit(Duration::from_millis(0));
//! assert!(!live.poll(Duration::from_millis(100)).unwrap());
//! assert!(live.poll(Duration::from_millis(300)).unwrap());
//! assert_eq!(live.database().state_count(), 3);
//! ```

mod debounce;
mod source;

pub use debounce::{timestamp_from_millis, Debouncer, DEFAULT_QUIET};
pub use source::{EditSource, TextBuffer};

use anyhow::Result;
use std::time::Duration;
use tracing::{debug, info, span, trace, Level};

use crate::core::{DiagramError, DrawingSurface, Parser};
use crate::machine::{LayoutConfig, PassStats, SceneAdapter, StateDatabase, TransitionParser};

/// Settings of the live controller
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiveConfig {
    /// Quiet period between the last edit and the update
    pub debounce: Duration,
    pub layout: LayoutConfig,
}

impl Default for LiveConfig {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_QUIET,
            layout: LayoutConfig::default(),
        }
    }
}

/// Keeps a diagram in sync with an edited text
pub struct LiveDiagram<S: DrawingSurface, E: EditSource> {
    parser: TransitionParser,
    scene: SceneAdapter<S>,
    input: Option<E>,
    raw: Option<String>,
    database: StateDatabase,
    debouncer: Debouncer,
    running: bool,
    last_pass: Option<PassStats>,
    passes: usize,
}

impl<S: DrawingSurface, E: EditSource> LiveDiagram<S, E> {
    pub fn new(surface: S, config: LiveConfig) -> Result<Self> {
        Ok(Self {
            parser: TransitionParser::new(),
            scene: SceneAdapter::new(surface, config.layout)?,
            input: None,
            raw: None,
            database: StateDatabase::new(),
            debouncer: Debouncer::new(config.debounce),
            running: false,
            last_pass: None,
            passes: 0,
        })
    }

    /// Attach the edit source and bring the diagram up to date with it
    pub fn bind_input(&mut self, source: E) -> Result<bool> {
        self.input = Some(source);
        self.update()
    }

    pub fn input(&self) -> Option<&E> {
        self.input.as_ref()
    }

    pub fn input_mut(&mut self) -> Option<&mut E> {
        self.input.as_mut()
    }

    /// Start accepting scheduled updates
    pub fn begin(&mut self) {
        self.running = true;
    }

    /// Stop accepting scheduled updates and drop the pending one
    pub fn stop(&mut self) {
        self.running = false;
        if self.debouncer.cancel() {
            debug!("Cancelled pending update");
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// True while an update is scheduled
    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Record an edit at `now`, pushing the pending update back
    ///
    /// Ignored while stopped. Returns true if an update was scheduled.
    pub fn notify_edit(&mut self, now: Duration) -> bool {
        if !self.running {
            trace!("Edit ignored, controller stopped");
            return false;
        }
        let replaced = self.debouncer.schedule(now);
        trace!(replaced, deadline = ?self.debouncer.deadline(), "Scheduled update");
        true
    }

    /// Run the scheduled update if its quiet period is over
    pub fn poll(&mut self, now: Duration) -> Result<bool> {
        if self.debouncer.fire(now) {
            self.update()
        } else {
            Ok(false)
        }
    }

    /// Run a pass if the text changed since the last one
    ///
    /// Returns false without touching the parser, the nodes, or the surface
    /// when the text is unchanged.
    pub fn update(&mut self) -> Result<bool> {
        let input = self.input.as_ref().ok_or(DiagramError::NoInput)?;
        let text = input.contents()?;
        if self.raw.as_deref() == Some(text.as_str()) {
            trace!("Text unchanged, skipping update");
            return Ok(false);
        }

        let update_span = span!(Level::INFO, "update", input_len = text.len());
        let _enter = update_span.enter();

        let database = self.parser.parse_fresh(&text)?;
        let stats = self.scene.render(&database)?;

        self.database = database;
        self.raw = Some(text);
        self.last_pass = Some(stats);
        self.passes += 1;
        info!(pass = self.passes, "Diagram updated");
        Ok(true)
    }

    /// Diagram produced by the last pass
    pub fn database(&self) -> &StateDatabase {
        &self.database
    }

    pub fn scene(&self) -> &SceneAdapter<S> {
        &self.scene
    }

    pub fn surface(&self) -> &S {
        self.scene.surface()
    }

    pub fn surface_mut(&mut self) -> &mut S {
        self.scene.surface_mut()
    }

    /// Stats of the last pass that ran
    pub fn last_pass(&self) -> Option<PassStats> {
        self.last_pass
    }

    /// Number of passes that ran
    pub fn pass_count(&self) -> usize {
        self.passes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::AsciiSurface;

    fn live() -> LiveDiagram<AsciiSurface, TextBuffer> {
        LiveDiagram::new(AsciiSurface::default(), LiveConfig::default()).unwrap()
    }

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    #[test]
    fn test_update_without_input_fails() {
        let mut diagram = live();
        assert!(diagram.update().is_err());
    }

    #[test]
    fn test_bind_input_runs_first_pass() {
        let mut diagram = live();
        assert!(diagram.bind_input(TextBuffer::new("A->B")).unwrap());
        assert_eq!(diagram.pass_count(), 1);
        assert_eq!(diagram.scene().nodes().len(), 2);
    }

    #[test]
    fn test_empty_text_still_runs_first_pass() {
        let mut diagram = live();
        assert!(diagram.bind_input(TextBuffer::default()).unwrap());
        assert_eq!(diagram.last_pass().unwrap().radius, None);
    }

    #[test]
    fn test_unchanged_text_is_skipped() {
        let mut diagram = live();
        diagram.bind_input(TextBuffer::new("A->B")).unwrap();
        let redraws = diagram.surface().redraw_count();

        assert!(!diagram.update().unwrap());
        assert_eq!(diagram.pass_count(), 1);
        assert_eq!(diagram.surface().redraw_count(), redraws);
    }

    #[test]
    fn test_edits_ignored_until_begin() {
        let mut diagram = live();
        diagram.bind_input(TextBuffer::new("A->B")).unwrap();
        assert!(!diagram.notify_edit(ms(0)));
        assert!(!diagram.is_pending());

        diagram.begin();
        assert!(diagram.notify_edit(ms(0)));
        assert!(diagram.is_pending());
    }

    #[test]
    fn test_stop_cancels_pending_update() {
        let mut diagram = live();
        diagram.bind_input(TextBuffer::new("A->B")).unwrap();
        diagram.begin();
        diagram.input_mut().unwrap().set("C->D");
        diagram.notify_edit(ms(0));
        diagram.stop();

        assert!(!diagram.is_running());
        assert!(!diagram.poll(ms(1000)).unwrap());
        assert!(diagram.database().contains_state("A"));
    }
}
