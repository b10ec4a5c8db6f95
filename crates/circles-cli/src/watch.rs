//! File watching for the `watch` command
//!
//! Polls the watched file's modification stamp, turns every change into an
//! edit notification, and lets the live controller's debounce decide when to
//! redraw.

use anyhow::{anyhow, Result};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use circles::core::AsciiSurface;
use circles::live::{EditSource, LiveConfig, LiveDiagram};
use circles::RenderConfig;
use crossterm::{
    cursor::MoveTo,
    execute,
    terminal::{Clear, ClearType},
};
use tracing::{debug, trace};

type Stamp = (Option<SystemTime>, u64);

/// Edit source backed by a file on disk
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Modification time and length, used to spot edits
    ///
    /// `None` while the file is missing, which happens for a moment when an
    /// editor saves by renaming a temporary file over it.
    fn stamp(&self) -> Result<Option<Stamp>> {
        match fs::metadata(&self.path) {
            Ok(metadata) => Ok(Some((metadata.modified().ok(), metadata.len()))),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(anyhow!("Failed to stat '{}': {}", self.path.display(), e)),
        }
    }
}

impl EditSource for FileSource {
    fn contents(&self) -> Result<String> {
        fs::read_to_string(&self.path)
            .map_err(|e| anyhow!("Failed to read input file '{}': {}", self.path.display(), e))
    }
}

/// Live diagram following a file
pub struct Watcher {
    diagram: LiveDiagram<AsciiSurface, FileSource>,
    stamp: Stamp,
}

impl Watcher {
    /// Render the file once and start following it
    pub fn new(path: impl Into<PathBuf>, render: RenderConfig, live: LiveConfig) -> Result<Self> {
        let source = FileSource::new(path);
        let stamp = source
            .stamp()?
            .ok_or_else(|| anyhow!("Input file '{}' not found", source.path().display()))?;

        let mut diagram = LiveDiagram::new(AsciiSurface::new(render), live)?;
        diagram.bind_input(source)?;
        diagram.begin();
        Ok(Self { diagram, stamp })
    }

    /// Check the file at `now`; true when the picture was redrawn
    pub fn check(&mut self, now: Duration) -> Result<bool> {
        let stamp = match self.diagram.input() {
            Some(source) => match source.stamp()? {
                Some(stamp) => stamp,
                None => {
                    // Keep any pending update until the file is back
                    trace!("File missing, waiting");
                    return Ok(false);
                }
            },
            None => return Ok(false),
        };
        if stamp != self.stamp {
            trace!(?stamp, "File changed");
            self.stamp = stamp;
            self.diagram.notify_edit(now);
        }
        self.diagram.poll(now)
    }

    pub fn frame(&self) -> String {
        self.diagram.surface().frame()
    }

    pub fn diagram(&self) -> &LiveDiagram<AsciiSurface, FileSource> {
        &self.diagram
    }
}

/// Clear the terminal and print the current picture
pub fn draw(frame: &str) -> Result<()> {
    let mut stdout = io::stdout();
    execute!(stdout, Clear(ClearType::All), MoveTo(0, 0))?;
    writeln!(stdout, "{}", frame)?;
    stdout.flush()?;
    debug!(bytes = frame.len(), "Frame drawn");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn config() -> LiveConfig {
        LiveConfig {
            debounce: Duration::from_millis(300),
            ..LiveConfig::default()
        }
    }

    #[test]
    fn test_file_source_reads_contents() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("machine.txt");
        fs::write(&path, "A->B").unwrap();

        let source = FileSource::new(&path);
        assert_eq!(source.contents().unwrap(), "A->B");
        assert_eq!(source.path(), path.as_path());
    }

    #[test]
    fn test_file_source_missing_file() {
        let dir = tempdir().unwrap();
        let source = FileSource::new(dir.path().join("missing.txt"));
        assert!(source.contents().is_err());
    }

    #[test]
    fn test_watcher_renders_initial_text() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("machine.txt");
        fs::write(&path, "Idle->Busy").unwrap();

        let watcher = Watcher::new(&path, RenderConfig::default(), config()).unwrap();
        assert!(watcher.frame().contains("Idle"));
        assert_eq!(watcher.diagram().pass_count(), 1);
    }

    #[test]
    fn test_watcher_waits_for_quiet_period() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("machine.txt");
        fs::write(&path, "A->B").unwrap();
        let mut watcher = Watcher::new(&path, RenderConfig::default(), config()).unwrap();

        fs::write(&path, "A->B\nB->Carol").unwrap();
        assert!(!watcher.check(Duration::from_millis(0)).unwrap());
        assert!(!watcher.check(Duration::from_millis(200)).unwrap());
        assert!(watcher.check(Duration::from_millis(300)).unwrap());
        assert!(watcher.frame().contains("Carol"));
    }

    #[test]
    fn test_watcher_survives_file_replacement() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("machine.txt");
        fs::write(&path, "A->B").unwrap();
        let mut watcher = Watcher::new(&path, RenderConfig::default(), config()).unwrap();

        fs::remove_file(&path).unwrap();
        assert!(!watcher.check(Duration::from_millis(0)).unwrap());
        assert!(!watcher.check(Duration::from_millis(500)).unwrap());

        let staged = dir.path().join("machine.txt.tmp");
        fs::write(&staged, "A->B\nB->Carol").unwrap();
        fs::rename(&staged, &path).unwrap();
        assert!(!watcher.check(Duration::from_millis(1000)).unwrap());
        assert!(watcher.check(Duration::from_millis(1300)).unwrap());
        assert!(watcher.frame().contains("Carol"));
    }

    #[test]
    fn test_watcher_needs_existing_file() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing.txt");
        assert!(Watcher::new(&missing, RenderConfig::default(), config()).is_err());
    }

    #[test]
    fn test_watcher_without_changes_never_redraws() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("machine.txt");
        fs::write(&path, "A->B").unwrap();
        let mut watcher = Watcher::new(&path, RenderConfig::default(), config()).unwrap();

        assert!(!watcher.check(Duration::from_secs(5)).unwrap());
        assert_eq!(watcher.diagram().pass_count(), 1);
    }
}
