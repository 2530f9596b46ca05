//! Polls a project file's mtime at a fixed cadence to detect changes (spec §4.9 "File-modify
//! polling races... are tolerated by retrying rather than treating as a change", §5 "the
//! hot-reload mtime poll also runs inline on the main loop").

use std::path::{Path, PathBuf};
use std::time::SystemTime;

pub struct ReloadWatcher {
    path: PathBuf,
    last_known_mtime: Option<SystemTime>,
}

impl ReloadWatcher {
    /// Starts watching `path`, latching its current mtime so the first [`poll_changed`] call
    /// doesn't immediately report a change.
    ///
    /// [`poll_changed`]: Self::poll_changed
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_owned();
        let last_known_mtime = mtime(&path);
        Self { path, last_known_mtime }
    }

    /// Returns `true` if the file's mtime has advanced since the last call. A transient read
    /// failure (e.g. a rename mid-write returning no metadata) is treated as "no change" rather
    /// than as a reload trigger; the next poll retries.
    pub fn poll_changed(&mut self) -> bool {
        let Some(current) = mtime(&self.path) else { return false };
        match self.last_known_mtime {
            Some(previous) if current <= previous => false,
            _ => {
                self.last_known_mtime = Some(current);
                true
            }
        }
    }
}

fn mtime(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|metadata| metadata.modified()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(contents: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("shaq_reload_test_{:p}.ini", contents.as_ptr()));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn unchanged_file_does_not_report_a_reload() {
        let path = write_temp("a");
        let mut watcher = ReloadWatcher::new(&path);
        assert!(!watcher.poll_changed());
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn missing_file_is_tolerated_as_no_change() {
        let mut watcher = ReloadWatcher::new("/no/such/project.ini");
        assert!(!watcher.poll_changed());
    }
}
