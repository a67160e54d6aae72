use anyhow::Context;
use helpers::general::InputValueError;
use std::fmt::Debug;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Key under which the best lap time is persisted.
pub const BEST_TIME_KEY: &str = "bestTime";

/// BestTimeStore is the persistence collaborator for the best lap time. Implementations may fail,
/// the race treats every failure as "no best time" and keeps running.
pub trait BestTimeStore: Debug + Send {
    fn load(&self) -> anyhow::Result<Option<f64>>;
    fn save(&mut self, best_time: f64) -> anyhow::Result<()>;
}

/// FileStore keeps one text file per key inside a directory. The best time is stored as a decimal
/// number.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: &Path) -> FileStore {
        FileStore {
            dir: dir.to_owned(),
        }
    }

    pub fn get_filepath(&self) -> PathBuf {
        self.dir.join(BEST_TIME_KEY)
    }
}

impl BestTimeStore for FileStore {
    fn load(&self) -> anyhow::Result<Option<f64>> {
        let filepath = self.get_filepath();

        let content = match fs::read_to_string(&filepath) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).context(format!(
                    "Failed to read best time file {}!",
                    filepath.display()
                ))
            }
        };

        let best_time: f64 = content.trim().parse().context(format!(
            "Failed to parse best time {:?} in {}!",
            content.trim(),
            filepath.display()
        ))?;

        if !(best_time.is_finite() && best_time > 0.0) {
            return Err(InputValueError).context(format!(
                "Best time {} in {} is not a positive number!",
                best_time,
                filepath.display()
            ));
        }

        Ok(Some(best_time))
    }

    fn save(&mut self, best_time: f64) -> anyhow::Result<()> {
        fs::create_dir_all(&self.dir).context(format!(
            "Failed to create best time directory {}!",
            self.dir.display()
        ))?;

        let filepath = self.get_filepath();
        fs::write(&filepath, best_time.to_string()).context(format!(
            "Failed to write best time file {}!",
            filepath.display()
        ))
    }
}

/// MemoryStore keeps the best time in memory only (used for parallel headless runs).
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    best_time: Option<f64>,
}

impl MemoryStore {
    pub fn new(best_time: Option<f64>) -> MemoryStore {
        MemoryStore { best_time }
    }
}

impl BestTimeStore for MemoryStore {
    fn load(&self) -> anyhow::Result<Option<f64>> {
        Ok(self.best_time)
    }

    fn save(&mut self, best_time: f64) -> anyhow::Result<()> {
        self.best_time = Some(best_time);
        Ok(())
    }
}
