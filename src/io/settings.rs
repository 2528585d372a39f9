use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Key the tuning offset is persisted under.
pub const TUNING_OFFSET_KEY: &str = "tuning_offset";

#[derive(Debug)]
pub enum SettingsError {
    Io(io::Error),
    Parse { key: String, value: String },
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::Io(err) => write!(f, "settings I/O error: {}", err),
            SettingsError::Parse { key, value } => {
                write!(f, "invalid value '{}' for setting '{}'", value, key)
            }
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SettingsError::Io(err) => Some(err),
            SettingsError::Parse { .. } => None,
        }
    }
}

impl From<io::Error> for SettingsError {
    fn from(err: io::Error) -> Self {
        SettingsError::Io(err)
    }
}

/// String key-value persistence for the few settings that outlive a session.
pub trait SettingsStore {
    fn load(&self, key: &str) -> Result<Option<String>, SettingsError>;
    fn store(&mut self, key: &str, value: &str) -> Result<(), SettingsError>;

    /// Read an integer setting stored as a plain decimal string.
    fn load_i32(&self, key: &str) -> Result<Option<i32>, SettingsError> {
        match self.load(key)? {
            None => Ok(None),
            Some(value) => value
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| SettingsError::Parse {
                    key: key.to_string(),
                    value,
                }),
        }
    }

    fn store_i32(&mut self, key: &str, value: i32) -> Result<(), SettingsError> {
        self.store(key, &value.to_string())
    }
}

/// Settings kept only for the lifetime of the process.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>, SettingsError> {
        Ok(self.values.get(key).cloned())
    }

    fn store(&mut self, key: &str, value: &str) -> Result<(), SettingsError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `<config dir>/fretsynth`, when the platform has a config dir.
    pub fn default_location() -> Option<Self> {
        dirs::config_dir().map(|dir| Self::new(dir.join("fretsynth")))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

impl SettingsStore for FileStore {
    fn load(&self, key: &str) -> Result<Option<String>, SettingsError> {
        match fs::read_to_string(self.path(key)) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn store(&mut self, key: &str, value: &str) -> Result<(), SettingsError> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path(key), value)?;
        log::debug!(target: "fretsynth::settings", "stored {} = {}", key, value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trips_integers() {
        let mut store = MemoryStore::new();
        assert_eq!(store.load_i32(TUNING_OFFSET_KEY).unwrap(), None);

        store.store_i32(TUNING_OFFSET_KEY, -3).unwrap();
        assert_eq!(store.load(TUNING_OFFSET_KEY).unwrap().as_deref(), Some("-3"));
        assert_eq!(store.load_i32(TUNING_OFFSET_KEY).unwrap(), Some(-3));
    }

    #[test]
    fn garbage_is_a_parse_error() {
        let mut store = MemoryStore::new();
        store.store(TUNING_OFFSET_KEY, "drop d").unwrap();

        match store.load_i32(TUNING_OFFSET_KEY) {
            Err(SettingsError::Parse { key, value }) => {
                assert_eq!(key, TUNING_OFFSET_KEY);
                assert_eq!(value, "drop d");
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn file_store_writes_one_file_per_key() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path().join("nested"));

        assert_eq!(store.load(TUNING_OFFSET_KEY).unwrap(), None);
        store.store_i32(TUNING_OFFSET_KEY, 4).unwrap();

        let raw = fs::read_to_string(dir.path().join("nested").join(TUNING_OFFSET_KEY)).unwrap();
        assert_eq!(raw, "4");

        let reopened = FileStore::new(dir.path().join("nested"));
        assert_eq!(reopened.load_i32(TUNING_OFFSET_KEY).unwrap(), Some(4));
    }

    #[test]
    fn file_store_tolerates_trailing_newline() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(TUNING_OFFSET_KEY), "-2\n").unwrap();

        let store = FileStore::new(dir.path());
        assert_eq!(store.load_i32(TUNING_OFFSET_KEY).unwrap(), Some(-2));
    }
}
