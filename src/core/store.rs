use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

/// Minimal key-value port behind the recency cache. Values are JSON
/// documents; reads never mutate.
pub trait KvStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), String>;
}

/// In-memory store, used by tests and as a fallback when no home directory
/// is available.
#[derive(Debug, Default)]
pub struct MemoryStore {
    map: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.map.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        self.map.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// File-backed store: one JSON object in `<ferry home>/recent.json`.
/// Concurrent sessions race read-then-write; last write wins, which is an
/// accepted outcome for recency data.
pub struct FileStore {
    file_path: PathBuf,
    map: HashMap<String, String>,
}

impl FileStore {
    pub fn open() -> Result<Self, String> {
        let dir = ferry_home()?;
        if !dir.exists() {
            fs::create_dir_all(&dir)
                .map_err(|e| format!("Failed to create {}: {}", dir.display(), e))?;
        }

        let file_path = dir.join("recent.json");
        let mut map = HashMap::new();

        if file_path.exists() {
            let content = fs::read_to_string(&file_path)
                .map_err(|e| format!("Failed to read recent store: {}", e))?;
            match serde_json::from_str::<HashMap<String, String>>(&content) {
                Ok(loaded) => map = loaded,
                Err(e) => {
                    // Corrupt store degrades to empty, it only holds recency hints.
                    log::warn!("Ignoring corrupt recent store {}: {}", file_path.display(), e);
                }
            }
        }

        Ok(Self { file_path, map })
    }

    fn save(&self) -> Result<(), String> {
        let json = serde_json::to_string_pretty(&self.map)
            .map_err(|e| format!("Failed to serialize recent store: {}", e))?;

        let temp_path = self.file_path.with_extension("tmp");
        fs::write(&temp_path, &json)
            .map_err(|e| format!("Failed to write recent store: {}", e))?;

        fs::rename(&temp_path, &self.file_path)
            .map_err(|e| format!("Failed to finalize recent store save: {}", e))?;

        Ok(())
    }
}

impl KvStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.map.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        self.map.insert(key.to_string(), value.to_string());
        self.save()
    }
}

/// `~/.ferry`, or `FERRY_HOME` (tilde-expanded) when set.
pub fn ferry_home() -> Result<PathBuf, String> {
    if let Ok(custom) = std::env::var("FERRY_HOME") {
        let expanded = shellexpand::tilde(&custom);
        return Ok(PathBuf::from(expanded.as_ref()));
    }

    let home = dirs::home_dir().ok_or_else(|| "No home directory found".to_string())?;
    Ok(home.join(".ferry"))
}
