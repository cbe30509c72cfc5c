/// Common test utilities and fixtures
use std::collections::HashMap;
use std::path::PathBuf;
use tempfile::TempDir;

/// Write `contents` to a `vex.toml` in a fresh temporary directory
///
/// Keep the returned `TempDir` alive for as long as the path is used.
pub fn write_config(contents: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("vex.toml");
    std::fs::write(&path, contents).expect("write config");
    (dir, path)
}

/// Environment map from key/value pairs
pub fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

pub mod fixtures {
    pub const STORAGE_URL: &str = "https://abc.supabase.co";
    pub const SERVICE_KEY: &str = "service-role-key";
}
