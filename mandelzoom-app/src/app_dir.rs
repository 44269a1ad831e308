//! Preferences live beside the binary, so a copied build keeps its settings.

use std::path::PathBuf;

const PREFERENCES_FILE: &str = "mandelzoom_preferences.json";

/// Folder of the running executable, or the working directory when that
/// cannot be resolved.
pub fn exe_directory() -> PathBuf {
    match std::env::current_exe() {
        Ok(exe) => match exe.parent() {
            Some(dir) => dir.to_path_buf(),
            None => PathBuf::from("."),
        },
        Err(_) => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}

pub fn preferences_path() -> PathBuf {
    exe_directory().join(PREFERENCES_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preferences_sit_next_to_executable() {
        let path = preferences_path();
        assert_eq!(path.file_name().unwrap(), PREFERENCES_FILE);
        assert_eq!(path.parent().unwrap(), exe_directory());
    }
}
