use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;

/// Plain-text copy of everything the runner prints.
///
/// A new file starts with a `YYYY-MM-DD hh:mm` stamp and an empty line; every
/// later entry is appended after the requested number of newlines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogMirror {
    path: PathBuf,
}

impl LogMirror {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn append(&self, text: &str, blank_lines: usize) -> io::Result<()> {
        let mut entry = String::new();
        if self.path.exists() {
            entry.push_str(&"\n".repeat(blank_lines));
        } else {
            if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            entry.push_str(&chrono::Local::now().format("%Y-%m-%d %I:%M").to_string());
            entry.push_str("\n\n");
        }
        entry.push_str(text);

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(entry.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_file_gets_a_timestamp_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/run.log");

        LogMirror::new(&path).append("first", 3).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let (stamp, rest) = content.split_once("\n\n").unwrap();
        assert!(chrono::NaiveDate::parse_from_str(&stamp[..10], "%Y-%m-%d").is_ok());
        assert_eq!(stamp.len(), "2024-01-01 01:01".len());
        assert_eq!(&stamp[13..14], ":");
        assert_eq!(rest, "first");
    }

    #[test]
    fn existing_file_is_appended_with_padding() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.log");
        fs::write(&path, "").unwrap();
        let mirror = LogMirror::new(&path);

        mirror.append("one", 1).unwrap();
        mirror.append("two", 0).unwrap();
        mirror.append("three", 2).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "\nonetwo\n\nthree");
    }
}
