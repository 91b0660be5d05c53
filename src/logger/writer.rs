//! File sink for the logger

use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use super::{FileConfig, LoggerError};

/// Opens the configured log file, creating parent directories as needed.
///
/// `Mutex<File>` implements `MakeWriter`, so the result plugs straight into
/// a `fmt` layer.
pub(crate) fn open_log_file(config: &FileConfig) -> Result<Mutex<File>, LoggerError> {
    if let Some(parent) = config.path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }

    let file = open(&config.path, config.append)?;
    Ok(Mutex::new(file))
}

fn open(path: &Path, append: bool) -> std::io::Result<File> {
    let mut options = OpenOptions::new();
    options.create(true);
    if append {
        options.append(true);
    } else {
        options.write(true).truncate(true);
    }
    options.open(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::LogFormat;
    use std::io::Write;
    use tempfile::TempDir;

    fn file_config(dir: &TempDir, append: bool) -> FileConfig {
        FileConfig {
            enabled: true,
            path: dir.path().join("nested/dir/app.log"),
            append,
            format: LogFormat::Json,
        }
    }

    #[test]
    fn test_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let config = file_config(&dir, true);
        let writer = open_log_file(&config).unwrap();
        writeln!(writer.lock().unwrap(), "hello").unwrap();
        assert!(config.path.exists());
    }

    #[test]
    fn test_append_and_truncate() {
        let dir = TempDir::new().unwrap();
        let config = file_config(&dir, true);

        for line in ["first", "second"] {
            let writer = open_log_file(&config).unwrap();
            writeln!(writer.lock().unwrap(), "{line}").unwrap();
        }
        let content = std::fs::read_to_string(&config.path).unwrap();
        assert_eq!(content, "first\nsecond\n");

        let truncating = file_config(&dir, false);
        let writer = open_log_file(&truncating).unwrap();
        writeln!(writer.lock().unwrap(), "third").unwrap();
        drop(writer);
        let content = std::fs::read_to_string(&config.path).unwrap();
        assert_eq!(content, "third\n");
    }
}
