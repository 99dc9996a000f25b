//! Logger setup: stderr always, plus an optional log file.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

/// Writes every record to both the console and a file.
pub struct Tee<A, B> {
    console: A,
    file: B,
}

impl<A: Write, B: Write> Tee<A, B> {
    pub fn new(console: A, file: B) -> Self {
        Self { console, file }
    }
}

impl<A: Write, B: Write> Write for Tee<A, B> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.console.write_all(buf)?;
        self.file.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.console.flush()?;
        self.file.flush()
    }
}

/// Create the log file, making any missing parent directories.
pub fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    File::create(path)
}

/// Install the global logger. Info by default, `RUST_LOG` overrides.
pub fn init(log_file: Option<&Path>) -> io::Result<()> {
    let mut builder = env_logger::Builder::from_default_env();
    builder
        .filter_level(log::LevelFilter::Info)
        .parse_default_env();

    if let Some(path) = log_file {
        let file = open_log_file(path)?;
        builder.target(env_logger::Target::Pipe(Box::new(Tee::new(io::stderr(), file))));
    }

    builder.init();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tee_writes_both_sides() {
        let mut tee = Tee::new(Vec::new(), Vec::new());
        write!(tee, "[INFO] rendering {} pixels", 12).unwrap();
        tee.flush().unwrap();

        assert_eq!(tee.console, b"[INFO] rendering 12 pixels");
        assert_eq!(tee.console, tee.file);
    }

    #[test]
    fn test_log_file_created_with_parents() {
        let dir = std::env::temp_dir().join(format!("lumen_logs_{}", std::process::id()));
        let path = dir.join("logs").join("log.txt");

        let file = open_log_file(&path).unwrap();
        let mut tee = Tee::new(io::sink(), file);
        writeln!(tee, "Starting Lumen").unwrap();
        tee.flush().unwrap();
        drop(tee);

        let text = fs::read_to_string(&path).unwrap();
        fs::remove_dir_all(&dir).ok();
        assert_eq!(text, "Starting Lumen\n");
    }
}
