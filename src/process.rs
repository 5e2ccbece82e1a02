//! Turning a file on disk into the text that goes into the output document

use std::fs;
use std::path::Path;

use tracing::{debug, trace};

use crate::config::{OutputSettings, PackConfig};

/// How many leading bytes are checked for NUL when sniffing binary content.
const BINARY_SNIFF_LEN: usize = 8 * 1024;

/// Produces the packable text for one file.
///
/// `None` means the file is left out of the output document. It is never an error.
pub trait ContentProcessor: Send + Sync {
    fn process(&self, path: &Path, config: &PackConfig) -> Option<String>;
}

/// Reads the file from disk and applies the configured output transforms.
///
/// Unreadable, binary and non-UTF-8 files are skipped, as are files that are
/// empty once processed.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileContentProcessor;

impl ContentProcessor for FileContentProcessor {
    fn process(&self, path: &Path, config: &PackConfig) -> Option<String> {
        let bytes = match fs::read(path) {
            Ok(b) => b,
            Err(err) => {
                debug!(path = %path.display(), error = %err, "skipping unreadable file");
                return None;
            }
        };
        if is_binary(&bytes) {
            trace!(path = %path.display(), "skipping binary file");
            return None;
        }
        let Ok(text) = String::from_utf8(bytes) else {
            debug!(path = %path.display(), "skipping non-UTF-8 file");
            return None;
        };

        let content = transform_content(&text, &config.output);
        if content.is_empty() { None } else { Some(content) }
    }
}

/// A NUL byte near the start of the file marks it as binary.
pub fn is_binary(bytes: &[u8]) -> bool {
    let len = bytes.len().min(BINARY_SNIFF_LEN);
    bytes[..len].contains(&0)
}

/// Normalize line endings, apply the output settings, then trim.
pub fn transform_content(text: &str, settings: &OutputSettings) -> String {
    let mut content = text.replace("\r\n", "\n");

    if settings.remove_empty_lines {
        content = content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .collect::<Vec<_>>()
            .join("\n");
    }

    let content = content.trim();

    if settings.show_line_numbers {
        add_line_numbers(content)
    } else {
        content.to_string()
    }
}

/// Prefix each line with its 1-based number, right-aligned to the widest.
fn add_line_numbers(content: &str) -> String {
    if content.is_empty() {
        return String::new();
    }
    let lines: Vec<&str> = content.split('\n').collect();
    let width = lines.len().to_string().len();
    lines
        .iter()
        .enumerate()
        .map(|(i, line)| format!("{:>width$}: {line}", i + 1))
        .collect::<Vec<_>>()
        .join("\n")
}
