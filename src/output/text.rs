//! Plain-text output document

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::error::{PackError, Result};

use super::{OutputContext, OutputWriter};

const SECTION_RULE: &str = "================================================================";
const FILE_RULE: &str = "================";

/// Writes the document to `output.filePath`, resolved against the root directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextOutputWriter;

impl OutputWriter for TextOutputWriter {
    fn write(&self, ctx: &OutputContext<'_>) -> Result<()> {
        let path = ctx.root_dir.join(Path::new(&ctx.config.output.file_path));
        let document = render_document(ctx, Utc::now());

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| PackError::Output {
                path: path.clone(),
                source,
            })?;
        }
        fs::write(&path, document).map_err(|source| PackError::Output {
            path: path.clone(),
            source,
        })?;

        debug!(path = %path.display(), files = ctx.files.len(), "wrote output document");
        Ok(())
    }
}

/// Render the full document. The timestamp is a parameter so output is reproducible.
pub fn render_document(ctx: &OutputContext<'_>, generated_at: DateTime<Utc>) -> String {
    let mut doc = String::new();

    // writeln! into a String cannot fail
    let _ = writeln!(
        doc,
        "This file is a merged representation of the entire codebase, combining all repository files into a single document."
    );
    let _ = writeln!(
        doc,
        "Generated by repopack on: {}",
        generated_at.format("%Y-%m-%dT%H:%M:%SZ")
    );
    doc.push('\n');

    section(&mut doc, "File Summary");
    doc.push_str(
        "Purpose:\n\
         --------\n\
         This file contains a packed representation of the entire repository's contents.\n\
         It is designed to be easily consumable by AI systems for analysis, code review,\n\
         or other automated processes.\n\
         \n\
         File Format:\n\
         ------------\n\
         The content is organized as follows:\n\
         1. This summary section\n\
         2. Repository structure\n\
         3. Repository files, each consisting of:\n\
         \x20 a. A separator line (================)\n\
         \x20 b. The file path (File: path/to/file)\n\
         \x20 c. Another separator line\n\
         \x20 d. The full contents of the file\n\
         \x20 e. A blank line\n\
         \n\
         Notes:\n\
         ------\n\
         - Some files may have been excluded based on .gitignore rules and repopack's configuration.\n\
         - Binary files are not included in this packed representation.\n",
    );

    if let Some(header) = ctx.config.output.header_text.as_deref() {
        doc.push_str("\nAdditional Info:\n----------------\nUser Provided Header:\n");
        doc.push_str(header.trim());
        doc.push('\n');
    }
    doc.push('\n');

    section(&mut doc, "Repository Structure");
    doc.push_str(&ctx.tree_string());
    doc.push_str("\n\n");

    section(&mut doc, "Repository Files");
    for file in ctx.files {
        let _ = write!(
            doc,
            "{FILE_RULE}\nFile: {}\n{FILE_RULE}\n{}\n\n",
            file.path, file.content
        );
    }

    doc
}

fn section(doc: &mut String, title: &str) {
    let _ = write!(doc, "{SECTION_RULE}\n{title}\n{SECTION_RULE}\n");
}
