//! Source parsing, selected by file extension.

pub mod doxygen;
pub mod merge;

use crate::model::Document;
use anyhow::{anyhow, Result};
use std::path::Path;

/// File extensions recognized as documented sources.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["h", "hpp", "c", "dox"];

/// Parse a source file into a Document based on its extension.
pub fn parse_file(path: &Path, content: &str, defines: &[String]) -> Result<Document> {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if SUPPORTED_EXTENSIONS.contains(&ext) => Ok(doxygen::parse(
            content,
            &path.to_string_lossy(),
            defines,
        )),
        _ => Err(anyhow!("unsupported file type: {}", path.display())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_is_parsed() {
        let doc = parse_file(Path::new("a.h"), "/** @brief X. */\nvoid x(void);\n", &[]).unwrap();
        assert_eq!(doc.functions.len(), 1);
        assert_eq!(doc.file.path, "a.h");
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = parse_file(Path::new("notes.txt"), "", &[]).unwrap_err();
        assert!(err.to_string().contains("unsupported file type"));
    }
}
