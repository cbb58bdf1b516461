//! Input collaborator seam.
//!
//! The tracker never talks to the source site itself. Whatever retrieves the
//! page and pulls out its data blob hands the result to the core through
//! [`DocumentSource`]; the bundled implementations read an already-extracted
//! JSON document from a file or stdin.

use anyhow::{Context, Result, bail};
use serde_json::Value;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

/// Something that can produce the parsed page document for one run.
///
/// Errors propagate unchanged and abort the run before any file is written.
pub trait DocumentSource {
    fn fetch_document(&self) -> Result<Value>;

    /// Short label for logs.
    fn describe(&self) -> String;
}

#[derive(Clone, Debug)]
/// Where to read the page document from.
pub enum InputSource {
    File(PathBuf),
    Stdin,
}

impl InputSource {
    /// `-` selects stdin; anything else is a path.
    pub fn from_arg(raw: &str) -> Self {
        if raw == "-" {
            InputSource::Stdin
        } else {
            InputSource::File(PathBuf::from(raw))
        }
    }

    fn read(&self) -> Result<Vec<u8>> {
        match self {
            InputSource::File(path) => {
                if !path.is_file() {
                    bail!("input file not found: {}", path.display());
                }
                fs::read(path).with_context(|| format!("reading {}", path.display()))
            }
            InputSource::Stdin => {
                let mut buf = Vec::new();
                io::stdin()
                    .read_to_end(&mut buf)
                    .context("reading stdin")?;
                Ok(buf)
            }
        }
    }
}

impl DocumentSource for InputSource {
    fn fetch_document(&self) -> Result<Value> {
        let bytes = self.read()?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            bail!("{} is empty", self.describe());
        }
        serde_json::from_slice(&bytes)
            .with_context(|| format!("parsing page document from {}", self.describe()))
    }

    fn describe(&self) -> String {
        match self {
            InputSource::File(path) => path.display().to_string(),
            InputSource::Stdin => "stdin".to_string(),
        }
    }
}

impl DocumentSource for Value {
    fn fetch_document(&self) -> Result<Value> {
        Ok(self.clone())
    }

    fn describe(&self) -> String {
        "in-memory document".to_string()
    }
}
