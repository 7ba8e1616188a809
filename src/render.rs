//! Hand-off of decomposition components to an external renderer.
//!
//! The service does not draw charts. A renderer receives the four component
//! series of a decomposition plus a title and decides what to produce.
//! `JsonComponentWriter` is the renderer used by the binary: it writes the
//! series to `<dir>/<file_stem(title)>.json` for a plotting tool to pick up.

use crate::logging::{self, Stage};
use crate::model::DecompositionResult;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum RenderError {
    Io(std::io::Error),
    Serialize(serde_json::Error),
}

impl std::fmt::Display for RenderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderError::Io(e) => write!(f, "Render I/O error: {}", e),
            RenderError::Serialize(e) => write!(f, "Render serialization error: {}", e),
        }
    }
}

impl std::error::Error for RenderError {}

impl From<std::io::Error> for RenderError {
    fn from(e: std::io::Error) -> Self {
        RenderError::Io(e)
    }
}

impl From<serde_json::Error> for RenderError {
    fn from(e: serde_json::Error) -> Self {
        RenderError::Serialize(e)
    }
}

// ---------------------------------------------------------------------------
// Renderer seam
// ---------------------------------------------------------------------------

/// External collaborator that turns one decomposition into an artifact.
pub trait ComponentRenderer {
    fn render(&mut self, title: &str, result: &DecompositionResult) -> Result<(), RenderError>;
}

/// Artifact file stem for a title: every non-alphanumeric character becomes
/// `_`, the rest is lower-cased. "Hourly Analysis" -> "hourly_analysis".
pub fn file_stem(title: &str) -> String {
    title
        .chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect::<String>()
        .to_lowercase()
}

/// One named component, aligned with the decomposition index. Absent trend
/// and residual values serialize as `null`.
#[derive(Debug, Serialize)]
pub struct ComponentSeries<'a> {
    pub name: &'static str,
    pub timestamps: &'a [NaiveDateTime],
    pub values: Vec<Option<f64>>,
}

/// The four stacked panels a renderer draws, top to bottom.
pub fn components(result: &DecompositionResult) -> [ComponentSeries<'_>; 4] {
    let ts = result.timestamps.as_slice();
    [
        ComponentSeries {
            name: "observed",
            timestamps: ts,
            values: result.observed.iter().copied().map(Some).collect(),
        },
        ComponentSeries {
            name: "trend",
            timestamps: ts,
            values: result.trend.clone(),
        },
        ComponentSeries {
            name: "seasonal",
            timestamps: ts,
            values: result.seasonal.iter().copied().map(Some).collect(),
        },
        ComponentSeries {
            name: "residual",
            timestamps: ts,
            values: result.residual.clone(),
        },
    ]
}

#[derive(Serialize)]
struct ComponentDocument<'a> {
    title: &'a str,
    model: crate::model::DecompositionModel,
    period: usize,
    components: [ComponentSeries<'a>; 4],
}

// ---------------------------------------------------------------------------
// JSON writer
// ---------------------------------------------------------------------------

/// Writes each decomposition's components as a JSON document.
pub struct JsonComponentWriter {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl JsonComponentWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            written: Vec::new(),
        }
    }

    /// Path the document for `title` is written to.
    pub fn path_for(&self, title: &str) -> PathBuf {
        self.dir.join(format!("{}.json", file_stem(title)))
    }

    /// Files written so far, in render order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ComponentRenderer for JsonComponentWriter {
    fn render(&mut self, title: &str, result: &DecompositionResult) -> Result<(), RenderError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(title);

        let document = ComponentDocument {
            title,
            model: result.model,
            period: result.period,
            components: components(result),
        };
        let writer = BufWriter::new(File::create(&path)?);
        serde_json::to_writer_pretty(writer, &document)?;

        logging::debug(
            Stage::Render,
            Some(title),
            &format!("Wrote {} points to {}", result.len(), path.display()),
        );
        self.written.push(path);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
