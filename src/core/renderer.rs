//! External diagram renderer

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Result of one renderer invocation. None of these abort a build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    Rendered,
    /// The renderer ran and exited non-zero
    Failed { status: Option<i32>, stderr: String },
    /// The executable could not be started
    NotFound,
}

/// Turns a diagram document into drawings
pub trait DiagramRenderer {
    fn render(&self, document: &Path) -> RenderOutcome;
}

/// `wireviz <document> --format s --output-dir <dir>`
#[derive(Debug, Clone)]
pub struct WireViz {
    pub program: String,
    pub output_dir: PathBuf,
}

impl WireViz {
    pub fn new(program: impl Into<String>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            output_dir: output_dir.into(),
        }
    }

    fn command(&self, document: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg(document)
            .args(["--format", "s", "--output-dir"])
            .arg(&self.output_dir);
        cmd
    }
}

impl DiagramRenderer for WireViz {
    fn render(&self, document: &Path) -> RenderOutcome {
        match self.command(document).output() {
            Ok(output) if output.status.success() => RenderOutcome::Rendered,
            Ok(output) => RenderOutcome::Failed {
                status: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            },
            Err(e) if e.kind() == ErrorKind::NotFound => RenderOutcome::NotFound,
            Err(e) => RenderOutcome::Failed {
                status: None,
                stderr: e.to_string(),
            },
        }
    }
}
