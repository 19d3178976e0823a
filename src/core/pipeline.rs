//! Build pipeline
//!
//! One `Pipeline` per process. Connector images are scanned once; every
//! operation reloads the tables so results always reflect the current
//! database.

use miette::Diagnostic;
use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::bom::build_bom;
use crate::core::config::{Config, Outputs};
use crate::core::diagnostics::{codes, Diagnostics};
use crate::core::labels::{cable_labels, wire_labels, LabelList};
use crate::core::reconcile::{reconcile, Reconciled, Selection};
use crate::core::renderer::{DiagramRenderer, RenderOutcome};
use crate::core::store::{SqliteStore, StoreError};
use crate::entities::{BomLine, Tables};
use crate::export::{misc, xlsx, ExportError};
use crate::yaml::write_document;

pub const BOM_FILE: &str = "BOM.xlsx";
pub const CABLE_LABELS_FILE: &str = "CableLabels.xlsx";
pub const WIRE_LABELS_FILE: &str = "WireLabels.xlsx";
pub const DOCUMENT_EXTENSION: &str = "yaml";

#[derive(Debug, Error, Diagnostic)]
pub enum PipelineError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Export(#[from] ExportError),
}

/// Everything a drawings run produced
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DrawingSummary {
    pub documents: Vec<PathBuf>,
    pub rendered: Vec<String>,
    pub failed: Vec<String>,
    pub skipped: Vec<String>,
}

/// Collect the file names of all `*.png` images in `dir`. A missing
/// directory yields an empty set.
pub fn scan_images(dir: &Path) -> BTreeSet<String> {
    let Ok(entries) = fs::read_dir(dir) else {
        return BTreeSet::new();
    };
    entries
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_file())
        .filter_map(|e| e.file_name().into_string().ok())
        .filter(|name| name.ends_with(".png"))
        .collect()
}

pub struct Pipeline<'a> {
    config: &'a Config,
    store: SqliteStore,
    images: BTreeSet<String>,
}

impl<'a> Pipeline<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            store: SqliteStore::new(&config.db_path),
            images: scan_images(&config.resources_path),
        }
    }

    pub fn config(&self) -> &Config {
        self.config
    }

    pub fn store(&self) -> &SqliteStore {
        &self.store
    }

    pub fn images(&self) -> &BTreeSet<String> {
        &self.images
    }

    /// All tables, nets and cable catalog restricted to `filters`
    pub fn tables_for(&self, filters: &[String]) -> Result<Tables, StoreError> {
        Ok(self.store.load_tables(None)?.restrict_to_cables(filters))
    }

    /// Computed BOM plus misc items for the given cables
    pub fn bom(&self, filters: &[String], diags: &mut Diagnostics) -> Result<Vec<BomLine>, PipelineError> {
        let tables = self.tables_for(filters)?;
        let extra = misc::read_misc_bom(&self.config.misc_bom_path, diags)?;
        Ok(build_bom(&tables, extra, diags))
    }

    /// Cable/connector labels and wire labels for the given cables
    pub fn labels(&self, filters: &[String]) -> Result<(LabelList, LabelList), StoreError> {
        let tables = self.tables_for(filters)?;
        Ok((cable_labels(&tables.nets), wire_labels(&tables.nets)))
    }

    /// Write the BOM and label workbooks into the attachments directory
    pub fn write_attachments(
        &self,
        filters: &[String],
        outputs: Outputs,
        diags: &mut Diagnostics,
    ) -> Result<Vec<PathBuf>, PipelineError> {
        let dir = &self.config.attachments_path;
        let mut written = Vec::new();

        if outputs.bom {
            let lines = self.bom(filters, diags)?;
            let path = dir.join(BOM_FILE);
            if lines.is_empty() {
                diags.warn(codes::EMPTY_OUTPUT, path.display().to_string(), "BOM is empty, not written");
            } else {
                xlsx::write_bom(&path, &lines)?;
                written.push(path);
            }
        }

        if outputs.labels {
            let (cables, wires) = self.labels(filters)?;
            for (list, file, sheet) in [
                (&cables, CABLE_LABELS_FILE, xlsx::CABLE_LABELS_SHEET_NAME),
                (&wires, WIRE_LABELS_FILE, xlsx::WIRE_LABELS_SHEET_NAME),
            ] {
                let path = dir.join(file);
                if list.is_empty() {
                    diags.warn(codes::EMPTY_OUTPUT, path.display().to_string(), "no labels, not written");
                    continue;
                }
                xlsx::write_labels(&path, sheet, list)?;
                written.push(path);
            }
        }

        Ok(written)
    }

    /// Reconcile one cable. `None` when the cable has no net rows.
    pub fn reconcile_cable(&self, cable: &str, diags: &mut Diagnostics) -> Result<Option<Reconciled>, StoreError> {
        let tables = self.store.load_tables(Some(cable))?;
        if tables.nets.is_empty() {
            diags.info(codes::CABLE_HAS_NO_NETS, cable, "no net rows, skipped");
            return Ok(None);
        }
        Ok(Some(reconcile(&tables, &Selection::cable(cable), &self.images, diags)))
    }

    /// Path of the diagram document for one cable
    pub fn document_path(&self, cable: &str) -> PathBuf {
        self.config
            .output_path
            .join(format!("{}.{}", cable, DOCUMENT_EXTENSION))
    }

    /// Write one diagram document per cable and hand each to the renderer.
    ///
    /// Cables without nets are skipped. A renderer failure is recorded and
    /// the loop continues; a missing renderer stops further invocations but
    /// documents are still written.
    pub fn write_drawings(
        &self,
        filters: &[String],
        renderer: &dyn DiagramRenderer,
        diags: &mut Diagnostics,
    ) -> Result<DrawingSummary, PipelineError> {
        let present: HashSet<String> = self.store.cables_with_nets()?.into_iter().collect();
        let mut summary = DrawingSummary::default();
        let mut renderer_available = true;

        for cable in filters {
            if !present.contains(cable) {
                diags.info(codes::CABLE_HAS_NO_NETS, cable.as_str(), "no net rows, skipped");
                summary.skipped.push(cable.clone());
                continue;
            }

            let Some(reconciled) = self.reconcile_cable(cable, diags)? else {
                summary.skipped.push(cable.clone());
                continue;
            };

            let path = self.document_path(cable);
            write_document(&path, &reconciled)?;
            summary.documents.push(path.clone());

            if !renderer_available {
                continue;
            }
            match renderer.render(&path) {
                RenderOutcome::Rendered => summary.rendered.push(cable.clone()),
                RenderOutcome::Failed { status, stderr } => {
                    let status = status.map_or_else(|| "signal".to_string(), |c| c.to_string());
                    diags.warn(
                        codes::RENDERER_FAILED,
                        cable.as_str(),
                        format!("renderer exited with {}: {}", status, stderr),
                    );
                    summary.failed.push(cable.clone());
                }
                RenderOutcome::NotFound => {
                    diags.warn(
                        codes::RENDERER_NOT_FOUND,
                        self.config.renderer.as_str(),
                        "renderer not found, skipping diagram generation",
                    );
                    renderer_available = false;
                }
            }
        }

        Ok(summary)
    }
}
