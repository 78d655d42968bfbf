//! Analysis pipeline — parse, lower, run rules, finalize.
//!
//! Single-file analysis is a straight synchronous pipeline with no I/O
//! and no suspension points. Batch analysis over a [`FileStore`] runs one
//! independent pipeline per file in parallel; the per-file models share
//! nothing, so no locking is involved and one file's failure never
//! affects its siblings.

use rayon::prelude::*;
use tracing::debug;

use crate::base::FileId;
use crate::hir::{Diagnostic, DiagnosticCollector, FileStore, ModelError, lower};
use crate::report;
use crate::rules::{AnalysisConfig, ids, registry};
use crate::syntax::parse_source;

/// Analyze one file's text and return its finalized diagnostics.
///
/// The only failure mode is a [`ModelError`] (structurally impossible
/// input); syntax problems degrade into `unparsed-region` warnings and
/// analysis of the rest of the file continues.
pub fn analyze_source(
    file: FileId,
    text: &str,
    config: &AnalysisConfig,
) -> Result<Vec<Diagnostic>, ModelError> {
    let tree = parse_source(file, text);
    let model = lower(file, &tree)?;
    debug!(
        %file,
        interfaces = model.interfaces.len(),
        protocols = model.protocols.len(),
        unparsed = model.unparsed.len(),
        "model built"
    );

    let mut collector = DiagnosticCollector::new();

    for region in &model.unparsed {
        collector.add(
            Diagnostic::warning(
                file,
                region.loc,
                format!(
                    "unparsed declaration: expected {}, found {}",
                    region.expected, region.found
                ),
            )
            .with_code(ids::UNPARSED_REGION),
        );
    }

    for rule in registry() {
        rule.check(&model, config, &mut collector);
    }

    let diagnostics = report::finalize(collector.take());
    debug!(%file, count = diagnostics.len(), "analysis finished");
    Ok(diagnostics)
}

/// The result of analyzing one file in a batch.
#[derive(Clone, Debug)]
pub struct FileOutcome {
    pub file: FileId,
    pub result: Result<Vec<Diagnostic>, ModelError>,
}

/// Analyze every file in the store, in parallel.
///
/// Outcomes come back in the store's registration order regardless of
/// which file finished first, so batch output is deterministic.
pub fn analyze_store(store: &FileStore, config: &AnalysisConfig) -> Vec<FileOutcome> {
    store
        .files()
        .into_par_iter()
        .map(|file| {
            let result = match store.contents(file) {
                Some(text) => analyze_source(file, &text, config),
                None => Ok(Vec::new()),
            };
            FileOutcome { file, result }
        })
        .collect()
}
