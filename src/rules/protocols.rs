//! Protocol reference rules.

use crate::hir::{Diagnostic, DiagnosticCollector, HeaderFile, ProtocolRef};

use super::{AnalysisConfig, Rule, ids};

/// A protocol name used in an adoption list or property type with no
/// matching forward declaration or protocol definition in the file.
pub struct UnresolvedProtocolReference;

impl UnresolvedProtocolReference {
    fn report(&self, model: &HeaderFile, reference: &ProtocolRef, out: &mut DiagnosticCollector) {
        if reference.resolved {
            return;
        }
        out.add(
            Diagnostic::warning(
                model.file,
                reference.loc,
                format!(
                    "protocol '{}' is referenced but never declared in this file",
                    reference.name
                ),
            )
            .with_code(self.id()),
        );
    }
}

impl Rule for UnresolvedProtocolReference {
    fn id(&self) -> &'static str {
        ids::UNRESOLVED_PROTOCOL_REFERENCE
    }

    fn check(&self, model: &HeaderFile, _config: &AnalysisConfig, out: &mut DiagnosticCollector) {
        for iface in &model.interfaces {
            for adopted in &iface.adopts {
                self.report(model, adopted, out);
            }
        }
        for proto in &model.protocols {
            for adopted in &proto.adopts {
                self.report(model, adopted, out);
            }
        }
        for prop in model.properties() {
            for qualifier in prop.ty.protocols() {
                self.report(model, qualifier, out);
            }
        }
    }
}
