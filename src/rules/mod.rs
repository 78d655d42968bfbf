//! Rule engine — independent, stateless checks over the symbol model.
//!
//! Each rule only reads `&HeaderFile` and appends to a
//! [`DiagnosticCollector`]; rules never mutate the model and are total
//! over it (input that would make a rule's logic undefined simply does
//! not match its trigger). Registration order is fixed and is the
//! tie-break for diagnostics at the same location.

mod methods;
mod ownership;
mod protocols;

use indexmap::{IndexMap, IndexSet};
use smol_str::SmolStr;

use crate::hir::{DiagnosticCollector, HeaderFile, Severity};

pub use methods::{DeprecatedCallSite, ImplicitNarrowIntegerParameter, UndeclaredImplementedMethod};
pub use ownership::{CopyOnMutableContainer, MissingOwnershipAttribute, OwnershipTypeMismatch};
pub use protocols::UnresolvedProtocolReference;

/// Rule identifiers, also used as diagnostic codes.
pub mod ids {
    pub const OWNERSHIP_TYPE_MISMATCH: &str = "ownership-type-mismatch";
    pub const COPY_ON_MUTABLE_CONTAINER: &str = "copy-on-mutable-container";
    pub const MISSING_OWNERSHIP_ATTRIBUTE: &str = "missing-ownership-attribute-on-object";
    pub const UNDECLARED_IMPLEMENTED_METHOD: &str = "undeclared-implemented-method";
    pub const DEPRECATED_CALL_SITE: &str = "deprecated-call-site";
    pub const UNRESOLVED_PROTOCOL_REFERENCE: &str = "unresolved-protocol-reference";
    pub const IMPLICIT_NARROW_INTEGER_PARAMETER: &str = "implicit-narrow-integer-parameter";
    /// Emitted by the pipeline for parser-skipped regions, not by a rule.
    pub const UNPARSED_REGION: &str = "unparsed-region";
}

/// Configuration consumed by the rule set.
///
/// Always passed in explicitly; nothing is read from global state or the
/// environment. The lists are insertion-ordered so that config files can
/// round-trip without reshuffling.
#[derive(Clone, Debug)]
pub struct AnalysisConfig {
    /// Type names denoting in-place-mutable collections, as distinct from
    /// their immutable counterparts.
    pub mutable_containers: IndexSet<SmolStr>,
    /// Symbols whose appearance in a method body is flagged.
    pub deprecated_symbols: IndexSet<SmolStr>,
    /// Legacy implicit-width integer type names, each mapped to the
    /// recommended fixed-width replacement.
    pub narrow_integer_types: IndexMap<SmolStr, SmolStr>,
    /// Severity for `missing-ownership-attribute-on-object`. The source
    /// material treats this inconsistently, so it stays configurable.
    pub missing_ownership_severity: Severity,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        let mutable_containers = [
            "NSMutableArray",
            "NSMutableDictionary",
            "NSMutableString",
            "NSMutableSet",
            "NSMutableData",
            "NSMutableAttributedString",
            "NSMutableIndexSet",
            "NSMutableOrderedSet",
            "NSMutableURLRequest",
        ]
        .into_iter()
        .map(SmolStr::new_static)
        .collect();

        let deprecated_symbols = [
            "UIAlertView",
            "UIActionSheet",
            "UIWebView",
            "UISearchDisplayController",
            "UILocalNotification",
            "NSURLConnection",
            "ALAssetsLibrary",
            "stringWithContentsOfFile",
            "stringWithContentsOfURL",
        ]
        .into_iter()
        .map(SmolStr::new_static)
        .collect();

        let narrow_integer_types = [
            ("int", "NSInteger"),
            ("unsigned", "NSUInteger"),
            ("unsigned int", "NSUInteger"),
            ("short", "int16_t"),
            ("unsigned short", "uint16_t"),
            ("char", "int8_t"),
            ("long", "NSInteger"),
            ("unsigned long", "NSUInteger"),
        ]
        .into_iter()
        .map(|(k, v)| (SmolStr::new_static(k), SmolStr::new_static(v)))
        .collect();

        Self {
            mutable_containers,
            deprecated_symbols,
            narrow_integer_types,
            missing_ownership_severity: Severity::Info,
        }
    }
}

/// A single analysis rule.
pub trait Rule: Send + Sync {
    /// Stable identifier, used as the diagnostic code.
    fn id(&self) -> &'static str;

    /// Inspect the model and append diagnostics.
    fn check(&self, model: &HeaderFile, config: &AnalysisConfig, out: &mut DiagnosticCollector);
}

/// The rule set, in registration order.
pub fn registry() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(OwnershipTypeMismatch),
        Box::new(CopyOnMutableContainer),
        Box::new(MissingOwnershipAttribute),
        Box::new(UndeclaredImplementedMethod),
        Box::new(DeprecatedCallSite),
        Box::new(UnresolvedProtocolReference),
        Box::new(ImplicitNarrowIntegerParameter),
    ]
}
