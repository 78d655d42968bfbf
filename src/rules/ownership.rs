//! Ownership attribute rules.

use crate::hir::{DeclaredType, Diagnostic, DiagnosticCollector, HeaderFile, Ownership};

use super::{AnalysisConfig, Rule, ids};

/// A non-owning attribute (`assign`, `unsafe_unretained`, `weak`) on a
/// property that holds an object reference. Under manual reference
/// counting this is the classic dangling-pointer seed.
pub struct OwnershipTypeMismatch;

impl Rule for OwnershipTypeMismatch {
    fn id(&self) -> &'static str {
        ids::OWNERSHIP_TYPE_MISMATCH
    }

    fn check(&self, model: &HeaderFile, _config: &AnalysisConfig, out: &mut DiagnosticCollector) {
        for prop in model.properties() {
            let Some(attr) = &prop.ownership else {
                continue;
            };
            if attr.kind.is_nonowning() && prop.ty.is_object() {
                out.add(
                    Diagnostic::warning(
                        model.file,
                        prop.loc,
                        format!(
                            "property '{}' uses '{}' ownership with object type '{}'",
                            prop.name,
                            attr.spelling,
                            prop.ty.display_name()
                        ),
                    )
                    .with_code(self.id()),
                );
            }
        }
    }
}

/// `copy` on a mutable container type: the stored copy is immutable, so
/// later in-place mutation of the property traps at runtime.
pub struct CopyOnMutableContainer;

impl Rule for CopyOnMutableContainer {
    fn id(&self) -> &'static str {
        ids::COPY_ON_MUTABLE_CONTAINER
    }

    fn check(&self, model: &HeaderFile, config: &AnalysisConfig, out: &mut DiagnosticCollector) {
        for prop in model.properties() {
            let Some(attr) = &prop.ownership else {
                continue;
            };
            if attr.kind != Ownership::Copy {
                continue;
            }
            let DeclaredType::ObjectPointer { name, .. } = &prop.ty else {
                continue;
            };
            if config.mutable_containers.contains(name) {
                out.add(
                    Diagnostic::warning(
                        model.file,
                        prop.loc,
                        format!(
                            "property '{}' copies mutable container '{}'; the stored copy will be immutable",
                            prop.name, name
                        ),
                    )
                    .with_code(self.id()),
                );
            }
        }
    }
}

/// An object-typed property with no explicit ownership attribute, relying
/// on the language default. Severity is configurable.
pub struct MissingOwnershipAttribute;

impl Rule for MissingOwnershipAttribute {
    fn id(&self) -> &'static str {
        ids::MISSING_OWNERSHIP_ATTRIBUTE
    }

    fn check(&self, model: &HeaderFile, config: &AnalysisConfig, out: &mut DiagnosticCollector) {
        for prop in model.properties() {
            if prop.ownership.is_none() && prop.ty.is_object() {
                out.add(
                    Diagnostic::new(
                        config.missing_ownership_severity,
                        model.file,
                        prop.loc,
                        format!(
                            "object-typed property '{}' has no explicit ownership attribute",
                            prop.name
                        ),
                    )
                    .with_code(self.id()),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::FileId;
    use crate::hir::{Severity, lower};
    use crate::syntax::parse_source;

    fn check_with(rule: &dyn Rule, text: &str, config: &AnalysisConfig) -> Vec<Diagnostic> {
        let tree = parse_source(FileId::new(0), text);
        let model = lower(FileId::new(0), &tree).unwrap();
        let mut out = DiagnosticCollector::new();
        rule.check(&model, config, &mut out);
        out.take()
    }

    fn check(rule: &dyn Rule, text: &str) -> Vec<Diagnostic> {
        check_with(rule, text, &AnalysisConfig::default())
    }

    #[test]
    fn test_assign_on_object_pointer_fires_once() {
        let diags = check(
            &OwnershipTypeMismatch,
            "@interface T\n@property (nonatomic, assign) NSString *s;\n@end",
        );
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].start_line, 1);
        assert!(diags[0].message.contains("'assign'"));
        assert!(diags[0].message.contains("NSString *"));
    }

    #[test]
    fn test_assign_on_dynamic_object_fires() {
        let diags = check(
            &OwnershipTypeMismatch,
            "@interface T\n@property (nonatomic, assign) id scene;\n@end",
        );
        assert_eq!(diags.len(), 1);
    }

    #[test]
    fn test_weak_on_object_fires() {
        let diags = check(
            &OwnershipTypeMismatch,
            "@interface T\n@property (weak) UIView *v;\n@end",
        );
        assert_eq!(diags.len(), 1);
        assert!(diags[0].message.contains("'weak'"));
    }

    #[test]
    fn test_assign_on_primitive_is_fine() {
        let diags = check(
            &OwnershipTypeMismatch,
            "@interface T\n@property (assign) int count;\n@property (assign) CGRect frame;\n@end",
        );
        assert!(diags.is_empty());
    }

    #[test]
    fn test_retain_on_object_is_not_a_mismatch() {
        let diags = check(
            &OwnershipTypeMismatch,
            "@interface T\n@property (retain) NSString *s;\n@end",
        );
        assert!(diags.is_empty());
    }

    #[test]
    fn test_copy_on_mutable_array_fires_once() {
        let diags = check(
            &CopyOnMutableContainer,
            "@interface T\n@property (nonatomic, copy) NSMutableArray *items;\n@end",
        );
        assert_eq!(diags.len(), 1);
        assert!(diags[0].message.contains("NSMutableArray"));
    }

    #[test]
    fn test_copy_on_immutable_array_is_fine() {
        let diags = check(
            &CopyOnMutableContainer,
            "@interface T\n@property (copy) NSArray *items;\n@end",
        );
        assert!(diags.is_empty());
    }

    #[test]
    fn test_copy_rule_respects_configured_containers() {
        let mut config = AnalysisConfig::default();
        config.mutable_containers.insert("MYMutableThing".into());
        let diags = check_with(
            &CopyOnMutableContainer,
            "@interface T\n@property (copy) MYMutableThing *thing;\n@end",
            &config,
        );
        assert_eq!(diags.len(), 1);
    }

    #[test]
    fn test_missing_ownership_on_object() {
        let diags = check(
            &MissingOwnershipAttribute,
            "@interface T\n@property NSArray *legacyArray;\n@property id<P> src;\n@end",
        );
        assert_eq!(diags.len(), 2);
        assert_eq!(diags[0].severity, Severity::Info);
    }

    #[test]
    fn test_missing_ownership_ignores_primitives_and_attributed() {
        let diags = check(
            &MissingOwnershipAttribute,
            "@interface T\n@property BOOL flag;\n@property (strong) NSArray *a;\n@end",
        );
        assert!(diags.is_empty());
    }

    #[test]
    fn test_missing_ownership_severity_configurable() {
        let config = AnalysisConfig {
            missing_ownership_severity: Severity::Warning,
            ..Default::default()
        };
        let diags = check_with(
            &MissingOwnershipAttribute,
            "@interface T\n@property NSArray *a;\n@end",
            &config,
        );
        assert_eq!(diags[0].severity, Severity::Warning);
    }
}
