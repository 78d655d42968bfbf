//! Method declaration and implementation rules.

use std::sync::Arc;

use crate::hir::{
    DeclaredType, Diagnostic, DiagnosticCollector, HeaderFile, InterfaceDecl, RelatedInfo,
};

use super::{AnalysisConfig, Rule, ids};

/// A method defined in an `@implementation` region with no matching
/// signature in any associated interface declaration. Diagnosed at the
/// method's own location, not the interface's.
pub struct UndeclaredImplementedMethod;

impl Rule for UndeclaredImplementedMethod {
    fn id(&self) -> &'static str {
        ids::UNDECLARED_IMPLEMENTED_METHOD
    }

    fn check(&self, model: &HeaderFile, _config: &AnalysisConfig, out: &mut DiagnosticCollector) {
        for imp in &model.implementations {
            let primary = primary_interface(model, &imp.name);
            for method in &imp.methods {
                if method.declared {
                    continue;
                }
                let sign = if method.is_class_method { '+' } else { '-' };
                let mut diag = Diagnostic::warning(
                    model.file,
                    method.loc,
                    format!(
                        "'{}{}' is implemented by '{}' but not declared in any matching interface",
                        sign, method.selector, imp.name
                    ),
                )
                .with_code(self.id());
                if let Some(iface) = primary {
                    diag = diag.with_related(RelatedInfo {
                        file: model.file,
                        line: iface.loc.line,
                        col: iface.loc.col,
                        message: Arc::from(format!("interface '{}' declared here", iface.name)),
                    });
                }
                out.add(diag);
            }
        }
    }
}

fn primary_interface<'m>(model: &'m HeaderFile, name: &str) -> Option<&'m InterfaceDecl> {
    model
        .interfaces
        .iter()
        .find(|i| i.name == name && i.category.is_none())
        .or_else(|| model.interfaces.iter().find(|i| i.name == name))
}

/// A method body referencing a symbol from the configured deprecated-API
/// list. Diagnosed at the referencing line.
pub struct DeprecatedCallSite;

impl Rule for DeprecatedCallSite {
    fn id(&self) -> &'static str {
        ids::DEPRECATED_CALL_SITE
    }

    fn check(&self, model: &HeaderFile, config: &AnalysisConfig, out: &mut DiagnosticCollector) {
        for imp in &model.implementations {
            for method in &imp.methods {
                for sym in &method.body_refs {
                    if config.deprecated_symbols.contains(&sym.name) {
                        out.add(
                            Diagnostic::warning(
                                model.file,
                                sym.loc,
                                format!("reference to deprecated API '{}'", sym.name),
                            )
                            .with_code(self.id()),
                        );
                    }
                }
            }
        }
    }
}

/// A declared method parameter typed with a legacy implicit-width integer
/// name instead of the recommended fixed-width alternative.
pub struct ImplicitNarrowIntegerParameter;

impl Rule for ImplicitNarrowIntegerParameter {
    fn id(&self) -> &'static str {
        ids::IMPLICIT_NARROW_INTEGER_PARAMETER
    }

    fn check(&self, model: &HeaderFile, config: &AnalysisConfig, out: &mut DiagnosticCollector) {
        for method in model.declared_methods() {
            for param in &method.params {
                let DeclaredType::Primitive(name) = &param.ty else {
                    continue;
                };
                if let Some(replacement) = config.narrow_integer_types.get(name) {
                    out.add(
                        Diagnostic::info(
                            model.file,
                            param.loc,
                            format!(
                                "parameter '{}' is declared '{}'; prefer the fixed-width '{}'",
                                param.name, name, replacement
                            ),
                        )
                        .with_code(self.id()),
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::FileId;
    use crate::hir::lower;
    use crate::syntax::parse_source;

    fn check(rule: &dyn Rule, text: &str) -> Vec<Diagnostic> {
        let tree = parse_source(FileId::new(0), text);
        let model = lower(FileId::new(0), &tree).unwrap();
        let mut out = DiagnosticCollector::new();
        rule.check(&model, &AnalysisConfig::default(), &mut out);
        out.take()
    }

    #[test]
    fn test_undeclared_method_fires_at_method_line() {
        let diags = check(
            &UndeclaredImplementedMethod,
            "@interface T\n\
             - (void)declared;\n\
             @end\n\
             @implementation T\n\
             - (void)declared { }\n\
             - (void)missingDeclarationMethod { }\n\
             @end",
        );
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].start_line, 5);
        assert!(diags[0].message.contains("missingDeclarationMethod"));
        // Related info points back at the interface.
        assert_eq!(diags[0].related.len(), 1);
        assert_eq!(diags[0].related[0].line, 0);
    }

    #[test]
    fn test_impl_only_file_is_silent() {
        let diags = check(
            &UndeclaredImplementedMethod,
            "@implementation Orphan\n- (void)whatever { }\n@end",
        );
        assert!(diags.is_empty());
    }

    #[test]
    fn test_deprecated_reference_in_body() {
        let diags = check(
            &DeprecatedCallSite,
            "@interface T\n- (void)useDeprecatedAPIs;\n@end\n\
             @implementation T\n\
             - (void)useDeprecatedAPIs {\n\
                 UIAlertView *alert = [[UIAlertView alloc] init];\n\
             }\n\
             @end",
        );
        // Two references to UIAlertView on the body line, one per use.
        assert_eq!(diags.len(), 2);
        assert!(diags.iter().all(|d| d.start_line == 5));
        assert!(diags[0].message.contains("UIAlertView"));
    }

    #[test]
    fn test_non_deprecated_bodies_are_silent() {
        let diags = check(
            &DeprecatedCallSite,
            "@interface T\n- (void)go;\n@end\n\
             @implementation T\n- (void)go { [self description]; }\n@end",
        );
        assert!(diags.is_empty());
    }

    #[test]
    fn test_implicit_int_parameter() {
        let diags = check(
            &ImplicitNarrowIntegerParameter,
            "@interface T\n- (void)legacyMethodWithImplicitInt:(int)value;\n@end",
        );
        assert_eq!(diags.len(), 1);
        assert!(diags[0].message.contains("NSInteger"));
    }

    #[test]
    fn test_fixed_width_parameter_is_fine() {
        let diags = check(
            &ImplicitNarrowIntegerParameter,
            "@interface T\n- (void)method:(NSInteger)value with:(int32_t)other;\n@end",
        );
        assert!(diags.is_empty());
    }

    #[test]
    fn test_protocol_method_parameters_are_checked() {
        let diags = check(
            &ImplicitNarrowIntegerParameter,
            "@protocol P\n- (void)update:(short)value;\n@end",
        );
        assert_eq!(diags.len(), 1);
        assert!(diags[0].message.contains("int16_t"));
    }
}
