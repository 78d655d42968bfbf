//! Symbol model — the immutable per-file declaration model.
//!
//! Everything here is created once by [`lower`](crate::hir::lower) and only
//! ever read afterwards; the rule engine takes `&HeaderFile`. The model is
//! self-contained per file, which is what makes batch analysis
//! embarrassingly parallel.

pub mod diagnostics;
pub mod lower;
pub mod source;

use smol_str::SmolStr;

use crate::base::{FileId, LineCol};
use crate::syntax::ForwardKind;

pub use diagnostics::{Diagnostic, DiagnosticCollector, RelatedInfo, Severity};
pub use lower::{ModelError, lower};
pub use source::FileStore;

/// How a named object type resolved against the file's own declarations.
///
/// Cross-file resolution is out of scope: an unknown name stays
/// [`TypeResolution::Unresolved`] as an opaque symbol, never an error.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TypeResolution {
    /// An `@interface` in this file (before or after the reference).
    LocalInterface,
    /// A `@protocol` definition in this file.
    LocalProtocol,
    /// Introduced by `@class`.
    ForwardClass,
    /// Introduced by a `@protocol` forward.
    ForwardProtocol,
    Unresolved,
}

/// A protocol name reference, resolved against in-file declarations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProtocolRef {
    pub name: SmolStr,
    /// True if a matching forward or definition exists in this file.
    pub resolved: bool,
    pub loc: LineCol,
}

/// The declared type of a property, parameter, or return position.
///
/// `id` gets its own variant rather than being an absence of type
/// information, so ownership rules can still match against it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeclaredType {
    /// A C scalar/struct type, or a pointer to one (`int`, `CGRect`,
    /// `char *`).
    Primitive(SmolStr),
    /// A pointer to a named object type (`NSString *`).
    ObjectPointer {
        name: SmolStr,
        resolution: TypeResolution,
        protocols: Vec<ProtocolRef>,
    },
    /// The dynamic object type `id`, optionally protocol-qualified.
    DynamicObject { protocols: Vec<ProtocolRef> },
}

impl DeclaredType {
    /// Whether this type holds an object reference, i.e. whether ownership
    /// attributes are meaningful for it.
    pub fn is_object(&self) -> bool {
        matches!(
            self,
            DeclaredType::ObjectPointer { .. } | DeclaredType::DynamicObject { .. }
        )
    }

    /// The protocol qualifiers, if any.
    pub fn protocols(&self) -> &[ProtocolRef] {
        match self {
            DeclaredType::Primitive(_) => &[],
            DeclaredType::ObjectPointer { protocols, .. } => protocols,
            DeclaredType::DynamicObject { protocols } => protocols,
        }
    }

    /// Source-like rendering for diagnostic messages.
    pub fn display_name(&self) -> String {
        match self {
            DeclaredType::Primitive(name) => name.to_string(),
            DeclaredType::ObjectPointer { name, .. } => format!("{name} *"),
            DeclaredType::DynamicObject { protocols } => {
                if protocols.is_empty() {
                    "id".to_string()
                } else {
                    let names: Vec<_> = protocols.iter().map(|p| p.name.as_str()).collect();
                    format!("id<{}>", names.join(", "))
                }
            }
        }
    }
}

/// Declared memory-management policy of a property.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Ownership {
    Strong,
    Retain,
    Weak,
    /// `assign` / `unsafe_unretained`.
    Unsafe,
    Copy,
}

impl Ownership {
    /// Whether this policy does not keep the referenced object alive.
    pub fn is_nonowning(self) -> bool {
        matches!(self, Ownership::Weak | Ownership::Unsafe)
    }
}

/// An ownership attribute with the spelling that appeared in source
/// (`assign` and `unsafe_unretained` both map to [`Ownership::Unsafe`]).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OwnershipAttr {
    pub kind: Ownership,
    pub spelling: SmolStr,
    pub loc: LineCol,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Atomicity {
    Atomic,
    Nonatomic,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PropertyDecl {
    pub name: SmolStr,
    pub ty: DeclaredType,
    /// At most one; a second ownership keyword is a
    /// [`ModelError`](lower::ModelError), and absence means the property
    /// relies on the language default, which is itself diagnosable.
    pub ownership: Option<OwnershipAttr>,
    pub atomicity: Option<Atomicity>,
    pub readonly: bool,
    pub loc: LineCol,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParamDecl {
    pub name: SmolStr,
    pub ty: DeclaredType,
    pub loc: LineCol,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MethodDecl {
    /// Colon-joined selector ("setObject:forKey:").
    pub selector: SmolStr,
    pub is_class_method: bool,
    pub return_type: DeclaredType,
    pub params: Vec<ParamDecl>,
    pub loc: LineCol,
}

/// An identifier referenced inside an implemented method body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SymbolUse {
    pub name: SmolStr,
    pub loc: LineCol,
}

/// A method defined in an `@implementation` region.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImplMethod {
    pub selector: SmolStr,
    pub is_class_method: bool,
    /// Set by cross-referencing the matching interfaces, their categories,
    /// and their in-file protocol conformances.
    pub declared: bool,
    /// Identifiers the body references, for deprecated-API matching.
    pub body_refs: Vec<SymbolUse>,
    pub loc: LineCol,
}

/// A name introduced by a forward declaration. Never defines members;
/// exists only so later type references resolve.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ForwardDecl {
    pub name: SmolStr,
    pub kind: ForwardKind,
    pub loc: LineCol,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProtocolDecl {
    pub name: SmolStr,
    pub adopts: Vec<ProtocolRef>,
    pub properties: Vec<PropertyDecl>,
    pub methods: Vec<MethodDecl>,
    pub loc: LineCol,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InterfaceDecl {
    pub name: SmolStr,
    pub category: Option<SmolStr>,
    pub superclass: Option<SmolStr>,
    /// Protocols adopted directly in this declaration's header.
    pub adopts: Vec<ProtocolRef>,
    /// Direct union of adopted protocol names with the adoption lists of
    /// the in-file protocols among them. No recursive expansion.
    pub conformances: Vec<SmolStr>,
    pub properties: Vec<PropertyDecl>,
    pub methods: Vec<MethodDecl>,
    pub loc: LineCol,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImplDecl {
    pub name: SmolStr,
    pub category: Option<SmolStr>,
    pub methods: Vec<ImplMethod>,
    pub loc: LineCol,
}

/// A region the parser skipped, surfaced as an `unparsed-region` warning.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnparsedRegion {
    pub loc: LineCol,
    pub expected: String,
    pub found: String,
}

/// The symbol model for one declaration file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeaderFile {
    pub file: FileId,
    pub forwards: Vec<ForwardDecl>,
    pub protocols: Vec<ProtocolDecl>,
    pub interfaces: Vec<InterfaceDecl>,
    pub implementations: Vec<ImplDecl>,
    pub unparsed: Vec<UnparsedRegion>,
}

impl HeaderFile {
    /// Iterate all property declarations, interfaces first, then
    /// protocols, each in declaration order.
    pub fn properties(&self) -> impl Iterator<Item = &PropertyDecl> {
        self.interfaces
            .iter()
            .flat_map(|i| i.properties.iter())
            .chain(self.protocols.iter().flat_map(|p| p.properties.iter()))
    }

    /// Iterate all declared methods (interfaces and protocols).
    pub fn declared_methods(&self) -> impl Iterator<Item = &MethodDecl> {
        self.interfaces
            .iter()
            .flat_map(|i| i.methods.iter())
            .chain(self.protocols.iter().flat_map(|p| p.methods.iter()))
    }

    /// Whether a protocol with this name is forward-declared or defined in
    /// this file.
    pub fn has_protocol(&self, name: &str) -> bool {
        self.protocols.iter().any(|p| p.name == name)
            || self
                .forwards
                .iter()
                .any(|f| f.kind == ForwardKind::Protocol && f.name == name)
    }
}
