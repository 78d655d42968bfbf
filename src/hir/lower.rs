//! Model builder — lowers a parse tree into the [`HeaderFile`] model.
//!
//! Same-file resolution only: type names are matched against the file's
//! own interfaces, protocols and forwards, and anything else stays an
//! opaque unresolved symbol. Semantic oddities are left for the rule
//! engine; this pass fails only on structurally impossible input.

use rustc_hash::{FxHashMap, FxHashSet};
use smol_str::SmolStr;
use thiserror::Error;

use crate::base::{FileId, LineCol};
use crate::syntax::{
    ImplItem, InterfaceItem, Item, NameRef, ParseTree, ProtocolItem, RawAttr, RawMethod,
    RawProperty, RawType,
};

use super::{
    Atomicity, DeclaredType, ForwardDecl, HeaderFile, ImplDecl, ImplMethod, InterfaceDecl,
    MethodDecl, Ownership, OwnershipAttr, ParamDecl, PropertyDecl, ProtocolDecl, ProtocolRef,
    SymbolUse, TypeResolution, UnparsedRegion,
};

/// Structurally impossible input. Aborts analysis of the one file it
/// occurred in; batch siblings are unaffected.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("{file}:{loc}: unknown property attribute '{attr}'")]
    UnknownAttribute {
        file: FileId,
        loc: LineCol,
        attr: SmolStr,
    },
    #[error("{file}:{loc}: property '{property}' has conflicting ownership attributes")]
    ConflictingOwnership {
        file: FileId,
        loc: LineCol,
        property: SmolStr,
    },
    #[error("{file}:{loc}: duplicate interface declaration '{name}'")]
    DuplicateInterface {
        file: FileId,
        loc: LineCol,
        name: SmolStr,
    },
}

/// C scalar keywords; a pointer whose base contains one of these is a
/// pointer-to-primitive, not an object reference.
const C_SCALARS: &[&str] = &[
    "void", "char", "short", "int", "long", "float", "double", "signed", "unsigned", "bool",
    "_Bool", "BOOL", "const",
];

/// Property attribute keywords that are recognized but carry nothing the
/// rule set inspects.
const PASSTHROUGH_ATTRS: &[&str] = &[
    "getter",
    "setter",
    "nullable",
    "nonnull",
    "null_resettable",
    "null_unspecified",
    "class",
    "direct",
];

/// Lower one file's parse tree into its symbol model.
pub fn lower(file: FileId, tree: &ParseTree) -> Result<HeaderFile, ModelError> {
    Lowering::new(file, tree).run()
}

struct Lowering<'a> {
    file: FileId,
    tree: &'a ParseTree,
    interface_names: FxHashSet<SmolStr>,
    protocol_names: FxHashSet<SmolStr>,
    forward_classes: FxHashSet<SmolStr>,
    forward_protocols: FxHashSet<SmolStr>,
    /// Class name -> selectors declared for it (methods plus property
    /// accessors, including in-file protocol conformances).
    declared_selectors: FxHashMap<SmolStr, FxHashSet<(SmolStr, bool)>>,
}

impl<'a> Lowering<'a> {
    fn new(file: FileId, tree: &'a ParseTree) -> Self {
        // Name tables come first so that an interface declared later in
        // the same file still resolves.
        let mut interface_names = FxHashSet::default();
        let mut protocol_names = FxHashSet::default();
        let mut forward_classes = FxHashSet::default();
        let mut forward_protocols = FxHashSet::default();

        for item in &tree.items {
            match item {
                Item::ClassForward(fwd) => {
                    forward_classes.insert(fwd.name.clone());
                }
                Item::ProtocolForward(fwd) => {
                    forward_protocols.insert(fwd.name.clone());
                }
                Item::Protocol(proto) => {
                    protocol_names.insert(proto.name.clone());
                }
                Item::Interface(iface) => {
                    interface_names.insert(iface.name.clone());
                }
                Item::Implementation(_) | Item::Unparsed(_) => {}
            }
        }

        Self {
            file,
            tree,
            interface_names,
            protocol_names,
            forward_classes,
            forward_protocols,
            declared_selectors: FxHashMap::default(),
        }
    }

    fn run(mut self) -> Result<HeaderFile, ModelError> {
        let tree = self.tree;
        let mut forwards = Vec::new();
        let mut protocols = Vec::new();
        let mut interfaces = Vec::new();
        let mut unparsed = Vec::new();
        let mut seen_interfaces: FxHashSet<(SmolStr, Option<SmolStr>)> = FxHashSet::default();

        // Interfaces and protocols before implementations, so the
        // declared-selector table is complete when impls are lowered.
        for item in &tree.items {
            match item {
                Item::ClassForward(fwd) | Item::ProtocolForward(fwd) => {
                    forwards.push(ForwardDecl {
                        name: fwd.name.clone(),
                        kind: fwd.kind,
                        loc: fwd.loc,
                    });
                }
                Item::Protocol(proto) => protocols.push(self.lower_protocol(proto)?),
                Item::Interface(iface) => {
                    let key = (iface.name.clone(), iface.category.clone());
                    if !seen_interfaces.insert(key) {
                        return Err(ModelError::DuplicateInterface {
                            file: self.file,
                            loc: iface.loc,
                            name: iface.name.clone(),
                        });
                    }
                    interfaces.push(self.lower_interface(iface)?);
                }
                Item::Unparsed(u) => unparsed.push(UnparsedRegion {
                    loc: u.loc,
                    expected: u.expected.clone(),
                    found: u.found.clone(),
                }),
                Item::Implementation(_) => {}
            }
        }

        // Protocol conformance methods count as declared for the classes
        // that adopt them (direct union only, no recursive expansion).
        for iface in &interfaces {
            let mut extra: Vec<(SmolStr, bool)> = Vec::new();
            for conf in &iface.conformances {
                if let Some(proto) = protocols.iter().find(|p| &p.name == conf) {
                    for m in &proto.methods {
                        extra.push((m.selector.clone(), m.is_class_method));
                    }
                    for prop in &proto.properties {
                        for sel in property_accessors(prop) {
                            extra.push((sel, false));
                        }
                    }
                }
            }
            if !extra.is_empty() {
                self.declared_selectors
                    .entry(iface.name.clone())
                    .or_default()
                    .extend(extra);
            }
        }

        let mut implementations = Vec::new();
        for item in &tree.items {
            if let Item::Implementation(imp) = item {
                implementations.push(self.lower_implementation(imp));
            }
        }

        Ok(HeaderFile {
            file: self.file,
            forwards,
            protocols,
            interfaces,
            implementations,
            unparsed,
        })
    }

    fn lower_protocol(&self, proto: &ProtocolItem) -> Result<ProtocolDecl, ModelError> {
        let properties = proto
            .properties
            .iter()
            .map(|p| self.lower_property(p))
            .collect::<Result<Vec<_>, _>>()?;
        let methods = proto.methods.iter().map(|m| self.lower_method(m)).collect();

        Ok(ProtocolDecl {
            name: proto.name.clone(),
            adopts: proto.adopts.iter().map(|r| self.protocol_ref(r)).collect(),
            properties,
            methods,
            loc: proto.loc,
        })
    }

    fn lower_interface(&mut self, iface: &InterfaceItem) -> Result<InterfaceDecl, ModelError> {
        let properties = iface
            .properties
            .iter()
            .map(|p| self.lower_property(p))
            .collect::<Result<Vec<_>, _>>()?;
        let methods: Vec<MethodDecl> =
            iface.methods.iter().map(|m| self.lower_method(m)).collect();

        // Direct union: the interface's own adoption list plus the
        // adoption lists of whichever of those protocols are defined in
        // this file.
        let mut conformances: Vec<SmolStr> = Vec::new();
        for adopted in &iface.adopts {
            if !conformances.contains(&adopted.name) {
                conformances.push(adopted.name.clone());
            }
            if let Some(proto) = self.find_protocol_item(&adopted.name) {
                for inherited in &proto.adopts {
                    if !conformances.contains(&inherited.name) {
                        conformances.push(inherited.name.clone());
                    }
                }
            }
        }

        let declared = self.declared_selectors.entry(iface.name.clone()).or_default();
        for m in &methods {
            declared.insert((m.selector.clone(), m.is_class_method));
        }
        for (prop, raw) in properties.iter().zip(&iface.properties) {
            for sel in property_accessors_with_attrs(prop, &raw.attrs) {
                declared.insert((sel, false));
            }
        }

        Ok(InterfaceDecl {
            name: iface.name.clone(),
            category: iface.category.clone(),
            superclass: iface.superclass.clone(),
            adopts: iface.adopts.iter().map(|r| self.protocol_ref(r)).collect(),
            conformances,
            properties,
            methods,
            loc: iface.loc,
        })
    }

    fn lower_implementation(&self, imp: &ImplItem) -> ImplDecl {
        // Without any associated interface in this file the declaredness
        // of a method is unknowable (the interface lives in another file,
        // and cross-file resolution is out of scope), so nothing is
        // flagged.
        let known = self.declared_selectors.get(&imp.name);

        let methods = imp
            .methods
            .iter()
            .map(|m| ImplMethod {
                selector: m.method.selector.clone(),
                is_class_method: m.method.is_class_method,
                declared: match known {
                    Some(set) => {
                        set.contains(&(m.method.selector.clone(), m.method.is_class_method))
                    }
                    None => true,
                },
                body_refs: m
                    .body_refs
                    .iter()
                    .map(|r| SymbolUse {
                        name: r.name.clone(),
                        loc: r.loc,
                    })
                    .collect(),
                loc: m.method.loc,
            })
            .collect();

        ImplDecl {
            name: imp.name.clone(),
            category: imp.category.clone(),
            methods,
            loc: imp.loc,
        }
    }

    fn lower_property(&self, prop: &RawProperty) -> Result<PropertyDecl, ModelError> {
        let mut ownership: Option<OwnershipAttr> = None;
        let mut atomicity = None;
        let mut readonly = false;

        for attr in &prop.attrs {
            match attr.name.as_str() {
                "strong" | "retain" | "weak" | "assign" | "unsafe_unretained" | "copy" => {
                    if ownership.is_some() {
                        return Err(ModelError::ConflictingOwnership {
                            file: self.file,
                            loc: attr.loc,
                            property: prop.name.clone(),
                        });
                    }
                    ownership = Some(OwnershipAttr {
                        kind: ownership_kind(&attr.name),
                        spelling: attr.name.clone(),
                        loc: attr.loc,
                    });
                }
                "atomic" => atomicity = Some(Atomicity::Atomic),
                "nonatomic" => atomicity = Some(Atomicity::Nonatomic),
                "readonly" => readonly = true,
                "readwrite" => readonly = false,
                other if PASSTHROUGH_ATTRS.contains(&other) => {}
                _ => {
                    return Err(ModelError::UnknownAttribute {
                        file: self.file,
                        loc: attr.loc,
                        attr: attr.name.clone(),
                    });
                }
            }
        }

        Ok(PropertyDecl {
            name: prop.name.clone(),
            ty: self.resolve_type(&prop.ty),
            ownership,
            atomicity,
            readonly,
            loc: prop.loc,
        })
    }

    fn lower_method(&self, method: &RawMethod) -> MethodDecl {
        MethodDecl {
            selector: method.selector.clone(),
            is_class_method: method.is_class_method,
            return_type: self.resolve_type(&method.return_ty),
            params: method
                .params
                .iter()
                .map(|p| ParamDecl {
                    name: p.name.clone(),
                    ty: self.resolve_type(&p.ty),
                    loc: p.loc,
                })
                .collect(),
            loc: method.loc,
        }
    }

    fn resolve_type(&self, raw: &RawType) -> DeclaredType {
        let protocols: Vec<ProtocolRef> =
            raw.protocols.iter().map(|r| self.protocol_ref(r)).collect();

        if raw.name == "id" && !raw.is_pointer {
            return DeclaredType::DynamicObject { protocols };
        }

        if raw.is_pointer {
            if is_c_scalar(&raw.name) {
                return DeclaredType::Primitive(SmolStr::new(format!("{} *", raw.name)));
            }
            return DeclaredType::ObjectPointer {
                name: raw.name.clone(),
                resolution: self.resolve_object(&raw.name),
                protocols,
            };
        }

        DeclaredType::Primitive(raw.name.clone())
    }

    fn resolve_object(&self, name: &str) -> TypeResolution {
        if self.interface_names.contains(name) {
            TypeResolution::LocalInterface
        } else if self.protocol_names.contains(name) {
            TypeResolution::LocalProtocol
        } else if self.forward_classes.contains(name) {
            TypeResolution::ForwardClass
        } else if self.forward_protocols.contains(name) {
            TypeResolution::ForwardProtocol
        } else {
            TypeResolution::Unresolved
        }
    }

    fn protocol_ref(&self, name_ref: &NameRef) -> ProtocolRef {
        ProtocolRef {
            name: name_ref.name.clone(),
            resolved: self.protocol_names.contains(&name_ref.name)
                || self.forward_protocols.contains(&name_ref.name),
            loc: name_ref.loc,
        }
    }

    fn find_protocol_item(&self, name: &str) -> Option<&'a ProtocolItem> {
        self.tree.items.iter().find_map(|item| match item {
            Item::Protocol(proto) if proto.name == name => Some(proto),
            _ => None,
        })
    }
}

fn ownership_kind(keyword: &str) -> Ownership {
    match keyword {
        "strong" => Ownership::Strong,
        "retain" => Ownership::Retain,
        "weak" => Ownership::Weak,
        "copy" => Ownership::Copy,
        // "assign" | "unsafe_unretained"
        _ => Ownership::Unsafe,
    }
}

fn is_c_scalar(name: &str) -> bool {
    name.split_whitespace().any(|w| C_SCALARS.contains(&w))
}

/// Default accessor selectors generated for a property: getter named after
/// the property, and `setName:` unless readonly.
fn property_accessors(prop: &PropertyDecl) -> Vec<SmolStr> {
    let mut selectors = vec![prop.name.clone()];
    if !prop.readonly {
        selectors.push(setter_selector(&prop.name));
    }
    selectors
}

/// Accessors including custom `getter=`/`setter=` spellings from the raw
/// attribute list.
fn property_accessors_with_attrs(prop: &PropertyDecl, attrs: &[RawAttr]) -> Vec<SmolStr> {
    let mut selectors = property_accessors(prop);
    for attr in attrs {
        if let ("getter" | "setter", Some(value)) = (attr.name.as_str(), attr.value.as_ref()) {
            selectors.push(value.clone());
        }
    }
    selectors
}

fn setter_selector(name: &str) -> SmolStr {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => SmolStr::new(format!(
            "set{}{}:",
            first.to_ascii_uppercase(),
            chars.as_str()
        )),
        None => SmolStr::new_static("set:"),
    }
}
