//! Syntax layer — lexer, parse tree, and best-effort parser.
//!
//! The parse tree is deliberately raw: attribute keywords, type names and
//! protocol qualifiers are kept as the strings that appeared in source.
//! Classifying them (and rejecting the structurally impossible ones) is the
//! model builder's job, see [`crate::hir::lower`].

pub mod lexer;
pub mod parser;

use smol_str::SmolStr;
use thiserror::Error;

use crate::base::{FileId, LineCol};

pub use lexer::{Token, TokenKind, tokenize};
pub use parser::parse_source;

/// A parse failure for one construct.
///
/// Never escapes [`parse_source`]: the parser converts it into an
/// [`Item::Unparsed`] node and resynchronizes, so one malformed declaration
/// cannot hide the rest of the file.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{file}:{loc}: expected {expected}, found {found}")]
pub struct SyntaxError {
    pub file: FileId,
    pub loc: LineCol,
    /// Expected-token description, e.g. "property name".
    pub expected: String,
    /// What was actually there, e.g. "';'" or "end of file".
    pub found: String,
}

/// A name reference with its own source location.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NameRef {
    pub name: SmolStr,
    pub loc: LineCol,
}

/// Kind tag on a forward declaration.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ForwardKind {
    Class,
    Protocol,
}

/// One name introduced by `@class` or a `@protocol` forward list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ForwardItem {
    pub name: SmolStr,
    pub kind: ForwardKind,
    pub loc: LineCol,
}

/// A raw property attribute, e.g. `retain` or `getter=isFirstLaunch`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawAttr {
    pub name: SmolStr,
    pub value: Option<SmolStr>,
    pub loc: LineCol,
}

/// A declared type as it appeared in source, before resolution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawType {
    /// Base name, with multi-word C types joined ("unsigned int").
    pub name: SmolStr,
    /// Whether a `*` followed the base name.
    pub is_pointer: bool,
    /// Protocol qualifier names from `id<...>` / `NSObject<...>`.
    pub protocols: Vec<NameRef>,
    pub loc: LineCol,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawProperty {
    pub name: SmolStr,
    pub attrs: Vec<RawAttr>,
    pub ty: RawType,
    pub loc: LineCol,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawParam {
    pub name: SmolStr,
    pub ty: RawType,
    pub loc: LineCol,
}

/// A method signature shared by declarations and implementations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawMethod {
    /// Full selector, colon-joined ("configureWindow:" / "isFirstLaunch").
    pub selector: SmolStr,
    pub is_class_method: bool,
    pub return_ty: RawType,
    pub params: Vec<RawParam>,
    pub loc: LineCol,
}

/// An identifier referenced inside a method body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawBodyRef {
    pub name: SmolStr,
    pub loc: LineCol,
}

/// A method defined in an `@implementation` region, with the identifiers
/// its body references.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawImplMethod {
    pub method: RawMethod,
    pub body_refs: Vec<RawBodyRef>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProtocolItem {
    pub name: SmolStr,
    pub adopts: Vec<NameRef>,
    pub properties: Vec<RawProperty>,
    pub methods: Vec<RawMethod>,
    pub loc: LineCol,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InterfaceItem {
    pub name: SmolStr,
    /// Category name from `@interface Name (Category)`.
    pub category: Option<SmolStr>,
    pub superclass: Option<SmolStr>,
    pub adopts: Vec<NameRef>,
    pub properties: Vec<RawProperty>,
    pub methods: Vec<RawMethod>,
    pub loc: LineCol,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImplItem {
    pub name: SmolStr,
    pub category: Option<SmolStr>,
    pub methods: Vec<RawImplMethod>,
    pub loc: LineCol,
}

/// A region the parser gave up on, with the error it recorded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnparsedItem {
    pub loc: LineCol,
    pub expected: String,
    pub found: String,
}

impl UnparsedItem {
    pub fn from_error(err: &SyntaxError) -> Self {
        Self {
            loc: err.loc,
            expected: err.expected.clone(),
            found: err.found.clone(),
        }
    }
}

/// One top-level construct, success or skipped-with-diagnostic.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Item {
    ClassForward(ForwardItem),
    ProtocolForward(ForwardItem),
    Protocol(ProtocolItem),
    Interface(InterfaceItem),
    Implementation(ImplItem),
    Unparsed(UnparsedItem),
}

/// The ordered parse result for one file. Immutable once built.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParseTree {
    pub items: Vec<Item>,
}

impl ParseTree {
    /// Iterate the regions that failed to parse.
    pub fn unparsed(&self) -> impl Iterator<Item = &UnparsedItem> {
        self.items.iter().filter_map(|item| match item {
            Item::Unparsed(u) => Some(u),
            _ => None,
        })
    }
}
