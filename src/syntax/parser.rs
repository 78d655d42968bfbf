//! Best-effort recursive-descent parser for interface declaration files.
//!
//! Each top-level construct parses independently. A failure inside one
//! construct produces an [`Item::Unparsed`] node carrying the error's
//! location and expected-token description, then the parser resynchronizes
//! at the next token that can start a top-level declaration. Malformed
//! members inside an otherwise healthy `@interface`/`@protocol` body are
//! recovered the same way at the member level, so a single bad property
//! never hides diagnostics for its siblings.

use smol_str::SmolStr;

use crate::base::{FileId, LineCol, LineIndex};

use super::lexer::{Token, TokenKind, tokenize};
use super::{
    ForwardItem, ForwardKind, ImplItem, InterfaceItem, Item, NameRef, ParseTree, ProtocolItem,
    RawAttr, RawBodyRef, RawImplMethod, RawMethod, RawParam, RawProperty, RawType, SyntaxError,
    UnparsedItem,
};

/// Parse one file's text into a [`ParseTree`]. Never fails as a whole;
/// unparseable regions become [`Item::Unparsed`] nodes.
pub fn parse_source(file: FileId, text: &str) -> ParseTree {
    let mut parser = Parser {
        file,
        tokens: tokenize(text),
        index: LineIndex::new(text),
        pos: 0,
        items: Vec::new(),
    };
    parser.run();
    ParseTree {
        items: parser.items,
    }
}

struct Parser {
    file: FileId,
    tokens: Vec<Token>,
    index: LineIndex,
    pos: usize,
    items: Vec<Item>,
}

impl Parser {
    // ------------------------------------------------------------------
    // Token cursor
    // ------------------------------------------------------------------

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_kind(&self) -> Option<TokenKind> {
        self.peek().map(|t| t.kind)
    }

    fn nth_kind(&self, n: usize) -> Option<TokenKind> {
        self.tokens.get(self.pos + n).map(|t| t.kind)
    }

    fn bump(&mut self) -> Option<Token> {
        let tok = self.tokens.get(self.pos).cloned();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.peek_kind() == Some(kind)
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn token_loc(&self, tok: &Token) -> LineCol {
        self.index.line_col(tok.range.start())
    }

    fn current_loc(&self) -> LineCol {
        match self.peek() {
            Some(tok) => self.token_loc(tok),
            None => self
                .tokens
                .last()
                .map(|t| self.index.line_col(t.range.end()))
                .unwrap_or_default(),
        }
    }

    fn error(&self, expected: &str) -> SyntaxError {
        SyntaxError {
            file: self.file,
            loc: self.current_loc(),
            expected: expected.to_string(),
            found: match self.peek() {
                Some(tok) => format!("'{}'", tok.text),
                None => "end of file".to_string(),
            },
        }
    }

    fn expect(&mut self, kind: TokenKind, expected: &str) -> Result<Token, SyntaxError> {
        if self.at(kind) {
            Ok(self.bump().unwrap())
        } else {
            Err(self.error(expected))
        }
    }

    fn expect_ident(&mut self, expected: &str) -> Result<(SmolStr, LineCol), SyntaxError> {
        let tok = self.expect(TokenKind::Ident, expected)?;
        let loc = self.token_loc(&tok);
        Ok((tok.text, loc))
    }

    // ------------------------------------------------------------------
    // Top level
    // ------------------------------------------------------------------

    fn run(&mut self) {
        while let Some(kind) = self.peek_kind() {
            let result = match kind {
                TokenKind::AtClass => self.parse_class_forward(),
                TokenKind::AtProtocol => {
                    if self.protocol_is_forward() {
                        self.parse_protocol_forward()
                    } else {
                        self.parse_protocol()
                    }
                }
                TokenKind::AtInterface => self.parse_interface(),
                TokenKind::AtImplementation => self.parse_implementation(),
                _ => {
                    let err = self.error(
                        "a top-level declaration (@class, @protocol, @interface or @implementation)",
                    );
                    self.bump();
                    Err(err)
                }
            };
            if let Err(err) = result {
                self.items.push(Item::Unparsed(UnparsedItem::from_error(&err)));
                self.sync_top_level();
            }
        }
    }

    /// Skip forward to the next token that can start a top-level construct.
    fn sync_top_level(&mut self) {
        while let Some(kind) = self.peek_kind() {
            if kind.starts_top_level() {
                break;
            }
            self.pos += 1;
        }
    }

    /// `@protocol Name;` / `@protocol A, B;` introduce forwards, anything
    /// else after the name is a definition.
    fn protocol_is_forward(&self) -> bool {
        self.nth_kind(1) == Some(TokenKind::Ident)
            && matches!(self.nth_kind(2), Some(TokenKind::Semi | TokenKind::Comma))
    }

    fn parse_class_forward(&mut self) -> Result<(), SyntaxError> {
        self.bump();
        self.parse_forward_names(ForwardKind::Class, "class name")
    }

    fn parse_protocol_forward(&mut self) -> Result<(), SyntaxError> {
        self.bump();
        self.parse_forward_names(ForwardKind::Protocol, "protocol name")
    }

    fn parse_forward_names(
        &mut self,
        kind: ForwardKind,
        expected: &str,
    ) -> Result<(), SyntaxError> {
        let mut names = Vec::new();
        loop {
            let (name, loc) = self.expect_ident(expected)?;
            names.push(ForwardItem { name, kind, loc });
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::Semi, "';' after forward declaration")?;

        for fwd in names {
            self.items.push(match kind {
                ForwardKind::Class => Item::ClassForward(fwd),
                ForwardKind::Protocol => Item::ProtocolForward(fwd),
            });
        }
        Ok(())
    }

    fn parse_interface(&mut self) -> Result<(), SyntaxError> {
        let at = self.bump().unwrap();
        let loc = self.token_loc(&at);
        let (name, _) = self.expect_ident("interface name")?;

        let category = if self.eat(TokenKind::LParen) {
            let (cat, _) = self.expect_ident("category name")?;
            self.expect(TokenKind::RParen, "')' after category name")?;
            Some(cat)
        } else {
            None
        };

        let superclass = if self.eat(TokenKind::Colon) {
            Some(self.expect_ident("superclass name")?.0)
        } else {
            None
        };

        let adopts = if self.at(TokenKind::Lt) {
            self.parse_adoption_list()?
        } else {
            Vec::new()
        };

        let (properties, methods) = self.parse_member_block()?;

        self.items.push(Item::Interface(InterfaceItem {
            name,
            category,
            superclass,
            adopts,
            properties,
            methods,
            loc,
        }));
        Ok(())
    }

    fn parse_protocol(&mut self) -> Result<(), SyntaxError> {
        let at = self.bump().unwrap();
        let loc = self.token_loc(&at);
        let (name, _) = self.expect_ident("protocol name")?;

        let adopts = if self.at(TokenKind::Lt) {
            self.parse_adoption_list()?
        } else {
            Vec::new()
        };

        let (properties, methods) = self.parse_member_block()?;

        self.items.push(Item::Protocol(ProtocolItem {
            name,
            adopts,
            properties,
            methods,
            loc,
        }));
        Ok(())
    }

    /// Shared `@interface`/`@protocol` body: properties and method
    /// declarations until `@end`, with member-level recovery.
    fn parse_member_block(&mut self) -> Result<(Vec<RawProperty>, Vec<RawMethod>), SyntaxError> {
        let mut properties = Vec::new();
        let mut methods = Vec::new();

        loop {
            match self.peek_kind() {
                None => return Err(self.error("'@end'")),
                Some(TokenKind::AtEnd) => {
                    self.bump();
                    break;
                }
                Some(TokenKind::AtProperty) => match self.parse_property() {
                    Ok(prop) => properties.push(prop),
                    Err(err) => self.recover_member(err),
                },
                Some(TokenKind::Minus | TokenKind::Plus) => match self.parse_method_decl() {
                    Ok(method) => methods.push(method),
                    Err(err) => self.recover_member(err),
                },
                Some(TokenKind::AtOptional | TokenKind::AtRequired | TokenKind::Semi) => {
                    self.bump();
                }
                Some(_) => {
                    let err = self.error("a property or method declaration");
                    self.recover_member(err);
                }
            }
        }

        Ok((properties, methods))
    }

    /// Record the member error and skip to the next member boundary.
    fn recover_member(&mut self, err: SyntaxError) {
        self.items.push(Item::Unparsed(UnparsedItem::from_error(&err)));
        loop {
            match self.peek_kind() {
                None => break,
                Some(TokenKind::Semi) => {
                    self.bump();
                    break;
                }
                Some(
                    TokenKind::AtEnd | TokenKind::AtProperty | TokenKind::Minus | TokenKind::Plus,
                ) => break,
                Some(_) => {
                    self.bump();
                }
            }
        }
    }

    fn parse_adoption_list(&mut self) -> Result<Vec<NameRef>, SyntaxError> {
        self.expect(TokenKind::Lt, "'<'")?;
        let mut names = Vec::new();
        loop {
            let (name, loc) = self.expect_ident("protocol name")?;
            names.push(NameRef { name, loc });
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::Gt, "'>' after protocol list")?;
        Ok(names)
    }

    // ------------------------------------------------------------------
    // Properties
    // ------------------------------------------------------------------

    fn parse_property(&mut self) -> Result<RawProperty, SyntaxError> {
        let at = self.bump().unwrap();
        let loc = self.token_loc(&at);

        let attrs = if self.eat(TokenKind::LParen) {
            self.parse_attr_list()?
        } else {
            Vec::new()
        };

        let decl = self.collect_until_semi("';' after property declaration")?;

        // The trailing identifier is the property name; everything before
        // it is the declared type.
        let name_idx = decl
            .iter()
            .rposition(|t| t.kind == TokenKind::Ident)
            .ok_or_else(|| SyntaxError {
                file: self.file,
                loc,
                expected: "property name".to_string(),
                found: "';'".to_string(),
            })?;
        let name = decl[name_idx].text.clone();
        let ty = self.raw_type_from_tokens(&decl[..name_idx], loc);

        Ok(RawProperty {
            name,
            attrs,
            ty,
            loc,
        })
    }

    fn parse_attr_list(&mut self) -> Result<Vec<RawAttr>, SyntaxError> {
        let mut attrs = Vec::new();
        loop {
            match self.peek_kind() {
                None => return Err(self.error("')' after property attributes")),
                Some(TokenKind::RParen) => {
                    self.bump();
                    return Ok(attrs);
                }
                Some(TokenKind::Comma) => {
                    self.bump();
                }
                Some(TokenKind::Ident) => {
                    let tok = self.bump().unwrap();
                    let loc = self.token_loc(&tok);
                    let value = if self.eat(TokenKind::Eq) {
                        let val = self
                            .bump()
                            .ok_or_else(|| self.error("an attribute value"))?;
                        Some(val.text)
                    } else {
                        None
                    };
                    attrs.push(RawAttr {
                        name: tok.text,
                        value,
                        loc,
                    });
                }
                Some(_) => return Err(self.error("a property attribute")),
            }
        }
    }

    /// Collect the tokens of one member declaration up to its `;`.
    ///
    /// Stops with an error at a member boundary or end of file so that
    /// recovery does not eat into the next declaration.
    fn collect_until_semi(&mut self, expected: &str) -> Result<Vec<Token>, SyntaxError> {
        let mut tokens = Vec::new();
        loop {
            match self.peek_kind() {
                None
                | Some(
                    TokenKind::AtEnd | TokenKind::AtProperty | TokenKind::Minus | TokenKind::Plus,
                ) => return Err(self.error(expected)),
                Some(TokenKind::Semi) => {
                    self.bump();
                    return Ok(tokens);
                }
                Some(_) => tokens.push(self.bump().unwrap()),
            }
        }
    }

    /// Build a [`RawType`] from the tokens of a type position.
    ///
    /// Multi-word C types are joined ("unsigned int"). An angle-bracket
    /// group is a protocol qualifier list unless it contains a `*`, in
    /// which case it is a lightweight-generics argument and its contents
    /// are ignored. An empty token list is the implicit `id` of old-style
    /// signatures.
    fn raw_type_from_tokens(&self, slice: &[Token], fallback: LineCol) -> RawType {
        let mut words: Vec<&str> = Vec::new();
        let mut protocols = Vec::new();
        let mut is_pointer = false;
        let mut angle_depth = 0usize;
        let mut angle_has_star = false;
        let mut angle_names: Vec<NameRef> = Vec::new();

        for tok in slice {
            match tok.kind {
                TokenKind::Lt => {
                    angle_depth += 1;
                    if angle_depth == 1 {
                        angle_has_star = false;
                        angle_names.clear();
                    }
                }
                TokenKind::Gt => {
                    angle_depth = angle_depth.saturating_sub(1);
                    if angle_depth == 0 && !angle_has_star {
                        protocols.append(&mut angle_names);
                    }
                }
                TokenKind::Star => {
                    if angle_depth > 0 {
                        angle_has_star = true;
                    } else {
                        is_pointer = true;
                    }
                }
                TokenKind::Ident => {
                    if angle_depth > 0 {
                        angle_names.push(NameRef {
                            name: tok.text.clone(),
                            loc: self.token_loc(tok),
                        });
                    } else {
                        words.push(tok.text.as_str());
                    }
                }
                _ => {}
            }
        }

        let name = if words.is_empty() {
            SmolStr::new_static("id")
        } else {
            SmolStr::new(words.join(" "))
        };
        let loc = slice
            .first()
            .map(|t| self.token_loc(t))
            .unwrap_or(fallback);

        RawType {
            name,
            is_pointer,
            protocols,
            loc,
        }
    }

    // ------------------------------------------------------------------
    // Methods
    // ------------------------------------------------------------------

    fn parse_method_decl(&mut self) -> Result<RawMethod, SyntaxError> {
        let method = self.parse_method_sig()?;
        // Availability/deprecation macros may sit between the signature
        // and the semicolon; they are not part of the declaration.
        self.collect_until_semi("';' after method declaration")?;
        Ok(method)
    }

    fn parse_method_sig(&mut self) -> Result<RawMethod, SyntaxError> {
        let sign = self.bump().unwrap();
        let loc = self.token_loc(&sign);
        let is_class_method = sign.kind == TokenKind::Plus;

        let return_ty = if self.at(TokenKind::LParen) {
            self.parse_paren_type()?
        } else {
            // Old-style signature with omitted return type means `id`.
            self.raw_type_from_tokens(&[], loc)
        };

        let (first, _) = self.expect_ident("selector")?;
        let mut selector = String::from(first.as_str());
        let mut params = Vec::new();

        while self.at(TokenKind::Colon) {
            self.bump();
            selector.push(':');

            let ty = if self.at(TokenKind::LParen) {
                self.parse_paren_type()?
            } else {
                self.raw_type_from_tokens(&[], loc)
            };
            let (pname, ploc) = self.expect_ident("parameter name")?;
            params.push(RawParam {
                name: pname,
                ty,
                loc: ploc,
            });

            // Variadic tail: ", ..." after the last parameter.
            if self.at(TokenKind::Comma) {
                self.bump();
                while self.eat(TokenKind::Dot) {}
            }

            // Another selector piece only if an identifier is directly
            // followed by a colon; a bare identifier is the next construct.
            if self.at(TokenKind::Ident) && self.nth_kind(1) == Some(TokenKind::Colon) {
                let piece = self.bump().unwrap();
                selector.push_str(piece.text.as_str());
            } else {
                break;
            }
        }

        Ok(RawMethod {
            selector: SmolStr::new(selector),
            is_class_method,
            return_ty,
            params,
            loc,
        })
    }

    /// Parse a parenthesized type, balancing nested parentheses (block
    /// types and function pointers).
    fn parse_paren_type(&mut self) -> Result<RawType, SyntaxError> {
        let open = self.expect(TokenKind::LParen, "'('")?;
        let loc = self.token_loc(&open);
        let mut depth = 1usize;
        let mut tokens = Vec::new();

        loop {
            match self.peek_kind() {
                None => return Err(self.error("')' after type")),
                Some(TokenKind::LParen) => {
                    depth += 1;
                    tokens.push(self.bump().unwrap());
                }
                Some(TokenKind::RParen) => {
                    depth -= 1;
                    let tok = self.bump().unwrap();
                    if depth == 0 {
                        break;
                    }
                    tokens.push(tok);
                }
                Some(_) => tokens.push(self.bump().unwrap()),
            }
        }

        Ok(self.raw_type_from_tokens(&tokens, loc))
    }

    // ------------------------------------------------------------------
    // Implementations
    // ------------------------------------------------------------------

    fn parse_implementation(&mut self) -> Result<(), SyntaxError> {
        let at = self.bump().unwrap();
        let loc = self.token_loc(&at);
        let (name, _) = self.expect_ident("class name")?;

        let category = if self.eat(TokenKind::LParen) {
            let (cat, _) = self.expect_ident("category name")?;
            self.expect(TokenKind::RParen, "')' after category name")?;
            Some(cat)
        } else {
            None
        };

        let mut methods = Vec::new();
        loop {
            match self.peek_kind() {
                None => return Err(self.error("'@end'")),
                Some(TokenKind::AtEnd) => {
                    self.bump();
                    break;
                }
                Some(TokenKind::Minus | TokenKind::Plus) => match self.parse_impl_method() {
                    Ok(method) => methods.push(method),
                    Err(err) => self.recover_member(err),
                },
                Some(TokenKind::LBrace) => self.skip_balanced_braces(),
                Some(_) => {
                    // Ivar blocks, @synthesize lines, C statics: not part
                    // of the declaration model.
                    self.bump();
                }
            }
        }

        self.items.push(Item::Implementation(ImplItem {
            name,
            category,
            methods,
            loc,
        }));
        Ok(())
    }

    fn parse_impl_method(&mut self) -> Result<RawImplMethod, SyntaxError> {
        let method = self.parse_method_sig()?;

        // Skip macros between signature and body; a bare `;` is a
        // (redundant) declaration inside the implementation.
        loop {
            match self.peek_kind() {
                None | Some(TokenKind::AtEnd) => return Err(self.error("method body")),
                Some(TokenKind::Semi) => {
                    self.bump();
                    return Ok(RawImplMethod {
                        method,
                        body_refs: Vec::new(),
                    });
                }
                Some(TokenKind::LBrace) => break,
                Some(_) => {
                    self.bump();
                }
            }
        }

        // Brace-balanced body scan: record every identifier with its
        // location for deprecated-symbol matching, nothing else.
        self.bump();
        let mut depth = 1usize;
        let mut body_refs = Vec::new();
        while depth > 0 {
            match self.bump() {
                None => break,
                Some(tok) => match tok.kind {
                    TokenKind::LBrace => depth += 1,
                    TokenKind::RBrace => depth -= 1,
                    TokenKind::Ident => body_refs.push(RawBodyRef {
                        name: tok.text.clone(),
                        loc: self.token_loc(&tok),
                    }),
                    _ => {}
                },
            }
        }

        Ok(RawImplMethod { method, body_refs })
    }

    fn skip_balanced_braces(&mut self) {
        self.bump();
        let mut depth = 1usize;
        while depth > 0 {
            match self.bump().map(|t| t.kind) {
                None => break,
                Some(TokenKind::LBrace) => depth += 1,
                Some(TokenKind::RBrace) => depth -= 1,
                Some(_) => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> ParseTree {
        parse_source(FileId::new(0), text)
    }

    fn single_interface(tree: &ParseTree) -> &InterfaceItem {
        let mut found = None;
        for item in &tree.items {
            if let Item::Interface(iface) = item {
                assert!(found.is_none(), "expected exactly one interface");
                found = Some(iface);
            }
        }
        found.expect("no interface parsed")
    }

    #[test]
    fn test_empty_file() {
        assert!(parse("").items.is_empty());
        assert!(parse("// only a comment\n#import <UIKit/UIKit.h>\n").items.is_empty());
    }

    #[test]
    fn test_class_forward_list() {
        let tree = parse("@class LegacyNetworkManager, LegacyCache;");
        assert_eq!(tree.items.len(), 2);
        match (&tree.items[0], &tree.items[1]) {
            (Item::ClassForward(a), Item::ClassForward(b)) => {
                assert_eq!(a.name, "LegacyNetworkManager");
                assert_eq!(b.name, "LegacyCache");
                assert_eq!(a.kind, ForwardKind::Class);
            }
            other => panic!("unexpected items: {other:?}"),
        }
    }

    #[test]
    fn test_protocol_forward_vs_definition() {
        let tree = parse("@protocol LegacyDataSource;\n@protocol Renderer\n- (void)render;\n@end");
        assert_eq!(tree.items.len(), 2);
        assert!(matches!(&tree.items[0], Item::ProtocolForward(f) if f.name == "LegacyDataSource"));
        match &tree.items[1] {
            Item::Protocol(proto) => {
                assert_eq!(proto.name, "Renderer");
                assert_eq!(proto.methods.len(), 1);
                assert_eq!(proto.methods[0].selector, "render");
            }
            other => panic!("unexpected item: {other:?}"),
        }
    }

    #[test]
    fn test_interface_header() {
        let tree = parse("@interface AppDelegate : UIResponder <UIApplicationDelegate>\n@end");
        let iface = single_interface(&tree);
        assert_eq!(iface.name, "AppDelegate");
        assert_eq!(iface.superclass.as_deref(), Some("UIResponder"));
        assert_eq!(iface.adopts.len(), 1);
        assert_eq!(iface.adopts[0].name, "UIApplicationDelegate");
        assert!(iface.category.is_none());
    }

    #[test]
    fn test_category_header() {
        let tree = parse("@interface ViewController (Legacy)\n- (void)tearDown;\n@end");
        let iface = single_interface(&tree);
        assert_eq!(iface.category.as_deref(), Some("Legacy"));
        assert_eq!(iface.methods[0].selector, "tearDown");
    }

    #[test]
    fn test_property_attributes_and_type() {
        let tree = parse(
            "@interface T\n@property (nonatomic, retain) LegacyNetworkManager *networkManager;\n@end",
        );
        let prop = &single_interface(&tree).properties[0];
        assert_eq!(prop.name, "networkManager");
        assert_eq!(prop.attrs.len(), 2);
        assert_eq!(prop.attrs[0].name, "nonatomic");
        assert_eq!(prop.attrs[1].name, "retain");
        assert_eq!(prop.ty.name, "LegacyNetworkManager");
        assert!(prop.ty.is_pointer);
        assert_eq!(prop.loc.line, 1);
    }

    #[test]
    fn test_property_without_attribute_list() {
        let tree = parse("@interface T\n@property NSArray *legacyArray;\n@end");
        let prop = &single_interface(&tree).properties[0];
        assert!(prop.attrs.is_empty());
        assert_eq!(prop.ty.name, "NSArray");
    }

    #[test]
    fn test_property_with_spaced_pointer() {
        let tree = parse("@interface T\n@property (strong, nonatomic) UIWindow * window;\n@end");
        let prop = &single_interface(&tree).properties[0];
        assert_eq!(prop.name, "window");
        assert_eq!(prop.ty.name, "UIWindow");
        assert!(prop.ty.is_pointer);
    }

    #[test]
    fn test_dynamic_object_with_protocol_qualifier() {
        let tree = parse("@interface T\n@property id<LegacyDataSource> dataSource;\n@end");
        let prop = &single_interface(&tree).properties[0];
        assert_eq!(prop.ty.name, "id");
        assert!(!prop.ty.is_pointer);
        assert_eq!(prop.ty.protocols.len(), 1);
        assert_eq!(prop.ty.protocols[0].name, "LegacyDataSource");
    }

    #[test]
    fn test_generics_are_not_protocol_qualifiers() {
        let tree = parse("@interface T\n@property (copy) NSArray<NSString *> *names;\n@end");
        let prop = &single_interface(&tree).properties[0];
        assert_eq!(prop.ty.name, "NSArray");
        assert!(prop.ty.is_pointer);
        assert!(prop.ty.protocols.is_empty());
    }

    #[test]
    fn test_getter_attribute_value() {
        let tree =
            parse("@interface T\n@property (getter=isFirstLaunch) BOOL firstLaunch;\n@end");
        let prop = &single_interface(&tree).properties[0];
        assert_eq!(prop.attrs[0].name, "getter");
        assert_eq!(prop.attrs[0].value.as_deref(), Some("isFirstLaunch"));
    }

    #[test]
    fn test_method_multi_part_selector() {
        let tree = parse(
            "@interface T\n- (void)setObject:(id)obj forKey:(NSString *)key;\n+ (instancetype)shared;\n@end",
        );
        let iface = single_interface(&tree);
        let m = &iface.methods[0];
        assert_eq!(m.selector, "setObject:forKey:");
        assert!(!m.is_class_method);
        assert_eq!(m.params.len(), 2);
        assert_eq!(m.params[0].name, "obj");
        assert_eq!(m.params[0].ty.name, "id");
        assert_eq!(m.params[1].ty.name, "NSString");
        assert!(m.params[1].ty.is_pointer);

        let shared = &iface.methods[1];
        assert!(shared.is_class_method);
        assert_eq!(shared.selector, "shared");
        assert_eq!(shared.params.len(), 0);
    }

    #[test]
    fn test_narrow_parameter_type_text() {
        let tree = parse("@interface T\n- (void)legacyMethodWithImplicitInt:(int)value;\n@end");
        let m = &single_interface(&tree).methods[0];
        assert_eq!(m.params[0].ty.name, "int");
        assert!(!m.params[0].ty.is_pointer);
    }

    #[test]
    fn test_implementation_bodies_and_refs() {
        let tree = parse(
            "@implementation ViewController\n\
             - (void)useDeprecatedAPIs {\n\
                 UIAlertView *alert = [[UIAlertView alloc] init];\n\
             }\n\
             @end",
        );
        match &tree.items[0] {
            Item::Implementation(imp) => {
                assert_eq!(imp.name, "ViewController");
                let m = &imp.methods[0];
                assert_eq!(m.method.selector, "useDeprecatedAPIs");
                assert!(m.body_refs.iter().any(|r| r.name == "UIAlertView"));
                assert!(m.body_refs.iter().any(|r| r.name == "alloc"));
            }
            other => panic!("unexpected item: {other:?}"),
        }
    }

    #[test]
    fn test_unparsed_top_level_recovers() {
        let tree = parse("garbage tokens here\n@interface T\n@end");
        assert!(matches!(&tree.items[0], Item::Unparsed(_)));
        assert_eq!(single_interface(&tree).name, "T");
    }

    #[test]
    fn test_malformed_member_does_not_hide_siblings() {
        let tree = parse(
            "@interface T\n\
             @property (nonatomic) ;\n\
             @property (nonatomic, assign) NSString *ok;\n\
             @end",
        );
        assert_eq!(tree.unparsed().count(), 1);
        let iface = single_interface(&tree);
        assert_eq!(iface.properties.len(), 1);
        assert_eq!(iface.properties[0].name, "ok");
    }

    #[test]
    fn test_missing_at_end_is_unparsed() {
        let tree = parse("@interface T\n@property (assign) int x;");
        assert_eq!(tree.unparsed().count(), 1);
        assert!(tree.items.iter().all(|i| !matches!(i, Item::Interface(_))));
    }

    #[test]
    fn test_unparsed_carries_expected_description() {
        let tree = parse("@interface 42\n@end");
        let unparsed: Vec<_> = tree.unparsed().collect();
        assert_eq!(unparsed.len(), 1);
        assert!(unparsed[0].expected.contains("interface name"));
        assert_eq!(unparsed[0].found, "'42'");
    }
}
