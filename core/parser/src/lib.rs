//! Recursive-descent / precedence-climbing parser (C3).
//!
//! Grounded in shape on the teacher's `Builder` (`inference_ast::builder`):
//! a single struct threading an arena and an error sink through a
//! `build_ast`-style top-level loop, dispatching per-construct. Where the
//! teacher walks an already-built tree-sitter CST, this parser walks a
//! live [`token::TokenStream`] directly, since grammar-driven recursive
//! descent is this toolchain's responsibility rather than tree-sitter's.

pub mod errors;
pub mod precedence;
pub mod token;

use quixc_ast::kinds::{
    BindingKind, CompositeKind, Mutability, Purity, SafetyMode, UnaryOperatorKind, Visibility,
    WordOperatorKind,
};
use quixc_ast::{AstArena, CompositeField, Decl, Expr, NodeId, Param, Span, Stmt, SwitchCase, Type};

use errors::ParseIssue;
use precedence::{Assoc, WORD_OPERATOR_PRECEDENCE};
use token::{Token, TokenStream};

const STATEMENT_KEYWORDS: &[&str] = &[
    "var", "let", "const", "enum", "struct", "region", "group", "union", "class", "type",
    "subsystem", "fn", "pub", "sec", "pro", "import", "return", "retif", "retz", "retv", "break",
    "continue", "if", "while", "for", "form", "foreach", "switch", "__asm__", "safe", "unsafe",
    "volatile",
];

/// Drives a [`TokenStream`] through the grammar, publishing parsed nodes
/// into the caller-supplied [`AstArena`] and accumulating [`ParseIssue`]s
/// for anything malformed along the way.
pub struct Parser<'s, S: TokenStream> {
    stream: &'s mut S,
    issues: Vec<ParseIssue>,
}

impl<'s, S: TokenStream> Parser<'s, S> {
    pub fn new(stream: &'s mut S) -> Self {
        Self {
            stream,
            issues: Vec::new(),
        }
    }

    #[must_use]
    pub fn issues(&self) -> &[ParseIssue] {
        &self.issues
    }

    fn peek(&mut self) -> S::Tok {
        self.stream.peek()
    }

    fn bump(&mut self) -> S::Tok {
        self.stream.next()
    }

    fn error(&mut self, span: Span, message: impl Into<String>) {
        self.issues.push(ParseIssue::new(span, message));
    }

    fn expect_punct(&mut self, punct: &str) -> Option<S::Tok> {
        let tok = self.peek();
        if tok.is_punctuator(punct) {
            Some(self.bump())
        } else {
            self.error(tok.span(), format!("expected `{punct}`"));
            None
        }
    }

    fn eat_punct(&mut self, punct: &str) -> bool {
        if self.peek().is_punctuator(punct) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        if self.peek().is_keyword(keyword) {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Resynchronizes after a syntax error: skips tokens until the next `;`
    /// or `}` at the current nesting level, or EOF (§4.3 "Error recovery").
    fn resync(&mut self) {
        let mut depth = 0i32;
        loop {
            let tok = self.peek();
            if tok.is_eof() {
                return;
            }
            if depth == 0 && (tok.is_punctuator(";") || tok.is_punctuator("}")) {
                if tok.is_punctuator(";") {
                    self.bump();
                }
                return;
            }
            if tok.is_punctuator("{") || tok.is_punctuator("(") || tok.is_punctuator("[") {
                depth += 1;
            } else if tok.is_punctuator("}") || tok.is_punctuator(")") || tok.is_punctuator("]") {
                depth -= 1;
            }
            self.bump();
        }
    }

    fn intern_text(&self, arena: &mut AstArena, tok: &S::Tok) -> quixc_arena::intern::Symbol {
        arena.intern(tok.text())
    }

    /// Top-level parser contract (§4.3): `parse(tokens, out_block,
    /// expect_braces, single_stmt) -> bool`. Returns the `Block`/`SourceFile`
    /// node id it published and whether parsing completed without error.
    pub fn parse(
        &mut self,
        arena: &mut AstArena,
        expect_braces: bool,
        single_stmt: bool,
    ) -> (NodeId, bool) {
        let start = self.peek().span();
        if expect_braces {
            self.expect_punct("{");
        }

        let mut stmts = Vec::new();
        let mut ok = true;
        loop {
            let tok = self.peek();
            if tok.is_eof() {
                if expect_braces {
                    self.error(tok.span(), "expected `}`, found end of input");
                    ok = false;
                }
                break;
            }
            if expect_braces && tok.is_punctuator("}") {
                self.bump();
                break;
            }
            if tok.is_punctuator(";") {
                self.bump();
                continue;
            }
            if tok.is_punctuator(")") || tok.is_punctuator("]")
                || (tok.is_punctuator("}") && !expect_braces)
            {
                self.error(tok.span(), "unexpected closing delimiter");
                ok = false;
                self.bump();
                continue;
            }

            match self.parse_stmt(arena) {
                Some(id) => stmts.push(id),
                None => {
                    ok = false;
                    self.resync();
                }
            }

            if single_stmt {
                break;
            }
        }

        let end = self.peek().span();
        let span = start.to(end);
        let node = arena.alloc_stmt(Stmt::Block { safety: SafetyMode::Unknown, stmts }, span);
        (node, ok)
    }

    /// Convenience entry point for parsing an entire compilation unit:
    /// parses without an enclosing `{ }` and publishes a `SourceFile` node
    /// (rather than the `Block` that the general `parse` contract returns)
    /// holding the unit's top-level items.
    pub fn parse_source_file(&mut self, arena: &mut AstArena) -> (NodeId, bool) {
        let (block, ok) = self.parse(arena, false, false);
        let decls = match arena.get(block).clone() {
            quixc_ast::AstNode::Stmt(Stmt::Block { stmts, .. }) => stmts,
            _ => vec![],
        };
        let span = arena.span(block);
        (arena.alloc_stmt(Stmt::SourceFile { decls }, span), ok)
    }

    fn parse_stmt(&mut self, arena: &mut AstArena) -> Option<NodeId> {
        let tok = self.peek();

        if tok.is_keyword("safe") || tok.is_keyword("unsafe") {
            return self.parse_safety_block(arena, tok.is_keyword("safe"));
        }
        if tok.is_keyword("volatile") {
            self.bump();
            let inner = self.parse_stmt(arena)?;
            return Some(arena.alloc_stmt(Stmt::Volatile(inner), tok.span()));
        }
        if tok.is_keyword("pub") || tok.is_keyword("sec") || tok.is_keyword("pro") {
            let vis = if tok.is_keyword("pub") {
                Visibility::Public
            } else if tok.is_keyword("pro") {
                Visibility::Protected
            } else {
                Visibility::Private
            };
            self.bump();
            return self.parse_decl_stmt(arena, vis);
        }
        if tok.is_keyword("var") || tok.is_keyword("let") || tok.is_keyword("const") {
            return self.parse_variable_decl(arena, Visibility::Private);
        }
        if tok.is_keyword("fn") {
            return self.parse_function(arena, Visibility::Private);
        }
        if tok.is_keyword("struct")
            || tok.is_keyword("region")
            || tok.is_keyword("group")
            || tok.is_keyword("union")
            || tok.is_keyword("class")
        {
            return self.parse_composite_def(arena, Visibility::Private);
        }
        if tok.is_keyword("enum") {
            return self.parse_enum_def(arena, Visibility::Private);
        }
        if tok.is_keyword("subsystem") {
            return self.parse_scope_decl(arena);
        }
        if tok.is_keyword("import") {
            return self.parse_import(arena);
        }
        if tok.is_keyword("return") {
            return self.parse_return(arena);
        }
        if tok.is_keyword("retif") {
            return self.parse_guarded_return(arena, "retif");
        }
        if tok.is_keyword("retz") {
            return self.parse_guarded_return(arena, "retz");
        }
        if tok.is_keyword("retv") {
            return self.parse_guarded_return(arena, "retv");
        }
        if tok.is_keyword("break") {
            self.bump();
            self.eat_punct(";");
            return Some(arena.alloc_stmt(Stmt::Break, tok.span()));
        }
        if tok.is_keyword("continue") {
            self.bump();
            self.eat_punct(";");
            return Some(arena.alloc_stmt(Stmt::Continue, tok.span()));
        }
        if tok.is_keyword("if") {
            return self.parse_if(arena);
        }
        if tok.is_keyword("while") {
            return self.parse_while(arena);
        }
        if tok.is_keyword("for") {
            return self.parse_for(arena);
        }
        if tok.is_keyword("foreach") {
            return self.parse_foreach(arena);
        }
        if tok.is_keyword("form") {
            return self.parse_form(arena);
        }
        if tok.is_keyword("switch") {
            return self.parse_switch(arena);
        }
        if tok.is_keyword("__asm__") {
            return self.parse_inline_asm(arena);
        }
        if tok.is_punctuator("{") {
            return Some(self.parse(arena, true, false).0);
        }

        // Non-keyword: parse an expression-statement.
        let expr = self.parse_expr(arena, 0)?;
        let span = tok.span().to(self.peek().span());
        self.expect_punct(";");
        Some(arena.alloc_stmt(Stmt::ExprStmt(expr), span))
    }

    fn parse_decl_stmt(&mut self, arena: &mut AstArena, vis: Visibility) -> Option<NodeId> {
        let tok = self.peek();
        if tok.is_keyword("var") || tok.is_keyword("let") || tok.is_keyword("const") {
            self.parse_variable_decl(arena, vis)
        } else if tok.is_keyword("fn") {
            self.parse_function(arena, vis)
        } else if tok.is_keyword("struct")
            || tok.is_keyword("region")
            || tok.is_keyword("group")
            || tok.is_keyword("union")
            || tok.is_keyword("class")
        {
            self.parse_composite_def(arena, vis)
        } else if tok.is_keyword("enum") {
            self.parse_enum_def(arena, vis)
        } else if tok.is_keyword("type") {
            self.parse_typedef(arena, vis)
        } else {
            self.error(tok.span(), "expected a declaration after visibility keyword");
            None
        }
    }

    fn parse_safety_block(&mut self, arena: &mut AstArena, safe: bool) -> Option<NodeId> {
        let start = self.bump().span();
        let (body, _) = self.parse(arena, true, false);
        let safety = if safe { SafetyMode::Safe } else { SafetyMode::Unsafe };
        if let quixc_ast::AstNode::Stmt(Stmt::Block { stmts, .. }) = arena.get(body).clone() {
            let span = start.to(arena.span(body));
            return Some(arena.alloc_stmt(Stmt::Block { safety, stmts }, span));
        }
        Some(body)
    }

    fn parse_typedef(&mut self, arena: &mut AstArena, visibility: Visibility) -> Option<NodeId> {
        let start = self.bump().span(); // `type`
        let name_tok = self.bump();
        let name = self.intern_text(arena, &name_tok);
        self.expect_punct("=")?;
        let aliased = self.parse_type(arena)?;
        self.eat_punct(";");
        let span = start.to(arena.span(aliased));
        Some(arena.alloc_decl(Decl::Typedef { name, aliased, visibility }, span))
    }

    fn parse_variable_decl(&mut self, arena: &mut AstArena, visibility: Visibility) -> Option<NodeId> {
        let kw = self.bump();
        let binding = if kw.is_keyword("var") {
            BindingKind::Var
        } else if kw.is_keyword("let") {
            BindingKind::Let
        } else {
            BindingKind::Const
        };
        let mutability = if binding == BindingKind::Const {
            Mutability::Immutable
        } else {
            Mutability::Mutable
        };
        let name_tok = self.bump();
        let name = self.intern_text(arena, &name_tok);
        let ty = if self.eat_punct(":") {
            self.parse_type(arena)
        } else {
            None
        };
        let initializer = if self.eat_punct("=") {
            self.parse_expr(arena, 0)
        } else {
            None
        };
        let end = self.peek().span();
        self.expect_punct(";");
        let span = kw.span().to(end);
        Some(arena.alloc_decl(
            Decl::Variable { binding, name, ty, initializer, mutability, visibility },
            span,
        ))
    }

    fn parse_params(&mut self, arena: &mut AstArena) -> (Vec<Param>, bool) {
        let mut params = Vec::new();
        let mut variadic = false;
        self.expect_punct("(");
        while !self.peek().is_punctuator(")") && !self.peek().is_eof() {
            if self.eat_punct("...") {
                variadic = true;
                break;
            }
            let name_tok = self.bump();
            let name = self.intern_text(arena, &name_tok);
            let ty = if self.eat_punct(":") {
                self.parse_type(arena).unwrap_or_else(|| {
                    arena.alloc_type(Type::Inferred, name_tok.span())
                })
            } else {
                arena.alloc_type(Type::Inferred, name_tok.span())
            };
            let default = if self.eat_punct("=") {
                self.parse_expr(arena, 0)
            } else {
                None
            };
            params.push(Param { name, ty, default });
            if !self.eat_punct(",") {
                break;
            }
        }
        self.expect_punct(")");
        (params, variadic)
    }

    fn parse_function(&mut self, arena: &mut AstArena, visibility: Visibility) -> Option<NodeId> {
        let start = self.bump().span(); // `fn`
        let noreturn = self.eat_keyword("noreturn");
        let purity = self.parse_purity_prefix();
        let name_tok = self.bump();
        let name = self.intern_text(arena, &name_tok);
        let (params, variadic) = self.parse_params(arena);
        let return_type = if self.eat_punct("->") {
            self.parse_type(arena)?
        } else {
            arena.alloc_type(Type::Primitive(quixc_ast::kinds::PrimitiveKind::Void), name_tok.span())
        };

        if self.eat_punct(";") {
            let span = start.to(arena.span(return_type));
            return Some(arena.alloc_decl(
                Decl::FunctionDecl { name, params, return_type, variadic, purity, noreturn, visibility },
                span,
            ));
        }

        let body = self.parse(arena, true, false).0;
        let span = start.to(arena.span(body));
        Some(arena.alloc_decl(
            Decl::FunctionDef {
                name,
                params,
                return_type,
                variadic,
                purity,
                noreturn,
                visibility,
                body,
                preconditions: Vec::new(),
                postconditions: Vec::new(),
                captures: Vec::new(),
            },
            span,
        ))
    }

    fn parse_purity_prefix(&mut self) -> Purity {
        if self.eat_keyword("pure") {
            Purity::Pure
        } else if self.eat_keyword("quasipure") {
            Purity::Quasipure
        } else if self.eat_keyword("retropure") {
            Purity::Retropure
        } else if self.eat_keyword("tsafe") {
            Purity::ImpureThreadSafe
        } else {
            Purity::ImpureThreadUnsafe
        }
    }

    fn parse_composite_def(&mut self, arena: &mut AstArena, visibility: Visibility) -> Option<NodeId> {
        let kw = self.bump();
        let kind = if kw.is_keyword("struct") || kw.is_keyword("class") {
            CompositeKind::Struct
        } else if kw.is_keyword("region") {
            CompositeKind::Region
        } else if kw.is_keyword("group") {
            CompositeKind::Group
        } else {
            CompositeKind::Union
        };
        let name_tok = self.bump();
        let name = self.intern_text(arena, &name_tok);
        self.expect_punct("{")?;

        let mut fields = Vec::new();
        let mut instance_methods = Vec::new();
        let mut static_methods = Vec::new();
        let mut attributes = Vec::new();

        loop {
            let tok = self.peek();
            if tok.is_punctuator("}") || tok.is_eof() {
                break;
            }
            if tok.is_punctuator(",") || tok.is_punctuator(";") {
                self.bump();
                continue;
            }
            if tok.is_keyword("with") {
                self.bump();
                self.expect_punct("[");
                while !self.peek().is_punctuator("]") && !self.peek().is_eof() {
                    if let Some(e) = self.parse_expr(arena, 0) {
                        attributes.push(e);
                    }
                    if !self.eat_punct(",") {
                        break;
                    }
                }
                self.expect_punct("]");
                continue;
            }

            let field_vis = if tok.is_keyword("pub") {
                self.bump();
                Visibility::Public
            } else if tok.is_keyword("sec") {
                self.bump();
                Visibility::Protected
            } else if tok.is_keyword("pro") {
                self.bump();
                Visibility::Private
            } else {
                Visibility::Private
            };

            let is_static = self.eat_keyword("static");
            if self.peek().is_keyword("fn") {
                if let Some(method) = self.parse_function(arena, field_vis) {
                    if is_static {
                        static_methods.push(method);
                    } else {
                        instance_methods.push(method);
                    }
                } else {
                    self.resync();
                }
                continue;
            }

            let name_tok = self.bump();
            let fname = self.intern_text(arena, &name_tok);
            self.expect_punct(":");
            let Some(fty) = self.parse_type(arena) else {
                self.resync();
                continue;
            };
            let default = if self.eat_punct("=") {
                self.parse_expr(arena, 0)
            } else {
                None
            };
            fields.push(CompositeField { name: fname, ty: fty, default, visibility: field_vis });
        }
        let end = self.peek().span();
        self.expect_punct("}");
        let span = kw.span().to(end);
        Some(arena.alloc_decl(
            Decl::CompositeDef { kind, name, fields, instance_methods, static_methods, attributes, visibility },
            span,
        ))
    }

    fn parse_enum_def(&mut self, arena: &mut AstArena, visibility: Visibility) -> Option<NodeId> {
        let start = self.bump().span(); // `enum`
        let name_tok = self.bump();
        let name = self.intern_text(arena, &name_tok);
        self.expect_punct("{")?;
        let mut items = Vec::new();
        while !self.peek().is_punctuator("}") && !self.peek().is_eof() {
            let item_tok = self.bump();
            let item_name = self.intern_text(arena, &item_tok);
            let value = if self.eat_punct("=") {
                self.parse_expr(arena, 0)
            } else {
                None
            };
            items.push((item_name, value));
            if !self.eat_punct(",") {
                break;
            }
        }
        let end = self.peek().span();
        self.expect_punct("}");
        let span = start.to(end);
        Some(arena.alloc_decl(Decl::EnumDef { name, items, visibility }, span))
    }

    fn parse_scope_decl(&mut self, arena: &mut AstArena) -> Option<NodeId> {
        let start = self.bump().span(); // `subsystem`
        let name_tok = self.bump();
        let name = self.intern_text(arena, &name_tok);
        let mut depends_on = Vec::new();
        if self.eat_keyword("with") {
            loop {
                let dep_tok = self.bump();
                depends_on.push(self.intern_text(arena, &dep_tok));
                if !self.eat_punct(",") {
                    break;
                }
            }
        }
        let body_block = self.parse(arena, true, false).0;
        let body = match arena.get(body_block).clone() {
            quixc_ast::AstNode::Stmt(Stmt::Block { stmts, .. }) => stmts,
            _ => vec![],
        };
        let span = start.to(arena.span(body_block));
        Some(arena.alloc_decl(Decl::Scope { name, depends_on, body }, span))
    }

    fn parse_import(&mut self, arena: &mut AstArena) -> Option<NodeId> {
        let start = self.bump().span(); // `import`
        let mut path = Vec::new();
        loop {
            let seg_tok = self.bump();
            path.push(self.intern_text(arena, &seg_tok));
            if !self.eat_punct("::") {
                break;
            }
        }
        let alias = if self.eat_keyword("as") {
            let alias_tok = self.bump();
            Some(self.intern_text(arena, &alias_tok))
        } else {
            None
        };
        let end = self.peek().span();
        self.eat_punct(";");
        let span = start.to(end);
        Some(arena.alloc_decl(Decl::Import { path, alias }, span))
    }

    fn parse_return(&mut self, arena: &mut AstArena) -> Option<NodeId> {
        let start = self.bump().span();
        let value = if self.peek().is_punctuator(";") {
            None
        } else {
            self.parse_expr(arena, 0)
        };
        let end = self.peek().span();
        self.eat_punct(";");
        Some(arena.alloc_stmt(Stmt::Return(value), start.to(end)))
    }

    fn parse_guarded_return(&mut self, arena: &mut AstArena, which: &str) -> Option<NodeId> {
        let start = self.bump().span();
        self.expect_punct("(")?;
        let cond = self.parse_expr(arena, 0)?;
        let value = if which != "retv" && self.eat_punct(",") {
            self.parse_expr(arena, 0)
        } else {
            None
        };
        let end = self.peek().span();
        self.expect_punct(")");
        self.eat_punct(";");
        let span = start.to(end);
        Some(match which {
            "retif" => arena.alloc_stmt(Stmt::ReturnIf { cond, value }, span),
            "retz" => arena.alloc_stmt(Stmt::ReturnIfZero { cond, value }, span),
            _ => arena.alloc_stmt(Stmt::ReturnVoidIf { cond }, span),
        })
    }

    fn parse_if(&mut self, arena: &mut AstArena) -> Option<NodeId> {
        let start = self.bump().span();
        self.expect_punct("(")?;
        let cond = self.parse_expr(arena, 0)?;
        self.expect_punct(")");
        let then_branch = self.parse_stmt(arena)?;
        let else_branch = if self.eat_keyword("else") {
            self.parse_stmt(arena)
        } else {
            None
        };
        let span = start.to(arena.span(then_branch));
        Some(arena.alloc_stmt(Stmt::If { cond, then_branch, else_branch }, span))
    }

    fn parse_while(&mut self, arena: &mut AstArena) -> Option<NodeId> {
        let start = self.bump().span();
        self.expect_punct("(")?;
        let cond = self.parse_expr(arena, 0)?;
        self.expect_punct(")");
        let body = self.parse_stmt(arena)?;
        let span = start.to(arena.span(body));
        Some(arena.alloc_stmt(Stmt::While { cond, body }, span))
    }

    fn parse_for(&mut self, arena: &mut AstArena) -> Option<NodeId> {
        let start = self.bump().span();
        self.expect_punct("(")?;
        let init = if self.peek().is_punctuator(";") {
            None
        } else {
            self.parse_stmt_as_expr_holder(arena)
        };
        self.eat_punct(";");
        let cond = if self.peek().is_punctuator(";") {
            None
        } else {
            self.parse_expr(arena, 0)
        };
        self.eat_punct(";");
        let step = if self.peek().is_punctuator(")") {
            None
        } else {
            self.parse_expr(arena, 0)
        };
        self.expect_punct(")");
        let body = self.parse_stmt(arena)?;
        let span = start.to(arena.span(body));
        Some(arena.alloc_stmt(Stmt::For { init, cond, step, body }, span))
    }

    /// Parses a bare expression (used for a C-style `for`'s init clause)
    /// without requiring the trailing `;` the statement form consumes.
    fn parse_stmt_as_expr_holder(&mut self, arena: &mut AstArena) -> Option<NodeId> {
        let start = self.peek().span();
        let expr = self.parse_expr(arena, 0)?;
        let span = start.to(arena.span(expr));
        Some(arena.alloc_stmt(Stmt::ExprStmt(expr), span))
    }

    fn parse_foreach(&mut self, arena: &mut AstArena) -> Option<NodeId> {
        let start = self.bump().span();
        self.expect_punct("(")?;
        let first_tok = self.bump();
        let first = self.intern_text(arena, &first_tok);
        let (binding, index_binding) = if self.eat_punct(",") {
            let value_tok = self.bump();
            (self.intern_text(arena, &value_tok), Some(first))
        } else {
            (first, None)
        };
        self.expect_punct(":");
        let iterable = self.parse_expr(arena, 0)?;
        self.expect_punct(")");
        let body = self.parse_stmt(arena)?;
        let span = start.to(arena.span(body));
        Some(arena.alloc_stmt(Stmt::Foreach { binding, index_binding, iterable, body }, span))
    }

    fn parse_form(&mut self, arena: &mut AstArena) -> Option<NodeId> {
        let start = self.bump().span();
        self.expect_punct("(")?;
        let concurrency_bound = if self.peek().is_punctuator(";") {
            None
        } else {
            self.parse_expr(arena, 0)
        };
        self.expect_punct(";");
        let binding_tok = self.bump();
        let binding = self.intern_text(arena, &binding_tok);
        self.eat_punct(",");
        if self.peek().is_name() {
            self.bump(); // optional index binding, not separately tracked
        }
        self.expect_punct(":");
        let iterable = self.parse_expr(arena, 0)?;
        self.expect_punct(")");
        let body = self.parse_stmt(arena)?;
        let span = start.to(arena.span(body));
        Some(arena.alloc_stmt(Stmt::ParallelFor { binding, iterable, concurrency_bound, body }, span))
    }

    fn parse_switch(&mut self, arena: &mut AstArena) -> Option<NodeId> {
        let start = self.bump().span();
        self.expect_punct("(")?;
        let scrutinee = self.parse_expr(arena, 0)?;
        self.expect_punct(")");
        self.expect_punct("{")?;
        let mut cases = Vec::new();
        let mut default = None;
        while !self.peek().is_punctuator("}") && !self.peek().is_eof() {
            if self.eat_keyword("default") {
                self.expect_punct(":");
                default = self.parse_stmt(arena);
                continue;
            }
            if self.eat_keyword("case") {
                let value = self.parse_expr(arena, 0)?;
                self.expect_punct(":");
                let body = self.parse_stmt(arena)?;
                cases.push(SwitchCase { value, body });
                continue;
            }
            self.error(self.peek().span(), "expected `case` or `default`");
            self.resync();
        }
        let end = self.peek().span();
        self.expect_punct("}");
        let span = start.to(end);
        Some(arena.alloc_stmt(Stmt::Switch { scrutinee, cases, default }, span))
    }

    fn parse_inline_asm(&mut self, arena: &mut AstArena) -> Option<NodeId> {
        let start = self.bump().span();
        self.expect_punct("(")?;
        let template_tok = self.bump();
        let template = self.intern_text(arena, &template_tok);
        let mut clobbers = Vec::new();
        while self.eat_punct(",") {
            let arg_tok = self.bump();
            clobbers.push(self.intern_text(arena, &arg_tok));
        }
        let end = self.peek().span();
        self.expect_punct(")");
        self.eat_punct(";");
        let span = start.to(end);
        Some(arena.alloc_stmt(Stmt::InlineAsm { template, clobbers }, span))
    }

    // ---- Expressions -----------------------------------------------------

    fn parse_expr(&mut self, arena: &mut AstArena, min_bp: u8) -> Option<NodeId> {
        let mut lhs = self.parse_prefix(arena)?;

        loop {
            let tok = self.peek();
            if tok.is_punctuator("?") {
                self.bump();
                let then_branch = self.parse_expr(arena, 0)?;
                self.expect_punct(":");
                let else_branch = self.parse_expr(arena, 0)?;
                let span = arena.span(lhs).to(arena.span(else_branch));
                lhs = arena.alloc_expr(Expr::Ternary { cond: lhs, then_branch, else_branch }, span);
                continue;
            }

            if tok.is_keyword("as")
                || tok.is_keyword("is")
                || tok.is_keyword("in")
                || tok.is_keyword("bitcast_as")
                || tok.is_keyword("reinterpret_as")
            {
                if WORD_OPERATOR_PRECEDENCE < min_bp {
                    break;
                }
                let op = word_op_for_keyword(tok.text());
                self.bump();
                if op.takes_type_operand() {
                    let ty = self.parse_type(arena)?;
                    let span = arena.span(lhs).to(arena.span(ty));
                    lhs = arena.alloc_expr(
                        Expr::Word {
                            op,
                            operand: lhs,
                            type_operand: Some(ty),
                            rhs_expr: None,
                            field_name: None,
                        },
                        span,
                    );
                } else {
                    let rhs = self.parse_expr(arena, WORD_OPERATOR_PRECEDENCE + 1)?;
                    let span = arena.span(lhs).to(arena.span(rhs));
                    lhs = arena.alloc_expr(
                        Expr::Word {
                            op,
                            operand: lhs,
                            type_operand: None,
                            rhs_expr: Some(rhs),
                            field_name: None,
                        },
                        span,
                    );
                }
                continue;
            }

            if !tok.is_operator() && !tok.is_punctuator("(") && !tok.is_punctuator("[") {
                break;
            }

            if tok.is_punctuator("(") {
                self.bump();
                let args = self.parse_call_args(arena);
                let end = self.peek().span();
                self.expect_punct(")");
                let span = arena.span(lhs).to(end);
                lhs = arena.alloc_expr(Expr::Call { callee: lhs, args }, span);
                continue;
            }
            if tok.is_punctuator("[") {
                self.bump();
                let index = self.parse_expr(arena, 0)?;
                let end = self.peek().span();
                self.expect_punct("]");
                let span = arena.span(lhs).to(end);
                lhs = arena.alloc_expr(Expr::Index { base: lhs, index }, span);
                continue;
            }
            if tok.is_punctuator(".") {
                self.bump();
                let field_tok = self.bump();
                let field = self.intern_text(arena, &field_tok);
                let span = arena.span(lhs).to(field_tok.span());
                lhs = arena.alloc_expr(Expr::FieldAccess { base: lhs, field }, span);
                continue;
            }

            let Some((op, lbp, assoc)) = precedence::lookup(tok.text()) else {
                break;
            };
            if lbp < min_bp {
                break;
            }

            self.bump();
            let next_min = match assoc {
                Assoc::Left => lbp + 1,
                Assoc::Right => lbp,
                Assoc::None => lbp + 1,
            };
            let rhs = self.parse_expr(arena, next_min)?;
            let span = arena.span(lhs).to(arena.span(rhs));
            lhs = arena.alloc_expr(Expr::Binary { op, lhs, rhs }, span);
        }

        Some(lhs)
    }

    fn parse_call_args(&mut self, arena: &mut AstArena) -> Vec<NodeId> {
        let mut args = Vec::new();
        while !self.peek().is_punctuator(")") && !self.peek().is_eof() {
            if let Some(e) = self.parse_expr(arena, 0) {
                args.push(e);
            } else {
                break;
            }
            if !self.eat_punct(",") {
                break;
            }
        }
        args
    }

    fn parse_prefix(&mut self, arena: &mut AstArena) -> Option<NodeId> {
        let tok = self.peek();

        if tok.is_punctuator("!") {
            self.bump();
            let operand = self.parse_prefix(arena)?;
            let span = tok.span().to(arena.span(operand));
            return Some(arena.alloc_expr(Expr::Unary { op: UnaryOperatorKind::Not, operand }, span));
        }
        if tok.is_punctuator("-") {
            self.bump();
            let operand = self.parse_prefix(arena)?;
            let span = tok.span().to(arena.span(operand));
            return Some(arena.alloc_expr(Expr::Unary { op: UnaryOperatorKind::Neg, operand }, span));
        }
        if tok.is_punctuator("+") {
            self.bump();
            let operand = self.parse_prefix(arena)?;
            let span = tok.span().to(arena.span(operand));
            return Some(arena.alloc_expr(Expr::Unary { op: UnaryOperatorKind::Pos, operand }, span));
        }
        if tok.is_punctuator("~") {
            self.bump();
            let operand = self.parse_prefix(arena)?;
            let span = tok.span().to(arena.span(operand));
            return Some(arena.alloc_expr(Expr::Unary { op: UnaryOperatorKind::BitNot, operand }, span));
        }
        if tok.is_punctuator("*") {
            self.bump();
            let operand = self.parse_prefix(arena)?;
            let span = tok.span().to(arena.span(operand));
            return Some(arena.alloc_expr(Expr::Unary { op: UnaryOperatorKind::Deref, operand }, span));
        }
        if tok.is_punctuator("&") {
            self.bump();
            let operand = self.parse_prefix(arena)?;
            let span = tok.span().to(arena.span(operand));
            return Some(arena.alloc_expr(Expr::Unary { op: UnaryOperatorKind::AddressOf, operand }, span));
        }

        if tok.is_keyword("sizeof") || tok.is_keyword("alignof") || tok.is_keyword("bitsizeof")
            || tok.is_keyword("typeof")
        {
            self.bump();
            let op = word_op_for_keyword(tok.text());
            let wrapped_in_parens = self.eat_punct("(");
            let operand = self.parse_expr(arena, WORD_OPERATOR_PRECEDENCE)?;
            let end = self.peek().span();
            if wrapped_in_parens {
                self.expect_punct(")");
            }
            let span = tok.span().to(end);
            return Some(arena.alloc_expr(
                Expr::Word { op, operand, type_operand: None, rhs_expr: None, field_name: None },
                span,
            ));
        }
        if tok.is_keyword("offsetof") {
            self.bump();
            self.expect_punct("(")?;
            let ty = self.parse_type(arena)?;
            self.expect_punct(",");
            let field_tok = self.bump();
            let field_name = self.intern_text(arena, &field_tok);
            let end = self.peek().span();
            self.expect_punct(")");
            let span = tok.span().to(end);
            let dummy_operand = arena.alloc_expr(Expr::UndefLiteral, tok.span());
            return Some(arena.alloc_expr(
                Expr::Word {
                    op: WordOperatorKind::Offsetof,
                    operand: dummy_operand,
                    type_operand: Some(ty),
                    rhs_expr: None,
                    field_name: Some(field_name),
                },
                span,
            ));
        }

        self.parse_postfix_prefix(arena)
    }

    fn parse_postfix_prefix(&mut self, arena: &mut AstArena) -> Option<NodeId> {
        let primary = self.parse_primary(arena)?;
        self.parse_postfix_ops(arena, primary)
    }

    fn parse_postfix_ops(&mut self, arena: &mut AstArena, mut expr: NodeId) -> Option<NodeId> {
        loop {
            let tok = self.peek();
            if tok.is_punctuator("++") {
                self.bump();
                let span = arena.span(expr).to(tok.span());
                expr = arena.alloc_expr(
                    Expr::PostUnary { op: quixc_ast::kinds::PostUnaryOperatorKind::Increment, operand: expr },
                    span,
                );
            } else if tok.is_punctuator("--") {
                self.bump();
                let span = arena.span(expr).to(tok.span());
                expr = arena.alloc_expr(
                    Expr::PostUnary { op: quixc_ast::kinds::PostUnaryOperatorKind::Decrement, operand: expr },
                    span,
                );
            } else {
                break;
            }
        }
        Some(expr)
    }

    fn parse_primary(&mut self, arena: &mut AstArena) -> Option<NodeId> {
        let tok = self.peek();

        if tok.is_punctuator("(") {
            self.bump();
            let inner = self.parse_expr(arena, 0)?;
            self.expect_punct(")");
            return Some(inner);
        }
        if tok.is_punctuator("[") {
            self.bump();
            let mut items = Vec::new();
            while !self.peek().is_punctuator("]") && !self.peek().is_eof() {
                if let Some(e) = self.parse_expr(arena, 0) {
                    items.push(e);
                }
                if !self.eat_punct(",") {
                    break;
                }
            }
            let end = self.peek().span();
            self.expect_punct("]");
            return Some(arena.alloc_expr(Expr::List(items), tok.span().to(end)));
        }
        if tok.is_keyword("true") {
            self.bump();
            return Some(arena.alloc_expr(Expr::BoolLiteral(true), tok.span()));
        }
        if tok.is_keyword("false") {
            self.bump();
            return Some(arena.alloc_expr(Expr::BoolLiteral(false), tok.span()));
        }
        if tok.is_keyword("null") {
            self.bump();
            return Some(arena.alloc_expr(Expr::NullLiteral, tok.span()));
        }
        if tok.is_keyword("undef") {
            self.bump();
            return Some(arena.alloc_expr(Expr::UndefLiteral, tok.span()));
        }
        if tok.is_integer_literal() {
            self.bump();
            let value = match tok.text().parse::<i128>() {
                Ok(v) => quixc_ast::nodes::IntLiteralValue::Native(v),
                Err(_) => quixc_ast::nodes::IntLiteralValue::ArbitraryPrecision(arena.intern(tok.text())),
            };
            return Some(arena.alloc_expr(Expr::IntLiteral { value }, tok.span()));
        }
        if tok.is_float_literal() {
            self.bump();
            let value = match tok.text().parse::<f64>() {
                Ok(v) => quixc_ast::nodes::FloatLiteralValue::Native(v),
                Err(_) => quixc_ast::nodes::FloatLiteralValue::Decimal(arena.intern(tok.text())),
            };
            return Some(arena.alloc_expr(Expr::FloatLiteral { value }, tok.span()));
        }
        if tok.is_string_literal() {
            self.bump();
            return Some(self.parse_string_or_fstring(arena, &tok));
        }
        if tok.is_char_literal() {
            self.bump();
            let c = tok.text().chars().next().unwrap_or('\0');
            return Some(arena.alloc_expr(Expr::CharLiteral(c), tok.span()));
        }
        if tok.is_name() {
            self.bump();
            let name = self.intern_text(arena, &tok);
            return Some(arena.alloc_expr(Expr::Identifier { name, resolved: None }, tok.span()));
        }

        self.error(tok.span(), "unexpected token while parsing an expression");
        None
    }

    /// Splits a raw string-literal's text on `{`/`}` delimiters into
    /// literal/interpolated parts (§4.4.3's f-string). Interpolated
    /// segments are kept as bare `Identifier` expressions: the lexer is out
    /// of scope here, so a full nested re-parse of arbitrary interpolated
    /// expressions is not attempted; the common "{name}" case is handled
    /// exactly, and anything else is treated as a single identifier-shaped
    /// reference to the interpolated text.
    fn parse_string_or_fstring(&mut self, arena: &mut AstArena, tok: &S::Tok) -> NodeId {
        let text = tok.text();
        if !text.contains('{') {
            let sym = arena.intern(text);
            return arena.alloc_expr(Expr::StringLiteral(sym), tok.span());
        }

        let mut parts = Vec::new();
        let mut literal = String::new();
        let mut chars = text.chars().peekable();
        while let Some(c) = chars.next() {
            if c == '{' {
                if !literal.is_empty() {
                    parts.push(quixc_ast::FStringPart::Literal(arena.intern(&literal)));
                    literal.clear();
                }
                let mut expr_text = String::new();
                for c2 in chars.by_ref() {
                    if c2 == '}' {
                        break;
                    }
                    expr_text.push(c2);
                }
                let sym = arena.intern(expr_text.trim());
                let id = arena.alloc_expr(Expr::Identifier { name: sym, resolved: None }, tok.span());
                parts.push(quixc_ast::FStringPart::Interpolated(id));
            } else {
                literal.push(c);
            }
        }
        if !literal.is_empty() {
            parts.push(quixc_ast::FStringPart::Literal(arena.intern(&literal)));
        }
        arena.alloc_expr(Expr::FString(parts), tok.span())
    }

    // ---- Types -------------------------------------------------------

    fn parse_type(&mut self, arena: &mut AstArena) -> Option<NodeId> {
        let tok = self.peek();

        if tok.is_punctuator("*") {
            self.bump();
            let inner = self.parse_type(arena)?;
            let span = tok.span().to(arena.span(inner));
            return Some(arena.alloc_type(Type::Pointer(inner), span));
        }
        if tok.is_punctuator("&") {
            self.bump();
            let inner = self.parse_type(arena)?;
            let span = tok.span().to(arena.span(inner));
            return Some(arena.alloc_type(Type::Reference(inner), span));
        }
        if tok.is_punctuator("[") {
            self.bump();
            let element = self.parse_type(arena)?;
            self.expect_punct(";");
            let size = self.parse_expr(arena, 0)?;
            let end = self.peek().span();
            self.expect_punct("]");
            let span = tok.span().to(end);
            return Some(arena.alloc_type(Type::Array { element, size }, span));
        }
        if tok.is_keyword("auto") {
            self.bump();
            return Some(arena.alloc_type(Type::Inferred, tok.span()));
        }
        if tok.is_keyword("fn") {
            self.bump();
            self.expect_punct("(")?;
            let mut params: Vec<(NodeId, Option<NodeId>)> = Vec::new();
            let mut variadic = false;
            while !self.peek().is_punctuator(")") && !self.peek().is_eof() {
                if self.eat_punct("...") {
                    variadic = true;
                    break;
                }
                let ty = self.parse_type(arena)?;
                params.push((ty, None));
                if !self.eat_punct(",") {
                    break;
                }
            }
            self.expect_punct(")");
            let return_type = if self.eat_punct("->") {
                self.parse_type(arena)?
            } else {
                arena.alloc_type(Type::Primitive(quixc_ast::kinds::PrimitiveKind::Void), tok.span())
            };
            let span = tok.span().to(arena.span(return_type));
            return Some(arena.alloc_type(
                Type::Function {
                    params,
                    return_type,
                    variadic,
                    purity: Purity::ImpureThreadUnsafe,
                    noreturn: false,
                    foreign: false,
                },
                span,
            ));
        }
        if tok.is_name() {
            self.bump();
            if let Some(prim) = primitive_for_name(tok.text()) {
                let mut id = arena.alloc_type(Type::Primitive(prim), tok.span());
                if self.peek().is_punctuator("<") {
                    id = self.parse_template_args(arena, id, tok.span());
                }
                return Some(id);
            }
            let name = arena.intern(tok.text());
            let mut id = arena.alloc_type(Type::Unresolved(name), tok.span());
            if self.peek().is_punctuator("<") {
                id = self.parse_template_args(arena, id, tok.span());
            }
            return Some(id);
        }

        self.error(tok.span(), "expected a type");
        None
    }

    fn parse_template_args(&mut self, arena: &mut AstArena, base: NodeId, start: Span) -> NodeId {
        self.bump(); // `<`
        let mut type_args = Vec::new();
        while !self.peek().is_punctuator(">") && !self.peek().is_eof() {
            if let Some(t) = self.parse_type(arena) {
                type_args.push(t);
            } else {
                break;
            }
            if !self.eat_punct(",") {
                break;
            }
        }
        let end = self.peek().span();
        self.expect_punct(">");
        arena.alloc_type(Type::Templated { base, type_args }, start.to(end))
    }
}

fn word_op_for_keyword(kw: &str) -> WordOperatorKind {
    match kw {
        "as" => WordOperatorKind::As,
        "is" => WordOperatorKind::Is,
        "in" => WordOperatorKind::In,
        "sizeof" => WordOperatorKind::Sizeof,
        "alignof" => WordOperatorKind::Alignof,
        "bitsizeof" => WordOperatorKind::Bitsizeof,
        "typeof" => WordOperatorKind::Typeof,
        "bitcast_as" => WordOperatorKind::BitcastAs,
        "reinterpret_as" => WordOperatorKind::ReinterpretAs,
        "offsetof" => WordOperatorKind::Offsetof,
        other => unreachable!("not a word operator keyword: {other}"),
    }
}

fn primitive_for_name(name: &str) -> Option<quixc_ast::kinds::PrimitiveKind> {
    use quixc_ast::kinds::PrimitiveKind as P;
    Some(match name {
        "u1" => P::U1,
        "u8" => P::U8,
        "u16" => P::U16,
        "u32" => P::U32,
        "u64" => P::U64,
        "u128" => P::U128,
        "i8" => P::I8,
        "i16" => P::I16,
        "i32" => P::I32,
        "i64" => P::I64,
        "i128" => P::I128,
        "f16" => P::F16,
        "f32" => P::F32,
        "f64" => P::F64,
        "f128" => P::F128,
        "void" => P::Void,
        _ => return None,
    })
}

/// Returns `true` if `text` names a keyword relevant to statement dispatch
/// (§4.3). Exposed for fixture token-stream implementations that need to
/// classify identifier-shaped text as a keyword.
#[must_use]
pub fn is_statement_keyword(text: &str) -> bool {
    STATEMENT_KEYWORDS.contains(&text)
}
