//! Parser for Carlo.
//!
//! A recursive-descent parser with precedence climbing for expressions. It
//! drains a token queue produced by the [`Lexer`](crate::lexer::Lexer) and
//! runs in one of two modes:
//!
//! - **build** mode returns the [`Program`] when the whole parse succeeded;
//! - **highlight** mode never returns a tree, only highlights and errors.
//!
//! Both modes always collect highlights and errors. A parse error never
//! stops the parser: it records the error at the current token, usually
//! eats that token, and carries on, so one pass reports every error.

use std::collections::VecDeque;
use std::rc::Rc;

use crate::ast::{
    ActorDef, ArithmeticOp, Block, ComparisonOp, CreateTarget, Expression, Identifier, LogicalOp,
    Program, SendPayload, Statement, TupleHandler,
};
use crate::diagnostic::{ParseError, ParseErrorCode};
use crate::highlight::{Highlight, HighlightStyle};
use crate::lexer::lex_source;
use crate::span::Span;
use crate::token::{Token, TokenKind};

/// Everything a parse produces.
#[derive(Debug, Default)]
pub struct ParseOutput {
    /// The tree, in build mode when parsing succeeded.
    pub program: Option<Program>,
    /// Highlight spans in token order.
    pub highlights: Vec<Highlight>,
    /// Parse errors in source order.
    pub errors: Vec<ParseError>,
}

impl ParseOutput {
    /// Returns true if no parse error was reported.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Infix operator classes, by the action the climbing loop takes.
#[derive(Clone, Copy)]
enum Infix {
    Comparison(ComparisonOp),
    Logical(LogicalOp),
    Arithmetic(ArithmeticOp),
    With,
    Unsupported,
}

/// Parser for Carlo token streams.
pub struct Parser {
    tokens: VecDeque<Token>,
    build_tree: bool,
    highlights: Vec<Highlight>,
    errors: Vec<ParseError>,
}

impl Parser {
    /// Creates a parser over `tokens`. `build_tree` selects build mode.
    #[must_use]
    pub fn new(tokens: VecDeque<Token>, build_tree: bool) -> Self {
        Self {
            tokens,
            build_tree,
            highlights: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Parses every token.
    #[must_use]
    pub fn parse(mut self) -> ParseOutput {
        let mut actors = Vec::new();
        let mut ok = true;
        let mut first = true;

        while let Some(kind) = self.peek() {
            match kind {
                TokenKind::Actor => {
                    let span = self.keyword(HighlightStyle::Keyword);
                    match self.actor(first, span) {
                        Some(actor) => {
                            actors.push(actor);
                            first = false;
                        }
                        None => ok = false,
                    }
                }
                TokenKind::Note => {
                    self.keyword(HighlightStyle::Note);
                }
                TokenKind::Eol => {
                    self.eat();
                }
                _ => ok &= self.fail(ParseErrorCode::ExpectedActor),
            }
        }

        tracing::debug!(
            actors = actors.len(),
            errors = self.errors.len(),
            build_tree = self.build_tree,
            "parsed program"
        );

        let program = (ok && self.build_tree).then(|| Program { actors });
        ParseOutput {
            program,
            highlights: self.highlights,
            errors: self.errors,
        }
    }

    // -------------------------------------------------------------------------
    // Token helpers
    // -------------------------------------------------------------------------

    fn peek(&self) -> Option<&TokenKind> {
        self.tokens.front().map(|token| &token.kind)
    }

    fn peek_is(&self, kind: &TokenKind) -> bool {
        self.peek() == Some(kind)
    }

    fn peek_is_word(&self) -> bool {
        matches!(self.peek(), Some(TokenKind::Word(_)))
    }

    fn front_span(&self) -> Span {
        self.tokens.front().map(|token| token.span).unwrap_or_default()
    }

    /// Pops the next token, colouring it plain unless it already has a
    /// highlight.
    fn eat(&mut self) -> Option<Token> {
        let span = self.tokens.front()?.span;
        let coloured = self
            .highlights
            .last()
            .is_some_and(|highlight| highlight.span.starts_with(&span));
        if !coloured {
            self.highlight(HighlightStyle::Plain);
        }
        self.tokens.pop_front()
    }

    /// Colours the next token. Zero-length tokens are never coloured.
    fn highlight(&mut self, style: HighlightStyle) {
        if let Some(token) = self.tokens.front() {
            if !token.span.is_empty() {
                self.highlights.push(Highlight::new(token.span, style));
            }
        }
    }

    /// Colours and eats a keyword, returning its span.
    fn keyword(&mut self, style: HighlightStyle) -> Span {
        let span = self.front_span();
        self.highlight(style);
        self.eat();
        span
    }

    /// Records an error at the next token, if there is one.
    fn error(&mut self, code: ParseErrorCode) {
        let Some(token) = self.tokens.front() else {
            return;
        };
        let error = ParseError {
            code,
            span: token.span,
            found: token.kind.clone(),
        };
        tracing::debug!(%error, "parse error");
        self.highlight(HighlightStyle::Error);
        self.errors.push(error);
    }

    /// Records an error and eats the offending token. Always false.
    fn fail(&mut self, code: ParseErrorCode) -> bool {
        self.error(code);
        self.eat();
        false
    }

    fn take_word(&mut self) -> Option<String> {
        if self.peek_is_word() {
            self.eat().and_then(|token| token.kind.into_text())
        } else {
            None
        }
    }

    fn take_identifier(&mut self) -> Option<Identifier> {
        let span = self.front_span();
        self.take_word().map(|name| Identifier::new(name, span))
    }

    /// Eats `kind` if it is next; otherwise reports `code` and eats
    /// whatever is there instead.
    fn expect(&mut self, kind: &TokenKind, style: HighlightStyle, code: ParseErrorCode) -> bool {
        if self.peek_is(kind) {
            self.highlight(style);
            self.eat();
            true
        } else {
            self.fail(code)
        }
    }

    fn expect_eol(&mut self) -> bool {
        self.expect(&TokenKind::Eol, HighlightStyle::Plain, ParseErrorCode::ExpectedEol)
    }

    fn expect_end(&mut self) -> bool {
        self.expect(&TokenKind::End, HighlightStyle::Keyword, ParseErrorCode::ExpectedEnd)
    }

    /// A word, or `code` if there is none.
    fn word_or(&mut self, code: ParseErrorCode, ok: &mut bool) -> String {
        self.take_word().unwrap_or_else(|| {
            *ok &= self.fail(code);
            String::new()
        })
    }

    /// An expression, clearing `ok` on failure.
    fn operand(&mut self, ok: &mut bool) -> Option<Expression> {
        let expression = self.expression(0);
        *ok &= expression.is_some();
        expression
    }

    // -------------------------------------------------------------------------
    // Actors and handlers
    // -------------------------------------------------------------------------

    fn actor(&mut self, first: bool, span: Span) -> Option<ActorDef> {
        tracing::trace!("parsing actor");
        let mut ok = true;

        let name = match self.take_word() {
            Some(name) => name,
            None => {
                if !first {
                    ok &= self.fail(ParseErrorCode::ExpectedActorName);
                }
                String::new()
            }
        };
        ok &= self.expect_eol();

        let mut handlers = Vec::new();
        while let Some(kind) = self.peek() {
            match kind {
                TokenKind::Receives => {
                    let span = self.keyword(HighlightStyle::Linda);
                    match self.tuple_handler(span) {
                        Some(handler) => handlers.push(Rc::new(handler)),
                        None => ok = false,
                    }
                }
                TokenKind::Note => {
                    self.keyword(HighlightStyle::Note);
                }
                TokenKind::Eol => {
                    self.eat();
                }
                TokenKind::End => {
                    self.keyword(HighlightStyle::Keyword);
                    break;
                }
                _ => ok &= self.fail(ParseErrorCode::ExpectedReceives),
            }
        }

        ok.then(|| ActorDef {
            name,
            handlers,
            span,
        })
    }

    fn tuple_handler(&mut self, span: Span) -> Option<TupleHandler> {
        tracing::trace!("parsing tuple handler");
        let mut ok = true;

        let tuple_type = match self.peek() {
            Some(TokenKind::Word(_) | TokenKind::Quoted(_)) => self
                .eat()
                .and_then(|token| token.kind.into_text())
                .unwrap_or_default(),
            _ => {
                ok &= self.fail(ParseErrorCode::ExpectedTupleType);
                String::new()
            }
        };

        let mut source_actor = String::new();
        if self.peek_is(&TokenKind::From) {
            self.keyword(HighlightStyle::Linda);
            source_actor = self.word_or(ParseErrorCode::ExpectedSourceActorName, &mut ok);
        }

        let mut alias = String::new();
        if self.peek_is(&TokenKind::As) {
            self.keyword(HighlightStyle::Linda);
            alias = self.word_or(ParseErrorCode::ExpectedTupleAlias, &mut ok);
        }

        let mut condition = None;
        if self.peek_is(&TokenKind::Where) {
            self.keyword(HighlightStyle::Linda);
            condition = self.operand(&mut ok);
        }

        ok &= self.expect_eol();
        let block = self.block();
        ok &= self.expect_end();

        let block = block?;
        ok.then(|| TupleHandler {
            tuple_type,
            source_actor,
            alias,
            condition,
            block,
            span,
        })
    }

    // -------------------------------------------------------------------------
    // Statements
    // -------------------------------------------------------------------------

    /// Statements up to (not including) `end`, `else`, or the end of input.
    fn block(&mut self) -> Option<Block> {
        let span = self.front_span();
        let mut statements = Vec::new();
        let mut ok = true;

        while let Some(kind) = self.peek() {
            let statement = match kind {
                TokenKind::End | TokenKind::Else => break,
                TokenKind::Sends => {
                    let span = self.keyword(HighlightStyle::Linda);
                    self.sends(span)
                }
                TokenKind::If => {
                    let span = self.keyword(HighlightStyle::Keyword);
                    self.if_statement(span)
                }
                TokenKind::Makes => {
                    let span = self.keyword(HighlightStyle::Keyword);
                    self.makes(span)
                }
                TokenKind::Creates => {
                    let span = self.keyword(HighlightStyle::Keyword);
                    self.creates(span)
                }
                TokenKind::Each => {
                    let span = self.keyword(HighlightStyle::Keyword);
                    self.each(span)
                }
                TokenKind::While => {
                    let span = self.keyword(HighlightStyle::Keyword);
                    self.while_statement(span)
                }
                TokenKind::Stop => {
                    let span = self.keyword(HighlightStyle::Keyword);
                    Some(Statement::Stop { span })
                }
                TokenKind::Note => {
                    self.keyword(HighlightStyle::Note);
                    continue;
                }
                TokenKind::Eol => {
                    self.eat();
                    continue;
                }
                _ => {
                    ok &= self.fail(ParseErrorCode::ExpectedStatement);
                    continue;
                }
            };

            match statement {
                Some(statement) => statements.push(statement),
                None => ok = false,
            }
        }

        ok.then_some(Block { statements, span })
    }

    fn sends(&mut self, span: Span) -> Option<Statement> {
        let mut ok = true;

        let mut destination_actor = None;
        if self.peek_is(&TokenKind::To) {
            self.keyword(HighlightStyle::Linda);
            destination_actor = self.operand(&mut ok);
        }

        let mut destination_id = None;
        if self.peek_is(&TokenKind::On) {
            self.keyword(HighlightStyle::Linda);
            destination_id = self.operand(&mut ok);
        }

        let payload = match self.peek() {
            Some(TokenKind::Tuple) => {
                self.keyword(HighlightStyle::Linda);
                let name = self.word_or(ParseErrorCode::ExpectedTupleName, &mut ok);
                Some(SendPayload::Named(name))
            }
            Some(TokenKind::Word(_)) => {
                let tuple_type = self.take_word().unwrap_or_default();
                let fields = self.fields(true, &mut ok);
                Some(SendPayload::Literal { tuple_type, fields })
            }
            _ => {
                ok &= self.fail(ParseErrorCode::ExpectedTupleOrTupleType);
                None
            }
        };

        let payload = payload.filter(|_| ok)?;
        Some(Statement::Sends {
            destination_actor,
            destination_id,
            payload,
            span,
        })
    }

    /// `key expr` pairs up to the end of the line.
    fn fields(&mut self, highlight_keys: bool, ok: &mut bool) -> Vec<(String, Expression)> {
        let mut fields: Vec<(String, Expression)> = Vec::new();
        while !matches!(self.peek(), None | Some(TokenKind::Eol)) {
            let key = if self.peek_is_word() {
                if highlight_keys {
                    self.highlight(HighlightStyle::TupleKey);
                }
                self.take_word().unwrap_or_default()
            } else {
                *ok &= self.fail(ParseErrorCode::ExpectedValueName);
                String::new()
            };

            if let Some(expression) = self.operand(ok) {
                match fields.iter_mut().find(|(existing, _)| *existing == key) {
                    Some(slot) => slot.1 = expression,
                    None => fields.push((key, expression)),
                }
            }
        }
        fields
    }

    fn if_statement(&mut self, span: Span) -> Option<Statement> {
        let mut ok = true;

        let condition = self.operand(&mut ok);
        ok &= self.expect_eol();
        let then_block = self.block();
        ok &= then_block.is_some();

        let mut else_block = None;
        if self.peek_is(&TokenKind::Else) {
            self.keyword(HighlightStyle::Keyword);
            ok &= self.expect_eol();
            else_block = self.block();
            ok &= else_block.is_some();
        }

        ok &= self.expect_end();

        let (Some(condition), Some(then_block)) = (condition, then_block) else {
            return None;
        };
        ok.then_some(Statement::If {
            condition,
            then_block,
            else_block,
            span,
        })
    }

    fn makes(&mut self, span: Span) -> Option<Statement> {
        let mut ok = true;

        let target = self.take_identifier();
        if target.is_none() {
            ok &= self.fail(ParseErrorCode::ExpectedValueName);
        }
        let value = self.operand(&mut ok);

        let (Some(target), Some(value)) = (target, value) else {
            return None;
        };
        ok.then_some(Statement::Makes {
            target,
            value,
            span,
        })
    }

    fn creates(&mut self, span: Span) -> Option<Statement> {
        let mut ok = true;

        let target = match self.peek() {
            Some(TokenKind::Tuple) => {
                self.eat();
                let name = self.word_or(ParseErrorCode::ExpectedTupleName, &mut ok);
                let tuple_type = self.word_or(ParseErrorCode::ExpectedTupleType, &mut ok);
                let fields = self.fields(false, &mut ok);
                Some(CreateTarget::Tuple {
                    name,
                    tuple_type,
                    fields,
                })
            }
            Some(TokenKind::Value) => {
                self.eat();
                let name = self.word_or(ParseErrorCode::ExpectedValueName, &mut ok);
                let initialiser = if self.peek_is(&TokenKind::Eol) {
                    None
                } else {
                    self.operand(&mut ok)
                };
                Some(CreateTarget::Value { name, initialiser })
            }
            _ => {
                ok &= self.fail(ParseErrorCode::ExpectedTupleOrValue);
                None
            }
        };

        let target = target.filter(|_| ok)?;
        Some(Statement::Creates { target, span })
    }

    fn each(&mut self, span: Span) -> Option<Statement> {
        let mut ok = true;

        let element = self.word_or(ParseErrorCode::ExpectedArrayElementName, &mut ok);
        ok &= self.expect(&TokenKind::In, HighlightStyle::Keyword, ParseErrorCode::ExpectedIn);

        let collection = self.take_identifier();
        if collection.is_none() {
            ok &= self.fail(ParseErrorCode::ExpectedValueName);
        }

        ok &= self.expect_eol();
        let block = self.block();
        ok &= self.expect_end();

        let (Some(collection), Some(block)) = (collection, block) else {
            return None;
        };
        ok.then_some(Statement::Each {
            element,
            collection,
            block,
            span,
        })
    }

    fn while_statement(&mut self, span: Span) -> Option<Statement> {
        let mut ok = true;

        let condition = self.operand(&mut ok);
        ok &= self.expect_eol();
        let block = self.block();
        ok &= self.expect_end();

        let (Some(condition), Some(block)) = (condition, block) else {
            return None;
        };
        ok.then_some(Statement::While {
            condition,
            block,
            span,
        })
    }

    // -------------------------------------------------------------------------
    // Expressions
    // -------------------------------------------------------------------------

    /// Binding power of the next token as an infix operator; 0 if it is not
    /// one.
    fn next_precedence(&self) -> u8 {
        match self.peek() {
            Some(TokenKind::And | TokenKind::Or) => 1,
            Some(TokenKind::Is | TokenKind::More | TokenKind::Less) => 2,
            Some(TokenKind::Plus | TokenKind::Minus) => 3,
            Some(TokenKind::Star | TokenKind::Slash | TokenKind::Percent) => 4,
            Some(TokenKind::LParen) => 5,
            Some(TokenKind::With) => 6,
            _ => 0,
        }
    }

    fn next_infix(&self) -> Infix {
        match self.peek() {
            Some(TokenKind::Is) => Infix::Comparison(ComparisonOp::Equal),
            Some(TokenKind::More) => Infix::Comparison(ComparisonOp::MoreThan),
            Some(TokenKind::Less) => Infix::Comparison(ComparisonOp::LessThan),
            Some(TokenKind::And) => Infix::Logical(LogicalOp::And),
            Some(TokenKind::Or) => Infix::Logical(LogicalOp::Or),
            Some(TokenKind::Plus) => Infix::Arithmetic(ArithmeticOp::Add),
            Some(TokenKind::Minus) => Infix::Arithmetic(ArithmeticOp::Subtract),
            Some(TokenKind::Star) => Infix::Arithmetic(ArithmeticOp::Multiply),
            Some(TokenKind::Slash) => Infix::Arithmetic(ArithmeticOp::Divide),
            Some(TokenKind::Percent) => Infix::Arithmetic(ArithmeticOp::Modulo),
            Some(TokenKind::With) => Infix::With,
            _ => Infix::Unsupported,
        }
    }

    /// Parses an expression whose operators bind tighter than `precedence`.
    fn expression(&mut self, precedence: u8) -> Option<Expression> {
        let mut ok = true;
        let mut value: Option<Expression> = None;
        // A word directly followed by `with` names a function.
        let mut function: Option<(String, Span)> = None;

        match self.peek() {
            Some(TokenKind::Word(_) | TokenKind::Quoted(_)) => {
                if let Some(Token { kind, span }) = self.eat() {
                    let quoted = matches!(kind, TokenKind::Quoted(_));
                    let name = kind.into_text().unwrap_or_default();
                    if !self.peek_is(&TokenKind::With) {
                        value = Some(Expression::Identifier(Identifier { name, quoted, span }));
                    } else if !quoted {
                        function = Some((name, span));
                    } else {
                        self.error(ParseErrorCode::ExpectedExpression);
                        ok = false;
                    }
                }
            }
            Some(TokenKind::Float(_)) => {
                if let Some(Token {
                    kind: TokenKind::Float(number),
                    span,
                }) = self.eat()
                {
                    value = Some(Expression::Number(number, span));
                }
            }
            Some(TokenKind::LParen) => {
                self.keyword(HighlightStyle::Keyword);
                match self.expression(0) {
                    Some(inner) => {
                        value = Some(inner);
                        if self.peek_is(&TokenKind::RParen) {
                            self.keyword(HighlightStyle::Keyword);
                        } else {
                            self.error(ParseErrorCode::ExpectedClosingParenthesis);
                            ok = false;
                        }
                    }
                    None => {
                        if self.peek_is(&TokenKind::RParen) {
                            self.eat();
                        }
                        ok = false;
                    }
                }
            }
            _ => ok &= self.fail(ParseErrorCode::ExpectedExpression),
        }

        while precedence < self.next_precedence() {
            let this_precedence = self.next_precedence();
            match self.next_infix() {
                Infix::Comparison(mut op) => {
                    self.keyword(HighlightStyle::Keyword);
                    match op {
                        ComparisonOp::Equal if self.peek_is(&TokenKind::Not) => {
                            self.keyword(HighlightStyle::Keyword);
                            op = ComparisonOp::NotEqual;
                        }
                        ComparisonOp::MoreThan | ComparisonOp::LessThan => {
                            if self.peek_is(&TokenKind::Than) {
                                self.keyword(HighlightStyle::Keyword);
                            } else {
                                self.error(ParseErrorCode::ExpectedThan);
                                ok = false;
                            }
                        }
                        _ => {}
                    }
                    match self.expression(this_precedence) {
                        Some(rhs) => {
                            value = value.map(|lhs| Expression::Comparison {
                                op,
                                span: lhs.span(),
                                lhs: Box::new(lhs),
                                rhs: Box::new(rhs),
                            });
                        }
                        None => ok = false,
                    }
                }
                Infix::Logical(op) => {
                    self.keyword(HighlightStyle::Keyword);
                    match self.expression(this_precedence) {
                        Some(rhs) => {
                            value = value.map(|lhs| Expression::Logical {
                                op,
                                span: lhs.span(),
                                lhs: Box::new(lhs),
                                rhs: Box::new(rhs),
                            });
                        }
                        None => ok = false,
                    }
                }
                Infix::Arithmetic(op) => {
                    self.keyword(HighlightStyle::Keyword);
                    match self.expression(this_precedence) {
                        Some(rhs) => {
                            value = value.map(|lhs| Expression::Arithmetic {
                                op,
                                span: lhs.span(),
                                lhs: Box::new(lhs),
                                rhs: Box::new(rhs),
                            });
                        }
                        None => ok = false,
                    }
                }
                Infix::With => {
                    let with_span = self.keyword(HighlightStyle::Keyword);
                    let (name, span) = function.take().unwrap_or((String::new(), with_span));
                    if let Some(call) = self.arguments(name, span, &mut ok) {
                        value = Some(call);
                    }
                }
                Infix::Unsupported => {
                    self.eat();
                    ok = false;
                }
            }
        }

        if ok { value } else { None }
    }

    /// `name expr` pairs after `with`: at least one, then as many as follow.
    fn arguments(&mut self, name: String, span: Span, ok: &mut bool) -> Option<Expression> {
        let mut args: Vec<(String, Expression)> = Vec::new();
        while *ok && (args.is_empty() || self.peek_is_word()) {
            let argument = if self.peek_is_word() {
                self.highlight(HighlightStyle::ArgumentName);
                let argument = self.take_word().unwrap_or_default();
                if args.iter().any(|(existing, _)| *existing == argument) {
                    self.error(ParseErrorCode::DuplicateArgumentName);
                    *ok = false;
                }
                argument
            } else {
                *ok &= self.fail(ParseErrorCode::ExpectedArgumentName);
                String::new()
            };

            if *ok {
                match self.expression(0) {
                    Some(expression) => args.push((argument, expression)),
                    None => *ok = false,
                }
            }
        }

        ok.then_some(Expression::Function { name, args, span })
    }
}

/// Lexes and parses a whole program in build mode.
#[must_use]
pub fn parse_source(source: &str) -> ParseOutput {
    Parser::new(lex_source(source), true).parse()
}
