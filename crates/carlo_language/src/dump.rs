//! Debug dump of a parsed program.
//!
//! Produces an indented tree, one node per line, that is stable across runs
//! and suitable for golden comparisons:
//!
//! ```
//! use carlo_language::{dump::dump_program, parse_source};
//!
//! let program = parse_source("actor\nreceives Tick\nstop\nend\nend").program.unwrap();
//! assert_eq!(
//!     dump_program(&program),
//!     "Program\n    Actor \"\"\n        Handler Tick\n            Block\n                Stop\n"
//! );
//! ```

use std::fmt::Write;

use crate::ast::{
    ActorDef, Block, CreateTarget, Expression, Identifier, Program, SendPayload, Statement,
    TupleHandler,
};

/// Spaces per nesting level.
const INDENT_WIDTH: usize = 4;

/// Dumps a whole program.
#[must_use]
pub fn dump_program(program: &Program) -> String {
    let mut dumper = Dumper::default();
    dumper.program(program);
    dumper.output
}

/// Dumps a single expression.
#[must_use]
pub fn dump_expression(expression: &Expression) -> String {
    let mut dumper = Dumper::default();
    dumper.expression(expression);
    dumper.output
}

#[derive(Default)]
struct Dumper {
    output: String,
    indent_level: usize,
}

impl Dumper {
    fn line(&mut self, text: &str) {
        let _ = writeln!(
            self.output,
            "{:indent$}{text}",
            "",
            indent = self.indent_level * INDENT_WIDTH
        );
    }

    fn nested(&mut self, body: impl FnOnce(&mut Self)) {
        self.indent_level += 1;
        body(self);
        self.indent_level -= 1;
    }

    fn program(&mut self, program: &Program) {
        self.line("Program");
        self.nested(|d| {
            for actor in &program.actors {
                d.actor(actor);
            }
        });
    }

    fn actor(&mut self, actor: &ActorDef) {
        self.line(&format!("Actor {:?}", actor.name));
        self.nested(|d| {
            for handler in &actor.handlers {
                d.handler(handler);
            }
        });
    }

    fn handler(&mut self, handler: &TupleHandler) {
        let mut header = format!("Handler {}", handler.tuple_type);
        if !handler.source_actor.is_empty() {
            let _ = write!(header, " from {}", handler.source_actor);
        }
        if !handler.alias.is_empty() {
            let _ = write!(header, " as {}", handler.alias);
        }
        self.line(&header);
        self.nested(|d| {
            if let Some(condition) = &handler.condition {
                d.line("Where");
                d.nested(|d| d.expression(condition));
            }
            d.block(&handler.block);
        });
    }

    fn block(&mut self, block: &Block) {
        self.line("Block");
        self.nested(|d| {
            for statement in &block.statements {
                d.statement(statement);
            }
        });
    }

    fn fields(&mut self, fields: &[(String, Expression)]) {
        for (key, value) in fields {
            self.line(&format!("Field {key}"));
            self.nested(|d| d.expression(value));
        }
    }

    fn statement(&mut self, statement: &Statement) {
        match statement {
            Statement::Sends {
                destination_actor,
                destination_id,
                payload,
                ..
            } => {
                match payload {
                    SendPayload::Named(name) => self.line(&format!("Sends tuple {name}")),
                    SendPayload::Literal { tuple_type, .. } => {
                        self.line(&format!("Sends {tuple_type}"));
                    }
                }
                self.nested(|d| {
                    if let Some(actor) = destination_actor {
                        d.line("To");
                        d.nested(|d| d.expression(actor));
                    }
                    if let Some(id) = destination_id {
                        d.line("On");
                        d.nested(|d| d.expression(id));
                    }
                    if let SendPayload::Literal { fields, .. } = payload {
                        d.fields(fields);
                    }
                });
            }
            Statement::If {
                condition,
                then_block,
                else_block,
                ..
            } => {
                self.line("If");
                self.nested(|d| {
                    d.expression(condition);
                    d.block(then_block);
                    if let Some(else_block) = else_block {
                        d.line("Else");
                        d.nested(|d| d.block(else_block));
                    }
                });
            }
            Statement::Makes { target, value, .. } => {
                self.line(&format!("Makes {}", target.name));
                self.nested(|d| d.expression(value));
            }
            Statement::Creates { target, .. } => match target {
                CreateTarget::Tuple {
                    name,
                    tuple_type,
                    fields,
                } => {
                    self.line(&format!("Creates tuple {name} {tuple_type}"));
                    self.nested(|d| d.fields(fields));
                }
                CreateTarget::Value { name, initialiser } => {
                    self.line(&format!("Creates value {name}"));
                    if let Some(initialiser) = initialiser {
                        self.nested(|d| d.expression(initialiser));
                    }
                }
            },
            Statement::Each {
                element,
                collection,
                block,
                ..
            } => {
                self.line(&format!("Each {element} in {}", collection.name));
                self.nested(|d| d.block(block));
            }
            Statement::While {
                condition, block, ..
            } => {
                self.line("While");
                self.nested(|d| {
                    d.expression(condition);
                    d.block(block);
                });
            }
            Statement::Stop { .. } => self.line("Stop"),
        }
    }

    fn expression(&mut self, expression: &Expression) {
        match expression {
            Expression::Identifier(identifier) => self.identifier(identifier),
            Expression::Number(number, _) => self.line(&format!("Number {number}")),
            Expression::Arithmetic { op, lhs, rhs, .. } => self.binary(op.symbol(), lhs, rhs),
            Expression::Comparison { op, lhs, rhs, .. } => self.binary(op.symbol(), lhs, rhs),
            Expression::Logical { op, lhs, rhs, .. } => self.binary(op.symbol(), lhs, rhs),
            Expression::Function { name, args, .. } => {
                self.line(&format!("Function {name}"));
                self.nested(|d| {
                    for (argument, value) in args {
                        d.line(&format!("Argument {argument}"));
                        d.nested(|d| d.expression(value));
                    }
                });
            }
        }
    }

    fn identifier(&mut self, identifier: &Identifier) {
        if identifier.quoted {
            self.line(&format!("String {:?}", identifier.name));
        } else {
            self.line(&format!("Identifier {}", identifier.name));
        }
    }

    fn binary(&mut self, symbol: &str, lhs: &Expression, rhs: &Expression) {
        self.line(&format!("Operator {symbol}"));
        self.nested(|d| {
            d.expression(lhs);
            d.expression(rhs);
        });
    }
}
