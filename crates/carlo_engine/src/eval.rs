//! Tree-walking evaluation.
//!
//! Every node evaluates against an [`ExecutionContext`] and returns
//! `Some(value)` on success. On failure the node records a
//! [`RuntimeError`](carlo_language::RuntimeError) at its own span (unless a
//! child already did) and returns `None`, which unwinds the enclosing block.
//!
//! Identifiers are either rvalues ([`Evaluate::eval`]) or assignment targets
//! ([`Assignable::eval_assignable`]). An assignment target is a [`Place`]:
//! a root in context storage plus a path of map keys below it.

use carlo_foundation::{NOTHING, PersistableValue, Tuple, Value};
use carlo_language::{
    ArithmeticOp, Block, ComparisonOp, CreateTarget, Expression, Identifier, LogicalOp,
    RuntimeErrorCode, SendPayload, Span, Statement,
};

use crate::context::ExecutionContext;
use crate::dispatcher::Arguments;

/// Returns true if `value` is exactly 1, the only value conditions accept.
#[must_use]
pub fn is_true(value: &Value) -> bool {
    value.as_integer().is_ok_and(|n| n == 1)
}

/// Nodes that evaluate to a value.
pub trait Evaluate {
    /// Evaluates this node. `None` means failure; the reason is recorded in
    /// the context.
    fn eval(&self, ctx: &mut ExecutionContext<'_>) -> Option<Value>;
}

/// Nodes that can be assigned to.
pub trait Assignable {
    /// Resolves this node to a storage location, creating a tuple field or
    /// fetching a persistable value as needed.
    fn eval_assignable(&self, ctx: &mut ExecutionContext<'_>) -> Option<Place>;
}

/// Where an assignable value is rooted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Root {
    /// A named context value.
    Value(String),
    /// A field of a named context tuple.
    TupleField {
        /// Tuple name.
        tuple: String,
        /// Field name.
        field: String,
    },
    /// A persistable value stored under `actor.name`.
    Persistable(String),
}

/// A resolved assignment target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Place {
    /// Storage root.
    pub root: Root,
    /// Map keys to descend through below the root.
    pub path: Vec<String>,
}

impl Place {
    /// Returns the storage this place names, creating intermediate map
    /// entries on the way down. `None` if a step is not a map.
    pub fn slot<'c>(&self, ctx: &'c mut ExecutionContext<'_>) -> Option<&'c mut Value> {
        let mut slot = match &self.root {
            Root::Value(name) => ctx.value_mut(name)?,
            Root::TupleField { tuple, field } => ctx.tuple_mut(tuple)?.field_mut(field),
            Root::Persistable(key) => ctx.persistable_mut(key)?.value_mut(),
        };
        for key in &self.path {
            slot = slot.member_mut(key)?;
        }
        Some(slot)
    }
}

// =============================================================================
// Blocks and statements
// =============================================================================

impl Evaluate for Block {
    /// Runs statements in order until one fails or `stop` is raised.
    /// Yields the last statement's value.
    fn eval(&self, ctx: &mut ExecutionContext<'_>) -> Option<Value> {
        let mut value = Value::Unset;
        for statement in &self.statements {
            if ctx.is_stopped() {
                break;
            }
            value = statement.eval(ctx)?;
        }
        Some(value)
    }
}

impl Evaluate for Statement {
    fn eval(&self, ctx: &mut ExecutionContext<'_>) -> Option<Value> {
        match self {
            Self::Sends {
                destination_actor,
                destination_id,
                payload,
                span,
            } => sends(ctx, destination_actor.as_ref(), destination_id.as_ref(), payload, *span),
            Self::If {
                condition,
                then_block,
                else_block,
                ..
            } => {
                let condition = condition.eval(ctx)?;
                if is_true(&condition) {
                    then_block.eval(ctx)
                } else if let Some(else_block) = else_block {
                    else_block.eval(ctx)
                } else {
                    Some(Value::Unset)
                }
            }
            Self::Makes {
                target,
                value,
                span,
            } => makes(ctx, target, value, *span),
            Self::Creates { target, span } => creates(ctx, target, *span),
            Self::Each {
                element,
                collection,
                block,
                span,
            } => each(ctx, element, collection, block, *span),
            Self::While {
                condition, block, ..
            } => {
                let mut result = Some(Value::Unset);
                loop {
                    let Some(value) = condition.eval(ctx) else {
                        result = None;
                        break;
                    };
                    if !is_true(&value) || ctx.is_stopped() {
                        break;
                    }
                    result = block.eval(ctx);
                    if result.is_none() {
                        break;
                    }
                }
                ctx.clear_stop();
                result
            }
            Self::Stop { .. } => {
                ctx.stop();
                Some(Value::Unset)
            }
        }
    }
}

fn sends(
    ctx: &mut ExecutionContext<'_>,
    destination_actor: Option<&Expression>,
    destination_id: Option<&Expression>,
    payload: &SendPayload,
    span: Span,
) -> Option<Value> {
    let mut tuple = match payload {
        SendPayload::Named(name) => {
            let Some(tuple) = ctx.tuple(name) else {
                ctx.error(RuntimeErrorCode::NoSuchTuple, span);
                return None;
            };
            tuple.clone()
        }
        SendPayload::Literal { tuple_type, .. } => {
            let mut tuple = Tuple::of_type(tuple_type.as_str());
            tuple.set_source_actor(ctx.current_actor());
            tuple.set_source_id(ctx.router().my_id());
            tuple
        }
    };

    if let Some(expression) = destination_actor {
        let actor = expression.eval(ctx)?;
        tuple.set_destination_actor(actor.to_string());
    }
    if let Some(expression) = destination_id {
        let id = expression.eval(ctx)?;
        tuple.set_destination_id(id.to_string());
    }
    if let SendPayload::Literal { fields, .. } = payload {
        for (key, expression) in fields {
            let value = expression.eval(ctx)?;
            tuple.set(key.as_str(), value);
        }
    }

    if ctx.router().route(tuple) {
        Some(Value::from(1))
    } else {
        ctx.error(RuntimeErrorCode::UnableToRouteTuple, span);
        None
    }
}

fn makes(
    ctx: &mut ExecutionContext<'_>,
    target: &Identifier,
    value: &Expression,
    span: Span,
) -> Option<Value> {
    // The right-hand side goes first: it may itself fetch the persistable
    // value the target is about to replace.
    let value = value.eval(ctx)?;
    let place = target.eval_assignable(ctx)?;

    let Some(slot) = place.slot(ctx) else {
        ctx.error(RuntimeErrorCode::NoSuchTupleOrValue, target.span);
        return None;
    };
    *slot = value.clone();

    if let Root::Persistable(key) = &place.root {
        if let Some(Err(error)) = ctx.persistable(key).map(PersistableValue::save) {
            tracing::warn!(%error, key = %key, "unable to save value");
            ctx.error(RuntimeErrorCode::UnableToSaveValue, span);
            return None;
        }
    }
    Some(value)
}

fn creates(ctx: &mut ExecutionContext<'_>, target: &CreateTarget, span: Span) -> Option<Value> {
    match target {
        CreateTarget::Tuple {
            name,
            tuple_type,
            fields,
        } => {
            if ctx.has_tuple(name) {
                ctx.error(RuntimeErrorCode::TupleAlreadyExists, span);
                return None;
            }
            let mut tuple = Tuple::new();
            for (key, expression) in fields {
                let value = expression.eval(ctx)?;
                tuple.set(key.as_str(), value);
            }
            tuple.set_tuple_type(tuple_type.as_str());
            ctx.insert_tuple(name.as_str(), tuple);
            Some(Value::Unset)
        }
        CreateTarget::Value { name, initialiser } => {
            if ctx.has_value(name) {
                ctx.error(RuntimeErrorCode::ValueAlreadyExists, span);
                return None;
            }
            let value = match initialiser {
                Some(expression) => expression.eval(ctx)?,
                None => Value::Unset,
            };
            ctx.set_value(name.as_str(), value.clone());
            Some(value)
        }
    }
}

fn each(
    ctx: &mut ExecutionContext<'_>,
    element: &str,
    collection: &Identifier,
    block: &Block,
    span: Span,
) -> Option<Value> {
    match identifier(ctx, collection)? {
        Value::List(items) => {
            if ctx.has_value(element) {
                ctx.error(RuntimeErrorCode::ValueAlreadyExists, span);
                return None;
            }
            let mut result = Some(Value::Unset);
            for item in &items {
                if ctx.is_stopped() {
                    break;
                }
                ctx.set_value(element, item.clone());
                result = block.eval(ctx);
                if result.is_none() {
                    break;
                }
            }
            ctx.remove_value(element);
            ctx.clear_stop();
            result
        }
        Value::Unset => Some(Value::Unset),
        _ => {
            ctx.error(RuntimeErrorCode::ValueIsNotAList, span);
            None
        }
    }
}

// =============================================================================
// Expressions
// =============================================================================

impl Evaluate for Expression {
    fn eval(&self, ctx: &mut ExecutionContext<'_>) -> Option<Value> {
        match self {
            Self::Identifier(id) => identifier(ctx, id),
            Self::Number(number, _) => Some(Value::from(*number)),
            Self::Arithmetic { op, lhs, rhs, span } => {
                let lhs = lhs.eval(ctx)?;
                let rhs = rhs.eval(ctx)?;
                numeric(ctx, arithmetic(*op, &lhs, &rhs), *span)
            }
            Self::Comparison { op, lhs, rhs, span } => {
                let lhs = lhs.eval(ctx)?;
                let rhs = rhs.eval(ctx)?;
                numeric(ctx, comparison(*op, &lhs, &rhs), *span)
            }
            Self::Logical { op, lhs, rhs, .. } => {
                // Both sides always run.
                let lhs = truthy(&lhs.eval(ctx)?);
                let rhs = truthy(&rhs.eval(ctx)?);
                Some(Value::from(match op {
                    LogicalOp::And => lhs && rhs,
                    LogicalOp::Or => lhs || rhs,
                }))
            }
            Self::Function { name, args, span } => call(ctx, name, args, *span),
        }
    }
}

fn numeric(ctx: &mut ExecutionContext<'_>, result: Option<Value>, span: Span) -> Option<Value> {
    if result.is_none() {
        ctx.error(RuntimeErrorCode::ValueIsNotANumber, span);
    }
    result
}

fn truthy(value: &Value) -> bool {
    value.as_integer().is_ok_and(|n| n != 0)
}

fn arithmetic(op: ArithmeticOp, lhs: &Value, rhs: &Value) -> Option<Value> {
    if op == ArithmeticOp::Add && (lhs.is_word() || rhs.is_word()) {
        return Some(Value::from(format!("{lhs}{rhs}")));
    }
    let lhs = lhs.as_number().ok()?;
    let rhs = rhs.as_number().ok()?;
    let result = match op {
        ArithmeticOp::Add => lhs + rhs,
        ArithmeticOp::Subtract => lhs - rhs,
        ArithmeticOp::Multiply => lhs * rhs,
        ArithmeticOp::Divide => lhs / rhs,
        ArithmeticOp::Modulo => lhs.round() % rhs.round(),
    };
    Some(Value::from(result))
}

fn comparison(op: ComparisonOp, lhs: &Value, rhs: &Value) -> Option<Value> {
    let holds = match op {
        ComparisonOp::Equal => lhs == rhs,
        ComparisonOp::NotEqual => lhs != rhs,
        ComparisonOp::MoreThan => lhs.as_number().ok()? > rhs.as_number().ok()?,
        ComparisonOp::LessThan => lhs.as_number().ok()? < rhs.as_number().ok()?,
    };
    Some(Value::from(holds))
}

fn call(
    ctx: &mut ExecutionContext<'_>,
    name: &str,
    args: &[(String, Expression)],
    span: Span,
) -> Option<Value> {
    let mut parts = name.split('.');
    let first = parts.next().unwrap_or_default();
    let (actor, function) = match parts.next() {
        Some(function) => (first, function),
        None => ("", first),
    };

    let mut arguments = Arguments::with_capacity(args.len());
    for (argument, expression) in args {
        let value = expression.eval(ctx)?;
        arguments.insert(argument.clone(), value);
    }

    let result = ctx
        .dispatcher()
        .dispatch(actor, function, &arguments, ctx.current_actor());
    if result.is_none() {
        ctx.error(RuntimeErrorCode::NoSuchFunction, span);
    }
    result
}

// =============================================================================
// Identifiers
// =============================================================================

/// Resolves one path segment. `@name` stands for the word held in context
/// value `name`; anything unresolvable becomes empty.
fn segment(ctx: &ExecutionContext<'_>, token: &str) -> String {
    match token.strip_prefix('@') {
        Some(name) if !name.is_empty() => ctx
            .value(name)
            .and_then(Value::as_word)
            .map(str::to_string)
            .unwrap_or_default(),
        _ => token.to_string(),
    }
}

/// Reads `rest` map keys below `value` without creating anything.
fn descend(ctx: &ExecutionContext<'_>, value: &Value, rest: &[&str]) -> Option<Value> {
    let mut current = value;
    for token in rest {
        let key = segment(ctx, token);
        if key.is_empty() {
            return None;
        }
        current = match current {
            Value::Map(map) => match map.get(&key) {
                Some(member) => member,
                None => return Some(Value::Unset),
            },
            Value::Unset => return Some(Value::Unset),
            _ => return None,
        };
    }
    Some(current.clone())
}

/// Rvalue resolution of an identifier.
fn identifier(ctx: &mut ExecutionContext<'_>, id: &Identifier) -> Option<Value> {
    if id.quoted {
        return Some(Value::from(id.name.as_str()));
    }
    if id.name == NOTHING {
        return Some(Value::Unset);
    }

    let segments: Vec<&str> = id.name.split('.').collect();
    let no_args = Arguments::new();

    if let [first, second, rest @ ..] = segments.as_slice() {
        let actor = segment(ctx, first);
        let function = segment(ctx, second);
        if !actor.is_empty() && !function.is_empty() {
            let result = ctx
                .dispatcher()
                .dispatch(&actor, &function, &no_args, ctx.current_actor());
            if let Some(value) = result.and_then(|value| descend(ctx, &value, rest)) {
                return Some(value);
            }
        }
    } else if let Some(value) = ctx
        .dispatcher()
        .dispatch("", &id.name, &no_args, ctx.current_actor())
    {
        return Some(value);
    }

    if let Some(value) = lookup(ctx, &segments) {
        return Some(value);
    }
    if segments.len() == 1 {
        return Some(Value::from(id.name.as_str()));
    }

    ctx.error(RuntimeErrorCode::NoSuchTupleValueOrFunction, id.span);
    None
}

/// Assignable resolution used as an rvalue: nothing is created and no
/// persistable value is kept.
fn lookup(ctx: &ExecutionContext<'_>, segments: &[&str]) -> Option<Value> {
    let (first, rest) = segments.split_first()?;
    let first = segment(ctx, first);
    if first.is_empty() {
        return None;
    }
    if let Some(value) = ctx.value(&first) {
        return descend(ctx, value, rest);
    }

    let (second, rest) = rest.split_first()?;
    let second = segment(ctx, second);
    if second.is_empty() {
        return None;
    }
    if let Some(tuple) = ctx.tuple(&first) {
        let field = tuple.get(&second).cloned().unwrap_or_default();
        return descend(ctx, &field, rest);
    }

    let persistable = ctx
        .dispatcher()
        .persistable_value(&first, &second, ctx.current_actor())?;
    descend(ctx, persistable.value(), rest)
}

fn place(ctx: &mut ExecutionContext<'_>, id: &Identifier) -> Option<Place> {
    if id.quoted {
        return None;
    }
    let segments: Vec<&str> = id.name.split('.').collect();
    let (first, rest) = segments.split_first()?;
    let first = segment(ctx, first);
    if first.is_empty() {
        return None;
    }

    let (root, rest) = if ctx.has_value(&first) {
        (Root::Value(first), rest)
    } else {
        let (second, rest) = rest.split_first()?;
        let second = segment(ctx, second);
        if second.is_empty() {
            return None;
        }
        if ctx.has_tuple(&first) {
            let root = Root::TupleField {
                tuple: first,
                field: second,
            };
            (root, rest)
        } else {
            let persistable = ctx
                .dispatcher()
                .persistable_value(&first, &second, ctx.current_actor())?;
            let key = format!("{first}.{second}");
            ctx.attach_persistable(key.clone(), persistable);
            (Root::Persistable(key), rest)
        }
    };

    let mut path = Vec::with_capacity(rest.len());
    for token in rest {
        let key = segment(ctx, token);
        if key.is_empty() {
            return None;
        }
        path.push(key);
    }
    Some(Place { root, path })
}

impl Assignable for Identifier {
    fn eval_assignable(&self, ctx: &mut ExecutionContext<'_>) -> Option<Place> {
        let resolved = place(ctx, self);
        if resolved.is_none() && !self.quoted {
            ctx.error(RuntimeErrorCode::NoSuchTupleOrValue, self.span);
        }
        resolved
    }
}
