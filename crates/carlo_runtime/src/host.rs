//! The embedding host.
//!
//! [`Host`] wires one router, one dispatcher, one program manager, and one
//! value store together from an [`EngineConfig`]. Everything runs on the
//! caller's thread; nothing here spawns or blocks.

use std::collections::VecDeque;
use std::rc::Rc;

use carlo_engine::{
    Actor, AssetLoaderFactory, Coordinates, ExecutionContext, FunctionDispatcher, LocalRouter,
    ProgramManager, ScriptActor, TupleRouter,
};
use carlo_foundation::{Result, Tuple, Value};
use carlo_language::{Lexer, ParseError, Parser, RuntimeError, Token, TokenKind};
use thiserror::Error;

use crate::config::EngineConfig;
use crate::editor::{CarloHighlighter, HighlightReport};
use crate::store::{IMMEDIATE_CALLER, StoreActor, ValueStore};

/// Why an immediate-mode line produced no value.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ImmediateError {
    /// The line did not parse.
    #[error("{0}")]
    Parse(ParseError),
    /// Evaluation failed.
    #[error("{0}")]
    Runtime(RuntimeError),
    /// Evaluation stopped without a value or an error.
    #[error("no value")]
    NoValue,
}

/// A configured Carlo engine.
pub struct Host {
    config: EngineConfig,
    router: Rc<LocalRouter>,
    dispatcher: Rc<FunctionDispatcher>,
    manager: ProgramManager,
    store: ValueStore,
    store_actor: Rc<dyn Actor>,
    highlighter: CarloHighlighter,
}

impl Host {
    /// Creates a host with an in-memory value store.
    ///
    /// # Errors
    /// Returns a configuration error if `config` does not validate.
    pub fn new(config: EngineConfig) -> Result<Self> {
        Self::with_store(config, ValueStore::in_memory())
    }

    /// Creates a host whose script actors persist values in `store`.
    ///
    /// # Errors
    /// Returns a configuration error if `config` does not validate.
    pub fn with_store(config: EngineConfig, store: ValueStore) -> Result<Self> {
        config.validate()?;

        let router = Rc::new(
            LocalRouter::new(config.machine_id.clone()).with_max_depth(config.max_route_depth),
        );
        let dispatcher = Rc::new(FunctionDispatcher::new());
        let shared: Rc<dyn TupleRouter> = router.clone();
        let manager = ProgramManager::new(shared, Rc::clone(&dispatcher))
            .with_read_chunk(config.read_chunk_size)
            .with_trace_parse(config.trace_parse);

        let store_actor: Rc<dyn Actor> = Rc::new(StoreActor::new(store.clone()));
        dispatcher.register(&store_actor);

        tracing::debug!(machine = %config.machine_id, "host ready");
        Ok(Self {
            config,
            router,
            dispatcher,
            manager,
            store,
            store_actor,
            highlighter: CarloHighlighter::new(),
        })
    }

    /// Returns the configuration the host was built from.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the router.
    #[must_use]
    pub const fn router(&self) -> &Rc<LocalRouter> {
        &self.router
    }

    /// Returns the dispatcher.
    #[must_use]
    pub const fn dispatcher(&self) -> &Rc<FunctionDispatcher> {
        &self.dispatcher
    }

    /// Returns the program manager.
    #[must_use]
    pub const fn programs(&self) -> &ProgramManager {
        &self.manager
    }

    /// Returns the value store.
    #[must_use]
    pub const fn store(&self) -> &ValueStore {
        &self.store
    }

    /// Returns the native actor serving persistable values.
    #[must_use]
    pub const fn store_actor(&self) -> &Rc<dyn Actor> {
        &self.store_actor
    }

    /// Registers a native actor for both tuples and function calls.
    pub fn register_native(&self, actor: &Rc<dyn Actor>) {
        self.router.register_actor(actor);
        self.dispatcher.register(actor);
    }

    /// Undoes [`Host::register_native`].
    pub fn deregister_native(&self, actor: &Rc<dyn Actor>) {
        self.router.deregister_actor(actor);
        self.dispatcher.deregister(actor);
    }

    /// Loads a program. See [`ProgramManager::load`].
    pub fn load(
        &mut self,
        factory: &dyn AssetLoaderFactory,
        coordinates: &Coordinates,
        name: &str,
        template: &str,
    ) -> bool {
        self.manager.load(factory, coordinates, name, template)
    }

    /// Unloads a program. See [`ProgramManager::unload`].
    pub fn unload(&mut self, name: &str) -> bool {
        self.manager.unload(name)
    }

    /// Routes a tuple from the host, stamping this machine as its source.
    pub fn send(&self, mut tuple: Tuple) -> bool {
        if tuple.source_id().is_empty() {
            tuple.set_source_id(self.config.machine_id.clone());
        }
        self.router.route(tuple)
    }

    /// Returns the latest runtime errors of program `name`.
    #[must_use]
    pub fn runtime_errors(&self, name: &str) -> Vec<RuntimeError> {
        self.manager.runtime_errors(name)
    }

    /// Highlights `source`, the editor text of program `instance`.
    pub fn highlight(&mut self, instance: &str, source: &str, modified: bool) -> HighlightReport {
        for (number, line) in source.lines().enumerate() {
            self.highlighter.line(line, number);
        }
        self.highlighter.highlight(&self.manager, instance, modified)
    }

    /// Runs one line of Carlo outside any program.
    ///
    /// A line starting with a literal or a parenthesis is an expression and
    /// yields its value; anything else runs as a statement and yields what
    /// the statement does. The line runs as actor "Immediate", which has no
    /// persistable values of its own.
    ///
    /// # Errors
    /// Returns the first parse or runtime error, or
    /// [`ImmediateError::NoValue`] if the line stopped without either.
    pub fn immediate(&self, line: &str) -> std::result::Result<Value, ImmediateError> {
        let mut lexer = Lexer::new();
        let mut tokens: VecDeque<Token> = VecDeque::new();

        lexer.lex(line, &mut tokens);
        let expression = matches!(
            tokens.front().map(|token| &token.kind),
            Some(TokenKind::Quoted(_) | TokenKind::Float(_) | TokenKind::LParen)
        );

        tokens.clear();
        lexer.reset();
        lexer.lex(&format!("actor {IMMEDIATE_CALLER}"), &mut tokens);
        lexer.lex("receives Run", &mut tokens);
        if expression {
            lexer.lex(&format!("makes expr {line}"), &mut tokens);
        } else {
            lexer.lex(line, &mut tokens);
        }
        lexer.lex("end", &mut tokens);
        lexer.lex("end", &mut tokens);

        let output = Parser::new(tokens, true).parse();
        let Some(program) = output.program else {
            return Err(output
                .errors
                .into_iter()
                .next()
                .map_or(ImmediateError::NoValue, ImmediateError::Parse));
        };
        let Some(def) = program.actors.first() else {
            return Err(ImmediateError::NoValue);
        };

        let router: Rc<dyn TupleRouter> = self.router.clone();
        let actor = ScriptActor::from_def(def, Rc::clone(&self.dispatcher), router);
        let mut ctx = ExecutionContext::new(&self.dispatcher, self.router.as_ref());
        if expression {
            ctx.set_value("expr", Value::Unset);
        }

        match actor.eval_one(&mut ctx) {
            Some(value) => Ok(value),
            None => Err(ctx
                .take_errors()
                .into_iter()
                .next()
                .map_or(ImmediateError::NoValue, ImmediateError::Runtime)),
        }
    }
}
