//! Loaded program bookkeeping.
//!
//! A program is one source asset turned into script actors. The first actor
//! of every program takes the program's instance name; the rest keep their
//! declared names. Programs loaded from the same template share their
//! parsed handlers.

use std::rc::Rc;

use carlo_foundation::Tuple;
use carlo_language::{Lexer, Parser, RuntimeError, dump_program};
use std::collections::VecDeque;

use crate::actor::{Actor, ScriptActor};
use crate::asset::{AssetLoaderFactory, Coordinates, DEFAULT_READ_CHUNK, read_line};
use crate::dispatcher::FunctionDispatcher;
use crate::router::TupleRouter;

/// Source actor of the lifecycle tuples the manager sends.
pub const SYSTEM_ACTOR: &str = "Linda2";

/// Type of the tuple delivered to every actor after loading.
pub const LOAD_TUPLE: &str = "Load";

/// Type of the tuple delivered to every actor before unloading.
pub const UNLOAD_TUPLE: &str = "Unload";

struct LoadedProgram {
    name: String,
    template_name: String,
    // None when the source did not parse.
    actors: Option<Vec<Rc<ScriptActor>>>,
}

impl LoadedProgram {
    fn actors(&self) -> &[Rc<ScriptActor>] {
        self.actors.as_deref().unwrap_or_default()
    }

    fn deliver(&self, tuple_type: &str) {
        let tuple = Tuple::of_type(tuple_type).from_actor(SYSTEM_ACTOR);
        for actor in self.actors() {
            actor.accept(&tuple);
        }
    }

    fn destroy(self) {
        self.deliver(UNLOAD_TUPLE);
        for actor in self.actors() {
            ScriptActor::deregister(actor);
        }
    }
}

/// Loads, clones, and unloads programs.
pub struct ProgramManager {
    router: Rc<dyn TupleRouter>,
    dispatcher: Rc<FunctionDispatcher>,
    programs: Vec<LoadedProgram>,
    read_chunk: usize,
    trace_parse: bool,
}

impl ProgramManager {
    /// Creates a manager whose actors send through `router` and call through
    /// `dispatcher`.
    #[must_use]
    pub fn new(router: Rc<dyn TupleRouter>, dispatcher: Rc<FunctionDispatcher>) -> Self {
        Self {
            router,
            dispatcher,
            programs: Vec::new(),
            read_chunk: DEFAULT_READ_CHUNK,
            trace_parse: false,
        }
    }

    /// Sets the largest single read when loading assets.
    #[must_use]
    pub fn with_read_chunk(mut self, bytes: usize) -> Self {
        self.read_chunk = bytes.max(1);
        self
    }

    /// Logs each freshly parsed program's tree at trace level.
    #[must_use]
    pub const fn with_trace_parse(mut self, enabled: bool) -> Self {
        self.trace_parse = enabled;
        self
    }

    /// Loads program `name`, from the asset `template` if one is given.
    ///
    /// Loading a name twice does nothing. If another program from the same
    /// template is loaded, its actors are cloned with shared handlers
    /// instead of reading the asset again. A program that fails to parse is
    /// still recorded (with no actors) so the editor can report it.
    ///
    /// Returns false only if the asset could not be opened.
    #[tracing::instrument(level = "debug", skip_all, fields(name = %name, template = %template))]
    pub fn load(
        &mut self,
        factory: &dyn AssetLoaderFactory,
        coordinates: &Coordinates,
        name: &str,
        template: &str,
    ) -> bool {
        if self.programs.iter().any(|program| program.name == name) {
            tracing::debug!("already loaded");
            return true;
        }

        let source = (!template.is_empty())
            .then(|| {
                self.programs.iter().find(|program| {
                    program.template_name == template && program.actors.is_some()
                })
            })
            .flatten();

        let actors = match source {
            Some(source) => {
                tracing::debug!("cloning from loaded template");
                let actors: Vec<_> = source
                    .actors()
                    .iter()
                    .map(|actor| Rc::new(actor.duplicate()))
                    .collect();
                Some(actors)
            }
            None => {
                let asset = if template.is_empty() { name } else { template };
                match self.read(factory, coordinates, asset) {
                    Some(actors) => actors,
                    None => return false,
                }
            }
        };

        let program = LoadedProgram {
            name: name.to_string(),
            template_name: template.to_string(),
            actors,
        };
        if let Some(first) = program.actors().first() {
            first.rename(name);
        }
        for actor in program.actors() {
            ScriptActor::register(actor);
        }
        program.deliver(LOAD_TUPLE);
        self.programs.push(program);
        true
    }

    /// Reads and parses an asset. The outer `None` means the asset could not
    /// be opened; the inner one means it did not parse.
    fn read(
        &self,
        factory: &dyn AssetLoaderFactory,
        coordinates: &Coordinates,
        asset: &str,
    ) -> Option<Option<Vec<Rc<ScriptActor>>>> {
        let mut loader = factory.make_loader(coordinates, asset);
        if let Err(error) = loader.open() {
            tracing::warn!(%error, asset, "unable to open program");
            return None;
        }

        let mut lexer = Lexer::new();
        let mut tokens = VecDeque::new();
        let mut offset = 0;
        let mut buf = vec![0u8; self.read_chunk];
        while let Some(line) = read_line(loader.as_mut(), &mut offset, &mut buf) {
            lexer.lex(&line, &mut tokens);
        }
        if let Err(error) = loader.close() {
            tracing::debug!(%error, asset, "closing program asset failed");
        }

        let output = Parser::new(tokens, true).parse();
        let Some(program) = output.program else {
            tracing::debug!(errors = output.errors.len(), asset, "program did not parse");
            return Some(None);
        };
        if self.trace_parse {
            tracing::trace!(asset, tree = %dump_program(&program), "parsed program");
        }

        let actors = program
            .actors
            .iter()
            .map(|def| {
                Rc::new(ScriptActor::from_def(
                    def,
                    Rc::clone(&self.dispatcher),
                    Rc::clone(&self.router),
                ))
            })
            .collect();
        Some(Some(actors))
    }

    /// Sends "Unload" to every actor of program `name`, then deregisters and
    /// drops them. Returns false if no such program is loaded.
    #[tracing::instrument(level = "debug", skip_all, fields(name = %name))]
    pub fn unload(&mut self, name: &str) -> bool {
        let Some(index) = self.programs.iter().position(|program| program.name == name) else {
            return false;
        };
        self.programs.remove(index).destroy();
        true
    }

    /// Deletes the asset `name` without unloading anything.
    ///
    /// # Errors
    /// Returns the loader's error if the asset cannot be erased.
    pub fn erase(
        &self,
        factory: &dyn AssetLoaderFactory,
        coordinates: &Coordinates,
        name: &str,
    ) -> carlo_foundation::Result<()> {
        factory.make_loader(coordinates, name).erase()
    }

    /// Returns the template program `name` was loaded from, if any.
    #[must_use]
    pub fn is_from_template(&self, name: &str) -> Option<&str> {
        self.programs
            .iter()
            .find(|program| program.name == name && !program.template_name.is_empty())
            .map(|program| program.template_name.as_str())
    }

    /// Returns true if a program is loaded under `name` or from a template
    /// called `name`.
    #[must_use]
    pub fn is_loaded(&self, name: &str) -> bool {
        self.programs
            .iter()
            .any(|program| program.name == name || program.template_name == name)
    }

    /// Returns the latest runtime errors of every actor of program `name`.
    #[must_use]
    pub fn runtime_errors(&self, name: &str) -> Vec<RuntimeError> {
        self.programs
            .iter()
            .filter(|program| program.name == name)
            .flat_map(LoadedProgram::actors)
            .flat_map(|actor| actor.runtime_errors())
            .collect()
    }

    /// Returns the actors of program `name`. Empty if it is not loaded or
    /// did not parse.
    #[must_use]
    pub fn actors(&self, name: &str) -> &[Rc<ScriptActor>] {
        self.programs
            .iter()
            .find(|program| program.name == name)
            .map(LoadedProgram::actors)
            .unwrap_or_default()
    }

    /// Returns the instance names of all loaded programs in load order.
    #[must_use]
    pub fn program_names(&self) -> Vec<&str> {
        self.programs.iter().map(|program| program.name.as_str()).collect()
    }
}

impl Drop for ProgramManager {
    fn drop(&mut self) {
        for program in self.programs.drain(..) {
            program.destroy();
        }
    }
}
