//! Engine configuration.

use carlo_engine::{DEFAULT_MAX_ROUTE_DEPTH, DEFAULT_READ_CHUNK};
use carlo_foundation::{Error, ErrorKind, Result};

/// Settings for a [`Host`](crate::host::Host).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    /// Id of this machine, stamped on every tuple a script sends.
    pub machine_id: String,

    /// Largest single read when loading a program asset.
    pub read_chunk_size: usize,

    /// How deeply tuple delivery may nest before routing is refused.
    pub max_route_depth: usize,

    /// Log the tree of every freshly parsed program at trace level.
    pub trace_parse: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            machine_id: "local".to_string(),
            read_chunk_size: DEFAULT_READ_CHUNK,
            max_route_depth: DEFAULT_MAX_ROUTE_DEPTH,
            trace_parse: false,
        }
    }
}

impl EngineConfig {
    /// Creates a configuration for development: parse trees are traced.
    #[must_use]
    pub fn development() -> Self {
        Self {
            trace_parse: true,
            ..Self::default()
        }
    }

    /// Creates a configuration with nothing extra traced and shallow
    /// routing.
    #[must_use]
    pub fn quiet() -> Self {
        Self {
            max_route_depth: 8,
            trace_parse: false,
            ..Self::default()
        }
    }

    /// Builder method to set the machine id.
    #[must_use]
    pub fn with_machine_id(mut self, machine_id: impl Into<String>) -> Self {
        self.machine_id = machine_id.into();
        self
    }

    /// Builder method to set the asset read size.
    #[must_use]
    pub fn with_read_chunk_size(mut self, bytes: usize) -> Self {
        self.read_chunk_size = bytes;
        self
    }

    /// Builder method to set the routing depth limit.
    #[must_use]
    pub fn with_max_route_depth(mut self, depth: usize) -> Self {
        self.max_route_depth = depth;
        self
    }

    /// Builder method to enable/disable parse tracing.
    #[must_use]
    pub fn with_trace_parse(mut self, trace: bool) -> Self {
        self.trace_parse = trace;
        self
    }

    /// Checks that the settings can run an engine.
    ///
    /// # Errors
    /// Returns a configuration error for an empty machine id, a zero read
    /// size, or a zero routing depth.
    pub fn validate(&self) -> Result<()> {
        let problem = if self.machine_id.is_empty() {
            "machine id is empty"
        } else if self.read_chunk_size == 0 {
            "read chunk size is zero"
        } else if self.max_route_depth == 0 {
            "max route depth is zero"
        } else {
            return Ok(());
        };
        Err(Error::new(ErrorKind::ConfigError(problem.to_string())))
    }
}
