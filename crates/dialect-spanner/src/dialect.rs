//! The dialect facade: identity constants, capability flags, and the
//! connect path that turns a connection URL into a live connection.

use bridgeql_core::{DriverFactory, GenerateError, Result};

use crate::connection::SpannerConnection;
use crate::trace::TraceShim;
use crate::url::parse_connection_url;

pub const DIALECT_NAME: &str = "spanner";
pub const DRIVER_NAME: &str = "spanner";

/// GoogleSQL caps identifiers at 128 characters.
pub const MAX_IDENTIFIER_LENGTH: usize = 128;

/// Static description of what the dialect can and cannot do, for hosts that
/// branch on capabilities rather than on the dialect name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// Multi-row INSERT reports an accurate affected-row count.
    pub sane_multi_rowcount: bool,
    /// `INSERT INTO t DEFAULT VALUES` has no GoogleSQL spelling.
    pub insert_default_values: bool,
    pub sequences: bool,
    pub returning: bool,
    /// Direct UNIQUE constraints; Spanner only has unique indexes.
    pub unique_constraints: bool,
}

impl Capabilities {
    const fn spanner() -> Self {
        Self {
            sane_multi_rowcount: true,
            insert_default_values: false,
            sequences: true,
            returning: true,
            unique_constraints: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SpannerDialect {
    trace: TraceShim,
}

impl SpannerDialect {
    pub fn new() -> Self {
        Self {
            trace: TraceShim::disabled(),
        }
    }

    /// Enables span emission around driver calls. The endpoint, when known,
    /// is recorded on every span.
    pub fn with_tracing(endpoint: Option<&str>) -> Self {
        Self {
            trace: TraceShim::enabled(endpoint),
        }
    }

    pub fn name(&self) -> &'static str {
        DIALECT_NAME
    }

    pub fn capabilities(&self) -> Capabilities {
        Capabilities::spanner()
    }

    /// Parses the connection URL and opens a driver connection through the
    /// factory. When the factory's client is pinned to a project, the URL
    /// must name the same project.
    pub fn connect(&self, url: &str, factory: &dyn DriverFactory) -> Result<SpannerConnection> {
        let config = parse_connection_url(url)?;

        if let Some(client_project) = factory.client_project() {
            if client_project != config.project {
                return Err(GenerateError::Programming {
                    context: "connect".to_string(),
                    message: format!(
                        "project mismatch: the URL names `{}` but the client is bound \
                         to `{client_project}`",
                        config.project
                    ),
                }
                .into());
            }
        }

        let driver = factory.connect(&config)?;
        Ok(SpannerConnection::new(driver, self.trace.clone()))
    }
}

impl Default for SpannerDialect {
    fn default() -> Self {
        Self::new()
    }
}
