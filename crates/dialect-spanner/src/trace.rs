//! Span emission around driver-boundary calls. Built on the `tracing`
//! crate; when disabled, every guard is a no-op and no span is entered.
//! Errors are recorded on the span but always propagate to the caller.

use bridgeql_core::{Error, GenerateError};
use tracing::{field::Empty, info_span, Span};

#[derive(Debug, Clone)]
pub struct TraceShim {
    enabled: bool,
    endpoint: Option<String>,
}

impl TraceShim {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            endpoint: None,
        }
    }

    pub fn enabled(endpoint: Option<&str>) -> Self {
        Self {
            enabled: true,
            endpoint: endpoint.map(str::to_string),
        }
    }

    /// Opens a span for one driver call. The returned guard must be told the
    /// outcome before it is dropped; an untouched guard records nothing.
    pub fn start(&self, operation: &str) -> TraceGuard {
        if !self.enabled {
            return TraceGuard { span: None };
        }

        let endpoint = self.endpoint.as_deref().unwrap_or("default");
        let span = info_span!(
            "spanner.call",
            operation = operation,
            db.r#type = "spanner",
            db.url = endpoint,
            net.host.name = endpoint,
            otel.status_code = Empty,
            otel.status_message = Empty,
        );
        TraceGuard { span: Some(span) }
    }
}

pub struct TraceGuard {
    span: Option<Span>,
}

impl TraceGuard {
    pub fn finish<T>(&self, outcome: &Result<T, Error>) {
        match outcome {
            Ok(_) => self.ok(),
            Err(error) => self.error(error),
        }
    }

    pub fn ok(&self) {
        if let Some(span) = &self.span {
            span.record("otel.status_code", "OK");
        }
    }

    pub fn error(&self, error: &Error) {
        if let Some(span) = &self.span {
            span.record("otel.status_code", status_code(error));
            span.record("otel.status_message", error.to_string().as_str());
        }
    }
}

/// Canonical status code for the span, derived from the error kind. Driver
/// errors keep UNKNOWN; the driver's own code travels in the message.
fn status_code(error: &Error) -> &'static str {
    match error {
        Error::Generate(GenerateError::UnsupportedFeature { .. }) => "UNIMPLEMENTED",
        Error::Generate(GenerateError::Programming { .. }) => "INVALID_ARGUMENT",
        Error::Execute(_) => "UNKNOWN",
    }
}

#[cfg(test)]
mod tests {
    use bridgeql_core::{Error, GenerateError};

    use super::{status_code, TraceShim};

    #[test]
    fn disabled_shim_yields_inert_guards() {
        let shim = TraceShim::disabled();
        let guard = shim.start("execute");
        guard.ok();
        guard.error(&Error::Generate(GenerateError::Programming {
            context: "test".to_string(),
            message: "noop".to_string(),
        }));
    }

    #[test]
    fn error_kinds_map_to_canonical_codes() {
        let unsupported = Error::Generate(GenerateError::UnsupportedFeature {
            feature: "LIKE ... ESCAPE".to_string(),
            message: String::new(),
            dialect: "spanner".to_string(),
        });
        assert_eq!(status_code(&unsupported), "UNIMPLEMENTED");

        let programming = Error::Generate(GenerateError::Programming {
            context: "isolation_level".to_string(),
            message: String::new(),
        });
        assert_eq!(status_code(&programming), "INVALID_ARGUMENT");
    }
}
