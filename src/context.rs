use tracing::{info_span, Span};

pub const SERVICE_NAME: &str = "dbtest";

/// Handle every workflow receives explicitly instead of reaching for
/// ambient state. Log lines emitted under it carry the `service` field.
#[derive(Debug, Clone)]
pub struct RunContext {
    span: Span,
}

impl RunContext {
    pub fn new(service: &str) -> Self {
        RunContext {
            span: info_span!("run", service),
        }
    }

    pub fn span(&self) -> &Span {
        &self.span
    }
}

impl Default for RunContext {
    fn default() -> Self {
        Self::new(SERVICE_NAME)
    }
}
