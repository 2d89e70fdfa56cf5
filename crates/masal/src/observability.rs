//! Span export through OpenTelemetry.
//!
//! Replaces [`init_logging`](crate::init_logging) when the `observability`
//! feature is on: console logs keep flowing and every `tracing` span is also
//! exported to stdout as an OpenTelemetry span.

use crate::logging::console_filter;
use opentelemetry::{KeyValue, global, trace::TracerProvider};
use opentelemetry_sdk::{Resource, trace::SdkTracerProvider};
use opentelemetry_stdout::SpanExporter;
use tracing_subscriber::{Layer, layer::SubscriberExt, util::SubscriberInitExt};

/// Settings for [`init_observability`].
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    /// `service.name` attached to exported spans
    pub service_name: String,
    /// Force debug logging
    pub verbose: bool,
    /// Emit console logs as JSON lines
    pub json_logs: bool,
}

impl ObservabilityConfig {
    /// Settings for `service_name` with plain, non-verbose logs.
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            verbose: false,
            json_logs: false,
        }
    }

    /// Force debug logging.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Emit console logs as JSON lines.
    pub fn with_json_logs(mut self, enabled: bool) -> Self {
        self.json_logs = enabled;
        self
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self::new(env!("CARGO_PKG_NAME"))
    }
}

/// Install the subscriber and the global tracer provider.
///
/// Hand the returned provider to [`shutdown_observability`] before exit so
/// buffered spans are flushed.
pub fn init_observability(config: ObservabilityConfig) -> SdkTracerProvider {
    let resource = Resource::builder()
        .with_service_name(config.service_name.clone())
        .with_attributes([KeyValue::new("service.version", env!("CARGO_PKG_VERSION"))])
        .build();

    let provider = SdkTracerProvider::builder()
        .with_resource(resource)
        .with_simple_exporter(SpanExporter::default())
        .build();
    global::set_tracer_provider(provider.clone());

    let console = if config.json_logs {
        tracing_subscriber::fmt::layer().json().boxed()
    } else {
        tracing_subscriber::fmt::layer().with_target(false).boxed()
    };
    let spans = tracing_opentelemetry::layer().with_tracer(provider.tracer(config.service_name));

    tracing_subscriber::registry()
        .with(console_filter(config.verbose))
        .with(console)
        .with(spans)
        .init();

    provider
}

/// Flush and stop span export.
pub fn shutdown_observability(provider: SdkTracerProvider) {
    if let Err(e) = provider.shutdown() {
        eprintln!("Failed to flush spans: {}", e);
    }
}
