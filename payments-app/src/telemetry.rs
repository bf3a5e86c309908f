//! OpenTelemetry export: traces through a batch span exporter and metrics
//! through a periodic reader, both over OTLP/gRPC.
//!
//! The HTTP metrics layer records into the global meter provider, so the
//! provider built here is registered globally alongside the tracer provider.

use opentelemetry::global;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{
    Resource,
    metrics::{SdkMeterProvider, exporter::PushMetricExporter},
    propagation::TraceContextPropagator,
    trace::{SdkTracerProvider, Tracer},
};

/// Installed providers, kept so they can be flushed on exit.
pub struct Telemetry {
    tracer_provider: SdkTracerProvider,
    meter_provider: SdkMeterProvider,
}

impl Telemetry {
    /// Builds both exporters against `endpoint` and registers the providers
    /// globally. Returns the tracer for the `tracing` bridge layer.
    pub fn init(endpoint: &str, service_name: &str) -> anyhow::Result<(Tracer, Self)> {
        global::set_text_map_propagator(TraceContextPropagator::new());

        // Use gRPC exporter with batch processing (non-blocking)
        let span_exporter = opentelemetry_otlp::SpanExporter::builder()
            .with_tonic()
            .with_endpoint(endpoint)
            .build()?;

        let tracer_provider = SdkTracerProvider::builder()
            .with_batch_exporter(span_exporter)
            .with_resource(resource(service_name))
            .build();
        global::set_tracer_provider(tracer_provider.clone());

        let metric_exporter = opentelemetry_otlp::MetricExporter::builder()
            .with_tonic()
            .with_endpoint(endpoint)
            .build()?;

        let meter_provider = meter_provider(metric_exporter, service_name);
        global::set_meter_provider(meter_provider.clone());

        let tracer = tracer_provider.tracer(service_name.to_string());
        Ok((
            tracer,
            Self {
                tracer_provider,
                meter_provider,
            },
        ))
    }

    /// Flushes pending spans and metrics. Export errors are logged, not
    /// returned, since the process is exiting anyway.
    pub fn shutdown(self) {
        if let Err(e) = self.meter_provider.shutdown() {
            tracing::warn!(error = %e, "failed to shut down meter provider");
        }
        if let Err(e) = self.tracer_provider.shutdown() {
            tracing::warn!(error = %e, "failed to shut down tracer provider");
        }
    }
}

fn resource(service_name: &str) -> Resource {
    Resource::builder()
        .with_service_name(service_name.to_string())
        .build()
}

fn meter_provider<E>(exporter: E, service_name: &str) -> SdkMeterProvider
where
    E: PushMetricExporter,
{
    SdkMeterProvider::builder()
        .with_periodic_exporter(exporter)
        .with_resource(resource(service_name))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use opentelemetry::metrics::MeterProvider as _;
    use opentelemetry_sdk::metrics::InMemoryMetricExporter;

    #[test]
    fn test_meter_provider_exports_recorded_metrics() {
        let exporter = InMemoryMetricExporter::default();
        let provider = meter_provider(exporter.clone(), "payments-test");

        let counter = provider
            .meter("payments-http")
            .u64_counter("http.server.requests")
            .build();
        counter.add(1, &[]);
        provider.force_flush().unwrap();

        assert!(!exporter.get_finished_metrics().unwrap().is_empty());
        provider.shutdown().unwrap();
    }

    #[test]
    fn test_meter_provider_without_measurements_flushes_cleanly() {
        let exporter = InMemoryMetricExporter::default();
        let provider = meter_provider(exporter, "payments-test");

        assert!(provider.force_flush().is_ok());
        assert!(provider.shutdown().is_ok());
    }
}
