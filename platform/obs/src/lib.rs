use anyhow::{Result, anyhow};
use once_cell::sync::OnceCell;
use opentelemetry::trace::TracerProvider;
use opentelemetry_otlp::{Protocol, SpanExporter, WithExportConfig};
use opentelemetry_sdk::{self as sdk, Resource};
use tracing_subscriber::{EnvFilter, Layer, Registry, layer::SubscriberExt, util::SubscriberInitExt};

static INIT: OnceCell<()> = OnceCell::new();

const DEFAULT_FILTER: &str = "info,tower_http=warn,sqlx=warn";

/// Line format for the stdout layer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Plain,
    Json,
}

impl LogFormat {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "plain" | "text" | "pretty" => Some(Self::Plain),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Configuration for tracing initialization.
#[derive(Clone, Debug)]
pub struct ObsConfig {
    pub service_name: String,
    pub env_filter: Option<String>,
    pub format: LogFormat,
    pub otlp_endpoint: Option<String>,
}

impl Default for ObsConfig {
    fn default() -> Self {
        Self {
            service_name: "employee-server".to_string(),
            env_filter: None,
            format: LogFormat::Plain,
            otlp_endpoint: None,
        }
    }
}

impl ObsConfig {
    /// Read `RUST_LOG`, `LOG_FORMAT`, `OTLP_ENDPOINT` and `OTEL_SERVICE_NAME`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            service_name: lookup("OTEL_SERVICE_NAME")
                .filter(|name| !name.trim().is_empty())
                .unwrap_or(defaults.service_name),
            env_filter: lookup("RUST_LOG"),
            format: lookup("LOG_FORMAT")
                .and_then(|raw| LogFormat::parse(&raw))
                .unwrap_or_default(),
            otlp_endpoint: lookup("OTLP_ENDPOINT").filter(|url| !url.trim().is_empty()),
        }
    }
}

fn fmt_layer(format: LogFormat) -> Box<dyn Layer<Registry> + Send + Sync> {
    match format {
        LogFormat::Plain => tracing_subscriber::fmt::layer().with_target(false).boxed(),
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(true)
            .boxed(),
    }
}

/// Install tracing subscribers with optional OTLP exporter. Repeated calls are no-ops.
pub fn init_tracing(config: ObsConfig) -> Result<()> {
    if INIT.get().is_some() {
        return Ok(());
    }

    let filter = config
        .env_filter
        .clone()
        .unwrap_or_else(|| DEFAULT_FILTER.to_string());
    let env_filter = EnvFilter::try_new(filter)?;

    let registry = tracing_subscriber::registry()
        .with(fmt_layer(config.format))
        .with(env_filter);

    if let Some(endpoint) = config.otlp_endpoint {
        let exporter = SpanExporter::builder()
            .with_http()
            .with_protocol(Protocol::HttpBinary)
            .with_endpoint(endpoint)
            .build()?;

        let resource = Resource::builder()
            .with_service_name(config.service_name.clone())
            .build();

        let provider = sdk::trace::SdkTracerProvider::builder()
            .with_resource(resource)
            .with_batch_exporter(exporter)
            .build();
        let tracer = provider.tracer(config.service_name);

        registry
            .with(tracing_opentelemetry::layer().with_tracer(tracer))
            .try_init()?;
    } else {
        registry.try_init()?;
    }

    INIT.set(())
        .map_err(|_| anyhow!("tracing already initialized"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_env() {
        let config = ObsConfig::from_lookup(lookup(&[]));
        assert_eq!(config.service_name, "employee-server");
        assert_eq!(config.format, LogFormat::Plain);
        assert!(config.env_filter.is_none());
        assert!(config.otlp_endpoint.is_none());
    }

    #[test]
    fn reads_format_and_exporter() {
        let config = ObsConfig::from_lookup(lookup(&[
            ("LOG_FORMAT", "JSON"),
            ("OTLP_ENDPOINT", "http://collector:4318/v1/traces"),
            ("OTEL_SERVICE_NAME", "employees"),
            ("RUST_LOG", "debug"),
        ]));
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.service_name, "employees");
        assert_eq!(config.env_filter.as_deref(), Some("debug"));
        assert_eq!(
            config.otlp_endpoint.as_deref(),
            Some("http://collector:4318/v1/traces")
        );
    }

    #[test]
    fn default_filter_quiets_http_and_sql_noise() {
        assert!(EnvFilter::try_new(DEFAULT_FILTER).is_ok());
        assert!(DEFAULT_FILTER.starts_with("info,"));
        assert!(DEFAULT_FILTER.contains("tower_http=warn"));
        assert!(DEFAULT_FILTER.contains("sqlx=warn"));
    }

    #[test]
    fn unknown_format_falls_back_to_plain() {
        let config = ObsConfig::from_lookup(lookup(&[("LOG_FORMAT", "xml"), ("OTLP_ENDPOINT", " ")]));
        assert_eq!(config.format, LogFormat::Plain);
        assert!(config.otlp_endpoint.is_none());
    }
}
