// src/telemetry/metrics.rs
//! Prometheus registry for HTTP traffic plus named custom metrics.
use prometheus::{
    CounterVec, Encoder, GaugeVec, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts,
    Registry, TextEncoder,
};
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use thiserror::Error;

pub const CONTENT_TYPE: &str = prometheus::TEXT_FORMAT;

const HTTP_BUCKETS: [f64; 12] = [
    0.001, 0.005, 0.015, 0.05, 0.1, 0.2, 0.3, 0.4, 0.5, 1.0, 2.0, 5.0,
];

#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("prometheus error: {0}")]
    Prometheus(#[from] prometheus::Error),
    #[error("metric '{0}' is already registered")]
    Duplicate(String),
    #[error("metrics output is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

pub type MetricsResult<T> = Result<T, MetricsError>;

#[derive(Clone)]
enum CustomMetric {
    Counter(CounterVec),
    Histogram(HistogramVec),
    Gauge(GaugeVec),
}

pub struct MetricsRegistry {
    registry: Registry,
    http_request_duration: HistogramVec,
    http_requests_total: IntCounterVec,
    http_request_errors: IntCounterVec,
    active_connections: IntGauge,
    custom: Mutex<HashMap<String, CustomMetric>>,
}

pub struct ActiveConnectionGuard {
    gauge: IntGauge,
}

impl Drop for ActiveConnectionGuard {
    fn drop(&mut self) {
        self.gauge.dec();
    }
}

impl MetricsRegistry {
    pub fn new() -> MetricsResult<Self> {
        let registry = Registry::new();

        let http_request_duration = HistogramVec::new(
            HistogramOpts::new(
                "http_request_duration_seconds",
                "Duration of HTTP requests in seconds",
            )
            .buckets(HTTP_BUCKETS.to_vec()),
            &["method", "route", "status_code"],
        )?;
        registry.register(Box::new(http_request_duration.clone()))?;

        let http_requests_total = IntCounterVec::new(
            Opts::new("http_requests_total", "Total number of HTTP requests"),
            &["method", "route", "status_code"],
        )?;
        registry.register(Box::new(http_requests_total.clone()))?;

        let http_request_errors = IntCounterVec::new(
            Opts::new(
                "http_request_errors_total",
                "Total number of HTTP request errors",
            ),
            &["method", "route", "error_type"],
        )?;
        registry.register(Box::new(http_request_errors.clone()))?;

        let active_connections =
            IntGauge::new("active_connections", "Number of active connections")?;
        registry.register(Box::new(active_connections.clone()))?;

        #[cfg(target_os = "linux")]
        registry.register(Box::new(
            prometheus::process_collector::ProcessCollector::for_self(),
        ))?;

        Ok(Self {
            registry,
            http_request_duration,
            http_requests_total,
            http_request_errors,
            active_connections,
            custom: Mutex::new(HashMap::new()),
        })
    }

    pub fn record_http_request(&self, method: &str, route: &str, status_code: u16, seconds: f64) {
        let status = status_code.to_string();
        let labels = [method, route, status.as_str()];
        self.http_request_duration
            .with_label_values(&labels)
            .observe(seconds);
        self.http_requests_total.with_label_values(&labels).inc();
    }

    pub fn record_http_error(&self, method: &str, route: &str, error_type: &str) {
        self.http_request_errors
            .with_label_values(&[method, route, error_type])
            .inc();
    }

    pub fn increment_active_connections(&self) {
        self.active_connections.inc();
    }

    pub fn decrement_active_connections(&self) {
        self.active_connections.dec();
    }

    /// Increments the gauge and decrements it again when the guard drops,
    /// including when the request future is cancelled mid-flight.
    #[must_use = "the gauge is decremented as soon as the guard drops"]
    pub fn track_active_connection(&self) -> ActiveConnectionGuard {
        self.active_connections.inc();
        ActiveConnectionGuard {
            gauge: self.active_connections.clone(),
        }
    }

    pub fn active_connections(&self) -> i64 {
        self.active_connections.get()
    }

    pub fn create_counter(
        &self,
        name: &str,
        help: &str,
        label_names: &[&str],
    ) -> MetricsResult<CounterVec> {
        let counter = CounterVec::new(Opts::new(name, help), label_names)?;
        self.register_custom(name, CustomMetric::Counter(counter.clone()))?;
        Ok(counter)
    }

    /// `buckets` of `None` uses the Prometheus defaults.
    pub fn create_histogram(
        &self,
        name: &str,
        help: &str,
        label_names: &[&str],
        buckets: Option<Vec<f64>>,
    ) -> MetricsResult<HistogramVec> {
        let mut opts = HistogramOpts::new(name, help);
        if let Some(buckets) = buckets {
            opts = opts.buckets(buckets);
        }
        let histogram = HistogramVec::new(opts, label_names)?;
        self.register_custom(name, CustomMetric::Histogram(histogram.clone()))?;
        Ok(histogram)
    }

    pub fn create_gauge(
        &self,
        name: &str,
        help: &str,
        label_names: &[&str],
    ) -> MetricsResult<GaugeVec> {
        let gauge = GaugeVec::new(Opts::new(name, help), label_names)?;
        self.register_custom(name, CustomMetric::Gauge(gauge.clone()))?;
        Ok(gauge)
    }

    pub fn counter(&self, name: &str) -> Option<CounterVec> {
        match self.lookup(name)? {
            CustomMetric::Counter(counter) => Some(counter),
            _ => None,
        }
    }

    pub fn histogram(&self, name: &str) -> Option<HistogramVec> {
        match self.lookup(name)? {
            CustomMetric::Histogram(histogram) => Some(histogram),
            _ => None,
        }
    }

    pub fn gauge(&self, name: &str) -> Option<GaugeVec> {
        match self.lookup(name)? {
            CustomMetric::Gauge(gauge) => Some(gauge),
            _ => None,
        }
    }

    /// Text exposition format.
    pub fn render(&self) -> MetricsResult<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }

    fn register_custom(&self, name: &str, metric: CustomMetric) -> MetricsResult<()> {
        let mut custom = self.custom.lock().unwrap_or_else(PoisonError::into_inner);
        if custom.contains_key(name) {
            return Err(MetricsError::Duplicate(name.to_string()));
        }
        let collector: Box<dyn prometheus::core::Collector> = match &metric {
            CustomMetric::Counter(counter) => Box::new(counter.clone()),
            CustomMetric::Histogram(histogram) => Box::new(histogram.clone()),
            CustomMetric::Gauge(gauge) => Box::new(gauge.clone()),
        };
        self.registry.register(collector)?;
        custom.insert(name.to_string(), metric);
        Ok(())
    }

    fn lookup(&self, name: &str) -> Option<CustomMetric> {
        self.custom
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }
}
