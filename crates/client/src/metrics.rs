//! Prometheus counters for SQL requests.

use prometheus::IntCounter;

#[derive(Debug, Clone)]
pub struct Metrics {
    query_total: IntCounter,
    translate_total: IntCounter,
    request_errors_total: IntCounter,
}

impl Metrics {
    /// Create the counters and register them with the provided registry.
    pub fn initialize(metrics_registry: &mut prometheus::Registry) -> Result<Self, prometheus::Error> {
        let query_total = add_int_counter_metric(
            metrics_registry,
            "search_sql_query_total",
            "Total SQL query requests sent.",
        )?;

        let translate_total = add_int_counter_metric(
            metrics_registry,
            "search_sql_translate_total",
            "Total SQL translate requests sent.",
        )?;

        let request_errors_total = add_int_counter_metric(
            metrics_registry,
            "search_sql_request_errors_total",
            "Total SQL requests that failed after being sent.",
        )?;

        Ok(Self {
            query_total,
            translate_total,
            request_errors_total,
        })
    }

    pub fn record_query(&self) {
        self.query_total.inc();
    }

    pub fn record_translate(&self) {
        self.translate_total.inc();
    }

    pub fn record_error(&self) {
        self.request_errors_total.inc();
    }
}

/// Create a new int counter metric and register it with the provided Prometheus Registry
fn add_int_counter_metric(
    metrics_registry: &mut prometheus::Registry,
    metric_name: &str,
    metric_description: &str,
) -> Result<IntCounter, prometheus::Error> {
    let int_counter =
        IntCounter::with_opts(prometheus::Opts::new(metric_name, metric_description))?;
    metrics_registry.register(Box::new(int_counter.clone()))?;
    Ok(int_counter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_are_registered() {
        let mut registry = prometheus::Registry::new();
        let metrics = Metrics::initialize(&mut registry).unwrap();

        metrics.record_query();
        metrics.record_query();
        metrics.record_error();

        let families = registry.gather();
        let value = |name: &str| {
            families
                .iter()
                .find(|family| family.get_name() == name)
                .map(|family| family.get_metric()[0].get_counter().get_value())
        };

        assert_eq!(value("search_sql_query_total"), Some(2.0));
        assert_eq!(value("search_sql_translate_total"), Some(0.0));
        assert_eq!(value("search_sql_request_errors_total"), Some(1.0));
    }

    #[test]
    fn registering_twice_fails() {
        let mut registry = prometheus::Registry::new();
        Metrics::initialize(&mut registry).unwrap();
        assert!(Metrics::initialize(&mut registry).is_err());
    }
}
