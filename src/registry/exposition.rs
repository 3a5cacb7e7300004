//! Text exposition format: producing `/metrics` output and consuming a
//! remote service's scrape.
//!
//! One sample per line, `name{label="value",...} value`. Comment lines
//! begin with `#`. Histograms expose `_count`, `_sum`, `_min` and `_max`
//! samples.

use std::fmt::Write as _;

use crate::registry::registry::{Labels, RegistrySnapshot};

/// Render a registry snapshot in the text exposition format.
pub fn render(snapshot: &RegistrySnapshot) -> String {
    let mut out = String::new();

    let mut last_family = "";
    for counter in &snapshot.counters {
        if counter.name != last_family {
            let _ = writeln!(out, "# TYPE {} counter", counter.name);
            last_family = &counter.name;
        }
        let _ = writeln!(
            out,
            "{}{} {}",
            counter.name,
            render_labels(&counter.labels),
            counter.value
        );
    }

    for histogram in &snapshot.histograms {
        let labels = render_labels(&histogram.labels);
        let name = &histogram.name;
        let summary = &histogram.summary;
        let _ = writeln!(out, "# TYPE {} summary", name);
        let _ = writeln!(out, "{}_count{} {}", name, labels, summary.count);
        let _ = writeln!(out, "{}_sum{} {}", name, labels, summary.sum);
        let _ = writeln!(out, "{}_min{} {}", name, labels, summary.min);
        let _ = writeln!(out, "{}_max{} {}", name, labels, summary.max);
    }

    out
}

fn render_labels(labels: &Labels) -> String {
    if labels.is_empty() {
        return String::new();
    }
    let rendered: Vec<String> = labels
        .iter()
        .map(|(key, value)| format!("{}=\"{}\"", key, escape_label_value(value)))
        .collect();
    format!("{{{}}}", rendered.join(","))
}

fn escape_label_value(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Parse a text exposition body into (name, value) pairs.
///
/// Each non-comment line is split on whitespace; lines that do not split
/// into exactly two tokens, or whose second token is not numeric, are
/// skipped. The name token retains any label block.
pub fn parse(body: &str) -> Vec<(String, f64)> {
    let mut out = Vec::new();
    for line in body.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() != 2 {
            continue;
        }
        match tokens[1].parse::<f64>() {
            Ok(value) => out.push((tokens[0].to_string(), value)),
            Err(_) => continue,
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::MetricRegistry;

    #[test]
    fn test_render_counter_line() {
        let registry = MetricRegistry::new();
        for _ in 0..5 {
            registry.increment_counter("http_requests_total", 1, &[("endpoint", "/orders")]);
        }
        let body = render(&registry.snapshot());
        assert!(body.contains("http_requests_total{endpoint=\"/orders\"} 5\n"));
    }

    #[test]
    fn test_render_histogram_samples() {
        let registry = MetricRegistry::new();
        registry.record_histogram("request_duration_ms", 10.0, &[]);
        registry.record_histogram("request_duration_ms", 20.0, &[]);
        let body = render(&registry.snapshot());
        assert!(body.contains("request_duration_ms_count 2\n"));
        assert!(body.contains("request_duration_ms_sum 30\n"));
        assert!(body.contains("request_duration_ms_min 10\n"));
        assert!(body.contains("request_duration_ms_max 20\n"));
    }

    #[test]
    fn test_parse_skips_comments_and_garbage() {
        let body = "# HELP noise\nvalid_metric 3\nbad line with words\nonly_name\nnot_numeric abc\n";
        let parsed = parse(body);
        assert_eq!(parsed, vec![("valid_metric".to_string(), 3.0)]);
    }

    #[test]
    fn test_round_trip_counters() {
        let registry = MetricRegistry::new();
        registry.increment_counter("orders_total", 7, &[]);
        registry.increment_counter("stock_checks_total", 2, &[("service", "inventory")]);

        let parsed = parse(&render(&registry.snapshot()));
        assert!(parsed.contains(&("orders_total".to_string(), 7.0)));
        assert!(parsed.contains(&("stock_checks_total{service=\"inventory\"}".to_string(), 2.0)));
    }

    #[test]
    fn test_escaped_label_values() {
        let registry = MetricRegistry::new();
        registry.increment_counter("odd_total", 1, &[("path", "a\"b")]);
        let body = render(&registry.snapshot());
        assert!(body.contains("odd_total{path=\"a\\\"b\"} 1\n"));
    }
}
