//! Services offered by the native shell that embeds the page.
//!
//! Both are optional. Without a host, notices are rendered in-page and the
//! viewport height comes from the page alone.

#[cfg(feature = "web")]
pub mod web;

use crate::model::ScreenMetricsError;
use serde::Deserialize;
use std::cell::RefCell;
use tracing::warn;

/// Callbacks exposed by the embedding shell.
pub trait Host {
    /// Show a short native toast.
    fn toast(&self, message: &str);

    /// Raw screen metrics JSON: `{"width":..,"height":..,"density":..}`.
    fn screen_metrics(&self) -> Option<String>;
}

/// Physical screen metrics reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ScreenMetrics {
    /// Width in physical pixels.
    pub width: f64,
    /// Height in physical pixels.
    pub height: f64,
    /// Physical pixels per CSS pixel.
    pub density: f64,
}

impl ScreenMetrics {
    /// Parse the host payload.
    pub fn parse(json: &str) -> Result<Self, ScreenMetricsError> {
        let metrics: Self = serde_json::from_str(json)?;
        if !(metrics.density.is_finite() && metrics.density > 0.0) {
            return Err(ScreenMetricsError::InvalidDensity(metrics.density));
        }
        Ok(metrics)
    }

    /// Screen height in CSS pixels.
    pub fn css_height(&self) -> f64 {
        self.height / self.density
    }
}

/// Query the host for screen metrics, logging and discarding malformed payloads.
pub fn query_screen_metrics(host: &dyn Host) -> Option<ScreenMetrics> {
    let raw = host.screen_metrics()?;
    match ScreenMetrics::parse(&raw) {
        Ok(metrics) => Some(metrics),
        Err(e) => {
            warn!(error = %e, "Ignoring screen metrics from host");
            None
        }
    }
}

/// Host that records toasts and returns canned metrics.
#[derive(Debug, Default)]
pub struct RecordingHost {
    toasts: RefCell<Vec<String>>,
    metrics: Option<String>,
}

impl RecordingHost {
    /// Host with no screen metrics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Host that reports `metrics` verbatim.
    pub fn with_metrics(metrics: &str) -> Self {
        Self {
            toasts: RefCell::default(),
            metrics: Some(metrics.to_string()),
        }
    }

    /// Toasts shown so far.
    pub fn toasts(&self) -> Vec<String> {
        self.toasts.borrow().clone()
    }
}

impl Host for RecordingHost {
    fn toast(&self, message: &str) {
        self.toasts.borrow_mut().push(message.to_string());
    }

    fn screen_metrics(&self) -> Option<String> {
        self.metrics.clone()
    }
}

impl<H: Host + ?Sized> Host for std::rc::Rc<H> {
    fn toast(&self, message: &str) {
        (**self).toast(message)
    }

    fn screen_metrics(&self) -> Option<String> {
        (**self).screen_metrics()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_android_payload() {
        let metrics = ScreenMetrics::parse(r#"{"width":1080,"height":1920,"density":2.0}"#)
            .expect("valid payload");
        assert_eq!(metrics.css_height(), 960.0);
    }

    #[test]
    fn rejects_zero_density() {
        let result = ScreenMetrics::parse(r#"{"width":1,"height":1,"density":0}"#);
        assert!(matches!(result, Err(ScreenMetricsError::InvalidDensity(_))));
    }

    #[test]
    fn malformed_payload_is_treated_as_absent() {
        let host = RecordingHost::with_metrics("not json");
        assert_eq!(query_screen_metrics(&host), None);
    }

    #[test]
    fn recording_host_keeps_toasts_in_order() {
        let host = RecordingHost::new();
        host.toast("a");
        host.toast("b");
        assert_eq!(host.toasts(), vec!["a", "b"]);
    }
}
