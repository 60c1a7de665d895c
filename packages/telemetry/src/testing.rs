//! Testing utilities: markup builders and ready-made scenarios.
//!
//! These are useful for testing applications that consume the pipeline
//! without making real network calls.

use std::sync::Arc;
use std::time::Duration;

use crate::fetchers::{MockFetcher, MockResponse};
use crate::pipeline::{Pipeline, PipelineContext};
use crate::types::{
    field::FieldId,
    target::{Target, TargetRegistry},
};

/// Render a monitoring page with one `<span>` per given field.
pub fn station_page(values: &[(FieldId, &str)]) -> String {
    let spans: String = values
        .iter()
        .map(|(field, value)| format!("      <span id=\"{}\">{}</span>\n", field, value))
        .collect();

    format!(
        "<html>\n  <head><title>InstantPower</title></head>\n  <body>\n    <div class=\"panel\">\n{}    </div>\n  </body>\n</html>\n",
        spans
    )
}

/// A full station page with every field, using `daily` as the daily figure.
pub fn full_station_page(daily: &str, today_price: &str) -> String {
    station_page(&[
        (FieldId::OnlineDate, "2019/05/01"),
        (FieldId::DailyPower, daily),
        (FieldId::TodayPrice, today_price),
        (FieldId::TotalPrice, "1,000,000"),
        (FieldId::SystemTime, "2024/06/01 12:00:00"),
    ])
}

/// Builder for a registry plus a mock fetcher that answers for it.
///
/// # Example
///
/// ```rust
/// use telemetry::testing::TestScenario;
/// use telemetry::fetchers::MockResponse;
///
/// let scenario = TestScenario::new()
///     .station("10", "100")
///     .failing_station(MockResponse::Timeout)
///     .station("30", "300");
/// assert_eq!(scenario.registry().len(), 3);
/// ```
#[derive(Default)]
pub struct TestScenario {
    targets: Vec<Target>,
    fetcher: MockFetcher,
}

impl TestScenario {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_address(&self) -> String {
        format!("http://station{}.test/InstantPower.aspx", self.targets.len() + 1)
    }

    fn push(mut self, response: MockResponse, delay: Duration) -> Self {
        let address = self.next_address();
        self.fetcher.set_response(address.clone(), response);
        if !delay.is_zero() {
            self.fetcher.set_delay(address.clone(), delay);
        }
        let target = Target::new(address, FieldId::ALL).expect("generated target is valid");
        self.targets.push(target);
        self
    }

    /// Add a station that serves a complete page.
    pub fn station(self, daily: &str, today_price: &str) -> Self {
        let page = full_station_page(daily, today_price);
        self.push(MockResponse::Content(page), Duration::ZERO)
    }

    /// Add a station that serves a complete page after `delay`.
    pub fn slow_station(self, daily: &str, today_price: &str, delay: Duration) -> Self {
        let page = full_station_page(daily, today_price);
        self.push(MockResponse::Content(page), delay)
    }

    /// Add a station that serves arbitrary markup.
    pub fn station_with_markup(self, markup: impl Into<String>) -> Self {
        self.push(MockResponse::Content(markup.into()), Duration::ZERO)
    }

    /// Add a station whose fetch fails.
    pub fn failing_station(self, response: MockResponse) -> Self {
        self.push(response, Duration::ZERO)
    }

    pub fn registry(&self) -> TargetRegistry {
        TargetRegistry::new(self.targets.clone()).expect("scenario uses the default tag")
    }

    pub fn fetcher(&self) -> &MockFetcher {
        &self.fetcher
    }

    /// A pipeline backed by this scenario's mock fetcher.
    pub fn pipeline(&self) -> Pipeline {
        Pipeline::new(PipelineContext::new(Arc::new(self.fetcher.clone())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::Extractor;

    #[test]
    fn test_station_page_round_trip() {
        let html = station_page(&[(FieldId::DailyPower, "12"), (FieldId::SystemTime, "noon")]);
        let values = Extractor::default().extract(&html, &[FieldId::SystemTime, FieldId::DailyPower]);

        assert_eq!(values[&FieldId::SystemTime].as_text(), Some("noon"));
        assert_eq!(values[&FieldId::DailyPower].as_text(), Some("12"));
    }

    #[test]
    fn test_scenario_addresses_are_distinct() {
        let scenario = TestScenario::new().station("1", "1").station("2", "2");
        let registry = scenario.registry();

        assert_ne!(
            registry.targets()[0].address(),
            registry.targets()[1].address()
        );
    }
}
