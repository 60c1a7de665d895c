//! Integration tests for the fetch-extract-aggregate pipeline.
//!
//! These tests verify the full flow:
//! 1. Fan out one unit per target
//! 2. Fetch (mocked or over real HTTP)
//! 3. Extract fields
//! 4. Aggregate numeric fields
//! 5. Assemble the report in registry order

use std::sync::Arc;
use std::time::Duration;

use proptest::prelude::*;
use telemetry::{
    testing::{full_station_page, station_page, TestScenario},
    ErrorKind, ExecutorKind, FetchPolicy, FieldId, FieldValue, MockResponse, Pipeline,
    PipelineContext, TargetRegistry, TargetStatus, ThreadExecutor,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_all_targets_succeed() {
    let scenario = TestScenario::new()
        .station("10", "100")
        .station("20", "200")
        .station("30", "300");

    let report = scenario
        .pipeline()
        .report(&scenario.registry())
        .await
        .unwrap();

    assert_eq!(report.results.len(), 3);
    assert_eq!(report.total(FieldId::DailyPower), 60);
    assert_eq!(report.total(FieldId::TodayPrice), 600);
    assert_eq!(report.failed_count(), 0);
    assert_eq!(scenario.fetcher().call_count(), 3);
}

#[tokio::test]
async fn test_timed_out_target_is_isolated() {
    let scenario = TestScenario::new()
        .station("10", "100")
        .failing_station(MockResponse::Timeout)
        .station("30", "300");

    let report = scenario
        .pipeline()
        .report(&scenario.registry())
        .await
        .unwrap();

    assert_eq!(report.results.len(), 3);

    let timed_out = &report.results[1];
    assert_eq!(timed_out.status, TargetStatus::Failed);
    assert_eq!(timed_out.fields.len(), 5);
    assert!(timed_out
        .fields
        .values()
        .all(|v| v.error_kind() == Some(ErrorKind::Timeout)));

    assert_eq!(
        report.results[0].get(FieldId::DailyPower),
        Some(&FieldValue::Present("10".into()))
    );
    assert_eq!(
        report.results[2].get(FieldId::DailyPower),
        Some(&FieldValue::Present("30".into()))
    );
    assert_eq!(report.total(FieldId::DailyPower), 40);
}

#[tokio::test]
async fn test_missing_field_does_not_drop_others() {
    let markup = station_page(&[
        (FieldId::OnlineDate, "2019/05/01"),
        (FieldId::DailyPower, "12"),
        (FieldId::TotalPrice, "1,000"),
        (FieldId::SystemTime, "12:00"),
    ]);
    let scenario = TestScenario::new()
        .station_with_markup(markup)
        .station("8", "80");

    let report = scenario
        .pipeline()
        .report(&scenario.registry())
        .await
        .unwrap();

    let first = &report.results[0];
    assert_eq!(first.status, TargetStatus::Extracted);
    assert_eq!(
        first.get(FieldId::TodayPrice),
        Some(&FieldValue::Missing(FieldId::TodayPrice))
    );
    assert_eq!(first.get(FieldId::DailyPower).unwrap().as_text(), Some("12"));
    assert_eq!(first.get(FieldId::SystemTime).unwrap().as_text(), Some("12:00"));

    let keys: Vec<_> = first.fields.keys().copied().collect();
    assert_eq!(keys, FieldId::ALL.to_vec());

    assert_eq!(report.total(FieldId::DailyPower), 20);
    assert_eq!(report.total(FieldId::TodayPrice), 80);
}

#[tokio::test]
async fn test_total_failure_keeps_report_shape() {
    let scenario = TestScenario::new()
        .failing_station(MockResponse::Network("connection refused".into()))
        .failing_station(MockResponse::Status(500))
        .failing_station(MockResponse::Timeout);

    let report = scenario
        .pipeline()
        .report(&scenario.registry())
        .await
        .unwrap();

    assert_eq!(report.results.len(), 3);
    assert_eq!(report.failed_count(), 3);
    assert_eq!(report.total(FieldId::DailyPower), 0);
    assert_eq!(report.total(FieldId::TodayPrice), 0);

    let kinds: Vec<_> = report
        .results
        .iter()
        .map(|r| r.get(FieldId::DailyPower).unwrap().error_kind())
        .collect();
    assert_eq!(
        kinds,
        vec![
            Some(ErrorKind::Network),
            Some(ErrorKind::HttpStatus),
            Some(ErrorKind::Timeout)
        ]
    );
}

#[tokio::test]
async fn test_failure_does_not_change_sibling_results() {
    let healthy = TestScenario::new()
        .station("10", "100")
        .station("20", "200")
        .station("30", "300");
    let degraded = TestScenario::new()
        .station("10", "100")
        .failing_station(MockResponse::Panic("parser blew up".into()))
        .station("30", "300");

    let baseline = healthy.pipeline().report(&healthy.registry()).await.unwrap();
    let report = degraded
        .pipeline()
        .report(&degraded.registry())
        .await
        .unwrap();

    for i in [0, 2] {
        assert_eq!(
            report.results[i].fields, baseline.results[i].fields,
            "target {} changed",
            i
        );
    }
    assert!(report.results[1]
        .fields
        .values()
        .all(|v| v.error_kind() == Some(ErrorKind::Internal)));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_thread_executor_preserves_guarantees() {
    let scenario = TestScenario::new()
        .slow_station("10", "100", Duration::from_millis(80))
        .failing_station(MockResponse::Timeout)
        .station("30", "300");
    let pipeline = Pipeline::new(
        PipelineContext::new(Arc::new(scenario.fetcher().clone()))
            .with_executor(Arc::new(ThreadExecutor::new())),
    );

    let report = pipeline.report(&scenario.registry()).await.unwrap();

    assert_eq!(report.results.len(), 3);
    assert_eq!(
        report.results[0].address,
        scenario.registry().targets()[0].address()
    );
    assert!(report.results[1].is_failed());
    assert_eq!(report.total(FieldId::DailyPower), 40);
}

#[tokio::test]
async fn test_custom_aggregate_fields() {
    let scenario = TestScenario::new().station("10", "100").station("20", "200");
    let pipeline = Pipeline::new(
        PipelineContext::new(Arc::new(scenario.fetcher().clone()))
            .with_aggregate_fields(vec![FieldId::TotalPrice]),
    );

    let report = pipeline.report(&scenario.registry()).await.unwrap();

    assert_eq!(report.aggregates.len(), 1);
    assert_eq!(report.total(FieldId::TotalPrice), 2_000_000);
}

#[tokio::test]
async fn test_empty_registry_yields_empty_report() {
    let scenario = TestScenario::new();
    let registry = TargetRegistry::from_json_str(r#"{"targets": []}"#).unwrap();

    let report = scenario.pipeline().report(&registry).await.unwrap();

    assert!(report.results.is_empty());
    assert_eq!(report.failed_count(), 0);
    assert_eq!(report.aggregates.len(), 2);
    assert_eq!(report.total(FieldId::DailyPower), 0);
    assert_eq!(report.total(FieldId::TodayPrice), 0);
    assert_eq!(scenario.fetcher().call_count(), 0);
}

#[tokio::test]
async fn test_unreadable_registry_is_fatal() {
    let scenario = TestScenario::new().station("1", "1");
    let err = scenario
        .pipeline()
        .report_from(Some(std::path::Path::new("/nonexistent/targets.json")))
        .await
        .unwrap_err();

    assert!(err.to_string().contains("config error"));
    assert_eq!(scenario.fetcher().call_count(), 0);
}

#[tokio::test]
async fn test_http_end_to_end_with_timeout_and_retry() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/station1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(full_station_page("10", "100")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/station2"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(full_station_page("20", "200"))
                .set_delay(Duration::from_secs(3)),
        )
        .expect(1)
        .mount(&server)
        .await;
    // One transient failure before the real page
    Mock::given(method("GET"))
        .and(path("/station3"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/station3"))
        .respond_with(ResponseTemplate::new(200).set_body_string(full_station_page("30", "300")))
        .mount(&server)
        .await;

    let registry = TargetRegistry::from_json_str(&format!(
        r#"{{"targets": [
            {{"address": "{0}/station1", "fields": ["lbl_daily_pw", "lbl_today_price"]}},
            {{"address": "{0}/station2", "fields": ["lbl_daily_pw", "lbl_today_price"]}},
            {{"address": "{0}/station3", "fields": ["lbl_daily_pw", "lbl_today_price"]}}
        ]}}"#,
        server.uri()
    ))
    .unwrap();

    let policy = FetchPolicy::new()
        .with_timeout(Duration::from_millis(500))
        .with_backoff_base(Duration::from_millis(10));
    let pipeline = Pipeline::new(PipelineContext::http(policy, ExecutorKind::Task).unwrap());

    let report = pipeline.report(&registry).await.unwrap();

    assert_eq!(report.results.len(), 3);
    assert_eq!(report.results[0].status, TargetStatus::Extracted);
    assert!(report.results[1]
        .fields
        .values()
        .all(|v| v.error_kind() == Some(ErrorKind::Timeout)));
    assert_eq!(
        report.results[2].get(FieldId::DailyPower).unwrap().as_text(),
        Some("30")
    );
    assert_eq!(report.total(FieldId::DailyPower), 40);
    assert_eq!(report.total(FieldId::TodayPrice), 400);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_report_length_and_order_match_registry(
        plan in proptest::collection::vec((any::<bool>(), 0u64..20), 1..7)
    ) {
        let mut scenario = TestScenario::new();
        for (i, (healthy, delay)) in plan.iter().enumerate() {
            scenario = if *healthy {
                scenario.slow_station(&i.to_string(), "1", Duration::from_millis(*delay))
            } else {
                scenario.failing_station(MockResponse::Status(502))
            };
        }
        let registry = scenario.registry();

        let report = tokio_test::block_on(scenario.pipeline().report(&registry)).unwrap();

        prop_assert_eq!(report.results.len(), plan.len());
        for (i, result) in report.results.iter().enumerate() {
            prop_assert_eq!(result.address.as_str(), registry.targets()[i].address());
            prop_assert_eq!(result.is_failed(), !plan[i].0);
        }

        let expected: i64 = plan
            .iter()
            .enumerate()
            .filter(|(_, (healthy, _))| *healthy)
            .map(|(i, _)| i as i64)
            .sum();
        prop_assert_eq!(report.total(FieldId::DailyPower), expected);
    }
}
