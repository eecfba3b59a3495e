//! Client tests against a mocked TenneT server.

mod common;

use chrono::Utc;
use pretty_assertions::assert_eq;
use tennet_client::datetime::MARKET_TZ;
use tennet_client::{datasets, ErrorKind, TennetError, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

use common::{date, load_fixture, MockTennet};

fn xml_response(name: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_string(load_fixture(name))
}

fn mount_export_month(mock: &MockTennet, datefrom: &str, dateto: &str, fixture: &str) {
    mock.mount(
        Mock::given(method("GET"))
            .and(path("/export_data.aspx"))
            .and(query_param("exporttype", "verrekenprijzen"))
            .and(query_param("format", "xml"))
            .and(query_param("datefrom", datefrom))
            .and(query_param("dateto", dateto))
            .and(query_param("submit", "1"))
            .respond_with(xml_response(fixture)),
    );
}

#[test]
fn test_single_day_file_issues_one_request() {
    let mock = MockTennet::start();
    mock.mount(
        Mock::given(method("GET"))
            .and(path("/xml/laddersize15/20230101.xml"))
            .respond_with(xml_response("laddersize15_20230101.xml")),
    );

    let day = date(2023, 1, 1);
    let table = mock.client().query_ladder_size_15(day, day).unwrap();

    assert_eq!(mock.requested(), vec!["/xml/laddersize15/20230101.xml"]);
    assert_eq!(table.len(), 3);

    let times: Vec<String> = table
        .datetimes()
        .into_iter()
        .map(|dt| dt.unwrap().to_rfc3339())
        .collect();
    assert_eq!(
        times,
        vec![
            "2023-01-01T00:00:00+01:00",
            "2023-01-01T00:15:00+01:00",
            "2023-01-01T00:30:00+01:00",
        ]
    );
    assert_eq!(table.rows()[2].get("RAMPUP_REQUIRED"), Some(&Value::Null));
}

#[test]
fn test_daily_family_requests_every_day_in_order() {
    let mock = MockTennet::start();
    mock.mount(
        Mock::given(method("GET"))
            .and(path("/xml/laddersize15/20230101.xml"))
            .respond_with(xml_response("laddersize15_20230101.xml")),
    );
    mock.mount(
        Mock::given(method("GET"))
            .and(path("/xml/laddersize15/20230102.xml"))
            .respond_with(xml_response("empty.xml")),
    );

    let table = mock
        .client()
        .query_ladder_size_15(date(2023, 1, 1), date(2023, 1, 2))
        .unwrap();

    assert_eq!(
        mock.requested(),
        vec![
            "/xml/laddersize15/20230101.xml",
            "/xml/laddersize15/20230102.xml",
        ]
    );
    assert_eq!(table.len(), 3);
}

#[test]
fn test_monthly_family_concatenates_three_windows() {
    let mock = MockTennet::start();
    mount_export_month(&mock, "15-01-2023", "31-01-2023", "verrekenprijzen_2023_01.xml");
    mount_export_month(&mock, "01-02-2023", "28-02-2023", "verrekenprijzen_2023_02.xml");
    mount_export_month(&mock, "01-03-2023", "10-03-2023", "verrekenprijzen_2023_03.xml");

    let table = mock
        .client()
        .query_settlement_prices(date(2023, 1, 15), date(2023, 3, 10))
        .unwrap();

    assert_eq!(mock.requested().len(), 3);
    assert_eq!(table.len(), 4);
    assert!(table.has_column("UPWARD_DISPATCH"));

    let times: Vec<String> = table
        .datetimes()
        .into_iter()
        .map(|dt| dt.unwrap().to_rfc3339())
        .collect();
    assert_eq!(
        times,
        vec![
            "2023-01-15T00:15:00+01:00",
            // PTU 96 wraps to midnight of its own DATE
            "2023-01-31T00:00:00+01:00",
            "2023-02-01T00:15:00+01:00",
            "2023-03-10T01:00:00+01:00",
        ]
    );
    assert_eq!(
        table.rows()[3].get("UPWARD_INCIDENT_RESERVE"),
        Some(&Value::Float(250.0))
    );
}

#[test]
fn test_export_window_query_string() {
    let mock = MockTennet::start();
    mount_export_month(&mock, "01-02-2023", "28-02-2023", "verrekenprijzen_2023_02.xml");

    mock.client()
        .query_settlement_prices(date(2023, 2, 1), date(2023, 2, 28))
        .unwrap();

    assert_eq!(
        mock.requested(),
        vec!["/export_data.aspx?exporttype=verrekenprijzen&format=xml&datefrom=01-02-2023&dateto=28-02-2023&submit=1"]
    );
}

#[test]
fn test_failing_window_aborts_query() {
    let mock = MockTennet::start();
    mount_export_month(&mock, "15-01-2023", "31-01-2023", "verrekenprijzen_2023_01.xml");
    mock.mount(
        Mock::given(method("GET"))
            .and(path("/export_data.aspx"))
            .and(query_param("datefrom", "01-02-2023"))
            .respond_with(ResponseTemplate::new(500)),
    );
    mount_export_month(&mock, "01-03-2023", "10-03-2023", "verrekenprijzen_2023_03.xml");

    let err = mock
        .client()
        .query_settlement_prices(date(2023, 1, 15), date(2023, 3, 10))
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Retrieval);
    match err {
        TennetError::Retrieval { status, url } => {
            assert_eq!(status, 500);
            assert!(url.contains("exporttype=verrekenprijzen"));
            assert!(url.contains("datefrom=01-02-2023"));
        }
        other => panic!("unexpected error: {other}"),
    }

    // No request is made after the failing window
    assert_eq!(mock.requested().len(), 2);
}

#[test]
fn test_missing_day_file_is_retrieval_error() {
    let mock = MockTennet::start();
    mock.mount(
        Mock::given(method("GET"))
            .and(path("/xml/brov/20230101.xml"))
            .respond_with(ResponseTemplate::new(404)),
    );

    let day = date(2023, 1, 1);
    let err = mock
        .client()
        .query_available_afrr_capacity(day, day)
        .unwrap_err();
    assert!(matches!(err, TennetError::Retrieval { status: 404, .. }));
}

#[test]
fn test_empty_single_day_yields_zero_rows() {
    let mock = MockTennet::start();
    mock.mount(
        Mock::given(method("GET"))
            .and(path("/xml/priceladder/20230101.xml"))
            .respond_with(xml_response("empty.xml")),
    );

    let day = date(2023, 1, 1);
    let table = mock.client().query_bid_price_ladder(day, day).unwrap();
    assert!(table.is_empty());
}

#[test]
fn test_empty_monthly_window_is_parse_error() {
    let mock = MockTennet::start();
    mock.mount(
        Mock::given(method("GET"))
            .and(path("/export_data.aspx"))
            .respond_with(xml_response("empty.xml")),
    );

    let err = mock
        .client()
        .query_settlement_prices(date(2023, 1, 1), date(2023, 1, 31))
        .unwrap_err();
    assert!(matches!(err, TennetError::EmptyPayload { .. }));
    assert_eq!(err.kind(), ErrorKind::Parse);
}

#[test]
fn test_malformed_payload_is_parse_error() {
    let mock = MockTennet::start();
    mock.mount(
        Mock::given(method("GET"))
            .and(path("/xml/imbalanceprice/20230101.xml"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html><body>oops")),
    );

    let day = date(2023, 1, 1);
    let err = mock.client().query_imbalance_price(day, day).unwrap_err();
    assert!(matches!(err, TennetError::XmlParse(_)));
}

#[test]
fn test_single_window_dataset_sends_whole_range() {
    let mock = MockTennet::start();
    mock.mount(
        Mock::given(method("GET"))
            .and(path("/export_data.aspx"))
            .and(query_param("exporttype", "noodvermogen"))
            .and(query_param("datefrom", "15-01-2023"))
            .and(query_param("dateto", "10-03-2023"))
            .respond_with(xml_response("verrekenprijzen_2023_01.xml")),
    );

    let table = mock
        .client()
        .query_emergency_power(date(2023, 1, 15), date(2023, 3, 10))
        .unwrap();
    assert_eq!(mock.requested().len(), 1);
    assert_eq!(table.len(), 2);
}

#[test]
fn test_generic_query_matches_named_method() {
    let mock = MockTennet::start();
    mock.mount(
        Mock::given(method("GET"))
            .and(path("/xml/laddersize15/20230101.xml"))
            .respond_with(xml_response("laddersize15_20230101.xml")),
    );

    let client = mock.client();
    let day = date(2023, 1, 1);
    let named = client.query_ladder_size_15(day, day).unwrap();
    let generic = client.query_day(&datasets::LADDER_SIZE_15, day).unwrap();
    assert_eq!(named, generic);
}

#[test]
fn test_actual_imbalance_stamped_with_today() {
    let mock = MockTennet::start();
    mock.mount(
        Mock::given(method("GET"))
            .and(path("/xml/balancedeltaprices/balans-delta.xml"))
            .respond_with(xml_response("balans-delta.xml")),
    );

    let today = Utc::now().with_timezone(&MARKET_TZ).date_naive();
    let table = mock.client().query_actual_imbalance().unwrap();

    assert_eq!(table.len(), 2);
    assert!(table.has_column("DATE"));
    assert_eq!(table.rows()[0].get("SEQUENCE_NUMBER"), Some(&Value::Integer(781)));

    for row in table.rows() {
        let dt = row.datetime.expect("13:00 is never ambiguous");
        assert_eq!(dt.date_naive(), today);
        assert_eq!(row.date, Some(today));
    }
}
