use anyhow::Result;
use httpmock::prelude::*;
use std::io::Read;
use tempfile::TempDir;
use wsdot_traveler_info::app::{create_tables, print_dataset};
use wsdot_traveler_info::{Dataset, EtlError, TravelerInfoConfig};

const ALERTS_PATH: &str = "/HighwayAlerts/HighwayAlertsREST.svc/GetAlertsAsJson";
const TRAVEL_TIMES_PATH: &str = "/TravelTimes/TravelTimesREST.svc/GetTravelTimesAsJson";

fn alerts_body() -> serde_json::Value {
    serde_json::json!([
        {
            "AlertID": 311027,
            "County": null,
            "EventCategory": "Construction",
            "HeadlineDescription": "Northbound I-5, exit 163: ramp closed",
            "LastUpdatedTime": "/Date(1430006400000-0700)/",
            "Priority": "Low",
            "StartRoadwayLocation": {
                "Description": "I-5",
                "Direction": "N",
                "Latitude": 47.561,
                "MilePost": 163.2,
                "RoadName": "005"
            }
        },
        {
            "AlertID": 311028,
            "County": "King",
            "EventCategory": "Collision",
            "HeadlineDescription": "Blocking collision",
            "LastUpdatedTime": "/Date(1430010000000-0700)/",
            "Priority": "High",
            "StartRoadwayLocation": {
                "Description": "SR 520",
                "Direction": "W",
                "Latitude": 47.64,
                "MilePost": 2.5,
                "RoadName": "520"
            }
        }
    ])
}

fn travel_times_body() -> serde_json::Value {
    serde_json::json!([
        {
            "AverageTime": 25,
            "CurrentTime": 31,
            "Description": "Everett to Downtown Seattle",
            "TimeUpdated": "/Date(1430006400000-0700)/",
            "TravelTimeID": 2,
            "StartPoint": {"Description": "Everett", "LocationID": 5},
            "EndPoint": {"Description": "Seattle", "LocationID": 6}
        }
    ])
}

fn test_config(server: &MockServer, output_path: &str) -> TravelerInfoConfig {
    let mut config = TravelerInfoConfig::default();
    config.source.base_url = server.base_url();
    config.source.timeout_seconds = 5;
    config.auth.access_code = Some("test-access-code".to_string());
    config.auth.env_var = "WSDOT_TRAVELER_INFO_TEST_UNSET".to_string();
    config.load.output_path = output_path.to_string();
    config
}

#[tokio::test]
async fn test_create_tables_end_to_end() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let output_dir = temp_dir.path().join("TravelerInfo");
    let output_path = output_dir.to_str().unwrap().to_string();

    let server = MockServer::start();
    let alerts_mock = server.mock(|when, then| {
        when.method(GET)
            .path(ALERTS_PATH)
            .query_param("AccessCode", "test-access-code");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(alerts_body());
    });
    let travel_times_mock = server.mock(|when, then| {
        when.method(GET)
            .path(TRAVEL_TIMES_PATH)
            .query_param("AccessCode", "test-access-code");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(travel_times_body());
    });

    let mut config = test_config(&server, &output_path);
    config.load.output_formats = vec!["csv".to_string(), "json".to_string()];
    config.load.datasets = Some(vec!["HighwayAlerts".to_string(), "TravelTimes".to_string()]);

    let summary = create_tables(&config).await?;

    alerts_mock.assert();
    travel_times_mock.assert();

    assert_eq!(summary.reports.len(), 2);
    assert_eq!(summary.reports[0].dataset, Dataset::HighwayAlerts);
    assert_eq!(summary.reports[0].record_count, 2);
    assert_eq!(summary.reports[1].record_count, 1);

    // Delimited table: flattened columns, wrapped dates rendered in RFC 3339
    let csv = std::fs::read_to_string(output_dir.join("HighwayAlerts.csv"))?;
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(
        lines[0],
        "AlertID,County,EventCategory,HeadlineDescription,LastUpdatedTime,Priority,\
StartRoadwayLocationDescription,StartRoadwayLocationDirection,StartRoadwayLocationLatitude,\
StartRoadwayLocationMilePost,StartRoadwayLocationRoadName"
    );
    assert!(lines[1].starts_with("311027,,Construction,"));
    assert!(lines[1].contains("2015-04-25T17:00:00-07:00"));
    assert!(lines[2].contains("SR 520"));

    // Nested LocationID values are copied, not wrapped
    let json = std::fs::read(output_dir.join("TravelTimes.json"))?;
    let records: serde_json::Value = serde_json::from_slice(&json)?;
    assert_eq!(records[0]["StartPointLocationID"], 5);
    assert_eq!(records[0]["EndPointDescription"], "Seattle");
    assert_eq!(records[0]["TimeUpdated"], "2015-04-25T17:00:00-07:00");
    assert!(records[0].get("StartPoint").is_none());

    // Archive sits next to the output directory
    let archive_path = summary.archive.expect("archive should be created");
    assert_eq!(archive_path, temp_dir.path().join("TravelerInfo.zip"));
    let mut archive = zip::ZipArchive::new(std::fs::File::open(&archive_path)?)?;
    let mut names: Vec<String> = (0..archive.len())
        .map(|i| archive.by_index(i).map(|f| f.name().to_string()))
        .collect::<std::result::Result<_, _>>()?;
    names.sort();
    assert_eq!(
        names,
        vec![
            "TravelerInfo/HighwayAlerts.csv",
            "TravelerInfo/HighwayAlerts.json",
            "TravelerInfo/TravelTimes.csv",
            "TravelerInfo/TravelTimes.json",
        ]
    );

    let mut zipped_csv = String::new();
    archive
        .by_name("TravelerInfo/HighwayAlerts.csv")?
        .read_to_string(&mut zipped_csv)?;
    assert_eq!(zipped_csv, csv);

    Ok(())
}

#[tokio::test]
async fn test_create_tables_without_zip() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let output_dir = temp_dir.path().join("NoZip");

    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path(TRAVEL_TIMES_PATH);
        then.status(200).json_body(travel_times_body());
    });

    let mut config = test_config(&server, output_dir.to_str().unwrap());
    config.load.compress = false;
    config.load.datasets = Some(vec!["TravelTimes".to_string()]);

    let summary = create_tables(&config).await?;

    api_mock.assert();
    assert!(summary.archive.is_none());
    assert!(output_dir.join("TravelTimes.csv").exists());
    assert!(!temp_dir.path().join("NoZip.zip").exists());
    Ok(())
}

#[tokio::test]
async fn test_create_tables_stops_on_http_error() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let output_dir = temp_dir.path().join("Failed");

    let server = MockServer::start();
    let alerts_mock = server.mock(|when, then| {
        when.method(GET).path(ALERTS_PATH);
        then.status(500);
    });
    let travel_times_mock = server.mock(|when, then| {
        when.method(GET).path(TRAVEL_TIMES_PATH);
        then.status(200).json_body(travel_times_body());
    });

    let mut config = test_config(&server, output_dir.to_str().unwrap());
    config.load.datasets = Some(vec!["HighwayAlerts".to_string(), "TravelTimes".to_string()]);

    let err = create_tables(&config).await.unwrap_err();

    alerts_mock.assert();
    travel_times_mock.assert_hits(0);
    assert!(matches!(err, EtlError::HttpStatus { status: 500, .. }));
    assert!(!temp_dir.path().join("Failed.zip").exists());
    Ok(())
}

#[tokio::test]
async fn test_malformed_json_writes_nothing() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let output_dir = temp_dir.path().join("Malformed");

    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path(ALERTS_PATH);
        then.status(200).body("<html>Service Unavailable</html>");
    });

    let mut config = test_config(&server, output_dir.to_str().unwrap());
    config.load.datasets = Some(vec!["HighwayAlerts".to_string()]);

    let err = create_tables(&config).await.unwrap_err();

    api_mock.assert();
    assert!(matches!(err, EtlError::MalformedJson { .. }));
    assert!(!output_dir.join("HighwayAlerts.csv").exists());
    Ok(())
}

#[tokio::test]
async fn test_missing_access_code_fails_before_fetching() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET);
        then.status(200).json_body(serde_json::json!([]));
    });

    let mut config = test_config(&server, temp_dir.path().join("out").to_str().unwrap());
    config.auth.access_code = None;
    config.auth.access_code_file = temp_dir.path().join("accesscode.txt");

    let err = create_tables(&config).await.unwrap_err();

    api_mock.assert_hits(0);
    assert!(matches!(err, EtlError::AuthenticationMissing { .. }));
    assert_eq!(err.severity().exit_code(), 1);
    Ok(())
}

#[tokio::test]
async fn test_access_code_from_file() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let code_file = temp_dir.path().join("accesscode.txt");
    std::fs::write(&code_file, "code-from-file\n")?;

    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET)
            .path(ALERTS_PATH)
            .query_param("AccessCode", "code-from-file");
        then.status(200).json_body(alerts_body());
    });

    let mut config = test_config(&server, temp_dir.path().join("out").to_str().unwrap());
    config.auth.access_code = None;
    config.auth.access_code_file = code_file;

    let report = print_dataset(&config, Dataset::HighwayAlerts).await?;

    api_mock.assert();
    assert_eq!(report.record_count, 2);
    assert_eq!(report.outputs, vec!["<stdout>"]);
    Ok(())
}

#[tokio::test]
async fn test_list_valued_field_is_rejected() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path(ALERTS_PATH);
        then.status(200)
            .json_body(serde_json::json!([{"AlertID": 1, "Tags": ["a", "b"]}]));
    });

    let config = test_config(&server, temp_dir.path().join("out").to_str().unwrap());
    let err = print_dataset(&config, Dataset::HighwayAlerts)
        .await
        .unwrap_err();

    api_mock.assert();
    assert!(matches!(
        err,
        EtlError::UnsupportedShape { ref field, .. } if field == "Tags"
    ));
    Ok(())
}
