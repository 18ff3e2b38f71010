use std::collections::BTreeSet;

use chrono::{TimeZone, Utc};
use eventkit::data::CloudEventData;
use eventkit::error::Error;
use eventkit::event::{CloudEvent, SPEC_VERSION};
use serde_json::json;

fn keys(event: &CloudEvent) -> BTreeSet<&'static str> {
    event.attributes().into_keys().collect()
}

fn json_data() -> CloudEventData {
    CloudEventData::new()
        .with_content_type("application/json")
        .unwrap()
        .with_schema("schema")
        .with_data(json!({"hello": "world"}))
}

#[test]
fn test_required_fields() {
    let missing_type = CloudEvent::builder().source("test").build();
    assert!(matches!(missing_type, Err(Error::EventValidation(msg)) if msg.contains("type")));

    let missing_source = CloudEvent::builder().event_type("co.outcome.type").build();
    assert!(matches!(missing_source, Err(Error::EventValidation(msg)) if msg.contains("source")));

    let blank = CloudEvent::builder().event_type("  ").source("").build();
    assert!(matches!(blank, Err(Error::EventValidation(_))));
}

#[test]
fn test_required_id() {
    let mut event = CloudEvent::builder()
        .event_type("co.outcome.type")
        .source("test")
        .build()
        .unwrap();

    assert!(uuid::Uuid::parse_str(event.id()).is_ok());

    let id = event.id().to_string();
    assert!(event.set_id("").is_err());
    assert!(event.set_id("   ").is_err());
    assert_eq!(event.id(), id);

    event.set_id("custom-id").unwrap();
    assert_eq!(event.id(), "custom-id");
}

#[test]
fn test_generated_ids_are_unique() {
    let build = || {
        CloudEvent::builder()
            .event_type("co.outcome.type")
            .source("test")
            .build()
            .unwrap()
    };
    assert_ne!(build().id(), build().id());
}

#[test]
fn test_fixed_spec_version() {
    let mut event = CloudEvent::builder()
        .event_type("co.outcome.type")
        .source("test")
        .build()
        .unwrap();

    assert_eq!(event.spec_version(), SPEC_VERSION);
    assert!(event.set_spec_version("1.0").is_ok());
    assert!(matches!(event.set_spec_version("1.1"), Err(Error::EventValidation(_))));
    assert_eq!(event.spec_version(), "1.0");

    let wrong = CloudEvent::builder()
        .event_type("co.outcome.type")
        .source("test")
        .spec_version("0.3")
        .build();
    assert!(matches!(wrong, Err(Error::EventValidation(_))));
}

#[test]
fn test_default_time() {
    let before = Utc::now();
    let event = CloudEvent::builder()
        .event_type("co.outcome.type")
        .source("test")
        .build()
        .unwrap();

    let time = event.time().copied().unwrap();
    assert!(time >= before && time <= Utc::now());
}

#[test]
fn test_explicit_and_suppressed_time() {
    let fixed = Utc.with_ymd_and_hms(2020, 11, 4, 0, 0, 0).unwrap();

    let with_time = CloudEvent::builder()
        .event_type("co.outcome.type")
        .source("test")
        .time(fixed)
        .build()
        .unwrap();
    assert_eq!(with_time.time(), Some(&fixed));

    let without_time = CloudEvent::builder()
        .event_type("co.outcome.type")
        .source("test")
        .without_time()
        .build()
        .unwrap();
    assert_eq!(without_time.time(), None);
    assert!(!keys(&without_time).contains("time"));
}

#[test]
fn test_no_data() {
    let event = CloudEvent::builder()
        .event_type("co.outcome.type")
        .source("test")
        .build()
        .unwrap();

    assert_eq!(event.data_content_type(), None);
    assert_eq!(event.data(), None);
    assert_eq!(event.data_schema(), None);
}

#[test]
fn test_data() {
    let data = json_data();
    let event = CloudEvent::builder()
        .event_type("co.outcome.type")
        .source("test")
        .data(data.clone())
        .build()
        .unwrap();

    assert_eq!(event.data_content_type(), Some("application/json;charset=utf-8"));
    assert_eq!(event.data(), Some(&data));
    assert_eq!(event.data_schema(), Some("schema"));
}

#[test]
fn test_attributes() {
    let data = json_data();
    let event = CloudEvent::builder()
        .event_type("co.outcome.type")
        .source("test")
        .subject("subject")
        .data(data.clone())
        .build()
        .unwrap();

    let attributes = event.attributes();

    assert_eq!(attributes["datacontenttype"], data.data_content_type().unwrap());
    assert_eq!(attributes["dataschema"], data.data_schema().unwrap());
    assert_eq!(attributes["specversion"], "1.0");
    assert_eq!(
        keys(&event),
        BTreeSet::from(["time", "type", "source", "id", "specversion", "subject", "dataschema", "datacontenttype"])
    );
}

#[test]
fn test_attributes_no_data() {
    let event = CloudEvent::builder()
        .event_type("co.outcome.type")
        .source("test")
        .subject("subject")
        .build()
        .unwrap();

    assert_eq!(
        keys(&event),
        BTreeSet::from(["time", "type", "source", "id", "specversion", "subject"])
    );
}

#[test]
fn test_attributes_partial_data() {
    let cases = [
        (CloudEventData::new().with_content_type("application/json").unwrap(), "datacontenttype"),
        (CloudEventData::new().with_schema("schema"), "dataschema"),
    ];

    for (data, attribute) in cases {
        let event = CloudEvent::builder()
            .event_type("co.outcome.type")
            .source("test")
            .subject("subject")
            .data(data)
            .build()
            .unwrap();

        assert_eq!(
            keys(&event),
            BTreeSet::from(["time", "type", "source", "id", "specversion", "subject", attribute])
        );
    }
}

#[test]
fn test_time_attribute_is_rfc3339() {
    let event = CloudEvent::builder()
        .event_type("co.outcome.type")
        .source("test")
        .time(Utc.with_ymd_and_hms(2020, 11, 5, 0, 0, 0).unwrap())
        .build()
        .unwrap();

    assert_eq!(event.attributes()["time"], "2020-11-05T00:00:00+00:00");
}

#[test]
fn test_equality_is_attribute_wise() {
    let build = |subject: &str| {
        CloudEvent::builder()
            .id("fixed")
            .event_type("co.outcome.type")
            .source("test")
            .subject(subject)
            .without_time()
            .build()
            .unwrap()
    };

    assert_eq!(build("a"), build("a"));
    assert_ne!(build("a"), build("b"));
}

#[test]
fn test_setters_validate() {
    let mut event = CloudEvent::builder()
        .event_type("co.outcome.type")
        .source("test")
        .build()
        .unwrap();

    assert!(event.set_source(" ").is_err());
    assert!(event.set_event_type("").is_err());
    assert_eq!(event.source(), "test");
    assert_eq!(event.event_type(), "co.outcome.type");

    event.set_subject(Some("subject".to_string()));
    event.set_time(None);
    event.set_data(Some(json_data()));
    assert_eq!(event.subject(), Some("subject"));
    assert_eq!(event.time(), None);
    assert!(event.data_mut().is_some());
}
