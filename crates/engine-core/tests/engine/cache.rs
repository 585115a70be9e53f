use super::{MockTransport, crm_metadata, engine};
use serde_json::json;
use std::{sync::Arc, time::Duration};
use tracing_test::traced_test;

#[traced_test]
#[tokio::test]
async fn test_concurrent_callers_share_one_metadata_fetch() {
    let transport = Arc::new(
        MockTransport::new()
            .metadata(crm_metadata())
            .delayed(Duration::from_millis(25)),
    );
    let engine = engine(transport.clone(), None);

    let (first, second, third) = tokio::join!(
        engine.field_types("Contacts"),
        engine.field_types("contacts"),
        engine.field_types("CONTACTS")
    );

    let first = first.unwrap();
    assert_eq!(first.get("since").map(String::as_str), Some("date"));
    assert_eq!(first, second.unwrap());
    assert_eq!(first, third.unwrap());
    assert_eq!(transport.metadata_requests(), 1);
    assert!(logs_contain("Cached field types"));
}

#[tokio::test]
async fn test_repeated_queries_reuse_cached_types() {
    let transport = Arc::new(
        MockTransport::new()
            .metadata(crm_metadata())
            .records("Contacts", json!([{"id": "rec1", "fields": {"Name": "Ada"}}]))
            .records("Organizations", json!([])),
    );
    let engine = engine(transport.clone(), None);
    let sql = "SELECT c.Name, o.Industry FROM Contacts c LEFT JOIN Organizations o ON c.OrgId = o.id";

    for _ in 0..3 {
        engine.run(sql, 0).await.unwrap();
    }

    assert_eq!(transport.metadata_requests(), 2);
    assert_eq!(transport.table_requests("Contacts").len(), 3);
}

#[tokio::test]
async fn test_table_descriptors_are_not_cached() {
    let transport = Arc::new(MockTransport::new().metadata(crm_metadata()));
    let engine = engine(transport.clone(), None);

    let tables = engine.fetch_table_descriptors().await.unwrap();
    engine.fetch_table_descriptors().await.unwrap();

    let names: Vec<_> = tables.iter().map(|table| table.name.as_str()).collect();
    assert_eq!(names, vec!["Contacts", "Organizations"]);
    assert_eq!(transport.metadata_requests(), 2);
}
