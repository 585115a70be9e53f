use super::{MockTransport, crm_metadata, engine, param, params};
use connectors::error::ExecutionError;
use engine_core::EngineError;
use model::{Value, query::Sort};
use serde_json::json;
use sql_syntax::ParseError;
use std::sync::Arc;
use tracing_test::traced_test;

const JOIN_SQL: &str = "SELECT c.Name, c.Since, o.Industry AS Sector \
     FROM Contacts c LEFT JOIN Organizations o ON c.OrgId = o.id \
     WHERE Status = 'Active' ORDER BY c.Name LIMIT 10";

fn crm_transport() -> MockTransport {
    MockTransport::new()
        .metadata(crm_metadata())
        .records(
            "Contacts",
            json!([
                {"id": "rec1", "fields": {"Name": "Ada", "OrgId": ["recOrg1"], "Since": "2021-04-01"}},
                {"id": "rec2", "fields": {"Name": "Grace", "OrgId": ["recOrg1", "recOrg2"]}},
                {"id": "rec3", "fields": {"Name": "Linus"}}
            ]),
        )
        .page(
            "Organizations",
            None,
            json!([{"id": "recOrg1", "fields": {"Industry": "Tech"}}]),
            Some("itrOrg"),
        )
        .page(
            "Organizations",
            Some("itrOrg"),
            json!([{"id": "recOrg2", "fields": {"Industry": "Retail"}}]),
            None,
        )
}

#[traced_test]
#[tokio::test]
async fn test_left_join_end_to_end() {
    let transport = Arc::new(crm_transport());
    let engine = engine(transport.clone(), Some("Active contacts"));

    let result = engine.run(JOIN_SQL, 0).await.unwrap();

    assert_eq!(result.labels, vec!["c.Name", "c.Since", "Sector"]);
    let pairs: Vec<(String, Value)> = result
        .rows
        .iter()
        .map(|row| {
            (
                row.get_or_null("c.Name").display_string(),
                row.get_or_null("Sector"),
            )
        })
        .collect();
    assert_eq!(
        pairs,
        vec![
            ("Ada".to_string(), Value::from("Tech")),
            ("Grace".to_string(), Value::from("Tech")),
            ("Grace".to_string(), Value::from("Retail")),
            ("Linus".to_string(), Value::Null),
        ]
    );
    assert!(matches!(result.rows[0].get("c.Since"), Some(Value::Date(_))));
    assert_eq!(result.rows[3].get("c.Since"), Some(&Value::Null));
    assert!(logs_contain("Query finished"));
}

#[tokio::test]
async fn test_base_and_join_requests() {
    let transport = Arc::new(crm_transport());
    let engine = engine(transport.clone(), Some("Active contacts"));

    engine.run(JOIN_SQL, 0).await.unwrap();

    let base = transport.table_requests("Contacts");
    assert_eq!(base.len(), 1);
    assert_eq!(params(&base[0], "fields[]"), vec!["Name", "Since", "OrgId"]);
    assert_eq!(param(&base[0], "filterByFormula").as_deref(), Some("{Status} = 'Active'"));
    assert_eq!(param(&base[0], "maxRecords").as_deref(), Some("10"));
    assert_eq!(param(&base[0], "view").as_deref(), Some("Active contacts"));
    assert_eq!(param(&base[0], "sort[0][field]").as_deref(), Some("Name"));

    let joined = transport.table_requests("Organizations");
    assert_eq!(joined.len(), 2);
    assert_eq!(param(&joined[1], "offset").as_deref(), Some("itrOrg"));
    for url in &joined {
        assert_eq!(params(url, "fields[]"), vec!["Industry"]);
        assert_eq!(param(url, "view"), None);
        assert_eq!(param(url, "filterByFormula"), None);
        assert_eq!(param(url, "maxRecords"), None);
        assert_eq!(param(url, "sort[0][field]"), None);
    }
}

#[tokio::test]
async fn test_max_rows_only_lowers_the_limit() {
    let transport = Arc::new(crm_transport());
    let engine = engine(transport.clone(), None);

    engine.run(JOIN_SQL, 3).await.unwrap();
    engine.run(JOIN_SQL, 50).await.unwrap();
    engine.run("SELECT Name FROM Contacts", 7).await.unwrap();

    let limits: Vec<Option<String>> = transport
        .table_requests("Contacts")
        .iter()
        .map(|url| param(url, "maxRecords"))
        .collect();
    assert_eq!(
        limits,
        vec![Some("3".to_string()), Some("10".to_string()), Some("7".to_string())]
    );
}

#[tokio::test]
async fn test_translate_scenario() {
    let engine = engine(Arc::new(MockTransport::new()), None);

    let query = engine
        .translate("SELECT Name, Email FROM Contacts WHERE Status = 'Active' ORDER BY Name DESC LIMIT 5")
        .unwrap();

    assert_eq!(query.table_name(), "Contacts");
    assert_eq!(query.column_labels(), vec!["Name", "Email"]);
    assert_eq!(query.filter_formula(), Some("{Status} = 'Active'"));
    assert_eq!(query.sorts(), &[Sort::desc("Name")]);
    assert_eq!(query.max_records(), Some(5));
}

#[tokio::test]
async fn test_parse_error_makes_no_request() {
    let transport = Arc::new(crm_transport());
    let engine = engine(transport.clone(), None);

    let err = engine.run("DELETE FROM Contacts", 0).await.unwrap_err();

    assert!(matches!(err, EngineError::Parse(ParseError::UnsupportedStatement(_))));
    assert!(transport.seen().is_empty());
}

#[tokio::test]
async fn test_join_failure_discards_base_rows() {
    let transport = Arc::new(
        MockTransport::new()
            .metadata(crm_metadata())
            .records("Contacts", json!([{"id": "rec1", "fields": {"Name": "Ada"}}]))
            .failure("Organizations", 503, "upstream unavailable"),
    );
    let engine = engine(transport, None);

    let err = engine.run(JOIN_SQL, 0).await.unwrap_err();

    match err {
        EngineError::Execution(ExecutionError::Status { status, body }) => {
            assert_eq!(status, 503);
            assert_eq!(body, "upstream unavailable");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_join_on_record_ids_only_skips_the_join_fetch() {
    let transport = Arc::new(crm_transport());
    let engine = engine(transport.clone(), None);

    let result = engine
        .run(
            "SELECT c.Name, o.id FROM Contacts c LEFT JOIN Organizations o ON c.OrgId = o.id",
            0,
        )
        .await
        .unwrap();

    assert!(transport.table_requests("Organizations").is_empty());
    assert_eq!(result.rows.len(), 3);
    assert!(result.rows.iter().all(|row| row.get("o.id") == Some(&Value::Null)));
}

#[tokio::test]
async fn test_execute_join_requires_a_join() {
    let engine = engine(Arc::new(crm_transport()), None);
    let query = engine.translate("SELECT Name FROM Contacts").unwrap();

    let err = engine.execute_join(&query).await.unwrap_err();
    assert!(matches!(err, ExecutionError::MissingJoin(ref table) if table == "Contacts"));
}

#[tokio::test]
async fn test_select_all_labels_follow_first_appearance() {
    let transport = Arc::new(
        MockTransport::new().metadata(crm_metadata()).records(
            "Contacts",
            json!([
                {"id": "rec1", "fields": {"Name": "Ada", "OrgId": ["recOrg1"]}},
                {"id": "rec2", "fields": {"Email": "g@x.io", "Name": "Grace"}}
            ]),
        ),
    );
    let engine = engine(transport.clone(), None);

    let result = engine.run("SELECT * FROM Contacts", 0).await.unwrap();

    assert_eq!(result.labels, vec!["id", "Name", "OrgId", "Email"]);
    assert_eq!(result.rows.len(), 2);
    assert_eq!(param(&transport.table_requests("Contacts")[0], "fields[]"), None);
}
