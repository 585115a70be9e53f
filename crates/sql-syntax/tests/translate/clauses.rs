use model::query::Sort;
use sql_syntax::{ParseError, translate};

fn formula(sql: &str) -> Option<String> {
    translate(sql).unwrap().filter_formula().map(str::to_string)
}

#[test]
fn test_and_list_of_equalities() {
    assert_eq!(
        formula("SELECT * FROM T WHERE a = 'x' AND b = 5"),
        Some("AND({a} = 'x',{b} = 5)".into())
    );
    assert_eq!(
        formula("SELECT Name, Email FROM Contacts WHERE Status = 'Active' and Score = 10"),
        Some("AND({Status} = 'Active',{Score} = 10)".into())
    );
}

#[test]
fn test_record_id_predicates() {
    assert_eq!(
        formula("SELECT * FROM Contacts WHERE id = 'rec123'"),
        Some("RECORD_ID() = 'rec123'".into())
    );
    assert_eq!(
        formula("SELECT c.Name FROM Contacts c WHERE c.id = \"rec123\""),
        Some("RECORD_ID() = 'rec123'".into())
    );
    assert_eq!(
        translate("SELECT * FROM Contacts WHERE id = ''").unwrap_err(),
        ParseError::EmptyRecordId
    );
}

#[test]
fn test_quote_escaping() {
    assert_eq!(
        formula("SELECT * FROM People WHERE Name = 'O''Brien'"),
        Some(r"{Name} = 'O\'Brien'".into())
    );
    assert_eq!(
        formula(r#"SELECT * FROM People WHERE Name = "it's""#),
        Some(r"{Name} = 'it\'s'".into())
    );
}

#[test]
fn test_multi_word_field_names() {
    assert_eq!(
        formula("SELECT * FROM People WHERE First Name = 'Ada' ORDER BY Last Name DESC"),
        Some("{First Name} = 'Ada'".into())
    );
    let query = translate("SELECT * FROM People ORDER BY Last Name DESC").unwrap();
    assert_eq!(query.sorts(), &[Sort::desc("Last Name")]);
}

#[test]
fn test_rejects_unsupported_predicates() {
    let err = translate("SELECT * FROM Contacts WHERE Status LIKE 'A%'").unwrap_err();
    assert_eq!(
        err,
        ParseError::UnsupportedPredicate("Status LIKE 'A%'".into())
    );

    let err = translate("SELECT * FROM Contacts WHERE Score > 5").unwrap_err();
    assert!(matches!(err, ParseError::UnsupportedPredicate(_)));

    let err = translate("SELECT * FROM Contacts WHERE (Score = 5)").unwrap_err();
    assert!(matches!(err, ParseError::UnsupportedPredicate(_)));
}

#[test]
fn test_rejects_empty_and_segments() {
    assert_eq!(
        translate("SELECT * FROM T WHERE a = 'x' AND").unwrap_err(),
        ParseError::UnsupportedPredicate("a = 'x' AND".into())
    );
    assert_eq!(
        translate("SELECT * FROM T WHERE AND a = 'x' AND AND b = 1").unwrap_err(),
        ParseError::UnsupportedPredicate("AND a = 'x' AND AND b = 1".into())
    );
    assert_eq!(
        translate("SELECT * FROM T WHERE a = 'x' AND AND b = 1 LIMIT 2").unwrap_err(),
        ParseError::UnsupportedPredicate("a = 'x' AND AND b = 1".into())
    );
    assert_eq!(formula("SELECT * FROM T WHERE LIMIT 3"), None);
}

#[test]
fn test_decimal_point_numbers() {
    assert_eq!(
        formula("SELECT * FROM T WHERE a = .5"),
        Some("{a} = .5".into())
    );
    assert_eq!(
        formula("SELECT * FROM T WHERE a = 5. AND b = -.25"),
        Some("AND({a} = 5.,{b} = -.25)".into())
    );
}

#[test]
fn test_rejects_unquoted_literal() {
    let err = translate("SELECT * FROM Contacts WHERE Status = Active").unwrap_err();
    assert_eq!(err, ParseError::InvalidLiteral("Active".into()));
    assert!(err.to_string().ends_with("Active"));
}

#[test]
fn test_order_by_preserves_sequence() {
    let query = translate("SELECT * FROM T ORDER BY a DESC, b ASC, c").unwrap();
    assert_eq!(
        query.sorts(),
        &[Sort::desc("a"), Sort::asc("b"), Sort::asc("c")]
    );
}

#[test]
fn test_order_by_requires_by() {
    let err = translate("SELECT * FROM T ORDER a").unwrap_err();
    assert!(matches!(err, ParseError::UnexpectedToken { context: "ORDER BY", .. }));
}

#[test]
fn test_rejects_unsupported_order_by() {
    let err = translate("SELECT * FROM T ORDER BY a = b").unwrap_err();
    assert_eq!(err, ParseError::UnsupportedOrderBy("a = b".into()));
}

#[test]
fn test_rejects_empty_order_by_items() {
    assert_eq!(
        translate("SELECT * FROM T ORDER BY a, , b,").unwrap_err(),
        ParseError::UnsupportedOrderBy("a, , b,".into())
    );
    assert_eq!(
        translate("SELECT * FROM T ORDER BY a DESC, LIMIT 5").unwrap_err(),
        ParseError::UnsupportedOrderBy("a DESC,".into())
    );
    assert_eq!(
        translate("SELECT * FROM T ORDER BY , a").unwrap_err(),
        ParseError::UnsupportedOrderBy(", a".into())
    );
}

#[test]
fn test_limit() {
    let query = translate("SELECT * FROM T LIMIT 42;").unwrap();
    assert_eq!(query.max_records(), Some(42));

    assert_eq!(
        translate("SELECT * FROM T LIMIT").unwrap_err(),
        ParseError::MissingLimit
    );
    assert_eq!(
        translate("SELECT * FROM T LIMIT ten").unwrap_err(),
        ParseError::InvalidLimit("ten".into())
    );
    assert_eq!(
        translate("SELECT * FROM T LIMIT 2.5").unwrap_err(),
        ParseError::InvalidLimit("2.5".into())
    );
    assert_eq!(
        translate("SELECT * FROM T LIMIT 0").unwrap_err(),
        ParseError::InvalidLimit("0".into())
    );
}
