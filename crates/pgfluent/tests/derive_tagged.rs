#![allow(dead_code)]

use chrono::{NaiveDateTime, TimeZone, Utc};
use pgfluent::{FieldKind, FluentError, RowMap, Tagged, Value, extract_columns, scan_one};

#[derive(Debug, Default, PartialEq, Tagged)]
struct Audit {
    #[fluent(column = "updated_by")]
    updated_by: String,
}

#[derive(Debug, Default, Tagged)]
struct Account {
    #[fluent(nested)]
    audit: Audit,
    #[fluent(column = "account_id")]
    id: i32,
    #[fluent(column = "balance")]
    balance: f32,
    #[fluent(column = "opened_at")]
    opened_at: NaiveDateTime,
    #[fluent(column = "api_token", unsettable)]
    token: String,
    #[fluent(column = "overdraft")]
    overdraft: Option<i64>,
    scratch: Vec<u8>,
}

fn mapping<const N: usize>(pairs: [(&str, Value); N]) -> RowMap {
    pairs
        .into_iter()
        .map(|(column, value)| (column.to_string(), value))
        .collect()
}

#[test]
fn descriptors_follow_declaration_order() {
    let tags: Vec<_> = Account::FIELDS.iter().map(|f| f.tag).collect();
    assert_eq!(
        tags,
        vec![
            "audit",
            "account_id",
            "balance",
            "opened_at",
            "api_token",
            "overdraft"
        ]
    );
    assert_eq!(Account::field("audit").unwrap().kind, FieldKind::Nested);
    assert_eq!(Account::field("balance").unwrap().kind, FieldKind::Float);
    assert_eq!(Account::field("opened_at").unwrap().kind, FieldKind::Timestamp);
    assert_eq!(Account::field("account_id").unwrap().name, "id");
}

#[test]
fn plain_nested_struct_and_narrow_types_are_filled() {
    let opened = Utc.with_ymd_and_hms(2023, 3, 1, 9, 0, 0).unwrap();
    let mut account = Account::default();
    scan_one(
        &mut account,
        &mapping([
            ("account_id", Value::Int(7)),
            ("balance", Value::Bytes(b"99.5".to_vec())),
            ("opened_at", Value::Timestamp(opened)),
            ("overdraft", Value::Int(0)),
            ("updated_by", Value::Text("ops".into())),
        ]),
    )
    .unwrap();

    assert_eq!(account.id, 7);
    assert_eq!(account.balance, 99.5);
    assert_eq!(account.opened_at, opened.naive_utc());
    assert_eq!(account.overdraft, Some(0));
    assert_eq!(account.audit.updated_by, "ops");
}

#[test]
fn unsettable_column_in_row_is_rejected() {
    let mut account = Account::default();
    let err = scan_one(&mut account, &mapping([("api_token", Value::Text("t".into()))]))
        .unwrap_err();
    assert!(matches!(err, FluentError::NotSettable(field) if field == "token"));
}

#[test]
fn extraction_skips_nested_and_zero_fields() {
    let account = Account {
        audit: Audit {
            updated_by: "ops".into(),
        },
        balance: 1.5,
        token: "secret".into(),
        overdraft: Some(0),
        scratch: vec![1, 2, 3],
        ..Default::default()
    };
    let (columns, args) = extract_columns(&account);
    assert_eq!(columns, vec!["balance", "api_token", "overdraft"]);
    assert_eq!(
        args,
        vec![
            Value::Float(1.5),
            Value::Text("secret".into()),
            Value::Int(0)
        ]
    );
}
