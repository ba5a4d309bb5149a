use super::*;
use chrono::{TimeZone, Utc};

fn ints(values: &[i64]) -> Vec<Value> {
    values.iter().copied().map(Value::Int).collect()
}

#[test]
fn test_select_basic() {
    let stmt = StatementBuilder::new("test").build_select(&["*"]).unwrap();
    assert_eq!(stmt.sql(), "SELECT * FROM test");
    assert!(stmt.args().is_empty());
}

#[test]
fn test_select_end_to_end_clause_order() {
    let stmt = StatementBuilder::new("test")
        .filter("id", "=", 1)
        .order_by(&["id"])
        .limit(5)
        .build_select(&["id", "name"])
        .unwrap();

    assert_eq!(
        stmt.sql(),
        "SELECT id,name FROM test ORDER BY id WHERE id = $1 LIMIT $2"
    );
    assert_eq!(stmt.args(), ints(&[1, 5]).as_slice());
}

#[test]
fn test_select_all_clauses() {
    let stmt = StatementBuilder::new("test")
        .filter("total", "=", 12.00)
        .group_by(&["is_active"])
        .order_by(&["total"])
        .offset(5)
        .limit(10)
        .build_select(&["*"])
        .unwrap();

    assert_eq!(
        stmt.sql(),
        "SELECT * FROM test GROUP BY is_active ORDER BY total WHERE total = $1 OFFSET $2 LIMIT $3"
    );
    assert_eq!(
        stmt.args(),
        &[Value::Float(12.0), Value::Int(5), Value::Int(10)]
    );
}

#[test]
fn test_zero_offset_and_limit_are_not_emitted() {
    let stmt = StatementBuilder::new("test")
        .offset(0)
        .limit(0)
        .build_select(&["*"])
        .unwrap();
    assert_eq!(stmt.sql(), "SELECT * FROM test");
    assert!(stmt.args().is_empty());

    let stmt = StatementBuilder::new("test")
        .offset(0)
        .limit(5)
        .build_select(&["*"])
        .unwrap();
    assert_eq!(stmt.sql(), "SELECT * FROM test LIMIT $1");
    assert_eq!(stmt.args(), ints(&[5]).as_slice());
}

#[test]
fn test_filters_chain_with_and() {
    let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let stmt = StatementBuilder::new("test")
        .filter("id", "=", 1)
        .filter("created_at", ">", created)
        .filter("name", "=", "gerald")
        .build_select(&["*"])
        .unwrap();

    assert_eq!(
        stmt.sql(),
        "SELECT * FROM test WHERE id = $1 AND created_at > $2 AND name = $3"
    );
    assert_eq!(
        stmt.args(),
        &[
            Value::Int(1),
            Value::Timestamp(created),
            Value::Text("gerald".into())
        ]
    );
}

#[test]
fn test_n_filters_yield_one_where_and_consecutive_placeholders() {
    for n in 1..=8usize {
        let mut builder = StatementBuilder::new("t");
        for i in 0..n {
            builder = builder.filter(&format!("c{i}"), "=", i as i64);
        }
        let stmt = builder.build_select(&["*"]).unwrap();

        assert_eq!(stmt.sql().matches("WHERE").count(), 1);
        assert_eq!(stmt.sql().matches(" AND ").count(), n - 1);
        for p in 1..=n {
            assert!(stmt.sql().contains(&format!("${p}")));
        }
        assert!(!stmt.sql().contains(&format!("${}", n + 1)));
        assert_eq!(stmt.args().len(), n);
    }
}

#[test]
fn test_where_null_after_filters_continues_with_and() {
    let stmt = StatementBuilder::new("test")
        .where_null("deleted_at", true)
        .filter("id", "=", 1)
        .where_null("name", false)
        .build_select(&["*"])
        .unwrap();

    assert_eq!(
        stmt.sql(),
        "SELECT * FROM test WHERE id = $1 AND deleted_at IS NULL AND name IS NOT NULL"
    );
    assert_eq!(stmt.args(), ints(&[1]).as_slice());
}

#[test]
fn test_where_null_alone_opens_where() {
    let stmt = StatementBuilder::new("test")
        .where_null("created_at", true)
        .build_select(&["*"])
        .unwrap();
    assert_eq!(stmt.sql(), "SELECT * FROM test WHERE created_at IS NULL");
    assert!(stmt.args().is_empty());
}

#[test]
fn test_joins_come_before_left_joins() {
    let stmt = StatementBuilder::new("test_1 as t1")
        .left_join("test_3 as t3", "t3.test_id", "t1.id")
        .join("test_2 as t2", "t2.test_id", "t1.id")
        .build_select(&["t1.name", "t2.is_active"])
        .unwrap();

    assert_eq!(
        stmt.sql(),
        "SELECT t1.name,t2.is_active FROM test_1 as t1 \
         INNER JOIN test_2 as t2 ON t2.test_id = t1.id \
         LEFT JOIN test_3 as t3 ON t3.test_id = t1.id"
    );
}

#[test]
fn test_group_and_order_by_replace() {
    let stmt = StatementBuilder::new("test")
        .order_by(&["name"])
        .order_by(&["id", "name DESC"])
        .group_by(&["a"])
        .group_by(&["id", "name"])
        .build_select(&["id", "name"])
        .unwrap();
    assert_eq!(
        stmt.sql(),
        "SELECT id,name FROM test GROUP BY id,name ORDER BY id,name DESC"
    );
}

#[test]
fn test_malformed_join_fails_at_build() {
    let err = StatementBuilder::new("test")
        .join("", "a.id", "b.id")
        .build_select(&["*"])
        .unwrap_err();
    assert!(err.is_malformed());

    let err = StatementBuilder::new("test")
        .left_join("other", "a.id", " ")
        .build_select(&["*"])
        .unwrap_err();
    assert!(err.is_malformed());
}

#[test]
fn test_malformed_filter_fails_at_build() {
    let err = StatementBuilder::new("test")
        .filter("id", "", 1)
        .build_select(&["*"])
        .unwrap_err();
    assert!(err.is_malformed());

    let err = StatementBuilder::new("test")
        .where_null("", true)
        .build_select(&["*"])
        .unwrap_err();
    assert!(err.is_malformed());
}

#[test]
fn test_empty_table_or_columns_fail() {
    assert!(
        StatementBuilder::new("")
            .build_select(&["*"])
            .unwrap_err()
            .is_malformed()
    );
    assert!(
        StatementBuilder::new("t")
            .build_select(&[])
            .unwrap_err()
            .is_malformed()
    );
}

#[test]
fn test_insert_basic() {
    let stmt = StatementBuilder::new("t")
        .build_insert(&["a", "b"], vec![Value::Int(1), Value::from("y")])
        .unwrap();
    assert_eq!(stmt.sql(), "INSERT INTO t (a,b) VALUES ($1,$2)");
    assert_eq!(stmt.args(), &[Value::Int(1), Value::Text("y".into())]);
}

#[test]
fn test_insert_three_columns() {
    let stmt = StatementBuilder::new("test")
        .build_insert(
            &["name", "total", "is_active"],
            vec![Value::from("gerald"), Value::from(12.0), Value::from(1)],
        )
        .unwrap();
    assert_eq!(
        stmt.sql(),
        "INSERT INTO test (name,total,is_active) VALUES ($1,$2,$3)"
    );
}

#[test]
fn test_insert_ignores_filters_and_appends_returning() {
    let stmt = StatementBuilder::new("test")
        .filter("id", "=", 3)
        .limit(1)
        .returning("id")
        .build_insert(&["name"], vec![Value::from("gerald")])
        .unwrap();
    assert_eq!(
        stmt.sql(),
        "INSERT INTO test (name) VALUES ($1) RETURNING id"
    );
    assert_eq!(stmt.args(), &[Value::Text("gerald".into())]);
}

#[test]
fn test_insert_payload_mismatch_fails() {
    assert!(
        StatementBuilder::new("t")
            .build_insert(&[], vec![])
            .unwrap_err()
            .is_malformed()
    );
    assert!(
        StatementBuilder::new("t")
            .build_insert(&["a", "b"], vec![Value::Int(1)])
            .unwrap_err()
            .is_malformed()
    );
}

#[test]
fn test_update_without_where() {
    let stmt = StatementBuilder::new("t")
        .build_update(&["a"], vec![Value::Int(7)])
        .unwrap();
    assert_eq!(stmt.sql(), "UPDATE t SET a = $1");
    assert_eq!(stmt.args(), ints(&[7]).as_slice());
}

#[test]
fn test_update_continues_placeholders_into_where() {
    let stmt = StatementBuilder::new("test")
        .filter("id", "=", 1)
        .where_null("deleted_at", true)
        .build_update(
            &["name", "total"],
            vec![Value::from("gerald"), Value::from(12.0)],
        )
        .unwrap();
    assert_eq!(
        stmt.sql(),
        "UPDATE test SET name = $1, total = $2 WHERE id = $3 AND deleted_at IS NULL"
    );
    assert_eq!(
        stmt.args(),
        &[
            Value::Text("gerald".into()),
            Value::Float(12.0),
            Value::Int(1)
        ]
    );
}

#[test]
fn test_update_ignores_paging() {
    let stmt = StatementBuilder::new("t")
        .order_by(&["id"])
        .limit(3)
        .offset(2)
        .build_update(&["a"], vec![Value::Int(1)])
        .unwrap();
    assert_eq!(stmt.sql(), "UPDATE t SET a = $1");
}

#[test]
fn test_params_align_with_args() {
    let stmt = StatementBuilder::new("t")
        .filter("a", "=", 1)
        .filter("b", "<>", "x")
        .build_select(&["*"])
        .unwrap();
    assert_eq!(stmt.params().len(), stmt.args().len());
    assert_eq!(stmt.to_string(), stmt.sql());
}

#[test]
fn test_builders_are_independent() {
    let base = StatementBuilder::new("test").filter("id", "=", 1);
    let first = base.clone().limit(1).build_select(&["*"]).unwrap();
    let second = base.build_select(&["id"]).unwrap();

    assert_eq!(first.sql(), "SELECT * FROM test WHERE id = $1 LIMIT $2");
    assert_eq!(second.sql(), "SELECT id FROM test WHERE id = $1");
}
