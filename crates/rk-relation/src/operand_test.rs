use super::*;
use crate::connection::ConnectionOptions;
use crate::relation::{InsertMode, Relation};
use rk_db::{Database, DuckDbBackend};

fn lab() -> Arc<Connection> {
    let db = DuckDbBackend::in_memory().unwrap();
    for sql in [
        "CREATE SCHEMA lab",
        "CREATE TABLE lab.subject (\
            subject_id INTEGER PRIMARY KEY, \
            species VARCHAR NOT NULL, \
            photo BLOB)",
        "CREATE TABLE lab.session (\
            subject_id INTEGER REFERENCES lab.subject(subject_id), \
            session_id INTEGER, \
            duration DOUBLE, \
            PRIMARY KEY (subject_id, session_id))",
        "CREATE TABLE lab.rig (rig_id INTEGER PRIMARY KEY)",
        "INSERT INTO lab.subject VALUES (1, 'mouse', NULL), (2, 'rat', NULL), (3, 'mouse', NULL)",
        "INSERT INTO lab.session VALUES (1, 1, 10.0), (1, 2, 20.0), (2, 1, 5.0)",
        "INSERT INTO lab.rig VALUES (1), (2)",
    ] {
        db.query(sql, &[]).unwrap();
    }
    Arc::new(Connection::new(
        Arc::new(db),
        ConnectionOptions { safe_mode: false },
    ))
}

fn table(conn: &Arc<Connection>, name: &str) -> Relation {
    Relation::free(conn.clone(), &format!("lab.{name}")).unwrap()
}

#[test]
fn test_restriction_sql() {
    assert_eq!(Restriction::from("a > 1").to_sql().as_deref(), Some("a > 1"));
    assert_eq!(Restriction::from("   ").to_sql(), None);
    assert_eq!(Restriction::Equals(vec![]).to_sql(), None);
    assert_eq!(
        Restriction::Equals(vec![
            ("species".into(), Value::from("mouse")),
            ("photo".into(), Value::Null),
        ])
        .to_sql()
        .as_deref(),
        Some("\"species\" = 'mouse' AND \"photo\" IS NULL")
    );
}

#[test]
fn test_where_clause() {
    assert_eq!(where_clause(&[]), "");
    assert_eq!(
        where_clause(&[Restriction::from("a = 1"), Restriction::from("b = 2 OR c = 3")]),
        " WHERE (a = 1) AND (b = 2 OR c = 3)"
    );
}

#[test]
fn test_from_record_skips_unknown_and_blob_fields() {
    let heading = Heading::new(vec![
        Attribute::new("subject_id", "INTEGER").in_key(),
        Attribute::new("photo", "BLOB"),
    ]);
    let record = Record::named([
        ("subject_id", Value::Int(1)),
        ("photo", Value::Bytes(vec![1])),
        ("age", Value::Int(3)),
    ]);
    assert_eq!(
        Restriction::from_record(&record, &heading),
        Restriction::Equals(vec![("subject_id".into(), Value::Int(1))])
    );
}

#[test]
fn test_relation_sql_and_count() {
    let conn = lab();
    let subject = table(&conn, "subject");
    assert_eq!(
        subject.sql().unwrap(),
        "SELECT \"subject_id\",\"species\",\"photo\" FROM \"memory\".\"lab\".\"subject\""
    );
    assert_eq!(subject.count().unwrap(), 3);

    let mice = subject.restrict("species = 'mouse'");
    assert_eq!(mice.count().unwrap(), 2);
    assert_eq!(subject.count().unwrap(), 3);
}

#[test]
fn test_restrict_by_record() {
    let conn = lab();
    let subject = table(&conn, "subject");
    let record = Record::named([("species", Value::from("rat")), ("unrelated", Value::Int(1))]);
    let rats = subject.restrict_by(&record).unwrap();
    let rows = rats.fetch().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("subject_id"), Some(&Value::Int(2)));
}

#[test]
fn test_fetch_one_empty() {
    let conn = lab();
    let none = table(&conn, "subject").restrict("subject_id > 100");
    assert!(none.fetch_one().unwrap().is_none());
    assert!(none.fetch().unwrap().is_empty());
}

#[test]
fn test_project_keeps_key_and_renames() {
    let conn = lab();
    let session = table(&conn, "session");
    let proj = session.project(&[], &[("duration", "minutes")]).unwrap();
    assert_eq!(
        proj.heading().unwrap().names().collect::<Vec<_>>(),
        vec!["subject_id", "session_id", "minutes"]
    );

    let long = proj.restrict("minutes > 8");
    assert_eq!(long.count().unwrap(), 2);
    let row = long
        .restrict("session_id = 2")
        .fetch_one()
        .unwrap()
        .unwrap();
    assert_eq!(row.get("minutes"), Some(&Value::Float(20.0)));
}

#[test]
fn test_project_drops_unlisted_attributes() {
    let conn = lab();
    let proj = table(&conn, "subject").project(&["species"], &[]).unwrap();
    assert_eq!(
        proj.heading().unwrap().names().collect::<Vec<_>>(),
        vec!["subject_id", "species"]
    );
    assert_eq!(proj.restrict("species = 'mouse'").count().unwrap(), 2);
}

#[test]
fn test_project_unknown_attribute() {
    let conn = lab();
    let err = table(&conn, "subject")
        .project(&["weight"], &[])
        .unwrap_err();
    assert!(matches!(
        err,
        RelationError::UnknownAttribute { ref attribute, .. } if attribute == "weight"
    ));
}

#[test]
fn test_project_rename_collision() {
    let conn = lab();
    let err = table(&conn, "subject")
        .project(&[], &[("species", "subject_id")])
        .unwrap_err();
    assert!(matches!(err, RelationError::InvalidExpression(_)));
}

#[test]
fn test_natural_join() {
    let conn = lab();
    let subject = table(&conn, "subject");
    let session = table(&conn, "session");
    let joined = subject.join(&session).unwrap();
    assert_eq!(
        joined.heading().unwrap().names().collect::<Vec<_>>(),
        vec!["subject_id", "species", "photo", "session_id", "duration"]
    );
    assert_eq!(joined.count().unwrap(), 3);
    assert_eq!(joined.restrict("species = 'rat'").count().unwrap(), 1);
}

#[test]
fn test_join_restricted_operands() {
    let conn = lab();
    let mice = table(&conn, "subject").restrict("species = 'mouse'");
    let long = table(&conn, "session").restrict("duration > 8");
    assert_eq!(mice.join(&long).unwrap().count().unwrap(), 2);
}

#[test]
fn test_join_without_shared_attributes_is_cross_product() {
    let conn = lab();
    let joined = table(&conn, "subject")
        .join(&table(&conn, "rig"))
        .unwrap();
    assert_eq!(joined.count().unwrap(), 6);
}

#[test]
fn test_aggregate() {
    let conn = lab();
    let session = table(&conn, "session");
    let totals = session
        .aggregate(
            &["subject_id"],
            &[("n", "COUNT(*)"), ("total", "SUM(duration)")],
        )
        .unwrap();
    assert_eq!(totals.heading().unwrap().primary_key(), vec!["subject_id"]);
    assert_eq!(totals.count().unwrap(), 2);

    let busy = totals.restrict("n > 1").fetch().unwrap();
    assert_eq!(busy.len(), 1);
    assert_eq!(busy[0].get("subject_id"), Some(&Value::Int(1)));
    assert_eq!(busy[0].get("total"), Some(&Value::Float(30.0)));
}

#[test]
fn test_aggregate_without_grouping() {
    let conn = lab();
    let total = table(&conn, "session")
        .aggregate(&[], &[("n", "COUNT(*)")])
        .unwrap();
    let row = total.fetch_one().unwrap().unwrap();
    assert_eq!(row.get("n"), Some(&Value::Int(3)));
}

#[test]
fn test_aggregate_rejects_empty_expression() {
    let conn = lab();
    let err = table(&conn, "session")
        .aggregate(&["subject_id"], &[("n", " ")])
        .unwrap_err();
    assert!(matches!(err, RelationError::InvalidExpression(_)));
}

#[test]
fn test_fetch_unpacks_blobs_in_join() {
    let conn = lab();
    let subject = table(&conn, "subject");
    conn.query("DELETE FROM lab.session WHERE subject_id = 1", &[])
        .unwrap();
    subject.restrict("subject_id = 1").delete_quick().unwrap();
    subject
        .insert(
            &Record::named([
                ("subject_id", Value::Int(9)),
                ("species", Value::from("vole")),
                ("photo", Value::Bytes(vec![0xde, 0xad])),
            ]),
            InsertMode::Insert,
        )
        .unwrap();
    conn.query("INSERT INTO lab.session VALUES (9, 1, 1.0)", &[])
        .unwrap();

    let joined = subject.join(&table(&conn, "session")).unwrap();
    let row = joined.restrict("subject_id = 9").fetch_one().unwrap().unwrap();
    assert_eq!(row.get("photo"), Some(&Value::Bytes(vec![0xde, 0xad])));
}
