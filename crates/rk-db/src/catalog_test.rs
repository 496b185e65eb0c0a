use super::*;
use crate::duckdb::DuckDbBackend;

fn lab() -> DuckDbBackend {
    let db = DuckDbBackend::in_memory().unwrap();
    db.query("CREATE SCHEMA lab", &[]).unwrap();
    db.query(
        "CREATE TABLE lab.subject (\
            subject_id INTEGER PRIMARY KEY, \
            species VARCHAR NOT NULL DEFAULT 'mouse', \
            notes VARCHAR)",
        &[],
    )
    .unwrap();
    db.query(
        "CREATE TABLE lab.session (\
            subject_id INTEGER REFERENCES lab.subject(subject_id), \
            session_id INTEGER, \
            raw BLOB, \
            PRIMARY KEY (subject_id, session_id))",
        &[],
    )
    .unwrap();
    db
}

fn name(table: &str) -> FullTableName {
    FullTableName::new("lab", table).unwrap()
}

#[test]
fn test_database_exists_and_create() {
    let db = DuckDbBackend::in_memory().unwrap();
    assert!(database_exists(&db, "main").unwrap());
    assert!(!database_exists(&db, "ephys").unwrap());

    create_database(&db, "ephys").unwrap();
    assert!(database_exists(&db, "ephys").unwrap());
}

#[test]
fn test_create_database_twice_fails() {
    let db = DuckDbBackend::in_memory().unwrap();
    create_database(&db, "ephys").unwrap();
    assert!(create_database(&db, "ephys").is_err());
}

#[test]
fn test_table_exists() {
    let db = lab();
    assert!(table_exists(&db, &name("subject")).unwrap());
    assert!(!table_exists(&db, &name("missing")).unwrap());
    assert!(!table_exists(&db, &FullTableName::new("main", "subject").unwrap()).unwrap());
}

#[test]
fn test_tables() {
    let db = lab();
    assert_eq!(tables(&db, "lab").unwrap(), vec!["session", "subject"]);
    assert!(tables(&db, "main").unwrap().is_empty());
}

#[test]
fn test_columns_in_order_with_metadata() {
    let db = lab();
    let attrs = columns(&db, &name("subject")).unwrap();
    let names: Vec<&str> = attrs.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["subject_id", "species", "notes"]);

    assert!(attrs[0].in_key);
    assert!(!attrs[0].nullable);
    assert!(!attrs[1].in_key);
    assert!(!attrs[1].nullable);
    assert!(attrs[1].default.as_deref().unwrap().contains("mouse"));
    assert!(attrs[2].nullable);
    assert!(attrs[2].default.is_none());
}

#[test]
fn test_columns_blob_flag() {
    let db = lab();
    let attrs = columns(&db, &name("session")).unwrap();
    let raw = attrs.iter().find(|a| a.name == "raw").unwrap();
    assert!(raw.is_blob);
    assert!(attrs.iter().filter(|a| a.in_key).count() == 2);
}

#[test]
fn test_columns_missing_table_is_empty() {
    let db = lab();
    assert!(columns(&db, &name("missing")).unwrap().is_empty());
}

#[test]
fn test_primary_key() {
    let db = lab();
    let mut key = primary_key(&db, &name("session")).unwrap();
    key.sort();
    assert_eq!(key, vec!["session_id", "subject_id"]);
}

#[test]
fn test_foreign_key_in_primary_key_is_primary() {
    let db = lab();
    let edges = foreign_keys(&db, &name("session")).unwrap();
    assert_eq!(
        edges,
        vec![ForeignKeyEdge {
            referenced: name("subject"),
            kind: DependencyKind::Primary,
        }]
    );
    assert!(foreign_keys(&db, &name("subject")).unwrap().is_empty());
}

#[test]
fn test_foreign_key_outside_primary_key_is_secondary() {
    let db = lab();
    db.query(
        "CREATE TABLE lab.note (\
            note_id INTEGER PRIMARY KEY, \
            subject_id INTEGER REFERENCES lab.subject(subject_id))",
        &[],
    )
    .unwrap();
    let edges = foreign_keys(&db, &name("note")).unwrap();
    assert_eq!(edges.len(), 1);
    assert_eq!(edges[0].referenced, name("subject"));
    assert_eq!(edges[0].kind, DependencyKind::Secondary);
}

#[test]
fn test_table_status() {
    let db = lab();
    let status = table_status(&db, &name("subject")).unwrap().unwrap();
    assert_eq!(status.index_length, 0);
    assert_eq!(status.total_bytes(), status.data_length);

    assert!(table_status(&db, &name("missing")).unwrap().is_none());
}

#[test]
fn test_table_status_file_backed() {
    let dir = tempfile::TempDir::new().unwrap();
    let db = DuckDbBackend::from_path(&dir.path().join("lab.duckdb")).unwrap();
    db.query("CREATE TABLE nums AS SELECT * FROM range(1000) t(n)", &[])
        .unwrap();

    let status = table_status(&db, &FullTableName::new("main", "nums").unwrap()).unwrap();
    assert!(status.is_some());
}

#[test]
fn test_schema_named_like_database_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let db = DuckDbBackend::from_path(&dir.path().join("lab.duckdb")).unwrap();
    create_database(&db, "lab").unwrap();
    assert!(database_exists(&db, "lab").unwrap());

    let subject = name("subject");
    db.query(
        &format!(
            "CREATE TABLE {} (subject_id INTEGER PRIMARY KEY)",
            subject.qualified_in(db.catalog())
        ),
        &[],
    )
    .unwrap();
    assert!(table_exists(&db, &subject).unwrap());
    assert!(table_status(&db, &subject).unwrap().is_some());
}
