use super::*;
use rk_core::{DependencyKind, ForeignKeyEdge};
use rk_db::DuckDbBackend;

fn name(table: &str) -> FullTableName {
    FullTableName::new("lab", table).unwrap()
}

fn lab() -> DuckDbBackend {
    let db = DuckDbBackend::in_memory().unwrap();
    for sql in [
        "CREATE SCHEMA lab",
        "CREATE TABLE lab.subject (subject_id INTEGER PRIMARY KEY)",
        "CREATE TABLE lab.session (\
            subject_id INTEGER REFERENCES lab.subject(subject_id), \
            session_id INTEGER, \
            PRIMARY KEY (subject_id, session_id))",
        "CREATE TABLE lab.note (\
            note_id INTEGER PRIMARY KEY, \
            subject_id INTEGER REFERENCES lab.subject(subject_id))",
    ] {
        db.query(sql, &[]).unwrap();
    }
    db
}

#[test]
fn test_load_dependencies_from_catalog() {
    let db = lab();
    let graph = DependencyGraph::new();
    graph.load_dependencies(&db, &name("session")).unwrap();
    graph.load_dependencies(&db, &name("note")).unwrap();

    assert_eq!(graph.parents(&name("session")).unwrap(), vec![name("subject")]);
    assert_eq!(graph.children(&name("subject")).unwrap(), vec![name("session")]);
    assert_eq!(graph.references(&name("note")).unwrap(), vec![name("subject")]);
    assert_eq!(graph.referenced(&name("subject")).unwrap(), vec![name("note")]);
}

#[test]
fn test_load_database() {
    let db = lab();
    let graph = DependencyGraph::new();
    assert_eq!(graph.load_database(&db, "lab").unwrap(), 3);

    let descendants = graph.get_descendants(&name("subject")).unwrap();
    assert_eq!(descendants[0], name("subject"));
    assert_eq!(descendants.len(), 3);
}

#[test]
fn test_clear_dependency() {
    let db = lab();
    let graph = DependencyGraph::new();
    graph.load_database(&db, "lab").unwrap();

    graph.clear_dependency(&name("session")).unwrap();
    assert!(!graph.contains(&name("session")).unwrap());
    assert!(graph.children(&name("subject")).unwrap().is_empty());
    assert_eq!(graph.referenced(&name("subject")).unwrap(), vec![name("note")]);
}

#[test]
fn test_rejected_request_leaves_graph_unchanged() {
    let graph = DependencyGraph::new();
    graph
        .apply(ErdRequest::Load {
            table: name("b"),
            edges: vec![ForeignKeyEdge {
                referenced: name("a"),
                kind: DependencyKind::Primary,
            }],
        })
        .unwrap();

    let result = graph.apply(ErdRequest::Load {
        table: name("a"),
        edges: vec![ForeignKeyEdge {
            referenced: name("b"),
            kind: DependencyKind::Secondary,
        }],
    });
    assert!(matches!(
        result,
        Err(RelationError::Core(rk_core::CoreError::CircularDependency { .. }))
    ));
    assert_eq!(graph.topological_order().unwrap(), vec![name("a"), name("b")]);
}

#[test]
fn test_unknown_table_descendants_is_itself() {
    let graph = DependencyGraph::new();
    assert_eq!(
        graph.get_descendants(&name("ghost")).unwrap(),
        vec![name("ghost")]
    );
}
