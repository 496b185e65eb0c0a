use super::*;

fn t(name: &str) -> FullTableName {
    FullTableName::new("lab", name).unwrap()
}

fn primary(name: &str) -> ForeignKeyEdge {
    ForeignKeyEdge {
        referenced: t(name),
        kind: DependencyKind::Primary,
    }
}

fn secondary(name: &str) -> ForeignKeyEdge {
    ForeignKeyEdge {
        referenced: t(name),
        kind: DependencyKind::Secondary,
    }
}

fn load(erd: &mut Erd, table: &str, edges: Vec<ForeignKeyEdge>) -> CoreResult<()> {
    erd.apply(ErdRequest::Load {
        table: t(table),
        edges,
    })
}

/// subject <- session <- scan, and subject <~ note (secondary)
fn build_lab_erd() -> Erd {
    let mut erd = Erd::new();
    load(&mut erd, "subject", vec![]).unwrap();
    load(&mut erd, "session", vec![primary("subject")]).unwrap();
    load(&mut erd, "scan", vec![primary("session")]).unwrap();
    load(&mut erd, "note", vec![secondary("subject")]).unwrap();
    erd
}

#[test]
fn test_role_queries() {
    let erd = build_lab_erd();
    assert_eq!(erd.children(&t("subject")), vec![t("session")]);
    assert_eq!(erd.referenced(&t("subject")), vec![t("note")]);
    assert!(erd.parents(&t("subject")).is_empty());
    assert_eq!(erd.parents(&t("session")), vec![t("subject")]);
    assert_eq!(erd.references(&t("note")), vec![t("subject")]);
    assert!(erd.children(&t("note")).is_empty());
}

#[test]
fn test_descendants_topological() {
    let erd = build_lab_erd();
    let order = erd.descendants(&t("subject"));

    assert_eq!(order.len(), 4);
    assert_eq!(order[0], t("subject"));
    let pos = |name: &str| order.iter().position(|n| *n == t(name)).unwrap();
    assert!(pos("session") < pos("scan"));
    assert!(pos("subject") < pos("note"));
}

#[test]
fn test_descendants_of_leaf_and_unknown() {
    let erd = build_lab_erd();
    assert_eq!(erd.descendants(&t("scan")), vec![t("scan")]);
    assert_eq!(erd.descendants(&t("missing")), vec![t("missing")]);
}

#[test]
fn test_descendants_exclude_unrelated_branches() {
    let erd = build_lab_erd();
    let order = erd.descendants(&t("session"));
    assert_eq!(order, vec![t("session"), t("scan")]);
}

#[test]
fn test_circular_dependency_rejected() {
    let mut erd = Erd::new();
    load(&mut erd, "b", vec![primary("a")]).unwrap();
    load(&mut erd, "c", vec![primary("b")]).unwrap();

    let result = load(&mut erd, "a", vec![secondary("c")]);
    match result {
        Err(CoreError::CircularDependency { cycle }) => {
            assert_eq!(cycle, r#""lab"."c" -> "lab"."a" -> "lab"."b" -> "lab"."c""#);
        }
        other => panic!("expected a cycle error, got {other:?}"),
    }
    // The rejected load left the graph untouched
    assert!(erd.references(&t("a")).is_empty());
    assert!(erd.topological_order().is_ok());
}

#[test]
fn test_self_reference_rejected() {
    let mut erd = Erd::new();
    let result = load(&mut erd, "a", vec![secondary("a")]);
    assert!(matches!(result, Err(CoreError::CircularDependency { .. })));
    assert!(!erd.contains(&t("a")));
}

#[test]
fn test_check_references_leaves_graph_unchanged() {
    let erd = build_lab_erd();
    let before = erd.tables().len();

    erd.check_references(&t("scan_note"), &[t("scan"), t("subject"), t("scan")])
        .unwrap();
    assert!(matches!(
        erd.check_references(&t("node"), &[t("subject"), t("node")]),
        Err(CoreError::CircularDependency { .. })
    ));
    assert!(matches!(
        erd.check_references(&t("subject"), &[t("scan")]),
        Err(CoreError::CircularDependency { .. })
    ));
    assert_eq!(erd.tables().len(), before);
    assert!(!erd.contains(&t("node")));
}

#[test]
fn test_duplicate_edge_rejected() {
    let mut erd = Erd::new();
    let result = load(&mut erd, "b", vec![primary("a"), secondary("a")]);
    assert!(matches!(result, Err(CoreError::DuplicateDependency { .. })));

    erd.add_dependency(&t("a"), &t("b"), DependencyKind::Primary)
        .unwrap();
    let result = erd.add_dependency(&t("a"), &t("b"), DependencyKind::Secondary);
    assert!(matches!(result, Err(CoreError::DuplicateDependency { .. })));
}

#[test]
fn test_reload_replaces_edges() {
    let mut erd = build_lab_erd();
    load(&mut erd, "note", vec![secondary("session")]).unwrap();

    assert!(erd.referenced(&t("subject")).is_empty());
    assert_eq!(erd.referenced(&t("session")), vec![t("note")]);
}

#[test]
fn test_reload_is_idempotent() {
    let mut erd = build_lab_erd();
    load(&mut erd, "session", vec![primary("subject")]).unwrap();
    assert_eq!(erd.children(&t("subject")), vec![t("session")]);
}

#[test]
fn test_clear_removes_node_and_edges() {
    let mut erd = build_lab_erd();
    erd.apply(ErdRequest::Clear { table: t("scan") }).unwrap();

    assert!(!erd.contains(&t("scan")));
    assert!(erd.children(&t("session")).is_empty());
    let mut remaining = erd.descendants(&t("subject"));
    assert_eq!(remaining[0], t("subject"));
    remaining.sort();
    assert_eq!(remaining, vec![t("note"), t("session"), t("subject")]);
}

#[test]
fn test_clear_unknown_is_noop() {
    let mut erd = build_lab_erd();
    erd.clear(&t("missing"));
    assert_eq!(erd.tables().len(), 4);
}

#[test]
fn test_node_indices_stable_after_clear() {
    let mut erd = build_lab_erd();
    erd.clear(&t("subject"));
    // Remaining nodes still resolve to the right names
    assert_eq!(erd.children(&t("session")), vec![t("scan")]);
    load(&mut erd, "extra", vec![primary("scan")]).unwrap();
    assert_eq!(
        erd.descendants(&t("session")),
        vec![t("session"), t("scan"), t("extra")]
    );
}

#[test]
fn test_topological_order_all() {
    let erd = build_lab_erd();
    let order = erd.topological_order().unwrap();
    let pos = |name: &str| order.iter().position(|n| *n == t(name)).unwrap();
    assert!(pos("subject") < pos("session"));
    assert!(pos("session") < pos("scan"));
    assert!(pos("subject") < pos("note"));
}
