//! Foreign-key dependency graph between tables
//!
//! Edges run from the referenced table to the referencing one, so a
//! topological sort yields ancestors before descendants. A foreign key whose
//! columns all sit in the referencing table's primary key is a
//! [`DependencyKind::Primary`] edge (parent → child); any other foreign key is
//! [`DependencyKind::Secondary`] (referenced → referencing).

use crate::error::{CoreError, CoreResult};
use crate::table_name::FullTableName;
use petgraph::algo::{has_path_connecting, toposort};
use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::{HashMap, HashSet, VecDeque};

/// Role of a foreign-key edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DependencyKind {
    /// The foreign key is part of the referencing table's primary key
    Primary,
    /// The foreign key is a non-key attribute of the referencing table
    Secondary,
}

/// One outgoing foreign key of a table, as read from the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKeyEdge {
    pub referenced: FullTableName,
    pub kind: DependencyKind,
}

/// Mutation requests accepted by [`Erd::apply`].
#[derive(Debug, Clone)]
pub enum ErdRequest {
    /// Replace the foreign keys declared by `table` with `edges`
    Load {
        table: FullTableName,
        edges: Vec<ForeignKeyEdge>,
    },
    /// Forget `table` and every edge touching it
    Clear { table: FullTableName },
}

/// A directed acyclic graph of table dependencies
#[derive(Debug, Default)]
pub struct Erd {
    graph: StableDiGraph<FullTableName, DependencyKind>,
    node_map: HashMap<FullTableName, NodeIndex>,
}

impl Erd {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a mutation request. A rejected request leaves the graph unchanged.
    pub fn apply(&mut self, request: ErdRequest) -> CoreResult<()> {
        match request {
            ErdRequest::Load { table, edges } => self.load(&table, &edges),
            ErdRequest::Clear { table } => {
                self.clear(&table);
                Ok(())
            }
        }
    }

    /// Add a table node if it is not present
    pub fn add_table(&mut self, table: &FullTableName) -> NodeIndex {
        if let Some(&idx) = self.node_map.get(table) {
            idx
        } else {
            let idx = self.graph.add_node(table.clone());
            self.node_map.insert(table.clone(), idx);
            idx
        }
    }

    /// Add one dependency edge (`child` references `parent`).
    ///
    /// Rejects self references, duplicates, and edges that would close a cycle.
    pub fn add_dependency(
        &mut self,
        parent: &FullTableName,
        child: &FullTableName,
        kind: DependencyKind,
    ) -> CoreResult<()> {
        self.check_edge(parent, child)?;
        let parent_idx = self.add_table(parent);
        let child_idx = self.add_table(child);
        self.graph.add_edge(parent_idx, child_idx, kind);
        Ok(())
    }

    /// Replace the incoming edges of `table` with `edges`.
    ///
    /// All edges are validated before the graph is touched.
    fn load(&mut self, table: &FullTableName, edges: &[ForeignKeyEdge]) -> CoreResult<()> {
        let mut seen = HashSet::new();
        for edge in edges {
            if !seen.insert(&edge.referenced) {
                return Err(CoreError::DuplicateDependency {
                    parent: edge.referenced.to_string(),
                    child: table.to_string(),
                });
            }
            self.check_reference(&edge.referenced, table)?;
        }

        let idx = self.add_table(table);
        let stale: Vec<_> = self
            .graph
            .edges_directed(idx, Direction::Incoming)
            .map(|e| e.id())
            .collect();
        for edge_id in stale {
            self.graph.remove_edge(edge_id);
        }
        for edge in edges {
            let parent_idx = self.add_table(&edge.referenced);
            self.graph.add_edge(parent_idx, idx, edge.kind);
        }
        log::debug!("Loaded {} dependencies for {}", edges.len(), table);
        Ok(())
    }

    /// Remove a table and every edge touching it
    pub fn clear(&mut self, table: &FullTableName) {
        if let Some(idx) = self.node_map.remove(table) {
            self.graph.remove_node(idx);
            log::debug!("Cleared dependencies for {}", table);
        }
    }

    /// Check that `table` could reference each of `parents` without a self
    /// reference or a cycle. Repeated parents are allowed; nothing is changed.
    pub fn check_references(
        &self,
        table: &FullTableName,
        parents: &[FullTableName],
    ) -> CoreResult<()> {
        parents
            .iter()
            .try_for_each(|parent| self.check_reference(parent, table))
    }

    fn check_reference(&self, parent: &FullTableName, child: &FullTableName) -> CoreResult<()> {
        if parent == child {
            return Err(CoreError::CircularDependency {
                cycle: format!("{child} -> {child}"),
            });
        }
        match self.cycle_through(parent, child) {
            Some(cycle) => Err(CoreError::CircularDependency { cycle }),
            None => Ok(()),
        }
    }

    fn check_edge(&self, parent: &FullTableName, child: &FullTableName) -> CoreResult<()> {
        if let (Some(&p), Some(&c)) = (self.node_map.get(parent), self.node_map.get(child)) {
            if self.graph.find_edge(p, c).is_some() {
                return Err(CoreError::DuplicateDependency {
                    parent: parent.to_string(),
                    child: child.to_string(),
                });
            }
        }
        self.check_reference(parent, child)
    }

    /// If `child` already reaches `parent`, describe the cycle an edge
    /// `parent -> child` would close.
    fn cycle_through(&self, parent: &FullTableName, child: &FullTableName) -> Option<String> {
        let (&p, &c) = (self.node_map.get(parent)?, self.node_map.get(child)?);
        if !has_path_connecting(&self.graph, c, p, None) {
            return None;
        }
        let mut path: Vec<String> = vec![parent.to_string()];
        path.extend(self.path_between(c, p).into_iter().map(|idx| self.graph[idx].to_string()));
        Some(path.join(" -> "))
    }

    /// Shortest path from `start` to `goal` (inclusive) following edges forward
    fn path_between(&self, start: NodeIndex, goal: NodeIndex) -> Vec<NodeIndex> {
        let mut previous: HashMap<NodeIndex, NodeIndex> = HashMap::new();
        let mut queue = VecDeque::from([start]);
        let mut visited = HashSet::from([start]);
        while let Some(current) = queue.pop_front() {
            if current == goal {
                break;
            }
            for next in self.graph.neighbors_directed(current, Direction::Outgoing) {
                if visited.insert(next) {
                    previous.insert(next, current);
                    queue.push_back(next);
                }
            }
        }

        let mut path = vec![goal];
        let mut current = goal;
        while let Some(&prev) = previous.get(&current) {
            path.push(prev);
            current = prev;
        }
        path.reverse();
        path
    }

    fn neighbors(
        &self,
        table: &FullTableName,
        direction: Direction,
        kind: DependencyKind,
    ) -> Vec<FullTableName> {
        let Some(&idx) = self.node_map.get(table) else {
            return Vec::new();
        };
        let mut result: Vec<FullTableName> = self
            .graph
            .edges_directed(idx, direction)
            .filter(|e| *e.weight() == kind)
            .map(|e| match direction {
                Direction::Incoming => self.graph[e.source()].clone(),
                Direction::Outgoing => self.graph[e.target()].clone(),
            })
            .collect();
        result.sort();
        result
    }

    /// Tables this one's primary key depends on
    pub fn parents(&self, table: &FullTableName) -> Vec<FullTableName> {
        self.neighbors(table, Direction::Incoming, DependencyKind::Primary)
    }

    /// Tables whose primary key includes this one's
    pub fn children(&self, table: &FullTableName) -> Vec<FullTableName> {
        self.neighbors(table, Direction::Outgoing, DependencyKind::Primary)
    }

    /// Tables this one references through non-key foreign keys
    pub fn references(&self, table: &FullTableName) -> Vec<FullTableName> {
        self.neighbors(table, Direction::Incoming, DependencyKind::Secondary)
    }

    /// Tables referencing this one through non-key foreign keys
    pub fn referenced(&self, table: &FullTableName) -> Vec<FullTableName> {
        self.neighbors(table, Direction::Outgoing, DependencyKind::Secondary)
    }

    /// The table followed by every table depending on it, transitively,
    /// in topological order (ancestors before descendants).
    ///
    /// Dropping in reverse order of this list never drops a table while a
    /// table referencing it remains. An unknown table yields just itself.
    pub fn descendants(&self, table: &FullTableName) -> Vec<FullTableName> {
        let Some(&start) = self.node_map.get(table) else {
            return vec![table.clone()];
        };

        let mut reachable = HashSet::from([start]);
        let mut stack = vec![start];
        while let Some(current) = stack.pop() {
            for next in self.graph.neighbors_directed(current, Direction::Outgoing) {
                if reachable.insert(next) {
                    stack.push(next);
                }
            }
        }

        // Loads reject cycles, so the sort cannot fail.
        let order = toposort(&self.graph, None).unwrap_or_default();
        order
            .into_iter()
            .filter(|idx| reachable.contains(idx))
            .map(|idx| self.graph[idx].clone())
            .collect()
    }

    /// All tables in topological order
    pub fn topological_order(&self) -> CoreResult<Vec<FullTableName>> {
        toposort(&self.graph, None)
            .map(|indices| {
                indices
                    .into_iter()
                    .map(|idx| self.graph[idx].clone())
                    .collect()
            })
            .map_err(|cycle| CoreError::CircularDependency {
                cycle: self.graph[cycle.node_id()].to_string(),
            })
    }

    /// Check if a table is known to the graph
    pub fn contains(&self, table: &FullTableName) -> bool {
        self.node_map.contains_key(table)
    }

    /// All tables in the graph
    pub fn tables(&self) -> Vec<FullTableName> {
        let mut tables: Vec<_> = self.node_map.keys().cloned().collect();
        tables.sort();
        tables
    }
}

#[cfg(test)]
#[path = "erd_test.rs"]
mod tests;
