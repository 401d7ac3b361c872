//! Category dependency graph and cycle detection.
//!
//! Categories are arena nodes addressed by their index in the schema. Two
//! typed edge kinds connect them:
//!
//! - **Requirement**: category A (or one of its traits) requires a trait in B
//! - **BonusSelection**: a trait in A grants bonus picks into B
//!
//! Both point from A to B. A cycle over any mix of edge kinds makes the schema
//! invalid. A bonus selection back into the trait's own category is not an
//! edge: each pick removes a trait from the pool, so it always terminates.
//! Neither is a trait requirement on a sibling trait; it only gates that trait
//! within its category. A category-level requirement on its own category is a
//! self-edge.

use std::fmt;

use crate::schema::category::TraitCategory;

/// Kind of relationship between two categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DependencyType {
    Requirement,
    BonusSelection,
}

/// One edge of a dependency cycle, reported with category names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    /// Source of the edge: the category holding the requirement or bonus
    pub dependent_category: String,
    /// Target of the edge: the category referenced or granted into
    pub original_category: String,
    pub kind: DependencyType,
}

impl Dependency {
    pub fn new(
        dependent_category: impl Into<String>,
        original_category: impl Into<String>,
        kind: DependencyType,
    ) -> Self {
        Self {
            dependent_category: dependent_category.into(),
            original_category: original_category.into(),
            kind,
        }
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            DependencyType::Requirement => write!(
                f,
                "{} requires {}",
                self.dependent_category, self.original_category
            ),
            DependencyType::BonusSelection => write!(
                f,
                "{} grants bonus selections into {}",
                self.dependent_category, self.original_category
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Edge {
    to: usize,
    kind: DependencyType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VisitState {
    Unvisited,
    OnStack,
    Done,
}

/// Directed graph over a schema's categories
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    names: Vec<String>,
    edges: Vec<Vec<Edge>>,
}

impl DependencyGraph {
    /// Derive the graph from category requirements and bonus selections
    ///
    /// References to categories that are not in the slice are skipped; the
    /// schema validator reports those separately.
    pub fn build(categories: &[TraitCategory]) -> Self {
        let names: Vec<String> = categories.iter().map(|c| c.name().to_string()).collect();
        let index_of = |name: &str| names.iter().position(|n| n == name);

        let mut edges: Vec<Vec<Edge>> = vec![Vec::new(); categories.len()];
        for (from, category) in categories.iter().enumerate() {
            let mut add_edge = |to: usize, kind: DependencyType| {
                let edge = Edge { to, kind };
                if !edges[from].contains(&edge) {
                    edges[from].push(edge);
                }
            };

            if let Some(requirement) = category.requirement() {
                for name in requirement.dependent_category_names() {
                    if let Some(to) = index_of(&name) {
                        add_edge(to, DependencyType::Requirement);
                    }
                }
            }

            for item in category.traits() {
                if let Some(requirement) = &item.requirement {
                    for name in requirement.dependent_category_names() {
                        match index_of(&name) {
                            Some(to) if to != from => add_edge(to, DependencyType::Requirement),
                            _ => {}
                        }
                    }
                }
                if let Some(bonus) = &item.bonus_selection {
                    match index_of(&bonus.category_name) {
                        Some(to) if to != from => add_edge(to, DependencyType::BonusSelection),
                        _ => {}
                    }
                }
            }
        }

        Self { names, edges }
    }

    pub fn node_count(&self) -> usize {
        self.names.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.iter().map(Vec::len).sum()
    }

    /// Outgoing edges of a category, in discovery order
    pub fn dependencies_of(&self, category: &str) -> Vec<Dependency> {
        match self.names.iter().position(|n| n == category) {
            Some(from) => self.edges[from]
                .iter()
                .map(|edge| self.dependency(from, edge))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Depth-first search with a recursion stack
    ///
    /// Returns the first cycle found as its edges in traversal order, oldest
    /// edge first, ending with the back-edge that closes it. Categories are
    /// visited in schema order so the result is deterministic.
    pub fn find_cycle(&self) -> Option<Vec<Dependency>> {
        let mut state = vec![VisitState::Unvisited; self.names.len()];
        let mut path: Vec<(usize, Edge)> = Vec::new();

        for start in 0..self.names.len() {
            if state[start] == VisitState::Unvisited {
                if let Some(cycle) = self.visit(start, &mut state, &mut path) {
                    return Some(cycle);
                }
            }
        }
        None
    }

    /// Category indices ordered so each follows the categories it depends on
    ///
    /// Depth-first post-order, starting from categories in schema order, so
    /// independent categories keep their schema order. On a cyclic graph every
    /// category is still listed once but some edges cannot be honoured.
    pub fn topological_order(&self) -> Vec<usize> {
        let mut state = vec![VisitState::Unvisited; self.names.len()];
        let mut order = Vec::with_capacity(self.names.len());
        for start in 0..self.names.len() {
            self.post_order(start, &mut state, &mut order);
        }
        order
    }

    fn post_order(&self, node: usize, state: &mut [VisitState], order: &mut Vec<usize>) {
        if state[node] != VisitState::Unvisited {
            return;
        }
        state[node] = VisitState::OnStack;
        for edge in &self.edges[node] {
            self.post_order(edge.to, state, order);
        }
        state[node] = VisitState::Done;
        order.push(node);
    }

    fn visit(
        &self,
        node: usize,
        state: &mut [VisitState],
        path: &mut Vec<(usize, Edge)>,
    ) -> Option<Vec<Dependency>> {
        state[node] = VisitState::OnStack;

        for edge in &self.edges[node] {
            match state[edge.to] {
                VisitState::OnStack => {
                    // The cycle starts with the path edge leaving the revisited node
                    let start = path
                        .iter()
                        .position(|(from, _)| *from == edge.to)
                        .unwrap_or(path.len());
                    let mut cycle: Vec<Dependency> = path[start..]
                        .iter()
                        .map(|(from, e)| self.dependency(*from, e))
                        .collect();
                    cycle.push(self.dependency(node, edge));
                    return Some(cycle);
                }
                VisitState::Unvisited => {
                    path.push((node, *edge));
                    if let Some(cycle) = self.visit(edge.to, state, path) {
                        return Some(cycle);
                    }
                    path.pop();
                }
                VisitState::Done => {}
            }
        }

        state[node] = VisitState::Done;
        None
    }

    fn dependency(&self, from: usize, edge: &Edge) -> Dependency {
        Dependency::new(
            self.names[from].clone(),
            self.names[edge.to].clone(),
            edge.kind,
        )
    }
}
