use crate::domain::graph::DependencyGraph;
use crate::domain::node::SourceFileId;
use petgraph::graph::NodeIndex;
use std::collections::BTreeSet;

/// One circular import path, closed (the first id repeats as the last) and
/// rotated to start at its smallest id.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CycleReport {
    path: Vec<SourceFileId>,
}

impl CycleReport {
    /// Build a canonical report from an open cycle `[a, b, c]` (meaning a->b->c->a).
    pub fn from_open_path(mut members: Vec<SourceFileId>) -> Self {
        if let Some(min_pos) = members
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| a.cmp(b))
            .map(|(i, _)| i)
        {
            members.rotate_left(min_pos);
        }
        if let Some(first) = members.first().cloned() {
            members.push(first);
        }
        Self { path: members }
    }

    /// Closed path, first id == last id.
    pub fn path(&self) -> &[SourceFileId] {
        &self.path
    }

    /// Distinct files on the cycle.
    pub fn members(&self) -> &[SourceFileId] {
        &self.path[..self.path.len().saturating_sub(1)]
    }

    pub fn len(&self) -> usize {
        self.members().len()
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    pub fn contains(&self, id: &SourceFileId) -> bool {
        self.members().contains(id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VisitState {
    Unvisited,
    OnStack,
    Done,
}

/// Cycle detector - iterative DFS with back-edge detection.
///
/// Reports one representative path per back-edge; it does not enumerate every
/// elementary cycle. Roots and neighbors are visited in id order, and every
/// report is canonically rotated, so results are stable across runs.
pub struct CycleDetector;

impl Default for CycleDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl CycleDetector {
    pub fn new() -> Self {
        Self
    }

    pub fn detect(&self, graph: &DependencyGraph) -> Vec<CycleReport> {
        let node_count = graph.node_count();
        let mut state = vec![VisitState::Unvisited; node_count];
        // Position of each on-stack node inside `path`.
        let mut stack_pos: Vec<usize> = vec![usize::MAX; node_count];
        let mut found: BTreeSet<CycleReport> = BTreeSet::new();

        for root in graph.node_indices() {
            if state[root.index()] != VisitState::Unvisited {
                continue;
            }

            let mut path: Vec<NodeIndex> = Vec::new();
            let mut frames: Vec<(NodeIndex, Vec<NodeIndex>, usize)> = Vec::new();

            state[root.index()] = VisitState::OnStack;
            stack_pos[root.index()] = 0;
            path.push(root);
            frames.push((root, graph.imports(root), 0));

            while let Some((node, neighbors, next)) = frames.last_mut() {
                if let Some(&target) = neighbors.get(*next) {
                    *next += 1;
                    match state[target.index()] {
                        VisitState::Unvisited => {
                            state[target.index()] = VisitState::OnStack;
                            stack_pos[target.index()] = path.len();
                            path.push(target);
                            frames.push((target, graph.imports(target), 0));
                        }
                        VisitState::OnStack => {
                            let start = stack_pos[target.index()];
                            let members = path[start..]
                                .iter()
                                .map(|&idx| graph.node(idx).id.clone())
                                .collect();
                            found.insert(CycleReport::from_open_path(members));
                        }
                        VisitState::Done => {}
                    }
                } else {
                    let finished = *node;
                    state[finished.index()] = VisitState::Done;
                    stack_pos[finished.index()] = usize::MAX;
                    path.pop();
                    frames.pop();
                }
            }
        }

        tracing::debug!(cycles = found.len(), "cycle detection finished");
        found.into_iter().collect()
    }
}
