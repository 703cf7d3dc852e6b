//! Flow dependency analysis
//!
//! Gantree: L2_Flow → FlowDependency
//!
//! Turns a correction flow into byproduct-correction domains and the
//! dependency DAG that fixes a valid measurement order.

use crate::error::{MbqcError, MbqcResult};
use crate::graphstate::OpenGraphState;
use crate::types::{Corrections, Node, NodeSet};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Correction flow: measured node → nodes that absorb its byproduct
/// Gantree: FlowLike // Map<Node, Set<Node>>
pub type FlowLike = BTreeMap<Node, NodeSet>;

// ============================================================================
// Odd Neighborhood
// ============================================================================

/// Nodes adjacent to an odd number of members of `nodes`
/// Gantree: odd_neighbors(G, S) -> Set<Node> // 홀수 이웃
pub fn odd_neighbors(graph: &OpenGraphState, nodes: &NodeSet) -> MbqcResult<NodeSet> {
    let mut odd = NodeSet::new();
    for &node in nodes {
        for &neighbor in graph.neighbors(node)? {
            if !odd.remove(&neighbor) {
                odd.insert(neighbor);
            }
        }
    }
    Ok(odd)
}

// ============================================================================
// Corrections
// ============================================================================

/// Derive X and Z correction domains from a flow
/// Gantree: generate_corrections(G, flow) -> (X, Z) // 보정 도메인
///
/// Both maps carry an entry for every graph node. A node never appears in
/// its own domain.
pub fn generate_corrections(
    graph: &OpenGraphState,
    flow: &FlowLike,
) -> MbqcResult<(Corrections, Corrections)> {
    let mut x_corrections: Corrections = graph.nodes().map(|n| (n, NodeSet::new())).collect();
    let mut z_corrections = x_corrections.clone();

    for (&node, targets) in flow {
        graph.ensure_node_exists(node)?;
        for &target in targets {
            graph.ensure_node_exists(target)?;
            if target != node {
                x_corrections.entry(target).or_default().insert(node);
            }
        }
        for target in odd_neighbors(graph, targets)? {
            if target != node {
                z_corrections.entry(target).or_default().insert(node);
            }
        }
    }

    Ok((x_corrections, z_corrections))
}

// ============================================================================
// Dependency DAG
// ============================================================================

/// Dependency graph over all nodes: `m → t` means `m` is measured before `t`
/// Gantree: DependencyDag // Map<Node, Set<Node>>
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyDag(BTreeMap<Node, NodeSet>);

/// Build the dependency DAG induced by a flow
/// Gantree: construct_dag(flow, G) -> DependencyDag // 의존 그래프
pub fn construct_dag(flow: &FlowLike, graph: &OpenGraphState) -> MbqcResult<DependencyDag> {
    let mut dag: BTreeMap<Node, NodeSet> = graph.nodes().map(|n| (n, NodeSet::new())).collect();

    for (&node, targets) in flow {
        graph.ensure_node_exists(node)?;
        let mut children = targets.clone();
        for &target in targets {
            graph.ensure_node_exists(target)?;
        }
        children.extend(odd_neighbors(graph, targets)?);
        children.remove(&node);
        dag.entry(node).or_default().extend(children);
    }

    Ok(DependencyDag(dag))
}

impl DependencyDag {
    /// Wrap an explicit adjacency map
    pub fn from_map(map: BTreeMap<Node, NodeSet>) -> Self {
        DependencyDag(map)
    }

    /// Underlying adjacency map
    pub fn as_map(&self) -> &BTreeMap<Node, NodeSet> {
        &self.0
    }

    /// Nodes that must be measured after `node`
    pub fn children(&self, node: Node) -> Option<&NodeSet> {
        self.0.get(&node)
    }

    /// Number of nodes
    pub fn num_nodes(&self) -> usize {
        self.0.len()
    }

    /// Number of dependency edges
    pub fn num_edges(&self) -> usize {
        self.0.values().map(|c| c.len()).sum()
    }

    /// Parent map (child → parents), covering every node
    pub fn inverted(&self) -> BTreeMap<Node, NodeSet> {
        let mut parents: BTreeMap<Node, NodeSet> =
            self.0.keys().map(|&n| (n, NodeSet::new())).collect();
        for (&parent, children) in &self.0 {
            for &child in children {
                parents.entry(child).or_default().insert(parent);
            }
        }
        parents
    }

    /// Topological order by Kahn's algorithm, lowest id first among ready nodes
    /// Gantree: topological_order() -> Vec<Node> // 위상 정렬
    pub fn topological_order(&self) -> MbqcResult<Vec<Node>> {
        let parents = self.inverted();
        let mut in_degree: BTreeMap<Node, usize> =
            parents.iter().map(|(&n, p)| (n, p.len())).collect();
        let mut ready: NodeSet = in_degree
            .iter()
            .filter(|(_, &d)| d == 0)
            .map(|(&n, _)| n)
            .collect();
        let mut order = Vec::with_capacity(in_degree.len());

        while let Some(node) = ready.pop_first() {
            order.push(node);
            if let Some(children) = self.0.get(&node) {
                for child in children {
                    if let Some(degree) = in_degree.get_mut(child) {
                        *degree -= 1;
                        if *degree == 0 {
                            ready.insert(*child);
                        }
                    }
                }
            }
        }

        if order.len() != in_degree.len() {
            return Err(MbqcError::CyclicFlow {
                ordered: order.len(),
                total: in_degree.len(),
            });
        }
        Ok(order)
    }

    /// Check that every edge between nodes of `order` points forward
    pub fn respects(&self, order: &[Node]) -> bool {
        let position: BTreeMap<Node, usize> =
            order.iter().enumerate().map(|(i, &n)| (n, i)).collect();
        self.0.iter().all(|(parent, children)| {
            let Some(&p) = position.get(parent) else {
                return true;
            };
            children
                .iter()
                .filter_map(|c| position.get(c))
                .all(|&c| p < c)
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
