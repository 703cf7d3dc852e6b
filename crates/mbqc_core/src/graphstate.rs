//! Open graph state for MBQC
//!
//! Gantree: L1_Graph → OpenGraphState
//!
//! A graph of qubits with declared input/output boundaries and a measurement
//! basis on every non-output node. Nodes live in an arena keyed by their
//! handle, so ids stay stable across removals and sparse ids cost nothing.

use crate::constants::numeric::angles_equal;
use crate::error::{MbqcError, MbqcResult};
use crate::types::{MeasBasis, Node, NodeSet};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Per-node record in the arena
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct NodeSlot {
    neighbors: NodeSet,
    meas_basis: Option<MeasBasis>,
}

/// Open graph state
/// Gantree: OpenGraphState // 열린 그래프 상태
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GraphRecord", into = "GraphRecord")]
pub struct OpenGraphState {
    /// Node arena, keyed by node id
    /// Gantree: slots: Map<Node, NodeSlot> // 노드 아레나
    slots: BTreeMap<Node, NodeSlot>,

    /// Id handed out by the next `add_node`
    next_id: Node,

    /// Number of undirected edges
    num_edges: usize,

    /// Input node → qubit index
    /// Gantree: input_node_indices: Map<Node,usize> // 입력 경계
    input_node_indices: BTreeMap<Node, usize>,

    /// Output node → qubit index
    /// Gantree: output_node_indices: Map<Node,usize> // 출력 경계
    output_node_indices: BTreeMap<Node, usize>,
}

impl OpenGraphState {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Node Mutation
    // ========================================================================

    /// Add a node with a fresh id
    /// Gantree: add_node() -> Node // 노드 추가
    ///
    /// The id is one past the largest id ever allocated. Once `usize::MAX`
    /// is taken the lowest free id is used instead.
    pub fn add_node(&mut self) -> Node {
        let node = if self.slots.contains_key(&self.next_id) {
            (0..)
                .find(|n| !self.slots.contains_key(n))
                .unwrap_or(self.next_id)
        } else {
            self.next_id
        };
        self.insert_slot(node);
        node
    }

    /// Add a node under a caller-chosen id
    pub fn add_node_with_id(&mut self, node: Node) -> MbqcResult<()> {
        if self.contains_node(node) {
            return Err(MbqcError::NodeAlreadyExists(node));
        }
        self.insert_slot(node);
        Ok(())
    }

    /// Remove a node together with its edges and boundary/basis records
    /// Gantree: remove_node(n) -> Result // 노드 삭제
    pub fn remove_node(&mut self, node: Node) -> MbqcResult<()> {
        self.ensure_node_exists(node)?;
        if self.input_node_indices.contains_key(&node) {
            return Err(MbqcError::InputNodeRemoval(node));
        }

        let slot = self.slots.remove(&node).unwrap_or_default();
        for neighbor in &slot.neighbors {
            if let Some(other) = self.slots.get_mut(neighbor) {
                other.neighbors.remove(&node);
            }
        }
        self.num_edges -= slot.neighbors.len();
        self.output_node_indices.remove(&node);
        Ok(())
    }

    // ========================================================================
    // Edge Mutation
    // ========================================================================

    /// Add an undirected edge
    /// Gantree: add_edge(a,b) -> Result // 엣지 추가
    pub fn add_edge(&mut self, node1: Node, node2: Node) -> MbqcResult<()> {
        self.ensure_node_exists(node1)?;
        self.ensure_node_exists(node2)?;
        if node1 == node2 {
            return Err(MbqcError::SelfLoop(node1));
        }
        if self.has_edge(node1, node2) {
            return Err(MbqcError::DuplicateEdge(node1, node2));
        }
        self.insert_edge_unchecked(node1, node2);
        Ok(())
    }

    /// Remove an undirected edge
    pub fn remove_edge(&mut self, node1: Node, node2: Node) -> MbqcResult<()> {
        self.ensure_node_exists(node1)?;
        self.ensure_node_exists(node2)?;
        if !self.has_edge(node1, node2) {
            return Err(MbqcError::MissingEdge(node1, node2));
        }
        if let Some(slot) = self.slots.get_mut(&node1) {
            slot.neighbors.remove(&node2);
        }
        if let Some(slot) = self.slots.get_mut(&node2) {
            slot.neighbors.remove(&node1);
        }
        self.num_edges -= 1;
        Ok(())
    }

    // ========================================================================
    // Boundary and Basis
    // ========================================================================

    /// Declare an input node, returning its qubit index
    /// Gantree: set_input(n) -> usize // 입력 지정
    ///
    /// Indices are handed out in declaration order. Declaring the same node
    /// twice returns the index it already has.
    pub fn set_input(&mut self, node: Node) -> MbqcResult<usize> {
        self.ensure_node_exists(node)?;
        if let Some(&index) = self.input_node_indices.get(&node) {
            return Ok(index);
        }
        let used: BTreeSet<usize> = self.input_node_indices.values().copied().collect();
        let index = (self.input_node_indices.len()..)
            .find(|i| !used.contains(i))
            .unwrap_or(self.input_node_indices.len());
        self.input_node_indices.insert(node, index);
        Ok(index)
    }

    /// Declare an input node with an explicit qubit index
    pub fn set_input_with_index(&mut self, node: Node, index: usize) -> MbqcResult<()> {
        self.ensure_node_exists(node)?;
        if let Some((&owner, _)) = self
            .input_node_indices
            .iter()
            .find(|(&n, &i)| i == index && n != node)
        {
            return Err(MbqcError::QubitIndexConflict { node: owner, index });
        }
        self.input_node_indices.insert(node, index);
        Ok(())
    }

    /// Declare an output node with its qubit index
    /// Gantree: set_output(n, idx) -> Result // 출력 지정
    pub fn set_output(&mut self, node: Node, index: usize) -> MbqcResult<()> {
        let slot = self.slot(node)?;
        if slot.meas_basis.is_some() {
            return Err(MbqcError::MeasurementBasisConflict(node));
        }
        if let Some((&owner, _)) = self
            .output_node_indices
            .iter()
            .find(|(&n, &i)| i == index && n != node)
        {
            return Err(MbqcError::QubitIndexConflict { node: owner, index });
        }
        self.output_node_indices.insert(node, index);
        Ok(())
    }

    /// Assign the measurement basis of a non-output node
    /// Gantree: set_meas_basis(n, basis) -> Result // 측정 기저
    pub fn set_meas_basis(&mut self, node: Node, basis: MeasBasis) -> MbqcResult<()> {
        self.ensure_node_exists(node)?;
        if self.output_node_indices.contains_key(&node) {
            return Err(MbqcError::MeasurementBasisConflict(node));
        }
        if let Some(slot) = self.slots.get_mut(&node) {
            slot.meas_basis = Some(basis);
        }
        Ok(())
    }

    /// Verify every non-output node carries a measurement basis
    /// Gantree: check_meas_basis() -> Result // 기저 검사
    pub fn check_meas_basis(&self) -> MbqcResult<()> {
        for node in self.nodes() {
            if self.output_node_indices.contains_key(&node) {
                continue;
            }
            if self.meas_basis(node).is_none() {
                return Err(MbqcError::MissingMeasurementBasis(node));
            }
        }
        Ok(())
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Fail with `InvalidNode` unless the node exists
    pub fn ensure_node_exists(&self, node: Node) -> MbqcResult<()> {
        self.slot(node).map(|_| ())
    }

    /// Check node membership
    #[inline]
    pub fn contains_node(&self, node: Node) -> bool {
        self.slots.contains_key(&node)
    }

    /// Check whether two nodes are adjacent
    pub fn has_edge(&self, node1: Node, node2: Node) -> bool {
        self.slots
            .get(&node1)
            .map_or(false, |slot| slot.neighbors.contains(&node2))
    }

    /// Neighbors of a node
    /// Gantree: neighbors(n) -> &NodeSet // 이웃
    pub fn neighbors(&self, node: Node) -> MbqcResult<&NodeSet> {
        self.slot(node).map(|slot| &slot.neighbors)
    }

    /// Number of neighbors
    pub fn degree(&self, node: Node) -> MbqcResult<usize> {
        self.neighbors(node).map(|n| n.len())
    }

    /// Nodes in ascending order
    pub fn nodes(&self) -> impl Iterator<Item = Node> + '_ {
        self.slots.keys().copied()
    }

    /// Nodes as an ordered set
    pub fn node_set(&self) -> NodeSet {
        self.nodes().collect()
    }

    /// Edges as `(smaller, larger)` pairs
    pub fn edges(&self) -> BTreeSet<(Node, Node)> {
        self.slots
            .iter()
            .flat_map(|(&node, slot)| {
                slot.neighbors
                    .iter()
                    .filter(move |&&n| node < n)
                    .map(move |&n| (node, n))
            })
            .collect()
    }

    /// Number of nodes
    pub fn num_nodes(&self) -> usize {
        self.slots.len()
    }

    /// Number of edges
    pub fn num_edges(&self) -> usize {
        self.num_edges
    }

    /// Check if the graph has no nodes
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Input node → qubit index
    pub fn input_node_indices(&self) -> &BTreeMap<Node, usize> {
        &self.input_node_indices
    }

    /// Output node → qubit index
    pub fn output_node_indices(&self) -> &BTreeMap<Node, usize> {
        &self.output_node_indices
    }

    /// Declared input nodes
    pub fn input_nodes(&self) -> NodeSet {
        self.input_node_indices.keys().copied().collect()
    }

    /// Declared output nodes
    pub fn output_nodes(&self) -> NodeSet {
        self.output_node_indices.keys().copied().collect()
    }

    /// Check if node is a declared input
    pub fn is_input(&self, node: Node) -> bool {
        self.input_node_indices.contains_key(&node)
    }

    /// Check if node is a declared output
    pub fn is_output(&self, node: Node) -> bool {
        self.output_node_indices.contains_key(&node)
    }

    /// Qubit index of a boundary node (input index first, then output index)
    pub fn q_index(&self, node: Node) -> Option<usize> {
        self.input_node_indices
            .get(&node)
            .or_else(|| self.output_node_indices.get(&node))
            .copied()
    }

    /// Measurement basis of a node, if assigned
    pub fn meas_basis(&self, node: Node) -> Option<MeasBasis> {
        self.slots.get(&node).and_then(|slot| slot.meas_basis)
    }

    /// All assigned measurement bases
    pub fn meas_bases(&self) -> BTreeMap<Node, MeasBasis> {
        self.nodes()
            .filter_map(|node| self.meas_basis(node).map(|b| (node, b)))
            .collect()
    }

    // ========================================================================
    // Composition
    // ========================================================================

    /// Append another open graph along this graph's outputs / other's inputs
    /// Gantree: append(other) -> Result // 그래프 합성
    ///
    /// Nodes shared by both graphs must be exactly this graph's outputs that
    /// are also inputs of `other`, with matching qubit indices. The whole
    /// boundary is checked before anything is modified.
    pub fn append(&mut self, other: &OpenGraphState) -> MbqcResult<()> {
        let border = self.check_append(other)?;
        self.merge_unchecked(other, &border);
        Ok(())
    }

    /// Pure compatibility check for `append`; returns the border node set
    fn check_append(&self, other: &OpenGraphState) -> MbqcResult<NodeSet> {
        let common: NodeSet = other.nodes().filter(|&n| self.contains_node(n)).collect();
        let border: NodeSet = self
            .output_node_indices
            .keys()
            .filter(|n| other.input_node_indices.contains_key(*n))
            .copied()
            .collect();

        if common != border {
            return Err(MbqcError::boundary(format!(
                "shared nodes {:?} differ from boundary nodes {:?}",
                common, border
            )));
        }

        for &node in &border {
            let ours = self.output_node_indices[&node];
            let theirs = other.input_node_indices[&node];
            if ours != theirs {
                return Err(MbqcError::boundary(format!(
                    "qubit index mismatch on node {}: {} vs {}",
                    node, ours, theirs
                )));
            }
        }

        for (a, b) in other.edges() {
            if border.contains(&a) && border.contains(&b) && self.has_edge(a, b) {
                return Err(MbqcError::boundary(format!(
                    "edge ({}, {}) between boundary nodes present in both graphs",
                    a, b
                )));
            }
        }

        let input_indices: BTreeSet<usize> = self.input_node_indices.values().copied().collect();
        for (&node, &index) in &other.input_node_indices {
            if !border.contains(&node) && input_indices.contains(&index) {
                return Err(MbqcError::boundary(format!(
                    "input qubit index {} of node {} already used",
                    index, node
                )));
            }
        }

        let surviving_outputs: BTreeSet<usize> = self
            .output_node_indices
            .iter()
            .filter(|(n, _)| !border.contains(*n))
            .map(|(_, &i)| i)
            .collect();
        for (&node, &index) in &other.output_node_indices {
            if surviving_outputs.contains(&index) {
                return Err(MbqcError::boundary(format!(
                    "output qubit index {} of node {} already used",
                    index, node
                )));
            }
        }

        for &node in &border {
            if let (Some(a), Some(b)) = (self.meas_basis(node), other.meas_basis(node)) {
                if a.plane() != b.plane() || !angles_equal(a.angle(), b.angle()) {
                    return Err(MbqcError::boundary(format!(
                        "measurement basis conflict on node {}",
                        node
                    )));
                }
            }
        }

        Ok(border)
    }

    /// Merge step of `append`; assumes `check_append` passed
    fn merge_unchecked(&mut self, other: &OpenGraphState, border: &NodeSet) {
        for node in other.nodes() {
            if border.contains(&node) {
                self.output_node_indices.remove(&node);
            } else {
                self.insert_slot(node);
                if let Some(&index) = other.input_node_indices.get(&node) {
                    self.input_node_indices.insert(node, index);
                }
            }

            match other.output_node_indices.get(&node) {
                Some(&index) => {
                    self.output_node_indices.insert(node, index);
                }
                None => {
                    if let (Some(basis), Some(slot)) =
                        (other.meas_basis(node), self.slots.get_mut(&node))
                    {
                        slot.meas_basis = Some(basis);
                    }
                }
            }
        }

        for (a, b) in other.edges() {
            self.insert_edge_unchecked(a, b);
        }
    }

    // ========================================================================
    // Internal Helpers
    // ========================================================================

    fn slot(&self, node: Node) -> MbqcResult<&NodeSlot> {
        self.slots.get(&node).ok_or(MbqcError::InvalidNode(node))
    }

    fn insert_slot(&mut self, node: Node) {
        self.slots.entry(node).or_default();
        self.next_id = self.next_id.max(node.saturating_add(1));
    }

    fn insert_edge_unchecked(&mut self, node1: Node, node2: Node) {
        let mut inserted = false;
        if let Some(slot) = self.slots.get_mut(&node1) {
            inserted = slot.neighbors.insert(node2);
        }
        if let Some(slot) = self.slots.get_mut(&node2) {
            slot.neighbors.insert(node1);
        }
        if inserted {
            self.num_edges += 1;
        }
    }
}

// ============================================================================
// Free Functions
// ============================================================================

/// Complete bipartite edge set between two node sets
/// Gantree: bipartite_edges(A,B) -> Set<(Node,Node)> // 완전 이분 엣지
///
/// Pairs are ordered `(smaller, larger)`; a node paired with itself is skipped.
pub fn bipartite_edges(set_a: &NodeSet, set_b: &NodeSet) -> BTreeSet<(Node, Node)> {
    let mut edges = BTreeSet::new();
    for &a in set_a {
        for &b in set_b {
            if a != b {
                edges.insert((a.min(b), a.max(b)));
            }
        }
    }
    edges
}

// ============================================================================
// Display
// ============================================================================

impl fmt::Display for OpenGraphState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "OpenGraphState({} nodes, {} edges)",
            self.num_nodes(),
            self.num_edges
        )?;
        writeln!(f, "  Inputs: {:?}", self.input_node_indices)?;
        writeln!(f, "  Outputs: {:?}", self.output_node_indices)?;
        Ok(())
    }
}

// ============================================================================
// Serialization
// ============================================================================

/// Stored form of an open graph; checked against the graph invariants on load
#[derive(Serialize, Deserialize)]
struct GraphRecord {
    nodes: BTreeMap<Node, NodeSlot>,
    #[serde(default)]
    next_id: Node,
    input_node_indices: BTreeMap<Node, usize>,
    output_node_indices: BTreeMap<Node, usize>,
}

impl From<OpenGraphState> for GraphRecord {
    fn from(graph: OpenGraphState) -> Self {
        Self {
            nodes: graph.slots,
            next_id: graph.next_id,
            input_node_indices: graph.input_node_indices,
            output_node_indices: graph.output_node_indices,
        }
    }
}

impl TryFrom<GraphRecord> for OpenGraphState {
    type Error = MbqcError;

    /// Rebuild a graph, recounting edges from symmetric adjacency
    fn try_from(record: GraphRecord) -> MbqcResult<Self> {
        let GraphRecord {
            nodes,
            next_id,
            input_node_indices,
            output_node_indices,
        } = record;

        let mut degree_sum = 0;
        for (&node, slot) in &nodes {
            for &neighbor in &slot.neighbors {
                if neighbor == node {
                    return Err(MbqcError::SelfLoop(node));
                }
                match nodes.get(&neighbor) {
                    Some(other) if other.neighbors.contains(&node) => {}
                    Some(_) => return Err(MbqcError::MissingEdge(neighbor, node)),
                    None => return Err(MbqcError::InvalidNode(neighbor)),
                }
            }
            degree_sum += slot.neighbors.len();
        }

        for &node in input_node_indices.keys().chain(output_node_indices.keys()) {
            if !nodes.contains_key(&node) {
                return Err(MbqcError::InvalidNode(node));
            }
        }
        check_injective(&input_node_indices)?;
        check_injective(&output_node_indices)?;
        for &node in output_node_indices.keys() {
            if nodes.get(&node).and_then(|slot| slot.meas_basis).is_some() {
                return Err(MbqcError::MeasurementBasisConflict(node));
            }
        }

        let next_id = nodes
            .keys()
            .next_back()
            .map_or(0, |&n| n.saturating_add(1))
            .max(next_id);
        Ok(Self {
            slots: nodes,
            next_id,
            num_edges: degree_sum / 2,
            input_node_indices,
            output_node_indices,
        })
    }
}

fn check_injective(indices: &BTreeMap<Node, usize>) -> MbqcResult<()> {
    let mut owners: BTreeMap<usize, Node> = BTreeMap::new();
    for (&node, &index) in indices {
        if let Some(owner) = owners.insert(index, node) {
            return Err(MbqcError::QubitIndexConflict { node: owner, index });
        }
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
