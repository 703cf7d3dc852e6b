//! Error types for MBQC
//!
//! Gantree: L0_Foundation → Errors
//!
//! One error enum shared by graph mutation, flow analysis, pattern
//! construction, compilation and scheduling.

// Error variant fields are self-documenting via error messages
#![allow(missing_docs)]

use crate::types::Node;
use thiserror::Error;

/// Main error type for MBQC
/// Gantree: MbqcError // enum
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MbqcError {
    // ========================================================================
    // Graph Errors
    // ========================================================================
    /// Reference to a node that is not in the graph
    /// Gantree: InvalidNode(Node) // 없는 노드
    #[error("Node does not exist: node={0}")]
    InvalidNode(Node),

    /// Node id already taken
    #[error("Node already exists: node={0}")]
    NodeAlreadyExists(Node),

    /// Edge already present
    /// Gantree: DuplicateEdge(a,b) // 중복 엣지
    #[error("Edge already exists: node1={0}, node2={1}")]
    DuplicateEdge(Node, Node),

    /// Edge not present
    #[error("Edge does not exist: node1={0}, node2={1}")]
    MissingEdge(Node, Node),

    /// Edge from a node to itself
    #[error("Self loop on node {0} is not allowed")]
    SelfLoop(Node),

    /// Declared input nodes are part of the boundary and cannot be removed
    /// Gantree: InputNodeRemoval(Node) // 입력 노드 삭제
    #[error("Cannot remove input node {0}")]
    InputNodeRemoval(Node),

    /// Output node with a measurement basis, or basis on an output node
    #[error("Measurement basis conflict on node {0}: output nodes carry no measurement basis")]
    MeasurementBasisConflict(Node),

    /// Qubit index already used by another boundary node
    #[error("Qubit index {index} already assigned (node {node})")]
    QubitIndexConflict { node: Node, index: usize },

    /// Non-output node without a measurement basis
    /// Gantree: MissingMeasurementBasis(Node) // 기저 누락
    #[error("Measurement basis not set for node {0}")]
    MissingMeasurementBasis(Node),

    // ========================================================================
    // Composition Errors
    // ========================================================================
    /// Graphs or patterns do not agree on their shared boundary
    /// Gantree: BoundaryMismatch(String) // 경계 불일치
    #[error("Boundary mismatch: {0}")]
    BoundaryMismatch(String),

    /// `N` issued for a node that is already live
    #[error("Node already prepared: {0}")]
    NodeAlreadyPrepared(Node),

    // ========================================================================
    // Flow / Scheduling Errors
    // ========================================================================
    /// Dependency graph induced by the flow contains a cycle
    /// Gantree: CyclicFlow{{ordered,total}} // 순환
    #[error("Cycle detected in the flow dependency graph: ordered {ordered} of {total} nodes")]
    CyclicFlow { ordered: usize, total: usize },

    /// Measurement order is not a valid linearization of the flow
    #[error("Invalid measurement order at node {0}")]
    InvalidMeasurementOrder(Node),

    // ========================================================================
    // Configuration / I/O Errors
    // ========================================================================
    /// Invalid compiler configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(String),
}

/// Result type alias for MBQC operations
/// Gantree: MbqcResult<T> // type alias
pub type MbqcResult<T> = Result<T, MbqcError>;

// ============================================================================
// Error Conversion Helpers
// ============================================================================

impl From<serde_json::Error> for MbqcError {
    fn from(err: serde_json::Error) -> Self {
        MbqcError::JsonError(err.to_string())
    }
}

// ============================================================================
// Error Helpers
// ============================================================================

impl MbqcError {
    /// Check if error comes from graph mutation or lookup
    pub fn is_graph_error(&self) -> bool {
        matches!(
            self,
            MbqcError::InvalidNode(_)
                | MbqcError::NodeAlreadyExists(_)
                | MbqcError::DuplicateEdge(..)
                | MbqcError::MissingEdge(..)
                | MbqcError::SelfLoop(_)
                | MbqcError::InputNodeRemoval(_)
                | MbqcError::MeasurementBasisConflict(_)
                | MbqcError::QubitIndexConflict { .. }
                | MbqcError::MissingMeasurementBasis(_)
        )
    }

    /// Check if error comes from composing graphs or patterns
    pub fn is_composition_error(&self) -> bool {
        matches!(
            self,
            MbqcError::BoundaryMismatch(_) | MbqcError::NodeAlreadyPrepared(_)
        )
    }

    /// Check if error means the supplied flow (or an order derived from it) is unusable
    pub fn is_flow_error(&self) -> bool {
        matches!(
            self,
            MbqcError::CyclicFlow { .. } | MbqcError::InvalidMeasurementOrder(_)
        )
    }

    /// Build a boundary mismatch error
    pub fn boundary(msg: impl Into<String>) -> Self {
        MbqcError::BoundaryMismatch(msg.into())
    }
}

// ============================================================================
// Tests
// ============================================================================
