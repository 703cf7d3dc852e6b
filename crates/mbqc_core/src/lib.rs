//! # MBQC Core
//!
//! Open graph states, correction flows, commands and patterns for
//! measurement-based quantum computation.
//!
//! ## Gantree Architecture
//!
//! ```text
//! mbqc_core // L0+L1+L2: Foundation + Graph/Pattern + Flow (완료)
//!     L0_Foundation // 기반 타입/상수/에러 (완료)
//!         CoreTypes // Node, Plane, MeasBasis (완료)
//!         Constants // 허용 오차/출력 한도 (완료)
//!         Errors // 에러 타입 (완료)
//!     L1_Graph // 그래프 상태 (완료)
//!         OpenGraphState // 열린 그래프 상태 (완료)
//!     L1_Pattern // 패턴 모델 (완료)
//!         Command // 명령 enum (완료)
//!         Pattern // 패턴 빌더/동결 (완료)
//!     L2_Flow // 흐름 의존성 (완료)
//!         FlowDependency // 보정 도메인, DAG, 위상 정렬 (완료)
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use mbqc_core::prelude::*;
//!
//! // Line graph 0 - 1 - 2 with input 0 and output 2
//! let mut graph = OpenGraphState::new();
//! let nodes: Vec<Node> = (0..3).map(|_| graph.add_node()).collect();
//! graph.add_edge(nodes[0], nodes[1]).unwrap();
//! graph.add_edge(nodes[1], nodes[2]).unwrap();
//! graph.set_input(nodes[0]).unwrap();
//! graph.set_output(nodes[2], 0).unwrap();
//!
//! let flow = FlowLike::from([
//!     (0, NodeSet::from([1])),
//!     (1, NodeSet::from([2])),
//! ]);
//! let dag = construct_dag(&flow, &graph).unwrap();
//! assert_eq!(dag.topological_order().unwrap(), vec![0, 1, 2]);
//! ```
//!
//! ## Building Patterns
//!
//! ```rust
//! use mbqc_core::prelude::*;
//!
//! let mut pattern = Pattern::with_inputs(NodeSet::from([0]));
//! pattern.add(Command::n(1)).unwrap();
//! pattern.add(Command::e(0, 1)).unwrap();
//! pattern.add(Command::m(0, Plane::XY, 0.0)).unwrap();
//!
//! assert!(is_standardized(&pattern));
//! assert_eq!(pattern.calc_max_space(), 2);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Core types (Gantree: L0_Foundation → CoreTypes)
pub mod types;

/// Constants (Gantree: L0_Foundation → Constants)
pub mod constants;

/// Error types (Gantree: L0_Foundation → Errors)
pub mod error;

/// Open graph state (Gantree: L1_Graph → OpenGraphState)
pub mod graphstate;

/// Pattern commands (Gantree: L1_Pattern → Command)
pub mod command;

/// Pattern structure (Gantree: L1_Pattern → Pattern)
pub mod pattern;

/// Flow dependency analysis (Gantree: L2_Flow → FlowDependency)
pub mod flow;

// ============================================================================
// Re-exports
// ============================================================================

pub use command::{Command, CommandKind};
pub use error::{MbqcError, MbqcResult};
pub use flow::{construct_dag, generate_corrections, odd_neighbors, DependencyDag, FlowLike};
pub use graphstate::{bipartite_edges, OpenGraphState};
pub use pattern::{format_pattern, is_standardized, FrozenPattern, Pattern, PatternLike};
pub use types::{
    meas_basis_vector, Angle, Axis, Corrections, MeasBasis, Node, NodeSet, Plane, Sign,
};

// ============================================================================
// Prelude
// ============================================================================

pub mod prelude {
    //! Convenient imports for common use cases
    //!
    //! ```rust
    //! use mbqc_core::prelude::*;
    //! ```

    pub use crate::command::{Command, CommandKind};
    pub use crate::error::{MbqcError, MbqcResult};
    pub use crate::flow::{
        construct_dag, generate_corrections, odd_neighbors, DependencyDag, FlowLike,
    };
    pub use crate::graphstate::{bipartite_edges, OpenGraphState};
    pub use crate::pattern::{
        format_pattern, is_standardized, FrozenPattern, Pattern, PatternLike,
    };
    pub use crate::types::{Angle, Axis, Corrections, MeasBasis, Node, NodeSet, Plane, Sign};
}

// ============================================================================
// Version Information
// ============================================================================

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");

// ============================================================================
// Integration Tests
// ============================================================================
