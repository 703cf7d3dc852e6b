//! # MBQC Compiler
//!
//! Flow-based compilation of open graph states into MBQC patterns.
//!
//! ## Gantree Architecture
//!
//! ```text
//! mbqc_compiler // L4+L5: Compilation + Integration (완료)
//!     L4_Compilation // 패턴 컴파일 (완료)
//!         Transpile // 보정 도메인, 표준/JIT 배치 (완료)
//!             transpile() - 표준 패턴
//!             transpile_with_order() - 순서 지정
//!             transpile_from_subgraphs() - 부분 그래프 합성
//!     L5_Integration // 통합 (완료)
//!         CompilerConfig // 컴파일러 설정 (완료)
//!         Compiler // 단계별 실행 (완료)
//!             order() → schedule() → transpile()
//!             compile() - 전체 파이프라인
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use mbqc_compiler::prelude::*;
//! use mbqc_core::{is_standardized, FlowLike, MeasBasis, NodeSet, OpenGraphState};
//!
//! // Line graph 0 - 1 - 2, input 0, output 2
//! let mut graph = OpenGraphState::new();
//! for _ in 0..3 {
//!     graph.add_node();
//! }
//! graph.add_edge(0, 1).unwrap();
//! graph.add_edge(1, 2).unwrap();
//! graph.set_input(0).unwrap();
//! graph.set_output(2, 0).unwrap();
//! graph.set_meas_basis(0, MeasBasis::default()).unwrap();
//! graph.set_meas_basis(1, MeasBasis::default()).unwrap();
//! let flow = FlowLike::from([(0, NodeSet::from([1])), (1, NodeSet::from([2]))]);
//!
//! let pattern = transpile(
//!     &graph,
//!     &graph.input_nodes(),
//!     &graph.output_nodes(),
//!     &flow,
//!     &graph.meas_bases(),
//! )
//! .unwrap();
//! assert!(is_standardized(&pattern));
//! ```
//!
//! ## Using the Compiler
//!
//! ```rust
//! use mbqc_compiler::prelude::*;
//! use mbqc_core::{FlowLike, MeasBasis, NodeSet, OpenGraphState};
//!
//! let mut graph = OpenGraphState::new();
//! for _ in 0..4 {
//!     graph.add_node();
//! }
//! for i in 1..4 {
//!     graph.add_edge(i - 1, i).unwrap();
//! }
//! graph.set_input(0).unwrap();
//! graph.set_output(3, 0).unwrap();
//! for i in 0..3 {
//!     graph.set_meas_basis(i, MeasBasis::default()).unwrap();
//! }
//! let flow: FlowLike = (0..3).map(|i| (i, NodeSet::from([i + 1]))).collect();
//!
//! let mut compiler = Compiler::new(CompilerConfig::space_optimized());
//! let output = compiler.compile(&graph, &flow).unwrap();
//! assert_eq!(output.max_space(), 2);
//! ```

#![warn(missing_docs)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Pattern compilation (Gantree: L4_Compilation → Transpile)
pub mod transpile;

/// Configuration (Gantree: L5_Integration → CompilerConfig)
pub mod config;

/// Staged compiler (Gantree: L5_Integration → Compiler)
pub mod pipeline;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::{CompilerConfig, OrderStrategy};
pub use pipeline::{CompileOutput, Compiler, CompilerStage, CompilerState};
pub use transpile::{
    measurement_command, transpile, transpile_from_subgraphs, transpile_with_order,
    CommandLayout, MeasBases,
};

// ============================================================================
// Prelude
// ============================================================================

/// Convenient imports for common use cases
pub mod prelude {
    //! Prelude module for convenient imports
    //!
    //! ```rust
    //! use mbqc_compiler::prelude::*;
    //! ```

    pub use crate::config::{CompilerConfig, OrderStrategy};
    pub use crate::pipeline::{CompileOutput, Compiler, CompilerStage};
    pub use crate::transpile::{
        transpile, transpile_from_subgraphs, transpile_with_order, CommandLayout, MeasBases,
    };
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

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use mbqc_core::{
        is_standardized, FlowLike, MeasBasis, Node, NodeSet, OpenGraphState, PatternLike, Plane,
    };
    use mbqc_schedule::SpaceScheduler;

    /// rows x cols cluster with vertical edges in every column, inputs on the
    /// left column and outputs on the right; flow steps one column right
    fn grid(rows: usize, cols: usize) -> (OpenGraphState, FlowLike) {
        let id = |r: usize, c: usize| -> Node { r * cols + c };
        let mut graph = OpenGraphState::new();
        for _ in 0..rows * cols {
            graph.add_node();
        }
        for r in 0..rows {
            for c in 0..cols {
                if c + 1 < cols {
                    graph.add_edge(id(r, c), id(r, c + 1)).unwrap();
                }
                if r + 1 < rows {
                    graph.add_edge(id(r, c), id(r + 1, c)).unwrap();
                }
            }
        }
        for r in 0..rows {
            graph.set_input(id(r, 0)).unwrap();
            graph.set_output(id(r, cols - 1), r).unwrap();
        }
        let mut flow = FlowLike::new();
        for r in 0..rows {
            for c in 0..cols - 1 {
                let angle = (r + c) as f64 * 0.125;
                graph
                    .set_meas_basis(id(r, c), MeasBasis::planar(Plane::XY, angle))
                    .unwrap();
                flow.insert(id(r, c), NodeSet::from([id(r, c + 1)]));
            }
        }
        (graph, flow)
    }

    #[test]
    fn test_standard_transpile_on_grid() {
        let (graph, flow) = grid(3, 4);
        let pattern = transpile(
            &graph,
            &graph.input_nodes(),
            &graph.output_nodes(),
            &flow,
            &graph.meas_bases(),
        )
        .unwrap();

        assert!(is_standardized(&pattern));
        assert_eq!(pattern.calc_max_space(), graph.num_nodes());
        assert_eq!(pattern.output_nodes(), &graph.output_nodes());
        assert_eq!(pattern.meas_planes().len(), 9);
    }

    #[test]
    fn test_just_in_time_matches_schedule() {
        let (graph, flow) = grid(3, 4);
        let order = SpaceScheduler::minimized_space_order(&graph, &flow).unwrap();
        let schedule = SpaceScheduler::schedule(&graph, &order).unwrap();

        let jit = transpile_with_order(
            &graph,
            &graph.input_nodes(),
            &graph.output_nodes(),
            &flow,
            &graph.meas_bases(),
            &order,
            CommandLayout::JustInTime,
        )
        .unwrap();

        assert_eq!(jit.calc_max_space(), schedule.max_space());
        assert!(jit.calc_max_space() < graph.num_nodes());
        assert_eq!(jit.output_nodes(), &graph.output_nodes());
    }

    #[test]
    fn test_subgraph_sequences_compose() {
        let (graph, flow) = grid(2, 4);
        let order = SpaceScheduler::minimized_space_order(&graph, &flow).unwrap();
        let schedule = SpaceScheduler::schedule(&graph, &order).unwrap();
        let subgraphs = SpaceScheduler::subgraph_sequences(&graph, &order).unwrap();

        let composed = transpile_from_subgraphs(
            &subgraphs,
            &graph.input_nodes(),
            &graph.output_nodes(),
            &flow,
            &graph.meas_bases(),
        )
        .unwrap();

        assert_eq!(composed.calc_max_space(), schedule.max_space());
        let measured: Vec<Node> = composed
            .commands()
            .iter()
            .filter(|cmd| cmd.is_measurement())
            .filter_map(|cmd| cmd.node())
            .collect();
        assert_eq!(measured, order);
    }

    #[test]
    fn test_compiler_presets_on_grid() {
        let (graph, flow) = grid(3, 5);

        let standard = Compiler::new(CompilerConfig::standard())
            .compile(&graph, &flow)
            .unwrap();
        let optimized = Compiler::new(CompilerConfig::space_optimized())
            .compile(&graph, &flow)
            .unwrap();

        assert_eq!(standard.max_space(), graph.num_nodes());
        assert_eq!(optimized.max_space(), optimized.predicted_space());
        assert!(optimized.max_space() <= standard.max_space());
        assert_eq!(standard.pattern.len(), optimized.pattern.len());
    }

    #[test]
    fn test_compile_output_serialization() {
        let (graph, flow) = grid(2, 3);
        let output = Compiler::new(CompilerConfig::space_optimized())
            .compile(&graph, &flow)
            .unwrap();
        let frozen = output.pattern.freeze();
        let restored = mbqc_core::FrozenPattern::from_json(&frozen.to_json().unwrap()).unwrap();
        assert_eq!(frozen, restored);
    }

    #[test]
    fn test_version() {
        assert!(!super::VERSION.is_empty());
        assert_eq!(super::NAME, "mbqc_compiler");
    }
}
