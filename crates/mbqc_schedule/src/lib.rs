//! # MBQC Schedule
//!
//! Space-minimizing measurement scheduling for MBQC patterns.
//!
//! ## Gantree Architecture
//!
//! ```text
//! mbqc_schedule // L3: Scheduling (완료)
//!     L3_Scheduling // 측정 스케줄링 (완료)
//!         MeasSchedule // 공간 프로파일 (완료)
//!         SpaceScheduler // 공간 최소 순서, 부분 그래프 열 (완료)
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use mbqc_schedule::prelude::*;
//! use mbqc_core::{FlowLike, MeasBasis, NodeSet, OpenGraphState};
//!
//! // Line graph 0 - 1 - 2 - 3, input 0, output 3
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
//! let order = SpaceScheduler::minimized_space_order(&graph, &flow).unwrap();
//! let schedule = SpaceScheduler::schedule(&graph, &order).unwrap();
//!
//! println!("{}", schedule);
//! assert_eq!(schedule.max_space(), 2);
//! ```

#![warn(missing_docs)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Measurement schedule (Gantree: L3_Scheduling → MeasSchedule)
pub mod meas_schedule;

/// Scheduler algorithms (Gantree: L3_Scheduling → SpaceScheduler)
pub mod scheduler;

// ============================================================================
// Re-exports
// ============================================================================

pub use meas_schedule::{MeasSchedule, MeasStep};
pub use scheduler::{SpaceComparison, SpaceScheduler};

// ============================================================================
// Prelude
// ============================================================================

// Convenient imports below
pub mod prelude {
    //! Prelude module for convenient imports
    //!
    //! ```rust
    //! use mbqc_schedule::prelude::*;
    //! ```

    pub use crate::meas_schedule::{MeasSchedule, MeasStep};
    pub use crate::scheduler::{SpaceComparison, SpaceScheduler};
}

// ============================================================================
// Integration Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use mbqc_core::{construct_dag, FlowLike, MeasBasis, NodeSet, OpenGraphState, Plane};

    /// rows x cols cluster; inputs on column 0, outputs on the last column,
    /// flow along each row
    fn grid(rows: usize, cols: usize) -> (OpenGraphState, FlowLike) {
        let id = |r: usize, c: usize| r * cols + c;
        let mut graph = OpenGraphState::new();
        for _ in 0..rows * cols {
            graph.add_node();
        }
        for r in 0..rows {
            for c in 0..cols {
                if c + 1 < cols {
                    graph.add_edge(id(r, c), id(r, c + 1)).unwrap();
                }
                if r + 1 < rows && c % 2 == 1 {
                    graph.add_edge(id(r, c), id(r + 1, c)).unwrap();
                }
            }
        }
        let mut flow = FlowLike::new();
        for r in 0..rows {
            graph.set_input(id(r, 0)).unwrap();
            graph.set_output(id(r, cols - 1), r).unwrap();
            for c in 0..cols - 1 {
                graph
                    .set_meas_basis(id(r, c), MeasBasis::planar(Plane::XY, 0.1 * c as f64))
                    .unwrap();
                flow.insert(id(r, c), NodeSet::from([id(r, c + 1)]));
            }
        }
        (graph, flow)
    }

    #[test]
    fn test_grid_orders_respect_dependencies() {
        let (graph, flow) = grid(3, 5);
        let dag = construct_dag(&flow, &graph).unwrap();

        let topo = SpaceScheduler::topological_order(&graph, &flow).unwrap();
        let greedy = SpaceScheduler::minimized_space_order(&graph, &flow).unwrap();

        assert!(dag.respects(&topo));
        assert!(dag.respects(&greedy));
        assert_eq!(topo.len(), 12);
        assert_eq!(greedy.len(), 12);
    }

    #[test]
    fn test_grid_space_comparison() {
        let (graph, flow) = grid(3, 5);
        let comparison = SpaceScheduler::compare(&graph, &flow).unwrap();

        // every row keeps at least its own live qubit
        assert!(comparison.minimized.max_space() >= 3);
        assert!(comparison.minimized.max_space() <= graph.num_nodes());
        assert_eq!(comparison.minimized.final_space(), 3);
        assert_eq!(comparison.topological.final_space(), 3);
    }

    #[test]
    fn test_grid_subgraphs_rebuild_graph() {
        let (graph, flow) = grid(2, 4);
        let order = SpaceScheduler::minimized_space_order(&graph, &flow).unwrap();
        let subgraphs = SpaceScheduler::subgraph_sequences(&graph, &order).unwrap();

        let edge_total: usize = subgraphs.iter().map(|g| g.num_edges()).sum();
        assert_eq!(edge_total, graph.num_edges());

        let mut rebuilt = subgraphs[0].clone();
        for subgraph in &subgraphs[1..] {
            rebuilt.append(subgraph).unwrap();
        }
        assert_eq!(rebuilt.edges(), graph.edges());
        assert_eq!(rebuilt.output_node_indices(), graph.output_node_indices());
        assert!(rebuilt.check_meas_basis().is_ok());
    }

    #[test]
    fn test_schedule_json_roundtrip() {
        let (graph, flow) = grid(2, 3);
        let comparison = SpaceScheduler::compare(&graph, &flow).unwrap();
        let json = serde_json::to_string(&comparison).unwrap();
        let back: SpaceComparison = serde_json::from_str(&json).unwrap();
        assert_eq!(back, comparison);
    }
}
