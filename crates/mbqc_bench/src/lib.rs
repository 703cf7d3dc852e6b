//! # MBQC Bench
//!
//! Space benchmarks for MBQC measurement scheduling.
//!
//! ## Gantree Architecture
//!
//! ```text
//! mbqc_bench // L6: Benchmark (완료)
//!     Generators // 클러스터 상태 생성 (완료)
//!         linear_cluster(), grid_cluster(), brickwork()
//!     SpaceBenchmark // 위상 순서 vs 공간 최소 순서 (완료)
//!         bench_graph(), run_quick(), run_all()
//!     Reporter // Markdown/JSON/CSV/Text (완료)
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use mbqc_bench::prelude::*;
//!
//! let mut suite = SpaceBenchmark::with_seed(42);
//! let results = suite.run_quick().unwrap();
//!
//! let report = Reporter::to_markdown(&results);
//! println!("{}", report);
//! ```
//!
//! ## Graph Generation
//!
//! ```rust
//! use mbqc_bench::prelude::*;
//!
//! let gen = GraphGenerator::with_seed(42);
//!
//! let line = gen.linear_cluster(8).unwrap();
//! let grid = gen.grid_cluster(3, 5).unwrap();
//! let brick = gen.brickwork(4, 9).unwrap();
//!
//! assert_eq!(grid.graph.num_nodes(), 15);
//! ```

#![warn(missing_docs)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Graph generators (Gantree: L6_Benchmark → Generators)
pub mod generators;

/// Benchmark suite (Gantree: L6_Benchmark → SpaceBenchmark)
pub mod suite;

/// Reporting (Gantree: L6_Benchmark → Reporter)
pub mod reporter;

// ============================================================================
// Re-exports
// ============================================================================

pub use generators::{BenchGraph, GraphGenerator};
pub use reporter::{ReportFormat, Reporter};
pub use suite::{SpaceBenchmark, SpaceRecord, SpaceStatistics};

// ============================================================================
// Prelude
// ============================================================================

/// Convenient imports for common use cases
pub mod prelude {
    //! Prelude module for convenient imports
    //!
    //! ```rust
    //! use mbqc_bench::prelude::*;
    //! ```

    pub use crate::generators::{BenchGraph, GraphGenerator};
    pub use crate::reporter::{ReportFormat, Reporter};
    pub use crate::suite::{SpaceBenchmark, SpaceRecord, SpaceStatistics};
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
    use mbqc_compiler::{transpile_from_subgraphs, Compiler, CompilerConfig};
    use mbqc_core::{is_standardized, PatternLike};
    use mbqc_schedule::SpaceScheduler;

    #[test]
    fn test_quick_suite() {
        let mut suite = SpaceBenchmark::with_seed(42);
        let results = suite.run_quick().unwrap();

        assert_eq!(results.len(), 3);
        assert_eq!(suite.statistics().count, 3);
        for r in &results {
            assert!(r.minimized_space <= r.nodes);
            assert!(r.topological_space <= r.nodes);
        }
    }

    #[test]
    fn test_grid_scaling_saves_space() {
        let mut suite = SpaceBenchmark::with_seed(1);
        let results = suite.run_grid_scaling(3, 6).unwrap();

        assert_eq!(results.len(), 5);
        // a grid never needs more than two columns live at once
        for r in &results {
            assert!(r.minimized_space <= 6, "{} peaked at {}", r.name, r.minimized_space);
        }
    }

    #[test]
    fn test_reporter_formats() {
        let mut suite = SpaceBenchmark::with_seed(42);
        let results = suite.run_quick().unwrap();

        let md = Reporter::report(&results, ReportFormat::Markdown);
        assert!(md.contains("linear_6"));

        let csv = Reporter::report(&results, ReportFormat::Csv);
        assert_eq!(csv.lines().count(), results.len() + 1);

        let json = Reporter::report(&results, ReportFormat::Json);
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["statistics"]["count"], 3);
    }

    #[test]
    fn test_brickwork_pipeline() {
        let bench = GraphGenerator::with_seed(3).brickwork(4, 9).unwrap();

        let standard = Compiler::new(CompilerConfig::standard())
            .compile(&bench.graph, &bench.flow)
            .unwrap();
        assert!(is_standardized(&standard.pattern));
        assert_eq!(standard.max_space(), bench.graph.num_nodes());

        let optimized = Compiler::new(CompilerConfig::space_optimized())
            .compile(&bench.graph, &bench.flow)
            .unwrap();
        assert_eq!(optimized.max_space(), optimized.predicted_space());
        assert!(optimized.max_space() < standard.max_space());
    }

    #[test]
    fn test_subgraph_decomposition_of_generated_graph() {
        let bench = GraphGenerator::with_seed(5).grid_cluster(2, 5).unwrap();
        let order = SpaceScheduler::minimized_space_order(&bench.graph, &bench.flow).unwrap();
        let subgraphs = SpaceScheduler::subgraph_sequences(&bench.graph, &order).unwrap();

        let edges: usize = subgraphs.iter().map(|s| s.num_edges()).sum();
        assert_eq!(edges, bench.graph.num_edges());

        let pattern = transpile_from_subgraphs(
            &subgraphs,
            &bench.graph.input_nodes(),
            &bench.graph.output_nodes(),
            &bench.flow,
            &bench.graph.meas_bases(),
        )
        .unwrap();
        let schedule = SpaceScheduler::schedule(&bench.graph, &order).unwrap();
        assert_eq!(pattern.calc_max_space(), schedule.max_space());
    }
}
