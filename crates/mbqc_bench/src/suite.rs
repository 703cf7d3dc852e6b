//! Space benchmark for MBQC scheduling
//!
//! Gantree: L6_Benchmark → SpaceBenchmark
//!
//! Compares the peak qubit count of topological and space-minimized
//! measurement orders over generated cluster families.

use crate::generators::{BenchGraph, GraphGenerator};
use log::info;
use mbqc_compiler::{CommandLayout, Compiler, CompilerConfig, OrderStrategy};
use mbqc_core::MbqcResult;
use mbqc_schedule::SpaceScheduler;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Single benchmark record
/// Gantree: SpaceRecord // 공간 기록
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpaceRecord {
    /// Benchmark name
    pub name: String,

    /// Number of nodes
    pub nodes: usize,

    /// Number of edges
    pub edges: usize,

    /// Peak space of the topological order
    pub topological_space: usize,

    /// Peak space of the minimized order
    pub minimized_space: usize,

    /// Peak space of the compiled just-in-time pattern
    pub jit_pattern_space: usize,

    /// Execution time (milliseconds)
    pub time_ms: u64,
}

impl SpaceRecord {
    /// Qubits saved at the peak by the minimized order
    pub fn saving(&self) -> i64 {
        self.topological_space as i64 - self.minimized_space as i64
    }

    /// Minimized over topological peak space
    pub fn ratio(&self) -> f64 {
        if self.topological_space == 0 {
            return 1.0;
        }
        self.minimized_space as f64 / self.topological_space as f64
    }
}

/// Space benchmark suite
/// Gantree: SpaceBenchmark // 공간 벤치마크
pub struct SpaceBenchmark {
    /// Base seed for reproducibility
    seed: u64,

    /// Results
    results: Vec<SpaceRecord>,

    /// Log each benchmark at info level
    verbose: bool,
}

impl SpaceBenchmark {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Create new benchmark suite
    pub fn new() -> Self {
        Self::with_seed(42)
    }

    /// Create with seed
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            results: Vec::new(),
            verbose: false,
        }
    }

    /// Enable verbose output
    pub fn verbose(mut self) -> Self {
        self.verbose = true;
        self
    }

    fn generator(&self) -> GraphGenerator {
        GraphGenerator::with_seed(self.seed)
    }

    // ========================================================================
    // Individual Benchmarks
    // ========================================================================

    /// Benchmark one generated graph
    pub fn bench_graph(&mut self, bench: &BenchGraph) -> MbqcResult<SpaceRecord> {
        if self.verbose {
            info!(
                "Running benchmark: {} ({} nodes, {} edges)",
                bench.name,
                bench.graph.num_nodes(),
                bench.graph.num_edges()
            );
        }

        let start = Instant::now();
        let comparison = SpaceScheduler::compare(&bench.graph, &bench.flow)?;
        let config = CompilerConfig::standard()
            .with_order(OrderStrategy::MinimizedSpace)
            .with_layout(CommandLayout::JustInTime);
        let output = Compiler::new(config).compile(&bench.graph, &bench.flow)?;
        let time_ms = start.elapsed().as_millis() as u64;

        let record = SpaceRecord {
            name: bench.name.clone(),
            nodes: bench.graph.num_nodes(),
            edges: bench.graph.num_edges(),
            topological_space: comparison.topological.max_space(),
            minimized_space: comparison.minimized.max_space(),
            jit_pattern_space: output.max_space(),
            time_ms,
        };
        self.results.push(record.clone());
        Ok(record)
    }

    // ========================================================================
    // Benchmark Suites
    // ========================================================================

    /// Linear clusters of 2..=max_nodes nodes
    pub fn run_linear_scaling(&mut self, max_nodes: usize) -> MbqcResult<Vec<SpaceRecord>> {
        if self.verbose {
            info!("=== Linear Scaling Benchmark ===");
        }
        let gen = self.generator();
        (2..=max_nodes)
            .map(|n| self.bench_graph(&gen.linear_cluster(n)?))
            .collect()
    }

    /// Grids with a fixed row count and 2..=max_cols columns
    pub fn run_grid_scaling(
        &mut self,
        rows: usize,
        max_cols: usize,
    ) -> MbqcResult<Vec<SpaceRecord>> {
        if self.verbose {
            info!("=== Grid Scaling Benchmark ===");
        }
        let gen = self.generator();
        (2..=max_cols)
            .map(|cols| self.bench_graph(&gen.grid_cluster(rows, cols)?))
            .collect()
    }

    /// Brickwork states of the given row counts
    pub fn run_brickwork(&mut self, row_counts: &[usize], cols: usize) -> MbqcResult<Vec<SpaceRecord>> {
        if self.verbose {
            info!("=== Brickwork Benchmark ===");
        }
        let gen = self.generator();
        row_counts
            .iter()
            .map(|&rows| self.bench_graph(&gen.brickwork(rows, cols)?))
            .collect()
    }

    /// Run full benchmark suite
    pub fn run_all(&mut self) -> MbqcResult<Vec<SpaceRecord>> {
        if self.verbose {
            info!("=== Running Full Benchmark Suite ===");
        }

        let mut all_results = self.run_linear_scaling(16)?;
        all_results.extend(self.run_grid_scaling(3, 8)?);
        all_results.extend(self.run_grid_scaling(5, 8)?);
        all_results.extend(self.run_brickwork(&[2, 4, 6], 17)?);
        Ok(all_results)
    }

    /// Run quick benchmark (for testing)
    pub fn run_quick(&mut self) -> MbqcResult<Vec<SpaceRecord>> {
        if self.verbose {
            info!("=== Running Quick Benchmark ===");
        }

        let gen = self.generator();
        Ok(vec![
            self.bench_graph(&gen.linear_cluster(6)?)?,
            self.bench_graph(&gen.grid_cluster(3, 4)?)?,
            self.bench_graph(&gen.brickwork(2, 9)?)?,
        ])
    }

    // ========================================================================
    // Results
    // ========================================================================

    /// Get all results
    pub fn results(&self) -> &[SpaceRecord] {
        &self.results
    }

    /// Clear results
    pub fn clear(&mut self) {
        self.results.clear();
    }

    /// Get statistics
    pub fn statistics(&self) -> SpaceStatistics {
        SpaceStatistics::from_results(&self.results)
    }
}

impl Default for SpaceBenchmark {
    fn default() -> Self {
        Self::new()
    }
}

/// Benchmark statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpaceStatistics {
    /// Number of benchmarks
    pub count: usize,

    /// Average qubits saved at the peak
    pub avg_saving: f64,

    /// Largest saving
    pub max_saving: i64,

    /// Average minimized / topological ratio
    pub avg_ratio: f64,

    /// Total execution time (ms)
    pub total_time_ms: u64,
}

impl SpaceStatistics {
    /// Compute statistics from results
    pub fn from_results(results: &[SpaceRecord]) -> Self {
        if results.is_empty() {
            return Self {
                count: 0,
                avg_saving: 0.0,
                max_saving: 0,
                avg_ratio: 1.0,
                total_time_ms: 0,
            };
        }

        let count = results.len();
        Self {
            count,
            avg_saving: results.iter().map(|r| r.saving() as f64).sum::<f64>() / count as f64,
            max_saving: results.iter().map(|r| r.saving()).max().unwrap_or(0),
            avg_ratio: results.iter().map(|r| r.ratio()).sum::<f64>() / count as f64,
            total_time_ms: results.iter().map(|r| r.time_ms).sum(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
