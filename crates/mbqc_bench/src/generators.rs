//! Open graph generators for benchmarking
//!
//! Gantree: L6_Benchmark → Generators
//!
//! Cluster-state families with a row-wise causal flow: inputs on the left
//! column, outputs on the right, every other node measured in the XY plane
//! at a random angle.

use mbqc_core::{FlowLike, MbqcError, MbqcResult, MeasBasis, Node, NodeSet, OpenGraphState, Plane};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use std::f64::consts::PI;

/// Generated open graph with its flow
/// Gantree: BenchGraph // 벤치 그래프
#[derive(Debug, Clone)]
pub struct BenchGraph {
    /// Family and size, e.g. `grid_3x5`
    pub name: String,

    /// Open graph with bases on every non-output node
    pub graph: OpenGraphState,

    /// Causal flow of the graph
    pub flow: FlowLike,
}

/// Open graph generator for benchmarks
/// Gantree: GraphGenerator // 그래프 생성기
pub struct GraphGenerator {
    /// Random seed
    seed: Option<u64>,
}

impl GraphGenerator {
    /// Create new generator
    pub fn new() -> Self {
        Self { seed: None }
    }

    /// Create generator with seed
    pub fn with_seed(seed: u64) -> Self {
        Self { seed: Some(seed) }
    }

    // ========================================================================
    // Cluster Families
    // ========================================================================

    /// Linear cluster 0 - 1 - ... - (n-1)
    pub fn linear_cluster(&self, n: usize) -> MbqcResult<BenchGraph> {
        if n < 2 {
            return Err(MbqcError::InvalidConfig(format!(
                "linear cluster needs at least 2 nodes, got {}",
                n
            )));
        }
        let bench = self.layered(1, n, |_, _| false)?;
        Ok(BenchGraph {
            name: format!("linear_{}", n),
            ..bench
        })
    }

    /// rows x cols cluster with vertical edges in every column
    pub fn grid_cluster(&self, rows: usize, cols: usize) -> MbqcResult<BenchGraph> {
        Self::check_shape(rows, cols)?;
        let bench = self.layered(rows, cols, |_, _| true)?;
        Ok(BenchGraph {
            name: format!("grid_{}x{}", rows, cols),
            ..bench
        })
    }

    /// Brickwork state: rows `r` and `r + 1` are joined at columns 2 and 4
    /// (mod 8) for even `r`, at columns 6 and 0 (mod 8) for odd `r`
    pub fn brickwork(&self, rows: usize, cols: usize) -> MbqcResult<BenchGraph> {
        Self::check_shape(rows, cols)?;
        let bench = self.layered(rows, cols, |r, c| match (r % 2, c % 8) {
            (0, 2) | (0, 4) => true,
            (1, 6) | (1, 0) => c > 0,
            _ => false,
        })?;
        Ok(BenchGraph {
            name: format!("brickwork_{}x{}", rows, cols),
            ..bench
        })
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn check_shape(rows: usize, cols: usize) -> MbqcResult<()> {
        if rows == 0 || cols < 2 {
            return Err(MbqcError::InvalidConfig(format!(
                "cluster needs at least 1 row and 2 columns, got {}x{}",
                rows, cols
            )));
        }
        Ok(())
    }

    /// Horizontal wires plus the vertical edges `vertical(r, c)` selects
    /// between rows `r` and `r + 1` at column `c`
    fn layered(
        &self,
        rows: usize,
        cols: usize,
        vertical: impl Fn(usize, usize) -> bool,
    ) -> MbqcResult<BenchGraph> {
        let id = |r: usize, c: usize| -> Node { r * cols + c };
        let mut rng = self.get_rng();
        let mut graph = OpenGraphState::new();
        let mut flow = FlowLike::new();

        for _ in 0..rows * cols {
            graph.add_node();
        }
        for r in 0..rows {
            for c in 0..cols {
                if c + 1 < cols {
                    graph.add_edge(id(r, c), id(r, c + 1))?;
                }
                if r + 1 < rows && vertical(r, c) {
                    graph.add_edge(id(r, c), id(r + 1, c))?;
                }
            }
        }

        for r in 0..rows {
            graph.set_input_with_index(id(r, 0), r)?;
            graph.set_output(id(r, cols - 1), r)?;
            for c in 0..cols - 1 {
                let angle: f64 = rng.gen::<f64>() * 2.0 * PI;
                graph.set_meas_basis(id(r, c), MeasBasis::planar(Plane::XY, angle))?;
                flow.insert(id(r, c), NodeSet::from([id(r, c + 1)]));
            }
        }

        Ok(BenchGraph {
            name: String::new(),
            graph,
            flow,
        })
    }

    /// Get RNG (seeded or from entropy)
    fn get_rng(&self) -> ChaCha8Rng {
        match self.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        }
    }
}

impl Default for GraphGenerator {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use mbqc_core::construct_dag;

    #[test]
    fn test_linear_cluster() {
        let bench = GraphGenerator::with_seed(42).linear_cluster(5).unwrap();
        assert_eq!(bench.name, "linear_5");
        assert_eq!(bench.graph.num_nodes(), 5);
        assert_eq!(bench.graph.num_edges(), 4);
        assert_eq!(bench.graph.input_nodes(), NodeSet::from([0]));
        assert_eq!(bench.graph.output_nodes(), NodeSet::from([4]));
        assert_eq!(bench.flow.len(), 4);
        assert!(bench.graph.check_meas_basis().is_ok());
    }

    #[test]
    fn test_linear_cluster_too_small() {
        assert!(matches!(
            GraphGenerator::new().linear_cluster(1),
            Err(MbqcError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_grid_cluster() {
        let bench = GraphGenerator::with_seed(1).grid_cluster(3, 4).unwrap();
        assert_eq!(bench.graph.num_nodes(), 12);
        // 3 rows of 3 horizontal edges, 2 x 4 vertical edges
        assert_eq!(bench.graph.num_edges(), 17);
        assert_eq!(bench.graph.q_index(11), Some(2));

        let dag = construct_dag(&bench.flow, &bench.graph).unwrap();
        assert!(dag.topological_order().is_ok());
    }

    #[test]
    fn test_brickwork() {
        let bench = GraphGenerator::with_seed(7).brickwork(2, 9).unwrap();
        assert_eq!(bench.graph.num_nodes(), 18);
        // 2 x 8 horizontal, columns 2 and 4 vertical
        assert_eq!(bench.graph.num_edges(), 18);
        assert!(bench.graph.has_edge(2, 11));
        assert!(bench.graph.has_edge(4, 13));
        assert!(!bench.graph.has_edge(0, 9));

        let dag = construct_dag(&bench.flow, &bench.graph).unwrap();
        assert!(dag.topological_order().is_ok());
    }

    #[test]
    fn test_invalid_shape() {
        let gen = GraphGenerator::new();
        assert!(gen.grid_cluster(0, 3).is_err());
        assert!(gen.brickwork(2, 1).is_err());
    }

    #[test]
    fn test_seed_reproducibility() {
        let a = GraphGenerator::with_seed(42).grid_cluster(2, 3).unwrap();
        let b = GraphGenerator::with_seed(42).grid_cluster(2, 3).unwrap();
        assert_eq!(a.graph, b.graph);

        let c = GraphGenerator::with_seed(43).grid_cluster(2, 3).unwrap();
        assert_ne!(a.graph.meas_bases(), c.graph.meas_bases());
    }
}
