//! Space scheduler for MBQC
//!
//! Gantree: L3_Scheduling → SpaceScheduler
//!
//! Greedy measurement ordering that keeps the number of simultaneously live
//! qubits low while respecting the flow-induced partial order, plus the
//! stepwise subgraph decomposition of a measurement order.

use crate::meas_schedule::{MeasSchedule, MeasStep};
use log::{debug, trace};
use mbqc_core::{
    construct_dag, FlowLike, MbqcError, MbqcResult, Node, NodeSet, OpenGraphState,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Space-minimizing measurement scheduler
/// Gantree: SpaceScheduler // 공간 스케줄러
pub struct SpaceScheduler;

impl SpaceScheduler {
    // ========================================================================
    // Measurement Orders
    // ========================================================================

    /// Greedy measurement order minimizing newly prepared qubits per step
    /// Gantree: minimized_space_order(G, flow) -> Vec<Node> // 공간 최소 순서
    ///
    /// Among the non-output nodes whose DAG parents are all measured, picks
    /// the one whose measurement activates the fewest unprepared neighbours.
    /// Ties go to the lowest node id.
    pub fn minimized_space_order(graph: &OpenGraphState, flow: &FlowLike) -> MbqcResult<Vec<Node>> {
        let dag = construct_dag(flow, graph)?;
        let outputs = graph.output_nodes();
        let mut unmeasured: NodeSet = graph.nodes().filter(|n| !outputs.contains(n)).collect();

        // Gantree: init_dependencies() // 부모 집합 초기화
        let mut pending_parents: BTreeMap<Node, NodeSet> = dag
            .inverted()
            .into_iter()
            .filter(|(node, _)| unmeasured.contains(node))
            .map(|(node, parents)| {
                let parents = parents.intersection(&unmeasured).copied().collect();
                (node, parents)
            })
            .collect();

        let mut activated = graph.input_nodes();
        let total = unmeasured.len();
        let mut order = Vec::with_capacity(total);

        while !unmeasured.is_empty() {
            // Gantree: select_candidate() // 최소 비용 후보 선택
            let mut best: Option<(usize, Node)> = None;
            for &node in &unmeasured {
                let ready = pending_parents.get(&node).map_or(true, |p| p.is_empty());
                if !ready {
                    continue;
                }
                let cost = Self::activation_cost(graph, node, &activated)?;
                if best.map_or(true, |b| (cost, node) < b) {
                    best = Some((cost, node));
                }
            }

            let Some((cost, target)) = best else {
                return Err(MbqcError::CyclicFlow {
                    ordered: order.len(),
                    total,
                });
            };
            trace!("schedule node {} (activation cost {})", target, cost);

            // Gantree: activate(target) // 활성화 갱신
            activated.extend(graph.neighbors(target)?.iter().copied());
            activated.insert(target);
            unmeasured.remove(&target);
            if let Some(children) = dag.children(target) {
                for child in children {
                    if let Some(parents) = pending_parents.get_mut(child) {
                        parents.remove(&target);
                    }
                }
            }
            order.push(target);
        }

        debug!("minimized space order over {} nodes", order.len());
        Ok(order)
    }

    /// Topological measurement order of the non-output nodes
    /// Gantree: topological_order(G, flow) -> Vec<Node> // 위상 순서
    pub fn topological_order(graph: &OpenGraphState, flow: &FlowLike) -> MbqcResult<Vec<Node>> {
        let dag = construct_dag(flow, graph)?;
        let outputs = graph.output_nodes();
        Ok(dag
            .topological_order()?
            .into_iter()
            .filter(|n| !outputs.contains(n))
            .collect())
    }

    /// Number of unprepared neighbours measuring `node` would activate
    fn activation_cost(
        graph: &OpenGraphState,
        node: Node,
        activated: &NodeSet,
    ) -> MbqcResult<usize> {
        Ok(graph
            .neighbors(node)?
            .iter()
            .filter(|n| !activated.contains(*n))
            .count())
    }

    // ========================================================================
    // Space Profile
    // ========================================================================

    /// Just-in-time space profile of a measurement order
    /// Gantree: schedule(G, order) -> MeasSchedule // 공간 프로파일
    pub fn schedule(graph: &OpenGraphState, order: &[Node]) -> MbqcResult<MeasSchedule> {
        let outputs = graph.output_nodes();
        let mut prepared = graph.input_nodes();
        let mut live = prepared.len();
        let mut measured = NodeSet::new();
        let mut steps = Vec::with_capacity(order.len());

        for &target in order {
            graph.ensure_node_exists(target)?;
            if outputs.contains(&target) || measured.contains(&target) {
                return Err(MbqcError::InvalidMeasurementOrder(target));
            }

            let mut activated: NodeSet = graph
                .neighbors(target)?
                .difference(&prepared)
                .copied()
                .collect();
            if !prepared.contains(&target) {
                activated.insert(target);
            }

            let step = MeasStep {
                target,
                activated,
                live_before: live,
            };
            live = step.live_after();
            prepared.extend(step.activated.iter().copied());
            measured.insert(target);
            steps.push(step);
        }

        let trailing: NodeSet = outputs.difference(&prepared).copied().collect();
        let schedule = MeasSchedule::new(steps, graph.input_nodes().len(), trailing);
        debug!(
            "scheduled {} measurements, max space {}",
            schedule.num_measurements(),
            schedule.max_space()
        );
        Ok(schedule)
    }

    /// Schedules of the topological and the minimized order
    /// Gantree: compare(G, flow) -> SpaceComparison // 비교
    pub fn compare(graph: &OpenGraphState, flow: &FlowLike) -> MbqcResult<SpaceComparison> {
        let topological = Self::schedule(graph, &Self::topological_order(graph, flow)?)?;
        let minimized = Self::schedule(graph, &Self::minimized_space_order(graph, flow)?)?;
        Ok(SpaceComparison {
            topological,
            minimized,
        })
    }

    // ========================================================================
    // Subgraph Sequences
    // ========================================================================

    /// Snapshots of the graph state around each measurement of `order`
    /// Gantree: subgraph_sequences(G, order) -> Vec<OpenGraphState> // 부분 그래프 열
    ///
    /// The first snapshot holds the inputs, then one snapshot per measured
    /// node, then one with the outputs. Qubit indices are register lanes, so
    /// chaining the snapshots with `OpenGraphState::append` rebuilds the
    /// graph.
    pub fn subgraph_sequences(
        graph: &OpenGraphState,
        order: &[Node],
    ) -> MbqcResult<Vec<OpenGraphState>> {
        let mut lanes = Lanes::default();
        let mut subgraphs = Vec::with_capacity(order.len() + 2);

        // Gantree: initial_snapshot() // 입력 스냅샷
        let mut initial = OpenGraphState::new();
        for (&node, &index) in graph.input_node_indices() {
            initial.add_node_with_id(node)?;
            initial.set_input_with_index(node, index)?;
            initial.set_output(node, index)?;
            lanes.occupy(node, index);
        }
        subgraphs.push(initial);

        let mut prepared = graph.input_nodes();
        let mut measured = NodeSet::new();

        // Gantree: measurement_snapshots() // 측정 스냅샷
        for &target in order {
            let neighbors = graph.neighbors(target)?;
            let basis = graph
                .meas_basis(target)
                .ok_or(MbqcError::MissingMeasurementBasis(target))?;
            if measured.contains(&target) {
                return Err(MbqcError::InvalidMeasurementOrder(target));
            }

            let activation: NodeSet = neighbors.difference(&prepared).copied().collect();
            let live_neighbors: NodeSet = neighbors
                .iter()
                .filter(|n| prepared.contains(*n) && !measured.contains(*n))
                .copied()
                .collect();

            let mut subgraph = OpenGraphState::new();
            subgraph.add_node_with_id(target)?;
            let target_lane = lanes.get_or_allocate(target);
            if prepared.contains(&target) {
                subgraph.set_input_with_index(target, target_lane)?;
            }
            subgraph.set_meas_basis(target, basis)?;

            for &node in &live_neighbors {
                let lane = lanes.get_or_allocate(node);
                subgraph.add_node_with_id(node)?;
                subgraph.set_input_with_index(node, lane)?;
                subgraph.set_output(node, lane)?;
                subgraph.add_edge(node, target)?;
            }

            for &node in &activation {
                let lane = lanes.get_or_allocate(node);
                subgraph.add_node_with_id(node)?;
                subgraph.set_output(node, lane)?;
                subgraph.add_edge(node, target)?;
            }

            prepared.insert(target);
            prepared.extend(activation);
            measured.insert(target);
            lanes.release(target);
            subgraphs.push(subgraph);
        }

        // Gantree: final_snapshot() // 출력 스냅샷
        let mut last = OpenGraphState::new();
        for (&node, &index) in graph.output_node_indices() {
            last.add_node_with_id(node)?;
            if prepared.contains(&node) {
                let lane = lanes.get_or_allocate(node);
                last.set_input_with_index(node, lane)?;
            }
            last.set_output(node, index)?;
        }
        for (a, b) in graph.edges() {
            if graph.is_output(a) && graph.is_output(b) {
                last.add_edge(a, b)?;
            }
        }
        subgraphs.push(last);

        Ok(subgraphs)
    }
}

// ============================================================================
// Register Lanes
// ============================================================================

/// Live node → register lane; a released lane is reused by the next node
#[derive(Debug, Default)]
struct Lanes {
    by_node: BTreeMap<Node, usize>,
}

impl Lanes {
    fn occupy(&mut self, node: Node, lane: usize) {
        self.by_node.insert(node, lane);
    }

    fn get_or_allocate(&mut self, node: Node) -> usize {
        if let Some(&lane) = self.by_node.get(&node) {
            return lane;
        }
        let used: BTreeSet<usize> = self.by_node.values().copied().collect();
        let lane = (0..=used.len())
            .find(|l| !used.contains(l))
            .unwrap_or(used.len());
        self.by_node.insert(node, lane);
        lane
    }

    fn release(&mut self, node: Node) {
        self.by_node.remove(&node);
    }
}

// ============================================================================
// Space Comparison
// ============================================================================

/// Topological vs. minimized schedule of the same graph
/// Gantree: SpaceComparison // 공간 비교
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpaceComparison {
    /// Schedule of the plain topological order
    pub topological: MeasSchedule,
    /// Schedule of the greedy minimized order
    pub minimized: MeasSchedule,
}

impl SpaceComparison {
    /// Qubits saved at the peak (negative when the greedy order is worse)
    pub fn space_saving(&self) -> i64 {
        self.topological.max_space() as i64 - self.minimized.max_space() as i64
    }
}

impl fmt::Display for SpaceComparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "SpaceComparison:")?;
        writeln!(f, "  Topological max space: {}", self.topological.max_space())?;
        writeln!(f, "  Minimized max space: {}", self.minimized.max_space())?;
        writeln!(f, "  Saving: {}", self.space_saving())?;
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use mbqc_core::{MeasBasis, Plane};

    /// Path graph 0 - ... - (n-1), input 0, output n-1, causal flow i -> i+1
    fn line_graph(n: usize) -> (OpenGraphState, FlowLike) {
        let mut graph = OpenGraphState::new();
        for _ in 0..n {
            graph.add_node();
        }
        for i in 1..n {
            graph.add_edge(i - 1, i).unwrap();
        }
        graph.set_input(0).unwrap();
        graph.set_output(n - 1, 0).unwrap();
        for i in 0..n - 1 {
            graph
                .set_meas_basis(i, MeasBasis::planar(Plane::XY, 0.5 * i as f64))
                .unwrap();
        }
        let flow = (0..n - 1).map(|i| (i, NodeSet::from([i + 1]))).collect();
        (graph, flow)
    }

    /// Star: centre 0 joined to leaves 1..=k, no inputs, no outputs, empty flow images
    fn star_graph(k: usize) -> (OpenGraphState, FlowLike) {
        let mut graph = OpenGraphState::new();
        let centre = graph.add_node();
        for _ in 0..k {
            let leaf = graph.add_node();
            graph.add_edge(centre, leaf).unwrap();
        }
        for n in graph.node_set() {
            graph.set_meas_basis(n, MeasBasis::default()).unwrap();
        }
        let flow = graph.nodes().map(|n| (n, NodeSet::new())).collect();
        (graph, flow)
    }

    #[test]
    fn test_minimized_order_line() {
        let (graph, flow) = line_graph(5);
        let order = SpaceScheduler::minimized_space_order(&graph, &flow).unwrap();
        assert_eq!(order, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_minimized_order_respects_dag() {
        let (graph, flow) = line_graph(8);
        let order = SpaceScheduler::minimized_space_order(&graph, &flow).unwrap();
        let dag = construct_dag(&flow, &graph).unwrap();
        assert!(dag.respects(&order));
        assert_eq!(order.len(), 7);
    }

    #[test]
    fn test_minimized_order_prefers_cheap_nodes() {
        // With no dependencies a leaf costs 1 and the centre costs k
        let (graph, flow) = star_graph(4);
        let order = SpaceScheduler::minimized_space_order(&graph, &flow).unwrap();
        assert_eq!(order[0], 1);
        assert_eq!(order.len(), 5);

        let topo = SpaceScheduler::schedule(&graph, &[0, 1, 2, 3, 4]).unwrap();
        let greedy = SpaceScheduler::schedule(&graph, &order).unwrap();
        assert!(greedy.max_space() <= topo.max_space());
    }

    #[test]
    fn test_cyclic_flow() {
        let mut graph = OpenGraphState::new();
        graph.add_node();
        graph.add_node();
        graph.add_edge(0, 1).unwrap();
        let flow = FlowLike::from([(0, NodeSet::from([1])), (1, NodeSet::from([0]))]);
        let err = SpaceScheduler::minimized_space_order(&graph, &flow).unwrap_err();
        assert!(matches!(err, MbqcError::CyclicFlow { ordered: 0, total: 2 }));
        assert!(SpaceScheduler::topological_order(&graph, &flow).is_err());
    }

    #[test]
    fn test_topological_order_skips_outputs() {
        let (graph, flow) = line_graph(4);
        assert_eq!(
            SpaceScheduler::topological_order(&graph, &flow).unwrap(),
            vec![0, 1, 2]
        );
    }

    #[test]
    fn test_schedule_line() {
        let (graph, flow) = line_graph(4);
        let order = SpaceScheduler::topological_order(&graph, &flow).unwrap();
        let schedule = SpaceScheduler::schedule(&graph, &order).unwrap();
        assert_eq!(schedule.space_profile(), vec![1, 2, 2, 2, 1]);
        assert_eq!(schedule.max_space(), 2);
        assert!(schedule.trailing_outputs().is_empty());
    }

    #[test]
    fn test_schedule_rejects_bad_order() {
        let (graph, _) = line_graph(3);
        assert_eq!(
            SpaceScheduler::schedule(&graph, &[0, 0]),
            Err(MbqcError::InvalidMeasurementOrder(0))
        );
        assert_eq!(
            SpaceScheduler::schedule(&graph, &[2]),
            Err(MbqcError::InvalidMeasurementOrder(2))
        );
        assert_eq!(
            SpaceScheduler::schedule(&graph, &[9]),
            Err(MbqcError::InvalidNode(9))
        );
    }

    #[test]
    fn test_compare() {
        let (graph, flow) = star_graph(3);
        let comparison = SpaceScheduler::compare(&graph, &flow).unwrap();
        assert!(comparison.space_saving() >= 0);
        assert!(comparison.to_string().contains("Minimized max space"));
    }

    #[test]
    fn test_subgraph_sequences_line() {
        let (graph, flow) = line_graph(3);
        let order = SpaceScheduler::topological_order(&graph, &flow).unwrap();
        let subgraphs = SpaceScheduler::subgraph_sequences(&graph, &order).unwrap();
        assert_eq!(subgraphs.len(), order.len() + 2);

        let initial = &subgraphs[0];
        assert_eq!(initial.input_nodes(), NodeSet::from([0]));
        assert_eq!(initial.output_nodes(), NodeSet::from([0]));

        // measuring 0 prepares 1 on a fresh lane
        let first = &subgraphs[1];
        assert_eq!(first.input_node_indices().get(&0), Some(&0));
        assert_eq!(first.output_node_indices().get(&1), Some(&1));
        assert!(first.has_edge(0, 1));
        assert_eq!(first.meas_basis(0), graph.meas_basis(0));

        // measuring 1 reuses lane 0 for node 2
        let second = &subgraphs[2];
        assert_eq!(second.input_node_indices().get(&1), Some(&1));
        assert_eq!(second.output_node_indices().get(&2), Some(&0));

        let last = subgraphs.last().unwrap();
        assert_eq!(last.input_node_indices().get(&2), Some(&0));
        assert_eq!(last.output_node_indices().get(&2), Some(&0));
    }

    #[test]
    fn test_subgraph_edges_partition_graph() {
        let (graph, flow) = star_graph(5);
        let order = SpaceScheduler::minimized_space_order(&graph, &flow).unwrap();
        let subgraphs = SpaceScheduler::subgraph_sequences(&graph, &order).unwrap();
        let total: usize = subgraphs.iter().map(|g| g.num_edges()).sum();
        assert_eq!(total, graph.num_edges());
    }

    #[test]
    fn test_subgraph_sequences_rebuild_graph() {
        let (graph, flow) = line_graph(6);
        let order = SpaceScheduler::minimized_space_order(&graph, &flow).unwrap();
        let subgraphs = SpaceScheduler::subgraph_sequences(&graph, &order).unwrap();

        let mut rebuilt = subgraphs[0].clone();
        for subgraph in &subgraphs[1..] {
            rebuilt.append(subgraph).unwrap();
        }
        assert_eq!(rebuilt.node_set(), graph.node_set());
        assert_eq!(rebuilt.edges(), graph.edges());
        assert_eq!(rebuilt.input_node_indices(), graph.input_node_indices());
        assert_eq!(rebuilt.output_node_indices(), graph.output_node_indices());
        assert_eq!(rebuilt.meas_bases(), graph.meas_bases());
    }

    #[test]
    fn test_subgraph_sequences_missing_basis() {
        let mut graph = OpenGraphState::new();
        graph.add_node();
        assert_eq!(
            SpaceScheduler::subgraph_sequences(&graph, &[0]),
            Err(MbqcError::MissingMeasurementBasis(0))
        );
        assert_eq!(
            SpaceScheduler::subgraph_sequences(&graph, &[3]),
            Err(MbqcError::InvalidNode(3))
        );
    }

    #[test]
    fn test_lanes_reuse_lowest_free() {
        let mut lanes = Lanes::default();
        lanes.occupy(10, 0);
        assert_eq!(lanes.get_or_allocate(11), 1);
        assert_eq!(lanes.get_or_allocate(12), 2);
        lanes.release(10);
        assert_eq!(lanes.get_or_allocate(13), 0);
        assert_eq!(lanes.get_or_allocate(11), 1);
    }
}
