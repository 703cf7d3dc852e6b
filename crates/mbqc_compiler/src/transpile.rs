//! Flow-to-pattern compilation
//!
//! Gantree: L4_Compilation → Transpile
//!
//! Derives byproduct-correction domains from a flow and emits the command
//! sequence of an open graph, either standardized or just in time along a
//! chosen measurement order. Subgraph decompositions are compiled piecewise
//! and composed.

use log::debug;
use mbqc_core::{
    construct_dag, generate_corrections, Command, Corrections, FlowLike, MbqcError, MbqcResult,
    MeasBasis, Node, NodeSet, OpenGraphState, Pattern, PatternLike, Plane,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Node → measurement basis
pub type MeasBases = BTreeMap<Node, MeasBasis>;

// ============================================================================
// Command Layout
// ============================================================================

/// Placement of preparation and entanglement commands
/// Gantree: CommandLayout // Standard | JustInTime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CommandLayout {
    /// All `N`, then all `E`, then `M`, then corrections
    #[default]
    Standard,
    /// Prepare and entangle each node right before its first use
    JustInTime,
}

impl fmt::Display for CommandLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandLayout::Standard => write!(f, "standard"),
            CommandLayout::JustInTime => write!(f, "just-in-time"),
        }
    }
}

// ============================================================================
// Entry Points
// ============================================================================

/// Compile an open graph and its flow into a standardized pattern
/// Gantree: transpile(G, I, O, flow, bases) -> Pattern // 표준 패턴 컴파일
///
/// Non-output nodes are measured in the topological order of the flow's
/// dependency DAG.
pub fn transpile(
    graph: &OpenGraphState,
    input_nodes: &NodeSet,
    output_nodes: &NodeSet,
    flow: &FlowLike,
    meas_bases: &MeasBases,
) -> MbqcResult<Pattern> {
    let order: Vec<Node> = construct_dag(flow, graph)?
        .topological_order()?
        .into_iter()
        .filter(|n| !output_nodes.contains(n))
        .collect();
    let compilation = Compilation::prepare(graph, input_nodes, output_nodes, flow, meas_bases)?;
    compilation.emit(&order, CommandLayout::Standard)
}

/// Compile along an explicit measurement order
/// Gantree: transpile_with_order(G, I, O, flow, bases, order, layout) -> Pattern // 순서 지정 컴파일
///
/// `order` must list every non-output node once and respect the dependency
/// DAG; the first offending node is reported as `InvalidMeasurementOrder`.
pub fn transpile_with_order(
    graph: &OpenGraphState,
    input_nodes: &NodeSet,
    output_nodes: &NodeSet,
    flow: &FlowLike,
    meas_bases: &MeasBases,
    order: &[Node],
    layout: CommandLayout,
) -> MbqcResult<Pattern> {
    let compilation = Compilation::prepare(graph, input_nodes, output_nodes, flow, meas_bases)?;
    validate_order(graph, output_nodes, flow, order)?;
    compilation.emit(order, layout)
}

/// Compile a subgraph decomposition piece by piece and compose the results
/// Gantree: transpile_from_subgraphs(subs, I, O, flow, bases) -> Pattern // 부분 그래프 컴파일
///
/// Each subgraph is compiled with its own boundary, the flow restricted to
/// its non-output nodes (and their images to its nodes), and the bases of its
/// non-output nodes. The composite must end up with exactly `input_nodes`
/// and `output_nodes` as its boundary.
pub fn transpile_from_subgraphs(
    subgraphs: &[OpenGraphState],
    input_nodes: &NodeSet,
    output_nodes: &NodeSet,
    flow: &FlowLike,
    meas_bases: &MeasBases,
) -> MbqcResult<Pattern> {
    let Some((first, rest)) = subgraphs.split_first() else {
        return Ok(Pattern::with_inputs(input_nodes.clone()));
    };

    let mut composed = transpile_subgraph(first, flow, meas_bases)?;
    for subgraph in rest {
        let pattern = transpile_subgraph(subgraph, flow, meas_bases)?;
        composed = composed.append_pattern(&pattern)?;
    }

    if composed.input_nodes() != input_nodes {
        return Err(MbqcError::boundary(format!(
            "composite inputs {:?} differ from {:?}",
            composed.input_nodes(),
            input_nodes
        )));
    }
    if composed.output_nodes() != output_nodes {
        return Err(MbqcError::boundary(format!(
            "composite outputs {:?} differ from {:?}",
            composed.output_nodes(),
            output_nodes
        )));
    }

    debug!(
        "composed {} subgraphs into {} commands",
        subgraphs.len(),
        composed.len()
    );
    Ok(composed)
}

fn transpile_subgraph(
    subgraph: &OpenGraphState,
    flow: &FlowLike,
    meas_bases: &MeasBases,
) -> MbqcResult<Pattern> {
    let nodes = subgraph.node_set();
    let outputs = subgraph.output_nodes();
    let measured = |n: &Node| nodes.contains(n) && !outputs.contains(n);

    let sub_flow: FlowLike = flow
        .iter()
        .filter(|&(n, _)| measured(n))
        .map(|(&n, targets)| (n, targets.intersection(&nodes).copied().collect()))
        .collect();
    let sub_bases: MeasBases = meas_bases
        .iter()
        .filter(|&(n, _)| measured(n))
        .map(|(&n, &b)| (n, b))
        .collect();

    transpile(
        subgraph,
        &subgraph.input_nodes(),
        &outputs,
        &sub_flow,
        &sub_bases,
    )
}

// ============================================================================
// Measurement Domains
// ============================================================================

/// Measurement command with s/t domains chosen by plane
/// Gantree: measurement(node, basis, x, z) -> Command // 측정 도메인
///
/// XY: s = x, t = z. XZ: s = x ∪ z, t = x. YZ: s = z, t = x.
pub fn measurement_command(
    node: Node,
    basis: &MeasBasis,
    x_corrections: &Corrections,
    z_corrections: &Corrections,
) -> Command {
    let x = x_corrections.get(&node).cloned().unwrap_or_default();
    let z = z_corrections.get(&node).cloned().unwrap_or_default();
    let plane = basis.plane();
    let (s_domain, t_domain) = match plane {
        Plane::XY => (x, z),
        Plane::XZ => (x.union(&z).copied().collect(), x),
        Plane::YZ => (z, x),
    };
    Command::M {
        node,
        plane,
        angle: basis.angle(),
        s_domain,
        t_domain,
    }
}

// ============================================================================
// Compilation State
// ============================================================================

/// Validated inputs of one compilation
struct Compilation<'a> {
    graph: &'a OpenGraphState,
    input_nodes: &'a NodeSet,
    output_nodes: &'a NodeSet,
    meas_bases: &'a MeasBases,
    x_corrections: Corrections,
    z_corrections: Corrections,
}

impl<'a> Compilation<'a> {
    fn prepare(
        graph: &'a OpenGraphState,
        input_nodes: &'a NodeSet,
        output_nodes: &'a NodeSet,
        flow: &FlowLike,
        meas_bases: &'a MeasBases,
    ) -> MbqcResult<Self> {
        for &node in input_nodes.iter().chain(output_nodes) {
            graph.ensure_node_exists(node)?;
        }
        for node in graph.nodes() {
            if !output_nodes.contains(&node) && !meas_bases.contains_key(&node) {
                return Err(MbqcError::MissingMeasurementBasis(node));
            }
        }
        let (x_corrections, z_corrections) = generate_corrections(graph, flow)?;
        Ok(Self {
            graph,
            input_nodes,
            output_nodes,
            meas_bases,
            x_corrections,
            z_corrections,
        })
    }

    fn emit(&self, order: &[Node], layout: CommandLayout) -> MbqcResult<Pattern> {
        let mut pattern = Pattern::with_q_indices(self.input_nodes.clone(), self.q_indices());
        for &node in self.output_nodes.difference(self.input_nodes) {
            if let Some(index) = self.graph.q_index(node) {
                pattern.assign_q_index(node, index);
            }
        }

        match layout {
            CommandLayout::Standard => self.emit_standard(&mut pattern, order)?,
            CommandLayout::JustInTime => self.emit_just_in_time(&mut pattern, order)?,
        }

        for &node in self.output_nodes {
            let domain = self.x_corrections.get(&node).cloned().unwrap_or_default();
            pattern.add(Command::x(node, domain))?;
        }
        for &node in self.output_nodes {
            let domain = self.z_corrections.get(&node).cloned().unwrap_or_default();
            pattern.add(Command::z(node, domain))?;
        }

        pattern.mark_runnable();
        debug!(
            "transpiled {} nodes / {} edges into {} commands ({} layout)",
            self.graph.num_nodes(),
            self.graph.num_edges(),
            pattern.len(),
            layout
        );
        Ok(pattern)
    }

    /// Input qubit indices: declared index, else position among the inputs
    fn q_indices(&self) -> BTreeMap<Node, usize> {
        self.input_nodes
            .iter()
            .enumerate()
            .map(|(i, &node)| {
                let index = self.graph.input_node_indices().get(&node).copied();
                (node, index.unwrap_or(i))
            })
            .collect()
    }

    fn emit_standard(&self, pattern: &mut Pattern, order: &[Node]) -> MbqcResult<()> {
        // Gantree: prepare_internal() // 내부 노드 준비
        for node in self.graph.nodes() {
            if !self.input_nodes.contains(&node) && !self.output_nodes.contains(&node) {
                pattern.add(Command::n(node))?;
            }
        }
        for &node in self.output_nodes.difference(self.input_nodes) {
            pattern.add(Command::n(node))?;
        }

        // Gantree: entangle() // 얽힘
        for (a, b) in self.graph.edges() {
            pattern.add(Command::e(a, b))?;
        }

        // Gantree: measure() // 측정
        for &node in order {
            pattern.add(self.measure(node)?)?;
        }
        Ok(())
    }

    fn emit_just_in_time(&self, pattern: &mut Pattern, order: &[Node]) -> MbqcResult<()> {
        let mut prepared = self.input_nodes.clone();
        let mut entangled: BTreeSet<(Node, Node)> = BTreeSet::new();

        for &target in order {
            let neighbors = self.graph.neighbors(target)?;
            for &node in std::iter::once(&target).chain(neighbors) {
                if prepared.insert(node) {
                    pattern.add(Command::n(node))?;
                }
            }
            for &neighbor in neighbors {
                let edge = (target.min(neighbor), target.max(neighbor));
                if entangled.insert(edge) {
                    pattern.add(Command::e(edge.0, edge.1))?;
                }
            }
            pattern.add(self.measure(target)?)?;
        }

        for &node in self.output_nodes {
            if prepared.insert(node) {
                pattern.add(Command::n(node))?;
            }
        }
        for edge in self.graph.edges() {
            if entangled.insert(edge) {
                pattern.add(Command::e(edge.0, edge.1))?;
            }
        }
        Ok(())
    }

    fn measure(&self, node: Node) -> MbqcResult<Command> {
        let basis = self
            .meas_bases
            .get(&node)
            .ok_or(MbqcError::MissingMeasurementBasis(node))?;
        Ok(measurement_command(
            node,
            basis,
            &self.x_corrections,
            &self.z_corrections,
        ))
    }
}

// ============================================================================
// Order Validation
// ============================================================================

/// Check that `order` is a linearization of the DAG over the non-output nodes
fn validate_order(
    graph: &OpenGraphState,
    output_nodes: &NodeSet,
    flow: &FlowLike,
    order: &[Node],
) -> MbqcResult<()> {
    let parents = construct_dag(flow, graph)?.inverted();
    let mut measured = NodeSet::new();

    for &node in order {
        if !graph.contains_node(node) || output_nodes.contains(&node) || measured.contains(&node) {
            return Err(MbqcError::InvalidMeasurementOrder(node));
        }
        let blocked = parents.get(&node).map_or(false, |p| {
            p.iter()
                .any(|parent| !output_nodes.contains(parent) && !measured.contains(parent))
        });
        if blocked {
            return Err(MbqcError::InvalidMeasurementOrder(node));
        }
        measured.insert(node);
    }

    if let Some(missing) = graph
        .nodes()
        .find(|n| !output_nodes.contains(n) && !measured.contains(n))
    {
        return Err(MbqcError::InvalidMeasurementOrder(missing));
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
