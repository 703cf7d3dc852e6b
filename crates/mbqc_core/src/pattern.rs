//! MBQC pattern structure
//!
//! Gantree: L1_Pattern → Pattern
//!
//! `Pattern` is the mutable builder that tracks the live node set while
//! commands are added; `FrozenPattern` is the immutable snapshot handed to
//! consumers. Both expose the read side through `PatternLike`.

use crate::command::{Command, CommandKind};
use crate::error::{MbqcError, MbqcResult};
use crate::types::{Angle, Node, NodeSet, Plane};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::ops::Index;

// ============================================================================
// PatternLike
// ============================================================================

/// Read access shared by mutable and frozen patterns
/// Gantree: PatternLike // trait
pub trait PatternLike {
    /// Command sequence
    fn commands(&self) -> &[Command];

    /// Input nodes (live before the first command)
    fn input_nodes(&self) -> &NodeSet;

    /// Nodes still live after the last command
    fn output_nodes(&self) -> &NodeSet;

    /// Node → qubit index
    fn q_indices(&self) -> &BTreeMap<Node, usize>;

    /// Runnability attestation
    fn is_runnable(&self) -> bool;

    /// Determinism attestation
    fn is_deterministic(&self) -> bool;

    /// Number of commands
    fn len(&self) -> usize {
        self.commands().len()
    }

    /// Check if pattern has no commands
    fn is_empty(&self) -> bool {
        self.commands().is_empty()
    }

    /// Inputs plus every node with an `N` command
    fn nodes(&self) -> NodeSet {
        let mut nodes = self.input_nodes().clone();
        nodes.extend(self.commands().iter().filter_map(|cmd| match cmd {
            Command::N { node } => Some(*node),
            _ => None,
        }));
        nodes
    }

    /// Live-qubit count after the inputs and after every `N` / `M`
    /// Gantree: space_list() -> Vec<usize> // 공간 추이
    fn space_list(&self) -> Vec<usize> {
        let mut live = self.input_nodes().len();
        let mut list = vec![live];
        for cmd in self.commands() {
            match cmd {
                Command::N { .. } => live += 1,
                Command::M { .. } => live = live.saturating_sub(1),
                _ => continue,
            }
            list.push(live);
        }
        list
    }

    /// Peak number of live qubits
    /// Gantree: calc_max_space() -> usize // 최대 공간
    fn calc_max_space(&self) -> usize {
        self.space_list().into_iter().max().unwrap_or(0)
    }

    /// Measurement plane of every measured node
    fn meas_planes(&self) -> BTreeMap<Node, Plane> {
        self.commands()
            .iter()
            .filter_map(|cmd| match cmd {
                Command::M { node, plane, .. } => Some((*node, *plane)),
                _ => None,
            })
            .collect()
    }

    /// Measurement angle of every measured node
    fn meas_angles(&self) -> BTreeMap<Node, Angle> {
        self.commands()
            .iter()
            .filter_map(|cmd| match cmd {
                Command::M { node, angle, .. } => Some((*node, *angle)),
                _ => None,
            })
            .collect()
    }
}

// ============================================================================
// Pattern (builder)
// ============================================================================

/// Mutable pattern
/// Gantree: Pattern // 패턴 빌더
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pattern {
    /// Input nodes
    input_nodes: NodeSet,

    /// Live nodes (inputs, plus prepared, minus measured)
    /// Gantree: output_nodes: Set<Node> // 살아있는 노드
    output_nodes: NodeSet,

    /// Node → qubit index
    q_indices: BTreeMap<Node, usize>,

    /// Command sequence
    /// Gantree: commands: Vec<Command> // 명령 목록
    commands: Vec<Command>,

    runnable: bool,
    deterministic: bool,
}

impl Pattern {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Create an empty pattern with no inputs
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty pattern over `inputs`, indexed in ascending order
    /// Gantree: with_inputs(inputs) -> Self // 입력 지정 생성자
    pub fn with_inputs(input_nodes: NodeSet) -> Self {
        let q_indices = input_nodes.iter().enumerate().map(|(i, &n)| (n, i)).collect();
        Self::with_q_indices(input_nodes, q_indices)
    }

    /// Create an empty pattern over `inputs` with explicit qubit indices
    pub fn with_q_indices(input_nodes: NodeSet, q_indices: BTreeMap<Node, usize>) -> Self {
        Self {
            output_nodes: input_nodes.clone(),
            input_nodes,
            q_indices,
            commands: Vec::new(),
            runnable: false,
            deterministic: false,
        }
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Append a command
    /// Gantree: add(cmd) -> Result // 명령 추가
    pub fn add(&mut self, cmd: Command) -> MbqcResult<()> {
        match &cmd {
            Command::N { node } => {
                if self.output_nodes.contains(node) {
                    return Err(MbqcError::NodeAlreadyPrepared(*node));
                }
                self.output_nodes.insert(*node);
            }
            Command::M { node, .. } => {
                self.output_nodes.remove(node);
            }
            _ => {}
        }
        self.commands.push(cmd);
        self.runnable = false;
        self.deterministic = false;
        Ok(())
    }

    /// Append commands in order, stopping at the first error
    pub fn extend(&mut self, cmds: impl IntoIterator<Item = Command>) -> MbqcResult<()> {
        for cmd in cmds {
            self.add(cmd)?;
        }
        Ok(())
    }

    /// Drop all commands, keeping the inputs
    pub fn clear(&mut self) {
        self.commands.clear();
        self.output_nodes = self.input_nodes.clone();
        self.runnable = false;
        self.deterministic = false;
    }

    /// Replace the command sequence (and optionally the inputs)
    pub fn replace(
        &mut self,
        cmds: impl IntoIterator<Item = Command>,
        input_nodes: Option<NodeSet>,
    ) -> MbqcResult<()> {
        if let Some(inputs) = input_nodes {
            self.input_nodes = inputs;
        }
        self.clear();
        self.extend(cmds)
    }

    /// Record the qubit index of a node
    pub fn assign_q_index(&mut self, node: Node, index: usize) {
        self.q_indices.insert(node, index);
        self.runnable = false;
        self.deterministic = false;
    }

    /// Attest that the pattern is runnable
    pub fn mark_runnable(&mut self) {
        self.runnable = true;
    }

    /// Attest that the pattern is deterministic
    pub fn mark_deterministic(&mut self) {
        self.deterministic = true;
    }

    // ========================================================================
    // Composition
    // ========================================================================

    /// Compose `other` after this pattern
    /// Gantree: append_pattern(other) -> Result<Pattern> // 패턴 합성
    ///
    /// Shared nodes must be exactly this pattern's outputs that are inputs
    /// of `other`, and their qubit indices must agree where both sides
    /// record one.
    pub fn append_pattern(&self, other: &impl PatternLike) -> MbqcResult<Pattern> {
        let common: NodeSet = self.nodes().intersection(&other.nodes()).copied().collect();
        let border: NodeSet = self
            .output_nodes
            .intersection(other.input_nodes())
            .copied()
            .collect();

        if common != border {
            return Err(MbqcError::boundary(format!(
                "shared nodes {:?} differ from boundary nodes {:?}",
                common, border
            )));
        }

        for node in &border {
            if let (Some(ours), Some(theirs)) =
                (self.q_indices.get(node), other.q_indices().get(node))
            {
                if ours != theirs {
                    return Err(MbqcError::boundary(format!(
                        "qubit index mismatch on node {}: {} vs {}",
                        node, ours, theirs
                    )));
                }
            }
        }

        let mut input_nodes = self.input_nodes.clone();
        input_nodes.extend(other.input_nodes().difference(&common).copied());

        let mut q_indices = self.q_indices.clone();
        for (&node, &index) in other.q_indices() {
            q_indices.entry(node).or_insert(index);
        }

        let mut composed = Pattern::with_q_indices(input_nodes, q_indices);
        composed.extend(self.commands.iter().cloned())?;
        composed.extend(other.commands().iter().cloned())?;

        if self.runnable && other.is_runnable() {
            composed.mark_runnable();
        }
        if self.deterministic && other.is_deterministic() {
            composed.mark_deterministic();
        }
        Ok(composed)
    }

    /// Immutable snapshot
    /// Gantree: freeze() -> FrozenPattern // 동결
    pub fn freeze(&self) -> FrozenPattern {
        FrozenPattern {
            input_nodes: self.input_nodes.clone(),
            output_nodes: self.output_nodes.clone(),
            q_indices: self.q_indices.clone(),
            commands: self.commands.clone(),
            runnable: self.runnable,
            deterministic: self.deterministic,
        }
    }

    /// Iterate over commands
    pub fn iter(&self) -> std::slice::Iter<'_, Command> {
        self.commands.iter()
    }
}

impl PatternLike for Pattern {
    fn commands(&self) -> &[Command] {
        &self.commands
    }

    fn input_nodes(&self) -> &NodeSet {
        &self.input_nodes
    }

    fn output_nodes(&self) -> &NodeSet {
        &self.output_nodes
    }

    fn q_indices(&self) -> &BTreeMap<Node, usize> {
        &self.q_indices
    }

    fn is_runnable(&self) -> bool {
        self.runnable
    }

    fn is_deterministic(&self) -> bool {
        self.deterministic
    }
}

impl Index<usize> for Pattern {
    type Output = Command;

    fn index(&self, index: usize) -> &Command {
        &self.commands[index]
    }
}

impl<'a> IntoIterator for &'a Pattern {
    type Item = &'a Command;
    type IntoIter = std::slice::Iter<'a, Command>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.iter()
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_summary(f, "Pattern", self)
    }
}

// ============================================================================
// FrozenPattern
// ============================================================================

/// Immutable pattern snapshot
/// Gantree: FrozenPattern // 동결 패턴
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrozenPattern {
    input_nodes: NodeSet,
    output_nodes: NodeSet,
    q_indices: BTreeMap<Node, usize>,
    commands: Vec<Command>,
    runnable: bool,
    deterministic: bool,
}

impl FrozenPattern {
    /// Serialize to JSON
    pub fn to_json(&self) -> MbqcResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize from JSON
    pub fn from_json(json: &str) -> MbqcResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Iterate over commands
    pub fn iter(&self) -> std::slice::Iter<'_, Command> {
        self.commands.iter()
    }
}

impl PatternLike for FrozenPattern {
    fn commands(&self) -> &[Command] {
        &self.commands
    }

    fn input_nodes(&self) -> &NodeSet {
        &self.input_nodes
    }

    fn output_nodes(&self) -> &NodeSet {
        &self.output_nodes
    }

    fn q_indices(&self) -> &BTreeMap<Node, usize> {
        &self.q_indices
    }

    fn is_runnable(&self) -> bool {
        self.runnable
    }

    fn is_deterministic(&self) -> bool {
        self.deterministic
    }
}

impl Index<usize> for FrozenPattern {
    type Output = Command;

    fn index(&self, index: usize) -> &Command {
        &self.commands[index]
    }
}

impl<'a> IntoIterator for &'a FrozenPattern {
    type Item = &'a Command;
    type IntoIter = std::slice::Iter<'a, Command>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.iter()
    }
}

impl fmt::Display for FrozenPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_summary(f, "FrozenPattern", self)
    }
}

fn write_summary(f: &mut fmt::Formatter<'_>, name: &str, pattern: &impl PatternLike) -> fmt::Result {
    writeln!(f, "{}({} commands)", name, pattern.len())?;
    writeln!(f, "  Inputs: {:?}", pattern.input_nodes())?;
    writeln!(f, "  Outputs: {:?}", pattern.output_nodes())?;
    writeln!(f, "  Max space: {}", pattern.calc_max_space())?;
    Ok(())
}

// ============================================================================
// Free Functions
// ============================================================================

/// Check the N → E → M → X → Z → C ordering
/// Gantree: is_standardized(P) -> bool // 표준형 검사
pub fn is_standardized(pattern: &impl PatternLike) -> bool {
    let mut current = CommandKind::N;
    for cmd in pattern.commands() {
        let kind = cmd.kind();
        if kind < current {
            return false;
        }
        current = kind;
    }
    true
}

/// Render up to `limit` commands, one per line
/// Gantree: format_pattern(P, lim, filter) -> String // 패턴 출력
///
/// With a filter only the listed kinds are rendered and counted.
pub fn format_pattern(
    pattern: &impl PatternLike,
    limit: usize,
    filter: Option<&[CommandKind]>,
) -> String {
    let selected: Vec<&Command> = pattern
        .commands()
        .iter()
        .filter(|cmd| filter.map_or(true, |kinds| kinds.contains(&cmd.kind())))
        .collect();

    let mut out = String::new();
    for cmd in selected.iter().take(limit) {
        out.push_str(&cmd.to_string());
        out.push('\n');
    }
    if selected.len() > limit {
        out.push_str(&format!(
            "{} more commands truncated. Raise the limit to show more\n",
            selected.len() - limit
        ));
    }
    out
}

// ============================================================================
// Tests
// ============================================================================
