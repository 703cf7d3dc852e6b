//! Measurement schedule for MBQC
//!
//! Gantree: L3_Scheduling → MeasSchedule
//!
//! Space profile of a measurement order executed just in time: before each
//! measurement the target and its unprepared neighbours are prepared, and the
//! target is released right after it is measured.

use mbqc_core::{Node, NodeSet};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// MeasStep
// ============================================================================

/// One measurement in a schedule
/// Gantree: MeasStep // 측정 단계
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeasStep {
    /// Measured node
    pub target: Node,

    /// Nodes prepared right before this measurement (target included if new)
    /// Gantree: activated: Set<Node> // 새로 준비된 노드
    pub activated: NodeSet,

    /// Live qubits before the preparations
    pub live_before: usize,
}

impl MeasStep {
    /// Live qubits at the moment of measurement
    pub fn peak(&self) -> usize {
        self.live_before + self.activated.len()
    }

    /// Live qubits after the target is released
    pub fn live_after(&self) -> usize {
        self.peak().saturating_sub(1)
    }
}

// ============================================================================
// MeasSchedule
// ============================================================================

/// Measurement order with its live-qubit profile
/// Gantree: MeasSchedule // 측정 스케줄
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeasSchedule {
    /// Steps in measurement order
    /// Gantree: steps: Vec<MeasStep> // 단계 목록
    steps: Vec<MeasStep>,

    /// Live qubits before the first measurement (the inputs)
    initial_space: usize,

    /// Output nodes still unprepared after the last measurement
    trailing_outputs: NodeSet,
}

impl MeasSchedule {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Create a schedule
    pub fn new(steps: Vec<MeasStep>, initial_space: usize, trailing_outputs: NodeSet) -> Self {
        Self {
            steps,
            initial_space,
            trailing_outputs,
        }
    }

    /// Schedule with no measurements
    pub fn empty(initial_space: usize) -> Self {
        Self::new(Vec::new(), initial_space, NodeSet::new())
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Scheduled steps
    pub fn steps(&self) -> &[MeasStep] {
        &self.steps
    }

    /// Measurement order
    pub fn order(&self) -> Vec<Node> {
        self.steps.iter().map(|s| s.target).collect()
    }

    /// Number of measurements
    pub fn num_measurements(&self) -> usize {
        self.steps.len()
    }

    /// Live qubits before the first measurement
    pub fn initial_space(&self) -> usize {
        self.initial_space
    }

    /// Outputs prepared after the last measurement
    pub fn trailing_outputs(&self) -> &NodeSet {
        &self.trailing_outputs
    }

    /// Live qubits once every measurement is done and all outputs exist
    pub fn final_space(&self) -> usize {
        let live = self
            .steps
            .last()
            .map_or(self.initial_space, |s| s.live_after());
        live + self.trailing_outputs.len()
    }

    // ========================================================================
    // Space Analysis
    // ========================================================================

    /// Initial space, the peak of every step, then the final space
    /// Gantree: space_profile() -> Vec<usize> // 공간 추이
    pub fn space_profile(&self) -> Vec<usize> {
        let mut profile = Vec::with_capacity(self.steps.len() + 2);
        profile.push(self.initial_space);
        profile.extend(self.steps.iter().map(|s| s.peak()));
        profile.push(self.final_space());
        profile
    }

    /// Peak number of live qubits
    /// Gantree: max_space() -> usize // 최대 공간
    pub fn max_space(&self) -> usize {
        self.space_profile().into_iter().max().unwrap_or(0)
    }

    /// First step reaching the peak
    pub fn peak_step(&self) -> Option<&MeasStep> {
        let max = self.max_space();
        self.steps.iter().find(|s| s.peak() == max)
    }

    /// Mean of the step peaks
    pub fn mean_space(&self) -> f64 {
        if self.steps.is_empty() {
            return self.initial_space as f64;
        }
        let total: usize = self.steps.iter().map(|s| s.peak()).sum();
        total as f64 / self.steps.len() as f64
    }
}

impl fmt::Display for MeasSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "MeasSchedule:")?;
        writeln!(f, "  Measurements: {}", self.steps.len())?;
        writeln!(f, "  Initial space: {}", self.initial_space)?;
        writeln!(f, "  Max space: {}", self.max_space())?;
        writeln!(f, "  Mean space: {:.2}", self.mean_space())?;
        writeln!(f, "  Final space: {}", self.final_space())?;
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
