//! Staged compilation pipeline for MBQC
//!
//! Gantree: L5_Integration → Compiler
//!
//! Runs order selection, space scheduling and pattern emission for one open
//! graph, keeping each intermediate result.

use crate::config::{CompilerConfig, OrderStrategy};
use crate::transpile::transpile_with_order;
use log::{debug, info, warn};
use mbqc_core::{FlowLike, MbqcError, MbqcResult, Node, OpenGraphState, Pattern, PatternLike};
use mbqc_schedule::{MeasSchedule, SpaceScheduler};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Compiler stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompilerStage {
    /// Nothing computed
    Initial,
    /// Measurement order chosen
    Ordered,
    /// Space profile computed
    Scheduled,
    /// Pattern emitted
    Compiled,
}

/// Intermediate results of a compilation
#[derive(Debug, Clone)]
pub struct CompilerState {
    /// Current stage
    pub stage: CompilerStage,

    /// Configuration
    pub config: CompilerConfig,

    /// Measurement order
    pub order: Option<Vec<Node>>,

    /// Space profile of the order
    pub schedule: Option<MeasSchedule>,

    /// Emitted pattern
    pub pattern: Option<Pattern>,
}

impl CompilerState {
    /// Create empty state
    pub fn new(config: CompilerConfig) -> Self {
        Self {
            stage: CompilerStage::Initial,
            config,
            order: None,
            schedule: None,
            pattern: None,
        }
    }

    /// Check if ordered
    pub fn is_ordered(&self) -> bool {
        self.order.is_some()
    }

    /// Check if scheduled
    pub fn is_scheduled(&self) -> bool {
        self.schedule.is_some()
    }

    /// Check if compiled
    pub fn is_compiled(&self) -> bool {
        self.pattern.is_some()
    }
}

/// Result of a full compilation
/// Gantree: CompileOutput // 컴파일 결과
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompileOutput {
    /// Emitted pattern
    pub pattern: Pattern,

    /// Measurement order used
    pub order: Vec<Node>,

    /// Just-in-time space profile of the order
    pub schedule: MeasSchedule,
}

impl CompileOutput {
    /// Max space of the emitted pattern
    pub fn max_space(&self) -> usize {
        self.pattern.calc_max_space()
    }

    /// Max space predicted by the scheduler
    pub fn predicted_space(&self) -> usize {
        self.schedule.max_space()
    }
}

impl fmt::Display for CompileOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "CompileOutput:")?;
        writeln!(f, "  Commands: {}", self.pattern.len())?;
        writeln!(f, "  Measurements: {}", self.order.len())?;
        writeln!(f, "  Max space: {}", self.max_space())?;
        writeln!(f, "  Predicted space: {}", self.predicted_space())?;
        Ok(())
    }
}

/// Staged MBQC compiler
/// Gantree: Compiler // 단계별 컴파일
///
/// Stages run against the graph and flow they are given; call `reset`
/// before switching to another graph, or use `compile`, which resets.
pub struct Compiler {
    /// Current state
    state: CompilerState,

    /// Summary at info level
    verbose: bool,
}

impl Compiler {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Create compiler with configuration
    pub fn new(config: CompilerConfig) -> Self {
        let verbose = config.verbose;
        Self {
            state: CompilerState::new(config),
            verbose,
        }
    }

    /// Standard configuration
    pub fn standard() -> Self {
        Self::new(CompilerConfig::standard())
    }

    /// Space-optimized configuration
    pub fn space_optimized() -> Self {
        Self::new(CompilerConfig::space_optimized())
    }

    // ========================================================================
    // Stage Accessors
    // ========================================================================

    /// Get current stage
    pub fn stage(&self) -> CompilerStage {
        self.state.stage
    }

    /// Get current state
    pub fn state(&self) -> &CompilerState {
        &self.state
    }

    /// Get configuration
    pub fn config(&self) -> &CompilerConfig {
        &self.state.config
    }

    // ========================================================================
    // Compiler Stages
    // ========================================================================

    /// Stage 1: choose the measurement order
    pub fn order(&mut self, graph: &OpenGraphState, flow: &FlowLike) -> MbqcResult<&[Node]> {
        let config = &self.state.config;
        config.validate()?;
        if config.check_meas_basis {
            graph.check_meas_basis()?;
        }
        if config.order == OrderStrategy::MinimizedSpace && !config.order_affects_space() {
            warn!(
                "{} order has no effect on space with the {} layout",
                config.order, config.layout
            );
        }

        let order = match config.order {
            OrderStrategy::Topological => SpaceScheduler::topological_order(graph, flow)?,
            OrderStrategy::MinimizedSpace => SpaceScheduler::minimized_space_order(graph, flow)?,
        };
        debug!(
            "{} order over {} nodes, {} edges",
            config.order,
            graph.num_nodes(),
            graph.num_edges()
        );

        self.state.stage = CompilerStage::Ordered;
        let order = self.state.order.insert(order);
        Ok(order.as_slice())
    }

    /// Stage 2: space profile of the order
    pub fn schedule(
        &mut self,
        graph: &OpenGraphState,
        flow: &FlowLike,
    ) -> MbqcResult<&MeasSchedule> {
        let order = match self.state.order.clone() {
            Some(order) => order,
            None => self.order(graph, flow)?.to_vec(),
        };
        let schedule = SpaceScheduler::schedule(graph, &order)?;

        self.state.stage = CompilerStage::Scheduled;
        Ok(&*self.state.schedule.insert(schedule))
    }

    /// Stage 3: emit the pattern
    pub fn transpile(&mut self, graph: &OpenGraphState, flow: &FlowLike) -> MbqcResult<&Pattern> {
        if self.state.schedule.is_none() {
            self.schedule(graph, flow)?;
        }
        let order = match self.state.order.clone() {
            Some(order) => order,
            None => self.order(graph, flow)?.to_vec(),
        };

        let config = &self.state.config;
        let pattern = transpile_with_order(
            graph,
            &graph.input_nodes(),
            &graph.output_nodes(),
            flow,
            &graph.meas_bases(),
            &order,
            config.layout,
        )?;

        let max_space = pattern.calc_max_space();
        if let Some(limit) = config.max_space_limit {
            if max_space > limit {
                return Err(MbqcError::InvalidConfig(format!(
                    "pattern max space {} exceeds limit {}",
                    max_space, limit
                )));
            }
        }

        if self.verbose {
            info!(
                "compiled {} commands ({} layout), max space {}",
                pattern.len(),
                config.layout,
                max_space
            );
        } else {
            debug!(
                "compiled {} commands ({} layout), max space {}",
                pattern.len(),
                config.layout,
                max_space
            );
        }

        self.state.stage = CompilerStage::Compiled;
        Ok(&*self.state.pattern.insert(pattern))
    }

    /// Run every stage from scratch
    /// Gantree: compile(G, flow) -> CompileOutput // 전체 실행
    pub fn compile(&mut self, graph: &OpenGraphState, flow: &FlowLike) -> MbqcResult<CompileOutput> {
        self.reset();
        let order = self.order(graph, flow)?.to_vec();
        let schedule = self.schedule(graph, flow)?.clone();
        let pattern = self.transpile(graph, flow)?.clone();
        Ok(CompileOutput {
            pattern,
            order,
            schedule,
        })
    }

    // ========================================================================
    // Reset
    // ========================================================================

    /// Reset compiler to initial state
    pub fn reset(&mut self) {
        let config = self.state.config.clone();
        self.state = CompilerState::new(config);
    }

    /// Reset and reconfigure
    pub fn reconfigure(&mut self, config: CompilerConfig) {
        self.verbose = config.verbose;
        self.state = CompilerState::new(config);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transpile::CommandLayout;
    use mbqc_core::{is_standardized, MeasBasis, NodeSet};

    /// Line 0 - 1 - ... - (n-1), input 0, output n-1
    fn line(n: usize) -> (OpenGraphState, FlowLike) {
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
            graph.set_meas_basis(i, MeasBasis::default()).unwrap();
        }
        let flow = (0..n - 1).map(|i| (i, NodeSet::from([i + 1]))).collect();
        (graph, flow)
    }

    #[test]
    fn test_compiler_new() {
        let compiler = Compiler::standard();
        assert_eq!(compiler.stage(), CompilerStage::Initial);
        assert_eq!(compiler.config(), &CompilerConfig::standard());
    }

    #[test]
    fn test_order_stage() {
        let (graph, flow) = line(4);
        let mut compiler = Compiler::standard();

        let order = compiler.order(&graph, &flow).unwrap();
        assert_eq!(order, &[0, 1, 2]);
        assert_eq!(compiler.stage(), CompilerStage::Ordered);
        assert!(compiler.state().is_ordered());
    }

    #[test]
    fn test_schedule_runs_missing_stage() {
        let (graph, flow) = line(4);
        let mut compiler = Compiler::space_optimized();

        let schedule = compiler.schedule(&graph, &flow).unwrap();
        assert_eq!(schedule.max_space(), 2);
        assert_eq!(compiler.stage(), CompilerStage::Scheduled);
        assert!(compiler.state().is_ordered());
    }

    #[test]
    fn test_standard_compile() {
        let (graph, flow) = line(4);
        let output = Compiler::standard().compile(&graph, &flow).unwrap();

        assert!(is_standardized(&output.pattern));
        assert_eq!(output.order, vec![0, 1, 2]);
        assert_eq!(output.max_space(), 4);
        assert_eq!(output.predicted_space(), 2);
    }

    #[test]
    fn test_space_optimized_compile() {
        let (graph, flow) = line(4);
        let mut compiler = Compiler::space_optimized();
        let output = compiler.compile(&graph, &flow).unwrap();

        assert_eq!(output.max_space(), 2);
        assert_eq!(output.max_space(), output.predicted_space());
        assert!(output.pattern.is_runnable());
        assert_eq!(compiler.stage(), CompilerStage::Compiled);
        assert!(compiler.state().is_compiled());
    }

    #[test]
    fn test_max_space_limit() {
        let (graph, flow) = line(4);

        let config = CompilerConfig::standard().with_max_space_limit(3);
        let err = Compiler::new(config).compile(&graph, &flow).unwrap_err();
        assert!(matches!(err, MbqcError::InvalidConfig(_)));

        let config = CompilerConfig::space_optimized().with_max_space_limit(2);
        assert!(Compiler::new(config).compile(&graph, &flow).is_ok());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let (graph, flow) = line(3);
        let config = CompilerConfig::standard().with_max_space_limit(0);
        let mut compiler = Compiler::new(config);
        assert!(matches!(
            compiler.order(&graph, &flow),
            Err(MbqcError::InvalidConfig(_))
        ));
        assert_eq!(compiler.stage(), CompilerStage::Initial);
    }

    #[test]
    fn test_missing_basis() {
        let (_, flow) = line(4);
        let mut graph = OpenGraphState::new();
        for _ in 0..4 {
            graph.add_node();
        }
        for i in 1..4 {
            graph.add_edge(i - 1, i).unwrap();
        }
        graph.set_input(0).unwrap();
        graph.set_output(3, 0).unwrap();
        graph.set_meas_basis(0, MeasBasis::default()).unwrap();
        graph.set_meas_basis(2, MeasBasis::default()).unwrap();

        let mut checked = Compiler::standard();
        assert_eq!(
            checked.order(&graph, &flow).unwrap_err(),
            MbqcError::MissingMeasurementBasis(1)
        );
        assert_eq!(checked.stage(), CompilerStage::Initial);

        // without the early check the order is found, emission still fails
        let mut unchecked = Compiler::new(CompilerConfig::standard().with_check_meas_basis(false));
        assert!(unchecked.order(&graph, &flow).is_ok());
        assert_eq!(
            unchecked.transpile(&graph, &flow).unwrap_err(),
            MbqcError::MissingMeasurementBasis(1)
        );
    }

    #[test]
    fn test_reset_and_reconfigure() {
        let (graph, flow) = line(3);
        let mut compiler = Compiler::standard();
        compiler.compile(&graph, &flow).unwrap();

        compiler.reset();
        assert_eq!(compiler.stage(), CompilerStage::Initial);
        assert!(!compiler.state().is_compiled());

        compiler.reconfigure(CompilerConfig::standard().with_layout(CommandLayout::JustInTime));
        assert_eq!(compiler.config().layout, CommandLayout::JustInTime);
        assert_eq!(compiler.stage(), CompilerStage::Initial);
    }

    #[test]
    fn test_output_display() {
        let (graph, flow) = line(3);
        let output = Compiler::space_optimized().compile(&graph, &flow).unwrap();
        let s = output.to_string();
        assert!(s.contains("Measurements: 2"));
        assert!(s.contains("Max space: 2"));
    }
}
