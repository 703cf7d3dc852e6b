//! Compiler configuration for MBQC
//!
//! Gantree: L5_Integration → CompilerConfig
//!
//! Measurement order strategy, command layout and limits for one compilation.

use crate::transpile::CommandLayout;
use mbqc_core::{MbqcError, MbqcResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How the measurement order is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OrderStrategy {
    /// Kahn order of the flow's dependency DAG
    #[default]
    Topological,
    /// Greedy order minimizing newly activated qubits per measurement
    MinimizedSpace,
}

impl fmt::Display for OrderStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderStrategy::Topological => write!(f, "topological"),
            OrderStrategy::MinimizedSpace => write!(f, "minimized-space"),
        }
    }
}

/// Compiler configuration
/// Gantree: CompilerConfig // 컴파일러 설정
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilerConfig {
    /// Measurement order strategy
    pub order: OrderStrategy,

    /// Placement of `N` and `E` commands
    pub layout: CommandLayout,

    /// Require a basis on every non-output node before compiling
    pub check_meas_basis: bool,

    /// Reject patterns whose max space exceeds this
    pub max_space_limit: Option<usize>,

    /// Log the per-run summary at info level
    pub verbose: bool,
}

impl CompilerConfig {
    // ========================================================================
    // Presets
    // ========================================================================

    /// Standardized pattern in topological order
    /// Gantree: standard() -> CompilerConfig // 표준 프리셋
    pub fn standard() -> Self {
        Self {
            order: OrderStrategy::Topological,
            layout: CommandLayout::Standard,
            check_meas_basis: true,
            max_space_limit: None,
            verbose: false,
        }
    }

    /// Greedy order with just-in-time preparation
    /// Gantree: space_optimized() -> CompilerConfig // 공간 최적 프리셋
    pub fn space_optimized() -> Self {
        Self {
            order: OrderStrategy::MinimizedSpace,
            layout: CommandLayout::JustInTime,
            ..Self::standard()
        }
    }

    // ========================================================================
    // Builder Methods
    // ========================================================================

    /// Set order strategy
    pub fn with_order(mut self, order: OrderStrategy) -> Self {
        self.order = order;
        self
    }

    /// Set command layout
    pub fn with_layout(mut self, layout: CommandLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Enable or disable the basis check
    pub fn with_check_meas_basis(mut self, enabled: bool) -> Self {
        self.check_meas_basis = enabled;
        self
    }

    /// Set max space limit
    pub fn with_max_space_limit(mut self, limit: usize) -> Self {
        self.max_space_limit = Some(limit);
        self
    }

    /// Set verbose mode
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Validate configuration
    pub fn validate(&self) -> MbqcResult<()> {
        if self.max_space_limit == Some(0) {
            return Err(MbqcError::InvalidConfig(
                "max_space_limit must be > 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Whether the order choice can change the pattern's space
    pub fn order_affects_space(&self) -> bool {
        self.layout == CommandLayout::JustInTime
    }

    // ========================================================================
    // JSON
    // ========================================================================

    /// Serialize to JSON
    pub fn to_json(&self) -> MbqcResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize from JSON and validate
    pub fn from_json(json: &str) -> MbqcResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Display for CompilerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CompilerConfig(order={}, layout={}", self.order, self.layout)?;
        if let Some(limit) = self.max_space_limit {
            write!(f, ", max_space<={}", limit)?;
        }
        write!(f, ")")
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_preset() {
        let config = CompilerConfig::standard();
        assert_eq!(config.order, OrderStrategy::Topological);
        assert_eq!(config.layout, CommandLayout::Standard);
        assert!(config.check_meas_basis);
        assert!(config.validate().is_ok());
        assert_eq!(config, CompilerConfig::default());
    }

    #[test]
    fn test_space_optimized_preset() {
        let config = CompilerConfig::space_optimized();
        assert_eq!(config.order, OrderStrategy::MinimizedSpace);
        assert_eq!(config.layout, CommandLayout::JustInTime);
        assert!(config.order_affects_space());
        assert!(!CompilerConfig::standard().order_affects_space());
    }

    #[test]
    fn test_builders() {
        let config = CompilerConfig::standard()
            .with_order(OrderStrategy::MinimizedSpace)
            .with_check_meas_basis(false)
            .with_max_space_limit(8)
            .with_verbose(true);
        assert_eq!(config.order, OrderStrategy::MinimizedSpace);
        assert!(!config.check_meas_basis);
        assert_eq!(config.max_space_limit, Some(8));
        assert!(config.verbose);
    }

    #[test]
    fn test_validation() {
        assert!(CompilerConfig::standard().with_max_space_limit(1).validate().is_ok());

        let err = CompilerConfig::standard()
            .with_max_space_limit(0)
            .validate()
            .unwrap_err();
        assert!(matches!(err, MbqcError::InvalidConfig(_)));
    }

    #[test]
    fn test_json_roundtrip() {
        let config = CompilerConfig::space_optimized().with_max_space_limit(5);
        let json = config.to_json().unwrap();
        assert!(json.contains("MinimizedSpace"));
        assert_eq!(CompilerConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_from_json_rejects_invalid() {
        let json = CompilerConfig::standard()
            .with_max_space_limit(0)
            .to_json()
            .unwrap();
        assert!(matches!(
            CompilerConfig::from_json(&json),
            Err(MbqcError::InvalidConfig(_))
        ));
        assert!(matches!(
            CompilerConfig::from_json("{"),
            Err(MbqcError::JsonError(_))
        ));
    }

    #[test]
    fn test_display() {
        let s = CompilerConfig::space_optimized()
            .with_max_space_limit(4)
            .to_string();
        assert_eq!(
            s,
            "CompilerConfig(order=minimized-space, layout=just-in-time, max_space<=4)"
        );
    }
}
