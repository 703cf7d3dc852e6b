//! Benchmark reporting
//!
//! Gantree: L6_Benchmark → Reporter
//!
//! Markdown, JSON, CSV and plain-text renderings of space benchmark records.

use crate::suite::{SpaceRecord, SpaceStatistics};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Report format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportFormat {
    /// Markdown table
    Markdown,
    /// JSON
    Json,
    /// CSV
    Csv,
    /// Plain text summary
    Text,
}

/// Benchmark reporter
/// Gantree: Reporter // 결과 리포팅
pub struct Reporter;

impl Reporter {
    // ========================================================================
    // Format Converters
    // ========================================================================

    /// Generate report in specified format
    pub fn report(results: &[SpaceRecord], format: ReportFormat) -> String {
        match format {
            ReportFormat::Markdown => Self::to_markdown(results),
            ReportFormat::Json => Self::to_json(results),
            ReportFormat::Csv => Self::to_csv(results),
            ReportFormat::Text => Self::to_text(results),
        }
    }

    /// Convert results to Markdown table
    pub fn to_markdown(results: &[SpaceRecord]) -> String {
        let mut output = String::new();
        let stats = SpaceStatistics::from_results(results);

        let _ = writeln!(output, "# MBQC Space Benchmark Results\n");

        let _ = writeln!(output, "## Summary\n");
        let _ = writeln!(output, "- **Benchmarks**: {}", stats.count);
        let _ = writeln!(output, "- **Avg Saving**: {:.2} qubits", stats.avg_saving);
        let _ = writeln!(output, "- **Max Saving**: {} qubits", stats.max_saving);
        let _ = writeln!(output, "- **Avg Ratio**: {:.3}", stats.avg_ratio);
        let _ = writeln!(
            output,
            "- **Total Time**: {:.2}s\n",
            stats.total_time_ms as f64 / 1000.0
        );

        let _ = writeln!(output, "## Detailed Results\n");
        let _ = writeln!(
            output,
            "| Name | Nodes | Edges | Topological | Minimized | JIT Pattern | Saving | Time(ms) |"
        );
        let _ = writeln!(
            output,
            "|------|-------|-------|-------------|-----------|-------------|--------|----------|"
        );
        for r in results {
            let _ = writeln!(
                output,
                "| {} | {} | {} | {} | {} | {} | {} | {} |",
                r.name,
                r.nodes,
                r.edges,
                r.topological_space,
                r.minimized_space,
                r.jit_pattern_space,
                r.saving(),
                r.time_ms
            );
        }

        output
    }

    /// Convert results to JSON
    pub fn to_json(results: &[SpaceRecord]) -> String {
        let stats = SpaceStatistics::from_results(results);

        let report = serde_json::json!({
            "statistics": stats,
            "results": results,
        });

        serde_json::to_string_pretty(&report).unwrap_or_else(|_| "{}".to_string())
    }

    /// Convert results to CSV
    pub fn to_csv(results: &[SpaceRecord]) -> String {
        let mut output = String::new();

        let _ = writeln!(
            output,
            "name,nodes,edges,topological_space,minimized_space,jit_pattern_space,time_ms"
        );
        for r in results {
            let _ = writeln!(
                output,
                "{},{},{},{},{},{},{}",
                r.name,
                r.nodes,
                r.edges,
                r.topological_space,
                r.minimized_space,
                r.jit_pattern_space,
                r.time_ms
            );
        }

        output
    }

    /// Convert results to plain text summary
    pub fn to_text(results: &[SpaceRecord]) -> String {
        let mut output = String::new();
        let stats = SpaceStatistics::from_results(results);

        let _ = writeln!(output, "MBQC Space Benchmark Results");
        let _ = writeln!(output, "============================\n");

        let _ = writeln!(output, "Summary:");
        let _ = writeln!(output, "  Benchmarks run: {}", stats.count);
        let _ = writeln!(output, "  Average saving: {:.2} qubits", stats.avg_saving);
        let _ = writeln!(output, "  Best saving: {} qubits", stats.max_saving);
        let _ = writeln!(output, "  Average ratio: {:.3}", stats.avg_ratio);
        let _ = writeln!(
            output,
            "  Total time: {:.2}s\n",
            stats.total_time_ms as f64 / 1000.0
        );

        let _ = writeln!(output, "Individual Results:");
        for r in results {
            let _ = writeln!(
                output,
                "  {} ({} nodes): topological {}, minimized {}, pattern {}{}",
                r.name,
                r.nodes,
                r.topological_space,
                r.minimized_space,
                r.jit_pattern_space,
                if r.saving() > 0 { " [saved]" } else { "" }
            );
        }

        output
    }

    // ========================================================================
    // Specialized Reports
    // ========================================================================

    /// Peak space against graph size
    pub fn scaling_report(results: &[SpaceRecord]) -> String {
        let mut output = String::new();

        let _ = writeln!(output, "# Space Scaling Analysis\n");
        let _ = writeln!(output, "| Nodes | Topological | Minimized | Ratio |");
        let _ = writeln!(output, "|-------|-------------|-----------|-------|");
        for r in results {
            let _ = writeln!(
                output,
                "| {} | {} | {} | {:.3} |",
                r.nodes,
                r.topological_space,
                r.minimized_space,
                r.ratio()
            );
        }

        output
    }
}

// ============================================================================
// Tests
// ============================================================================
