//! MBQC Space Benchmark
//!
//! Compares the peak qubit count of topological and space-minimized
//! measurement orders on cluster-state families and prints the report.
//!
//! Usage: `cargo run -p mbqc_bench --example space_benchmark [markdown|json|csv|text]`

use mbqc_bench::prelude::*;
use mbqc_compiler::{Compiler, CompilerConfig};
use mbqc_core::constants::pattern::DEFAULT_FORMAT_LIMIT;
use mbqc_core::{format_pattern, MbqcResult};

fn main() -> MbqcResult<()> {
    let format = match std::env::args().nth(1).as_deref() {
        Some("json") => ReportFormat::Json,
        Some("csv") => ReportFormat::Csv,
        Some("text") => ReportFormat::Text,
        _ => ReportFormat::Markdown,
    };

    let mut suite = SpaceBenchmark::with_seed(42);
    let results = suite.run_all()?;
    println!("{}", Reporter::report(&results, format));

    if format == ReportFormat::Markdown {
        let grids: Vec<SpaceRecord> = results
            .iter()
            .filter(|r| r.name.starts_with("grid_5x"))
            .cloned()
            .collect();
        println!("{}", Reporter::scaling_report(&grids));

        // One compiled pattern
        let bench = GraphGenerator::with_seed(42).grid_cluster(2, 3)?;
        let output = Compiler::new(CompilerConfig::space_optimized())
            .compile(&bench.graph, &bench.flow)?;
        println!("## {} (max space {})\n", bench.name, output.max_space());
        println!("```text");
        print!("{}", format_pattern(&output.pattern, DEFAULT_FORMAT_LIMIT, None));
        println!("```");
    }

    Ok(())
}
