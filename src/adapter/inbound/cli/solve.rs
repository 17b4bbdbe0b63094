//! Handler for the `solve` command.

use futures_util::future::BoxFuture;
use serde_json::json;
use tabled::{Table, Tabled};
use tracing::info;

use crate::adapter::inbound::cli::command::SolveArgs;
use crate::adapter::inbound::cli::{config, desires, output};
use crate::application::TradeNetworkSolver;
use crate::domain::{Group, TradeGraph, TradeResult};
use crate::error::Result;
use crate::infrastructure::factory::{build_optimizer, build_renderer};

type Outcome = Result<(TradeResult, f64)>;

#[derive(Tabled)]
struct TradeRow {
    #[tabled(rename = "Has")]
    first: String,
    #[tabled(rename = "Wants")]
    second: String,
    #[tabled(rename = "Weight")]
    weight: f64,
    #[tabled(rename = "Executed")]
    executed: &'static str,
}

fn solve_whole(solver: &mut TradeNetworkSolver) -> BoxFuture<'_, Outcome> {
    Box::pin(solver.solve())
}

fn solve_split(solver: &mut TradeNetworkSolver) -> BoxFuture<'_, Outcome> {
    Box::pin(solver.solve_by_component())
}

/// Execute `solve`.
pub async fn execute(args: &SolveArgs) -> Result<()> {
    let config = config::load_with_backend(&args.config, args.backend)?;
    config
        .logging
        .clone()
        .with_verbosity(output::verbosity())
        .init();

    let graph = match &args.desires {
        Some(path) => desires::load(path)?,
        None => desires::example_graph(),
    };
    info!(
        items = graph.num_items(),
        desires = graph.num_desires(),
        "trade graph loaded"
    );

    let optimizer = build_optimizer(&config.optimizer)?;
    let mut solver = TradeNetworkSolver::with_graph(graph, optimizer, config.solver_config());

    output::header(env!("CARGO_PKG_VERSION"));
    output::field("Backend", solver.optimizer_name());
    output::field("Items", solver.graph().num_items());
    output::field("Desires", solver.graph().num_desires());

    let operation: fn(&mut TradeNetworkSolver) -> BoxFuture<'_, Outcome> = if args.by_component {
        solve_split
    } else {
        solve_whole
    };
    let pb = output::spinner("Solving trade network...");
    let outcome = config.retry.policy().run(&mut solver, operation).await;
    let (result, energy) = match outcome {
        Ok(solved) => {
            output::spinner_success(&pb, "Solved");
            solved
        }
        Err(err) => {
            output::spinner_fail(&pb, "Solve failed");
            return Err(err);
        }
    };

    print_result(solver.graph(), &result, energy);

    if !args.no_render {
        let renderer = build_renderer();
        renderer.render(solver.graph(), &result, &args.output)?;
        if output::is_json() {
            output::json_output(json!({
                "command": "solve.render",
                "path": args.output.display().to_string(),
            }));
        } else {
            output::success(&format!(
                "Visualization saved to {}",
                output::highlight(args.output.display())
            ));
        }
    }
    Ok(())
}

fn print_result(graph: &TradeGraph, result: &TradeResult, energy: f64) {
    if output::is_json() {
        output::json_output(json!({
            "command": "solve",
            "energy": energy,
            "result": result,
        }));
        return;
    }

    output::section("Assignments");
    for (item, &bit) in graph.items().iter().zip(result.assignment.bits()) {
        output::assignment(item.as_str(), Group::from_bit(bit));
    }

    if !result.trades.is_empty() {
        output::section("Desires");
        let rows: Vec<TradeRow> = result
            .trades
            .iter()
            .map(|t| TradeRow {
                first: t.first.to_string(),
                second: t.second.to_string(),
                weight: t.weight,
                executed: if t.executed { "yes" } else { "no" },
            })
            .collect();
        output::lines(&Table::new(rows).to_string());
    }

    output::section("Summary");
    output::field("Energy", energy);
    output::field("Cut weight", result.total_cut_weight);
    output::field(
        "Executed",
        format!("{}/{}", result.num_executed(), result.trades.len()),
    );
}
