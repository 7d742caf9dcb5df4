use clap::{Parser, Subcommand, ValueEnum};
use kiseki::prelude::*;
use std::fs;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// CLI-specific enum for clap to parse.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum PolicyCli {
    Drop,
    Promote,
}

impl From<PolicyCli> for OrphanPolicy {
    fn from(p: PolicyCli) -> Self {
        match p {
            PolicyCli::Drop => OrphanPolicy::Drop,
            PolicyCli::Promote => OrphanPolicy::PromoteToRoot,
        }
    }
}

/// Reconstructs workflow execution trees and evaluates branch conditions
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Rebuild the execution tree from a graph and its trace log
    Tree {
        /// Path to the workflow graph JSON file
        graph_path: String,
        /// Path to the trace list JSON file
        traces_path: String,
        /// Run mode selector: "validate" is flat, anything else is linked
        #[arg(short, long, default_value = "run")]
        mode: String,
        /// What to do with traces whose parent is missing
        #[arg(short, long, value_enum, default_value = "drop")]
        orphans: PolicyCli,
        /// Print the forest as JSON instead of an outline
        #[arg(long)]
        json: bool,
    },
    /// Select the branch an if/else node takes for a runtime context
    Branch {
        /// Path to the persisted conditions JSON file
        conditions_path: String,
        /// Path to the runtime context JSON file
        context_path: String,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Tree {
            graph_path,
            traces_path,
            mode,
            orphans,
            json,
        } => run_tree(&graph_path, &traces_path, &mode, orphans.into(), json),
        Command::Branch {
            conditions_path,
            context_path,
        } => run_branch(&conditions_path, &context_path),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn read(path: &str) -> Result<String> {
    fs::read_to_string(path).map_err(|e| format!("Could not read file '{}': {}", path, e).into())
}

fn run_tree(
    graph_path: &str,
    traces_path: &str,
    mode: &str,
    orphans: OrphanPolicy,
    json: bool,
) -> Result<()> {
    let graph = WorkflowGraph::from_json(&read(graph_path)?)?;
    let traces = TraceRecord::list_from_json(&read(traces_path)?)?;

    let forest = TreeBuilder::builder(&graph, &traces)
        .selector(mode)
        .orphan_policy(orphans)
        .build()
        .build_forest();

    if json {
        println!("{}", serde_json::to_string_pretty(&forest)?);
    } else {
        println!("{}", TraceFormatter::format_forest(&forest));
    }
    Ok(())
}

fn run_branch(conditions_path: &str, context_path: &str) -> Result<()> {
    let conditions = ConditionsInputValue::from_json(&read(conditions_path)?)?;
    let context: serde_json::Value = serde_json::from_str(&read(context_path)?)?;

    let selection = BranchSelector::select(&conditions, &context)?;
    match &selection.target {
        BranchTarget::Block { index, id } => {
            let label = if *index == 0 { "if" } else { "elseif" };
            println!("-> Branch: {} #{} ({})", label, index, id);
        }
        BranchTarget::Otherwise { id } => println!("-> Branch: else ({})", id),
    }
    println!("-> Reason: {}", selection.reason);
    Ok(())
}
