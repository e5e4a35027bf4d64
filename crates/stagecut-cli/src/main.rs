use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "stagecut",
    about = "stagecut — dependency-staged CI build planner",
    version,
    propagate_version = true,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the stage/worker build plan for a workspace.
    ///
    /// Bootstrap repositories, bonds, isolation overrides, and worker
    /// budgets are read from stagecut.toml in the workspace root (or
    /// from --config). The text format is the key/value block stream
    /// consumed by pipeline templating; json emits the structured plan.
    Plan {
        /// Workspace root (default: current directory)
        #[arg(short, long, default_value = ".")]
        path: String,
        /// Plan configuration file (default: <path>/stagecut.toml if present)
        #[arg(short, long)]
        config: Option<String>,
        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: String,
    },
    /// Emit the repository build-dependency graph as Graphviz DOT
    Graph {
        /// Workspace root (default: current directory)
        #[arg(short, long, default_value = ".")]
        path: String,
    },
    /// Show a package's in-workspace dependencies and repository siblings
    Inspect {
        /// Package name
        package: String,
        /// Workspace root (default: current directory)
        #[arg(short, long, default_value = ".")]
        path: String,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("stagecut_workspace=info".parse()?)
                .add_directive("stagecut_planner=info".parse()?)
                .add_directive("stagecut_cli=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Plan {
            path,
            config,
            format,
        } => commands::plan::run(&path, config.as_deref(), &format),
        Commands::Graph { path } => commands::graph::run(&path),
        Commands::Inspect { package, path } => commands::inspect::run(&package, &path),
    }
}
