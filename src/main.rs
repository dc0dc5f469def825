//! Dispatches GitHub Actions workflows from the command line.

use std::{collections::BTreeMap, path::PathBuf, process::ExitCode};

use clap::{Parser, Subcommand};
use tracing::{Level, error};

use workflow_dispatch::{
    env::Config,
    transactions::{DispatchOptions, dispatch, parse_input},
    workflow::Repository,
};

/// The repository workflows are dispatched on when `--repository` is not given.
const DEFAULT_REPOSITORY: &str = "expo/expo";

#[derive(Parser, Debug)]
#[command(name = "workflow-dispatch", version, about = "Dispatch GitHub Actions workflows")]
struct Cli {
    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Dispatch a workflow with a `workflow_dispatch` trigger
    #[command(name = "workflow-dispatch", visible_alias = "dispatch")]
    WorkflowDispatch {
        /// Name, id or file slug of the workflow. Prompts when omitted
        name: Option<String>,

        /// Branch, tag or commit to run on. Defaults to the current branch
        #[arg(long = "ref", value_name = "REF")]
        git_ref: Option<String>,

        /// Workflow input, may be repeated
        #[arg(short = 'f', long = "field", value_name = "KEY=VALUE", value_parser = parse_input)]
        fields: Vec<(String, String)>,

        /// Repository owning the workflow
        #[arg(long, value_name = "OWNER/NAME", default_value = DEFAULT_REPOSITORY)]
        repository: Repository,

        /// Root of the local working copy
        #[arg(long, value_name = "DIR", default_value = ".")]
        root: PathBuf,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .with_target(false)
        .init();

    match run(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::WorkflowDispatch {
            name,
            git_ref,
            fields,
            repository,
            root,
        } => {
            let options = DispatchOptions {
                workflow: name,
                git_ref,
                inputs: fields.into_iter().collect::<BTreeMap<_, _>>(),
            };
            dispatch(&Config::from_env(), repository, root, options).await?;
        }
    }

    Ok(())
}
