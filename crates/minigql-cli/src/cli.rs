use clap::CommandFactory;
use crate::commands;
use crate::CommandResult;

#[derive(clap::Parser, Debug)]
#[command(name = "minigql", version)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) cmd: Option<commands::CommandEnum>,

    #[arg(
        help="Enable verbose output.",
        long,
        short='v',
        global=true,
    )]
    pub verbose: bool,
}
impl Cli {
    pub(crate) fn run_default(self) -> CommandResult {
        CommandResult::stdout(format_args!("{}", Self::command().render_help()))
    }
}
