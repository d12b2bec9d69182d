use crate::Cli;
use crate::CommandResult;
use crate::RunnableCommand;
use crate::commands::parse_variables;
use crate::output_utils;
use futures::StreamExt;
use minigql::bookshelf;
use minigql::bookshelf::BookshelfConfig;
use minigql::engine::Request;
use std::process::ExitCode;
use std::time::Duration;

#[derive(Debug, clap::Args)]
pub(crate) struct SubscribeCmd {
    #[arg(
        help="The subscription document.",
        long="query",
        short='q',
        value_name="QUERY",
    )]
    query: String,

    #[arg(
        help="Variables as a JSON object.",
        long,
    )]
    variables: Option<String>,

    #[arg(
        default_value_t=500,
        help="Milliseconds between `count` events.",
        long,
    )]
    interval_ms: u64,

    #[arg(
        help="Stop after this many events.",
        long,
    )]
    max_events: Option<usize>,

    #[arg(
        help="Pretty-print each response.",
        long,
    )]
    pretty: bool,
}

#[inherent::inherent]
impl RunnableCommand for SubscribeCmd {
    pub async fn run(self, _cli: Cli) -> CommandResult {
        let variables = match parse_variables(self.variables.as_deref()) {
            Ok(variables) => variables,
            Err(err) => return err.into(),
        };
        let config = BookshelfConfig::default()
            .with_count_interval(Duration::from_millis(self.interval_ms));
        let engine = match bookshelf::engine(config) {
            Ok(engine) => engine,
            Err(err) => return anyhow::Error::from(err).into(),
        };

        let mut stream = engine.subscribe(Request {
            query: self.query,
            operation_name: None,
            variables,
        });
        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        let mut received = 0;
        let mut failed = false;
        loop {
            if self.max_events.is_some_and(|max| received >= max) {
                log::debug!("Reached --max-events; cancelling subscription.");
                stream.cancel();
                break;
            }
            tokio::select! {
                _ = &mut ctrl_c => {
                    log::info!("Interrupted; cancelling subscription.");
                    stream.cancel();
                    break;
                },
                next = stream.next() => match next {
                    Some(response) => {
                        failed |= !response.is_ok();
                        println!("{}", output_utils::format_response(&response, self.pretty));
                        received += 1;
                    },
                    None => break,
                },
            }
        }

        log::debug!("Subscription ended after {received} events.");
        let exit_code = if failed { ExitCode::FAILURE } else { ExitCode::SUCCESS };
        CommandResult::success().with_exit_code(exit_code)
    }
}
