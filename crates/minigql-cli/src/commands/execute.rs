use crate::Cli;
use crate::CommandResult;
use crate::RunnableCommand;
use crate::commands::parse_variables;
use crate::output_utils;
use anyhow::Context;
use minigql::bookshelf;
use minigql::bookshelf::BookshelfConfig;
use minigql::engine::Request;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, clap::Args)]
pub(crate) struct ExecuteCmd {
    #[arg(
        help="A GraphQL document to run. Repeat to run several in order \
             against the same bookshelf.",
        long="query",
        short='q',
        value_name="QUERY",
    )]
    queries: Vec<String>,

    #[arg(
        help="Read a GraphQL document from a file; it runs after any \
             --query documents.",
        long,
        short='f',
    )]
    file: Option<PathBuf>,

    #[arg(
        help="The operation to run when a document holds several.",
        long,
        short='o',
    )]
    operation_name: Option<String>,

    #[arg(
        help="Variables as a JSON object.",
        long,
    )]
    variables: Option<String>,

    #[arg(
        help="Pretty-print each response.",
        long,
    )]
    pretty: bool,
}

impl ExecuteCmd {
    fn requests(&self) -> anyhow::Result<Vec<Request>> {
        let mut queries = self.queries.clone();
        if let Some(path) = &self.file {
            let query = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            queries.push(query);
        }
        if queries.is_empty() {
            anyhow::bail!("nothing to execute: pass --query or --file");
        }

        let variables = parse_variables(self.variables.as_deref())?;
        Ok(queries
            .into_iter()
            .map(|query| Request {
                query,
                operation_name: self.operation_name.clone(),
                variables: variables.clone(),
            })
            .collect())
    }
}

#[inherent::inherent]
impl RunnableCommand for ExecuteCmd {
    pub async fn run(self, _cli: Cli) -> CommandResult {
        let requests = match self.requests() {
            Ok(requests) => requests,
            Err(err) => return err.into(),
        };
        let engine = match bookshelf::engine(BookshelfConfig::default()) {
            Ok(engine) => engine,
            Err(err) => return anyhow::Error::from(err).into(),
        };

        log::debug!("Executing {} documents.", requests.len());
        let mut outputs = vec![];
        let mut failed = false;
        for request in requests {
            let response = engine.execute(request).await;
            failed |= !response.is_ok();
            outputs.push(output_utils::format_response(&response, self.pretty));
        }

        let exit_code = if failed { ExitCode::FAILURE } else { ExitCode::SUCCESS };
        CommandResult::stdout(format_args!("{}", outputs.join("\n")))
            .with_exit_code(exit_code)
    }
}
