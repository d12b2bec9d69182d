mod execute;
mod subscribe;
mod validate;

use crate::Cli;
use crate::CommandResult;
use execute::ExecuteCmd;
use serde_json::Map;
use serde_json::Value;
use subscribe::SubscribeCmd;
use validate::ValidateCmd;

#[derive(Debug, clap::Parser)]
#[command(name = "minigql")]
pub(crate) enum CommandEnum {
    /// Run queries and mutations against the bookshelf, in order.
    Execute(Box<ExecuteCmd>),
    /// Print one response per subscription event until the stream ends.
    Subscribe(Box<SubscribeCmd>),
    /// Check GraphQL documents against the bookshelf schema.
    Validate(Box<ValidateCmd>),
}
impl CommandEnum {
    pub(crate) async fn run(self, cli: Cli) -> CommandResult {
        match self {
            Self::Execute(cmd) => cmd.run(cli).await,
            Self::Subscribe(cmd) => cmd.run(cli).await,
            Self::Validate(cmd) => cmd.run(cli).await,
        }
    }
}

/// Parses the `--variables` argument, which must be a JSON object.
pub(crate) fn parse_variables(raw: Option<&str>) -> anyhow::Result<Option<Map<String, Value>>> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    match serde_json::from_str::<Value>(raw)? {
        Value::Object(variables) => Ok(Some(variables)),
        Value::Null => Ok(None),
        other => anyhow::bail!("`--variables` must be a JSON object, found: {other}"),
    }
}
