use crate::{
    client::ApiClient,
    commands::Executor as _,
    config::CliConfig,
    tools::ToolHandler,
};
use anyhow::Result;

pub async fn run(config: CliConfig) -> Result<()> {
    let bridge = config.bridge;
    let client = ApiClient::new(bridge.base_url, bridge.collection, bridge.timeout)?;
    config.command.run(ToolHandler::new(client)).await
}
