use fisc_config::FiscConfig;
use fisc_store::TreeStore;

use crate::cli::FetchArgs;

pub async fn handle(args: &FetchArgs, config: &FiscConfig) -> anyhow::Result<()> {
    let store = TreeStore::from_config(&config.storage)?;
    let tree = store.get_tree(args.uuid).await?;
    println!("{}", serde_json::to_string_pretty(&tree)?);
    Ok(())
}
