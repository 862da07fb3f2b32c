use fisc_config::FiscConfig;
use fisc_core::{CountryId, EntityDescription};
use fisc_store::TreeStore;
use fisc_trace::ComputationTree;

use crate::cli::StoreArgs;

pub async fn handle(args: &StoreArgs, config: &FiscConfig) -> anyhow::Result<()> {
    let country: CountryId = args
        .country
        .as_deref()
        .unwrap_or(&config.general.default_country)
        .parse()?;
    let lines = super::read_tree_lines(&args.tree)?;
    let entities: EntityDescription = super::read_json(&args.entities)?;

    let store = TreeStore::from_config(&config.storage)?;
    let tree = ComputationTree::capture(country, lines, entities);
    let uuid = store.put_tree(&tree).await?;
    println!("{uuid}");
    Ok(())
}
