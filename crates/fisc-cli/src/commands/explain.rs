use std::collections::HashMap;
use std::io::Write;

use futures_util::TryStreamExt;

use fisc_config::{FeatureState, FiscConfig};
use fisc_core::{CountryId, Household};
use fisc_explain::{Analysis, AnthropicClient, ExplainRequest, Explainer};
use fisc_store::TreeStore;
use fisc_trace::CountryMetadata;

use crate::cli::ExplainArgs;

pub async fn handle(args: &ExplainArgs, config: &FiscConfig) -> anyhow::Result<()> {
    let country: CountryId = args
        .country
        .as_deref()
        .unwrap_or(&config.general.default_country)
        .parse()?;
    let household: Household = super::read_json(&args.household)?;
    let metadata: CountryMetadata = super::read_json(&args.metadata)?;

    let gate = FeatureState::resolve(&config.ai);
    // The orchestrator rejects gated requests before any call; an absent credential
    // only needs a placeholder here.
    let credential = gate.credential.clone().unwrap_or_default();
    let client = AnthropicClient::from_config(&config.ai, &credential);
    let store = TreeStore::from_config(&config.storage)?;
    let countries = HashMap::from([(country, metadata)]);
    let explainer = Explainer::new(gate, store, countries, client, config.ai.chunk_size);

    let request = ExplainRequest {
        country,
        computation_tree_uuid: args.uuid,
        household,
        use_streaming: args.stream,
    };

    match explainer.explain(&request).await? {
        Analysis::Buffered(payload) => {
            println!("{}", serde_json::to_string(&payload)?);
        }
        Analysis::Streaming(mut frames) => {
            let mut stdout = std::io::stdout().lock();
            while let Some(frame) = frames.try_next().await? {
                stdout.write_all(frame.as_bytes())?;
                stdout.flush()?;
            }
        }
    }
    Ok(())
}
