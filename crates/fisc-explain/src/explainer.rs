//! The explanation orchestrator.
//!
//! Composes the whole pipeline for one request: gate check, target-variable lookup,
//! stored-tree fetch, subtree extraction, entity-group annotation, prompt render,
//! then buffered or streaming dispatch. Requests are stateless; everything the
//! orchestrator holds is resolved once at startup and read-only thereafter.

use std::collections::HashMap;

use futures_util::StreamExt;
use futures_util::stream::BoxStream;
use uuid::Uuid;

use fisc_config::FeatureState;
use fisc_core::{AnalysisResponse, CountryId, Household, single_unset_variable};
use fisc_store::TreeStore;
use fisc_trace::{CountryMetadata, annotate, extract};

use crate::chunk::frame_stream;
use crate::client::TextGenerator;
use crate::error::ExplainError;
use crate::prompt::render_prompt;

/// One explanation request, transport-independent.
#[derive(Debug, Clone)]
pub struct ExplainRequest {
    /// Country whose metadata annotates the tree.
    pub country: CountryId,
    /// Id of the stored computation tree to explain from.
    pub computation_tree_uuid: Uuid,
    /// Household with exactly one variable set to `null` (the explanation target).
    pub household: Household,
    /// Streamed frames instead of one buffered payload.
    pub use_streaming: bool,
}

/// The result of a successful dispatch: one payload, or a frame sequence.
pub enum Analysis {
    /// Complete response in one payload.
    Buffered(AnalysisResponse),
    /// Newline-delimited `{"response": chunk}` frames as they become available.
    Streaming(BoxStream<'static, Result<String, ExplainError>>),
}

impl std::fmt::Debug for Analysis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buffered(response) => f.debug_tuple("Buffered").field(response).finish(),
            Self::Streaming(_) => f.debug_tuple("Streaming").field(&"..").finish(),
        }
    }
}

/// Explanation pipeline over a tree store and a text-generation service.
pub struct Explainer<G> {
    gate: FeatureState,
    store: TreeStore,
    countries: HashMap<CountryId, CountryMetadata>,
    generator: G,
    chunk_size: usize,
}

impl<G> Explainer<G>
where
    G: TextGenerator,
    G::TokenStream: 'static,
{
    #[must_use]
    pub fn new(
        gate: FeatureState,
        store: TreeStore,
        countries: HashMap<CountryId, CountryMetadata>,
        generator: G,
        chunk_size: usize,
    ) -> Self {
        Self {
            gate,
            store,
            countries,
            generator,
            chunk_size,
        }
    }

    /// Run one explanation request end to end.
    ///
    /// # Errors
    ///
    /// Gate failures ([`ExplainError::Disabled`], [`ExplainError::MissingCredential`])
    /// are terminal and no upstream call is attempted. Context-assembly failures
    /// (household validation, record not found, annotation/provenance skew) are
    /// terminal and mode-independent. Dispatch failures surface as
    /// [`ExplainError::Upstream`] and are never retried here.
    pub async fn explain(&self, request: &ExplainRequest) -> Result<Analysis, ExplainError> {
        if !self.gate.enabled {
            return Err(ExplainError::Disabled);
        }
        if self.gate.credential.is_none() {
            return Err(ExplainError::MissingCredential);
        }

        let metadata =
            self.countries
                .get(&request.country)
                .ok_or_else(|| ExplainError::MissingMetadata {
                    country: request.country.to_string(),
                })?;

        let target = single_unset_variable(&request.household)?;
        let tree = self.store.get_tree(request.computation_tree_uuid).await?;

        let segment = extract(&tree.lines, &target.variable);
        let segment = annotate(&segment, metadata)?;
        let prompt = render_prompt(
            &target.variable,
            &segment,
            &tree.entity_description,
            &target.entity,
        );

        tracing::info!(
            uuid = %tree.uuid,
            country = %request.country,
            variable = %target.variable,
            segment_lines = segment.len(),
            streaming = request.use_streaming,
            "dispatching explanation"
        );

        if request.use_streaming {
            let tokens = self.generator.stream(&prompt).await?;
            Ok(Analysis::Streaming(
                frame_stream(tokens, self.chunk_size).boxed(),
            ))
        } else {
            let text = self.generator.complete(&prompt).await?;
            Ok(Analysis::Buffered(AnalysisResponse::new(text)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use futures_util::TryStreamExt;
    use futures_util::stream;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use crate::error::ErrorKind;
    use fisc_core::EntityDescription;
    use fisc_trace::ComputationTree;

    /// Scripted generator that records calls and prompts.
    #[derive(Clone, Default)]
    struct MockGenerator {
        calls: Arc<AtomicUsize>,
        prompts: Arc<Mutex<Vec<String>>>,
        reply: String,
        fragments: Vec<String>,
    }

    impl MockGenerator {
        fn buffered(reply: &str) -> Self {
            Self {
                reply: reply.to_string(),
                ..Self::default()
            }
        }

        fn streaming(fragments: &[&str]) -> Self {
            Self {
                fragments: fragments.iter().map(|f| (*f).to_string()).collect(),
                ..Self::default()
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn last_prompt(&self) -> String {
            self.prompts.lock().unwrap().last().cloned().unwrap_or_default()
        }
    }

    impl TextGenerator for MockGenerator {
        type TokenStream = stream::Iter<std::vec::IntoIter<Result<String, ExplainError>>>;

        async fn complete(&self, prompt: &str) -> Result<String, ExplainError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok(self.reply.clone())
        }

        async fn stream(&self, prompt: &str) -> Result<Self::TokenStream, ExplainError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok(stream::iter(
                self.fragments
                    .iter()
                    .map(|f| Ok(f.clone()))
                    .collect::<Vec<_>>(),
            ))
        }
    }

    fn open_gate() -> FeatureState {
        FeatureState {
            enabled: true,
            credential: Some("sk-test".to_string()),
        }
    }

    fn metadata() -> HashMap<CountryId, CountryMetadata> {
        let us = CountryMetadata::default()
            .with_variable("snap", "spm_unit")
            .with_variable("snap_gross_income", "spm_unit")
            .with_entity("spm_unit", "spm_units");
        HashMap::from([(CountryId::Us, us)])
    }

    fn household_with_unset(variable: &str) -> Household {
        serde_json::from_value(json!({
            "spm_units": {
                "your household": {
                    "members": ["you"],
                    variable: {"2024": null}
                }
            },
            "people": {
                "you": {"age": {"2024": 40}}
            }
        }))
        .unwrap()
    }

    async fn stored_tree(store: &TreeStore) -> Uuid {
        let tree = ComputationTree::capture(
            CountryId::Us,
            vec![
                "snap <200>".to_string(),
                "  snap_gross_income <1000>".to_string(),
            ],
            EntityDescription::from([("spm_units", vec!["your household"])]),
        );
        store.put_tree(&tree).await.unwrap()
    }

    fn request(uuid: Uuid, use_streaming: bool) -> ExplainRequest {
        ExplainRequest {
            country: CountryId::Us,
            computation_tree_uuid: uuid,
            household: household_with_unset("snap"),
            use_streaming,
        }
    }

    #[tokio::test]
    async fn buffered_mode_returns_single_payload() {
        let store = TreeStore::in_memory();
        let uuid = stored_tree(&store).await;
        let generator = MockGenerator::buffered("SNAP is a nutrition benefit.");
        let explainer = Explainer::new(open_gate(), store, metadata(), generator.clone(), 5);

        let analysis = explainer.explain(&request(uuid, false)).await.unwrap();
        let Analysis::Buffered(payload) = analysis else {
            panic!("expected buffered analysis");
        };
        assert_eq!(payload.response, "SNAP is a nutrition benefit.");
        assert_eq!(generator.call_count(), 1);

        let prompt = generator.last_prompt();
        assert!(prompt.contains("variable 'snap'"));
        assert!(prompt.contains("snap <200> entity_group: spm_units"));
        assert!(prompt.contains("entity 'your household'"));
    }

    #[tokio::test]
    async fn streaming_mode_reframes_fragments() {
        let store = TreeStore::in_memory();
        let uuid = stored_tree(&store).await;
        let generator = MockGenerator::streaming(&["ab", "cde", "f"]);
        let explainer = Explainer::new(open_gate(), store, metadata(), generator.clone(), 2);

        let analysis = explainer.explain(&request(uuid, true)).await.unwrap();
        let Analysis::Streaming(frames) = analysis else {
            panic!("expected streaming analysis");
        };
        let frames: Vec<String> = frames.try_collect().await.unwrap();
        let rebuilt: String = frames
            .iter()
            .map(|frame| {
                let payload: AnalysisResponse =
                    serde_json::from_str(frame.trim_end()).unwrap();
                payload.response
            })
            .collect();
        assert_eq!(rebuilt, "abcdef");
        assert_eq!(generator.call_count(), 1);
    }

    #[tokio::test]
    async fn disabled_gate_makes_no_upstream_call() {
        let store = TreeStore::in_memory();
        let uuid = stored_tree(&store).await;
        let generator = MockGenerator::buffered("never");
        let explainer = Explainer::new(
            FeatureState::disabled(),
            store,
            metadata(),
            generator.clone(),
            5,
        );

        let err = explainer.explain(&request(uuid, false)).await.unwrap_err();
        assert!(matches!(err, ExplainError::Disabled));
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
        assert_eq!(generator.call_count(), 0);
    }

    #[tokio::test]
    async fn enabled_without_credential_is_unauthorized() {
        let store = TreeStore::in_memory();
        let uuid = stored_tree(&store).await;
        let generator = MockGenerator::buffered("never");
        let gate = FeatureState {
            enabled: true,
            credential: None,
        };
        let explainer = Explainer::new(gate, store, metadata(), generator.clone(), 5);

        let err = explainer.explain(&request(uuid, false)).await.unwrap_err();
        assert!(matches!(err, ExplainError::MissingCredential));
        assert_eq!(generator.call_count(), 0);
    }

    #[tokio::test]
    async fn unknown_record_is_not_found() {
        let store = TreeStore::in_memory();
        let generator = MockGenerator::buffered("never");
        let explainer = Explainer::new(open_gate(), store, metadata(), generator.clone(), 5);

        let missing = Uuid::new_v4();
        let err = explainer.explain(&request(missing, false)).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(err.to_string().contains(&missing.to_string()));
        assert_eq!(generator.call_count(), 0);
    }

    #[tokio::test]
    async fn household_without_unset_variable_is_a_validation_error() {
        let store = TreeStore::in_memory();
        let uuid = stored_tree(&store).await;
        let generator = MockGenerator::buffered("never");
        let explainer = Explainer::new(open_gate(), store, metadata(), generator.clone(), 5);

        let mut req = request(uuid, false);
        req.household = serde_json::from_value(json!({
            "people": {"you": {"age": {"2024": 40}}}
        }))
        .unwrap();
        let err = explainer.explain(&req).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(generator.call_count(), 0);
    }

    #[tokio::test]
    async fn metadata_skew_is_a_provenance_error() {
        let store = TreeStore::in_memory();
        let uuid = stored_tree(&store).await;
        let generator = MockGenerator::buffered("never");
        // Metadata that no longer knows the stored tree's dependency variable.
        let stale = CountryMetadata::default()
            .with_variable("snap", "spm_unit")
            .with_entity("spm_unit", "spm_units");
        let countries = HashMap::from([(CountryId::Us, stale)]);
        let explainer = Explainer::new(open_gate(), store, countries, generator.clone(), 5);

        let err = explainer.explain(&request(uuid, false)).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Provenance);
        assert!(err.to_string().contains("snap_gross_income"));
        assert_eq!(generator.call_count(), 0);
    }

    #[tokio::test]
    async fn unregistered_country_is_a_validation_error() {
        let store = TreeStore::in_memory();
        let uuid = stored_tree(&store).await;
        let generator = MockGenerator::buffered("never");
        let explainer = Explainer::new(open_gate(), store, HashMap::new(), generator.clone(), 5);

        let err = explainer.explain(&request(uuid, false)).await.unwrap_err();
        assert!(matches!(err, ExplainError::MissingMetadata { .. }));
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(generator.call_count(), 0);
    }
}
