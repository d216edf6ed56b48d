//! Turn loop wiring the conversation node, router, and update nodes.

use crate::error::CoreError;
use crate::nodes::{run_conversation, update_instructions, update_profile, update_todos};
use crate::router::{Directive, RouteDecision, route_turn};
use log::{debug, error, info};
use mnemon_config::MnemonConfig;
use mnemon_protocol::{Conversation, ExtractionCapability, ModelCapability};
use mnemon_store::{MemoryStore, NamespaceLeases};
use std::sync::Arc;

/// Result payload for a single turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnResult {
    /// Final assistant reply for the turn.
    pub response: String,
    /// Number of update dispatches the turn performed.
    pub dispatches: usize,
}

/// Memory orchestration facade for one configured session.
///
/// All collaborators are explicit constructor parameters; there is no
/// process-wide registry. The orchestrator may be cloned cheaply and
/// shared across tasks — the store, capabilities, and lease map are
/// reference-counted.
#[derive(Clone)]
pub struct Orchestrator {
    config: MnemonConfig,
    store: Arc<dyn MemoryStore>,
    model: Arc<dyn ModelCapability>,
    extractor: Arc<dyn ExtractionCapability>,
    leases: Arc<NamespaceLeases>,
}

impl Orchestrator {
    /// Construct an orchestrator with its own lease map.
    pub fn new(
        config: MnemonConfig,
        store: Arc<dyn MemoryStore>,
        model: Arc<dyn ModelCapability>,
        extractor: Arc<dyn ExtractionCapability>,
    ) -> Self {
        Self::with_leases(config, store, model, extractor, Arc::new(NamespaceLeases::new()))
    }

    /// Construct an orchestrator sharing a lease map with other
    /// orchestrators over the same store.
    pub fn with_leases(
        config: MnemonConfig,
        store: Arc<dyn MemoryStore>,
        model: Arc<dyn ModelCapability>,
        extractor: Arc<dyn ExtractionCapability>,
        leases: Arc<NamespaceLeases>,
    ) -> Self {
        info!(
            "initializing orchestrator (user_id={}, category={}, max_dispatches={})",
            config.session.user_id, config.session.category, config.limits.max_dispatches
        );
        Self {
            config,
            store,
            model,
            extractor,
            leases,
        }
    }

    /// Session configuration this orchestrator runs under.
    pub fn config(&self) -> &MnemonConfig {
        &self.config
    }

    /// Process one conversational turn.
    ///
    /// Loops conversation → route → update until the model emits a plain
    /// reply, or fails on the first error without committing further
    /// memory changes.
    pub async fn run_turn(&self, conversation: &mut Conversation) -> Result<TurnResult, CoreError> {
        let scope = &self.config.session;
        info!(
            "starting turn (user_id={}, category={}, messages={})",
            scope.user_id,
            scope.category,
            conversation.len()
        );

        let mut dispatches = 0usize;
        let response = loop {
            let reply = run_conversation(
                self.store.as_ref(),
                self.model.as_ref(),
                scope,
                conversation,
            )
            .await?;

            match route_turn(conversation)? {
                RouteDecision::Done => break reply.content,
                RouteDecision::Dispatch { directive, call_id } => {
                    if dispatches >= self.config.limits.max_dispatches {
                        error!(
                            "dispatch budget exhausted (user_id={}, dispatches={})",
                            scope.user_id, dispatches
                        );
                        return Err(CoreError::DispatchLimit(dispatches));
                    }
                    dispatches += 1;
                    debug!(
                        "dispatching update (directive={}, call_id={}, dispatch={})",
                        directive.as_str(),
                        call_id,
                        dispatches
                    );
                    match directive {
                        Directive::Profile => {
                            update_profile(
                                self.store.as_ref(),
                                &self.leases,
                                self.extractor.as_ref(),
                                scope,
                                conversation,
                                &call_id,
                            )
                            .await?
                        }
                        Directive::Todo => {
                            update_todos(
                                self.store.as_ref(),
                                &self.leases,
                                self.extractor.as_ref(),
                                scope,
                                conversation,
                                &call_id,
                            )
                            .await?
                        }
                        Directive::Instructions => {
                            update_instructions(
                                self.store.as_ref(),
                                &self.leases,
                                self.model.as_ref(),
                                scope,
                                conversation,
                                &call_id,
                            )
                            .await?
                        }
                    }
                }
            }
        };

        info!(
            "completed turn (user_id={}, dispatches={}, response_len={})",
            scope.user_id,
            dispatches,
            response.len()
        );
        Ok(TurnResult {
            response,
            dispatches,
        })
    }
}
