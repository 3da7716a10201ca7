//! Analysis workflow.
//!
//! One workflow runs from a start message (or call) to the last fragment
//! consumed for it: the backend analyzes the scraped page, the host is
//! asked to search people for every recommended persona, and matching
//! people stream back as unordered `PEOPLE_RESULT` fragments folded into
//! an append-only aggregate.
//!
//! Every `START_SEARCH` carries a monotonically increasing workflow id and
//! the host echoes it on fragments; a fragment echoing a superseded id is
//! discarded. Legacy hosts that echo nothing get their fragments appended
//! as before. Aggregate mutation is one lock acquisition per fragment with
//! no suspension point inside, so an interleaved append can never observe
//! a half-updated aggregate.

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use linkify_core::analysis::{
    AggregateResultSet, CompanyAnalysisResponse, CompanyInformation, PersonAnalysisResponse,
    PersonMatch, PersonaSpec,
};
use linkify_core::error::{LinkifyError, Result};
use linkify_core::gateway::BackendGateway;
use linkify_core::message::{
    InboundMessage, OutboundMessage, PeopleResultPayload, ProfileDataPayload,
};
use linkify_core::session::{EmbeddingContext, SessionStore};
use linkify_interaction::dispatcher::{MessageDispatcher, Topic};
use linkify_interaction::host_link::HostLink;

use crate::session_sync::SessionSynchronizer;

/// First-match-only projection of one persona for display.
///
/// A deliberate simplification: every fragment stays retained in the
/// aggregate, the view just surfaces the first arrival per persona.
#[derive(Debug, Clone)]
pub struct PersonaDisplay {
    pub persona: PersonaSpec,
    pub first_match: Option<PersonMatch>,
}

/// Read-only view over the current workflow for presentation.
#[derive(Debug, Clone)]
pub struct AnalysisView {
    pub company: Option<CompanyInformation>,
    pub personas: Vec<PersonaDisplay>,
}

#[derive(Default)]
struct WorkflowState {
    /// Monotonically increasing; bumped on every workflow start.
    workflow_id: u64,
    /// Personas from the last successful start.
    personas: Vec<PersonaSpec>,
    company: Option<CompanyInformation>,
    aggregate: AggregateResultSet,
    /// Last person analysis, kept for display only.
    person_analysis: Option<Value>,
}

/// Consumes analysis-concern messages and aggregates streamed fragments.
pub struct AnalysisWorkflow {
    context: EmbeddingContext,
    store: Arc<dyn SessionStore>,
    gateway: Arc<dyn BackendGateway>,
    sessions: Arc<SessionSynchronizer>,
    host: HostLink,
    state: RwLock<WorkflowState>,
}

impl AnalysisWorkflow {
    pub fn new(
        context: EmbeddingContext,
        store: Arc<dyn SessionStore>,
        gateway: Arc<dyn BackendGateway>,
        sessions: Arc<SessionSynchronizer>,
        host: HostLink,
    ) -> Self {
        Self {
            context,
            store,
            gateway,
            sessions,
            host,
            state: RwLock::new(WorkflowState::default()),
        }
    }

    async fn account_domain(&self) -> Option<String> {
        self.store.get().await.and_then(|session| session.account_domain)
    }

    /// Runs a company analysis workflow over scraped page content.
    ///
    /// Resets the aggregate, calls the backend, and, unless a newer
    /// workflow superseded this one while the call was in flight, records
    /// the personas and asks the host to start its people search. Fails
    /// fast without any backend call when no account domain is set.
    ///
    /// Concurrent calls are not coalesced: the later reset wins, and the
    /// earlier call's late response is discarded for aggregation purposes
    /// (its analysis object is still returned to its caller).
    pub async fn start_company_workflow(
        &self,
        url: &str,
        scraped_data: &Value,
    ) -> Result<CompanyAnalysisResponse> {
        let Some(domain) = self.account_domain().await else {
            return Err(LinkifyError::precondition(
                "account domain is not set; complete login before analysis",
            ));
        };

        let workflow_id = {
            let mut state = self.state.write().await;
            state.workflow_id += 1;
            state.personas.clear();
            state.company = None;
            state.aggregate.reset();
            state.workflow_id
        };
        info!(workflow_id, url, "starting company analysis workflow");

        let response = match self.gateway.analyze_company(url, &domain, scraped_data).await {
            Ok(response) => response,
            Err(e) => {
                self.react_to_failure(&e).await;
                return Err(e);
            }
        };

        let data = &response.company.analysis_data;
        let still_current = {
            let mut state = self.state.write().await;
            if state.workflow_id == workflow_id {
                state.personas = data.personas.clone();
                state.company = Some(data.company_information.clone());
                true
            } else {
                false
            }
        };

        if still_current {
            if self.context.is_embedded() {
                self.host.send(OutboundMessage::StartSearch {
                    workflow_id,
                    company_name: data.company_information.company_name.clone(),
                    personas: data.personas.clone(),
                });
            }
            info!(
                workflow_id,
                personas = data.personas.len(),
                "company analysis complete"
            );
        } else {
            debug!(workflow_id, "analysis response superseded by a newer workflow");
        }

        Ok(response)
    }

    /// Runs a person analysis over a scraped profile. Same precondition as
    /// the company workflow; no host-side search is started.
    pub async fn start_person_workflow(
        &self,
        payload: &ProfileDataPayload,
    ) -> Result<PersonAnalysisResponse> {
        let Some(domain) = self.account_domain().await else {
            return Err(LinkifyError::precondition(
                "account domain is not set; complete login before analysis",
            ));
        };

        let profile = payload.to_profile_value();
        match self
            .gateway
            .analyze_person(&payload.linkedin_url, &domain, &profile)
            .await
        {
            Ok(response) => {
                self.state.write().await.person_analysis = Some(response.analysis.clone());
                Ok(response)
            }
            Err(e) => {
                self.react_to_failure(&e).await;
                Err(e)
            }
        }
    }

    /// A 401-class failure clears the session like explicit logout; other
    /// failures are logged for the caller to surface.
    async fn react_to_failure(&self, error: &LinkifyError) {
        if error.is_credential_invalid() {
            self.sessions.handle_unauthorized().await;
        } else {
            warn!(error = %error, "analysis call failed");
        }
    }

    /// Folds one streamed fragment into the aggregate.
    ///
    /// Safe to call an unbounded number of times, in any order, including
    /// while a workflow start is still in flight. Fragments echoing a
    /// stale workflow id are discarded; previously accumulated fragments
    /// are never rolled back.
    pub async fn ingest_fragment(&self, payload: PeopleResultPayload) {
        let mut state = self.state.write().await;
        if let Some(echoed) = payload.workflow_id
            && echoed != state.workflow_id
        {
            debug!(
                echoed,
                current = state.workflow_id,
                "discarding fragment from a superseded workflow"
            );
            return;
        }
        debug!(persona_type = %payload.persona_type, "fragment received");
        state.aggregate.append(payload.persona_type, payload.person);
    }

    /// Handles one analysis-concern message from the host. Never
    /// propagates an error across the listener boundary.
    pub async fn handle_message(&self, message: InboundMessage) {
        match message {
            InboundMessage::ExtensionData(payload) => {
                if let Err(e) = self
                    .start_company_workflow(&payload.url, &payload.scraped_data)
                    .await
                {
                    warn!(error = %e, "extension-initiated company analysis failed");
                }
            }
            InboundMessage::ProfileData(payload) => {
                if let Err(e) = self.start_person_workflow(&payload).await {
                    warn!(error = %e, "extension-initiated person analysis failed");
                }
            }
            InboundMessage::PeopleResult(payload) => self.ingest_fragment(payload).await,
            other => debug!(tag = other.tag(), "analysis listener ignoring message"),
        }
    }

    /// The first-match-only read view over the current workflow.
    pub async fn display_view(&self) -> AnalysisView {
        let state = self.state.read().await;
        AnalysisView {
            company: state.company.clone(),
            personas: state
                .personas
                .iter()
                .map(|persona| PersonaDisplay {
                    persona: persona.clone(),
                    first_match: state.aggregate.first_match(&persona.persona_type).cloned(),
                })
                .collect(),
        }
    }

    /// All fragments accumulated for a persona type, in delivery order.
    pub async fn matches_for(&self, persona_type: &str) -> Vec<PersonMatch> {
        self.state.read().await.aggregate.matches_for(persona_type).to_vec()
    }

    /// Total fragments accumulated for the current workflow.
    pub async fn fragment_count(&self) -> usize {
        self.state.read().await.aggregate.fragment_count()
    }

    /// Last person analysis, for display.
    pub async fn person_analysis(&self) -> Option<Value> {
        self.state.read().await.person_analysis.clone()
    }

    /// Spawns the analysis-concern listener. The subscription deregisters
    /// itself when the task ends.
    pub fn spawn_listener(
        self: Arc<Self>,
        dispatcher: &MessageDispatcher,
    ) -> tokio::task::JoinHandle<()> {
        let mut subscription = dispatcher.subscribe(Topic::Analysis);
        tokio::spawn(async move {
            while let Some(message) = subscription.recv().await {
                self.handle_message(message).await;
            }
        })
    }
}
