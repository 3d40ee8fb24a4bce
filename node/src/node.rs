//! The voter actor.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use arbiter_consensus::{ConsensusConfig, ConsensusRound, Proposal, RoundAction, VoteOutcome};
use arbiter_crypto::{derive_account_id, Ed25519Verifier, SignatureVerifier};
use arbiter_ledger::{ApplyReport, Ledger};
use arbiter_messages::{
    decode_b64, decode_b64_json, ClientResponse, Envelope, Secondhand, VoterMessage,
};
use arbiter_network::{Inbound, NetworkError, SessionId, Transport};
use arbiter_store_lmdb::LmdbStore;
use arbiter_transactions::{
    admit, Admitted, ErrorReport, QueryState, SignedStructure, TransactionSummary,
};
use arbiter_types::{AccountId, KeyPair, LedgerHash};
use tokio::sync::{broadcast, mpsc};
use tokio::time::MissedTickBehavior;

use crate::{NodeConfig, NodeError, NodeMetrics};

/// One voter: its key, its consensus state (which owns the ledger) and
/// the transport it talks through.
pub struct VoterNode<T: Transport> {
    keys: KeyPair,
    account_id: AccountId,
    round: ConsensusRound,
    transport: T,
    verifier: Box<dyn SignatureVerifier>,
    metrics: Arc<NodeMetrics>,
}

impl<T: Transport> VoterNode<T> {
    pub fn new(
        keys: KeyPair,
        ledger: Ledger,
        config: ConsensusConfig,
        transport: T,
        verifier: Box<dyn SignatureVerifier>,
        metrics: Arc<NodeMetrics>,
    ) -> Result<Self, NodeError> {
        let account_id = derive_account_id(&keys.public);
        let round = ConsensusRound::new(account_id.clone(), ledger, config)?;
        metrics
            .ledger_number
            .set(round.ledger().current_ledger_number() as i64);
        Ok(Self {
            keys,
            account_id,
            round,
            transport,
            verifier,
            metrics,
        })
    }

    /// Open (or create) the LMDB ledger under `config.data_dir` and build a
    /// voter that checks real Ed25519 signatures.
    pub fn open(config: &NodeConfig, transport: T) -> Result<Self, NodeError> {
        config.validate()?;
        let store = LmdbStore::open(Path::new(&config.data_dir), config.map_size_bytes())?;
        let ledger = Ledger::open(
            Arc::new(store),
            &config.genesis,
            config.consensus.transaction_fee,
        )?;
        Self::new(
            config.keypair()?,
            ledger,
            config.consensus.clone(),
            transport,
            Box::new(Ed25519Verifier),
            Arc::new(NodeMetrics::new()?),
        )
    }

    pub fn account_id(&self) -> &AccountId {
        &self.account_id
    }

    pub fn round(&self) -> &ConsensusRound {
        &self.round
    }

    pub fn ledger(&self) -> &Ledger {
        self.round.ledger()
    }

    pub fn metrics(&self) -> &Arc<NodeMetrics> {
        &self.metrics
    }

    /// Begin a fresh epoch. Nothing from before a restart is kept.
    pub fn start(&mut self) {
        self.round.start();
        self.update_round_gauges();
        tracing::info!(
            account = %self.account_id,
            session = %self.transport.session(),
            ledger_number = self.ledger().current_ledger_number(),
            "voter started"
        );
    }

    /// Drive the voter until `shutdown` fires or the relay goes away.
    pub async fn run(
        mut self,
        mut inbound: mpsc::Receiver<Inbound>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), NodeError> {
        let period = Duration::from_millis(self.round.config().round_duration_ms);
        let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.start();

        loop {
            tokio::select! {
                biased;
                _ = shutdown.recv() => {
                    tracing::info!("voter shutting down");
                    if let Ok(text) = self.metrics.encode_text() {
                        tracing::debug!(metrics = %text, "final metrics");
                    }
                    return Ok(());
                }
                _ = ticker.tick() => self.tick()?,
                message = inbound.recv() => match message {
                    Some(message) => self.handle_inbound(message)?,
                    None => return Err(NetworkError::Disconnected.into()),
                },
            }
        }
    }

    /// Round timer expiry.
    pub fn tick(&mut self) -> Result<(), NodeError> {
        let actions = self.round.advance_round()?;
        for action in actions {
            self.perform(action)?;
        }
        self.update_round_gauges();
        Ok(())
    }

    /// Route one relay delivery. Undecodable or badly signed payloads are
    /// logged and dropped; only storage and transport failures are errors.
    pub fn handle_inbound(&mut self, inbound: Inbound) -> Result<(), NodeError> {
        let envelope = match Envelope::from_bytes(&inbound.payload) {
            Ok(envelope) => envelope,
            Err(e) => {
                self.drop_payload(inbound.origin, &e);
                return Ok(());
            }
        };
        match envelope {
            Envelope::ClientRequest { request } => {
                self.metrics.client_requests.inc();
                self.on_client_request(inbound.origin, &request)
            }
            Envelope::VoterMessage(VoterMessage::Vote {
                account_id,
                proposal,
                lcl_hash,
            }) => self.on_vote(inbound.origin, account_id, &proposal, lcl_hash),
            Envelope::VoterMessage(VoterMessage::Secondhand { secondhand }) => {
                self.on_secondhand(inbound.origin, &secondhand)
            }
        }
    }

    fn on_client_request(&mut self, origin: SessionId, encoded: &str) -> Result<(), NodeError> {
        let request = match decode_b64(encoded)
            .map_err(NodeError::from)
            .and_then(|raw| SignedStructure::from_json(&raw).map_err(NodeError::from))
        {
            Ok(request) => request,
            Err(e) => {
                self.drop_payload(origin, &e);
                return Ok(());
            }
        };
        match admit(&request, self.verifier.as_ref()) {
            Ok(Admitted::Query(query)) => self.answer_query(origin, &query),
            Ok(Admitted::Transaction(tx)) => self.offer(tx, Secondhand::Request(request)),
            Err(e) => {
                self.drop_payload(origin, &e);
                Ok(())
            }
        }
    }

    fn on_vote(
        &mut self,
        origin: SessionId,
        sender: AccountId,
        encoded: &str,
        lcl_hash: LedgerHash,
    ) -> Result<(), NodeError> {
        let proposal = match decode_b64(encoded)
            .map_err(NodeError::from)
            .and_then(|raw| Proposal::from_json(&raw).map_err(NodeError::from))
        {
            Ok(proposal) => proposal,
            Err(e) => {
                self.drop_payload(origin, &e);
                return Ok(());
            }
        };
        let round = proposal.round;
        match self.round.receive_vote(sender.clone(), proposal, lcl_hash) {
            VoteOutcome::Accepted | VoteOutcome::Replaced => {
                tracing::trace!(%sender, round, "vote recorded");
                self.metrics.votes_received.inc();
            }
            VoteOutcome::Stale | VoteOutcome::OwnVote => self.metrics.votes_ignored.inc(),
        }
        Ok(())
    }

    fn on_secondhand(&mut self, origin: SessionId, encoded: &str) -> Result<(), NodeError> {
        let gossip: Secondhand = match decode_b64_json(encoded) {
            Ok(gossip) => gossip,
            Err(e) => {
                self.drop_payload(origin, &e);
                return Ok(());
            }
        };
        match gossip {
            Secondhand::Request(request) => match admit(&request, self.verifier.as_ref()) {
                Ok(Admitted::Transaction(tx)) => self.offer(tx, Secondhand::Request(request)),
                Ok(Admitted::Query(_)) => {
                    tracing::debug!(%origin, "relayed query ignored");
                    Ok(())
                }
                Err(e) => {
                    self.drop_payload(origin, &e);
                    Ok(())
                }
            },
            Secondhand::Coinstake(claim) => {
                let tx = TransactionSummary::from(claim.clone());
                self.offer(tx, Secondhand::Coinstake(claim))
            }
        }
    }

    /// Hand `tx` to consensus and flood `gossip` if it was new and valid.
    fn offer(&mut self, tx: TransactionSummary, gossip: Secondhand) -> Result<(), NodeError> {
        if self.round.receive_transaction(tx)? {
            self.metrics.transactions_admitted.inc();
            self.broadcast(Envelope::secondhand(&gossip)?)?;
            self.update_round_gauges();
        }
        Ok(())
    }

    /// Reply to a query with a signed account row, or a signed error when
    /// the account does not exist.
    fn answer_query(&mut self, origin: SessionId, query: &QueryState) -> Result<(), NodeError> {
        let result = match self.ledger().account_state(&query.account)? {
            Some(state) => SignedStructure::sign(&state, &self.keys)?,
            None => SignedStructure::sign(
                &ErrorReport {
                    message: format!("unknown account {}", query.account),
                },
                &self.keys,
            )?,
        };
        let response = ClientResponse { result }.to_bytes()?;
        self.send(origin, response)?;
        self.metrics.queries_answered.inc();
        Ok(())
    }

    fn perform(&mut self, action: RoundAction) -> Result<(), NodeError> {
        match action {
            RoundAction::BroadcastVote { proposal, lcl_hash } => {
                let envelope = Envelope::vote(self.account_id.clone(), &proposal, lcl_hash)?;
                self.broadcast(envelope)
            }
            RoundAction::GossipCoinstake(claim) => {
                self.broadcast(Envelope::secondhand(&Secondhand::Coinstake(claim))?)
            }
            RoundAction::Finalized(report) => {
                self.record_close(&report);
                Ok(())
            }
        }
    }

    fn record_close(&self, report: &ApplyReport) {
        self.metrics.ledgers_closed.inc();
        self.metrics.ledger_number.set(report.ledger_number as i64);
        self.metrics
            .transactions_skipped
            .inc_by(report.skipped.len() as u64);
        self.metrics.ledger_size.observe(report.applied.len() as f64);
    }

    fn broadcast(&self, envelope: Envelope) -> Result<(), NodeError> {
        match self.transport.broadcast(envelope.to_bytes()?) {
            Err(e @ (NetworkError::QueueFull | NetworkError::PayloadTooLarge { .. })) => {
                tracing::warn!(error = %e, "broadcast dropped");
                self.metrics.payloads_dropped.inc();
                Ok(())
            }
            other => Ok(other?),
        }
    }

    fn send(&self, target: SessionId, payload: Vec<u8>) -> Result<(), NodeError> {
        match self.transport.send_to(target, payload) {
            Err(e @ (NetworkError::QueueFull | NetworkError::PayloadTooLarge { .. })) => {
                tracing::warn!(%target, error = %e, "response dropped");
                self.metrics.payloads_dropped.inc();
                Ok(())
            }
            other => Ok(other?),
        }
    }

    fn drop_payload(&self, origin: SessionId, reason: &dyn std::fmt::Display) {
        tracing::debug!(%origin, %reason, "payload dropped");
        self.metrics.payloads_dropped.inc();
    }

    fn update_round_gauges(&self) {
        self.metrics.round.set(self.round.round() as i64);
        self.metrics
            .candidate_count
            .set(self.round.candidate_ids().count() as i64);
    }
}
