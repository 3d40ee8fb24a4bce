//! Prometheus metrics for the voter.
//!
//! [`NodeMetrics`] owns a dedicated [`Registry`]; the daemon renders it in
//! the text exposition format when the voter stops.

use prometheus::{
    register_histogram_with_registry, register_int_counter_with_registry,
    register_int_gauge_with_registry, Encoder, Histogram, HistogramOpts, IntCounter, IntGauge,
    Opts, Registry, TextEncoder,
};

use crate::NodeError;

pub struct NodeMetrics {
    pub registry: Registry,

    // ── Counters ────────────────────────────────────────────────────────
    /// Client requests received directly from clients.
    pub client_requests: IntCounter,
    /// Account queries answered.
    pub queries_answered: IntCounter,
    /// Payloads dropped as malformed or badly signed.
    pub payloads_dropped: IntCounter,
    /// Transactions that became candidates.
    pub transactions_admitted: IntCounter,
    /// Votes accepted from other voters.
    pub votes_received: IntCounter,
    /// Votes ignored as stale or self-addressed.
    pub votes_ignored: IntCounter,
    /// Ledgers closed.
    pub ledgers_closed: IntCounter,
    /// Transactions skipped while closing a ledger.
    pub transactions_skipped: IntCounter,

    // ── Gauges ──────────────────────────────────────────────────────────
    pub ledger_number: IntGauge,
    pub round: IntGauge,
    pub candidate_count: IntGauge,

    // ── Histograms ──────────────────────────────────────────────────────
    /// Transactions applied per closed ledger.
    pub ledger_size: Histogram,
}

impl NodeMetrics {
    pub fn new() -> Result<Self, NodeError> {
        let registry = Registry::new();

        let client_requests = register_int_counter_with_registry!(
            Opts::new("arbiter_client_requests_total", "Client requests received"),
            registry
        )?;
        let queries_answered = register_int_counter_with_registry!(
            Opts::new("arbiter_queries_answered_total", "Account queries answered"),
            registry
        )?;
        let payloads_dropped = register_int_counter_with_registry!(
            Opts::new(
                "arbiter_payloads_dropped_total",
                "Payloads dropped as malformed or badly signed"
            ),
            registry
        )?;
        let transactions_admitted = register_int_counter_with_registry!(
            Opts::new(
                "arbiter_transactions_admitted_total",
                "Transactions that became consensus candidates"
            ),
            registry
        )?;
        let votes_received = register_int_counter_with_registry!(
            Opts::new("arbiter_votes_received_total", "Votes accepted from other voters"),
            registry
        )?;
        let votes_ignored = register_int_counter_with_registry!(
            Opts::new("arbiter_votes_ignored_total", "Stale or self-addressed votes"),
            registry
        )?;
        let ledgers_closed = register_int_counter_with_registry!(
            Opts::new("arbiter_ledgers_closed_total", "Ledgers closed"),
            registry
        )?;
        let transactions_skipped = register_int_counter_with_registry!(
            Opts::new(
                "arbiter_transactions_skipped_total",
                "Transactions skipped while closing a ledger"
            ),
            registry
        )?;

        let ledger_number = register_int_gauge_with_registry!(
            Opts::new("arbiter_ledger_number", "Number of the last closed ledger"),
            registry
        )?;
        let round = register_int_gauge_with_registry!(
            Opts::new("arbiter_round", "Current consensus round"),
            registry
        )?;
        let candidate_count = register_int_gauge_with_registry!(
            Opts::new("arbiter_candidate_count", "Transactions currently supported"),
            registry
        )?;

        let ledger_size = register_histogram_with_registry!(
            HistogramOpts::new("arbiter_ledger_size", "Transactions applied per ledger")
                .buckets(prometheus::exponential_buckets(1.0, 2.0, 12)?),
            registry
        )?;

        Ok(Self {
            registry,
            client_requests,
            queries_answered,
            payloads_dropped,
            transactions_admitted,
            votes_received,
            votes_ignored,
            ledgers_closed,
            transactions_skipped,
            ledger_number,
            round,
            candidate_count,
            ledger_size,
        })
    }

    /// Render every metric in the Prometheus text format.
    pub fn encode_text(&self) -> Result<String, NodeError> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()).into())
    }
}
