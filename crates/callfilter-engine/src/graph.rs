//! Dependency-graph scheduler for call filters
//!
//! One `FilterGraph` is built per incoming call, started exactly once, and
//! delivers exactly one verdict to its listener: the combined result of all
//! filters when they all resolve in time, or the best aggregate computed so
//! far when the timeout fires first.

use crate::filter::{CallFilter, PassthroughFilter};
use callfilter_common::{IncomingCall, Verdict};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// Scheduler configuration.
#[derive(Debug, Clone)]
pub struct GraphConfig {
    /// Upper bound on the whole filtering decision
    pub timeout: Duration,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(5000),
        }
    }
}

/// Per-graph counters.
#[derive(Debug, Default)]
pub struct GraphStats {
    /// Nodes handed to the executor (includes the two synthetic nodes)
    pub filters_scheduled: AtomicU64,
    /// 1 when the graph finished via the timeout path
    pub timed_out: AtomicU64,
    /// Lookup results that arrived after the graph had finished
    pub late_results_discarded: AtomicU64,
}

/// Receives the final verdict for a call. Invoked exactly once per graph.
pub trait FilterGraphListener: Send + Sync {
    /// Deliver the final verdict.
    fn on_complete(&self, verdict: Verdict);
}

/// Opaque reference to a filter added to a graph, used to declare edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterHandle(NodeId);

type NodeId = usize;

const START: NodeId = 0;
const COMPLETION: NodeId = 1;

struct NodeRecord {
    filter: Arc<dyn CallFilter>,
    deps: Vec<NodeId>,
    followers: Vec<NodeId>,
    indegree: usize,
    result: Option<Verdict>,
}

impl NodeRecord {
    fn new(filter: Arc<dyn CallFilter>) -> Self {
        Self {
            filter,
            deps: Vec::new(),
            followers: Vec::new(),
            indegree: 0,
            result: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GraphState {
    Building,
    Running,
    Finished,
}

struct NodeFinished {
    node: NodeId,
    verdict: Verdict,
}

/// The DAG scheduler orchestrating all filters for one call.
///
/// Filters and edges are added while the graph is building;
/// [`perform_filtering`](Self::perform_filtering) consumes the graph, so a
/// graph cannot be started twice or reused across calls.
pub struct FilterGraph {
    call: IncomingCall,
    listener: Arc<dyn FilterGraphListener>,
    config: GraphConfig,
    nodes: Vec<NodeRecord>,
    state: GraphState,
    stats: Arc<GraphStats>,
}

impl FilterGraph {
    /// Create a graph for one incoming call.
    pub fn new(
        call: IncomingCall,
        listener: Arc<dyn FilterGraphListener>,
        config: GraphConfig,
    ) -> Self {
        let nodes = vec![
            NodeRecord::new(Arc::new(PassthroughFilter::new("start"))),
            NodeRecord::new(Arc::new(PassthroughFilter::new("completion"))),
        ];
        Self {
            call,
            listener,
            config,
            nodes,
            state: GraphState::Building,
            stats: Arc::new(GraphStats::default()),
        }
    }

    /// Add a filter to the graph.
    pub fn add_filter(&mut self, filter: Arc<dyn CallFilter>) -> FilterHandle {
        debug!(filter = filter.name(), call_id = %self.call.id, "adding filter");
        self.nodes.push(NodeRecord::new(filter));
        FilterHandle(self.nodes.len() - 1)
    }

    /// Declare that `after` must not run until `before` has resolved.
    ///
    /// `after` receives the combination of all its dependencies' verdicts,
    /// folded left-to-right in the order the edges were declared.
    pub fn add_edge(&mut self, before: FilterHandle, after: FilterHandle) {
        self.wire(before.0, after.0);
    }

    /// Counters for this graph; the handle stays valid after the graph is
    /// consumed by [`perform_filtering`](Self::perform_filtering).
    pub fn stats(&self) -> Arc<GraphStats> {
        Arc::clone(&self.stats)
    }

    /// Start filtering. Consumes the graph; the verdict is reported to the
    /// listener exactly once, within the configured timeout.
    pub fn perform_filtering(mut self) {
        for node in 2..self.nodes.len() {
            self.wire(START, node);
            self.wire(node, COMPLETION);
        }
        // Direct start->completion edge so an empty graph still completes.
        self.wire(START, COMPLETION);
        self.state = GraphState::Running;

        info!(
            call_id = %self.call.id,
            filters = self.nodes.len() - 2,
            timeout_ms = self.config.timeout.as_millis() as u64,
            "starting call filtering"
        );

        let (tx, rx) = mpsc::unbounded_channel();
        let scheduler = Scheduler {
            call: self.call,
            listener: self.listener,
            timeout: self.config.timeout,
            nodes: self.nodes,
            stats: self.stats,
            state: self.state,
            snapshot: Verdict::permissive(),
            tx,
            rx,
        };
        tokio::spawn(scheduler.run());
    }

    fn wire(&mut self, before: NodeId, after: NodeId) {
        self.nodes[before].followers.push(after);
        self.nodes[after].deps.push(before);
        self.nodes[after].indegree += 1;
    }
}

/// Single-consumer actor owning all graph bookkeeping.
///
/// Indegree decrements, result slots and the aggregate snapshot are only
/// touched here; lookups run as spawned tasks and post completions back
/// through the channel, so none of this state needs a lock.
struct Scheduler {
    call: IncomingCall,
    listener: Arc<dyn FilterGraphListener>,
    timeout: Duration,
    nodes: Vec<NodeRecord>,
    stats: Arc<GraphStats>,
    state: GraphState,
    snapshot: Verdict,
    tx: mpsc::UnboundedSender<NodeFinished>,
    rx: mpsc::UnboundedReceiver<NodeFinished>,
}

impl Scheduler {
    async fn run(mut self) {
        let deadline = sleep(self.timeout);
        tokio::pin!(deadline);

        self.schedule(START);

        while self.state == GraphState::Running {
            tokio::select! {
                // The scheduler holds a sender, so recv() cannot yield None
                // while this loop runs.
                Some(finished) = self.rx.recv() => self.on_node_finished(finished),
                _ = &mut deadline => self.on_timeout().await,
            }
        }
        // Dropping the receiver here makes any still-outstanding lookup's
        // send fail, which is how late results are discarded.
    }

    /// Fold the dependencies' verdicts and hand the node to the executor.
    fn schedule(&mut self, node: NodeId) {
        let mut aggregate = Verdict::permissive();
        for &dep in &self.nodes[node].deps {
            if let Some(result) = &self.nodes[dep].result {
                aggregate = aggregate.combine(result);
            }
        }
        // The timeout path delivers whatever aggregate was computed last.
        self.snapshot = aggregate.clone();
        self.stats.filters_scheduled.fetch_add(1, Ordering::Relaxed);

        let filter = Arc::clone(&self.nodes[node].filter);
        let tx = self.tx.clone();
        let stats = Arc::clone(&self.stats);
        debug!(filter = filter.name(), call_id = %self.call.id, "scheduling filter");
        tokio::spawn(async move {
            let verdict = filter.start_lookup(aggregate).await;
            if tx.send(NodeFinished { node, verdict }).is_err() {
                stats.late_results_discarded.fetch_add(1, Ordering::Relaxed);
            }
        });
    }

    fn on_node_finished(&mut self, finished: NodeFinished) {
        let record = &mut self.nodes[finished.node];
        if record.result.is_some() {
            return;
        }
        record.result = Some(finished.verdict.clone());
        debug!(filter = record.filter.name(), call_id = %self.call.id, "filter resolved");

        if finished.node == COMPLETION {
            self.deliver(finished.verdict);
            return;
        }

        let followers = record.followers.clone();
        for follower in followers {
            self.nodes[follower].indegree -= 1;
            if self.nodes[follower].indegree == 0 {
                self.schedule(follower);
            }
        }
    }

    /// Degraded completion: deliver the last aggregate and release any
    /// external bindings still outstanding. In-flight lookups without a
    /// cancel operation keep running; their results are discarded.
    async fn on_timeout(&mut self) {
        warn!(call_id = %self.call.id, "call filtering timed out, delivering best aggregate");
        self.stats.timed_out.fetch_add(1, Ordering::Relaxed);

        for record in self.nodes.iter().skip(2) {
            if record.result.is_none() {
                record.filter.cancel().await;
            }
        }

        let snapshot = self.snapshot.clone();
        self.deliver(snapshot);
    }

    /// Write-once transition into `Finished`; the single place the listener
    /// is invoked.
    fn deliver(&mut self, verdict: Verdict) {
        if self.state == GraphState::Finished {
            return;
        }
        self.state = GraphState::Finished;
        info!(
            call_id = %self.call.id,
            allow = verdict.allow_call,
            reject = verdict.reject,
            reason = ?verdict.block_reason,
            "call filtering complete"
        );
        self.listener.on_complete(verdict);
    }
}
