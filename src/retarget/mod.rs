//! # Retarget Orchestrator
//!
//! Main entry points for moving a Blueprint graph onto a new parent class.

mod order;

pub use order::{processing_order, OrderedNode};

use crate::config::RetargetConfig;
use crate::error::{Result, RetargetError};
use crate::graph::{BlueprintGraph, GraphNode};
use crate::hierarchy::ClassRegistry;
use crate::remap::{ConnectionValidator, ConnectionVerdict, NodeRemapper, RemappedNodes};
use crate::report::{DroppedConnection, Issue, ReportBuilder, RetargetReport};
use crate::reparent::{preflight, TargetFilter};
use crate::symbols::{SymbolResolver, TargetContext};

/// Phases of a single retarget run, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RetargetPhase {
    Pending,
    Resolving,
    Remapping,
    Validating,
    Done,
}

/// Result of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetargetOutput {
    /// The retargeted graph. Holds only nodes that remapped and links that
    /// survived validation.
    pub graph: BlueprintGraph,
    pub report: RetargetReport,
    /// Nodes that failed to remap, with their original kind and pin shape.
    pub quarantined: Vec<GraphNode>,
}

/// Retarget a Blueprint graph onto `target` with the default configuration
///
/// # Arguments
///
/// * `graph` - The graph to retarget. It is never modified.
/// * `registry` - Class descriptors for the target and its ancestors
/// * `target` - Name of the new parent class
///
/// # Returns
///
/// * `Ok(RetargetOutput)` - The new graph, its report and any quarantined nodes
/// * `Err(RetargetError)` - The input is malformed or the target is unusable
///
/// # Examples
///
/// ```rust,no_run
/// use bpretarget::{retarget_graph, BlueprintGraph, ClassRegistry, GraphId};
///
/// let graph = BlueprintGraph::new(GraphId(0), "BP_Door").with_parent("OldDoorBase");
/// let registry = ClassRegistry::new();
/// match retarget_graph(&graph, &registry, "DoorBase") {
///     Ok(output) => println!("{:?}", output.report.summary),
///     Err(e) => eprintln!("Retarget failed: {}", e),
/// }
/// ```
pub fn retarget_graph(graph: &BlueprintGraph, registry: &ClassRegistry, target: &str) -> Result<RetargetOutput> {
    retarget_graph_with_config(graph, registry, target, &RetargetConfig::default())
}

/// Retarget a Blueprint graph with an explicit configuration
///
/// The configuration carries the rename map used when a symbol has no
/// same-named counterpart on the target, and the reparenting rule switches.
pub fn retarget_graph_with_config(
    graph: &BlueprintGraph,
    registry: &ClassRegistry,
    target: &str,
    config: &RetargetConfig,
) -> Result<RetargetOutput> {
    Retargeter::new(graph, registry, target, config).run()
}

/// Retarget several Blueprints onto the same target
///
/// The reparenting rules are evaluated once over the whole selection, so a
/// rejected target fails the batch as a whole. Each graph is then retargeted
/// independently; a malformed graph only fails its own entry.
pub fn retarget_batch(
    graphs: &[BlueprintGraph],
    registry: &ClassRegistry,
    target: &str,
    config: &RetargetConfig,
) -> Result<Vec<Result<RetargetOutput>>> {
    tracing::info!("[RETARGET] Batch of {} graphs onto '{}'", graphs.len(), target);

    if !registry.contains(target) {
        return Err(RetargetError::UnknownClass {
            name: target.to_string(),
        });
    }
    if graphs.is_empty() {
        return Ok(Vec::new());
    }

    if config.enforce_reparenting_rules {
        let selection: Vec<&BlueprintGraph> = graphs.iter().collect();
        let filter = TargetFilter::for_blueprints(registry, &config.roots, &selection);
        if let Some(reason) = filter.rejection(registry, target) {
            return Err(RetargetError::TargetRejected {
                target: target.to_string(),
                reason,
            });
        }
    }

    let per_graph = RetargetConfig {
        enforce_reparenting_rules: false,
        ..config.clone()
    };

    Ok(graphs
        .iter()
        .map(|graph| retarget_graph_with_config(graph, registry, target, &per_graph))
        .collect())
}

/// Drives one graph through `Pending → Resolving → Remapping → Validating → Done`.
pub struct Retargeter<'a> {
    graph: &'a BlueprintGraph,
    registry: &'a ClassRegistry,
    target: &'a str,
    config: &'a RetargetConfig,
    phase: RetargetPhase,
}

impl<'a> Retargeter<'a> {
    /// Prepares a run; nothing is checked until [`Retargeter::run`].
    pub fn new(
        graph: &'a BlueprintGraph,
        registry: &'a ClassRegistry,
        target: &'a str,
        config: &'a RetargetConfig,
    ) -> Self {
        Self {
            graph,
            registry,
            target,
            config,
            phase: RetargetPhase::Pending,
        }
    }

    /// The phase reached by the last call to [`Retargeter::run`].
    pub fn phase(&self) -> RetargetPhase {
        self.phase
    }

    fn advance(&mut self, next: RetargetPhase) {
        debug_assert!(next > self.phase, "phase {:?} cannot follow {:?}", next, self.phase);
        tracing::debug!("[RETARGET] {:?} -> {:?}", self.phase, next);
        self.phase = next;
    }

    /// Runs the whole pipeline. Nothing is produced unless every phase
    /// completes.
    pub fn run(&mut self) -> Result<RetargetOutput> {
        self.phase = RetargetPhase::Pending;
        let graph = self.graph;
        let registry = self.registry;
        let target = self.target;

        tracing::info!("[RETARGET] Starting retarget");
        tracing::info!(
            "[RETARGET] Graph: {} ({} nodes, {} connections) {} -> {}",
            graph.name,
            graph.node_count(),
            graph.connection_count(),
            graph.parent_class.as_deref().unwrap_or("[None]"),
            target
        );

        // Phase 0: Structural and class checks
        graph.validate_structure()?;
        self.check_target()?;

        let mut report = ReportBuilder::new();
        report.add_class_warnings(preflight(graph, target, registry));

        let order = processing_order(graph);

        // Phase 1: Resolve symbols
        self.advance(RetargetPhase::Resolving);
        tracing::info!("[RETARGET] Phase 1: Resolving symbols...");
        let resolver = SymbolResolver::new(self.config);
        let ctx = TargetContext::new(registry, target);
        let symbols = order
            .iter()
            .filter_map(|o| graph.node(o.id))
            .flat_map(|n| n.kind.required_symbols());
        let bindings = resolver.resolve_all(symbols, &ctx);
        tracing::info!(
            "[RETARGET]   - {} symbols, {} unresolved",
            bindings.len(),
            bindings.values().filter(|b| !b.is_resolved()).count()
        );

        // Phase 2: Remap nodes
        self.advance(RetargetPhase::Remapping);
        tracing::info!("[RETARGET] Phase 2: Remapping nodes...");
        let remapper = NodeRemapper::new(graph, &bindings);
        let mut remapped = RemappedNodes::new();
        for entry in &order {
            let Some(node) = graph.node(entry.id) else {
                continue;
            };
            let result = remapper.remap(node);
            report.visit(node.id, node.title(), entry.unreachable);
            for issue in &result.issues {
                report.add_issue(node.id, issue.clone());
            }
            if result.failed {
                report.mark_failed(node.id);
            }
            remapped.insert(result);
        }

        // Phase 3: Validate connections
        self.advance(RetargetPhase::Validating);
        tracing::info!("[RETARGET] Phase 3: Validating connections...");
        let mut output = BlueprintGraph::new(graph.id, graph.name.clone()).with_parent(target);
        output.generated_class = graph.generated_class.clone();
        output.kind = graph.kind;
        output.interfaces = graph.interfaces.clone();

        let validator = ConnectionValidator::new(registry);
        let mut valid_links = Vec::new();
        for conn in graph.connections() {
            let verdict = validator.validate(&conn, &remapped);
            if verdict == ConnectionVerdict::Valid {
                valid_links.push(conn);
                report.record_connection(None);
                continue;
            }

            let from_node = graph.pin(conn.from).map(|p| p.owner);
            let to_node = graph.pin(conn.to).map(|p| p.owner);
            tracing::warn!(
                "[RETARGET] Dropping link {} -> {} ({:?})",
                conn.from,
                conn.to,
                verdict
            );

            if verdict == ConnectionVerdict::Incompatible {
                if let (Some((from, from_pin)), Some((to, to_pin))) =
                    (remapped.pin(conn.from), remapped.pin(conn.to))
                {
                    let issue = Issue::IncompatibleConnection {
                        pin: from_pin.id,
                        peer: to_pin.id,
                        from_type: from_pin.ty.clone(),
                        to_type: to_pin.ty.clone(),
                    };
                    report.add_issue(from.node.id, issue.clone());
                    if to.node.id != from.node.id {
                        report.add_issue(to.node.id, issue);
                    }
                }
            }

            if let (Some(from_node), Some(to_node)) = (from_node, to_node) {
                report.record_connection(Some(DroppedConnection {
                    connection: conn,
                    from_node,
                    to_node,
                    verdict,
                }));
            }
        }

        let mut quarantined = Vec::new();
        for node in remapped.into_nodes() {
            if node.failed {
                quarantined.push(node.node);
            } else {
                output.insert_node_with_pins(node.node, node.pins);
            }
        }
        for conn in valid_links {
            output.connect(conn.from, conn.to)?;
        }

        // Phase 4: Report
        self.advance(RetargetPhase::Done);
        let report = report.build(graph.name.clone(), graph.parent_class.clone(), target.to_string());

        tracing::info!(
            "[RETARGET] Done: {} migrated, {} with warnings, {} failed, {} unreachable",
            report.summary.migrated,
            report.summary.warning,
            report.summary.failed,
            report.summary.unreachable
        );
        tracing::info!(
            "[RETARGET] Links: {} kept, {} incompatible, {} orphaned",
            report.connections.valid,
            report.connections.incompatible,
            report.connections.orphaned
        );

        Ok(RetargetOutput {
            graph: output,
            report,
            quarantined,
        })
    }

    fn check_target(&self) -> Result<()> {
        if !self.registry.contains(self.target) {
            return Err(RetargetError::UnknownClass {
                name: self.target.to_string(),
            });
        }

        if self.config.enforce_reparenting_rules {
            let filter = TargetFilter::for_blueprints(self.registry, &self.config.roots, &[self.graph]);
            if let Some(reason) = filter.rejection(self.registry, self.target) {
                return Err(RetargetError::TargetRejected {
                    target: self.target.to_string(),
                    reason,
                });
            }
        }

        if self.graph.parent_class.as_deref() == Some(self.target) {
            tracing::info!("[RETARGET] '{}' is already the parent class", self.target);
        }
        Ok(())
    }
}
