//! Processing order for a retarget run.
//!
//! 1. Event nodes, ascending id, then a breadth-first walk over exec links
//!    with successors taken in ascending id. Loops are visited once.
//! 2. Pure nodes (no exec pins) that feed a reached node through data links.
//! 3. Everything else, ascending id, flagged unreachable.

use std::collections::{BTreeSet, VecDeque};

use petgraph::graphmap::DiGraphMap;
use petgraph::Direction;

use crate::graph::{BlueprintGraph, GraphNode, NodeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderedNode {
    pub id: NodeId,
    pub unreachable: bool,
}

/// Node-level views of the exec and data links of a graph.
struct FlowGraphs {
    exec: DiGraphMap<NodeId, ()>,
    data: DiGraphMap<NodeId, ()>,
}

impl FlowGraphs {
    fn build(graph: &BlueprintGraph) -> Self {
        let mut exec = DiGraphMap::new();
        let mut data = DiGraphMap::new();
        for node in graph.nodes() {
            exec.add_node(node.id);
            data.add_node(node.id);
        }

        for conn in graph.connections() {
            let (Some(from), Some(to)) = (graph.pin(conn.from), graph.pin(conn.to)) else {
                continue;
            };
            if from.is_exec() {
                exec.add_edge(from.owner, to.owner, ());
            } else {
                data.add_edge(from.owner, to.owner, ());
            }
        }

        Self { exec, data }
    }

    fn sorted_neighbors(map: &DiGraphMap<NodeId, ()>, node: NodeId, dir: Direction) -> Vec<NodeId> {
        let mut next: Vec<NodeId> = map.neighbors_directed(node, dir).collect();
        next.sort();
        next.dedup();
        next
    }
}

fn is_pure(graph: &BlueprintGraph, node: &GraphNode) -> bool {
    node.pin_ids()
        .filter_map(|id| graph.pin(id))
        .all(|pin| !pin.is_exec())
}

pub fn processing_order(graph: &BlueprintGraph) -> Vec<OrderedNode> {
    let flow = FlowGraphs::build(graph);
    let mut visited: BTreeSet<NodeId> = BTreeSet::new();
    let mut reached: Vec<NodeId> = Vec::with_capacity(graph.node_count());

    // Exec walk from every event.
    let mut queue: VecDeque<NodeId> = graph
        .nodes()
        .filter(|n| n.kind.is_event())
        .map(|n| n.id)
        .collect();
    visited.extend(queue.iter().copied());

    while let Some(current) = queue.pop_front() {
        reached.push(current);
        for next in FlowGraphs::sorted_neighbors(&flow.exec, current, Direction::Outgoing) {
            if visited.insert(next) {
                queue.push_back(next);
            }
        }
    }

    // Pure feeders of anything reached so far, including other feeders.
    let mut cursor = 0;
    while cursor < reached.len() {
        let consumer = reached[cursor];
        cursor += 1;
        for feeder in FlowGraphs::sorted_neighbors(&flow.data, consumer, Direction::Incoming) {
            let pure = graph.node(feeder).is_some_and(|n| is_pure(graph, n));
            if pure && visited.insert(feeder) {
                reached.push(feeder);
            }
        }
    }

    let mut order: Vec<OrderedNode> = reached
        .into_iter()
        .map(|id| OrderedNode { id, unreachable: false })
        .collect();
    order.extend(
        graph
            .nodes()
            .filter(|n| !visited.contains(&n.id))
            .map(|n| OrderedNode {
                id: n.id,
                unreachable: true,
            }),
    );
    order
}
