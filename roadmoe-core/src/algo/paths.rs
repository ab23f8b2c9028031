//! Enumeration of routes between network entrances and exits

use hashbrown::HashSet;
use itertools::Itertools;
use log::{debug, info, warn};
use petgraph::Direction;
use petgraph::algo::{all_simple_paths, astar};
use petgraph::graph::NodeIndex;
use rayon::prelude::*;

use crate::model::{NetworkModel, PathSystem};
use crate::{EdgeIdx, ModelConfig};

/// Build a path system for every route between an entrance and an exit.
///
/// Entrances and exits whose road edges all carry an excluded type are
/// skipped. Routes are enumerated in parallel, but entrances and exits are
/// visited in junction id order so the resulting ids are reproducible.
pub(crate) fn build_path_systems(model: &NetworkModel, config: &ModelConfig) -> Vec<PathSystem> {
    let excluded: HashSet<&str> = config.excluded_types.iter().map(String::as_str).collect();
    let entrances = endpoints(model, model.graph().entrances(), Direction::Outgoing, &excluded);
    let exits = endpoints(model, model.graph().exits(), Direction::Incoming, &excluded);
    debug!("{} entrances, {} exits", entrances.len(), exits.len());

    let routes: Vec<(NodeIndex, NodeIndex)> = entrances
        .iter()
        .copied()
        .cartesian_product(exits.iter().copied())
        .filter(|(source, target)| source != target)
        .collect();

    let node_paths: Vec<Vec<Vec<NodeIndex>>> = routes
        .par_iter()
        .map(|&(source, target)| route_paths(model, source, target, config))
        .collect();

    let mut paths = Vec::new();
    'routes: for route in node_paths {
        for (index, nodes) in route.iter().enumerate() {
            if config.max_paths.is_some_and(|cap| paths.len() >= cap) {
                warn!(
                    "Path limit of {} reached, remaining routes are skipped",
                    paths.len()
                );
                break 'routes;
            }
            if let Some(path) = path_system(model, nodes, index) {
                paths.push(path);
            }
        }
    }

    info!("Enumerated {} paths over {} routes", paths.len(), routes.len());
    paths
}

/// Candidate nodes, minus those touching only excluded edge types, sorted by
/// junction id
fn endpoints(
    model: &NetworkModel,
    candidates: impl Iterator<Item = NodeIndex>,
    direction: Direction,
    excluded: &HashSet<&str>,
) -> Vec<NodeIndex> {
    let road_graph = model.graph();
    let mut nodes: Vec<NodeIndex> = candidates
        .filter(|&node| {
            !road_graph.graph.edges_directed(node, direction).all(|link| {
                model.edges()[*link.weight()]
                    .edge_type
                    .as_deref()
                    .is_some_and(|edge_type| excluded.contains(edge_type))
            })
        })
        .collect();
    nodes.sort_by(|&a, &b| road_graph.junction_id(a).cmp(road_graph.junction_id(b)));
    nodes
}

/// Node sequences from `source` to `target`, honouring the route caps
fn route_paths(
    model: &NetworkModel,
    source: NodeIndex,
    target: NodeIndex,
    config: &ModelConfig,
) -> Vec<Vec<NodeIndex>> {
    let graph = &model.graph().graph;

    if config.shortest_paths {
        let edges = model.edges();
        return astar(
            graph,
            source,
            |node| node == target,
            |link| edges[*link.weight()].length(),
            |_| 0.0,
        )
        .map(|(_, nodes)| vec![nodes])
        .unwrap_or_default();
    }

    let found =
        all_simple_paths::<Vec<NodeIndex>, _>(graph, source, target, 0, config.max_path_nodes);
    // No single route can contribute more than the global cap either
    let Some(limit) = [config.max_paths_per_route, config.max_paths]
        .into_iter()
        .flatten()
        .min()
    else {
        return found.collect();
    };

    let mut paths: Vec<_> = found.take(limit + 1).collect();
    if paths.len() > limit {
        if config.max_paths_per_route == Some(limit) {
            warn!(
                "More than {limit} paths from {} to {}, keeping the first {limit}",
                model.graph().junction_id(source),
                model.graph().junction_id(target)
            );
        }
        paths.truncate(limit);
    }
    paths
}

fn path_system(model: &NetworkModel, nodes: &[NodeIndex], index: usize) -> Option<PathSystem> {
    let road_graph = model.graph();
    let route: Vec<EdgeIdx> = nodes
        .iter()
        .tuple_windows()
        .filter_map(|(&a, &b)| road_graph.edge_between(a, b))
        .collect();
    let (&first, &last) = (route.first()?, route.last()?);

    // Each junction contributes its internal edges ahead of the edge leaving it
    let mut seen = HashSet::new();
    let mut edges = Vec::new();
    for (position, &node) in nodes.iter().enumerate() {
        let internal = model
            .junction(road_graph.junction_id(node))
            .into_iter()
            .flat_map(|junction| junction.internal_edges.iter())
            .filter_map(|id| model.edge_idx(id));
        for edge in internal.chain(route.get(position).copied()) {
            if seen.insert(edge) {
                edges.push(edge);
            }
        }
    }

    let all_edges = model.edges();
    Some(PathSystem {
        id: format!("{}->{}|{index}", all_edges[first].id, all_edges[last].id),
        length: route.iter().map(|&edge| all_edges[edge].length()).sum(),
        exits: model.downstream_exits(&edges),
        route,
        edges,
        counters: Default::default(),
    })
}
