use std::fmt;

use geo::{BoundingRect, MultiPoint, Rect};
use hashbrown::{HashMap, HashSet};
use log::{debug, info};

use super::components::{Edge, Junction};
use super::graph::RoadGraph;
use crate::algo::{build_path_systems, partition_sections};
use crate::analysis::MetricRecord;
use crate::loading::records::{EdgeRecord, JunctionRecord, NetworkRecords};
use crate::model::systems::{AggregateSystem, Group, Moe, PathSystem, Section, System};
use crate::{EdgeIdx, Error, JunctionIdx, ModelConfig, SectionIdx, Seconds};

/// Incoming and outgoing edges of one junction
#[derive(Debug, Clone, Default)]
pub struct Adjacency {
    pub incoming: Vec<EdgeIdx>,
    pub outgoing: Vec<EdgeIdx>,
}

impl Adjacency {
    /// More than one way in or more than one way out
    pub fn is_intersection(&self) -> bool {
        self.incoming.len() > 1 || self.outgoing.len() > 1
    }
}

/// Road network with its edge, section, path and group systems.
///
/// Edges and junctions live in flat registries addressed by index; junction
/// to edge relations go through a precomputed adjacency index. The model owns
/// every counter, so concurrent analyses of one network need separate models.
#[derive(Debug, Clone)]
pub struct NetworkModel {
    pub(crate) edges: Vec<Edge>,
    pub(crate) edge_index: HashMap<String, EdgeIdx>,
    pub(crate) junctions: Vec<Junction>,
    pub(crate) junction_index: HashMap<String, JunctionIdx>,
    pub(crate) adjacency: Vec<Adjacency>,
    pub(crate) graph: RoadGraph,
    pub(crate) sections: Vec<Section>,
    pub(crate) section_of_edge: Vec<Option<SectionIdx>>,
    pub(crate) paths: Vec<PathSystem>,
    pub(crate) groups: Vec<Group>,
    bounds: Option<Rect<f64>>,
}

impl NetworkModel {
    /// # Errors
    ///
    /// Returns an error if a record is malformed, an edge has no lanes or ids repeat
    pub fn from_records(records: &NetworkRecords, config: &ModelConfig) -> Result<Self, Error> {
        Self::new(&records.edges, &records.junctions, config)
    }

    /// Build edges and junctions, partition them into sections and enumerate
    /// paths between network entrances and exits.
    ///
    /// # Errors
    ///
    /// Returns an error if a record is malformed, an edge has no lanes or ids repeat
    pub fn new(
        edge_records: &[EdgeRecord],
        junction_records: &[JunctionRecord],
        config: &ModelConfig,
    ) -> Result<Self, Error> {
        let edges = edge_records
            .iter()
            .map(Edge::from_record)
            .collect::<Result<Vec<_>, _>>()?;
        let edge_index = index_by_id(edges.iter().map(|edge| edge.id.as_str()), "edge")?;

        let junctions: Vec<Junction> = junction_records
            .iter()
            .filter(|record| !Junction::is_internal_record(record))
            .map(Junction::from_record)
            .collect();
        let junction_index =
            index_by_id(junctions.iter().map(|junction| junction.id.as_str()), "junction")?;

        let adjacency = build_adjacency(&edges, &junction_index, junctions.len());
        let graph = RoadGraph::from_edges(&edges);
        let bounds = compute_bounds(&edges);

        let mut model = Self {
            edges,
            edge_index,
            junctions,
            junction_index,
            adjacency,
            graph,
            sections: Vec::new(),
            section_of_edge: Vec::new(),
            paths: Vec::new(),
            groups: Vec::new(),
            bounds,
        };

        model.sections = partition_sections(&model);
        model.section_of_edge = model.index_sections();
        debug!("Partitioned network into {} sections", model.sections.len());

        model.paths = build_path_systems(&model, config);

        info!(
            "Network model built: {} edges, {} junctions, {} sections, {} paths",
            model.edges.len(),
            model.junctions.len(),
            model.sections.len(),
            model.paths.len()
        );
        Ok(model)
    }

    fn index_sections(&self) -> Vec<Option<SectionIdx>> {
        let mut section_of_edge = vec![None; self.edges.len()];
        for (section_idx, section) in self.sections.iter().enumerate() {
            for &edge in &section.edges {
                section_of_edge[edge] = Some(section_idx);
            }
        }
        section_of_edge
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn edge(&self, id: &str) -> Option<&Edge> {
        self.edge_idx(id).map(|idx| &self.edges[idx])
    }

    pub fn edge_idx(&self, id: &str) -> Option<EdgeIdx> {
        self.edge_index.get(id).copied()
    }

    pub fn contains_edge(&self, id: &str) -> bool {
        self.edge_index.contains_key(id)
    }

    pub fn junctions(&self) -> &[Junction] {
        &self.junctions
    }

    pub fn junction(&self, id: &str) -> Option<&Junction> {
        self.junction_index.get(id).map(|&idx| &self.junctions[idx])
    }

    pub fn adjacency(&self, junction: JunctionIdx) -> &Adjacency {
        &self.adjacency[junction]
    }

    pub fn graph(&self) -> &RoadGraph {
        &self.graph
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Section holding an edge
    pub fn section_of(&self, edge_id: &str) -> Option<&Section> {
        let edge = self.edge_idx(edge_id)?;
        self.section_of_edge[edge].map(|idx| &self.sections[idx])
    }

    pub fn paths(&self) -> &[PathSystem] {
        &self.paths
    }

    pub fn path(&self, id: &str) -> Option<&PathSystem> {
        self.paths.iter().find(|path| path.id == id)
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Bounding box of every lane shape, used by presentation layers
    pub fn bounds(&self) -> Option<Rect<f64>> {
        self.bounds
    }

    pub fn aspect_ratio(&self) -> Option<f64> {
        self.bounds
            .filter(|rect| rect.height() > 0.0)
            .map(|rect| rect.width() / rect.height())
    }

    /// Register a user defined group of edges under the next sequential id
    ///
    /// # Errors
    ///
    /// Returns an error if an edge id is not part of the network
    pub fn add_group<S: AsRef<str>>(&mut self, name: &str, edge_ids: &[S]) -> Result<&Group, Error> {
        let mut seen = HashSet::with_capacity(edge_ids.len());
        let mut edges = Vec::with_capacity(edge_ids.len());
        for id in edge_ids {
            let id = id.as_ref();
            let idx = self
                .edge_idx(id)
                .ok_or_else(|| Error::UnknownEdge(id.to_string()))?;
            if seen.insert(idx) {
                edges.push(idx);
            }
        }

        let index = self.groups.len();
        let exits = self.downstream_exits(&edges);
        self.groups.push(Group {
            id: index.to_string(),
            name: name.to_string(),
            edges,
            exits,
            counters: Default::default(),
        });
        info!("Added group '{name}' with id {index}");
        Ok(&self.groups[index])
    }

    /// Normal member edges with no member edge continuing from their target junction
    pub(crate) fn downstream_exits(&self, members: &[EdgeIdx]) -> Vec<EdgeIdx> {
        let member_set: HashSet<EdgeIdx> = members.iter().copied().collect();
        members
            .iter()
            .copied()
            .filter(|&idx| {
                let Some(to_id) = self.edges[idx].to_id.as_deref() else {
                    return false;
                };
                self.junction_index.get(to_id).is_none_or(|&junction| {
                    !self.adjacency[junction]
                        .outgoing
                        .iter()
                        .any(|next| member_set.contains(next))
                })
            })
            .collect()
    }

    /// Every system in reporting order: edges, sections, paths, groups
    pub fn systems(&self) -> impl Iterator<Item = &dyn System> + '_ {
        self.edges
            .iter()
            .map(|edge| edge as &dyn System)
            .chain(self.sections.iter().map(|section| section as &dyn System))
            .chain(self.paths.iter().map(|path| path as &dyn System))
            .chain(self.groups.iter().map(|group| group as &dyn System))
    }

    pub fn system_count(&self) -> usize {
        self.edges.len() + self.sections.len() + self.paths.len() + self.groups.len()
    }

    /// Evaluate every system for the cycle; edges go first since the
    /// aggregated systems read their ideal times.
    pub(crate) fn compute_metrics(
        &mut self,
        time_diff: Seconds,
        min_speed: f64,
        timestamp: Seconds,
    ) -> Vec<MetricRecord> {
        let mut records = Vec::with_capacity(self.system_count());
        for edge in &mut self.edges {
            let moe = edge.compute_metrics(time_diff, min_speed);
            records.push(MetricRecord::new(timestamp, &*edge, moe));
        }

        let edges = &self.edges;
        aggregate_records(&mut self.sections, edges, time_diff, timestamp, &mut records);
        aggregate_records(&mut self.paths, edges, time_diff, timestamp, &mut records);
        aggregate_records(&mut self.groups, edges, time_diff, timestamp, &mut records);
        records
    }

    /// Baseline records for a cycle without a prior reference point
    pub(crate) fn default_metrics(&self, timestamp: Seconds) -> Vec<MetricRecord> {
        self.systems()
            .map(|system| MetricRecord::new(timestamp, system, Moe::default()))
            .collect()
    }

    pub(crate) fn reset_counters(&mut self) {
        self.edges.iter_mut().for_each(System::reset_counters);
        self.sections.iter_mut().for_each(System::reset_counters);
        self.paths.iter_mut().for_each(System::reset_counters);
        self.groups.iter_mut().for_each(System::reset_counters);
    }

    pub fn summary(&self) -> NetworkSummary {
        NetworkSummary {
            edge_count: self.edges.len(),
            junction_count: self.junctions.len(),
            section_count: self.sections.len(),
            path_count: self.paths.len(),
            group_count: self.groups.len(),
            total_length_km: self.edges.iter().map(Edge::length).sum::<f64>() / 1000.0,
        }
    }
}

fn aggregate_records<S: AggregateSystem>(
    systems: &mut [S],
    edges: &[Edge],
    time_diff: Seconds,
    timestamp: Seconds,
    records: &mut Vec<MetricRecord>,
) {
    for system in systems {
        let moe = system.compute_metrics(edges, time_diff);
        records.push(MetricRecord::new(timestamp, &*system, moe));
    }
}

fn index_by_id<'a>(
    ids: impl Iterator<Item = &'a str>,
    what: &str,
) -> Result<HashMap<String, usize>, Error> {
    let mut index = HashMap::new();
    for (idx, id) in ids.enumerate() {
        if index.insert(id.to_string(), idx).is_some() {
            return Err(Error::ModelError(format!("Duplicate {what} id {id}")));
        }
    }
    Ok(index)
}

/// Junction id -> incident edges, in edge registry order
fn build_adjacency(
    edges: &[Edge],
    junction_index: &HashMap<String, JunctionIdx>,
    junction_count: usize,
) -> Vec<Adjacency> {
    let mut adjacency = vec![Adjacency::default(); junction_count];
    for (idx, edge) in edges.iter().enumerate() {
        if let Some(&from) = edge.from_id.as_ref().and_then(|id| junction_index.get(id)) {
            adjacency[from].outgoing.push(idx);
        }
        if let Some(&to) = edge.to_id.as_ref().and_then(|id| junction_index.get(id)) {
            adjacency[to].incoming.push(idx);
        }
    }
    adjacency
}

fn compute_bounds(edges: &[Edge]) -> Option<Rect<f64>> {
    let points: MultiPoint<f64> = edges
        .iter()
        .flat_map(|edge| edge.lanes.iter())
        .flat_map(|lane| lane.shape.points())
        .collect();
    points.bounding_rect()
}

/// Size overview of a network model
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NetworkSummary {
    pub edge_count: usize,
    pub junction_count: usize,
    pub section_count: usize,
    pub path_count: usize,
    pub group_count: usize,
    pub total_length_km: f64,
}

impl fmt::Display for NetworkSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} edges, {} junctions, {} sections, {} paths, {} groups, {:.3} km",
            self.edge_count,
            self.junction_count,
            self.section_count,
            self.path_count,
            self.group_count,
            self.total_length_km
        )
    }
}
