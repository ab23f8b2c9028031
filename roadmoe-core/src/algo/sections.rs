//! Partition of the network into sections: every intersection gets its own
//! section together with the plain junctions and edges leading up to the
//! next stopping point, and the remaining chains are absorbed greedily.

use fixedbitset::FixedBitSet;
use hashbrown::HashMap;
use itertools::Itertools;
use log::{debug, warn};

use crate::loading::parser::junction_id_of_internal_edge;
use crate::model::{NetworkModel, Section};
use crate::{EdgeIdx, JunctionIdx, SectionIdx};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Incoming,
    Outgoing,
}

/// Pending neighbor edges of a junction being expanded
struct Frame {
    edges: Vec<(EdgeIdx, Direction)>,
    cursor: usize,
}

impl Frame {
    fn next_edge(&mut self) -> Option<(EdgeIdx, Direction)> {
        let next = self.edges.get(self.cursor).copied();
        self.cursor += 1;
        next
    }
}

/// Working set of one partitioning run
struct Partitioner<'a> {
    model: &'a NetworkModel,
    junction_assigned: FixedBitSet,
    edge_assigned: FixedBitSet,
    sections: Vec<Section>,
}

/// Assign every edge of the model to exactly one section.
///
/// Junctions are seeded in id order, intersections first, so the result
/// depends only on the topology.
pub(crate) fn partition_sections(model: &NetworkModel) -> Vec<Section> {
    let mut order: Vec<JunctionIdx> = (0..model.junctions.len()).collect();
    order.sort_by(|&a, &b| model.junctions[a].id.cmp(&model.junctions[b].id));

    let mut partitioner = Partitioner {
        model,
        junction_assigned: FixedBitSet::with_capacity(model.junctions.len()),
        edge_assigned: FixedBitSet::with_capacity(model.edges.len()),
        sections: Vec::new(),
    };

    for &junction in &order {
        if model.adjacency[junction].is_intersection()
            && !partitioner.junction_assigned.contains(junction)
        {
            partitioner.expand(junction, false);
        }
    }
    let intersections = partitioner.sections.len();

    for &junction in &order {
        if !partitioner.junction_assigned.contains(junction) {
            partitioner.expand(junction, true);
        }
    }
    debug!(
        "{intersections} intersection sections, {} chain sections",
        partitioner.sections.len() - intersections
    );

    partitioner.attach_orphans();
    partitioner.sections
}

impl Partitioner<'_> {
    /// Grow a new section from `seed`. The seed always expands; any other
    /// junction expands only when it is an intersection or in greedy mode.
    /// An outgoing edge ending in a junction that does not expand is a
    /// section exit.
    fn expand(&mut self, seed: JunctionIdx, greedy: bool) {
        let model = self.model;
        let mut section = Section::new(model.junctions[seed].id.clone());
        self.claim_junction(&mut section, seed);
        let mut stack = vec![self.frame(seed)];

        while let Some(frame) = stack.last_mut() {
            let Some((edge, direction)) = frame.next_edge() else {
                stack.pop();
                continue;
            };
            if self.edge_assigned.contains(edge) {
                continue;
            }
            self.claim_edge(&mut section, edge);

            let far_end = match direction {
                Direction::Incoming => model.edges[edge].from_id.as_deref(),
                Direction::Outgoing => model.edges[edge].to_id.as_deref(),
            };
            let Some(&next) = far_end.and_then(|id| model.junction_index.get(id)) else {
                continue;
            };
            if self.junction_assigned.contains(next) {
                continue;
            }

            self.claim_junction(&mut section, next);
            if greedy || model.adjacency[next].is_intersection() {
                stack.push(self.frame(next));
            } else if direction == Direction::Outgoing {
                section.exits.push(edge);
            }
        }

        self.sections.push(section);
    }

    /// Incoming edges first, then outgoing, each side in edge id order so the
    /// walk does not depend on the order of the input records
    fn frame(&self, junction: JunctionIdx) -> Frame {
        let model = self.model;
        let adjacency = &model.adjacency[junction];
        let by_id = |edges: &[EdgeIdx]| {
            edges
                .iter()
                .copied()
                .sorted_by(|&a, &b| model.edges[a].id.cmp(&model.edges[b].id))
        };
        let edges = by_id(&adjacency.incoming)
            .map(|edge| (edge, Direction::Incoming))
            .chain(by_id(&adjacency.outgoing).map(|edge| (edge, Direction::Outgoing)))
            .collect();
        Frame { edges, cursor: 0 }
    }

    /// Take a junction along with its internal edges
    fn claim_junction(&mut self, section: &mut Section, junction: JunctionIdx) {
        let model = self.model;
        self.junction_assigned.insert(junction);
        section.junctions.push(junction);

        for internal in &model.junctions[junction].internal_edges {
            if let Some(&edge) = model.edge_index.get(internal) {
                if !self.edge_assigned.contains(edge) {
                    self.claim_edge(section, edge);
                }
            }
        }
    }

    fn claim_edge(&mut self, section: &mut Section, edge: EdgeIdx) {
        self.edge_assigned.insert(edge);
        section.edges.push(edge);
    }

    /// Edges no expansion reached join the section of their target junction,
    /// then of their source junction, then of the junction named in an
    /// internal edge id; failing all of these they form their own section.
    fn attach_orphans(&mut self) {
        let model = self.model;
        let mut section_of_junction: HashMap<JunctionIdx, SectionIdx> = HashMap::new();
        for (section_idx, section) in self.sections.iter().enumerate() {
            for &junction in &section.junctions {
                section_of_junction.insert(junction, section_idx);
            }
        }

        for (edge_idx, edge) in model.edges.iter().enumerate() {
            if self.edge_assigned.contains(edge_idx) {
                continue;
            }
            let candidates = [
                edge.to_id.as_deref(),
                edge.from_id.as_deref(),
                Some(junction_id_of_internal_edge(&edge.id)),
            ];
            let target = candidates
                .into_iter()
                .flatten()
                .filter_map(|id| model.junction_index.get(id))
                .find_map(|junction| section_of_junction.get(junction).copied());

            self.edge_assigned.insert(edge_idx);
            match target {
                Some(section_idx) => self.sections[section_idx].edges.push(edge_idx),
                None => {
                    warn!("Edge {} has no junction in the network, own section", edge.id);
                    let mut section = Section::new(edge.id.clone());
                    section.edges.push(edge_idx);
                    self.sections.push(section);
                }
            }
        }
    }
}
