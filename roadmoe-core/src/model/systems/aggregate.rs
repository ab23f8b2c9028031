use super::{Counters, Moe, System, SystemKind};
use crate::model::Edge;
use crate::{EdgeIdx, JunctionIdx, Seconds};

/// Systems whose counters are derived from their member edges
pub trait AggregateSystem: System {
    fn members(&self) -> &[EdgeIdx];
    /// Member edges through which vehicles leave the system
    fn exits(&self) -> &[EdgeIdx];
    fn counters_mut(&mut self) -> &mut Counters;

    /// Pull counters from the member edges, which must already hold this
    /// cycle's ideal times, then evaluate the shared formula.
    fn compute_metrics(&mut self, edges: &[Edge], time_diff: Seconds) -> Moe {
        let counters = aggregate_counters(edges, self.members(), self.exits());
        *self.counters_mut() = counters;
        counters.moe(time_diff)
    }
}

/// Sum member counters. Visits are the vehicles counted at the exits, or the
/// busiest member's occupancy while nobody has reached an exit yet.
fn aggregate_counters(edges: &[Edge], members: &[EdgeIdx], exits: &[EdgeIdx]) -> Counters {
    if members.is_empty() {
        return Counters::default();
    }

    let v_current = members.iter().map(|&e| edges[e].counters.v_current).sum();
    let busiest = members
        .iter()
        .map(|&e| edges[e].counters.v_current)
        .max()
        .unwrap_or(0);
    let exit_visits: u32 = exits.iter().map(|&e| edges[e].counters.v_visited).sum();
    let total_ideal_time = members
        .iter()
        .map(|&e| edges[e].counters.total_ideal_time)
        .sum();

    Counters {
        v_current,
        v_visited: exit_visits.max(busiest),
        total_dist: 0.0,
        total_ideal_time,
    }
}

/// One intersection together with the corridors leading to it
#[derive(Debug, Clone)]
pub struct Section {
    /// Id of the seed junction
    pub id: String,
    pub junctions: Vec<JunctionIdx>,
    pub edges: Vec<EdgeIdx>,
    /// Edges whose downstream junction stopped the expansion
    pub exits: Vec<EdgeIdx>,
    pub(crate) counters: Counters,
}

impl Section {
    pub(crate) fn new(id: String) -> Self {
        Self {
            id,
            junctions: Vec::new(),
            edges: Vec::new(),
            exits: Vec::new(),
            counters: Counters::default(),
        }
    }
}

/// Route between a network entrance and a network exit
#[derive(Debug, Clone)]
pub struct PathSystem {
    /// `<first edge>-><last edge>|<index>`
    pub id: String,
    /// Ordinary edges in driving order
    pub route: Vec<EdgeIdx>,
    /// Route edges plus internal edges of every traversed junction
    pub edges: Vec<EdgeIdx>,
    pub exits: Vec<EdgeIdx>,
    /// Sum of the route edge lengths, meters
    pub length: f64,
    pub(crate) counters: Counters,
}

/// User defined collection of edges
#[derive(Debug, Clone)]
pub struct Group {
    /// Sequential number, as text
    pub id: String,
    pub name: String,
    pub edges: Vec<EdgeIdx>,
    pub exits: Vec<EdgeIdx>,
    pub(crate) counters: Counters,
}

macro_rules! impl_aggregate_system {
    ($system:ty, $kind:expr) => {
        impl System for $system {
            fn id(&self) -> &str {
                &self.id
            }

            fn kind(&self) -> SystemKind {
                $kind
            }

            fn counters(&self) -> &Counters {
                &self.counters
            }

            fn reset_counters(&mut self) {
                self.counters.total_dist = 0.0;
            }
        }

        impl AggregateSystem for $system {
            fn members(&self) -> &[EdgeIdx] {
                &self.edges
            }

            fn exits(&self) -> &[EdgeIdx] {
                &self.exits
            }

            fn counters_mut(&mut self) -> &mut Counters {
                &mut self.counters
            }
        }
    };
}

impl_aggregate_system!(Section, SystemKind::Section);
impl_aggregate_system!(PathSystem, SystemKind::Path);
impl_aggregate_system!(Group, SystemKind::Group);
