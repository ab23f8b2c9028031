use serde::Serialize;

use crate::Seconds;

/// Vehicle and distance counters shared by every system
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Counters {
    /// Vehicles inside the system right now
    pub v_current: u32,
    /// Vehicles that ever entered the system
    pub v_visited: u32,
    /// Meters driven inside the system during the current cycle
    pub total_dist: f64,
    /// Free-flow time for `total_dist`, seconds
    pub total_ideal_time: Seconds,
}

/// HCM measures of effectiveness for one system and one cycle
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Moe {
    /// Percent incomplete trips
    pub pit: f64,
    /// Vehicles per second
    pub throughput: f64,
    /// Seconds
    pub total_delay: f64,
    /// Delay per trip, seconds
    pub dpt: f64,
    /// Travel time index
    pub tti: f64,
}

impl Default for Moe {
    fn default() -> Self {
        Self {
            pit: 0.0,
            throughput: 0.0,
            total_delay: 0.0,
            dpt: 0.0,
            tti: 1.0,
        }
    }
}

impl Counters {
    /// Measures for a cycle lasting `time_diff` seconds.
    ///
    /// An empty system reports no delay and a travel time index of 1;
    /// zero visits or zero ideal time never divide.
    pub fn moe(&self, time_diff: Seconds) -> Moe {
        let v_current = f64::from(self.v_current);
        let throughput = v_current / time_diff;

        if self.v_current == 0 {
            return Moe {
                throughput,
                ..Moe::default()
            };
        }

        let total_time = time_diff * v_current;
        let total_delay = total_time - self.total_ideal_time;
        let pit = if self.v_visited == 0 {
            0.0
        } else {
            v_current / f64::from(self.v_visited)
        };
        let dpt = total_delay / v_current;
        let tti = if self.total_ideal_time > 0.0 {
            total_time / self.total_ideal_time
        } else {
            1.0
        };

        Moe {
            pit,
            throughput,
            total_delay,
            dpt,
            tti,
        }
    }
}
