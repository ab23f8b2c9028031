use geo::{Coord, LineString};

use crate::Error;

/// Parse a shape string of space separated `x,y` (or `x,y,z`) pairs
pub fn parse_shape(shape: &str) -> Result<LineString<f64>, Error> {
    shape
        .split_whitespace()
        .map(|pair| {
            let mut parts = pair.split(',');
            let x = parse_coordinate(parts.next(), pair)?;
            let y = parse_coordinate(parts.next(), pair)?;
            Ok(Coord { x, y })
        })
        .collect::<Result<Vec<_>, Error>>()
        .map(LineString::new)
}

fn parse_coordinate(part: Option<&str>, pair: &str) -> Result<f64, Error> {
    part.and_then(|p| p.trim().parse::<f64>().ok())
        .ok_or_else(|| Error::ParseError(format!("Invalid shape point '{pair}'")))
}

/// Split a lane reference `<edge id>_<lane index>` on its last underscore
///
/// # Errors
///
/// Returns an error if the reference has no underscore
pub fn split_lane_ref(lane: &str) -> Result<(&str, &str), Error> {
    lane.rsplit_once('_')
        .ok_or_else(|| Error::ParseError(format!("Invalid lane reference '{lane}'")))
}

/// Edge id of a lane id, empty when the lane id has no underscore
pub fn edge_id_of_lane(lane: &str) -> &str {
    lane.rsplit_once('_').map_or("", |(edge, _)| edge)
}

/// Junction id embedded in an internal edge id, `:J12_3` belongs to `J12`
pub fn junction_id_of_internal_edge(edge_id: &str) -> &str {
    let trimmed = edge_id.strip_prefix(':').unwrap_or(edge_id);
    trimmed.split('_').next().unwrap_or(trimmed)
}
