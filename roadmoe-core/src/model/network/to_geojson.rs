use geo::{Coord, LineString, MapCoords, Rect};
use geojson::{Feature, FeatureCollection, Geometry};
use serde_json::json;

use super::NetworkModel;
use crate::Error;

/// Map a shape from one rectangle onto another, e.g. from the projected
/// network frame onto a map's longitude/latitude frame
pub fn rescale(shape: &LineString<f64>, from: &Rect<f64>, to: &Rect<f64>) -> LineString<f64> {
    let scale = |value: f64, from_min: f64, from_size: f64, to_min: f64, to_size: f64| {
        if from_size > 0.0 {
            (value - from_min) / from_size * to_size + to_min
        } else {
            to_min
        }
    };

    shape.map_coords(|coord| Coord {
        x: scale(coord.x, from.min().x, from.width(), to.min().x, to.width()),
        y: scale(coord.y, from.min().y, from.height(), to.min().y, to.height()),
    })
}

impl NetworkModel {
    /// Edge geometries with `id`, `type`, `lanes`, `speed_kmh`, `length` and
    /// `section` properties. When `frame` is given, shapes are rescaled from
    /// the network bounds onto it.
    pub fn to_geojson(&self, frame: Option<&Rect<f64>>) -> Result<FeatureCollection, Error> {
        let mut features = Vec::with_capacity(self.edges.len());

        for (idx, edge) in self.edges.iter().enumerate() {
            let Some(shape) = edge.shape() else {
                continue;
            };
            let shape = match (frame, self.bounds()) {
                (Some(to), Some(from)) => rescale(shape, &from, to),
                _ => shape.clone(),
            };
            let section = self.section_of_edge[idx].map(|s| self.sections[s].id.as_str());

            let value = json!({
                "type": "Feature",
                "geometry": Geometry::new((&shape).into()),
                "properties": {
                    "id": edge.id,
                    "type": edge.edge_type,
                    "lanes": edge.lanes.len(),
                    "speed_kmh": (edge.flow_speed * 3.6).round(),
                    "length": edge.length(),
                    "section": section,
                }
            });
            let feature =
                serde_json::from_value::<Feature>(value).map_err(|e| Error::GeoJsonError(e.to_string()))?;
            features.push(feature);
        }

        Ok(FeatureCollection {
            features,
            bbox: None,
            foreign_members: None,
        })
    }

    pub fn to_geojson_string(&self, frame: Option<&Rect<f64>>) -> Result<String, Error> {
        serde_json::to_string(&self.to_geojson(frame)?)
            .map_err(|e| Error::GeoJsonError(e.to_string()))
    }
}
