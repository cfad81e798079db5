use glam::Vec2;

use crate::prelude::*;

pub type MapId = u32;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Map {
    pub id: MapId,
    pub name: String,
    pub min_level: u32,
    pub max_level: u32,
    pub default_floor: i32,
    /// `Public`, `Instance`, `Tutorial`, `BlueHome` etc..
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub floors: Vec<i32>,
    pub region_id: Option<u32>,
    pub region_name: Option<String>,
    pub continent_id: Option<u32>,
    pub continent_name: Option<String>,
    /// top left and bottom right corners in map coordinates
    pub map_rect: [Vec2; 2],
    /// top left and bottom right corners in continent coordinates
    pub continent_rect: [Vec2; 2],
}

impl Map {
    /// converts a position inside the map into continent coordinates.
    /// Map coordinates grow upwards while continent coordinates grow downwards.
    pub fn map_to_continent(&self, position: Vec2) -> Vec2 {
        let [map_min, map_max] = self.map_rect;
        let [cont_min, cont_max] = self.continent_rect;
        let map_size = map_max - map_min;
        let cont_size = cont_max - cont_min;
        Vec2::new(
            cont_min.x + (position.x - map_min.x) / map_size.x * cont_size.x,
            cont_min.y + (map_max.y - position.y) / map_size.y * cont_size.y,
        )
    }
}

impl EndPoint for Map {
    const URL: &'static str = const_format::concatcp!(V2, "/maps");
    const AUTH: bool = false;
    const LOCALE: bool = true;
}

impl EndPointWithId for Map {
    type Id = MapId;
}

impl BulkEndPoint for Map {
    const ALL: bool = true;
    fn id(&self) -> &Self::Id {
        &self.id
    }
}
