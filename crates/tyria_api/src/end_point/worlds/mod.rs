use crate::prelude::*;

pub type WorldId = u32;

api_enum! {
    pub enum Population {
        Low,
        Medium,
        High,
        VeryHigh,
        Full,
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    pub id: WorldId,
    pub name: String,
    pub population: Population,
}

/// first digit of the id is the region, second digit the language. eg: 2101 -> EU, french
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    NorthAmerica,
    Europe,
}

impl World {
    pub fn region(&self) -> Option<Region> {
        match self.id / 1000 {
            1 => Some(Region::NorthAmerica),
            2 => Some(Region::Europe),
            _ => None,
        }
    }
    pub fn is_full(&self) -> bool {
        self.population == Population::Full
    }
}

impl EndPoint for World {
    const URL: &'static str = const_format::concatcp!(V2, "/worlds");
    const AUTH: bool = false;
    const LOCALE: bool = true;
}

impl EndPointWithId for World {
    type Id = WorldId;
}

impl BulkEndPoint for World {
    const ALL: bool = true;
    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn world_region() {
        let worlds: Vec<World> = serde_json::from_str(
            r#"[
                {"id": 1001, "name": "Anvil Rock", "population": "Medium"},
                {"id": 2101, "name": "Jade Sea [FR]", "population": "Full"}
            ]"#,
        )
        .unwrap();
        assert_eq!(worlds[0].region(), Some(Region::NorthAmerica));
        assert_eq!(worlds[1].region(), Some(Region::Europe));
        assert!(worlds[1].is_full());
    }
}
