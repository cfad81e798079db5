//! World vs World matches and objectives
use glam::{Vec2, Vec3};

use super::maps::MapId;
use super::worlds::WorldId;
use crate::prelude::*;

/// `{region}-{tier}`, eg: `1-3` is the third NA match
pub type MatchId = String;
/// `{map_id}-{objective}`, eg: `38-6`
pub type ObjectiveId = String;

api_enum! {
    pub enum Team {
        Red,
        Green,
        Blue,
        Neutral,
    }
}

/// one value per team. The api uses lowercase keys for these.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamValues<T> {
    pub red: T,
    pub green: T,
    pub blue: T,
}

impl<T> TeamValues<T> {
    pub fn get(&self, team: &Team) -> Option<&T> {
        match team {
            Team::Red => Some(&self.red),
            Team::Green => Some(&self.green),
            Team::Blue => Some(&self.blue),
            _ => None,
        }
    }
}

impl<T: Ord> TeamValues<T> {
    /// the team with the highest value. `None` on a tie for first place.
    pub fn leader(&self) -> Option<Team> {
        let mut teams = [
            (Team::Red, &self.red),
            (Team::Green, &self.green),
            (Team::Blue, &self.blue),
        ];
        teams.sort_by(|a, b| b.1.cmp(a.1));
        (teams[0].1 != teams[1].1).then(|| teams[0].0.clone())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    #[serde(with = "time::serde::rfc3339")]
    pub start_time: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub end_time: OffsetDateTime,
    pub scores: TeamValues<u32>,
    /// the host world of each team
    pub worlds: TeamValues<WorldId>,
    /// host and linked worlds of each team
    pub all_worlds: TeamValues<Vec<WorldId>>,
    pub deaths: TeamValues<u32>,
    pub kills: TeamValues<u32>,
    pub victory_points: Option<TeamValues<u32>>,
    #[serde(default)]
    pub skirmishes: Vec<Skirmish>,
    #[serde(default)]
    pub maps: Vec<MatchMap>,
}

impl Match {
    /// which team a world (host or linked) fights for in this match
    pub fn team_of(&self, world: WorldId) -> Option<Team> {
        [Team::Red, Team::Green, Team::Blue]
            .into_iter()
            .find(|team| {
                self.all_worlds
                    .get(team)
                    .map(|worlds| worlds.contains(&world))
                    .unwrap_or_default()
            })
    }
    pub fn map(&self, kind: &str) -> Option<&MatchMap> {
        self.maps.iter().find(|m| m.kind == kind)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Skirmish {
    pub id: u32,
    pub scores: TeamValues<u32>,
    #[serde(default)]
    pub map_scores: Vec<MapScores>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapScores {
    #[serde(rename = "type")]
    pub kind: String,
    pub scores: TeamValues<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchMap {
    pub id: MapId,
    /// `Center`, `RedHome`, `BlueHome`, `GreenHome`
    #[serde(rename = "type")]
    pub kind: String,
    pub scores: TeamValues<u32>,
    #[serde(default)]
    pub bonuses: Vec<MapBonus>,
    #[serde(default)]
    pub objectives: Vec<MatchObjective>,
    pub deaths: TeamValues<u32>,
    pub kills: TeamValues<u32>,
}

impl MatchMap {
    pub fn objectives_owned_by<'a>(
        &'a self,
        team: &'a Team,
    ) -> impl Iterator<Item = &'a MatchObjective> + 'a {
        self.objectives.iter().filter(move |o| &o.owner == team)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapBonus {
    #[serde(rename = "type")]
    pub kind: String,
    pub owner: Team,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchObjective {
    pub id: ObjectiveId,
    #[serde(rename = "type")]
    pub kind: String,
    pub owner: Team,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub last_flipped: Option<OffsetDateTime>,
    /// the guild id of the claiming guild
    pub claimed_by: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub claimed_at: Option<OffsetDateTime>,
    #[serde(default)]
    pub points_tick: u32,
    #[serde(default)]
    pub points_capture: u32,
    #[serde(default)]
    pub guild_upgrades: Vec<u32>,
    pub yaks_delivered: Option<u32>,
}

impl EndPoint for Match {
    const URL: &'static str = const_format::concatcp!(V2, "/wvw/matches");
    const AUTH: bool = false;
    const LOCALE: bool = false;
}

impl EndPointWithId for Match {
    type Id = MatchId;
}

impl BulkEndPoint for Match {
    const ALL: bool = true;
    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// static data about an objective. The live state is in [MatchObjective]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Objective {
    pub id: ObjectiveId,
    pub name: String,
    pub sector_id: u32,
    /// `Camp`, `Tower`, `Keep`, `Castle`, `Ruins` etc..
    #[serde(rename = "type")]
    pub kind: String,
    pub map_type: String,
    pub map_id: MapId,
    pub upgrade_id: Option<u32>,
    pub coord: Option<Vec3>,
    pub label_coord: Option<Vec2>,
    pub marker: Option<Url>,
    pub chat_link: String,
}

impl EndPoint for Objective {
    const URL: &'static str = const_format::concatcp!(V2, "/wvw/objectives");
    const AUTH: bool = false;
    const LOCALE: bool = true;
}

impl EndPointWithId for Objective {
    type Id = ObjectiveId;
}

impl BulkEndPoint for Objective {
    const ALL: bool = true;
    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_match() -> Match {
        serde_json::from_value(json!({
            "id": "1-1",
            "start_time": "2024-01-05T02:00:00Z",
            "end_time": "2024-01-12T01:58:00Z",
            "scores": {"red": 120, "blue": 95, "green": 120},
            "worlds": {"red": 1008, "blue": 1019, "green": 1003},
            "all_worlds": {"red": [1008, 1012], "blue": [1019], "green": [1003, 1020]},
            "deaths": {"red": 10, "blue": 11, "green": 12},
            "kills": {"red": 12, "blue": 11, "green": 10},
            "victory_points": {"red": 50, "blue": 43, "green": 40},
            "skirmishes": [{
                "id": 1,
                "scores": {"red": 120, "blue": 95, "green": 120},
                "map_scores": [{"type": "Center", "scores": {"red": 40, "blue": 30, "green": 40}}]
            }],
            "maps": [{
                "id": 38,
                "type": "Center",
                "scores": {"red": 40, "blue": 30, "green": 40},
                "bonuses": [],
                "deaths": {"red": 1, "blue": 2, "green": 3},
                "kills": {"red": 3, "blue": 2, "green": 1},
                "objectives": [
                    {
                        "id": "38-6",
                        "type": "Keep",
                        "owner": "Red",
                        "last_flipped": "2024-01-05T03:12:44Z",
                        "claimed_by": "116E0C0E-0035-44A9-BB22-4AE3E23127E5",
                        "claimed_at": "2024-01-05T03:13:01Z",
                        "points_tick": 8,
                        "points_capture": 16,
                        "guild_upgrades": [],
                        "yaks_delivered": 14
                    },
                    {
                        "id": "38-11",
                        "type": "Spawn",
                        "owner": "Neutral",
                        "last_flipped": null,
                        "claimed_by": null,
                        "claimed_at": null,
                        "points_tick": 0,
                        "points_capture": 0
                    }
                ]
            }]
        }))
        .unwrap()
    }

    #[test]
    fn linked_worlds_map_to_teams() {
        let m = sample_match();
        assert_eq!(m.team_of(1012), Some(Team::Red));
        assert_eq!(m.team_of(1019), Some(Team::Blue));
        assert_eq!(m.team_of(2001), None);
    }

    #[test]
    fn leader_handles_ties() {
        let m = sample_match();
        assert_eq!(m.scores.leader(), None);
        assert_eq!(m.victory_points.unwrap().leader(), Some(Team::Red));
    }

    #[test]
    fn objectives_and_times() {
        let m = sample_match();
        assert_eq!(m.end_time - m.start_time, time::Duration::minutes(7 * 24 * 60 - 2));
        let center = m.map("Center").unwrap();
        let red: Vec<_> = center.objectives_owned_by(&Team::Red).collect();
        assert_eq!(red.len(), 1);
        assert_eq!(red[0].yaks_delivered, Some(14));
        assert!(center.objectives[1].last_flipped.is_none());
        assert_eq!(
            red[0].last_flipped.unwrap(),
            time::macros::datetime!(2024-01-05 03:12:44 UTC)
        );
    }

    #[test]
    fn objective_coords() {
        let objective: Objective = serde_json::from_value(json!({
            "id": "38-6",
            "name": "Stonemist Castle",
            "sector_id": 833,
            "type": "Castle",
            "map_type": "Center",
            "map_id": 38,
            "upgrade_id": 10,
            "coord": [10663.1, 14087.5, -1542.08],
            "label_coord": [10613.9, 14080.7],
            "marker": "https://render.guildwars2.com/file/6F8C83AB1A5CB1E1D3A6C2C5BC0A2AE76A2AF0D8/102608.png",
            "chat_link": "[&DAYAAAAmAAAA]"
        }))
        .unwrap();
        assert!((objective.coord.unwrap().z + 1542.08).abs() < 0.01);
        assert_eq!(objective.map_id, 38);
    }
}
