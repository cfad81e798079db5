use super::items::ItemId;
use crate::prelude::*;

pub type AchievementId = u32;
pub type AchievementCategoryId = u32;
/// groups use uuids
pub type AchievementGroupId = String;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Achievement {
    pub id: AchievementId,
    pub icon: Option<Url>,
    pub name: String,
    pub description: String,
    pub requirement: String,
    pub locked_text: String,
    /// `Default` or `ItemSet`
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub flags: Vec<String>,
    #[serde(default)]
    pub tiers: Vec<AchievementTier>,
    #[serde(default)]
    pub prerequisites: Vec<AchievementId>,
    #[serde(default)]
    pub rewards: Vec<Reward>,
    #[serde(default)]
    pub bits: Vec<AchievementBit>,
    pub point_cap: Option<i32>,
}

impl Achievement {
    /// achievement points of all tiers, ignoring repeats
    pub fn total_points(&self) -> u32 {
        self.tiers.iter().map(|t| t.points).sum()
    }
    /// the tier reached with `progress`, as an index into `tiers`
    pub fn tier_for(&self, progress: u32) -> Option<usize> {
        self.tiers.iter().rposition(|t| progress >= t.count)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementTier {
    pub count: u32,
    pub points: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Reward {
    Coins { count: u32 },
    Item { id: ItemId, count: u32 },
    Mastery { id: u32, region: String },
    Title { id: u32 },
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementBit {
    /// `Text`, `Item`, `Minipet` or `Skin`
    #[serde(rename = "type")]
    pub kind: String,
    pub id: Option<u32>,
    pub text: Option<String>,
}

impl EndPoint for Achievement {
    const URL: &'static str = const_format::concatcp!(V2, "/achievements");
    const AUTH: bool = false;
    const LOCALE: bool = true;
}

impl EndPointWithId for Achievement {
    type Id = AchievementId;
}

impl BulkEndPoint for Achievement {
    const ALL: bool = false;
    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AchievementCategory {
    pub id: AchievementCategoryId,
    pub name: String,
    pub description: String,
    pub order: i32,
    pub icon: Option<Url>,
    #[serde(default)]
    pub achievements: Vec<CategoryAchievement>,
    /// only the daily categories have these
    #[serde(default)]
    pub tomorrow: Vec<CategoryAchievement>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryAchievement {
    pub id: AchievementId,
    #[serde(default)]
    pub flags: Vec<String>,
    /// `[min, max]` character level
    pub level: Option<[u32; 2]>,
    pub required_access: Option<RequiredAccess>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequiredAccess {
    pub product: String,
    /// `HasAccess` or `NoAccess`
    pub condition: String,
}

impl EndPoint for AchievementCategory {
    const URL: &'static str = const_format::concatcp!(V2, "/achievements/categories");
    const AUTH: bool = false;
    const LOCALE: bool = true;
}

impl EndPointWithId for AchievementCategory {
    type Id = AchievementCategoryId;
}

impl BulkEndPoint for AchievementCategory {
    const ALL: bool = true;
    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AchievementGroup {
    pub id: AchievementGroupId,
    pub name: String,
    pub description: String,
    pub order: i32,
    #[serde(default)]
    pub categories: Vec<AchievementCategoryId>,
}

impl EndPoint for AchievementGroup {
    const URL: &'static str = const_format::concatcp!(V2, "/achievements/groups");
    const AUTH: bool = false;
    const LOCALE: bool = true;
}

impl EndPointWithId for AchievementGroup {
    type Id = AchievementGroupId;
}

impl BulkEndPoint for AchievementGroup {
    const ALL: bool = true;
    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers_and_rewards() {
        let achievement: Achievement = serde_json::from_str(
            r#"{
                "id": 1,
                "name": "Centaur Slayer",
                "description": "",
                "requirement": "Kill  centaurs.",
                "locked_text": "",
                "type": "Default",
                "flags": ["Pvp", "CategoryDisplay", "Repeatable"],
                "tiers": [
                    {"count": 1, "points": 1},
                    {"count": 10, "points": 1},
                    {"count": 100, "points": 5}
                ],
                "rewards": [
                    {"type": "Coins", "count": 100},
                    {"type": "Item", "id": 70047, "count": 1},
                    {"type": "Ancestry", "id": 3}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(achievement.total_points(), 7);
        assert_eq!(achievement.tier_for(0), None);
        assert_eq!(achievement.tier_for(10), Some(1));
        assert_eq!(achievement.tier_for(5000), Some(2));
        assert_eq!(
            achievement.rewards,
            vec![
                Reward::Coins { count: 100 },
                Reward::Item {
                    id: 70047,
                    count: 1
                },
                Reward::Unknown
            ]
        );
        assert!(achievement.prerequisites.is_empty());
    }

    #[test]
    fn category_with_access_requirements() {
        let category: AchievementCategory = serde_json::from_str(
            r#"{
                "id": 88,
                "name": "Daily Fractals",
                "description": "",
                "order": 2,
                "icon": "https://render.guildwars2.com/file/3A0A8A7BA6B3B4E8D0F4A0BC9D74D0C0F7A4D6E1/1228226.png",
                "achievements": [
                    {"id": 4716, "flags": ["PvE"], "level": [80, 80], "required_access": {"product": "PathOfFire", "condition": "HasAccess"}},
                    {"id": 2966}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(category.achievements[0].level, Some([80, 80]));
        assert_eq!(category.achievements[1].required_access, None);
        assert!(category.tomorrow.is_empty());
    }
}
