//! endpoints which need an api key
use super::achievements::AchievementId;
use super::guild::GuildId;
use super::worlds::WorldId;
use crate::prelude::*;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// a uuid which never changes, unlike the name
    pub id: String,
    /// `Name.1234`
    pub name: String,
    /// seconds played on this account
    pub age: u64,
    pub world: WorldId,
    #[serde(default)]
    pub guilds: Vec<GuildId>,
    /// needs the `guilds` permission
    pub guild_leader: Option<Vec<GuildId>>,
    #[serde(with = "time::serde::rfc3339")]
    pub created: OffsetDateTime,
    /// `GuildWars2`, `HeartOfThorns`, `PathOfFire`, `EndOfDragons` etc..
    #[serde(default)]
    pub access: Vec<String>,
    pub commander: bool,
    /// the fields below need the `progression` permission
    pub fractal_level: Option<u32>,
    pub daily_ap: Option<u32>,
    pub monthly_ap: Option<u32>,
    pub wvw_rank: Option<u32>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub last_modified: Option<OffsetDateTime>,
}

impl Account {
    pub fn has_access(&self, product: &str) -> bool {
        self.access.iter().any(|a| a == product)
    }
    /// hours played, rounded down
    pub fn hours_played(&self) -> u64 {
        self.age / 3600
    }
}

impl EndPoint for Account {
    const URL: &'static str = const_format::concatcp!(V2, "/account");
    const AUTH: bool = true;
    const LOCALE: bool = false;
}

/// progress of a single achievement on the account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountAchievement {
    pub id: AchievementId,
    /// indices into the bits of the achievement which are done
    pub bits: Option<Vec<u32>>,
    pub current: Option<u32>,
    pub max: Option<u32>,
    pub done: bool,
    /// times the achievement was completed, for repeatable ones
    pub repeated: Option<u32>,
    /// `false` only for achievements that are still locked
    pub unlocked: Option<bool>,
}

/// `v2/account/achievements` answers with every achievement that has progress at once
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountAchievements(pub Vec<AccountAchievement>);

impl AccountAchievements {
    pub fn get(&self, id: AchievementId) -> Option<&AccountAchievement> {
        self.0.iter().find(|a| a.id == id)
    }
    pub fn done(&self) -> impl Iterator<Item = &AccountAchievement> {
        self.0.iter().filter(|a| a.done)
    }
}

impl EndPoint for AccountAchievements {
    const URL: &'static str = const_format::concatcp!(V2, "/account/achievements");
    const AUTH: bool = true;
    const LOCALE: bool = false;
}

/// details about the api key in use
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenInfo {
    pub id: String,
    pub name: String,
    /// `account`, `progression`, `guilds`, `wallet` etc..
    #[serde(default)]
    pub permissions: Vec<String>,
    /// `APIKey` or `Subtoken`
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

impl TokenInfo {
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.iter().any(|p| p == permission)
    }
}

impl EndPoint for TokenInfo {
    const URL: &'static str = const_format::concatcp!(V2, "/tokeninfo");
    const AUTH: bool = true;
    const LOCALE: bool = false;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_without_progression() {
        let account: Account = serde_json::from_str(
            r#"{
                "id": "CCBF0EB2-A9C7-4A5C-A8EB-25B6E1E4D6D6",
                "name": "Account.1234",
                "age": 7200,
                "world": 1001,
                "guilds": ["116E0C0E-0035-44A9-BB22-4AE3E23127E5"],
                "created": "2015-08-25T00:00:00Z",
                "access": ["GuildWars2", "HeartOfThorns"],
                "commander": false
            }"#,
        )
        .unwrap();
        assert_eq!(account.hours_played(), 2);
        assert!(account.has_access("HeartOfThorns"));
        assert!(!account.has_access("PathOfFire"));
        assert!(account.fractal_level.is_none());
        assert!(account.last_modified.is_none());
        assert_eq!(account.created.year(), 2015);
    }

    #[test]
    fn account_achievements() {
        let achievements: AccountAchievements = serde_json::from_str(
            r#"[
                {"id": 1, "current": 1, "max": 1000, "done": false},
                {"id": 2, "bits": [0, 2], "current": 2, "max": 3, "done": true, "repeated": 4}
            ]"#,
        )
        .unwrap();
        assert_eq!(achievements.get(2).and_then(|a| a.repeated), Some(4));
        assert_eq!(achievements.done().count(), 1);
    }
}
