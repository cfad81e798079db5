//! Bit flag sets which the api sends as arrays of strings.
use enumflags2::{bitflags, BitFlag, BitFlags};
use serde::{de::Deserializer, ser::Serializer, Deserialize, Serialize};

pub trait FlagName: BitFlag {
    fn name(self) -> &'static str;
    fn from_name(name: &str) -> Option<Self>;
}

macro_rules! flag_names {
    ($name:ident { $($variant:ident),* $(,)? }) => {
        impl FlagName for $name {
            fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => stringify!($variant),)*
                }
            }
            fn from_name(name: &str) -> Option<Self> {
                match name {
                    $(stringify!($variant) => Some(Self::$variant),)*
                    _ => None,
                }
            }
        }
    };
}

#[bitflags]
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Race {
    Asura,
    Charr,
    Human,
    Norn,
    Sylvari,
}
flag_names!(Race {
    Asura,
    Charr,
    Human,
    Norn,
    Sylvari
});

#[bitflags]
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Profession {
    Elementalist,
    Engineer,
    Guardian,
    Mesmer,
    Necromancer,
    Ranger,
    Revenant,
    Thief,
    Warrior,
}
flag_names!(Profession {
    Elementalist,
    Engineer,
    Guardian,
    Mesmer,
    Necromancer,
    Ranger,
    Revenant,
    Thief,
    Warrior
});

/// where an item can be used
#[bitflags]
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameType {
    Activity,
    Dungeon,
    Pve,
    Pvp,
    PvpLobby,
    Wvw,
}
flag_names!(GameType {
    Activity,
    Dungeon,
    Pve,
    Pvp,
    PvpLobby,
    Wvw
});

/// use with `#[serde(with = "flag_list")]` on a `BitFlags<T>` field.
/// Unknown names are skipped.
pub mod flag_list {
    use super::*;

    pub fn serialize<S: Serializer, T: FlagName>(
        flags: &BitFlags<T>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(flags.iter().map(T::name))
    }

    pub fn deserialize<'de, D: Deserializer<'de>, T: FlagName>(
        deserializer: D,
    ) -> Result<BitFlags<T>, D::Error> {
        let names = Vec::<String>::deserialize(deserializer)?;
        Ok(names
            .iter()
            .filter_map(|name| {
                let flag = T::from_name(name);
                if flag.is_none() {
                    tracing::debug!(%name, "skipping unknown flag");
                }
                flag
            })
            .collect())
    }
}

/// Items and skins mix races and professions in a single `restrictions` array.
/// Empty sets mean "no restriction".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Restrictions {
    pub races: BitFlags<Race>,
    pub professions: BitFlags<Profession>,
}

impl Restrictions {
    pub fn is_empty(&self) -> bool {
        self.races.is_empty() && self.professions.is_empty()
    }
    pub fn allows(&self, race: Race, profession: Profession) -> bool {
        (self.races.is_empty() || self.races.contains(race))
            && (self.professions.is_empty() || self.professions.contains(profession))
    }
}

impl<'de> Deserialize<'de> for Restrictions {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let names = Vec::<String>::deserialize(deserializer)?;
        let mut restrictions = Self::default();
        for name in names.iter() {
            if let Some(race) = Race::from_name(name) {
                restrictions.races.insert(race);
            } else if let Some(profession) = Profession::from_name(name) {
                restrictions.professions.insert(profession);
            } else {
                tracing::debug!(%name, "skipping unknown restriction");
            }
        }
        Ok(restrictions)
    }
}

impl Serialize for Restrictions {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(
            self.races
                .iter()
                .map(Race::name)
                .chain(self.professions.iter().map(Profession::name)),
        )
    }
}
