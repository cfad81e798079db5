pub mod details;

use enumflags2::BitFlags;
use serde::de::{DeserializeOwned, Deserializer, Error as _};
use serde::ser::{Error as _, Serializer};
use serde_json::Value;

use self::details::*;
use super::restrictions::{flag_list, GameType, Restrictions};
use super::skins::SkinId;
use super::{TaggedDetails, TaggedDetailsRef};
use crate::prelude::*;
use crate::render::RenderFile;

pub type ItemId = u32;

api_enum! {
    pub enum Rarity {
        Junk,
        Basic,
        Fine,
        Masterwork,
        Rare,
        Exotic,
        Ascended,
        Legendary,
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub chat_link: String,
    pub name: String,
    pub icon: Option<Url>,
    pub description: Option<String>,
    pub rarity: Rarity,
    pub level: u32,
    pub vendor_value: u32,
    pub default_skin: Option<SkinId>,
    #[serde(default)]
    pub flags: Vec<String>,
    #[serde(default, with = "flag_list")]
    pub game_types: BitFlags<GameType>,
    #[serde(default)]
    pub restrictions: Restrictions,
    #[serde(default)]
    pub upgrades_into: Vec<ItemUpgrade>,
    #[serde(default)]
    pub upgrades_from: Vec<ItemUpgrade>,
    /// `type` + `details` of the json
    #[serde(flatten)]
    pub details: ItemDetails,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemUpgrade {
    /// `Attunement`, `Infusion` etc..
    pub upgrade: String,
    pub item_id: ItemId,
}

impl Item {
    pub fn icon_file(&self) -> Option<RenderFile> {
        self.icon
            .as_ref()
            .and_then(|icon| RenderFile::from_url(icon).ok())
    }
    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.iter().any(|f| f == flag)
    }
}

/// The concrete shape of an item, selected by the `type` field.
/// types without a `details` object are unit variants.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemDetails {
    Armor(ArmorDetails),
    Back(BackDetails),
    Bag(BagDetails),
    Consumable(ConsumableDetails),
    Container(ContainerDetails),
    CraftingMaterial,
    Gathering(GatheringDetails),
    Gizmo(GizmoDetails),
    JadeTechModule,
    Key,
    MiniPet(MiniPetDetails),
    PowerCore,
    Relic,
    Tool(ToolDetails),
    Trait,
    Trinket(TrinketDetails),
    Trophy,
    UpgradeComponent(UpgradeComponentDetails),
    Weapon(WeaponDetails),
    /// a type added to the api after this crate was written. details are kept as is.
    Unknown {
        kind: String,
        details: Option<Value>,
    },
}

fn parse_details<T: DeserializeOwned>(details: Option<Value>) -> serde_json::Result<T> {
    serde_json::from_value(details.unwrap_or_else(|| Value::Object(Default::default())))
}

fn details_to_value<T: Serialize>(details: &T) -> serde_json::Result<Option<Value>> {
    serde_json::to_value(details).map(Some)
}

impl ItemDetails {
    pub fn from_parts(kind: &str, details: Option<Value>) -> serde_json::Result<Self> {
        Ok(match kind {
            "Armor" => Self::Armor(parse_details(details)?),
            "Back" => Self::Back(parse_details(details)?),
            "Bag" => Self::Bag(parse_details(details)?),
            "Consumable" => Self::Consumable(parse_details(details)?),
            "Container" => Self::Container(parse_details(details)?),
            "CraftingMaterial" => Self::CraftingMaterial,
            "Gathering" => Self::Gathering(parse_details(details)?),
            "Gizmo" => Self::Gizmo(parse_details(details)?),
            "JadeTechModule" => Self::JadeTechModule,
            "Key" => Self::Key,
            "MiniPet" => Self::MiniPet(parse_details(details)?),
            "PowerCore" => Self::PowerCore,
            "Relic" => Self::Relic,
            "Tool" => Self::Tool(parse_details(details)?),
            "Trait" => Self::Trait,
            "Trinket" => Self::Trinket(parse_details(details)?),
            "Trophy" => Self::Trophy,
            "UpgradeComponent" => Self::UpgradeComponent(parse_details(details)?),
            "Weapon" => Self::Weapon(parse_details(details)?),
            unknown => {
                tracing::debug!(kind = unknown, "unknown item type");
                Self::Unknown {
                    kind: unknown.to_string(),
                    details,
                }
            }
        })
    }

    /// the value of the `type` field
    pub fn kind(&self) -> &str {
        match self {
            Self::Armor(_) => "Armor",
            Self::Back(_) => "Back",
            Self::Bag(_) => "Bag",
            Self::Consumable(_) => "Consumable",
            Self::Container(_) => "Container",
            Self::CraftingMaterial => "CraftingMaterial",
            Self::Gathering(_) => "Gathering",
            Self::Gizmo(_) => "Gizmo",
            Self::JadeTechModule => "JadeTechModule",
            Self::Key => "Key",
            Self::MiniPet(_) => "MiniPet",
            Self::PowerCore => "PowerCore",
            Self::Relic => "Relic",
            Self::Tool(_) => "Tool",
            Self::Trait => "Trait",
            Self::Trinket(_) => "Trinket",
            Self::Trophy => "Trophy",
            Self::UpgradeComponent(_) => "UpgradeComponent",
            Self::Weapon(_) => "Weapon",
            Self::Unknown { kind, .. } => kind,
        }
    }

    fn details_value(&self) -> serde_json::Result<Option<Value>> {
        match self {
            Self::Armor(d) => details_to_value(d),
            Self::Back(d) => details_to_value(d),
            Self::Bag(d) => details_to_value(d),
            Self::Consumable(d) => details_to_value(d),
            Self::Container(d) => details_to_value(d),
            Self::Gathering(d) => details_to_value(d),
            Self::Gizmo(d) => details_to_value(d),
            Self::MiniPet(d) => details_to_value(d),
            Self::Tool(d) => details_to_value(d),
            Self::Trinket(d) => details_to_value(d),
            Self::UpgradeComponent(d) => details_to_value(d),
            Self::Weapon(d) => details_to_value(d),
            Self::Unknown { details, .. } => Ok(details.clone()),
            Self::CraftingMaterial
            | Self::JadeTechModule
            | Self::Key
            | Self::PowerCore
            | Self::Relic
            | Self::Trait
            | Self::Trophy => Ok(None),
        }
    }

    /// the stats block of equipment that has one
    pub fn equipment_stats(&self) -> Option<&EquipmentStats> {
        match self {
            Self::Armor(d) => Some(&d.stats),
            Self::Back(d) => Some(&d.stats),
            Self::Trinket(d) => Some(&d.stats),
            Self::Weapon(d) => Some(&d.stats),
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for ItemDetails {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tagged = TaggedDetails::deserialize(deserializer)?;
        Self::from_parts(&tagged.kind, tagged.details).map_err(D::Error::custom)
    }
}

impl Serialize for ItemDetails {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        TaggedDetailsRef {
            kind: self.kind(),
            details: self.details_value().map_err(S::Error::custom)?,
        }
        .serialize(serializer)
    }
}

impl EndPoint for Item {
    const URL: &'static str = const_format::concatcp!(V2, "/items");
    const AUTH: bool = false;
    const LOCALE: bool = true;
}

impl EndPointWithId for Item {
    type Id = ItemId;
}

impl BulkEndPoint for Item {
    // there are way too many items for `ids=all`
    const ALL: bool = false;
    fn id(&self) -> &Self::Id {
        &self.id
    }
}
