use serde::de::{Deserializer, Error as _};
use serde::ser::{Error as _, Serializer};
use serde_json::Value;

use super::items::details::{ArmorSlot, DamageType, GatheringKind, WeaponKind, WeightClass};
use super::items::Rarity;
use super::restrictions::Restrictions;
use super::{TaggedDetails, TaggedDetailsRef};
use crate::prelude::*;

pub type SkinId = u32;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Skin {
    pub id: SkinId,
    pub name: String,
    #[serde(default)]
    pub flags: Vec<String>,
    #[serde(default)]
    pub restrictions: Restrictions,
    pub icon: Option<Url>,
    pub rarity: Rarity,
    pub description: Option<String>,
    #[serde(flatten)]
    pub details: SkinDetails,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArmorSkinDetails {
    #[serde(rename = "type")]
    pub slot: ArmorSlot,
    pub weight_class: WeightClass,
    /// per material dye slot overrides. kept raw, the shape differs per race/gender.
    pub dye_slots: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponSkinDetails {
    #[serde(rename = "type")]
    pub kind: WeaponKind,
    pub damage_type: DamageType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatheringSkinDetails {
    #[serde(rename = "type")]
    pub kind: GatheringKind,
}

/// selected by the skin's `type`, same as [super::items::ItemDetails]
#[derive(Debug, Clone, PartialEq)]
pub enum SkinDetails {
    Armor(ArmorSkinDetails),
    Back,
    Gathering(GatheringSkinDetails),
    Weapon(WeaponSkinDetails),
    Unknown {
        kind: String,
        details: Option<Value>,
    },
}

impl SkinDetails {
    pub fn from_parts(kind: &str, details: Option<Value>) -> serde_json::Result<Self> {
        let details_or_empty = |details: Option<Value>| {
            details.unwrap_or_else(|| Value::Object(Default::default()))
        };
        Ok(match kind {
            "Armor" => Self::Armor(serde_json::from_value(details_or_empty(details))?),
            "Back" => Self::Back,
            "Gathering" => Self::Gathering(serde_json::from_value(details_or_empty(details))?),
            "Weapon" => Self::Weapon(serde_json::from_value(details_or_empty(details))?),
            unknown => {
                tracing::debug!(kind = unknown, "unknown skin type");
                Self::Unknown {
                    kind: unknown.to_string(),
                    details,
                }
            }
        })
    }
    pub fn kind(&self) -> &str {
        match self {
            Self::Armor(_) => "Armor",
            Self::Back => "Back",
            Self::Gathering(_) => "Gathering",
            Self::Weapon(_) => "Weapon",
            Self::Unknown { kind, .. } => kind,
        }
    }
    fn details_value(&self) -> serde_json::Result<Option<Value>> {
        Ok(match self {
            Self::Armor(d) => Some(serde_json::to_value(d)?),
            Self::Gathering(d) => Some(serde_json::to_value(d)?),
            Self::Weapon(d) => Some(serde_json::to_value(d)?),
            Self::Back => None,
            Self::Unknown { details, .. } => details.clone(),
        })
    }
}

impl<'de> Deserialize<'de> for SkinDetails {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tagged = TaggedDetails::deserialize(deserializer)?;
        Self::from_parts(&tagged.kind, tagged.details).map_err(D::Error::custom)
    }
}

impl Serialize for SkinDetails {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        TaggedDetailsRef {
            kind: self.kind(),
            details: self.details_value().map_err(S::Error::custom)?,
        }
        .serialize(serializer)
    }
}

impl EndPoint for Skin {
    const URL: &'static str = const_format::concatcp!(V2, "/skins");
    const AUTH: bool = false;
    const LOCALE: bool = true;
}

impl EndPointWithId for Skin {
    type Id = SkinId;
}

impl BulkEndPoint for Skin {
    const ALL: bool = false;
    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn weapon_skin() {
        let skin: Skin = serde_json::from_value(json!({
            "id": 4672,
            "name": "Zap",
            "type": "Weapon",
            "flags": ["ShowInWardrobe"],
            "restrictions": [],
            "icon": "https://render.guildwars2.com/file/AF2D6BB29F4B4B8E3F3C1C5B6B5B0B6B1C0C7F8A/456006.png",
            "rarity": "Exotic",
            "details": {"type": "Scepter", "damage_type": "Lightning"}
        }))
        .unwrap();
        assert_eq!(
            skin.details,
            SkinDetails::Weapon(WeaponSkinDetails {
                kind: WeaponKind::Scepter,
                damage_type: DamageType::Lightning
            })
        );
    }

    #[test]
    fn back_skin_has_no_details() {
        let skin: Skin = serde_json::from_value(json!({
            "id": 2,
            "name": "Back",
            "type": "Back",
            "rarity": "Basic",
            "details": {}
        }))
        .unwrap();
        assert_eq!(skin.details, SkinDetails::Back);
        assert!(skin.restrictions.is_empty());
    }

    #[test]
    fn armor_skin_keeps_dye_slots() {
        let skin: Skin = serde_json::from_value(json!({
            "id": 10,
            "name": "Chainmail Leggings",
            "type": "Armor",
            "rarity": "Fine",
            "restrictions": ["Human"],
            "details": {
                "type": "Leggings",
                "weight_class": "Heavy",
                "dye_slots": {"default": [{"color_id": 4, "material": "metal"}, null], "overrides": {}}
            }
        }))
        .unwrap();
        let SkinDetails::Armor(armor) = &skin.details else {
            panic!("expected armor skin");
        };
        assert_eq!(armor.slot, ArmorSlot::Leggings);
        assert!(armor.dye_slots.is_some());
        let json = serde_json::to_value(&skin).unwrap();
        assert_eq!(json["details"]["weight_class"], "Heavy");
        assert_eq!(json["restrictions"], json!(["Human"]));
    }
}
