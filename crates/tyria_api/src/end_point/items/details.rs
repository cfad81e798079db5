//! payloads of the `details` object. which one applies depends on the item's `type`.
use serde::{Deserialize, Serialize};

use super::ItemId;
use crate::end_point::{colors::ColorId, empty_string_as_none, skins::SkinId};

api_enum! {
    pub enum ArmorSlot {
        Boots,
        Coat,
        Gloves,
        Helm,
        HelmAquatic,
        Leggings,
        Shoulders,
    }
}

api_enum! {
    pub enum WeightClass {
        Heavy,
        Medium,
        Light,
        Clothing,
    }
}

api_enum! {
    pub enum WeaponKind {
        Axe,
        Dagger,
        Mace,
        Pistol,
        Scepter,
        Sword,
        Focus,
        Shield,
        Torch,
        Warhorn,
        Greatsword,
        Hammer,
        LongBow,
        Rifle,
        ShortBow,
        Staff,
        Harpoon,
        Speargun,
        Trident,
        LargeBundle,
        SmallBundle,
        Toy,
        ToyTwoHanded,
    }
}

api_enum! {
    pub enum DamageType {
        Fire,
        Ice,
        Lightning,
        Physical,
        Choking,
    }
}

api_enum! {
    pub enum ConsumableKind {
        AppearanceChange,
        Booze,
        ContractNpc,
        Currency,
        Food,
        Generic,
        Halloween,
        Immediate,
        MountRandomUnlock,
        RandomUnlock,
        Transmutation,
        Unlock,
        UpgradeRemoval,
        Utility,
        TeleportToFriend,
    }
}

api_enum! {
    pub enum UnlockKind {
        BagSlot,
        BankTab,
        Champion,
        CollectibleCapacity,
        Content,
        CraftingRecipe,
        Dye,
        GliderSkin,
        Minipet,
        Ms,
        Outfit,
        RandomUnlock,
        SharedSlot,
    }
}

api_enum! {
    pub enum ContainerKind {
        Default,
        GiftBox,
        Immediate,
        OpenUI,
    }
}

api_enum! {
    pub enum GatheringKind {
        Foraging,
        Logging,
        Mining,
        Bait,
        Lure,
    }
}

api_enum! {
    pub enum GizmoKind {
        Default,
        ContainerKey,
        RentableContractNpc,
        UnlimitedConsumable,
    }
}

api_enum! {
    pub enum ToolKind {
        Salvage,
    }
}

api_enum! {
    pub enum TrinketKind {
        Accessory,
        Amulet,
        Ring,
    }
}

api_enum! {
    pub enum UpgradeKind {
        Default,
        Gem,
        Rune,
        Sigil,
    }
}

api_enum! {
    pub enum InfusionSlotKind {
        Enrichment,
        Infusion,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfusionSlot {
    #[serde(default)]
    pub flags: Vec<InfusionSlotKind>,
    /// the infusion already in the slot
    pub item_id: Option<ItemId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfixUpgrade {
    /// itemstat id
    pub id: u32,
    #[serde(default)]
    pub attributes: Vec<AttributeModifier>,
    pub buff: Option<Buff>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeModifier {
    pub attribute: String,
    pub modifier: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Buff {
    pub skill_id: u32,
    pub description: Option<String>,
}

/// the stat related fields shared by armor, back items, trinkets and weapons
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EquipmentStats {
    #[serde(default)]
    pub infusion_slots: Vec<InfusionSlot>,
    #[serde(default)]
    pub attribute_adjustment: f64,
    pub infix_upgrade: Option<InfixUpgrade>,
    pub suffix_item_id: Option<ItemId>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub secondary_suffix_item_id: Option<ItemId>,
    /// selectable itemstat ids
    #[serde(default)]
    pub stat_choices: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArmorDetails {
    #[serde(rename = "type")]
    pub slot: ArmorSlot,
    pub weight_class: WeightClass,
    pub defense: u32,
    #[serde(flatten)]
    pub stats: EquipmentStats,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackDetails {
    #[serde(flatten)]
    pub stats: EquipmentStats,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BagDetails {
    pub size: u32,
    /// invisible bag
    pub no_sell_or_sort: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsumableDetails {
    #[serde(rename = "type")]
    pub kind: ConsumableKind,
    pub description: Option<String>,
    pub duration_ms: Option<u64>,
    pub unlock_type: Option<UnlockKind>,
    pub color_id: Option<ColorId>,
    pub recipe_id: Option<u32>,
    #[serde(default)]
    pub extra_recipe_ids: Vec<u32>,
    pub guild_upgrade_id: Option<u32>,
    pub apply_count: Option<u32>,
    pub name: Option<String>,
    pub icon: Option<url::Url>,
    #[serde(default)]
    pub skins: Vec<SkinId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerDetails {
    #[serde(rename = "type")]
    pub kind: ContainerKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatheringDetails {
    #[serde(rename = "type")]
    pub kind: GatheringKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GizmoDetails {
    #[serde(rename = "type")]
    pub kind: GizmoKind,
    pub guild_upgrade_id: Option<u32>,
    #[serde(default)]
    pub vendor_ids: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MiniPetDetails {
    pub minipet_id: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDetails {
    #[serde(rename = "type")]
    pub kind: ToolKind,
    pub charges: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrinketDetails {
    #[serde(rename = "type")]
    pub kind: TrinketKind,
    #[serde(flatten)]
    pub stats: EquipmentStats,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpgradeComponentDetails {
    #[serde(rename = "type")]
    pub kind: UpgradeKind,
    /// the weapon/armor types this upgrade can be applied to
    #[serde(default)]
    pub flags: Vec<String>,
    #[serde(default)]
    pub infusion_upgrade_flags: Vec<InfusionSlotKind>,
    #[serde(default)]
    pub suffix: String,
    pub infix_upgrade: Option<InfixUpgrade>,
    /// rune bonuses, one per equipped piece
    #[serde(default)]
    pub bonuses: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponDetails {
    #[serde(rename = "type")]
    pub kind: WeaponKind,
    pub damage_type: DamageType,
    pub min_power: u32,
    pub max_power: u32,
    pub defense: u32,
    #[serde(flatten)]
    pub stats: EquipmentStats,
}
