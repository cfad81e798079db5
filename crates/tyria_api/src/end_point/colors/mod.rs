use crate::prelude::*;

use super::items::ItemId;

pub type ColorId = u32;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Color {
    pub id: ColorId,
    pub name: String,
    pub base_rgb: [u8; 3],
    pub cloth: ColorMaterial,
    pub leather: ColorMaterial,
    pub metal: ColorMaterial,
    /// only dyes that can be applied to mount/pet fur
    pub fur: Option<ColorMaterial>,
    /// the dye item which unlocks this color
    pub item: Option<ItemId>,
    /// hue, material and rarity. eg: `["Gray", "Metal", "Starter"]`
    #[serde(default)]
    pub categories: Vec<String>,
}

/// how the color looks on a specific material
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColorMaterial {
    pub brightness: i32,
    pub contrast: f32,
    pub hue: u32,
    pub saturation: f32,
    pub lightness: f32,
    pub rgb: [u8; 3],
}

impl Color {
    /// `#rrggbb` of the base color
    pub fn base_hex(&self) -> String {
        let [r, g, b] = self.base_rgb;
        format!("#{r:02x}{g:02x}{b:02x}")
    }
}

impl EndPoint for Color {
    const URL: &'static str = const_format::concatcp!(V2, "/colors");
    const AUTH: bool = false;
    const LOCALE: bool = true;
}

impl EndPointWithId for Color {
    type Id = ColorId;
}

impl BulkEndPoint for Color {
    const ALL: bool = true;
    fn id(&self) -> &Self::Id {
        &self.id
    }
}
