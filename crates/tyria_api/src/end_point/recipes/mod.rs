use crate::prelude::*;

use super::items::ItemId;

pub type RecipeId = u32;
pub(crate) const SEARCH_URL: &str = const_format::concatcp!(V2, "/recipes/search");

api_enum! {
    pub enum Discipline {
        Armorsmith,
        Artificer,
        Chef,
        Huntsman,
        Jeweler,
        Leatherworker,
        Scribe,
        Tailor,
        Weaponsmith,
    }
}

api_enum! {
    pub enum IngredientKind {
        Item,
        Currency,
        GuildUpgrade,
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    pub id: RecipeId,
    /// the kind of output. eg: `Boots`, `Refinement`, `Feast`
    #[serde(rename = "type")]
    pub kind: String,
    pub output_item_id: ItemId,
    pub output_item_count: u32,
    pub time_to_craft_ms: u32,
    #[serde(default)]
    pub disciplines: Vec<Discipline>,
    pub min_rating: u32,
    /// `AutoLearned`, `LearnedFromItem`
    #[serde(default)]
    pub flags: Vec<String>,
    pub ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub guild_ingredients: Vec<GuildIngredient>,
    pub output_upgrade_id: Option<u32>,
    pub chat_link: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    #[serde(rename = "type")]
    pub kind: IngredientKind,
    pub id: u32,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildIngredient {
    pub upgrade_id: u32,
    pub count: u32,
}

impl Recipe {
    pub fn is_auto_learned(&self) -> bool {
        self.flags.iter().any(|f| f == "AutoLearned")
    }
    /// item ingredients only, skipping currencies and guild upgrades
    pub fn item_ingredients(&self) -> impl Iterator<Item = &Ingredient> {
        self.ingredients
            .iter()
            .filter(|i| i.kind == IngredientKind::Item)
    }
}

impl EndPoint for Recipe {
    const URL: &'static str = const_format::concatcp!(V2, "/recipes");
    const AUTH: bool = false;
    const LOCALE: bool = false;
}

impl EndPointWithId for Recipe {
    type Id = RecipeId;
}

impl BulkEndPoint for Recipe {
    const ALL: bool = false;
    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_recipe_with_currency() {
        let recipe: Recipe = serde_json::from_str(
            r#"{
                "id": 7319,
                "type": "RefinementEctoplasm",
                "output_item_id": 46742,
                "output_item_count": 1,
                "time_to_craft_ms": 5000,
                "disciplines": ["Armorsmith", "Artificer", "Huntsman", "Weaponsmith", "Wizard"],
                "min_rating": 450,
                "flags": ["AutoLearned"],
                "ingredients": [
                    {"type": "Item", "id": 19684, "count": 50},
                    {"type": "Item", "id": 19721, "count": 1},
                    {"type": "Currency", "id": 1, "count": 100}
                ],
                "chat_link": "[&CZccAAA=]"
            }"#,
        )
        .unwrap();
        assert!(recipe.is_auto_learned());
        assert_eq!(recipe.item_ingredients().count(), 2);
        assert_eq!(recipe.disciplines[4], Discipline::Other("Wizard".to_string()));
        assert!(recipe.guild_ingredients.is_empty());
    }
}
