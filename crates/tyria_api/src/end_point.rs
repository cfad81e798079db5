//! Every resource of the api is a rust type which describes where it lives with these traits.
//! The clients only ever deal with the traits, so adding a new endpoint is just
//! a struct + an impl block.
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::hash::Hash;

pub mod account;
pub mod achievements;
pub mod build;
pub mod colors;
pub mod files;
pub mod guild;
pub mod items;
pub mod maps;
pub mod recipes;
pub mod restrictions;
pub mod skins;
pub mod worlds;
pub mod wvw;

pub trait EndPoint: DeserializeOwned {
    /// path relative to the api root. eg: `v2/items`
    const URL: &'static str;
    /// needs an api key
    const AUTH: bool;
    /// the response depends on the `lang` query parameter
    const LOCALE: bool;
    /// some endpoints answer without a key, but return more data with one.
    /// The key is sent if the client has one.
    const OPTIONAL_AUTH: bool = false;
}

pub trait EndPointWithId: EndPoint {
    type Id: Display + Clone + Eq + Hash + DeserializeOwned + Send + Sync;
}

pub trait BulkEndPoint: EndPointWithId {
    /// supports `?ids=all`
    const ALL: bool;
    fn id(&self) -> &Self::Id;
}

/// The wire shape of polymorphic resources: `{"type": "Armor", "details": {..}}`.
/// Items and skins flatten this into their struct and dispatch on `kind`.
#[derive(Deserialize)]
pub(crate) struct TaggedDetails {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub details: Option<serde_json::Value>,
}

#[derive(Serialize)]
pub(crate) struct TaggedDetailsRef<'a> {
    #[serde(rename = "type")]
    pub kind: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// the api sends `""` instead of omitting a few fields (eg: `secondary_suffix_item_id`).
pub(crate) fn empty_string_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: std::str::FromStr,
    T::Err: Display,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrNumber {
        String(String),
        Number(u64),
    }
    match Option::<StringOrNumber>::deserialize(deserializer)? {
        None => Ok(None),
        Some(StringOrNumber::String(s)) if s.is_empty() => Ok(None),
        Some(StringOrNumber::String(s)) => s.parse().map(Some).map_err(serde::de::Error::custom),
        Some(StringOrNumber::Number(n)) => n
            .to_string()
            .parse()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}
