//! Typed bindings for the Guild Wars 2 API.
//!
//! 1. every resource is a plain serde type that implements the [EndPoint] traits
//! 2. [Client] (blocking, ureq) and [AsyncClient] (reqwest) expose the same operations
//!     1. `get` for singleton resources like [end_point::build::Build]
//!     2. `ids`, `single`, `many`, `all` and `page` for bulk resources
//!     3. a few search style helpers (guild by name, recipes by ingredient, wvw match by world)
//!     4. `render` to download icons from the render service
//! 3. both clients can share an in memory [ResponseCache] which respects the cache-control header of the api.
//!
//! resources:
//! 1. https://wiki.guildwars2.com/wiki/API:Main
//! 2. https://wiki.guildwars2.com/wiki/API:2
//! 3. https://wiki.guildwars2.com/wiki/API:Render_service
#[macro_use]
mod api_enum;

pub mod cache;
pub mod client;
pub mod config;
pub mod end_point;
pub mod error;
pub mod render;
pub mod request;

pub use cache::ResponseCache;
pub use client::{AsyncClient, Client};
pub use config::ClientConfig;
pub use end_point::{BulkEndPoint, EndPoint, EndPointWithId};
pub use error::{ApiError, ApiResult, TransportKind};
pub use render::{ImageFormat, RenderFile};
pub use request::{Language, Page};

pub const API_BASE_URL: &str = "https://api.guildwars2.com/";
pub const RENDER_BASE_URL: &str = "https://render.guildwars2.com/";
pub(crate) const V2: &str = "v2";
// https://wiki.guildwars2.com/wiki/API:Changelog
pub const LATEST_SCHEMA: &str = "2022-03-23T19:00:00.000Z";
/// the api refuses `ids` lists and page sizes longer than this
pub const MAX_IDS_PER_REQUEST: usize = 200;

pub(crate) mod prelude {
    pub use crate::end_point::{BulkEndPoint, EndPoint, EndPointWithId};
    pub(crate) use crate::V2;
    pub use serde::{Deserialize, Serialize};
    pub use time::OffsetDateTime;
    pub use url::Url;
}
