use crate::prelude::*;

/// The current game build. changes with every patch, so it is a cheap way to check
/// whether cached data might be stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Build {
    pub id: u32,
}

impl EndPoint for Build {
    const URL: &'static str = const_format::concatcp!(V2, "/build");
    const AUTH: bool = false;
    const LOCALE: bool = false;
}
