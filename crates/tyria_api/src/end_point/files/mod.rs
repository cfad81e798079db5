use crate::prelude::*;
use crate::render::RenderFile;

/// named icons which are not attached to any other resource. eg: `map_complete`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct File {
    pub id: String,
    pub icon: Url,
}

impl File {
    pub fn render_file(&self) -> crate::ApiResult<RenderFile> {
        RenderFile::from_url(&self.icon)
    }
}

impl EndPoint for File {
    const URL: &'static str = const_format::concatcp!(V2, "/files");
    const AUTH: bool = false;
    const LOCALE: bool = false;
}

impl EndPointWithId for File {
    type Id = String;
}

impl BulkEndPoint for File {
    const ALL: bool = true;
    fn id(&self) -> &Self::Id {
        &self.id
    }
}
