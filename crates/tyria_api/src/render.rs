//! The render service hosts every icon that the api references.
//! urls look like `https://render.guildwars2.com/file/{signature}/{file_id}.{png|jpg}`
use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{ApiError, ApiResult};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    #[default]
    Png,
    Jpg,
}

impl ImageFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpg => "jpg",
        }
    }
}

impl FromStr for ImageFormat {
    type Err = ApiError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "jpg" | "jpeg" => Ok(Self::Jpg),
            other => Err(ApiError::InvalidRenderUrl(format!(
                "unsupported image format: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RenderFile {
    /// sha1 of the file, as 40 hex digits
    pub signature: String,
    pub file_id: u64,
}

impl RenderFile {
    pub fn new(signature: impl Into<String>, file_id: u64) -> ApiResult<Self> {
        let signature = signature.into();
        if signature.is_empty() || !signature.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ApiError::InvalidRenderUrl(format!(
                "signature is not hexadecimal: {signature}"
            )));
        }
        Ok(Self { signature, file_id })
    }

    /// accepts any url with a `/file/{signature}/{file_id}.{ext}` path. The host is not checked,
    /// so that mirrors and test servers work too.
    pub fn from_url(url: &Url) -> ApiResult<Self> {
        let invalid = || ApiError::InvalidRenderUrl(url.to_string());
        let segments: Vec<&str> = url.path_segments().ok_or_else(invalid)?.collect();
        let [file, signature, name] = segments.as_slice() else {
            return Err(invalid());
        };
        if *file != "file" {
            return Err(invalid());
        }
        let (id, extension) = name.rsplit_once('.').ok_or_else(invalid)?;
        extension.parse::<ImageFormat>().map_err(|_| invalid())?;
        let file_id = id.parse().map_err(|_| invalid())?;
        Self::new(*signature, file_id)
    }

    /// the download url on the render service at `render_base`
    pub fn url(&self, render_base: &Url, format: ImageFormat) -> ApiResult<Url> {
        Ok(render_base.join(&format!(
            "file/{}/{}.{}",
            self.signature,
            self.file_id,
            format.extension()
        ))?)
    }
}

impl FromStr for RenderFile {
    type Err = ApiError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_url(&Url::parse(s)?)
    }
}

impl Display for RenderFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.signature, self.file_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const ICON: &str = "https://render.guildwars2.com/file/943538394A94A491C8632FBEF6203C2013443555/102478.png";

    #[test]
    fn parses_and_rebuilds_icon_url() {
        let file: RenderFile = ICON.parse().unwrap();
        assert_eq!(file.signature, "943538394A94A491C8632FBEF6203C2013443555");
        assert_eq!(file.file_id, 102478);
        let base = Url::parse(crate::RENDER_BASE_URL).unwrap();
        assert_eq!(file.url(&base, ImageFormat::Png).unwrap().as_str(), ICON);
        assert!(file
            .url(&base, ImageFormat::Jpg)
            .unwrap()
            .as_str()
            .ends_with("/102478.jpg"));
    }

    #[rstest]
    #[case("https://render.guildwars2.com/file/943538394A94A491C8632FBEF6203C2013443555")]
    #[case("https://render.guildwars2.com/files/943538394A94A491C8632FBEF6203C2013443555/1.png")]
    #[case("https://render.guildwars2.com/file/NOTHEX/1.png")]
    #[case("https://render.guildwars2.com/file/943538394A94A491C8632FBEF6203C2013443555/abc.png")]
    #[case("https://render.guildwars2.com/file/943538394A94A491C8632FBEF6203C2013443555/1.gif")]
    #[case("https://render.guildwars2.com/file/943538394A94A491C8632FBEF6203C2013443555/1")]
    fn rejects_other_urls(#[case] url: &str) {
        assert!(matches!(
            url.parse::<RenderFile>(),
            Err(ApiError::InvalidRenderUrl(_))
        ));
    }
}
