use crate::prelude::*;
use cap_std::{ambient_authority, fs::Dir};
use std::path::PathBuf;

/// We will read a path from env `TYRIA_DATA_DIR` or create a folder at data_local_dir/tyria, where data_local_dir is platform specific.
/// The config file and the log file live inside this directory.
pub fn get_tyria_dir() -> Result<(PathBuf, Dir)> {
    let authority = ambient_authority();
    let path = match std::env::var_os("TYRIA_DATA_DIR") {
        Some(env_dir) => PathBuf::from(env_dir),
        None => directories_next::ProjectDirs::from("com.tyria", "", "tyria")
            .ok_or_else(|| miette::miette!("getting project dirs failed for some reason"))?
            .data_local_dir()
            .to_path_buf(),
    };
    if path.to_str().is_none() {
        bail!("tyria data dir is not utf-8: {path:?}");
    }
    open_dir(path, authority)
}

pub(crate) fn open_dir(
    path: PathBuf,
    authority: cap_std::AmbientAuthority,
) -> Result<(PathBuf, Dir)> {
    Dir::create_ambient_dir_all(&path, authority)
        .into_diagnostic()
        .wrap_err_with(|| format!("failed to create tyria directory at {path:?}"))?;
    let dir = Dir::open_ambient_dir(&path, authority)
        .into_diagnostic()
        .wrap_err_with(|| format!("failed to open tyria data dir at {path:?}"))?;
    Ok((path, dir))
}
