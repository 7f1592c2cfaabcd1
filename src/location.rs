//! Where the payments CSV lives: a local file, stdin (`-`), or an HTTP(S) URL.

use std::{
    fmt,
    fs::File,
    io::{BufReader, Read},
    path::{Path, PathBuf},
    str::FromStr,
};

use log::debug;
use url::Url;

use crate::{error::DataLoadError, io_utils};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataLocation {
    Path(PathBuf),
    Url(Url),
}

impl DataLocation {
    /// Extension of the file name, used to pick a default delimiter.
    pub fn extension(&self) -> Option<&str> {
        match self {
            DataLocation::Path(path) => path.extension().and_then(|ext| ext.to_str()),
            DataLocation::Url(url) => url
                .path_segments()
                .and_then(|mut segments| segments.next_back())
                .and_then(|name| Path::new(name).extension())
                .and_then(|ext| ext.to_str()),
        }
    }

    /// Opens the resource for reading. Remote resources are fetched eagerly and
    /// must answer with a success status.
    pub fn open(&self) -> Result<Box<dyn Read>, DataLoadError> {
        match self {
            DataLocation::Path(path) if io_utils::is_dash(path) => {
                Ok(Box::new(std::io::stdin().lock()))
            }
            DataLocation::Path(path) => {
                let file = File::open(path).map_err(|source| DataLoadError::Io {
                    location: self.to_string(),
                    source,
                })?;
                Ok(Box::new(BufReader::new(file)))
            }
            DataLocation::Url(url) => {
                debug!("Fetching {url}");
                let response =
                    reqwest::blocking::get(url.clone()).map_err(|source| DataLoadError::Http {
                        url: url.to_string(),
                        source,
                    })?;
                let status = response.status();
                if !status.is_success() {
                    return Err(DataLoadError::HttpStatus {
                        url: url.to_string(),
                        status: status.as_u16(),
                    });
                }
                Ok(Box::new(response))
            }
        }
    }
}

impl FromStr for DataLocation {
    type Err = DataLoadError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(invalid(value, "location cannot be empty"));
        }
        if !trimmed.contains("://") {
            return Ok(DataLocation::Path(PathBuf::from(trimmed)));
        }
        let url = Url::parse(trimmed).map_err(|err| invalid(value, &err.to_string()))?;
        match url.scheme() {
            "http" | "https" => {}
            "file" => {
                let path = url
                    .to_file_path()
                    .map_err(|_| invalid(value, "file URL does not name a local path"))?;
                return Ok(DataLocation::Path(path));
            }
            other => return Err(invalid(value, &format!("unsupported scheme '{other}'"))),
        }
        if let Some(raw) = github_raw_equivalent(&url) {
            return Err(invalid(
                value,
                &format!("this is a GitHub page, not a CSV file; use {raw}"),
            ));
        }
        Ok(DataLocation::Url(url))
    }
}

impl fmt::Display for DataLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataLocation::Path(path) if io_utils::is_dash(path) => write!(f, "<stdin>"),
            DataLocation::Path(path) => write!(f, "{}", path.display()),
            DataLocation::Url(url) => write!(f, "{url}"),
        }
    }
}

/// `github.com/<owner>/<repo>/blob/<ref>/<file>` renders HTML; the raw host
/// serves the file itself.
fn github_raw_equivalent(url: &Url) -> Option<String> {
    if url.host_str() != Some("github.com") {
        return None;
    }
    let segments = url.path_segments()?.collect::<Vec<_>>();
    match segments.as_slice() {
        [owner, repo, "blob", rest @ ..] if rest.len() >= 2 => Some(format!(
            "https://raw.githubusercontent.com/{owner}/{repo}/{}",
            rest.join("/")
        )),
        _ => None,
    }
}

fn invalid(location: &str, reason: &str) -> DataLoadError {
    DataLoadError::InvalidLocation {
        location: location.to_string(),
        reason: reason.to_string(),
    }
}
