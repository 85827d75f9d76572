//! Photo uploads for new listings.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;
use url::Url;

pub const ACCEPTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("{} does not exist", .0.display())]
    Missing(PathBuf),
    #[error("{} is not an image (expected jpg, jpeg, png or webp)", .0.display())]
    UnsupportedType(PathBuf),
    #[error("failed to store {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot express {} as a URL", .0.display())]
    Url(PathBuf),
    #[error("{0} was not stored by this gateway")]
    Foreign(Url),
}

/// Somewhere listing photos can be sent. Returns the URL the photo is served from.
pub trait UploadGateway {
    fn upload(&mut self, file: &Path) -> Result<Url, UploadError>;

    /// Removes a photo this gateway stored earlier.
    fn discard(&mut self, url: &Url) -> Result<(), UploadError>;
}

pub fn is_accepted_image(file: &Path) -> bool {
    file.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            ACCEPTED_EXTENSIONS
                .iter()
                .any(|accepted| accepted.eq_ignore_ascii_case(ext))
        })
}

/// Copies photos into a local media directory and hands back `file://` URLs.
#[derive(Debug, Clone)]
pub struct LocalGateway {
    media_dir: PathBuf,
}

impl LocalGateway {
    pub fn new(media_dir: impl Into<PathBuf>) -> Self {
        Self {
            media_dir: media_dir.into(),
        }
    }

    pub fn media_dir(&self) -> &Path {
        &self.media_dir
    }

    /// First free name in the media directory, numbering duplicates `name-1.ext`, `name-2.ext`, ...
    fn destination(&self, file: &Path) -> Result<PathBuf, UploadError> {
        let stem = file
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| UploadError::UnsupportedType(file.to_path_buf()))?;
        let ext = file
            .extension()
            .and_then(|s| s.to_str())
            .ok_or_else(|| UploadError::UnsupportedType(file.to_path_buf()))?;

        let mut candidate = self.media_dir.join(format!("{stem}.{ext}"));
        let mut n = 1;
        while candidate.exists() {
            candidate = self.media_dir.join(format!("{stem}-{n}.{ext}"));
            n += 1;
        }
        Ok(candidate)
    }
}

impl UploadGateway for LocalGateway {
    fn upload(&mut self, file: &Path) -> Result<Url, UploadError> {
        if !file.is_file() {
            return Err(UploadError::Missing(file.to_path_buf()));
        }
        if !is_accepted_image(file) {
            return Err(UploadError::UnsupportedType(file.to_path_buf()));
        }

        fs::create_dir_all(&self.media_dir).map_err(|source| UploadError::Io {
            path: self.media_dir.clone(),
            source,
        })?;
        let dest = self.destination(file)?;
        fs::copy(file, &dest).map_err(|source| UploadError::Io {
            path: dest.clone(),
            source,
        })?;
        let dest = dest.canonicalize().map_err(|source| UploadError::Io {
            path: dest.clone(),
            source,
        })?;

        let url = Url::from_file_path(&dest).map_err(|_| UploadError::Url(dest.clone()))?;
        info!(%url, "stored photo");
        Ok(url)
    }

    fn discard(&mut self, url: &Url) -> Result<(), UploadError> {
        let media_dir = self
            .media_dir
            .canonicalize()
            .map_err(|_| UploadError::Foreign(url.clone()))?;
        let path = url
            .to_file_path()
            .ok()
            .filter(|path| path.starts_with(&media_dir))
            .ok_or_else(|| UploadError::Foreign(url.clone()))?;
        fs::remove_file(&path).map_err(|source| UploadError::Io { path, source })?;
        info!(%url, "removed photo");
        Ok(())
    }
}
