use crate::config::SinkTarget;
use crate::error::Result;
use crate::fetch::FetchedImage;
use crate::results::PersistedImage;
use crate::storage::{GcsClient, ObjectStore};
use std::path::{Path, PathBuf};

/// Destination every image of a session is written to
pub enum ImageSink {
    /// Files in a local folder
    Local { folder: PathBuf },
    /// Objects in a bucket, staged through a local file first
    ObjectStore {
        staging: PathBuf,
        store: Box<dyn ObjectStore>,
    },
}

impl ImageSink {
    /// Prepare the sink for a target; the folder exists afterwards
    ///
    /// Object storage stages files in `images_dir` and needs readable credentials.
    pub fn open(target: &SinkTarget, images_dir: &Path) -> Result<Self> {
        match target {
            SinkTarget::LocalFolder { path } => Self::local(path),
            SinkTarget::ObjectStore {
                credentials,
                bucket,
            } => {
                let store = GcsClient::from_service_account_file(credentials, bucket)?;
                Self::object_store(images_dir, Box::new(store))
            }
        }
    }

    pub fn local(folder: impl Into<PathBuf>) -> Result<Self> {
        let folder = folder.into();
        std::fs::create_dir_all(&folder)?;
        Ok(ImageSink::Local { folder })
    }

    pub fn object_store(staging: impl Into<PathBuf>, store: Box<dyn ObjectStore>) -> Result<Self> {
        let staging = staging.into();
        std::fs::create_dir_all(&staging)?;
        Ok(ImageSink::ObjectStore { staging, store })
    }

    /// Write one image and report where it landed
    pub async fn persist(&self, image: &FetchedImage) -> Result<PersistedImage> {
        match self {
            ImageSink::Local { folder } => {
                let path = write_file(folder, image).await?;
                Ok(PersistedImage {
                    name: image.filename.clone(),
                    location: path.display().to_string(),
                })
            }
            ImageSink::ObjectStore { staging, store } => {
                let path = write_file(staging, image).await?;
                let bytes = tokio::fs::read(&path).await?;
                store
                    .upload(&image.filename, content_type_for(&image.filename), bytes)
                    .await?;
                // A failed upload leaves the staged file in place
                tokio::fs::remove_file(&path).await?;
                Ok(PersistedImage {
                    name: image.filename.clone(),
                    location: format!("gs://{}/{}", store.bucket(), image.filename),
                })
            }
        }
    }
}

async fn write_file(folder: &Path, image: &FetchedImage) -> Result<PathBuf> {
    let path = folder.join(&image.filename);
    tokio::fs::write(&path, &image.bytes).await?;
    ::log::debug!("Wrote {} bytes to {}", image.bytes.len(), path.display());
    Ok(path)
}

/// Content type for an uploaded object, judged from its name
pub fn content_type_for(filename: &str) -> &'static str {
    if filename.contains("jpeg") {
        "image/jpeg"
    } else {
        "image/png"
    }
}
