//! # Image Bundles
//!
//! `image.push` does not inline image data in the envelope. Instead, every referenced file is
//! packed into one zip archive that travels as the `file` part of a multipart request, and
//! each image's `filename` is rewritten to its name inside that archive so the connector can
//! find it after the transfer.
//!
//! Archive names follow `{hostId}_{relationType}_{baseFilename}`, e.g. `42_product_front.jpg`.
//!
//! Images whose file does not exist locally are skipped: they are neither archived nor
//! renamed. When several images map to the same archive name, the first file is archived
//! and all of them are renamed to it. The archive is a temporary file removed when the [`ImageBundle`] is dropped.
use crate::{model::ImageEntity, transport::Attachment};
use std::{
    fs::File,
    io,
    path::{Path, PathBuf},
};
use tempfile::NamedTempFile;
use zip::{ZipWriter, result::ZipError, write::SimpleFileOptions};

#[derive(Debug, thiserror::Error)]
pub enum BundleError {
    #[error("Could not open temporary zip file: '{0}'")]
    TempFile(#[source] io::Error),
    #[error("Failed to read image '{path}': '{source}'")]
    ReadImage { path: PathBuf, source: io::Error },
    #[error("Failed to add '{name}' to the archive: '{source}'")]
    AddFile { name: String, source: ZipError },
    #[error("Failed to finalize the archive: '{0}'")]
    Finish(#[source] ZipError),
}

/// A temporary zip archive of image files.
#[derive(Debug)]
pub struct ImageBundle {
    file: NamedTempFile,
    entries: Vec<String>,
}

impl ImageBundle {
    /// Archives the files of `images` and rewrites their filenames to the archive names.
    pub fn build<'a, I>(images: I) -> Result<Self, BundleError>
    where
        I: IntoIterator<Item = &'a mut dyn ImageEntity>,
    {
        let mut file = tempfile::Builder::new()
            .prefix("images-")
            .suffix(".zip")
            .tempfile()
            .map_err(BundleError::TempFile)?;

        let mut entries = Vec::new();
        let mut zip = ZipWriter::new(file.as_file_mut());
        let options = SimpleFileOptions::default();

        for image in images {
            let path = PathBuf::from(image.filename());
            if !path.is_file() {
                tracing::debug!(path = %path.display(), "image file not found, leaving it out of the bundle");
                continue;
            }

            let name = archive_name(image.host_id(), image.relation_type(), &path);

            if entries.contains(&name) {
                tracing::debug!(%name, "image already bundled under this name");
                image.set_filename(name);
                continue;
            }

            let mut source = File::open(&path).map_err(|source| BundleError::ReadImage {
                path: path.clone(),
                source,
            })?;

            zip.start_file(name.as_str(), options)
                .map_err(|source| BundleError::AddFile {
                    name: name.clone(),
                    source,
                })?;

            io::copy(&mut source, &mut zip).map_err(|source| BundleError::AddFile {
                name: name.clone(),
                source: source.into(),
            })?;

            image.set_filename(name.clone());
            entries.push(name);
        }

        zip.finish().map_err(BundleError::Finish)?;

        tracing::debug!(
            path = %file.path().display(),
            entries = entries.len(),
            "image bundle created"
        );

        Ok(Self { file, entries })
    }

    /// Location of the archive on disk. Valid until the bundle is dropped.
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Names of the archived files, in insertion order.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The multipart attachment carrying this archive.
    pub fn attachment(&self) -> Attachment {
        Attachment::image_archive(self.path())
    }
}

fn archive_name(host_id: u64, relation_type: &str, path: &Path) -> String {
    let base = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!("{host_id}_{relation_type}_{base}")
}
