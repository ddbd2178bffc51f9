use std::path::{Path, PathBuf};

use crate::{reporter::Reporter, utils};

pub const IMAGE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "webp"];

/// Flat directory of cover images, matched to shows by file stem.
pub struct ArtworkDirectory {
    dir: PathBuf,
}

impl ArtworkDirectory {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self) -> &Path {
        &self.dir
    }

    /// Fuzzy-matches `show_name` against the stems of the images in the
    /// directory, using the same policy as catalog lookups.
    ///
    /// Images are considered in file-name order. A missing directory or no
    /// match yields `None`.
    pub async fn find(&self, show_name: &str, reporter: &dyn Reporter) -> Option<PathBuf> {
        let images = match self.images().await {
            Ok(images) => images,
            Err(e) => {
                reporter.warning(&format!(
                    "Image folder not available: {} ({})",
                    self.dir.display(),
                    e
                ));
                return None;
            }
        };

        let stems: Vec<(String, PathBuf)> = images
            .into_iter()
            .filter_map(|path| {
                let stem = path.file_stem()?.to_str()?.to_string();
                Some((stem, path))
            })
            .collect();

        let found = utils::best_match(show_name, stems.iter().map(|(stem, _)| stem.as_str()))
            .and_then(|best| stems.iter().find(|(stem, _)| stem == best))
            .map(|(_, path)| path.clone());

        match &found {
            Some(path) => reporter.info(&format!(
                "Found matching image: {}",
                path.file_name().unwrap_or_default().to_string_lossy()
            )),
            None => reporter.info(&format!("No matching image found for {}", show_name)),
        }

        found
    }

    async fn images(&self) -> std::io::Result<Vec<PathBuf>> {
        let mut entries = tokio::fs::read_dir(&self.dir).await?;
        let mut images = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if !is_image(&path) {
                continue;
            }

            let file_type = entry.file_type().await?;
            let is_file = if file_type.is_symlink() {
                // follow the link, a dangling one is skipped
                tokio::fs::metadata(&path)
                    .await
                    .map(|meta| meta.is_file())
                    .unwrap_or(false)
            } else {
                file_type.is_file()
            };

            if is_file {
                images.push(path);
            }
        }

        images.sort();
        Ok(images)
    }
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_lowercase();
            IMAGE_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}
