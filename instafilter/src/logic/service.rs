//! External collaborators: photo picker, share sheet and review prompt.

use super::share::SharePayload;
use anyhow::{Context, Result};
use log::info;
use std::{fs, io::ErrorKind, path::PathBuf};

pub trait ImagePicker {
    /// Raw bytes of the picked photo, `None` when the user cancelled.
    fn pick_one(&self) -> Result<Option<Vec<u8>>>;
}

pub trait ShareService {
    fn share(&self, payload: &SharePayload) -> Result<()>;
}

/// Fire and forget.
pub trait ReviewPrompt {
    fn request_review(&self);
}

/// Picks the file given on the command line. A missing file counts as a cancelled pick.
#[derive(Debug, Clone)]
pub struct FilePicker {
    path: PathBuf,
}

impl FilePicker {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ImagePicker for FilePicker {
    fn pick_one(&self) -> Result<Option<Vec<u8>>> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("{} not found, nothing picked", self.path.display());
                Ok(None)
            }
            Err(e) => Err(e).with_context(|| format!("read {} failed", self.path.display())),
        }
    }
}

/// Shares by writing the PNG to a file.
#[derive(Debug, Clone)]
pub struct FileShare {
    path: PathBuf,
}

impl FileShare {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ShareService for FileShare {
    fn share(&self, payload: &SharePayload) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }

        fs::write(&self.path, &payload.png)
            .with_context(|| format!("write {} failed", self.path.display()))?;
        info!(
            "shared \"{}\" ({}x{}) to {}",
            payload.title,
            payload.width,
            payload.height,
            self.path.display()
        );
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DesktopReviewPrompt;

impl ReviewPrompt for DesktopReviewPrompt {
    fn request_review(&self) {
        info!("requesting review");
        println!("Enjoying Instafilter? Please take a moment to leave a review.");
    }
}
