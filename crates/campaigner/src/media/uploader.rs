use log::{debug, info, warn};

use crate::error::MediaError;
use crate::remote::MediaStore;

use super::slot::{MediaHandle, SlotBoard};

/// Progress events emitted during a batch upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadEvent {
    Started { index: usize },
    /// A slot already resolved to a handle for its current file; no
    /// remote call was issued.
    Skipped { index: usize },
    /// Emitted after each completed slot so a caller can report
    /// "k of N uploaded" without waiting for the full batch.
    Uploaded {
        index: usize,
        completed: usize,
        total: usize,
    },
    Failed { index: usize, error: String },
}

pub trait UploadObserver: Send + Sync {
    fn on_event(&self, event: &UploadEvent);
}

/// No-op observer for unit tests and single-slot uploads.
pub struct NoopUploadObserver;

impl UploadObserver for NoopUploadObserver {
    fn on_event(&self, _event: &UploadEvent) {}
}

/// Drives slot uploads against the media store.
pub struct MediaUploader<'a, S: MediaStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: MediaStore + ?Sized> MediaUploader<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Uploads one slot's file, returning its handle.
    ///
    /// A slot that already holds a valid handle for its current file is
    /// skipped without a remote call. A slot with neither file nor handle
    /// is an error.
    pub async fn upload_slot(
        &self,
        board: &mut SlotBoard,
        index: usize,
    ) -> Result<MediaHandle, MediaError> {
        let slot = board.slot_mut(index)?;

        if let Some(handle) = slot.handle() {
            debug!("slot {} already resolved, skipping upload", index);
            return Ok(handle.clone());
        }

        let file = slot
            .file()
            .cloned()
            .ok_or(MediaError::NothingToUpload { index })?;

        slot.begin_upload();
        match self.store.upload_media(&file).await {
            Ok(handle) => {
                info!("uploaded '{}' for slot {} -> {}", file.name, index, handle.as_str());
                slot.finish_upload(handle.clone());
                Ok(handle)
            }
            Err(source) => {
                warn!("upload of '{}' for slot {} failed: {}", file.name, index, source);
                slot.fail_upload(source.to_string());
                Err(MediaError::Upload { index, source })
            }
        }
    }

    /// Uploads every slot that holds an un-uploaded file, sequentially and
    /// in index order. Empty slots are left alone; a failure aborts the
    /// batch so later slots are never partially started.
    ///
    /// Returns the number of fresh uploads performed.
    pub async fn upload_all(
        &self,
        board: &mut SlotBoard,
        observer: &dyn UploadObserver,
    ) -> Result<usize, MediaError> {
        let total = board.len();
        let mut completed = 0;
        let mut uploaded = 0;

        for index in 0..total {
            let slot = board.slot_mut(index)?;
            if slot.is_empty() {
                continue;
            }
            if slot.handle().is_some() {
                completed += 1;
                observer.on_event(&UploadEvent::Skipped { index });
                continue;
            }

            observer.on_event(&UploadEvent::Started { index });
            match self.upload_slot(board, index).await {
                Ok(_) => {
                    completed += 1;
                    uploaded += 1;
                    observer.on_event(&UploadEvent::Uploaded {
                        index,
                        completed,
                        total,
                    });
                }
                Err(error) => {
                    observer.on_event(&UploadEvent::Failed {
                        index,
                        error: error.to_string(),
                    });
                    return Err(error);
                }
            }
        }

        debug!("batch upload done: {} fresh, {} resolved of {}", uploaded, completed, total);
        Ok(uploaded)
    }
}
