//! Media upload orchestration.
//!
//! Tracks file selection, remote upload and handle reuse for one or many
//! media slots: a single shared slot, one slot per recipient, or one slot
//! per carousel card. Uploads in a batch run sequentially so progress is
//! reported deterministically and a mid-batch failure leaves no slot in a
//! partially-started state.

pub mod slot;
pub mod uploader;

pub use slot::{place_files, LocalFile, MediaHandle, MediaSlot, SlotBoard, SlotLayout};
pub use uploader::{MediaUploader, NoopUploadObserver, UploadEvent, UploadObserver};
