use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::MediaError;
use crate::recipient::Recipient;

/// An opaque reference returned by the media store after a successful
/// upload, substitutable for a raw file in later API calls.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaHandle(pub String);

impl MediaHandle {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A locally selected file, not yet (or no longer) uploaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalFile {
    pub name: String,
    pub path: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

impl LocalFile {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            content_type: None,
        }
    }
}

/// One media slot.
///
/// A non-null handle corresponds to the file currently assigned to the
/// slot; any mutation that changes the file invalidates the handle. A
/// handle without a file is valid too: it is media inherited from the
/// template itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaSlot {
    file: Option<LocalFile>,
    handle: Option<MediaHandle>,
    uploading: bool,
    last_error: Option<String>,
}

impl MediaSlot {
    pub fn empty() -> Self {
        Self::default()
    }

    /// A slot pre-resolved by media the template already carries.
    pub fn inherited(handle: MediaHandle) -> Self {
        Self {
            file: None,
            handle: Some(handle),
            uploading: false,
            last_error: None,
        }
    }

    pub fn file(&self) -> Option<&LocalFile> {
        self.file.as_ref()
    }

    pub fn handle(&self) -> Option<&MediaHandle> {
        self.handle.as_ref()
    }

    pub fn is_uploading(&self) -> bool {
        self.uploading
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Assigns a file. A changed file discards the stale handle and any
    /// previous error; re-assigning the identical file keeps the handle.
    pub fn set_file(&mut self, file: LocalFile) {
        if self.file.as_ref() != Some(&file) {
            self.handle = None;
            self.last_error = None;
        }
        self.file = Some(file);
        self.uploading = false;
    }

    /// Clears the slot entirely.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// A slot is resolved when it holds a handle and no upload is in
    /// flight. Resolution is what the execute gate checks.
    pub fn is_resolved(&self) -> bool {
        self.handle.is_some() && !self.uploading
    }

    /// True when the slot holds a file without a matching handle.
    pub fn needs_upload(&self) -> bool {
        self.file.is_some() && self.handle.is_none()
    }

    /// True when the slot holds neither a file nor a handle.
    pub fn is_empty(&self) -> bool {
        self.file.is_none() && self.handle.is_none()
    }

    pub(crate) fn begin_upload(&mut self) {
        self.uploading = true;
        self.last_error = None;
    }

    pub(crate) fn finish_upload(&mut self, handle: MediaHandle) {
        self.uploading = false;
        self.handle = Some(handle);
    }

    pub(crate) fn fail_upload(&mut self, error: String) {
        self.uploading = false;
        self.handle = None;
        self.last_error = Some(error);
    }
}

/// How a board's slots relate to the campaign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotLayout {
    /// One slot, reused for every recipient.
    Single,
    /// One slot per selected recipient.
    PerRecipient,
    /// N fixed slots, one per carousel card.
    PerCard,
}

/// A fixed-arity collection of media slots for one layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotBoard {
    layout: SlotLayout,
    slots: Vec<MediaSlot>,
}

impl SlotBoard {
    /// A board with no slots at all, for templates without media.
    pub fn none() -> Self {
        Self {
            layout: SlotLayout::Single,
            slots: Vec::new(),
        }
    }

    pub fn single() -> Self {
        Self {
            layout: SlotLayout::Single,
            slots: vec![MediaSlot::empty()],
        }
    }

    /// A single-slot board, pre-resolved when the template already
    /// carries a media handle.
    pub fn single_with_inherited(inherited: Option<MediaHandle>) -> Self {
        Self {
            layout: SlotLayout::Single,
            slots: vec![match inherited {
                Some(handle) => MediaSlot::inherited(handle),
                None => MediaSlot::empty(),
            }],
        }
    }

    pub fn per_recipient(count: usize) -> Self {
        Self {
            layout: SlotLayout::PerRecipient,
            slots: vec![MediaSlot::empty(); count],
        }
    }

    pub fn per_card(cards: usize) -> Self {
        Self {
            layout: SlotLayout::PerCard,
            slots: vec![MediaSlot::empty(); cards],
        }
    }

    /// A per-card board whose slots may inherit existing template media.
    pub fn per_card_with_inherited(inherited: Vec<Option<MediaHandle>>) -> Self {
        Self {
            layout: SlotLayout::PerCard,
            slots: inherited
                .into_iter()
                .map(|handle| match handle {
                    Some(handle) => MediaSlot::inherited(handle),
                    None => MediaSlot::empty(),
                })
                .collect(),
        }
    }

    pub fn layout(&self) -> SlotLayout {
        self.layout
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slot(&self, index: usize) -> Option<&MediaSlot> {
        self.slots.get(index)
    }

    pub fn slots(&self) -> &[MediaSlot] {
        &self.slots
    }

    pub(crate) fn slot_mut(&mut self, index: usize) -> Result<&mut MediaSlot, MediaError> {
        let len = self.slots.len();
        self.slots
            .get_mut(index)
            .ok_or(MediaError::SlotOutOfRange { index, len })
    }

    /// Assigns one file to a slot.
    pub fn set_file(&mut self, index: usize, file: LocalFile) -> Result<(), MediaError> {
        self.slot_mut(index)?.set_file(file);
        Ok(())
    }

    /// Batch placement: fill empty slots first, then overflow from index 0.
    pub fn place_files(&mut self, files: Vec<LocalFile>) {
        self.slots = place_files(&self.slots, &files);
    }

    /// Uses one file for every slot.
    pub fn fill_all(&mut self, file: LocalFile) {
        for slot in &mut self.slots {
            slot.set_file(file.clone());
        }
    }

    /// Drag-reorder: swaps both the file and any already-uploaded handle
    /// between two slot indices.
    pub fn swap(&mut self, a: usize, b: usize) -> Result<(), MediaError> {
        let len = self.slots.len();
        if a >= len {
            return Err(MediaError::SlotOutOfRange { index: a, len });
        }
        if b >= len {
            return Err(MediaError::SlotOutOfRange { index: b, len });
        }
        self.slots.swap(a, b);
        Ok(())
    }

    pub fn clear_slot(&mut self, index: usize) -> Result<(), MediaError> {
        self.slot_mut(index)?.clear();
        Ok(())
    }

    /// Indices of slots that are not yet resolved to a handle.
    pub fn unresolved(&self) -> Vec<usize> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| !s.is_resolved())
            .map(|(i, _)| i)
            .collect()
    }

    /// True when every slot is resolved (vacuously true for no slots).
    pub fn all_resolved(&self) -> bool {
        self.slots.iter().all(MediaSlot::is_resolved)
    }

    /// Handle ids for campaign-level media (single shared or per-card
    /// layouts), in slot order. Empty for the per-recipient layout, whose
    /// handles travel inside each recipient instead.
    pub fn campaign_media_ids(&self) -> Vec<String> {
        match self.layout {
            SlotLayout::PerRecipient => Vec::new(),
            SlotLayout::Single | SlotLayout::PerCard => self
                .slots
                .iter()
                .filter_map(|slot| slot.handle().map(|h| h.as_str().to_string()))
                .collect(),
        }
    }

    /// Writes per-recipient handles into each recipient's header params,
    /// slot `i` resolving recipient `i`. The board must carry exactly one
    /// resolved slot per recipient. A no-op for the other layouts.
    pub fn apply_to_recipients(
        &self,
        recipients: &mut [Recipient],
    ) -> Result<(), MediaError> {
        if self.layout != SlotLayout::PerRecipient {
            return Ok(());
        }
        if self.slots.len() != recipients.len() {
            return Err(MediaError::RecipientCountMismatch {
                slots: self.slots.len(),
                recipients: recipients.len(),
            });
        }

        for (index, (slot, recipient)) in
            self.slots.iter().zip(recipients.iter_mut()).enumerate()
        {
            let handle = slot
                .handle()
                .ok_or(MediaError::SlotUnresolved { index })?;
            recipient.template_params.header_params = vec![handle.as_str().to_string()];
        }
        Ok(())
    }
}

/// Pure batch-placement function: fill empty slots first in index order,
/// then overflow replaces occupied slots starting from index 0. Files
/// beyond the board's arity are dropped.
pub fn place_files(current: &[MediaSlot], new_files: &[LocalFile]) -> Vec<MediaSlot> {
    let mut slots = current.to_vec();
    let mut files = new_files.iter();

    for slot in slots.iter_mut().filter(|s| s.is_empty()) {
        match files.next() {
            Some(file) => slot.set_file(file.clone()),
            None => return slots,
        }
    }

    for slot in slots.iter_mut() {
        match files.next() {
            Some(file) => slot.set_file(file.clone()),
            None => break,
        }
    }

    slots
}
