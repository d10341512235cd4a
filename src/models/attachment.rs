//! Opaque binary attachments (enrollee photos, organization logos)
//!
//! Bytes are stored and returned exactly as received. Size and content type
//! are the upload layer's concern.

use super::change::Change;

/// Update to a stored attachment. `Keep` when no new upload arrived.
pub type AttachmentChange = Change<Vec<u8>>;

/// A field set together with the attachment submitted alongside it
#[derive(Debug, Clone)]
pub struct Attached<T, A = Option<Vec<u8>>> {
    pub fields: T,
    pub attachment: A,
}

impl<T> Attached<T> {
    /// Fold an optional upload into a new record
    pub fn new(fields: T, upload: Option<Vec<u8>>) -> Self {
        Self { fields, attachment: upload }
    }
}

impl<T> Attached<T, AttachmentChange> {
    /// Fold an upload, absence, or explicit removal into an update
    pub fn change(fields: T, change: AttachmentChange) -> Self {
        Self { fields, attachment: change }
    }

    /// An update where a missing upload leaves the stored bytes untouched
    pub fn upload(fields: T, upload: Option<Vec<u8>>) -> Self {
        Self::change(fields, AttachmentChange::from(upload))
    }

    /// An update that clears the stored bytes
    pub fn remove(fields: T) -> Self {
        Self::change(fields, AttachmentChange::Clear)
    }
}

/// SQL bind pair for an attachment update: `(keep_existing, new_value)`.
///
/// Used as `col = CASE WHEN $keep THEN col ELSE $value END`.
pub fn update_binds(change: AttachmentChange) -> (bool, Option<Vec<u8>>) {
    change.into_binds()
}
