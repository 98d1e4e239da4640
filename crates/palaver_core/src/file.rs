//! Uploaded file metadata and Gemini Files API retention tracking.

use crate::ProcessingMethod;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Minutes between a Files API upload and its recorded expiry.
///
/// The Files API keeps uploads for 48 hours; the recorded deadline is five
/// minutes earlier so a file is never referenced after it disappears.
pub const FILES_API_EXPIRY_OFFSET_MINUTES: i64 = 47 * 60 + 55;

/// Expiry deadline for a file uploaded to the Files API at `uploaded_at`.
///
/// # Examples
///
/// ```
/// use chrono::{Duration, TimeZone, Utc};
/// use palaver_core::files_api_expiry;
///
/// let uploaded = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
/// let expiry = files_api_expiry(uploaded);
/// assert_eq!(expiry - uploaded, Duration::hours(47) + Duration::minutes(55));
/// ```
pub fn files_api_expiry(uploaded_at: DateTime<Utc>) -> DateTime<Utc> {
    uploaded_at + Duration::minutes(FILES_API_EXPIRY_OFFSET_MINUTES)
}

/// Metadata for a stored upload.
///
/// When `gemini_api_expiry_timestamp` is set it always equals
/// `files_api_expiry(gemini_api_upload_timestamp)`; repositories call
/// [`NewFileMetadata::normalize_gemini_expiry`] before every insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMetadata {
    /// Identifier assigned by the upload endpoint
    pub id: String,
    /// Name of the file as uploaded
    pub original_filename: Option<String>,
    /// MIME type reported at upload
    pub content_type: Option<String>,
    /// Size in bytes
    pub size: Option<i64>,
    /// Where the bytes live on local disk (unique)
    pub local_disk_path: String,
    /// When the file was received
    pub upload_timestamp: DateTime<Utc>,
    /// How the file is sent to the model
    pub processing_method: ProcessingMethod,
    /// Files API resource name, e.g. `files/abc123`
    pub gemini_api_file_id: Option<String>,
    /// When the file was pushed to the Files API
    pub gemini_api_upload_timestamp: Option<DateTime<Utc>>,
    /// When the Files API copy should be treated as gone
    pub gemini_api_expiry_timestamp: Option<DateTime<Utc>>,
}

impl FileMetadata {
    /// Derive the Files API expiry from the upload timestamp.
    ///
    /// Does nothing when no Files API upload has been recorded.
    pub fn set_gemini_expiry(&mut self) {
        if let Some(uploaded_at) = self.gemini_api_upload_timestamp {
            self.gemini_api_expiry_timestamp = Some(files_api_expiry(uploaded_at));
        }
    }

    /// Record that the file now lives in the Files API under `file_id`.
    pub fn record_files_api_upload<S: Into<String>>(
        &mut self,
        file_id: S,
        uploaded_at: DateTime<Utc>,
    ) {
        self.processing_method = ProcessingMethod::FilesApi;
        self.gemini_api_file_id = Some(file_id.into());
        self.gemini_api_upload_timestamp = Some(uploaded_at);
        self.set_gemini_expiry();
    }

    /// Forget the Files API copy.
    pub fn clear_files_api_upload(&mut self) {
        self.gemini_api_file_id = None;
        self.gemini_api_upload_timestamp = None;
        self.gemini_api_expiry_timestamp = None;
    }

    /// True once the recorded Files API expiry has been reached.
    pub fn is_files_api_expired(&self, now: DateTime<Utc>) -> bool {
        self.gemini_api_expiry_timestamp.is_some_and(|expiry| now >= expiry)
    }
}

/// File metadata that has not been stored yet.
///
/// # Examples
///
/// ```
/// use palaver_core::{NewFileMetadata, ProcessingMethod};
///
/// let file = NewFileMetadata::with_generated_id("/var/uploads/a.pdf", ProcessingMethod::Inline)
///     .with_original_filename("a.pdf")
///     .with_content_type("application/pdf")
///     .with_size(2048);
///
/// assert_eq!(file.local_disk_path, "/var/uploads/a.pdf");
/// assert!(file.gemini_api_expiry_timestamp.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewFileMetadata {
    /// Identifier assigned by the upload endpoint
    pub id: String,
    /// Name of the file as uploaded
    pub original_filename: Option<String>,
    /// MIME type reported at upload
    pub content_type: Option<String>,
    /// Size in bytes
    pub size: Option<i64>,
    /// Where the bytes live on local disk (unique)
    pub local_disk_path: String,
    /// When the file was received
    pub upload_timestamp: DateTime<Utc>,
    /// How the file is sent to the model
    pub processing_method: ProcessingMethod,
    /// Files API resource name
    pub gemini_api_file_id: Option<String>,
    /// When the file was pushed to the Files API
    pub gemini_api_upload_timestamp: Option<DateTime<Utc>>,
    /// When the Files API copy should be treated as gone
    pub gemini_api_expiry_timestamp: Option<DateTime<Utc>>,
}

impl NewFileMetadata {
    /// Create metadata for a file received now.
    pub fn new<I, P>(id: I, local_disk_path: P, processing_method: ProcessingMethod) -> Self
    where
        I: Into<String>,
        P: Into<String>,
    {
        Self {
            id: id.into(),
            original_filename: None,
            content_type: None,
            size: None,
            local_disk_path: local_disk_path.into(),
            upload_timestamp: Utc::now(),
            processing_method,
            gemini_api_file_id: None,
            gemini_api_upload_timestamp: None,
            gemini_api_expiry_timestamp: None,
        }
    }

    /// Create metadata with a fresh random UUID as its id.
    pub fn with_generated_id<P: Into<String>>(
        local_disk_path: P,
        processing_method: ProcessingMethod,
    ) -> Self {
        Self::new(
            uuid::Uuid::new_v4().to_string(),
            local_disk_path,
            processing_method,
        )
    }

    /// Set the original filename.
    pub fn with_original_filename<S: Into<String>>(mut self, filename: S) -> Self {
        self.original_filename = Some(filename.into());
        self
    }

    /// Set the MIME type.
    pub fn with_content_type<S: Into<String>>(mut self, content_type: S) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Set the size in bytes.
    pub fn with_size(mut self, size: i64) -> Self {
        self.size = Some(size);
        self
    }

    /// Override the receive instant.
    pub fn with_upload_timestamp(mut self, upload_timestamp: DateTime<Utc>) -> Self {
        self.upload_timestamp = upload_timestamp;
        self
    }

    /// Mark the file as already uploaded to the Files API.
    pub fn with_files_api_upload<S: Into<String>>(
        mut self,
        file_id: S,
        uploaded_at: DateTime<Utc>,
    ) -> Self {
        self.processing_method = ProcessingMethod::FilesApi;
        self.gemini_api_file_id = Some(file_id.into());
        self.gemini_api_upload_timestamp = Some(uploaded_at);
        self.set_gemini_expiry();
        self
    }

    /// Derive the Files API expiry from the upload timestamp.
    ///
    /// Does nothing when no Files API upload has been recorded.
    pub fn set_gemini_expiry(&mut self) {
        if let Some(uploaded_at) = self.gemini_api_upload_timestamp {
            self.gemini_api_expiry_timestamp = Some(files_api_expiry(uploaded_at));
        }
    }

    /// Make the expiry agree with the upload timestamp.
    ///
    /// Unlike [`Self::set_gemini_expiry`], a caller-supplied expiry without an
    /// upload timestamp is cleared.
    pub fn normalize_gemini_expiry(&mut self) {
        self.gemini_api_expiry_timestamp = self.gemini_api_upload_timestamp.map(files_api_expiry);
    }
}

impl From<NewFileMetadata> for FileMetadata {
    fn from(mut new: NewFileMetadata) -> Self {
        new.normalize_gemini_expiry();
        Self {
            id: new.id,
            original_filename: new.original_filename,
            content_type: new.content_type,
            size: new.size,
            local_disk_path: new.local_disk_path,
            upload_timestamp: new.upload_timestamp,
            processing_method: new.processing_method,
            gemini_api_file_id: new.gemini_api_file_id,
            gemini_api_upload_timestamp: new.gemini_api_upload_timestamp,
            gemini_api_expiry_timestamp: new.gemini_api_expiry_timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 10, hour, minute, 0).unwrap()
    }

    #[test]
    fn expiry_is_five_minutes_short_of_two_days() {
        let uploaded = at(8, 30);
        assert_eq!(
            files_api_expiry(uploaded),
            Utc.with_ymd_and_hms(2025, 6, 12, 8, 25, 0).unwrap()
        );
        assert_eq!(
            files_api_expiry(uploaded) + Duration::minutes(5),
            uploaded + Duration::hours(48)
        );
    }

    #[test]
    fn set_gemini_expiry_without_upload_is_noop() {
        let mut file: FileMetadata =
            NewFileMetadata::new("f1", "/tmp/f1", ProcessingMethod::Inline).into();
        file.set_gemini_expiry();
        assert!(file.gemini_api_expiry_timestamp.is_none());
        assert!(file.gemini_api_upload_timestamp.is_none());
    }

    #[test]
    fn set_gemini_expiry_overwrites_stale_value() {
        let mut file: FileMetadata =
            NewFileMetadata::new("f1", "/tmp/f1", ProcessingMethod::FilesApi).into();
        file.gemini_api_upload_timestamp = Some(at(9, 0));
        file.gemini_api_expiry_timestamp = Some(at(9, 1));
        file.set_gemini_expiry();
        assert_eq!(file.gemini_api_expiry_timestamp, Some(files_api_expiry(at(9, 0))));
    }

    #[test]
    fn record_and_clear_files_api_upload() {
        let mut file: FileMetadata =
            NewFileMetadata::new("f1", "/tmp/f1", ProcessingMethod::Inline).into();
        file.record_files_api_upload("files/abc", at(10, 0));

        assert_eq!(file.processing_method, ProcessingMethod::FilesApi);
        assert_eq!(file.gemini_api_file_id.as_deref(), Some("files/abc"));
        assert_eq!(file.gemini_api_expiry_timestamp, Some(files_api_expiry(at(10, 0))));
        assert!(!file.is_files_api_expired(at(10, 0)));
        assert!(file.is_files_api_expired(files_api_expiry(at(10, 0))));

        file.clear_files_api_upload();
        assert!(file.gemini_api_file_id.is_none());
        assert!(file.gemini_api_expiry_timestamp.is_none());
        assert!(!file.is_files_api_expired(at(23, 0)));
    }

    #[test]
    fn conversion_from_new_normalizes_expiry() {
        let mut new = NewFileMetadata::new("f2", "/tmp/f2", ProcessingMethod::FilesApi);
        new.gemini_api_upload_timestamp = Some(at(11, 0));
        let file = FileMetadata::from(new);
        assert_eq!(file.gemini_api_expiry_timestamp, Some(files_api_expiry(at(11, 0))));
    }

    #[test]
    fn conversion_from_new_drops_expiry_without_upload() {
        let mut new = NewFileMetadata::new("f3", "/tmp/f3", ProcessingMethod::Inline);
        new.gemini_api_expiry_timestamp = Some(at(12, 0));
        let file = FileMetadata::from(new);
        assert!(file.gemini_api_upload_timestamp.is_none());
        assert!(file.gemini_api_expiry_timestamp.is_none());
    }
}
