// Submission intake: multipart handling, local file store, download endpoint.

pub mod files;
pub mod handlers;

pub use files::FileStore;

use crate::cv::SectionedResume;

/// A fully processed application, as handed to the sheet ledger and the
/// downstream webhook.
#[derive(Debug, Clone)]
pub struct ApplicationRecord {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub cv_link: String,
    pub cv_data: SectionedResume,
}
