use thiserror::Error;

use crate::{
    page::Event,
    view::{Dialogs, FileInfo, UploadView},
};

pub const MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;

/// Why a CSV import submission was stopped. The messages are shown verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum UploadRejection {
    #[error("Please select a CSV file to upload.")]
    NoFile,

    #[error("Please upload a valid CSV file (.csv extension).")]
    NotCsv,

    #[error("File size should not exceed 5MB.")]
    TooLarge,
}

pub fn check_csv_upload(file: Option<&FileInfo>) -> Result<(), UploadRejection> {
    let file = file.ok_or(UploadRejection::NoFile)?;

    if !file.name.to_lowercase().ends_with(".csv") {
        return Err(UploadRejection::NotCsv);
    }

    if file.size > MAX_UPLOAD_BYTES {
        return Err(UploadRejection::TooLarge);
    }

    Ok(())
}

/// Submit handler for `#csvForm`. A passing file leaves the event untouched.
pub fn guard_csv_upload<V: UploadView + Dialogs + ?Sized>(
    view: &mut V,
    event: &mut Event,
) -> Result<(), UploadRejection> {
    let file = view.selected_file();
    check_csv_upload(file.as_ref()).inspect_err(|rejection| {
        event.prevent_default();
        view.alert(&rejection.to_string());
    })
}
