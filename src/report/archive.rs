//! Declaration archive assembly.
//!
//! The filing portals accept a report as a zip archive holding exactly
//! one entry, with the text in the legacy Greek codepage. The text is
//! transcoded to WINDOWS-1253 before compression; a character the
//! codepage cannot represent is an error, never a silent substitution.

use std::io::{Cursor, Write};

use zip::CompressionMethod;
use zip::write::{SimpleFileOptions, ZipWriter};

use crate::error::{EngineError, EngineResult};
use crate::models::Period;
use crate::report::social::DeclarationKind;

/// Archive entry name for the social-security declaration.
pub const SOCIAL_ENTRY_NAME: &str = "CSL01";
/// Archive entry name for the wage-tax declaration.
pub const WAGE_TAX_ENTRY_NAME: &str = "JL10";

/// Compresses report text into a single-entry zip archive.
///
/// # Arguments
///
/// * `text` - The complete report file content
/// * `entry_name` - The name of the single entry inside the archive
///
/// # Errors
///
/// Returns [`EngineError::ArchiveError`] when the text contains a
/// character WINDOWS-1253 cannot represent, or when zip assembly fails.
pub fn compress_report(text: &str, entry_name: &str) -> EngineResult<Vec<u8>> {
    let (encoded, _, had_errors) = encoding_rs::WINDOWS_1253.encode(text);
    if had_errors {
        return Err(EngineError::ArchiveError {
            message: "report text contains characters outside WINDOWS-1253".to_string(),
        });
    }

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    writer.start_file(entry_name, options).map_err(archive_error)?;
    writer.write_all(&encoded).map_err(archive_error)?;
    let cursor = writer.finish().map_err(archive_error)?;
    Ok(cursor.into_inner())
}

/// The download filename of a social-security declaration archive.
pub fn social_archive_name(period: Period, kind: DeclarationKind) -> String {
    format!(
        "apd-{}{}-{}.zip",
        period.year(),
        period.month_code(),
        kind.code()
    )
}

/// The download filename of a wage-tax declaration archive.
pub fn wage_tax_archive_name(period: Period) -> String {
    format!("fmy-{}{}.zip", period.year(), period.month_code())
}

fn archive_error(error: impl std::fmt::Display) -> EngineError {
    EngineError::ArchiveError {
        message: error.to_string(),
    }
}
