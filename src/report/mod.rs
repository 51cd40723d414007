//! Statutory report encoders.
//!
//! This module turns a joined declaration into the two fixed-width file
//! formats the Greek authorities ingest, and packs either one into the
//! single-entry zip archive the filing portals accept.

mod archive;
mod fields;
mod social;
mod wagetax;

pub use archive::{
    compress_report, social_archive_name, wage_tax_archive_name, SOCIAL_ENTRY_NAME,
    WAGE_TAX_ENTRY_NAME,
};
pub use fields::{decimal_flat, fill_spaces, fill_spaces_cut, flat_date, zero_padded};
pub use social::{encode_social_declaration, DeclarationKind, SocialDeclaration};
pub use wagetax::encode_wage_tax_declaration;
