//! Company and branch models.
//!
//! The declarations are filed per company; branch data supplies the
//! social-security office and the address fields of both report formats.

use serde::{Deserialize, Serialize};

/// The legal form of the employer, as coded in the wage-tax declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompanyKind {
    /// A legal entity (company).
    LegalEntity,
    /// A sole proprietor (natural person).
    SoleProprietor,
}

impl CompanyKind {
    /// The single-digit code used in the wage-tax declaration.
    pub fn code(&self) -> u8 {
        match self {
            CompanyKind::LegalEntity => 1,
            CompanyKind::SoleProprietor => 2,
        }
    }
}

/// A company branch: the unit employments attach to and the address the
/// declarations carry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    /// Branch sequence number within the company (0 for headquarters).
    pub number: u32,
    /// Code of the supervising social-security office, 3 digits.
    pub office_code: u32,
    /// Name of the supervising social-security office.
    pub office_name: String,
    /// Branch name.
    pub name: String,
    /// Street.
    pub street: String,
    /// Street number.
    pub street_number: String,
    /// Postal code.
    pub postal_code: String,
    /// City.
    pub city: String,
}

/// Represents the employer filing the declarations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    /// Legal name (or the proprietor's surname).
    pub legal_name: String,
    /// Proprietor's first name; empty for legal entities.
    #[serde(default)]
    pub proprietor_first_name: String,
    /// Proprietor's father's name; empty for legal entities.
    #[serde(default)]
    pub proprietor_father_name: String,
    /// Tax ID (ΑΦΜ), 9 digits.
    pub tax_id: String,
    /// Employer registration number (ΑΜΕ), up to 10 digits.
    pub employer_registration: String,
    /// Business activity description.
    pub activity: String,
    /// Legal form.
    pub kind: CompanyKind,
    /// Branches, headquarters first.
    pub branches: Vec<Branch>,
}

impl Company {
    /// The branch the declarations are filed for: the first one.
    pub fn main_branch(&self) -> Option<&Branch> {
        self.branches.first()
    }
}
