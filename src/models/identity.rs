//! Checksum validation for Greek statutory identifiers.
//!
//! Both identifiers carry an algorithmic check digit: the tax ID (ΑΦΜ) uses
//! a power-of-two weighted sum mod 11, the social-insurance number (ΑΜΚΑ)
//! a Luhn-style digit-doubling sum. Validation happens at the API boundary
//! so bad identifiers never reach a declaration file.

/// Validates a Greek tax ID (ΑΦΜ): nine digits whose last digit equals the
/// weighted sum of the first eight, mod 11 mod 10.
///
/// # Example
///
/// ```
/// use misthos_engine::models::is_valid_tax_id;
///
/// assert!(is_valid_tax_id("090000045"));
/// assert!(!is_valid_tax_id("090000046"));
/// assert!(!is_valid_tax_id("12345678"));
/// ```
pub fn is_valid_tax_id(tax_id: &str) -> bool {
    let digits: Vec<u32> = tax_id.chars().filter_map(|c| c.to_digit(10)).collect();
    if digits.len() != 9 || tax_id.chars().count() != 9 {
        return false;
    }
    let total: u32 = digits[..8]
        .iter()
        .enumerate()
        .map(|(i, d)| d * 2u32.pow(8 - i as u32))
        .sum();
    total % 11 % 10 == digits[8]
}

/// Validates a Greek social-insurance number (ΑΜΚΑ): eleven digits whose
/// digit-doubling checksum is divisible by ten.
///
/// # Example
///
/// ```
/// use misthos_engine::models::is_valid_insurance_number;
///
/// assert!(is_valid_insurance_number("01018047595"));
/// assert!(!is_valid_insurance_number("01018047591"));
/// ```
pub fn is_valid_insurance_number(number: &str) -> bool {
    let digits: Vec<u32> = number.chars().filter_map(|c| c.to_digit(10)).collect();
    if digits.len() != 11 || number.chars().count() != 11 {
        return false;
    }
    let mut total = digits[10];
    for (i, &digit) in digits[..10].iter().enumerate() {
        if i % 2 != 0 {
            let doubled = digit * 2;
            total += doubled / 10 + doubled % 10;
        } else {
            total += digit;
        }
    }
    total % 10 == 0
}
