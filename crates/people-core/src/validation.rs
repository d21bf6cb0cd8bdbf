//! Edge validation of caller payloads
//!
//! Boundary layers (the CLI, an HTTP adapter) run these checks before
//! handing a payload to the services. The services treat a validated
//! payload as a precondition and do not check it again.
//!
//! Every violation is collected, so a caller sees all offending fields at
//! once in [`Error::Validation`].

use regex::Regex;
use std::sync::LazyLock;

use crate::error::{Error, Result};
use crate::model::{AddressDraft, PersonDraft, PersonPatch};

/// `dd/MM/yyyy`, matched against the whole string
static BIRTH_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-2][0-9]|3[0-1])/(0[1-9]|1[0-2])/[0-9]{4}$").expect("birth date pattern")
});

const BIRTH_DATE_FORMAT: &str = "birth date must use the dd/MM/yyyy format";

/// Payloads that can be checked before reaching the services
pub trait Validate {
    /// Return `Ok(())` or every violation found
    fn validate(&self) -> Result<()>;
}

/// Returns `true` if `value` is a birth date in `dd/MM/yyyy` form
///
/// Only the shape is checked; `31/02/2000` passes.
pub fn is_birth_date(value: &str) -> bool {
    BIRTH_DATE.is_match(value)
}

fn finish(errors: Vec<String>) -> Result<()> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(Error::Validation(errors))
    }
}

fn require(errors: &mut Vec<String>, value: &str, message: &str) {
    if value.is_empty() {
        errors.push(message.to_string());
    }
}

impl Validate for PersonDraft {
    fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();
        require(&mut errors, &self.name, "name must not be empty");
        if self.birth_date.is_empty() {
            errors.push("birth date must not be empty".to_string());
        } else if !is_birth_date(&self.birth_date) {
            errors.push(BIRTH_DATE_FORMAT.to_string());
        }
        finish(errors)
    }
}

impl Validate for PersonPatch {
    fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();
        if let Some(birth_date) = &self.birth_date
            && !is_birth_date(birth_date)
        {
            errors.push(BIRTH_DATE_FORMAT.to_string());
        }
        finish(errors)
    }
}

impl Validate for AddressDraft {
    fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();
        require(&mut errors, &self.street, "street must not be empty");
        require(&mut errors, &self.postal_code, "postal code must not be empty");
        require(&mut errors, &self.number, "number must not be empty");
        require(&mut errors, &self.city, "city must not be empty");
        finish(errors)
    }
}
