//! Rule tables for every entity
//!
//! A rule is a field name, a predicate and the message reported when the
//! predicate rejects the value.

use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;

use super::Mode;

pub const BIRTH_DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Predicate {
    /// Present and not blank; absence is allowed in update mode
    Required,
    LettersAndSpaces,
    Email,
    /// Exactly this many ASCII digits
    Digits(usize),
    /// One or more ASCII digits
    DigitsOnly,
    /// Exactly six digits
    ZipCode,
    /// `YYYY-MM-DD` and a real calendar date
    IsoDate,
    RollCode,
    MaxLength(usize),
}

#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub field: &'static str,
    pub predicate: Predicate,
    pub message: &'static str,
}

const fn rule(field: &'static str, predicate: Predicate, message: &'static str) -> Rule {
    Rule { field, predicate, message }
}

pub static ENROLLEE_RULES: &[Rule] = &[
    rule("name", Predicate::Required, "name is required"),
    rule("name", Predicate::LettersAndSpaces, "name must contain only letters and spaces"),
    rule("name", Predicate::MaxLength(255), "name must be at most 255 characters"),
    rule("roll_code", Predicate::Required, "roll code is required"),
    rule("roll_code", Predicate::RollCode, "roll code may contain only letters, digits, '-' and '/'"),
    rule("roll_code", Predicate::MaxLength(32), "roll code must be at most 32 characters"),
    rule("email", Predicate::Required, "email is required"),
    rule("email", Predicate::Email, "email must be a valid email address"),
    rule("email", Predicate::MaxLength(255), "email must be at most 255 characters"),
    rule("phone", Predicate::Required, "phone is required"),
    rule("phone", Predicate::Digits(10), "phone must be exactly 10 digits"),
    rule("category", Predicate::Required, "category is required"),
    rule("category", Predicate::MaxLength(100), "category must be at most 100 characters"),
    rule("date_of_birth", Predicate::IsoDate, "invalid date format, use YYYY-MM-DD"),
    rule("gender", Predicate::MaxLength(50), "gender must be at most 50 characters"),
    rule("degree", Predicate::MaxLength(255), "degree must be at most 255 characters"),
    rule("program_name", Predicate::MaxLength(255), "program name must be at most 255 characters"),
    rule("project_name", Predicate::MaxLength(255), "project name must be at most 255 characters"),
];

pub static DEPARTMENT_RULES: &[Rule] = &[
    rule("department_name", Predicate::Required, "department name is required"),
    rule("department_name", Predicate::MaxLength(255), "department name must be at most 255 characters"),
    rule("course_name", Predicate::Required, "course name is required"),
    rule("course_name", Predicate::MaxLength(255), "course name must be at most 255 characters"),
];

pub static ORGANIZATION_RULES: &[Rule] = &[
    rule("name", Predicate::Required, "name is required"),
    rule("name", Predicate::MaxLength(255), "name must be at most 255 characters"),
    rule("address_line1", Predicate::Required, "address line 1 is required"),
    rule("address_line1", Predicate::MaxLength(255), "address line 1 must be at most 255 characters"),
    rule("address_line2", Predicate::MaxLength(255), "address line 2 must be at most 255 characters"),
    rule("city", Predicate::Required, "city is required"),
    rule("city", Predicate::MaxLength(100), "city must be at most 100 characters"),
    rule("state", Predicate::Required, "state is required"),
    rule("state", Predicate::MaxLength(100), "state must be at most 100 characters"),
    rule("zip_code", Predicate::Required, "zip code is required"),
    rule("zip_code", Predicate::ZipCode, "zip code must be exactly 6 digits"),
];

pub static CONTACT_RULES: &[Rule] = &[
    rule("role", Predicate::Required, "role is required"),
    rule("role", Predicate::LettersAndSpaces, "role must contain only letters and spaces"),
    rule("role", Predicate::MaxLength(100), "role must be at most 100 characters"),
    rule("name", Predicate::Required, "name is required"),
    rule("name", Predicate::LettersAndSpaces, "name must contain only letters and spaces"),
    rule("name", Predicate::MaxLength(255), "name must be at most 255 characters"),
    rule("email", Predicate::Required, "email is required"),
    rule("email", Predicate::Email, "email must be a valid email address"),
    rule("email", Predicate::MaxLength(255), "email must be at most 255 characters"),
    rule("phone", Predicate::DigitsOnly, "phone must contain only digits"),
    rule("phone", Predicate::MaxLength(20), "phone must be at most 20 digits"),
];

fn letters_and_spaces() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z ]+$").expect("static regex"))
}

fn email() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("static regex"))
}

fn zip_code() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[0-9]{6}$").expect("static regex"))
}

fn iso_date() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("static regex"))
}

fn roll_code() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9/-]*$").expect("static regex"))
}

impl Predicate {
    /// Whether `value` passes. Absent values only fail `Required` in create mode.
    pub fn accepts(&self, value: Option<&str>, mode: Mode) -> bool {
        let value = match (value, self) {
            (None, Predicate::Required) => return mode == Mode::Update,
            (None, _) => return true,
            (Some(value), _) => value,
        };

        match self {
            Predicate::Required => !value.trim().is_empty(),
            Predicate::LettersAndSpaces => letters_and_spaces().is_match(value),
            Predicate::Email => email().is_match(value),
            Predicate::Digits(len) => {
                value.len() == *len && value.bytes().all(|b| b.is_ascii_digit())
            }
            Predicate::DigitsOnly => !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()),
            Predicate::ZipCode => zip_code().is_match(value),
            Predicate::IsoDate => parse_birth_date(value).is_some(),
            Predicate::RollCode => roll_code().is_match(value),
            Predicate::MaxLength(max) => value.chars().count() <= *max,
        }
    }
}

/// Parse a `YYYY-MM-DD` date, rejecting other layouts chrono would accept
pub fn parse_birth_date(value: &str) -> Option<NaiveDate> {
    if !iso_date().is_match(value) {
        return None;
    }
    NaiveDate::parse_from_str(value, BIRTH_DATE_FORMAT).ok()
}
