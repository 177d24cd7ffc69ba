//! Validation rules for operator-entered fields.
//!
//! A failed check aborts the whole operation before anything is written.

use chrono::{NaiveDate, Utc};
use regex::Regex;
use std::sync::OnceLock;

use crate::domain::errors::DomainError;
use crate::domain::entities::{NewCourse, NewStudent};

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
static PHONE_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9+_.-]+@(.+)$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

fn phone_regex() -> &'static Regex {
    // Digits, spaces, hyphens, parentheses and '+', 10-15 characters.
    PHONE_RE.get_or_init(|| {
        Regex::new(r"^[\d\s()+-]{10,15}$")
            .unwrap_or_else(|error| panic!("phone regex failed to compile: {error}"))
    })
}

/// Non-empty after trimming. `field` names the offender in the error.
pub fn non_empty(field: &str, value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

pub fn email(value: &str) -> Result<(), DomainError> {
    if !email_regex().is_match(value) {
        return Err(DomainError::Validation(format!(
            "invalid email format: {value}"
        )));
    }
    Ok(())
}

pub fn phone(value: &str) -> Result<(), DomainError> {
    if !phone_regex().is_match(value) {
        return Err(DomainError::Validation(format!(
            "invalid phone number format: {value}"
        )));
    }
    Ok(())
}

/// Parse `YYYY-MM-DD` and reject dates after today.
pub fn parse_birth_date(value: &str) -> Result<NaiveDate, DomainError> {
    let date = NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        DomainError::Validation(format!(
            "invalid date: {value} (expected YYYY-MM-DD)"
        ))
    })?;
    birth_date(date)?;
    Ok(date)
}

pub fn birth_date(date: NaiveDate) -> Result<(), DomainError> {
    if date > Utc::now().date_naive() {
        return Err(DomainError::Validation(
            "date of birth cannot be in the future".to_string(),
        ));
    }
    Ok(())
}

pub fn credits(value: u32) -> Result<(), DomainError> {
    if value == 0 {
        return Err(DomainError::Validation(
            "credits must be a positive integer".to_string(),
        ));
    }
    Ok(())
}

/// All student field checks, in form order.
pub fn new_student(student: &NewStudent) -> Result<(), DomainError> {
    non_empty("first name", &student.first_name)?;
    non_empty("last name", &student.last_name)?;
    email(&student.email)?;
    phone(&student.phone)?;
    birth_date(student.date_of_birth)
}

/// All course field checks, in form order.
pub fn new_course(course: &NewCourse) -> Result<(), DomainError> {
    non_empty("course code", &course.code)?;
    non_empty("course name", &course.name)?;
    credits(course.credits)?;
    non_empty("department", &course.department)?;
    non_empty("semester", &course.semester)
}
