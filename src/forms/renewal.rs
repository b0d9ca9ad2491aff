//! Loan renewal form
//!
//! A renewal edits exactly one field, `due_back`. The new date must fall
//! between today and four weeks from today, both ends included.

use std::{borrow::Cow, collections::BTreeMap};

use chrono::{Duration, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use super::{field_errors, single_error, FieldErrors};

/// Furthest a loan may be pushed out from today
pub const RENEWAL_WINDOW_WEEKS: i64 = 4;

pub const DUE_BACK_LABEL: &str = "Renewal date";
pub const DUE_BACK_HELP: &str = "Enter a date between now and 4 weeks.";

const REQUIRED: &str = "This field is required.";
const INVALID_DATE: &str = "Enter a valid date.";
// two-digit years first: `%Y` would also take "24" as the year 24
const INPUT_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%y", "%m/%d/%Y"];

/// Why a proposed due date was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RenewalDateError {
    #[error("Invalid date - renewal in past")]
    InPast,
    #[error("Invalid date - renewal more than 4 weeks ahead")]
    TooFarAhead,
}

impl RenewalDateError {
    pub fn code(self) -> &'static str {
        match self {
            RenewalDateError::InPast => "renewal_in_past",
            RenewalDateError::TooFarAhead => "renewal_too_far_ahead",
        }
    }
}

/// Accept `due_back` if `today <= due_back <= today + 4 weeks`
pub fn check_due_back(due_back: NaiveDate, today: NaiveDate) -> Result<NaiveDate, RenewalDateError> {
    if due_back < today {
        return Err(RenewalDateError::InPast);
    }
    if due_back > today + Duration::weeks(RENEWAL_WINDOW_WEEKS) {
        return Err(RenewalDateError::TooFarAhead);
    }
    Ok(due_back)
}

/// Current local date
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn validate_due_back(due_back: &NaiveDate) -> Result<(), ValidationError> {
    check_due_back(*due_back, today())
        .map(|_| ())
        .map_err(|e| ValidationError::new(e.code()).with_message(Cow::Owned(e.to_string())))
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    INPUT_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
}

/// Raw renewal submission, as posted
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct RenewalSubmission {
    /// New due date, e.g. `2024-01-15`
    pub due_back: Option<String>,
}

/// Cleaned renewal form
#[derive(Debug, Clone, Validate)]
pub struct RenewBookForm {
    #[validate(custom(function = "validate_due_back"))]
    pub due_back: NaiveDate,
}

impl RenewBookForm {
    /// Clean and validate a submission against today's date
    pub fn bind(submission: &RenewalSubmission) -> Result<Self, FieldErrors> {
        let raw = submission
            .due_back
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| single_error("due_back", REQUIRED))?;

        let due_back = parse_date(raw).ok_or_else(|| single_error("due_back", INVALID_DATE))?;

        let form = Self { due_back };
        form.validate().map_err(|e| field_errors(&e))?;
        Ok(form)
    }
}

/// Form state handed to the template
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RenewalFormView {
    /// Current value of the field, initial or as submitted
    pub due_back: Option<String>,
    pub label: String,
    pub help_text: String,
    pub errors: BTreeMap<String, Vec<String>>,
}

impl RenewalFormView {
    /// Unbound form pre-filled with the instance's current due date
    pub fn initial(due_back: Option<NaiveDate>) -> Self {
        Self {
            due_back: due_back.map(|d| d.format("%Y-%m-%d").to_string()),
            label: DUE_BACK_LABEL.to_string(),
            help_text: DUE_BACK_HELP.to_string(),
            errors: FieldErrors::new(),
        }
    }

    /// Bound form echoing the rejected input
    pub fn rejected(submission: &RenewalSubmission, errors: FieldErrors) -> Self {
        Self {
            due_back: submission.due_back.clone(),
            label: DUE_BACK_LABEL.to_string(),
            help_text: DUE_BACK_HELP.to_string(),
            errors,
        }
    }
}
