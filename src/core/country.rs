//! Country entity, its input payloads and the soft-delete visibility modes

use serde::{Deserialize, Serialize};
use validator::Validate;

/// A stored country record.
///
/// `deleted` marks a soft-deleted record. It is kept in storage forever and
/// is never part of the serialized API representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    pub id: i64,
    pub country_name: String,
    pub alpha_2_code: String,
    pub alpha_3_code: String,
    pub currencies: String,
    #[serde(skip_serializing, default)]
    pub deleted: bool,
}

impl Country {
    /// Build a live record at `id` from a validated creation payload
    pub fn from_new(id: i64, new: NewCountry) -> Self {
        Self {
            id,
            country_name: new.country_name.unwrap_or_default(),
            alpha_2_code: new.alpha_2_code.unwrap_or_default(),
            alpha_3_code: new.alpha_3_code.unwrap_or_default(),
            currencies: new.currencies.unwrap_or_default(),
            deleted: false,
        }
    }

    /// Whether the record is visible under `visibility`
    pub fn is_visible(&self, visibility: Visibility) -> bool {
        visibility.includes_deleted() || !self.deleted
    }

    /// Overwrite the fields present in `patch`.
    ///
    /// The soft-delete flag is never touched.
    pub fn apply(&mut self, patch: &CountryPatch) {
        if let Some(name) = &patch.country_name {
            self.country_name = name.clone();
        }
        if let Some(code) = &patch.alpha_2_code {
            self.alpha_2_code = code.clone();
        }
        if let Some(code) = &patch.alpha_3_code {
            self.alpha_3_code = code.clone();
        }
        if let Some(currencies) = &patch.currencies {
            self.currencies = currencies.clone();
        }
    }
}

/// Body of `PUT /country/{id}`.
///
/// Fields are optional at the type level so that a missing field surfaces
/// as a validation error naming it, not as a decoding failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate)]
pub struct NewCountry {
    #[validate(
        required(message = "Name of the country is required"),
        length(min = 1, max = 30, message = "must be between 1 and 30 characters")
    )]
    pub country_name: Option<String>,

    #[validate(
        required(message = "Alpha 2 code is required"),
        length(min = 1, max = 5, message = "must be between 1 and 5 characters")
    )]
    pub alpha_2_code: Option<String>,

    #[validate(
        required(message = "Alpha 3 code is required"),
        length(min = 1, max = 5, message = "must be between 1 and 5 characters")
    )]
    pub alpha_3_code: Option<String>,

    #[validate(
        required(message = "Currencies is required"),
        length(min = 1, max = 5, message = "must be between 1 and 5 characters")
    )]
    pub currencies: Option<String>,
}

impl NewCountry {
    pub fn new(
        country_name: impl Into<String>,
        alpha_2_code: impl Into<String>,
        alpha_3_code: impl Into<String>,
        currencies: impl Into<String>,
    ) -> Self {
        Self {
            country_name: Some(country_name.into()),
            alpha_2_code: Some(alpha_2_code.into()),
            alpha_3_code: Some(alpha_3_code.into()),
            currencies: Some(currencies.into()),
        }
    }

    /// Trim surrounding whitespace so a blank value fails the length rules
    pub fn normalized(self) -> Self {
        fn trim(value: Option<String>) -> Option<String> {
            value.map(|v| v.trim().to_string())
        }

        Self {
            country_name: trim(self.country_name),
            alpha_2_code: trim(self.alpha_2_code),
            alpha_3_code: trim(self.alpha_3_code),
            currencies: trim(self.currencies),
        }
    }
}

/// Body of `PATCH /country/{id}`.
///
/// Only supplied, non-empty fields overwrite the stored record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate)]
pub struct CountryPatch {
    #[validate(length(max = 30, message = "must be at most 30 characters"))]
    pub country_name: Option<String>,

    #[validate(length(max = 5, message = "must be at most 5 characters"))]
    pub alpha_2_code: Option<String>,

    #[validate(length(max = 5, message = "must be at most 5 characters"))]
    pub alpha_3_code: Option<String>,

    #[validate(length(max = 5, message = "must be at most 5 characters"))]
    pub currencies: Option<String>,
}

impl CountryPatch {
    /// Trim values, then drop empty ones so they read as "not supplied"
    pub fn normalized(self) -> Self {
        fn keep(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        }

        Self {
            country_name: keep(self.country_name),
            alpha_2_code: keep(self.alpha_2_code),
            alpha_3_code: keep(self.alpha_3_code),
            currencies: keep(self.currencies),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.country_name.is_none()
            && self.alpha_2_code.is_none()
            && self.alpha_3_code.is_none()
            && self.currencies.is_none()
    }
}

/// Which records a read can see.
///
/// Both modes query the same storage; `Live` hides soft-deleted rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    #[default]
    Live,
    WithDeleted,
}

impl Visibility {
    pub fn includes_deleted(self) -> bool {
        matches!(self, Visibility::WithDeleted)
    }

    /// Map an opt-in flag (such as a `with_deleted` query parameter)
    pub fn from_flag(with_deleted: bool) -> Self {
        if with_deleted {
            Visibility::WithDeleted
        } else {
            Visibility::Live
        }
    }
}
