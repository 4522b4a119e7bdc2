//! Request DTOs for the search proxy API
//!
//! Defines the raw query string accepted on `/api/search` and the normalized
//! descriptor the gateway works with.

use serde::Deserialize;

use crate::error::{GatewayError, Result};

/// Search radius used when the client does not send one
pub const DEFAULT_RADIUS: u32 = 50;

/// Page size used when the client does not send one
pub const DEFAULT_ROW_COUNT: u32 = 10;

/// Raw query parameters for GET /api/search
///
/// Everything arrives as an optional string so that missing fields and
/// malformed numbers can be reported as JSON validation errors instead of
/// extractor rejections.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchQuery {
    pub make: Option<String>,
    pub model: Option<String>,
    pub year: Option<String>,
    pub zip: Option<String>,
    pub radius: Option<String>,
    pub rows: Option<String>,
}

impl SearchQuery {
    /// Normalizes the query into a descriptor.
    ///
    /// Missing text fields become empty strings (the gateway reports them);
    /// `radius` and `rows` fall back to their defaults when absent or blank
    /// and fail validation when they are not non-negative integers.
    pub fn into_descriptor(self) -> Result<QueryDescriptor> {
        let radius = parse_number("radius", self.radius.as_deref(), DEFAULT_RADIUS)?;
        let row_count = parse_number("rows", self.rows.as_deref(), DEFAULT_ROW_COUNT)?;

        Ok(QueryDescriptor {
            make: self.make.unwrap_or_default(),
            model: self.model.unwrap_or_default(),
            year: self.year.unwrap_or_default(),
            location: self.zip.unwrap_or_default(),
            radius,
            row_count,
        })
    }
}

fn parse_number(name: &str, raw: Option<&str>, default: u32) -> Result<u32> {
    match raw.map(str::trim) {
        None | Some("") => Ok(default),
        Some(value) => value.parse().map_err(|_| {
            GatewayError::Validation(format!(
                "Invalid {}: expected a non-negative integer, got '{}'",
                name, value
            ))
        }),
    }
}

/// Normalized search descriptor identifying one upstream query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryDescriptor {
    pub make: String,
    pub model: String,
    pub year: String,
    /// Postal code the search is centred on (`zip` on the wire)
    pub location: String,
    pub radius: u32,
    pub row_count: u32,
}

impl QueryDescriptor {
    /// Creates a descriptor with the default radius and row count.
    pub fn new(
        make: impl Into<String>,
        model: impl Into<String>,
        year: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            make: make.into(),
            model: model.into(),
            year: year.into(),
            location: location.into(),
            radius: DEFAULT_RADIUS,
            row_count: DEFAULT_ROW_COUNT,
        }
    }

    pub fn with_radius(mut self, radius: u32) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_row_count(mut self, row_count: u32) -> Self {
        self.row_count = row_count;
        self
    }

    /// Wire names of the required fields that are empty or whitespace-only.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("make", &self.make),
            ("model", &self.model),
            ("year", &self.year),
            ("zip", &self.location),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }

    /// Fails with a validation error naming every missing required field.
    pub fn validate(&self) -> Result<()> {
        let missing = self.missing_fields();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(GatewayError::missing_fields(&missing))
        }
    }
}
