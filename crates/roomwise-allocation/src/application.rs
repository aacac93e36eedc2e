//! The input to a room request submission.

use serde::{Deserialize, Serialize};

use crate::AllocationError;

/// What an applicant fills in to request a slot in a room.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub applicant_name: String,
    pub enrollment_id: String,
    pub contact: String,
    pub room_number: String,
    /// Number of roommates the applicant expects. Must be at least 1.
    pub roommate_count: u32,
}

impl Application {
    /// Creates an application from its fields.
    pub fn new(
        applicant_name: impl Into<String>,
        enrollment_id: impl Into<String>,
        contact: impl Into<String>,
        room_number: impl Into<String>,
        roommate_count: u32,
    ) -> Self {
        Self {
            applicant_name: applicant_name.into(),
            enrollment_id: enrollment_id.into(),
            contact: contact.into(),
            room_number: room_number.into(),
            roommate_count,
        }
    }

    /// Returns a copy with every text field trimmed.
    ///
    /// # Errors
    /// Returns [`AllocationError::Validation`] naming the first field
    /// that is blank after trimming, or a zero roommate count.
    pub(crate) fn normalized(&self) -> Result<Self, AllocationError> {
        let normalized = Self {
            applicant_name: required("applicant name", &self.applicant_name)?,
            enrollment_id: required("enrollment id", &self.enrollment_id)?,
            contact: required("contact", &self.contact)?,
            room_number: required("room number", &self.room_number)?,
            roommate_count: self.roommate_count,
        };

        if normalized.roommate_count == 0 {
            return Err(AllocationError::Validation(
                "roommate count must be at least 1".into(),
            ));
        }

        Ok(normalized)
    }
}

fn required(field: &str, value: &str) -> Result<String, AllocationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AllocationError::Validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}
