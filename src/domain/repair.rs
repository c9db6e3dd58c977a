use serde::Serialize;

use crate::domain::category::ProblemCategory;
use crate::domain::ticket::Priority;
use crate::domain::validation::FieldErrors;

const MIN_TITLE_LEN: usize = 5;
const MIN_DESCRIPTION_LEN: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub file_name: String,
    pub content: Vec<u8>,
}

/// Ticket opened by IT staff, submitted as a multipart form.
#[derive(Debug, Clone)]
pub struct NewTicket {
    pub title: String,
    pub description: String,
    pub equipment_name: String,
    pub location: String,
    pub category: ProblemCategory,
    pub subcategory: String,
    pub priority: Priority,
    pub files: Vec<UploadFile>,
}

impl NewTicket {
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();

        let title = self.title.trim();
        if title.is_empty() {
            errors.add("title", "Title is required");
        } else if title.chars().count() < MIN_TITLE_LEN {
            errors.add("title", "Title must be at least 5 characters");
        }

        let description = self.description.trim();
        if description.is_empty() {
            errors.add("description", "Description is required");
        } else if description.chars().count() < MIN_DESCRIPTION_LEN {
            errors.add("description", "Description must be at least 10 characters");
        }

        if self.equipment_name.trim().is_empty() {
            errors.add("equipmentName", "Equipment name is required");
        }
        if self.location.trim().is_empty() {
            errors.add("location", "Location is required");
        }
        if self.category.subcategory(&self.subcategory).is_none() {
            errors.add(
                "problemSubcategory",
                format!(
                    "Subcategory must be one of {}",
                    self.category.subcategories().join(", ")
                ),
            );
        }

        errors
    }

    /// Text fields in the order the backend's form parser expects them.
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        let subcategory = self
            .category
            .subcategory(&self.subcategory)
            .map(str::to_string)
            .unwrap_or_else(|| self.subcategory.clone());
        vec![
            ("title", self.title.clone()),
            ("description", self.description.clone()),
            ("equipmentName", self.equipment_name.clone()),
            ("location", self.location.clone()),
            ("problemCategory", self.category.as_str().to_string()),
            ("problemSubcategory", subcategory),
            ("priority", self.priority.as_str().to_string()),
        ]
    }
}

/// Repair request filled in by an employee.
#[derive(Debug, Clone)]
pub struct RepairForm {
    pub location: String,
    pub category: ProblemCategory,
    pub subcategory: String,
    pub equipment_name: String,
    pub description: String,
    pub notes: String,
}

impl RepairForm {
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if self.location.trim().is_empty() {
            errors.add("location", "Location is required");
        }
        if self.equipment_name.trim().is_empty() {
            errors.add("equipmentName", "Equipment name is required");
        }
        if self.description.trim().is_empty() {
            errors.add("description", "Description is required");
        }
        if self.category.subcategory(&self.subcategory).is_none() {
            errors.add(
                "problemSubcategory",
                format!(
                    "Subcategory must be one of {}",
                    self.category.subcategories().join(", ")
                ),
            );
        }
        errors
    }

    pub fn into_submission(self, user_id: u64) -> RepairSubmission {
        let subcategory = self
            .category
            .subcategory(&self.subcategory)
            .map(str::to_string)
            .unwrap_or(self.subcategory);
        RepairSubmission {
            title: format!("{} - {}", self.category.as_str(), self.equipment_name),
            description: self.description,
            location: self.location,
            equipment_name: self.equipment_name,
            problem_category: self.category.as_str().to_string(),
            problem_subcategory: subcategory,
            notes: self.notes,
            priority: Priority::Medium,
            user_id,
        }
    }
}

/// JSON body of `POST /api/tickets` for requester submissions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepairSubmission {
    pub title: String,
    pub description: String,
    pub location: String,
    pub equipment_name: String,
    pub problem_category: String,
    pub problem_subcategory: String,
    pub notes: String,
    pub priority: Priority,
    pub user_id: u64,
}
