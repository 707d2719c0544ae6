use serde::{Deserialize, Serialize};
use shared::{Student, StudentForm, StudentRow};

use crate::domain::field_mask::{to_display_date, to_storage_date};

/// Fields written to the store on create or update
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentPayload {
    pub name: String,
    pub mother_name: Option<String>,
    /// Storage form `YYYY-MM-DD`
    pub birth_date: Option<String>,
    pub case_number: Option<String>,
    pub notes: Option<String>,
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

impl StudentPayload {
    /// Build the payload from a form; the birth date is converted to storage
    /// form and collapses to `None` when it is not a complete date.
    pub fn from_form(form: &StudentForm) -> Self {
        Self {
            name: form.name.trim().to_string(),
            mother_name: non_empty(&form.mother_name),
            birth_date: to_storage_date(&form.birth_date),
            case_number: non_empty(&form.case_number),
            notes: non_empty(&form.notes),
        }
    }
}

/// Fill a form from a stored record for editing
pub fn form_from_student(student: &Student) -> StudentForm {
    StudentForm {
        name: student.name.clone(),
        mother_name: student.mother_name.clone().unwrap_or_default(),
        birth_date: to_display_date(student.birth_date.as_deref()),
        case_number: student.case_number.clone().unwrap_or_default(),
        notes: student.notes.clone().unwrap_or_default(),
    }
}

pub fn row_from_student(student: &Student) -> StudentRow {
    StudentRow {
        id: student.id.clone(),
        name: student.name.clone(),
        mother_name: student.mother_name.clone().unwrap_or_default(),
        birth_date: to_display_date(student.birth_date.as_deref()),
        case_number: student.case_number.clone().unwrap_or_default(),
        notes: student.notes.clone().unwrap_or_default(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StudentValidationError {
    #[error("Student name is required.")]
    MissingName,
    #[error("A student with this case number already exists.")]
    DuplicateCaseNumber,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_payload_from_form() {
        let form = StudentForm {
            name: "  Ana Souza ".to_string(),
            mother_name: String::new(),
            birth_date: "15/06/2015".to_string(),
            case_number: "1234/56".to_string(),
            notes: String::new(),
        };
        let payload = StudentPayload::from_form(&form);
        assert_eq!(payload.name, "Ana Souza");
        assert_eq!(payload.mother_name, None);
        assert_eq!(payload.birth_date.as_deref(), Some("2015-06-15"));
        assert_eq!(payload.case_number.as_deref(), Some("1234/56"));
        assert_eq!(payload.notes, None);
    }

    #[test]
    fn test_incomplete_birth_date_is_dropped() {
        let form = StudentForm {
            name: "Ana".to_string(),
            birth_date: "15/06".to_string(),
            ..StudentForm::default()
        };
        assert_eq!(StudentPayload::from_form(&form).birth_date, None);
    }

    #[test]
    fn test_form_from_student() {
        let student = Student {
            id: "abc".to_string(),
            name: "Ana".to_string(),
            mother_name: Some("Maria".to_string()),
            birth_date: Some("2015-06-15".to_string()),
            case_number: None,
            notes: None,
            created_at: Utc::now(),
        };
        let form = form_from_student(&student);
        assert_eq!(form.birth_date, "15/06/2015");
        assert_eq!(form.mother_name, "Maria");
        assert_eq!(form.case_number, "");
        assert_eq!(row_from_student(&student).birth_date, "15/06/2015");
    }
}
