use serde::{Deserialize, Serialize};

/// Address every student record reports in this version.
pub const STUDENT_ADDRESS: &str = "Pune";

/// Class every student record reports in this version.
pub const STUDENT_CLASS: &str = "MCA";

/// The record returned by the student details endpoint.
///
/// Built fresh per request; only `name` varies, address and class are fixed.
/// The field is named `cls` on the wire, clients depend on it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    pub name: String,
    pub address: String,
    pub cls: String,
}

impl Student {
    pub fn new(name: String) -> Self {
        Self {
            name,
            address: STUDENT_ADDRESS.to_string(),
            cls: STUDENT_CLASS.to_string(),
        }
    }
}
