use axum::{Json, extract::Path};
use chrono::Utc;

use crate::models::Student;

/// Greet the named student with the current server time.
///
/// The greeting text is frozen as-is, double space and spelling included;
/// downstream clients match on it verbatim.
pub async fn echo_student_name(Path(name): Path<String>) -> String {
    format!("Hello  {} Responsed on : {}", name, Utc::now())
}

/// Return the student record for `name`.
pub async fn get_student_details(Path(name): Path<String>) -> Json<Student> {
    Json(Student::new(name))
}
