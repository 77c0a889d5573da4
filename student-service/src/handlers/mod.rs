pub mod health;
pub mod metrics;
pub mod students;

pub use health::{health_check, readiness_check};
pub use metrics::metrics;
pub use students::{echo_student_name, get_student_details};
