pub mod auth;
pub mod certificates;
pub mod enrollments;
pub mod records;
pub mod trainings;
pub mod users;
