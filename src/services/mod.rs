mod catalog;
mod directory;
mod ledger;
mod sessions;

pub use catalog::TrainingCatalog;
pub use directory::UserDirectory;
pub use ledger::EnrollmentLedger;
pub use sessions::SessionGate;
