mod enrollment;
mod session;
mod training;
mod user;

pub use enrollment::*;
pub use session::*;
pub use training::*;
pub use user::*;
