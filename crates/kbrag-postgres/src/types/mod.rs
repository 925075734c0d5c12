mod constraints;
mod enums;

pub use constraints::{ConstraintCategory, ConstraintViolation};
pub use enums::{DocumentStatus, IndexStatus};
