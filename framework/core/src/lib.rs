mod deadline;

pub mod prelude {
    pub use crate::deadline::{DeadlineHandle, DeadlineListener};
}
