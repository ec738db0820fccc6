pub mod announcement;
pub mod partition;
pub mod teacher;

pub use announcement::*;
pub use partition::*;
pub use teacher::*;
