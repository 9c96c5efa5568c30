pub mod members;
pub mod bills;
pub mod project;

pub use members::{Member, MemberId};
pub use bills::{Bill, CATEGORY_REIMBURSEMENT};
pub use project::Project;
