pub mod assign;
pub mod checkout;
pub mod copy;
pub mod create;
pub mod delete;
pub mod list;
pub mod status;
pub mod sync;

pub use assign::Assign;
pub use checkout::{Load, Pull, Push};
pub use copy::CopyProject;
pub use create::Create;
pub use delete::Delete;
pub use list::List;
pub use status::Status;
pub use sync::SyncProject;
