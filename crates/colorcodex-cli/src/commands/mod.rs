pub mod add;
pub mod common;
pub mod completions;
pub mod list;
pub mod session;
pub mod sync;
