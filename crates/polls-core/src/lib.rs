pub mod clock;
pub mod config;
pub mod error;
pub mod io;
pub mod page;
pub mod paths;
pub mod policy;
pub mod question;
pub mod store;

pub use error::{PollsError, Result};
