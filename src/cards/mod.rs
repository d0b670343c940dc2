mod activity;
mod perms;
mod profile;

pub use activity::*;
pub use perms::*;
pub use profile::*;
