pub mod discord;
pub mod permissions;
pub mod source;
pub mod task;
pub mod time;
