mod about;
mod linecount;
mod ping;

pub use about::*;
pub use linecount::*;
pub use ping::*;
