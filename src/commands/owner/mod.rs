mod avatar;
mod pie;

pub use avatar::*;
pub use pie::*;
