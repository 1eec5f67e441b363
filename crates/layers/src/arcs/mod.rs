pub mod anim;
pub mod group;
pub mod path;

pub use anim::*;
pub use group::*;
pub use path::*;
