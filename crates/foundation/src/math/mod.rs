pub mod easing;
pub mod euler;
pub mod precision;
pub mod quat;
pub mod spherical;
pub mod vec;

pub use easing::*;
pub use euler::*;
pub use precision::*;
pub use quat::*;
pub use spherical::*;
pub use vec::*;
