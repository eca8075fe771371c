pub mod asterism;
pub mod candidate;
pub mod observation;
pub mod orientation;

pub use asterism::*;
pub use candidate::*;
pub use observation::*;
pub use orientation::*;
