pub mod common_io;
pub mod labeled;

pub use labeled::LabeledMatrix;
