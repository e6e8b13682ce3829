#![allow(dead_code)]

pub use log::{info, warn};

pub use label_matrix::common_io::ensure_parent_dir;
pub use label_matrix::LabeledMatrix;

pub type Mat = nalgebra::DMatrix<f64>;
pub type DVec = nalgebra::DVector<f64>;

/// A square [`LabeledMatrix`] whose rows and columns share the node universe
/// of the network it was derived from
pub type Kernel = LabeledMatrix;
