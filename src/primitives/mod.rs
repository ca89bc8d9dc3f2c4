//! Core compute primitives (Vector, Matrix).
//!
//! These types carry training data in and score vectors out.

mod matrix;
mod vector;

pub use matrix::Matrix;
pub use vector::Vector;
