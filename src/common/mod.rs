//! Small general-purpose types shared across subsystems.

pub mod either;

pub use either::{collect_left_biased, collect_right_biased, Either};
