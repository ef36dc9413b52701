pub mod sample;

pub use sample::{Sample, load_csv, soft_one_hot, soft_scale};
