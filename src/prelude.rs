pub use crate::dprintln; // Make the macro available
pub use anyhow::{Result as R, anyhow};

pub use rayon::prelude::*;
