pub use crate::util::*;

mod util;

solutions![(y2023, [d1, d3, d12, d13, d14]),];
