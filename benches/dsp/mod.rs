//! Benchmarks for low-level DSP primitives.

mod distortion;
mod filter;
mod karplus;

pub use distortion::bench_distortion;
pub use filter::bench_filter;
pub use karplus::bench_karplus;
