pub mod interpolator;
pub mod kernel;
pub mod resampler;
pub mod sample_counter;
