pub mod numeric;

pub use numeric::ButterflyScalar;
