pub mod dense;

pub use dense::{Dense, LayerShape, ParamsMut};
