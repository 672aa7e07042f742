pub mod relu;
pub mod softmax;

pub use relu::ReLU;
pub use softmax::Softmax;
