pub mod labels;
pub mod spiral;

pub use labels::Labels;
pub use spiral::spiral_data;
