//! Photo encoding and the byte-budget compressor

mod budget;
mod encoder;

pub use budget::{
    estimate_base64_bytes, BudgetReport, CompressedPhotos, EncodedPhoto, PhotoBudgetCompressor,
};
pub use encoder::JpegPhotoEncoder;
