//! error type shared by loading, exporting and the options file

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MeasureError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("invalid options file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("could not serialize options: {0}")]
    ConfigWrite(#[from] toml::ser::Error),

    #[error("no image loaded")]
    NoImage,

    #[error("image is {width}x{height}, larger than the {max_side}px this display can show")]
    TooLarge {
        width: u32,
        height: u32,
        max_side: usize,
    },

    #[error("decoder crashed: {0}")]
    DecodePanic(String),
}

pub type Result<T> = std::result::Result<T, MeasureError>;
