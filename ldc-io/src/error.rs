use thiserror::Error;

#[derive(Error, Debug)]
pub enum IoError {
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("File error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Config(#[from] serde_json::Error),

    #[error(transparent)]
    Core(#[from] ldc_core::LdcError),

    #[error("Map size {map_w}x{map_h} does not match image size {image_w}x{image_h}")]
    SizeMismatch {
        map_w: usize,
        map_h: usize,
        image_w: u32,
        image_h: u32,
    },
}

pub type Result<T> = std::result::Result<T, IoError>;

#[cfg(test)]
mod tests {
    use super::*;
    use ldc_core::LdcError;

    #[test]
    fn test_core_error_is_transparent() {
        let err: IoError = LdcError::InvalidArgument("bad".to_string()).into();
        assert_eq!(err.to_string(), "Invalid argument: bad");
    }

    #[test]
    fn test_size_mismatch_display() {
        let err = IoError::SizeMismatch {
            map_w: 10,
            map_h: 20,
            image_w: 30,
            image_h: 40,
        };
        assert_eq!(
            err.to_string(),
            "Map size 10x20 does not match image size 30x40"
        );
    }
}
