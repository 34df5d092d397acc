//! Machine construction configuration.

/// Configuration for constructing a Nova-64 instance.
///
/// Loading ROM images from disk is the host's job; the machine only takes
/// the bytes.
#[derive(Debug, Clone, Default)]
pub struct Nova64Config {
    /// ROM image, up to 8 KiB. Shorter images are zero-padded, longer
    /// ones truncated.
    pub rom: Vec<u8>,
}
