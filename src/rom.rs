use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Where the ROM image sits in the address space. Chosen by configuration,
/// never inferred from the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RomLayout {
    /// The image is the entire 64KB space, loaded at 0x0000.
    Full64K,
    /// A 32KB image mapped at 0x8000, ending at the top of memory so the
    /// hardware vectors fall inside it.
    High32K,
}

impl RomLayout {
    pub fn size(self) -> usize {
        match self {
            RomLayout::Full64K => 0x10000,
            RomLayout::High32K => 0x8000,
        }
    }

    pub fn base(self) -> u16 {
        match self {
            RomLayout::Full64K => 0x0000,
            RomLayout::High32K => 0x8000,
        }
    }
}

#[derive(Debug)]
pub enum RomError {
    Io(std::io::Error),
    InvalidLength { expected: usize, actual: usize },
}

impl fmt::Display for RomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RomError::Io(e) => write!(f, "failed to read ROM file: {}", e),
            RomError::InvalidLength { expected, actual } => write!(
                f,
                "ROM image is {} bytes, layout requires exactly {}",
                actual, expected
            ),
        }
    }
}

impl std::error::Error for RomError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RomError::Io(e) => Some(e),
            RomError::InvalidLength { .. } => None,
        }
    }
}

#[derive(Debug)]
pub struct RomImage {
    bytes: Vec<u8>,
    layout: RomLayout,
    checksum: u32,
}

impl RomImage {
    pub fn load_from_file<P: AsRef<Path>>(path: P, layout: RomLayout) -> Result<Self, RomError> {
        let mut file = File::open(path).map_err(RomError::Io)?;
        let mut data = Vec::new();
        file.read_to_end(&mut data).map_err(RomError::Io)?;

        Self::load_from_bytes(data, layout)
    }

    /// Length must match the layout exactly; anything else fails before a
    /// single instruction runs.
    pub fn load_from_bytes(data: Vec<u8>, layout: RomLayout) -> Result<Self, RomError> {
        if data.len() != layout.size() {
            return Err(RomError::InvalidLength {
                expected: layout.size(),
                actual: data.len(),
            });
        }

        let checksum = checksum(&data);
        Ok(RomImage {
            bytes: data,
            layout,
            checksum,
        })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn layout(&self) -> RomLayout {
        self.layout
    }

    pub fn checksum(&self) -> u32 {
        self.checksum
    }
}

/// Wrapping byte sum. Savestates record it to refuse restoring over a
/// different image.
pub fn checksum(bytes: &[u8]) -> u32 {
    bytes
        .iter()
        .fold(0u32, |sum, &b| sum.wrapping_add(b as u32))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_sizes_and_bases() {
        assert_eq!(RomLayout::Full64K.size(), 0x10000);
        assert_eq!(RomLayout::Full64K.base(), 0x0000);
        assert_eq!(RomLayout::High32K.size(), 0x8000);
        assert_eq!(RomLayout::High32K.base(), 0x8000);
    }

    #[test]
    fn exact_length_is_required() {
        let err = RomImage::load_from_bytes(vec![0; 100], RomLayout::High32K).unwrap_err();
        match err {
            RomError::InvalidLength { expected, actual } => {
                assert_eq!(expected, 0x8000);
                assert_eq!(actual, 100);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn full_image_loads() {
        let mut data = vec![0u8; 0x8000];
        data[0] = 0x12;
        data[0x7FFF] = 0x34;
        let rom = RomImage::load_from_bytes(data, RomLayout::High32K).unwrap();
        assert_eq!(rom.bytes().len(), 0x8000);
        assert_eq!(rom.checksum(), 0x12 + 0x34);
    }

    #[test]
    fn checksum_wraps_instead_of_overflowing() {
        // Not reachable with a 64KB image, but the helper is used on
        // arbitrary slices by the savestate path.
        assert_eq!(checksum(&[0xFF, 0x01]), 0x100);
    }
}
