//! Binary recordings of a fluid simulation: a `_meta` file describing the run and one file per
//! frame holding length-prefixed sections of positions and velocities.

use std::{
    io::Write,
    path::{Path, PathBuf},
};

use eddy_sph::Sph;
use encode::{EncodingError, FluidFrameEncoder};
use glam::{Vec2, Vec3};

pub mod as_bytes;
pub mod decode;
pub mod encode;

pub use decode::{DecodingError, FluidDataDecoder, FluidFrameData, FluidMetadata};
pub use encode::FluidDataEncoder;

pub trait EncodeFluid {
    fn encode_state<W: Write>(&self, encoder: &mut FluidFrameEncoder<W>) -> Result<(), EncodingError>;
}

impl EncodeFluid for Sph<Vec2> {
    fn encode_state<W: Write>(&self, encoder: &mut FluidFrameEncoder<W>) -> Result<(), EncodingError> {
        encoder.encode_section(self.len(), self.positions().iter().copied())?;
        encoder.encode_section(self.len(), self.velocities().iter().copied())?;

        Ok(())
    }
}

impl EncodeFluid for Sph<Vec3> {
    fn encode_state<W: Write>(&self, encoder: &mut FluidFrameEncoder<W>) -> Result<(), EncodingError> {
        encoder.encode_section(self.len(), self.positions().iter().copied())?;
        encoder.encode_section(self.len(), self.velocities().iter().copied())?;

        Ok(())
    }
}

/// Path of frame `frame`, zero-padded so every frame name in the recording has equal width.
pub fn frame_path(dir: &Path, frame: u64, num_frames: u64) -> PathBuf {
    let max_digits = num_frames.saturating_sub(1).checked_ilog10().unwrap_or(0) + 1;
    let digits = frame.checked_ilog10().unwrap_or(0) + 1;
    let zeros = max_digits.saturating_sub(digits);

    dir.join(format!("{}{frame}.dat", "0".repeat(zeros as usize)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_names_share_a_width() {
        let dir = Path::new("rec");

        assert_eq!(frame_path(dir, 0, 1), dir.join("0.dat"));
        assert_eq!(frame_path(dir, 3, 10), dir.join("3.dat"));
        assert_eq!(frame_path(dir, 3, 11), dir.join("03.dat"));
        assert_eq!(frame_path(dir, 10, 11), dir.join("10.dat"));
        assert_eq!(frame_path(dir, 7, 600), dir.join("007.dat"));
        assert_eq!(frame_path(dir, 0, 0), dir.join("0.dat"));
    }

    #[test]
    fn frame_sections_are_length_prefixed() {
        let fluid = Sph::new([Vec2::new(1.0, 2.0), Vec2::new(3.0, 4.0)]);

        let mut bytes = Vec::new();
        let mut encoder = FluidFrameEncoder::new(&mut bytes);
        fluid.encode_state(&mut encoder).unwrap();
        encoder.finish().unwrap();

        // Two sections of an 8-byte length and two 8-byte vectors each.
        assert_eq!(bytes.len(), 2 * (8 + 2 * 8));
        assert_eq!(bytes[0..8], 2u64.to_ne_bytes());
        assert_eq!(bytes[8..12], 1.0f32.to_ne_bytes());
        assert_eq!(bytes[24..32], 2u64.to_ne_bytes());
        assert_eq!(bytes[32..40], [0; 8]);
    }
}
