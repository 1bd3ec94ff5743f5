use std::{
    fs::File,
    io::{BufWriter, Write},
    path::PathBuf,
};

use eddy_sph::{Scene, Sph, SphVector};
use log::debug;
use thiserror::Error;

use crate::{frame_path, EncodeFluid};

use super::as_bytes::AsBytes;

/// Writes a recording: one `_meta` file and one file per frame, all in a fresh directory.
pub struct FluidDataEncoder {
    /// The path to the directory into which the fluid data will be placed.
    path: PathBuf,
    num_frames: u64,
    fps: u32,
    current_frame: u64,
}

impl FluidDataEncoder {
    /// Creates the output directory, which must not exist yet.
    pub fn new(path: PathBuf, num_frames: u64, fps: u32) -> Result<FluidDataEncoder, EncodingError> {
        std::fs::create_dir(&path)?;
        debug!("recording {num_frames} frames at {fps} fps into {}", path.display());

        Ok(Self {
            path,
            num_frames,
            fps,
            current_frame: 0,
        })
    }

    /// Number of frames written so far.
    pub fn frames_written(&self) -> u64 {
        self.current_frame
    }

    pub fn encode_metadata<V: SphVector>(&mut self, scene: &Scene<V>) -> Result<(), EncodingError> {
        let path = self.path.join("_meta");
        let mut writer = BufWriter::new(File::create(path)?);

        writer.write_all(&[V::DIM as u8])?;
        writer.write_all(&self.fps.to_ne_bytes())?;
        writer.write_all(&self.num_frames.to_ne_bytes())?;

        writer.write_all(&scene.params().particle_radius.to_bytes())?;

        let (min, max) = scene.bounds();
        for i in 0..V::DIM {
            writer.write_all(&min[i].to_bytes())?;
        }
        for i in 0..V::DIM {
            writer.write_all(&max[i].to_bytes())?;
        }

        writer.flush()?;

        Ok(())
    }

    pub fn encode_frame<V: SphVector>(&mut self, scene: &Scene<V>) -> Result<(), EncodingError>
    where
        Sph<V>: EncodeFluid,
    {
        if self.current_frame >= self.num_frames {
            return Err(EncodingError::TooManyFrames(self.num_frames));
        }

        let path = frame_path(&self.path, self.current_frame, self.num_frames);
        let mut encoder = FluidFrameEncoder {
            writer: BufWriter::new(File::create(path)?),
        };

        scene.fluid.encode_state(&mut encoder)?;
        encoder.finish()?;

        self.current_frame += 1;

        Ok(())
    }
}

/// Writes the length-prefixed sections of a single frame.
pub struct FluidFrameEncoder<W: Write> {
    writer: BufWriter<W>,
}

impl<W: Write> FluidFrameEncoder<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: BufWriter::new(writer),
        }
    }

    pub fn encode_section<const N: usize, T, I>(&mut self, len: usize, values: I) -> Result<(), EncodingError>
    where
        I: Iterator<Item = T>,
        T: AsBytes<N>,
    {
        self.writer.write_all(&(len as u64).to_ne_bytes())?;

        let bytes: Vec<_> = values.flat_map(|v| v.to_bytes()).collect();
        self.writer.write_all(&bytes)?;

        Ok(())
    }

    /// Flush buffered bytes, surfacing any write error.
    pub fn finish(mut self) -> Result<(), EncodingError> {
        self.writer.flush()?;
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum EncodingError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("recording already holds all {0} frames")]
    TooManyFrames(u64),
}
