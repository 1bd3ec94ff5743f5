use std::{
    fs::File,
    io::{BufReader, ErrorKind, Read},
    path::PathBuf,
};

use eddy_sph::SphVector;
use smallvec::SmallVec;
use thiserror::Error;

use crate::frame_path;

/// Reads back a recording written by [`FluidDataEncoder`](crate::encode::FluidDataEncoder).
pub struct FluidDataDecoder {
    /// The path to the directory in which the fluid data resides.
    path: PathBuf,
    dim: u8,
    num_frames: u64,
    current_frame: u64,
}

impl FluidDataDecoder {
    pub fn new(path: PathBuf) -> FluidDataDecoder {
        Self {
            path,
            dim: 0,
            num_frames: 0,
            current_frame: 0,
        }
    }

    fn read_exact<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<(), DecodingError> {
        reader.read_exact(buf).map_err(|err| match err.kind() {
            ErrorKind::UnexpectedEof => DecodingError::Truncated,
            _ => DecodingError::Io(err),
        })
    }

    fn read_array<const N: usize, R: Read>(reader: &mut R) -> Result<[u8; N], DecodingError> {
        let mut bytes = [0; N];
        Self::read_exact(reader, &mut bytes)?;
        Ok(bytes)
    }

    fn read_f32<R: Read>(reader: &mut R) -> Result<f32, DecodingError> {
        Ok(f32::from_ne_bytes(Self::read_array(reader)?))
    }

    /// Read one length-prefixed section of `dim`-component vectors.
    fn read_section<R: Read>(&self, reader: &mut R) -> Result<FluidDataArray, DecodingError> {
        let len = u64::from_ne_bytes(Self::read_array(reader)?);
        let byte_len = len
            .checked_mul(self.dim as u64 * 4)
            .ok_or(DecodingError::Truncated)?;

        // Read through `take` so a corrupt length cannot force a huge allocation up front.
        let mut bytes = Vec::new();
        reader.by_ref().take(byte_len).read_to_end(&mut bytes)?;
        if bytes.len() as u64 != byte_len {
            return Err(DecodingError::Truncated);
        }

        let values = bytes
            .chunks_exact(4)
            .map(|b| f32::from_ne_bytes([b[0], b[1], b[2], b[3]]))
            .collect();

        Ok(FluidDataArray {
            dim: self.dim as usize,
            values,
        })
    }

    pub fn decode_metadata(&mut self) -> Result<FluidMetadata, DecodingError> {
        let path = self.path.join("_meta");
        let mut reader = BufReader::new(File::open(path)?);

        let [dim] = Self::read_array::<1, _>(&mut reader)?;
        if !(2..=3).contains(&dim) {
            return Err(DecodingError::InvalidDimension(dim));
        }

        let fps = u32::from_ne_bytes(Self::read_array(&mut reader)?);
        let num_frames = u64::from_ne_bytes(Self::read_array(&mut reader)?);
        let particle_radius = Self::read_f32(&mut reader)?;

        let mut bounds_min: SmallVec<[f32; 3]> = SmallVec::new();
        for _ in 0..dim {
            bounds_min.push(Self::read_f32(&mut reader)?);
        }

        let mut bounds_max: SmallVec<[f32; 3]> = SmallVec::new();
        for _ in 0..dim {
            bounds_max.push(Self::read_f32(&mut reader)?);
        }

        self.dim = dim;
        self.num_frames = num_frames;
        self.current_frame = 0;

        Ok(FluidMetadata {
            dim,
            fps,
            num_frames,
            particle_radius,
            bounds_min,
            bounds_max,
        })
    }

    /// Decode the next frame, or `None` once every frame has been read. Metadata must be
    /// decoded first.
    pub fn decode_frame(&mut self) -> Result<Option<FluidFrameData>, DecodingError> {
        if self.current_frame >= self.num_frames {
            return Ok(None);
        }

        let path = frame_path(&self.path, self.current_frame, self.num_frames);
        let mut reader = BufReader::new(File::open(path)?);

        let positions = self.read_section(&mut reader)?;
        let velocities = self.read_section(&mut reader)?;

        if positions.len() != velocities.len() {
            return Err(DecodingError::SectionMismatch {
                positions: positions.len(),
                velocities: velocities.len(),
            });
        }

        self.current_frame += 1;

        Ok(Some(FluidFrameData { positions, velocities }))
    }

    /// Rewind to the first frame.
    pub fn reset(&mut self) {
        self.current_frame = 0;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FluidMetadata {
    pub dim: u8,
    pub fps: u32,
    pub num_frames: u64,
    pub particle_radius: f32,
    pub bounds_min: SmallVec<[f32; 3]>,
    pub bounds_max: SmallVec<[f32; 3]>,
}

impl FluidMetadata {
    /// Container bounds as vectors, or `None` if the recording has a different dimension.
    pub fn bounds<V: SphVector>(&self) -> Option<(V, V)> {
        (self.dim as usize == V::DIM).then(|| (to_vector(&self.bounds_min), to_vector(&self.bounds_max)))
    }

    pub fn size(&self) -> SmallVec<[f32; 3]> {
        self.bounds_min
            .iter()
            .zip(&self.bounds_max)
            .map(|(min, max)| max - min)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FluidFrameData {
    pub positions: FluidDataArray,
    pub velocities: FluidDataArray,
}

/// Flat `f32` components of a section, `dim` per vector.
#[derive(Debug, Clone, PartialEq)]
pub struct FluidDataArray {
    dim: usize,
    values: Vec<f32>,
}

impl FluidDataArray {
    pub fn len(&self) -> usize {
        self.values.len() / self.dim.max(1)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over the vectors. `V::DIM` must equal the recording's dimension.
    pub fn iter<V: SphVector>(&self) -> impl Iterator<Item = V> + '_ {
        debug_assert_eq!(V::DIM, self.dim);
        self.values.chunks_exact(self.dim.max(1)).map(to_vector)
    }

    pub fn get<V: SphVector>(&self, i: usize) -> Option<V> {
        let start = i.checked_mul(self.dim)?;
        let end = start.checked_add(self.dim)?;
        self.values.get(start..end).map(to_vector)
    }
}

fn to_vector<V: SphVector>(components: &[f32]) -> V {
    let mut v = V::ZERO;
    for (axis, &c) in components.iter().take(V::DIM).enumerate() {
        v[axis] = c;
    }
    v
}

#[derive(Debug, Error)]
pub enum DecodingError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("recording has unsupported dimension {0}")]
    InvalidDimension(u8),
    #[error("recording ended in the middle of a value")]
    Truncated,
    #[error("frame has {positions} positions but {velocities} velocities")]
    SectionMismatch { positions: usize, velocities: usize },
}
