use std::path::PathBuf;

use glam::{Vec2, Vec3};

use eddy_io::{decode::FluidFrameData, FluidDataDecoder};
use eddy_sph::SphVector;

use crate::RunError;

pub fn inspect(dir: PathBuf) -> Result<(), RunError> {
    let mut decoder = FluidDataDecoder::new(dir);
    let meta = decoder.decode_metadata()?;

    println!(
        "{}D recording: {} frames at {} fps, particle radius {}",
        meta.dim, meta.num_frames, meta.fps, meta.particle_radius,
    );
    println!(
        "container bounds {:?} .. {:?}",
        meta.bounds_min.as_slice(),
        meta.bounds_max.as_slice(),
    );

    if meta.dim == 2 {
        print_frames::<Vec2>(&mut decoder)
    } else {
        print_frames::<Vec3>(&mut decoder)
    }
}

fn print_frames<V: SphVector>(decoder: &mut FluidDataDecoder) -> Result<(), RunError> {
    let mut index = 0u64;

    while let Some(frame) = decoder.decode_frame()? {
        let summary = FrameSummary::<V>::new(&frame);

        match summary.bounds {
            Some((min, max)) => println!(
                "{index:>6}  {:>7} particles  mean speed {:>9.4}  bounds {min:?} .. {max:?}",
                summary.count, summary.mean_speed,
            ),
            None => println!("{index:>6}  no particles"),
        }

        index += 1;
    }

    Ok(())
}

/// Per-frame statistics printed by `eddy inspect`.
#[derive(Debug)]
struct FrameSummary<V> {
    count: usize,
    mean_speed: f32,
    bounds: Option<(V, V)>,
}

impl<V: SphVector> FrameSummary<V> {
    fn new(frame: &FluidFrameData) -> Self {
        let count = frame.positions.len();

        let total_speed: f32 = frame.velocities.iter::<V>().map(|v| v.length()).sum();
        let mean_speed = if count == 0 { 0.0 } else { total_speed / count as f32 };

        let bounds = frame.positions.iter::<V>().fold(None, |bounds: Option<(V, V)>, p| {
            let (mut min, mut max) = bounds.unwrap_or((p, p));
            for axis in 0..V::DIM {
                min[axis] = min[axis].min(p[axis]);
                max[axis] = max[axis].max(p[axis]);
            }
            Some((min, max))
        });

        Self {
            count,
            mean_speed,
            bounds,
        }
    }
}
