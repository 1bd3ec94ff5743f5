use std::time::Instant;

use glam::{Affine2, Affine3A, Quat, Vec2, Vec3};
use indicatif::{ProgressBar, ProgressIterator, ProgressStyle};
use log::info;

use eddy_io::{EncodeFluid, FluidDataEncoder};
use eddy_sph::{Container, ExternalForce, Scene, Sph, SphParams, SphVector};

use crate::{RunArgs, RunError};

/// Tilt of the `--oriented` container, in radians.
const TILT: f32 = 0.3;

/// Particle indices and padded sort slots are stored as `u32`.
const MAX_PARTICLES: usize = 1 << 31;

pub fn run(args: &RunArgs) -> Result<(), RunError> {
    if args.dim == 2 {
        let container = args.oriented.then(|| {
            Container::<Vec2>::oriented(Affine2::from_scale_angle_translation(
                Vec2::new(8.0, 6.0),
                TILT,
                Vec2::ZERO,
            ))
        });

        run_scene::<Vec2>(args, container, 40)
    } else {
        let container = args.oriented.then(|| {
            Container::<Vec3>::oriented(Affine3A::from_scale_rotation_translation(
                Vec3::new(8.0, 6.0, 8.0),
                Quat::from_rotation_z(TILT),
                Vec3::ZERO,
            ))
        });

        run_scene::<Vec3>(args, container, 16)
    }
}

fn run_scene<V: SphVector>(
    args: &RunArgs,
    container: Option<Container<V>>,
    default_per_axis: usize,
) -> Result<(), RunError>
where
    Sph<V>: EncodeFluid,
{
    let mut params = SphParams::<V>::default();
    if let Some(container) = container {
        params.container = container;
    }

    let per_axis = args.particles_per_axis.unwrap_or(default_per_axis);
    let spacing = 2.0 * params.particle_radius;
    let fluid = Sph::new(lattice::<V>(per_axis, spacing)?);

    let mut scene = Scene::new(fluid, params)?.with_substeps(args.substeps);

    if let Some(cursor) = &args.cursor {
        let point = cursor_point::<V>(cursor)?;
        scene.set_external_force(Some(ExternalForce::new(point, args.cursor_radius, args.cursor_strength)))?;
    }

    let fps = args.fps;
    let frames = (args.seconds * fps as f32).round().max(0.0) as u64;
    let dt = 1.0 / fps as f32;

    let mut encoder = FluidDataEncoder::new(args.output.clone(), frames, fps)?;
    encoder.encode_metadata(&scene)?;

    info!(
        "simulating {} particles in {}D for {frames} frames ({} substeps per frame)",
        scene.fluid.len(),
        V::DIM,
        args.substeps.max(1),
    );

    let bar_template = "Running Simulation {spinner:.green} [{elapsed}] [{bar:50.white/white}] {pos}/{len} ({eta})";
    let style = ProgressStyle::with_template(bar_template)?
        .progress_chars("=> ")
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");
    let progress = ProgressBar::new(frames).with_style(style);

    let start = Instant::now();
    for _ in (0..frames).progress_with(progress) {
        scene.step(dt);
        encoder.encode_frame(&scene)?;
    }

    info!(
        "wrote {} frames to {} in {:.2?}",
        encoder.frames_written(),
        args.output.display(),
        start.elapsed(),
    );

    Ok(())
}

/// A cube (or square) of `per_axis^D` particles centred on the origin.
fn lattice<V: SphVector>(per_axis: usize, spacing: f32) -> Result<Vec<V>, RunError> {
    let count = per_axis
        .checked_pow(V::DIM as u32)
        .filter(|&count| count <= MAX_PARTICLES)
        .ok_or(RunError::TooManyParticles {
            per_axis,
            dim: V::DIM,
        })?;
    let offset = (per_axis as f32 - 1.0) * 0.5;

    Ok((0..count)
        .map(|mut i| {
            let mut p = V::ZERO;
            for axis in 0..V::DIM {
                p[axis] = ((i % per_axis) as f32 - offset) * spacing;
                i /= per_axis;
            }
            p
        })
        .collect())
}

fn cursor_point<V: SphVector>(components: &[f32]) -> Result<V, RunError> {
    if components.len() != V::DIM {
        return Err(RunError::CursorDimension {
            expected: V::DIM,
            got: components.len(),
        });
    }

    let mut point = V::ZERO;
    for (axis, &c) in components.iter().enumerate() {
        point[axis] = c;
    }

    Ok(point)
}
