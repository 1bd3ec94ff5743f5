use std::f32::consts::PI;

/// Added to every stored density so downstream divisions never see zero.
pub const DENSITY_PADDING: f32 = 0.00001;

/// Normalisation constants for the smoothing kernels at a given radius.
///
/// All kernels are zero beyond `radius`. The density kernel is `(r - d)²`, the near-density
/// kernel `(r - d)³` and the viscosity kernel `(r² - d²)³`, each scaled so it integrates to one
/// over the support in the chosen dimensionality. Slopes are the radial derivatives and are
/// therefore non-positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KernelScales {
    pub radius: f32,
    pub density: f32,
    pub density_slope: f32,
    pub near: f32,
    pub near_slope: f32,
    pub viscosity: f32,
}

impl KernelScales {
    pub fn new_2d(radius: f32) -> Self {
        Self {
            radius,
            density: 6.0 / (PI * radius.powi(4)),
            density_slope: 12.0 / (PI * radius.powi(4)),
            near: 10.0 / (PI * radius.powi(5)),
            near_slope: 30.0 / (PI * radius.powi(5)),
            viscosity: 4.0 / (PI * radius.powi(8)),
        }
    }

    pub fn new_3d(radius: f32) -> Self {
        Self {
            radius,
            density: 15.0 / (2.0 * PI * radius.powi(5)),
            density_slope: 15.0 / (PI * radius.powi(5)),
            near: 15.0 / (PI * radius.powi(6)),
            near_slope: 45.0 / (PI * radius.powi(6)),
            viscosity: 315.0 / (64.0 * PI * radius.powi(9)),
        }
    }

    #[inline(always)]
    pub fn density(&self, distance: f32) -> f32 {
        if distance > self.radius {
            return 0.0;
        }

        let v = self.radius - distance;
        v * v * self.density
    }

    #[inline(always)]
    pub fn density_slope(&self, distance: f32) -> f32 {
        if distance > self.radius {
            return 0.0;
        }

        (distance - self.radius) * self.density_slope
    }

    #[inline(always)]
    pub fn near_density(&self, distance: f32) -> f32 {
        if distance > self.radius {
            return 0.0;
        }

        let v = self.radius - distance;
        v * v * v * self.near
    }

    #[inline(always)]
    pub fn near_density_slope(&self, distance: f32) -> f32 {
        if distance > self.radius {
            return 0.0;
        }

        let v = self.radius - distance;
        -v * v * self.near_slope
    }

    #[inline(always)]
    pub fn viscosity(&self, distance: f32) -> f32 {
        if distance > self.radius {
            return 0.0;
        }

        let v = self.radius * self.radius - distance * distance;
        v * v * v * self.viscosity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Integrate a radial kernel over the disc of the given radius.
    fn integrate_2d(f: impl Fn(f32) -> f32, radius: f32) -> f32 {
        let steps = 20_000;
        let dr = radius / steps as f32;
        (0..steps)
            .map(|i| {
                let r = (i as f32 + 0.5) * dr;
                (f(r) * 2.0 * PI * r * dr) as f64
            })
            .sum::<f64>() as f32
    }

    fn integrate_3d(f: impl Fn(f32) -> f32, radius: f32) -> f32 {
        let steps = 20_000;
        let dr = radius / steps as f32;
        (0..steps)
            .map(|i| {
                let r = (i as f32 + 0.5) * dr;
                (f(r) * 4.0 * PI * r * r * dr) as f64
            })
            .sum::<f64>() as f32
    }

    #[test]
    fn kernels_are_normalised_in_2d() {
        let k = KernelScales::new_2d(0.2);

        assert!((integrate_2d(|d| k.density(d), 0.2) - 1.0).abs() < 1e-3);
        assert!((integrate_2d(|d| k.near_density(d), 0.2) - 1.0).abs() < 1e-3);
        assert!((integrate_2d(|d| k.viscosity(d), 0.2) - 1.0).abs() < 1e-3);
    }

    #[test]
    fn kernels_are_normalised_in_3d() {
        let k = KernelScales::new_3d(0.25);

        assert!((integrate_3d(|d| k.density(d), 0.25) - 1.0).abs() < 1e-3);
        assert!((integrate_3d(|d| k.near_density(d), 0.25) - 1.0).abs() < 1e-3);
        assert!((integrate_3d(|d| k.viscosity(d), 0.25) - 1.0).abs() < 1e-3);
    }

    #[test]
    fn slopes_match_finite_differences() {
        let k = KernelScales::new_2d(0.5);
        let h = 1e-3;

        for d in [0.05, 0.1, 0.25, 0.4] {
            let fd = (k.density(d + h) - k.density(d - h)) / (2.0 * h);
            assert!((fd - k.density_slope(d)).abs() / fd.abs() < 1e-2, "density slope at {d}");

            let fd = (k.near_density(d + h) - k.near_density(d - h)) / (2.0 * h);
            assert!((fd - k.near_density_slope(d)).abs() / fd.abs() < 1e-2, "near slope at {d}");
        }
    }

    #[test]
    fn zero_outside_support() {
        let k = KernelScales::new_3d(1.0);

        assert_eq!(k.density(1.01), 0.0);
        assert_eq!(k.density_slope(1.01), 0.0);
        assert_eq!(k.near_density(2.0), 0.0);
        assert_eq!(k.near_density_slope(2.0), 0.0);
        assert_eq!(k.viscosity(1.5), 0.0);
    }

    #[test]
    fn peak_at_zero_distance() {
        let k = KernelScales::new_2d(0.2);

        assert!(k.density(0.0) > k.density(0.01));
        assert!(k.near_density(0.0) > k.near_density(0.01));
        assert!(k.density_slope(0.05) < 0.0);
        assert!(k.near_density_slope(0.05) < 0.0);
    }
}
