use glam::{Vec2, Vec3};

/// Fixed-size native-endian byte encoding of a recorded value.
pub trait AsBytes<const N: usize> {
    fn to_bytes(self) -> [u8; N];
}

impl AsBytes<4> for f32 {
    fn to_bytes(self) -> [u8; 4] {
        self.to_ne_bytes()
    }
}

impl AsBytes<8> for Vec2 {
    fn to_bytes(self) -> [u8; 8] {
        let mut b = [0; 8];
        b[0..4].copy_from_slice(&self.x.to_bytes());
        b[4..8].copy_from_slice(&self.y.to_bytes());
        b
    }
}

impl AsBytes<12> for Vec3 {
    fn to_bytes(self) -> [u8; 12] {
        let mut b = [0; 12];
        b[0..4].copy_from_slice(&self.x.to_bytes());
        b[4..8].copy_from_slice(&self.y.to_bytes());
        b[8..12].copy_from_slice(&self.z.to_bytes());
        b
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn components_are_laid_out_in_order() {
        let b = Vec3::new(1.0, -2.5, f32::MAX).to_bytes();

        assert_eq!(b[0..4], 1.0f32.to_ne_bytes());
        assert_eq!(b[4..8], (-2.5f32).to_ne_bytes());
        assert_eq!(b[8..12], f32::MAX.to_ne_bytes());
    }
}
