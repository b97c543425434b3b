// src/noise.rs

//! Gradient noise generator behind `Pixmap::perlin_noise`.
//!
//! Classic improved Perlin noise over a 256-entry permutation table. The
//! default table is Ken Perlin's reference permutation, so unseeded
//! generators are deterministic; `seeded` shuffles a fresh table for
//! independent noise fields.

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

use crate::math;

/// Ken Perlin's reference permutation.
const REFERENCE_PERMUTATION: [u8; 256] = [
    151, 160, 137, 91, 90, 15, 131, 13, 201, 95, 96, 53, 194, 233, 7, 225, 140, 36, 103, 30, 69,
    142, 8, 99, 37, 240, 21, 10, 23, 190, 6, 148, 247, 120, 234, 75, 0, 26, 197, 62, 94, 252, 219,
    203, 117, 35, 11, 32, 57, 177, 33, 88, 237, 149, 56, 87, 174, 20, 125, 136, 171, 168, 68, 175,
    74, 165, 71, 134, 139, 48, 27, 166, 77, 146, 158, 231, 83, 111, 229, 122, 60, 211, 133, 230,
    220, 105, 92, 41, 55, 46, 245, 40, 244, 102, 143, 54, 65, 25, 63, 161, 1, 216, 80, 73, 209,
    76, 132, 187, 208, 89, 18, 169, 200, 196, 135, 130, 116, 188, 159, 86, 164, 100, 109, 198,
    173, 186, 3, 64, 52, 217, 226, 250, 124, 123, 5, 202, 38, 147, 118, 126, 255, 82, 85, 212,
    207, 206, 59, 227, 47, 16, 58, 17, 182, 189, 28, 42, 223, 183, 170, 213, 119, 248, 152, 2, 44,
    154, 163, 70, 221, 153, 101, 155, 167, 43, 172, 9, 129, 22, 39, 253, 19, 98, 108, 110, 79,
    113, 224, 232, 178, 185, 112, 104, 218, 246, 97, 228, 251, 34, 242, 193, 238, 210, 144, 12,
    191, 179, 162, 241, 81, 51, 145, 235, 249, 14, 239, 107, 49, 192, 214, 31, 181, 199, 106, 157,
    184, 84, 204, 176, 115, 121, 50, 45, 127, 4, 150, 254, 138, 236, 205, 93, 222, 114, 67, 29,
    24, 72, 243, 141, 128, 195, 78, 66, 215, 61, 156, 180,
];

/// A two/three-dimensional gradient noise field.
#[derive(Debug, Clone)]
pub struct PerlinNoise {
    permutation: [u8; 512],
}

impl Default for PerlinNoise {
    fn default() -> Self {
        PerlinNoise::new()
    }
}

impl PerlinNoise {
    /// Generator over the reference permutation table.
    #[must_use]
    pub fn new() -> Self {
        PerlinNoise {
            permutation: Self::doubled(&REFERENCE_PERMUTATION),
        }
    }

    /// Generator over a permutation shuffled from the seed.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);

        let mut table = REFERENCE_PERMUTATION;
        table.shuffle(&mut rng);

        PerlinNoise {
            permutation: Self::doubled(&table),
        }
    }

    fn doubled(table: &[u8; 256]) -> [u8; 512] {
        let mut permutation = [0; 512];

        permutation[..256].copy_from_slice(table);
        permutation[256..].copy_from_slice(table);

        permutation
    }

    /// Raw noise value, roughly within [-1, 1]. Integer lattice points
    /// evaluate to zero.
    #[must_use]
    pub fn generate(&self, x: f32, y: f32, z: f32) -> f32 {
        let cell_x = (x.floor() as i32 & 255) as usize;
        let cell_y = (y.floor() as i32 & 255) as usize;
        let cell_z = (z.floor() as i32 & 255) as usize;

        let x = x - x.floor();
        let y = y - y.floor();
        let z = z - z.floor();

        let u = Self::fade(x);
        let v = Self::fade(y);
        let w = Self::fade(z);

        let p = &self.permutation;

        let a = p[cell_x] as usize + cell_y;
        let aa = p[a] as usize + cell_z;
        let ab = p[a + 1] as usize + cell_z;
        let b = p[cell_x + 1] as usize + cell_y;
        let ba = p[b] as usize + cell_z;
        let bb = p[b + 1] as usize + cell_z;

        let bottom = math::linear_interpolation(
            math::linear_interpolation(
                Self::gradient(p[aa], x, y, z),
                Self::gradient(p[ba], x - 1.0, y, z),
                u,
            ),
            math::linear_interpolation(
                Self::gradient(p[ab], x, y - 1.0, z),
                Self::gradient(p[bb], x - 1.0, y - 1.0, z),
                u,
            ),
            v,
        );
        let top = math::linear_interpolation(
            math::linear_interpolation(
                Self::gradient(p[aa + 1], x, y, z - 1.0),
                Self::gradient(p[ba + 1], x - 1.0, y, z - 1.0),
                u,
            ),
            math::linear_interpolation(
                Self::gradient(p[ab + 1], x, y - 1.0, z - 1.0),
                Self::gradient(p[bb + 1], x - 1.0, y - 1.0, z - 1.0),
                u,
            ),
            v,
        );

        math::linear_interpolation(bottom, top, w)
    }

    /// Two-dimensional noise remapped onto [0, 1] for component storage.
    #[must_use]
    pub fn generate_unit(&self, x: f32, y: f32) -> f32 {
        ((self.generate(x, y, 0.0) + 1.0) * 0.5).clamp(0.0, 1.0)
    }

    /// Quintic smoothstep, zero first and second derivatives at the
    /// lattice.
    #[inline]
    fn fade(t: f32) -> f32 {
        t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
    }

    /// Projects the offset vector onto one of twelve gradient directions
    /// picked by the hash.
    #[inline]
    fn gradient(hash: u8, x: f32, y: f32, z: f32) -> f32 {
        let h = hash & 15;

        let u = if h < 8 { x } else { y };
        let v = if h < 4 {
            y
        } else if h == 12 || h == 14 {
            x
        } else {
            z
        };

        let u = if h & 1 == 0 { u } else { -u };
        let v = if h & 2 == 0 { v } else { -v };

        u + v
    }
}
