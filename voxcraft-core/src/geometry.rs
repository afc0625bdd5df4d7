/// Box primitives placed into a scene
use crate::quantize::round2;

/// An RGBA color with components in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::new(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Rgba = Rgba::new(0.0, 0.0, 0.0, 1.0);

    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Every component rounded to two decimals
    pub fn rounded(self) -> Self {
        Self::new(round2(self.r), round2(self.g), round2(self.b), round2(self.a))
    }

    pub fn to_array(self) -> [f64; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::WHITE
    }
}

/// A placed box; the position is already quantized
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoxelBox {
    pub position: [f64; 3],
    pub color: Rgba,
    pub texture_id: i32,
}

/// A box belonging to one keyframe
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FramedBox {
    pub voxel: VoxelBox,
    pub frame_id: u32,
}

/// A box request produced by an importer, fed to the scene one at a time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxSpec {
    pub position: [f64; 3],
    pub color: Rgba,
}

impl BoxSpec {
    pub fn new(x: f64, y: f64, z: f64, color: Rgba) -> Self {
        Self {
            position: [x, y, z],
            color,
        }
    }
}

/// Grid points of a line between two points.
///
/// Endpoints are floored first. The axis with the largest extent is walked in
/// unit steps, both ends included, and the other two axes are interpolated.
/// Ties pick x, then y, then z. Coincident endpoints yield no points.
pub fn line_points(start: [f64; 3], end: [f64; 3]) -> Vec<[f64; 3]> {
    let a = start.map(f64::floor);
    let b = end.map(f64::floor);
    let diff = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];

    let length = diff.iter().fold(0.0f64, |m, d| m.max(d.abs()));
    if length == 0.0 {
        return Vec::new();
    }

    let axis = (0..3).find(|&i| diff[i].abs() == length).unwrap_or(0);
    let direction = diff[axis].signum();

    (0..=length as i64)
        .map(|step| {
            let t = step as f64 * direction;
            std::array::from_fn(|i| {
                if i == axis {
                    a[i] + t
                } else {
                    a[i] + t * diff[i] / diff[axis]
                }
            })
        })
        .collect()
}
