/// Local coordinate frames and the push/pop transform stack
use log::debug;
use nalgebra::Vector3;

use crate::error::{Result, SceneError};
use crate::quantize::Quantizer;
use crate::rotation::{self, RotationMatrix};

/// Rotation around three axes (in degrees)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EulerAngles {
    pub pitch: f64,
    pub yaw: f64,
    pub roll: f64,
}

impl EulerAngles {
    pub fn new(pitch: f64, yaw: f64, roll: f64) -> Self {
        Self { pitch, yaw, roll }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    pub fn negated(self) -> Self {
        Self::new(-self.pitch, -self.yaw, -self.roll)
    }

    pub fn to_matrix(self) -> RotationMatrix {
        rotation::rotation_matrix(self.pitch, self.yaw, self.roll)
    }
}

/// How a transform stores its rotation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Orientation {
    /// Only the root transform is kept in this form
    Euler(EulerAngles),
    /// Result of composing one frame into another
    Matrix(RotationMatrix),
}

impl Orientation {
    pub fn matrix(&self) -> RotationMatrix {
        match self {
            Orientation::Euler(angles) => angles.to_matrix(),
            Orientation::Matrix(m) => *m,
        }
    }
}

/// A local origin plus orientation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vector3<f64>,
    pub orientation: Orientation,
}

impl Transform {
    pub fn root() -> Self {
        Self {
            position: Vector3::zeros(),
            orientation: Orientation::Euler(EulerAngles::zero()),
        }
    }

    /// Map a point given in this frame into the enclosing frame
    pub fn to_world(&self, local: &Vector3<f64>) -> Vector3<f64> {
        let inverse = rotation::transpose(&self.orientation.matrix());
        rotation::add(&self.position, &rotation::transform_point(local, &inverse))
    }

    /// Flat form: 6 values for Euler, 12 for position plus row-major matrix
    pub fn to_values(&self) -> Vec<f64> {
        let mut values = vec![self.position.x, self.position.y, self.position.z];
        match &self.orientation {
            Orientation::Euler(a) => values.extend([a.pitch, a.yaw, a.roll]),
            Orientation::Matrix(m) => {
                for row in 0..3 {
                    values.extend([m[(row, 0)], m[(row, 1)], m[(row, 2)]]);
                }
            }
        }
        values
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::root()
    }
}

/// Transform of the whole node, recorded outside any push/pop scope
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NodeTransform {
    pub position: [f64; 3],
    pub rotation: EulerAngles,
}

/// Stack of saved frames plus the currently active one.
///
/// Depth counts saved entries; depth 0 means no local frame is active and
/// coordinates pass through unchanged.
#[derive(Debug, Clone, Default)]
pub struct TransformStack {
    active: Transform,
    saved: Vec<Transform>,
}

impl TransformStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    pub fn active(&self) -> &Transform {
        &self.active
    }

    pub fn push(&mut self) {
        self.saved.push(self.active);
        debug!("push_matrix: depth {}", self.depth());
    }

    pub fn pop(&mut self) -> Result<()> {
        let restored = self.saved.pop().ok_or(SceneError::StackUnderflow)?;
        self.active = restored;
        debug!("pop_matrix: depth {}", self.depth());
        Ok(())
    }

    /// Resolve a caller point against the active frame (no quantization)
    pub fn resolve(&self, point: &Vector3<f64>) -> Vector3<f64> {
        if self.depth() > 0 {
            self.active.to_world(point)
        } else {
            *point
        }
    }

    /// Nest a new local frame inside the active one.
    ///
    /// Has no effect at depth 0; the scene records a node transform there
    /// instead.
    pub fn apply_local(&mut self, offset: &Vector3<f64>, angles: EulerAngles, quantizer: Quantizer) {
        if self.depth() == 0 {
            return;
        }

        let base = self.active.orientation.matrix();
        let world = self.active.to_world(offset);
        let [x, y, z] = quantizer.quantize_point(&world);

        let composed = rotation::multiply(&angles.negated().to_matrix(), &base);
        self.active = Transform {
            position: Vector3::new(x, y, z),
            orientation: Orientation::Matrix(composed),
        };
        debug!("transform: active {:?}", self.active.to_values());
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_transform_is_identity() {
        let t = Transform::root();
        let p = Vector3::new(1.5, -2.0, 3.0);
        assert_eq!(t.to_world(&p), p);
        assert_eq!(t.to_values(), vec![0.0; 6]);
    }

    #[test]
    fn test_pop_on_empty_stack_fails() {
        let mut stack = TransformStack::new();
        assert!(matches!(stack.pop(), Err(SceneError::StackUnderflow)));
        assert_eq!(stack.depth(), 0);
        assert_eq!(*stack.active(), Transform::root());
    }

    #[test]
    fn test_push_apply_pop_restores_active() {
        let mut stack = TransformStack::new();
        stack.push();
        stack.apply_local(&Vector3::new(3.0, 1.0, -2.0), EulerAngles::new(10.0, 20.0, 30.0), Quantizer::Grid);
        let before = *stack.active();

        stack.push();
        stack.apply_local(&Vector3::new(1.0, 2.0, 3.0), EulerAngles::new(0.0, 45.0, 0.0), Quantizer::Grid);
        assert_ne!(*stack.active(), before);
        stack.pop().unwrap();

        assert_eq!(*stack.active(), before);
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn test_saved_entry_is_not_aliased() {
        let mut stack = TransformStack::new();
        stack.push();
        stack.apply_local(&Vector3::new(5.0, 0.0, 0.0), EulerAngles::zero(), Quantizer::Grid);
        stack.pop().unwrap();
        assert_eq!(*stack.active(), Transform::root());
    }

    #[test]
    fn test_apply_local_is_ignored_at_depth_zero() {
        let mut stack = TransformStack::new();
        stack.apply_local(&Vector3::new(5.0, 5.0, 5.0), EulerAngles::new(0.0, 90.0, 0.0), Quantizer::Grid);
        assert_eq!(*stack.active(), Transform::root());
    }

    #[test]
    fn test_yaw_frame_rotates_offsets() {
        let mut stack = TransformStack::new();
        stack.push();
        stack.apply_local(&Vector3::new(0.0, 0.0, 5.0), EulerAngles::new(0.0, 90.0, 0.0), Quantizer::Float);

        // Stored rotation is Ry(-90); its transpose is Ry(90), sending +x to -z
        let p = stack.resolve(&Vector3::new(1.0, 0.0, 0.0));
        assert!((p - Vector3::new(0.0, 0.0, 4.0)).norm() < 1e-9);
    }

    #[test]
    fn test_nested_frames_accumulate() {
        let mut stack = TransformStack::new();
        stack.push();
        stack.apply_local(&Vector3::new(2.0, 0.0, 0.0), EulerAngles::zero(), Quantizer::Grid);
        stack.push();
        stack.apply_local(&Vector3::new(0.0, 3.0, 0.0), EulerAngles::zero(), Quantizer::Grid);

        let p = stack.resolve(&Vector3::zeros());
        assert_eq!(p, Vector3::new(2.0, 3.0, 0.0));
        assert!(matches!(stack.active().orientation, Orientation::Matrix(_)));
        assert_eq!(stack.active().to_values().len(), 12);
    }
}
