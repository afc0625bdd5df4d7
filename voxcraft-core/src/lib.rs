/// voxcraft core library - scene model for voxel builds
///
/// Callers describe a scene through [`SceneState`] (boxes, keyframes, lights,
/// models, a push/pop transform stack) and export it as a [`Snapshot`] for an
/// external renderer. The PLY and CSV importers and the turtle sit on top of
/// the scene's box and line primitives.

pub mod error;
pub mod geometry;
pub mod heightmap;
pub mod options;
pub mod palette;
pub mod ply;
pub mod quantize;
pub mod rotation;
pub mod scene;
pub mod snapshot;
pub mod transform;
pub mod turtle;

// Re-export commonly used types
pub use error::{ImportError, Result, SceneError};
pub use geometry::{BoxSpec, FramedBox, Rgba, VoxelBox};
pub use options::{AnimationOptions, BoxOptions, BuildSettings, LightOptions, ModelOptions};
pub use palette::{LightType, Model, Shape, Texture};
pub use quantize::Quantizer;
pub use scene::{FramingState, SceneState};
pub use snapshot::Snapshot;
pub use transform::{EulerAngles, Orientation, Transform, TransformStack};
pub use turtle::Turtle;
