/// Scene state: every collection a snapshot carries, plus the transform
/// stack and keyframe bookkeeping used to fill them.

use log::{debug, warn};
use nalgebra::Vector3;

use std::collections::HashMap;
use std::hash::Hash;

use crate::error::Result;
use crate::geometry::{line_points, BoxSpec, FramedBox, Rgba, VoxelBox};
use crate::options::{AnimationOptions, BoxOptions, BuildSettings, LightOptions, ModelOptions};
use crate::palette::{LightType, Model, Shape, Texture};
use crate::quantize::{round2, Quantizer};
use crate::transform::{EulerAngles, NodeTransform, TransformStack};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTransform {
    pub position: [f64; 3],
    pub rotation: EulerAngles,
    pub frame_id: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationDescriptor {
    pub position: [f64; 3],
    pub rotation: EulerAngles,
    pub scale: f64,
    pub interval: f64,
}

impl Default for AnimationDescriptor {
    fn default() -> Self {
        Self {
            position: [0.0; 3],
            rotation: EulerAngles::zero(),
            scale: 1.0,
            interval: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub position: [f64; 3],
    pub color: Rgba,
    pub intensity: f64,
    pub interval: f64,
    pub light_type: LightType,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelInstance {
    pub model: Model,
    pub position: [f64; 3],
    pub rotation: EulerAngles,
    pub scale: f64,
    pub entity_name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelMove {
    pub entity_name: String,
    pub position: [f64; 3],
    pub rotation: EulerAngles,
    pub scale: f64,
}

/// Text drawn into the scene; color components are floored to 0 or 1
#[derive(Debug, Clone, PartialEq)]
pub struct Sentence {
    pub text: String,
    pub position: [f64; 3],
    pub color: Rgba,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FramingState {
    #[default]
    NotFraming,
    Framing(u32),
}

/// Mutable description of one scene, exported through [`crate::Snapshot`].
#[derive(Debug, Clone, Default)]
pub struct SceneState {
    settings: BuildSettings,
    stack: TransformStack,
    node_transform: NodeTransform,
    frame_transforms: Vec<FrameTransform>,
    global_animation: AnimationDescriptor,
    animation: AnimationDescriptor,
    boxes: Vec<VoxelBox>,
    frames: Vec<FramedBox>,
    /// Position of each entry in `boxes`
    box_slots: HashMap<PositionKey, usize>,
    /// Position of each entry in `frames`, per frame id
    frame_slots: HashMap<(PositionKey, u32), usize>,
    sentence: Option<Sentence>,
    lights: Vec<Light>,
    commands: Vec<String>,
    models: Vec<ModelInstance>,
    model_moves: Vec<ModelMove>,
    framing: FramingState,
    next_frame_id: u32,
}

impl SceneState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: BuildSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    /// Reset every collection and setting to its initial value
    pub fn clear(&mut self) {
        *self = Self::default();
        debug!("scene cleared");
    }

    pub fn quantizer(&self) -> Quantizer {
        Quantizer::from_float_mode(self.settings.allow_float)
    }

    fn quantize(&self, x: f64, y: f64, z: f64) -> [f64; 3] {
        self.quantizer().quantize_point(&Vector3::new(x, y, z))
    }

    pub fn push_matrix(&mut self) {
        self.stack.push();
    }

    /// Fails without touching state when no matching push exists
    pub fn pop_matrix(&mut self) -> Result<()> {
        self.stack.pop().inspect_err(|e| warn!("{e}"))
    }

    pub fn depth(&self) -> usize {
        self.stack.depth()
    }

    pub fn transform_stack(&self) -> &TransformStack {
        &self.stack
    }

    /// Move the local origin.
    ///
    /// Inside a push/pop scope this nests a new frame. Outside one it records
    /// the node transform, or a per-frame transform while framing.
    pub fn transform(&mut self, x: f64, y: f64, z: f64, rotation: EulerAngles) {
        if self.stack.depth() > 0 {
            let quantizer = self.quantizer();
            self.stack.apply_local(&Vector3::new(x, y, z), rotation, quantizer);
            return;
        }

        let position = self.quantize(x, y, z);
        match self.framing {
            FramingState::Framing(frame_id) => self.frame_transforms.push(FrameTransform {
                position,
                rotation,
                frame_id,
            }),
            FramingState::NotFraming => self.node_transform = NodeTransform { position, rotation },
        }
    }

    pub fn frame_in(&mut self) {
        if let FramingState::NotFraming = self.framing {
            self.framing = FramingState::Framing(self.next_frame_id);
            debug!("frame_in: frame {}", self.next_frame_id);
        }
    }

    /// Close the open frame; the next frame gets a fresh id
    pub fn frame_out(&mut self) {
        self.framing = FramingState::NotFraming;
        self.next_frame_id += 1;
        debug!("frame_out: next frame {}", self.next_frame_id);
    }

    pub fn framing(&self) -> FramingState {
        self.framing
    }

    pub fn set_frame_fps(&mut self, fps: u32) {
        self.commands.push(format!("fps {fps}"));
    }

    pub fn set_frame_repeats(&mut self, repeats: u32) {
        self.commands.push(format!("repeats {repeats}"));
    }

    /// Place a box, replacing whatever already occupies its position.
    pub fn create_box(&mut self, x: f64, y: f64, z: f64, options: &BoxOptions) {
        let world = self.stack.resolve(&Vector3::new(x, y, z));
        let position = self.quantizer().quantize_point(&world);
        let voxel = VoxelBox {
            position,
            color: options.color.rounded(),
            texture_id: Texture::resolve(&options.texture),
        };

        self.remove_at(position);
        let key = position_key(position);
        match self.framing {
            FramingState::Framing(frame_id) => {
                let framed = FramedBox { voxel, frame_id };
                push_slot(&mut self.frames, &mut self.frame_slots, (key, frame_id), framed);
            }
            FramingState::NotFraming => push_slot(&mut self.boxes, &mut self.box_slots, key, voxel),
        }
    }

    /// Remove the box at a position.
    ///
    /// The position is quantized but NOT resolved through the transform
    /// stack: callers inside a push/pop scope pass world coordinates.
    pub fn remove_box(&mut self, x: f64, y: f64, z: f64) {
        let position = self.quantize(x, y, z);
        self.remove_at(position);
    }

    fn remove_at(&mut self, position: [f64; 3]) {
        let key = position_key(position);
        match self.framing {
            FramingState::Framing(frame_id) => {
                remove_slot(&mut self.frames, &mut self.frame_slots, &(key, frame_id), |f| {
                    (position_key(f.voxel.position), f.frame_id)
                });
            }
            FramingState::NotFraming => {
                remove_slot(&mut self.boxes, &mut self.box_slots, &key, |b| position_key(b.position));
            }
        }
    }

    /// Place a box produced by an importer
    pub fn place(&mut self, spec: &BoxSpec) {
        let [x, y, z] = spec.position;
        self.create_box(x, y, z, &BoxOptions::new().rgba(spec.color));
    }

    /// Draw a line of boxes; returns `false` when the endpoints coincide
    /// and nothing was drawn.
    pub fn draw_line(&mut self, start: [f64; 3], end: [f64; 3], color: Rgba) -> bool {
        let points = line_points(start, end);
        if points.is_empty() {
            return false;
        }

        let options = BoxOptions::new().rgba(color);
        for [x, y, z] in points {
            self.create_box(x, y, z, &options);
        }
        true
    }

    pub fn animate_global(&mut self, x: f64, y: f64, z: f64, options: &AnimationOptions) {
        self.global_animation = self.animation_descriptor(x, y, z, options);
    }

    pub fn animate(&mut self, x: f64, y: f64, z: f64, options: &AnimationOptions) {
        self.animation = self.animation_descriptor(x, y, z, options);
    }

    fn animation_descriptor(&self, x: f64, y: f64, z: f64, options: &AnimationOptions) -> AnimationDescriptor {
        AnimationDescriptor {
            position: self.quantize(x, y, z),
            rotation: options.rotation,
            scale: options.scale,
            interval: options.interval,
        }
    }

    pub fn settings(&self) -> &BuildSettings {
        &self.settings
    }

    pub fn set_box_size(&mut self, size: f64) {
        self.settings.size = size;
    }

    pub fn set_build_interval(&mut self, interval: f64) {
        self.settings.interval = interval;
    }

    pub fn change_shape(&mut self, shape: Shape) {
        self.settings.shape = shape;
    }

    pub fn change_material(&mut self, is_metallic: bool, roughness: f64) {
        self.settings.is_metallic = is_metallic;
        self.settings.roughness = roughness;
    }

    /// Append a renderer command; `"float"` also switches to float mode
    pub fn set_command(&mut self, command: impl Into<String>) {
        let command = command.into();
        if command == "float" {
            self.settings.allow_float = true;
        }
        self.commands.push(command);
    }

    pub fn write_sentence(&mut self, text: impl Into<String>, x: f64, y: f64, z: f64, color: Rgba) {
        let c = color.rounded();
        self.sentence = Some(Sentence {
            text: text.into(),
            position: self.quantize(x, y, z),
            color: Rgba::new(c.r.floor(), c.g.floor(), c.b.floor(), c.a.floor()),
        });
    }

    pub fn set_light(&mut self, x: f64, y: f64, z: f64, options: &LightOptions) {
        self.lights.push(Light {
            position: self.quantize(x, y, z),
            color: options.color.rounded(),
            intensity: options.intensity,
            interval: options.interval,
            light_type: options.light_type,
        });
    }

    /// Instantiate a named model. Unknown names are reported and skipped;
    /// returns whether an instance was created.
    pub fn create_model(&mut self, name: &str, options: &ModelOptions) -> bool {
        let Some(model) = Model::from_name(name) else {
            warn!("No model name: {name}");
            return false;
        };

        let (position, rotation, scale) = rounded_pose(options);
        self.models.push(ModelInstance {
            model,
            position,
            rotation,
            scale,
            entity_name: options.entity_name.clone(),
        });
        true
    }

    /// Queue a new pose for a model created with an entity name
    pub fn move_model(&mut self, entity_name: &str, options: &ModelOptions) {
        let (position, rotation, scale) = rounded_pose(options);
        self.model_moves.push(ModelMove {
            entity_name: entity_name.to_string(),
            position,
            rotation,
            scale,
        });
    }

    pub fn node_transform(&self) -> &NodeTransform {
        &self.node_transform
    }

    pub fn frame_transforms(&self) -> &[FrameTransform] {
        &self.frame_transforms
    }

    pub fn global_animation(&self) -> &AnimationDescriptor {
        &self.global_animation
    }

    pub fn animation(&self) -> &AnimationDescriptor {
        &self.animation
    }

    pub fn boxes(&self) -> &[VoxelBox] {
        &self.boxes
    }

    pub fn frames(&self) -> &[FramedBox] {
        &self.frames
    }

    pub fn sentence(&self) -> Option<&Sentence> {
        self.sentence.as_ref()
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn commands(&self) -> &[String] {
        &self.commands
    }

    pub fn models(&self) -> &[ModelInstance] {
        &self.models
    }

    pub fn model_moves(&self) -> &[ModelMove] {
        &self.model_moves
    }
}

/// Bit patterns of a quantized position. Quantization never yields -0.0,
/// so equal coordinates always share a key.
type PositionKey = [u64; 3];

fn position_key(position: [f64; 3]) -> PositionKey {
    position.map(f64::to_bits)
}

fn push_slot<K: Eq + Hash, T>(items: &mut Vec<T>, slots: &mut HashMap<K, usize>, key: K, item: T) {
    slots.insert(key, items.len());
    items.push(item);
}

/// Remove the entry stored under `key`, keeping the order of the rest
fn remove_slot<K: Eq + Hash, T>(
    items: &mut Vec<T>,
    slots: &mut HashMap<K, usize>,
    key: &K,
    key_of: impl Fn(&T) -> K,
) {
    let Some(index) = slots.remove(key) else {
        return;
    };
    items.remove(index);
    for item in &items[index..] {
        if let Some(slot) = slots.get_mut(&key_of(item)) {
            *slot -= 1;
        }
    }
}

fn rounded_pose(options: &ModelOptions) -> ([f64; 3], EulerAngles, f64) {
    let r = options.rotation;
    (
        options.position.map(round2),
        EulerAngles::new(round2(r.pitch), round2(r.yaw), round2(r.roll)),
        round2(options.scale),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SceneError;
    use crate::palette::NO_TEXTURE;

    fn red() -> BoxOptions {
        BoxOptions::new().color(1.0, 0.0, 0.0)
    }

    #[test]
    fn test_create_box_quantizes_position() {
        let mut scene = SceneState::new();
        scene.create_box(1.26, -1.05, 0.04, &BoxOptions::new());
        assert_eq!(scene.boxes()[0].position, [1.0, -2.0, 0.0]);
    }

    #[test]
    fn test_float_command_switches_quantization() {
        let mut scene = SceneState::new();
        scene.set_command("float");
        scene.create_box(1.26, -1.05, 0.04, &BoxOptions::new());
        assert_eq!(scene.boxes()[0].position, [1.26, -1.05, 0.04]);
        assert!(scene.settings().allow_float);
        assert_eq!(scene.commands(), ["float"]);
    }

    #[test]
    fn test_same_position_keeps_last_box() {
        let mut scene = SceneState::new();
        scene.create_box(2.0, 0.0, 0.0, &red());
        scene.create_box(2.0, 0.0, 0.0, &BoxOptions::new().color(0.0, 0.0, 1.0).texture("dirt"));

        assert_eq!(scene.boxes().len(), 1);
        let b = scene.boxes()[0];
        assert_eq!(b.color, Rgba::new(0.0, 0.0, 1.0, 1.0));
        assert_eq!(b.texture_id, 2);
    }

    #[test]
    fn test_unknown_texture_is_untextured() {
        let mut scene = SceneState::new();
        scene.create_box(0.0, 0.0, 0.0, &BoxOptions::new().texture("marble"));
        assert_eq!(scene.boxes()[0].texture_id, NO_TEXTURE);
    }

    #[test]
    fn test_remove_box_after_create() {
        let mut scene = SceneState::new();
        scene.create_box(1.0, 2.0, 3.0, &red());
        scene.create_box(4.0, 2.0, 3.0, &red());
        scene.remove_box(1.0, 2.0, 3.0);
        assert_eq!(scene.boxes().len(), 1);
        assert_eq!(scene.boxes()[0].position, [4.0, 2.0, 3.0]);

        scene.remove_box(9.0, 9.0, 9.0);
        assert_eq!(scene.boxes().len(), 1);
    }

    #[test]
    fn test_remove_box_ignores_transform_stack() {
        let mut scene = SceneState::new();
        scene.push_matrix();
        scene.transform(10.0, 0.0, 0.0, EulerAngles::zero());
        scene.create_box(1.0, 0.0, 0.0, &red());
        assert_eq!(scene.boxes()[0].position, [11.0, 0.0, 0.0]);

        scene.remove_box(1.0, 0.0, 0.0);
        assert_eq!(scene.boxes().len(), 1);
        scene.remove_box(11.0, 0.0, 0.0);
        assert!(scene.boxes().is_empty());
        scene.pop_matrix().unwrap();
    }

    #[test]
    fn test_frames_are_isolated() {
        let mut scene = SceneState::new();
        scene.frame_in();
        scene.create_box(0.0, 0.0, 0.0, &red());
        scene.frame_out();
        scene.frame_in();
        scene.create_box(0.0, 0.0, 0.0, &red());
        scene.create_box(1.0, 0.0, 0.0, &red());
        scene.frame_out();

        assert!(scene.boxes().is_empty());
        let ids: Vec<u32> = scene.frames().iter().map(|f| f.frame_id).collect();
        assert_eq!(ids, vec![0, 1, 1]);
        assert_eq!(scene.framing(), FramingState::NotFraming);
    }

    #[test]
    fn test_remove_inside_frame_only_touches_open_frame() {
        let mut scene = SceneState::new();
        scene.create_box(0.0, 0.0, 0.0, &red());
        scene.frame_in();
        scene.create_box(0.0, 0.0, 0.0, &red());
        scene.frame_out();
        scene.frame_in();
        scene.create_box(0.0, 0.0, 0.0, &red());
        scene.remove_box(0.0, 0.0, 0.0);

        assert_eq!(scene.boxes().len(), 1);
        assert_eq!(scene.frames().len(), 1);
        assert_eq!(scene.frames()[0].frame_id, 0);
    }

    #[test]
    fn test_transform_at_root_records_node_or_frame_transform() {
        let mut scene = SceneState::new();
        scene.transform(1.26, 2.0, 3.0, EulerAngles::new(0.0, 45.0, 0.0));
        assert_eq!(scene.node_transform().position, [1.0, 2.0, 3.0]);
        assert_eq!(scene.node_transform().rotation.yaw, 45.0);

        scene.frame_in();
        scene.transform(4.0, 5.0, 6.0, EulerAngles::zero());
        assert_eq!(scene.frame_transforms().len(), 1);
        assert_eq!(scene.frame_transforms()[0].frame_id, 0);
        assert_eq!(scene.node_transform().position, [1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_local_frame_changes_placement() {
        let mut plain = SceneState::new();
        plain.create_box(1.0, 0.0, 0.0, &red());

        let mut nested = SceneState::new();
        nested.push_matrix();
        nested.transform(0.0, 0.0, 5.0, EulerAngles::new(0.0, 90.0, 0.0));
        nested.create_box(1.0, 0.0, 0.0, &red());
        nested.pop_matrix().unwrap();

        assert_eq!(plain.boxes()[0].position, [1.0, 0.0, 0.0]);
        assert_eq!(nested.boxes()[0].position, [0.0, 0.0, 4.0]);
        assert_eq!(nested.depth(), 0);
    }

    #[test]
    fn test_same_position_in_one_frame_keeps_last_box() {
        let mut scene = SceneState::new();
        scene.frame_in();
        scene.create_box(3.0, 0.0, 0.0, &red());
        scene.frame_out();
        scene.frame_in();
        scene.create_box(3.0, 0.0, 0.0, &red());
        scene.create_box(3.0, 0.0, 0.0, &BoxOptions::new().color(0.0, 1.0, 0.0));
        scene.frame_out();

        assert_eq!(scene.frames().len(), 2);
        let first = scene.frames()[0];
        assert_eq!(first.frame_id, 0);
        assert_eq!(first.voxel.color, Rgba::new(1.0, 0.0, 0.0, 1.0));
        let second = scene.frames()[1];
        assert_eq!(second.frame_id, 1);
        assert_eq!(second.voxel.color, Rgba::new(0.0, 1.0, 0.0, 1.0));
    }

    #[test]
    fn test_replacement_order_after_removals() {
        let mut scene = SceneState::new();
        let blue = BoxOptions::new().color(0.0, 0.0, 1.0);
        for x in [0.0, 1.0, 2.0] {
            scene.create_box(x, 0.0, 0.0, &red());
        }
        scene.create_box(0.0, 0.0, 0.0, &red());
        scene.create_box(2.0, 0.0, 0.0, &red());
        scene.remove_box(1.0, 0.0, 0.0);
        scene.create_box(0.0, 0.0, 0.0, &blue);

        let xs: Vec<f64> = scene.boxes().iter().map(|b| b.position[0]).collect();
        assert_eq!(xs, vec![2.0, 0.0]);
        assert_eq!(scene.boxes()[1].color, Rgba::new(0.0, 0.0, 1.0, 1.0));

        scene.remove_box(2.0, 0.0, 0.0);
        scene.remove_box(0.0, 0.0, 0.0);
        assert!(scene.boxes().is_empty());
    }

    #[test]
    fn test_full_grid_of_boxes() {
        let mut scene = SceneState::new();
        for row in 0..257 {
            for column in 0..257 {
                scene.create_box(column as f64, (row % 7) as f64, row as f64, &red());
            }
        }
        scene.create_box(0.0, 0.0, 0.0, &BoxOptions::new());
        assert_eq!(scene.boxes().len(), 257 * 257);
        assert_eq!(scene.boxes().last().map(|b| b.color), Some(Rgba::WHITE));
    }

    #[test]
    fn test_pop_without_push_is_rejected() {
        let mut scene = SceneState::new();
        assert!(matches!(scene.pop_matrix(), Err(SceneError::StackUnderflow)));
    }

    #[test]
    fn test_draw_line() {
        let mut scene = SceneState::new();
        assert!(!scene.draw_line([1.0, 1.0, 1.0], [1.5, 1.2, 1.9], Rgba::WHITE));
        assert!(scene.boxes().is_empty());

        assert!(scene.draw_line([0.0, 0.0, 0.0], [0.0, 0.0, 3.0], Rgba::BLACK));
        assert_eq!(scene.boxes().len(), 4);
        assert!(scene.boxes().iter().all(|b| b.color == Rgba::BLACK));
    }

    #[test]
    fn test_animation_slots_are_replaced() {
        let mut scene = SceneState::new();
        assert_eq!(scene.animation().scale, 1.0);
        assert_eq!(scene.animation().interval, 0.0);

        scene.animate(1.0, 2.0, 3.0, &AnimationOptions::default());
        let options = AnimationOptions {
            scale: 2.0,
            ..AnimationOptions::default()
        };
        scene.animate(4.0, 5.0, 6.0, &options);
        assert_eq!(scene.animation().position, [4.0, 5.0, 6.0]);
        assert_eq!(scene.animation().scale, 2.0);
        assert_eq!(scene.animation().interval, 10.0);

        scene.animate_global(0.0, 1.0, 0.0, &options);
        assert_eq!(scene.global_animation().position, [0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_frame_commands() {
        let mut scene = SceneState::new();
        scene.set_frame_fps(2);
        scene.set_frame_repeats(10);
        assert_eq!(scene.commands(), ["fps 2", "repeats 10"]);
    }

    #[test]
    fn test_unknown_model_is_rejected() {
        let mut scene = SceneState::new();
        assert!(!scene.create_model("Dragon", &ModelOptions::default()));
        assert!(scene.models().is_empty());

        let options = ModelOptions::at(1.234, 0.0, -2.5).scaled(0.555).named("car");
        assert!(scene.create_model("ToyCar", &options));
        let m = &scene.models()[0];
        assert_eq!(m.model, Model::ToyCar);
        assert_eq!(m.position, [1.23, 0.0, -2.5]);
        assert_eq!(m.scale, 0.56);
        assert_eq!(m.entity_name, "car");

        scene.move_model("car", &ModelOptions::at(3.0, 0.0, 0.0).rotated(0.0, 90.0, 0.0));
        assert_eq!(scene.model_moves()[0].rotation.yaw, 90.0);
    }

    #[test]
    fn test_lights_and_sentence() {
        let mut scene = SceneState::new();
        let options = LightOptions {
            light_type: LightType::from_name("spot"),
            ..LightOptions::default()
        };
        scene.set_light(1.0, 5.0, 1.0, &options);
        assert_eq!(scene.lights()[0].light_type, LightType::Spot);
        assert_eq!(scene.lights()[0].intensity, 1000.0);

        scene.write_sentence("hi", 0.0, 3.0, 0.0, Rgba::new(0.5, 1.0, 0.999, 1.0));
        let sentence = scene.sentence().unwrap();
        assert_eq!(sentence.color, Rgba::new(0.0, 1.0, 1.0, 1.0));
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut scene = SceneState::new();
        scene.set_command("float");
        scene.set_box_size(0.5);
        scene.change_shape(Shape::Sphere);
        scene.create_box(0.0, 0.0, 0.0, &red());
        scene.frame_in();
        scene.frame_out();
        scene.push_matrix();

        scene.clear();
        assert!(scene.boxes().is_empty());
        assert!(scene.commands().is_empty());
        assert_eq!(*scene.settings(), BuildSettings::default());
        assert_eq!(scene.depth(), 0);

        scene.frame_in();
        assert_eq!(scene.framing(), FramingState::Framing(0));
    }
}
