/// Export of a [`SceneState`] as the message the renderer consumes.
///
/// Rows are plain JSON arrays, in the column order the renderer expects.

use chrono::{DateTime, FixedOffset, Local, SecondsFormat};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::palette::Shape;
use crate::scene::{AnimationDescriptor, SceneState};

/// `[x, y, z, r, g, b, alpha, textureId]`
pub type BoxRow = (f64, f64, f64, f64, f64, f64, f64, i32);
/// `[x, y, z, r, g, b, alpha, textureId, frameId]`
pub type FrameRow = (f64, f64, f64, f64, f64, f64, f64, i32, u32);
/// `[x, y, z, pitch, yaw, roll, frameId]`
pub type FrameTransformRow = (f64, f64, f64, f64, f64, f64, u32);
/// `[x, y, z, r, g, b, alpha, intensity, interval, lightType]`
pub type LightRow = (f64, f64, f64, f64, f64, f64, f64, f64, f64, u8);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub node_transform: [f64; 6],
    pub frame_transforms: Vec<FrameTransformRow>,
    pub global_animation: [f64; 8],
    pub animation: [f64; 8],
    pub boxes: Vec<BoxRow>,
    pub frames: Vec<FrameRow>,
    pub sentence: Vec<String>,
    pub lights: Vec<LightRow>,
    pub commands: Vec<String>,
    pub models: Vec<Vec<String>>,
    pub model_moves: Vec<Vec<String>>,
    pub size: f64,
    pub shape: Shape,
    pub interval: f64,
    pub is_metallic: u8,
    pub roughness: f64,
    pub is_allowed_float: u8,
    pub name: String,
    pub date: String,
}

impl Snapshot {
    /// Capture the scene, stamped with the current local time
    pub fn capture(scene: &SceneState, name: &str) -> Self {
        let now: DateTime<FixedOffset> = Local::now().into();
        Self::capture_at(scene, name, now)
    }

    pub fn capture_at(scene: &SceneState, name: &str, date: DateTime<FixedOffset>) -> Self {
        let node = scene.node_transform();
        let settings = scene.settings();

        let snapshot = Self {
            node_transform: [
                node.position[0],
                node.position[1],
                node.position[2],
                node.rotation.pitch,
                node.rotation.yaw,
                node.rotation.roll,
            ],
            frame_transforms: scene
                .frame_transforms()
                .iter()
                .map(|t| {
                    let [x, y, z] = t.position;
                    (x, y, z, t.rotation.pitch, t.rotation.yaw, t.rotation.roll, t.frame_id)
                })
                .collect(),
            global_animation: animation_row(scene.global_animation()),
            animation: animation_row(scene.animation()),
            boxes: scene
                .boxes()
                .iter()
                .map(|b| {
                    let [x, y, z] = b.position;
                    let c = b.color;
                    (x, y, z, c.r, c.g, c.b, c.a, b.texture_id)
                })
                .collect(),
            frames: scene
                .frames()
                .iter()
                .map(|f| {
                    let [x, y, z] = f.voxel.position;
                    let c = f.voxel.color;
                    (x, y, z, c.r, c.g, c.b, c.a, f.voxel.texture_id, f.frame_id)
                })
                .collect(),
            sentence: scene
                .sentence()
                .map(|s| {
                    let mut row = vec![s.text.clone()];
                    row.extend(s.position.iter().map(|v| number(*v)));
                    row.extend(s.color.to_array().iter().map(|v| number(*v)));
                    row
                })
                .unwrap_or_default(),
            lights: scene
                .lights()
                .iter()
                .map(|l| {
                    let [x, y, z] = l.position;
                    let c = l.color;
                    (x, y, z, c.r, c.g, c.b, c.a, l.intensity, l.interval, l.light_type.code())
                })
                .collect(),
            commands: scene.commands().to_vec(),
            models: scene
                .models()
                .iter()
                .map(|m| {
                    let mut row = vec![m.model.name().to_string()];
                    row.extend(pose_strings(m.position, m.rotation.pitch, m.rotation.yaw, m.rotation.roll, m.scale));
                    row.push(m.entity_name.clone());
                    row
                })
                .collect(),
            model_moves: scene
                .model_moves()
                .iter()
                .map(|m| {
                    let mut row = vec![m.entity_name.clone()];
                    row.extend(pose_strings(m.position, m.rotation.pitch, m.rotation.yaw, m.rotation.roll, m.scale));
                    row
                })
                .collect(),
            size: settings.size,
            shape: settings.shape,
            interval: settings.interval,
            is_metallic: u8::from(settings.is_metallic),
            roughness: settings.roughness,
            is_allowed_float: u8::from(settings.allow_float),
            name: name.to_string(),
            date: date.to_rfc3339_opts(SecondsFormat::Secs, false),
        };

        debug!(
            "snapshot '{}': {} boxes, {} frames, {} lights, {} models",
            snapshot.name,
            snapshot.boxes.len(),
            snapshot.frames.len(),
            snapshot.lights.len(),
            snapshot.models.len()
        );
        snapshot
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn animation_row(a: &AnimationDescriptor) -> [f64; 8] {
    let [x, y, z] = a.position;
    [x, y, z, a.rotation.pitch, a.rotation.yaw, a.rotation.roll, a.scale, a.interval]
}

fn pose_strings(position: [f64; 3], pitch: f64, yaw: f64, roll: f64, scale: f64) -> Vec<String> {
    let [x, y, z] = position;
    [x, y, z, pitch, yaw, roll, scale].iter().map(|v| number(*v)).collect()
}

/// Shortest decimal form: integral values print without a fraction
fn number(value: f64) -> String {
    format!("{value}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rgba;
    use crate::options::{BoxOptions, ModelOptions};
    use crate::transform::EulerAngles;
    use chrono::TimeZone;

    fn fixed_date() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(9 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 5, 1, 12, 0, 0)
            .unwrap()
    }

    fn sample_scene() -> SceneState {
        let mut scene = SceneState::new();
        scene.transform(0.0, 0.0, 0.0, EulerAngles::new(0.0, 30.0, 0.0));
        scene.create_box(0.0, 0.0, 0.0, &BoxOptions::new().color(1.0, 0.0, 0.0).texture("grass"));
        scene.frame_in();
        scene.create_box(1.0, 1.0, 1.0, &BoxOptions::new());
        scene.frame_out();
        scene.write_sentence("Hello", 0.0, 10.0, 0.0, Rgba::WHITE);
        scene.create_model("Earth", &ModelOptions::at(0.0, 5.5, 0.0).named("earth"));
        scene
    }

    #[test]
    fn test_rows_follow_wire_layout() {
        let snapshot = Snapshot::capture_at(&sample_scene(), "room", fixed_date());

        assert_eq!(snapshot.node_transform, [0.0, 0.0, 0.0, 0.0, 30.0, 0.0]);
        assert_eq!(snapshot.boxes, vec![(0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0)]);
        assert_eq!(snapshot.frames, vec![(1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, -1, 0)]);
        assert_eq!(snapshot.sentence, vec!["Hello", "0", "10", "0", "1", "1", "1", "1"]);
        assert_eq!(snapshot.models, vec![vec!["Earth", "0", "5.5", "0", "0", "0", "0", "1", "earth"]]);
        assert_eq!(snapshot.global_animation, [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0]);
        assert_eq!(snapshot.date, "2024-05-01T12:00:00+09:00");
    }

    #[test]
    fn test_capture_is_idempotent_and_non_mutating() {
        let scene = sample_scene();
        let first = Snapshot::capture(&scene, "room");
        let second = Snapshot::capture(&scene, "room");
        assert_eq!(
            Snapshot { date: String::new(), ..first },
            Snapshot { date: String::new(), ..second }
        );
        assert_eq!(scene.boxes().len(), 1);
    }

    #[test]
    fn test_json_uses_camel_case_keys() {
        let json = Snapshot::capture_at(&SceneState::new(), "empty", fixed_date())
            .to_json()
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        for key in [
            "nodeTransform",
            "frameTransforms",
            "globalAnimation",
            "animation",
            "boxes",
            "frames",
            "sentence",
            "lights",
            "commands",
            "models",
            "modelMoves",
            "size",
            "shape",
            "interval",
            "isMetallic",
            "roughness",
            "isAllowedFloat",
            "name",
            "date",
        ] {
            assert!(value.get(key).is_some(), "missing key {key}");
        }
        assert_eq!(value["shape"], "box");
        assert_eq!(value["isAllowedFloat"], 0);
        assert_eq!(value["roughness"], 0.5);
    }

    #[test]
    fn test_date_has_whole_seconds() {
        let date = fixed_date() + chrono::Duration::nanoseconds(25_823_574);
        let snapshot = Snapshot::capture_at(&SceneState::new(), "room", date);
        assert_eq!(snapshot.date, "2024-05-01T12:00:00+09:00");
    }
}
