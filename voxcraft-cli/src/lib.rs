/// Command line front end: build a scene from an import and write its snapshot
use anyhow::{bail, Context, Result};
use log::info;
use std::fs;
use std::path::PathBuf;
use voxcraft_core::heightmap::{self, DEFAULT_GRID};
use voxcraft_core::{
    ply, AnimationOptions, BoxOptions, BuildSettings, EulerAngles, LightOptions, LightType, ModelOptions, Rgba,
    SceneState, Snapshot,
};

pub mod report;

pub use report::print_summary;

pub const USAGE: &str = "Usage:
  voxcraft-cli ply <file.ply> [options]
  voxcraft-cli map <file.csv> <height-scale> [columns rows] [options]
  voxcraft-cli demo [options]

Options:
  --name <room>        name stored in the snapshot
  --settings <file>    JSON build settings (size, shape, roughness, ...)
  --out <file>         write the snapshot here instead of stdout";

/// Height-map colors: green lowlands, white peaks
const MAP_LOW: Rgba = Rgba::rgb(0.0, 0.5, 0.0);
const MAP_HIGH: Rgba = Rgba::WHITE;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Ply {
        path: PathBuf,
    },
    Map {
        path: PathBuf,
        height_scale: f64,
        columns: usize,
        rows: usize,
    },
    Demo,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CliOptions {
    pub command: Command,
    pub name: String,
    pub settings: Option<PathBuf>,
    pub out: Option<PathBuf>,
}

pub fn parse_args<I>(args: I) -> Result<CliOptions>
where
    I: IntoIterator<Item = String>,
{
    let mut positional = Vec::new();
    let mut name = String::new();
    let mut settings = None;
    let mut out = None;

    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--name" => name = args.next().context("--name needs a value")?,
            "--settings" => settings = Some(PathBuf::from(args.next().context("--settings needs a file")?)),
            "--out" => out = Some(PathBuf::from(args.next().context("--out needs a file")?)),
            flag if flag.starts_with("--") => bail!("unknown option {flag}"),
            _ => positional.push(arg),
        }
    }

    let command = match positional.as_slice() {
        [cmd, path] if cmd == "ply" => Command::Ply { path: path.into() },
        [cmd, path, scale, rest @ ..] if cmd == "map" => {
            let height_scale = scale.parse::<f64>().with_context(|| format!("invalid height scale '{scale}'"))?;
            let (columns, rows) = match rest {
                [] => (DEFAULT_GRID, DEFAULT_GRID),
                [columns, rows] => (
                    columns.parse::<usize>().with_context(|| format!("invalid column count '{columns}'"))?,
                    rows.parse::<usize>().with_context(|| format!("invalid row count '{rows}'"))?,
                ),
                _ => bail!("map takes either no grid size or both columns and rows"),
            };
            Command::Map {
                path: path.into(),
                height_scale,
                columns,
                rows,
            }
        }
        [cmd] if cmd == "demo" => Command::Demo,
        _ => bail!("{USAGE}"),
    };

    Ok(CliOptions {
        command,
        name,
        settings,
        out,
    })
}

/// Scene described by the command, configured from the settings file
pub fn build_scene(options: &CliOptions) -> Result<SceneState> {
    let settings = match &options.settings {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("failed to read settings {}", path.display()))?;
            BuildSettings::from_json(&json).with_context(|| format!("invalid settings in {}", path.display()))?
        }
        None => BuildSettings::default(),
    };
    let mut scene = SceneState::with_settings(settings);

    match &options.command {
        Command::Ply { path } => {
            let specs = ply::boxes_from_ply_file(path).with_context(|| format!("failed to parse {}", path.display()))?;
            for spec in &specs {
                scene.place(spec);
            }
        }
        Command::Map {
            path,
            height_scale,
            columns,
            rows,
        } => {
            let map = heightmap::height_map_from_file(path, *height_scale, *columns, *rows)
                .with_context(|| format!("failed to parse {}", path.display()))?;
            for spec in map.box_specs(MAP_HIGH, MAP_LOW) {
                scene.place(&spec);
            }
        }
        Command::Demo => build_demo(&mut scene)?,
    }

    info!("scene built: {} boxes, {} frames", scene.boxes().len(), scene.frames().len());
    Ok(scene)
}

/// A jointed arm over a grass floor, with a two-frame blinking lamp
fn build_demo(scene: &mut SceneState) -> Result<()> {
    let grass = BoxOptions::new().texture("grass");
    for x in -3..=3 {
        for z in -3..=3 {
            scene.create_box(x as f64, 0.0, z as f64, &grass);
        }
    }

    let segment = Rgba::rgb(0.8, 0.3, 0.1);
    scene.push_matrix();
    for _ in 0..3 {
        scene.push_matrix();
        scene.transform(0.0, 1.0, 0.0, EulerAngles::new(0.0, 0.0, 20.0));
        scene.draw_line([0.0, 0.0, 0.0], [0.0, 3.0, 0.0], segment);
        scene.transform(0.0, 3.0, 0.0, EulerAngles::new(0.0, 0.0, 20.0));
    }
    for _ in 0..3 {
        scene.pop_matrix()?;
    }
    scene.pop_matrix()?;

    let lamp = [Rgba::rgb(1.0, 1.0, 0.0), Rgba::rgb(0.2, 0.2, 0.0)];
    for color in lamp {
        scene.frame_in();
        scene.create_box(3.0, 1.0, 3.0, &BoxOptions::new().rgba(color));
        scene.frame_out();
    }
    scene.set_frame_fps(2);
    scene.set_frame_repeats(10);

    let light = LightOptions {
        light_type: LightType::Spot,
        ..LightOptions::default()
    };
    scene.set_light(0.0, 10.0, 0.0, &light);
    scene.create_model("Moon", &ModelOptions::at(0.0, 12.0, 0.0).scaled(0.5).named("moon"));
    scene.animate_global(0.0, 0.0, 0.0, &AnimationOptions {
        rotation: EulerAngles::new(0.0, 180.0, 0.0),
        ..AnimationOptions::default()
    });
    scene.write_sentence("voxcraft", 0.0, 8.0, 0.0, Rgba::WHITE);
    Ok(())
}

/// Build the scene, capture it and write the JSON snapshot
pub fn run(options: &CliOptions) -> Result<Snapshot> {
    let scene = build_scene(options)?;
    let snapshot = Snapshot::capture(&scene, &options.name);
    let json = snapshot.to_json_pretty()?;

    match &options.out {
        Some(path) => fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?,
        None => println!("{json}"),
    }
    Ok(snapshot)
}
