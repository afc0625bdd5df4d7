/// ASCII PLY import: every quad face of a voxel mesh becomes one box spec.

use log::info;
use nom::{
    bytes::complete::{tag, take_till1},
    character::complete::{digit1, space0, space1},
    combinator::{eof, map_res},
    multi::separated_list1,
    number::complete::double,
    sequence::preceded,
    IResult,
};

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::error::ImportError;
use crate::geometry::{BoxSpec, Rgba};

/// x, y, z, red, green, blue
type PlyVertex = [f64; 6];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PlyHeader {
    vertex_count: usize,
}

/// Parse an ASCII PLY file into unique box specs, in face order.
///
/// The header must declare a vertex element with exactly six properties
/// (position and 0-255 color). Each run of four vertices is one quad face;
/// face lists after the vertices are not read.
pub fn boxes_from_ply(input: &str) -> Result<Vec<BoxSpec>, ImportError> {
    let mut lines = input.lines().enumerate().map(|(i, line)| (i + 1, line.trim()));
    let header = parse_header(&mut lines)?;

    let mut vertices: Vec<PlyVertex> = Vec::with_capacity(header.vertex_count);
    for (line_no, line) in lines.filter(|(_, line)| !line.is_empty()) {
        if vertices.len() == header.vertex_count {
            break;
        }
        let values = match number_row(line) {
            Ok((_, values)) => values,
            Err(e) => {
                return Err(ImportError::InvalidRow {
                    line: line_no,
                    reason: format!("{:?}", e),
                })
            }
        };
        if let Some(v) = values.iter().find(|v| !v.is_finite()) {
            return Err(ImportError::InvalidRow {
                line: line_no,
                reason: format!("{v} is not a coordinate or color"),
            });
        }
        let vertex: PlyVertex = values.try_into().map_err(|v: Vec<f64>| ImportError::InvalidRow {
            line: line_no,
            reason: format!("expected 6 values, found {}", v.len()),
        })?;
        vertices.push(vertex);
    }

    if vertices.len() != header.vertex_count {
        return Err(ImportError::VertexCount {
            expected: header.vertex_count,
            found: vertices.len(),
        });
    }

    let mut seen = HashSet::new();
    let mut boxes: Vec<BoxSpec> = Vec::new();
    for (face, quad) in vertices.chunks_exact(4).enumerate() {
        let spec = face_box(face, quad)?;
        if seen.insert(spec_key(&spec)) {
            boxes.push(spec);
        }
    }

    info!("ply: {} faces -> {} boxes", vertices.len() / 4, boxes.len());
    Ok(boxes)
}

/// Read and parse a PLY file
pub fn boxes_from_ply_file(path: impl AsRef<Path>) -> Result<Vec<BoxSpec>, ImportError> {
    let text = fs::read_to_string(path)?;
    boxes_from_ply(&text)
}

/// Bit patterns of position and color, for exact-duplicate detection
fn spec_key(spec: &BoxSpec) -> [u64; 7] {
    let [x, y, z] = spec.position;
    let c = spec.color;
    [x, y, z, c.r, c.g, c.b, c.a].map(f64::to_bits)
}

fn parse_header<'a>(lines: &mut impl Iterator<Item = (usize, &'a str)>) -> Result<PlyHeader, ImportError> {
    match lines.next() {
        Some((_, "ply")) => {}
        _ => return Err(ImportError::MissingHeader),
    }

    let mut current_element = "";
    let mut vertex_count = None;
    let mut vertex_properties = 0;

    for (line_no, line) in lines.by_ref() {
        let invalid = |reason: String| ImportError::InvalidHeader { line: line_no, reason };

        if line == "end_header" {
            let vertex_count = vertex_count.ok_or_else(|| invalid("no vertex element".to_string()))?;
            if vertex_properties != 6 {
                return Err(invalid(format!("vertex has {vertex_properties} properties, expected 6")));
            }
            if vertex_count % 4 != 0 {
                return Err(invalid(format!("{vertex_count} vertices do not form quads")));
            }
            return Ok(PlyHeader { vertex_count });
        } else if line.starts_with("format") {
            if !line.contains("ascii") {
                return Err(invalid("only ASCII PLY is supported".to_string()));
            }
        } else if line.starts_with("element") {
            let (_, (name, count)) = element_decl(line).map_err(|e| invalid(format!("{:?}", e)))?;
            current_element = name;
            if name == "vertex" {
                vertex_count = Some(count);
            }
        } else if line.starts_with("property") && current_element == "vertex" {
            vertex_properties += 1;
        }
    }

    Err(ImportError::MissingHeader)
}

fn element_decl(input: &str) -> IResult<&str, (&str, usize)> {
    let (input, _) = tag("element")(input)?;
    let (input, name) = preceded(space1, take_till1(|c: char| c.is_whitespace()))(input)?;
    let (input, count) = preceded(space1, map_res(digit1, str::parse::<usize>))(input)?;
    let (input, _) = space0(input)?;
    let (input, _) = eof(input)?;
    Ok((input, (name, count)))
}

fn number_row(input: &str) -> IResult<&str, Vec<f64>> {
    let (input, _) = space0(input)?;
    let (input, values) = separated_list1(space1, double)(input)?;
    let (input, _) = space0(input)?;
    let (input, _) = eof(input)?;
    Ok((input, values))
}

/// Box for one quad, from its first three vertices.
///
/// The shared coordinate tells which plane the face lies in; the box is
/// pushed back one step along the face normal when the face winds that way,
/// then snapped to a tenth of the step.
fn face_box(face: usize, quad: &[PlyVertex]) -> Result<BoxSpec, ImportError> {
    let (v1, v2, v3) = (quad[0], quad[1], quad[2]);
    let min = |i: usize| v1[i].min(v2[i]).min(v3[i]);
    let max = |i: usize| v1[i].max(v2[i]).max(v3[i]);

    let (mut x, mut y, mut z) = (min(0), min(1), min(2));
    let step;
    if v1[0] == v2[0] && v2[0] == v3[0] {
        // y-z plane
        step = max(1) - y;
        if v1[1] != v2[1] {
            x -= step;
        }
    } else if v1[1] == v2[1] && v2[1] == v3[1] {
        // z-x plane
        step = max(2) - z;
        if v1[2] != v2[2] {
            y -= step;
        }
    } else {
        // x-y plane
        step = max(0) - x;
        if v1[0] != v2[0] {
            z -= step;
        }
    }

    if step == 0.0 {
        return Err(ImportError::DegenerateFace { face });
    }

    let snap = |c: f64| (c * 10.0 / step).round() / 10.0;
    let color = Rgba::rgb(v1[3] / 255.0, v1[4] / 255.0, v1[5] / 255.0);
    Ok(BoxSpec::new(snap(x), snap(z), -snap(y), color))
}
