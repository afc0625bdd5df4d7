/// CSV height-map import.
///
/// Values are read row by row into one flat list, scaled into integer heights
/// and cut into a `rows x columns` grid. A raw value of 0 marks an empty cell
/// and becomes [`EMPTY_CELL`].

use log::info;
use nom::{
    character::complete::{char, space0},
    combinator::eof,
    multi::separated_list1,
    number::complete::double,
    sequence::{delimited, preceded},
    IResult,
};

use std::fs;
use std::path::Path;

use crate::error::ImportError;
use crate::geometry::{BoxSpec, Rgba};

pub const EMPTY_CELL: i64 = -1;

/// Grid size used by the 257x257 terrain exports
pub const DEFAULT_GRID: usize = 257;

#[derive(Debug, Clone, PartialEq)]
pub struct HeightMap {
    /// `heights[row][column]`
    pub heights: Vec<Vec<i64>>,
    pub max_height: i64,
}

pub fn parse_height_map(
    input: &str,
    height_scale: f64,
    columns: usize,
    rows: usize,
) -> Result<HeightMap, ImportError> {
    let mut values = Vec::new();
    for (i, line) in input.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let (_, row) = csv_row(line).map_err(|e| ImportError::InvalidRow {
            line: i + 1,
            reason: format!("{:?}", e),
        })?;
        if let Some(v) = row.iter().find(|v| !v.is_finite()) {
            return Err(ImportError::InvalidRow {
                line: i + 1,
                reason: format!("{v} is not a height"),
            });
        }
        values.extend(row.into_iter().map(|h| {
            if h != 0.0 {
                (h * height_scale).floor() as i64
            } else {
                EMPTY_CELL
            }
        }));
    }

    let expected = match columns.checked_mul(rows) {
        Some(n) if n > 0 && values.len() >= n => n,
        n => {
            return Err(ImportError::GridSize {
                expected: n.unwrap_or(usize::MAX),
                found: values.len(),
            })
        }
    };

    let heights: Vec<Vec<i64>> = values[..expected]
        .chunks(columns)
        .map(|row| row.to_vec())
        .collect();
    let max_height = values.iter().copied().max().unwrap_or(EMPTY_CELL);

    info!("height map: {columns}x{rows} cells, max height {max_height}");
    Ok(HeightMap { heights, max_height })
}

pub fn height_map_from_file(
    path: impl AsRef<Path>,
    height_scale: f64,
    columns: usize,
    rows: usize,
) -> Result<HeightMap, ImportError> {
    let text = fs::read_to_string(path)?;
    parse_height_map(&text, height_scale, columns, rows)
}

fn csv_row(input: &str) -> IResult<&str, Vec<f64>> {
    let (input, values) = preceded(
        space0,
        separated_list1(delimited(space0, char(','), space0), double),
    )(input)?;
    let (input, _) = space0(input)?;
    let (input, _) = eof(input)?;
    Ok((input, values))
}

impl HeightMap {
    /// One box per non-empty cell at `(column, height, row)`, shaded from
    /// `low` at height 0 to `high` at the maximum height
    pub fn box_specs(&self, high: Rgba, low: Rgba) -> Vec<BoxSpec> {
        let mut specs = Vec::new();
        for (row, cells) in self.heights.iter().enumerate() {
            for (column, &height) in cells.iter().enumerate() {
                if height < 0 {
                    continue;
                }
                let color = height_color(height, self.max_height, high, low);
                specs.push(BoxSpec::new(column as f64, height as f64, row as f64, color));
            }
        }
        specs
    }
}

/// Linear blend between `low` and `high` by `height / max_height`
pub fn height_color(height: i64, max_height: i64, high: Rgba, low: Rgba) -> Rgba {
    if max_height <= 0 {
        return low;
    }
    let t = height as f64 / max_height as f64;
    let lerp = |h: f64, l: f64| (h - l) * t + l;
    Rgba::new(lerp(high.r, low.r), lerp(high.g, low.g), lerp(high.b, low.b), low.a)
}
