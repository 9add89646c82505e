//! `.wal` files have no time or step prefix. Every line holds `x1,y1,x2,y2` entries separated
//! by `;` and all of them together form a single list of walls.

use super::{
    finish,
    primitive::{entries, expect_count, fields, is_blank, number},
    Field, ParseError, Result,
};
use crate::store::Wall;
use log::debug;
use std::result::Result as StdResult;

pub fn wall_entry(entry: &str) -> Result<Wall> {
    let (input, values) = fields(entry)?;
    expect_count(entry, &values, 4)?;

    let start = [number(values[0], Field::X1)?, number(values[1], Field::Y1)?];
    let end = [number(values[2], Field::X2)?, number(values[3], Field::Y2)?];

    Ok((input, Wall::new(start, end)))
}

fn wall_line(input: &str) -> Result<Vec<Wall>> {
    let (input, entries) = entries(input)?;

    let mut walls = Vec::with_capacity(entries.len());
    for entry in entries.into_iter().filter(|entry| !is_blank(entry)) {
        let (_, wall) = wall_entry(entry)?;
        walls.push(wall);
    }

    Ok((input, walls))
}

pub fn parse_walls(content: &str) -> StdResult<Vec<Wall>, ParseError> {
    let mut walls = Vec::new();
    for (line_index, line) in content.lines().enumerate() {
        walls.extend(finish(line_index + 1, wall_line(line))?);
    }

    debug!("parsed {} walls", walls.len());
    Ok(walls)
}
