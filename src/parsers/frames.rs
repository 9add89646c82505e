//! Parsers for the frame indexed exports. Every line looks like `time;step;entry;entry;...`:
//!
//! - `.gra` entries are `name,x,y,gradient`
//! - `.nod` entries are `name,x,y,type`
//!
//! The declared step is read and validated but frames are numbered by their position in the
//! file, starting at 1.

use super::{
    finish,
    primitive::{entries, expect_count, fields, is_blank, is_comma, is_semicolon, number},
    Field, FieldError, ParseError, Result,
};
use crate::store::{Frame, Gradient, Node, Record, PERSON_TAG, REDUCTION_FACTOR};
use log::{debug, warn};
use nom::{
    bytes::complete::take_till,
    character::complete::char,
    combinator::{opt, rest},
    sequence::preceded,
    Err,
};
use std::result::Result as StdResult;

/// Reads the `time;step;` prefix of a line. The separator after the step is optional so a
/// line with no entries at all is still a valid frame.
pub fn header(input: &str) -> Result<(f64, f64)> {
    let (input, time) = take_till(is_semicolon)(input)?;
    let (input, _) = char::<_, FieldError>(';')(input)
        .map_err(|_| Err::Failure(FieldError::MissingField(Field::Step)))?;
    let (input, step) = take_till(is_semicolon)(input)?;
    let (input, _) = opt(char(';'))(input)?;

    Ok((input, (number(time, Field::Time)?, number(step, Field::Step)?)))
}

fn record_name(name: &str) -> StdResult<&str, Err<FieldError>> {
    let name = name.trim();
    if name.is_empty() {
        Err(Err::Failure(FieldError::MissingField(Field::Name)))
    } else {
        Ok(name)
    }
}

pub fn gradient_entry(entry: &str) -> Result<Option<(&str, Gradient)>> {
    let (input, values) = fields(entry)?;
    expect_count(entry, &values, 4)?;

    let name = record_name(values[0])?;
    let position = [
        number(values[1], Field::X)?,
        number(values[2], Field::Y)?,
        number(values[3], Field::Z)? / REDUCTION_FACTOR,
    ];

    Ok((input, Some((name, Gradient { position }))))
}

/// Everything after the third comma is the type tag. Entries that are not tagged as a person
/// are dropped before their coordinates are looked at.
pub fn node_entry(entry: &str) -> Result<Option<(&str, Node)>> {
    let (input, name) = take_till(is_comma)(entry)?;
    let (input, x) = opt(preceded(char(','), take_till(is_comma)))(input)?;
    let (input, y) = opt(preceded(char(','), take_till(is_comma)))(input)?;
    let (input, tag) = opt(preceded(char(','), rest))(input)?;

    let (x, y) = match (x, y) {
        (Some(x), Some(y)) => (x, y),
        (x, _) => {
            return Err(Err::Failure(FieldError::FieldCount {
                entry: entry.to_owned(),
                expected: 3,
                found: if x.is_some() { 2 } else { 1 },
            }))
        }
    };

    if tag.map(str::trim) != Some(PERSON_TAG) {
        return Ok((input, None));
    }

    let name = record_name(name)?;
    let position = [number(x, Field::X)?, number(y, Field::Y)?];

    Ok((input, Some((name, Node { position }))))
}

fn frame<R: Record>(index: u32, input: &str) -> Result<Frame<R>> {
    let (input, (time, declared_step)) = header(input)?;
    let (input, entries) = entries(input)?;

    let mut frame = Frame::new(index, time, declared_step);
    for entry in entries.into_iter().filter(|entry| !is_blank(entry)) {
        let (_, record) = R::parse_entry(entry)?;
        if let Some((name, record)) = record {
            if frame.insert(name.to_owned(), record).is_some() {
                warn!("frame {}: record {:?} appears twice, keeping the last one", index, name);
            }
        }
    }

    Ok((input, frame))
}

/// Parses a whole frame file. Blank lines are skipped and don't take a frame index.
pub fn parse_frames<R: Record>(content: &str) -> StdResult<Vec<Frame<R>>, ParseError> {
    let mut frames = Vec::new();

    for (line_index, line) in content.lines().enumerate() {
        if is_blank(line) {
            continue;
        }

        let index = frames.len() as u32 + 1;
        frames.push(finish(line_index + 1, frame::<R>(index, line))?);
    }

    debug!("parsed {} frames", frames.len());
    Ok(frames)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{GradientStore, NodeStore};

    #[test]
    fn gradient_line_example() {
        let store: GradientStore = "0.1;1;alice,1.0,2.0,8.0;bob,3.0,4.0,12.0;\n".parse().unwrap();

        assert_eq!(store.len(), 1);
        let frame = store.get(1).unwrap();
        assert_eq!(frame.len(), 2);
        assert_eq!(frame.get("alice").unwrap().position, [1.0, 2.0, 2.0]);
        assert_eq!(frame.get("bob").unwrap().position, [3.0, 4.0, 3.0]);
        assert_eq!(frame.time, 0.1);
        assert_eq!(frame.declared_step, 1.0);
    }

    #[test]
    fn declared_steps_are_ignored() {
        let store: GradientStore = "0;40;a,0,0,1\n0;7;a,0,0,1\n0;7;a,0,0,1\n".parse().unwrap();

        let indices: Vec<_> = store.iter().map(|frame| frame.index).collect();
        assert_eq!(indices, vec![1, 2, 3]);
        assert_eq!(store.get(1).unwrap().declared_step, 40.0);
    }

    #[test]
    fn gradient_value_is_reduced() {
        let store: GradientStore = "0;1;a,0,0,10;b,0,0,-3;c,0,0,0.5\n".parse().unwrap();
        let frame = store.get(1).unwrap();

        for (name, raw) in &[("a", 10.0), ("b", -3.0), ("c", 0.5)] {
            assert_eq!(frame.get(name).unwrap().position[2], raw / REDUCTION_FACTOR);
        }
    }

    #[test]
    fn only_persons_are_kept() {
        let store: NodeStore =
            "0;1;p1,1,2,person;car,3,4,vehicle;p2,5,6,person;untagged,7,8\n".parse().unwrap();
        let frame = store.get(1).unwrap();

        let names: Vec<_> = frame.names().collect();
        assert_eq!(names, vec!["p1", "p2"]);
        assert_eq!(frame.get("p2").unwrap().position, [5.0, 6.0]);
    }

    #[test]
    fn filtered_nodes_are_not_validated() {
        let store: NodeStore = "0;1;car,abc,def,vehicle\n".parse().unwrap();
        assert!(store.get(1).unwrap().is_empty());
    }

    #[test]
    fn node_tag_ignores_line_ending() {
        let store: NodeStore = "0;1;p,1,2,person\r\n0;2;p,1,2,person\n".parse().unwrap();
        assert!(store.get(1).unwrap().contains("p"));
        assert!(store.get(2).unwrap().contains("p"));
    }

    #[test]
    fn empty_entries_are_skipped() {
        let store: GradientStore = "0;1;a,0,0,4;;b,1,1,4; \n".parse().unwrap();
        assert_eq!(store.get(1).unwrap().len(), 2);
    }

    #[test]
    fn header_only_line_is_an_empty_frame() {
        let store: GradientStore = "0;1\n0;2;\n0;3;a,0,0,0\n".parse().unwrap();
        assert_eq!(store.len(), 3);
        assert!(store.get(1).unwrap().is_empty());
        assert!(store.get(2).unwrap().is_empty());
    }

    #[test]
    fn blank_lines_do_not_count() {
        let store: GradientStore = "0;1;a,0,0,0\n\n0;2;a,0,0,0\n\n".parse().unwrap();
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn bad_number_names_line_and_field() {
        let err = "0;1;a,0,0,0\n0;2;a,0,oops,0\n"
            .parse::<GradientStore>()
            .unwrap_err();

        match err {
            ParseError::InvalidNumber { line, field, value } => {
                assert_eq!(line, 2);
                assert_eq!(field, Field::Y);
                assert_eq!(value, "oops");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn bad_time_is_reported() {
        let err = "now;1;a,0,0,0\n".parse::<GradientStore>().unwrap_err();
        assert!(matches!(
            err,
            ParseError::InvalidNumber {
                line: 1,
                field: Field::Time,
                ..
            }
        ));
    }

    #[test]
    fn missing_step_is_reported() {
        let err = "0.5\n".parse::<NodeStore>().unwrap_err();
        assert!(matches!(
            err,
            ParseError::MissingField {
                line: 1,
                field: Field::Step
            }
        ));
    }

    #[test]
    fn gradient_needs_four_fields() {
        let err = "0;1;a,0,0\n".parse::<GradientStore>().unwrap_err();
        match err {
            ParseError::FieldCount {
                line,
                expected,
                found,
                ..
            } => {
                assert_eq!((line, expected, found), (1, 4, 3));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn node_needs_coordinates() {
        let err = "0;1;lonely\n".parse::<NodeStore>().unwrap_err();
        assert!(matches!(
            err,
            ParseError::FieldCount {
                expected: 3,
                found: 1,
                ..
            }
        ));
    }

    #[test]
    fn unnamed_record_is_rejected() {
        let err = "0;1;,1,2,3\n".parse::<GradientStore>().unwrap_err();
        assert!(matches!(
            err,
            ParseError::MissingField {
                field: Field::Name,
                ..
            }
        ));
    }

    #[test]
    fn duplicate_name_keeps_last() {
        let store: GradientStore = "0;1;a,0,0,4;a,1,1,8\n".parse().unwrap();
        let frame = store.get(1).unwrap();
        assert_eq!(frame.len(), 1);
        assert_eq!(frame.get("a").unwrap().position, [1.0, 1.0, 2.0]);
    }
}
