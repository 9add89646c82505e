use super::{Field, FieldError, Result};
use nom::{
    bytes::complete::take_till, character::complete::char, multi::many0, sequence::preceded, Err,
};

pub(crate) fn is_semicolon(c: char) -> bool {
    c == ';'
}

pub(crate) fn is_comma(c: char) -> bool {
    c == ','
}

/// Splits a line on `;`. Every piece is returned, empty ones included.
pub fn entries(input: &str) -> Result<Vec<&str>> {
    let (input, first) = take_till(is_semicolon)(input)?;
    let (input, mut others) = many0(preceded(char(';'), take_till(is_semicolon)))(input)?;

    others.insert(0, first);
    Ok((input, others))
}

/// Splits an entry on `,`.
pub fn fields(input: &str) -> Result<Vec<&str>> {
    let (input, first) = take_till(is_comma)(input)?;
    let (input, mut others) = many0(preceded(char(','), take_till(is_comma)))(input)?;

    others.insert(0, first);
    Ok((input, others))
}

/// An entry made only of whitespace comes from a trailing or doubled delimiter.
pub fn is_blank(entry: &str) -> bool {
    entry.trim().is_empty()
}

/// Reads `value` as a float. Surrounding whitespace is ignored.
pub fn number(value: &str, field: Field) -> std::result::Result<f64, Err<FieldError>> {
    value.trim().parse::<f64>().map_err(|_| {
        Err::Failure(FieldError::InvalidNumber {
            field,
            value: value.to_owned(),
        })
    })
}

/// Fails with `FieldCount` unless `fields` has exactly `expected` elements.
pub fn expect_count(
    entry: &str,
    fields: &[&str],
    expected: usize,
) -> std::result::Result<(), Err<FieldError>> {
    if fields.len() == expected {
        Ok(())
    } else {
        Err(Err::Failure(FieldError::FieldCount {
            entry: entry.to_owned(),
            expected,
            found: fields.len(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_keep_empty_pieces() {
        let (rest, pieces) = entries("a;b;;c;").unwrap();
        assert_eq!(rest, "");
        assert_eq!(pieces, vec!["a", "b", "", "c", ""]);
    }

    #[test]
    fn fields_of_single_value() {
        let (_, pieces) = fields("alone").unwrap();
        assert_eq!(pieces, vec!["alone"]);
    }

    #[test]
    fn number_accepts_padding() {
        assert_eq!(number(" 2.5 ", Field::X).unwrap(), 2.5);
    }

    #[test]
    fn number_names_the_field() {
        match number("abc", Field::Y) {
            Err(Err::Failure(FieldError::InvalidNumber { field, value })) => {
                assert_eq!(field, Field::Y);
                assert_eq!(value, "abc");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
