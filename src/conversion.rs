use itertools::Itertools;
use nom::{
    character::complete::{char, digit0, digit1, one_of},
    combinator::{all_consuming, map_res, opt},
    multi::separated_list1,
    sequence::preceded,
    IResult, Parser,
};

use crate::{angle::Angle, constants::ANGLE_FUDGE};

/// Normalize a fixed-column sexagesimal field: trim it and collapse every run of internal
/// whitespace into a single `:` separator.
///
/// Arguments
/// ---------
/// * `field`: the raw column slice, e.g. `" -05 12  30.0 "`
///
/// Return
/// ------
/// * the colon-separated form, e.g. `"-05:12:30.0"`
pub(crate) fn cleanup(field: &str) -> String {
    field.split_whitespace().join(":")
}

fn unsigned_decimal(input: &str) -> IResult<&str, f64> {
    map_res(
        (digit1, opt(preceded(char('.'), digit0))),
        |(units, fraction): (&str, Option<&str>)| {
            format!("{units}.{}", fraction.unwrap_or_default()).parse::<f64>()
        },
    )
    .parse(input)
}

fn sexagesimal_parts(input: &str) -> IResult<&str, (Option<char>, Vec<f64>)> {
    all_consuming((opt(one_of("+-")), separated_list1(char(':'), unsigned_decimal))).parse(input)
}

/// Parse a colon-separated sexagesimal value (`[+-]U[:MM[:SS.ss]]`) into a signed number of
/// units.
///
/// Minutes and seconds must lie in `[0, 60)` and at most three components are accepted.
///
/// Arguments
/// ---------
/// * `value`: a string like `"23:59:58.00"` or `"-05:12:30.0"`
///
/// Return
/// ------
/// * `Option<f64>`: the value in units (hours or degrees, depending on the caller), or `None`
///   if the input is malformed
pub(crate) fn parse_sexagesimal(value: &str) -> Option<f64> {
    let (_, (sign, parts)) = sexagesimal_parts(value).ok()?;
    if parts.len() > 3 || parts[1..].iter().any(|p| *p >= 60.0) {
        return None;
    }

    let mut units = parts[0];
    if let Some(m) = parts.get(1) {
        units += m / 60.0;
    }
    if let Some(s) = parts.get(2) {
        units += s / 3600.0;
    }

    Some(if sign == Some('-') { -units } else { units })
}

/// Parse a right ascension field (`HH MM SS.ss`, any internal spacing) into an [`Angle`].
///
/// The value must lie in `[0h, 24h)`.
///
/// Return
/// ------
/// * `Option<Angle>`: the right ascension, or `None` if the field is malformed or out of range
pub fn parse_ra(field: &str) -> Option<Angle> {
    let hours = parse_sexagesimal(&cleanup(field))?;
    (0.0..24.0)
        .contains(&hours)
        .then(|| Angle::from_hours(hours))
}

/// Parse a declination field (`±DD MM SS.s`, any internal spacing) into an [`Angle`].
///
/// The value must lie in `[-90°, +90°]`.
///
/// Return
/// ------
/// * `Option<Angle>`: the declination, or `None` if the field is malformed or out of range
pub fn parse_dec(field: &str) -> Option<Angle> {
    let degrees = parse_sexagesimal(&cleanup(field))?;
    (-90.0..=90.0)
        .contains(&degrees)
        .then(|| Angle::from_degrees(degrees))
}

/// Default angular fudge factor, [`ANGLE_FUDGE`] read as degrees, shared by right ascension
/// and declination.
pub(crate) fn default_angle_fudge() -> Angle {
    Angle::from_degrees(parse_sexagesimal(ANGLE_FUDGE).unwrap_or_default())
}
