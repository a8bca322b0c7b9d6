use hifitime::Epoch;
use nom::{
    bytes::complete::take,
    character::complete::{char, digit1, space1},
    combinator::{all_consuming, map_res},
    IResult, Parser,
};

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

fn number<T: std::str::FromStr>(input: &str) -> IResult<&str, T> {
    map_res(digit1, |s: &str| s.parse::<T>()).parse(input)
}

fn month(input: &str) -> IResult<&str, u8> {
    map_res(take(3usize), |s: &str| {
        MONTHS
            .iter()
            .position(|m| *m == s)
            .map(|idx| idx as u8 + 1)
            .ok_or("unknown month")
    })
    .parse(input)
}

type CalendarFields = (i32, u8, u8, u8, u8);

fn calendar(input: &str) -> IResult<&str, CalendarFields> {
    let (input, (year, _, month, _, day, _, hour, _, minute)) = all_consuming((
        number::<i32>,
        char('-'),
        month,
        char('-'),
        number::<u8>,
        space1,
        number::<u8>,
        char(':'),
        number::<u8>,
    ))
    .parse(input)?;
    Ok((input, (year, month, day, hour, minute)))
}

/// Transformation from a Horizons calendar date `YYYY-Mon-DD HH:MM` (UTC) to an [`Epoch`]
///
/// Argument
/// --------
/// * `date_str`: a string like `"2020-Jan-01 00:00"`
///
/// Return
/// ------
/// * the corresponding UTC epoch, or a message describing why the date is invalid
pub fn horizons_date_to_epoch(date_str: &str) -> Result<Epoch, String> {
    let (_, (year, month, day, hour, minute)) = calendar(date_str.trim())
        .map_err(|_| "Invalid format, expected: YYYY-Mon-DD HH:MM".to_string())?;

    if hour > 23 || minute > 59 {
        return Err(format!("invalid time of day {hour:02}:{minute:02}"));
    }

    Epoch::maybe_from_gregorian_utc(year, month, day, hour, minute, 0, 0)
        .map_err(|e| format!("invalid calendar date: {e}"))
}
