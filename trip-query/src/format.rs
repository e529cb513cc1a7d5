//! Plain-text rendering of trips.
//!
//! Two styles: `terse` prints one line per trip, `full` prints every part
//! with times, platforms, delays and intermediate stops.

use std::fmt;
use std::str::FromStr;

use crate::domain::{DISPLAY_FORMAT, Stop, Trip, TripPart};

/// Marker printed for canceled trips.
pub const CANCELED_MARKER: &str = "[CANCELED]";

/// Indentation of part headers in full output.
const PART_INDENT: &str = "   ";

/// Indentation of part fields in full output.
const FIELD_INDENT: &str = "       ";

/// Rendering style.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// One line per trip
    #[default]
    Terse,
    /// Every part of every trip
    Full,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Terse => write!(f, "terse"),
            OutputFormat::Full => write!(f, "full"),
        }
    }
}

/// Error for an unknown format name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown output format '{0}' (expected 'terse' or 'full')")]
pub struct UnknownFormat(String);

impl FromStr for OutputFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "terse" => Ok(OutputFormat::Terse),
            "full" => Ok(OutputFormat::Full),
            _ => Err(UnknownFormat(s.to_string())),
        }
    }
}

/// Render trips in the given style.
///
/// Trips are numbered from 1 in the order given. The output is a pure
/// function of its inputs.
pub fn render(trips: &[Trip], format: OutputFormat) -> String {
    let mut lines = Vec::new();

    for (index, trip) in trips.iter().enumerate() {
        match format {
            OutputFormat::Terse => lines.push(terse_line(index + 1, trip)),
            OutputFormat::Full => full_block(index + 1, trip, &mut lines),
        }
    }

    let mut out = lines.join("\n");
    if !out.is_empty() {
        out.push('\n');
    }
    out
}

/// `#1 Berlin Hbf 2024-03-01 08:30 (+2 min) -> Hamburg Hbf 2024-03-01 10:15, switches: 1`
fn terse_line(number: usize, trip: &Trip) -> String {
    let mut line = format!("#{number}");
    if trip.is_canceled() {
        line.push(' ');
        line.push_str(CANCELED_MARKER);
    }

    line.push_str(&format!(
        " {} {}",
        trip.start().name(),
        trip.departure().format(DISPLAY_FORMAT)
    ));
    if let Some(delay) = trip.departure_delay() {
        line.push_str(&format!(" ({})", format_delay(delay)));
    }

    line.push_str(&format!(
        " -> {} {}",
        trip.end().name(),
        trip.arrival().format(DISPLAY_FORMAT)
    ));
    if let Some(delay) = trip.arrival_delay() {
        line.push_str(&format!(" ({})", format_delay(delay)));
    }

    line.push_str(&format!(", switches: {}", trip.switches()));
    line
}

fn full_block(number: usize, trip: &Trip, lines: &mut Vec<String>) {
    if trip.is_canceled() {
        lines.push(format!("Trip #{number} {CANCELED_MARKER}"));
    } else {
        lines.push(format!("Trip #{number}"));
    }

    for (index, part) in trip.parts().iter().enumerate() {
        lines.push(format!("{PART_INDENT}Part #{}", index + 1));
        part_fields(part, lines);
    }

    lines.push(String::new());
}

fn part_fields(part: &TripPart, lines: &mut Vec<String>) {
    let start = part.start();
    let end = part.end();

    field(lines, "Start:", start.name());
    field(
        lines,
        "Departure:",
        &part.departure().format(DISPLAY_FORMAT).to_string(),
    );
    if let Some(platform) = &start.departure_platform {
        field(lines, "Platform:", platform);
    }
    if let Some(delay) = start.departure_delay() {
        field(lines, "Delay:", &format_delay(delay));
    }

    field(lines, "End:", end.name());
    field(
        lines,
        "Arrival:",
        &part.arrival().format(DISPLAY_FORMAT).to_string(),
    );
    if let Some(platform) = &end.arrival_platform {
        field(lines, "Platform:", platform);
    }
    field(lines, "Line:", part.line());
    if let Some(delay) = end.arrival_delay() {
        field(lines, "Delay:", &format_delay(delay));
    }

    lines.push(stops_line(part.stops()));
}

fn field(lines: &mut Vec<String>, label: &str, value: &str) {
    lines.push(format!("{FIELD_INDENT}{label:<11}{value}"));
}

fn stops_line(stops: &[Stop]) -> String {
    if stops.is_empty() {
        return format!("{FIELD_INDENT}Stops:     0");
    }

    let names: Vec<&str> = stops.iter().map(Stop::name).collect();
    format!("{FIELD_INDENT}{} Stops:   {}", stops.len(), names.join(", "))
}

/// `+5 min`, `-1 min`, `+0 min`.
fn format_delay(minutes: i64) -> String {
    format!("{minutes:+} min")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Location, TripStatus, parse_datetime};

    fn stop(name: &str) -> Stop {
        Stop::new(Location::new(name))
    }

    fn time(s: &str) -> chrono::NaiveDateTime {
        parse_datetime(s).unwrap()
    }

    /// Berlin Hbf -> Hannover Hbf -> Hamburg Hbf, delayed out of Berlin.
    fn two_leg_trip(status: TripStatus) -> Trip {
        let mut berlin = stop("Berlin Hbf");
        berlin.booked_departure = Some(time("2024-03-01T08:30"));
        berlin.realtime_departure = Some(time("2024-03-01T08:32"));
        berlin.departure_platform = Some("13".to_string());

        let mut spandau = stop("Berlin-Spandau");
        spandau.booked_arrival = Some(time("2024-03-01T08:41"));

        let mut wolfsburg = stop("Wolfsburg Hbf");
        wolfsburg.booked_arrival = Some(time("2024-03-01T09:25"));

        let mut hannover_arr = stop("Hannover Hbf");
        hannover_arr.booked_arrival = Some(time("2024-03-01T10:05"));
        hannover_arr.arrival_platform = Some("4".to_string());

        let mut hannover_dep = stop("Hannover Hbf");
        hannover_dep.booked_departure = Some(time("2024-03-01T10:20"));

        let mut hamburg = stop("Hamburg Hbf");
        hamburg.booked_arrival = Some(time("2024-03-01T11:40"));
        hamburg.realtime_arrival = Some(time("2024-03-01T11:39"));

        let first =
            TripPart::new(berlin, hannover_arr, "ICE 1000", vec![spandau, wolfsburg]).unwrap();
        let second = TripPart::new(hannover_dep, hamburg, "ICE 72", Vec::new()).unwrap();
        Trip::new(vec![first, second], status).unwrap()
    }

    fn direct_trip() -> Trip {
        let mut start = stop("testloc1");
        start.booked_departure = Some(time("2014-01-01T12:00"));
        let mut end = stop("testloc2");
        end.booked_arrival = Some(time("2014-01-01T12:30"));
        let part = TripPart::new(start, end, "at the end of the longest", Vec::new()).unwrap();
        Trip::new(vec![part], TripStatus::Normal).unwrap()
    }

    #[test]
    fn terse_two_leg_trip() {
        let out = render(&[two_leg_trip(TripStatus::Normal)], OutputFormat::Terse);
        let expected = concat!(
            "#1 Berlin Hbf 2024-03-01 08:30 (+2 min) -> ",
            "Hamburg Hbf 2024-03-01 11:40 (-1 min), switches: 1\n",
        );
        assert_eq!(out, expected);
    }

    #[test]
    fn terse_without_realtime() {
        let out = render(&[direct_trip(), direct_trip()], OutputFormat::Terse);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(
            lines,
            vec![
                "#1 testloc1 2014-01-01 12:00 -> testloc2 2014-01-01 12:30, switches: 0",
                "#2 testloc1 2014-01-01 12:00 -> testloc2 2014-01-01 12:30, switches: 0",
            ]
        );
    }

    #[test]
    fn terse_canceled() {
        let out = render(&[two_leg_trip(TripStatus::Canceled)], OutputFormat::Terse);
        assert!(out.starts_with("#1 [CANCELED] Berlin Hbf"));
    }

    #[test]
    fn full_two_leg_trip() {
        let out = render(&[two_leg_trip(TripStatus::Normal)], OutputFormat::Full);
        let expected = "\
Trip #1
   Part #1
       Start:     Berlin Hbf
       Departure: 2024-03-01 08:30
       Platform:  13
       Delay:     +2 min
       End:       Hannover Hbf
       Arrival:   2024-03-01 10:05
       Platform:  4
       Line:      ICE 1000
       2 Stops:   Berlin-Spandau, Wolfsburg Hbf
   Part #2
       Start:     Hannover Hbf
       Departure: 2024-03-01 10:20
       End:       Hamburg Hbf
       Arrival:   2024-03-01 11:40
       Line:      ICE 72
       Delay:     -1 min
       Stops:     0

";
        assert_eq!(out, expected);
    }

    #[test]
    fn full_canceled_header() {
        let out = render(&[two_leg_trip(TripStatus::Canceled)], OutputFormat::Full);
        assert_eq!(out.lines().next(), Some("Trip #1 [CANCELED]"));
    }

    #[test]
    fn empty_trip_set() {
        assert_eq!(render(&[], OutputFormat::Terse), "");
        assert_eq!(render(&[], OutputFormat::Full), "");
    }

    #[test]
    fn format_names() {
        assert_eq!("terse".parse::<OutputFormat>(), Ok(OutputFormat::Terse));
        assert_eq!("full".parse::<OutputFormat>(), Ok(OutputFormat::Full));
        assert!("verbose".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::default().to_string(), "terse");
    }

    #[test]
    fn delays_carry_sign() {
        assert_eq!(format_delay(5), "+5 min");
        assert_eq!(format_delay(-3), "-3 min");
        assert_eq!(format_delay(0), "+0 min");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::domain::{Location, TripStatus, parse_datetime};
    use proptest::prelude::*;

    fn trip(name: &str, minutes: i64, status: TripStatus) -> Trip {
        let departure = parse_datetime("2024-03-01T08:00").unwrap();
        let mut start = Stop::new(Location::new(name));
        start.booked_departure = Some(departure);
        let mut end = Stop::new(Location::new("Hamburg Hbf"));
        end.booked_arrival = Some(departure + chrono::Duration::minutes(minutes));
        let part = TripPart::new(start, end, "RE 1", Vec::new()).unwrap();
        Trip::new(vec![part], status).unwrap()
    }

    fn arb_format() -> impl Strategy<Value = OutputFormat> {
        prop_oneof![Just(OutputFormat::Terse), Just(OutputFormat::Full)]
    }

    proptest! {
        /// Canceled trips are always marked, normal trips never are.
        #[test]
        fn marker_iff_canceled(
            name in "[A-Za-z ]{1,20}",
            minutes in 0i64..600,
            canceled in any::<bool>(),
            format in arb_format(),
        ) {
            let status = if canceled { TripStatus::Canceled } else { TripStatus::Normal };
            let out = render(&[trip(&name, minutes, status)], format);
            prop_assert_eq!(out.contains(CANCELED_MARKER), canceled);
        }

        /// Rendering twice gives identical output.
        #[test]
        fn render_is_deterministic(
            count in 0usize..5,
            minutes in 0i64..600,
            format in arb_format(),
        ) {
            let trips: Vec<Trip> = (0..count)
                .map(|i| trip("Berlin Hbf", minutes + i as i64, TripStatus::Normal))
                .collect();
            prop_assert_eq!(render(&trips, format), render(&trips, format));
        }
    }
}
