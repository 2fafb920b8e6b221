use crate::{DomainError, DomainErrorExt};
use bitflags::bitflags;
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

bitflags! {
    /// Set of meeting days.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Weekdays: u8 {
        const MON = 1 << 0;
        const TUE = 1 << 1;
        const WED = 1 << 2;
        const THU = 1 << 3;
        const FRI = 1 << 4;
        const SAT = 1 << 5;
        const SUN = 1 << 6;
    }
}

/// Canonical token per day, in week order.
const DAY_TOKENS: [(Weekdays, &str); 7] = [
    (Weekdays::MON, "M"),
    (Weekdays::TUE, "T"),
    (Weekdays::WED, "W"),
    (Weekdays::THU, "Th"),
    (Weekdays::FRI, "F"),
    (Weekdays::SAT, "Sa"),
    (Weekdays::SUN, "Su"),
];

const MINUTES_PER_DAY: u16 = 24 * 60;

impl Weekdays {
    /// Parses compact day tokens such as `MWF`, `TTh`, `MTWRF` or `SaSu`.
    ///
    /// `T` followed by `h` is Thursday, `R` is an alias for Thursday.
    pub fn parse_tokens(input: &str) -> Result<Self, DomainError> {
        let mut days = Self::empty();
        let mut chars = input.chars().peekable();

        while let Some(c) = chars.next() {
            let day = match c {
                'M' => Self::MON,
                'T' => {
                    if chars.next_if_eq(&'h').is_some() {
                        Self::THU
                    } else {
                        Self::TUE
                    }
                },
                'W' => Self::WED,
                'R' => Self::THU,
                'F' => Self::FRI,
                'S' => match chars.next() {
                    Some('a') => Self::SAT,
                    Some('u') => Self::SUN,
                    _ => return Err(invalid("'S' must be followed by 'a' or 'u'", input)),
                },
                other => return Err(invalid(format!("unknown day token '{other}'"), input)),
            };
            days |= day;
        }

        if days.is_empty() {
            return Err(invalid("no meeting days", input));
        }
        Ok(days)
    }
}

impl fmt::Display for Weekdays {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (day, token) in DAY_TOKENS {
            if self.contains(day) {
                f.write_str(token)?;
            }
        }
        Ok(())
    }
}

/// A parsed schedule descriptor: a set of days plus a daily `[start, end)` time range.
///
/// Times are minutes since midnight. Two sections overlap when they share a day and
/// their half-open ranges intersect, so `10:00-11:00` and `11:00-12:00` do not overlap.
///
/// ```rust
/// use registrar_domain::ScheduleSpec;
///
/// let chem: ScheduleSpec = "MWF 10:00-11:00".parse().unwrap();
/// let calc: ScheduleSpec = "MWF 10:30-11:30".parse().unwrap();
/// let lab: ScheduleSpec = "TTh 10:00-11:00".parse().unwrap();
///
/// assert!(chem.overlaps(&calc));
/// assert!(!chem.overlaps(&lab));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScheduleSpec {
    days: Weekdays,
    start: u16,
    end: u16,
}

impl ScheduleSpec {
    /// Builds a spec from parts.
    ///
    /// # Errors
    /// [`DomainError::InvalidSchedule`] when `days` is empty, `start >= end`, or `end`
    /// runs past midnight.
    pub fn new(days: Weekdays, start: u16, end: u16) -> Result<Self, DomainError> {
        if days.is_empty() {
            return Err(DomainError::InvalidSchedule {
                message: "no meeting days".into(),
                context: None,
            });
        }
        if start >= end || end > MINUTES_PER_DAY {
            return Err(DomainError::InvalidSchedule {
                message: format!("invalid time range {start}..{end}").into(),
                context: None,
            });
        }
        Ok(Self { days, start, end })
    }

    #[must_use]
    pub const fn days(&self) -> Weekdays {
        self.days
    }

    #[must_use]
    pub const fn start_minute(&self) -> u16 {
        self.start
    }

    #[must_use]
    pub const fn end_minute(&self) -> u16 {
        self.end
    }

    /// True when both sections meet on a common day at a common time.
    #[must_use]
    pub const fn overlaps(&self, other: &Self) -> bool {
        self.days.intersects(other.days) && self.start < other.end && other.start < self.end
    }
}

impl FromStr for ScheduleSpec {
    type Err = DomainError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let mut parts = input.split_whitespace();
        let (Some(days), Some(range), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(invalid("expected '<days> HH:MM-HH:MM'", input));
        };

        let days = Weekdays::parse_tokens(days).context(format!("'{input}'"))?;
        let (start, end) =
            range.split_once('-').ok_or_else(|| invalid("time range needs a '-'", input))?;

        Self::new(days, parse_clock(start, input)?, parse_clock(end, input)?)
            .context(format!("'{input}'"))
    }
}

impl fmt::Display for ScheduleSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:02}:{:02}-{:02}:{:02}",
            self.days,
            self.start / 60,
            self.start % 60,
            self.end / 60,
            self.end % 60
        )
    }
}

fn parse_clock(clock: &str, input: &str) -> Result<u16, DomainError> {
    let Some((hours, minutes)) = clock.split_once(':') else {
        return Err(invalid(format!("time '{clock}' is not HH:MM"), input));
    };
    let digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !digits(hours) || hours.len() > 2 || !digits(minutes) || minutes.len() != 2 {
        return Err(invalid(format!("time '{clock}' is not HH:MM"), input));
    }

    let hours: u16 = hours.parse().map_err(|_| invalid("hour out of range", input))?;
    let minutes: u16 = minutes.parse().map_err(|_| invalid("minute out of range", input))?;
    let end_of_day = hours == 24 && minutes == 0;
    if (hours > 23 || minutes > 59) && !end_of_day {
        return Err(invalid(format!("time '{clock}' out of range"), input));
    }

    Ok(hours * 60 + minutes)
}

fn invalid(message: impl Into<Cow<'static, str>>, input: &str) -> DomainError {
    DomainError::InvalidSchedule { message: message.into(), context: Some(format!("'{input}'").into()) }
}
