#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatePartKind {
    Month,
    Date,
    Year,
    Hours,
    Minutes,
    Seconds,
    AmPm,
    Literal,
}

impl DatePartKind {
    pub fn is_date(self) -> bool {
        matches!(self, Self::Month | Self::Date | Self::Year)
    }

    pub fn is_time(self) -> bool {
        matches!(self, Self::Hours | Self::Minutes | Self::Seconds)
    }

    pub(super) fn from_token(ch: char) -> Option<Self> {
        match ch {
            'M' => Some(Self::Month),
            'd' => Some(Self::Date),
            'y' => Some(Self::Year),
            'H' | 'h' => Some(Self::Hours),
            'm' => Some(Self::Minutes),
            's' => Some(Self::Seconds),
            't' => Some(Self::AmPm),
            _ => None,
        }
    }
}

/// One run of a date/time format: a calendar/clock component or a literal
/// stretch, with its half-open `start..end` range in the masked string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatePart {
    pub kind: DatePartKind,
    pub start: usize,
    pub end: usize,
    /// The original token text (`"MM"`, `"yyyy"`, `"/"`, ...).
    pub format: String,
}

impl DatePart {
    pub fn width(&self) -> usize {
        self.end - self.start
    }

    pub fn contains(&self, pos: usize) -> bool {
        self.start <= pos && pos < self.end
    }

    /// A 12-hour dial part (`h`/`hh`), as opposed to 24-hour `H`/`HH`.
    pub fn is_twelve_hour(&self) -> bool {
        self.kind == DatePartKind::Hours && self.format.starts_with('h')
    }
}
