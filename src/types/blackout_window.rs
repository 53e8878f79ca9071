/// Pre/post minutes around an event during which trading should pause.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct BlackoutWindow {
    /// Minutes before the release that are already blacked out, 0–240
    pub pre_minutes: i64,

    /// Minutes after the release that are still blacked out, 0–240
    pub post_minutes: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WindowError {
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    #[error("{field} must be an integer, got {value:?}")]
    NotAnInteger { field: &'static str, value: String },
}

impl Default for BlackoutWindow {
    fn default() -> Self {
        Self {
            pre_minutes: 10,
            post_minutes: 30,
        }
    }
}

impl BlackoutWindow {
    pub const MIN_MINUTES: i64 = 0;
    pub const MAX_MINUTES: i64 = 240;

    pub fn new(pre_minutes: i64, post_minutes: i64) -> Result<Self, WindowError> {
        let window = Self {
            pre_minutes,
            post_minutes,
        };
        window.validate()?;

        Ok(window)
    }

    /// Applies per-request overrides on top of the configured defaults.
    pub fn with_overrides(
        self,
        pre_minutes: Option<i64>,
        post_minutes: Option<i64>,
    ) -> Result<Self, WindowError> {
        Self::new(
            pre_minutes.unwrap_or(self.pre_minutes),
            post_minutes.unwrap_or(self.post_minutes),
        )
    }

    /// Parses a raw query value; range is checked by [`BlackoutWindow::new`].
    pub fn parse_minutes(field: &'static str, raw: &str) -> Result<i64, WindowError> {
        raw.trim().parse().map_err(|_| WindowError::NotAnInteger {
            field,
            value: raw.to_string(),
        })
    }

    pub fn validate(&self) -> Result<(), WindowError> {
        check_range("pre_minutes", self.pre_minutes)?;
        check_range("post_minutes", self.post_minutes)
    }
}

fn check_range(field: &'static str, value: i64) -> Result<(), WindowError> {
    if !(BlackoutWindow::MIN_MINUTES..=BlackoutWindow::MAX_MINUTES).contains(&value) {
        return Err(WindowError::OutOfRange {
            field,
            value,
            min: BlackoutWindow::MIN_MINUTES,
            max: BlackoutWindow::MAX_MINUTES,
        });
    }
    Ok(())
}
