#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoupletStatus {
    Steady,
    Strengthening,
    Weakening,
}

impl CoupletStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Steady => "steady",
            Self::Strengthening => "strengthening",
            Self::Weakening => "weakening",
        }
    }

}

/// Enhanced Fujita label derived from couplet size and trend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum EfRating {
    Ef0,
    Ef1,
    Ef2,
    Ef3,
}

impl EfRating {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ef0 => "EF0",
            Self::Ef1 => "EF1",
            Self::Ef2 => "EF2",
            Self::Ef3 => "EF3",
        }
    }

    /// `size` is the last published couplet size; `None` before the first
    /// couplet-size update, which always rates EF0.
    pub fn estimate(size: Option<f64>, status: Option<CoupletStatus>) -> Self {
        let Some(size) = size else {
            return Self::Ef0;
        };
        let strengthening = status == Some(CoupletStatus::Strengthening);

        if size > 0.8 && strengthening {
            Self::Ef3
        } else if size > 0.5 && strengthening {
            Self::Ef2
        } else if size > 0.3 {
            Self::Ef1
        } else {
            Self::Ef0
        }
    }
}

/// Sign applied to the inbound velocity drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VelocityDirection {
    Rising,
    Falling,
}

impl VelocityDirection {
    pub const fn sign(self) -> f64 {
        match self {
            Self::Rising => 1.0,
            Self::Falling => -1.0,
        }
    }

    pub const fn flipped(self) -> Self {
        match self {
            Self::Rising => Self::Falling,
            Self::Falling => Self::Rising,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn couplet_status_publishes_lowercase_names() {
        assert_eq!(CoupletStatus::Strengthening.as_str(), "strengthening");
        assert_eq!(CoupletStatus::Weakening.as_str(), "weakening");
        assert_eq!(CoupletStatus::Steady.as_str(), "steady");
    }

    #[test]
    fn ef_rating_requires_strengthening_for_upper_grades() {
        let strengthening = Some(CoupletStatus::Strengthening);
        let steady = Some(CoupletStatus::Steady);

        assert_eq!(EfRating::estimate(Some(0.9), strengthening), EfRating::Ef3);
        assert_eq!(EfRating::estimate(Some(0.6), strengthening), EfRating::Ef2);
        assert_eq!(EfRating::estimate(Some(0.9), steady), EfRating::Ef1);
        assert_eq!(EfRating::estimate(Some(0.31), None), EfRating::Ef1);
        assert_eq!(EfRating::estimate(Some(0.3), strengthening), EfRating::Ef0);
        assert_eq!(EfRating::estimate(None, strengthening), EfRating::Ef0);
    }

    #[test]
    fn ef_rating_thresholds_are_strict() {
        let strengthening = Some(CoupletStatus::Strengthening);
        assert_eq!(EfRating::estimate(Some(0.8), strengthening), EfRating::Ef2);
        assert_eq!(EfRating::estimate(Some(0.5), strengthening), EfRating::Ef1);
    }

    #[test]
    fn direction_flip_round_trips() {
        assert_eq!(VelocityDirection::Rising.flipped(), VelocityDirection::Falling);
        assert_eq!(VelocityDirection::Falling.flipped().sign(), 1.0);
    }
}
