/// Calendar the output periods are aligned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PeriodicityAdjustment {
    /// Periods revert from the end date (or today).
    #[default]
    Actual,
    /// Periods end on the last business day of the calendar period.
    Calendar,
    /// Periods end on the company's fiscal period end.
    Fiscal,
}

impl PeriodicityAdjustment {
    pub(crate) const fn as_str(self) -> &'static str {
        match self {
            PeriodicityAdjustment::Actual => "ACTUAL",
            PeriodicityAdjustment::Calendar => "CALENDAR",
            PeriodicityAdjustment::Fiscal => "FISCAL",
        }
    }
}

/// Frequency of the returned data points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PeriodicitySelection {
    Daily,
    Weekly,
    #[default]
    Monthly,
    Quarterly,
    SemiAnnually,
    Yearly,
}

impl PeriodicitySelection {
    pub(crate) const fn as_str(self) -> &'static str {
        match self {
            PeriodicitySelection::Daily => "DAILY",
            PeriodicitySelection::Weekly => "WEEKLY",
            PeriodicitySelection::Monthly => "MONTHLY",
            PeriodicitySelection::Quarterly => "QUARTERLY",
            PeriodicitySelection::SemiAnnually => "SEMI_ANNUALLY",
            PeriodicitySelection::Yearly => "YEARLY",
        }
    }
}

/// Quote debt instruments as price or yield.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PricingOption {
    Price,
    Yield,
}

impl PricingOption {
    pub(crate) const fn as_str(self) -> &'static str {
        match self {
            PricingOption::Price => "PRICING_OPTION_PRICE",
            PricingOption::Yield => "PRICING_OPTION_YIELD",
        }
    }
}

/// Which non-trading days get a data point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NonTradingDayFillOption {
    NonTradingWeekdays,
    AllCalendarDays,
    ActiveDaysOnly,
}

impl NonTradingDayFillOption {
    pub(crate) const fn as_str(self) -> &'static str {
        match self {
            NonTradingDayFillOption::NonTradingWeekdays => "NON_TRADING_WEEKDAYS",
            NonTradingDayFillOption::AllCalendarDays => "ALL_CALENDAR_DAYS",
            NonTradingDayFillOption::ActiveDaysOnly => "ACTIVE_DAYS_ONLY",
        }
    }
}

/// What value a filled non-trading day carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NonTradingDayFillMethod {
    PreviousValue,
    NilValue,
}

impl NonTradingDayFillMethod {
    pub(crate) const fn as_str(self) -> &'static str {
        match self {
            NonTradingDayFillMethod::PreviousValue => "PREVIOUS_VALUE",
            NonTradingDayFillMethod::NilValue => "NIL_VALUE",
        }
    }
}
