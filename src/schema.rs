/// Column-name constants for the aero-statkit schemas.
/// Single source of truth for every CSV header the pipelines touch.

// ── Airport traffic columns ─────────────────────────────────────────────────
pub mod traffic {
    pub const YEAR: &str = "YEAR";
    pub const MONTH_NUM: &str = "MONTH_NUM";
    pub const MONTH: &str = "MONTH";
    pub const MONTH_MON: &str = "MONTH_MON";
    pub const FLT_DATE: &str = "FLT_DATE";
    pub const APT_ICAO: &str = "APT_ICAO";
    pub const APT_NAME: &str = "APT_NAME";
    pub const STATE_NAME: &str = "STATE_NAME";
    pub const FLT_DEP_1: &str = "FLT_DEP_1";
    pub const FLT_ARR_1: &str = "FLT_ARR_1";
    pub const FLT_TOT_1: &str = "FLT_TOT_1";
    pub const FLT_DEP_IFR_2: &str = "FLT_DEP_IFR_2";
    pub const FLT_ARR_IFR_2: &str = "FLT_ARR_IFR_2";
    pub const FLT_TOT_IFR_2: &str = "FLT_TOT_IFR_2";

    /// Columns a yearly extract must provide.
    pub const REQUIRED: [&str; 6] = [
        YEAR,
        MONTH_NUM,
        STATE_NAME,
        FLT_DEP_1,
        FLT_ARR_1,
        FLT_TOT_1,
    ];

    /// Canonical schema after loading (MONTH_NUM renamed to MONTH).
    pub const CANONICAL: [&str; 6] = [YEAR, MONTH, STATE_NAME, FLT_DEP_1, FLT_ARR_1, FLT_TOT_1];

    /// Traffic counts summed under monthly aggregation.
    pub const COUNTS: [&str; 3] = [FLT_DEP_1, FLT_ARR_1, FLT_TOT_1];

    /// Non-essential columns discarded on load: flight date, textual month
    /// name, airport identifiers, and the secondary IFR traffic counts.
    pub const DROPPED: [&str; 7] = [
        FLT_DATE,
        MONTH_MON,
        APT_ICAO,
        APT_NAME,
        FLT_DEP_IFR_2,
        FLT_ARR_IFR_2,
        FLT_TOT_IFR_2,
    ];
}

// ── CO2 emissions columns ───────────────────────────────────────────────────
pub mod emissions {
    pub const YEAR: &str = "YEAR";
    pub const MONTH: &str = "MONTH";
    pub const FLIGHT_MONTH: &str = "FLIGHT_MONTH";
    pub const STATE_NAME: &str = "STATE_NAME";
    pub const STATE_CODE: &str = "STATE_CODE";
    pub const CO2_QTY_TONNES: &str = "CO2_QTY_TONNES";
    pub const TF: &str = "TF";
    pub const NOTE: &str = "NOTE";
    pub const COUNTRY_TRAFFIC: &str = "COUNTRY_TRAFFIC";
    pub const FUEL_CONSUMPTION_TONNES: &str = "FUEL_CONSUMPTION_TONNES";

    /// Columns removed from every yearly extract.
    pub const DROPPED: [&str; 2] = [STATE_CODE, NOTE];

    /// Canonical schema after loading (TF renamed to COUNTRY_TRAFFIC).
    pub const CANONICAL: [&str; 5] = [YEAR, MONTH, STATE_NAME, CO2_QTY_TONNES, COUNTRY_TRAFFIC];
}

// ── Population columns ──────────────────────────────────────────────────────
pub mod population {
    pub const COUNTRIES: &str = "Countries";
    pub const COUNTRY: &str = "Country";
    pub const YEAR: &str = "Year";
    pub const POPULATION: &str = "Population";
    pub const CHANGE_FROM_PREVIOUS: &str = "Change_from_Previous";

    /// Name of the growth-rate column for a consecutive year pair.
    pub fn change_column(year1: i32, year2: i32) -> String {
        format!("pop_change_{year1}-{year2}")
    }
}
