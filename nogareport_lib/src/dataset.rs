//! Static definitions of the four Noga ISO feeds.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Stable identifier for each feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DatasetKey {
    ProductionMix,
    Co2,
    Demand,
    Smp,
}

impl DatasetKey {
    pub const ALL: [DatasetKey; 4] = [
        DatasetKey::ProductionMix,
        DatasetKey::Co2,
        DatasetKey::Demand,
        DatasetKey::Smp,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ProductionMix => "production-mix",
            Self::Co2 => "co2",
            Self::Demand => "demand",
            Self::Smp => "smp",
        }
    }

    /// Environment variable consulted for this feed's subscription key when
    /// the config file does not carry one.
    pub fn key_env_var(&self) -> &'static str {
        match self {
            Self::ProductionMix => "NOGA_PRODUCTION_MIX_KEY",
            Self::Co2 => "NOGA_CO2_KEY",
            Self::Demand => "NOGA_DEMAND_KEY",
            Self::Smp => "NOGA_SMP_KEY",
        }
    }
}

impl fmt::Display for DatasetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DatasetKey {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "production-mix" => Ok(Self::ProductionMix),
            "co2" => Ok(Self::Co2),
            "demand" => Ok(Self::Demand),
            "smp" => Ok(Self::Smp),
            _ => Err(()),
        }
    }
}

/// Everything the pipeline needs to know about one feed. Built once at
/// startup from configuration, never mutated afterwards.
#[derive(Debug, Clone)]
pub struct DatasetSpec {
    pub key: DatasetKey,
    /// Ordered endpoint candidates; the fetch scan takes the first success.
    pub endpoints: Vec<String>,
    /// Subscription credential for the gateway product this feed lives under.
    pub subscription_key: String,
    /// Earliest date the gateway can serve for this feed.
    pub history_start: NaiveDate,
    /// Field names that may hold a day entry's interval records, in lookup order.
    pub interval_keys: Vec<String>,
    /// Output workbook file name, e.g. `production_mix.xlsx`.
    pub workbook_name: String,
    /// Human-readable title used for summary tabs and mail bodies.
    pub title: String,
}

const GATEWAY: &str = "https://apim-api.noga-iso.co.il";

impl DatasetSpec {
    /// The production definition for one feed. The subscription key is left
    /// empty; configuration fills it in.
    pub fn builtin(key: DatasetKey) -> Self {
        match key {
            DatasetKey::ProductionMix => Self {
                key,
                endpoints: vec![format!("{GATEWAY}/productionmix/PRODMIXAPI/v1")],
                subscription_key: String::new(),
                history_start: ymd(2023, 2, 22),
                interval_keys: interval_keys(&["productionMixData", "data"]),
                workbook_name: "production_mix.xlsx".to_string(),
                title: "Production Mix".to_string(),
            },
            DatasetKey::Co2 => Self {
                key,
                endpoints: vec![format!("{GATEWAY}/co2/CO2API/v1")],
                subscription_key: String::new(),
                history_start: ymd(2023, 2, 22),
                interval_keys: interval_keys(&["co2Data", "data"]),
                workbook_name: "co2_data.xlsx".to_string(),
                title: "CO2 Emissions".to_string(),
            },
            DatasetKey::Demand => Self {
                key,
                endpoints: vec![format!("{GATEWAY}/DEMAND/DEMANDAPI/v1")],
                subscription_key: String::new(),
                history_start: ymd(2021, 1, 1),
                interval_keys: interval_keys(&["demandData", "data"]),
                workbook_name: "demand_data.xlsx".to_string(),
                title: "Demand".to_string(),
            },
            DatasetKey::Smp => Self {
                key,
                endpoints: vec![format!("{GATEWAY}/smp/SMPAPI/v1")],
                subscription_key: String::new(),
                history_start: ymd(2021, 1, 1),
                interval_keys: interval_keys(&["smpData", "data"]),
                workbook_name: "smp_data.xlsx".to_string(),
                title: "SMP Pricing".to_string(),
            },
        }
    }
}

fn interval_keys(keys: &[&str]) -> Vec<String> {
    keys.iter().map(|k| k.to_string()).collect()
}

// Static, known-valid calendar literals.
fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_parses_from_cli_form() {
        assert_eq!("production-mix".parse(), Ok(DatasetKey::ProductionMix));
        assert_eq!("smp".parse(), Ok(DatasetKey::Smp));
        assert!("electricity".parse::<DatasetKey>().is_err());
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for key in DatasetKey::ALL {
            assert_eq!(key.to_string().parse(), Ok(key));
        }
    }

    #[test]
    fn builtin_definitions_cover_all_feeds() {
        for key in DatasetKey::ALL {
            let spec = DatasetSpec::builtin(key);
            assert_eq!(spec.key, key);
            assert!(!spec.endpoints.is_empty());
            assert!(spec.workbook_name.ends_with(".xlsx"));
            // Every feed falls back to the generic interval key.
            assert_eq!(spec.interval_keys.last().map(String::as_str), Some("data"));
        }
    }

    #[test]
    fn history_starts_match_gateway_availability() {
        assert_eq!(
            DatasetSpec::builtin(DatasetKey::ProductionMix).history_start,
            ymd(2023, 2, 22)
        );
        assert_eq!(
            DatasetSpec::builtin(DatasetKey::Demand).history_start,
            ymd(2021, 1, 1)
        );
    }
}
