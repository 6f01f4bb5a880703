//! Client for the UK coronavirus statistics API.
//!
//! The upstream endpoint takes a `filters` expression selecting the area and
//! a `structure` document naming the response fields. The returned series is
//! newest-first; the entry offsets used for the display figures below are
//! contracts of that format.

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;

use super::{LocationKind, ProviderError, StatsProvider};
use async_trait::async_trait;

/// One day of the reported series. Recent entries may carry nulls while the
/// upstream figures are still provisional.
#[derive(Debug, Clone, Deserialize)]
pub struct CaseRecord {
    pub date: NaiveDate,
    #[serde(rename = "areaName")]
    pub area_name: String,
    #[serde(rename = "areaCode", default)]
    pub area_code: Option<String>,
    #[serde(rename = "newCasesBySpecimenDate", default)]
    pub new_cases: Option<i64>,
    #[serde(rename = "hospitalCases", default)]
    pub hospital_cases: Option<i64>,
    #[serde(rename = "cumDailyNsoDeathsByDeathDate", default)]
    pub cumulative_deaths: Option<i64>,
}

/// A fetched series, newest entry first.
#[derive(Debug, Clone, Deserialize)]
pub struct CaseTimeSeries {
    pub data: Vec<CaseRecord>,
}

/// Offset of the newest complete case figure; the day-0 entry is routinely
/// still unreported.
const CASE_WINDOW_START: usize = 1;
const CASE_WINDOW_DAYS: usize = 7;
/// Deaths lag the case series by over two weeks, so the newest entry with a
/// reliable cumulative figure sits this far back.
const DEATHS_ENTRY: usize = 17;

impl CaseTimeSeries {
    /// Display name of the reported area.
    pub fn area_name(&self) -> Option<&str> {
        self.data
            .get(CASE_WINDOW_START)
            .map(|record| record.area_name.as_str())
    }

    /// Sum of new cases over the most recent complete 7-day window.
    pub fn seven_day_cases(&self) -> i64 {
        self.data
            .iter()
            .skip(CASE_WINDOW_START)
            .take(CASE_WINDOW_DAYS)
            .filter_map(|record| record.new_cases)
            .sum()
    }

    /// Hospital occupancy as of the newest entry, when reported.
    pub fn current_hospital_cases(&self) -> Option<i64> {
        self.data.first().and_then(|record| record.hospital_cases)
    }

    /// Cumulative deaths and the date they are reported as of.
    pub fn latest_deaths(&self) -> Option<(NaiveDate, i64)> {
        self.data.get(DEATHS_ENTRY).and_then(|record| {
            record.cumulative_deaths.map(|total| (record.date, total))
        })
    }
}

/// Reqwest client for the statistics endpoint.
#[derive(Debug, Clone)]
pub struct CovidApiProvider {
    http: reqwest::Client,
    base_url: String,
}

impl CovidApiProvider {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

fn build_filters(location: &str, kind: LocationKind) -> String {
    format!("areaType={};areaName={}", kind.as_area_type(), location)
}

fn build_structure() -> String {
    json!({
        "date": "date",
        "areaName": "areaName",
        "areaCode": "areaCode",
        "cumDailyNsoDeathsByDeathDate": "cumDailyNsoDeathsByDeathDate",
        "hospitalCases": "hospitalCases",
        "newCasesBySpecimenDate": "newCasesBySpecimenDate",
    })
    .to_string()
}

#[async_trait]
impl StatsProvider for CovidApiProvider {
    async fn fetch(
        &self,
        location: &str,
        kind: LocationKind,
    ) -> Result<CaseTimeSeries, ProviderError> {
        let response = self
            .http
            .get(&self.base_url)
            .query(&[
                ("filters", build_filters(location, kind)),
                ("structure", build_structure()),
            ])
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return response
                .json::<CaseTimeSeries>()
                .await
                .map_err(ProviderError::from);
        }

        match status.as_u16() {
            401 | 403 => Err(ProviderError::InvalidApiKey),
            404 => Err(ProviderError::NotFound),
            429 => Err(ProviderError::RateLimited),
            _ => Err(ProviderError::ApiError(format!(
                "statistics request failed with status {status}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(date: &str, cases: Option<i64>) -> CaseRecord {
        CaseRecord {
            date: date.parse().expect("valid date"),
            area_name: "Exeter".to_string(),
            area_code: None,
            new_cases: cases,
            hospital_cases: None,
            cumulative_deaths: None,
        }
    }

    #[test]
    fn filters_expression_matches_upstream_grammar() {
        assert_eq!(
            build_filters("Exeter", LocationKind::Ltla),
            "areaType=ltla;areaName=Exeter"
        );
        assert_eq!(
            build_filters("England", LocationKind::Nation),
            "areaType=nation;areaName=England"
        );
    }

    #[test]
    fn structure_names_every_mapped_field() {
        let structure = build_structure();
        for field in [
            "date",
            "areaName",
            "areaCode",
            "cumDailyNsoDeathsByDeathDate",
            "hospitalCases",
            "newCasesBySpecimenDate",
        ] {
            assert!(structure.contains(field), "missing field {field}");
        }
    }

    #[test]
    fn seven_day_sum_skips_the_provisional_newest_entry() {
        let mut data = vec![record("2021-11-10", Some(1000))];
        for day in 1..=8 {
            data.push(record(&format!("2021-11-{:02}", 10 - day), Some(10)));
        }
        let series = CaseTimeSeries { data };
        assert_eq!(series.seven_day_cases(), 70);
    }

    #[test]
    fn unreported_days_do_not_poison_the_sum() {
        let data = vec![
            record("2021-11-10", None),
            record("2021-11-09", Some(5)),
            record("2021-11-08", None),
            record("2021-11-07", Some(7)),
        ];
        let series = CaseTimeSeries { data };
        assert_eq!(series.seven_day_cases(), 12);
    }

    #[test]
    fn wire_format_deserializes_with_nulls() {
        let body = serde_json::json!({
            "data": [
                {
                    "date": "2021-11-10",
                    "areaName": "England",
                    "areaCode": "E92000001",
                    "cumDailyNsoDeathsByDeathDate": null,
                    "hospitalCases": 7019,
                    "newCasesBySpecimenDate": null
                },
                {
                    "date": "2021-11-09",
                    "areaName": "England",
                    "areaCode": "E92000001",
                    "cumDailyNsoDeathsByDeathDate": 141_544,
                    "hospitalCases": 7104,
                    "newCasesBySpecimenDate": 31_833
                }
            ]
        });
        let series: CaseTimeSeries =
            serde_json::from_value(body).expect("deserializes");
        assert_eq!(series.current_hospital_cases(), Some(7019));
        assert_eq!(series.area_name(), Some("England"));
    }
}
