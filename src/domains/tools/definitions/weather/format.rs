//! Markdown rendering of weather payloads.
//!
//! Values are labeled with the requested unit system but never converted:
//! the provider already answered in those units because the request carried
//! the matching `units` parameter.

use chrono::{DateTime, FixedOffset, Offset, Utc};

use super::location::UnitSystem;
use super::model::{ForecastReport, ForecastSample, WeatherReport};

/// 16-point compass, clockwise from north.
const COMPASS_POINTS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

/// Samples shown in the "Next 24 Hours" section (8 x 3h).
const NEXT_DAY_SAMPLES: usize = 8;

/// Maximum day groups in the daily section.
const MAX_FORECAST_DAYS: usize = 5;

const METERS_PER_MILE: f64 = 1609.34;

/// Render current conditions.
pub fn format_current(
    report: &WeatherReport,
    requested_label: Option<&str>,
    units: UnitSystem,
) -> String {
    let t = units.temperature_suffix();
    let mut out = String::new();

    out.push_str(&format!("# Weather Information: {}\n\n", report.name));
    push_requested_label(&mut out, requested_label, &report.name);

    out.push_str("## Current Conditions\n");
    if let Some(condition) = report.weather.first() {
        out.push_str(&format!(
            "- **Condition:** {} ({})\n",
            title_case(&condition.description),
            condition.main
        ));
    }

    let main = &report.main;
    out.push_str(&format!(
        "- **Temperature:** {:.1}{t} (feels like {:.1}{t})\n",
        main.temp, main.feels_like
    ));
    if main.temp_min != main.temp_max {
        out.push_str(&format!(
            "- **Range:** {:.1}{t} - {:.1}{t}\n",
            main.temp_min, main.temp_max
        ));
    }

    out.push_str(&format!("- **Humidity:** {}%\n", main.humidity));
    match units {
        // The hPa figure is relabeled, not converted.
        UnitSystem::Imperial => out.push_str(&format!(
            "- **Pressure:** {:.2} inHg\n",
            main.pressure as f64
        )),
        UnitSystem::Metric => out.push_str(&format!("- **Pressure:** {} hPa\n", main.pressure)),
    }

    out.push_str("\n## Details\n");
    if report.wind.speed > 0.0 {
        out.push_str(&format!(
            "- **Wind:** {:.1} {} {} ({}°)\n",
            report.wind.speed,
            units.speed_suffix(),
            wind_direction(report.wind.deg),
            report.wind.deg
        ));
    }
    if report.visibility > 0 {
        let meters = report.visibility as f64;
        match units {
            UnitSystem::Imperial => out.push_str(&format!(
                "- **Visibility:** {:.1} miles\n",
                meters / METERS_PER_MILE
            )),
            UnitSystem::Metric => {
                out.push_str(&format!("- **Visibility:** {:.1} km\n", meters / 1000.0))
            }
        }
    }
    if report.clouds.all > 0 {
        out.push_str(&format!("- **Cloudiness:** {}%\n", report.clouds.all));
    }

    push_location(
        &mut out,
        &report.name,
        &report.sys.country,
        report.coord.lat,
        report.coord.lon,
    );

    out
}

/// Render the 24-hour and 5-day forecast.
pub fn format_forecast(
    report: &ForecastReport,
    requested_label: Option<&str>,
    units: UnitSystem,
) -> String {
    let t = units.temperature_suffix();
    let offset = utc_offset(report.city.timezone);
    let mut out = String::new();

    out.push_str(&format!("# Weather Forecast: {}\n\n", report.city.name));
    push_requested_label(&mut out, requested_label, &report.city.name);

    out.push_str("## Next 24 Hours\n\n");
    for sample in report.list.iter().take(NEXT_DAY_SAMPLES) {
        let time = local_time(sample.dt, offset).format("%a %-I:%M %p");
        let condition = sample
            .weather
            .first()
            .map(|c| title_case(&c.description))
            .unwrap_or_default();
        let chance = if sample.pop > 0.0 {
            format!(" ({:.0}% chance rain)", sample.pop * 100.0)
        } else {
            String::new()
        };

        out.push_str(&format!(
            "**{}**: {:.1}{t}, {}{}\n",
            time, sample.main.temp, condition, chance
        ));
    }

    out.push_str("\n## 5-Day Forecast\n\n");
    for day in group_by_day(&report.list, offset)
        .iter()
        .take(MAX_FORECAST_DAYS)
    {
        let summary = day.summarize();
        let chance = if summary.max_pop > 0.0 {
            format!(", {:.0}% chance precipitation", summary.max_pop * 100.0)
        } else {
            String::new()
        };

        out.push_str(&format!(
            "**{}**: {:.1}{t} - {:.1}{t}, {}{}\n",
            day.label, summary.min_temp, summary.max_temp, summary.condition, chance
        ));
    }

    push_location(
        &mut out,
        &report.city.name,
        &report.city.country,
        report.city.coord.lat,
        report.city.coord.lon,
    );

    out
}

/// Compass point for a wind bearing in degrees.
pub fn wind_direction(degrees: i64) -> &'static str {
    let index = (degrees as f64 / 22.5).round() as i64;
    COMPASS_POINTS[index.rem_euclid(16) as usize]
}

/// Uppercase the first character of each whitespace-separated word.
pub fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn push_requested_label(out: &mut String, requested_label: Option<&str>, resolved_name: &str) {
    if let Some(label) = requested_label.filter(|l| !l.is_empty() && *l != resolved_name) {
        out.push_str(&format!("*Requested location: {}*\n\n", label));
    }
}

fn push_location(out: &mut String, name: &str, country: &str, lat: f64, lon: f64) {
    out.push_str("\n## Location\n");
    out.push_str(&format!("- **City:** {}, {}\n", name, country));
    out.push_str(&format!("- **Coordinates:** {:.4}, {:.4}\n", lat, lon));
}

fn utc_offset(seconds: i32) -> FixedOffset {
    FixedOffset::east_opt(seconds).unwrap_or_else(|| Utc.fix())
}

fn local_time(timestamp: i64, offset: FixedOffset) -> DateTime<FixedOffset> {
    DateTime::from_timestamp(timestamp, 0)
        .unwrap_or_default()
        .with_timezone(&offset)
}

/// Samples sharing a local calendar day.
struct DayGroup<'a> {
    label: String,
    samples: Vec<&'a ForecastSample>,
}

struct DaySummary<'a> {
    min_temp: f64,
    max_temp: f64,
    max_pop: f64,
    condition: &'a str,
}

impl<'a> DayGroup<'a> {
    fn summarize(&self) -> DaySummary<'a> {
        let mut min_temp = self.samples.first().map_or(0.0, |s| s.main.temp_min);
        let mut max_temp = self.samples.first().map_or(0.0, |s| s.main.temp_max);
        let mut max_pop = 0.0_f64;

        let mut counts: Vec<(&'a str, usize)> = Vec::new();
        let mut condition = "";
        let mut best = 0;

        for sample in &self.samples {
            min_temp = min_temp.min(sample.main.temp_min);
            max_temp = max_temp.max(sample.main.temp_max);
            max_pop = max_pop.max(sample.pop);

            if let Some(first) = sample.weather.first() {
                let main = first.main.as_str();
                let count = match counts.iter_mut().find(|(name, _)| *name == main) {
                    Some((_, count)) => {
                        *count += 1;
                        *count
                    }
                    None => {
                        counts.push((main, 1));
                        1
                    }
                };
                // Strictly greater: the first condition to reach a count keeps it.
                if count > best {
                    best = count;
                    condition = main;
                }
            }
        }

        DaySummary {
            min_temp,
            max_temp,
            max_pop,
            condition,
        }
    }
}

/// Group samples by local day in first-seen order (input order, not sorted).
fn group_by_day(samples: &[ForecastSample], offset: FixedOffset) -> Vec<DayGroup<'_>> {
    let mut days: Vec<DayGroup<'_>> = Vec::new();

    for sample in samples {
        let label = local_time(sample.dt, offset).format("%a %b %-d").to_string();
        match days.iter_mut().find(|day| day.label == label) {
            Some(day) => day.samples.push(sample),
            None => days.push(DayGroup {
                label,
                samples: vec![sample],
            }),
        }
    }

    days
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::definitions::weather::model::{
        City, Clouds, Condition, Coord, Readings, Sys, Wind,
    };

    /// 2024-01-15 00:00:00 UTC, a Monday.
    const MONDAY_MIDNIGHT: i64 = 1_705_276_800;
    const HOUR: i64 = 3600;

    fn condition(main: &str, description: &str) -> Condition {
        Condition {
            main: main.to_string(),
            description: description.to_string(),
            ..Default::default()
        }
    }

    fn london() -> WeatherReport {
        WeatherReport {
            coord: Coord {
                lat: 51.5074,
                lon: -0.1278,
            },
            weather: vec![condition("Clouds", "broken clouds")],
            main: Readings {
                temp: 15.5,
                feels_like: 14.2,
                temp_min: 13.0,
                temp_max: 17.8,
                pressure: 1013,
                humidity: 72,
            },
            visibility: 10000,
            wind: Wind {
                speed: 3.6,
                deg: 230,
                gust: 0.0,
            },
            clouds: Clouds { all: 75 },
            sys: Sys {
                country: "GB".to_string(),
                ..Default::default()
            },
            name: "London".to_string(),
            ..Default::default()
        }
    }

    fn sample(dt: i64, temp: f64, main: &str, pop: f64) -> ForecastSample {
        ForecastSample {
            dt,
            main: Readings {
                temp,
                temp_min: temp - 1.0,
                temp_max: temp + 1.0,
                ..Default::default()
            },
            weather: vec![condition(main, &format!("{} today", main.to_lowercase()))],
            pop,
            ..Default::default()
        }
    }

    fn forecast(list: Vec<ForecastSample>) -> ForecastReport {
        ForecastReport {
            cnt: list.len() as i64,
            list,
            city: City {
                name: "London".to_string(),
                country: "GB".to_string(),
                coord: Coord {
                    lat: 51.5074,
                    lon: -0.1278,
                },
                timezone: 0,
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_current_metric_full_layout() {
        let text = format_current(&london(), Some("London,UK"), UnitSystem::Metric);
        let expected = "# Weather Information: London\n\n\
            *Requested location: London,UK*\n\n\
            ## Current Conditions\n\
            - **Condition:** Broken Clouds (Clouds)\n\
            - **Temperature:** 15.5°C (feels like 14.2°C)\n\
            - **Range:** 13.0°C - 17.8°C\n\
            - **Humidity:** 72%\n\
            - **Pressure:** 1013 hPa\n\
            \n## Details\n\
            - **Wind:** 3.6 m/s SW (230°)\n\
            - **Visibility:** 10.0 km\n\
            - **Cloudiness:** 75%\n\
            \n## Location\n\
            - **City:** London, GB\n\
            - **Coordinates:** 51.5074, -0.1278\n";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_current_imperial_units() {
        let mut report = london();
        report.main.temp = 59.9;
        report.main.feels_like = 57.6;
        let text = format_current(&report, None, UnitSystem::Imperial);

        assert!(text.contains("- **Temperature:** 59.9°F (feels like 57.6°F)\n"));
        assert!(text.contains("- **Range:** 13.0°F - 17.8°F\n"));
        assert!(text.contains("- **Wind:** 3.6 mph SW (230°)\n"));
        assert!(text.contains("- **Visibility:** 6.2 miles\n"));
        assert!(!text.contains("°C"));
        assert!(!text.contains("m/s"));
        assert!(!text.contains(" km"));
    }

    #[test]
    fn test_imperial_pressure_is_relabeled_not_converted() {
        let text = format_current(&london(), None, UnitSystem::Imperial);
        assert!(text.contains("- **Pressure:** 1013.00 inHg\n"));
    }

    #[test]
    fn test_range_omitted_when_equal() {
        let mut report = london();
        report.main.temp_min = 15.5;
        report.main.temp_max = 15.5;
        assert!(!format_current(&report, None, UnitSystem::Metric).contains("**Range:**"));
    }

    #[test]
    fn test_zero_details_omitted() {
        let mut report = london();
        report.wind.speed = 0.0;
        report.visibility = 0;
        report.clouds.all = 0;
        let text = format_current(&report, None, UnitSystem::Metric);

        assert!(!text.contains("**Wind:**"));
        assert!(!text.contains("**Visibility:**"));
        assert!(!text.contains("**Cloudiness:**"));
        assert!(text.contains("## Details\n\n## Location\n"));
    }

    #[test]
    fn test_requested_label_omitted_when_same_or_absent() {
        let same = format_current(&london(), Some("London"), UnitSystem::Metric);
        let absent = format_current(&london(), None, UnitSystem::Metric);
        assert!(!same.contains("Requested location"));
        assert_eq!(same, absent);
    }

    #[test]
    fn test_missing_condition_omits_line() {
        let mut report = london();
        report.weather.clear();
        assert!(!format_current(&report, None, UnitSystem::Metric).contains("**Condition:**"));
    }

    #[test]
    fn test_formatting_is_deterministic() {
        let report = london();
        let first = format_current(&report, Some("London,UK"), UnitSystem::Imperial);
        let second = format_current(&report, Some("London,UK"), UnitSystem::Imperial);
        assert_eq!(first, second);

        let list = (0..40)
            .map(|i| sample(MONDAY_MIDNIGHT + i * 3 * HOUR, 10.0, "Rain", 0.2))
            .collect();
        let report = forecast(list);
        assert_eq!(
            format_forecast(&report, None, UnitSystem::Metric),
            format_forecast(&report, None, UnitSystem::Metric)
        );
    }

    #[test]
    fn test_wind_direction() {
        let cases = [
            (0, "N"),
            (11, "N"),
            (12, "NNE"),
            (45, "NE"),
            (90, "E"),
            (180, "S"),
            (230, "SW"),
            (270, "W"),
            (315, "NW"),
            (349, "N"),
            (360, "N"),
            (-90, "W"),
        ];
        for (degrees, expected) in cases {
            assert_eq!(wind_direction(degrees), expected, "{}°", degrees);
        }
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("light rain"), "Light Rain");
        assert_eq!(title_case("overcast  clouds"), "Overcast Clouds");
        assert_eq!(title_case("already Fine"), "Already Fine");
        assert_eq!(title_case("éclaircies"), "Éclaircies");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn test_forecast_next_24_hours() {
        let list: Vec<_> = (0..10)
            .map(|i| sample(MONDAY_MIDNIGHT + i * 3 * HOUR, 10.0 + i as f64, "Rain", 0.0))
            .collect();
        let mut report = forecast(list);
        report.list[1].pop = 0.456;
        report.list[1].weather = vec![condition("Clouds", "scattered clouds")];

        let text = format_forecast(&report, None, UnitSystem::Metric);

        assert!(text.starts_with("# Weather Forecast: London\n\n## Next 24 Hours\n\n"));
        assert!(text.contains("**Mon 12:00 AM**: 10.0°C, Rain Today\n"));
        assert!(text.contains("**Mon 3:00 AM**: 11.0°C, Scattered Clouds (46% chance rain)\n"));
        assert!(text.contains("**Mon 9:00 PM**: 17.0°C, Rain Today\n"));
        // The ninth sample is past the 24-hour window.
        assert!(!text.contains("**Tue 12:00 AM**"));
    }

    #[test]
    fn test_forecast_uses_city_utc_offset() {
        let mut report = forecast(vec![sample(MONDAY_MIDNIGHT, 10.0, "Clear", 0.0)]);
        report.city.timezone = -5 * 3600;
        let text = format_forecast(&report, None, UnitSystem::Imperial);

        assert!(text.contains("**Sun 7:00 PM**: 10.0°F, Clear Today\n"));
        assert!(text.contains("**Sun Jan 14**: 9.0°F - 11.0°F, Clear\n"));
    }

    #[test]
    fn test_daily_summary() {
        let day = MONDAY_MIDNIGHT;
        let list = vec![
            sample(day, 5.0, "Clouds", 0.0),
            sample(day + 3 * HOUR, 8.0, "Rain", 0.3),
            sample(day + 6 * HOUR, 12.0, "Rain", 0.75),
            sample(day + 9 * HOUR, 2.0, "Clouds", 0.1),
        ];
        let text = format_forecast(&forecast(list), None, UnitSystem::Metric);

        // Two each; Rain reaches two first.
        assert!(text.contains("**Mon Jan 15**: 1.0°C - 13.0°C, Rain, 75% chance precipitation\n"));
    }

    #[test]
    fn test_daily_tie_first_encountered_wins() {
        let day = MONDAY_MIDNIGHT;
        let list = vec![
            sample(day, 5.0, "Snow", 0.0),
            sample(day + 3 * HOUR, 5.0, "Clear", 0.0),
        ];
        let text = format_forecast(&forecast(list), None, UnitSystem::Metric);
        assert!(text.contains("**Mon Jan 15**: 4.0°C - 6.0°C, Snow\n"));
        assert!(!text.contains("chance precipitation"));
    }

    #[test]
    fn test_daily_groups_capped_at_five() {
        let list = (0..48)
            .map(|i| sample(MONDAY_MIDNIGHT + i * 3 * HOUR, 10.0, "Clear", 0.0))
            .collect();
        let text = format_forecast(&forecast(list), None, UnitSystem::Metric);
        let daily = text
            .split("## 5-Day Forecast\n\n")
            .nth(1)
            .and_then(|rest| rest.split("\n## Location").next())
            .unwrap();

        assert_eq!(daily.lines().count(), 5);
        assert!(daily.contains("**Fri Jan 19**"));
        assert!(!daily.contains("**Sat Jan 20**"));
    }

    #[test]
    fn test_daily_groups_keep_first_seen_order() {
        let wednesday = MONDAY_MIDNIGHT + 48 * HOUR;
        let list = vec![
            sample(wednesday, 10.0, "Clear", 0.0),
            sample(MONDAY_MIDNIGHT, 10.0, "Rain", 0.0),
            sample(wednesday + 3 * HOUR, 10.0, "Clear", 0.0),
        ];
        let text = format_forecast(&forecast(list), None, UnitSystem::Metric);

        let wed = text.find("**Wed Jan 17**").unwrap();
        let mon = text.find("**Mon Jan 15**").unwrap();
        assert!(wed < mon);
        assert_eq!(text.matches("**Wed Jan 17**").count(), 1);
    }

    #[test]
    fn test_forecast_location_section() {
        let text = format_forecast(
            &forecast(vec![sample(MONDAY_MIDNIGHT, 1.0, "Clear", 0.0)]),
            Some("51.5074,-0.1278"),
            UnitSystem::Metric,
        );
        assert!(text.contains("*Requested location: 51.5074,-0.1278*\n\n"));
        assert!(text.ends_with("\n## Location\n- **City:** London, GB\n- **Coordinates:** 51.5074, -0.1278\n"));
    }
}
