use std::fmt::Display;

use chrono::{DateTime, Local, TimeZone, Utc};
use ia_client::Point;

/// Same layout as `time.Stamp`, e.g. `Jan  2 15:04:05`
const STAMP: &str = "%b %e %H:%M:%S";

/// Render the air sensor readings of a point for the terminal
pub fn render(point_id: &str, point: &Point) -> String {
    if !point.air_sensor {
        return format!("{} has no air sensor.\n", point_id);
    }

    let data = &point.air_sensor_data;
    let weather = &data.weather;
    let pm10 = &data.pollutants.pm10;
    let pm25 = &data.pollutants.pm25;
    let updated = data
        .updated_until
        .map(|at| format_timestamp(at, &Local))
        .unwrap_or_else(|| "unknown".to_string());

    let lines = [
        format!("Point name........: {}", point.name),
        format!("Temperature.......: {:.1} °C", weather.temperature),
        format!("Pressure..........: {} hPa", whole(weather.pressure)),
        format!("Humidity..........: {}%", whole(weather.humidity)),
        format!("Dust PM 10........: {:.1} μg/m³ ({}%)", pm10.value, whole(pm10.percent)),
        format!("Dust PM 2.5.......: {:.1} μg/m³ ({}%)", pm25.value, whole(pm25.percent)),
        format!("Air quality.......: {}", air_quality_label(&data.air_quality)),
        format!("Last updated......: {}", updated),
    ];

    lines.join("\n") + "\n"
}

/// Nearest integer, half away from zero. `-0.4` prints as `0`, not `-0`.
fn whole(value: f64) -> i64 {
    value.round() as i64
}

/// `VERY_GOOD` -> `very good`
fn air_quality_label(category: &str) -> String {
    category.replace('_', " ").to_lowercase()
}

fn format_timestamp<Tz>(at: DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    at.with_timezone(tz).format(STAMP).to_string()
}
