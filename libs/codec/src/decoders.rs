//! Per-topic decoders
//!
//! One decoder per supported [`Topic`]. Decoders are pure and stateless:
//! container shape is checked strictly (a weather payload must be an object),
//! individual fields are extracted leniently because the feed has shipped
//! several payload variants for the same topic over time. Lists that arrive
//! either as JSON arrays or as index-keyed objects are accepted in both forms.

use crate::{CodecError, Decode};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use types::events::*;
use types::parse::{lenient_bool, lenient_f64, lenient_string, lenient_u32, parse_hms, parse_utc};
use types::{FeedEvent, RawEvent, Topic};

/// The default decoder for a supported topic.
pub fn for_topic(topic: Topic) -> Box<dyn Decode> {
    match topic {
        Topic::Heartbeat => Box::new(HeartbeatDecoder),
        Topic::WeatherData => Box::new(WeatherDecoder),
        Topic::DriverList => Box::new(DriverListDecoder),
        Topic::TrackStatus => Box::new(TrackStatusDecoder),
        Topic::SessionInfo => Box::new(SessionInfoDecoder),
        Topic::RaceControlMessages => Box::new(RaceControlDecoder),
        Topic::TeamRadio => Box::new(TeamRadioDecoder),
        Topic::ExtrapolatedClock => Box::new(ExtrapolatedClockDecoder),
        Topic::LapCount => Box::new(LapCountDecoder),
        Topic::TimingAppData => Box::new(TimingAppDecoder),
        Topic::TimingStats => Box::new(TimingStatsDecoder),
        Topic::PitStopSeries => Box::new(PitStopSeriesDecoder),
    }
}

/// Require the payload to be a JSON object.
fn payload_object<'a>(raw: &'a RawEvent) -> Result<&'a Map<String, Value>, CodecError> {
    raw.payload.as_object().ok_or(CodecError::UnexpectedShape {
        topic: raw.topic.clone(),
        expected: "JSON object payload",
    })
}

/// Collect entries from a field that arrives either as an array or as an
/// index-keyed object (the feed uses both for incremental updates).
fn collection(value: Option<&Value>) -> Vec<&Value> {
    match value {
        Some(Value::Array(items)) => items.iter().collect(),
        Some(Value::Object(map)) => map.values().collect(),
        _ => Vec::new(),
    }
}

/// Decoder for `Heartbeat` payloads: `{"Utc": "..."}`.
pub struct HeartbeatDecoder;

impl Decode for HeartbeatDecoder {
    fn decode(&self, raw: &RawEvent) -> Result<FeedEvent, CodecError> {
        let obj = payload_object(raw)?;
        let datetime_utc =
            parse_utc(obj.get("Utc")).ok_or(CodecError::MissingField { field: "Utc" })?;
        Ok(FeedEvent::Heartbeat(Heartbeat { datetime_utc }))
    }
}

/// Decoder for `WeatherData` payloads (all fields numeric strings).
pub struct WeatherDecoder;

impl Decode for WeatherDecoder {
    fn decode(&self, raw: &RawEvent) -> Result<FeedEvent, CodecError> {
        let obj = payload_object(raw)?;
        Ok(FeedEvent::Weather(WeatherData {
            air_temperature: lenient_f64(obj.get("AirTemp")),
            humidity: lenient_f64(obj.get("Humidity")),
            air_pressure: lenient_f64(obj.get("Pressure")),
            rainfall: lenient_f64(obj.get("Rainfall")),
            track_temperature: lenient_f64(obj.get("TrackTemp")),
            wind_direction: lenient_f64(obj.get("WindDirection")),
            wind_speed: lenient_f64(obj.get("WindSpeed")),
        }))
    }
}

/// Decoder for `DriverList` payloads: a map of racing number to driver
/// record, plus bookkeeping keys like `_kf` that are skipped.
pub struct DriverListDecoder;

impl Decode for DriverListDecoder {
    fn decode(&self, raw: &RawEvent) -> Result<FeedEvent, CodecError> {
        let obj = payload_object(raw)?;
        let mut drivers = BTreeMap::new();
        for (number, entry) in obj {
            let Some(entry) = entry.as_object() else {
                continue;
            };
            drivers.insert(
                number.clone(),
                Driver {
                    racing_number: lenient_u32(entry.get("RacingNumber")),
                    broadcast_name: lenient_string(entry.get("BroadcastName")),
                    full_name: lenient_string(entry.get("FullName")),
                    tla: lenient_string(entry.get("Tla")),
                    line: lenient_u32(entry.get("Line")),
                    team_name: lenient_string(entry.get("TeamName")),
                    team_colour: lenient_string(entry.get("TeamColour")),
                    first_name: lenient_string(entry.get("FirstName")),
                    last_name: lenient_string(entry.get("LastName")),
                    reference: lenient_string(entry.get("Reference")),
                    headshot_url: lenient_string(entry.get("HeadshotUrl")),
                },
            );
        }
        Ok(FeedEvent::DriverList(DriverList { drivers }))
    }
}

/// Decoder for `TrackStatus` payloads: `{"Status": "1", "Message": "AllClear"}`.
pub struct TrackStatusDecoder;

impl Decode for TrackStatusDecoder {
    fn decode(&self, raw: &RawEvent) -> Result<FeedEvent, CodecError> {
        let obj = payload_object(raw)?;
        Ok(FeedEvent::TrackStatus(TrackStatus {
            status: lenient_string(obj.get("Status")),
            message: lenient_string(obj.get("Message")),
        }))
    }
}

/// Decoder for `SessionInfo` payloads (meeting, circuit, schedule).
pub struct SessionInfoDecoder;

impl Decode for SessionInfoDecoder {
    fn decode(&self, raw: &RawEvent) -> Result<FeedEvent, CodecError> {
        let obj = payload_object(raw)?;
        let empty = Map::new();
        let meeting = obj
            .get("Meeting")
            .and_then(Value::as_object)
            .unwrap_or(&empty);
        let country = meeting
            .get("Country")
            .and_then(Value::as_object)
            .unwrap_or(&empty);
        let circuit = meeting
            .get("Circuit")
            .and_then(Value::as_object)
            .unwrap_or(&empty);

        Ok(FeedEvent::SessionInfo(SessionInfo {
            meeting: Meeting {
                key: lenient_u32(meeting.get("Key")),
                name: lenient_string(meeting.get("Name")),
                official_name: lenient_string(meeting.get("OfficialName")),
                location: lenient_string(meeting.get("Location")),
                country: Country {
                    key: lenient_u32(country.get("Key")),
                    code: lenient_string(country.get("Code")),
                    name: lenient_string(country.get("Name")),
                },
                circuit: Circuit {
                    key: lenient_u32(circuit.get("Key")),
                    short_name: lenient_string(circuit.get("ShortName")),
                },
            },
            key: lenient_u32(obj.get("Key")),
            kind: lenient_string(obj.get("Type")),
            name: lenient_string(obj.get("Name")),
            start_date: parse_utc(obj.get("StartDate")),
            end_date: parse_utc(obj.get("EndDate")),
            gmt_offset: parse_hms(obj.get("GmtOffset")),
            path: lenient_string(obj.get("Path")),
        }))
    }
}

/// Decoder for `RaceControlMessages` payloads.
pub struct RaceControlDecoder;

impl Decode for RaceControlDecoder {
    fn decode(&self, raw: &RawEvent) -> Result<FeedEvent, CodecError> {
        let obj = payload_object(raw)?;
        let messages = collection(obj.get("Messages"))
            .into_iter()
            .filter_map(Value::as_object)
            .map(|m| RaceControlMessage {
                datetime_utc: parse_utc(m.get("Utc")),
                category: lenient_string(m.get("Category")),
                flag: m.get("Flag").and_then(Value::as_str).map(str::to_string),
                scope: m.get("Scope").and_then(Value::as_str).map(str::to_string),
                sector: m.get("Sector").map(|v| lenient_u32(Some(v))),
                message: lenient_string(m.get("Message")),
            })
            .collect();
        Ok(FeedEvent::RaceControl(RaceControlMessages { messages }))
    }
}

/// Decoder for `TeamRadio` payloads.
pub struct TeamRadioDecoder;

impl Decode for TeamRadioDecoder {
    fn decode(&self, raw: &RawEvent) -> Result<FeedEvent, CodecError> {
        let obj = payload_object(raw)?;
        let captures = collection(obj.get("Captures"))
            .into_iter()
            .filter_map(Value::as_object)
            .map(|c| TeamRadioCapture {
                datetime_utc: parse_utc(c.get("Utc")),
                racing_number: lenient_u32(c.get("RacingNumber")),
                path: lenient_string(c.get("Path")),
            })
            .collect();
        Ok(FeedEvent::TeamRadio(TeamRadio { captures }))
    }
}

/// Decoder for `ExtrapolatedClock` payloads.
pub struct ExtrapolatedClockDecoder;

impl Decode for ExtrapolatedClockDecoder {
    fn decode(&self, raw: &RawEvent) -> Result<FeedEvent, CodecError> {
        let obj = payload_object(raw)?;
        Ok(FeedEvent::ExtrapolatedClock(ExtrapolatedClock {
            datetime_utc: parse_utc(obj.get("Utc")),
            remaining: parse_hms(obj.get("Remaining")),
            extrapolating: lenient_bool(obj.get("Extrapolating")),
        }))
    }
}

/// Decoder for `LapCount` payloads.
pub struct LapCountDecoder;

impl Decode for LapCountDecoder {
    fn decode(&self, raw: &RawEvent) -> Result<FeedEvent, CodecError> {
        let obj = payload_object(raw)?;
        Ok(FeedEvent::LapCount(LapCount {
            current_lap: lenient_u32(obj.get("CurrentLap")),
            total_laps: lenient_u32(obj.get("TotalLaps")),
        }))
    }
}

/// Decoder for `TimingAppData` payloads (tyre stints per driver).
pub struct TimingAppDecoder;

impl Decode for TimingAppDecoder {
    fn decode(&self, raw: &RawEvent) -> Result<FeedEvent, CodecError> {
        let obj = payload_object(raw)?;
        let mut lines = BTreeMap::new();
        if let Some(Value::Object(entries)) = obj.get("Lines") {
            for (number, line) in entries {
                let Some(line) = line.as_object() else {
                    continue;
                };
                let mut stints = BTreeMap::new();
                match line.get("Stints") {
                    Some(Value::Array(items)) => {
                        for (idx, stint) in items.iter().enumerate() {
                            if let Some(stint) = stint.as_object() {
                                stints.insert(idx.to_string(), decode_stint(stint));
                            }
                        }
                    }
                    Some(Value::Object(map)) => {
                        for (idx, stint) in map {
                            if let Some(stint) = stint.as_object() {
                                stints.insert(idx.clone(), decode_stint(stint));
                            }
                        }
                    }
                    _ => {}
                }
                lines.insert(
                    number.clone(),
                    DriverStints {
                        racing_number: lenient_u32(line.get("RacingNumber")),
                        line: lenient_u32(line.get("Line")),
                        stints,
                    },
                );
            }
        }
        Ok(FeedEvent::TimingApp(TimingAppData { lines }))
    }
}

fn decode_stint(stint: &Map<String, Value>) -> Stint {
    Stint {
        lap_flags: lenient_u32(stint.get("LapFlags")),
        compound: lenient_string(stint.get("Compound")),
        new: lenient_bool(stint.get("New")),
        tyres_not_changed: lenient_bool(stint.get("TyresNotChanged")),
        total_laps: lenient_u32(stint.get("TotalLaps")),
        start_laps: lenient_u32(stint.get("StartLaps")),
        lap_time: lenient_string(stint.get("LapTime")),
        lap_number: lenient_u32(stint.get("LapNumber")),
    }
}

/// Decoder for `TimingStats` payloads (ranked bests per driver).
pub struct TimingStatsDecoder;

impl Decode for TimingStatsDecoder {
    fn decode(&self, raw: &RawEvent) -> Result<FeedEvent, CodecError> {
        let obj = payload_object(raw)?;
        let mut lines = BTreeMap::new();
        if let Some(Value::Object(entries)) = obj.get("Lines") {
            for (number, line) in entries {
                let Some(line) = line.as_object() else {
                    continue;
                };
                let best = line
                    .get("PersonalBestLapTime")
                    .and_then(Value::as_object);
                let mut best_speeds = BTreeMap::new();
                if let Some(Value::Object(speeds)) = line.get("BestSpeeds") {
                    for (point, stat) in speeds {
                        if let Some(stat) = stat.as_object() {
                            best_speeds.insert(point.clone(), decode_stat(stat));
                        }
                    }
                }
                lines.insert(
                    number.clone(),
                    DriverTimingStats {
                        racing_number: lenient_u32(line.get("RacingNumber")),
                        line: lenient_u32(line.get("Line")),
                        personal_best_lap_time: PersonalBestLapTime {
                            stat: best.map(decode_stat).unwrap_or(Stat {
                                value: String::new(),
                                position: 0,
                            }),
                            lap: best.map(|b| lenient_u32(b.get("Lap"))).unwrap_or(0),
                        },
                        best_speeds,
                    },
                );
            }
        }
        Ok(FeedEvent::TimingStats(TimingStats { lines }))
    }
}

fn decode_stat(stat: &Map<String, Value>) -> Stat {
    Stat {
        value: lenient_string(stat.get("Value")),
        position: lenient_u32(stat.get("Position")),
    }
}

/// Decoder for `PitStopSeries` payloads (driver -> lap -> stop).
pub struct PitStopSeriesDecoder;

impl Decode for PitStopSeriesDecoder {
    fn decode(&self, raw: &RawEvent) -> Result<FeedEvent, CodecError> {
        let obj = payload_object(raw)?;
        let mut pit_times = BTreeMap::new();
        if let Some(Value::Object(drivers)) = obj.get("PitTimes") {
            for (number, laps) in drivers {
                let Some(laps) = laps.as_object() else {
                    continue;
                };
                let mut per_lap = BTreeMap::new();
                for (lap, record) in laps {
                    let Some(record) = record.as_object() else {
                        continue;
                    };
                    let empty = Map::new();
                    let stop = record
                        .get("PitStop")
                        .and_then(Value::as_object)
                        .unwrap_or(&empty);
                    per_lap.insert(
                        lap.clone(),
                        PitStopTime {
                            timestamp_utc: parse_utc(record.get("Timestamp")),
                            pit_stop: PitStopEntry {
                                racing_number: lenient_string(stop.get("RacingNumber")),
                                pit_stop_time: lenient_string(stop.get("PitStopTime")),
                                pit_lane_time: lenient_string(stop.get("PitLaneTime")),
                                lap: lenient_string(stop.get("Lap")),
                            },
                        },
                    );
                }
                pit_times.insert(number.clone(), per_lap);
            }
        }
        Ok(FeedEvent::PitStops(PitStopSeries { pit_times }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode(topic: Topic, payload: Value) -> FeedEvent {
        for_topic(topic)
            .decode(&RawEvent::now(topic.wire_name(), payload))
            .unwrap()
    }

    #[test]
    fn test_heartbeat() {
        let event = decode(Topic::Heartbeat, json!({"Utc": "2025-01-01T00:00:00Z"}));
        match event {
            FeedEvent::Heartbeat(hb) => assert_eq!(hb.datetime_utc.timestamp(), 1735689600),
            other => panic!("expected heartbeat, got {other:?}"),
        }
    }

    #[test]
    fn test_heartbeat_requires_utc() {
        let decoder = HeartbeatDecoder;
        let raw = RawEvent::now("Heartbeat", json!({"_kf": true}));
        assert!(decoder.decode(&raw).is_err());
        let raw = RawEvent::now("Heartbeat", json!("not an object"));
        assert!(decoder.decode(&raw).is_err());
    }

    #[test]
    fn test_weather_numeric_strings() {
        let event = decode(
            Topic::WeatherData,
            json!({
                "AirTemp": "28.5",
                "Humidity": "73.0",
                "Pressure": "1012.6",
                "Rainfall": "0",
                "TrackTemp": "32.5",
                "WindDirection": "115",
                "WindSpeed": "0.5",
                "_kf": true
            }),
        );
        match event {
            FeedEvent::Weather(w) => {
                assert_eq!(w.air_temperature, 28.5);
                assert_eq!(w.humidity, 73.0);
                assert_eq!(w.air_pressure, 1012.6);
                assert_eq!(w.track_temperature, 32.5);
                assert_eq!(w.wind_direction, 115.0);
                assert_eq!(w.wind_speed, 0.5);
                assert!(!w.is_raining());
            }
            other => panic!("expected weather, got {other:?}"),
        }
    }

    #[test]
    fn test_weather_missing_fields_default() {
        let event = decode(Topic::WeatherData, json!({"AirTemp": "28.5"}));
        match event {
            FeedEvent::Weather(w) => {
                assert_eq!(w.air_temperature, 28.5);
                assert_eq!(w.humidity, 0.0);
                assert_eq!(w.wind_speed, 0.0);
            }
            other => panic!("expected weather, got {other:?}"),
        }
    }

    #[test]
    fn test_driver_list_skips_bookkeeping_keys() {
        let event = decode(
            Topic::DriverList,
            json!({
                "1": {
                    "RacingNumber": "1",
                    "BroadcastName": "M VERSTAPPEN",
                    "FullName": "Max VERSTAPPEN",
                    "Tla": "VER",
                    "Line": 3,
                    "TeamName": "Red Bull Racing",
                    "TeamColour": "4781D7"
                },
                "_kf": true
            }),
        );
        match event {
            FeedEvent::DriverList(dl) => {
                assert_eq!(dl.drivers.len(), 1);
                let ver = &dl.drivers["1"];
                assert_eq!(ver.racing_number, 1);
                assert_eq!(ver.tla, "VER");
                assert_eq!(ver.line, 3);
                // Fields absent from this payload shape degrade to defaults
                assert_eq!(ver.headshot_url, "");
            }
            other => panic!("expected driver list, got {other:?}"),
        }
    }

    #[test]
    fn test_race_control_messages_array_and_map_forms() {
        let from_array = decode(
            Topic::RaceControlMessages,
            json!({"Messages": [{
                "Utc": "2025-10-03T13:40:00Z",
                "Category": "Flag",
                "Flag": "YELLOW",
                "Scope": "Sector",
                "Sector": 7,
                "Message": "YELLOW IN TRACK SECTOR 7"
            }]}),
        );
        let from_map = decode(
            Topic::RaceControlMessages,
            json!({"Messages": {"4": {
                "Utc": "2025-10-03T13:40:00Z",
                "Category": "Flag",
                "Flag": "YELLOW",
                "Scope": "Sector",
                "Sector": 7,
                "Message": "YELLOW IN TRACK SECTOR 7"
            }}}),
        );
        for event in [from_array, from_map] {
            match event {
                FeedEvent::RaceControl(rc) => {
                    assert_eq!(rc.messages.len(), 1);
                    let msg = &rc.messages[0];
                    assert_eq!(msg.category, "Flag");
                    assert_eq!(msg.flag.as_deref(), Some("YELLOW"));
                    assert_eq!(msg.sector, Some(7));
                }
                other => panic!("expected race control, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_team_radio() {
        let event = decode(
            Topic::TeamRadio,
            json!({"Captures": [{
                "Utc": "2025-10-03T13:07:24.5595691Z",
                "RacingNumber": "30",
                "Path": "TeamRadio/LIALAW01_30_20251003_210721.mp3"
            }]}),
        );
        match event {
            FeedEvent::TeamRadio(tr) => {
                assert_eq!(tr.captures.len(), 1);
                assert_eq!(tr.captures[0].racing_number, 30);
                assert!(tr.captures[0].path.ends_with(".mp3"));
            }
            other => panic!("expected team radio, got {other:?}"),
        }
    }

    #[test]
    fn test_extrapolated_clock() {
        let event = decode(
            Topic::ExtrapolatedClock,
            json!({"Utc": "2025-10-03T15:37:14.4783763Z", "Remaining": "00:45:00", "Extrapolating": false}),
        );
        match event {
            FeedEvent::ExtrapolatedClock(clock) => {
                assert_eq!(clock.remaining, std::time::Duration::from_secs(2700));
                assert!(!clock.extrapolating);
                assert!(clock.datetime_utc.is_some());
            }
            other => panic!("expected clock, got {other:?}"),
        }
    }

    #[test]
    fn test_timing_app_stints_array_form() {
        let event = decode(
            Topic::TimingAppData,
            json!({"Lines": {"1": {
                "RacingNumber": "1",
                "Line": 3,
                "Stints": [{
                    "LapFlags": 0,
                    "Compound": "MEDIUM",
                    "New": "true",
                    "TyresNotChanged": "0",
                    "TotalLaps": 8,
                    "StartLaps": 0,
                    "LapTime": "1:32.345",
                    "LapNumber": 6
                }]
            }}}),
        );
        match event {
            FeedEvent::TimingApp(app) => {
                let stints = &app.lines["1"].stints;
                assert_eq!(stints.len(), 1);
                let stint = &stints["0"];
                assert_eq!(stint.compound, "MEDIUM");
                assert!(stint.new);
                assert!(!stint.tyres_not_changed);
                assert_eq!(stint.total_laps, 8);
            }
            other => panic!("expected timing app, got {other:?}"),
        }
    }

    #[test]
    fn test_timing_stats_composed_personal_best() {
        let event = decode(
            Topic::TimingStats,
            json!({"Lines": {"44": {
                "RacingNumber": "44",
                "Line": 5,
                "PersonalBestLapTime": {"Value": "1:30.857", "Lap": 12, "Position": 3},
                "BestSpeeds": {"ST": {"Value": "310", "Position": 1}}
            }}}),
        );
        match event {
            FeedEvent::TimingStats(stats) => {
                let driver = &stats.lines["44"];
                assert_eq!(driver.personal_best_lap_time.stat.value, "1:30.857");
                assert_eq!(driver.personal_best_lap_time.stat.position, 3);
                assert_eq!(driver.personal_best_lap_time.lap, 12);
                assert_eq!(driver.best_speeds["ST"].value, "310");
            }
            other => panic!("expected timing stats, got {other:?}"),
        }
    }

    #[test]
    fn test_pit_stop_series() {
        let event = decode(
            Topic::PitStopSeries,
            json!({"PitTimes": {"4": {"12": {
                "Timestamp": "2025-10-05T14:22:10Z",
                "PitStop": {
                    "RacingNumber": "4",
                    "PitStopTime": "2.5",
                    "PitLaneTime": "21.3",
                    "Lap": "12"
                }
            }}}}),
        );
        match event {
            FeedEvent::PitStops(series) => {
                let stop = &series.pit_times["4"]["12"];
                assert_eq!(stop.pit_stop.pit_stop_time, "2.5");
                assert!(stop.timestamp_utc.is_some());
            }
            other => panic!("expected pit stops, got {other:?}"),
        }
    }
}
