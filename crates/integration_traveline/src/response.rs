//! SIRI stop monitoring response parser
//!
//! Walks the `ServiceDelivery` document with a streaming reader and extracts
//! the first `MonitoredVehicleJourney` found under
//! `ServiceDelivery/StopMonitoringDelivery/MonitoredStopVisit`.

use std::fmt::Display;

use quick_xml::{
    Reader,
    events::{BytesStart, Event},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::TravelineError;

/// Element path leading to a journey record, relative to the document root
const JOURNEY_PATH: [&str; 4] = [
    "ServiceDelivery",
    "StopMonitoringDelivery",
    "MonitoredStopVisit",
    "MonitoredVehicleJourney",
];

/// A vehicle journey and its next call at the monitored stop
///
/// Departure times are kept exactly as sent on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitoredVehicleJourney {
    /// Vehicle mode, e.g. "bus"
    pub vehicle_mode: String,
    /// Line name shown to passengers
    pub published_line_name: String,
    /// Destination or direction of travel
    pub direction_name: String,
    /// Operator reference
    pub operator_ref: String,
    /// Scheduled departure time (RFC3339)
    pub aimed_departure_time: String,
    /// Real-time predicted departure (RFC3339), absent when not reported
    pub expected_departure_time: Option<String>,
}

/// Parse a SIRI `ServiceDelivery` document
///
/// When several journeys are present the first one wins; the rest are still
/// read so that a malformed tail is reported.
///
/// # Errors
///
/// Returns [`TravelineError::MalformedXml`] if the body is not well-formed and
/// [`TravelineError::NoTimesFound`] if it contains no monitored journey.
pub fn parse_stop_monitoring_delivery(
    body: &str,
) -> Result<MonitoredVehicleJourney, TravelineError> {
    let mut reader = Reader::from_str(body);

    let mut path: Vec<String> = Vec::new();
    let mut text = String::new();
    let mut saw_root = false;
    let mut journeys_seen = 0_usize;
    // Depth of the journey element being filled, with the record itself
    let mut current: Option<(usize, MonitoredVehicleJourney)> = None;
    let mut found: Option<MonitoredVehicleJourney> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                open_element(&e, &path, &mut saw_root)?;
                path.push(String::from_utf8_lossy(e.local_name().as_ref()).into_owned());
                text.clear();

                if is_journey_path(&path) {
                    journeys_seen += 1;
                    if found.is_none() && current.is_none() {
                        current = Some((path.len(), MonitoredVehicleJourney::default()));
                    }
                }
            },
            Ok(Event::Empty(e)) => {
                open_element(&e, &path, &mut saw_root)?;
                path.push(String::from_utf8_lossy(e.local_name().as_ref()).into_owned());

                if is_journey_path(&path) {
                    journeys_seen += 1;
                    if found.is_none() && current.is_none() {
                        found = Some(MonitoredVehicleJourney::default());
                    }
                } else if let Some((depth, journey)) = current.as_mut() {
                    assign_field(journey, &path[*depth..], String::new());
                }

                path.pop();
            },
            Ok(Event::Text(e)) => {
                let value = e.unescape().map_err(malformed)?;
                if current.is_some() {
                    text.push_str(&value);
                }
            },
            Ok(Event::CData(e)) => {
                let value = std::str::from_utf8(e.as_ref()).map_err(malformed)?;
                if current.is_some() {
                    text.push_str(value);
                }
            },
            Ok(Event::End(_)) => {
                let closes_journey = current
                    .as_ref()
                    .is_some_and(|(depth, _)| *depth == path.len());

                if closes_journey {
                    found = current.take().map(|(_, journey)| journey);
                } else if let Some((depth, journey)) = current.as_mut() {
                    assign_field(journey, &path[*depth..], std::mem::take(&mut text));
                }
                path.pop();
                text.clear();
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                debug!(position = reader.buffer_position(), error = %e, "XML syntax error in SIRI response");
                return Err(malformed(e));
            },
            _ => {},
        }
    }

    if !saw_root {
        return Err(TravelineError::MalformedXml(
            "document has no root element".to_string(),
        ));
    }

    if let Some(open) = path.last() {
        return Err(TravelineError::MalformedXml(format!(
            "unexpected end of document: <{open}> is not closed"
        )));
    }

    if journeys_seen > 1 {
        warn!(
            journeys = journeys_seen,
            "Multiple monitored vehicle journeys in response, using the first"
        );
    }

    found.ok_or(TravelineError::NoTimesFound)
}

/// Reject a second root element and broken attributes on an opening tag
fn open_element(
    element: &BytesStart<'_>,
    path: &[String],
    saw_root: &mut bool,
) -> Result<(), TravelineError> {
    if *saw_root && path.is_empty() {
        return Err(TravelineError::MalformedXml(format!(
            "unexpected second root element <{}>",
            String::from_utf8_lossy(element.local_name().as_ref())
        )));
    }
    *saw_root = true;

    for attr in element.attributes().with_checks(true) {
        attr.map_err(malformed)?;
    }
    Ok(())
}

fn is_journey_path(path: &[String]) -> bool {
    path.len() >= JOURNEY_PATH.len()
        && path[path.len() - JOURNEY_PATH.len()..]
            .iter()
            .zip(JOURNEY_PATH)
            .all(|(element, expected)| element == expected)
}

/// Store a leaf value, `relative` being the path below the journey element
fn assign_field(journey: &mut MonitoredVehicleJourney, relative: &[String], value: String) {
    match relative {
        [field] => match field.as_str() {
            "VehicleMode" => journey.vehicle_mode = value,
            "PublishedLineName" => journey.published_line_name = value,
            "DirectionName" => journey.direction_name = value,
            "OperatorRef" => journey.operator_ref = value,
            _ => {},
        },
        [call, field] if call == "MonitoredCall" => match field.as_str() {
            "AimedDepartureTime" => journey.aimed_departure_time = value,
            "ExpectedDepartureTime" => {
                journey.expected_departure_time = (!value.is_empty()).then_some(value);
            },
            _ => {},
        },
        _ => {},
    }
}

fn malformed(err: impl Display) -> TravelineError {
    TravelineError::MalformedXml(err.to_string())
}
