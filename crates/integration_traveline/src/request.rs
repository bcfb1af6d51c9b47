//! SIRI stop monitoring request builder
//!
//! Produces the compact `ServiceRequest` document expected by the NextBuses
//! endpoint. The output carries no indentation and a fixed element order, so
//! identical inputs always yield byte-identical documents.

use std::fmt::Display;
use std::io::Write;

use chrono::{DateTime, FixedOffset, SecondsFormat};
use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};

use crate::error::TravelineError;

/// SIRI protocol version sent on the root element
pub const SIRI_VERSION: &str = "1.0";

/// Default SIRI namespace
pub const SIRI_NAMESPACE: &str = "http://www.siri.org.uk/";

/// Build a `StopMonitoringRequest` for a single stop
///
/// `correlation_id` is embedded as the message identifier and `stop_code` as
/// the monitoring reference. Both are written as escaped element text. The
/// timestamp is rendered as RFC3339 with whole seconds, keeping its offset.
///
/// # Errors
///
/// Returns [`TravelineError::InvalidStopCode`] for an empty stop code and
/// [`TravelineError::Build`] if the document cannot be written.
pub fn build_stop_monitoring_request(
    requestor_ref: &str,
    correlation_id: &str,
    stop_code: &str,
    when: &DateTime<FixedOffset>,
) -> Result<String, TravelineError> {
    if stop_code.is_empty() {
        return Err(TravelineError::InvalidStopCode(stop_code.to_string()));
    }

    let timestamp = when.to_rfc3339_opts(SecondsFormat::Secs, true);
    let mut writer = Writer::new(Vec::new());

    let root = BytesStart::new("Siri")
        .with_attributes([("version", SIRI_VERSION), ("xmlns", SIRI_NAMESPACE)]);
    writer
        .write_event(Event::Start(root))
        .map_err(build_error)?;
    write_start(&mut writer, "ServiceRequest")?;
    write_text_element(&mut writer, "RequestTimestamp", &timestamp)?;
    write_text_element(&mut writer, "RequestorRef", requestor_ref)?;
    write_start(&mut writer, "StopMonitoringRequest")?;
    write_text_element(&mut writer, "RequestTimestamp", &timestamp)?;
    write_text_element(&mut writer, "MessageIdentifier", correlation_id)?;
    write_text_element(&mut writer, "MonitoringRef", stop_code)?;
    write_end(&mut writer, "StopMonitoringRequest")?;
    write_end(&mut writer, "ServiceRequest")?;
    write_end(&mut writer, "Siri")?;

    String::from_utf8(writer.into_inner()).map_err(build_error)
}

fn write_start<W: Write>(writer: &mut Writer<W>, name: &str) -> Result<(), TravelineError> {
    writer
        .write_event(Event::Start(BytesStart::new(name)))
        .map_err(build_error)
}

fn write_end<W: Write>(writer: &mut Writer<W>, name: &str) -> Result<(), TravelineError> {
    writer
        .write_event(Event::End(BytesEnd::new(name)))
        .map_err(build_error)
}

fn write_text_element<W: Write>(
    writer: &mut Writer<W>,
    name: &str,
    text: &str,
) -> Result<(), TravelineError> {
    write_start(writer, name)?;
    writer
        .write_event(Event::Text(BytesText::new(text)))
        .map_err(build_error)?;
    write_end(writer, name)
}

fn build_error(err: impl Display) -> TravelineError {
    TravelineError::Build(err.to_string())
}
