//! Extraction of situation × stop rows from a SIRI-SX document.

use roxmltree::{Document, Node};
use tracing::debug;

use crate::error::PipelineError;
use crate::model::SituationStopRecord;

pub const SIRI_NS: &str = "http://www.siri.org.uk/siri";

fn is_siri(node: &Node, name: &str) -> bool {
    node.is_element()
        && node.tag_name().name() == name
        && node.tag_name().namespace() == Some(SIRI_NS)
}

fn child<'a, 'i>(node: Node<'a, 'i>, name: &str) -> Option<Node<'a, 'i>> {
    node.children().find(|n| is_siri(n, name))
}

/// First match in document order below `node`, at any depth.
fn descendant<'a, 'i>(node: Node<'a, 'i>, name: &str) -> Option<Node<'a, 'i>> {
    node.descendants()
        .skip(1)
        .find(|n| is_siri(n, name))
}

/// Leading text of an element; an element without text yields an empty string.
fn text_of(node: Option<Node>) -> Option<String> {
    node.map(|n| n.text().unwrap_or_default().to_string())
}

/// Parses a SIRI-SX document and flattens it into one record per
/// situation × affected stop.
///
/// Situations without any `AffectedStopPoint` produce no records.
///
/// # Errors
///
/// Returns an error if `bytes` is not UTF-8 or not well-formed XML.
pub fn parse_situations(bytes: &[u8]) -> Result<Vec<SituationStopRecord>, PipelineError> {
    let text = std::str::from_utf8(bytes)?;
    let doc = Document::parse(text)?;
    Ok(extract(&doc))
}

pub fn extract(doc: &Document) -> Vec<SituationStopRecord> {
    let root = doc.root_element();
    let mut records = Vec::new();
    let mut situations = 0usize;

    for situation in root
        .descendants()
        .skip(1)
        .filter(|n| is_siri(n, "PtSituationElement"))
    {
        situations += 1;

        let situation_id = text_of(child(situation, "SituationNumber"));
        let operator_code = text_of(descendant(situation, "OperatorRef"));
        let summary = text_of(child(situation, "Summary"));
        let description = text_of(child(situation, "Description")).unwrap_or_default();
        let start_time = text_of(descendant(situation, "StartTime"));
        let end_time = text_of(descendant(situation, "EndTime"));
        let planned = text_of(child(situation, "Planned"));
        let severity = text_of(descendant(situation, "Severity"));

        let before = records.len();
        for stop in situation
            .descendants()
            .filter(|n| is_siri(n, "AffectedStopPoint"))
        {
            records.push(SituationStopRecord {
                situation_id: situation_id.clone(),
                operator_code: operator_code.clone(),
                summary: summary.clone(),
                description: description.clone(),
                start_time: start_time.clone(),
                end_time: end_time.clone(),
                planned: planned.clone(),
                severity: severity.clone(),
                stop_name: text_of(child(stop, "StopPointName")),
                latitude: text_of(descendant(stop, "Latitude")),
                longitude: text_of(descendant(stop, "Longitude")),
            });
        }

        if records.len() == before {
            debug!(situation = ?situation_id, "Situation has no affected stops, skipping");
        }
    }

    debug!(situations, rows = records.len(), "Extracted situation rows");
    records
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wrap(body: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<Siri xmlns="http://www.siri.org.uk/siri" version="2.0">
  <ServiceDelivery>
    <SituationExchangeDelivery>
      <Situations>{body}</Situations>
    </SituationExchangeDelivery>
  </ServiceDelivery>
</Siri>"#
        )
    }

    #[test]
    fn test_parse_one_situation_two_stops() {
        let xml = wrap(
            r#"<PtSituationElement>
                <SituationNumber>S1</SituationNumber>
                <Source><SourceType>feed</SourceType></Source>
                <ValidityPeriod>
                  <StartTime>2024-01-01T10:00:00Z</StartTime>
                  <EndTime>2024-01-01T12:30:00Z</EndTime>
                </ValidityPeriod>
                <Planned>true</Planned>
                <Summary>Road closure on Main St</Summary>
                <Description>Main St road closed for resurfacing</Description>
                <Consequences><Consequence><Severity>slight</Severity></Consequence></Consequences>
                <Affects>
                  <Operators><AffectedOperator><OperatorRef>FLDS</OperatorRef></AffectedOperator></Operators>
                  <StopPoints>
                    <AffectedStopPoint>
                      <StopPointName>Stop A</StopPointName>
                      <Location><Longitude>-1.5</Longitude><Latitude>53.0</Latitude></Location>
                    </AffectedStopPoint>
                    <AffectedStopPoint>
                      <StopPointName>Stop B</StopPointName>
                      <Location><Longitude>-1.6</Longitude><Latitude>54.0</Latitude></Location>
                    </AffectedStopPoint>
                  </StopPoints>
                </Affects>
              </PtSituationElement>"#,
        );

        let rows = parse_situations(xml.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);

        let first = &rows[0];
        assert_eq!(first.situation_id.as_deref(), Some("S1"));
        assert_eq!(first.operator_code.as_deref(), Some("FLDS"));
        assert_eq!(first.summary.as_deref(), Some("Road closure on Main St"));
        assert_eq!(first.description, "Main St road closed for resurfacing");
        assert_eq!(first.start_time.as_deref(), Some("2024-01-01T10:00:00Z"));
        assert_eq!(first.end_time.as_deref(), Some("2024-01-01T12:30:00Z"));
        assert_eq!(first.planned.as_deref(), Some("true"));
        assert_eq!(first.severity.as_deref(), Some("slight"));
        assert_eq!(first.stop_name.as_deref(), Some("Stop A"));
        assert_eq!(first.latitude.as_deref(), Some("53.0"));
        assert_eq!(first.longitude.as_deref(), Some("-1.5"));

        assert_eq!(rows[1].stop_name.as_deref(), Some("Stop B"));
        assert_eq!(rows[1].situation_id.as_deref(), Some("S1"));
    }

    #[test]
    fn test_missing_fields_are_none() {
        let xml = wrap(
            r#"<PtSituationElement>
                <Affects><StopPoints><AffectedStopPoint/></StopPoints></Affects>
              </PtSituationElement>"#,
        );

        let rows = parse_situations(xml.as_bytes()).unwrap();
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.situation_id, None);
        assert_eq!(row.operator_code, None);
        assert_eq!(row.summary, None);
        assert_eq!(row.description, "");
        assert_eq!(row.end_time, None);
        assert_eq!(row.stop_name, None);
        assert_eq!(row.latitude, None);
    }

    #[test]
    fn test_situation_without_stops_yields_nothing() {
        let xml = wrap(
            r#"<PtSituationElement>
                <SituationNumber>S-lonely</SituationNumber>
                <Summary>Operator notice</Summary>
              </PtSituationElement>"#,
        );

        let rows = parse_situations(xml.as_bytes()).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_summary_must_be_direct_child() {
        let xml = wrap(
            r#"<PtSituationElement>
                <SituationNumber>S2</SituationNumber>
                <Consequences><Consequence><Advice><Summary>nested</Summary></Advice></Consequence></Consequences>
                <Affects><StopPoints><AffectedStopPoint><StopPointName>X</StopPointName></AffectedStopPoint></StopPoints></Affects>
              </PtSituationElement>"#,
        );

        let rows = parse_situations(xml.as_bytes()).unwrap();
        assert_eq!(rows[0].summary, None);
    }

    #[test]
    fn test_foreign_namespace_is_ignored() {
        let xml = r#"<Siri xmlns="http://example.com/other">
            <PtSituationElement>
              <SituationNumber>S3</SituationNumber>
              <AffectedStopPoint><StopPointName>X</StopPointName></AffectedStopPoint>
            </PtSituationElement>
          </Siri>"#;

        let rows = parse_situations(xml.as_bytes()).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_malformed_document_is_a_parse_error() {
        let result = parse_situations(b"<Siri><PtSituationElement></Siri>");
        assert!(matches!(result, Err(PipelineError::ParseError(_))));
    }

    #[test]
    fn test_invalid_utf8_is_an_encoding_error() {
        let result = parse_situations(&[0x3C, 0xFF, 0xFE, 0x3E]);
        assert!(matches!(result, Err(PipelineError::Encoding(_))));
    }
}
