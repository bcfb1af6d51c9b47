//! Integration tests for the Traveline client (wiremock-based)

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use wiremock::matchers::{basic_auth, body_string, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use integration_traveline::{HttpTravelineClient, TravelineApi, TravelineConfig, TravelineError};

const SIRI_PATH: &str = "/nextbuses/1.0/1";

fn config_for_mock(base_url: &str) -> TravelineConfig {
    TravelineConfig::for_testing().with_endpoint(format!("{base_url}{SIRI_PATH}"))
}

const fn sample_delivery_xml() -> &'static str {
    r#"<Siri xmlns="http://www.siri.org.uk/" version="1.0">
        <ServiceDelivery>
            <ResponseTimestamp>2020-03-30T00:26:39.911+01:00</ResponseTimestamp>
            <StopMonitoringDelivery version="1.0">
                <MonitoredStopVisit>
                    <MonitoringRef>020035811</MonitoringRef>
                    <MonitoredVehicleJourney>
                        <VehicleMode>bus</VehicleMode>
                        <PublishedLineName>42</PublishedLineName>
                        <DirectionName>Toddington, The Green</DirectionName>
                        <OperatorRef>153</OperatorRef>
                        <MonitoredCall>
                            <AimedDepartureTime>2014-07-01T15:09:00.000+01:00</AimedDepartureTime>
                        </MonitoredCall>
                    </MonitoredVehicleJourney>
                </MonitoredStopVisit>
            </StopMonitoringDelivery>
        </ServiceDelivery>
    </Siri>"#
}

#[tokio::test]
async fn test_send_success() {
    let server = MockServer::start().await;
    let request = "<Siri><ServiceRequest></ServiceRequest></Siri>";

    Mock::given(method("POST"))
        .and(path(SIRI_PATH))
        .and(header("content-type", "application/xml"))
        .and(basic_auth("TravelineAPI999", "letmein"))
        .and(body_string(request))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<Siri><ServiceDelivery></ServiceDelivery></Siri>"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpTravelineClient::new(&config_for_mock(&server.uri())).unwrap();
    let response = client.send(request).await.unwrap();

    assert_eq!(response, "<Siri><ServiceDelivery></ServiceDelivery></Siri>");
}

#[tokio::test]
async fn test_send_unauthorized_keeps_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(SIRI_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_string("Invalid user credentials"))
        .mount(&server)
        .await;

    let client = HttpTravelineClient::new(&config_for_mock(&server.uri())).unwrap();
    let err = client
        .send("<Siri><ServiceRequest></ServiceRequest></Siri>")
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "error status from API: 401");
    match err {
        TravelineError::NonSuccessStatus { status, body } => {
            assert_eq!(status, 401);
            assert_eq!(body, "Invalid user credentials");
        },
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_send_server_error_is_retryable() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(SIRI_PATH))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = HttpTravelineClient::new(&config_for_mock(&server.uri())).unwrap();
    let err = client.send("<Siri/>").await.unwrap_err();

    assert!(matches!(
        err,
        TravelineError::NonSuccessStatus { status: 503, .. }
    ));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_send_connection_failure() {
    let config = TravelineConfig::for_testing().with_endpoint("http://127.0.0.1:1/nextbuses/1.0/1");
    let client = HttpTravelineClient::new(&config).unwrap();

    let err = client.send("").await.unwrap_err();
    assert!(matches!(err, TravelineError::Transport(_)));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_send_truncated_body() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    // Promises more bytes than it sends, then hangs up
    let responder = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut received = Vec::new();
        let mut buf = [0_u8; 1024];
        while !received.ends_with(b"<Siri/>") {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            received.extend_from_slice(&buf[..n]);
        }
        socket
            .write_all(
                b"HTTP/1.1 200 OK\r\nContent-Type: application/xml\r\nContent-Length: 100\r\n\r\n<Siri>",
            )
            .await
            .unwrap();
        socket.shutdown().await.unwrap();
    });

    let client = HttpTravelineClient::new(&config_for_mock(&format!("http://{addr}"))).unwrap();
    let err = client.send("<Siri/>").await.unwrap_err();

    assert!(matches!(err, TravelineError::BodyRead(_)));
    assert!(err.is_retryable());
    responder.await.unwrap();
}

#[tokio::test]
async fn test_full_round_trip() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(SIRI_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(sample_delivery_xml()))
        .mount(&server)
        .await;

    let client = HttpTravelineClient::new(&config_for_mock(&server.uri())).unwrap();
    let when = chrono::DateTime::parse_from_rfc3339("2020-03-30T12:34:56+01:00").unwrap();

    let request = client
        .build_service_request("ab7c1e9b-d06f-44cc-b190-4d36fb564386", "020035811", &when)
        .unwrap();
    let response = client.send(&request).await.unwrap();
    let journey = client.parse_service_delivery(&response).unwrap();

    assert_eq!(journey.published_line_name, "42");
    assert_eq!(journey.direction_name, "Toddington, The Green");
    assert_eq!(journey.aimed_departure_time, "2014-07-01T15:09:00.000+01:00");
    assert!(journey.expected_departure_time.is_none());

    let received = server.received_requests().await.unwrap();
    assert_eq!(received.len(), 1);
    let sent = String::from_utf8(received[0].body.clone()).unwrap();
    assert!(sent.contains("<MonitoringRef>020035811</MonitoringRef>"));
}
