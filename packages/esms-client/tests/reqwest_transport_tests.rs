//! Dispatch over the real `reqwest` transport against a local listener.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use esms_client::{EsmsClient, EsmsConfig, EsmsError, ReqwestTransport};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Serve one request with `status` and `body`, returning the request line.
async fn serve_once(status: &'static str, body: &'static str) -> (SocketAddr, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();

        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }

        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.unwrap();

        let request = String::from_utf8_lossy(&request).into_owned();
        request.lines().next().unwrap_or_default().to_string()
    });

    (addr, handle)
}

fn config_for(addr: SocketAddr) -> EsmsConfig {
    EsmsConfig::new("api", "secret").with_endpoint(format!("http://{}/send", addr))
}

#[tokio::test]
async fn get_carries_all_query_params_and_reads_body() {
    let (addr, server) = serve_once("200 OK", r#"{"CodeResult": "100", "SMSID": "abc123"}"#).await;
    let client = EsmsClient::new(config_for(addr).with_timeout(Duration::from_secs(5))).unwrap();

    let dispatch = client.send_otp("0976162652").await.unwrap();
    let request_line = server.await.unwrap();

    assert_eq!(dispatch.status, 200);
    assert_eq!(dispatch.body.code_result(), Some("100"));
    assert_eq!(dispatch.body.sms_id(), Some("abc123"));
    assert_eq!(
        request_line,
        format!(
            "GET /send?Phone=0976162652&Content=Ma+OTP+cua+ban+la+{}&ApiKey=api&SecretKey=secret&BrandName=BaoTriXeMay&SmsType=2 HTTP/1.1",
            dispatch.otp_code
        )
    );
}

#[tokio::test]
async fn non_success_status_reaches_caller() {
    let (addr, server) = serve_once(
        "503 Service Unavailable",
        r#"{"CodeResult": "99", "ErrorMessage": "Busy"}"#,
    )
    .await;
    let transport = ReqwestTransport::with_client(reqwest::Client::new());
    let client = EsmsClient::with_transport(config_for(addr), Arc::new(transport));

    let dispatch = client.send_otp("0976162652").await.unwrap();
    server.await.unwrap();

    assert_eq!(dispatch.status, 503);
    assert_eq!(dispatch.body.error_message(), Some("Busy"));
    assert!(!dispatch.body.is_accepted());
}

#[tokio::test]
async fn closed_port_is_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = EsmsClient::new(config_for(addr)).unwrap();
    let err = client.send_otp("0976162652").await.unwrap_err();

    assert!(matches!(err, EsmsError::Transport(_)));
    let source = std::error::Error::source(&err).expect("transport source");
    assert!(source.downcast_ref::<reqwest::Error>().is_some());
}
