use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use queuetrack_rs::tracker::Visit;
use queuetrack_rs::{AggregateStats, EventSink, HttpSink, Occupancy, SinkError, TrackId, VisitRecord};
use serde_json::Value;

struct Captured {
    request_line: String,
    content_type: Option<String>,
    body: Value,
}

/// Serve exactly one request, answering with `status`.
fn serve_once(status: &'static str) -> (String, mpsc::Receiver<Captured>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}/updateData/", listener.local_addr().unwrap());
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream.try_clone().unwrap());

        let mut request_line = String::new();
        reader.read_line(&mut request_line).unwrap();

        let mut content_length = 0usize;
        let mut content_type = None;
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).unwrap();
            let line = line.trim_end();
            if line.is_empty() {
                break;
            }
            if let Some((name, value)) = line.split_once(':') {
                match name.trim().to_ascii_lowercase().as_str() {
                    "content-length" => content_length = value.trim().parse().unwrap(),
                    "content-type" => content_type = Some(value.trim().to_string()),
                    _ => {}
                }
            }
        }

        let mut body = vec![0u8; content_length];
        reader.read_exact(&mut body).unwrap();

        let mut stream = stream;
        write!(
            stream,
            "HTTP/1.1 {status}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
        )
        .unwrap();
        stream.flush().unwrap();

        let _ = tx.send(Captured {
            request_line: request_line.trim_end().to_string(),
            content_type,
            body: serde_json::from_slice(&body).unwrap(),
        });
    });

    (url, rx)
}

fn sample_visit() -> VisitRecord {
    let entry = Utc.with_ymd_and_hms(2025, 3, 1, 9, 30, 0).unwrap();
    let visit = Visit {
        entry,
        exit: entry + chrono::Duration::seconds(42),
        dwell: Duration::from_secs(42),
    };
    VisitRecord::new(TrackId(5), &visit, false)
}

#[test]
fn test_visit_is_posted_as_json() {
    let (url, rx) = serve_once("200 OK");
    let sink = HttpSink::new(url, "http://127.0.0.1:9/unused", Duration::from_secs(5));

    sink.report_visit(&sample_visit()).unwrap();

    let captured = rx.recv_timeout(Duration::from_secs(5)).unwrap();
    assert_eq!(captured.request_line, "POST /updateData/ HTTP/1.1");
    assert_eq!(captured.content_type.as_deref(), Some("application/json"));
    assert_eq!(captured.body["id"], 5);
    assert_eq!(captured.body["waitTime"], 42.0);
    assert_eq!(captured.body["alert"], 0);
    assert_eq!(captured.body["entryTime"], "2025-03-01T09:30:00Z");
    assert_eq!(captured.body["exitTime"], "2025-03-01T09:30:42Z");
}

#[test]
fn test_snapshot_goes_to_stats_url() {
    let (url, rx) = serve_once("200 OK");
    let sink = HttpSink::new("http://127.0.0.1:9/unused", url, Duration::from_secs(5));

    let mut occupancy = Occupancy::new(1);
    occupancy.record_entry();
    let stats = AggregateStats::collect(&occupancy, 0.0, 1, Utc::now());
    sink.publish_snapshot(&stats).unwrap();

    let captured = rx.recv_timeout(Duration::from_secs(5)).unwrap();
    assert_eq!(captured.body["inside"], 1);
    assert_eq!(captured.body["is_crowded"], true);
    assert_eq!(captured.body["max_limit"], 1);
}

#[test]
fn test_error_status_is_reported() {
    let (url, _rx) = serve_once("503 Service Unavailable");
    let sink = HttpSink::new(url, "http://127.0.0.1:9/unused", Duration::from_secs(5));

    match sink.report_visit(&sample_visit()) {
        Err(SinkError::Status { code, .. }) => assert_eq!(code, 503),
        other => panic!("expected status error, got {other:?}"),
    }
}

#[test]
fn test_unreachable_endpoint_is_a_transport_error() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let url = format!("http://127.0.0.1:{port}/updateData/");
    let sink = HttpSink::new(url.clone(), url, Duration::from_secs(2));

    assert!(matches!(
        sink.report_visit(&sample_visit()),
        Err(SinkError::Transport { .. })
    ));
}
