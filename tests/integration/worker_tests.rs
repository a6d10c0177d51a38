use codeshrink::infrastructure::worker::*;
use codeshrink::{MinificationOptions, SupportedLanguage, WorkerClient, WorkerError};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

#[tokio::test]
async fn test_many_requests_in_flight() {
    let client = Arc::new(WorkerClient::spawn());
    let tasks: Vec<_> = (0..16)
        .map(|i| {
            let client = client.clone();
            tokio::spawn(async move {
                let code = format!("{{ \"n\" : {} }}", i);
                let result = client
                    .minify(code, SupportedLanguage::Json, MinificationOptions::default())
                    .await
                    .unwrap();
                (i, result.minified)
            })
        })
        .collect();

    for task in tasks {
        let (i, minified) = task.await.unwrap();
        assert_eq!(minified, format!("{{\"n\":{}}}", i));
    }
    assert_eq!(client.pending_requests(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_silent_worker_times_out_after_thirty_seconds() {
    let (requests, _incoming) = mpsc::channel::<WorkerRequest>(4);
    let (_outgoing, responses) = mpsc::channel::<WorkerResponse>(4);
    let client = WorkerClient::connect(requests, responses);

    let started = tokio::time::Instant::now();
    let err = client
        .minify("a{}", SupportedLanguage::Css, MinificationOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, WorkerError::Timeout { .. }));
    assert!(err.to_string().contains("timed out"));
    assert!(started.elapsed() >= Duration::from_secs(30));
    assert_eq!(REQUEST_TIMEOUT, Duration::from_secs(30));
}

#[test]
fn test_stdio_transport_answers_each_line() {
    let input = concat!(
        r#"{"id":"a","code":"x  =  1","language":"python"}"#,
        "\n",
        r#"{"id":"b","code":"{ bad","language":"json","options":{"level":"aggressive"}}"#,
        "\n",
    );
    let mut output = Vec::new();
    assert_eq!(serve_lines(input.as_bytes(), &mut output).unwrap(), 2);

    let text = String::from_utf8(output).unwrap();
    let responses: Vec<WorkerResponse> = text.lines().map(|l| serde_json::from_str(l).unwrap()).collect();
    assert_eq!(responses[0].id, "a");
    assert!(responses[0].success);
    assert_eq!(responses[1].id, "b");
    assert!(!responses[1].success);
    assert!(responses[1].error.is_some());
}
