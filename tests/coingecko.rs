use std::{sync::Arc, time::Duration};

use ireina_ticker::{
    page::TICKER_CONTENT_ID, Asset, CoinGeckoPriceSource, Page, Placeholder, PriceSource,
    RetryPolicy, TickerWidget, WidgetConfig,
};
use reqwest::Client;
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpListener,
    sync::Mutex,
    task::JoinHandle,
};

/// Accepts a single connection, answers it with `status` and `body`, and
/// hands back the raw request head.
async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let endpoint = format!("http://{}/api/v3", listener.local_addr().unwrap());
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
        String::from_utf8_lossy(&request).into_owned()
    });
    (endpoint, handle)
}

fn source(endpoint: String) -> CoinGeckoPriceSource {
    let client = Client::builder()
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap();
    CoinGeckoPriceSource::new(Arc::new(client), endpoint)
}

fn ids() -> Vec<String> {
    vec!["bitcoin".to_owned(), "ethereum".to_owned()]
}

#[tokio::test]
async fn parses_snapshot_and_disables_caching() {
    let (endpoint, server) = serve_once(
        "200 OK",
        r#"{"bitcoin":{"usd":50000,"usd_24h_change":-3.2},"ethereum":{"usd":2500.5}}"#,
    )
    .await;

    let snapshot = source(endpoint).fetch_prices(&ids()).await.unwrap();
    assert_eq!(snapshot.len(), 2);
    assert_eq!(snapshot["bitcoin"]["usd"], 50000);

    let request = server.await.unwrap().to_ascii_lowercase();
    assert!(request.starts_with(
        "get /api/v3/simple/price?ids=bitcoin,ethereum&vs_currencies=usd&include_24hr_change=true http/1.1"
    ));
    assert!(request.contains("cache-control: no-cache"));
    assert!(request.contains("pragma: no-cache"));
}

#[tokio::test]
async fn server_error_yields_none() {
    let (endpoint, _server) = serve_once("500 Internal Server Error", r#"{"error":"boom"}"#).await;
    assert!(source(endpoint).fetch_prices(&ids()).await.is_none());
}

#[tokio::test]
async fn rate_limit_yields_none() {
    let (endpoint, _server) = serve_once("429 Too Many Requests", "{}").await;
    assert!(source(endpoint).fetch_prices(&ids()).await.is_none());
}

#[tokio::test]
async fn invalid_json_yields_none() {
    let (endpoint, _server) = serve_once("200 OK", "<html>not json</html>").await;
    assert!(source(endpoint).fetch_prices(&ids()).await.is_none());
}

#[tokio::test]
async fn non_object_json_yields_none() {
    let (endpoint, _server) = serve_once("200 OK", "[1,2,3]").await;
    assert!(source(endpoint).fetch_prices(&ids()).await.is_none());
}

#[tokio::test]
async fn connection_refused_yields_none() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let endpoint = format!("http://{}/api/v3", listener.local_addr().unwrap());
    drop(listener);
    assert!(source(endpoint).fetch_prices(&ids()).await.is_none());
}

#[tokio::test]
async fn widget_shows_placeholder_when_api_is_down() {
    let (endpoint, _server) = serve_once("503 Service Unavailable", "").await;
    let page = Arc::new(Mutex::new(Page::new("test")));
    let widget = TickerWidget::new(
        page.clone(),
        Arc::new(source(endpoint)),
        vec![
            Asset::new("bitcoin", "BTC", "Bitcoin"),
            Asset::new("ethereum", "ETH", "Ethereum"),
        ],
        WidgetConfig {
            retry: RetryPolicy::none(),
            ..WidgetConfig::default()
        },
    );
    widget.mount().await;

    assert_eq!(widget.refresh_once().await, 0);
    let page = page.lock().await;
    let html = &page.get_element_by_id(TICKER_CONTENT_ID).unwrap().inner_html;
    assert_eq!(html, Placeholder::Unavailable.html());
    assert!(page.render().contains("API UNAVAILABLE"));
}

#[tokio::test]
async fn widget_renders_live_prices() {
    let (endpoint, _server) = serve_once(
        "200 OK",
        r#"{"bitcoin":{"usd":50000,"usd_24h_change":-3.2},"ethereum":{"usd":2500,"usd_24h_change":1.234}}"#,
    )
    .await;
    let page = Arc::new(Mutex::new(Page::new("test")));
    let widget = TickerWidget::new(
        page.clone(),
        Arc::new(source(endpoint)),
        vec![
            Asset::new("bitcoin", "BTC", "Bitcoin"),
            Asset::new("ethereum", "ETH", "Ethereum"),
        ],
        WidgetConfig {
            copies: 2,
            retry: RetryPolicy::none(),
            ..WidgetConfig::default()
        },
    );
    widget.mount().await;

    assert_eq!(widget.refresh_once().await, 2);
    let page = page.lock().await;
    let html = &page.get_element_by_id(TICKER_CONTENT_ID).unwrap().inner_html;
    assert_eq!(html.matches(r#"<div class="ticker-price">$50.0K</div>"#).count(), 2);
    assert_eq!(html.matches(r#"<div class="ticker-change positive">▲ 1.23%</div>"#).count(), 2);
}
