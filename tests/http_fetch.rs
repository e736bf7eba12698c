//! HTTP fetcher tests against a local mock server
use ozon_product_parser::{AppConfig, HttpClient, HttpClientConfig, PageFetcher, ParsingService};
use tempfile::TempDir;
use wiremock::matchers::{header, header_exists, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

fn client(cookie_dir: &TempDir) -> HttpClient {
    HttpClient::new(HttpClientConfig {
        timeout_seconds: 5,
        cookie_dir: Some(cookie_dir.path().to_path_buf()),
        ..HttpClientConfig::default()
    })
    .expect("default headers are valid")
}

/// Whole header value, without splitting on commas
fn header_is(request: &Request, name: &str, expected: &str) -> bool {
    request
        .headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        == Some(expected)
}

fn cookie_files(dir: &TempDir) -> usize {
    std::fs::read_dir(dir.path()).unwrap().count()
}

#[tokio::test]
async fn sends_browser_headers() {
    let server = MockServer::start().await;
    let defaults = HttpClientConfig::default();

    Mock::given(method("GET"))
        .and(path("/product/1/"))
        .and(move |request: &Request| {
            header_is(request, "user-agent", &defaults.user_agent)
                && header_is(request, "accept-language", &defaults.accept_language)
                && header_is(request, "accept", &defaults.accept)
        })
        .and(header("referer", "https://www.ozon.ru/"))
        .and(header("upgrade-insecure-requests", "1"))
        .and(header("cache-control", "max-age=0"))
        .and(header_exists("accept-encoding"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<h1>ok</h1>"))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let body = client(&dir)
        .fetch_page(&format!("{}/product/1/", server.uri()))
        .await;

    assert_eq!(body.as_deref(), Some("<h1>ok</h1>"));
}

#[tokio::test]
async fn redirect_cookies_are_sent_on_follow_up() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/product/2/"))
        .respond_with(
            ResponseTemplate::new(302)
                .insert_header("location", "/product/2/final/")
                .insert_header("set-cookie", "abt_data=xyz; Path=/"),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/product/2/final/"))
        .and(header("cookie", "abt_data=xyz"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<h1>Widget</h1>"))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let body = client(&dir)
        .fetch_page(&format!("{}/product/2/", server.uri()))
        .await;

    assert_eq!(body.as_deref(), Some("<h1>Widget</h1>"));
    assert_eq!(cookie_files(&dir), 0);
}

#[tokio::test]
async fn error_status_body_is_still_returned() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/product/3/"))
        .respond_with(ResponseTemplate::new(403).set_body_string("<p>Доступ ограничен</p>"))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let body = client(&dir)
        .fetch_page(&format!("{}/product/3/", server.uri()))
        .await;

    assert_eq!(body.as_deref(), Some("<p>Доступ ограничен</p>"));
}

#[tokio::test]
async fn invalid_utf8_is_replaced() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/product/4/"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html; charset=windows-1251")
                .set_body_bytes(vec![b'<', b'p', b'>', 0xC2, 0xE0, b'<', b'/', b'p', b'>']),
        )
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let body = client(&dir)
        .fetch_page(&format!("{}/product/4/", server.uri()))
        .await
        .unwrap();

    assert!(body.starts_with("<p>"));
    assert!(body.contains('\u{FFFD}'));
}

#[tokio::test]
async fn blocked_response_fails_the_pipeline() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/product/777/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html><body><h1>Проверка безопасности</h1></body></html>"),
        )
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut config = AppConfig::default();
    config.site.product_url_template = format!("{}/product/{{sku}}/", server.uri());
    config.http.timeout_seconds = 5;
    config.http.cookie_dir = Some(dir.path().to_path_buf());

    let service = ParsingService::from_config(&config).unwrap();
    let err = service.parse_by_sku("777").await.unwrap_err();

    assert_eq!(err.url(), Some(format!("{}/product/777/", server.uri()).as_str()));
    assert!(err.to_string().contains("Проверка безопасности"));
    assert_eq!(cookie_files(&dir), 0);
}

#[tokio::test]
async fn product_page_is_parsed_over_http() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/product/55/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<h1 data-widget="webProductTitle">Кабель USB-C</h1>
               <div id="section-characteristics">
                 <dl><dt>Тип</dt><dd>Кабель</dd></dl>
                 <dl><dt>Страна-изготовитель</dt><dd>Китай</dd></dl>
               </div>"#,
        ))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut config = AppConfig::default();
    config.site.product_url_template = format!("{}/product/{{sku}}/", server.uri());
    config.http.cookie_dir = Some(dir.path().to_path_buf());

    let record = ParsingService::from_config(&config)
        .unwrap()
        .parse_by_sku("55")
        .await
        .unwrap();

    assert_eq!(record.name.as_deref(), Some("Кабель USB-C"));
    assert_eq!(record.product_type.as_deref(), Some("Кабель"));
    assert_eq!(record.country_of_origin.as_deref(), Some("Китай"));
}
