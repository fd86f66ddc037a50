use burrow::handlers::*;
use std::fs;
use tempfile::NamedTempFile;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

fn sample_report() -> CrawlReport {
    CrawlReport {
        root: "https://example.com/".to_string(),
        depth: 2,
        links: vec![
            "https://example.com/about".to_string(),
            "https://example.com/blog".to_string(),
        ],
    }
}

#[test]
fn test_text_report_layout() {
    let report = generate_text_report(&sample_report().links);
    assert_eq!(
        report,
        "Links\n-----\n001. https://example.com/about\n002. https://example.com/blog\n\n"
    );
}

#[test]
fn test_text_report_without_links() {
    assert_eq!(generate_text_report(&[]), "Links\n-----\n\n");
}

#[test]
fn test_text_report_ordinals_are_zero_padded() {
    let links: Vec<String> = (1..=120)
        .map(|i| format!("https://example.com/{}", i))
        .collect();
    let report = generate_text_report(&links);

    assert!(report.contains("\n009. https://example.com/9\n"));
    assert!(report.contains("\n010. https://example.com/10\n"));
    assert!(report.contains("\n120. https://example.com/120\n"));
}

#[test]
fn test_json_report_fields() -> Result<(), Box<dyn std::error::Error>> {
    let rendered = render_report(&sample_report(), ReportFormat::Json)?;
    let value: serde_json::Value = serde_json::from_str(&rendered)?;

    assert_eq!(value["root"], "https://example.com/");
    assert_eq!(value["depth"], 2);
    assert_eq!(value["links"][1], "https://example.com/blog");
    assert!(rendered.ends_with('\n'));
    Ok(())
}

#[test]
fn test_render_text_matches_generator() -> Result<(), Box<dyn std::error::Error>> {
    let report = sample_report();
    assert_eq!(
        render_report(&report, ReportFormat::Text)?,
        generate_text_report(&report.links)
    );
    Ok(())
}

#[test]
fn test_report_format_names() {
    assert_eq!(ReportFormat::from_name("text"), Some(ReportFormat::Text));
    assert_eq!(ReportFormat::from_name("json"), Some(ReportFormat::Json));
    assert_eq!(ReportFormat::from_name("csv"), None);
}

#[test]
fn test_default_options() {
    let options = CrawlOptions::default();
    assert_eq!(options.url, "https://www.example.com/");
    assert_eq!(options.depth, 3);
    assert_eq!(options.format, ReportFormat::Text);
    assert!(options.output.is_none());
}

#[test]
fn test_write_report_to_file() -> Result<(), Box<dyn std::error::Error>> {
    let temp_file = NamedTempFile::new()?;
    let rendered = generate_text_report(&sample_report().links);

    write_report(&rendered, Some(temp_file.path()))?;

    assert_eq!(fs::read_to_string(temp_file.path())?, rendered);
    Ok(())
}

#[test]
fn test_write_report_to_missing_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("no-such-dir").join("report.txt");

    let err = write_report("Links\n", Some(path.as_path())).unwrap_err();
    assert!(err.to_string().contains("Failed to write report"));
}

#[tokio::test]
async fn test_execute_crawl_end_to_end() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<a href="/contact">c</a><a href="/about">a</a><a href="https://example.org/">x</a>"#,
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/about"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"<a href="/team">t</a>"#))
        .mount(&server)
        .await;

    let options = CrawlOptions {
        url: base.clone(),
        depth: 2,
        ..CrawlOptions::default()
    };
    let report = execute_crawl(&options).await.unwrap();

    assert_eq!(report.root, base);
    assert_eq!(report.depth, 2);
    assert_eq!(
        report.links,
        vec![
            format!("{}/about", base),
            format!("{}/contact", base),
            format!("{}/team", base),
        ]
    );
}

#[tokio::test]
async fn test_execute_crawl_rejects_empty_url() {
    let options = CrawlOptions {
        url: String::new(),
        ..CrawlOptions::default()
    };
    let err = execute_crawl(&options).await.unwrap_err();
    assert!(matches!(err, burrow::ScanError::InvalidInput(_)));
}

#[tokio::test]
async fn test_run_crawl_writes_json_file() -> Result<(), Box<dyn std::error::Error>> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"<a href="/only">o</a>"#))
        .mount(&server)
        .await;

    let temp_file = NamedTempFile::new()?;
    let options = CrawlOptions {
        url: server.uri(),
        depth: 0,
        format: ReportFormat::Json,
        output: Some(temp_file.path().to_path_buf()),
        quiet: true,
        ..CrawlOptions::default()
    };

    run_crawl(&options).await?;

    let saved: CrawlReport = serde_json::from_str(&fs::read_to_string(temp_file.path())?)?;
    assert_eq!(saved.links, vec![format!("{}/only", server.uri())]);
    assert_eq!(saved.depth, 0);
    Ok(())
}
