//! End-to-end slide context assembly.

mod common;

use common::{bullet, numbered, para, MockHost, PptxBuilder};
use std::time::Duration;
use unslide::render::{to_json, JsonFormat};
use unslide::{
    ChatSession, ExtractOptions, HostApp, MatchKind, SessionConfig, SlideContextAssembler,
};

async fn render(host: &MockHost) -> String {
    SlideContextAssembler::new(ExtractOptions::default())
        .assemble_text(host)
        .await
}

#[tokio::test]
async fn test_full_context_with_lists() {
    let data = PptxBuilder::new()
        .title("Quarterly Review")
        .slide(1, &[para("Cover")])
        .slide(
            2,
            &[para("Agenda"), bullet("• foo", 0), numbered("Collect data", 1)],
        )
        .build();
    let host = MockHost::new(data).with_slide_index(2);

    assert_eq!(
        render(&host).await,
        "## Presentation Title: Quarterly Review\n\
         ## Current Slide: 2\n\n\
         ## Slide Content:\nAgenda\n- foo\n  1. Collect data\n"
    );
}

#[tokio::test]
async fn test_previous_slide_is_not_a_confident_match() {
    let data = PptxBuilder::new()
        .slide(1, &[para("First")])
        .slide(2, &[para("Second")])
        .build();
    let host = MockHost::new(data).with_slide_index(3);
    let ctx = SlideContextAssembler::new(ExtractOptions::default())
        .assemble(&host)
        .await;

    let slide = ctx.slide.clone().unwrap();
    assert_eq!(slide.path, "ppt/slides/slide2.xml");
    assert_eq!(slide.kind, MatchKind::Adjacent);
    assert!(!slide.is_confident());
    assert_eq!(
        unslide::render::to_markdown(&ctx),
        "## Current Slide: 3\n\n## Slide Content:\nSecond\n"
    );
}

#[tokio::test]
async fn test_missing_core_properties_omit_title() {
    let data = PptxBuilder::new().slide(1, &[para("Only")]).build();
    let md = render(&MockHost::new(data).with_slide_index(1)).await;
    assert!(!md.contains("## Presentation Title:"));
    assert_eq!(md, "## Current Slide: 1\n\n## Slide Content:\nOnly\n");
}

#[tokio::test]
async fn test_package_title_wins_over_host_title() {
    let data = PptxBuilder::new()
        .title("From Package")
        .slide(1, &[para("x")])
        .build();
    let md = render(&MockHost::new(data).with_title("From Host")).await;
    assert!(md.starts_with("## Presentation Title: From Package\n"));

    let data = PptxBuilder::new().slide(1, &[para("x")]).build();
    let md = render(&MockHost::new(data).with_title("From Host")).await;
    assert!(md.starts_with("## Presentation Title: From Host\n"));
}

#[tokio::test]
async fn test_slide_without_paragraphs_reports_notice() {
    let data = PptxBuilder::new().slide(1, &[]).build();
    let md = render(&MockHost::new(data).with_slide_index(1)).await;
    assert_eq!(md, "## Current Slide: 1\n\nCould not find slide XML data.\n");
}

#[tokio::test]
async fn test_host_fallback_drops_repeated_headers() {
    let data = PptxBuilder::new().title("Deck").slide(1, &[]).build();
    let host = MockHost::new(data)
        .with_slide_index(1)
        .with_fallback_text("Presentation Title: Deck\nCurrent Slide: 1\nSpeaker cue");
    assert_eq!(
        render(&host).await,
        "## Presentation Title: Deck\n## Current Slide: 1\n\nCould not find slide XML data.\nSpeaker cue\n"
    );
}

#[tokio::test]
async fn test_host_fallback_can_be_disabled() {
    let data = PptxBuilder::new().slide(1, &[]).build();
    let host = MockHost::new(data)
        .with_slide_index(1)
        .with_fallback_text("ignored");
    let md = SlideContextAssembler::new(ExtractOptions::default().with_host_fallback(false))
        .assemble_text(&host)
        .await;
    assert!(!md.contains("ignored"));
}

#[tokio::test]
async fn test_selected_text_and_view_index() {
    let data = PptxBuilder::new()
        .slide(1, &[para("One")])
        .slide(2, &[para("Two")])
        .build();
    let host = MockHost::new(data)
        .with_view_index(2)
        .with_selected_text("Two");
    assert_eq!(
        render(&host).await,
        "## Current Slide: 2\n\n## Selected Text: Two\n## Slide Content:\nTwo\n"
    );
}

#[tokio::test]
async fn test_header_follows_view_and_lookup_follows_selection() {
    let data = PptxBuilder::new()
        .slide(1, &[para("One")])
        .slide(2, &[para("Two")])
        .build();
    let host = MockHost::new(data).with_slide_index(1).with_view_index(2);
    assert_eq!(render(&host).await, "## Current Slide: 2\n\n## Slide Content:\nOne\n");
}

#[tokio::test]
async fn test_zero_index_counts_as_unknown() {
    let data = PptxBuilder::new()
        .slide(1, &[para("One")])
        .slide(2, &[para("Two")])
        .build();

    let md = render(&MockHost::new(data.clone()).with_slide_index(0)).await;
    assert_eq!(md, "## Slide Content:\nOne\n");

    let host = MockHost::new(data).with_slide_index(0).with_view_index(2);
    assert_eq!(render(&host).await, "## Current Slide: 2\n\n## Slide Content:\nTwo\n");
}

#[tokio::test]
async fn test_no_slide_index_uses_first_slide() {
    let data = PptxBuilder::new()
        .slide(1, &[para("Opening")])
        .slide(2, &[para("Later")])
        .build();
    let ctx = SlideContextAssembler::new(ExtractOptions::default())
        .assemble(&MockHost::new(data))
        .await;
    assert_eq!(ctx.slide_index, None);
    assert_eq!(ctx.slide.unwrap().kind, MatchKind::Default);
    assert_eq!(ctx.content.as_deref(), Some("Opening"));
}

#[tokio::test]
async fn test_first_available_slide_when_numbering_is_sparse() {
    let data = PptxBuilder::new()
        .slide(7, &[para("Seventh")])
        .slide(9, &[para("Ninth")])
        .build();
    let ctx = SlideContextAssembler::new(ExtractOptions::default())
        .assemble(&MockHost::new(data).with_slide_index(2))
        .await;
    let slide = ctx.slide.clone().unwrap();
    assert_eq!(slide.kind, MatchKind::FirstAvailable);
    assert_eq!(ctx.content.as_deref(), Some("Seventh"));
}

#[tokio::test]
async fn test_json_rendering() {
    let data = PptxBuilder::new().title("Deck").slide(1, &[para("Hi")]).build();
    let ctx = SlideContextAssembler::new(ExtractOptions::default())
        .assemble(&MockHost::new(data).with_slide_index(1))
        .await;
    let json: serde_json::Value =
        serde_json::from_str(&to_json(&ctx, JsonFormat::Pretty).unwrap()).unwrap();
    assert_eq!(json["title"], "Deck");
    assert_eq!(json["slide"]["kind"], "exact");
    assert_eq!(json["content"], "Hi");
}

#[tokio::test]
async fn test_session_serializes_context_requests() {
    let data = PptxBuilder::new()
        .title("Deck")
        .slide(1, &[para("Hello")])
        .build();
    let host = MockHost::new(data)
        .with_slide_index(1)
        .with_delay(Duration::from_millis(2));
    let assembler = SlideContextAssembler::new(ExtractOptions::default().with_slice_size(256));
    let session =
        ChatSession::with_assembler(SessionConfig::for_host(HostApp::PowerPoint), assembler);

    let (first, second) = tokio::join!(
        session.attach_document_context(&host),
        session.attach_document_context(&host)
    );

    assert_eq!(first, second);
    assert!(first.contains("Hello"));
    assert_eq!(host.stats.opens(), 2);
    assert_eq!(host.stats.max_active(), 1);
    assert_eq!(host.stats.closes(), 2);
}

#[tokio::test]
async fn test_prompt_with_attached_slide() {
    let data = PptxBuilder::new().slide(1, &[para("Pricing")]).build();
    let host = MockHost::new(data).with_slide_index(1);
    let mut session = ChatSession::new(SessionConfig::for_host(HostApp::PowerPoint));

    let context = session.attach_document_context(&host).await;
    session.push_user("Make this punchier");
    let prompt = session.format_prompt(Some(context.as_str()));

    assert!(prompt.starts_with("System: "));
    assert!(prompt.contains("User: Make this punchier\n"));
    assert!(prompt.ends_with(
        "\n# Attached slide:\n## Current Slide: 1\n\n## Slide Content:\nPricing\n\n\n"
    ));
}
