// tests/translator_mymemory.rs
use feed_digest::enrich::{MyMemoryTranslator, TranslateError, Translator};
use mockito::Matcher;
use std::time::Duration;

fn translator(server: &mockito::Server) -> MyMemoryTranslator {
    MyMemoryTranslator::new(format!("{}/get", server.url()), Duration::from_secs(5))
        .expect("client")
}

#[tokio::test]
async fn success_returns_translated_text() {
    let mut server = mockito::Server::new_async().await;
    let m = server
        .mock("GET", "/get")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("q".into(), "Hello world".into()),
            Matcher::UrlEncoded("langpair".into(), "en|zh-CN".into()),
        ]))
        .with_status(200)
        .with_body(r#"{"responseData":{"translatedText":"你好世界","match":1},"responseStatus":200,"responseDetails":""}"#)
        .create_async()
        .await;

    let out = translator(&server)
        .translate("Hello world", "en", "zh-CN")
        .await
        .expect("translated");
    m.assert_async().await;
    assert_eq!(out, "你好世界");
}

#[tokio::test]
async fn contact_email_is_sent_when_configured() {
    let mut server = mockito::Server::new_async().await;
    let m = server
        .mock("GET", "/get")
        .match_query(Matcher::UrlEncoded("de".into(), "ops@example.test".into()))
        .with_status(200)
        .with_body(r#"{"responseData":{"translatedText":"ok"},"responseStatus":"200"}"#)
        .create_async()
        .await;

    let out = translator(&server)
        .with_contact_email(Some("ops@example.test".into()))
        .translate("x", "en", "de")
        .await
        .expect("translated");
    m.assert_async().await;
    assert_eq!(out, "ok");
}

#[tokio::test]
async fn quota_answer_is_rejected() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/get")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"responseData":{"translatedText":"MYMEMORY WARNING"},"responseStatus":429,"responseDetails":"quota"}"#)
        .create_async()
        .await;

    let err = translator(&server)
        .translate("Hello", "en", "zh-CN")
        .await
        .unwrap_err();
    assert!(matches!(err, TranslateError::Rejected { .. }), "{err}");
    assert!(err.to_string().contains("quota"));
}

#[tokio::test]
async fn http_error_and_bad_json_fail() {
    let mut server = mockito::Server::new_async().await;
    let _down = server
        .mock("GET", "/get")
        .match_query(Matcher::UrlEncoded("q".into(), "down".into()))
        .with_status(500)
        .create_async()
        .await;
    let _junk = server
        .mock("GET", "/get")
        .match_query(Matcher::UrlEncoded("q".into(), "junk".into()))
        .with_status(200)
        .with_body("<html>")
        .create_async()
        .await;

    let t = translator(&server);
    assert!(matches!(
        t.translate("down", "en", "fr").await,
        Err(TranslateError::Status(_))
    ));
    assert!(matches!(
        t.translate("junk", "en", "fr").await,
        Err(TranslateError::Decode(_))
    ));
}
