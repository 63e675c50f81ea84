//! Integration tests for [`annotation::GoogleTranslator`] against a mockito server, and the
//! facade wired to the real lexicon scorer.

use annotation::{AnnotationFacade, GoogleTranslator, LexiconScorer, Translator};
use intake_core::Sentiment;
use mockito::Matcher;
use std::sync::Arc;

fn translator_for(server: &mockito::ServerGuard) -> GoogleTranslator {
    GoogleTranslator::new("en").with_base_url(server.url())
}

/// **Test: Query parameters carry target language and text; segments are joined.**
///
/// **Setup:** Mock `/translate_a/single` matching `tl=en`, `sl=auto`, `q=...`.
/// **Action:** `translate("Hola amigo. Gracias")`.
/// **Expected:** Concatenated English segments.
#[tokio::test]
async fn test_translate_request_and_parse() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/translate_a/single")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("client".into(), "gtx".into()),
            Matcher::UrlEncoded("sl".into(), "auto".into()),
            Matcher::UrlEncoded("tl".into(), "en".into()),
            Matcher::UrlEncoded("dt".into(), "t".into()),
            Matcher::UrlEncoded("q".into(), "Hola amigo. Gracias".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"[[["Hello friend. ","Hola amigo. ",null,null,10],["Thank you","Gracias",null,null,10]],null,"es"]"#)
        .create_async()
        .await;

    let translated = translator_for(&server)
        .translate("Hola amigo. Gracias")
        .await
        .unwrap();

    assert_eq!(translated, "Hello friend. Thank you");
    mock.assert_async().await;
}

/// **Test: HTTP errors and malformed bodies are errors.**
#[tokio::test]
async fn test_translate_errors() {
    let mut server = mockito::Server::new_async().await;
    let _unavailable = server
        .mock("GET", "/translate_a/single")
        .match_query(Matcher::UrlEncoded("q".into(), "one".into()))
        .with_status(503)
        .create_async()
        .await;
    let _malformed = server
        .mock("GET", "/translate_a/single")
        .match_query(Matcher::UrlEncoded("q".into(), "two".into()))
        .with_status(200)
        .with_body("not json")
        .create_async()
        .await;

    let translator = translator_for(&server);
    assert!(translator.translate("one").await.is_err());
    assert!(translator.translate("two").await.is_err());
}

/// **Test: Facade over an unreachable translator keeps the text and still classifies it.**
///
/// **Setup:** Mock returns 500; real `LexiconScorer`.
/// **Action:** `annotate("this is great")`.
/// **Expected:** Translated text equals the original; sentiment is positive.
#[tokio::test]
async fn test_facade_with_failing_translator() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/translate_a/single")
        .match_query(Matcher::Any)
        .with_status(500)
        .create_async()
        .await;

    let facade = AnnotationFacade::new(
        Arc::new(translator_for(&server)),
        Arc::new(LexiconScorer::new()),
    );
    let annotation = facade.annotate("this is great").await;

    assert_eq!(annotation.translated_text, "this is great");
    assert_eq!(annotation.sentiment, Sentiment::Positive);
}
