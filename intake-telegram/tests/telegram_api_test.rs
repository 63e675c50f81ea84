//! Integration tests for reply delivery and file download against a mock Bot API.
//!
//! teloxide is pointed at a mockito server with `set_api_url`. Method paths are matched
//! case-insensitively (`/bot<token>/sendMessage`).

use intake_core::{Bot as CoreBot, Reply, ReplyMarkup};
use intake_telegram::{download_file, TelegramBotAdapter};
use mockito::Matcher;
use serde_json::json;

const TEST_BOT_TOKEN: &str = "test_bot_token_12345";

fn bot_for(server: &mockito::ServerGuard) -> teloxide::Bot {
    let url = reqwest::Url::parse(&server.url()).expect("mock server url");
    teloxide::Bot::new(TEST_BOT_TOKEN).set_api_url(url)
}

fn method_path(method: &str) -> Matcher {
    Matcher::Regex(format!("(?i)^/bot{}/{}$", TEST_BOT_TOKEN, method))
}

fn sent_message_body(text: &str) -> String {
    json!({
        "ok": true,
        "result": {
            "message_id": 1,
            "date": 1706529600,
            "chat": { "id": 123, "type": "private", "first_name": "Alice" },
            "from": { "id": 123456789, "is_bot": true, "first_name": "TestBot", "username": "testbot" },
            "text": text
        }
    })
    .to_string()
}

/// **Test: A plain reply with a contact keyboard is sent as one sendMessage.**
///
/// **Setup:** Mock sendMessage expecting chat id, text and a keyboard with request_contact.
/// **Action:** `send_reply` with `ReplyMarkup::RequestContact`.
/// **Expected:** Ok; the mock was hit once.
#[tokio::test]
async fn test_send_plain_reply_with_contact_keyboard() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", method_path("sendMessage"))
        .match_body(Matcher::PartialJson(json!({
            "chat_id": 123,
            "text": "Share please",
            "reply_markup": {
                "keyboard": [[{ "text": "Share Contact", "request_contact": true }]]
            }
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(sent_message_body("Share please"))
        .expect(1)
        .create_async()
        .await;

    let adapter = TelegramBotAdapter::new(bot_for(&server));
    adapter
        .send_reply(
            123,
            &Reply::text("Share please").with_markup(ReplyMarkup::RequestContact),
        )
        .await
        .expect("send_reply");

    mock.assert_async().await;
}

/// **Test: Rejected HTML is resent once as plain text.**
///
/// **Setup:** HTML request (parse_mode HTML) answered with 400 "can't parse entities";
/// plain request with the decoded text answered with success.
/// **Action:** `send_reply` with an HTML reply.
/// **Expected:** Ok; both mocks hit once.
#[tokio::test]
async fn test_html_reply_falls_back_to_plain() {
    let mut server = mockito::Server::new_async().await;
    let html_mock = server
        .mock("POST", method_path("sendMessage"))
        .match_body(Matcher::PartialJson(json!({ "parse_mode": "HTML" })))
        .with_status(400)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"ok":false,"error_code":400,"description":"Bad Request: can't parse entities: Unsupported start tag"}"#,
        )
        .expect(1)
        .create_async()
        .await;
    let plain_mock = server
        .mock("POST", method_path("sendMessage"))
        .match_body(Matcher::PartialJson(json!({ "text": "Summary:\na & b" })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(sent_message_body("Summary:\na & b"))
        .expect(1)
        .create_async()
        .await;

    let adapter = TelegramBotAdapter::new(bot_for(&server));
    adapter
        .send_reply(123, &Reply::html("<b>Summary</b>:\na &amp; b"))
        .await
        .expect("fallback send");

    html_mock.assert_async().await;
    plain_mock.assert_async().await;
}

/// **Test: A rejected plain reply surfaces as an error from send_reply.**
#[tokio::test]
async fn test_send_reply_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", method_path("sendMessage"))
        .with_status(403)
        .with_header("content-type", "application/json")
        .with_body(r#"{"ok":false,"error_code":403,"description":"Forbidden: bot was blocked by the user"}"#)
        .create_async()
        .await;

    let adapter = TelegramBotAdapter::new(bot_for(&server));
    assert!(adapter.send_reply(123, &Reply::text("hello")).await.is_err());
}

/// **Test: download_file resolves the path with getFile and fetches the bytes.**
///
/// **Setup:** getFile returns `photos/file_1.jpg`; the file endpoint serves three bytes.
/// **Action:** `download_file(bot, "photo-id")`.
/// **Expected:** The three bytes.
#[tokio::test]
async fn test_download_file() {
    let mut server = mockito::Server::new_async().await;
    let _get_file = server
        .mock("POST", method_path("getFile"))
        .match_body(Matcher::PartialJson(json!({ "file_id": "photo-id" })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "ok": true,
                "result": {
                    "file_id": "photo-id",
                    "file_unique_id": "photo-unique",
                    "file_size": 3,
                    "file_path": "photos/file_1.jpg"
                }
            })
            .to_string(),
        )
        .create_async()
        .await;
    let _content = server
        .mock(
            "GET",
            format!("/file/bot{}/photos/file_1.jpg", TEST_BOT_TOKEN).as_str(),
        )
        .with_status(200)
        .with_body(vec![0xFFu8, 0xD8, 0xFF])
        .create_async()
        .await;

    let bytes = download_file(&bot_for(&server), "photo-id").await.unwrap();

    assert_eq!(bytes, vec![0xFF, 0xD8, 0xFF]);
}

/// **Test: A missing file path on the server is a download error.**
#[tokio::test]
async fn test_download_file_not_found() {
    let mut server = mockito::Server::new_async().await;
    let _get_file = server
        .mock("POST", method_path("getFile"))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"ok":true,"result":{"file_id":"x","file_unique_id":"y","file_size":1,"file_path":"documents/gone.pdf"}}"#,
        )
        .create_async()
        .await;
    let _content = server
        .mock(
            "GET",
            format!("/file/bot{}/documents/gone.pdf", TEST_BOT_TOKEN).as_str(),
        )
        .with_status(404)
        .create_async()
        .await;

    let err = download_file(&bot_for(&server), "x").await.unwrap_err();

    assert!(err.to_string().contains("404"), "got: {}", err);
}
