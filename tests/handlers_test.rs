//! Integration tests for the real intent handlers with a mocked Telegram
//! API and a mocked ledger service.
//!
//! The Telegram side is a wiremock server the `Bot` is pointed at via
//! `set_api_url`, so the assertions read back exactly what would have been
//! sent to chat. The ledger side is a second wiremock server, which lets
//! the tests prove that preflight failures never produce a ledger call.
//!
//! Run with: cargo test --test handlers_test

use std::ops::ControlFlow;
use std::sync::Arc;

use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_json, method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

use teloxide::prelude::*;
use teloxide::types::{CallbackQuery, Me, MessageId, Update};

use satsbet::core::messages;
use satsbet::ledger::LedgerClient;
use satsbet::storage::{RecordStore, UserRecord};
use satsbet::telegram::handlers::{bets, commands, payments};
use satsbet::telegram::pending::PendingBets;
use satsbet::telegram::qr::QrDecoder;
use satsbet::telegram::{schema, HandlerDeps};

const PRIVATE_CHAT: i64 = 123456789;
const GROUP_CHAT: i64 = -100200300;

/// Decoder returning a canned payload, so photo tests need no real image.
struct StubQrDecoder(Option<String>);

impl QrDecoder for StubQrDecoder {
    fn decode(&self, _image: &[u8]) -> Option<String> {
        self.0.clone()
    }
}

/// Test harness wiring real handlers to two mock servers.
struct HandlerTest {
    telegram: MockServer,
    ledger: MockServer,
    bot: Bot,
    deps: HandlerDeps,
    _data_dir: TempDir,
}

impl HandlerTest {
    async fn new() -> Self {
        Self::with_qr(None).await
    }

    async fn with_qr(qr_payload: Option<String>) -> Self {
        let telegram = MockServer::start().await;
        let ledger = MockServer::start().await;

        Self::mock_telegram_api(&telegram).await;

        let bot = Bot::new("1234567890:TESTTOKEN").set_api_url(telegram.uri().parse().unwrap());

        let data_dir = TempDir::new().unwrap();
        let records = Arc::new(RecordStore::new(data_dir.path()));
        let ledger_client = Arc::new(LedgerClient::new(reqwest::Client::new(), ledger.uri(), "test-key"));

        let deps = HandlerDeps::new(
            ledger_client,
            records,
            PendingBets::new(),
            Arc::new(StubQrDecoder(qr_payload)),
            reqwest::Client::new(),
            false,
        );

        Self {
            telegram,
            ledger,
            bot,
            deps,
            _data_dir: data_dir,
        }
    }

    /// Mocks the Telegram Bot API methods the handlers touch.
    async fn mock_telegram_api(server: &MockServer) {
        let sent = json!({
            "ok": true,
            "result": {
                "message_id": 42,
                "from": { "id": 987654321, "is_bot": true, "first_name": "TestBot", "username": "test_bot" },
                "chat": { "id": PRIVATE_CHAT, "type": "private", "first_name": "Test", "username": "testuser" },
                "date": 1735992000,
                "text": "ok"
            }
        });
        Mock::given(method("POST"))
            .and(path_regex("/bot[^/]+/[Ss]endMessage"))
            .respond_with(ResponseTemplate::new(200).set_body_json(sent))
            .mount(server)
            .await;

        let flag = json!({ "ok": true, "result": true });
        Mock::given(method("POST"))
            .and(path_regex("/bot[^/]+/[Aa]nswerCallbackQuery"))
            .respond_with(ResponseTemplate::new(200).set_body_json(flag.clone()))
            .mount(server)
            .await;
        Mock::given(method("POST"))
            .and(path_regex("/bot[^/]+/[Dd]eleteMessage"))
            .respond_with(ResponseTemplate::new(200).set_body_json(flag))
            .mount(server)
            .await;
    }

    fn register(&self, username: &str) {
        self.deps
            .records
            .put(
                username,
                &UserRecord {
                    user_id: "u-123".to_string(),
                    wallet_id: "w-456".to_string(),
                },
            )
            .unwrap();
    }

    /// Texts of every message the handlers sent to chat, in order.
    async fn sent_texts(&self) -> Vec<String> {
        self.telegram
            .received_requests()
            .await
            .unwrap()
            .iter()
            .filter(|r| r.url.path().to_lowercase().ends_with("sendmessage"))
            .map(|r| {
                let body: serde_json::Value = serde_json::from_slice(&r.body).unwrap();
                body["text"].as_str().unwrap_or_default().to_string()
            })
            .collect()
    }

    /// True if any Bot API call with the given method name was made.
    async fn telegram_called(&self, api_method: &str) -> bool {
        let needle = api_method.to_lowercase();
        self.telegram
            .received_requests()
            .await
            .unwrap()
            .iter()
            .any(|r| r.url.path().to_lowercase().ends_with(&needle))
    }

    async fn ledger_request_count(&self) -> usize {
        self.ledger.received_requests().await.unwrap().len()
    }
}

fn private_chat_json() -> serde_json::Value {
    json!({ "id": PRIVATE_CHAT, "type": "private", "first_name": "Test", "username": "testuser" })
}

fn group_chat_json() -> serde_json::Value {
    json!({ "id": GROUP_CHAT, "type": "group", "title": "Test Group" })
}

fn from_json() -> serde_json::Value {
    json!({ "id": 111, "is_bot": false, "first_name": "Test", "username": "testuser" })
}

fn text_message(chat: serde_json::Value, text: &str) -> Message {
    let value = json!({
        "message_id": 1,
        "date": 1735992000,
        "chat": chat,
        "from": from_json(),
        "text": text
    });
    serde_json::from_value(value).unwrap()
}

/// A text message replying to a (bot-sent) prompt message.
fn reply_message(chat: serde_json::Value, text: &str, reply_to_id: i32) -> Message {
    let value = json!({
        "message_id": 2,
        "date": 1735992000,
        "chat": chat.clone(),
        "from": from_json(),
        "text": text,
        "reply_to_message": {
            "message_id": reply_to_id,
            "date": 1735992000,
            "chat": chat,
            "from": { "id": 987654321, "is_bot": true, "first_name": "TestBot", "username": "test_bot" },
            "text": messages::ENTER_BET_AMOUNT
        }
    });
    serde_json::from_value(value).unwrap()
}

fn photo_message(chat: serde_json::Value) -> Message {
    let value = json!({
        "message_id": 3,
        "date": 1735992000,
        "chat": chat,
        "from": from_json(),
        "photo": [
            { "file_id": "small", "file_unique_id": "u-small", "width": 90, "height": 90 },
            { "file_id": "large", "file_unique_id": "u-large", "width": 800, "height": 800 }
        ]
    });
    serde_json::from_value(value).unwrap()
}

fn callback_query(chat: serde_json::Value, data: &str) -> CallbackQuery {
    let value = json!({
        "id": "callback-1",
        "from": from_json(),
        "chat_instance": "instance-1",
        "data": data,
        "message": {
            "message_id": 7,
            "date": 1735992000,
            "chat": chat,
            "from": { "id": 987654321, "is_bot": true, "first_name": "TestBot", "username": "test_bot" },
            "text": messages::COMPETITIONS_HEADER
        }
    });
    serde_json::from_value(value).unwrap()
}

#[tokio::test]
async fn group_photo_gets_the_dm_only_notice_without_a_download() {
    let test = HandlerTest::with_qr(Some("lnbc1500n1pj9x2".to_string())).await;
    test.register("testuser");

    let msg = photo_message(group_chat_json());
    payments::handle_photo(&test.bot, &msg, &test.deps).await.unwrap();

    assert_eq!(test.sent_texts().await, vec![messages::DM_ONLY_COMMAND.to_string()]);
    assert!(!test.telegram_called("getFile").await);
    assert_eq!(test.ledger_request_count().await, 0);
}

#[tokio::test]
async fn send_to_an_unknown_recipient_stops_before_the_ledger() {
    let test = HandlerTest::new().await;
    test.register("testuser");

    let msg = text_message(private_chat_json(), "/send 500 alice@example.com");
    commands::handle_send(&test.bot, &msg, &test.deps, "500 alice@example.com")
        .await
        .unwrap();

    assert_eq!(test.sent_texts().await, vec![messages::RECIPIENT_NOT_FOUND.to_string()]);
    assert_eq!(test.ledger_request_count().await, 0);
}

#[tokio::test]
async fn unregistered_sender_stops_before_the_ledger() {
    let test = HandlerTest::new().await;

    let msg = text_message(private_chat_json(), "/send 500 alice@example.com");
    commands::handle_send(&test.bot, &msg, &test.deps, "500 alice@example.com")
        .await
        .unwrap();

    assert_eq!(test.sent_texts().await, vec![messages::USER_NOT_FOUND.to_string()]);
    assert_eq!(test.ledger_request_count().await, 0);
}

#[tokio::test]
async fn pasted_invoice_pays_from_the_senders_wallet() {
    let test = HandlerTest::new().await;
    test.register("testuser");

    Mock::given(method("POST"))
        .and(path("/payments"))
        .and(body_json(json!({
            "out": true,
            "wallet_id": "w-456",
            "payment_request": "LNBC1500N1PJ9X2",
        })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&test.ledger)
        .await;

    let msg = text_message(private_chat_json(), "LNBC1500N1PJ9X2");
    payments::handle_free_text(&test.bot, &msg, &test.deps).await.unwrap();

    assert_eq!(test.sent_texts().await, vec![messages::PAY_INVOICE_SUCCESS.to_string()]);
}

#[tokio::test]
async fn competition_button_arms_a_prompt_bound_bet() {
    let test = HandlerTest::new().await;

    let q = callback_query(private_chat_json(), "comp:comp-1");
    bets::handle_competition_selected(&test.bot, &q, &test.deps).await.unwrap();

    assert!(test.telegram_called("answerCallbackQuery").await);
    assert_eq!(test.sent_texts().await, vec![messages::ENTER_BET_AMOUNT.to_string()]);

    // The pending entry is keyed to the prompt the mock API minted.
    assert_eq!(
        test.deps.pending_bets.take(ChatId(PRIVATE_CHAT), MessageId(42)).await.as_deref(),
        Some("comp-1")
    );
}

#[tokio::test]
async fn group_chat_amount_reply_keeps_the_prompt_armed() {
    let test = HandlerTest::new().await;
    test.register("testuser");
    test.deps
        .pending_bets
        .insert(ChatId(GROUP_CHAT), MessageId(42), "comp-1".to_string())
        .await;

    let msg = reply_message(group_chat_json(), "25", 42);
    bets::handle_bet_amount(&test.bot, &msg, &test.deps, "25").await.unwrap();

    assert_eq!(test.sent_texts().await, vec![messages::DM_ONLY_COMMAND.to_string()]);
    assert_eq!(test.ledger_request_count().await, 0);
    assert_eq!(
        test.deps.pending_bets.take(ChatId(GROUP_CHAT), MessageId(42)).await.as_deref(),
        Some("comp-1")
    );
}

#[tokio::test]
async fn unregistered_bettor_keeps_the_prompt_armed() {
    let test = HandlerTest::new().await;
    test.deps
        .pending_bets
        .insert(ChatId(PRIVATE_CHAT), MessageId(42), "comp-1".to_string())
        .await;

    let msg = reply_message(private_chat_json(), "25", 42);
    bets::handle_bet_amount(&test.bot, &msg, &test.deps, "25").await.unwrap();

    assert_eq!(test.sent_texts().await, vec![messages::USER_NOT_FOUND.to_string()]);
    assert_eq!(test.ledger_request_count().await, 0);
    assert_eq!(
        test.deps.pending_bets.take(ChatId(PRIVATE_CHAT), MessageId(42)).await.as_deref(),
        Some("comp-1")
    );
}

#[tokio::test]
async fn register_bet_command_places_a_ticket() {
    let test = HandlerTest::new().await;
    test.register("testuser");

    Mock::given(method("POST"))
        .and(path("/tickets/comp-1"))
        .and(body_json(json!({
            "bettor": "testuser",
            "details": "Bet amount: 42",
        })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&test.ledger)
        .await;

    let msg = text_message(private_chat_json(), "/register_bet comp-1 42");
    bets::handle_register_bet(&test.bot, &msg, &test.deps, "comp-1 42").await.unwrap();

    assert_eq!(test.sent_texts().await, vec![messages::BET_REGISTERED_SUCCESS.to_string()]);
}

#[tokio::test]
async fn register_bet_outside_a_dm_is_refused() {
    let test = HandlerTest::new().await;
    test.register("testuser");

    let msg = text_message(group_chat_json(), "/register_bet comp-1 42");
    bets::handle_register_bet(&test.bot, &msg, &test.deps, "comp-1 42").await.unwrap();

    assert_eq!(test.sent_texts().await, vec![messages::DM_ONLY_COMMAND.to_string()]);
    assert_eq!(test.ledger_request_count().await, 0);
}

fn test_me() -> Me {
    serde_json::from_value(json!({
        "id": 987654321,
        "is_bot": true,
        "first_name": "TestBot",
        "username": "test_bot",
        "can_join_groups": true,
        "can_read_all_group_messages": false,
        "supports_inline_queries": false,
        "can_connect_to_business": false,
        "has_main_web_app": false
    }))
    .unwrap()
}

fn message_update(msg: &Message) -> Update {
    // teloxide's UpdateKind deserializer needs borrowed keys, which
    // `from_value` cannot provide, so round-trip through a string.
    let value = json!({
        "update_id": 1,
        "message": serde_json::to_value(msg).unwrap()
    });
    serde_json::from_str(&value.to_string()).unwrap()
}

#[tokio::test]
async fn schema_routes_help_to_the_help_reply() {
    let test = HandlerTest::new().await;

    let msg = text_message(private_chat_json(), "/help");
    let flow = schema(test.deps.clone())
        .dispatch(dptree::deps![test.bot.clone(), test_me(), message_update(&msg)])
        .await;

    assert!(matches!(flow, ControlFlow::Break(Ok(()))));
    assert_eq!(test.sent_texts().await, vec![messages::HELP_MESSAGE.to_string()]);
}

#[tokio::test]
async fn idle_chatter_through_the_schema_touches_nothing() {
    let test = HandlerTest::new().await;
    test.register("testuser");

    let msg = text_message(private_chat_json(), "500");
    let flow = schema(test.deps.clone())
        .dispatch(dptree::deps![test.bot.clone(), test_me(), message_update(&msg)])
        .await;

    assert!(matches!(flow, ControlFlow::Break(Ok(()))));
    assert!(test.sent_texts().await.is_empty());
    assert_eq!(test.ledger_request_count().await, 0);
}
