//! Integration tests for the Graph API client against a local mockito server.

use messenger::api::{
    MessengerClient, MessengerError, NotificationType, ProfileFieldsOptions, RequestOptions,
    SendOptions, SenderAction,
};
use messenger::templates::{image_message, text_message, AttachmentType, MessageOptions};
use mockito::Matcher;
use serde_json::json;

fn client_for(server: &mockito::Server, token: Option<&str>) -> MessengerClient {
    MessengerClient::new(token.map(String::from)).with_base_url(server.url())
}

#[tokio::test]
async fn send_message_posts_recipient_and_defaults() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v2.8/me/messages")
        .match_query(Matcher::UrlEncoded("access_token".into(), "PAGE_TOKEN".into()))
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(json!({
            "recipient": { "id": "USER" },
            "message": { "text": "hi" },
            "notification_type": "REGULAR"
        })))
        .with_status(200)
        .with_body(r#"{"recipient_id":"USER","message_id":"mid.1"}"#)
        .create_async()
        .await;

    let client = client_for(&server, Some("PAGE_TOKEN"));
    let res = client
        .send_message("USER", &text_message("hi", MessageOptions::default()), SendOptions::default())
        .await
        .unwrap();
    assert_eq!(res.recipient_id, "USER");
    assert_eq!(res.message_id, "mid.1");
    assert_eq!(res.attachment_id, None);
    mock.assert_async().await;
}

#[tokio::test]
async fn send_message_per_call_token_tag_and_notification() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v2.8/me/messages")
        .match_query(Matcher::UrlEncoded("access_token".into(), "OTHER_PAGE".into()))
        .match_body(Matcher::PartialJson(json!({
            "notification_type": "SILENT_PUSH",
            "tag": "ACCOUNT_UPDATE",
            "message": { "attachment": { "type": "image", "payload": { "url": "https://x/y.png" } } }
        })))
        .with_status(200)
        .with_body(r#"{"recipient_id":"USER","message_id":"mid.2","attachment_id":"att.9"}"#)
        .create_async()
        .await;

    let client = client_for(&server, Some("PAGE_TOKEN"));
    let res = client
        .send_message(
            "USER",
            &image_message("https://x/y.png", MessageOptions::default()),
            SendOptions {
                notification_type: NotificationType::SilentPush,
                tag: Some("ACCOUNT_UPDATE".to_string()),
                access_token: Some("OTHER_PAGE".to_string()),
            },
        )
        .await
        .unwrap();
    assert_eq!(res.attachment_id.as_deref(), Some("att.9"));
    mock.assert_async().await;
}

#[tokio::test]
async fn missing_token_makes_no_request() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let client = client_for(&server, None);
    let err = client
        .send_message("USER", &text_message("hi", MessageOptions::default()), SendOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, MessengerError::MissingAccessToken));
    let err = client
        .upload_attachment(AttachmentType::Image, "https://x/y.png", RequestOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, MessengerError::MissingAccessToken));
    mock.assert_async().await;
}

#[tokio::test]
async fn platform_error_surfaces_verbatim() {
    let mut server = mockito::Server::new_async().await;
    let error = json!({
        "message": "(#100) No matching user found",
        "type": "OAuthException",
        "code": 100,
        "fbtrace_id": "ABC"
    });
    let _mock = server
        .mock("POST", "/v2.8/me/messages")
        .match_query(Matcher::Any)
        .with_status(400)
        .with_body(json!({ "error": error.clone() }).to_string())
        .create_async()
        .await;

    let client = client_for(&server, Some("PAGE_TOKEN"));
    let err = client
        .send_sender_action("USER", SenderAction::TypingOn, RequestOptions::default())
        .await
        .unwrap_err();
    match err {
        MessengerError::Api(v) => assert_eq!(v, error),
        other => panic!("expected api error, got {:?}", other),
    }
}

#[tokio::test]
async fn sender_action_body() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v2.8/me/messages")
        .match_query(Matcher::UrlEncoded("access_token".into(), "PAGE_TOKEN".into()))
        .match_body(Matcher::Json(json!({
            "recipient": { "id": "USER" },
            "sender_action": "mark_seen"
        })))
        .with_body(r#"{"recipient_id":"USER"}"#)
        .create_async()
        .await;

    let res = client_for(&server, Some("PAGE_TOKEN"))
        .send_sender_action("USER", SenderAction::MarkSeen, RequestOptions::default())
        .await
        .unwrap();
    assert_eq!(res.recipient_id, "USER");
    mock.assert_async().await;
}

#[tokio::test]
async fn user_profile_requests_fixed_fields() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/v2.8/USER")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("access_token".into(), "PAGE_TOKEN".into()),
            Matcher::UrlEncoded(
                "fields".into(),
                "first_name,last_name,profile_pic,locale,timezone,gender,is_payment_enabled,last_ad_referral".into(),
            ),
        ]))
        .with_body(r#"{"first_name":"Peter","last_name":"Chang","locale":"en_US","timezone":-7,"gender":"male","is_payment_enabled":true}"#)
        .create_async()
        .await;

    let profile = client_for(&server, Some("PAGE_TOKEN"))
        .get_user_profile("USER", RequestOptions::default())
        .await
        .unwrap();
    assert_eq!(profile.first_name.as_deref(), Some("Peter"));
    assert_eq!(profile.timezone, Some(-7.0));
    assert_eq!(profile.is_payment_enabled, Some(true));
    assert!(profile.profile_pic.is_none());
    mock.assert_async().await;
}

#[tokio::test]
async fn messenger_profile_get_set_delete() {
    let mut server = mockito::Server::new_async().await;
    let get_default = server
        .mock("GET", "/v2.8/me/messenger_profile")
        .match_query(Matcher::UrlEncoded(
            "fields".into(),
            "persistent_menu,get_started,greeting,whitelisted_domains,account_linking_url,payment_settings,target_audience".into(),
        ))
        .with_body(r#"{"data":[{"get_started":{"payload":"START"}}]}"#)
        .create_async()
        .await;
    let get_custom = server
        .mock("GET", "/v2.8/me/messenger_profile")
        .match_query(Matcher::UrlEncoded("fields".into(), "greeting".into()))
        .with_body(r#"{"data":[]}"#)
        .create_async()
        .await;
    let set = server
        .mock("POST", "/v2.8/me/messenger_profile")
        .match_query(Matcher::UrlEncoded("access_token".into(), "PAGE_TOKEN".into()))
        .match_body(Matcher::Json(json!({ "get_started": { "payload": "START" } })))
        .with_body(r#"{"result":"success"}"#)
        .create_async()
        .await;
    let delete = server
        .mock("DELETE", "/v2.8/me/messenger_profile")
        .match_query(Matcher::Any)
        .match_body(Matcher::Json(json!({
            "fields": [
                "persistent_menu", "get_started", "greeting", "whitelisted_domains",
                "account_linking_url", "payment_settings", "target_audience"
            ]
        })))
        .with_body(r#"{"result":"success"}"#)
        .create_async()
        .await;

    let client = client_for(&server, Some("PAGE_TOKEN"));
    let profile = client
        .get_messenger_profile(ProfileFieldsOptions::default())
        .await
        .unwrap();
    assert_eq!(profile["data"][0]["get_started"]["payload"], "START");
    client
        .get_messenger_profile(ProfileFieldsOptions {
            fields: Some(vec!["greeting".to_string()]),
            access_token: None,
        })
        .await
        .unwrap();
    let ack = client
        .set_messenger_profile(
            &json!({ "get_started": { "payload": "START" } }),
            RequestOptions::default(),
        )
        .await
        .unwrap();
    assert_eq!(ack["result"], "success");
    let ack = client
        .delete_messenger_profile(ProfileFieldsOptions::default())
        .await
        .unwrap();
    assert_eq!(ack["result"], "success");

    get_default.assert_async().await;
    get_custom.assert_async().await;
    set.assert_async().await;
    delete.assert_async().await;
}

#[tokio::test]
async fn upload_attachment_is_reusable() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v2.8/me/message_attachments")
        .match_query(Matcher::UrlEncoded("access_token".into(), "PAGE_TOKEN".into()))
        .match_body(Matcher::Json(json!({
            "message": {
                "attachment": {
                    "type": "video",
                    "payload": { "url": "https://x/clip.mp4", "is_reusable": true }
                }
            }
        })))
        .with_body(r#"{"attachment_id":"1857777774821032"}"#)
        .create_async()
        .await;

    let res = client_for(&server, Some("PAGE_TOKEN"))
        .upload_attachment(AttachmentType::Video, "https://x/clip.mp4", RequestOptions::default())
        .await
        .unwrap();
    assert_eq!(res.attachment_id, "1857777774821032");
    mock.assert_async().await;
}
