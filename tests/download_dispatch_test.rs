/*!
 * 下载小程序投递测试
 *
 * 在临时端口上启动 tiny_http 服务器充当后端，验证请求格式与成功/失败处理。
 */

use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use serde_json::{json, Value};
use tiny_http::{Response, Server};

use miniapp_lib::app::{AppExit, MiniApp, MiniAppOptions};
use miniapp_lib::bridge::{HostBridge, RecordingBridge};
use miniapp_lib::builder::MiniAppKind;
use miniapp_lib::context::PageContext;
use miniapp_lib::dispatch::{
    DispatchError, DispatchOutcome, Dispatcher, HttpDispatcher, HttpOptions, JSON_CONTENT_TYPE,
};
use miniapp_lib::message::OutboundMessage;
use miniapp_lib::utils::Language;

/// 后端收到的请求
#[derive(Debug)]
struct CapturedRequest {
    method: String,
    url: String,
    content_type: Option<String>,
    body: String,
}

/// 启动只处理一个请求的后端，返回 host（带结尾斜杠）
fn spawn_backend(status: u16, response_body: &'static str) -> (String, JoinHandle<CapturedRequest>) {
    let server = Server::http("127.0.0.1:0").unwrap();
    let port = server.server_addr().to_ip().unwrap().port();

    let worker = std::thread::spawn(move || {
        let mut request = server.recv().unwrap();
        let mut body = String::new();
        request.as_reader().read_to_string(&mut body).unwrap();

        let content_type = request
            .headers()
            .iter()
            .find(|header| header.field.equiv("Content-Type"))
            .map(|header| header.value.as_str().to_string());
        let captured = CapturedRequest {
            method: request.method().to_string(),
            url: request.url().to_string(),
            content_type,
            body,
        };

        request
            .respond(Response::from_string(response_body).with_status_code(status))
            .unwrap();
        captured
    });

    (format!("http://127.0.0.1:{}/", port), worker)
}

fn download_context(host: &str) -> PageContext {
    PageContext::from_json(
        &json!({
            "link": "L",
            "site": "S",
            "user_id": 1,
            "chat_id": 2,
            "message_id": 3,
            "host": host,
        })
        .to_string(),
    )
    .unwrap()
}

fn download_app(bridge: &Arc<RecordingBridge>, context: PageContext, single_attempt: bool) -> MiniApp {
    let options = HttpOptions {
        timeout: Some(Duration::from_secs(5)),
        user_agent: None,
    };
    let dispatcher = HttpDispatcher::from_context(&context, &options).unwrap();
    let host: Arc<dyn HostBridge> = bridge.clone();
    MiniApp::new(
        MiniAppKind::Download,
        context,
        host,
        Arc::new(dispatcher),
        MiniAppOptions {
            language: Language::EnUS,
            single_attempt,
            ..MiniAppOptions::default()
        },
    )
}

#[tokio::test]
async fn test_accepted_download_closes_view() {
    let (host, backend) = spawn_backend(200, r#"{"ok":true}"#);
    let bridge = Arc::new(RecordingBridge::new());
    let mut app = download_app(&bridge, download_context(&host), true);
    let handle = app.handle();
    app.mount();

    handle.field_changed("format", "mp3").unwrap();
    handle.field_changed("start", "5").unwrap();
    assert!(bridge.press_confirm());

    let exit = app.run().await.unwrap();
    let request = backend.join().unwrap();

    assert_eq!(exit, AppExit::Closed);
    assert!(bridge.is_closed());
    assert!(bridge.alerts().is_empty());

    assert_eq!(request.method, "POST");
    assert_eq!(request.url, "/download/setup");
    assert_eq!(request.content_type.as_deref(), Some(JSON_CONTENT_TYPE));
    assert_eq!(
        request.body,
        format!(
            r#"{{"action":"web_app_download","link":"L","site":"S","user_id":1,"chat_id":2,"message_id":3,"host":"{}","start":5,"format":"mp3"}}"#,
            host
        )
    );
}

#[tokio::test]
async fn test_rejected_download_shows_status_alert() {
    let (host, backend) = spawn_backend(500, "boom");
    let bridge = Arc::new(RecordingBridge::new());
    let mut app = download_app(&bridge, download_context(&host), true);
    app.handle().confirm().unwrap();

    let exit = app.run().await.unwrap();
    backend.join().unwrap();

    assert_eq!(exit, AppExit::Failed { status: 500 });
    assert_eq!(bridge.alerts(), vec!["Error: 500".to_string()]);
    assert!(!bridge.is_closed());
}

#[tokio::test]
async fn test_rejection_reenables_button_for_retry() {
    let (host, backend) = spawn_backend(404, "");
    let bridge = Arc::new(RecordingBridge::new());
    let mut app = download_app(&bridge, download_context(&host), false);
    let handle = app.handle();
    app.mount();
    let task = tokio::spawn(async move { app.run().await });

    assert!(bridge.press_confirm());
    for _ in 0..400 {
        if !bridge.alerts().is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    backend.join().unwrap();

    assert_eq!(bridge.alerts(), vec!["Error: 404".to_string()]);
    assert!(bridge.button().enabled);

    handle.shutdown().unwrap();
    assert_eq!(task.await.unwrap().unwrap(), AppExit::Shutdown);
}

#[tokio::test]
async fn test_non_json_success_body_still_closes() {
    let (host, backend) = spawn_backend(200, "queued");
    let bridge = Arc::new(RecordingBridge::new());
    let mut app = download_app(&bridge, download_context(&host), true);
    app.handle().confirm().unwrap();

    assert_eq!(app.run().await.unwrap(), AppExit::Closed);
    backend.join().unwrap();
}

#[tokio::test]
async fn test_unreachable_backend_reports_status_zero() {
    // 绑定后立即释放，得到一个无人监听的端口
    let port = {
        let server = Server::http("127.0.0.1:0").unwrap();
        server.server_addr().to_ip().unwrap().port()
    };
    let host = format!("http://127.0.0.1:{}/", port);
    let bridge = Arc::new(RecordingBridge::new());
    let mut app = download_app(&bridge, download_context(&host), true);
    app.handle().confirm().unwrap();

    assert_eq!(app.run().await.unwrap(), AppExit::Failed { status: 0 });
    assert_eq!(bridge.alerts(), vec!["Error: 0".to_string()]);
}

#[tokio::test]
async fn test_dispatcher_returns_accepted_body() {
    let (host, backend) = spawn_backend(200, r#"{"queued":1}"#);
    let dispatcher = HttpDispatcher::new(&host, &HttpOptions::default()).unwrap();
    assert_eq!(dispatcher.endpoint(), format!("{}download/setup", host));

    let message = OutboundMessage::new(miniapp_lib::message::MessageAction::WebAppDownload);
    let outcome = dispatcher.dispatch(&message).await.unwrap();
    let request = backend.join().unwrap();

    assert_eq!(
        outcome,
        DispatchOutcome::Accepted {
            body: Some(json!({"queued": 1}))
        }
    );
    let sent: Value = serde_json::from_str(&request.body).unwrap();
    assert_eq!(sent, json!({"action": "web_app_download"}));
}

#[test]
fn test_missing_host_is_rejected_up_front() {
    let context = PageContext::from_json(r#"{"link":"L"}"#).unwrap();
    let result = HttpDispatcher::from_context(&context, &HttpOptions::default());
    assert!(matches!(result, Err(DispatchError::MissingHost)));
}
