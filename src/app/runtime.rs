/*!
 * 小程序运行时
 *
 * 事件循环串行处理字段变化与确认事件。需要等待回应的投递在后台任务中执行，
 * 完成结果作为内部事件回到循环，循环本身不会被网络请求阻塞。
 */

use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::app::event::{AppEvent, AppExit, AppHandle};
use crate::bridge::HostBridge;
use crate::builder::MiniAppKind;
use crate::config::MiniAppConfig;
use crate::context::PageContext;
use crate::dispatch::{DispatchOutcome, DispatchResult, Dispatcher};
use crate::form::{FormGate, FormState};
use crate::t;
use crate::utils::{AppResult, Language};

/// 运行时选项
#[derive(Debug, Clone)]
pub struct MiniAppOptions {
    pub language: Language,
    /// 请求进行中禁用主按钮并忽略重复确认
    pub submit_guard: bool,
    /// 第一次投递失败即退出循环（命令行使用）
    pub single_attempt: bool,
    /// 页面初始渲染时已有的字段
    pub initial_fields: Vec<(String, String)>,
}

impl Default for MiniAppOptions {
    fn default() -> Self {
        Self {
            language: Language::default(),
            submit_guard: true,
            single_attempt: false,
            initial_fields: Vec::new(),
        }
    }
}

impl MiniAppOptions {
    pub fn from_config(config: &MiniAppConfig) -> Self {
        Self {
            language: config.language(),
            submit_guard: config.runtime.submit_guard,
            ..Self::default()
        }
    }
}

/// 循环的一步：外部事件或后台投递完成
enum Step {
    Event(AppEvent),
    Completed(DispatchResult<DispatchOutcome>),
}

/// 小程序实例
pub struct MiniApp {
    kind: MiniAppKind,
    context: PageContext,
    bridge: Arc<dyn HostBridge>,
    dispatcher: Arc<dyn Dispatcher>,
    options: MiniAppOptions,
    form: FormState,
    gate: FormGate,
    events_tx: mpsc::UnboundedSender<AppEvent>,
    events_rx: mpsc::UnboundedReceiver<AppEvent>,
    completed_tx: mpsc::UnboundedSender<DispatchResult<DispatchOutcome>>,
    completed_rx: mpsc::UnboundedReceiver<DispatchResult<DispatchOutcome>>,
    in_flight: bool,
    mounted: bool,
}

impl MiniApp {
    pub fn new(
        kind: MiniAppKind,
        context: PageContext,
        bridge: Arc<dyn HostBridge>,
        dispatcher: Arc<dyn Dispatcher>,
        options: MiniAppOptions,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (completed_tx, completed_rx) = mpsc::unbounded_channel();
        let form = FormState::with_fields(options.initial_fields.clone());

        Self {
            kind,
            context,
            bridge,
            dispatcher,
            options,
            form,
            gate: FormGate::new(),
            events_tx,
            events_rx,
            completed_tx,
            completed_rx,
            in_flight: false,
            mounted: false,
        }
    }

    pub fn handle(&self) -> AppHandle {
        AppHandle::new(self.events_tx.clone())
    }

    /// 设置按钮文案与初始状态，并注册确认回调；重复调用无副作用
    pub fn mount(&mut self) {
        if self.mounted {
            return;
        }
        self.mounted = true;

        let text = t!(in self.options.language, self.kind.button_text_key());
        self.bridge.set_button_text(&text);

        match self.kind {
            MiniAppKind::Auth => {
                self.gate.reset(self.bridge.as_ref());
                let prefilled = self
                    .options
                    .initial_fields
                    .iter()
                    .any(|(name, _)| FormGate::watches(name));
                if prefilled {
                    self.gate.evaluate(&self.form, self.bridge.as_ref());
                }
            }
            MiniAppKind::Download => {
                self.bridge.enable_button();
                self.bridge.show_button();
            }
        }

        let sender = self.events_tx.clone();
        self.bridge.on_confirm(Arc::new(move || {
            if sender.send(AppEvent::Confirm).is_err() {
                debug!("confirm ignored: event loop has stopped");
            }
        }));

        debug!("{} mini app mounted", self.kind);
    }

    /// 运行事件循环直到退出
    pub async fn run(&mut self) -> AppResult<AppExit> {
        self.mount();

        loop {
            // 循环自身持有 events_tx，事件通道不会关闭
            let step = tokio::select! {
                Some(event) = self.events_rx.recv() => Step::Event(event),
                Some(result) = self.completed_rx.recv() => Step::Completed(result),
            };

            let exit = match step {
                Step::Event(event) => self.handle_event(event).await?,
                Step::Completed(result) => self.handle_completion(result),
            };

            if let Some(exit) = exit {
                info!("{} mini app exited: {:?}", self.kind, exit);
                return Ok(exit);
            }
        }
    }

    async fn handle_event(&mut self, event: AppEvent) -> AppResult<Option<AppExit>> {
        match event {
            AppEvent::FieldChanged { name, value } => {
                debug!("field changed: {} (present: {})", name, value.is_some());
                let watched = FormGate::watches(&name);
                self.form.set(name, value);
                if self.kind == MiniAppKind::Auth && watched {
                    self.gate.evaluate(&self.form, self.bridge.as_ref());
                }
                Ok(None)
            }
            AppEvent::Confirm => self.handle_confirm().await,
            AppEvent::Shutdown => Ok(Some(AppExit::Shutdown)),
        }
    }

    async fn handle_confirm(&mut self) -> AppResult<Option<AppExit>> {
        if self.kind == MiniAppKind::Auth && !self.gate.state().is_open() {
            debug!("confirm ignored: auth form is incomplete");
            return Ok(None);
        }
        if self.in_flight && self.options.submit_guard {
            debug!("confirm ignored: request already in flight");
            return Ok(None);
        }

        let message = self.kind.build(&self.form.snapshot(), &self.context);

        if !self.dispatcher.awaits_response() {
            let outcome = self.dispatcher.dispatch(&message).await?;
            info!("{} message handed to host: {:?}", self.kind, outcome);
            return Ok(Some(AppExit::MessageSent));
        }

        if self.options.submit_guard {
            self.bridge.disable_button();
        }
        self.in_flight = true;

        let dispatcher = Arc::clone(&self.dispatcher);
        let completed = self.completed_tx.clone();
        tokio::spawn(async move {
            let result = dispatcher.dispatch(&message).await;
            if completed.send(result).is_err() {
                warn!("dispatch finished after the event loop stopped");
            }
        });

        Ok(None)
    }

    fn handle_completion(&mut self, result: DispatchResult<DispatchOutcome>) -> Option<AppExit> {
        self.in_flight = false;

        let status = match result {
            Ok(outcome) if outcome.is_success() => {
                info!("{} message accepted", self.kind);
                self.bridge.close_view();
                return Some(AppExit::Closed);
            }
            Ok(outcome) => outcome.status_code().unwrap_or(0),
            Err(e) => {
                error!("dispatch failed before reaching the backend: {}", e);
                0
            }
        };

        let alert = t!(in self.options.language, "alert.dispatch_failed", "status" => status);
        self.bridge.show_alert(&alert);

        if self.options.single_attempt {
            return Some(AppExit::Failed { status });
        }
        if self.options.submit_guard {
            self.bridge.enable_button();
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::{BridgeCall, RecordingBridge};
    use crate::dispatch::{BridgeDispatcher, DispatchOutcome};
    use crate::message::OutboundMessage;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use serde_json::json;

    /// 预置结果的投递器，记录每次投递的消息
    struct StubDispatcher {
        outcome: DispatchOutcome,
        sent: Mutex<Vec<String>>,
    }

    impl StubDispatcher {
        fn new(outcome: DispatchOutcome) -> Arc<Self> {
            Arc::new(Self {
                outcome,
                sent: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl Dispatcher for StubDispatcher {
        async fn dispatch(&self, message: &OutboundMessage) -> DispatchResult<DispatchOutcome> {
            self.sent.lock().push(message.to_json()?);
            Ok(self.outcome.clone())
        }

        fn awaits_response(&self) -> bool {
            true
        }
    }

    fn download_context() -> PageContext {
        PageContext::from_json(
            &json!({
                "link": "L", "site": "S", "user_id": 1, "chat_id": 2,
                "message_id": 3, "host": "https://h/"
            })
            .to_string(),
        )
        .unwrap()
    }

    fn options(single_attempt: bool) -> MiniAppOptions {
        MiniAppOptions {
            language: Language::EnUS,
            single_attempt,
            ..MiniAppOptions::default()
        }
    }

    #[tokio::test]
    async fn test_auth_mount_hides_button() {
        let bridge = Arc::new(RecordingBridge::new());
        let dispatcher = Arc::new(BridgeDispatcher::new(bridge.clone()));
        let mut app = MiniApp::new(
            MiniAppKind::Auth,
            PageContext::default(),
            bridge.clone(),
            dispatcher,
            options(false),
        );
        app.mount();

        let button = bridge.button();
        assert_eq!(button.text, "Sign in");
        assert!(!button.enabled);
        assert!(!button.visible);
    }

    #[tokio::test]
    async fn test_auth_gate_follows_fields_and_sends() {
        let bridge = Arc::new(RecordingBridge::new());
        let dispatcher = Arc::new(BridgeDispatcher::new(bridge.clone()));
        let ctx = PageContext::from_json(r#"{"site":"example.com"}"#).unwrap();
        let mut app = MiniApp::new(MiniAppKind::Auth, ctx, bridge.clone(), dispatcher, options(false));
        let handle = app.handle();
        app.mount();

        handle.field_changed("login", "alice").unwrap();
        handle.confirm().unwrap();
        handle.field_changed("password", "secret").unwrap();
        handle.confirm().unwrap();

        let exit = app.run().await.unwrap();
        assert_eq!(exit, AppExit::MessageSent);
        assert_eq!(
            bridge.sent_messages(),
            vec![r#"{"action":"web_app_auth","site":"example.com","login":"alice","password":"secret"}"#.to_string()]
        );
        assert!(bridge.button().enabled);
    }

    #[tokio::test]
    async fn test_download_success_closes_view() {
        let bridge = Arc::new(RecordingBridge::new());
        let dispatcher = StubDispatcher::new(DispatchOutcome::Accepted { body: None });
        let mut app = MiniApp::new(
            MiniAppKind::Download,
            download_context(),
            bridge.clone(),
            dispatcher.clone(),
            options(false),
        );
        let handle = app.handle();
        app.mount();
        assert!(bridge.button().enabled && bridge.button().visible);

        handle.field_changed("format", "mp3").unwrap();
        handle.field_changed("start", "5").unwrap();
        assert!(bridge.press_confirm());

        let exit = app.run().await.unwrap();
        assert_eq!(exit, AppExit::Closed);
        assert!(bridge.is_closed());
        assert_eq!(
            dispatcher.sent.lock().clone(),
            vec![r#"{"action":"web_app_download","link":"L","site":"S","user_id":1,"chat_id":2,"message_id":3,"host":"https://h/","start":5,"format":"mp3"}"#.to_string()]
        );
    }

    #[tokio::test]
    async fn test_download_rejection_alerts_and_reenables() {
        let bridge = Arc::new(RecordingBridge::new());
        let dispatcher = StubDispatcher::new(DispatchOutcome::Rejected { status: 500 });
        let mut app = MiniApp::new(
            MiniAppKind::Download,
            download_context(),
            bridge.clone(),
            dispatcher,
            options(true),
        );
        app.handle().confirm().unwrap();

        let exit = app.run().await.unwrap();
        assert_eq!(exit, AppExit::Failed { status: 500 });
        assert_eq!(bridge.alerts(), vec!["Error: 500".to_string()]);
        assert!(!bridge.is_closed());
        assert!(bridge.calls().contains(&BridgeCall::DisableButton));
    }

    #[tokio::test]
    async fn test_guard_ignores_confirm_while_in_flight() {
        let bridge = Arc::new(RecordingBridge::new());
        let dispatcher = StubDispatcher::new(DispatchOutcome::Rejected { status: 503 });
        let mut app = MiniApp::new(
            MiniAppKind::Download,
            download_context(),
            bridge.clone(),
            dispatcher.clone(),
            options(true),
        );
        let handle = app.handle();
        handle.confirm().unwrap();
        handle.confirm().unwrap();

        let exit = app.run().await.unwrap();
        assert_eq!(exit, AppExit::Failed { status: 503 });
        assert_eq!(dispatcher.sent.lock().len(), 1);
    }

    #[tokio::test]
    async fn test_unguarded_confirms_each_dispatch() {
        let bridge = Arc::new(RecordingBridge::new());
        let dispatcher = StubDispatcher::new(DispatchOutcome::Rejected { status: 500 });
        let mut app = MiniApp::new(
            MiniAppKind::Download,
            download_context(),
            bridge.clone(),
            dispatcher.clone(),
            MiniAppOptions {
                submit_guard: false,
                ..options(false)
            },
        );
        let handle = app.handle();
        app.mount();
        let task = tokio::spawn(async move { app.run().await });

        for _ in 0..3 {
            assert!(bridge.press_confirm());
        }
        for _ in 0..200 {
            if bridge.alerts().len() == 3 {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }

        assert_eq!(dispatcher.sent.lock().len(), 3);
        assert_eq!(bridge.alerts(), vec!["Error: 500".to_string(); 3]);
        assert!(!bridge.calls().contains(&BridgeCall::DisableButton));

        handle.shutdown().unwrap();
        assert_eq!(task.await.unwrap().unwrap(), AppExit::Shutdown);
    }

    #[tokio::test]
    async fn test_unchecked_checkbox_is_removed() {
        let bridge = Arc::new(RecordingBridge::new());
        let dispatcher = StubDispatcher::new(DispatchOutcome::Accepted { body: None });
        let mut app = MiniApp::new(
            MiniAppKind::Download,
            download_context(),
            bridge.clone(),
            dispatcher.clone(),
            MiniAppOptions {
                initial_fields: vec![("images".into(), "on".into())],
                ..options(false)
            },
        );
        let handle = app.handle();
        handle.remove_field("images").unwrap();
        handle.confirm().unwrap();

        assert_eq!(app.run().await.unwrap(), AppExit::Closed);
        let sent = dispatcher.sent.lock().clone();
        assert!(!sent[0].contains("images"));
    }

    #[tokio::test]
    async fn test_shutdown_exits() {
        let bridge = Arc::new(RecordingBridge::new());
        let dispatcher = StubDispatcher::new(DispatchOutcome::Accepted { body: None });
        let mut app = MiniApp::new(
            MiniAppKind::Download,
            download_context(),
            bridge,
            dispatcher,
            options(false),
        );
        app.handle().shutdown().unwrap();
        assert_eq!(app.run().await.unwrap(), AppExit::Shutdown);
    }
}
