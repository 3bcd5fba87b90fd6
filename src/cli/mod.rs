/*!
 * 命令行入口
 *
 * 用 `ConsoleBridge` 挂载小程序：按顺序回放 `--form-data` 与 `--field`，确认一次，
 * 根据退出原因决定进程状态码。
 */

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::io::AsyncReadExt;
use tracing::{debug, warn};

use crate::app::{AppExit, MiniApp, MiniAppOptions};
use crate::bridge::ConsoleBridge;
use crate::builder::MiniAppKind;
use crate::config::{ConfigReader, MiniAppConfig};
use crate::context::PageContext;
use crate::dispatch::{BridgeDispatcher, Dispatcher, HttpDispatcher};
use crate::form::{DownloadLayout, FormSnapshot};
use crate::t;
use crate::utils::{error::serialize_to_json, AppResult, Language};
use crate::app_bail;

#[derive(Debug, Parser)]
#[command(name = "miniapp")]
#[command(about = "Chat mini app form submitter", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Path to config.toml (defaults to the user config directory)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Interface language tag, e.g. ru-RU or en-US
    #[arg(long, global = true, value_name = "TAG")]
    pub lang: Option<String>,

    /// Page URL carrying the context in its `payload` query parameter
    #[arg(long, global = true, value_name = "URL")]
    pub page_url: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fill the auth form and hand the message to the host
    Auth(FormArgs),

    /// Fill the download form and post it to the backend
    Download {
        #[command(flatten)]
        form: FormArgs,

        /// Do not pre-fill the form from the context layout hints
        #[arg(long)]
        no_defaults: bool,
    },

    /// Print the download form layout derived from the context
    Layout(ContextArgs),
}

#[derive(Debug, Args)]
pub struct ContextArgs {
    /// Context JSON file, or `-` for stdin
    #[arg(long, value_name = "FILE")]
    pub context: Option<String>,
}

#[derive(Debug, Args)]
pub struct FormArgs {
    #[command(flatten)]
    pub context: ContextArgs,

    /// Urlencoded form body as the page would submit it, e.g. `format=mp3&start=5`
    #[arg(long, value_name = "BODY")]
    pub form_data: Option<String>,

    /// Form field as name=value; repeat in input order
    #[arg(long = "field", value_name = "NAME=VALUE", value_parser = parse_field)]
    pub fields: Vec<(String, String)>,
}

impl FormArgs {
    /// 回放顺序：先 `--form-data` 的字段，再逐个 `--field`
    pub fn field_changes(&self) -> Vec<(String, String)> {
        let mut changes: Vec<(String, String)> = self
            .form_data
            .as_deref()
            .map(FormSnapshot::from_urlencoded)
            .map(|snapshot| {
                snapshot
                    .iter()
                    .map(|(name, value)| (name.to_string(), value.to_string()))
                    .collect()
            })
            .unwrap_or_default();
        changes.extend(self.fields.iter().cloned());
        changes
    }
}

fn parse_field(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name.to_string(), value.to_string())),
        _ => Err(format!("expected NAME=VALUE, got `{}`", raw)),
    }
}

/// 执行命令行
pub async fn run(cli: Cli) -> AppResult<ExitCode> {
    let config = load_config(cli.config.as_ref()).await?;
    let language = match &cli.lang {
        Some(tag) => Language::from_tag_lossy(tag),
        None => config.language(),
    };
    debug!("interface language: {}", language);

    match &cli.command {
        Command::Layout(args) => {
            let context = load_context(args, cli.page_url.as_deref()).await?;
            let layout = DownloadLayout::from_context(&context);
            println!("{}", serialize_to_json(&layout, "serialize download layout")?);
            Ok(ExitCode::SUCCESS)
        }
        Command::Auth(form) => {
            let context = load_context(&form.context, cli.page_url.as_deref()).await?;
            submit(
                MiniAppKind::Auth,
                context,
                &form.field_changes(),
                &config,
                language,
                Vec::new(),
            )
            .await
        }
        Command::Download { form, no_defaults } => {
            let context = load_context(&form.context, cli.page_url.as_deref()).await?;
            let initial_fields = if *no_defaults {
                Vec::new()
            } else {
                DownloadLayout::from_context(&context).initial_fields()
            };
            submit(
                MiniAppKind::Download,
                context,
                &form.field_changes(),
                &config,
                language,
                initial_fields,
            )
            .await
        }
    }
}

async fn load_config(path: Option<&PathBuf>) -> AppResult<MiniAppConfig> {
    let reader = match path {
        Some(path) => ConfigReader::with_path(path),
        None => ConfigReader::new()?,
    };
    debug!("config file: {}", reader.config_path().display());
    Ok(reader.load_config().await?)
}

async fn load_context(args: &ContextArgs, page_url: Option<&str>) -> AppResult<PageContext> {
    if let Some(url) = page_url {
        return PageContext::from_page_url(url).context("failed to read context from page URL");
    }

    let text = match args.context.as_deref() {
        Some("-") => {
            let mut text = String::new();
            tokio::io::stdin()
                .read_to_string(&mut text)
                .await
                .context("failed to read context from stdin")?;
            text
        }
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read context file {}", path))?,
        None => app_bail!("either --context or --page-url is required"),
    };

    PageContext::from_json(&text).context("failed to parse context JSON")
}

async fn submit(
    kind: MiniAppKind,
    context: PageContext,
    fields: &[(String, String)],
    config: &MiniAppConfig,
    language: Language,
    initial_fields: Vec<(String, String)>,
) -> AppResult<ExitCode> {
    let bridge = Arc::new(ConsoleBridge::new());
    let dispatcher: Arc<dyn Dispatcher> = match kind {
        MiniAppKind::Auth => Arc::new(BridgeDispatcher::new(bridge.clone())),
        MiniAppKind::Download => Arc::new(
            HttpDispatcher::from_context(&context, &config.http_options())
                .context("failed to prepare the download request")?,
        ),
    };

    let options = MiniAppOptions {
        language,
        single_attempt: true,
        initial_fields,
        ..MiniAppOptions::from_config(config)
    };
    let mut app = MiniApp::new(kind, context, bridge.clone(), dispatcher.clone(), options);
    let handle = app.handle();
    app.mount();

    for (name, value) in fields {
        handle.field_changed(name.as_str(), value.as_str())?;
    }
    bridge.confirm();
    // 桥接投递在确认时同步完成；闸门未打开时确认被忽略，需要显式结束
    if !dispatcher.awaits_response() {
        handle.shutdown()?;
    }

    let exit = app.run().await?;
    Ok(report(exit, language))
}

fn report(exit: AppExit, language: Language) -> ExitCode {
    match exit {
        AppExit::MessageSent => {
            eprintln!("{}", t!(in language, "cli.message_sent"));
            ExitCode::SUCCESS
        }
        AppExit::Closed => {
            eprintln!("{}", t!(in language, "cli.view_closed"));
            ExitCode::SUCCESS
        }
        AppExit::Failed { status } => {
            eprintln!("{}", t!(in language, "cli.dispatch_failed", "status" => status));
            ExitCode::FAILURE
        }
        AppExit::Shutdown => {
            warn!("mini app stopped without submitting");
            eprintln!("{}", t!(in language, "cli.form_incomplete"));
            ExitCode::FAILURE
        }
    }
}
