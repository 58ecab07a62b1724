use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use widget_core::embed::{iframe_snippet, script_snippet, EmbedConfig, EmbedRequest};
use widget_core::style_guard::rewrite_stylesheet;
use widget_core::{EnvironmentContext, LoaderConfig, WidgetType};

#[derive(Parser, Debug)]
#[command(
    name = "widget-cli",
    about = "Công cụ hỗ trợ nhúng widget Elite Prospects."
)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// In URL iframe và các đoạn HTML nhúng cho một widget.
    Embed {
        /// Loại widget, ví dụ `player` hoặc `scoring-leaders`.
        #[arg(short = 't', long = "type")]
        widget_type: WidgetType,
        /// Tham số dạng `key=value` (camelCase), lặp lại được.
        #[arg(short, long = "param", value_parser = parse_param)]
        params: Vec<(String, String)>,
        /// Origin phục vụ trang `/embed/*`.
        #[arg(long)]
        base_url: Option<String>,
    },
    /// Áp dụng style guard lên một file CSS và in kết quả.
    GuardCss {
        /// Đường dẫn tới file CSS.
        #[arg(short, long)]
        input: PathBuf,
    },
    /// In môi trường loader suy ra từ URL của script.
    Env {
        /// URL của loader script; bỏ trống sẽ dùng môi trường production.
        script_url: Option<String>,
    },
}

fn parse_param(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("tham số phải có dạng key=value: {raw:?}")),
    }
}

fn main() -> anyhow::Result<()> {
    match Args::parse().command {
        Command::Embed {
            widget_type,
            params,
            base_url,
        } => {
            let mut config = EmbedConfig::default();
            if let Some(base_url) = base_url {
                config.base_url = base_url;
            }
            let params: BTreeMap<String, String> = params.into_iter().collect();
            let request = EmbedRequest::new(widget_type, params)?;

            println!("URL:    {}", request.iframe_src(&config));
            println!("Iframe: {}", iframe_snippet(&request, &config));
            println!("Script: {}", script_snippet(&request, &config));
        }
        Command::GuardCss { input } => {
            let css = std::fs::read_to_string(&input)
                .with_context(|| format!("Không đọc được file {input:?}"))?;
            print!("{}", rewrite_stylesheet(&css));
        }
        Command::Env { script_url } => {
            let env = EnvironmentContext::resolve(script_url.as_deref(), &LoaderConfig::default());
            println!("{}", serde_json::to_string_pretty(&env)?);
        }
    }
    Ok(())
}
