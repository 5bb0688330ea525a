//! `parcelview` - render a parcel card from a card YAML and a host state dump.
//!
//! ```text
//! parcelview <card.yaml> <states.json> [--tab <tab>] [--select <key>] [--now <rfc3339>]
//! ```
//!
//! The card view is printed to stdout as pretty JSON; logs go to stderr and
//! honour `RUST_LOG`.

use std::path::PathBuf;

use anyhow::{Context, bail};
use chrono::{DateTime, FixedOffset, Local};
use parcelview::{
    CardConfig, CardView, HostStates, Tab, ViewState, build_card_view, load_inputs,
};
use tracing_subscriber::EnvFilter;

const USAGE: &str =
    "usage: parcelview <card.yaml> <states.json> [--tab <tab>] [--select <key>] [--now <rfc3339>]";

#[derive(Debug)]
struct CliArgs {
    config_path: PathBuf,
    states_path: PathBuf,
    tab: Tab,
    select: Option<String>,
    now: Option<DateTime<FixedOffset>>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let Some(args) = parse_args(std::env::args().skip(1))? else {
        println!("{USAGE}");
        return Ok(());
    };

    let (config, states) = load(&args)?;

    let mut view = ViewState::new(args.tab);
    if let Some(key) = args.select {
        view = view.toggle_parcel(key);
    }
    let now = args.now.unwrap_or_else(|| Local::now().fixed_offset());

    let card = build_card_view(&states, &config, &view, now);
    println!("{}", serde_json::to_string_pretty(&card)?);

    if let CardView::EntityNotFound { message, .. } = &card {
        bail!("{message}");
    }
    Ok(())
}

fn load(args: &CliArgs) -> anyhow::Result<(CardConfig, HostStates)> {
    load_inputs(&args.config_path, &args.states_path).with_context(|| {
        format!(
            "loading {} and {}",
            args.config_path.display(),
            args.states_path.display()
        )
    })
}

/// `Ok(None)` when help was requested.
fn parse_args<I>(args: I) -> anyhow::Result<Option<CliArgs>>
where
    I: IntoIterator<Item = String>,
{
    let mut positional = Vec::new();
    let mut tab = Tab::default();
    let mut select = None;
    let mut now = None;

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(None),
            "--tab" => {
                let value = iter.next().context("missing value for --tab")?;
                tab = value.parse()?;
            }
            "--select" => {
                select = Some(iter.next().context("missing value for --select")?);
            }
            "--now" => {
                let value = iter.next().context("missing value for --now")?;
                now = Some(
                    DateTime::parse_from_rfc3339(&value)
                        .with_context(|| format!("--now is not RFC 3339: {value}"))?,
                );
            }
            other if other.starts_with("--") => bail!("unknown flag {other}\n{USAGE}"),
            _ => positional.push(PathBuf::from(arg)),
        }
    }

    let [config_path, states_path]: [PathBuf; 2] = positional
        .try_into()
        .map_err(|_| anyhow::anyhow!("expected two paths\n{USAGE}"))?;

    Ok(Some(CliArgs {
        config_path,
        states_path,
        tab,
        select,
        now,
    }))
}
