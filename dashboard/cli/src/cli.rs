use std::sync::Arc;

use anyhow::Context;
use clap::{Arg, ArgAction, Command};
use tokio::sync::Mutex;

use dashboard_app::refresh::{SharedState, refresh};
use dashboard_app::state::SessionState;
use dashboard_app::view::{DashboardView, build_view};
use injector::directory::{ADDRESSBOOK_URL, fetch_directory};
use injector::networks;
use injector::payload::{DEFAULT_EXPORT_FILE, build_batch_payload};
use injector::{InjectorReader, RpcClient};

/// dashboard cli
pub struct Cli;

impl Cli {
    /// start the dashboard cli
    ///
    /// Parses command line arguments, fetches the requested injector state
    /// and renders it (or the generated batch payload) to stdout or a file.
    pub async fn execute() -> anyhow::Result<()> {
        let matches = command().get_matches();

        let output_format = matches
            .get_one::<String>("output")
            .expect("Output format has default value");

        if matches.get_flag("directory") {
            return list_directory(output_format).await;
        }

        let Some(target) = matches.get_one::<String>("target") else {
            anyhow::bail!("nothing to do: pass --directory or --target <network>-<address>");
        };

        let state = load_session(target).await?;

        if matches.get_flag("payload") {
            let overrides: Vec<String> = matches
                .get_many::<String>("set")
                .map(|values| values.cloned().collect())
                .unwrap_or_default();
            let export = matches.get_one::<String>("export").cloned();
            build_payload(&state, &overrides, export.as_deref()).await
        } else {
            let guard = state.lock().await;
            let view = build_view(&guard).context("no selection bound")?;
            render_view(&view, output_format)
        }
    }
}

fn command() -> Command {
    let networks_help = format!(
        "Injector to inspect as <network>-<address> ({})",
        networks::supported_networks().join(", ")
    );

    Command::new("injector-dashboard")
        .version("1.0")
        .about("Read/write dashboard for gauge rewards injector contracts")
        .arg(
            Arg::new("directory")
                .short('l')
                .long("directory")
                .help("List known injector deployments from the address book")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("target")
                .short('t')
                .long("target")
                .value_name("NETWORK-ADDRESS")
                .help(networks_help),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FORMAT")
                .help("Output format")
                .value_parser(["text", "json"])
                .default_value("text"),
        )
        .arg(
            Arg::new("payload")
                .short('p')
                .long("payload")
                .help("Build the batch payload updating the recipient list")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("set")
                .short('s')
                .long("set")
                .value_name("ADDRESS,AMOUNT,MAX_PERIODS")
                .help("Stage a recipient row for the payload (repeatable); unset rows keep their on-chain values")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("export")
                .short('e')
                .long("export")
                .value_name("PATH")
                .num_args(0..=1)
                .default_missing_value(DEFAULT_EXPORT_FILE)
                .help(format!(
                    "Write the batch payload to a file instead of stdout (default {DEFAULT_EXPORT_FILE})"
                )),
        )
}

async fn list_directory(output_format: &str) -> anyhow::Result<()> {
    let client = reqwest::Client::new();
    let options = match fetch_directory(&client, ADDRESSBOOK_URL).await {
        Ok(options) => options,
        Err(err) => {
            // an unreachable address book just means nothing to select
            tracing::warn!("address book fetch failed: {err}");
            Vec::new()
        }
    };

    match output_format {
        "json" => println!("{}", serde_json::to_string_pretty(&options)?),
        _ => {
            if options.is_empty() {
                println!("No injector deployments found.");
            }
            for option in &options {
                println!("{}", option.label);
            }
        }
    }
    Ok(())
}

async fn load_session(target: &str) -> anyhow::Result<SharedState> {
    let mut state = SessionState::new();
    let selection = state.select_target(target)?;

    let rpc = RpcClient::new(selection.network.rpc_url);
    let reader = InjectorReader::new(rpc, selection.contract);
    let state: SharedState = Arc::new(Mutex::new(state));

    refresh(&reader, &state, selection.id)
        .await
        .with_context(|| format!("watch list read failed for {target}"))?;

    Ok(state)
}

async fn build_payload(
    state: &SharedState,
    overrides: &[String],
    export: Option<&str>,
) -> anyhow::Result<()> {
    let mut guard = state.lock().await;
    let selection = guard
        .selection()
        .context("no selection bound")?
        .clone();

    let decimals = guard
        .balance()
        .map(|balance| balance.decimals)
        .unwrap_or(networks::DEFAULT_TOKEN_DECIMALS);

    let infos: Vec<_> = guard.loaded_infos().into_iter().cloned().collect();
    let edits = guard.edits_mut();
    edits.seed(&infos, decimals);

    for staged in overrides {
        let (address, amount, max_periods) = parse_override(staged)?;
        let key = format!("{address:#x}");
        if edits.rows().iter().any(|row| row.key == key) {
            edits.set_amount(&key, amount)?;
            edits.set_max_periods(&key, max_periods)?;
        } else {
            let key = edits.add_row().key.clone();
            edits.set_address(&key, format!("{address:#x}"))?;
            edits.set_amount(&key, amount)?;
            edits.set_max_periods(&key, max_periods)?;
        }
    }

    let entries = edits.validated_entries()?;
    let payload = build_batch_payload(&selection.network, selection.contract, decimals, &entries)?;

    let rendered = serde_json::to_string_pretty(&payload)?;

    match export {
        Some(path) => {
            std::fs::write(path, &rendered)
                .with_context(|| format!("failed to write payload to {path}"))?;
            println!("Wrote batch payload to {path}");
        }
        None => println!("{rendered}"),
    }
    Ok(())
}

fn parse_override(value: &str) -> anyhow::Result<(alloy_primitives::Address, String, String)> {
    let mut parts = value.splitn(3, ',');
    let (Some(address), Some(amount), Some(max_periods)) =
        (parts.next(), parts.next(), parts.next())
    else {
        anyhow::bail!("malformed --set {value:?}, expected ADDRESS,AMOUNT,MAX_PERIODS");
    };
    let address = address
        .trim()
        .parse()
        .with_context(|| format!("invalid address in --set {value:?}"))?;
    Ok((
        address,
        amount.trim().to_string(),
        max_periods.trim().to_string(),
    ))
}

fn render_view(view: &DashboardView, output_format: &str) -> anyhow::Result<()> {
    match output_format {
        "json" => println!("{}", serde_json::to_string_pretty(view)?),
        _ => {
            println!(
                "Watch list for {} on {} (chain {})",
                view.contract, view.network, view.chain_id
            );
            println!();
            println!(
                "{:<44} {:<24} {:>14} {:>8} {:>6} {:>8} {:<30} {:<30} {:<30}",
                "Address",
                "Pool",
                "Amount/Period",
                "Active",
                "Max",
                "Period",
                "Last Injection",
                "Next Injection",
                "Program End",
            );
            for row in &view.rows {
                println!(
                    "{:<44} {:<24} {:>14} {:>8} {:>6} {:>8} {:<30} {:<30} {:<30}",
                    row.address,
                    row.pool_name,
                    row.amount_per_period,
                    row.is_active,
                    row.max_periods,
                    row.period_number,
                    row.last_injection_date,
                    row.next_injection_date,
                    row.program_end_date,
                );
            }
            println!();
            println!(
                "Total amount to be distributed: {}",
                view.totals.total_scheduled
            );
            println!(
                "Total amount distributed:       {}",
                view.totals.total_distributed
            );
            println!(
                "Remaining to distribute:        {}",
                view.totals.total_remaining
            );
            println!(
                "Additional tokens needed:       {}",
                view.totals.additional_tokens_needed
            );
            println!("Remaining inject token balance: {}", view.remaining_balance);
        }
    }
    Ok(())
}
