use std::sync::Arc;

use clap::Subcommand;
use serde_json::json;

use crate::api::{ActionGate, ClientApi, ScanApi, ScanQuery};
use crate::cli::utils::*;
use crate::cli::OutputFormat;
use crate::collection::{CollectionView, ListState};
use crate::models::{Region, Scan, ScanSort, ScanStatus};
use crate::workflow::{LivePipeline, TriggerRequest, TriggerRunner, TriggerStep};

#[derive(Subcommand)]
pub enum ScanCommands {
    #[command(about = "List scans")]
    List {
        #[arg(long, help = "Match against client name and keywords")]
        search: Option<String>,

        #[arg(long, help = "Filter by client ID")]
        client: Option<String>,

        #[arg(long, help = "Filter by status (scheduled, running, completed, failed)")]
        status: Option<String>,

        #[arg(long, help = "Filter by region")]
        region: Option<String>,

        #[arg(long, help = "Sort order (latest, oldest, results, client, status)")]
        sort: Option<String>,

        #[arg(long, help = "Page number")]
        page: Option<u32>,

        #[arg(long = "per-page", help = "Rows per page")]
        per_page: Option<u32>,

        #[arg(long, help = "Only scans released to your client account")]
        sent: bool,
    },

    #[command(about = "Show one scan")]
    Show {
        #[arg(help = "Scan ID")]
        id: String,

        #[arg(long, help = "Also fetch the stored results")]
        results: bool,
    },

    #[command(about = "Run the full scan pipeline for a client")]
    Trigger {
        #[arg(long, help = "Client ID to scan for")]
        client: String,

        #[arg(long, help = "Comma-separated keywords to search")]
        keywords: String,

        #[arg(long, help = "Target region (default: US)")]
        region: Option<String>,
    },

    #[command(about = "Delete a scan and its stored results")]
    Delete {
        #[arg(help = "Scan ID")]
        id: String,

        #[arg(long, help = "Skip the confirmation prompt")]
        yes: bool,
    },

    #[command(about = "Release a completed scan to the client portal")]
    Send {
        #[arg(help = "Scan ID")]
        id: String,
    },

    #[command(about = "Weekly auto-scan scheduling")]
    AutoScan {
        #[command(subcommand)]
        cmd: AutoScanCommands,
    },
}

#[derive(Subcommand)]
pub enum AutoScanCommands {
    #[command(about = "Enable weekly auto-scan for a scan's client and region")]
    Enable {
        #[arg(help = "Scan ID")]
        id: String,

        #[arg(long, help = "Comma-separated keywords for the weekly run (default: the scan's)")]
        keywords: Option<String>,

        #[arg(long, help = "Region for the weekly run (default: the scan's)")]
        region: Option<String>,
    },

    #[command(about = "Disable weekly auto-scan")]
    Disable {
        #[arg(help = "Scan ID")]
        id: String,
    },
}

#[derive(Debug, Default, Clone)]
struct ScanFilters {
    client: Option<String>,
    status: Option<ScanStatus>,
    region: Option<Region>,
}

impl ScanFilters {
    fn matches(&self, scan: &Scan) -> bool {
        let client_ok = self.client.as_deref().map_or(true, |wanted| {
            scan.client_id.as_ref().map_or(false, |c| c.id() == wanted)
        });
        let status_ok = self.status.map_or(true, |status| scan.status == status);
        let region_ok = self.region.map_or(true, |region| scan.region == region);
        client_ok && status_ok && region_ok
    }
}

pub async fn handle(cmd: ScanCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let gateway = connect()?;
    let api = ScanApi::new(Arc::clone(&gateway));
    let gate = ActionGate::new();

    match cmd {
        ScanCommands::List { search, client, status, region, sort, page, per_page, sent } => {
            let scans = if sent {
                api.list_sent().await?
            } else {
                api.list(&ScanQuery::default()).await?
            };
            if scans.is_empty() {
                return output_empty_collection(&output_format, "scans", "No scans found");
            }

            let mut state = ListState::<ScanFilters, ScanSort>::new();
            state.set_filters(ScanFilters {
                client,
                status: parse_opt(status)?,
                region: parse_opt(region)?,
            });
            if let Some(sort) = parse_opt(sort)? {
                state.set_sort(sort);
            }
            if let Some(search) = search {
                state.set_search(search);
            }
            if let Some(per_page) = per_page {
                state.set_per_page(per_page);
            }
            if let Some(page) = page {
                state.set_page(page);
            }

            let filters = state.filters().clone();
            let sort = *state.sort();
            let page = CollectionView::new(&scans)
                .search(state.search(), |s: &Scan| {
                    let mut fields = vec![s.client_display_name()];
                    fields.extend(s.keywords.iter().map(|k| k.as_str()));
                    fields
                })
                .filter(|s| filters.matches(s))
                .sort_by(|a, b| sort.compare(a, b))
                .page(state.page(), state.per_page())?;

            match output_format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&page)?);
                }
                OutputFormat::Text => {
                    if page.is_empty() {
                        println!("No scans found");
                        return Ok(());
                    }

                    println!(
                        "{:<26} {:<22} {:<7} {:<13} {:<10} {:<10} {:<8} {}",
                        "ID", "CLIENT", "REGION", "TYPE", "STATUS", "VISIBILITY", "RESULTS", "DATE"
                    );
                    println!("{}", "-".repeat(120));

                    for scan in &page.items {
                        println!(
                            "{:<26} {:<22} {:<7} {:<13} {:<10} {:<10} {:<8} {}",
                            scan.id,
                            scan.client_display_name(),
                            scan.region,
                            scan.scan_type,
                            scan.status,
                            scan.client_status,
                            scan.results_count,
                            format_date(scan.activity_timestamp())
                        );
                    }
                    print_page_footer(&page);
                }
            }
            Ok(())
        }
        ScanCommands::Show { id, results } => {
            let scan = api.get(&id).await?;

            match output_format {
                OutputFormat::Json => {
                    let mut body = json!({ "scan": scan });
                    if results {
                        let items = api.results(&id).await?;
                        body["results"] = json!(items);
                    }
                    println!("{}", serde_json::to_string_pretty(&body)?);
                }
                OutputFormat::Text => {
                    println!("{:<14} {}", "ID:", scan.id);
                    println!("{:<14} {}", "Client:", scan.client_display_name());
                    if !scan.keywords.is_empty() {
                        println!("{:<14} {}", "Keywords:", scan.keywords.join(", "));
                    }
                    if let Some(query) = &scan.search_query {
                        println!("{:<14} {}", "Query:", query);
                    }
                    println!("{:<14} {}", "Region:", scan.region);
                    println!("{:<14} {}", "Type:", scan.scan_type);
                    println!("{:<14} {}", "Status:", scan.status);
                    println!("{:<14} {}", "Visibility:", scan.client_status);
                    println!("{:<14} {}", "Results:", scan.results_count);
                    println!("{:<14} {}", "Started:", format_date(scan.started_at));
                    println!("{:<14} {}", "Completed:", format_date(scan.completed_at));
                    if scan.sent_to_client_at.is_some() {
                        println!("{:<14} {}", "Sent:", format_date(scan.sent_to_client_at));
                    }
                    println!(
                        "{:<14} {}",
                        "Auto-scan:",
                        if scan.auto_scan_enabled { "enabled" } else { "disabled" }
                    );

                    if results {
                        let items = api.results(&id).await?;
                        println!();
                        println!("Results ({}):", items.len());
                        println!("{}", serde_json::to_string_pretty(&items)?);
                    }
                }
            }
            Ok(())
        }
        ScanCommands::Trigger { client, keywords, region } => {
            let keywords = split_csv(&keywords);
            let region: Region = parse_opt(region)?.unwrap_or_default();

            let clients = ClientApi::new(Arc::clone(&gateway));
            let client = clients.get(&client).await?;

            let request = TriggerRequest::new(client, keywords, region);
            let runner = TriggerRunner::new(LivePipeline::new(Arc::clone(&gateway)));

            let total = TriggerStep::ALL.len();
            let text = output_format.is_text();
            let outcome = runner
                .run_with_progress(&request, |step| {
                    if text {
                        println!("Step {} of {}: {}...", step.index(), total, step.label());
                    }
                })
                .await?;

            output_success(
                &output_format,
                &format!("Scan completed successfully! Found {} results.", outcome.results_count),
                Some(json!({
                    "scanId": outcome.scan_id,
                    "resultsCount": outcome.results_count
                })),
            )
        }
        ScanCommands::Delete { id, yes } => {
            if !yes && !confirm(&format!("Delete scan {}? This also deletes its stored results.", id))? {
                println!("Deletion cancelled");
                return Ok(());
            }

            let _permit = match gate.begin(&id) {
                Some(permit) => permit,
                None => return output_error(&output_format, "Another action for this scan is in flight"),
            };

            let response = api.delete(&id).await?;
            output_success(
                &output_format,
                &format!(
                    "Scan deleted ({} stored result(s) removed)",
                    response.deleted_results_count
                ),
                None,
            )
        }
        ScanCommands::Send { id } => {
            let _permit = match gate.begin(&id) {
                Some(permit) => permit,
                None => return output_error(&output_format, "Another action for this scan is in flight"),
            };

            let scan = api.get(&id).await?;
            let response = api.send_to_client(&scan).await?;
            output_success(
                &output_format,
                response
                    .message
                    .as_deref()
                    .unwrap_or("Scan sent to client"),
                None,
            )
        }
        ScanCommands::AutoScan { cmd } => match cmd {
            AutoScanCommands::Enable { id, keywords, region } => {
                let scan = api.get(&id).await?;
                let keywords = match keywords {
                    Some(keywords) => split_csv(&keywords),
                    None if !scan.keywords.is_empty() => scan.keywords.clone(),
                    None => vec!["scan".to_string()],
                };
                let region = match region {
                    Some(region) => parse_arg(&region)?,
                    None => scan.region,
                };

                let response = api.enable_auto_scan(&scan.id, &keywords, region).await?;
                output_success(
                    &output_format,
                    response.message.as_deref().unwrap_or("Auto-scan enabled"),
                    None,
                )
            }
            AutoScanCommands::Disable { id } => {
                let response = api.disable_auto_scan(&id).await?;
                output_success(
                    &output_format,
                    response.message.as_deref().unwrap_or("Auto-scan disabled"),
                    None,
                )
            }
        },
    }
}
