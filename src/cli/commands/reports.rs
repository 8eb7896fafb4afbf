use std::fs;
use std::path::PathBuf;

use clap::Subcommand;
use serde_json::json;

use crate::api::ReportApi;
use crate::cli::utils::*;
use crate::cli::OutputFormat;
use crate::collection::{CollectionView, ListState};
use crate::models::{Region, Report, ReportSort, ReportStatus};

#[derive(Subcommand)]
pub enum ReportCommands {
    #[command(about = "List reports")]
    List {
        #[arg(long, help = "Match against client name")]
        search: Option<String>,

        #[arg(long, help = "Filter by status (generating, completed, failed)")]
        status: Option<String>,

        #[arg(long, help = "Filter by region")]
        region: Option<String>,

        #[arg(long, help = "Sort order (newest, week)")]
        sort: Option<String>,

        #[arg(long, help = "Page number")]
        page: Option<u32>,

        #[arg(long = "per-page", help = "Rows per page")]
        per_page: Option<u32>,
    },

    #[command(about = "Show one report with its summary")]
    Show {
        #[arg(help = "Report ID")]
        id: String,
    },

    #[command(about = "Rebuild a report's files from its scan results")]
    Regenerate {
        #[arg(help = "Report ID")]
        id: String,
    },

    #[command(about = "Download a report file")]
    Download {
        #[arg(help = "Report ID")]
        id: String,

        #[arg(long, help = "File format (pdf, excel)", default_value = "pdf")]
        format: String,

        #[arg(long, help = "Write to this path instead of the server's filename")]
        out: Option<PathBuf>,
    },
}

#[derive(Debug, Default, Clone)]
struct ReportFilters {
    status: Option<ReportStatus>,
    region: Option<Region>,
}

impl ReportFilters {
    fn matches(&self, report: &Report) -> bool {
        let status_ok = self.status.map_or(true, |status| report.status == status);
        let region_ok = self.region.map_or(true, |region| report.region == region);
        status_ok && region_ok
    }
}

pub async fn handle(cmd: ReportCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let gateway = connect()?;
    let api = ReportApi::new(gateway);

    match cmd {
        ReportCommands::List { search, status, region, sort, page, per_page } => {
            let reports = api.list().await?;
            if reports.is_empty() {
                return output_empty_collection(&output_format, "reports", "No reports found");
            }

            let mut state = ListState::<ReportFilters, ReportSort>::new();
            state.set_filters(ReportFilters {
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
            let page = CollectionView::new(&reports)
                .search(state.search(), |r: &Report| vec![r.client_display_name()])
                .filter(|r| filters.matches(r))
                .sort_by(|a, b| sort.compare(a, b))
                .page(state.page(), state.per_page())?;

            match output_format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&page)?);
                }
                OutputFormat::Text => {
                    if page.is_empty() {
                        println!("No reports found");
                        return Ok(());
                    }

                    println!(
                        "{:<26} {:<22} {:<5} {:<7} {:<8} {:<11} {:<8} {}",
                        "ID", "CLIENT", "WEEK", "REGION", "TYPE", "STATUS", "RESULTS", "GENERATED"
                    );
                    println!("{}", "-".repeat(112));

                    for report in &page.items {
                        println!(
                            "{:<26} {:<22} {:<5} {:<7} {:<8} {:<11} {:<8} {}",
                            report.id,
                            report.client_display_name(),
                            report.week_number,
                            report.region,
                            report.report_type,
                            report.status,
                            report.summary.total_results,
                            format_date(report.generated_at)
                        );
                    }
                    print_page_footer(&page);
                }
            }
            Ok(())
        }
        ReportCommands::Show { id } => {
            let report = api.get(&id).await?;

            match output_format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&json!({ "report": report }))?);
                }
                OutputFormat::Text => {
                    println!("{:<18} {}", "ID:", report.id);
                    println!("{:<18} {}", "Client:", report.client_display_name());
                    println!("{:<18} {}", "Week:", report.week_number);
                    println!("{:<18} {}", "Region:", report.region);
                    println!("{:<18} {}", "Type:", report.report_type);
                    println!("{:<18} {}", "Status:", report.status);
                    println!("{:<18} {}", "Generated:", format_date(report.generated_at));
                    println!();
                    println!("{:<18} {}", "Total results:", report.summary.total_results);
                    println!("{:<18} {}", "Positive:", report.summary.positive_results);
                    println!("{:<18} {}", "Negative:", report.summary.negative_results);
                    println!("{:<18} {}", "Neutral:", report.summary.neutral_results);
                    println!("{:<18} {}", "New links:", report.summary.new_links);
                    println!("{:<18} {}", "Improved links:", report.summary.improved_links);
                    println!("{:<18} {}", "Dropped links:", report.summary.dropped_links);
                    println!("{:<18} {}", "Suppressed links:", report.summary.suppressed_links);
                }
            }
            Ok(())
        }
        ReportCommands::Regenerate { id } => {
            let response = api.regenerate(&id).await?;
            output_success(
                &output_format,
                response.message.as_deref().unwrap_or("Report regenerated"),
                None,
            )
        }
        ReportCommands::Download { id, format, out } => {
            let download = match format.as_str() {
                "pdf" => api.download_pdf(&id).await?,
                "excel" | "xlsx" => api.download_excel(&id).await?,
                other => {
                    return output_error(
                        &output_format,
                        &format!("unknown format '{}' (expected pdf, excel)", other),
                    )
                }
            };

            let extension = if format == "pdf" { "pdf" } else { "xlsx" };
            let path = out
                .or_else(|| download.filename.clone().map(PathBuf::from))
                .unwrap_or_else(|| PathBuf::from(format!("report_{}.{}", id, extension)));

            fs::write(&path, &download.bytes)?;
            output_success(
                &output_format,
                &format!("Saved {} ({} bytes)", path.display(), download.bytes.len()),
                Some(json!({ "path": path, "size": download.bytes.len() })),
            )
        }
    }
}
