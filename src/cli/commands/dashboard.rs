use clap::Subcommand;

use crate::api::DashboardApi;
use crate::cli::utils::*;
use crate::cli::OutputFormat;
use crate::models::RecentActivity;

#[derive(Subcommand)]
pub enum DashboardCommands {
    #[command(about = "Admin overview: totals, recent activity, scan trends")]
    Admin,

    #[command(about = "Overview for the authenticated client account")]
    Client,
}

pub async fn handle(cmd: DashboardCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let gateway = connect()?;
    let api = DashboardApi::new(gateway);

    match cmd {
        DashboardCommands::Admin => {
            let dashboard = api.admin().await?;

            match output_format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&dashboard)?);
                }
                OutputFormat::Text => {
                    let overview = &dashboard.overview;
                    println!(
                        "{:<12} {} ({} active)",
                        "Clients:", overview.total_clients, overview.active_clients
                    );
                    println!(
                        "{:<12} {} ({} active)",
                        "Keywords:", overview.total_keywords, overview.active_keywords
                    );
                    println!("{:<12} {}", "Scans:", overview.total_scans);
                    println!("{:<12} {}", "Reports:", overview.total_reports);

                    print_recent_activity(&dashboard.recent_activity);

                    if !dashboard.charts.scan_trends.is_empty() {
                        println!();
                        println!("Scans per day:");
                        for point in &dashboard.charts.scan_trends {
                            println!("  {:<12} {}", point.date, point.count);
                        }
                    }
                }
            }
            Ok(())
        }
        DashboardCommands::Client => {
            let dashboard = api.client().await?;

            match output_format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&dashboard)?);
                }
                OutputFormat::Text => {
                    println!("{}", dashboard.client.name);
                    println!(
                        "Campaign progress: {:.0}%",
                        dashboard.client.campaign_progress
                    );
                    println!();

                    let overview = &dashboard.overview;
                    println!(
                        "{:<12} {} ({} active)",
                        "Keywords:", overview.total_keywords, overview.active_keywords
                    );
                    println!(
                        "{:<12} {} ({} completed, {} running, {} failed)",
                        "Scans:",
                        overview.total_scans,
                        overview.completed_scans,
                        overview.running_scans,
                        overview.failed_scans
                    );
                    println!("{:<12} {}", "Reports:", overview.total_reports);
                    println!(
                        "{:<12} {} ({:.1} avg per scan)",
                        "Results:", overview.total_results, overview.avg_results
                    );

                    print_recent_activity(&dashboard.recent_activity);
                }
            }
            Ok(())
        }
    }
}

fn print_recent_activity(activity: &RecentActivity) {
    if !activity.scans.is_empty() {
        println!();
        println!("Recent scans:");
        for scan in &activity.scans {
            println!(
                "  {:<22} {:<10} {:<8} {}",
                scan.client_display_name(),
                scan.status,
                scan.results_count,
                format_date(scan.activity_timestamp())
            );
        }
    }

    if !activity.reports.is_empty() {
        println!();
        println!("Recent reports:");
        for report in &activity.reports {
            println!(
                "  {:<22} week {:<4} {}",
                report.client_display_name(),
                report.week_number,
                format_date(report.generated_at)
            );
        }
    }
}
