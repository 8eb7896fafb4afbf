use clap::Subcommand;
use serde_json::json;

use crate::api::{KeywordApi, KeywordQuery};
use crate::cli::utils::*;
use crate::cli::OutputFormat;
use crate::collection::{CollectionView, ListState};
use crate::models::{
    BulkKeywordEntry, BulkKeywords, Keyword, KeywordPriority, KeywordSort, KeywordStatus,
    NewKeyword, Region,
};

#[derive(Subcommand)]
pub enum KeywordCommands {
    #[command(about = "List keywords")]
    List {
        #[arg(long, help = "Only keywords of this client ID")]
        client: Option<String>,

        #[arg(long, help = "Filter by status (active, inactive, paused)")]
        status: Option<String>,

        #[arg(long, help = "Filter by target region")]
        region: Option<String>,

        #[arg(long, help = "Match against keyword text and client name")]
        search: Option<String>,

        #[arg(long, help = "Sort order (newest, priority)")]
        sort: Option<String>,

        #[arg(long, help = "Page number")]
        page: Option<u32>,

        #[arg(long = "per-page", help = "Rows per page")]
        per_page: Option<u32>,
    },

    #[command(about = "Add a keyword for a client")]
    Add {
        #[arg(help = "Keyword text")]
        keyword: String,

        #[arg(long, help = "Client ID the keyword belongs to")]
        client: String,

        #[arg(long, help = "Comma-separated target regions (default: US)")]
        regions: Option<String>,

        #[arg(long, help = "Priority (low, medium, high)")]
        priority: Option<String>,

        #[arg(long, help = "Free-form notes")]
        notes: Option<String>,
    },

    #[command(about = "Update a keyword")]
    Update {
        #[arg(help = "Keyword ID")]
        id: String,

        #[arg(long, help = "Keyword text")]
        keyword: Option<String>,

        #[arg(long, help = "Comma-separated target regions")]
        regions: Option<String>,

        #[arg(long, help = "Priority (low, medium, high)")]
        priority: Option<String>,

        #[arg(long, help = "Free-form notes")]
        notes: Option<String>,
    },

    #[command(about = "Delete a keyword")]
    Delete {
        #[arg(help = "Keyword ID")]
        id: String,

        #[arg(long, help = "Skip the confirmation prompt")]
        yes: bool,
    },

    #[command(about = "Set a keyword's status")]
    SetStatus {
        #[arg(help = "Keyword ID")]
        id: String,

        #[arg(help = "New status (active, inactive, paused)")]
        status: String,
    },

    #[command(about = "Add several keywords for one client in a single request")]
    BulkAdd {
        #[arg(long, help = "Client ID the keywords belong to")]
        client: String,

        #[arg(long, help = "Comma-separated keyword texts")]
        keywords: String,

        #[arg(long, help = "Comma-separated target regions (default: US)")]
        regions: Option<String>,

        #[arg(long, help = "Priority for all added keywords (low, medium, high)")]
        priority: Option<String>,
    },
}

#[derive(Debug, Default, Clone)]
struct KeywordFilters {
    status: Option<KeywordStatus>,
    region: Option<Region>,
}

impl KeywordFilters {
    fn matches(&self, keyword: &Keyword) -> bool {
        let status_ok = self.status.map_or(true, |status| keyword.status == status);
        let region_ok = self
            .region
            .map_or(true, |region| keyword.target_regions.contains(&region));
        status_ok && region_ok
    }
}

fn parse_regions(value: Option<String>) -> anyhow::Result<Vec<Region>> {
    match value {
        None => Ok(vec![Region::US]),
        Some(value) => value
            .split(',')
            .map(|part| parse_arg(part.trim()))
            .collect(),
    }
}

fn regions_label(regions: &[Region]) -> String {
    regions
        .iter()
        .map(|r| r.as_str())
        .collect::<Vec<_>>()
        .join(",")
}

pub async fn handle(cmd: KeywordCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let gateway = connect()?;
    let api = KeywordApi::new(gateway);

    match cmd {
        KeywordCommands::List { client, status, region, search, sort, page, per_page } => {
            // The client narrows which records are fetched; status and
            // region narrow the view over them, so the footer counts match
            // what the filters kept.
            let query = KeywordQuery {
                client_id: client,
                ..Default::default()
            };
            let keywords = api.list(&query).await?;
            if keywords.is_empty() {
                return output_empty_collection(&output_format, "keywords", "No keywords found");
            }

            let mut state = ListState::<KeywordFilters, KeywordSort>::new();
            state.set_filters(KeywordFilters {
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
            let page = CollectionView::new(&keywords)
                .search(state.search(), |k: &Keyword| {
                    vec![k.keyword.as_str(), k.client_display_name()]
                })
                .filter(|k| filters.matches(k))
                .sort_by(|a, b| sort.compare(a, b))
                .page(state.page(), state.per_page())?;

            match output_format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&page)?);
                }
                OutputFormat::Text => {
                    if page.is_empty() {
                        println!("No keywords found");
                        return Ok(());
                    }

                    println!(
                        "{:<26} {:<24} {:<20} {:<9} {:<9} {:<13} {}",
                        "ID", "KEYWORD", "CLIENT", "PRIORITY", "STATUS", "REGIONS", "CREATED"
                    );
                    println!("{}", "-".repeat(120));

                    for keyword in &page.items {
                        println!(
                            "{:<26} {:<24} {:<20} {:<9} {:<9} {:<13} {}",
                            keyword.id,
                            keyword.keyword,
                            keyword.client_display_name(),
                            keyword.priority,
                            keyword.status,
                            regions_label(&keyword.target_regions),
                            format_date(keyword.created_at)
                        );
                    }
                    print_page_footer(&page);
                }
            }
            Ok(())
        }
        KeywordCommands::Add { keyword, client, regions, priority, notes } => {
            let new_keyword = NewKeyword {
                client_id: client,
                keyword,
                target_regions: parse_regions(regions)?,
                priority: parse_opt(priority)?.unwrap_or_default(),
                notes,
            };

            let keyword = api.create(&new_keyword).await?;
            output_success(
                &output_format,
                &format!("Keyword '{}' added", keyword.keyword),
                Some(json!({ "keyword": keyword })),
            )
        }
        KeywordCommands::Update { id, keyword, regions, priority, notes } => {
            // Full-replace endpoint; merge flags onto the current record.
            let current = api.get(&id).await?;
            let payload = NewKeyword {
                client_id: current
                    .client_id
                    .as_ref()
                    .map(|c| c.id().to_string())
                    .unwrap_or_default(),
                keyword: keyword.unwrap_or(current.keyword),
                target_regions: match regions {
                    Some(regions) => parse_regions(Some(regions))?,
                    None => current.target_regions,
                },
                priority: match priority {
                    Some(priority) => parse_arg(&priority)?,
                    None => current.priority,
                },
                notes: notes.or(current.notes),
            };

            let keyword = api.update(&id, &payload).await?;
            output_success(
                &output_format,
                &format!("Keyword '{}' updated", keyword.keyword),
                Some(json!({ "keyword": keyword })),
            )
        }
        KeywordCommands::Delete { id, yes } => {
            if !yes && !confirm(&format!("Delete keyword {}?", id))? {
                println!("Deletion cancelled");
                return Ok(());
            }

            api.delete(&id).await?;
            output_success(&output_format, "Keyword deleted", None)
        }
        KeywordCommands::SetStatus { id, status } => {
            let status: KeywordStatus = parse_arg(&status)?;
            let keyword = api.set_status(&id, status).await?;
            output_success(
                &output_format,
                &format!("Keyword '{}' is now {}", keyword.keyword, keyword.status),
                Some(json!({ "keyword": keyword })),
            )
        }
        KeywordCommands::BulkAdd { client, keywords, regions, priority } => {
            let texts = split_csv(&keywords);
            if texts.is_empty() {
                return output_error(&output_format, "No keywords given");
            }

            let target_regions = parse_regions(regions)?;
            let priority: KeywordPriority = parse_opt(priority)?.unwrap_or_default();
            let batch = BulkKeywords {
                client_id: client,
                keywords: texts
                    .into_iter()
                    .map(|keyword| BulkKeywordEntry {
                        keyword,
                        target_regions: target_regions.clone(),
                        priority,
                        notes: None,
                    })
                    .collect(),
            };

            let response = api.bulk_create(&batch).await?;
            output_success(
                &output_format,
                &format!("Added {} keyword(s)", response.keywords.len()),
                Some(json!({ "keywords": response.keywords })),
            )
        }
    }
}
