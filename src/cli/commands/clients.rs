use clap::Subcommand;
use serde_json::json;

use crate::api::ClientApi;
use crate::cli::utils::*;
use crate::cli::OutputFormat;
use crate::collection::{CollectionView, ListState};
use crate::models::{Client, ClientPayload, ClientSort, SubscriptionStatus};

#[derive(Subcommand)]
pub enum ClientCommands {
    #[command(about = "List clients")]
    List {
        #[arg(long, help = "Match against name, email, and company")]
        search: Option<String>,

        #[arg(long, help = "Filter by subscription status (active, inactive, trial, suspended)")]
        status: Option<String>,

        #[arg(long, help = "Sort order (name, newest)")]
        sort: Option<String>,

        #[arg(long, help = "Page number")]
        page: Option<u32>,

        #[arg(long = "per-page", help = "Rows per page")]
        per_page: Option<u32>,
    },

    #[command(about = "Show one client with its aggregate stats")]
    Show {
        #[arg(help = "Client ID")]
        id: String,
    },

    #[command(about = "Create a client")]
    Add {
        #[arg(help = "Client name")]
        name: String,

        #[arg(long, help = "Contact email")]
        email: Option<String>,

        #[arg(long, help = "Contact phone")]
        phone: Option<String>,

        #[arg(long, help = "Company name")]
        company: Option<String>,

        #[arg(long, help = "Industry")]
        industry: Option<String>,

        #[arg(long = "business-type", help = "Business type")]
        business_type: Option<String>,

        #[arg(long = "target-audience", help = "Target audience")]
        target_audience: Option<String>,

        #[arg(long, help = "Website URL")]
        website: Option<String>,

        #[arg(long, help = "Short description")]
        description: Option<String>,
    },

    #[command(about = "Update a client")]
    Update {
        #[arg(help = "Client ID")]
        id: String,

        #[arg(long, help = "Client name")]
        name: Option<String>,

        #[arg(long, help = "Contact email")]
        email: Option<String>,

        #[arg(long, help = "Contact phone")]
        phone: Option<String>,

        #[arg(long, help = "Company name")]
        company: Option<String>,

        #[arg(long, help = "Industry")]
        industry: Option<String>,

        #[arg(long = "business-type", help = "Business type")]
        business_type: Option<String>,

        #[arg(long = "target-audience", help = "Target audience")]
        target_audience: Option<String>,

        #[arg(long, help = "Website URL")]
        website: Option<String>,

        #[arg(long, help = "Short description")]
        description: Option<String>,
    },

    #[command(about = "Delete a client")]
    Delete {
        #[arg(help = "Client ID")]
        id: String,

        #[arg(long, help = "Skip the confirmation prompt")]
        yes: bool,
    },
}

#[derive(Debug, Default, Clone)]
struct ClientFilters {
    status: Option<SubscriptionStatus>,
}

impl ClientFilters {
    fn matches(&self, client: &Client) -> bool {
        self.status
            .map_or(true, |status| client.subscription_status() == Some(status))
    }
}

pub async fn handle(cmd: ClientCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let gateway = connect()?;
    let api = ClientApi::new(gateway);

    match cmd {
        ClientCommands::List { search, status, sort, page, per_page } => {
            let clients = api.list().await?;
            if clients.is_empty() {
                return output_empty_collection(&output_format, "clients", "No clients found");
            }

            let mut state = ListState::<ClientFilters, ClientSort>::new();
            state.set_filters(ClientFilters { status: parse_opt(status)? });
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
            let page = CollectionView::new(&clients)
                .search(state.search(), |c: &Client| {
                    let mut fields = vec![c.name.as_str(), c.contact.email.as_str()];
                    if let Some(company) = c.contact.company.as_deref() {
                        fields.push(company);
                    }
                    fields
                })
                .filter(|c| filters.matches(c))
                .sort_by(|a, b| sort.compare(a, b))
                .page(state.page(), state.per_page())?;

            match output_format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&page)?);
                }
                OutputFormat::Text => {
                    if page.is_empty() {
                        println!("No clients found");
                        return Ok(());
                    }

                    println!(
                        "{:<26} {:<24} {:<28} {:<10} {}",
                        "ID", "NAME", "EMAIL", "STATUS", "CREATED"
                    );
                    println!("{}", "-".repeat(106));

                    for client in &page.items {
                        let status = client
                            .subscription_status()
                            .map(|s| s.as_str())
                            .unwrap_or("-");
                        println!(
                            "{:<26} {:<24} {:<28} {:<10} {}",
                            client.id,
                            client.name,
                            client.contact.email,
                            status,
                            format_date(client.created_at)
                        );
                    }
                    print_page_footer(&page);
                }
            }
            Ok(())
        }
        ClientCommands::Show { id } => {
            let client = api.get(&id).await?;
            let stats = api.stats(&id).await?;

            match output_format {
                OutputFormat::Json => {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&json!({
                            "client": client,
                            "stats": stats
                        }))?
                    );
                }
                OutputFormat::Text => {
                    println!("{:<18} {}", "ID:", client.id);
                    println!("{:<18} {}", "Name:", client.name);
                    println!("{:<18} {}", "Email:", client.contact.email);
                    if let Some(phone) = &client.contact.phone {
                        println!("{:<18} {}", "Phone:", phone);
                    }
                    if let Some(company) = &client.contact.company {
                        println!("{:<18} {}", "Company:", company);
                    }
                    if let Some(status) = client.subscription_status() {
                        println!("{:<18} {}", "Subscription:", status);
                    }
                    if !client.settings.industry.is_empty() {
                        println!("{:<18} {}", "Industry:", client.settings.industry);
                    }
                    if !client.settings.website.is_empty() {
                        println!("{:<18} {}", "Website:", client.settings.website);
                    }
                    println!("{:<18} {}", "Created:", format_date(client.created_at));
                    println!();
                    println!("{:<18} {}", "Keywords:", stats.total_keywords);
                    println!("{:<18} {}", "Active keywords:", stats.active_keywords);
                    println!("{:<18} {}", "Scans:", stats.total_scans);
                    println!("{:<18} {}", "Reports:", stats.total_reports);
                }
            }
            Ok(())
        }
        ClientCommands::Add {
            name,
            email,
            phone,
            company,
            industry,
            business_type,
            target_audience,
            website,
            description,
        } => {
            let mut payload = ClientPayload {
                name,
                ..Default::default()
            };
            payload.contact.email = email.unwrap_or_default();
            payload.contact.phone = phone;
            payload.contact.company = company;
            if let Some(industry) = industry {
                payload.settings.industry = industry;
            }
            if let Some(business_type) = business_type {
                payload.settings.business_type = business_type;
            }
            if let Some(target_audience) = target_audience {
                payload.settings.target_audience = target_audience;
            }
            if let Some(website) = website {
                payload.settings.website = website;
            }
            if let Some(description) = description {
                payload.settings.description = description;
            }

            let client = api.create(&payload).await?;
            output_success(
                &output_format,
                &format!("Client '{}' created", client.name),
                Some(json!({ "client": client })),
            )
        }
        ClientCommands::Update {
            id,
            name,
            email,
            phone,
            company,
            industry,
            business_type,
            target_audience,
            website,
            description,
        } => {
            // The endpoint replaces the record, so merge flags onto the
            // current state rather than sending a sparse payload.
            let current = api.get(&id).await?;
            let mut payload = ClientPayload {
                name: current.name,
                contact: current.contact,
                subscription: current.subscription,
                settings: current.settings,
            };

            if let Some(name) = name {
                payload.name = name;
            }
            if let Some(email) = email {
                payload.contact.email = email;
            }
            if let Some(phone) = phone {
                payload.contact.phone = Some(phone);
            }
            if let Some(company) = company {
                payload.contact.company = Some(company);
            }
            if let Some(industry) = industry {
                payload.settings.industry = industry;
            }
            if let Some(business_type) = business_type {
                payload.settings.business_type = business_type;
            }
            if let Some(target_audience) = target_audience {
                payload.settings.target_audience = target_audience;
            }
            if let Some(website) = website {
                payload.settings.website = website;
            }
            if let Some(description) = description {
                payload.settings.description = description;
            }

            let client = api.update(&id, &payload).await?;
            output_success(
                &output_format,
                &format!("Client '{}' updated", client.name),
                Some(json!({ "client": client })),
            )
        }
        ClientCommands::Delete { id, yes } => {
            if !yes && !confirm(&format!("Delete client {}? This removes its keywords, scans, and reports.", id))? {
                println!("Deletion cancelled");
                return Ok(());
            }

            api.delete(&id).await?;
            output_success(&output_format, "Client deleted", None)
        }
    }
}
