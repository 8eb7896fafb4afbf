use std::fmt::Display;
use std::io::{self, Write};
use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::{json, Value};

use crate::cli::OutputFormat;
use crate::collection::Page;
use crate::gateway::ApiGateway;
use crate::session::FileSessionStore;

/// Output a success message in the appropriate format
pub fn output_success(
    output_format: &OutputFormat,
    message: &str,
    data: Option<Value>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let Some(Value::Object(extra)) = data {
                if let Some(object) = response.as_object_mut() {
                    object.extend(extra);
                }
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output an error message in the appropriate format
pub fn output_error(output_format: &OutputFormat, message: &str) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    "success": false,
                    "error": message
                }))?
            );
        }
        OutputFormat::Text => {
            eprintln!("Error: {}", message);
        }
    }
    Ok(())
}

/// Output an empty collection in the appropriate format
pub fn output_empty_collection(
    output_format: &OutputFormat,
    collection_name: &str,
    message: &str,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({ collection_name: [] }))?
            );
        }
        OutputFormat::Text => {
            println!("{}", message);
        }
    }
    Ok(())
}

/// Gateway wired to the persisted session. The session-end notice prints
/// once no matter which request hit the expired token.
pub fn connect() -> anyhow::Result<Arc<ApiGateway>> {
    let store = FileSessionStore::from_env()?;
    let gateway = ApiGateway::from_config(Arc::new(store))?;
    gateway.on_session_end(|| {
        eprintln!("Session expired. Please log in again.");
    });
    Ok(Arc::new(gateway))
}

/// y/N prompt; anything but an explicit yes declines.
pub fn confirm(prompt: &str) -> anyhow::Result<bool> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    let answer = answer.trim().to_lowercase();
    Ok(answer == "y" || answer == "yes")
}

/// Parse a flag value with a usable message on failure.
pub fn parse_arg<T>(value: &str) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    value.parse().map_err(|e| anyhow::anyhow!("{}", e))
}

pub fn parse_opt<T>(value: Option<String>) -> anyhow::Result<Option<T>>
where
    T: FromStr,
    T::Err: Display,
{
    value.as_deref().map(parse_arg).transpose()
}

/// Comma-separated flag values, trimmed, empties dropped.
pub fn split_csv(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|part| part.trim().to_string())
        .filter(|part| !part.is_empty())
        .collect()
}

pub fn format_date(timestamp: Option<DateTime<Utc>>) -> String {
    timestamp
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Footer line under every text-mode table.
pub fn print_page_footer<T>(page: &Page<'_, T>) {
    println!(
        "Page {} of {} ({} matching)",
        page.page, page.total_pages, page.total_filtered
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Region;

    #[test]
    fn parse_opt_maps_values_and_passes_none_through() {
        let region: Option<Region> = parse_opt(Some("uk".to_string())).unwrap();
        assert_eq!(region, Some(Region::UK));

        let none: Option<Region> = parse_opt(None).unwrap();
        assert_eq!(none, None);

        let err = parse_opt::<Region>(Some("zz".to_string())).unwrap_err();
        assert!(err.to_string().contains("unknown region"));
    }

    #[test]
    fn missing_dates_render_as_dash() {
        assert_eq!(format_date(None), "-");
    }

    #[test]
    fn split_csv_trims_and_drops_empties() {
        assert_eq!(
            split_csv(" reviews, reputation ,,complaints"),
            vec!["reviews", "reputation", "complaints"]
        );
        assert!(split_csv("  ").is_empty());
    }
}
