use anyhow::Result;
use colored::*;
use serde_json::json;

/// Execute the health check command
pub async fn execute(url: &str, format: &str) -> Result<()> {
    let status = check_api_health(url).await;

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
        _ => {
            print_health_status_text(&status);
        }
    }

    Ok(())
}

fn health_endpoint(base_url: &str) -> String {
    format!("{}/api/health", base_url.trim_end_matches('/'))
}

/// Ask a running server for its health report
async fn check_api_health(base_url: &str) -> serde_json::Value {
    let endpoint = health_endpoint(base_url);

    match reqwest::get(&endpoint).await {
        Ok(response) if response.status().is_success() => {
            match response.json::<serde_json::Value>().await {
                Ok(report) => json!({
                    "status": report["status"].as_str().unwrap_or("unknown"),
                    "message": "API server is running and responsive",
                    "endpoint": endpoint,
                    "report": report
                }),
                Err(e) => json!({
                    "status": "unhealthy",
                    "message": format!("API server returned an unreadable report: {}", e),
                    "endpoint": endpoint
                }),
            }
        }
        Ok(response) => json!({
            "status": "unhealthy",
            "message": format!("API server returned status: {}", response.status()),
            "endpoint": endpoint
        }),
        Err(_) => json!({
            "status": "offline",
            "message": "API server is not running or not reachable",
            "endpoint": endpoint
        }),
    }
}

/// Print health status in a formatted text output
fn print_health_status_text(status: &serde_json::Value) {
    println!("{}", "=== Taskboard Health Check ===".bold());
    println!();

    let overall_status = status["status"].as_str().unwrap_or("unknown");
    let status_display = match overall_status {
        "healthy" => "HEALTHY".green().bold(),
        "degraded" => "DEGRADED".yellow().bold(),
        "unhealthy" => "UNHEALTHY".red().bold(),
        "offline" => "OFFLINE".white().bold(),
        _ => "UNKNOWN".white().bold(),
    };

    println!("Overall Status: {}", status_display);
    println!("Endpoint: {}", status["endpoint"].as_str().unwrap_or(""));
    if let Some(message) = status["message"].as_str() {
        println!("{}", message);
    }

    let report = &status["report"];
    if let Some(version) = report["version"].as_str() {
        println!("Version: {}", version);
    }
    if let Some(store) = report["store"].as_object() {
        println!();
        println!("{}", "Store:".bold());
        println!("{}", "─".repeat(50));
        for kind in ["projects", "tasks", "users"] {
            if let Some(count) = store.get(kind).and_then(|v| v.as_u64()) {
                println!("  {}: {}", kind, count);
            }
        }
    }
}
