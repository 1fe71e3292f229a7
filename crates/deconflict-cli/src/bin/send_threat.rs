//! CLI tool to send a synthetic threat to the deconfliction server.

use anyhow::Result;
use chrono::Utc;
use clap::Parser;

use deconflict_core::models::{ResolutionResult, Threat, ThreatKind};

/// Send a threat to the deconfliction server and print the resolution
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Deconfliction server URL
    #[arg(long, default_value = "http://localhost:4000")]
    url: String,

    /// Threat kind: loss-of-separation | geofence-conflict | geofence-intrusion
    #[arg(long, default_value = "loss-of-separation")]
    kind: String,

    /// Aircraft identifiers (two for separation threats, one for geofence threats)
    #[arg(long = "uav", required = true)]
    uav_ids: Vec<String>,

    /// Geofence identifier (geofence threats only)
    #[arg(long)]
    geofence: Option<String>,

    /// Predicted conflict time, seconds from now
    #[arg(long, default_value_t = 30.0)]
    horizon: f64,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let kind = match args.kind.as_str() {
        "loss-of-separation" => ThreatKind::LossOfSeparation,
        "geofence-conflict" => ThreatKind::GeofenceConflict,
        "geofence-intrusion" => ThreatKind::GeofenceIntrusion,
        other => anyhow::bail!("unknown threat kind: {other}"),
    };

    let now_s = Utc::now().timestamp() as f64;
    let threat = Threat {
        kind,
        uav_ids: args.uav_ids.clone(),
        times_s: args.uav_ids.iter().map(|_| now_s + args.horizon).collect(),
        geofence_ids: args.geofence.clone().into_iter().collect(),
    };

    println!("Sending {} threat to {}...", args.kind, args.url);
    let client = reqwest::Client::new();
    let response = client
        .post(format!("{}/v1/deconfliction", args.url))
        .json(&serde_json::json!({ "threat": threat, "tactical": true }))
        .send()
        .await?
        .error_for_status()?;
    let result: ResolutionResult = response.json().await?;

    if result.success {
        println!("Resolved: {}", result.message);
        for (uav, plan) in result.uav_ids.iter().zip(&result.deconflicted_plans) {
            println!("  {} -> {} corrected waypoints", uav, plan.waypoints.len());
        }
    } else {
        eprintln!("Resolution failed: {}", result.message);
        std::process::exit(1);
    }
    Ok(())
}
