//! Status command: fetches the control plane's last-observed tick and
//! prints it, after a health check.

use crate::client::{ApiClient, TransitionDto};
use anyhow::Result;
use console::style;

pub async fn run(client: &ApiClient) -> Result<()> {
    let healthy = client.health().await;

    let status_icon = if healthy { style("●").green() } else { style("●").red() };
    let status_text = if healthy { style("Online").green() } else { style("Offline").red() };
    println!("Control plane: {} {}", status_icon, status_text);

    if !healthy {
        println!("{}", style("Cannot retrieve cluster status: control plane is offline").yellow());
        return Ok(());
    }

    match client.cluster_status().await {
        Ok(status) => print_status(&status),
        Err(e) => println!("{} {}", style("Error:").red(), e),
    }

    Ok(())
}

fn print_status(status: &crate::client::ClusterStatusDto) {
    let Some(input) = &status.input else {
        println!("{}", style("No tick observed yet").yellow());
        return;
    };

    println!();
    println!("{}", style("Quorum (DCS)").bold());
    println!(
        "  quorum = {}, voters = {{{}}}",
        input.quorum_state.quorum,
        join(&input.quorum_state.voters)
    );

    println!("{}", style("Sync (database)").bold());
    println!(
        "  numsync = {}, sync = {{{}}}",
        input.sync_state.numsync,
        join(&input.sync_state.sync)
    );

    println!("{}", style("Active peers").bold());
    println!("  {{{}}}", join(&input.active));
    println!("  sync_wanted = {}", input.sync_wanted);

    println!();
    if status.last_transitions.is_empty() {
        println!("{}", style("Last tick: no transitions applied").dim());
    } else {
        println!("{}", style("Last tick transitions:").bold());
        for transition in &status.last_transitions {
            println!("  {}", format_transition(transition));
        }
    }

    if let Some(summary) = &status.last_tick_summary {
        println!("  {}", style(summary).dim());
    }
}

fn format_transition(transition: &TransitionDto) -> String {
    match transition {
        TransitionDto::Sync { numsync, sync } => format!("sync({numsync}, {{{}}})", join(sync)),
        TransitionDto::Quorum { quorum, voters } => format!("quorum({quorum}, {{{}}})", join(voters)),
    }
}

fn join(peers: &std::collections::BTreeSet<String>) -> String {
    peers.iter().cloned().collect::<Vec<_>>().join(",")
}
