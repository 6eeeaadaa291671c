//! Human-readable rendering of supervisor results

use colored::Colorize;
use tabled::{Table, Tabled};

use launcher_core::application::{KillReport, NodeState, NodeStatus};
use launcher_core::port::LaunchOutcome;

#[derive(Tabled)]
struct StatusRow {
    node: String,
    pid: String,
    state: String,
}

fn colored_state(state: NodeState) -> String {
    let text = state.to_string();
    match state {
        NodeState::Running => text.green().to_string(),
        NodeState::Stopped => text.red().to_string(),
        NodeState::NotLaunched => text.yellow().to_string(),
        NodeState::Unstarted => text.dimmed().to_string(),
    }
}

pub fn print_status(statuses: &[NodeStatus]) {
    let rows: Vec<StatusRow> = statuses
        .iter()
        .map(|s| StatusRow {
            node: s.name.clone(),
            pid: s.pid.map(|p| p.to_string()).unwrap_or_else(|| "-".to_string()),
            state: colored_state(s.state),
        })
        .collect();

    println!("{}", Table::new(rows));
}

pub fn print_launches(outcomes: &[LaunchOutcome]) {
    for outcome in outcomes {
        match outcome.pid {
            Some(pid) => println!(
                "{} {} (pid {}): {}",
                "spawned".green(),
                outcome.node.bold(),
                pid,
                outcome.command_line()
            ),
            None => println!(
                "{} {}: {}",
                "unstarted".yellow(),
                outcome.node.bold(),
                outcome.command_line()
            ),
        }
    }
}

pub fn print_kill_report(report: &KillReport) {
    for node in &report.signaled {
        println!("{} {}", "stopped".green(), node.bold());
    }
    for node in &report.missing {
        println!("{} {} (no pid file)", "missing".yellow(), node.bold());
    }
    for (node, error) in &report.failed {
        println!("{} {}: {}", "failed".red(), node.bold(), error);
    }
}
