//! Balance a CSV roster into teams and print them.
//! Run with: cargo run --bin teams -- roster.csv [--max-team-size N] [--fields N]

use clap::Parser;
use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;
use volley_teams_web::{
    calculate_team_sizes, distribute_players, read_roster, TeamSummary, DEFAULT_MAX_TEAM_SIZE,
};

/// Split a roster into balanced volleyball teams.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// CSV roster: player_id,name,gender and the six skill ratings
    roster: PathBuf,

    /// Most players allowed on one team
    #[arg(long, default_value_t = DEFAULT_MAX_TEAM_SIZE)]
    max_team_size: usize,

    /// Courts available; omit to use as few as fit everyone
    #[arg(long)]
    fields: Option<usize>,
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let participants = read_roster(File::open(&args.roster)?)?;
    let sizes = calculate_team_sizes(participants.len(), args.max_team_size, args.fields)?;
    log::info!(
        "Balancing {} participant(s) into {} team(s)",
        participants.len(),
        sizes.len()
    );
    let teams = distribute_players(&participants, &sizes)?;

    if teams.is_empty() {
        println!("No teams could be generated");
        return Ok(());
    }
    for (i, team) in teams.iter().enumerate() {
        let summary = TeamSummary::from_team(team);
        println!(
            "Team {} ({} players, {:.0}% team balance)",
            i + 1,
            team.len(),
            summary.balance_percentage
        );
        for p in team {
            println!("  {:<24} {:>3}  {:?}", p.name, p.skills_score, p.gender);
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}: {}", args.roster.display(), e);
            ExitCode::FAILURE
        }
    }
}
