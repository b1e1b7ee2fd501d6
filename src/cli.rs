use std::io;

use tracing::error;

use crate::combat::{write_report_csv, CombatRound, CombatantRef, ObjectId, SummaryReport};
use crate::config::AppConfig;
use crate::error::RosterError;
use crate::server::{self, api::Ranking, AppState};
use crate::store::{load_roster, CombatantRegistry, JsonFileAttributeStorage, SummaryStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Serve,
    Show,
    Record,
    Clear,
    Roster,
}

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("serve") => Some(Command::Serve),
        Some("show") => Some(Command::Show),
        Some("record") => Some(Command::Record),
        Some("clear") => Some(Command::Clear),
        Some("roster") => Some(Command::Roster),
        _ => None,
    }
}

pub fn run_with_args(args: &[String], config: &AppConfig) -> i32 {
    match parse_command(args) {
        Some(Command::Serve) => handle_serve(config),
        Some(Command::Show) => handle_show(args, config),
        Some(Command::Record) => handle_record(args, config),
        Some(Command::Clear) => handle_clear(args, config),
        Some(Command::Roster) => handle_roster(config),
        None => {
            eprintln!("usage: battle-summary <serve|show|record|clear|roster>");
            2
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Json,
    Table,
    Csv,
}

fn handle_serve(config: &AppConfig) -> i32 {
    let Some(registry) = roster_or_report(config) else {
        return 1;
    };
    let storage = JsonFileAttributeStorage::new(&config.storage_path);
    let state = AppState::new(registry, Box::new(storage));
    match server::run_server(&state, &config.bind_addr) {
        Ok(()) => 0,
        Err(err) => {
            error!(error = %err, "server error");
            eprintln!("server error: {err}");
            1
        }
    }
}

fn handle_show(args: &[String], config: &AppConfig) -> i32 {
    let Some(owner) = parse_owner(args.get(2)) else {
        eprintln!("usage: battle-summary show <owner-id> [--table|--csv] [--rank=sequence|target_index]");
        return 2;
    };
    let mut format = OutputFormat::Json;
    let mut ranking = Ranking::default();
    for flag in &args[3..] {
        match flag.as_str() {
            "--table" => format = OutputFormat::Table,
            "--csv" => format = OutputFormat::Csv,
            other => match other.strip_prefix("--rank=").and_then(Ranking::parse) {
                Some(parsed) => ranking = parsed,
                None => {
                    eprintln!("unknown option '{other}'");
                    return 2;
                }
            },
        }
    }

    let Some(registry) = roster_or_report(config) else {
        return 1;
    };
    let mut storage = JsonFileAttributeStorage::new(&config.storage_path);
    let store = SummaryStore::new(owner, &mut storage, &registry);
    let builder = match store.load_summary() {
        Ok(builder) => builder,
        Err(err) => {
            eprintln!("failed to load summary: {err}");
            return 1;
        }
    };
    let rule = ranking.rule();
    let report = SummaryReport {
        owner,
        ranking: rule.name(),
        records: builder.report_ranked(rule),
    };

    match format {
        OutputFormat::Json => match serde_json::to_string_pretty(&report) {
            Ok(payload) => println!("{payload}"),
            Err(err) => {
                eprintln!("failed to serialize summary: {err}");
                return 1;
            }
        },
        OutputFormat::Table => print_table(&report),
        OutputFormat::Csv => {
            if let Err(err) = write_report_csv(&report.records, io::stdout().lock()) {
                eprintln!("failed to write csv: {err}");
                return 1;
            }
        }
    }
    0
}

fn handle_record(args: &[String], config: &AppConfig) -> i32 {
    let owner = parse_owner(args.get(2));
    let pairs: Option<Vec<(ObjectId, ObjectId)>> =
        args.iter().skip(3).map(|raw| parse_pair(raw)).collect();
    let (Some(owner), Some(pairs)) = (owner, pairs) else {
        eprintln!("usage: battle-summary record <owner-id> <attacker-id:target-id>...");
        return 2;
    };

    let Some(registry) = roster_or_report(config) else {
        return 1;
    };
    let mut attacks: Vec<(CombatantRef, CombatantRef)> = Vec::with_capacity(pairs.len());
    for (attacker, target) in pairs {
        let (Some(attacker), Some(target)) = (registry.get(attacker), registry.get(target)) else {
            eprintln!("unknown combatant in pair {attacker}:{target}");
            return 1;
        };
        attacks.push((attacker.clone(), target.clone()));
    }

    let mut storage = JsonFileAttributeStorage::new(&config.storage_path);
    let mut store = SummaryStore::new(owner, &mut storage, &registry);
    let result = CombatRound::begin(1, &mut store).and_then(|mut round| {
        for (attacker, target) in attacks {
            round.record(attacker, target);
        }
        round.finish(&mut store, Ranking::default().rule())
    });
    match result {
        Ok(summary) => {
            println!("recorded {} attack(s) for object {owner}", summary.len());
            0
        }
        Err(err) => {
            eprintln!("failed to record summary: {err}");
            1
        }
    }
}

fn handle_clear(args: &[String], config: &AppConfig) -> i32 {
    let Some(owner) = parse_owner(args.get(2)) else {
        eprintln!("usage: battle-summary clear <owner-id>");
        return 2;
    };
    let registry = CombatantRegistry::new();
    let mut storage = JsonFileAttributeStorage::new(&config.storage_path);
    let mut store = SummaryStore::new(owner, &mut storage, &registry);
    match store.clear() {
        Ok(true) => {
            println!("cleared summary for object {owner}");
            0
        }
        Ok(false) => {
            println!("no summary stored for object {owner}");
            0
        }
        Err(err) => {
            eprintln!("failed to clear summary: {err}");
            1
        }
    }
}

fn handle_roster(config: &AppConfig) -> i32 {
    let Some(registry) = roster_or_report(config) else {
        return 1;
    };
    let combatants: Vec<&CombatantRef> = registry.iter().collect();
    match serde_json::to_string_pretty(&combatants) {
        Ok(payload) => {
            println!("{payload}");
            0
        }
        Err(err) => {
            eprintln!("failed to serialize roster: {err}");
            1
        }
    }
}

fn print_table(report: &SummaryReport<CombatantRef>) {
    println!("sequence\trank\tattacker\ttarget");
    for record in &report.records {
        println!(
            "{}\t{}\t{}\t{}",
            record.sequence,
            record.rank,
            record.attacker.name(),
            record.target.name()
        );
    }
}

fn roster_or_report(config: &AppConfig) -> Option<CombatantRegistry> {
    match load_roster(&config.roster_path) {
        Ok(registry) => Some(registry),
        Err(err) => {
            report_roster_error(&err);
            None
        }
    }
}

fn report_roster_error(err: &RosterError) {
    error!(error = %err, "roster unavailable");
    eprintln!("roster error: {err}");
}

fn parse_owner(raw: Option<&String>) -> Option<ObjectId> {
    raw.and_then(|value| value.parse::<ObjectId>().ok())
}

fn parse_pair(raw: &str) -> Option<(ObjectId, ObjectId)> {
    let (attacker, target) = raw.split_once(':')?;
    Some((attacker.parse().ok()?, target.parse().ok()?))
}
