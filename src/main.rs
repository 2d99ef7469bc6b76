//! Kempigotchi host: Main Entry Point
//!
//! Wires the adapters to the pet service and drives it from the wall clock
//! and a line-oriented console.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  FileStore / MemoryStore   StaticIdentity   SystemClock        │
//! │  (PetStore)                (IdentityPort)   (ClockPort)        │
//! │  LogEventSink              console stdin                       │
//! │  (EventSink)               (AppCommand)                        │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              PetService (pure logic)                   │    │
//! │  │  Decay · Growth · Action economy · Reset               │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  Scheduler (delegate-driven): decay · restore · notice         │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Usage: `kempigotchi [--user ID] [--store PATH] [--config PATH] [-v...]`

use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use log::{info, warn};

use kempigotchi::adapters::console_log;
use kempigotchi::adapters::file_store::FileStore;
use kempigotchi::adapters::identity::StaticIdentity;
use kempigotchi::adapters::log_sink::LogEventSink;
use kempigotchi::adapters::memory_store::MemoryStore;
use kempigotchi::adapters::time::SystemClock;
use kempigotchi::app::commands::AppCommand;
use kempigotchi::app::ports::{ClockPort, IdentityPort, PetStore, ScheduleFiredKind, SchedulerDelegate};
use kempigotchi::app::service::{Outcome, PetService, View};
use kempigotchi::config::PetConfig;
use kempigotchi::pet::{HEART_COUNT, Millis};
use kempigotchi::scheduler::{DECAY_LABEL, NOTICE_LABEL, RESTORE_LABEL, Scheduler};

/// Host loop granularity.
const LOOP_SLEEP: Duration = Duration::from_millis(100);

// ── Command line ──────────────────────────────────────────────

/// Kempigotchi virtual pet host.
#[derive(Debug, Parser)]
#[command(name = "kempigotchi", version, about = "Kempigotchi virtual pet host")]
struct Args {
    /// Signed-in user id (runs signed out when omitted)
    #[arg(long)]
    user: Option<String>,

    /// JSON document holding every user's pet (in-memory when omitted)
    #[arg(long)]
    store: Option<PathBuf>,

    /// JSON file overriding the default tunables
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log more (-v debug, -vv trace)
    #[arg(short, action = ArgAction::Count)]
    verbose: u8,
}

// ── Scheduler delegate ────────────────────────────────────────
//
// Bridges the scheduler (which knows nothing about pets) to the loop:
// fired labels are collected here and dispatched to the service after
// the scheduler tick returns.

#[derive(Debug, Default)]
struct DueWork {
    decay: bool,
    restore: bool,
    notice: bool,
}

impl SchedulerDelegate for DueWork {
    fn on_schedule_fired(&mut self, label: &str, _kind: ScheduleFiredKind) {
        match label {
            DECAY_LABEL => self.decay = true,
            RESTORE_LABEL => self.restore = true,
            NOTICE_LABEL => self.notice = true,
            other => warn!("Schedule fired with unknown label '{other}'"),
        }
    }
}

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    let args = Args::parse();
    console_log::init(console_log::level_for(args.verbose))?;

    info!("Kempigotchi v{}", env!("CARGO_PKG_VERSION"));

    let config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            PetConfig::from_json(&text)?
        }
        None => PetConfig::default(),
    };

    let identity = match &args.user {
        Some(id) => StaticIdentity::signed_in(id.as_str()),
        None => {
            warn!("No --user given; running signed out");
            StaticIdentity::signed_out()
        }
    };

    match &args.store {
        Some(path) => {
            info!("Store: {}", path.display());
            run(config, &identity, FileStore::new(path))
        }
        None => {
            info!("Store: in-memory (nothing survives exit)");
            run(config, &identity, MemoryStore::new())
        }
    }
}

fn run(config: PetConfig, identity: &StaticIdentity, mut store: impl PetStore) -> Result<()> {
    let clock = SystemClock;
    let mut sink = LogEventSink::new();
    let mut sched = Scheduler::for_config(&config, clock.now_ms());
    let mut svc = PetService::new(config)?;
    let commands = spawn_console();

    if identity.identity().is_none() {
        info!("Signed out: scheduled polls paused");
        sched.set_enabled(false);
    }

    println!("commands: feed | play | clean | rename <title> | reset | status | quit");

    // Load (or create) the pet straight away rather than a poll later.
    let now = clock.now_ms();
    report("tick", svc.tick(now, identity, &mut store, &mut sink));
    print_status(&svc, identity, &store, now);

    info!("Entering event loop.");

    loop {
        let now = clock.now_ms();

        let mut due = DueWork::default();
        sched.tick(now, &mut due);
        if due.decay {
            report("tick", svc.tick(now, identity, &mut store, &mut sink));
        }
        if due.restore {
            report(
                "restore",
                svc.restore_actions(now, identity, &mut store, &mut sink),
            );
        }
        if due.notice {
            svc.expire_notice(now, &mut sink);
        }

        loop {
            let line = match commands.try_recv() {
                Ok(line) => line,
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    info!("Console closed, exiting.");
                    return Ok(());
                }
            };
            match line.trim() {
                "" => {}
                "quit" | "exit" => return Ok(()),
                "status" => print_status(&svc, identity, &store, now),
                text => match AppCommand::parse(text) {
                    Some(cmd) => {
                        let outcome = svc.handle_command(cmd, now, identity, &mut store, &mut sink);
                        if let Ok(Outcome::Rejected(_)) = outcome {
                            sched.rearm(NOTICE_LABEL, now);
                        }
                        report("command", outcome);
                        print_status(&svc, identity, &store, now);
                    }
                    None => println!("unknown command '{text}'"),
                },
            }
        }

        std::thread::sleep(LOOP_SLEEP);
    }
}

/// Read stdin lines on a helper thread so the loop never blocks on input.
fn spawn_console() -> Receiver<String> {
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

fn report(what: &str, outcome: kempigotchi::error::Result<Outcome>) {
    match outcome {
        Ok(Outcome::Pending) => info!("{what}: record still loading"),
        Ok(_) => {}
        // Already surfaced as a StoreFailed event; the next poll tries again.
        Err(e) => warn!("{what} failed: {e}"),
    }
}

fn print_status(svc: &PetService, identity: &impl IdentityPort, store: &impl PetStore, now: Millis) {
    let view = match svc.view(identity, store) {
        Ok(view) => view,
        Err(e) => {
            println!("[error] {e}");
            return;
        }
    };
    match view {
        View::SignedOut => println!("[signed out] start with --user <id> to play"),
        View::Loading => println!("[loading]"),
        View::Missing => println!("[no pet yet]"),
        View::Ready(s) => {
            let hearts: String = (0..HEART_COUNT)
                .map(|i| if i < s.hearts { '♥' } else { '♡' })
                .collect();
            println!(
                "{} ({}) {} | health {} | energy {} | actions {}",
                s.title, s.stage, hearts, s.health, s.energy, s.actions
            );
        }
    }
    if let Some(notice) = svc.notice(now) {
        println!("! {}", notice.message);
    }
}
