//! Algo Replay CLI - Play algorithm traces from JSON scenarios.

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::{Duration, Instant};

use clap::{Parser, Subcommand};

use algo_replay::{
    Playback, PlaybackEvent, Scenario, VisualizerRegistry,
    playback::{Clock, ManualClock, SystemClock, drive},
    view::StepSnapshot,
};

/// Longest sleep between timing-loop frames.
const FRAME: Duration = Duration::from_millis(16);

/// Seekable playback of algorithm execution traces.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List registered visualizers.
    List,
    /// Play a scenario from start to finish.
    Run {
        /// Path to the scenario JSON file.
        #[arg(value_name = "SCENARIO")]
        scenario: PathBuf,
        /// Milliseconds per event (overrides the scenario).
        #[arg(short, long, value_name = "MS")]
        speed: Option<u64>,
        /// Advance a manual clock instead of sleeping.
        #[arg(long)]
        instant: bool,
        /// Print one JSON snapshot per line.
        #[arg(long)]
        json: bool,
    },
    /// Print the snapshot at one position (-1 = initial state).
    Seek {
        #[arg(value_name = "SCENARIO")]
        scenario: PathBuf,
        #[arg(allow_negative_numbers = true, value_name = "POSITION")]
        position: isize,
        /// Print the snapshot as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Print an example scenario.
    Example,
}

fn main() {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    env_logger::init();

    let cli = Cli::parse();
    let registry = VisualizerRegistry::with_builtin();

    match cli.command {
        Command::List => list(&registry),
        Command::Run {
            scenario,
            speed,
            instant,
            json,
        } => {
            let mut scenario = load_scenario(&scenario);
            if let Some(speed) = speed {
                scenario.playback.speed_ms = speed;
            }
            run(&registry, &scenario, instant, json);
        }
        Command::Seek {
            scenario,
            position,
            json,
        } => {
            let scenario = load_scenario(&scenario);
            let mut player = open(&registry, &scenario, Box::new(SystemClock::default()));
            player.go_to(position);
            if let Some(snapshot) = player.snapshot() {
                print_snapshot(&snapshot, json);
            }
        }
        Command::Example => print_example_scenario(),
    }
}

fn list(registry: &VisualizerRegistry) {
    println!("Visualizers");
    println!("===========");
    for entry in registry.iter() {
        println!("  {:<16} {:<6} {}", entry.name, entry.input, entry.summary);
    }
}

fn load_scenario(path: &Path) -> Scenario {
    Scenario::from_path(path).unwrap_or_else(|e| {
        eprintln!("Error loading scenario: {}", e);
        std::process::exit(1);
    })
}

fn open(
    registry: &VisualizerRegistry,
    scenario: &Scenario,
    clock: Box<dyn Clock>,
) -> Box<dyn Playback> {
    registry.open(scenario, clock).unwrap_or_else(|e| {
        eprintln!("Error opening scenario: {}", e);
        std::process::exit(1);
    })
}

fn run(registry: &VisualizerRegistry, scenario: &Scenario, instant: bool, json: bool) {
    let manual = ManualClock::new();
    let clock: Box<dyn Clock> = if instant {
        Box::new(manual.clone())
    } else {
        Box::new(SystemClock::default())
    };
    let mut player = open(registry, scenario, clock);

    if !json {
        println!("{} ({} steps)", scenario.visualizer, player.total_steps());
        println!("Speed: {} ms/event", scenario.playback.speed_ms);
        println!();
    }

    let queue: Rc<RefCell<Vec<PlaybackEvent>>> = Rc::default();
    let sink = Rc::clone(&queue);
    let _subscription = player.subscribe(Box::new(move |event: &PlaybackEvent| {
        sink.borrow_mut().push(*event);
    }));

    if let Some(snapshot) = player.snapshot() {
        print_snapshot(&snapshot, json);
    }

    let start = Instant::now();
    player.play();
    flush(&queue, &*player, json);

    if instant {
        let speed = player.speed();
        while player.frame_pending() {
            manual.advance(speed);
            player.on_frame();
            flush(&queue, &*player, json);
        }
    } else {
        let frame = player.speed().min(FRAME);
        drive(player.as_mut(), frame, |p| flush(&queue, p, json));
    }

    if !json {
        println!();
        println!("Time: {:.2}s", start.elapsed().as_secs_f32());
    }
    player.dispose();
}

/// Print a snapshot for every position change queued since the last flush.
fn flush(queue: &RefCell<Vec<PlaybackEvent>>, player: &dyn Playback, json: bool) {
    let events: Vec<PlaybackEvent> = queue.borrow_mut().drain(..).collect();
    for event in events {
        match event {
            PlaybackEvent::PositionChanged { .. } => {
                if let Some(snapshot) = player.snapshot() {
                    print_snapshot(&snapshot, json);
                }
            }
            PlaybackEvent::Completed { position } if !json => {
                println!("Completed at position {position}");
            }
            _ => {}
        }
    }
}

fn print_snapshot(snapshot: &StepSnapshot, json: bool) {
    if json {
        match serde_json::to_string(snapshot) {
            Ok(line) => println!("{line}"),
            Err(e) => {
                eprintln!("Error serializing snapshot: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        println!("{snapshot}");
    }
}

fn print_example_scenario() {
    let scenario = Scenario::example();
    match serde_json::to_string_pretty(&scenario) {
        Ok(json) => {
            println!("Example scenario (scenario.json):");
            println!("{json}");
        }
        Err(e) => {
            eprintln!("Error serializing example: {}", e);
            std::process::exit(1);
        }
    }
}
