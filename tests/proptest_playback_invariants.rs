//! Property-based invariant tests for trace playback.
//!
//! 1. Producers and replay are deterministic.
//! 2. Cached seeks agree with brute-force replay for every interval.
//! 3. A seek never replays a full cache interval.
//! 4. Counters never decrease along a trace.
//! 5. Stepping forward and seeking reach the same state.
//! 6. Arbitrary command sequences keep the player consistent.
//! 7. Pause is idempotent.
//! 8. Every sorting trace ends sorted.
//!
//! Heap and graph traces are checked for cache transparency and monotonic
//! counters with a leading `Initialize` event, so a reload passes through
//! the same seek path as a producer trace.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use algo_replay::{
    PlaybackConfig, PlaybackEvent, PlaybackStatus, Player,
    domains::{
        ArrayDomain, Edge, Graph, GraphDomain, GraphEvent, HeapDomain, HeapEvent, HeapOp,
        StackDomain, StackOp, heap, search, sorting::SortAlgorithm, stack,
    },
    playback::{ManualClock, SnapshotCache},
    trace::{Event, ModelState, Reducer, replay},
};
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

fn small_arrays() -> impl Strategy<Value = Vec<i64>> {
    proptest::collection::vec(-50i64..50, 0..=12)
}

fn algorithms() -> impl Strategy<Value = SortAlgorithm> {
    prop::sample::select(SortAlgorithm::ALL.to_vec())
}

fn stack_ops() -> impl Strategy<Value = Vec<StackOp>> {
    proptest::collection::vec(
        prop_oneof![
            (0i64..100).prop_map(StackOp::Push),
            Just(StackOp::Pop),
            Just(StackOp::Peek),
        ],
        0..=16,
    )
}

fn heap_ops() -> impl Strategy<Value = Vec<HeapOp>> {
    proptest::collection::vec(
        prop_oneof![
            3 => (-50i64..50).prop_map(HeapOp::Insert),
            1 => Just(HeapOp::ExtractMin),
        ],
        0..=16,
    )
}

/// A small graph with a source node inside it.
fn graphs() -> impl Strategy<Value = (Graph, usize)> {
    (1usize..7).prop_flat_map(|nodes| {
        (
            proptest::collection::vec((0..nodes, 0..nodes, 1u64..10), 0..14),
            any::<bool>(),
            0..nodes,
        )
            .prop_map(move |(edges, directed, source)| {
                let edges = edges
                    .into_iter()
                    .map(|(from, to, weight)| Edge { from, to, weight })
                    .collect();
                (
                    Graph {
                        nodes,
                        edges,
                        directed,
                    },
                    source,
                )
            })
    })
}

/// Compare every cached seek against replay and check counters along the way.
fn check_cached_seeks<R>(
    domain: &R,
    initial: &R::State,
    events: &[Event<R::Kind>],
    interval: usize,
) -> Result<(), TestCaseError>
where
    R: Reducer,
{
    let cache = SnapshotCache::build(domain, initial, events, interval);
    let mut previous = initial.counters();

    for target in -1..events.len() as isize {
        let seek = cache.seek(domain, events, target);
        let expected = replay(domain, initial, events, target);
        prop_assert_eq!(&seek.state, &expected, "target {}", target);
        prop_assert!(seek.replayed < interval);

        let counters = expected.counters();
        prop_assert!(
            counters.dominates(&previous),
            "counters went from {} to {} at {}", previous, counters, target
        );
        previous = counters;
    }
    Ok(())
}

fn config(cache_interval: usize) -> PlaybackConfig {
    PlaybackConfig {
        cache_interval,
        speed_ms: 10,
    }
}

#[derive(Debug, Clone)]
enum Command {
    StepForward,
    StepBack,
    GoTo(isize),
    GoToEnd,
    Reset,
    Play,
    Pause,
    Frame,
}

fn commands() -> impl Strategy<Value = Vec<Command>> {
    proptest::collection::vec(
        prop_oneof![
            Just(Command::StepForward),
            Just(Command::StepBack),
            (-5isize..80).prop_map(Command::GoTo),
            Just(Command::GoToEnd),
            Just(Command::Reset),
            Just(Command::Play),
            Just(Command::Pause),
            Just(Command::Frame),
        ],
        0..40,
    )
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Determinism
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn producers_and_replay_are_deterministic(values in small_arrays(), algorithm in algorithms()) {
        let a = algorithm.run(&values);
        let b = algorithm.run(&values);
        prop_assert_eq!(&a.events, &b.events);
        prop_assert_eq!(&a.initial, &b.initial);

        let end = a.events.len() as isize - 1;
        prop_assert_eq!(
            replay(&ArrayDomain, &a.initial, &a.events, end),
            replay(&ArrayDomain, &b.initial, &b.events, end)
        );
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Cache transparency
// 3. Bounded seek cost
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn cached_seek_matches_replay(
        values in small_arrays(),
        algorithm in algorithms(),
        interval in 1usize..20,
    ) {
        let recording = algorithm.run(&values);
        let events = &recording.events;
        let cache = SnapshotCache::build(&ArrayDomain, &recording.initial, events, interval);

        for target in -1..events.len() as isize {
            let seek = cache.seek(&ArrayDomain, events, target);
            let expected = replay(&ArrayDomain, &recording.initial, events, target);
            prop_assert_eq!(&seek.state, &expected, "target {}", target);
            prop_assert!(
                seek.replayed < interval,
                "replayed {} events for interval {}", seek.replayed, interval
            );
            prop_assert!(seek.from <= target);
        }
    }

    #[test]
    fn stack_cached_seek_matches_replay(
        capacity in 0usize..6,
        ops in stack_ops(),
        interval in 1usize..8,
    ) {
        let recording = stack::run_operations(capacity, &ops);
        let events = &recording.events;
        let cache = SnapshotCache::build(&StackDomain, &recording.initial, events, interval);

        for target in -1..events.len() as isize {
            prop_assert_eq!(
                cache.seek(&StackDomain, events, target).state,
                replay(&StackDomain, &recording.initial, events, target)
            );
        }
    }

    #[test]
    fn heap_cached_seek_matches_replay(ops in heap_ops(), interval in 1usize..8) {
        let recording = heap::run_operations(&ops);
        let mut events = vec![Event::new(
            HeapEvent::Initialize {
                values: recording.initial.values.clone(),
            },
            "Load the heap",
        )];
        events.extend(recording.events);

        check_cached_seeks(&HeapDomain, &recording.initial, &events, interval)?;
    }

    #[test]
    fn dijkstra_cached_seek_matches_replay(
        (graph, source) in graphs(),
        target in proptest::option::of(0usize..7),
        interval in 1usize..8,
    ) {
        let nodes = graph.nodes;
        let recording = search::dijkstra(&graph, source, target);
        let mut events = vec![Event::new(GraphEvent::Initialize { nodes }, "Load the graph")];
        events.extend(recording.events);

        let domain = GraphDomain::new(Rc::new(graph));
        check_cached_seeks(&domain, &recording.initial, &events, interval)?;
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Monotonic counters
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn counters_never_decrease(values in small_arrays(), algorithm in algorithms()) {
        let recording = algorithm.run(&values);
        let mut previous = recording.initial.counters();

        for target in 0..recording.events.len() as isize {
            let state = replay(&ArrayDomain, &recording.initial, &recording.events, target);
            let counters = state.counters();
            prop_assert!(
                counters.dominates(&previous),
                "counters went from {} to {} at {}", previous, counters, target
            );
            previous = counters;
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Step / seek equivalence
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn stepping_matches_seeking(
        values in small_arrays(),
        algorithm in algorithms(),
        interval in 1usize..10,
        steps in 0usize..60,
    ) {
        let recording = algorithm.run(&values);
        let len = recording.events.len();

        let mut stepped = Player::new(ArrayDomain, &config(interval), Box::new(ManualClock::new()));
        stepped.load(recording.clone());
        let mut seeked = Player::new(ArrayDomain, &config(interval), Box::new(ManualClock::new()));
        seeked.load(recording);

        for _ in 0..steps {
            stepped.step_forward();
        }
        let target = steps.min(len) as isize - 1;
        seeked.go_to(target);

        prop_assert_eq!(stepped.position(), seeked.position());
        prop_assert_eq!(stepped.state(), seeked.state());

        if stepped.step_back() {
            seeked.go_to(target - 1);
            prop_assert_eq!(stepped.state(), seeked.state());
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Arbitrary command sequences
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn commands_keep_player_consistent(
        values in small_arrays(),
        algorithm in algorithms(),
        cmds in commands(),
    ) {
        let clock = ManualClock::new();
        let recording = algorithm.run(&values);
        let initial = recording.initial.clone();
        let events = recording.events.clone();
        let last = events.len() as isize - 1;

        let mut player = Player::new(ArrayDomain, &config(5), Box::new(clock.clone()));
        player.load(recording);

        for cmd in cmds {
            match cmd {
                Command::StepForward => { player.step_forward(); }
                Command::StepBack => { player.step_back(); }
                Command::GoTo(target) => { player.go_to(target); }
                Command::GoToEnd => player.go_to_end(),
                Command::Reset => player.reset(),
                Command::Play => player.play(),
                Command::Pause => player.pause(),
                Command::Frame => {
                    clock.advance(Duration::from_millis(10));
                    player.on_frame();
                }
            }

            let position = player.position();
            prop_assert!((-1..=last.max(-1)).contains(&position));
            prop_assert_eq!(player.current_step(), (position + 1) as usize);
            prop_assert_eq!(player.total_steps(), events.len() + 1);
            let expected = replay(&ArrayDomain, &initial, &events, position);
            prop_assert_eq!(player.state(), Some(&expected));
            prop_assert_eq!(player.frame_pending(), player.is_playing());
            prop_assert_eq!(
                player.status() == PlaybackStatus::Playing,
                player.is_playing()
            );
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 7. Idempotent pause
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn pause_is_idempotent(
        values in proptest::collection::vec(0i64..20, 2..8),
        pauses in 1usize..5,
    ) {
        let mut player = Player::new(ArrayDomain, &config(4), Box::new(ManualClock::new()));
        player.load(SortAlgorithm::Insertion.run(&values));

        let paused = Rc::new(RefCell::new(0usize));
        let count = Rc::clone(&paused);
        let _sub = player.subscribe(move |event| {
            if matches!(event, PlaybackEvent::Paused { .. }) {
                *count.borrow_mut() += 1;
            }
        });

        player.play();
        let position = player.position();
        for _ in 0..pauses {
            player.pause();
        }

        prop_assert_eq!(*paused.borrow(), 1);
        prop_assert_eq!(player.position(), position);
        prop_assert_eq!(player.status(), PlaybackStatus::Paused);
        prop_assert!(!player.frame_pending());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 8. Sorting correctness
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn sorting_traces_end_sorted(values in small_arrays(), algorithm in algorithms()) {
        let recording = algorithm.run(&values);
        let end = recording.events.len() as isize - 1;
        let state = replay(&ArrayDomain, &recording.initial, &recording.events, end);

        let mut expected = values.clone();
        expected.sort();
        prop_assert_eq!(&state.values, &expected);
        prop_assert!(state.complete);
        prop_assert_eq!(recording.events.last().map(|e| e.tag()), Some("complete"));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// Heap extract order
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn heap_extracts_in_ascending_order(values in proptest::collection::vec(-100i64..100, 1..12)) {
        let mut ops: Vec<HeapOp> = values.iter().copied().map(HeapOp::Insert).collect();
        ops.extend(std::iter::repeat_n(HeapOp::ExtractMin, values.len()));
        let recording = heap::run_operations(&ops);

        let extracted: Vec<i64> = recording
            .events
            .iter()
            .filter_map(|e| match e.kind {
                HeapEvent::Extract { value } => Some(value),
                _ => None,
            })
            .collect();
        let mut expected = values.clone();
        expected.sort();
        prop_assert_eq!(extracted, expected);
    }
}
