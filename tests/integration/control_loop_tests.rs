//! Integration tests for the ClusterService → ports pipeline.
//!
//! These run on the host (x86_64) and drive full control-loop iterations
//! against the recording mocks, asserting on register traffic, rendered
//! display contents and emitted events.

use crate::mock_hw::{BoardCall, EventLog, MockBoard, MockDelay, RecordingDisplay};

use cluster::app::events::ClusterEvent;
use cluster::app::service::ClusterService;
use cluster::config::ClusterConfig;
use cluster::toggle::SystemToggle;

fn make_app(board: MockBoard) -> (ClusterService, MockBoard, RecordingDisplay, EventLog) {
    make_app_with(ClusterConfig::default(), board)
}

fn make_app_with(
    config: ClusterConfig,
    mut board: MockBoard,
) -> (ClusterService, MockBoard, RecordingDisplay, EventLog) {
    let mut app = ClusterService::new(config).expect("valid config");
    let mut display = RecordingDisplay::new();
    let mut sink = EventLog::new();
    app.start(&mut board, &mut display, &mut sink);
    (app, board, display, sink)
}

fn run(
    app: &mut ClusterService,
    board: &mut MockBoard,
    display: &mut RecordingDisplay,
    sink: &mut EventLog,
    n: usize,
) {
    let mut delay = MockDelay::new();
    for _ in 0..n {
        app.iterate(board, display, &mut delay, sink);
    }
}

// ── Start-up ──────────────────────────────────────────────────

#[test]
fn start_configures_counter_once_and_clears_indicator() {
    let (mut app, mut board, mut display, mut sink) = make_app(MockBoard::new());

    assert_eq!(board.count(BoardCall::CounterMode), 1);
    assert_eq!(board.count(BoardCall::CounterRun(true)), 1);
    assert_eq!(board.led_history(), [false]);
    assert_eq!(display.inits, 1);
    assert_eq!(
        sink.events,
        [ClusterEvent::Started { speed_seed: 16, fuel_percent: 100 }]
    );

    run(&mut app, &mut board, &mut display, &mut sink, 5);
    assert_eq!(board.count(BoardCall::CounterMode), 1, "never reconfigured");
}

// ── Converter protocol ────────────────────────────────────────

#[test]
fn each_iteration_runs_one_conversion_then_paces() {
    let (mut app, mut board, mut display, mut sink) = make_app(MockBoard::with_sample(30));
    board.calls.clear();

    let mut delay = MockDelay::new();
    app.iterate(&mut board, &mut display, &mut delay, &mut sink);

    let adc: Vec<BoardCall> = board
        .calls
        .iter()
        .copied()
        .filter(|c| matches!(c, BoardCall::Write(_) | BoardCall::Read(_) | BoardCall::BusRead))
        .collect();
    assert_eq!(
        adc,
        [
            BoardCall::Write(false),
            BoardCall::Write(true),
            BoardCall::Read(true),
            BoardCall::Read(false),
            BoardCall::BusRead,
            BoardCall::Read(true),
        ]
    );
    assert_eq!(delay.waits_ms, [250, 100]);
    assert_eq!(app.state().temperature_c, 30);
}

#[test]
fn slow_converter_is_waited_out() {
    let mut board = MockBoard::with_sample(77);
    board.busy_polls = 10_000;
    let (mut app, mut board, mut display, mut sink) = make_app(board);

    run(&mut app, &mut board, &mut display, &mut sink, 1);
    assert_eq!(app.state().raw_sample, 77);
}

// ── Rendering ─────────────────────────────────────────────────

#[test]
fn three_digit_fuel_loses_its_last_digit_under_the_unit() {
    let mut board = MockBoard::with_sample(45);
    board.fire_on_start = false;
    let (mut app, mut board, mut display, mut sink) = make_app(board);

    run(&mut app, &mut board, &mut display, &mut sink, 1);

    assert_eq!(app.state().fuel_percent, 100);
    assert_eq!(app.state().speed, 21);
    assert_eq!(display.row(1), "TERMINAL        ");
    assert_eq!(display.row(2), "s:21 F:10% T:45c");
}

#[test]
fn fields_are_drawn_in_fixed_order() {
    let (mut app, mut board, mut display, mut sink) = make_app(MockBoard::with_sample(7));
    run(&mut app, &mut board, &mut display, &mut sink, 1);

    let expected: Vec<(u8, u8, String)> = [
        (1, 1, "TERMINAL"),
        (2, 1, "s"),
        (2, 2, ":"),
        (2, 3, "21"),
        (2, 6, "F"),
        (2, 7, ":"),
        (2, 8, "90"),
        (2, 10, "%"),
        (2, 12, "T"),
        (2, 13, ":"),
        (2, 14, "07"),
        (2, 16, "c"),
    ]
    .into_iter()
    .map(|(r, c, t)| (r, c, t.to_string()))
    .collect();
    assert_eq!(display.writes, expected);
}

// ── Fuel ──────────────────────────────────────────────────────

#[test]
fn fuel_drains_one_step_per_overflow_down_to_zero() {
    let (mut app, mut board, mut display, mut sink) = make_app(MockBoard::new());

    let mut levels = Vec::new();
    let mut delay = MockDelay::new();
    for _ in 0..15 {
        app.iterate(&mut board, &mut display, &mut delay, &mut sink);
        levels.push(app.state().fuel_percent);
    }

    assert_eq!(levels, [90, 80, 70, 60, 50, 40, 30, 20, 10, 0, 0, 0, 0, 0, 0]);
    assert_eq!(
        sink.count(|e| matches!(e, ClusterEvent::FuelConsumed { .. })),
        10
    );
    assert!(sink.events.contains(&ClusterEvent::FuelConsumed { remaining: 0 }));
}

#[test]
fn overflow_during_refresh_is_consumed_every_other_iteration() {
    let mut board = MockBoard::new();
    board.fire_on_start = false;
    let (mut app, mut board, mut display, mut sink) = make_app(board);

    let mut levels = Vec::new();
    let mut delay = MockDelay::new();
    for _ in 0..6 {
        app.iterate(&mut board, &mut display, &mut delay, &mut sink);
        levels.push(app.state().fuel_percent);
        // A timer left running expires during the refresh wait.
        if board.timer_running {
            board.overflow = true;
        }
    }

    // Consuming stops the timer, so the next re-arm is checked before
    // it can expire.
    assert_eq!(levels, [100, 90, 90, 80, 80, 70]);
}

#[test]
fn timer_is_armed_only_while_fuel_at_or_above_threshold() {
    let (mut app, mut board, mut display, mut sink) = make_app(MockBoard::new());
    run(&mut app, &mut board, &mut display, &mut sink, 15);

    assert_eq!(board.timer_starts(), 10);
    assert_eq!(board.count(BoardCall::TimerLoad(0xFE, 0x17)), 10);
}

#[test]
fn no_overflow_no_consumption() {
    let mut board = MockBoard::new();
    board.fire_on_start = false;
    let (mut app, mut board, mut display, mut sink) = make_app(board);

    run(&mut app, &mut board, &mut display, &mut sink, 20);
    assert_eq!(app.state().fuel_percent, 100);
    assert_eq!(board.timer_starts(), 20, "re-armed every iteration");
}

#[test]
fn overflow_below_threshold_is_cleared_but_not_consumed() {
    let config = ClusterConfig {
        initial_fuel_percent: 5,
        ..ClusterConfig::default()
    };
    let (mut app, mut board, mut display, mut sink) = make_app_with(config, MockBoard::new());
    board.overflow = true;

    run(&mut app, &mut board, &mut display, &mut sink, 1);

    assert_eq!(app.state().fuel_percent, 5);
    assert_eq!(board.timer_starts(), 0);
    assert_eq!(board.count(BoardCall::TimerClear), 1);
}

#[test]
fn low_fuel_warning_appears_at_twenty_and_stays() {
    let (mut app, mut board, mut display, mut sink) = make_app(MockBoard::new());

    run(&mut app, &mut board, &mut display, &mut sink, 7);
    assert_eq!(app.state().fuel_percent, 30);
    assert!(!app.state().low_fuel);
    assert_eq!(display.row(1), "TERMINAL        ");

    run(&mut app, &mut board, &mut display, &mut sink, 1);
    assert_eq!(app.state().fuel_percent, 20);
    assert!(app.state().low_fuel);
    assert_eq!(display.row(1), "TERMINAL LowFuel");

    run(&mut app, &mut board, &mut display, &mut sink, 5);
    assert_eq!(display.row(1), "TERMINAL LowFuel");
    assert_eq!(
        sink.events
            .iter()
            .filter(|e| matches!(e, ClusterEvent::LowFuel { .. }))
            .collect::<Vec<_>>(),
        [&ClusterEvent::LowFuel { fuel_percent: 20 }]
    );
}

#[test]
fn low_initial_fuel_shows_warning_on_first_frame() {
    let config = ClusterConfig {
        initial_fuel_percent: 5,
        ..ClusterConfig::default()
    };
    let (mut app, mut board, mut display, mut sink) = make_app_with(config, MockBoard::new());
    assert_eq!(display.row(1).trim(), "");

    run(&mut app, &mut board, &mut display, &mut sink, 1);

    assert_eq!(display.row(1), "TERMINAL LowFuel");
    assert_eq!(app.state().speed, 0);
    assert!(display.row(2).starts_with("s:00 F:05%"));
    assert_eq!(sink.count(|e| matches!(e, ClusterEvent::LowFuel { fuel_percent: 5 })), 1);
}

#[test]
fn empty_tank_stops_vehicle_and_pins_speed_to_zero() {
    let (mut app, mut board, mut display, mut sink) = make_app(MockBoard::new());

    run(&mut app, &mut board, &mut display, &mut sink, 9);
    assert_eq!(app.state().fuel_percent, 10);
    assert_ne!(app.state().speed, 0);
    assert!(!app.state().vehicle_stopped);

    run(&mut app, &mut board, &mut display, &mut sink, 1);
    assert_eq!(app.state().fuel_percent, 0);
    assert_eq!(app.state().speed, 0);
    assert!(app.state().vehicle_stopped);
    assert!(!board.counting);

    run(&mut app, &mut board, &mut display, &mut sink, 5);
    assert_eq!(app.state().speed, 0);
    assert!(display.row(2).starts_with("s:00"));
    assert_eq!(sink.count(|e| *e == ClusterEvent::VehicleStopped), 1);
}

// ── Temperature ───────────────────────────────────────────────

#[test]
fn indicator_follows_strict_limit() {
    let mut board = MockBoard::new();
    board.samples = [40, 41, 41, 40, 0, 255].into();
    let (mut app, mut board, mut display, mut sink) = make_app(board);

    run(&mut app, &mut board, &mut display, &mut sink, 6);

    // Power-up clear, then one write per iteration.
    assert_eq!(board.led_history(), [false, false, true, true, false, false, true]);
    let transitions: Vec<_> = sink
        .events
        .iter()
        .filter(|e| {
            matches!(
                e,
                ClusterEvent::OverTemperature { .. } | ClusterEvent::TemperatureNormal { .. }
            )
        })
        .copied()
        .collect();
    assert_eq!(
        transitions,
        [
            ClusterEvent::OverTemperature { temperature_c: 41 },
            ClusterEvent::TemperatureNormal { temperature_c: 40 },
            ClusterEvent::OverTemperature { temperature_c: 255 },
        ]
    );
}

#[test]
fn three_digit_temperature_loses_its_last_digit_under_the_unit() {
    let (mut app, mut board, mut display, mut sink) = make_app(MockBoard::with_sample(255));
    run(&mut app, &mut board, &mut display, &mut sink, 1);
    assert_eq!(app.state().temperature_c, 255);
    assert_eq!(&display.row(2)[11..], "T:25c");
}

// ── Speed ─────────────────────────────────────────────────────

#[test]
fn pulse_snapshot_does_not_feed_speed() {
    let mut board = MockBoard::new();
    board.pulses = 0x1234;
    let (mut app, mut board, mut display, mut sink) = make_app(board);

    run(&mut app, &mut board, &mut display, &mut sink, 2);
    assert_eq!(app.state().pulse_count, 0x1234);
    assert_eq!(app.state().speed, 26);
}

#[test]
fn speed_step_wraps() {
    let config = ClusterConfig {
        speed_step: u32::MAX,
        ..ClusterConfig::default()
    };
    let (mut app, mut board, mut display, mut sink) = make_app_with(config, MockBoard::new());
    run(&mut app, &mut board, &mut display, &mut sink, 1);
    assert_eq!(app.state().speed, 15);
}

// ── System toggle ─────────────────────────────────────────────

#[test]
fn toggle_mid_iteration_takes_effect_at_next_boundary() {
    let (mut app, mut board, mut display, mut sink) = make_app(MockBoard::new());
    let toggle = SystemToggle::new(true);

    // Wait #4 is the settle wait of the third iteration.
    let mut delay = MockDelay::toggling(&toggle, 4);
    let ran = app.run_while_on(&toggle, &mut board, &mut display, &mut delay, &mut sink);

    assert_eq!(ran, 3);
    assert_eq!(delay.waits_ms.len(), 6, "third iteration ran to completion");
    assert_eq!(sink.events.last(), Some(&ClusterEvent::Halted { iterations: 3 }));
    assert!(!toggle.is_on());
}

#[test]
fn run_resumes_where_it_left_off() {
    let (mut app, mut board, mut display, mut sink) = make_app(MockBoard::new());
    let toggle = SystemToggle::new(true);

    let mut delay = MockDelay::toggling(&toggle, 1);
    assert_eq!(app.run_while_on(&toggle, &mut board, &mut display, &mut delay, &mut sink), 1);
    assert_eq!(app.state().fuel_percent, 90);

    toggle.toggle();
    let mut delay = MockDelay::toggling(&toggle, 3);
    assert_eq!(app.run_while_on(&toggle, &mut board, &mut display, &mut delay, &mut sink), 2);
    assert_eq!(app.iterations(), 3);
    assert_eq!(app.state().fuel_percent, 70);
}

// ── Telemetry ─────────────────────────────────────────────────

#[test]
fn telemetry_emitted_every_iteration() {
    let (mut app, mut board, mut display, mut sink) = make_app(MockBoard::new());
    run(&mut app, &mut board, &mut display, &mut sink, 4);

    let snapshots: Vec<_> = sink
        .events
        .iter()
        .filter_map(|e| match e {
            ClusterEvent::Telemetry(t) => Some(*t),
            _ => None,
        })
        .collect();
    assert_eq!(snapshots.len(), 4);
    assert_eq!(
        snapshots.iter().map(|t| t.iteration).collect::<Vec<_>>(),
        [1, 2, 3, 4]
    );
    assert_eq!(snapshots[3], app.telemetry());
}
