use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sumfall::core::matcher::{cascade, scan_and_clear};
use sumfall::core::{Board, EngineConfig, RawGrid, SimpleRng};
use sumfall::engine::{ManualClock, NullSink, Session};
use sumfall::types::{Command, GameMode};

fn random_grid(seed: u32) -> RawGrid {
    let mut rng = SimpleRng::new(seed);
    let mut grid = [[0i8; 6]; 10];
    for row in grid.iter_mut() {
        for cell in row.iter_mut() {
            if rng.next_range(3) > 0 {
                *cell = rng.next_inclusive(1, 9) as i8;
            }
        }
    }
    grid
}

fn bench_scan_stable_board(c: &mut Criterion) {
    // A board that never matches: full scan, nothing cleared.
    let board = Board::from_values(&[[9i8; 6]; 10]).unwrap_or_default();

    c.bench_function("scan_no_match", |b| {
        b.iter(|| {
            let mut board = board.clone();
            scan_and_clear(&mut board, black_box(10))
        })
    });
}

fn bench_cascade_random(c: &mut Criterion) {
    let boards: Vec<Board> = (0..64)
        .filter_map(|seed| Board::from_values(&random_grid(seed)))
        .collect();

    c.bench_function("cascade_random_boards", |b| {
        b.iter(|| {
            for board in &boards {
                let mut board = board.clone();
                black_box(cascade(&mut board, 10));
            }
        })
    });
}

fn bench_session_tick(c: &mut Criterion) {
    let clock = ManualClock::new();
    let mut session = Session::new(
        EngineConfig::with_seed(12345),
        GameMode::Classic,
        clock.clone(),
        NullSink,
        NullSink,
    );
    let mut i = 0u32;

    c.bench_function("session_fall_tick", |b| {
        b.iter(|| {
            if session.is_game_over() {
                session.reset_game(GameMode::Classic);
            }
            i = i.wrapping_add(1);
            if i % 4 == 0 {
                session.apply(Command::MoveRight);
            }
            clock.advance(session.fall_interval_ms());
            session.update();
        })
    });
}

criterion_group!(
    benches,
    bench_scan_stable_board,
    bench_cascade_random,
    bench_session_tick
);
criterion_main!(benches);
