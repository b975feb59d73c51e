use criterion::{black_box, criterion_group, criterion_main, Criterion};
use columns::core::{Board, BoardConfig, CellStorage};
use columns::types::{Color, Coordinate};

fn quiet_config(rows: i32, columns: i32) -> BoardConfig {
    BoardConfig::new(rows, columns, 5, false)
}

/// Storage with every cell filled by a repeating pattern that never matches
fn striped_storage(rows: i32, columns: i32) -> CellStorage {
    let storage = CellStorage::new();
    let palette = [Color::Red, Color::Green, Color::Blue, Color::Yellow];
    for column in 0..columns {
        for row in 0..rows {
            let color = palette[((row + 2 * column) % 4) as usize];
            storage.insert(Coordinate::new(row, column), color);
        }
    }
    storage
}

fn bench_find_matches(c: &mut Criterion) {
    let storage = striped_storage(13, 6);
    c.bench_function("find_matches_13x6_full", |b| {
        b.iter(|| black_box(storage.find_matches()))
    });

    let large = striped_storage(100, 100);
    c.bench_function("find_matches_100x100_full", |b| {
        b.iter(|| black_box(large.find_matches()))
    });
}

fn bench_settle_gravity(c: &mut Criterion) {
    c.bench_function("settle_gravity_floating_column", |b| {
        b.iter(|| {
            let storage = CellStorage::new();
            for row in 50..60 {
                storage.insert(Coordinate::new(row, 0), Color::Red);
            }
            black_box(storage.settle_gravity())
        })
    });
}

fn bench_clear_step(c: &mut Criterion) {
    c.bench_function("clear_step_random_fill", |b| {
        b.iter(|| {
            let mut board = Board::with_seed(quiet_config(13, 6), 12345).unwrap();
            board.fill_random(8);
            while board.clear_step() > 0 {}
            black_box(board.score())
        })
    });
}

fn bench_drop_piece(c: &mut Criterion) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .unwrap();

    c.bench_function("drop_piece_to_floor", |b| {
        b.iter(|| {
            runtime.block_on(async {
                let mut board = Board::with_seed(quiet_config(13, 6), 7).unwrap();
                board.start_game();
                while board.storage().is_empty() {
                    if !board.move_down().await {
                        break;
                    }
                }
                black_box(board.score())
            })
        })
    });
}

criterion_group!(
    benches,
    bench_find_matches,
    bench_settle_gravity,
    bench_clear_step,
    bench_drop_piece
);
criterion_main!(benches);
