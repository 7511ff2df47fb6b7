use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use puzzle_room::frame::{FixedFrames, FrameInfo};
use puzzle_room::{RoomController, SceneConfig};

fn controller() -> RoomController {
    RoomController::new(&SceneConfig::default()).expect("room setup")
}

/// Frame ticks with only the ambient drift and spin running
fn bench_idle_ticks(c: &mut Criterion) {
    let mut group = c.benchmark_group("idle_ticks");
    for frames in [60u64, 600] {
        group.bench_with_input(BenchmarkId::from_parameter(frames), &frames, |b, &frames| {
            b.iter(|| {
                let mut room = controller();
                for frame in FixedFrames::new(60.0, frames) {
                    room.tick(black_box(&frame));
                }
                black_box(room.frames())
            });
        });
    }
    group.finish();
}

/// Ticks while all eleven reveal interpolations are in flight
fn bench_reveal(c: &mut Criterion) {
    c.bench_function("reveal_120_frames", |b| {
        b.iter(|| {
            let mut room = controller();
            let target = room.room().puzzle_box;
            room.select(target);
            for frame in FixedFrames::new(60.0, 120) {
                room.tick(&frame);
            }
            black_box(room.scene().camera.position)
        });
    });
}

/// Pointer picking against the room
fn bench_picking(c: &mut Criterion) {
    let mut room = controller();
    room.tick(&FrameInfo::new(0, 0.0, 1.0 / 60.0));
    let points: Vec<(f32, f32)> = (0..64)
        .map(|i| {
            let t = i as f32 / 63.0;
            (t * 2.0 - 1.0, 1.0 - t * 2.0)
        })
        .collect();

    c.bench_function("pick_64_points", |b| {
        b.iter(|| {
            points
                .iter()
                .filter(|(x, y)| room.pick_at(black_box(*x), black_box(*y)).is_some())
                .count()
        });
    });
}

criterion_group!(benches, bench_idle_ticks, bench_reveal, bench_picking);
criterion_main!(benches);
