use criterion::{black_box, criterion_group, criterion_main, Criterion};
use hexer::{Board, BoardConfig, CommandRecorder, InputEvent, Size2};

fn criterion_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("render-frame");

    let config = BoardConfig {
        seed_radius: 200,
        ..BoardConfig::default()
    };
    let mut board = Board::new(config).unwrap();
    let mut surface = CommandRecorder::default();
    board
        .resize(Size2::new(1920.0, 1080.0), 2.0, &mut surface)
        .unwrap();

    for &zoom in &[0.5, 1.0, 3.5] {
        board.reset();
        board.camera_mut().zoom_by(zoom);
        let mut timestamp = 0.0;
        group.bench_function(format!("zoom {}", zoom), |b| {
            b.iter(|| {
                timestamp += 16.0;
                let stats = board.render_frame(&mut surface, timestamp);
                // Don't let the recorder grow forever
                surface.take();
                black_box(stats)
            })
        });
    }
    group.finish();

    c.bench_function("pinch gesture", |b| {
        b.iter(|| {
            board.handle_input(InputEvent::pointer_down(1, 500.0, 500.0, 0.0));
            board.handle_input(InputEvent::pointer_down(2, 600.0, 500.0, 0.0));
            for i in 0..20 {
                let x = 600.0 + i as f64 * 10.0;
                board.handle_input(black_box(InputEvent::pointer_move(
                    2, x, 500.0, 0.0,
                )));
            }
            board.handle_input(InputEvent::pointer_up(2, 800.0, 500.0, 0.0));
            board.handle_input(InputEvent::pointer_up(1, 500.0, 500.0, 0.0));
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
