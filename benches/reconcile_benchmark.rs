//! Reconciliation benchmark: Measure delivery of bursty output.
//!
//! Target: < 50µs to reconcile and flush a 64-chunk burst

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use streamview::terminal::ScreenPainter;
use streamview::{
    gesture_source, ChunkLog, FontConfig, GridSize, KeyInput, PixelSize, ScrollRegion, Surface,
    SurfaceError, Theme, Viewport, ViewportConfig, VtSurface, WriteDone,
};

/// A surface that consumes writes instantly.
struct NullSurface {
    bytes: usize,
}

impl ScrollRegion for NullSurface {
    fn scroll_top(&self) -> f64 {
        0.0
    }
    fn set_scroll_top(&mut self, _top: f64) {}
    fn scroll_height(&self) -> f64 {
        0.0
    }
    fn client_height(&self) -> f64 {
        0.0
    }
}

impl Surface for NullSurface {
    fn write(&mut self, data: &str, done: WriteDone) {
        self.bytes += data.len();
        done();
    }
    fn reset(&mut self) {
        self.bytes = 0;
    }
    fn grid(&self) -> GridSize {
        GridSize::new(80, 24)
    }
    fn fit(&mut self, _area: PixelSize) -> Result<GridSize, SurfaceError> {
        Ok(self.grid())
    }
    fn focus(&mut self) {}
    fn dispose(&mut self) {}
    fn is_disposed(&self) -> bool {
        false
    }
    fn key_input(&mut self, _key: &KeyInput) -> Option<String> {
        None
    }
    fn set_font(&mut self, _font: &FontConfig) {}
    fn set_theme(&mut self, _theme: &Theme) {}
}

fn null_viewport() -> Viewport<NullSurface> {
    Viewport::new(
        NullSurface { bytes: 0 },
        ViewportConfig::default(),
        gesture_source(true, false),
    )
}

fn reconcile_bursts(c: &mut Criterion) {
    let mut group = c.benchmark_group("reconcile_burst");

    for burst in [1usize, 8, 64, 512] {
        group.bench_with_input(BenchmarkId::from_parameter(burst), &burst, |b, &burst| {
            let mut viewport = null_viewport();
            let mut log = ChunkLog::with_max_chunks(10_000);
            b.iter(|| {
                for i in 0..burst {
                    log.push(format!("token {i} "));
                    viewport.sync(black_box(log.as_slice()));
                }
                viewport.run_pending()
            });
        });
    }

    group.finish();
}

fn reconcile_unchanged(c: &mut Criterion) {
    let mut viewport = null_viewport();
    let mut log = ChunkLog::new();
    for i in 0..1000 {
        log.push(format!("line {i}\r\n"));
    }
    viewport.sync(log.as_slice());
    viewport.run_pending();

    c.bench_function("reconcile_unchanged_1000", |b| {
        b.iter(|| viewport.sync(black_box(log.as_slice())));
    });
}

fn stream_into_vt(c: &mut Criterion) {
    let config = ViewportConfig::default();
    let mut group = c.benchmark_group("vt_stream");

    for (cols, rows) in [(80u16, 24u16), (200, 50)] {
        group.bench_with_input(
            BenchmarkId::new("lines", format!("{cols}x{rows}")),
            &(cols, rows),
            |b, &(cols, rows)| {
                let surface = VtSurface::from_config(GridSize::new(cols, rows), &config)
                    .expect("default config is valid");
                let mut viewport = Viewport::new(surface, config.clone(), gesture_source(true, false));
                let mut log = ChunkLog::with_max_chunks(1000);
                b.iter(|| {
                    log.push("\x1b[32mok\x1b[0m streaming output line\r\n");
                    viewport.sync(log.as_slice());
                    viewport.run_pending()
                });
            },
        );
    }

    group.finish();
}

fn paint_vt(c: &mut Criterion) {
    let mut surface = VtSurface::new(GridSize::new(200, 50), FontConfig::default(), Theme::DARK, 1000);
    let text: String = (0..60)
        .map(|i| format!("\x1b[3{}mline {i} with some colored output\x1b[0m\r\n", i % 8))
        .collect();
    surface.write(&text, Box::new(|| {}));
    let mut painter = ScreenPainter::new();

    c.bench_function("paint_200x50", |b| {
        b.iter(|| painter.build(black_box(&surface)));
    });
}

criterion_group!(
    benches,
    reconcile_bursts,
    reconcile_unchanged,
    stream_into_vt,
    paint_vt,
);
criterion_main!(benches);
