//! Kinetic scroll benchmark: Measure gesture tracking and inertia frames.
//!
//! Target: < 1µs per move sample

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use streamview::{KineticScroller, ScrollRegion};

struct Region {
    top: f64,
}

impl ScrollRegion for Region {
    fn scroll_top(&self) -> f64 {
        self.top
    }
    fn set_scroll_top(&mut self, top: f64) {
        self.top = top;
    }
    fn scroll_height(&self) -> f64 {
        1.0e9
    }
    fn client_height(&self) -> f64 {
        800.0
    }
}

fn track_samples(c: &mut Criterion) {
    c.bench_function("kinetic_track_100_samples", |b| {
        b.iter(|| {
            let mut region = Region { top: 5.0e8 };
            let mut engine = KineticScroller::new();
            engine.press(None, 1000.0, 0.0);
            for i in 1..=100 {
                let i = f64::from(i);
                engine.track(black_box(1000.0 - i * 7.0), i * 8.0, &mut region);
            }
            engine.velocity()
        });
    });
}

fn inertia_to_rest(c: &mut Criterion) {
    c.bench_function("kinetic_inertia_to_rest", |b| {
        b.iter(|| {
            let mut region = Region { top: 5.0e8 };
            let mut engine = KineticScroller::new();
            engine.press(None, 1000.0, 0.0);
            for i in 1..=10 {
                let i = f64::from(i);
                engine.track(1000.0 - i * 40.0, i * 8.0, &mut region);
            }
            engine.release(80.0);
            let mut now = 80.0;
            let mut frames = 0u32;
            while engine.frame(black_box(now + 16.0), &mut region) {
                now += 16.0;
                frames += 1;
            }
            frames
        });
    });
}

criterion_group!(benches, track_samples, inertia_to_rest);
criterion_main!(benches);
