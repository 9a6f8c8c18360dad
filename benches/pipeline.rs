//! Benchmarks for the postgen rendering pipeline.

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use postgen::render::{Canvas, Compositor, GradientDirection, LinePattern, TextSpec};
use postgen::templates::{default_templates, PostContent};
use postgen::types::{Colour, Dimension};
use postgen::typography::{wrap_text, Typography, BOLD_FONT};

fn square() -> Canvas {
    Canvas::new(1080, 1080, Colour::BLACK).unwrap()
}

// -- Background benchmarks --

fn bench_backgrounds(c: &mut Criterion) {
    let mut group = c.benchmark_group("backgrounds");
    let start = Colour::rgb(10, 102, 194);
    let end = Colour::rgb(0, 65, 130);

    for direction in GradientDirection::ALL {
        let mut canvas = square();
        group.bench_function(format!("gradient_{}", direction), |b| {
            b.iter(|| postgen::render::apply_gradient(&mut canvas, start, end, black_box(direction)))
        });
    }

    let mut canvas = square();
    group.bench_function("vignette", |b| {
        b.iter(|| postgen::render::add_vignette(&mut canvas, black_box(0.6)))
    });

    let mut canvas = square();
    let lines = LinePattern::default();
    group.bench_function("pattern_lines", |b| {
        b.iter(|| postgen::render::add_pattern_lines(&mut canvas, black_box(&lines)).unwrap())
    });

    let mut canvas = square();
    group.bench_function("blur_region", |b| {
        b.iter(|| postgen::render::add_blur(&mut canvas, 5, Some((40, 700, 1040, 900))).unwrap())
    });

    group.finish();
}

// -- Text benchmarks --

fn bench_text(c: &mut Criterion) {
    let mut group = c.benchmark_group("text");
    let typography = Arc::new(Typography::new(env!("CARGO_MANIFEST_DIR")));
    let font = typography.get_font(BOLD_FONT, 70);
    let headline = "Innovation starts with a single idea and a team willing to ship it";

    group.bench_function("wrap_headline", |b| {
        b.iter(|| wrap_text(black_box(headline), &font, 900))
    });

    let mut compositor = Compositor::new(typography.clone()).with_seed(1);
    compositor
        .create_canvas(&Dimension::default(), Colour::BLACK)
        .unwrap();
    let spec = TextSpec {
        max_width: Some(900),
        shadow: true,
        ..TextSpec::new(headline, (40, 400))
    };
    group.bench_function("add_text_shadow", |b| {
        b.iter(|| {
            compositor.add_text(black_box(&spec)).unwrap();
        })
    });

    group.finish();
}

// -- Full template benchmarks --

fn bench_templates(c: &mut Criterion) {
    let mut group = c.benchmark_group("templates");
    group.sample_size(20);
    let typography = Arc::new(Typography::new(env!("CARGO_MANIFEST_DIR")));
    let content = PostContent::new("Quarterly results are in").with_subheadline("Up and to the right");

    for name in ["professional_gradient", "dark_geometric", "creative_textbox"] {
        let Some(template) = default_templates().into_iter().find(|t| t.name == name) else {
            continue;
        };
        let design = template.to_design(&content, None).unwrap();
        group.bench_function(name, |b| {
            b.iter(|| {
                let mut compositor = Compositor::new(typography.clone()).with_seed(7);
                design.render(&mut compositor).unwrap();
                black_box(compositor.into_canvas())
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_backgrounds, bench_text, bench_templates);
criterion_main!(benches);
