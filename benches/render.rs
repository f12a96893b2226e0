//! Benchmarks for the body transformer and both renderers.
//!
//! Run with: cargo bench

use criterion::{Criterion, criterion_group, criterion_main};

use remix::markup::parse;
use remix::model::{AssetId, VisualAsset};
use remix::render::{FontChoice, transform};
use remix::{Document, render_export, render_preview};

/// A long post with headings, lists, figures, and carousels.
fn sample_document() -> Document {
    let image = vec![0x89u8; 64 * 1024];
    let mut visuals = vec![VisualAsset::pending(AssetId::header(), "Header", "header").with_image(image.clone())];
    let mut body = String::new();

    for section in 1..=20u64 {
        body.push_str(&format!("## Section {section}\n"));
        body.push_str("Some **bold** text, some *emphasis*, and a <span class=\"blue\">term</span>.\n");
        body.push_str("A second line in the same paragraph.\n\n");
        body.push_str("- first point\n- second point\n- third point\n\n");

        let n = section * 3;
        body.push_str(&format!("[[IMAGE_{n}]]\n<figcaption>Figure {n}</figcaption>\n\n"));
        body.push_str(&format!(
            "[[IMAGE_CAROUSEL_START]]\n[[IMAGE_{}]]\n[[IMAGE_{}]]\n[[IMAGE_CAROUSEL_END]]\n\n",
            n + 1,
            n + 2
        ));

        for id in n..n + 3 {
            let asset = VisualAsset::pending(AssetId::numbered(id), format!("Caption {id}"), "prompt");
            visuals.push(if id % 2 == 0 { asset.with_image(image.clone()) } else { asset });
        }
    }

    Document::new("Benchmark Post", body)
        .with_subtitle("Rendering throughput")
        .with_visuals(visuals)
}

fn bench_parse(c: &mut Criterion) {
    let doc = sample_document();
    c.bench_function("parse_body", |b| {
        b.iter(|| parse(&doc.body));
    });
}

fn bench_transform(c: &mut Criterion) {
    let doc = sample_document();
    c.bench_function("transform_body", |b| {
        b.iter(|| transform(&doc.body, &doc.visuals));
    });
}

fn bench_render_export(c: &mut Criterion) {
    let doc = sample_document();
    let font = FontChoice::default();
    c.bench_function("render_export", |b| {
        b.iter(|| render_export(&doc, &font));
    });
}

fn bench_render_preview(c: &mut Criterion) {
    let doc = sample_document();
    c.bench_function("render_preview", |b| {
        b.iter(|| render_preview(&doc));
    });
}

fn bench_replace_image(c: &mut Criterion) {
    let doc = sample_document();
    let id = AssetId::numbered(30);
    c.bench_function("replace_image", |b| {
        b.iter(|| doc.replace_image(&id, vec![1, 2, 3]));
    });
}

criterion_group!(
    benches,
    bench_parse,
    bench_transform,
    bench_render_export,
    bench_render_preview,
    bench_replace_image,
);
criterion_main!(benches);
