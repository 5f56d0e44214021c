use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use placesreport::enrich::{EnrichError, VideoLookup, VideoMetadata};
use placesreport::parsers::places::annotate;
use placesreport::parsers::visit::{AnnotatedVisit, VisitRecord};
use placesreport::report;
use placesreport::url;

const URLS: [&str; 4] = [
    "https://www.google.com/search?client=firefox-b-d&q=criterion+benchmarks&ved=2ahUKEwj&uact=5",
    "https://www.google.com/url?sa=t&rct=j&q=&esrc=s&url=https%3A%2F%2Fdocs.rs%2Fcriterion&usg=AOvVaw",
    "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
    "https://doc.rust-lang.org/std/iter/trait.Iterator.html",
];

struct StaticLookup;

impl VideoLookup for StaticLookup {
    fn lookup(&mut self, _video_id: &str) -> Result<Option<VideoMetadata>, EnrichError> {
        Ok(Some(VideoMetadata {
            title: "title".to_string(),
            channel: "channel".to_string(),
        }))
    }
}

fn synthetic_visits(count: usize) -> Vec<AnnotatedVisit> {
    (0..count as i64)
        .rev()
        .map(|i| {
            annotate(VisitRecord {
                id: i + 1,
                from_id: if i % 7 == 0 { 0 } else { i },
                timestamp: 1_600_000_000_000_000 + i * 1_000_000,
                transition_code: i % 9 + 1,
                url: URLS[i as usize % URLS.len()].to_string(),
            })
            .expect("annotate")
        })
        .collect()
}

fn bench_normalize(c: &mut Criterion) {
    c.bench_function("normalize_mixed_urls", |b| {
        b.iter(|| {
            for u in URLS {
                std::hint::black_box(url::normalize(u));
            }
        })
    });
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");
    for count in [1_000usize, 10_000] {
        let visits = synthetic_visits(count);
        group.bench_with_input(BenchmarkId::new("enriched", count), &visits, |b, v| {
            b.iter(|| report::render(v, Some(&mut StaticLookup)).expect("render"))
        });
        group.bench_with_input(BenchmarkId::new("plain", count), &visits, |b, v| {
            b.iter(|| report::render(v, None::<&mut StaticLookup>).expect("render"))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_normalize, bench_render);
criterion_main!(benches);
