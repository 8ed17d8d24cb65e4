use std::hint::black_box;

use autolinker_lib::config::FilterSettings;
use autolinker_lib::policy::SchemeList;
use autolinker_lib::{Linker, LinkKind};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

const PLAIN: &str = "A paragraph of ordinary prose with no addresses in it at all, repeated to give the \
                     tokenizer and the patterns something to chew on. ";

const LINKY: &str = "<p>Docs at https://docs.example.com/guide/intro?lang=en#setup, mirror at \
                     www.mirror.example.org, questions to help@example.com.</p>\
                     <!-- old: http://legacy.example.com --><pre>http://not.linked.example.com</pre> ";

fn document(unit: &str, repeat: usize) -> String {
    unit.repeat(repeat)
}

fn bench_linkify(c: &mut Criterion) {
    let mut group = c.benchmark_group("linkify");
    let linker = Linker::new(&FilterSettings::default(), &SchemeList::default()).unwrap();

    for repeat in [1, 50, 500] {
        let plain = document(PLAIN, repeat);
        let linky = document(LINKY, repeat);

        group.bench_with_input(BenchmarkId::new("plain", repeat), &plain, |b, html| {
            b.iter(|| linker.linkify(black_box(html)));
        });
        group.bench_with_input(BenchmarkId::new("links", repeat), &linky, |b, html| {
            b.iter(|| linker.linkify(black_box(html)));
        });
    }

    group.finish();
}

fn bench_single_pass(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_pass");
    let html = document(LINKY, 100);

    for kind in LinkKind::ALL {
        let settings = FilterSettings {
            with_protocol: kind == LinkKind::FullUrl,
            with_www: kind == LinkKind::WwwUrl,
            with_mail: kind == LinkKind::Email,
            ..FilterSettings::default()
        };
        let linker = Linker::new(&settings, &SchemeList::default()).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(kind), &html, |b, html| {
            b.iter(|| linker.linkify(black_box(html)));
        });
    }

    group.finish();
}

fn bench_build(c: &mut Criterion) {
    c.bench_function("build_linker", |b| {
        b.iter(|| Linker::new(black_box(&FilterSettings::default()), &SchemeList::default()).unwrap());
    });
}

criterion_group!(benches, bench_linkify, bench_single_pass, bench_build);
criterion_main!(benches);
