use criterion::{black_box, criterion_group, criterion_main, Criterion};
use piiveil_core::{merge_entities, EntityExtractor, RedactionService, TokenLayout};
use piiveil_domain::{Config, DetectionConfig, DocumentInput, OcrWord, PixelRect};

fn sample_text(repeat: usize) -> String {
    let block = "Name: Ravi Kumar\nAadhaar 2345 6789 0123 PAN ABCDE1234F\n\
                 Email john@gmail.com Phone 9876543210 DOB 12/10/1995\n\
                 Address: 12 MG Road, Chennai\nIFSC: HDFC0123456\n";
    block.repeat(repeat)
}

fn sample_layout(repeat: usize) -> TokenLayout {
    let words = sample_text(repeat)
        .split_whitespace()
        .enumerate()
        .map(|(i, text)| OcrWord::new(text, PixelRect::new((i as i32 % 10) * 60, (i as i32 / 10) * 24, 55, 20)))
        .collect();
    TokenLayout::from_words(words)
}

fn extraction_benchmark(c: &mut Criterion) {
    let extractor = EntityExtractor::new(&DetectionConfig::default());
    let text = sample_text(50);

    let mut group = c.benchmark_group("extraction");
    group.sample_size(30);

    group.bench_function("extract_patterns_and_merge", |b| {
        b.iter(|| {
            let candidates = extractor.extract_patterns(black_box(&text));
            black_box(merge_entities(candidates));
        });
    });

    group.finish();
}

fn pipeline_benchmark(c: &mut Criterion) {
    let service = RedactionService::from_config(&Config::default()).expect("default config");
    let layout = sample_layout(20);

    let mut group = c.benchmark_group("redaction_service");
    group.sample_size(20).measurement_time(std::time::Duration::from_secs(10));

    group.bench_function("process_with_tokens", |b| {
        let runtime = tokio::runtime::Runtime::new().expect("runtime");
        b.iter(|| {
            let input = DocumentInput::with_tokens(layout.text.clone(), layout.tokens.clone());
            runtime.block_on(async {
                black_box(service.process(input).await.expect("process"));
            });
        });
    });

    group.finish();
}

criterion_group!(core_benchmarks, extraction_benchmark, pipeline_benchmark);
criterion_main!(core_benchmarks);
