use chrono::{Duration, Utc};
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::SmallRng;

use lexdrill::catalog::item::{Sentence, Word};
use lexdrill::config::PriorityWeights;
use lexdrill::engine::ledger::StatsLedger;
use lexdrill::engine::sentence_selector::SentenceBatch;
use lexdrill::engine::word_scheduler::WordScheduler;

fn make_words(count: u32) -> Vec<Word> {
    (1..=count)
        .map(|id| Word {
            id,
            bulgarian: format!("дума{id}"),
            english: format!("word{id}"),
        })
        .collect()
}

fn make_sentences(count: u32) -> Vec<Sentence> {
    (1..=count)
        .map(|id| Sentence {
            id,
            prompt_template: format!("Изречение {id} ____."),
            translation: format!("Sentence {id}."),
            options: vec!["а".to_string(), "б".to_string(), "в".to_string()],
            answer: "б".to_string(),
        })
        .collect()
}

/// Roughly a third unseen, the rest with mixed history spread over a month.
fn seeded_ledger(words: &[Word]) -> StatsLedger {
    let mut ledger = StatsLedger::for_items(words.iter().map(|w| w.id));
    let now = Utc::now();
    for word in words.iter().filter(|w| w.id % 3 != 0) {
        let when = now - Duration::days(i64::from(word.id % 30));
        for attempt in 0..(word.id % 7 + 1) {
            ledger.record_attempt_at(word.id, (attempt + word.id) % 4 != 0, when);
        }
    }
    ledger
}

fn bench_select_next(c: &mut Criterion) {
    let words = make_words(1000);
    let ledger = seeded_ledger(&words);
    let now = Utc::now();

    c.bench_function("select_next (1000 words)", |b| {
        let mut rng = SmallRng::seed_from_u64(42);
        let mut scheduler = WordScheduler::new(PriorityWeights::default());
        b.iter(|| scheduler.select_next(black_box(&words), &ledger, now, &mut rng))
    });
}

fn bench_full_rotation(c: &mut Criterion) {
    let words = make_words(200);
    let ledger = seeded_ledger(&words);
    let now = Utc::now();

    c.bench_function("full rotation (200 words)", |b| {
        let mut rng = SmallRng::seed_from_u64(7);
        b.iter(|| {
            let mut scheduler = WordScheduler::new(PriorityWeights::default());
            for _ in 0..words.len() {
                black_box(scheduler.select_next(&words, &ledger, now, &mut rng));
            }
        })
    });
}

fn bench_sentence_batch(c: &mut Criterion) {
    let sentences = make_sentences(500);

    c.bench_function("sentence batch start (20 of 500)", |b| {
        let mut rng = SmallRng::seed_from_u64(3);
        b.iter(|| SentenceBatch::start(black_box(&sentences), 20, &mut rng))
    });
}

criterion_group!(
    benches,
    bench_select_next,
    bench_full_rotation,
    bench_sentence_batch
);
criterion_main!(benches);
