use std::time::Instant;

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::SmallRng;

use mathdash::generator::category::{ALL_CATEGORIES, MathCategory};
use mathdash::generator::generate;
use mathdash::session::machine::Session;
use mathdash::session::state::{DifficultyLevel, Phase, TICK_MS};

fn bench_generate_all_categories(c: &mut Criterion) {
    let mut rng = SmallRng::seed_from_u64(42);

    c.bench_function("generate (every category, difficulty 5)", |b| {
        b.iter(|| {
            for &category in ALL_CATEGORIES {
                black_box(generate(black_box(category), 5, &mut rng));
            }
        })
    });
}

fn bench_generate_hardest(c: &mut Criterion) {
    let mut rng = SmallRng::seed_from_u64(7);

    c.bench_function("generate mixed (difficulty 10, 100 challenges)", |b| {
        b.iter(|| {
            for _ in 0..100 {
                black_box(generate(MathCategory::Mixed, black_box(10), &mut rng));
            }
        })
    });
}

fn bench_full_session(c: &mut Criterion) {
    c.bench_function("session of 50 questions driven by ticks", |b| {
        b.iter(|| {
            let mut session = Session::seeded(1);
            let mut clock = Instant::now();
            session.select_category(MathCategory::Mixed);
            session.start_configured_game(DifficultyLevel::Hard, 50);
            while session.state().phase != Phase::Summary {
                clock += std::time::Duration::from_millis(TICK_MS);
                session.tick(TICK_MS, clock);
                if session.state().phase == Phase::Solve
                    && let Some(challenge) = &session.state().current_challenge
                {
                    let answer = challenge.answer.text();
                    session.submit_answer(&answer, clock);
                }
            }
            black_box(session.state().score)
        })
    });
}

criterion_group!(
    benches,
    bench_generate_all_categories,
    bench_generate_hardest,
    bench_full_session
);
criterion_main!(benches);
