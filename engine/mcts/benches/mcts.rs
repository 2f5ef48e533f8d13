//! MCTS benchmarks for performance profiling.
//!
//! Run with: `cargo bench -p mcts`
//!
//! These benchmarks measure:
//! - Full searches per leaf evaluator with varying simulation counts
//! - Searches from different game phases
//! - Tree operations (selection, backpropagation, policy extraction)

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use games_siege::{Board, NUM_ACTIONS};
use mcts::{
    LearnedEvaluator, LeafEvaluator, MctsConfig, MctsSearch, MctsTree, RolloutEvaluator,
    TerritoryEvaluator, UniformPolicyValue,
};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

fn play_moves(len: usize, moves: &[u8]) -> Board {
    let mut board = Board::new(len).unwrap();
    for &m in moves {
        board.do_action(m).unwrap();
    }
    board
}

fn search_once<E: LeafEvaluator>(board: &Board, evaluator: &E, config: &MctsConfig) -> u8 {
    let mut rng = ChaCha20Rng::seed_from_u64(42);
    let mut search = MctsSearch::new(board, evaluator, config.clone()).unwrap();
    search.run(&mut rng).unwrap().action
}

// =============================================================================
// Full MCTS Search Benchmarks
// =============================================================================

fn bench_variants(c: &mut Criterion) {
    let mut group = c.benchmark_group("mcts_variants");
    let board = Board::default();

    for sims in [100, 400, 1000] {
        let config = MctsConfig::default().with_simulations(sims);
        group.throughput(Throughput::Elements(sims as u64));

        group.bench_with_input(BenchmarkId::new("rollout", sims), &config, |b, config| {
            let evaluator = RolloutEvaluator::new();
            b.iter(|| black_box(search_once(&board, &evaluator, config)));
        });

        group.bench_with_input(BenchmarkId::new("territory", sims), &config, |b, config| {
            let evaluator = TerritoryEvaluator::default();
            b.iter(|| black_box(search_once(&board, &evaluator, config)));
        });

        group.bench_with_input(BenchmarkId::new("learned", sims), &config, |b, config| {
            let evaluator = LearnedEvaluator::new(UniformPolicyValue::new());
            b.iter(|| black_box(search_once(&board, &evaluator, config)));
        });
    }

    group.finish();
}

fn bench_game_phases(c: &mut Criterion) {
    let mut group = c.benchmark_group("mcts_game_phases");
    let config = MctsConfig::default().with_simulations(400);
    let evaluator = TerritoryEvaluator::default();

    let opening = Board::default();
    group.bench_function("opening", |b| {
        b.iter(|| black_box(search_once(&opening, &evaluator, &config)))
    });

    // Both sides have walled their home corners
    let midgame = play_moves(7, &[50, 48, 54, 49]);
    group.bench_function("midgame", |b| {
        b.iter(|| black_box(search_once(&midgame, &evaluator, &config)))
    });

    let small = Board::new(4).unwrap();
    group.bench_function("small_board", |b| {
        b.iter(|| black_box(search_once(&small, &evaluator, &config)))
    });

    group.finish();
}

// =============================================================================
// Board Benchmarks
// =============================================================================

fn bench_board(c: &mut Criterion) {
    let mut group = c.benchmark_group("board");
    let board = Board::default();

    group.bench_function("do_action", |b| {
        b.iter(|| {
            let mut next = board.copy();
            next.do_action(black_box(50)).unwrap();
            black_box(next)
        })
    });

    group.bench_function("random_playout", |b| {
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        b.iter(|| black_box(RolloutEvaluator::rollout(&board, &mut rng).unwrap()))
    });

    group.finish();
}

// =============================================================================
// Tree Operation Benchmarks
// =============================================================================

fn bench_tree_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("mcts_tree_ops");

    group.bench_function("expand_100", |b| {
        let priors: Vec<(u8, f32)> = (0..NUM_ACTIONS as u8).map(|a| (a, 0.01)).collect();
        b.iter(|| {
            let mut tree = MctsTree::new();
            tree.expand(tree.root(), &priors);
            black_box(tree.len())
        });
    });

    group.bench_function("select_child", |b| {
        let mut tree = MctsTree::new();
        for i in 0..32u8 {
            let child_id = tree.add_child(tree.root(), i, (i as f32 + 1.0) / 528.0);
            let child = tree.get_mut(child_id);
            child.visit_count = (i as u32 + 1) * 10;
            child.value_sum = (i as f32 - 16.0) * 0.05 * child.visit_count as f32;
        }
        tree.get_mut(tree.root()).visit_count = 5280;

        b.iter(|| black_box(tree.select_child(tree.root(), 4.0)));
    });

    group.bench_function("backpropagate_depth_10", |b| {
        b.iter_batched(
            || {
                let mut tree = MctsTree::new();
                let mut parent = tree.root();
                for i in 0..10 {
                    parent = tree.add_child(parent, i, 0.5);
                }
                (tree, parent)
            },
            |(mut tree, leaf)| {
                tree.backpropagate(leaf, 1.0);
                black_box(tree)
            },
            criterion::BatchSize::SmallInput,
        );
    });

    group.bench_function("root_policy_temperature", |b| {
        let mut tree = MctsTree::new();
        for i in 0..32u8 {
            let child_id = tree.add_child(tree.root(), i, 1.0 / 32.0);
            tree.get_mut(child_id).visit_count = (i as u32 + 1) * 50;
        }
        b.iter(|| black_box(tree.root_policy(NUM_ACTIONS, 0.5)));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_variants,
    bench_game_phases,
    bench_board,
    bench_tree_operations,
);

criterion_main!(benches);
