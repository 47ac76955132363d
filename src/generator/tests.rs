use rand::SeedableRng;
use rand_pcg::Pcg64;

use super::*;
use crate::config::{BalancePolicy, DifficultyConfig, DifficultyRegistry, DifficultyTag};
use crate::error::BeatError;
use crate::measure::{Duration, Dynamic, Ornament};

fn rng(seed: u64) -> Pcg64 {
    Pcg64::seed_from_u64(seed)
}

fn builtin() -> DifficultyRegistry {
    DifficultyRegistry::builtin().unwrap()
}

fn sixteenth_config(balancing: BalancePolicy) -> DifficultyConfig {
    let mut config = builtin().get(DifficultyTag::Intermediate).unwrap().clone();
    config.durations = vec![crate::config::DurationWeight::new(Duration::Sixteenth, None)];
    config.rest_probability = 0.0;
    config.run_lengths = [(1, 0.1), (8, 0.9)].into_iter().collect();
    config.switch_probability = 0.1;
    config.balancing = balancing;
    config
}

#[test]
fn test_every_measure_tiles_the_grid() {
    let registry = builtin();
    for tag in DifficultyTag::ALL {
        for beats in [1, 3, 4, 7, 16] {
            let request = BeatRequest {
                beats,
                measures: 3,
                difficulty: tag,
            };
            for seed in 0..40 {
                let beat = generate_beat(&request, &registry, &mut rng(seed)).unwrap();
                assert_eq!(beat.measures.len(), 3);
                for measure in &beat.measures {
                    assert_eq!(measure.length(), beats * 24, "{} seed {}", tag, seed);
                    assert_eq!(measure[0].start, 0);
                    for pair in measure.windows(2) {
                        assert_eq!(pair[1].start, pair[0].end());
                    }
                }
            }
        }
    }
}

#[test]
fn test_same_seed_same_beat() {
    let registry = builtin();
    let request = BeatRequest {
        beats: 4,
        measures: 8,
        difficulty: DifficultyTag::Expert,
    };
    let a = generate_beat(&request, &registry, &mut rng(1234)).unwrap();
    let b = generate_beat(&request, &registry, &mut rng(1234)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_unknown_difficulty() {
    let mut registry = DifficultyRegistry::new();
    registry.insert(
        DifficultyTag::Beginner,
        builtin().get(DifficultyTag::Beginner).unwrap().clone(),
    );
    let request = BeatRequest {
        beats: 4,
        measures: 1,
        difficulty: DifficultyTag::Advanced,
    };
    assert_eq!(
        generate_beat(&request, &registry, &mut rng(0)),
        Err(BeatError::UnknownDifficulty("advanced".to_string()))
    );
}

#[test]
fn test_zero_measures() {
    let request = BeatRequest {
        beats: 4,
        measures: 0,
        difficulty: DifficultyTag::Beginner,
    };
    let beat = generate_beat(&request, &builtin(), &mut rng(0)).unwrap();
    assert!(beat.measures.is_empty());
    assert_eq!(beat.beats_per_measure, 4);
}

#[test]
fn test_rests_carry_no_stroke() {
    let registry = builtin();
    let request = BeatRequest {
        beats: 4,
        measures: 4,
        difficulty: DifficultyTag::Advanced,
    };
    let mut rests = 0;
    for seed in 0..30 {
        let beat = generate_beat(&request, &registry, &mut rng(seed)).unwrap();
        for note in beat.measures.iter().flat_map(|m| m.iter()) {
            if note.is_rest() {
                rests += 1;
                assert_eq!(note.is_dominant(), None);
            } else {
                assert!(note.is_dominant().is_some());
            }
        }
    }
    assert!(rests > 0);
}

#[test]
fn test_ghost_strokes_never_generated() {
    let registry = builtin();
    for tag in DifficultyTag::ALL {
        let request = BeatRequest {
            beats: 4,
            measures: 8,
            difficulty: tag,
        };
        let beat = generate_beat(&request, &registry, &mut rng(5)).unwrap();
        assert!(beat
            .measures
            .iter()
            .flat_map(|m| m.iter())
            .filter_map(|n| n.stroke)
            .all(|s| s.dynamic != Dynamic::Ghost));
    }
}

#[test]
fn test_beginner_has_no_ornaments() {
    let request = BeatRequest {
        beats: 4,
        measures: 16,
        difficulty: DifficultyTag::Beginner,
    };
    let beat = generate_beat(&request, &builtin(), &mut rng(3)).unwrap();
    let ornaments: Vec<Ornament> = beat
        .measures
        .iter()
        .flat_map(|m| m.iter())
        .filter_map(|n| n.stroke.and_then(|s| s.ornament))
        .collect();
    assert!(ornaments.is_empty());
}

#[test]
fn test_builtin_balancing_bounds_clumps() {
    let registry = builtin();
    for tag in DifficultyTag::ALL {
        let policy = registry.get(tag).unwrap().balancing;
        let Some(max_clump) = policy.max_clump.filter(|_| policy.enabled) else {
            continue;
        };
        let request = BeatRequest {
            beats: 4,
            measures: 4,
            difficulty: tag,
        };
        for seed in 0..50 {
            let beat = generate_beat(&request, &registry, &mut rng(seed)).unwrap();
            for measure in &beat.measures {
                assert!(longest_clump(measure) <= max_clump, "{} seed {}", tag, seed);
            }
        }
    }
}

#[test]
fn test_ratio_band_enforced() {
    let config = sixteenth_config(BalancePolicy {
        enabled: true,
        max_clump: None,
        min_ratio: Some(0.4),
        max_ratio: Some(0.6),
    });
    for seed in 0..100 {
        let measure = generate_measure(&config, 96, &mut rng(seed));
        let ratio = dominant_ratio(&measure).unwrap();
        assert!((0.4..=0.6).contains(&ratio), "seed {}: {}", seed, ratio);
    }
}

#[test]
fn test_clump_and_ratio_together() {
    let config = sixteenth_config(BalancePolicy {
        enabled: true,
        max_clump: Some(3),
        min_ratio: Some(0.5),
        max_ratio: Some(0.75),
    });
    for seed in 0..100 {
        let measure = generate_measure(&config, 96, &mut rng(seed));
        assert_eq!(measure.len(), 16);
        assert!(longest_clump(&measure) <= 3, "seed {}", seed);
    }
}

#[test]
fn test_unbalanced_runs_can_clump() {
    let config = sixteenth_config(BalancePolicy::default());
    let longest = (0..50)
        .map(|seed| longest_clump(&generate_measure(&config, 96, &mut rng(seed))))
        .max()
        .unwrap();
    assert!(longest >= 8);
}
