use proptest::prelude::*;

use autounlock::engine::BatchCore;
use autounlock::types::GameId;
use autounlock_test_utils::builders::numbered_items;
use autounlock_test_utils::fake_spawner::{FakeSpawner, Lifetime};

/// Per-item script: `None` = spawn fails, `Some(n)` = exits on the n-th poll.
fn script_strategy(max_items: usize) -> impl Strategy<Value = Vec<Option<usize>>> {
    proptest::collection::vec(proptest::option::weighted(0.8, 1..5usize), 0..=max_items)
}

fn spawner_for(script: &[Option<usize>]) -> FakeSpawner {
    let mut spawner = FakeSpawner::new();
    for (i, step) in script.iter().enumerate() {
        let id = i as GameId + 1;
        spawner = match step {
            Some(polls) => spawner.lifetime_of(id, Lifetime::Polls(*polls)),
            None => spawner.failing(id),
        };
    }
    spawner
}

proptest! {
    #[test]
    fn runner_respects_cap_spawns_once_and_drains(
        script in script_strategy(30),
        cap in 1..8usize,
    ) {
        let count = script.len();
        let spawner = spawner_for(&script);
        let recorder = spawner.recorder();
        let mut core = BatchCore::new(numbered_items(count), cap, spawner).unwrap();

        // Every item needs at most 4 ticks of slot time, plus the final
        // admitted-all and drain ticks.
        let max_ticks = count * 5 + 3;
        let mut ticks = 0;
        let mut drained = false;

        while ticks < max_ticks {
            let report = core.tick();
            ticks += 1;

            prop_assert!(core.active_count() <= cap);
            prop_assert!(report.started.len() <= cap);

            if report.drained {
                drained = true;
                break;
            }
        }

        prop_assert!(drained, "not drained after {} ticks", ticks);

        let snapshot = core.snapshot();
        prop_assert_eq!(snapshot.active, 0);
        prop_assert_eq!(snapshot.cursor, count);
        prop_assert!(snapshot.admitted_all);

        let expected: Vec<GameId> = (1..=count as GameId).collect();
        prop_assert_eq!(recorder.calls(), expected);
        prop_assert!(recorder.max_alive() <= cap);

        let failures = script.iter().filter(|s| s.is_none()).count();
        prop_assert_eq!(snapshot.stats.spawn_failures, failures);
        prop_assert_eq!(snapshot.stats.started, count - failures);
        prop_assert_eq!(snapshot.stats.ended, count - failures);
    }

    #[test]
    fn admitted_all_pins_the_cursor(
        count in 0..20usize,
        cap in 1..5usize,
        extra_ticks in 0..10usize,
    ) {
        let mut core = BatchCore::new(numbered_items(count), cap, FakeSpawner::new().exits_after(2)).unwrap();

        while !core.is_admitted_all() {
            core.tick();
        }
        let cursor = core.snapshot().cursor;
        prop_assert_eq!(cursor, count);

        for _ in 0..extra_ticks {
            core.tick();
            prop_assert_eq!(core.snapshot().cursor, cursor);
        }

        if core.is_drained() {
            prop_assert_eq!(core.active_count(), 0);
        }
    }
}
