//! Level-to-level scaling of map size and entity counts.

use rand::Rng;

use crate::config::MapConfig;
use crate::defs::{EnemyKind, PickupKind};

/// Piecewise-linear difficulty factor:
/// level 1 → 0.5×, middle level → 1.0×, last level → 3.0×.
pub fn scale_for_level(level: u32, total: u32) -> f32 {
    if total <= 1 {
        return 1.0;
    }
    let level = level.clamp(1, total);
    let mid = (total + 1) / 2;
    if level <= mid {
        let t = if mid == 1 {
            1.0
        } else {
            (level - 1) as f32 / (mid - 1) as f32
        };
        0.5 + t * (1.0 - 0.5)
    } else {
        let t = (level - mid) as f32 / (total - mid) as f32;
        1.0 + t * (3.0 - 1.0)
    }
}

/// Multiply `val` by a uniform factor in `[1 - pct, 1 + pct]`.
pub fn jitter(val: f32, pct: f32, rng: &mut impl Rng) -> f32 {
    let delta = (rng.random::<f32>() * 2.0 - 1.0) * pct;
    val * (1.0 + delta)
}

/// Everything the generator needs to know about one level, already rolled.
#[derive(Clone, Debug, PartialEq)]
pub struct LevelPlan {
    pub level: u32,
    pub width: i32,
    pub height: i32,
    pub enemies: Vec<(EnemyKind, usize)>,
    pub pickups: Vec<(PickupKind, usize)>,
}

impl LevelPlan {
    /// Roll map size and entity counts for `level` of `total`.
    /// Each quantity gets its own independent jitter.
    pub fn roll(level: u32, total: u32, map: &MapConfig, rng: &mut impl Rng) -> Self {
        let scale = scale_for_level(level, total);
        let round = |v: f32| (v + 0.5) as i32;

        let width = round(jitter(map.max_w as f32 * scale, map.jitter, rng)).max(map.base_w / 2);
        let height = round(jitter(map.max_h as f32 * scale, map.jitter, rng)).max(map.base_h / 2);

        let total_enemies =
            round(jitter(map.base_enemies * scale, map.jitter, rng)).max(1) as usize;
        let total_pickups =
            round(jitter(map.base_pickups * scale, map.jitter, rng)).max(1) as usize;

        Self {
            level,
            width,
            height,
            enemies: split_enemies(total_enemies),
            pickups: vec![
                (PickupKind::Medkit, total_pickups / 2),
                (PickupKind::Ammo, total_pickups - total_pickups / 2),
            ],
        }
    }

    pub fn enemy_total(&self) -> usize {
        self.enemies.iter().map(|(_, n)| n).sum()
    }
}

/// Fixed 60 / 25 / 15 split; rounding leftovers go to the last kind.
fn split_enemies(total: usize) -> Vec<(EnemyKind, usize)> {
    let zombies = (total as f32 * EnemyKind::Zombie.share()) as usize;
    let runners = (total as f32 * EnemyKind::Runner.share()) as usize;
    let shooters = total.saturating_sub(zombies + runners);
    vec![
        (EnemyKind::Zombie, zombies),
        (EnemyKind::Runner, runners),
        (EnemyKind::Shooter, shooters),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn scale_endpoints() {
        assert_eq!(scale_for_level(1, 5), 0.5);
        assert_eq!(scale_for_level(3, 5), 1.0);
        assert_eq!(scale_for_level(5, 5), 3.0);
        assert_eq!(scale_for_level(1, 1), 1.0);
        // two levels: mid == 1
        assert_eq!(scale_for_level(1, 2), 1.0);
        assert_eq!(scale_for_level(2, 2), 3.0);
    }

    #[test]
    fn scale_is_monotonic() {
        for total in 2..=10 {
            let mut prev = 0.0;
            for level in 1..=total {
                let s = scale_for_level(level, total);
                assert!(s >= prev, "level {level}/{total}");
                prev = s;
            }
        }
    }

    #[test]
    fn jitter_stays_in_band() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let v = jitter(100.0, 0.3, &mut rng);
            assert!((70.0..=130.0).contains(&v), "{v}");
        }
    }

    #[test]
    fn split_keeps_total() {
        for total in 1..60 {
            let s = split_enemies(total);
            assert_eq!(s.iter().map(|(_, n)| n).sum::<usize>(), total);
        }
        assert_eq!(
            split_enemies(20),
            vec![
                (EnemyKind::Zombie, 12),
                (EnemyKind::Runner, 5),
                (EnemyKind::Shooter, 3)
            ]
        );
    }

    #[test]
    fn rolled_plan_respects_minimums() {
        let map = MapConfig::default();
        let mut rng = StdRng::seed_from_u64(3);
        for level in 1..=5 {
            let plan = LevelPlan::roll(level, 5, &map, &mut rng);
            assert!(plan.width >= map.base_w / 2);
            assert!(plan.height >= map.base_h / 2);
            assert!(plan.enemy_total() >= 1);
            let pickups: usize = plan.pickups.iter().map(|(_, n)| n).sum();
            assert!(pickups >= 1);
        }
    }
}
