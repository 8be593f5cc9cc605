//! Tests for inner combat machines (dash / hybrid / shell).

#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::ai::perception::TargetSense;
    use crate::ai::BehaviorKind;
    use crate::combat::archetype::{DashParams, RangedParams, StrafeParams};
    use crate::combat::events::Cue;
    use crate::components::{NavigationAgent, PhysicsBody};
    use bevy::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    /// 1/16 s, таймеры 0.5 s истекают ровно на 8-м тике
    const DT: f32 = 0.0625;

    struct Rig {
        machine: CombatMachine,
        nav: NavigationAgent,
        body: PhysicsBody,
        rng: ChaCha8Rng,
        effects: Vec<CombatEffect>,
    }

    impl Rig {
        fn new(style: CombatStyle) -> Self {
            Self {
                machine: CombatMachine::new(style),
                nav: NavigationAgent::default(),
                body: PhysicsBody::default(),
                rng: ChaCha8Rng::seed_from_u64(3),
                effects: Vec::new(),
            }
        }

        fn tick(&mut self, target: Option<Vec2>) -> CombatStep {
            let ctx = CombatContext {
                position: Vec2::ZERO,
                sense: TargetSense {
                    target_position: target,
                    line_of_sight: target.is_some(),
                },
                detection_range: 5.0,
                dt: DT,
            };
            self.machine
                .update(&ctx, &mut self.nav, &mut self.body, &mut self.rng, &mut self.effects)
        }

        fn cues(&self) -> Vec<Cue> {
            self.effects
                .iter()
                .filter_map(|effect| match effect {
                    CombatEffect::Cue(cue) => Some(*cue),
                    _ => None,
                })
                .collect()
        }
    }

    fn dash_style() -> CombatStyle {
        CombatStyle::Dash(DashParams::default())
    }

    fn hybrid_style(strafe_probability: f64) -> CombatStyle {
        CombatStyle::Hybrid {
            dash: DashParams {
                recover_burst: true,
                ..Default::default()
            },
            ranged: RangedParams::default(),
            strafe: StrafeParams {
                probability: strafe_probability,
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_idle_chooses_wind_up_and_freezes() {
        let mut rig = Rig::new(dash_style());
        rig.body.velocity = Vec2::new(3.0, 0.0);

        assert_eq!(rig.tick(Some(Vec2::new(1.0, 0.0))), CombatStep::Continue);
        assert_eq!(rig.machine.phase(), CombatPhase::WindUp);
        assert_eq!(rig.body.velocity, Vec2::ZERO);
        assert!(!rig.nav.enabled);
        assert_eq!(rig.cues(), vec![Cue::WindUp]);
    }

    #[test]
    fn test_wind_up_expires_exactly_on_duration() {
        let mut rig = Rig::new(dash_style());
        let target = Some(Vec2::new(0.0, 2.0));
        rig.tick(target);

        // 7 × 1/16 = 0.4375 s, ещё WindUp
        for _ in 0..7 {
            rig.tick(target);
        }
        assert_eq!(rig.machine.phase(), CombatPhase::WindUp);

        // 0.5 s, Dashing
        rig.tick(target);
        assert_eq!(rig.machine.phase(), CombatPhase::Dashing);
        assert_eq!(rig.machine.dash_direction(), Vec2::Y);
        assert_eq!(rig.body.velocity, Vec2::Y * 8.0);
    }

    #[test]
    fn test_dash_direction_frozen_while_target_moves() {
        let mut rig = Rig::new(dash_style());
        rig.tick(Some(Vec2::new(2.0, 0.0)));
        for _ in 0..8 {
            rig.tick(Some(Vec2::new(2.0, 0.0)));
        }
        assert_eq!(rig.machine.phase(), CombatPhase::Dashing);
        let direction = rig.machine.dash_direction();
        assert_eq!(direction, Vec2::X);

        // Цель уходит вверх, dash не доворачивает
        rig.tick(Some(Vec2::new(0.0, 3.0)));
        assert_eq!(rig.machine.phase(), CombatPhase::Dashing);
        assert_eq!(rig.machine.dash_direction(), direction);
        assert_eq!(rig.body.velocity, Vec2::X * 8.0);
    }

    #[test]
    fn test_full_dash_cycle_returns_to_idle() {
        let mut rig = Rig::new(dash_style());
        let target = Some(Vec2::new(2.0, 0.0));

        let mut seen = Vec::new();
        for _ in 0..40 {
            rig.tick(target);
            if seen.last() != Some(&rig.machine.phase()) {
                seen.push(rig.machine.phase());
            }
        }

        assert_eq!(
            &seen[..5],
            &[
                CombatPhase::WindUp,
                CombatPhase::Dashing,
                CombatPhase::Recover,
                CombatPhase::Idle,
                CombatPhase::WindUp,
            ]
        );
        // Dash без recover burst
        assert!(!rig
            .effects
            .iter()
            .any(|effect| matches!(effect, CombatEffect::Burst { .. })));
    }

    #[test]
    fn test_lost_target_disengages_and_releases_movement() {
        let mut rig = Rig::new(dash_style());
        rig.tick(Some(Vec2::new(1.0, 0.0)));
        assert!(!rig.nav.enabled);

        assert_eq!(rig.tick(None), CombatStep::Disengage);
        assert_eq!(rig.machine.phase(), CombatPhase::Idle);
        assert_eq!(rig.body.velocity, Vec2::ZERO);
        assert!(rig.nav.enabled);
    }

    #[test]
    fn test_target_beyond_detection_disengages() {
        let mut rig = Rig::new(dash_style());
        rig.tick(Some(Vec2::new(1.0, 0.0)));
        assert_eq!(rig.tick(Some(Vec2::new(6.0, 0.0))), CombatStep::Disengage);
    }

    #[test]
    fn test_hybrid_prefers_ranged_when_cooldown_ready() {
        let mut rig = Rig::new(hybrid_style(1.0));
        rig.tick(Some(Vec2::new(3.0, 0.0)));

        assert_eq!(rig.machine.phase(), CombatPhase::RangedAttack);
        assert_eq!(rig.machine.ranged_cooldown(), 3.0);
        assert_eq!(rig.cues(), vec![Cue::Attack]);
        assert!(!rig.nav.enabled);
    }

    #[test]
    fn test_projectile_released_once_at_release_point() {
        let mut rig = Rig::new(hybrid_style(0.0));
        rig.tick(Some(Vec2::new(3.0, 0.0)));

        let mut releases = Vec::new();
        // Цель смещается: направление берём на момент выпуска
        for i in 0..16 {
            let target = if i < 4 { Vec2::new(3.0, 0.0) } else { Vec2::new(0.0, -3.0) };
            rig.effects.clear();
            rig.tick(Some(target));
            for effect in &rig.effects {
                if let CombatEffect::Projectile { direction, .. } = effect {
                    releases.push((i, *direction));
                }
            }
        }

        // elapsed = 8 × 1/16 = 0.5 s на тике i = 7
        assert_eq!(releases, vec![(7, Vec2::NEG_Y)]);
    }

    #[test]
    fn test_ranged_cooldown_blocks_second_ranged_attack() {
        let mut rig = Rig::new(hybrid_style(0.0));
        let target = Some(Vec2::new(3.0, 0.0));

        let mut ranged_entries = 0;
        let mut previous = rig.machine.phase();
        // 2.5 s в бою: cooldown 3 s ещё не истёк
        for _ in 0..40 {
            rig.tick(target);
            let phase = rig.machine.phase();
            if phase == CombatPhase::RangedAttack && previous != CombatPhase::RangedAttack {
                ranged_entries += 1;
            }
            previous = phase;
        }

        assert_eq!(ranged_entries, 1);
        assert!(rig.machine.ranged_cooldown() > 0.0);

        // До 5 s: cooldown истёк на 3 s, первый же Idle после dash цикла
        // снова выбирает ranged
        for _ in 0..40 {
            rig.tick(target);
            let phase = rig.machine.phase();
            if phase == CombatPhase::RangedAttack && previous != CombatPhase::RangedAttack {
                ranged_entries += 1;
            }
            previous = phase;
        }

        assert_eq!(ranged_entries, 2);
        // Второй вход заново взвёл cooldown
        assert!(rig.machine.ranged_cooldown() > 1.0);
    }

    #[test]
    fn test_strafe_is_perpendicular_and_committal() {
        let mut rig = Rig::new(hybrid_style(1.0));
        // Первой всегда идёт ranged атака (cooldown готов)
        let target = Some(Vec2::new(3.0, 0.0));
        rig.tick(target);
        while rig.machine.phase() == CombatPhase::RangedAttack {
            rig.tick(target);
        }
        rig.tick(target);

        assert_eq!(rig.machine.phase(), CombatPhase::Strafing);
        assert_eq!(rig.body.velocity, Vec2::X.perp() * 4.0);

        // Цель сместилась, strafe не пересчитывается
        rig.tick(Some(Vec2::new(0.0, 3.0)));
        assert_eq!(rig.body.velocity, Vec2::Y * 4.0);
    }

    #[test]
    fn test_hybrid_recover_burst_fires_once() {
        let mut rig = Rig::new(hybrid_style(0.0));
        let target = Some(Vec2::new(3.0, 0.0));
        rig.tick(target);
        while rig.machine.phase() == CombatPhase::RangedAttack {
            rig.tick(target);
        }

        rig.effects.clear();
        // WindUp 8 + Dashing 5 + Recover 8 тиков
        for _ in 0..30 {
            rig.tick(target);
            if rig.machine.phase() == CombatPhase::Idle {
                break;
            }
        }

        let bursts = rig
            .effects
            .iter()
            .filter(|effect| matches!(effect, CombatEffect::Burst { .. }))
            .count();
        assert_eq!(bursts, 1);
    }

    #[test]
    fn test_reset_keeps_ranged_cooldown() {
        let mut rig = Rig::new(hybrid_style(0.0));
        rig.tick(Some(Vec2::new(3.0, 0.0)));
        rig.machine.reset();

        assert_eq!(rig.machine.phase(), CombatPhase::Idle);
        assert_eq!(rig.machine.ranged_cooldown(), 3.0);
    }

    #[test]
    fn test_shell_follows_outer_posture() {
        let mut rig = Rig::new(CombatStyle::Shell);

        rig.machine.observe_posture(BehaviorKind::Patrolling, &mut rig.effects);
        assert_eq!(rig.machine.phase(), CombatPhase::Shell);

        rig.machine.observe_posture(BehaviorKind::Patrolling, &mut rig.effects);
        rig.machine.observe_posture(BehaviorKind::Chasing, &mut rig.effects);
        assert_eq!(rig.machine.phase(), CombatPhase::Idle);
        assert_eq!(rig.cues(), vec![Cue::ShellClosed, Cue::ShellOpened]);

        // Combat тик shell машины, no-op
        assert_eq!(rig.tick(Some(Vec2::new(0.5, 0.0))), CombatStep::Continue);
        assert_eq!(rig.body.velocity, Vec2::ZERO);
        assert!(rig.nav.enabled);
    }

    #[test]
    fn test_shell_disengages_when_target_reference_lost() {
        let mut rig = Rig::new(CombatStyle::Shell);
        rig.machine.observe_posture(BehaviorKind::Combat, &mut rig.effects);
        rig.nav.enabled = false;
        rig.body.velocity = Vec2::X;

        assert_eq!(rig.tick(None), CombatStep::Disengage);
        assert_eq!(rig.machine.phase(), CombatPhase::Idle);
        assert_eq!(rig.body.velocity, Vec2::ZERO);
        assert!(rig.nav.enabled);
    }

    #[test]
    fn test_posture_hook_ignored_by_attack_styles() {
        let mut rig = Rig::new(dash_style());
        rig.machine.observe_posture(BehaviorKind::Patrolling, &mut rig.effects);
        assert_eq!(rig.machine.phase(), CombatPhase::Idle);
        assert!(rig.effects.is_empty());
    }
}
