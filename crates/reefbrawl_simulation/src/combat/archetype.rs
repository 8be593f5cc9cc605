//! Archetypes — конфигурация типа врага + выбор inner combat machine
//!
//! Закрытый набор: Slime (dash), Crablin (dash), Cocogrunt (hybrid: ranged + strafe
//! + dash с взрывом на recover), ReefTitan (passive shell).
//!
//! Конфиг грузится пресетом (`ArchetypeConfig::preset`) или из RON
//! (`ArchetypeConfig::from_ron_str`); в обоих случаях проходит `validate`.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::ai::BehaviorConfig;
use crate::error::{ensure_positive, SimulationError, SimulationResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect, Serialize, Deserialize)]
pub enum ArchetypeId {
    Slime,
    Crablin,
    Cocogrunt,
    ReefTitan,
}

impl ArchetypeId {
    pub const ALL: [ArchetypeId; 4] = [
        ArchetypeId::Slime,
        ArchetypeId::Crablin,
        ArchetypeId::Cocogrunt,
        ArchetypeId::ReefTitan,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ArchetypeId::Slime => "slime",
            ArchetypeId::Crablin => "crablin",
            ArchetypeId::Cocogrunt => "cocogrunt",
            ArchetypeId::ReefTitan => "reef_titan",
        }
    }
}

/// Dash path: Idle → WindUp → Dashing → Recover → Idle
#[derive(Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
pub struct DashParams {
    pub wind_up_duration: f32,
    pub dash_duration: f32,
    pub dash_speed: f32,
    pub recover_duration: f32,
    /// AreaBurst при переходе Dashing → Recover (ровно один раз)
    #[serde(default)]
    pub recover_burst: bool,
}

impl Default for DashParams {
    fn default() -> Self {
        Self {
            wind_up_duration: 0.5,
            dash_duration: 0.3,
            dash_speed: 8.0,
            recover_duration: 0.5,
            recover_burst: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
pub struct RangedParams {
    /// Cooldown (сбрасывается на ВХОДЕ в RangedAttack)
    pub cooldown: f32,
    pub range: f32,
    /// Длительность атаки (движение заморожено)
    pub attack_duration: f32,
    /// Момент выпуска снаряда от начала атаки
    pub release_at: f32,
}

impl Default for RangedParams {
    fn default() -> Self {
        Self {
            cooldown: 3.0,
            range: 10.0,
            attack_duration: 1.0,
            release_at: 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
pub struct StrafeParams {
    pub duration: f32,
    pub speed: f32,
    /// Шанс выбрать strafe вместо dash (когда ranged недоступен)
    pub probability: f64,
}

impl Default for StrafeParams {
    fn default() -> Self {
        Self {
            duration: 1.0,
            speed: 4.0,
            probability: 0.5,
        }
    }
}

/// Вариант inner combat machine (tagged variant вместо наследования)
#[derive(Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
pub enum CombatStyle {
    Dash(DashParams),
    Hybrid {
        dash: DashParams,
        ranged: RangedParams,
        strafe: StrafeParams,
    },
    /// Нет атак: Idle ⇄ Shell по outer posture
    Shell,
}

/// Как knockback двигает тело
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect, Serialize, Deserialize)]
pub enum KnockbackMode {
    /// Velocity переписывается каждый шаг
    #[default]
    Sustained,
    /// Velocity выставляется один раз на первом шаге
    Impulse,
}

#[derive(Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
pub struct KnockbackParams {
    pub duration: f32,
    pub force: f32,
    #[serde(default)]
    pub mode: KnockbackMode,
}

impl Default for KnockbackParams {
    fn default() -> Self {
        Self {
            duration: 0.2,
            force: 5.0,
            mode: KnockbackMode::Sustained,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
pub struct IFrameParams {
    pub duration: f32,
    pub flash_interval: f32,
}

impl Default for IFrameParams {
    fn default() -> Self {
        Self {
            duration: 2.0,
            flash_interval: 0.3,
        }
    }
}

/// Что происходит после смерти
#[derive(Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
pub enum DeathPolicy {
    /// Despawn в том же тике
    Immediate,
    /// Death animation, потом despawn (опционально с AreaBurst)
    Animated { duration: f32, burst: bool },
}

#[derive(Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
pub struct ArchetypeConfig {
    pub id: ArchetypeId,
    pub max_health: i32,
    pub contact_damage: i32,
    pub behavior: BehaviorConfig,
    pub combat: CombatStyle,
    #[serde(default)]
    pub knockback: KnockbackParams,
    #[serde(default)]
    pub iframes: IFrameParams,
    pub death: DeathPolicy,
}

const DEATH_ANIMATION_SECS: f32 = 1.0;

impl ArchetypeConfig {
    /// Reference tuning
    pub fn preset(id: ArchetypeId) -> Self {
        let (combat, death) = match id {
            ArchetypeId::Slime => (CombatStyle::Dash(DashParams::default()), DeathPolicy::Immediate),
            ArchetypeId::Crablin => (
                CombatStyle::Dash(DashParams::default()),
                DeathPolicy::Animated {
                    duration: DEATH_ANIMATION_SECS,
                    burst: false,
                },
            ),
            ArchetypeId::Cocogrunt => (
                CombatStyle::Hybrid {
                    dash: DashParams {
                        recover_burst: true,
                        ..Default::default()
                    },
                    ranged: RangedParams::default(),
                    strafe: StrafeParams::default(),
                },
                DeathPolicy::Animated {
                    duration: DEATH_ANIMATION_SECS,
                    burst: true,
                },
            ),
            ArchetypeId::ReefTitan => (
                CombatStyle::Shell,
                DeathPolicy::Animated {
                    duration: DEATH_ANIMATION_SECS,
                    burst: false,
                },
            ),
        };

        Self {
            id,
            max_health: 100,
            contact_damage: 20,
            behavior: BehaviorConfig::default(),
            combat,
            knockback: KnockbackParams::default(),
            iframes: IFrameParams::default(),
            death,
        }
    }

    /// Парсит RON и сразу валидирует
    pub fn from_ron_str(source: &str) -> SimulationResult<Self> {
        let config: ArchetypeConfig = ron::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> SimulationResult<()> {
        let name = self.id.name();

        if self.max_health <= 0 {
            return Err(SimulationError::invalid(
                name,
                "max_health",
                format!("must be positive, got {}", self.max_health),
            ));
        }

        self.behavior.validate(name)?;

        match &self.combat {
            CombatStyle::Dash(dash) => validate_dash(name, dash)?,
            CombatStyle::Hybrid { dash, ranged, strafe } => {
                validate_dash(name, dash)?;
                ensure_positive(name, "ranged.cooldown", ranged.cooldown)?;
                ensure_positive(name, "ranged.range", ranged.range)?;
                ensure_positive(name, "ranged.attack_duration", ranged.attack_duration)?;
                ensure_positive(name, "strafe.duration", strafe.duration)?;
                ensure_positive(name, "strafe.speed", strafe.speed)?;

                if !(0.0..=ranged.attack_duration).contains(&ranged.release_at) {
                    return Err(SimulationError::invalid(
                        name,
                        "ranged.release_at",
                        format!(
                            "must lie within the attack (0..={}), got {}",
                            ranged.attack_duration, ranged.release_at
                        ),
                    ));
                }
                if !(0.0..=1.0).contains(&strafe.probability) {
                    return Err(SimulationError::invalid(
                        name,
                        "strafe.probability",
                        format!("must be within 0..=1, got {}", strafe.probability),
                    ));
                }
            }
            CombatStyle::Shell => {}
        }

        ensure_positive(name, "knockback.duration", self.knockback.duration)?;
        ensure_positive(name, "knockback.force", self.knockback.force)?;
        ensure_positive(name, "iframes.duration", self.iframes.duration)?;
        ensure_positive(name, "iframes.flash_interval", self.iframes.flash_interval)?;

        if let DeathPolicy::Animated { duration, .. } = self.death {
            ensure_positive(name, "death.duration", duration)?;
        }

        Ok(())
    }
}

fn validate_dash(name: &str, dash: &DashParams) -> SimulationResult<()> {
    ensure_positive(name, "dash.wind_up_duration", dash.wind_up_duration)?;
    ensure_positive(name, "dash.dash_duration", dash.dash_duration)?;
    ensure_positive(name, "dash.dash_speed", dash.dash_speed)?;
    ensure_positive(name, "dash.recover_duration", dash.recover_duration)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_valid() {
        for id in ArchetypeId::ALL {
            let config = ArchetypeConfig::preset(id);
            assert!(config.validate().is_ok(), "{} preset invalid", id.name());
            assert_eq!(config.max_health, 100);
            assert_eq!(config.contact_damage, 20);
        }
    }

    #[test]
    fn test_death_policies() {
        assert_eq!(ArchetypeConfig::preset(ArchetypeId::Slime).death, DeathPolicy::Immediate);
        assert!(matches!(
            ArchetypeConfig::preset(ArchetypeId::Cocogrunt).death,
            DeathPolicy::Animated { burst: true, .. }
        ));
        assert!(matches!(
            ArchetypeConfig::preset(ArchetypeId::ReefTitan).death,
            DeathPolicy::Animated { burst: false, .. }
        ));
    }

    #[test]
    fn test_zero_wind_up_rejected() {
        let mut config = ArchetypeConfig::preset(ArchetypeId::Crablin);
        if let CombatStyle::Dash(dash) = &mut config.combat {
            dash.wind_up_duration = 0.0;
        }

        match config.validate() {
            Err(SimulationError::InvalidConfiguration { archetype, field, .. }) => {
                assert_eq!(archetype, "crablin");
                assert_eq!(field, "dash.wind_up_duration");
            }
            other => panic!("expected InvalidConfiguration, got {other:?}"),
        }
    }

    #[test]
    fn test_release_point_outside_attack_rejected() {
        let mut config = ArchetypeConfig::preset(ArchetypeId::Cocogrunt);
        if let CombatStyle::Hybrid { ranged, .. } = &mut config.combat {
            ranged.release_at = 1.5;
        }
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_flash_interval_rejected() {
        let mut config = ArchetypeConfig::preset(ArchetypeId::Slime);
        config.iframes.flash_interval = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_ron_str() {
        let source = r#"(
            id: Crablin,
            max_health: 40,
            contact_damage: 15,
            behavior: (detection_range: 6.0, combat_range: 1.5),
            combat: Dash((
                wind_up_duration: 0.4,
                dash_duration: 0.25,
                dash_speed: 9.0,
                recover_duration: 0.6,
            )),
            death: Animated(duration: 0.8, burst: false),
        )"#;

        let config = ArchetypeConfig::from_ron_str(source).expect("valid config");
        assert_eq!(config.max_health, 40);
        assert_eq!(config.behavior.detection_range, 6.0);
        // Пропущенные поля берутся из reference tuning
        assert_eq!(config.behavior.chase_speed, 4.0);
        assert_eq!(config.knockback, KnockbackParams::default());
    }

    #[test]
    fn test_from_ron_str_validates() {
        let source = r#"(
            id: Slime,
            max_health: 10,
            contact_damage: 5,
            behavior: (detection_range: 1.0, combat_range: 2.0),
            combat: Shell,
            death: Immediate,
        )"#;

        assert!(matches!(
            ArchetypeConfig::from_ron_str(source),
            Err(SimulationError::InvalidConfiguration { field: "combat_range", .. })
        ));
    }

    #[test]
    fn test_from_ron_str_parse_error() {
        assert!(matches!(
            ArchetypeConfig::from_ron_str("(id: Kraken)"),
            Err(SimulationError::ConfigParse(_))
        ));
    }
}
