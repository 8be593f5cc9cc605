//! Knockback / Invulnerability coordinator
//!
//! Вместо корутин — явные task records с таймером, шаг раз в тик:
//! - `KnockbackTask`: эксклюзивное управление velocity на `duration`,
//!   пока активен, обе state machines заморожены (не сброшены)
//! - `IFrames`: окно неуязвимости + мигание спрайта, движение не трогает
//!
//! Повторный knockback во время активного ИГНОРИРУЕТСЯ (сериализация запросов).
//!
//! Тайминг knockback: последний шаг ещё двигает тело, флаг снимается в том же
//! шаге. Velocity = 0 и навигация возвращаются в Present (`release_control`),
//! так что следующий Decide уже видит свободного агента.

use bevy::prelude::*;

use crate::combat::archetype::{ArchetypeConfig, DeathPolicy, IFrameParams, KnockbackMode, KnockbackParams};
use crate::components::{NavigationAgent, PhysicsBody};

/// Допуск f32 таймеров: 12 × (1/60) не даёт ровно 0.2
const TIMER_EPSILON: f32 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct KnockbackTask {
    direction: Vec2,
    force: f32,
    mode: KnockbackMode,
    /// Сколько ещё толкаем (секунды)
    remaining: f32,
    impulse_applied: bool,
}

impl KnockbackTask {
    pub fn velocity(&self) -> Vec2 {
        self.direction * self.force
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct IFrames {
    remaining: f32,
    flash_interval: f32,
    flash_timer: f32,
    visible: bool,
}

impl IFrames {
    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    pub fn visible(&self) -> bool {
        self.visible
    }
}

/// Результат шага knockback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KnockbackStep {
    /// Нет активного knockback
    Inactive,
    Active,
    /// Последний шаг: флаг снят, тело ещё летит до конца тика
    Finished,
    /// Physics body пропал посреди knockback, задача снята
    Aborted,
}

/// Результат шага i-frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IFrameStep {
    Inactive,
    Active,
    /// Мигание: sprite показан/спрятан
    Flash { visible: bool },
    /// Окно закрылось, sprite снова видим
    Finished,
}

/// Параметры реакции на удар (из archetype config)
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct ReactionProfile {
    pub knockback: KnockbackParams,
    pub iframes: IFrameParams,
    pub death: DeathPolicy,
}

impl From<&ArchetypeConfig> for ReactionProfile {
    fn from(config: &ArchetypeConfig) -> Self {
        Self {
            knockback: config.knockback,
            iframes: config.iframes,
            death: config.death,
        }
    }
}

/// Per-agent состояние прерываний (flags knocked back / invulnerable)
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct HitReaction {
    knockback: Option<KnockbackTask>,
    iframes: Option<IFrames>,
    /// Knockback закончился, управление ещё не отдано навигации
    pending_release: bool,
}

impl HitReaction {
    pub fn is_knocked_back(&self) -> bool {
        self.knockback.is_some()
    }

    pub fn is_invulnerable(&self) -> bool {
        self.iframes.is_some()
    }

    pub fn knockback(&self) -> Option<&KnockbackTask> {
        self.knockback.as_ref()
    }

    pub fn iframes(&self) -> Option<&IFrames> {
        self.iframes.as_ref()
    }

    /// Смерть: все in-flight задачи снимаются без мутаций тела
    pub fn clear(&mut self) {
        self.knockback = None;
        self.iframes = None;
        self.pending_release = false;
    }

    /// applyKnockback: забираем движение у навигации
    ///
    /// Возвращает false если knockback уже идёт (запрос проигнорирован).
    pub fn request_knockback(
        &mut self,
        direction: Vec2,
        params: KnockbackParams,
        nav: &mut NavigationAgent,
    ) -> bool {
        if self.knockback.is_some() {
            return false;
        }

        nav.enabled = false;
        self.pending_release = false;
        self.knockback = Some(KnockbackTask {
            direction: direction.normalize_or_zero(),
            force: params.force,
            mode: params.mode,
            remaining: params.duration,
            impulse_applied: false,
        });
        true
    }

    /// applyIFrames: false если окно уже открыто
    pub fn request_iframes(&mut self, params: IFrameParams) -> bool {
        if self.iframes.is_some() {
            return false;
        }

        self.iframes = Some(IFrames {
            remaining: params.duration,
            flash_interval: params.flash_interval,
            flash_timer: params.flash_interval,
            visible: true,
        });
        true
    }

    /// Шаг knockback (каждый тик, даже когда машины заморожены)
    ///
    /// Body/nav передаются как Option: если их уже нет, задача снимается
    /// без мутаций (`Aborted`).
    pub fn step_knockback(
        &mut self,
        body: Option<&mut PhysicsBody>,
        nav: Option<&mut NavigationAgent>,
        dt: f32,
    ) -> KnockbackStep {
        let Some(task) = self.knockback.as_mut() else {
            return KnockbackStep::Inactive;
        };

        let (Some(body), Some(_nav)) = (body, nav) else {
            self.knockback = None;
            return KnockbackStep::Aborted;
        };

        match task.mode {
            KnockbackMode::Sustained => body.velocity = task.velocity(),
            KnockbackMode::Impulse => {
                if !task.impulse_applied {
                    body.velocity = task.velocity();
                    task.impulse_applied = true;
                }
            }
        }
        task.remaining -= dt;

        if task.remaining <= TIMER_EPSILON {
            self.knockback = None;
            self.pending_release = true;
            return KnockbackStep::Finished;
        }

        KnockbackStep::Active
    }

    /// Конец knockback: velocity = 0, навигация снова включена
    ///
    /// Вызывается после Motion того же тика, где knockback закончился.
    /// Возвращает true если управление реально вернули.
    pub fn release_control(&mut self, body: Option<&mut PhysicsBody>, nav: Option<&mut NavigationAgent>) -> bool {
        if !self.pending_release {
            return false;
        }
        self.pending_release = false;

        let (Some(body), Some(nav)) = (body, nav) else {
            return false;
        };
        body.velocity = Vec2::ZERO;
        nav.enabled = true;
        true
    }

    pub fn step_iframes(&mut self, dt: f32) -> IFrameStep {
        let Some(iframes) = self.iframes.as_mut() else {
            return IFrameStep::Inactive;
        };

        iframes.remaining -= dt;
        if iframes.remaining <= TIMER_EPSILON {
            self.iframes = None;
            return IFrameStep::Finished;
        }

        iframes.flash_timer -= dt;
        if iframes.flash_timer <= 0.0 {
            iframes.visible = !iframes.visible;
            iframes.flash_timer += iframes.flash_interval;
            return IFrameStep::Flash {
                visible: iframes.visible,
            };
        }

        IFrameStep::Active
    }
}
