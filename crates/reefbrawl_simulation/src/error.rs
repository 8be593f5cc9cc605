//! Ошибки construction path (archetype configs)
//!
//! Perception/targeting ошибки сюда НЕ попадают: отсутствующая цель = `None`,
//! мёртвый physics handle = `KnockbackStep::Aborted`. Остановить создание агента
//! может только невалидный конфиг.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimulationError {
    /// Таймер/скорость/радиус ≤ 0 или нарушен порядок радиусов
    #[error("invalid configuration for archetype `{archetype}`: {field} {reason}")]
    InvalidConfiguration {
        archetype: String,
        field: &'static str,
        reason: String,
    },

    /// RON не распарсился
    #[error("failed to parse archetype config: {0}")]
    ConfigParse(#[from] ron::error::SpannedError),
}

impl SimulationError {
    pub fn invalid(archetype: &str, field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            archetype: archetype.to_string(),
            field,
            reason: reason.into(),
        }
    }
}

pub type SimulationResult<T> = Result<T, SimulationError>;

/// Таймеры/скорости/радиусы обязаны быть > 0
pub(crate) fn ensure_positive(archetype: &str, field: &'static str, value: f32) -> SimulationResult<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(SimulationError::invalid(archetype, field, format!("must be positive, got {value}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_positive_rejects_zero_and_negative() {
        assert!(ensure_positive("slime", "speed", 1.0).is_ok());
        assert!(ensure_positive("slime", "speed", 0.0).is_err());
        assert!(ensure_positive("slime", "speed", -2.0).is_err());
        assert!(ensure_positive("slime", "speed", f32::NAN).is_err());
    }

    #[test]
    fn test_invalid_configuration_message() {
        let err = SimulationError::invalid("crablin", "dash_speed", "must be positive, got 0");
        assert_eq!(
            err.to_string(),
            "invalid configuration for archetype `crablin`: dash_speed must be positive, got 0"
        );
    }
}
