/// Errors produced when validating a camera configuration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("dead zone must be non-negative and finite, got ({x}, {z})")]
    InvalidDeadZone { x: f32, z: f32 },

    #[error("{name} must be non-negative and finite, got {value}")]
    InvalidSpeed { name: &'static str, value: f32 },

    #[error("{name} must be finite")]
    NonFiniteOffset { name: &'static str },
}
