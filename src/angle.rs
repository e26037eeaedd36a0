//! Heading angles in degrees, kept normalized to (-180, 180].

use std::fmt;
use std::ops::{Add, Sub};

use glam::Vec2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(from = "f32", into = "f32")]
pub struct Angle(f32);

impl Angle {
    pub const ZERO: Angle = Angle(0.0);

    pub fn from_degrees(degrees: f32) -> Self {
        Self(normalize(degrees))
    }

    /// Direction of `vector` measured from the positive x axis.
    pub fn from_vector(vector: Vec2) -> Self {
        Self::from_degrees(vector.y.atan2(vector.x).to_degrees())
    }

    pub fn degrees(self) -> f32 {
        self.0
    }

    pub fn to_radians(self) -> f32 {
        self.0.to_radians()
    }

    /// Unit vector pointing along this angle.
    pub fn to_vector(self) -> Vec2 {
        Vec2::from_angle(self.to_radians()).normalize_or_zero()
    }

    /// This angle turned by `degrees`, normalized.
    pub fn rotated(self, degrees: f32) -> Self {
        Self::from_degrees(self.0 + degrees)
    }
}

fn normalize(degrees: f32) -> f32 {
    let value = degrees % 360.0;
    if value > 180.0 {
        value - 360.0
    } else if value <= -180.0 {
        value + 360.0
    } else {
        value
    }
}

impl Add for Angle {
    type Output = Angle;

    fn add(self, rhs: Angle) -> Angle {
        Angle::from_degrees(self.0 + rhs.0)
    }
}

impl Sub for Angle {
    type Output = Angle;

    fn sub(self, rhs: Angle) -> Angle {
        Angle::from_degrees(self.0 - rhs.0)
    }
}

impl From<f32> for Angle {
    fn from(degrees: f32) -> Self {
        Angle::from_degrees(degrees)
    }
}

impl From<Angle> for f32 {
    fn from(angle: Angle) -> Self {
        angle.0
    }
}

impl fmt::Display for Angle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}d", self.0)
    }
}
