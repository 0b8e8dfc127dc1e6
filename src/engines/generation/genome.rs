//! Genome representation for a four-legged walker
//!
//! A genome is a fixed-shape record of real-valued genes. Four scalar genes
//! describe the body, and three per-leg vectors drive the leg motors as
//! sinusoids (`amplitude * sin(frequency * t + phase)`):
//!
//! | gene                   | generated in  | legal range     |
//! |------------------------|---------------|-----------------|
//! | `body_width`           | [0.3, 0.7]    | [0.1, 2.0]      |
//! | `body_height`          | [0.2, 0.5]    | [0.1, 1.0]      |
//! | `leg_segment_length`   | [0.2, 0.5]    | [0.1, 1.0]      |
//! | `leg_segment_thickness`| [0.05, 0.15]  | [0.01, 0.3]     |
//! | `motor_amplitudes[i]`  | [-1, 1]       | [-2, 2]         |
//! | `motor_frequencies[i]` | [0.5, 5.5]    | [0.1, 10]       |
//! | `motor_phases[i]`      | [0, 2π)       | [0, 2π), cyclic |
//!
//! Every generation range sits inside the matching legal range; only
//! mutation pushes genes past the generation range.
//!
//! # Serialization
//!
//! Genomes serialize with camelCase field names (`bodyWidth`,
//! `motorAmplitudes`, ...). Deserialization goes through [`GenomeRecord`], so
//! a document with a motor vector of the wrong length or with out-of-range
//! values is rejected instead of silently truncated or padded.

use crate::error::{Result, WalkerError};
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// Number of legs, and therefore of motor genes per vector.
pub const LEG_COUNT: usize = 4;

/// Inclusive bounds for a real-valued gene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeneRange {
    pub min: f64,
    pub max: f64,
}

impl GeneRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }
}

/// Generation and legal range for one gene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeneBounds {
    pub generate: GeneRange,
    pub legal: GeneRange,
}

pub const BODY_WIDTH: GeneBounds = GeneBounds {
    generate: GeneRange::new(0.3, 0.7),
    legal: GeneRange::new(0.1, 2.0),
};

pub const BODY_HEIGHT: GeneBounds = GeneBounds {
    generate: GeneRange::new(0.2, 0.5),
    legal: GeneRange::new(0.1, 1.0),
};

pub const LEG_SEGMENT_LENGTH: GeneBounds = GeneBounds {
    generate: GeneRange::new(0.2, 0.5),
    legal: GeneRange::new(0.1, 1.0),
};

pub const LEG_SEGMENT_THICKNESS: GeneBounds = GeneBounds {
    generate: GeneRange::new(0.05, 0.15),
    legal: GeneRange::new(0.01, 0.3),
};

pub const MOTOR_AMPLITUDE: GeneBounds = GeneBounds {
    generate: GeneRange::new(-1.0, 1.0),
    legal: GeneRange::new(-2.0, 2.0),
};

pub const MOTOR_FREQUENCY: GeneBounds = GeneBounds {
    generate: GeneRange::new(0.5, 5.5),
    legal: GeneRange::new(0.1, 10.0),
};

/// Phases never clamp; the upper bound is exclusive and values wrap.
pub const MOTOR_PHASE: GeneBounds = GeneBounds {
    generate: GeneRange::new(0.0, TAU),
    legal: GeneRange::new(0.0, TAU),
};

/// Wrap a phase into `[0, 2π)`.
pub fn wrap_phase(phase: f64) -> f64 {
    let wrapped = phase.rem_euclid(TAU);
    // rem_euclid can round up to TAU for tiny negative inputs
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "GenomeRecord")]
pub struct Genome {
    pub body_width: f64,
    pub body_height: f64,
    pub leg_segment_length: f64,
    pub leg_segment_thickness: f64,
    pub motor_amplitudes: [f64; LEG_COUNT],
    pub motor_frequencies: [f64; LEG_COUNT],
    pub motor_phases: [f64; LEG_COUNT],
}

impl Genome {
    /// Check every gene against its legal range.
    pub fn validate(&self) -> Result<()> {
        let scalars = [
            ("bodyWidth", self.body_width, BODY_WIDTH),
            ("bodyHeight", self.body_height, BODY_HEIGHT),
            ("legSegmentLength", self.leg_segment_length, LEG_SEGMENT_LENGTH),
            ("legSegmentThickness", self.leg_segment_thickness, LEG_SEGMENT_THICKNESS),
        ];
        for (name, value, bounds) in scalars {
            check_gene(name, value, &bounds.legal)?;
        }

        for i in 0..LEG_COUNT {
            check_gene("motorAmplitudes", self.motor_amplitudes[i], &MOTOR_AMPLITUDE.legal)?;
            check_gene("motorFrequencies", self.motor_frequencies[i], &MOTOR_FREQUENCY.legal)?;

            let phase = self.motor_phases[i];
            if !phase.is_finite() || !(0.0..TAU).contains(&phase) {
                return Err(WalkerError::InvalidGenome(format!(
                    "motorPhases[{}] = {} is outside [0, 2π)",
                    i, phase
                )));
            }
        }

        Ok(())
    }
}

fn check_gene(name: &str, value: f64, range: &GeneRange) -> Result<()> {
    if !value.is_finite() || !range.contains(value) {
        return Err(WalkerError::InvalidGenome(format!(
            "{} = {} is outside [{}, {}]",
            name, value, range.min, range.max
        )));
    }
    Ok(())
}

/// Loosely-shaped genome as it appears in external documents.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenomeRecord {
    pub body_width: f64,
    pub body_height: f64,
    pub leg_segment_length: f64,
    pub leg_segment_thickness: f64,
    pub motor_amplitudes: Vec<f64>,
    pub motor_frequencies: Vec<f64>,
    pub motor_phases: Vec<f64>,
}

impl TryFrom<GenomeRecord> for Genome {
    type Error = WalkerError;

    fn try_from(record: GenomeRecord) -> Result<Self> {
        let genome = Genome {
            body_width: record.body_width,
            body_height: record.body_height,
            leg_segment_length: record.leg_segment_length,
            leg_segment_thickness: record.leg_segment_thickness,
            motor_amplitudes: leg_vector("motorAmplitudes", record.motor_amplitudes)?,
            motor_frequencies: leg_vector("motorFrequencies", record.motor_frequencies)?,
            motor_phases: leg_vector("motorPhases", record.motor_phases)?,
        };
        genome.validate()?;
        Ok(genome)
    }
}

fn leg_vector(name: &str, values: Vec<f64>) -> Result<[f64; LEG_COUNT]> {
    let len = values.len();
    values.try_into().map_err(|_| {
        WalkerError::InvalidGenome(format!(
            "{} must have exactly {} elements, got {}",
            name, LEG_COUNT, len
        ))
    })
}
