//! Display-color allocation for new classes, groups, modules and exams.
//!
//! A new record gets a color that none of its siblings use yet, if one is
//! left. Once every palette color is taken, any palette color may be reused,
//! picked uniformly. Nothing is remembered between calls: the used colors are
//! whatever the sibling rows hold at the time of the call.

use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;

use crate::error::ServiceError;

pub const DEFAULT_PALETTE: [&str; 7] = [
    "primary",
    "secondary",
    "info",
    "success",
    "warning",
    "error",
    "accent",
];

/// A validated, non-empty palette. Built once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<String>,
}

impl Palette {
    pub fn new(colors: Vec<String>) -> Result<Self, ServiceError> {
        if colors.is_empty() {
            return Err(ServiceError::Configuration("palette is empty".into()));
        }
        let mut seen = HashSet::new();
        for c in &colors {
            if c.trim().is_empty() {
                return Err(ServiceError::Configuration(
                    "palette contains a blank color".into(),
                ));
            }
            if !seen.insert(c.as_str()) {
                return Err(ServiceError::Configuration(format!(
                    "palette lists {} more than once",
                    c
                )));
            }
        }
        Ok(Self { colors })
    }

    pub fn colors(&self) -> &[String] {
        &self.colors
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn contains(&self, color: &str) -> bool {
        self.colors.iter().any(|c| c == color)
    }

    pub fn assign(&self, used: &[String]) -> Result<String, ServiceError> {
        assign_color(&self.colors, used)
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: DEFAULT_PALETTE.iter().map(|s| s.to_string()).collect(),
        }
    }
}

pub fn assign_color(palette: &[String], used: &[String]) -> Result<String, ServiceError> {
    assign_color_with(palette, used, &mut rand::thread_rng())
}

pub fn assign_color_with<R: Rng + ?Sized>(
    palette: &[String],
    used: &[String],
    rng: &mut R,
) -> Result<String, ServiceError> {
    if palette.is_empty() {
        return Err(ServiceError::Configuration("palette is empty".into()));
    }

    let used: HashSet<&str> = used.iter().map(String::as_str).collect();
    let mut distinct: Vec<&String> = Vec::with_capacity(palette.len());
    let mut seen = HashSet::new();
    for c in palette {
        if seen.insert(c.as_str()) {
            distinct.push(c);
        }
    }

    let available: Vec<&String> = distinct
        .iter()
        .copied()
        .filter(|c| !used.contains(c.as_str()))
        .collect();

    let pool = if available.is_empty() {
        &distinct
    } else {
        &available
    };

    pool.choose(rng)
        .map(|c| (*c).clone())
        .ok_or_else(|| ServiceError::Configuration("palette is empty".into()))
}
