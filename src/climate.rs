//! Temperature, moisture and insolation fields
//!
//! Raw values blend a latitude (or inland) term, an altitude term and a noise
//! term. Both fields are min-max normalized over all regions, shifted by their
//! configured modifier and clamped to [0, 1]. Temperature is finally rescaled
//! to the configured range; the normalized value is kept for zone lookup.

use std::f32::consts::{FRAC_PI_2, TAU};

use glam::Vec3;

use crate::terrain::{CoastDistance, PlanetNoise};

/// Latitude in radians of a unit position (+Z is north)
#[inline]
pub fn latitude(position: Vec3) -> f32 {
    position.z.clamp(-1.0, 1.0).asin()
}

/// Climate fields over all regions
#[derive(Debug, Clone, Default)]
pub struct ClimateFields {
    /// Temperature in configured degrees
    pub temperature: Vec<f32>,
    /// Normalized temperature in [0, 1]
    pub temperature_ratio: Vec<f32>,
    /// Moisture in [0, 1]
    pub moisture: Vec<f32>,
}

/// Inputs shared by the climate computations
pub struct ClimateInput<'a> {
    pub region_xyz: &'a [Vec3],
    pub elevation: &'a [f32],
    pub coast: &'a CoastDistance,
    pub noise: &'a PlanetNoise,
}

/// Configured climate adjustments
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClimateSettings {
    pub moisture_modifier: f32,
    pub temperature_modifier: f32,
    pub min_temperature: f32,
    pub max_temperature: f32,
}

/// Compute temperature and moisture for every region
pub fn assign_climate(input: &ClimateInput<'_>, settings: &ClimateSettings) -> ClimateFields {
    let mut raw_temperature = Vec::with_capacity(input.region_xyz.len());
    let mut raw_moisture = Vec::with_capacity(input.region_xyz.len());

    for (r, &position) in input.region_xyz.iter().enumerate() {
        let e = input.elevation[r];
        let ocean = e < 0.0;
        let lat_ratio = latitude(position).abs() / FRAC_PI_2;

        let altitude = if ocean { 1.0 + e } else { 1.0 - e };
        raw_temperature.push(
            0.75 * (1.0 - lat_ratio) + 0.20 * altitude + 0.05 * input.noise.temperature.sample_unit(position),
        );

        let inland = if ocean {
            0.0
        } else if input.coast.distance[r].is_none() {
            1.0
        } else {
            input.coast.inland_ratio(r)
        };
        let altitude_moisture = if ocean { 1.0 } else { 1.0 - e };
        raw_moisture.push(
            0.70 * (1.0 - inland) + 0.20 * altitude_moisture + 0.10 * input.noise.moisture.sample_unit(position),
        );
    }

    normalize(&mut raw_temperature);
    normalize(&mut raw_moisture);

    let temperature_ratio: Vec<f32> = raw_temperature
        .into_iter()
        .map(|t| (t + settings.temperature_modifier).clamp(0.0, 1.0))
        .collect();
    let moisture: Vec<f32> = raw_moisture
        .into_iter()
        .map(|m| (m + settings.moisture_modifier).clamp(0.0, 1.0))
        .collect();
    let span = settings.max_temperature - settings.min_temperature;
    let temperature = temperature_ratio
        .iter()
        .map(|&t| (settings.min_temperature + t * span).clamp(settings.min_temperature, settings.max_temperature))
        .collect();

    ClimateFields {
        temperature,
        temperature_ratio,
        moisture,
    }
}

/// Min-max normalize in place; a constant field becomes 0.5
pub fn normalize(values: &mut [f32]) {
    let (min, max) = values
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    let range = max - min;
    if !(range > f32::EPSILON) {
        values.iter_mut().for_each(|v| *v = 0.5);
        return;
    }
    values.iter_mut().for_each(|v| *v = ((*v - min) / range).clamp(0.0, 1.0));
}

/// Solar declination in radians at a point of the year
///
/// `year_ratio` 0 is the northern winter solstice.
#[inline]
pub fn declination(axial_tilt_degrees: f32, year_ratio: f32) -> f32 {
    -axial_tilt_degrees.to_radians() * (TAU * year_ratio).cos()
}

/// Insolation in [0, 1] for every region
pub fn assign_insolation(region_xyz: &[Vec3], axial_tilt_degrees: f32, year_ratio: f32) -> Vec<f32> {
    let mut insolation = vec![0.0; region_xyz.len()];
    update_insolation(&mut insolation, region_xyz, axial_tilt_degrees, year_ratio);
    insolation
}

/// Recompute insolation in place
pub fn update_insolation(insolation: &mut [f32], region_xyz: &[Vec3], axial_tilt_degrees: f32, year_ratio: f32) {
    let delta = declination(axial_tilt_degrees, year_ratio);
    for (value, &position) in insolation.iter_mut().zip(region_xyz) {
        *value = (latitude(position) - delta).cos().clamp(0.0, 1.0);
    }
}
