use super::types::DutyMode;

/// Fixed duty used when the flat override is selected without an amount.
pub const DEFAULT_FIXED_DUTY: f64 = 55_000.0;

#[derive(Debug, Clone, Copy)]
struct DutyBand {
    upper: f64,
    base: f64,
    floor: f64,
    rate: f64,
}

// NSW transfer duty. Each band's base is the duty owed at its floor.
const NSW_BANDS: [DutyBand; 6] = [
    DutyBand {
        upper: 14_000.0,
        base: 0.0,
        floor: 0.0,
        rate: 0.0125,
    },
    DutyBand {
        upper: 30_000.0,
        base: 175.0,
        floor: 14_000.0,
        rate: 0.015,
    },
    DutyBand {
        upper: 80_000.0,
        base: 415.0,
        floor: 30_000.0,
        rate: 0.0175,
    },
    DutyBand {
        upper: 300_000.0,
        base: 1_290.0,
        floor: 80_000.0,
        rate: 0.035,
    },
    DutyBand {
        upper: 1_000_000.0,
        base: 8_990.0,
        floor: 300_000.0,
        rate: 0.045,
    },
    DutyBand {
        upper: f64::INFINITY,
        base: 40_490.0,
        floor: 1_000_000.0,
        rate: 0.055,
    },
];

/// Stamp duty on a purchase at `property_value` under the selected mode.
pub fn compute_duty(property_value: f64, mode: DutyMode) -> f64 {
    match mode {
        DutyMode::Fixed { amount } => amount,
        DutyMode::Tiered => tiered_duty(property_value),
    }
}

fn tiered_duty(value: f64) -> f64 {
    let band = NSW_BANDS
        .iter()
        .find(|band| value <= band.upper)
        .unwrap_or(&NSW_BANDS[NSW_BANDS.len() - 1]);
    band.base + (value - band.floor) * band.rate
}
