//! ADC readings fed one per line, e.g. piped from a serial console.

use std::io::BufRead;

use anyhow::{ensure, Context, Result};

/// Full scale of the 12-bit converter
const ADC_FULL_SCALE: f32 = 4096.0;
const ADC_MAX_COUNT: u16 = 4095;

/// Integer lines are raw 12-bit ADC counts, anything else must be a real sample value
pub(crate) fn parse_reading(line: &str) -> Result<f32> {
    let line = line.trim();
    match line.parse::<u16>() {
        Ok(count) => {
            ensure!(
                count <= ADC_MAX_COUNT,
                "ADC count {count} is out of the 12-bit range"
            );
            Ok(count as f32 / ADC_FULL_SCALE)
        }
        Err(_) => line
            .parse::<f32>()
            .with_context(|| format!("invalid ADC reading {line:?}")),
    }
}

/// Read every non-empty line of `reader` as a sample
pub(crate) fn read_readings<R: BufRead>(reader: R) -> Result<Vec<f32>> {
    let mut samples = Vec::new();
    for (number, line) in reader.lines().enumerate() {
        let line = line.context("failed to read ADC input")?;
        if line.trim().is_empty() {
            continue;
        }
        let sample = parse_reading(&line).with_context(|| format!("line {}", number + 1))?;
        samples.push(sample);
    }
    Ok(samples)
}
