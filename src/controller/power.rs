use std::fmt;

/// Last known apparent power draw, converted from the device's raw wattage
/// to kilowatts and rounded to three decimals. Renders as `0 kW` until a
/// reading has been parsed successfully.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct PowerReading(Option<f64>);

impl PowerReading {
    pub fn from_watts(watts: f64) -> Self {
        if !watts.is_finite() {
            return PowerReading(None);
        }

        PowerReading(Some(watts.round() / 1000.))
    }

    pub fn kilowatts(self) -> Option<f64> {
        self.0
    }
}

impl fmt::Display for PowerReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(kw) => write!(f, "{kw:.3} kW"),
            None => write!(f, "0 kW"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversion_and_rounding() {
        assert_eq!(PowerReading::from_watts(1234.).to_string(), "1.234 kW");
        assert_eq!(PowerReading::from_watts(1234.567).to_string(), "1.235 kW");
        assert_eq!(PowerReading::from_watts(0.).to_string(), "0.000 kW");
    }

    #[test]
    fn test_default_display() {
        assert_eq!(PowerReading::default().to_string(), "0 kW");
    }

    #[test]
    fn test_non_finite_input() {
        assert_eq!(PowerReading::from_watts(f64::NAN), PowerReading::default());
    }
}
