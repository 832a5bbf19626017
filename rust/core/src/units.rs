// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! SI unit vocabulary for `IfcSIUnit`
//!
//! Unit types and prefixes as defined in the IFC specification, with the SI
//! base name written for each unit type.

use std::fmt;

use crate::error::{Error, Result};

/// IfcUnitEnum values that have an SI unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum UnitType {
    AbsorbedDoseUnit,
    AmountOfSubstanceUnit,
    AreaUnit,
    DoseEquivalentUnit,
    ElectricCapacitanceUnit,
    ElectricChargeUnit,
    ElectricConductanceUnit,
    ElectricCurrentUnit,
    ElectricResistanceUnit,
    ElectricVoltageUnit,
    EnergyUnit,
    ForceUnit,
    FrequencyUnit,
    IlluminanceUnit,
    InductanceUnit,
    LengthUnit,
    LuminousFluxUnit,
    LuminousIntensityUnit,
    MagneticFluxDensityUnit,
    MagneticFluxUnit,
    MassUnit,
    PlaneAngleUnit,
    PowerUnit,
    PressureUnit,
    RadioactivityUnit,
    SolidAngleUnit,
    ThermodynamicTemperatureUnit,
    TimeUnit,
    VolumeUnit,
}

impl UnitType {
    /// Enumeration literal, e.g. `LENGTHUNIT`
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AbsorbedDoseUnit => "ABSORBEDDOSEUNIT",
            Self::AmountOfSubstanceUnit => "AMOUNTOFSUBSTANCEUNIT",
            Self::AreaUnit => "AREAUNIT",
            Self::DoseEquivalentUnit => "DOSEEQUIVALENTUNIT",
            Self::ElectricCapacitanceUnit => "ELECTRICCAPACITANCEUNIT",
            Self::ElectricChargeUnit => "ELECTRICCHARGEUNIT",
            Self::ElectricConductanceUnit => "ELECTRICCONDUCTANCEUNIT",
            Self::ElectricCurrentUnit => "ELECTRICCURRENTUNIT",
            Self::ElectricResistanceUnit => "ELECTRICRESISTANCEUNIT",
            Self::ElectricVoltageUnit => "ELECTRICVOLTAGEUNIT",
            Self::EnergyUnit => "ENERGYUNIT",
            Self::ForceUnit => "FORCEUNIT",
            Self::FrequencyUnit => "FREQUENCYUNIT",
            Self::IlluminanceUnit => "ILLUMINANCEUNIT",
            Self::InductanceUnit => "INDUCTANCEUNIT",
            Self::LengthUnit => "LENGTHUNIT",
            Self::LuminousFluxUnit => "LUMINOUSFLUXUNIT",
            Self::LuminousIntensityUnit => "LUMINOUSINTENSITYUNIT",
            Self::MagneticFluxDensityUnit => "MAGNETICFLUXDENSITYUNIT",
            Self::MagneticFluxUnit => "MAGNETICFLUXUNIT",
            Self::MassUnit => "MASSUNIT",
            Self::PlaneAngleUnit => "PLANEANGLEUNIT",
            Self::PowerUnit => "POWERUNIT",
            Self::PressureUnit => "PRESSUREUNIT",
            Self::RadioactivityUnit => "RADIOACTIVITYUNIT",
            Self::SolidAngleUnit => "SOLIDANGLEUNIT",
            Self::ThermodynamicTemperatureUnit => "THERMODYNAMICTEMPERATUREUNIT",
            Self::TimeUnit => "TIMEUNIT",
            Self::VolumeUnit => "VOLUMEUNIT",
        }
    }

    /// IfcSIUnitName written for this unit type
    pub fn si_name(&self) -> &'static str {
        match self {
            Self::AbsorbedDoseUnit => "GRAY",
            Self::AmountOfSubstanceUnit => "MOLE",
            Self::AreaUnit => "SQUARE_METRE",
            Self::DoseEquivalentUnit => "SIEVERT",
            Self::ElectricCapacitanceUnit => "FARAD",
            Self::ElectricChargeUnit => "COULOMB",
            Self::ElectricConductanceUnit => "SIEMENS",
            Self::ElectricCurrentUnit => "AMPERE",
            Self::ElectricResistanceUnit => "OHM",
            Self::ElectricVoltageUnit => "VOLT",
            Self::EnergyUnit => "JOULE",
            Self::ForceUnit => "NEWTON",
            Self::FrequencyUnit => "HERTZ",
            Self::IlluminanceUnit => "LUX",
            Self::InductanceUnit => "HENRY",
            Self::LengthUnit => "METRE",
            Self::LuminousFluxUnit => "LUMEN",
            Self::LuminousIntensityUnit => "CANDELA",
            Self::MagneticFluxDensityUnit => "TESLA",
            Self::MagneticFluxUnit => "WEBER",
            Self::MassUnit => "GRAM",
            Self::PlaneAngleUnit => "RADIAN",
            Self::PowerUnit => "WATT",
            Self::PressureUnit => "PASCAL",
            Self::RadioactivityUnit => "BECQUEREL",
            Self::SolidAngleUnit => "STERADIAN",
            Self::ThermodynamicTemperatureUnit => "KELVIN",
            Self::TimeUnit => "SECOND",
            Self::VolumeUnit => "CUBIC_METRE",
        }
    }
}

impl fmt::Display for UnitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// IfcSIPrefix values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum SiPrefix {
    Exa,
    Peta,
    Tera,
    Giga,
    Mega,
    Kilo,
    Hecto,
    Deca,
    Deci,
    Centi,
    Milli,
    Micro,
    Nano,
    Pico,
    Femto,
    Atto,
}

impl SiPrefix {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Exa => "EXA",
            Self::Peta => "PETA",
            Self::Tera => "TERA",
            Self::Giga => "GIGA",
            Self::Mega => "MEGA",
            Self::Kilo => "KILO",
            Self::Hecto => "HECTO",
            Self::Deca => "DECA",
            Self::Deci => "DECI",
            Self::Centi => "CENTI",
            Self::Milli => "MILLI",
            Self::Micro => "MICRO",
            Self::Nano => "NANO",
            Self::Pico => "PICO",
            Self::Femto => "FEMTO",
            Self::Atto => "ATTO",
        }
    }

    /// Parse an IfcSIPrefix literal (case-insensitive)
    pub fn parse(s: &str) -> Result<Self> {
        let prefix = match s.to_ascii_uppercase().as_str() {
            "EXA" => Self::Exa,
            "PETA" => Self::Peta,
            "TERA" => Self::Tera,
            "GIGA" => Self::Giga,
            "MEGA" => Self::Mega,
            "KILO" => Self::Kilo,
            "HECTO" => Self::Hecto,
            "DECA" => Self::Deca,
            "DECI" => Self::Deci,
            "CENTI" => Self::Centi,
            "MILLI" => Self::Milli,
            "MICRO" => Self::Micro,
            "NANO" => Self::Nano,
            "PICO" => Self::Pico,
            "FEMTO" => Self::Femto,
            "ATTO" => Self::Atto,
            _ => {
                return Err(Error::UnknownEnumValue {
                    kind: "SI prefix",
                    value: s.to_string(),
                })
            }
        };
        Ok(prefix)
    }

    /// Numeric multiplier of the prefix
    #[inline]
    pub fn multiplier(&self) -> f64 {
        match self {
            Self::Exa => 1e18,
            Self::Peta => 1e15,
            Self::Tera => 1e12,
            Self::Giga => 1e9,
            Self::Mega => 1e6,
            Self::Kilo => 1e3,    // Kilometers
            Self::Hecto => 1e2,   // Hectometers
            Self::Deca => 1e1,    // Dekameters
            Self::Deci => 1e-1,   // Decimeters
            Self::Centi => 1e-2,  // Centimeters
            Self::Milli => 1e-3,  // Most common: millimeters
            Self::Micro => 1e-6,
            Self::Nano => 1e-9,
            Self::Pico => 1e-12,
            Self::Femto => 1e-15,
            Self::Atto => 1e-18,
        }
    }
}

impl fmt::Display for SiPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One unit of the project's unit assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct SiUnit {
    pub unit_type: UnitType,
    #[cfg_attr(feature = "serde", serde(default))]
    pub prefix: Option<SiPrefix>,
}

impl SiUnit {
    pub const fn new(unit_type: UnitType) -> Self {
        Self {
            unit_type,
            prefix: None,
        }
    }

    pub const fn with_prefix(unit_type: UnitType, prefix: SiPrefix) -> Self {
        Self {
            unit_type,
            prefix: Some(prefix),
        }
    }

    /// Scale from this unit to the unprefixed SI unit
    ///
    /// Prefixes apply to the base length for area and volume units, so
    /// square millimetres scale by 1e-6.
    pub fn scale(&self) -> f64 {
        let m = self.prefix.map_or(1.0, |p| p.multiplier());
        match self.unit_type {
            UnitType::AreaUnit => m * m,
            UnitType::VolumeUnit => m * m * m,
            _ => m,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_prefix_parse() {
        assert_eq!(SiPrefix::parse("MILLI").unwrap(), SiPrefix::Milli);
        assert_eq!(SiPrefix::parse("centi").unwrap(), SiPrefix::Centi);
        assert!(SiPrefix::parse("YOTTA").is_err());
    }

    #[test]
    fn test_unit_scale() {
        assert_eq!(SiUnit::new(UnitType::LengthUnit).scale(), 1.0);
        assert_relative_eq!(SiUnit::with_prefix(UnitType::LengthUnit, SiPrefix::Milli).scale(), 1e-3);
        assert_relative_eq!(SiUnit::with_prefix(UnitType::AreaUnit, SiPrefix::Milli).scale(), 1e-6);
        assert_relative_eq!(SiUnit::with_prefix(UnitType::VolumeUnit, SiPrefix::Centi).scale(), 1e-6);
    }

    #[test]
    fn test_si_names() {
        assert_eq!(UnitType::LengthUnit.si_name(), "METRE");
        assert_eq!(UnitType::PlaneAngleUnit.si_name(), "RADIAN");
        assert_eq!(UnitType::VolumeUnit.as_str(), "VOLUMEUNIT");
    }
}
