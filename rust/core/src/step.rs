// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ISO-10303-21 serialization
//!
//! Writes a [`StepModel`] as a STEP physical file: header section followed
//! by one `#id=TYPE(...);` line per entity in the data section.

use std::fmt::Write as _;
use std::io;

use chrono::{DateTime, Utc};

use crate::error::{Error, Result};
use crate::model::{AttributeValue, Entity, StepModel};

/// FILE_DESCRIPTION / FILE_NAME / FILE_SCHEMA content
#[derive(Debug, Clone)]
pub struct StepHeader {
    pub description: Vec<String>,
    pub implementation_level: String,
    pub file_name: String,
    pub timestamp: DateTime<Utc>,
    pub author: String,
    pub organization: String,
    pub preprocessor_version: String,
    pub originating_system: String,
    pub authorization: String,
    pub schema: String,
}

impl StepHeader {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            description: vec!["ViewDefinition [DesignTransferView]".to_string()],
            implementation_level: "2;1".to_string(),
            file_name: file_name.into(),
            timestamp: Utc::now(),
            author: String::new(),
            organization: String::new(),
            preprocessor_version: concat!("ifc-writer ", env!("CARGO_PKG_VERSION")).to_string(),
            originating_system: concat!("ifc-writer ", env!("CARGO_PKG_VERSION")).to_string(),
            authorization: String::new(),
            schema: "IFC4".to_string(),
        }
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    fn write(&self, out: &mut String) {
        out.push_str("HEADER;\n");
        out.push_str("FILE_DESCRIPTION((");
        for (i, d) in self.description.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            write_string(out, d);
        }
        out.push_str("),");
        write_string(out, &self.implementation_level);
        out.push_str(");\n");

        out.push_str("FILE_NAME(");
        write_string(out, &self.file_name);
        out.push(',');
        write_string(out, &self.timestamp.format("%Y-%m-%dT%H:%M:%S").to_string());
        out.push_str(",(");
        write_string(out, &self.author);
        out.push_str("),(");
        write_string(out, &self.organization);
        out.push_str("),");
        write_string(out, &self.preprocessor_version);
        out.push(',');
        write_string(out, &self.originating_system);
        out.push(',');
        write_string(out, &self.authorization);
        out.push_str(");\n");

        out.push_str("FILE_SCHEMA((");
        write_string(out, &self.schema);
        out.push_str("));\n");
        out.push_str("ENDSEC;\n");
    }
}

/// Format a real so it always carries a decimal point: `0.`, `-1.5`, `1.E-07`
///
/// Uses the shortest representation that round-trips.
pub fn format_real(value: f64) -> Option<String> {
    if !value.is_finite() {
        return None;
    }
    let s = format!("{:?}", value);
    let formatted = match s.split_once('e') {
        Some((mantissa, exponent)) => {
            let mantissa = if mantissa.contains('.') {
                mantissa.trim_end_matches('0').to_string()
            } else {
                format!("{}.", mantissa)
            };
            format!("{}E{}", mantissa, exponent)
        }
        None => match s.strip_suffix(".0") {
            Some(integral) => format!("{}.", integral),
            None => s,
        },
    };
    Some(formatted)
}

/// Append a quoted, escaped STEP string
///
/// `'` doubles, `\` doubles, and characters outside printable ASCII are
/// written as `\X2\` UTF-16 hex runs closed by `\X0\`.
pub fn write_string(out: &mut String, s: &str) {
    out.push('\'');
    let mut in_x2 = false;
    for c in s.chars() {
        let printable = (' '..='~').contains(&c);
        if printable && in_x2 {
            out.push_str("\\X0\\");
            in_x2 = false;
        }
        match c {
            '\'' => out.push_str("''"),
            '\\' => out.push_str("\\\\"),
            c if printable => out.push(c),
            c => {
                if !in_x2 {
                    out.push_str("\\X2\\");
                    in_x2 = true;
                }
                let mut buf = [0u16; 2];
                for unit in c.encode_utf16(&mut buf) {
                    let _ = write!(out, "{:04X}", unit);
                }
            }
        }
    }
    if in_x2 {
        out.push_str("\\X0\\");
    }
    out.push('\'');
}

fn write_value(out: &mut String, entity: &Entity, value: &AttributeValue) -> Result<()> {
    match value {
        AttributeValue::Ref(id) => {
            let _ = write!(out, "{}", id);
        }
        AttributeValue::String(s) => write_string(out, s),
        AttributeValue::Integer(i) => {
            let _ = write!(out, "{}", i);
        }
        AttributeValue::Real(f) => {
            let s = format_real(*f).ok_or(Error::NonFiniteReal {
                id: entity.id.0,
                value: *f,
            })?;
            out.push_str(&s);
        }
        AttributeValue::Enum(e) => {
            out.push('.');
            out.push_str(e);
            out.push('.');
        }
        AttributeValue::Bool(b) => out.push_str(if *b { ".T." } else { ".F." }),
        AttributeValue::List(items) => {
            out.push('(');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_value(out, entity, item)?;
            }
            out.push(')');
        }
        AttributeValue::Typed(name, inner) => {
            out.push_str(name);
            out.push('(');
            write_value(out, entity, inner)?;
            out.push(')');
        }
        AttributeValue::Null => out.push('$'),
        AttributeValue::Derived => out.push('*'),
    }
    Ok(())
}

/// Append one `#id=TYPE(...);` line
pub fn write_entity(out: &mut String, entity: &Entity) -> Result<()> {
    let _ = write!(out, "{}={}(", entity.id, entity.ifc_type.as_str());
    for (i, attr) in entity.attributes.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        write_value(out, entity, attr)?;
    }
    out.push_str(");\n");
    Ok(())
}

/// Serialize header and model to STEP text
pub fn to_step_string(header: &StepHeader, model: &StepModel) -> Result<String> {
    // Typical entity lines are well under 128 bytes
    let mut out = String::with_capacity(512 + model.len() * 96);
    out.push_str("ISO-10303-21;\n");
    header.write(&mut out);
    out.push_str("DATA;\n");
    for entity in model.iter() {
        write_entity(&mut out, entity)?;
    }
    out.push_str("ENDSEC;\n");
    out.push_str("END-ISO-10303-21;\n");
    Ok(out)
}

/// Serialize into any writer
pub fn write_step<W: io::Write>(writer: &mut W, header: &StepHeader, model: &StepModel) -> Result<()> {
    let text = to_step_string(header, model)?;
    writer.write_all(text.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EntityId;
    use crate::schema::IfcType;
    use chrono::TimeZone;

    #[test]
    fn test_format_real() {
        assert_eq!(format_real(0.0).unwrap(), "0.");
        assert_eq!(format_real(-0.0).unwrap(), "-0.");
        assert_eq!(format_real(1.0).unwrap(), "1.");
        assert_eq!(format_real(-1.5).unwrap(), "-1.5");
        assert_eq!(format_real(0.1).unwrap(), "0.1");
        assert_eq!(format_real(1e-7).unwrap(), "1.E-7");
        assert_eq!(format_real(1.5e20).unwrap(), "1.5E20");
        assert!(format_real(f64::NAN).is_none());
        assert!(format_real(f64::INFINITY).is_none());
    }

    #[test]
    fn test_formatted_reals_parse_back() {
        for v in [0.0, 3.25, -12345.678, 1e-7, 6.02e23, std::f64::consts::FRAC_PI_2] {
            let s = format_real(v).unwrap();
            assert!(s.contains('.'), "{} has no decimal point", s);
            assert_eq!(s.replace('E', "e").parse::<f64>().unwrap(), v);
        }
    }

    #[test]
    fn test_write_string_escapes() {
        let mut out = String::new();
        write_string(&mut out, "O'Brien");
        assert_eq!(out, "'O''Brien'");

        out.clear();
        write_string(&mut out, "a\\b");
        assert_eq!(out, "'a\\\\b'");

        out.clear();
        write_string(&mut out, "Wand Ä");
        assert_eq!(out, "'Wand \\X2\\00C4\\X0\\'");

        out.clear();
        write_string(&mut out, "벽체A");
        assert_eq!(out, "'\\X2\\BCBDCCB4\\X0\\A'");
    }

    #[test]
    fn test_write_entity() {
        let mut model = StepModel::new();
        let p = model.add(IfcType::IfcCartesianPoint, vec![AttributeValue::reals(&[0.0, 1.5, -2.0])]);
        model.add(
            IfcType::IfcAxis2Placement3D,
            vec![p.into(), AttributeValue::Null, AttributeValue::Null],
        );
        model.add(
            IfcType::IfcTrimmedCurve,
            vec![
                EntityId(1).into(),
                AttributeValue::List(vec![AttributeValue::typed("IFCPARAMETERVALUE", 0.0)]),
                AttributeValue::List(vec![AttributeValue::typed("IFCPARAMETERVALUE", 1.5)]),
                true.into(),
                AttributeValue::Enum("PARAMETER"),
            ],
        );

        let lines: Vec<String> = model
            .iter()
            .map(|e| {
                let mut s = String::new();
                write_entity(&mut s, e).unwrap();
                s
            })
            .collect();
        assert_eq!(lines[0], "#1=IFCCARTESIANPOINT((0.,1.5,-2.));\n");
        assert_eq!(lines[1], "#2=IFCAXIS2PLACEMENT3D(#1,$,$);\n");
        assert_eq!(
            lines[2],
            "#3=IFCTRIMMEDCURVE(#1,(IFCPARAMETERVALUE(0.)),(IFCPARAMETERVALUE(1.5)),.T.,.PARAMETER.);\n"
        );
    }

    #[test]
    fn test_non_finite_real_is_error() {
        let mut model = StepModel::new();
        model.add(IfcType::IfcCartesianPoint, vec![AttributeValue::reals(&[f64::NAN, 0.0])]);
        let header = StepHeader::new("bad.ifc");
        assert!(matches!(
            to_step_string(&header, &model),
            Err(Error::NonFiniteReal { id: 1, .. })
        ));
    }

    #[test]
    fn test_file_layout() {
        let mut model = StepModel::new();
        model.add(IfcType::IfcDirection, vec![AttributeValue::reals(&[0.0, 0.0, 1.0])]);
        let mut header = StepHeader::new("model.ifc")
            .with_timestamp(Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap());
        header.author = "Jo".to_string();

        let text = to_step_string(&header, &model).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "ISO-10303-21;");
        assert_eq!(lines[1], "HEADER;");
        assert_eq!(
            lines[2],
            "FILE_DESCRIPTION(('ViewDefinition [DesignTransferView]'),'2;1');"
        );
        assert!(lines[3].starts_with("FILE_NAME('model.ifc','2024-05-01T08:30:00',('Jo'),(''),"));
        assert_eq!(lines[4], "FILE_SCHEMA(('IFC4'));");
        assert_eq!(lines[5], "ENDSEC;");
        assert_eq!(lines[6], "DATA;");
        assert_eq!(lines[7], "#1=IFCDIRECTION((0.,0.,1.));");
        assert_eq!(lines[8], "ENDSEC;");
        assert_eq!(lines[9], "END-ISO-10303-21;");
    }
}
