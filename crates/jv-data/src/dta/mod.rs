//! Native reader for Stata `.dta` files (releases 117, 118 and 119).
//!
//! The 117+ layout is a sequence of XML-like tagged sections wrapping binary
//! payloads:
//!
//! ```text
//! <stata_dta><header>…</header><map>…</map><variable_types>…</variable_types>
//! <varnames>…</varnames><sortlist>…</sortlist><formats>…</formats>
//! <value_label_names>…</value_label_names><variable_labels>…</variable_labels>
//! <characteristics>…</characteristics><data>…</data><strls>…</strls>
//! <value_labels>…</value_labels></stata_dta>
//! ```
//!
//! Sections are read in order; the `<map>` offsets are parsed but not needed.
//! Stata missing values (`.`, `.a` … `.z`) decode as `None`. Value labels are
//! attached to the numeric columns that reference them, so a labelled
//! categorical column reads back as text through [`Table::text`].

pub mod buffer;

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use jv_core::{Error, Result};

use crate::table::{Column, Table};
use buffer::{ByteOrder, DtaBuffer, decode_cstr};

const MAX_BYTE: i8 = 100;
const MAX_INT: i16 = 32_740;
const MAX_LONG: i32 = 2_147_483_620;
/// `.` for float: 2^127; everything at or above is a missing code.
const FLOAT_MISSING: f32 = f32::from_bits(0x7f00_0000);
/// `.` for double: 2^1023.
const DOUBLE_MISSING: f64 = f64::from_bits(0x7fe0_0000_0000_0000);

/// Storage type of a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarType {
    /// Fixed-width string, `str1` … `str2045`.
    Str(u16),
    /// Long string stored in the `<strls>` section.
    StrL,
    /// 8-byte float.
    Double,
    /// 4-byte float.
    Float,
    /// 4-byte integer.
    Long,
    /// 2-byte integer.
    Int,
    /// 1-byte integer.
    Byte,
}

impl VarType {
    /// Decode a 117+ type code.
    pub fn from_code(code: u16) -> Result<Self> {
        Ok(match code {
            1..=2045 => VarType::Str(code),
            32768 => VarType::StrL,
            65526 => VarType::Double,
            65527 => VarType::Float,
            65528 => VarType::Long,
            65529 => VarType::Int,
            65530 => VarType::Byte,
            other => return Err(Error::Format(format!("unknown variable type code {other}"))),
        })
    }

    /// Width of one cell in the `<data>` section.
    pub fn width(self) -> usize {
        match self {
            VarType::Str(n) => n as usize,
            VarType::StrL | VarType::Double => 8,
            VarType::Float | VarType::Long => 4,
            VarType::Int => 2,
            VarType::Byte => 1,
        }
    }

    fn is_numeric(self) -> bool {
        !matches!(self, VarType::Str(_) | VarType::StrL)
    }
}

/// Variable metadata from the descriptor sections.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    /// Variable name.
    pub name: String,
    /// Storage type.
    pub var_type: VarType,
    /// Display format, e.g. `%9.0g`.
    pub format: String,
    /// Name of the value-label set attached to the variable (may be empty).
    pub value_label: String,
    /// Variable label.
    pub label: String,
}

/// Release-dependent field widths.
#[derive(Debug, Clone, Copy)]
struct Layout {
    release: u16,
}

impl Layout {
    fn new(release: u16) -> Result<Self> {
        if !(117..=119).contains(&release) {
            return Err(Error::Format(format!(
                "unsupported .dta release {release} (supported: 117, 118, 119)"
            )));
        }
        Ok(Self { release })
    }

    fn name_width(self) -> usize {
        if self.release == 117 { 33 } else { 129 }
    }

    fn format_width(self) -> usize {
        if self.release == 117 { 49 } else { 57 }
    }

    fn variable_label_width(self) -> usize {
        if self.release == 117 { 81 } else { 321 }
    }

    fn sortlist_entry_width(self) -> usize {
        if self.release == 119 { 4 } else { 2 }
    }

    /// Split an 8-byte strL data cell into `(v, o)`.
    fn strl_key(self, r: &mut DtaBuffer<'_>) -> Result<(u64, u64)> {
        match self.release {
            117 => {
                let v = r.read_u32()? as u64;
                let o = r.read_u32()? as u64;
                Ok((v, o))
            }
            118 => {
                let z = r.read_u64()?;
                Ok((z & 0xffff, z >> 16))
            }
            _ => {
                let z = r.read_u64()?;
                Ok((z & 0xff_ffff, z >> 24))
            }
        }
    }
}

/// A parsed `.dta` file.
#[derive(Debug, Clone)]
pub struct DtaFile {
    /// Format release (117, 118 or 119).
    pub release: u16,
    /// Byte order of the binary payloads.
    pub byte_order: ByteOrder,
    /// Number of observations.
    pub n_obs: usize,
    /// Dataset label.
    pub data_label: String,
    /// Variable descriptors in file order.
    pub variables: Vec<Variable>,
    table: Table,
}

enum RawColumn {
    Numeric(Vec<Option<f64>>),
    Text(Vec<String>),
    StrL(Vec<(u64, u64)>),
}

impl DtaFile {
    /// Read and parse a file from disk.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        log::debug!("read {} bytes from {}", bytes.len(), path.display());
        Self::from_bytes(&bytes)
    }

    /// Parse an in-memory `.dta` image.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut r = DtaBuffer::new(bytes, ByteOrder::Lsf);
        if !r.peek_tag("<stata_dta>") {
            return Err(Error::Format(
                "not a Stata 117+ file (missing <stata_dta>); \
                 re-save with `saveold, version(13)` or newer"
                    .into(),
            ));
        }
        r.expect_tag("<stata_dta>")?;
        r.expect_tag("<header>")?;

        r.expect_tag("<release>")?;
        let release_txt = r.read_until_close("release")?;
        let release: u16 = std::str::from_utf8(release_txt)
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .ok_or_else(|| Error::Format("unreadable <release> tag".into()))?;
        let layout = Layout::new(release)?;

        r.expect_tag("<byteorder>")?;
        let order_txt = r.read_until_close("byteorder")?;
        let byte_order = ByteOrder::parse(&String::from_utf8_lossy(order_txt))?;
        r.set_order(byte_order);

        r.expect_tag("<K>")?;
        let k = if release == 119 { r.read_u32()? as usize } else { r.read_u16()? as usize };
        r.expect_tag("</K>")?;

        r.expect_tag("<N>")?;
        let n_obs = if release == 117 { r.read_u32()? as u64 } else { r.read_u64()? };
        let n_obs = usize::try_from(n_obs)
            .map_err(|_| Error::Format(format!("observation count {n_obs} too large")))?;
        r.expect_tag("</N>")?;

        r.expect_tag("<label>")?;
        let label_len = if release == 117 { r.read_u8()? as usize } else { r.read_u16()? as usize };
        let data_label = decode_cstr(r.read_bytes(label_len)?);
        r.expect_tag("</label>")?;

        r.expect_tag("<timestamp>")?;
        let ts_len = r.read_u8()? as usize;
        r.skip(ts_len)?;
        r.expect_tag("</timestamp>")?;
        r.expect_tag("</header>")?;

        r.expect_tag("<map>")?;
        r.skip(14 * 8)?;
        r.expect_tag("</map>")?;

        r.expect_tag("<variable_types>")?;
        let mut types = Vec::with_capacity(k);
        for _ in 0..k {
            types.push(VarType::from_code(r.read_u16()?)?);
        }
        r.expect_tag("</variable_types>")?;

        r.expect_tag("<varnames>")?;
        let names = read_fixed_strs(&mut r, k, layout.name_width())?;
        r.expect_tag("</varnames>")?;

        r.expect_tag("<sortlist>")?;
        r.skip((k + 1) * layout.sortlist_entry_width())?;
        r.expect_tag("</sortlist>")?;

        r.expect_tag("<formats>")?;
        let formats = read_fixed_strs(&mut r, k, layout.format_width())?;
        r.expect_tag("</formats>")?;

        r.expect_tag("<value_label_names>")?;
        let label_names = read_fixed_strs(&mut r, k, layout.name_width())?;
        r.expect_tag("</value_label_names>")?;

        r.expect_tag("<variable_labels>")?;
        let var_labels = read_fixed_strs(&mut r, k, layout.variable_label_width())?;
        r.expect_tag("</variable_labels>")?;

        r.expect_tag("<characteristics>")?;
        r.read_until_close("characteristics")?;

        let variables: Vec<Variable> = (0..k)
            .map(|j| Variable {
                name: names[j].clone(),
                var_type: types[j],
                format: formats[j].clone(),
                value_label: label_names[j].clone(),
                label: var_labels[j].clone(),
            })
            .collect();

        let raw = read_data(&mut r, layout, &variables, n_obs)?;
        let strls = read_strls(&mut r, layout)?;
        let value_labels = read_value_labels(&mut r, layout)?;
        r.expect_tag("</stata_dta>")?;

        let mut table = Table::new();
        for (var, col) in variables.iter().zip(raw) {
            let column = match col {
                RawColumn::Numeric(v) => Column::Numeric(v),
                RawColumn::Text(v) => Column::Text(v),
                RawColumn::StrL(keys) => Column::Text(
                    keys.into_iter()
                        .map(|key| {
                            if key == (0, 0) {
                                return Ok(String::new());
                            }
                            strls.get(&key).cloned().ok_or_else(|| {
                                Error::Format(format!(
                                    "strL ({}, {}) of '{}' not found in <strls>",
                                    key.0, key.1, var.name
                                ))
                            })
                        })
                        .collect::<Result<Vec<_>>>()?,
                ),
            };
            table.push_column(var.name.clone(), column)?;
            if var.var_type.is_numeric() && !var.value_label.is_empty() {
                match value_labels.get(&var.value_label) {
                    Some(labels) => table.set_value_labels(&var.name, labels.clone()),
                    None => log::warn!(
                        "variable '{}' references missing value-label set '{}'",
                        var.name,
                        var.value_label
                    ),
                }
            }
        }

        log::debug!("parsed .dta release {release}: {k} variables, {n_obs} observations");
        Ok(Self { release, byte_order, n_obs, data_label, variables, table })
    }

    /// Column data.
    pub fn table(&self) -> &Table {
        &self.table
    }

    /// Consume the file, keeping only the column data.
    pub fn into_table(self) -> Table {
        self.table
    }
}

fn read_fixed_strs(r: &mut DtaBuffer<'_>, k: usize, width: usize) -> Result<Vec<String>> {
    (0..k).map(|_| r.read_fixed_str(width)).collect()
}

fn read_data(
    r: &mut DtaBuffer<'_>,
    layout: Layout,
    variables: &[Variable],
    n_obs: usize,
) -> Result<Vec<RawColumn>> {
    r.expect_tag("<data>")?;
    let mut cols: Vec<RawColumn> = variables
        .iter()
        .map(|v| match v.var_type {
            VarType::Str(_) => RawColumn::Text(Vec::with_capacity(n_obs)),
            VarType::StrL => RawColumn::StrL(Vec::with_capacity(n_obs)),
            _ => RawColumn::Numeric(Vec::with_capacity(n_obs)),
        })
        .collect();

    for _ in 0..n_obs {
        for (var, col) in variables.iter().zip(cols.iter_mut()) {
            match (var.var_type, col) {
                (VarType::Str(w), RawColumn::Text(out)) => {
                    out.push(r.read_fixed_str(w as usize)?);
                }
                (VarType::StrL, RawColumn::StrL(out)) => {
                    out.push(layout.strl_key(r)?);
                }
                (t, RawColumn::Numeric(out)) => {
                    out.push(read_numeric(r, t)?);
                }
                _ => unreachable!("column storage follows variable type"),
            }
        }
    }
    r.expect_tag("</data>")?;
    Ok(cols)
}

fn read_numeric(r: &mut DtaBuffer<'_>, t: VarType) -> Result<Option<f64>> {
    Ok(match t {
        VarType::Byte => {
            let v = r.read_i8()?;
            (v <= MAX_BYTE).then_some(v as f64)
        }
        VarType::Int => {
            let v = r.read_i16()?;
            (v <= MAX_INT).then_some(v as f64)
        }
        VarType::Long => {
            let v = r.read_i32()?;
            (v <= MAX_LONG).then_some(v as f64)
        }
        VarType::Float => {
            let v = r.read_f32()?;
            (v.is_finite() && v < FLOAT_MISSING).then_some(v as f64)
        }
        VarType::Double => {
            let v = r.read_f64()?;
            (v.is_finite() && v < DOUBLE_MISSING).then_some(v)
        }
        VarType::Str(_) | VarType::StrL => {
            return Err(Error::Format("string type in numeric column".into()));
        }
    })
}

fn read_strls(r: &mut DtaBuffer<'_>, layout: Layout) -> Result<HashMap<(u64, u64), String>> {
    r.expect_tag("<strls>")?;
    let mut out = HashMap::new();
    while r.peek_tag("GSO") {
        r.skip(3)?;
        let v = r.read_u32()? as u64;
        let o = if layout.release == 117 { r.read_u32()? as u64 } else { r.read_u64()? };
        let kind = r.read_u8()?;
        let len = r.read_u32()? as usize;
        let bytes = r.read_bytes(len)?;
        let text = match kind {
            // ASCII strLs carry a trailing NUL.
            130 => decode_cstr(bytes),
            129 => String::from_utf8_lossy(bytes).into_owned(),
            other => return Err(Error::Format(format!("unknown GSO type {other}"))),
        };
        out.insert((v, o), text);
    }
    r.expect_tag("</strls>")?;
    Ok(out)
}

fn read_value_labels(
    r: &mut DtaBuffer<'_>,
    layout: Layout,
) -> Result<HashMap<String, BTreeMap<i64, String>>> {
    r.expect_tag("<value_labels>")?;
    let mut sets = HashMap::new();
    while r.peek_tag("<lbl>") {
        r.expect_tag("<lbl>")?;
        let len = r.read_i32()?;
        let len = usize::try_from(len)
            .map_err(|_| Error::Format(format!("negative value-label length {len}")))?;
        let name = r.read_fixed_str(layout.name_width())?;
        r.skip(3)?;
        let start = r.pos();

        let n = r.read_i32()?.max(0) as usize;
        let txt_len = r.read_i32()?.max(0) as usize;
        let mut offsets = Vec::with_capacity(n);
        for _ in 0..n {
            offsets.push(r.read_i32()?.max(0) as usize);
        }
        let mut values = Vec::with_capacity(n);
        for _ in 0..n {
            values.push(r.read_i32()? as i64);
        }
        let txt = r.read_bytes(txt_len)?;
        let mut labels = BTreeMap::new();
        for (&off, &val) in offsets.iter().zip(&values) {
            let text = txt
                .get(off..)
                .map(decode_cstr)
                .ok_or_else(|| {
                    Error::Format(format!("label offset {off} out of range in '{name}'"))
                })?;
            labels.insert(val, text);
        }
        if r.pos() != start + len {
            r.set_pos(start + len)?;
        }
        r.expect_tag("</lbl>")?;
        sets.insert(name, labels);
    }
    r.expect_tag("</value_labels>")?;
    Ok(sets)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_codes() {
        assert_eq!(VarType::from_code(65530).unwrap(), VarType::Byte);
        assert_eq!(VarType::from_code(32768).unwrap(), VarType::StrL);
        assert_eq!(VarType::from_code(12).unwrap(), VarType::Str(12));
        assert_eq!(VarType::Str(12).width(), 12);
        assert!(VarType::from_code(40000).is_err());
    }

    #[test]
    fn missing_codes() {
        let bytes = [101u8, 100u8];
        let mut r = DtaBuffer::new(&bytes, ByteOrder::Lsf);
        assert_eq!(read_numeric(&mut r, VarType::Byte).unwrap(), None);
        assert_eq!(read_numeric(&mut r, VarType::Byte).unwrap(), Some(100.0));

        let mut bytes = Vec::new();
        bytes.extend_from_slice(&DOUBLE_MISSING.to_le_bytes());
        bytes.extend_from_slice(&12.5f64.to_le_bytes());
        bytes.extend_from_slice(&FLOAT_MISSING.to_le_bytes());
        bytes.extend_from_slice(&32_741i16.to_le_bytes());
        bytes.extend_from_slice(&2_147_483_621i32.to_le_bytes());
        let mut r = DtaBuffer::new(&bytes, ByteOrder::Lsf);
        assert_eq!(read_numeric(&mut r, VarType::Double).unwrap(), None);
        assert_eq!(read_numeric(&mut r, VarType::Double).unwrap(), Some(12.5));
        assert_eq!(read_numeric(&mut r, VarType::Float).unwrap(), None);
        assert_eq!(read_numeric(&mut r, VarType::Int).unwrap(), None);
        assert_eq!(read_numeric(&mut r, VarType::Long).unwrap(), None);
    }

    #[test]
    fn rejects_legacy_and_unknown_releases() {
        assert!(matches!(DtaFile::from_bytes(&[114, 2, 1, 0]), Err(Error::Format(_))));
        let bytes = b"<stata_dta><header><release>116</release>";
        let err = DtaFile::from_bytes(bytes).unwrap_err().to_string();
        assert!(err.contains("116"), "{err}");
    }
}
