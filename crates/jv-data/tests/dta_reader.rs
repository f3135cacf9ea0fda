//! Round-trip tests for the `.dta` reader against files built in memory.

use approx::assert_relative_eq;
use jv_data::dta::VarType;
use jv_data::dta::buffer::ByteOrder;
use jv_data::loader::{industries_from_table, totals_from_table};
use jv_data::{Column, DtaFile};

/// Minimal 117/118 writer covering the features the reader supports.
struct Writer {
    release: u16,
    big: bool,
    out: Vec<u8>,
}

impl Writer {
    fn new(release: u16, order: ByteOrder) -> Self {
        Self { release, big: order == ByteOrder::Msf, out: Vec::new() }
    }

    fn tag(&mut self, t: &str) {
        self.out.extend_from_slice(t.as_bytes());
    }

    fn u8(&mut self, v: u8) {
        self.out.push(v);
    }

    fn u16(&mut self, v: u16) {
        let b = if self.big { v.to_be_bytes() } else { v.to_le_bytes() };
        self.out.extend_from_slice(&b);
    }

    fn u32(&mut self, v: u32) {
        let b = if self.big { v.to_be_bytes() } else { v.to_le_bytes() };
        self.out.extend_from_slice(&b);
    }

    fn u64(&mut self, v: u64) {
        let b = if self.big { v.to_be_bytes() } else { v.to_le_bytes() };
        self.out.extend_from_slice(&b);
    }

    fn f64(&mut self, v: f64) {
        self.u64(v.to_bits());
    }

    fn fixed(&mut self, s: &str, width: usize) {
        let mut b = s.as_bytes().to_vec();
        assert!(b.len() < width);
        b.resize(width, 0);
        self.out.extend_from_slice(&b);
    }

    fn name_width(&self) -> usize {
        if self.release == 117 { 33 } else { 129 }
    }

    fn strl(&mut self, v: u32, o: u32) {
        if self.release == 117 {
            self.u32(v);
            self.u32(o);
        } else {
            self.u64(u64::from(v) | (u64::from(o) << 16));
        }
    }
}

struct Row {
    year: u16,
    week: u8,
    group: u32,
    count: f64,
    note: Option<(u32, u32)>,
    code: &'static str,
}

/// Variables: year (int), week (byte), group_name (long, labelled),
/// job_postings_count (double), note (strL), code (str6).
fn build(release: u16, order: ByteOrder, rows: &[Row]) -> Vec<u8> {
    let mut w = Writer::new(release, order);
    let order_tag = if w.big { "MSF" } else { "LSF" };
    let nw = w.name_width();

    w.tag("<stata_dta><header><release>");
    w.tag(&release.to_string());
    w.tag("</release><byteorder>");
    w.tag(order_tag);
    w.tag("</byteorder><K>");
    w.u16(6);
    w.tag("</K><N>");
    if release == 117 {
        w.u32(rows.len() as u32);
    } else {
        w.u64(rows.len() as u64);
    }
    w.tag("</N><label>");
    let label = "BGT weekly postings";
    if release == 117 {
        w.u8(label.len() as u8);
    } else {
        w.u16(label.len() as u16);
    }
    w.tag(label);
    w.tag("</label><timestamp>");
    w.u8(17);
    w.tag("19 Oct 2026 09:00");
    w.tag("</timestamp></header><map>");
    for _ in 0..14 {
        w.u64(0);
    }
    w.tag("</map><variable_types>");
    for code in [65529u16, 65530, 65528, 65526, 32768, 6] {
        w.u16(code);
    }
    w.tag("</variable_types><varnames>");
    for name in ["year", "week", "group_name", "job_postings_count", "note", "code"] {
        w.fixed(name, nw);
    }
    w.tag("</varnames><sortlist>");
    for _ in 0..7 {
        w.u16(0);
    }
    w.tag("</sortlist><formats>");
    let fw = if release == 117 { 49 } else { 57 };
    for f in ["%8.0g", "%8.0g", "%23.0g", "%10.0g", "%9s", "%9s"] {
        w.fixed(f, fw);
    }
    w.tag("</formats><value_label_names>");
    for l in ["", "", "grp", "", "", ""] {
        w.fixed(l, nw);
    }
    w.tag("</value_label_names><variable_labels>");
    let lw = if release == 117 { 81 } else { 321 };
    for l in ["", "", "Industry", "Postings", "", ""] {
        w.fixed(l, lw);
    }
    w.tag("</variable_labels><characteristics></characteristics><data>");
    for r in rows {
        w.u16(r.year);
        w.u8(r.week);
        w.u32(r.group);
        w.f64(r.count);
        let (v, o) = r.note.unwrap_or((0, 0));
        w.strl(v, o);
        w.fixed(r.code, 7);
        w.out.pop();
    }
    w.tag("</data><strls>");
    for (v, o, text) in [(5u32, 1u32, "first row"), (5, 2, "caf\u{e9} \u{2013} long text")] {
        w.tag("GSO");
        w.u32(v);
        if release == 117 {
            w.u32(o);
        } else {
            w.u64(u64::from(o));
        }
        w.u8(130);
        let mut bytes = text.as_bytes().to_vec();
        bytes.push(0);
        w.u32(bytes.len() as u32);
        w.out.extend_from_slice(&bytes);
    }
    w.tag("</strls><value_labels><lbl>");
    let labels = ["Education", "Mining & quarrying"];
    let mut txt = Vec::new();
    let mut offsets = Vec::new();
    for l in labels {
        offsets.push(txt.len() as u32);
        txt.extend_from_slice(l.as_bytes());
        txt.push(0);
    }
    let len = 8 + 8 * labels.len() + txt.len();
    w.u32(len as u32);
    w.fixed("grp", nw);
    w.out.extend_from_slice(&[0, 0, 0]);
    w.u32(labels.len() as u32);
    w.u32(txt.len() as u32);
    for off in offsets {
        w.u32(off);
    }
    for val in [1u32, 2] {
        w.u32(val);
    }
    w.out.extend_from_slice(&txt);
    w.tag("</lbl></value_labels></stata_dta>");
    w.out
}

fn sample_rows() -> Vec<Row> {
    vec![
        Row { year: 2019, week: 2, group: 1, count: 1520.0, note: Some((5, 1)), code: "P" },
        Row { year: 2020, week: 11, group: 2, count: 87.5, note: Some((5, 2)), code: "B" },
        // `.` for byte
        Row { year: 2020, week: 101, group: 2, count: 90.0, note: None, code: "B" },
    ]
}

fn check(release: u16, order: ByteOrder) {
    let bytes = build(release, order, &sample_rows());
    let file = DtaFile::from_bytes(&bytes).unwrap();
    assert_eq!(file.release, release);
    assert_eq!(file.byte_order, order);
    assert_eq!(file.n_obs, 3);
    assert_eq!(file.data_label, "BGT weekly postings");
    assert_eq!(file.variables.len(), 6);
    assert_eq!(file.variables[1].var_type, VarType::Byte);
    assert_eq!(file.variables[4].var_type, VarType::StrL);
    assert_eq!(file.variables[5].var_type, VarType::Str(6));
    assert_eq!(file.variables[2].value_label, "grp");
    assert_eq!(file.variables[3].label, "Postings");

    let table = file.table();
    assert_eq!(table.numeric("week").unwrap(), [Some(2.0), Some(11.0), None]);
    assert_relative_eq!(table.numeric("job_postings_count").unwrap()[1].unwrap(), 87.5);
    assert_eq!(
        table.text("group_name").unwrap(),
        vec![
            Some("Education".to_string()),
            Some("Mining & quarrying".to_string()),
            Some("Mining & quarrying".to_string()),
        ]
    );
    match table.column("note").unwrap() {
        Column::Text(v) => {
            assert_eq!(v[0], "first row");
            assert_eq!(v[1], "caf\u{e9} \u{2013} long text");
            assert_eq!(v[2], "");
        }
        other => panic!("note should be text, got {other:?}"),
    }
    assert_eq!(table.text("code").unwrap()[0].as_deref(), Some("P"));

    let industries = industries_from_table(table).unwrap();
    assert_eq!(industries.len(), 2, "row with missing week is dropped");
    assert_eq!(industries[1].group_name, "Mining & quarrying");
    assert_eq!(industries[1].year, 2020);

    let totals = totals_from_table(table).unwrap();
    assert_eq!(totals.len(), 2);
    assert_eq!(totals[0].week, 2);
}

#[test]
fn release_117_lsf() {
    check(117, ByteOrder::Lsf);
}

#[test]
fn release_117_msf() {
    check(117, ByteOrder::Msf);
}

#[test]
fn release_118_lsf() {
    check(118, ByteOrder::Lsf);
}

#[test]
fn release_118_msf() {
    check(118, ByteOrder::Msf);
}

#[test]
fn truncated_file_is_format_error() {
    let bytes = build(118, ByteOrder::Lsf, &sample_rows());
    let cut = &bytes[..bytes.len() / 2];
    let err = DtaFile::from_bytes(cut).unwrap_err();
    assert!(matches!(err, jv_core::Error::Format(_)), "{err}");
}

#[test]
fn unknown_strl_reference_is_reported() {
    let mut rows = sample_rows();
    rows[0].note = Some((9, 9));
    let bytes = build(118, ByteOrder::Lsf, &rows);
    let err = DtaFile::from_bytes(&bytes).unwrap_err().to_string();
    assert!(err.contains("strL"), "{err}");
}

#[test]
fn open_from_disk() {
    let path = std::env::temp_dir().join(format!("jv_data_dta_{}.dta", std::process::id()));
    std::fs::write(&path, build(117, ByteOrder::Lsf, &sample_rows())).unwrap();
    let table = jv_data::read_table(&path).unwrap();
    std::fs::remove_file(&path).ok();
    assert_eq!(table.n_rows(), 3);
}
