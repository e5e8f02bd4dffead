#![allow(dead_code)]

use cogtask_analyzer::types::SourceFile;

const PREAMBLE: &str = "Task Export\nSession,1\nNotes\n";

fn header(width: usize) -> String {
    (0..width).map(|i| format!("col{i}")).collect::<Vec<_>>().join(",")
}

/// A visual-search CSV: preamble, header, then one row per
/// (presence, search type, set size, rt, correct).
pub fn visual_search_csv(rows: &[(&str, &str, &str, &str, &str)]) -> Vec<u8> {
    let mut out = String::from(PREAMBLE);
    out.push_str(&header(20));
    out.push('\n');
    for (presence, search, set_size, rt, correct) in rows {
        let mut fields = vec![String::new(); 20];
        fields[0] = "trial".to_string();
        fields[3] = presence.to_string();
        fields[4] = search.to_string();
        fields[5] = set_size.to_string();
        fields[18] = rt.to_string();
        fields[19] = correct.to_string();
        out.push_str(&fields.join(","));
        out.push('\n');
    }
    out.into_bytes()
}

/// A Stroop CSV: preamble, header, then one row per (stim condition, S, T, U).
pub fn stroop_csv(rows: &[(&str, &str, &str, &str)]) -> Vec<u8> {
    let mut out = String::from(PREAMBLE);
    out.push_str(&header(21));
    out.push('\n');
    for (stim, s, t, u) in rows {
        let mut fields = vec![String::new(); 21];
        fields[0] = "trial".to_string();
        fields[2] = stim.to_string();
        fields[18] = s.to_string();
        fields[19] = t.to_string();
        fields[20] = u.to_string();
        out.push_str(&fields.join(","));
        out.push('\n');
    }
    out.into_bytes()
}

pub fn file(name: &str, bytes: Vec<u8>) -> SourceFile {
    SourceFile::new(name, bytes)
}
