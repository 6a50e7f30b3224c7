//! Common fixtures for depth-image tests.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

/// Three rows at depths 1, 5 and 9 with four sample columns.
pub const THREE_ROW_CSV: &str = "\
depth,s0,s1,s2,s3
1.0,10,20,30,40
5.0,50,60,70,80
9.0,90,100,110,120
";

/// Contains an empty cell, `inf`, `-inf` and `nan`, including in depth.
pub const DIRTY_CSV: &str = "\
depth,s0,s1,s2
1.0,10,,30
inf,40,50,60
2.0,-inf,nan,90
3.0,inf,1,2
";

/// Second row has one field too many.
pub const RAGGED_CSV: &str = "\
depth,s0,s1
1.0,1,2
2.0,3,4,5
";

/// Header only, no data rows.
pub const EMPTY_CSV: &str = "depth,s0,s1\n";

/// Write CSV text to a temp file that lives as long as the handle.
pub fn write_temp_csv(contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".csv")
        .tempfile()
        .expect("create temp csv");
    file.write_all(contents.as_bytes()).expect("write temp csv");
    file.flush().expect("flush temp csv");
    file
}

/// Write CSV text to `name` inside `dir` and return the full path.
pub fn write_csv_in(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("write csv");
    path
}
