//! Trimming the JSON header of an `.irmf` shader.

/// Header keys that survive [`strip_metadata`], in match order.
pub const KEPT_KEYS: [&str; 5] = ["irmf", "materials", "max", "min", "units"];

/// Line that closes the JSON header comment.
const HEADER_END: &str = "}*/";

/// Reduce the JSON header of an `.irmf` file to the keys a reader needs.
///
/// The first line (`/*{`) is kept. Inside the header, a line survives only
/// if it contains `"key": ` for one of [`KEPT_KEYS`], and is rewritten as
/// `  key: <rest>`. The closing `}*/` line and the shader after it are kept
/// verbatim.
pub fn strip_metadata(source: &str) -> String {
    let mut out = Vec::new();
    let mut in_header = true;
    for (i, line) in source.split('\n').enumerate() {
        if i == 0 || !in_header {
            out.push(line.to_string());
            continue;
        }
        if line == HEADER_END {
            in_header = false;
            out.push(line.to_string());
            continue;
        }
        for key in KEPT_KEYS {
            let tag = format!("\"{key}\": ");
            if let Some(at) = line.find(&tag) {
                out.push(format!("  {key}: {}", &line[at + tag.len()..]));
                break;
            }
        }
    }
    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHADER: &str = r#"/*{
  "author": "Someone",
  "copyright": "Apache-2.0",
  "irmf": "1.0",
  "materials": ["copper","dielectric"],
  "max": [15,15,129],
  "min": [-15,-15,-1],
  "notes": "Keep this short.",
  "options": {},
  "title": "Bifilar electromagnet",
  "units": "mm",
  "version": "1.0"
}*/

void mainModel4(out vec4 materials, in vec3 xyz) {
  materials[0] = 1.0; // "max": untouched here
}"#;

    #[test]
    fn test_strip_keeps_only_listed_keys() {
        let stripped = strip_metadata(SHADER);
        let expected = r#"/*{
  irmf: "1.0",
  materials: ["copper","dielectric"],
  max: [15,15,129],
  min: [-15,-15,-1],
  units: "mm",
}*/

void mainModel4(out vec4 materials, in vec3 xyz) {
  materials[0] = 1.0; // "max": untouched here
}"#;
        assert_eq!(stripped, expected);
    }

    #[test]
    fn test_strip_without_header_end_drops_everything_after_first_line() {
        assert_eq!(strip_metadata("/*{\n  \"author\": \"x\",\nvoid f() {}"), "/*{");
    }

    #[test]
    fn test_strip_preserves_trailing_newline() {
        let s = strip_metadata("/*{\n  \"units\": \"mm\"\n}*/\nvoid f() {}\n");
        assert!(s.ends_with("void f() {}\n"));
        assert!(s.contains("  units: \"mm\"\n"));
    }
}
