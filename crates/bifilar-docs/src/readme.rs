//! Rewriting one example README.

use std::collections::BTreeMap;

use regex::Regex;
use tracing::info;

use crate::error::{DocsError, Result};
use crate::scan::ExampleDir;

/// Splits a README into its `##` sections.
pub const SECTION_PATTERN: &str = r"\n##\s+";

const GLSL_FENCE: &str = "```glsl";
const LICENSE_RULE: &str = "-----";
const SLICER_URL: &str = "https://github.com/gmlewis/irmf-slicer";
const EDITOR_URL: &str = concat!(
    "https://gmlewis.github.io/irmf-editor/",
    "?s=github.com/gmlewis/irmf-examples/blob/master"
);

/// License footer used when no section carries one of its own.
pub const DEFAULT_LICENSE: &str =
    r#"----------------------------------------------------------------------

# License

Copyright 2020 Glenn M. Lewis. All Rights Reserved.

Licensed under the Apache License, Version 2.0 (the "License");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

    http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an "AS IS" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.
"#;

/// Replace the shader of every `##` section of `readme` with the trimmed
/// `.irmf` source found in `example`, and re-append the license footer.
///
/// Each section must begin with the name of its `.irmf` file and contain a
/// fenced glsl block. Everything from the fence onwards is regenerated.
pub fn rewrite_readme(example: &ExampleDir, readme: &str) -> Result<String> {
    let sections = Regex::new(SECTION_PATTERN)?;
    let mut parts: Vec<String> = sections.split(readme).map(str::to_string).collect();
    info!(dir = %example.label, sections = parts.len(), "found ## sections");

    let mut license = DEFAULT_LICENSE.to_string();
    for (i, part) in parts.iter_mut().enumerate().skip(1) {
        let name = irmf_reference(part)
            .ok_or_else(|| DocsError::MissingIrmfReference {
                dir: example.label.clone(),
                section: i,
            })?
            .to_string();
        let shader = example.irmfs.get(&name).ok_or_else(|| DocsError::UnknownIrmf {
            dir: example.label.clone(),
            name: name.clone(),
        })?;
        let keep = glsl_block_start(part).ok_or_else(|| DocsError::MissingGlslBlock {
            dir: example.label.clone(),
            name: name.clone(),
        })?;

        // A section's own license keeps its copyright year.
        if let Some(j) = part.find(LICENSE_RULE) {
            license = part[j..].to_string();
        }

        let mut section = format!("## {}{shader}```\n\n", &part[..keep]);
        section.push_str(&try_message(&example.label, &name));
        section.push_str(&slicer_message());
        section.push_str(&dlp_list(&name, &example.dlp_sizes));
        *part = section;
    }
    parts.push(license);
    Ok(parts.join("\n"))
}

/// The section text up to and including `<name>.irmf`.
fn irmf_reference(section: &str) -> Option<&str> {
    section.find(".irmf").map(|i| &section[..i + ".irmf".len()])
}

/// Byte offset just past the line that opens the glsl block.
fn glsl_block_start(section: &str) -> Option<usize> {
    let fence = section.find(GLSL_FENCE)?;
    let end = section[fence..]
        .find('\n')
        .map_or(section.len(), |n| fence + n + 1);
    Some(end)
}

fn try_message(dir: &str, name: &str) -> String {
    format!(
        "* Try loading [{name}]({EDITOR_URL}/{dir}/{name}) \
         now in the experimental IRMF editor!\n"
    )
}

fn slicer_message() -> String {
    format!("\n* Use [irmf-slicer]({SLICER_URL}) to generate an STL or voxel approximation.\n")
}

/// Links to the `<stem>-mat*.cbddlp` voxel slices of `name`, if any.
fn dlp_list(name: &str, sizes: &BTreeMap<String, u64>) -> String {
    let stem = name.strip_suffix(".irmf").unwrap_or(name);
    let prefix = format!("{stem}-mat");
    let mut lines: Vec<String> = sizes
        .iter()
        .filter(|(file, _)| file.starts_with(&prefix))
        .map(|(file, size)| format!("  - [{file}]({file}) ({size} bytes)"))
        .collect();
    if lines.is_empty() {
        return String::new();
    }

    let mut header = format!(
        "* Here is a voxel approximation of this model\n  \
         using [irmf-slicer]({SLICER_URL})"
    );
    if lines.len() > 1 {
        lines.sort();
        header.push_str("\n  (one .cbddlp file per material)");
    }
    format!("\n{header}:\n{}\n", lines.join("\n"))
}
