//! Anchored edits to jurisdiction definition files.
//!
//! Only whole table headers and single `key = value` lines are rewritten, so the same text
//! appearing in a comment or in some other value is left alone. Every field edit is checked by
//! parsing the result.

use anyhow::{anyhow, bail, Context};
use regex::{Captures, Regex};

/// Rename the tables declaring a class: `[Old]`, `[Old.posts]` and `[[Old.posts]]` headers.
/// Returns None if there was nothing to rename.
pub fn rename_table(content:&str,old:&str,new:&str) -> anyhow::Result<Option<String>> {
    let header = Regex::new(&format!(r"(?m)^(\s*\[\[?\s*){}(\s*[\].])",regex::escape(old)))?;
    if !header.is_match(content) { return Ok(None); }
    let renamed = header.replace_all(content,|caps:&Captures|format!("{}{}{}",&caps[1],new,&caps[2]));
    Ok(Some(renamed.into_owned()))
}

/// Set a string field of a table, replacing its assignment line or adding one just after the
/// table header.
pub fn set_table_field(content:&str,table:&str,field:&str,value:&str) -> anyhow::Result<String> {
    let lines : Vec<&str> = content.split_inclusive('\n').collect();
    let header = format!("[{}]",table);
    let start = lines.iter().position(|line|uncommented(line).trim()==header).ok_or_else(||anyhow!("No {} table to set {} in",header,field))?;
    let end = lines[start+1..].iter().position(|line|line.trim_start().starts_with('[')).map(|p|start+1+p).unwrap_or(lines.len());
    let assignment = Regex::new(&format!(r"^(\s*){}\s*=",regex::escape(field)))?;
    let quoted = toml::Value::String(value.to_string()).to_string();
    let mut edited : Vec<String> = lines.iter().map(|line|line.to_string()).collect();
    match (start+1..end).find(|&i|assignment.is_match(lines[i])) {
        Some(i) => {
            let indent = assignment.captures(lines[i]).map(|c|c[1].to_string()).unwrap_or_default();
            edited[i] = format!("{}{} = {}{}",indent,field,quoted,line_ending(lines[i]));
        }
        None => {
            if !edited[start].ends_with('\n') { edited[start].push('\n'); }
            edited.insert(start+1,format!("{} = {}\n",field,quoted));
        }
    }
    let result = edited.concat();
    let parsed : toml::Table = toml::from_str(&result).with_context(||format!("Setting {}.{} would make the file invalid",table,field))?;
    let written = parsed.get(table).and_then(|t|t.get(field)).and_then(|v|v.as_str());
    if written!=Some(value) { bail!("Setting {}.{} to {:?} did not take effect",table,field,value); }
    Ok(result)
}

fn uncommented(line:&str) -> &str {
    line.split('#').next().unwrap_or("")
}

fn line_ending(line:&str) -> &'static str {
    if line.ends_with("\r\n") { "\r\n" } else if line.ends_with('\n') { "\n" } else { "" }
}
