//! `classify`: archive and split-volume classification of names.

use anyhow::Result;
use storekeep_core::classify::{NameClass, classify_name};

use super::print_json;
use crate::ProcessExit;

pub fn run_classify_command(names: &[String], json: bool) -> Result<ProcessExit> {
    let classes: Vec<NameClass> = names.iter().map(|name| classify_name(name)).collect();
    if json {
        print_json(&classes)?;
    } else {
        for class in &classes {
            println!("{}", format_class(class));
        }
    }
    Ok(ProcessExit::Success)
}

fn format_class(class: &NameClass) -> String {
    format!(
        "{}\tarchive={}\tfirst_split={}\tsplit={}\tbase={}",
        class.name,
        class.extension.unwrap_or("-"),
        class.first_split_rule.unwrap_or("no"),
        class.continuation_split,
        class.base_name.as_deref().unwrap_or("-"),
    )
}
