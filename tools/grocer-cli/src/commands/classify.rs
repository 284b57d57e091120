//! Classify product names without touching the catalog.

use anyhow::Result;
use serde::Serialize;

use super::ClassifyArgs;
use crate::context::Context;

#[derive(Serialize)]
struct Classification<'a> {
    name: &'a str,
    category: &'static str,
    keyword: Option<&'static str>,
    #[serde(rename = "override")]
    overriding: bool,
}

/// Run the classify command.
pub fn run(args: ClassifyArgs, ctx: &Context) -> Result<()> {
    let classifier = ctx.classifier()?;
    let fallback = args.fallback.as_deref().unwrap_or_default();

    let results: Vec<Classification> = args
        .names
        .iter()
        .map(|name| {
            let matched = classifier.explain(name);
            Classification {
                name,
                category: classifier.classify(name, fallback).as_str(),
                keyword: matched.map(|m| m.keyword),
                overriding: matched.is_some_and(|m| m.overriding),
            }
        })
        .collect();

    if ctx.output.is_json() {
        ctx.output.json(&results);
        return Ok(());
    }

    for result in &results {
        let reason = match (result.keyword, result.overriding) {
            (Some(keyword), true) => format!("override on \"{}\"", keyword),
            (Some(keyword), false) => format!("matched \"{}\"", keyword),
            (None, _) => "fallback".to_string(),
        };
        ctx.output
            .kv(result.name, &format!("{} ({})", result.category, reason));
    }
    Ok(())
}
